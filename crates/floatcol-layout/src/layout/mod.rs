//! Float-aware column layout
//!
//! This module lays out an ordered sequence of block boxes and paragraphs
//! in a single vertical column, where floated boxes narrow the lines of
//! later paragraphs.
//!
//! # Relevant CSS Sections
//!
//! - [CSS 2.1 Visual Formatting Model](https://www.w3.org/TR/CSS2/visuren.html)
//! - [CSS 2.1 Visual Formatting Model Details](https://www.w3.org/TR/CSS2/visudet.html)
//! - [CSS Text Module Level 3](https://www.w3.org/TR/css-text-3/)
//!
//! # Module Structure
//!
//! - [`geometry`] - Sizes, rectangles, edge sizes, and constraints
//! - [`tag`] - Float/clear sides and the placement side table
//! - [`keys`] - Unique paragraph keys
//! - [`float`] - The float registry and per-line available space
//! - [`inline`] - Line breaking against a position-dependent width
//! - [`measure`] - The box measurement service
//! - [`paragraph`] - The paragraph wrap engine and its cache
//! - [`column`] - The column orchestrator

pub mod column;
pub mod float;
pub mod geometry;
pub mod inline;
pub mod keys;
pub mod measure;
pub mod paragraph;
pub mod tag;

// Re-exports for convenience
pub use column::{BoxPlacement, ColumnConfig, ColumnLayout, FloatColumn, ParagraphPlacement};
pub use float::{ActiveFloat, FloatRegistry, LineSpace, RegistryBand};
pub use geometry::{Constraints, EdgeSizes, Point, Rect, Size};
pub use inline::{
    ApproximateFontMetrics, FontMetrics, FragmentContent, IntrinsicWidths, LineBreaker,
    LineFragment, PlaceholderSlot, ShapeInput, ShapeRun, ShapedLine, ShapedParagraph, TextShaper,
    WidthAt,
};
pub use keys::{paragraph_keys, resolve_keys};
pub use measure::{BoxMeasurer, IntrinsicSizes};
pub use paragraph::{CacheStats, ParagraphState, WrapEngine};
pub use tag::{ClearSide, FloatSide, PlacementTag};
