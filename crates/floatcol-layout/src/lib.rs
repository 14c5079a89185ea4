//! Column layout with floats and float-aware paragraph wrapping.
//!
//! # Scope
//!
//! This crate implements:
//! - **Float Registry** ([§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats))
//!   - `left`/`right`/`start`/`end` floats resolved against the column direction
//!   - Clearance with a minimum spacing below cleared floats
//!   - Available line space as a function of vertical position
//!
//! - **Paragraph Wrap Engine** ([§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting))
//!   - Greedy line breaking where each line's width depends on its band
//!   - Inline boxes as baseline-aligned placeholders, scaled with the text
//!   - A paragraph cache keyed by resolved identity, reused across passes
//!
//! - **Column Orchestrator** ([§ 9.4.1](https://www.w3.org/TR/CSS2/visuren.html#block-formatting))
//!   - Top-to-bottom placement with a vertical cursor
//!   - Cross-axis alignment (start, end, center, stretch)
//!   - Overflow reported as data
//!
//! # Not Yet Implemented
//!
//! - Non-floating boxes next to a float: they are placed at the cursor and
//!   may overlap it; only paragraph lines avoid floats
//! - Baseline cross-axis alignment (treated as start)
//! - Justified text (treated as start)

/// Errors reported before a layout pass.
pub mod error;
/// The layout input: boxes and paragraphs.
pub mod item;
/// Geometry, floats, shaping, and the column orchestrator.
pub mod layout;
/// Directions, alignments, and text styles.
pub mod style;

pub use error::LayoutError;
pub use item::{BlockBox, BoxId, InlineBox, InlineSpan, Item, ParagraphKey, WrappableText};
pub use layout::{ColumnConfig, ColumnLayout, Constraints, FloatColumn};
