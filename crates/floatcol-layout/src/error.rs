//! Errors reported before a layout pass begins.
//!
//! Overflow is not an error: it is reported as data on
//! [`ColumnLayout`](crate::layout::ColumnLayout).

use thiserror::Error;

/// A caller contract breach detected while validating layout input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LayoutError {
    /// A direction-relative value is used but no text direction is available.
    #[error("{what} requires a text direction, but none is configured")]
    UnresolvedDirection {
        /// What asked for the direction, e.g. `"float: start on item 3"`.
        what: String,
    },

    /// A placement tag treats an item as the wrong kind.
    #[error("flattened box {box_index} refers to item {item_index}, which is not a {expected}")]
    ItemKind {
        /// Position of the offending tag in the side table.
        box_index: usize,
        /// Item the tag points at.
        item_index: usize,
        /// `"box"` or `"paragraph"`.
        expected: &'static str,
    },

    /// An inline box's tag asks it to float or clear. Inline boxes flow
    /// with their paragraph's text.
    #[error("flattened box {box_index} is an inline box of item {item_index} and cannot float or clear")]
    InlineFloat {
        /// Position of the offending tag in the side table.
        box_index: usize,
        /// Paragraph the inline box belongs to.
        item_index: usize,
    },

    /// The tag table does not line up with the item sequence.
    #[error("flattened box {box_index} does not match item {item_index} in document order")]
    TagMismatch {
        /// Position in the side table where the mismatch was found.
        box_index: usize,
        /// Item that the walk expected at that position.
        item_index: usize,
    },
}
