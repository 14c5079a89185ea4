//! The column document: a JSON description of one column, its boxes, and
//! its items.
//!
//! ```json
//! {
//!   "column": { "width": 300, "direction": "ltr", "cross_axis_alignment": "start" },
//!   "boxes": { "1": { "width": 100, "height": 50 } },
//!   "items": [
//!     { "type": "box", "id": 1, "float": "left" },
//!     { "type": "text", "text": { "type": "text", "text": "Wraps around the float." } }
//!   ]
//! }
//! ```

use std::collections::HashMap;

use floatcol_layout::layout::{Constraints, IntrinsicSizes, Size};
use floatcol_layout::{BoxId, ColumnConfig, Item};
use serde::{Deserialize, Serialize};

/// Column size and configuration. Missing bounds are unbounded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnSection {
    /// Maximum column width.
    pub width: Option<f32>,
    /// Maximum column height.
    pub height: Option<f32>,
    /// Direction and cross-axis alignment.
    #[serde(flatten)]
    pub config: ColumnConfig,
}

/// A complete column document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Column size and configuration.
    #[serde(default)]
    pub column: ColumnSection,
    /// Natural size of every box the items refer to.
    #[serde(default)]
    pub boxes: HashMap<BoxId, Size>,
    /// The items, top to bottom.
    pub items: Vec<Item>,
}

impl Document {
    /// Parse a document from JSON text.
    pub fn from_json(source: &str) -> serde_json::Result<Self> {
        serde_json::from_str(source)
    }

    /// Constraints for the column: loose up to the configured bounds.
    pub fn constraints(&self) -> Constraints {
        Constraints::loose(
            self.column.width.unwrap_or(f32::INFINITY),
            self.column.height.unwrap_or(f32::INFINITY),
        )
    }

    /// A measurer answering with the document's box sizes.
    pub fn measurer(&self) -> IntrinsicSizes {
        IntrinsicSizes::from(self.boxes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use floatcol_layout::layout::FloatSide;
    use floatcol_layout::style::{CrossAxisAlignment, TextDirection};

    #[test]
    fn test_minimal_document() {
        let document = Document::from_json(r#"{"items": []}"#).unwrap();
        assert_eq!(document.column.config, ColumnConfig::default());
        assert!(!document.constraints().has_bounded_width());
    }

    #[test]
    fn test_demo_document_parses() {
        let document = Document::from_json(include_str!("../demos/float_wrap.json")).unwrap();
        assert_eq!(document.column.width, Some(320.0));
        assert_eq!(document.column.config.direction, Some(TextDirection::Ltr));
        assert_eq!(
            document.column.config.cross_axis_alignment,
            CrossAxisAlignment::Start
        );
        assert_eq!(document.boxes.get(&BoxId(1)), Some(&Size::new(120.0, 60.0)));
        assert_eq!(document.items.len(), 5);
        let float = document.items[2].as_box().map(|block| block.float);
        assert_eq!(float, Some(FloatSide::End));
    }

    #[test]
    fn test_null_direction_is_unset() {
        let document = Document::from_json(r#"{"column": {"direction": null}, "items": []}"#).unwrap();
        assert_eq!(document.column.config.direction, None);
    }
}
