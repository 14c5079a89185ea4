//! The layout input: an ordered sequence of boxes and wrappable paragraphs.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::layout::geometry::EdgeSizes;
use crate::layout::tag::{ClearSide, FloatSide};
use crate::style::{TextAlign, TextDirection, TextStyle};

/// Opaque handle for a box the host knows how to measure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(pub u32);

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Identity of a paragraph across relayouts.
///
/// Keys need not be unique in the input; the key resolver rewrites later
/// duplicates to synthesized [`ParagraphKey::Int`] values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParagraphKey {
    /// No key supplied. All anonymous paragraphs share this value.
    #[default]
    Anonymous,
    /// A caller-chosen integer, or a synthesized replacement.
    Int(i64),
    /// A caller-chosen name.
    Name(String),
}

impl fmt::Display for ParagraphKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Anonymous => f.write_str("<anonymous>"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Name(name) => write!(f, "{name:?}"),
        }
    }
}

impl From<&str> for ParagraphKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<String> for ParagraphKey {
    fn from(name: String) -> Self {
        Self::Name(name)
    }
}

impl From<i64> for ParagraphKey {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

const fn one() -> f32 {
    1.0
}

/// A block-level box: either floated against a column edge or placed in
/// flow at the cross-axis alignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockBox {
    /// Handle passed to the box measurement service.
    pub id: BoxId,
    /// Edge to pin the box to, if any.
    #[serde(default)]
    pub float: FloatSide,
    /// Float edges the box must be placed below.
    #[serde(default)]
    pub clear: ClearSide,
    /// Minimum distance kept below the bottom of cleared floats.
    #[serde(default)]
    pub clear_min_spacing: f32,
    /// Cap on the box width as a fraction of the column width, in `(0, 1]`.
    #[serde(default = "one")]
    pub max_width_fraction: f32,
}

impl BlockBox {
    /// An in-flow box with no float, clear, or width cap.
    #[must_use]
    pub const fn new(id: BoxId) -> Self {
        Self {
            id,
            float: FloatSide::None,
            clear: ClearSide::None,
            clear_min_spacing: 0.0,
            max_width_fraction: 1.0,
        }
    }

    /// Pin the box to an edge.
    #[must_use]
    pub const fn floated(mut self, side: FloatSide) -> Self {
        self.float = side;
        self
    }

    /// Place the box below floats on `side`.
    #[must_use]
    pub const fn clear(mut self, side: ClearSide) -> Self {
        self.clear = side;
        self
    }

    /// Keep at least `spacing` below cleared floats.
    #[must_use]
    pub const fn clear_min_spacing(mut self, spacing: f32) -> Self {
        self.clear_min_spacing = spacing;
        self
    }

    /// Cap the width at `fraction` of the column width.
    #[must_use]
    pub const fn max_width_fraction(mut self, fraction: f32) -> Self {
        self.max_width_fraction = fraction;
        self
    }
}

/// A box embedded in paragraph text; the shaper reserves a placeholder for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineBox {
    /// Handle passed to the box measurement service.
    pub id: BoxId,
}

/// A node of a paragraph's styled span tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum InlineSpan {
    /// A leaf run of text.
    Text {
        /// The text content.
        text: String,
        /// Style applied on top of the inherited style.
        #[serde(default)]
        style: TextStyle,
    },
    /// A styled group of child spans.
    Span {
        /// Style inherited by the children.
        #[serde(default)]
        style: TextStyle,
        /// Child spans in order.
        #[serde(default)]
        children: Vec<InlineSpan>,
    },
    /// An embedded box.
    Box(InlineBox),
}

impl InlineSpan {
    /// A plain text leaf.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// A text leaf with its own style.
    #[must_use]
    pub fn styled_text(text: impl Into<String>, style: TextStyle) -> Self {
        Self::Text {
            text: text.into(),
            style,
        }
    }

    /// A group of spans sharing a style.
    #[must_use]
    pub fn span(style: TextStyle, children: Vec<Self>) -> Self {
        Self::Span { style, children }
    }

    /// An embedded box.
    #[must_use]
    pub const fn inline_box(id: BoxId) -> Self {
        Self::Box(InlineBox { id })
    }

    /// The embedded boxes of this tree in document order.
    #[must_use]
    pub fn inline_boxes(&self) -> Vec<BoxId> {
        let mut ids = Vec::new();
        self.collect_boxes(&mut ids);
        ids
    }

    fn collect_boxes(&self, ids: &mut Vec<BoxId>) {
        match self {
            Self::Text { .. } => {}
            Self::Span { children, .. } => {
                for child in children {
                    child.collect_boxes(ids);
                }
            }
            Self::Box(inline) => ids.push(inline.id),
        }
    }

    /// All text of the tree concatenated, boxes omitted.
    #[must_use]
    pub fn plain_text(&self) -> String {
        match self {
            Self::Text { text, .. } => text.clone(),
            Self::Span { children, .. } => children.iter().map(Self::plain_text).collect(),
            Self::Box(_) => String::new(),
        }
    }
}

/// A paragraph of styled text that wraps around active floats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WrappableText {
    /// Identity used to reuse cached paragraph state across relayouts.
    #[serde(default)]
    pub key: ParagraphKey,
    /// The span tree.
    pub text: InlineSpan,
    /// Default style at the root of the span tree.
    #[serde(default)]
    pub style: TextStyle,
    /// Line alignment.
    #[serde(default)]
    pub align: TextAlign,
    /// Overrides the column's direction for this paragraph.
    #[serde(default)]
    pub direction: Option<TextDirection>,
    /// Multiplier applied to font sizes and inline boxes.
    #[serde(default = "one")]
    pub text_scale: f32,
    /// Space outside the paragraph's padding.
    #[serde(default)]
    pub margin: EdgeSizes,
    /// Space between the margin and the text.
    #[serde(default)]
    pub padding: EdgeSizes,
    /// Float edges the paragraph must start below.
    #[serde(default)]
    pub clear: ClearSide,
    /// Minimum distance kept below the bottom of cleared floats.
    #[serde(default)]
    pub clear_min_spacing: f32,
    /// Inset of the first line from the inline-start edge.
    #[serde(default)]
    pub indent: f32,
}

impl WrappableText {
    /// A paragraph with default style and no key.
    #[must_use]
    pub fn new(text: InlineSpan) -> Self {
        Self {
            key: ParagraphKey::Anonymous,
            text,
            style: TextStyle::default(),
            align: TextAlign::Start,
            direction: None,
            text_scale: 1.0,
            margin: EdgeSizes::ZERO,
            padding: EdgeSizes::ZERO,
            clear: ClearSide::None,
            clear_min_spacing: 0.0,
            indent: 0.0,
        }
    }

    /// A paragraph holding a single unstyled text run.
    #[must_use]
    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(InlineSpan::text(text))
    }

    /// Set the identity key.
    #[must_use]
    pub fn key(mut self, key: impl Into<ParagraphKey>) -> Self {
        self.key = key.into();
        self
    }

    /// Set the default style.
    #[must_use]
    pub fn style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Set the line alignment.
    #[must_use]
    pub fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Override the column's direction.
    #[must_use]
    pub fn direction(mut self, direction: TextDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    /// Set the text scale.
    #[must_use]
    pub fn text_scale(mut self, scale: f32) -> Self {
        self.text_scale = scale;
        self
    }

    /// Set the margin.
    #[must_use]
    pub fn margin(mut self, margin: EdgeSizes) -> Self {
        self.margin = margin;
        self
    }

    /// Set the padding.
    #[must_use]
    pub fn padding(mut self, padding: EdgeSizes) -> Self {
        self.padding = padding;
        self
    }

    /// Start below floats on `side`.
    #[must_use]
    pub fn clear(mut self, side: ClearSide) -> Self {
        self.clear = side;
        self
    }

    /// Keep at least `spacing` below cleared floats.
    #[must_use]
    pub fn clear_min_spacing(mut self, spacing: f32) -> Self {
        self.clear_min_spacing = spacing;
        self
    }

    /// Indent the first line.
    #[must_use]
    pub fn indent(mut self, indent: f32) -> Self {
        self.indent = indent;
        self
    }

    /// The text scale, with non-positive or non-finite values read as `1`.
    #[must_use]
    pub fn effective_text_scale(&self) -> f32 {
        if self.text_scale.is_finite() && self.text_scale > 0.0 {
            self.text_scale
        } else {
            1.0
        }
    }

    /// Number of inline boxes embedded in the span tree.
    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.text.inline_boxes().len()
    }
}

/// One entry of the layout input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Item {
    /// A measurable box.
    Box(BlockBox),
    /// A wrappable paragraph.
    Text(WrappableText),
}

impl Item {
    /// The paragraph, if this item is one.
    #[must_use]
    pub fn as_text(&self) -> Option<&WrappableText> {
        match self {
            Self::Text(text) => Some(text),
            Self::Box(_) => None,
        }
    }

    /// The block box, if this item is one.
    #[must_use]
    pub fn as_box(&self) -> Option<&BlockBox> {
        match self {
            Self::Box(block) => Some(block),
            Self::Text(_) => None,
        }
    }
}

impl From<BlockBox> for Item {
    fn from(block: BlockBox) -> Self {
        Self::Box(block)
    }
}

impl From<WrappableText> for Item {
    fn from(text: WrappableText) -> Self {
        Self::Text(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inline_boxes_in_document_order() {
        let tree = InlineSpan::span(
            TextStyle::default(),
            vec![
                InlineSpan::text("a "),
                InlineSpan::inline_box(BoxId(7)),
                InlineSpan::span(
                    TextStyle::sized(20.0),
                    vec![InlineSpan::text("b"), InlineSpan::inline_box(BoxId(3))],
                ),
            ],
        );
        assert_eq!(tree.inline_boxes(), vec![BoxId(7), BoxId(3)]);
        assert_eq!(tree.plain_text(), "a b");
    }

    #[test]
    fn test_item_from_json() {
        let json = r#"[
            {"type": "box", "id": 1, "float": "left", "max_width_fraction": 0.5},
            {"type": "text", "key": "intro", "text": {"type": "text", "text": "hello"}}
        ]"#;
        let items: Vec<Item> = serde_json::from_str(json).unwrap();
        let block = items[0].as_box().unwrap();
        assert_eq!(block.float, FloatSide::Left);
        assert_eq!(block.clear, ClearSide::None);
        assert_eq!(block.max_width_fraction, 0.5);
        let text = items[1].as_text().unwrap();
        assert_eq!(text.key, ParagraphKey::from("intro"));
        assert_eq!(text.text_scale, 1.0);
    }

    #[test]
    fn test_effective_text_scale() {
        assert_eq!(WrappableText::plain("x").text_scale(0.0).effective_text_scale(), 1.0);
        assert_eq!(WrappableText::plain("x").text_scale(2.0).effective_text_scale(), 2.0);
    }
}
