//! Placement tags: the side table that maps each flattened box back to the
//! item (and placeholder) it came from, together with its float parameters.
//!
//! A column's boxes are flattened in document order: a block box item
//! contributes one box, and a paragraph contributes one box per embedded
//! inline box. `(item_index, placeholder_index)` is unique within a layout.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::error::LayoutError;
use crate::item::{BlockBox, Item};
use crate::style::{PhysicalSide, TextDirection};

/// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
///
/// "left: The element generates a block box that is floated to the left.
/// right: The element generates a block box that is floated to the right.
/// none: The box is not floated."
///
/// `start` and `end` are resolved against the column's text direction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum FloatSide {
    /// The box is not floated.
    #[default]
    None,
    /// Floated to the left edge.
    Left,
    /// Floated to the right edge.
    Right,
    /// Floated to the inline-start edge.
    Start,
    /// Floated to the inline-end edge.
    End,
}

impl FloatSide {
    /// Whether the box is floated at all.
    #[must_use]
    pub const fn is_floating(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether resolving this side needs a text direction.
    #[must_use]
    pub const fn is_direction_relative(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// The physical edge this float is pinned to, or `None` when not floated.
    #[must_use]
    pub const fn resolve(self, direction: TextDirection) -> Option<PhysicalSide> {
        match self {
            Self::None => None,
            Self::Left => Some(PhysicalSide::Left),
            Self::Right => Some(PhysicalSide::Right),
            Self::Start => Some(direction.start_side()),
            Self::End => Some(direction.end_side()),
        }
    }
}

/// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
///
/// "This property indicates which sides of an element's box(es) may not
/// be adjacent to an earlier floating box."
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum ClearSide {
    /// "No constraint on the box's position with respect to floats."
    #[default]
    None,
    /// Below any left-floating boxes.
    Left,
    /// Below any right-floating boxes.
    Right,
    /// Below any inline-start floating boxes.
    Start,
    /// Below any inline-end floating boxes.
    End,
    /// Below any floating boxes.
    Both,
}

impl ClearSide {
    /// Whether any side is cleared.
    #[must_use]
    pub const fn is_clearing(self) -> bool {
        !matches!(self, Self::None)
    }

    /// Whether resolving this side needs a text direction.
    #[must_use]
    pub const fn is_direction_relative(self) -> bool {
        matches!(self, Self::Start | Self::End)
    }

    /// Whether floats on the physical `side` are cleared.
    #[must_use]
    pub fn covers(self, side: PhysicalSide, direction: TextDirection) -> bool {
        match self {
            Self::None => false,
            Self::Both => true,
            Self::Left => side == PhysicalSide::Left,
            Self::Right => side == PhysicalSide::Right,
            Self::Start => side == direction.start_side(),
            Self::End => side == direction.end_side(),
        }
    }
}

/// Per-box placement metadata.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlacementTag {
    /// Position of the owning item in the item sequence.
    pub item_index: usize,
    /// `0` for block boxes; the box's sequential index inside its paragraph
    /// for inline boxes.
    pub placeholder_index: usize,
    /// Edge to pin the box to.
    pub float: FloatSide,
    /// Float edges the box must be placed below.
    pub clear: ClearSide,
    /// Minimum distance below cleared floats, `>= 0`.
    pub clear_min_spacing: f32,
    /// Width cap as a fraction of the column width, in `(0, 1]`.
    pub max_width_fraction: f32,
}

/// Non-finite or negative spacing reads as zero.
pub(crate) fn sanitize_spacing(spacing: f32) -> f32 {
    if spacing.is_finite() && spacing > 0.0 {
        spacing
    } else {
        0.0
    }
}

/// Fractions outside `(0, 1]` are clamped; non-positive or non-finite read as `1`.
pub(crate) fn sanitize_fraction(fraction: f32) -> f32 {
    if fraction.is_finite() && fraction > 0.0 {
        fraction.min(1.0)
    } else {
        1.0
    }
}

impl PlacementTag {
    /// Tag for a block box item.
    #[must_use]
    pub fn block(item_index: usize, block: &BlockBox) -> Self {
        Self {
            item_index,
            placeholder_index: 0,
            float: block.float,
            clear: block.clear,
            clear_min_spacing: sanitize_spacing(block.clear_min_spacing),
            max_width_fraction: sanitize_fraction(block.max_width_fraction),
        }
    }

    /// Tag for the `placeholder_index`-th inline box of paragraph `item_index`.
    #[must_use]
    pub const fn inline(item_index: usize, placeholder_index: usize) -> Self {
        Self {
            item_index,
            placeholder_index,
            float: FloatSide::None,
            clear: ClearSide::None,
            clear_min_spacing: 0.0,
            max_width_fraction: 1.0,
        }
    }

    /// Build the side table for `items`, one tag per flattened box in
    /// document order.
    #[must_use]
    pub fn flatten(items: &[Item]) -> Vec<Self> {
        let mut tags = Vec::with_capacity(items.len());
        for (item_index, item) in items.iter().enumerate() {
            match item {
                Item::Box(block) => tags.push(Self::block(item_index, block)),
                Item::Text(text) => tags.extend(
                    (0..text.placeholder_count())
                        .map(|placeholder| Self::inline(item_index, placeholder)),
                ),
            }
        }
        tags
    }

    /// Check that `tags` is a valid side table for `items`: document order,
    /// one tag per block box with placeholder `0`, and one tag per inline box
    /// with sequential placeholder indices.
    ///
    /// # Errors
    ///
    /// [`LayoutError::ItemKind`] when a tag treats a paragraph as a block box
    /// or a block box as a paragraph; [`LayoutError::InlineFloat`] when an
    /// inline box's tag sets `float` or `clear`; [`LayoutError::TagMismatch`]
    /// for any other misalignment (missing, extra, or out-of-order tags).
    pub fn validate(tags: &[Self], items: &[Item]) -> Result<(), LayoutError> {
        let mut box_index = 0;
        for (item_index, item) in items.iter().enumerate() {
            match item {
                Item::Box(_) => {
                    let Some(tag) = tags.get(box_index) else {
                        return Err(LayoutError::TagMismatch {
                            box_index,
                            item_index,
                        });
                    };
                    if tag.item_index != item_index {
                        return Err(LayoutError::TagMismatch {
                            box_index,
                            item_index,
                        });
                    }
                    if tag.placeholder_index != 0 {
                        return Err(LayoutError::ItemKind {
                            box_index,
                            item_index,
                            expected: "paragraph",
                        });
                    }
                    box_index += 1;
                }
                Item::Text(text) => {
                    let count = text.placeholder_count();
                    if count == 0 {
                        if tags.get(box_index).is_some_and(|tag| tag.item_index == item_index) {
                            return Err(LayoutError::ItemKind {
                                box_index,
                                item_index,
                                expected: "box",
                            });
                        }
                        continue;
                    }
                    for placeholder in 0..count {
                        match tags.get(box_index) {
                            Some(tag)
                                if tag.item_index == item_index
                                    && tag.placeholder_index == placeholder =>
                            {
                                if tag.float != FloatSide::None || tag.clear != ClearSide::None {
                                    return Err(LayoutError::InlineFloat {
                                        box_index,
                                        item_index,
                                    });
                                }
                            }
                            _ => {
                                return Err(LayoutError::TagMismatch {
                                    box_index,
                                    item_index,
                                });
                            }
                        }
                        box_index += 1;
                    }
                }
            }
        }
        if let Some(extra) = tags.get(box_index) {
            return Err(LayoutError::TagMismatch {
                box_index,
                item_index: extra.item_index,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{BoxId, InlineSpan, WrappableText};
    use crate::style::TextStyle;

    fn sample_items() -> Vec<Item> {
        vec![
            BlockBox::new(BoxId(1)).floated(FloatSide::Left).into(),
            WrappableText::new(InlineSpan::span(
                TextStyle::default(),
                vec![
                    InlineSpan::text("a"),
                    InlineSpan::inline_box(BoxId(2)),
                    InlineSpan::inline_box(BoxId(3)),
                ],
            ))
            .into(),
            WrappableText::plain("no boxes").into(),
            BlockBox::new(BoxId(4)).max_width_fraction(3.0).into(),
        ]
    }

    #[test]
    fn test_flatten_order_and_indices() {
        let tags = PlacementTag::flatten(&sample_items());
        let pairs: Vec<(usize, usize)> = tags
            .iter()
            .map(|tag| (tag.item_index, tag.placeholder_index))
            .collect();
        assert_eq!(pairs, vec![(0, 0), (1, 0), (1, 1), (3, 0)]);
        assert_eq!(tags[0].float, FloatSide::Left);
        assert_eq!(tags[3].max_width_fraction, 1.0);
    }

    #[test]
    fn test_validate_accepts_flattened_tags() {
        let items = sample_items();
        let tags = PlacementTag::flatten(&items);
        assert_eq!(PlacementTag::validate(&tags, &items), Ok(()));
    }

    #[test]
    fn test_validate_rejects_paragraph_as_box() {
        let items = sample_items();
        let mut tags = PlacementTag::flatten(&items);
        tags.insert(3, PlacementTag::inline(2, 0));
        assert_eq!(
            PlacementTag::validate(&tags, &items),
            Err(LayoutError::ItemKind {
                box_index: 3,
                item_index: 2,
                expected: "box",
            })
        );
    }

    #[test]
    fn test_validate_rejects_box_as_paragraph() {
        let items = sample_items();
        let mut tags = PlacementTag::flatten(&items);
        tags[0].placeholder_index = 2;
        assert!(matches!(
            PlacementTag::validate(&tags, &items),
            Err(LayoutError::ItemKind { box_index: 0, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_missing_and_extra_tags() {
        let items = sample_items();
        let tags = PlacementTag::flatten(&items);
        assert_eq!(
            PlacementTag::validate(&tags[..2], &items),
            Err(LayoutError::TagMismatch {
                box_index: 2,
                item_index: 1,
            })
        );
        let mut extra = tags;
        extra.push(PlacementTag::inline(9, 0));
        assert!(matches!(
            PlacementTag::validate(&extra, &items),
            Err(LayoutError::TagMismatch { box_index: 4, .. })
        ));
    }

    #[test]
    fn test_validate_rejects_floating_inline_box() {
        let items = sample_items();
        let mut tags = PlacementTag::flatten(&items);
        tags[1].clear = ClearSide::Start;
        assert_eq!(
            PlacementTag::validate(&tags, &items),
            Err(LayoutError::InlineFloat {
                box_index: 1,
                item_index: 1,
            })
        );
        tags[1].clear = ClearSide::None;
        tags[2].float = FloatSide::Left;
        assert_eq!(
            PlacementTag::validate(&tags, &items),
            Err(LayoutError::InlineFloat {
                box_index: 2,
                item_index: 1,
            })
        );
    }

    #[test]
    fn test_clear_covers() {
        let ltr = TextDirection::Ltr;
        let rtl = TextDirection::Rtl;
        assert!(ClearSide::Both.covers(PhysicalSide::Left, ltr));
        assert!(ClearSide::Start.covers(PhysicalSide::Left, ltr));
        assert!(ClearSide::Start.covers(PhysicalSide::Right, rtl));
        assert!(!ClearSide::End.covers(PhysicalSide::Right, rtl));
        assert!(!ClearSide::None.covers(PhysicalSide::Left, ltr));
    }

    #[test]
    fn test_float_resolve() {
        assert_eq!(FloatSide::None.resolve(TextDirection::Ltr), None);
        assert_eq!(
            FloatSide::End.resolve(TextDirection::Ltr),
            Some(PhysicalSide::Right)
        );
        assert_eq!(
            FloatSide::Start.resolve(TextDirection::Rtl),
            Some(PhysicalSide::Right)
        );
    }
}
