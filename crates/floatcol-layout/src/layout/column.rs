//! The column layout orchestrator.
//!
//! [§ 9.4.1 Block formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#block-formatting)
//!
//! "In a block formatting context, boxes are laid out one after the other,
//! vertically, beginning at the top of a containing block."
//!
//! One pass walks the items top to bottom with a vertical cursor. Block
//! boxes either float against an edge (registering an exclusion with the
//! [`FloatRegistry`]) or sit at the cursor and push it down. Paragraphs are
//! shaped against the registry, so their lines narrow next to earlier
//! floats. Floats never move the cursor; they only extend the column's
//! content height.

use std::borrow::Cow;
use std::collections::HashSet;

use floatcol_common::warning::warn_once;
use serde::{Deserialize, Serialize};

use super::float::{ActiveFloat, FloatRegistry};
use super::geometry::{Constraints, Point, Rect, Size};
use super::inline::{IntrinsicWidths, ShapedLine, TextShaper};
use super::keys::resolve_keys;
use super::measure::BoxMeasurer;
use super::paragraph::{ParagraphState, WrapEngine};
use super::tag::{PlacementTag, sanitize_fraction, sanitize_spacing};
use crate::error::LayoutError;
use crate::item::{BlockBox, BoxId, Item, ParagraphKey, WrappableText};
use crate::style::{CrossAxisAlignment, PhysicalSide, TextAlign, TextDirection};

/// Column-wide layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnConfig {
    /// Direction used to resolve `start`/`end`. `None` is only valid when
    /// nothing in the column is direction-relative.
    pub direction: Option<TextDirection>,
    /// Horizontal placement of non-floating boxes.
    pub cross_axis_alignment: CrossAxisAlignment,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            direction: Some(TextDirection::Ltr),
            cross_axis_alignment: CrossAxisAlignment::Start,
        }
    }
}

impl ColumnConfig {
    /// Set the direction.
    #[must_use]
    pub const fn direction(mut self, direction: Option<TextDirection>) -> Self {
        self.direction = direction;
        self
    }

    /// Set the cross-axis alignment.
    #[must_use]
    pub const fn cross_axis_alignment(mut self, alignment: CrossAxisAlignment) -> Self {
        self.cross_axis_alignment = alignment;
        self
    }
}

/// Final position of one flattened box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxPlacement {
    /// The box's placement tag.
    pub tag: PlacementTag,
    /// The box being placed.
    pub id: BoxId,
    /// Border box in column coordinates.
    pub rect: Rect,
    /// Paint scale; the paragraph's text scale for inline boxes, `1` otherwise.
    pub scale: f32,
}

/// Final position of one paragraph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParagraphPlacement {
    /// Index of the paragraph in the item sequence.
    pub item_index: usize,
    /// The resolved cache key.
    pub key: ParagraphKey,
    /// Area inside the margin, in column coordinates.
    pub rect: Rect,
    /// Origin of the line coordinates below.
    pub text_origin: Point,
    /// Line boxes, relative to `text_origin`.
    pub lines: Vec<ShapedLine>,
}

/// Result of a layout pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ColumnLayout {
    /// Resolved column size, within the incoming constraints.
    pub size: Size,
    /// Height the content needs, before clamping to the constraints.
    pub content_height: f32,
    /// How far the content extends past `size.height`, if it does.
    pub overflow: Option<f32>,
    /// One entry per flattened box, in document order.
    pub boxes: Vec<BoxPlacement>,
    /// One entry per paragraph, in document order.
    pub paragraphs: Vec<ParagraphPlacement>,
    /// Every float placed during the pass.
    pub floats: Vec<ActiveFloat>,
}

impl ColumnLayout {
    /// The placement of the flattened box `(item_index, placeholder_index)`.
    #[must_use]
    pub fn box_at(&self, item_index: usize, placeholder_index: usize) -> Option<&BoxPlacement> {
        self.boxes.iter().find(|placement| {
            placement.tag.item_index == item_index
                && placement.tag.placeholder_index == placeholder_index
        })
    }

    /// The placement of the paragraph at `item_index`.
    #[must_use]
    pub fn paragraph(&self, item_index: usize) -> Option<&ParagraphPlacement> {
        self.paragraphs
            .iter()
            .find(|paragraph| paragraph.item_index == item_index)
    }

    /// Whether the content is taller than the column.
    #[must_use]
    pub fn has_overflow(&self) -> bool {
        self.overflow.is_some()
    }
}

/// A vertical column of boxes and paragraphs that wrap around floats.
///
/// The only state kept between passes is the paragraph cache; floats and
/// the cursor are rebuilt by every [`FloatColumn::layout`].
#[derive(Debug, Clone, Default)]
pub struct FloatColumn {
    config: ColumnConfig,
    engine: WrapEngine,
}

impl FloatColumn {
    /// Create a column with an empty paragraph cache.
    #[must_use]
    pub fn new(config: ColumnConfig) -> Self {
        Self {
            config,
            engine: WrapEngine::new(),
        }
    }

    /// The configuration.
    #[must_use]
    pub const fn config(&self) -> &ColumnConfig {
        &self.config
    }

    /// Replace the configuration. The paragraph cache is kept.
    pub fn set_config(&mut self, config: ColumnConfig) {
        self.config = config;
    }

    /// The paragraph cache.
    #[must_use]
    pub const fn engine(&self) -> &WrapEngine {
        &self.engine
    }

    /// Lay out `items`, deriving the side table with [`PlacementTag::flatten`].
    ///
    /// # Errors
    ///
    /// See [`FloatColumn::layout_with_tags`].
    pub fn layout(
        &mut self,
        items: &[Item],
        constraints: Constraints,
        measurer: &dyn BoxMeasurer,
        shaper: &dyn TextShaper,
    ) -> Result<ColumnLayout, LayoutError> {
        let tags = PlacementTag::flatten(items);
        self.layout_with_tags(items, &tags, constraints, measurer, shaper)
    }

    /// Lay out `items` using a caller-supplied side table.
    ///
    /// # Errors
    ///
    /// [`LayoutError::ItemKind`] or [`LayoutError::TagMismatch`] when `tags`
    /// does not describe `items`, and [`LayoutError::UnresolvedDirection`]
    /// when something direction-relative is used without a direction. Both
    /// are checked before any layout happens.
    pub fn layout_with_tags(
        &mut self,
        items: &[Item],
        tags: &[PlacementTag],
        constraints: Constraints,
        measurer: &dyn BoxMeasurer,
        shaper: &dyn TextShaper,
    ) -> Result<ColumnLayout, LayoutError> {
        let pass = Pass::prepare(&self.config, items, tags, constraints, measurer, shaper)?;
        Ok(pass.run(&mut self.engine))
    }

    /// The size [`FloatColumn::layout`] would produce, without touching the
    /// paragraph cache.
    ///
    /// # Errors
    ///
    /// Same as [`FloatColumn::layout`].
    pub fn dry_layout(
        &self,
        items: &[Item],
        constraints: Constraints,
        measurer: &dyn BoxMeasurer,
        shaper: &dyn TextShaper,
    ) -> Result<Size, LayoutError> {
        let tags = PlacementTag::flatten(items);
        let pass = Pass::prepare(&self.config, items, &tags, constraints, measurer, shaper)?;
        let mut scratch = WrapEngine::new();
        Ok(pass.run(&mut scratch).size)
    }

    /// Minimum and maximum content widths of `items`.
    ///
    /// The minimum is the widest unbreakable piece; the maximum is the
    /// widest item laid out without soft wrapping.
    #[must_use]
    pub fn intrinsic_width(
        &self,
        items: &[Item],
        measurer: &dyn BoxMeasurer,
        shaper: &dyn TextShaper,
    ) -> IntrinsicWidths {
        items_intrinsic_widths(
            items,
            self.config.direction.unwrap_or_default(),
            measurer,
            shaper,
        )
    }
}

fn items_intrinsic_widths(
    items: &[Item],
    direction: TextDirection,
    measurer: &dyn BoxMeasurer,
    shaper: &dyn TextShaper,
) -> IntrinsicWidths {
    items
        .iter()
        .map(|item| match item {
            Item::Box(block) => measurer.intrinsic_widths(block.id),
            Item::Text(text) => paragraph_intrinsic_widths(text, direction, measurer, shaper),
        })
        .fold(IntrinsicWidths::default(), IntrinsicWidths::union)
}

fn paragraph_intrinsic_widths(
    text: &WrappableText,
    direction: TextDirection,
    measurer: &dyn BoxMeasurer,
    shaper: &dyn TextShaper,
) -> IntrinsicWidths {
    let mut state = ParagraphState::new(text, text.direction.unwrap_or(direction));
    let scale = state.text_scale();
    let sizes: Vec<Size> = state
        .inline_boxes()
        .iter()
        .map(|id| {
            measurer
                .measure_inline(*id, Constraints::UNBOUNDED, scale)
                .scale(scale)
        })
        .collect();
    state.set_placeholder_sizes(&sizes);
    state
        .intrinsic_widths(shaper)
        .inflate(text.margin.horizontal() + text.padding.horizontal())
}

/// Resolve the direction for the pass.
///
/// Without a configured direction, any direction-relative alignment, float,
/// or clear is a configuration error. Paragraphs carrying their own
/// direction are exempt for their text alignment.
fn resolve_direction(
    config: &ColumnConfig,
    items: &[Item],
    tags: &[PlacementTag],
) -> Result<TextDirection, LayoutError> {
    if let Some(direction) = config.direction {
        return Ok(direction);
    }
    let unresolved = |what: String| Err(LayoutError::UnresolvedDirection { what });

    if config.cross_axis_alignment.is_direction_relative() {
        return unresolved(format!(
            "cross-axis alignment `{}`",
            config.cross_axis_alignment
        ));
    }
    for tag in tags {
        if tag.float.is_direction_relative() {
            return unresolved(format!("float `{}` on item {}", tag.float, tag.item_index));
        }
        if tag.clear.is_direction_relative() {
            return unresolved(format!("clear `{}` on item {}", tag.clear, tag.item_index));
        }
    }
    for (index, item) in items.iter().enumerate() {
        let Some(text) = item.as_text() else {
            continue;
        };
        if text.clear.is_direction_relative() {
            return unresolved(format!("clear `{}` on item {index}", text.clear));
        }
        if text.direction.is_none() && text.align.is_direction_relative() {
            return unresolved(format!("text alignment `{}` on item {index}", text.align));
        }
    }
    Ok(TextDirection::default())
}

fn report_fallbacks(config: &ColumnConfig, items: &[Item]) {
    if config.cross_axis_alignment == CrossAxisAlignment::Baseline {
        let _first = warn_once(
            "floatcol-layout",
            "baseline cross-axis alignment is not supported; boxes are aligned to start",
        );
    }
    if items
        .iter()
        .filter_map(Item::as_text)
        .any(|text| text.align == TextAlign::Justify)
    {
        let _first = warn_once(
            "floatcol-layout",
            "justified text is not supported; lines are aligned to start",
        );
    }
}

/// A validated layout pass, ready to run.
struct Pass<'a> {
    config: &'a ColumnConfig,
    items: Cow<'a, [Item]>,
    tags: &'a [PlacementTag],
    constraints: Constraints,
    direction: TextDirection,
    column_width: f32,
    measurer: &'a dyn BoxMeasurer,
    shaper: &'a dyn TextShaper,
}

/// What the walk over the items has accumulated so far.
struct PassState {
    registry: FloatRegistry,
    cursor: f32,
    boxes: Vec<BoxPlacement>,
    paragraphs: Vec<ParagraphPlacement>,
}

impl<'a> Pass<'a> {
    fn prepare(
        config: &'a ColumnConfig,
        items: &'a [Item],
        tags: &'a [PlacementTag],
        constraints: Constraints,
        measurer: &'a dyn BoxMeasurer,
        shaper: &'a dyn TextShaper,
    ) -> Result<Self, LayoutError> {
        PlacementTag::validate(tags, items)?;
        let direction = resolve_direction(config, items, tags)?;
        report_fallbacks(config, items);

        // An unbounded column shrinks to its widest item.
        let column_width = if constraints.has_bounded_width() {
            constraints.max_width
        } else {
            items_intrinsic_widths(items, direction, measurer, shaper)
                .max
                .clamp(constraints.min_width, constraints.max_width)
        };

        Ok(Self {
            config,
            items: resolve_keys(items),
            tags,
            constraints,
            direction,
            column_width,
            measurer,
            shaper,
        })
    }

    fn run(&self, engine: &mut WrapEngine) -> ColumnLayout {
        tracing::debug!(
            items = self.items.len(),
            boxes = self.tags.len(),
            column_width = self.column_width,
            direction = %self.direction,
            "column layout pass"
        );

        let keys: HashSet<ParagraphKey> = self
            .items
            .iter()
            .filter_map(Item::as_text)
            .map(|text| text.key.clone())
            .collect();
        engine.prune(&keys);

        let mut state = PassState {
            registry: FloatRegistry::new(self.column_width, self.direction),
            cursor: 0.0,
            boxes: Vec::with_capacity(self.tags.len()),
            paragraphs: Vec::new(),
        };

        // Tags were validated against the items, so walking them in
        // lockstep never runs out.
        let mut next_tag = 0;
        for (item_index, item) in self.items.iter().enumerate() {
            match item {
                Item::Box(block) => {
                    if let Some(tag) = self.tags.get(next_tag) {
                        self.place_block(&mut state, block, *tag);
                    }
                    next_tag += 1;
                }
                Item::Text(text) => {
                    let count = text.placeholder_count();
                    let inline_tags = self
                        .tags
                        .get(next_tag..next_tag + count)
                        .unwrap_or_default();
                    next_tag += count;
                    self.place_paragraph(&mut state, engine, item_index, text, inline_tags);
                }
            }
        }

        self.finish(state)
    }

    /// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
    ///
    /// STEP 1: Apply clearance.
    /// STEP 2: Measure under the fraction cap.
    /// STEP 3: Float against an edge, or place at the cursor and advance it.
    fn place_block(&self, state: &mut PassState, block: &BlockBox, tag: PlacementTag) {
        // STEP 1
        let top = state.registry.clearance(
            tag.clear,
            sanitize_spacing(tag.clear_min_spacing),
            state.cursor,
        );

        // STEP 2
        let cap = self.column_width * sanitize_fraction(tag.max_width_fraction);
        let stretch = self.config.cross_axis_alignment == CrossAxisAlignment::Stretch;
        let constraints = if stretch && !tag.float.is_floating() {
            Constraints::tight_width(cap)
        } else {
            Constraints::max_width_only(cap)
        };
        let measured = self.measurer.measure(block.id, constraints);
        let size = Size::new(measured.width.min(cap), measured.height);

        // STEP 3
        let rect = match state.registry.place(tag.float, size, top) {
            Some(rect) => rect,
            None => {
                let x = self
                    .config
                    .cross_axis_alignment
                    .offset(self.direction, size.width, self.column_width);
                state.cursor = top + size.height;
                Rect::new(x, top, size.width, size.height)
            }
        };
        tracing::trace!(
            item = tag.item_index,
            id = %block.id,
            float = %tag.float,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "placed box"
        );

        state.boxes.push(BoxPlacement {
            tag,
            id: block.id,
            rect,
            scale: 1.0,
        });
    }

    /// STEP 1: Apply the paragraph's own clearance.
    /// STEP 2: Measure inline boxes, scaled by the text scale.
    /// STEP 3: Shape against the registry, inside margin and padding.
    /// STEP 4: Place inline boxes at their slots and advance the cursor.
    fn place_paragraph(
        &self,
        state: &mut PassState,
        engine: &mut WrapEngine,
        item_index: usize,
        text: &WrappableText,
        inline_tags: &[PlacementTag],
    ) {
        // STEP 1
        let top = state.registry.clearance(
            text.clear,
            sanitize_spacing(text.clear_min_spacing),
            state.cursor,
        );

        let margin = text.margin;
        let padding = text.padding;
        let inner_width =
            (self.column_width - margin.horizontal() - padding.horizontal()).max(0.0);
        let origin = Point::new(
            margin.left + padding.left,
            top + margin.top + padding.top,
        );

        // STEP 2
        let paragraph = engine.state_for(text, text.direction.unwrap_or(self.direction));
        let scale = paragraph.text_scale();
        let ids = paragraph.inline_boxes().to_vec();
        let sizes: Vec<Size> = ids
            .iter()
            .zip(inline_tags)
            .map(|(id, tag)| {
                let cap = inner_width * sanitize_fraction(tag.max_width_fraction) / scale;
                self.measurer
                    .measure_inline(*id, Constraints::max_width_only(cap), scale)
                    .scale(scale)
            })
            .collect();
        paragraph.set_placeholder_sizes(&sizes);

        // STEP 3
        let band = state.registry.band(origin, inner_width);
        let shaped = paragraph.layout(inner_width, &band, self.shaper);

        // STEP 4
        for ((id, tag), slot) in ids.iter().zip(inline_tags).zip(&shaped.placeholders) {
            state.boxes.push(BoxPlacement {
                tag: *tag,
                id: *id,
                rect: Rect::new(
                    origin.x + slot.offset.x,
                    origin.y + slot.offset.y,
                    slot.size.width,
                    slot.size.height,
                ),
                scale: slot.scale,
            });
        }

        let height = margin.vertical() + padding.vertical() + shaped.height;
        tracing::trace!(
            item = item_index,
            key = %text.key,
            y = top,
            height,
            lines = shaped.lines.len(),
            "placed paragraph"
        );
        state.paragraphs.push(ParagraphPlacement {
            item_index,
            key: text.key.clone(),
            rect: Rect::new(
                margin.left,
                top + margin.top,
                (self.column_width - margin.horizontal()).max(0.0),
                padding.vertical() + shaped.height,
            ),
            text_origin: origin,
            lines: shaped.lines.clone(),
        });
        state.cursor = top + height;
    }

    /// [§ 10.6.7 'Auto' heights for block formatting context roots](https://www.w3.org/TR/CSS2/visudet.html#root-height)
    ///
    /// "In addition, if the element has any floating descendants whose
    /// bottom margin edge is below the element's bottom content edge, then
    /// the height is increased to include those edges."
    fn finish(&self, mut state: PassState) -> ColumnLayout {
        let content_height = state.cursor.max(state.registry.max_bottom());

        // Paragraphs claim the full width; boxes alone shrink the column
        // to what they occupy unless stretched.
        let has_text = !state.paragraphs.is_empty();
        let stretch = self.config.cross_axis_alignment == CrossAxisAlignment::Stretch;
        let width = if has_text || stretch {
            self.column_width
        } else {
            self.occupied_width(&state.boxes).clamp(
                self.constraints.min_width,
                self.column_width.max(self.constraints.min_width),
            )
        };
        if width < self.column_width {
            self.shrink_boxes(&mut state.boxes, width);
        }

        let size = self
            .constraints
            .constrain(Size::new(width, content_height));
        let overflow = (content_height > size.height).then(|| content_height - size.height);
        if let Some(overflow) = overflow {
            tracing::warn!(
                overflow,
                content_height,
                max_height = self.constraints.max_height,
                "column content overflows its height"
            );
        }

        let floats = state
            .boxes
            .iter()
            .filter(|placement| placement.tag.float.is_floating())
            .map(|placement| ActiveFloat {
                side: placement.tag.float,
                rect: placement.rect,
            })
            .collect();

        tracing::debug!(
            width = size.width,
            height = size.height,
            content_height,
            "column layout done"
        );
        ColumnLayout {
            size,
            content_height,
            overflow,
            boxes: state.boxes,
            paragraphs: state.paragraphs,
            floats,
        }
    }

    /// Distance a placed box reaches in from the edge it is pinned to.
    /// Non-floating boxes only need their own width.
    fn edge_extent(&self, placement: &BoxPlacement) -> f32 {
        match placement.tag.float.resolve(self.direction) {
            Some(PhysicalSide::Left) => placement.rect.right(),
            Some(PhysicalSide::Right) => self.column_width - placement.rect.x,
            None => placement.rect.width,
        }
    }

    /// The narrowest width that holds every box where it was placed.
    ///
    /// A float needs its own extent plus the widest float on the opposite
    /// edge that shares any of its rows.
    fn occupied_width(&self, boxes: &[BoxPlacement]) -> f32 {
        boxes
            .iter()
            .map(|placement| {
                let Some(side) = placement.tag.float.resolve(self.direction) else {
                    return placement.rect.width;
                };
                let opposite = boxes
                    .iter()
                    .filter(|other| {
                        other.tag.float.resolve(self.direction) == Some(side.opposite())
                            && other.rect.y < placement.rect.bottom()
                            && placement.rect.y < other.rect.bottom()
                    })
                    .map(|other| self.edge_extent(other))
                    .fold(0.0, f32::max);
                self.edge_extent(placement) + opposite
            })
            .fold(0.0, f32::max)
    }

    /// Re-align boxes for a column narrower than the one they were placed
    /// in, keeping each inside `[0, width]`.
    fn shrink_boxes(&self, boxes: &mut [BoxPlacement], width: f32) {
        let delta = self.column_width - width;
        for placement in boxes {
            let x = match placement.tag.float.resolve(self.direction) {
                Some(PhysicalSide::Right) => placement.rect.x - delta,
                Some(PhysicalSide::Left) => placement.rect.x,
                None => self.config.cross_axis_alignment.offset(
                    self.direction,
                    placement.rect.width,
                    width,
                ),
            };
            placement.rect.x = x.min(width - placement.rect.width).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::inline::{ApproximateFontMetrics, LineBreaker};
    use crate::layout::measure::IntrinsicSizes;
    use crate::layout::tag::FloatSide;

    fn sizes() -> IntrinsicSizes {
        IntrinsicSizes::new()
            .with(BoxId(1), Size::new(100.0, 50.0))
            .with(BoxId(2), Size::new(60.0, 20.0))
    }

    #[test]
    fn test_boxes_stack_and_shrink_column() {
        let items: Vec<Item> = vec![
            BlockBox::new(BoxId(1)).into(),
            BlockBox::new(BoxId(2)).into(),
        ];
        let mut column = FloatColumn::new(ColumnConfig::default());
        let layout = column
            .layout(
                &items,
                Constraints::loose(300.0, f32::INFINITY),
                &sizes(),
                &LineBreaker::new(ApproximateFontMetrics),
            )
            .unwrap();
        assert_eq!(layout.size, Size::new(100.0, 70.0));
        assert_eq!(layout.boxes[1].rect, Rect::new(0.0, 50.0, 60.0, 20.0));
    }

    #[test]
    fn test_float_does_not_advance_cursor() {
        let items: Vec<Item> = vec![
            BlockBox::new(BoxId(1)).floated(FloatSide::Right).into(),
            BlockBox::new(BoxId(2)).into(),
        ];
        let mut column = FloatColumn::new(ColumnConfig::default());
        let layout = column
            .layout(
                &items,
                Constraints::tight_width(300.0),
                &sizes(),
                &LineBreaker::new(ApproximateFontMetrics),
            )
            .unwrap();
        assert_eq!(layout.boxes[0].rect, Rect::new(200.0, 0.0, 100.0, 50.0));
        assert_eq!(layout.boxes[1].rect.y, 0.0);
        assert_eq!(layout.content_height, 50.0);
        assert_eq!(layout.floats.len(), 1);
    }

    #[test]
    fn test_unbounded_width_uses_intrinsic_width() {
        let items: Vec<Item> = vec![
            BlockBox::new(BoxId(2)).into(),
            WrappableText::plain("abcdefghij")
                .style(crate::style::TextStyle::sized(10.0))
                .into(),
        ];
        let mut column = FloatColumn::new(ColumnConfig::default());
        let layout = column
            .layout(
                &items,
                Constraints::UNBOUNDED,
                &sizes(),
                &LineBreaker::new(ApproximateFontMetrics),
            )
            .unwrap();
        assert!((layout.size.width - 60.0).abs() < 1e-3);
        assert_eq!(layout.paragraphs[0].lines.len(), 1);
    }
}
