//! Float Registry.
//!
//! [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
//!
//! "A float is a box that is shifted to the left or right on the current line.
//! The most interesting characteristic of a float is that content may flow along
//! its side (or be prohibited from doing so by the 'clear' property)."
//!
//! The registry is append-only for one layout pass. It is queried by vertical
//! position: a float stops narrowing lines once the query moves past its
//! bottom edge, so nothing is ever removed.

use serde::Serialize;

use super::geometry::{Point, Rect, Size};
use super::inline::WidthAt;
use super::tag::{ClearSide, FloatSide};
use crate::style::{PhysicalSide, TextDirection};

/// A single float that has been placed in the column.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ActiveFloat {
    /// The side as requested; `start`/`end` are resolved on every query.
    pub side: FloatSide,
    /// The float's box in column coordinates. Its vertical span is
    /// `[rect.y, rect.bottom())`.
    pub rect: Rect,
}

impl ActiveFloat {
    /// The physical edge this float is pinned to.
    #[must_use]
    pub fn physical_side(&self, direction: TextDirection) -> PhysicalSide {
        self.side
            .resolve(direction)
            .unwrap_or_else(|| direction.start_side())
    }
}

/// Describes the available space for a line box.
///
/// This represents the horizontal space available for inline content at a
/// specific vertical position, accounting for floats on both sides.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineSpace {
    /// The Y position where this line space applies.
    pub top: f32,
    /// The left edge where content can begin.
    pub left_edge: f32,
    /// The available width for content.
    pub width: f32,
}

impl LineSpace {
    /// Creates a new `LineSpace`.
    #[must_use]
    pub fn new(top: f32, left_edge: f32, width: f32) -> Self {
        Self {
            top,
            left_edge,
            width: width.max(0.0),
        }
    }

    /// Creates a `LineSpace` with full width (no float interference).
    #[must_use]
    pub fn full_width(top: f32, containing_width: f32) -> Self {
        Self::new(top, 0.0, containing_width)
    }

    /// The right edge where content must end.
    #[must_use]
    pub fn right_edge(&self) -> f32 {
        self.left_edge + self.width
    }

    /// Returns true if the given width would fit in this space.
    #[must_use]
    pub fn fits(&self, required_width: f32) -> bool {
        self.width >= required_width
    }
}

/// Tracks placed floats for one column layout pass.
///
/// [§ 9.5 Floats](https://www.w3.org/TR/CSS2/visuren.html#floats)
///
/// "Since a float is not in the flow, non-positioned block boxes created
/// before and after the float box flow vertically as if the float did not
/// exist. However, the current and subsequent line boxes created next to
/// the float are shortened as necessary to make room for the margin box
/// of the float."
#[derive(Debug, Clone)]
pub struct FloatRegistry {
    floats: Vec<ActiveFloat>,
    column_width: f32,
    direction: TextDirection,
}

impl FloatRegistry {
    /// Create an empty registry for a column.
    #[must_use]
    pub const fn new(column_width: f32, direction: TextDirection) -> Self {
        Self {
            floats: Vec::new(),
            column_width,
            direction,
        }
    }

    /// Returns true if no float has been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.floats.is_empty()
    }

    /// All placed floats, in placement order.
    #[must_use]
    pub fn floats(&self) -> &[ActiveFloat] {
        &self.floats
    }

    /// Width of the column.
    #[must_use]
    pub const fn column_width(&self) -> f32 {
        self.column_width
    }

    /// The direction `start`/`end` sides resolve against.
    #[must_use]
    pub const fn direction(&self) -> TextDirection {
        self.direction
    }

    /// Horizontal space excluded on each side at vertical position `y`.
    ///
    /// Returns `(left_inset, right_inset)`; both are `0.0` where no float's
    /// span contains `y`.
    #[must_use]
    pub fn width_at(&self, y: f32) -> (f32, f32) {
        self.insets_at(y, 0.0)
    }

    /// Horizontal space excluded on each side for the band
    /// `[top, top + height)`.
    ///
    /// A float is active for the band if its span vertically overlaps it.
    /// Left floats exclude up to their right edge; right floats exclude from
    /// their left edge to the column's right edge.
    #[must_use]
    pub fn insets_at(&self, top: f32, height: f32) -> (f32, f32) {
        let mut left_inset: f32 = 0.0;
        let mut right_inset: f32 = 0.0;
        for float in &self.floats {
            if !float.rect.overlaps_band(top, height) {
                continue;
            }
            match float.physical_side(self.direction) {
                PhysicalSide::Left => left_inset = left_inset.max(float.rect.right()),
                PhysicalSide::Right => {
                    right_inset = right_inset.max(self.column_width - float.rect.x);
                }
            }
        }
        (left_inset.max(0.0), right_inset.max(0.0))
    }

    /// The space left between the floats for a line box occupying
    /// `[top, top + height)`.
    #[must_use]
    pub fn line_space(&self, top: f32, height: f32) -> LineSpace {
        let (left_inset, right_inset) = self.insets_at(top, height);
        LineSpace::new(top, left_inset, self.column_width - left_inset - right_inset)
    }

    /// [§ 9.5.1 Positioning the float: the 'float' property](https://www.w3.org/TR/CSS2/visuren.html#float-position)
    ///
    /// Place a float of `size` whose top is at or below `top`, and record it.
    /// Returns `None` (recording nothing) when `side` is [`FloatSide::None`].
    ///
    /// "A floated box is shifted to the left or right until its outer edge
    /// touches the containing block edge or the outer edge of another float."
    ///
    /// - The float is placed as high as possible, starting at `top`.
    /// - Left floats sit right of any active left float; right floats sit
    ///   left of any active right float.
    /// - When the remaining width at that height is too small, the float
    ///   moves down to the next float bottom edge. If there is none, it is
    ///   placed at the current height and overflows the column.
    pub fn place(&mut self, side: FloatSide, size: Size, top: f32) -> Option<Rect> {
        let physical = side.resolve(self.direction)?;
        let mut y = top.max(0.0);

        loop {
            let space = self.line_space(y, size.height);
            let next_y = self.next_bottom_after(y);
            if space.fits(size.width) || next_y.is_none() {
                // [§ 9.5.1 Rule 9](https://www.w3.org/TR/CSS2/visuren.html#float-position)
                //
                // "A left-floating box must be put as far to the left as possible,
                // a right-floating box as far to the right as possible."
                let x = match physical {
                    PhysicalSide::Left => space.left_edge,
                    PhysicalSide::Right => (space.right_edge() - size.width).max(0.0),
                };
                let rect = Rect::from_origin_size(Point::new(x, y), size);
                self.floats.push(ActiveFloat { side, rect });
                tracing::trace!(%side, x, y, width = size.width, height = size.height, "placed float");
                return Some(rect);
            }
            if let Some(next) = next_y {
                y = next;
            }
        }
    }

    /// [§ 9.5.2 Controlling flow next to floats: the 'clear' property](https://www.w3.org/TR/CSS2/visuren.html#flow-control)
    ///
    /// Returns the vertical position at or after `cursor` where the cleared
    /// side(s) are free of floats, keeping at least `min_spacing` below the
    /// bottom edge of every cleared float.
    #[must_use]
    pub fn clearance(&self, clear: ClearSide, min_spacing: f32, cursor: f32) -> f32 {
        let spacing = min_spacing.max(0.0);
        self.floats
            .iter()
            .filter(|float| clear.covers(float.physical_side(self.direction), self.direction))
            .map(|float| float.rect.bottom() + spacing)
            .fold(cursor, f32::max)
    }

    /// Find the smallest float bottom edge that is strictly greater than `y`.
    #[must_use]
    pub fn next_bottom_after(&self, y: f32) -> Option<f32> {
        self.floats
            .iter()
            .map(|float| float.rect.bottom())
            .filter(|bottom| *bottom > y)
            .reduce(f32::min)
    }

    /// The lowest bottom edge of all placed floats (`0.0` when empty).
    #[must_use]
    pub fn max_bottom(&self) -> f32 {
        self.floats
            .iter()
            .map(|float| float.rect.bottom())
            .fold(0.0, f32::max)
    }

    /// A width function for text whose origin sits at `origin` in column
    /// coordinates and which may use at most `width` from there.
    #[must_use]
    pub const fn band(&self, origin: Point, width: f32) -> RegistryBand<'_> {
        RegistryBand {
            registry: self,
            origin,
            width,
        }
    }
}

/// A view of the registry in a paragraph's local coordinates.
///
/// Queries and answers are relative to the paragraph's text origin; the
/// available span is the registry's line space intersected with
/// `[origin.x, origin.x + width]`.
#[derive(Debug, Clone, Copy)]
pub struct RegistryBand<'a> {
    registry: &'a FloatRegistry,
    origin: Point,
    width: f32,
}

impl WidthAt for RegistryBand<'_> {
    fn line_space(&self, top: f32, height: f32) -> LineSpace {
        let space = self.registry.line_space(self.origin.y + top, height);
        let left = space.left_edge.max(self.origin.x);
        let right = space.right_edge().min(self.origin.x + self.width);
        LineSpace::new(top, left - self.origin.x, right - left)
    }

    fn next_boundary(&self, top: f32) -> Option<f32> {
        self.registry
            .next_bottom_after(self.origin.y + top)
            .map(|bottom| bottom - self.origin.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ltr(width: f32) -> FloatRegistry {
        FloatRegistry::new(width, TextDirection::Ltr)
    }

    #[test]
    fn test_empty_registry_has_no_insets() {
        let registry = ltr(300.0);
        assert_eq!(registry.width_at(0.0), (0.0, 0.0));
        assert_eq!(registry.line_space(10.0, 20.0).width, 300.0);
        assert_eq!(registry.max_bottom(), 0.0);
    }

    #[test]
    fn test_left_float_insets_only_within_span() {
        let mut registry = ltr(300.0);
        let rect = registry
            .place(FloatSide::Left, Size::new(100.0, 50.0), 10.0)
            .unwrap();
        assert_eq!(rect, Rect::new(0.0, 10.0, 100.0, 50.0));
        assert_eq!(registry.width_at(5.0), (0.0, 0.0));
        assert_eq!(registry.width_at(10.0), (100.0, 0.0));
        assert_eq!(registry.width_at(59.0), (100.0, 0.0));
        assert_eq!(registry.width_at(60.0), (0.0, 0.0));
    }

    #[test]
    fn test_start_and_end_resolve_against_direction() {
        let mut registry = FloatRegistry::new(300.0, TextDirection::Rtl);
        let start = registry
            .place(FloatSide::Start, Size::new(80.0, 40.0), 0.0)
            .unwrap();
        let end = registry
            .place(FloatSide::End, Size::new(60.0, 40.0), 0.0)
            .unwrap();
        assert_eq!(start.x, 220.0);
        assert_eq!(end.x, 0.0);
        assert_eq!(registry.width_at(0.0), (60.0, 80.0));
    }

    #[test]
    fn test_floats_on_same_side_stack_horizontally() {
        let mut registry = ltr(300.0);
        let first = registry
            .place(FloatSide::Left, Size::new(100.0, 50.0), 0.0)
            .unwrap();
        let second = registry
            .place(FloatSide::Left, Size::new(100.0, 30.0), 0.0)
            .unwrap();
        assert_eq!(first.x, 0.0);
        assert_eq!(second.x, 100.0);
        assert_eq!(registry.width_at(10.0), (200.0, 0.0));
        assert_eq!(registry.width_at(40.0), (100.0, 0.0));
    }

    #[test]
    fn test_float_moves_down_when_it_does_not_fit() {
        let mut registry = ltr(300.0);
        let _wide = registry.place(FloatSide::Left, Size::new(250.0, 40.0), 0.0);
        let next = registry
            .place(FloatSide::Right, Size::new(100.0, 20.0), 0.0)
            .unwrap();
        assert_eq!(next, Rect::new(200.0, 40.0, 100.0, 20.0));
    }

    #[test]
    fn test_not_floating_records_nothing() {
        let mut registry = ltr(300.0);
        assert_eq!(registry.place(FloatSide::None, Size::new(10.0, 10.0), 0.0), None);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clearance_with_spacing() {
        let mut registry = ltr(300.0);
        let _left = registry.place(FloatSide::Left, Size::new(100.0, 40.0), 0.0);
        let _right = registry.place(FloatSide::Right, Size::new(100.0, 60.0), 0.0);
        assert_eq!(registry.clearance(ClearSide::Both, 10.0, 0.0), 70.0);
        assert_eq!(registry.clearance(ClearSide::Left, 10.0, 0.0), 50.0);
        assert_eq!(registry.clearance(ClearSide::Right, 0.0, 0.0), 60.0);
        assert_eq!(registry.clearance(ClearSide::None, 10.0, 5.0), 5.0);
        assert_eq!(registry.clearance(ClearSide::Both, 10.0, 100.0), 100.0);
    }

    #[test]
    fn test_band_is_relative_to_origin() {
        let mut registry = ltr(300.0);
        let _float = registry.place(FloatSide::Left, Size::new(100.0, 50.0), 0.0);
        let band = registry.band(Point::new(20.0, 30.0), 260.0);
        let space = band.line_space(0.0, 10.0);
        assert_eq!(space.left_edge, 80.0);
        assert_eq!(space.width, 180.0);
        assert_eq!(band.line_space(20.0, 10.0).width, 260.0);
        assert_eq!(band.next_boundary(0.0), Some(20.0));
        assert_eq!(band.next_boundary(20.0), None);
    }
}
