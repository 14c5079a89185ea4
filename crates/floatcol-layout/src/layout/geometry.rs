//! Geometry types shared by every layout stage.
//!
//! All coordinates are in logical pixels. The main axis is vertical (`y`,
//! height) and the cross axis is horizontal (`x`, width).

use serde::{Deserialize, Serialize};

/// A width and a height.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    /// Cross-axis extent.
    pub width: f32,
    /// Main-axis extent.
    pub height: f32,
}

impl Size {
    /// The empty size.
    pub const ZERO: Self = Self {
        width: 0.0,
        height: 0.0,
    };

    /// Create a size.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Multiply both dimensions by `factor`.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        Self {
            width: self.width * factor,
            height: self.height * factor,
        }
    }
}

/// A position in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal position.
    pub x: f32,
    /// Vertical position.
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a point.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle positioned in 2D space.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Horizontal position of the top-left corner.
    pub x: f32,
    /// Vertical position of the top-left corner.
    pub y: f32,
    /// Width of the rectangle.
    pub width: f32,
    /// Height of the rectangle.
    pub height: f32,
}

impl Rect {
    /// Create a rectangle from its corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a rectangle at `origin` with the given `size`.
    #[must_use]
    pub const fn from_origin_size(origin: Point, size: Size) -> Self {
        Self::new(origin.x, origin.y, size.width, size.height)
    }

    /// The top-left corner.
    #[must_use]
    pub const fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// The width and height.
    #[must_use]
    pub const fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The x coordinate of the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// The y coordinate of the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Whether this rectangle's vertical span `[y, bottom)` intersects the
    /// band `[top, top + height)`.
    ///
    /// A zero-height band is treated as the single position `top`.
    #[must_use]
    pub fn overlaps_band(&self, top: f32, height: f32) -> bool {
        if height <= 0.0 {
            return self.y <= top && top < self.bottom();
        }
        self.y < top + height && self.bottom() > top
    }
}

/// Edge sizes for a paragraph's margin or padding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeSizes {
    /// Top edge size.
    pub top: f32,
    /// Right edge size.
    pub right: f32,
    /// Bottom edge size.
    pub bottom: f32,
    /// Left edge size.
    pub left: f32,
}

impl EdgeSizes {
    /// No edges.
    pub const ZERO: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// The same size on all four edges.
    #[must_use]
    pub const fn all(value: f32) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// `vertical` on top and bottom, `horizontal` on left and right.
    #[must_use]
    pub const fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    /// Sum of the left and right edges.
    #[must_use]
    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom edges.
    #[must_use]
    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Constraints passed down to a box or paragraph during layout.
///
/// Maximums may be infinite. Every constructor and transformation keeps
/// `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraints {
    /// Smallest allowed width.
    pub min_width: f32,
    /// Largest allowed width.
    pub max_width: f32,
    /// Smallest allowed height.
    pub min_height: f32,
    /// Largest allowed height.
    pub max_height: f32,
}

impl Constraints {
    /// Unbounded constraints (infinite max, zero min).
    pub const UNBOUNDED: Self = Self {
        min_width: 0.0,
        max_width: f32::INFINITY,
        min_height: 0.0,
        max_height: f32::INFINITY,
    };

    /// Create constraints from all four bounds.
    #[must_use]
    pub fn new(min_width: f32, max_width: f32, min_height: f32, max_height: f32) -> Self {
        let min_width = min_width.max(0.0);
        let min_height = min_height.max(0.0);
        Self {
            min_width,
            max_width: max_width.max(min_width),
            min_height,
            max_height: max_height.max(min_height),
        }
    }

    /// Exact size required.
    #[must_use]
    pub fn tight(width: f32, height: f32) -> Self {
        Self::new(width, width, height, height)
    }

    /// Anything up to the given bounds.
    #[must_use]
    pub fn loose(max_width: f32, max_height: f32) -> Self {
        Self::new(0.0, max_width, 0.0, max_height)
    }

    /// Exact width, unbounded height.
    #[must_use]
    pub fn tight_width(width: f32) -> Self {
        Self::new(width, width, 0.0, f32::INFINITY)
    }

    /// Bounded width, unbounded height.
    #[must_use]
    pub fn max_width_only(max_width: f32) -> Self {
        Self::new(0.0, max_width, 0.0, f32::INFINITY)
    }

    /// Clamp a size to these bounds.
    #[must_use]
    pub fn constrain(&self, size: Size) -> Size {
        debug_assert!(!size.width.is_nan(), "NaN width in layout");
        debug_assert!(!size.height.is_nan(), "NaN height in layout");
        Size {
            width: size.width.clamp(self.min_width, self.max_width),
            height: size.height.clamp(self.min_height, self.max_height),
        }
    }

    /// Whether `max_width` is finite.
    #[must_use]
    pub const fn has_bounded_width(&self) -> bool {
        self.max_width.is_finite()
    }

    /// Whether `max_height` is finite.
    #[must_use]
    pub const fn has_bounded_height(&self) -> bool {
        self.max_height.is_finite()
    }

    /// Lower `max_width` to `cap`, pulling `min_width` down with it.
    #[must_use]
    pub fn cap_width(&self, cap: f32) -> Self {
        let max_width = self.max_width.min(cap.max(0.0));
        Self {
            min_width: self.min_width.min(max_width),
            max_width,
            ..*self
        }
    }

    /// Shrink both axes by the given edges.
    #[must_use]
    pub fn deflate(&self, edges: &EdgeSizes) -> Self {
        Self::new(
            self.min_width - edges.horizontal(),
            self.max_width - edges.horizontal(),
            self.min_height - edges.vertical(),
            self.max_height - edges.vertical(),
        )
    }
}

impl Default for Constraints {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tight_width_is_unbounded_vertically() {
        let c = Constraints::tight_width(120.0);
        assert_eq!(c.min_width, 120.0);
        assert_eq!(c.max_width, 120.0);
        assert!(!c.has_bounded_height());
    }

    #[test]
    fn test_constrain() {
        let c = Constraints::loose(100.0, 50.0);
        assert_eq!(c.constrain(Size::new(50.0, 25.0)), Size::new(50.0, 25.0));
        assert_eq!(c.constrain(Size::new(200.0, 100.0)), Size::new(100.0, 50.0));
    }

    #[test]
    fn test_cap_width_keeps_min_below_max() {
        let c = Constraints::tight_width(300.0).cap_width(150.0);
        assert_eq!(c.max_width, 150.0);
        assert_eq!(c.min_width, 150.0);
    }

    #[test]
    fn test_deflate_never_goes_negative() {
        let c = Constraints::tight(10.0, 10.0).deflate(&EdgeSizes::all(20.0));
        assert_eq!(c.max_width, 0.0);
        assert_eq!(c.max_height, 0.0);
    }

    #[test]
    fn test_overlaps_band() {
        let r = Rect::new(0.0, 10.0, 50.0, 40.0);
        assert!(r.overlaps_band(0.0, 11.0));
        assert!(!r.overlaps_band(0.0, 10.0));
        assert!(r.overlaps_band(49.0, 0.0));
        assert!(!r.overlaps_band(50.0, 0.0));
        assert!(!r.overlaps_band(50.0, 20.0));
    }
}
