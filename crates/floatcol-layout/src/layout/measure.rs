//! The box measurement service.
//!
//! Boxes are opaque to the layout core: it only knows their [`BoxId`] and
//! asks a [`BoxMeasurer`] how large they are under given constraints.

use std::collections::HashMap;

use super::geometry::{Constraints, Size};
use super::inline::IntrinsicWidths;
use crate::item::BoxId;

/// Measures boxes on behalf of the layout core.
pub trait BoxMeasurer {
    /// Size of a block box under `constraints`.
    ///
    /// Called with a tight width ("tight width, unbounded height") for
    /// stretched boxes, and a bounded width otherwise.
    fn measure(&self, id: BoxId, constraints: Constraints) -> Size;

    /// Unscaled size of an inline box. The caller multiplies the result by
    /// `text_scale` when reserving the placeholder, and `constraints` are
    /// already divided by it.
    fn measure_inline(&self, id: BoxId, constraints: Constraints, _text_scale: f32) -> Size {
        self.measure(id, constraints)
    }

    /// Minimum and maximum widths of a box, for intrinsic column sizing.
    fn intrinsic_widths(&self, id: BoxId) -> IntrinsicWidths {
        let size = self.measure(id, Constraints::UNBOUNDED);
        IntrinsicWidths {
            min: size.width,
            max: size.width,
        }
    }
}

/// A measurer backed by a table of natural sizes.
///
/// Each box reports its natural size clamped into the constraints. Unknown
/// boxes measure as zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IntrinsicSizes {
    sizes: HashMap<BoxId, Size>,
}

impl IntrinsicSizes {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`IntrinsicSizes::insert`].
    #[must_use]
    pub fn with(mut self, id: BoxId, size: Size) -> Self {
        let _previous = self.sizes.insert(id, size);
        self
    }

    /// Record the natural size of `id`, returning the size it replaces.
    pub fn insert(&mut self, id: BoxId, size: Size) -> Option<Size> {
        self.sizes.insert(id, size)
    }

    /// The natural size of `id`.
    #[must_use]
    pub fn get(&self, id: BoxId) -> Option<Size> {
        self.sizes.get(&id).copied()
    }

    /// Number of known boxes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    /// Whether no box is known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }
}

impl From<HashMap<BoxId, Size>> for IntrinsicSizes {
    fn from(sizes: HashMap<BoxId, Size>) -> Self {
        Self { sizes }
    }
}

impl FromIterator<(BoxId, Size)> for IntrinsicSizes {
    fn from_iter<I: IntoIterator<Item = (BoxId, Size)>>(iter: I) -> Self {
        Self {
            sizes: iter.into_iter().collect(),
        }
    }
}

impl BoxMeasurer for IntrinsicSizes {
    fn measure(&self, id: BoxId, constraints: Constraints) -> Size {
        let natural = self.get(id).unwrap_or_else(|| {
            tracing::warn!(%id, "no size known for box, measuring as zero");
            Size::ZERO
        });
        constraints.constrain(natural)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_clamps_natural_size() {
        let sizes = IntrinsicSizes::new().with(BoxId(1), Size::new(200.0, 40.0));
        assert_eq!(
            sizes.measure(BoxId(1), Constraints::max_width_only(150.0)),
            Size::new(150.0, 40.0)
        );
        assert_eq!(
            sizes.measure(BoxId(1), Constraints::tight_width(300.0)),
            Size::new(300.0, 40.0)
        );
    }

    #[test]
    fn test_unknown_box_is_zero() {
        let sizes = IntrinsicSizes::new();
        assert_eq!(sizes.measure(BoxId(9), Constraints::UNBOUNDED), Size::ZERO);
    }

    #[test]
    fn test_intrinsic_widths_default() {
        let sizes: IntrinsicSizes = [(BoxId(2), Size::new(80.0, 10.0))].into_iter().collect();
        let widths = sizes.intrinsic_widths(BoxId(2));
        assert_eq!(widths.min, 80.0);
        assert_eq!(widths.max, 80.0);
    }
}
