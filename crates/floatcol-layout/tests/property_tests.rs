//! Property tests for key resolution, the float registry, and stacking.

use std::collections::HashSet;

use floatcol_layout::layout::{
    ApproximateFontMetrics, Constraints, FloatRegistry, FloatSide, IntrinsicSizes, LineBreaker,
    Size, paragraph_keys, resolve_keys,
};
use floatcol_layout::style::TextDirection;
use floatcol_layout::{BlockBox, BoxId, ColumnConfig, FloatColumn, Item, WrappableText};
use quickcheck_macros::quickcheck;

fn paragraphs(keys: &[Option<i8>]) -> Vec<Item> {
    keys.iter()
        .map(|key| -> Item {
            let text = WrappableText::plain("p");
            match key {
                Some(value) => text.key(i64::from(*value)).into(),
                None => text.into(),
            }
        })
        .collect()
}

#[quickcheck]
fn prop_resolved_keys_are_unique(keys: Vec<Option<i8>>) -> bool {
    let items = paragraphs(&keys);
    let resolved = paragraph_keys(&items);
    let unique: HashSet<_> = resolved.iter().collect();
    unique.len() == items.len()
}

#[quickcheck]
fn prop_resolution_is_idempotent(keys: Vec<Option<i8>>) -> bool {
    let items = paragraphs(&keys);
    let once = resolve_keys(&items).into_owned();
    let twice = resolve_keys(&once).into_owned();
    once == twice
}

#[quickcheck]
fn prop_no_exclusion_outside_float_spans(heights: Vec<u8>, position: u16) -> bool {
    let mut registry = FloatRegistry::new(300.0, TextDirection::Ltr);
    for (index, height) in heights.iter().enumerate() {
        let side = if index % 2 == 0 {
            FloatSide::Left
        } else {
            FloatSide::Right
        };
        let _rect = registry.place(side, Size::new(10.0, f32::from(*height) + 1.0), 10.0);
    }
    let above = registry.width_at(f32::from(position % 10));
    let below = registry.width_at(registry.max_bottom() + f32::from(position));
    above == (0.0, 0.0) && below == (0.0, 0.0)
}

#[quickcheck]
fn prop_stacked_heights_sum(heights: Vec<u8>) -> bool {
    let mut sizes = IntrinsicSizes::new();
    let mut items: Vec<Item> = Vec::new();
    let mut total = 0.0;
    let mut widest: f32 = 0.0;
    for (index, height) in heights.iter().enumerate() {
        let Ok(id) = u32::try_from(index) else {
            return true;
        };
        let size = Size::new(f32::from(*height % 100) + 1.0, f32::from(*height));
        let _previous = sizes.insert(BoxId(id), size);
        items.push(BlockBox::new(BoxId(id)).into());
        total += size.height;
        widest = widest.max(size.width);
    }

    let mut column = FloatColumn::new(ColumnConfig::default());
    let Ok(layout) = column.layout(
        &items,
        Constraints::loose(300.0, f32::INFINITY),
        &sizes,
        &LineBreaker::new(ApproximateFontMetrics),
    ) else {
        return false;
    };
    (layout.content_height - total).abs() < 1e-2 && (layout.size.width - widest).abs() < 1e-3
}

#[quickcheck]
fn prop_fraction_caps_float_width(natural: u16, percent: u8) -> bool {
    let fraction = f32::from(percent % 100 + 1) / 100.0;
    let sizes = IntrinsicSizes::new().with(BoxId(1), Size::new(f32::from(natural), 10.0));
    let items: Vec<Item> = vec![
        BlockBox::new(BoxId(1))
            .floated(FloatSide::Left)
            .max_width_fraction(fraction)
            .into(),
    ];
    let mut column = FloatColumn::new(ColumnConfig::default());
    let Ok(layout) = column.layout(
        &items,
        Constraints::tight_width(300.0),
        &sizes,
        &LineBreaker::new(ApproximateFontMetrics),
    ) else {
        return false;
    };
    layout.boxes[0].rect.width <= 300.0 * fraction + 1e-3
}
