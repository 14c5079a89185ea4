//! The paragraph wrap engine and its cache.
//!
//! Paragraph state survives across layout passes, keyed by the resolved
//! [`ParagraphKey`]. A pass prunes entries whose key disappeared, then asks
//! for each paragraph's state in document order. An existing entry is
//! updated in place; its flattened runs are rebuilt only when the span
//! tree or the styles feeding it changed.
//!
//! Shaping itself is never skipped: the width function depends on the
//! floats placed earlier in the same pass, so every [`ParagraphState::layout`]
//! reshapes.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use serde::Serialize;

use super::geometry::Size;
use super::inline::{IntrinsicWidths, ShapeInput, ShapeRun, ShapedParagraph, TextShaper, WidthAt};
use crate::item::{BoxId, InlineSpan, ParagraphKey, WrappableText};
use crate::style::{TextAlign, TextDirection, TextStyle};

/// Counters describing how the cache was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Entries created for a key seen for the first time.
    pub created: usize,
    /// Entries whose content or style changed and were re-flattened.
    pub updated: usize,
    /// Entries reused without re-flattening.
    pub reused: usize,
    /// Entries dropped because their key left the sequence.
    pub evicted: usize,
}

/// Cached state for one paragraph.
#[derive(Debug, Clone)]
pub struct ParagraphState {
    key: ParagraphKey,
    text: InlineSpan,
    style: TextStyle,
    text_scale: f32,
    align: TextAlign,
    direction: TextDirection,
    indent: f32,
    runs: Vec<ShapeRun>,
    inline_boxes: Vec<BoxId>,
    placeholders: Vec<Size>,
    shaped: Option<ShapedParagraph>,
    shape_count: usize,
}

impl ParagraphState {
    pub(crate) fn new(text: &WrappableText, direction: TextDirection) -> Self {
        let mut state = Self {
            key: text.key.clone(),
            text: text.text.clone(),
            style: text.style,
            text_scale: text.effective_text_scale(),
            align: text.align,
            direction,
            indent: text.indent,
            runs: Vec::new(),
            inline_boxes: Vec::new(),
            placeholders: Vec::new(),
            shaped: None,
            shape_count: 0,
        };
        state.reflatten();
        state
    }

    /// Take the new snapshot from `text`. Returns whether the runs had to
    /// be rebuilt.
    fn update(&mut self, text: &WrappableText, direction: TextDirection) -> bool {
        self.align = text.align;
        self.direction = direction;
        self.indent = text.indent;

        let text_scale = text.effective_text_scale();
        let changed = self.text != text.text
            || self.style != text.style
            || (self.text_scale - text_scale).abs() > f32::EPSILON;
        if changed {
            self.text = text.text.clone();
            self.style = text.style;
            self.text_scale = text_scale;
            self.reflatten();
        }
        changed
    }

    fn reflatten(&mut self) {
        self.runs.clear();
        self.inline_boxes.clear();
        flatten(&self.text, &self.style, &mut self.runs, &mut self.inline_boxes);
        self.placeholders = vec![Size::ZERO; self.inline_boxes.len()];
    }

    /// The paragraph's key.
    #[must_use]
    pub fn key(&self) -> &ParagraphKey {
        &self.key
    }

    /// Runs with fully inherited styles, in logical order.
    #[must_use]
    pub fn runs(&self) -> &[ShapeRun] {
        &self.runs
    }

    /// Inline boxes in placeholder order.
    #[must_use]
    pub fn inline_boxes(&self) -> &[BoxId] {
        &self.inline_boxes
    }

    /// The effective text scale.
    #[must_use]
    pub fn text_scale(&self) -> f32 {
        self.text_scale
    }

    /// The direction lines are laid out in.
    #[must_use]
    pub fn direction(&self) -> TextDirection {
        self.direction
    }

    /// Supply the scaled placeholder sizes, one per inline box.
    ///
    /// Missing entries stay at their previous size; extra entries are ignored.
    pub fn set_placeholder_sizes(&mut self, sizes: &[Size]) {
        for (slot, size) in self.placeholders.iter_mut().zip(sizes) {
            *slot = *size;
        }
    }

    /// The placeholder sizes used for the next shaping.
    #[must_use]
    pub fn placeholder_sizes(&self) -> &[Size] {
        &self.placeholders
    }

    /// The last shaping result.
    #[must_use]
    pub fn shaped(&self) -> Option<&ShapedParagraph> {
        self.shaped.as_ref()
    }

    /// How many times this paragraph has been shaped.
    #[must_use]
    pub fn shape_count(&self) -> usize {
        self.shape_count
    }

    fn input(&self, max_width: f32) -> ShapeInput<'_> {
        ShapeInput {
            runs: &self.runs,
            placeholders: &self.placeholders,
            style: self.style,
            align: self.align,
            direction: self.direction,
            text_scale: self.text_scale,
            indent: self.indent,
            max_width,
        }
    }

    /// Shape the paragraph against `width_at`, with no line wider than
    /// `max_width`.
    pub fn layout(
        &mut self,
        max_width: f32,
        width_at: &dyn WidthAt,
        shaper: &dyn TextShaper,
    ) -> &ShapedParagraph {
        let shaped = shaper.shape(&self.input(max_width), width_at);
        self.shape_count += 1;
        tracing::trace!(
            key = %self.key,
            lines = shaped.lines.len(),
            height = shaped.height,
            "shaped paragraph"
        );
        self.shaped.insert(shaped)
    }

    /// Minimum and maximum content widths, excluding margin and padding.
    #[must_use]
    pub fn intrinsic_widths(&self, shaper: &dyn TextShaper) -> IntrinsicWidths {
        shaper.intrinsic_widths(&self.input(f32::INFINITY))
    }
}

/// Flatten a span tree into styled runs, numbering inline boxes as they
/// are encountered.
fn flatten(
    span: &InlineSpan,
    inherited: &TextStyle,
    runs: &mut Vec<ShapeRun>,
    boxes: &mut Vec<BoxId>,
) {
    match span {
        InlineSpan::Text { text, style } => {
            let style = inherited.merge(style);
            if let Some(ShapeRun::Text {
                text: previous,
                style: previous_style,
            }) = runs.last_mut()
            {
                if *previous_style == style {
                    previous.push_str(text);
                    return;
                }
            }
            runs.push(ShapeRun::Text {
                text: text.clone(),
                style,
            });
        }
        InlineSpan::Span { style, children } => {
            let style = inherited.merge(style);
            for child in children {
                flatten(child, &style, runs, boxes);
            }
        }
        InlineSpan::Box(inline) => {
            runs.push(ShapeRun::Placeholder {
                index: boxes.len(),
            });
            boxes.push(inline.id);
        }
    }
}

/// Owns the paragraph cache.
#[derive(Debug, Clone, Default)]
pub struct WrapEngine {
    cache: HashMap<ParagraphKey, ParagraphState>,
    stats: CacheStats,
}

impl WrapEngine {
    /// An empty engine.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every entry whose key is not in `keys`.
    pub fn prune(&mut self, keys: &HashSet<ParagraphKey>) {
        let before = self.cache.len();
        self.cache.retain(|key, _| keys.contains(key));
        let evicted = before - self.cache.len();
        if evicted > 0 {
            tracing::debug!(evicted, "pruned paragraph cache");
        }
        self.stats.evicted += evicted;
    }

    /// The state for `text`, created on first sight and updated in place
    /// afterwards. `text.key` must already be resolved.
    pub fn state_for(
        &mut self,
        text: &WrappableText,
        direction: TextDirection,
    ) -> &mut ParagraphState {
        match self.cache.entry(text.key.clone()) {
            Entry::Occupied(entry) => {
                let state = entry.into_mut();
                if state.update(text, direction) {
                    self.stats.updated += 1;
                } else {
                    self.stats.reused += 1;
                }
                state
            }
            Entry::Vacant(entry) => {
                self.stats.created += 1;
                entry.insert(ParagraphState::new(text, direction))
            }
        }
    }

    /// The cached state for `key`.
    #[must_use]
    pub fn get(&self, key: &ParagraphKey) -> Option<&ParagraphState> {
        self.cache.get(key)
    }

    /// Whether `key` has a cache entry.
    #[must_use]
    pub fn contains(&self, key: &ParagraphKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Number of cached paragraphs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Cumulative cache counters.
    #[must_use]
    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    /// Drop every entry and reset the counters.
    pub fn clear(&mut self) {
        self.cache.clear();
        self.stats = CacheStats::default();
    }
}
