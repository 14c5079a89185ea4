//! Text shaping: line boxes whose width depends on their vertical position.
//!
//! [§ 9.4.2 Inline formatting contexts](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
//!
//! "In an inline formatting context, boxes are laid out horizontally, one
//! after the other, beginning at the top of a containing block."
//!
//! "The width of a line box is determined by a containing block and the
//! presence of floats."
//!
//! The shaper never sees the float registry directly. It receives a
//! [`WidthAt`] that answers, for a candidate line band, which horizontal
//! span is available. Placeholders for inline boxes are atomic and sit on
//! the baseline.

use serde::Serialize;

use super::float::LineSpace;
use super::geometry::{Point, Rect, Size};
use crate::style::{PhysicalSide, TextAlign, TextDirection, TextStyle};

/// Tolerance for width comparisons, so accumulated advances that land a
/// hair over the available width still fit.
const FIT_EPSILON: f32 = 1e-3;

/// Share of the line height above the baseline.
///
/// Without real font tables, the baseline sits at 80% of the line height
/// (a typical ascender / em-square ratio).
const ASCENT_RATIO: f32 = 0.8;

/// Font metrics interface for text measurement during layout.
///
/// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
///
/// "CSS assumes that every font has font metrics that specify a
/// characteristic height above the baseline and a depth below it."
pub trait FontMetrics {
    /// Measure the total advance width of a text string at the given font size.
    fn text_width(&self, text: &str, font_size: f32) -> f32;

    /// Calculate the line height for a given font size.
    fn line_height(&self, font_size: f32) -> f32;
}

/// Approximate font metrics using fixed ratios.
///
/// The average advance width of Latin glyphs in a proportional font is
/// approximately 0.6× the font size. Line height uses 1.2×, the upper end
/// of the recommended range for `line-height: normal`.
///
/// Used when no font is available, and in tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateFontMetrics;

impl FontMetrics for ApproximateFontMetrics {
    #[allow(clippy::cast_precision_loss)]
    fn text_width(&self, text: &str, font_size: f32) -> f32 {
        const CHAR_WIDTH_RATIO: f32 = 0.6;
        text.chars().count() as f32 * font_size * CHAR_WIDTH_RATIO
    }

    fn line_height(&self, font_size: f32) -> f32 {
        const LINE_HEIGHT_RATIO: f32 = 1.2;
        font_size * LINE_HEIGHT_RATIO
    }
}

/// The available horizontal span as a function of vertical position.
///
/// Coordinates are relative to the paragraph's text origin.
pub trait WidthAt {
    /// The space available to a line box occupying `[top, top + height)`.
    fn line_space(&self, top: f32, height: f32) -> LineSpace;

    /// The nearest position strictly below `top` where the available space
    /// may change, if any. Lets the shaper move an empty line past a band
    /// too narrow for its first unbreakable piece.
    fn next_boundary(&self, _top: f32) -> Option<f32> {
        None
    }
}

impl<F> WidthAt for F
where
    F: Fn(f32, f32) -> LineSpace,
{
    fn line_space(&self, top: f32, height: f32) -> LineSpace {
        self(top, height)
    }
}

/// One flattened piece of a paragraph: a styled text run or a placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ShapeRun {
    /// Text with its fully inherited style.
    Text {
        /// The text content.
        text: String,
        /// Resolved style (paragraph default merged down the span tree).
        style: TextStyle,
    },
    /// The `index`-th inline box of the paragraph.
    Placeholder {
        /// Sequential placeholder index.
        index: usize,
    },
}

/// Everything the shaper needs for one paragraph.
#[derive(Debug, Clone, Copy)]
pub struct ShapeInput<'a> {
    /// Flattened runs in logical order.
    pub runs: &'a [ShapeRun],
    /// Placeholder sizes by index, already scaled by `text_scale`.
    pub placeholders: &'a [Size],
    /// Paragraph default style; sets the minimum line height.
    pub style: TextStyle,
    /// Line alignment.
    pub align: TextAlign,
    /// Resolved paragraph direction.
    pub direction: TextDirection,
    /// Multiplier applied to every font size.
    pub text_scale: f32,
    /// First-line inset from the inline-start edge.
    pub indent: f32,
    /// Upper bound on any line's width.
    pub max_width: f32,
}

/// The content of a line fragment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum FragmentContent {
    /// A run of text.
    Text {
        /// The text content.
        text: String,
        /// Font size in pixels after scaling.
        font_size: f32,
    },
    /// An inline box's reserved slot.
    Placeholder {
        /// Sequential placeholder index.
        index: usize,
    },
}

/// A fragment of content placed on a line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineFragment {
    /// Position and size relative to the paragraph's text origin.
    pub bounds: Rect,
    /// What the fragment shows.
    pub content: FragmentContent,
}

/// [§ 9.4.2](https://www.w3.org/TR/CSS2/visuren.html#inline-formatting)
///
/// "The rectangular area that contains the boxes that form a line is called
/// a line box."
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShapedLine {
    /// Top of the line box.
    pub top: f32,
    /// Height of the line box.
    pub height: f32,
    /// Baseline position relative to `top`.
    pub baseline: f32,
    /// The span this line was allowed to use.
    pub space: LineSpace,
    /// Advance width of the line's content, trailing spaces trimmed.
    pub content_width: f32,
    /// Fragments in visual order.
    pub fragments: Vec<LineFragment>,
}

/// Where an inline box ended up.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct PlaceholderSlot {
    /// Top-left corner relative to the paragraph's text origin.
    pub offset: Point,
    /// Reserved size (scaled).
    pub size: Size,
    /// Scale the host applies when painting the box.
    pub scale: f32,
}

/// Result of shaping one paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ShapedParagraph {
    /// Line boxes top to bottom.
    pub lines: Vec<ShapedLine>,
    /// Widest line's content width.
    pub width: f32,
    /// Bottom of the last line box.
    pub height: f32,
    /// One slot per placeholder, by index.
    pub placeholders: Vec<PlaceholderSlot>,
}

/// Minimum and maximum content widths.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct IntrinsicWidths {
    /// Width of the widest unbreakable piece.
    pub min: f32,
    /// Width with no soft wrapping at all.
    pub max: f32,
}

impl IntrinsicWidths {
    /// Component-wise maximum.
    #[must_use]
    pub fn union(self, other: Self) -> Self {
        Self {
            min: self.min.max(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Add a fixed amount to both widths.
    #[must_use]
    pub fn inflate(self, amount: f32) -> Self {
        Self {
            min: self.min + amount,
            max: self.max + amount,
        }
    }
}

/// The text shaping service.
pub trait TextShaper {
    /// Break `input` into lines, asking `width_at` for each line's span.
    fn shape(&self, input: &ShapeInput<'_>, width_at: &dyn WidthAt) -> ShapedParagraph;

    /// Minimum and maximum content widths of `input`.
    fn intrinsic_widths(&self, input: &ShapeInput<'_>) -> IntrinsicWidths;
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct LineMetrics {
    ascent: f32,
    descent: f32,
}

impl LineMetrics {
    fn for_line_height(line_height: f32) -> Self {
        let line_height = if line_height.is_finite() {
            line_height.max(0.0)
        } else {
            0.0
        };
        let ascent = line_height * ASCENT_RATIO;
        Self {
            ascent,
            descent: line_height - ascent,
        }
    }

    fn height(self) -> f32 {
        self.ascent + self.descent
    }

    fn max(self, other: Self) -> Self {
        Self {
            ascent: self.ascent.max(other.ascent),
            descent: self.descent.max(other.descent),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Atom<'a> {
    Word {
        text: &'a str,
        font_size: f32,
        metrics: LineMetrics,
    },
    Space {
        text: &'a str,
        font_size: f32,
    },
    Newline {
        metrics: LineMetrics,
    },
    Placeholder {
        index: usize,
        size: Size,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Class {
    Word,
    Space,
    Newline,
}

fn classify(ch: char) -> Class {
    match ch {
        '\n' => Class::Newline,
        ' ' | '\t' => Class::Space,
        _ => Class::Word,
    }
}

/// [§ 5.5.2 Word Breaking Rules](https://www.w3.org/TR/css-text-3/#word-breaking)
///
/// "A soft wrap opportunity exists at the boundary of whitespace."
///
/// Split text into maximal words and space runs; every `\n` is its own
/// segment and forces a break.
fn segments(text: &str) -> Vec<(Class, &str)> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut current: Option<Class> = None;
    for (index, ch) in text.char_indices() {
        let class = classify(ch);
        if current != Some(class) || class == Class::Newline {
            if let Some(previous) = current {
                out.push((previous, &text[start..index]));
            }
            start = index;
            current = Some(class);
        }
    }
    if let Some(previous) = current {
        out.push((previous, &text[start..]));
    }
    out
}

/// Greedy line breaker over [`FontMetrics`]: the default [`TextShaper`].
#[derive(Debug, Clone, Default)]
pub struct LineBreaker<M> {
    metrics: M,
}

impl<M: FontMetrics> LineBreaker<M> {
    /// Create a line breaker measuring with `metrics`.
    pub const fn new(metrics: M) -> Self {
        Self { metrics }
    }

    /// The metrics used for measurement.
    pub const fn metrics(&self) -> &M {
        &self.metrics
    }

    fn font_size(style: &TextStyle, text_scale: f32) -> f32 {
        style.resolved_font_size() * text_scale
    }

    fn line_metrics(&self, style: &TextStyle, font_size: f32) -> LineMetrics {
        let line_height = style.resolved_line_height().map_or_else(
            || self.metrics.line_height(font_size),
            |multiplier| font_size * multiplier,
        );
        LineMetrics::for_line_height(line_height)
    }

    fn atoms<'a>(&self, input: &ShapeInput<'a>) -> Vec<Atom<'a>> {
        let mut atoms = Vec::new();
        for run in input.runs {
            match run {
                ShapeRun::Text { text, style } => {
                    let font_size = Self::font_size(style, input.text_scale);
                    let metrics = self.line_metrics(style, font_size);
                    for (class, piece) in segments(text) {
                        atoms.push(match class {
                            Class::Word => Atom::Word {
                                text: piece,
                                font_size,
                                metrics,
                            },
                            Class::Space => Atom::Space {
                                text: piece,
                                font_size,
                            },
                            Class::Newline => Atom::Newline { metrics },
                        });
                    }
                }
                ShapeRun::Placeholder { index } => atoms.push(Atom::Placeholder {
                    index: *index,
                    size: input.placeholders.get(*index).copied().unwrap_or_default(),
                }),
            }
        }
        atoms
    }

    /// [§ 5.5 Line Breaking and Word Boundaries](https://www.w3.org/TR/css-text-3/#line-breaking)
    ///
    /// [§ 3.3 overflow-wrap](https://www.w3.org/TR/css-text-3/#overflow-wrap-property)
    /// "If the word is too long to fit on a line by itself, break at
    /// an arbitrary point."
    ///
    /// Byte length of the longest prefix of `text` fitting `max_width`;
    /// always at least one character.
    fn split_to_fit(&self, text: &str, font_size: f32, max_width: f32) -> usize {
        let mut best = 0;
        for (index, ch) in text.char_indices() {
            let end = index + ch.len_utf8();
            if self.metrics.text_width(&text[..end], font_size) <= max_width + FIT_EPSILON {
                best = end;
            } else {
                break;
            }
        }
        if best == 0 {
            text.chars().next().map_or(text.len(), char::len_utf8)
        } else {
            best
        }
    }
}

impl<M: FontMetrics> TextShaper for LineBreaker<M> {
    fn shape(&self, input: &ShapeInput<'_>, width_at: &dyn WidthAt) -> ShapedParagraph {
        let strut_size = Self::font_size(&input.style, input.text_scale);
        let strut = self.line_metrics(&input.style, strut_size);
        let mut builder = LineBuilder::new(self, input, width_at, strut);
        for atom in self.atoms(input) {
            match atom {
                Atom::Word {
                    text,
                    font_size,
                    metrics,
                } => builder.push_word(text, font_size, metrics),
                Atom::Space { text, font_size } => builder.push_space(text, font_size),
                Atom::Newline { metrics } => {
                    builder.grow(metrics);
                    builder.finish_line(true);
                }
                Atom::Placeholder { index, size } => builder.push_placeholder(index, size),
            }
        }
        builder.finish()
    }

    fn intrinsic_widths(&self, input: &ShapeInput<'_>) -> IntrinsicWidths {
        let mut widths = IntrinsicWidths::default();
        let mut line = input.indent.max(0.0);
        let mut first_piece = true;
        for atom in self.atoms(input) {
            let piece = match atom {
                Atom::Word {
                    text, font_size, ..
                } => self.metrics.text_width(text, font_size),
                Atom::Placeholder { size, .. } => size.width,
                Atom::Space { text, font_size } => {
                    line += self.metrics.text_width(text, font_size);
                    continue;
                }
                Atom::Newline { .. } => {
                    widths.max = widths.max.max(line);
                    line = 0.0;
                    continue;
                }
            };
            let indent = if first_piece { input.indent.max(0.0) } else { 0.0 };
            first_piece = false;
            widths.min = widths.min.max(piece + indent);
            line += piece;
        }
        widths.max = widths.max.max(line).max(widths.min);
        widths
    }
}

#[derive(Debug, Clone)]
struct PendingFragment {
    x: f32,
    width: f32,
    metrics: LineMetrics,
    content: FragmentContent,
}

/// Builds line boxes one at a time.
///
/// Fragment positions are accumulated relative to the start of the line
/// and resolved against the line's [`LineSpace`], direction, and alignment
/// in [`LineBuilder::finish_line`].
struct LineBuilder<'a, M> {
    breaker: &'a LineBreaker<M>,
    width_at: &'a dyn WidthAt,
    align: TextAlign,
    direction: TextDirection,
    text_scale: f32,
    indent: f32,
    max_width: f32,
    strut: LineMetrics,
    lines: Vec<ShapedLine>,
    placeholders: Vec<PlaceholderSlot>,
    top: f32,
    space: LineSpace,
    metrics: LineMetrics,
    fragments: Vec<PendingFragment>,
    current_x: f32,
    pending_space: f32,
    pending_space_text: String,
}

impl<'a, M: FontMetrics> LineBuilder<'a, M> {
    fn new(
        breaker: &'a LineBreaker<M>,
        input: &ShapeInput<'_>,
        width_at: &'a dyn WidthAt,
        strut: LineMetrics,
    ) -> Self {
        let mut builder = Self {
            breaker,
            width_at,
            align: input.align,
            direction: input.direction,
            text_scale: input.text_scale,
            indent: input.indent.max(0.0),
            max_width: input.max_width,
            strut,
            lines: Vec::new(),
            placeholders: vec![PlaceholderSlot::default(); input.placeholders.len()],
            top: 0.0,
            space: LineSpace::new(0.0, 0.0, 0.0),
            metrics: strut,
            fragments: Vec::new(),
            current_x: 0.0,
            pending_space: 0.0,
            pending_space_text: String::new(),
        };
        builder.start_line(0.0);
        builder
    }

    /// The span for the current line if it were `height` tall.
    fn query(&self, height: f32) -> LineSpace {
        let mut space = self.width_at.line_space(self.top, height);
        space.width = space.width.min(self.max_width).max(0.0);
        if self.lines.is_empty() && self.indent > 0.0 {
            let indent = self.indent.min(space.width);
            if self.direction.start_side() == PhysicalSide::Left {
                space.left_edge += indent;
            }
            space.width -= indent;
        }
        space
    }

    fn start_line(&mut self, top: f32) {
        self.top = top;
        self.metrics = self.strut;
        self.fragments.clear();
        self.current_x = 0.0;
        self.pending_space = 0.0;
        self.pending_space_text.clear();
        self.space = self.query(self.strut.height());
    }

    /// Raise the current line's ascent/descent, re-querying its span.
    fn grow(&mut self, metrics: LineMetrics) {
        let grown = self.metrics.max(metrics);
        if grown != self.metrics {
            self.metrics = grown;
            self.space = self.query(grown.height());
        }
    }

    /// Move an empty line down to the next place the span may widen.
    /// Returns `false` when there is no such place.
    fn skip_down(&mut self) -> bool {
        match self.width_at.next_boundary(self.top) {
            Some(next) if next > self.top => {
                self.start_line(next);
                true
            }
            _ => false,
        }
    }

    /// Whether content of `width` and `metrics` fits on the current line;
    /// returns the span the line would have after growing.
    fn try_fit(&self, width: f32, metrics: LineMetrics) -> Option<LineSpace> {
        let grown = self.metrics.max(metrics);
        let space = if grown == self.metrics {
            self.space
        } else {
            self.query(grown.height())
        };
        let needed = if self.fragments.is_empty() {
            width
        } else {
            self.current_x + self.pending_space + width
        };
        (needed <= space.width + FIT_EPSILON).then_some(space)
    }

    fn push_word(&mut self, text: &str, font_size: f32, metrics: LineMetrics) {
        let width = self.breaker.metrics.text_width(text, font_size);
        loop {
            if let Some(space) = self.try_fit(width, metrics) {
                self.space = space;
                self.place_text(text, font_size, width, metrics);
                return;
            }
            if !self.fragments.is_empty() {
                self.finish_line(false);
                continue;
            }
            if self.skip_down() {
                continue;
            }
            break;
        }

        // The word is wider than any line can be: break it at an arbitrary
        // character boundary and carry the rest down line by line. A
        // remainder that does not fit whole still skips past narrow bands.
        let mut rest = text;
        loop {
            self.grow(metrics);
            let split = self
                .breaker
                .split_to_fit(rest, font_size, self.space.width);
            if split < rest.len() && self.skip_down() {
                continue;
            }
            let (head, tail) = rest.split_at(split);
            let head_width = self.breaker.metrics.text_width(head, font_size);
            self.place_text(head, font_size, head_width, metrics);
            if tail.is_empty() {
                return;
            }
            rest = tail;
            self.finish_line(false);
        }
    }

    /// [§ 4.1.3](https://www.w3.org/TR/css-text-3/#white-space-phase-2)
    ///
    /// "A sequence of collapsible spaces at the beginning of a line is removed."
    ///
    /// Spaces are held as pending advance until the next piece lands on the
    /// same line; trailing spaces are dropped when the line finishes.
    fn push_space(&mut self, text: &str, font_size: f32) {
        if self.fragments.is_empty() {
            return;
        }
        self.pending_space += self.breaker.metrics.text_width(text, font_size);
        self.pending_space_text.push_str(text);
    }

    fn push_placeholder(&mut self, index: usize, size: Size) {
        let metrics = LineMetrics {
            ascent: size.height,
            descent: 0.0,
        };
        loop {
            if let Some(space) = self.try_fit(size.width, metrics) {
                self.space = space;
                break;
            }
            if !self.fragments.is_empty() {
                self.finish_line(false);
                continue;
            }
            if !self.skip_down() {
                self.grow(metrics);
                break;
            }
        }
        self.metrics = self.metrics.max(metrics);
        let x = self.advance(size.width);
        self.fragments.push(PendingFragment {
            x,
            width: size.width,
            metrics,
            content: FragmentContent::Placeholder { index },
        });
    }

    /// Consume pending spaces and `width`; returns the piece's start.
    fn advance(&mut self, width: f32) -> f32 {
        let x = if self.fragments.is_empty() {
            0.0
        } else {
            self.current_x + self.pending_space
        };
        self.current_x = x + width;
        self.pending_space = 0.0;
        self.pending_space_text.clear();
        x
    }

    fn place_text(&mut self, text: &str, font_size: f32, width: f32, metrics: LineMetrics) {
        self.metrics = self.metrics.max(metrics);
        let spaces = std::mem::take(&mut self.pending_space_text);
        let end = self.current_x;
        if let Some(last) = self.fragments.last_mut() {
            if let FragmentContent::Text {
                text: previous,
                font_size: previous_size,
            } = &mut last.content
            {
                if (*previous_size - font_size).abs() < f32::EPSILON
                    && last.metrics == metrics
                    && (last.x + last.width - end).abs() < FIT_EPSILON
                {
                    previous.push_str(&spaces);
                    previous.push_str(text);
                    last.width += self.pending_space + width;
                    self.current_x = end + self.pending_space + width;
                    self.pending_space = 0.0;
                    return;
                }
            }
        }
        let x = self.advance(width);
        self.fragments.push(PendingFragment {
            x,
            width,
            metrics,
            content: FragmentContent::Text {
                text: text.to_string(),
                font_size,
            },
        });
    }

    /// [§ 10.8 Line height calculations](https://www.w3.org/TR/CSS2/visudet.html#line-height)
    ///
    /// Finalize the current line box and start a new one below it.
    ///
    /// "The height of the line box is the distance between the uppermost box
    /// top and the lowermost box bottom."
    ///
    /// Empty lines are only emitted when `force` is set (hard breaks).
    fn finish_line(&mut self, force: bool) {
        if self.fragments.is_empty() && !force {
            return;
        }

        let metrics = self.metrics;
        let height = metrics.height();
        let content_width = self.current_x;
        let space = self.space;
        let free = (space.width - content_width).max(0.0);

        // [§ 16.2 Alignment](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
        let align_offset = match self.align.physical(self.direction) {
            Some(PhysicalSide::Left) => 0.0,
            Some(PhysicalSide::Right) => free,
            None => free / 2.0,
        };

        let mut fragments = Vec::with_capacity(self.fragments.len());
        for pending in self.fragments.drain(..) {
            let local_x = match self.direction {
                TextDirection::Ltr => pending.x,
                TextDirection::Rtl => content_width - pending.x - pending.width,
            };
            let x = space.left_edge + align_offset + local_x;
            let y = self.top + metrics.ascent - pending.metrics.ascent;
            let bounds = Rect::new(x, y, pending.width, pending.metrics.height());
            if let FragmentContent::Placeholder { index } = pending.content {
                if let Some(slot) = self.placeholders.get_mut(index) {
                    *slot = PlaceholderSlot {
                        offset: bounds.origin(),
                        size: bounds.size(),
                        scale: self.text_scale,
                    };
                }
            }
            fragments.push(LineFragment {
                bounds,
                content: pending.content,
            });
        }
        if self.direction == TextDirection::Rtl {
            fragments.reverse();
        }

        self.lines.push(ShapedLine {
            top: self.top,
            height,
            baseline: metrics.ascent,
            space,
            content_width,
            fragments,
        });
        self.start_line(self.top + height);
    }

    fn finish(mut self) -> ShapedParagraph {
        self.finish_line(false);
        if self.lines.is_empty() {
            // An empty paragraph still occupies one strut line.
            self.finish_line(true);
        }
        let height = self
            .lines
            .last()
            .map_or(0.0, |line| line.top + line.height);
        let width = self
            .lines
            .iter()
            .map(|line| line.content_width)
            .fold(0.0, f32::max);
        ShapedParagraph {
            lines: self.lines,
            width,
            height,
            placeholders: self.placeholders,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input<'a>(runs: &'a [ShapeRun], placeholders: &'a [Size]) -> ShapeInput<'a> {
        ShapeInput {
            runs,
            placeholders,
            style: TextStyle::sized(10.0),
            align: TextAlign::Left,
            direction: TextDirection::Ltr,
            text_scale: 1.0,
            indent: 0.0,
            max_width: f32::INFINITY,
        }
    }

    fn text_run(text: &str) -> ShapeRun {
        ShapeRun::Text {
            text: text.to_string(),
            style: TextStyle::sized(10.0),
        }
    }

    fn fixed(width: f32) -> impl Fn(f32, f32) -> LineSpace {
        move |top, _height| LineSpace::full_width(top, width)
    }

    fn line_texts(shaped: &ShapedParagraph) -> Vec<String> {
        shaped
            .lines
            .iter()
            .map(|line| {
                line.fragments
                    .iter()
                    .filter_map(|fragment| match &fragment.content {
                        FragmentContent::Text { text, .. } => Some(text.as_str()),
                        FragmentContent::Placeholder { .. } => None,
                    })
                    .collect::<Vec<_>>()
                    .join("|")
            })
            .collect()
    }

    #[test]
    fn test_segments() {
        let parts: Vec<&str> = segments("ab  c\n\nd").into_iter().map(|(_, s)| s).collect();
        assert_eq!(parts, vec!["ab", "  ", "c", "\n", "\n", "d"]);
    }

    #[test]
    fn test_wraps_at_whitespace() {
        // Each char is 6px wide at font size 10.
        let runs = [text_run("aaa bbb ccc")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let shaped = breaker.shape(&input(&runs, &[]), &fixed(45.0));
        assert_eq!(line_texts(&shaped), vec!["aaa bbb", "ccc"]);
        assert_eq!(shaped.lines[0].content_width, 42.0);
        assert_eq!(shaped.lines[1].top, 12.0);
        assert_eq!(shaped.height, 24.0);
    }

    #[test]
    fn test_hard_breaks_and_blank_lines() {
        let runs = [text_run("a\n\nb")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let shaped = breaker.shape(&input(&runs, &[]), &fixed(100.0));
        assert_eq!(line_texts(&shaped), vec!["a", "", "b"]);
    }

    #[test]
    fn test_overlong_word_breaks_anywhere() {
        let runs = [text_run("abcdefghij")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let shaped = breaker.shape(&input(&runs, &[]), &fixed(25.0));
        assert_eq!(line_texts(&shaped), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_narrow_band_is_skipped() {
        // Nothing fits above y=30; full width below.
        let width_at = |top: f32, _height: f32| {
            if top < 30.0 {
                LineSpace::new(top, 90.0, 10.0)
            } else {
                LineSpace::full_width(top, 100.0)
            }
        };
        struct Band<F>(F);
        impl<F: Fn(f32, f32) -> LineSpace> WidthAt for Band<F> {
            fn line_space(&self, top: f32, height: f32) -> LineSpace {
                (self.0)(top, height)
            }
            fn next_boundary(&self, top: f32) -> Option<f32> {
                (top < 30.0).then_some(30.0)
            }
        }
        let runs = [text_run("hello")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let shaped = breaker.shape(&input(&runs, &[]), &Band(width_at));
        assert_eq!(shaped.lines.len(), 1);
        assert_eq!(shaped.lines[0].top, 30.0);
        assert_eq!(shaped.lines[0].fragments[0].bounds.x, 0.0);
    }

    #[test]
    fn test_placeholder_sits_on_baseline() {
        let runs = [
            text_run("ab "),
            ShapeRun::Placeholder { index: 0 },
            text_run(" cd"),
        ];
        let sizes = [Size::new(20.0, 30.0)];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let shaped = breaker.shape(&input(&runs, &sizes), &fixed(200.0));
        assert_eq!(shaped.lines.len(), 1);
        let line = &shaped.lines[0];
        assert_eq!(line.baseline, 30.0);
        let slot = shaped.placeholders[0];
        assert_eq!(slot.offset, Point::new(18.0, 0.0));
        assert_eq!(slot.size, Size::new(20.0, 30.0));
        assert_eq!(slot.scale, 1.0);
    }

    #[test]
    fn test_alignment_and_rtl() {
        let runs = [text_run("ab cd")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);

        let mut centered = input(&runs, &[]);
        centered.align = TextAlign::Center;
        let shaped = breaker.shape(&centered, &fixed(100.0));
        assert_eq!(shaped.lines[0].fragments[0].bounds.x, 35.0);

        let mut rtl = input(&runs, &[]);
        rtl.align = TextAlign::Start;
        rtl.direction = TextDirection::Rtl;
        let shaped = breaker.shape(&rtl, &fixed(100.0));
        assert_eq!(shaped.lines[0].fragments[0].bounds.x, 70.0);
    }

    #[test]
    fn test_first_line_indent() {
        let runs = [text_run("aaa bbb")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let mut indented = input(&runs, &[]);
        indented.indent = 12.0;
        let shaped = breaker.shape(&indented, &fixed(50.0));
        assert_eq!(line_texts(&shaped), vec!["aaa", "bbb"]);
        assert_eq!(shaped.lines[0].fragments[0].bounds.x, 12.0);
        assert_eq!(shaped.lines[1].fragments[0].bounds.x, 0.0);
    }

    #[test]
    fn test_empty_paragraph_has_one_line() {
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let shaped = breaker.shape(&input(&[], &[]), &fixed(100.0));
        assert_eq!(shaped.lines.len(), 1);
        assert_eq!(shaped.height, 12.0);
    }

    #[test]
    fn test_intrinsic_widths() {
        let runs = [text_run("aa bbbb\nc")];
        let breaker = LineBreaker::new(ApproximateFontMetrics);
        let widths = breaker.intrinsic_widths(&input(&runs, &[]));
        assert_eq!(widths.min, 24.0);
        assert_eq!(widths.max, 42.0);
    }
}
