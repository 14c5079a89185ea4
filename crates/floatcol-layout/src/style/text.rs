//! Text styles and paragraph alignment.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use super::direction::{PhysicalSide, TextDirection};

/// Font size used when no span in the tree specifies one.
pub const DEFAULT_FONT_SIZE_PX: f32 = 16.0;

/// Inheritable style of a text span.
///
/// Unset fields inherit from the enclosing span, and ultimately from the
/// paragraph's default style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    /// Font size in pixels before text scaling.
    pub font_size: Option<f32>,
    /// Line height as a multiple of the font size. `None` uses the font's
    /// own metrics.
    pub line_height: Option<f32>,
}

impl TextStyle {
    /// A style with only the font size set.
    #[must_use]
    pub const fn sized(font_size: f32) -> Self {
        Self {
            font_size: Some(font_size),
            line_height: None,
        }
    }

    /// Set the line height multiplier.
    #[must_use]
    pub const fn with_line_height(mut self, line_height: f32) -> Self {
        self.line_height = Some(line_height);
        self
    }

    /// Apply `child` on top of `self`: fields set on the child win.
    #[must_use]
    pub fn merge(&self, child: &Self) -> Self {
        Self {
            font_size: child.font_size.or(self.font_size),
            line_height: child.line_height.or(self.line_height),
        }
    }

    /// The font size to shape with, falling back to [`DEFAULT_FONT_SIZE_PX`].
    #[must_use]
    pub fn resolved_font_size(&self) -> f32 {
        self.font_size
            .filter(|size| size.is_finite() && *size > 0.0)
            .unwrap_or(DEFAULT_FONT_SIZE_PX)
    }

    /// The line height multiplier, if one is set and usable. Non-finite and
    /// non-positive multipliers fall back to the font's own metrics.
    #[must_use]
    pub fn resolved_line_height(&self) -> Option<f32> {
        self.line_height
            .filter(|multiplier| multiplier.is_finite() && *multiplier > 0.0)
    }
}

/// [§ 16.2 Alignment: the 'text-align' property](https://www.w3.org/TR/CSS2/text.html#alignment-prop)
///
/// "This property describes how inline-level content of a block container
/// is aligned."
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextAlign {
    /// Against the left edge of each line's available span.
    Left,
    /// Against the right edge of each line's available span.
    Right,
    /// Centered in each line's available span.
    Center,
    /// Against the inline-start edge.
    #[default]
    Start,
    /// Against the inline-end edge.
    End,
    /// Accepted for compatibility; the default shaper treats it as `Start`.
    Justify,
}

impl TextAlign {
    /// Whether resolving this alignment needs a text direction.
    #[must_use]
    pub const fn is_direction_relative(self) -> bool {
        matches!(self, Self::Start | Self::End | Self::Justify)
    }

    /// The physical side lines are pushed against, or `None` for centered
    /// text.
    #[must_use]
    pub const fn physical(self, direction: TextDirection) -> Option<PhysicalSide> {
        match self {
            Self::Left => Some(PhysicalSide::Left),
            Self::Right => Some(PhysicalSide::Right),
            Self::Center => None,
            Self::Start | Self::Justify => Some(direction.start_side()),
            Self::End => Some(direction.end_side()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_prefers_child() {
        let parent = TextStyle::sized(20.0).with_line_height(1.5);
        let child = TextStyle::sized(10.0);
        let merged = parent.merge(&child);
        assert_eq!(merged.font_size, Some(10.0));
        assert_eq!(merged.line_height, Some(1.5));
    }

    #[test]
    fn test_resolved_font_size_falls_back() {
        assert_eq!(TextStyle::default().resolved_font_size(), DEFAULT_FONT_SIZE_PX);
        assert_eq!(TextStyle::sized(-3.0).resolved_font_size(), DEFAULT_FONT_SIZE_PX);
    }

    #[test]
    fn test_resolved_line_height_rejects_unusable_multipliers() {
        assert_eq!(TextStyle::sized(10.0).with_line_height(1.5).resolved_line_height(), Some(1.5));
        assert_eq!(TextStyle::sized(10.0).with_line_height(-2.0).resolved_line_height(), None);
        assert_eq!(TextStyle::sized(10.0).with_line_height(0.0).resolved_line_height(), None);
        assert_eq!(TextStyle::sized(10.0).with_line_height(f32::NAN).resolved_line_height(), None);
        assert_eq!(TextStyle::default().resolved_line_height(), None);
    }

    #[test]
    fn test_align_physical() {
        assert_eq!(
            TextAlign::Start.physical(TextDirection::Rtl),
            Some(PhysicalSide::Right)
        );
        assert_eq!(
            TextAlign::End.physical(TextDirection::Rtl),
            Some(PhysicalSide::Left)
        );
        assert_eq!(TextAlign::Center.physical(TextDirection::Ltr), None);
    }
}
