//! Text direction and cross-axis alignment.
//!
//! [CSS Writing Modes Level 4 § 2.1 Specifying Directionality](https://www.w3.org/TR/css-writing-modes-4/#direction)
//!
//! A column has one resolved inline direction. Direction-relative values
//! (`start`, `end`) are mapped to a physical side through it every time
//! they are queried.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

/// [§ 2.1](https://www.w3.org/TR/css-writing-modes-4/#direction)
///
/// "This property specifies the inline base direction or directionality of
/// any bidi paragraph, embedding, isolate, or override established by the
/// box."
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum TextDirection {
    /// Left-to-right: inline-start is the left edge.
    #[default]
    #[serde(alias = "left-to-right")]
    #[strum(to_string = "ltr", serialize = "left-to-right")]
    Ltr,
    /// Right-to-left: inline-start is the right edge.
    #[serde(alias = "right-to-left")]
    #[strum(to_string = "rtl", serialize = "right-to-left")]
    Rtl,
}

/// Physical horizontal side of the column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum PhysicalSide {
    /// Left edge of the column.
    Left,
    /// Right edge of the column.
    Right,
}

impl PhysicalSide {
    /// The other edge.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

impl TextDirection {
    /// Map inline-start to the corresponding physical side.
    ///
    /// | Direction | inline-start |
    /// |-----------|--------------|
    /// | ltr       | left         |
    /// | rtl       | right        |
    #[must_use]
    pub const fn start_side(self) -> PhysicalSide {
        match self {
            Self::Ltr => PhysicalSide::Left,
            Self::Rtl => PhysicalSide::Right,
        }
    }

    /// Map inline-end to the corresponding physical side.
    #[must_use]
    pub const fn end_side(self) -> PhysicalSide {
        match self {
            Self::Ltr => PhysicalSide::Right,
            Self::Rtl => PhysicalSide::Left,
        }
    }
}

/// How non-floating boxes are positioned horizontally inside the column.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CrossAxisAlignment {
    /// Against the inline-start edge.
    #[default]
    Start,
    /// Against the inline-end edge.
    End,
    /// Centered in the column.
    Center,
    /// Forced to the full column width.
    Stretch,
    /// Accepted for compatibility; positioned like [`CrossAxisAlignment::Start`].
    Baseline,
}

impl CrossAxisAlignment {
    /// Whether resolving this alignment needs a text direction.
    #[must_use]
    pub const fn is_direction_relative(self) -> bool {
        matches!(self, Self::Start | Self::End | Self::Baseline)
    }

    /// Horizontal offset of a child of `child_width` inside a column of
    /// `column_width`.
    #[must_use]
    pub fn offset(self, direction: TextDirection, child_width: f32, column_width: f32) -> f32 {
        let free = (column_width - child_width).max(0.0);
        match self {
            Self::Start | Self::Baseline => match direction.start_side() {
                PhysicalSide::Left => 0.0,
                PhysicalSide::Right => free,
            },
            Self::End => match direction.end_side() {
                PhysicalSide::Left => 0.0,
                PhysicalSide::Right => free,
            },
            Self::Center => free / 2.0,
            Self::Stretch => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_and_end_sides() {
        assert_eq!(TextDirection::Ltr.start_side(), PhysicalSide::Left);
        assert_eq!(TextDirection::Ltr.end_side(), PhysicalSide::Right);
        assert_eq!(TextDirection::Rtl.start_side(), PhysicalSide::Right);
        assert_eq!(TextDirection::Rtl.end_side(), PhysicalSide::Left);
        assert_eq!(PhysicalSide::Left.opposite(), PhysicalSide::Right);
    }

    #[test]
    fn test_cross_axis_offsets() {
        let ltr = TextDirection::Ltr;
        let rtl = TextDirection::Rtl;
        assert_eq!(CrossAxisAlignment::Start.offset(ltr, 100.0, 300.0), 0.0);
        assert_eq!(CrossAxisAlignment::Start.offset(rtl, 100.0, 300.0), 200.0);
        assert_eq!(CrossAxisAlignment::End.offset(ltr, 100.0, 300.0), 200.0);
        assert_eq!(CrossAxisAlignment::Center.offset(rtl, 100.0, 300.0), 100.0);
        assert_eq!(CrossAxisAlignment::Baseline.offset(ltr, 100.0, 300.0), 0.0);
    }

    #[test]
    fn test_parse_direction() {
        assert_eq!("rtl".parse::<TextDirection>(), Ok(TextDirection::Rtl));
        assert_eq!("Left-To-Right".parse::<TextDirection>(), Ok(TextDirection::Ltr));
        assert!("sideways".parse::<TextDirection>().is_err());
    }
}
