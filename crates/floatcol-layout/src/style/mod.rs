//! Style values consumed by the layout: direction, alignment, and text style.

pub mod direction;
pub mod text;

pub use direction::{CrossAxisAlignment, PhysicalSide, TextDirection};
pub use text::{DEFAULT_FONT_SIZE_PX, TextAlign, TextStyle};
