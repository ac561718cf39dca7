//! Typed CSS value parsing (C2): lengths, colors, and the `content:`
//! micro-language.

mod color;
mod content;
mod length;

pub use color::{parse_color, Color};
pub use content::{parse_content, ContentToken, ContentValue};
pub use length::{parse_length, GenericValue, Length, LengthAcceptFlags, LengthUnit};
