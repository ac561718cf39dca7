//! Typed length values (spec §3 "Length value", ported from crengine's
//! `css_length_t`/`css_value_type_t`/`css_generic_value_t`).

use crate::tokenizer::{CSSToken, TokenCursor};

/// The unit of a [`Length`]. Order matches `css_value_type_t` in the source
/// so that a port can eyeball the two side by side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    /// The value is not set on this node; resolve to the parent's value.
    Inherited,
    /// The value carries a [`GenericValue`] sentinel rather than a number.
    Unspecified,
    /// CSS pixel (1px = 1/96in before DPI scaling).
    Px,
    /// Inch (96px).
    In,
    /// Centimeter (96/2.54 px).
    Cm,
    /// Millimeter (96/25.4 px).
    Mm,
    /// Point (96/72 px).
    Pt,
    /// Pica (12pt).
    Pc,
    /// Relative to the element's own font size.
    Em,
    /// Relative to the element's font x-height (approximated as 0.5em).
    Ex,
    /// Relative to the element's font "0" advance width (approximated as 0.5em).
    Ch,
    /// Relative to the root element's font size.
    Rem,
    /// 1% of the viewport width.
    Vw,
    /// 1% of the viewport height.
    Vh,
    /// 1% of the smaller viewport dimension.
    VMin,
    /// 1% of the larger viewport dimension.
    VMax,
    /// Percentage of a caller-supplied base.
    Percent,
    /// Already-scaled screen pixels (no further DPI scaling applied).
    ScreenPx,
    /// The value is a packed [`super::Color`], not a dimension.
    Color,
}

/// Sentinel codes a [`Length`] with [`LengthUnit::Unspecified`] can carry,
/// ported from `css_generic_value_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenericValue {
    /// `auto`
    Auto,
    /// `normal`
    Normal,
    /// `currentcolor`
    CurrentColor,
    /// `contain`
    Contain,
    /// `cover`
    Cover,
    /// `none`
    None,
    /// An engine-specific marker value (`-cr-special`).
    CrSpecial,
}

impl GenericValue {
    const fn code(self) -> i32 {
        match self {
            GenericValue::Auto => -1,
            GenericValue::Normal => -2,
            GenericValue::CurrentColor => -4,
            GenericValue::Contain => -5,
            GenericValue::Cover => -6,
            GenericValue::None => -7,
            GenericValue::CrSpecial => -8,
        }
    }

    const fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(GenericValue::Auto),
            -2 => Some(GenericValue::Normal),
            -4 => Some(GenericValue::CurrentColor),
            -5 => Some(GenericValue::Contain),
            -6 => Some(GenericValue::Cover),
            -7 => Some(GenericValue::None),
            -8 => Some(GenericValue::CrSpecial),
            _ => None,
        }
    }
}

/// A tagged `(unit, fixed-point value)` pair (spec §3 "Length value").
///
/// `value` is scaled by 256 for every unit except [`LengthUnit::ScreenPx`]
/// and [`LengthUnit::Color`] (which store a raw pixel count and a packed
/// ARGB word respectively) and [`LengthUnit::Unspecified`] (which stores a
/// [`GenericValue`] code, unscaled).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Length {
    /// The unit this value is expressed in.
    pub unit: LengthUnit,
    /// The fixed-point (×256) magnitude, or a sentinel/color/pixel count
    /// depending on `unit`.
    pub value: i32,
}

impl Length {
    /// The scale factor fractional units are stored at.
    pub const FIXED_SCALE: i32 = 256;

    /// A length whose value has not been specified at all; the cascade
    /// leaves the inherited or initial value in place.
    #[must_use]
    pub const fn inherited() -> Self {
        Self {
            unit: LengthUnit::Inherited,
            value: 0,
        }
    }

    /// A length carrying one of the [`GenericValue`] sentinels.
    #[must_use]
    pub const fn generic(value: GenericValue) -> Self {
        Self {
            unit: LengthUnit::Unspecified,
            value: value.code(),
        }
    }

    /// A length in CSS pixels.
    #[must_use]
    pub const fn px(value: f32) -> Self {
        Self {
            unit: LengthUnit::Px,
            #[allow(clippy::cast_possible_truncation)]
            value: (value * Self::FIXED_SCALE as f32) as i32,
        }
    }

    /// A length as a percentage (`50.0` means `50%`).
    #[must_use]
    pub const fn percent(value: f32) -> Self {
        Self {
            unit: LengthUnit::Percent,
            #[allow(clippy::cast_possible_truncation)]
            value: (value * Self::FIXED_SCALE as f32) as i32,
        }
    }

    /// An `em` length relative to the owning node's font size.
    #[must_use]
    pub const fn em(value: f32) -> Self {
        Self {
            unit: LengthUnit::Em,
            #[allow(clippy::cast_possible_truncation)]
            value: (value * Self::FIXED_SCALE as f32) as i32,
        }
    }

    /// If this is an [`LengthUnit::Unspecified`] length, decode its sentinel.
    #[must_use]
    pub const fn as_generic(self) -> Option<GenericValue> {
        if matches!(self.unit, LengthUnit::Unspecified) {
            GenericValue::from_code(self.value)
        } else {
            None
        }
    }

    /// The magnitude as a floating-point number of `unit`s (undoing the
    /// ×256 fixed-point scale). Meaningless for [`LengthUnit::Unspecified`].
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn as_f32(self) -> f32 {
        self.value as f32 / Self::FIXED_SCALE as f32
    }
}

/// Which keywords/forms [`parse_length`] should accept, bundled so call
/// sites read as a named set of switches rather than eight positional bools.
#[derive(Debug, Clone, Copy, Default)]
pub struct LengthAcceptFlags {
    /// Accept a `%` suffix.
    pub percent: bool,
    /// Accept a leading `-` sign.
    pub negative: bool,
    /// Accept the `auto` keyword.
    pub auto: bool,
    /// Accept the `none` keyword.
    pub none: bool,
    /// Accept the `normal` keyword.
    pub normal: bool,
    /// Accept a bare number with no unit (tagged [`LengthUnit::Unspecified`]
    /// with the raw value, e.g. `line-height: 1.2`).
    pub unspecified_number: bool,
    /// Accept `contain`/`cover` (for `background-size`).
    pub contain_cover: bool,
    /// Whether this is `font-size`, unlocking the absolute/relative keyword
    /// table below.
    pub is_font_size: bool,
}

/// `xx-small`..`xx-large` map to these fractions of the inherited font size
/// (spec §4.2); `smaller`/`larger` are handled by the caller as ±20%/+25%.
const FONT_SIZE_KEYWORDS: &[(&str, f32)] = &[
    ("xx-small", 3.0 / 5.0),
    ("x-small", 3.0 / 4.0),
    ("small", 8.0 / 9.0),
    ("medium", 1.0),
    ("large", 6.0 / 5.0),
    ("x-large", 3.0 / 2.0),
    ("xx-large", 2.0),
];

fn unit_from_str(s: &str) -> Option<LengthUnit> {
    Some(match s {
        "px" => LengthUnit::Px,
        "in" => LengthUnit::In,
        "cm" => LengthUnit::Cm,
        "mm" => LengthUnit::Mm,
        "pt" => LengthUnit::Pt,
        "pc" => LengthUnit::Pc,
        "em" => LengthUnit::Em,
        "ex" => LengthUnit::Ex,
        "ch" => LengthUnit::Ch,
        "rem" => LengthUnit::Rem,
        "vw" => LengthUnit::Vw,
        "vh" => LengthUnit::Vh,
        "vmin" => LengthUnit::VMin,
        "vmax" => LengthUnit::VMax,
        _ => return None,
    })
}

/// Parse a single length value from `cursor` per the accept flags in
/// `flags` (spec §4.2 `parse_length`). Returns `None` if the next token
/// cannot be interpreted as a length under the given flags; the cursor is
/// left where it stopped understanding, for the caller's error recovery to
/// take over (spec §4.1 `next_property`).
#[must_use]
pub fn parse_length(cursor: &mut TokenCursor, flags: LengthAcceptFlags) -> Option<Length> {
    if let CSSToken::Ident(name) = cursor.peek() {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "auto" if flags.auto => {
                let _ = cursor.advance();
                return Some(Length::generic(GenericValue::Auto));
            }
            "none" if flags.none => {
                let _ = cursor.advance();
                return Some(Length::generic(GenericValue::None));
            }
            "normal" if flags.normal => {
                let _ = cursor.advance();
                return Some(Length::generic(GenericValue::Normal));
            }
            "currentcolor" => {
                let _ = cursor.advance();
                return Some(Length::generic(GenericValue::CurrentColor));
            }
            "contain" if flags.contain_cover => {
                let _ = cursor.advance();
                return Some(Length::generic(GenericValue::Contain));
            }
            "cover" if flags.contain_cover => {
                let _ = cursor.advance();
                return Some(Length::generic(GenericValue::Cover));
            }
            "inherit" => {
                let _ = cursor.advance();
                return Some(Length::inherited());
            }
            _ if flags.is_font_size => {
                if let Some(&(_, fraction)) =
                    FONT_SIZE_KEYWORDS.iter().find(|(kw, _)| *kw == name)
                {
                    let _ = cursor.advance();
                    return Some(Length::em(fraction));
                }
                if name == "smaller" {
                    let _ = cursor.advance();
                    return Some(Length::percent(80.0));
                }
                if name == "larger" {
                    let _ = cursor.advance();
                    return Some(Length::percent(125.0));
                }
                None
            }
            _ => None,
        }
    } else {
        parse_numeric_length(cursor, flags)
    }
}

fn parse_numeric_length(cursor: &mut TokenCursor, flags: LengthAcceptFlags) -> Option<Length> {
    match cursor.peek().clone() {
        CSSToken::Dimension { value, unit, .. } => {
            if value < 0.0 && !flags.negative {
                return None;
            }
            let unit = unit_from_str(&unit.to_ascii_lowercase())?;
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            let scaled = (value * f64::from(Length::FIXED_SCALE)).round() as i32;
            Some(Length { unit, value: scaled })
        }
        CSSToken::Percentage { value, .. } => {
            if value < 0.0 && !flags.negative {
                return None;
            }
            if !flags.percent {
                return None;
            }
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            let scaled = (value * f64::from(Length::FIXED_SCALE)).round() as i32;
            Some(Length {
                unit: LengthUnit::Percent,
                value: scaled,
            })
        }
        CSSToken::Number { value, .. } => {
            if value < 0.0 && !flags.negative {
                return None;
            }
            if value == 0.0 {
                let _ = cursor.advance();
                return Some(Length::px(0.0));
            }
            if !flags.unspecified_number {
                return None;
            }
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            let scaled = (value * f64::from(Length::FIXED_SCALE)).round() as i32;
            Some(Length {
                unit: LengthUnit::Unspecified,
                value: scaled,
            })
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_for(src: &str) -> TokenCursor {
        TokenCursor::new(crate::tokenizer::CSSTokenizer::new(src).tokenize_all())
    }

    #[test]
    fn parses_plain_px() {
        let mut cursor = cursor_for("12px");
        let length = parse_length(&mut cursor, LengthAcceptFlags::default()).unwrap();
        assert_eq!(length.unit, LengthUnit::Px);
        assert!((length.as_f32() - 12.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rejects_negative_without_flag() {
        let mut cursor = cursor_for("-4px");
        assert!(parse_length(&mut cursor, LengthAcceptFlags::default()).is_none());
    }

    #[test]
    fn accepts_auto_when_flagged() {
        let mut cursor = cursor_for("auto");
        let flags = LengthAcceptFlags {
            auto: true,
            ..Default::default()
        };
        let length = parse_length(&mut cursor, flags).unwrap();
        assert_eq!(length.as_generic(), Some(GenericValue::Auto));
    }

    #[test]
    fn font_size_keyword_maps_to_fraction() {
        let mut cursor = cursor_for("x-large");
        let flags = LengthAcceptFlags {
            is_font_size: true,
            ..Default::default()
        };
        let length = parse_length(&mut cursor, flags).unwrap();
        assert_eq!(length.unit, LengthUnit::Em);
        assert!((length.as_f32() - 1.5).abs() < 0.001);
    }

    #[test]
    fn zero_is_accepted_without_negative_flag() {
        let mut cursor = cursor_for("0");
        let length = parse_length(&mut cursor, LengthAcceptFlags::default()).unwrap();
        assert_eq!(length.unit, LengthUnit::Px);
        assert_eq!(length.value, 0);
    }
}
