//! Shorthand expansion (spec §4.3): `margin`/`padding`/`border[-side]`,
//! `background`, `list-style`, `font-variant`.

use bitflags::bitflags;

use crate::values::{parse_color, parse_length, Color, Length, LengthAcceptFlags};
use crate::tokenizer::{CSSToken, TokenCursor};

use super::{BackgroundRepeat, BorderStyle, ListStylePosition, ListStyleType};

/// Expand 1-4 shorthand values into per-edge `(top, right, bottom, left)`
/// following the standard derivation: 1 value sets all edges, 2 set
/// top/bottom and right/left, 3 set top, right/left, bottom, 4 set every
/// edge independently.
#[must_use]
pub fn expand_trbl<T: Copy>(values: &[T]) -> Option<[T; 4]> {
    match values {
        [a] => Some([*a, *a, *a, *a]),
        [a, b] => Some([*a, *b, *a, *b]),
        [a, b, c] => Some([*a, *b, *c, *b]),
        [a, b, c, d] => Some([*a, *b, *c, *d]),
        _ => None,
    }
}

/// Parse up to four lengths separated by whitespace, for `margin`/`padding`.
#[must_use]
pub fn parse_trbl_lengths(cursor: &mut TokenCursor, flags: LengthAcceptFlags) -> Option<[Length; 4]> {
    let mut values = Vec::with_capacity(4);
    loop {
        cursor.skip_whitespace();
        if values.len() == 4 {
            break;
        }
        let Some(length) = parse_length(cursor, flags) else {
            break;
        };
        values.push(length);
    }
    expand_trbl(&values)
}

/// The three longhands `border[-side]` expands into, defaulting to
/// `medium none currentcolor` for any that were not present in the source
/// (spec §4.3).
#[derive(Debug, Clone, Copy)]
pub struct BorderSideValue {
    /// `border-*-width`.
    pub width: Length,
    /// `border-*-style`.
    pub style: BorderStyle,
    /// `border-*-color`.
    pub color: Option<Color>,
}

impl Default for BorderSideValue {
    fn default() -> Self {
        Self {
            width: Length::em(1.0 / 8.0), // "medium" ~ CSS2.1 default border-width
            style: BorderStyle::None,
            color: None, // None here means "currentcolor", resolved at apply time
        }
    }
}

/// Parse a `border[-side]` triplet, accepting width/style/color in any
/// order (spec §4.3). Unrecognised tokens stop parsing; whichever of the
/// three components never appeared keeps its default.
#[must_use]
pub fn parse_border_side(cursor: &mut TokenCursor) -> BorderSideValue {
    let mut result = BorderSideValue::default();
    let width_flags = LengthAcceptFlags {
        is_font_size: false,
        ..LengthAcceptFlags::default()
    };
    loop {
        cursor.skip_whitespace();
        if let CSSToken::Ident(word) = cursor.peek().clone() {
            if let Some(style) = border_style_keyword(&word.to_ascii_lowercase()) {
                let _ = cursor.advance();
                result.style = style;
                continue;
            }
            if word.eq_ignore_ascii_case("thin") {
                let _ = cursor.advance();
                result.width = Length::px(1.0);
                continue;
            }
            if word.eq_ignore_ascii_case("medium") {
                let _ = cursor.advance();
                result.width = Length::px(3.0);
                continue;
            }
            if word.eq_ignore_ascii_case("thick") {
                let _ = cursor.advance();
                result.width = Length::px(5.0);
                continue;
            }
        }
        if let Some(color) = parse_color(cursor) {
            result.color = Some(color);
            continue;
        }
        if let Some(length) = parse_length(cursor, width_flags) {
            result.width = length;
            continue;
        }
        break;
    }
    result
}

fn border_style_keyword(word: &str) -> Option<BorderStyle> {
    Some(match word {
        "none" => BorderStyle::None,
        "hidden" => BorderStyle::Hidden,
        "solid" => BorderStyle::Solid,
        "dotted" => BorderStyle::Dotted,
        "dashed" => BorderStyle::Dashed,
        "double" => BorderStyle::Double,
        "groove" => BorderStyle::Groove,
        "ridge" => BorderStyle::Ridge,
        "inset" => BorderStyle::Inset,
        "outset" => BorderStyle::Outset,
        _ => return None,
    })
}

/// The longhands `background` expands into (spec §4.3: "colour + `url()` +
/// repeat + position"). `image` is parsed and retained only as an opaque
/// reference string since image decoding is out of scope.
#[derive(Debug, Clone, Default)]
pub struct BackgroundValue {
    /// `background-color`.
    pub color: Option<Color>,
    /// `background-image`'s raw `url(...)` argument, unresolved.
    pub image_url: Option<String>,
    /// `background-repeat`.
    pub repeat: Option<BackgroundRepeat>,
    /// Parsed `background-position` as a pair of lengths/percentages if any
    /// positional keyword or length pair was present.
    pub position: Option<(Length, Length)>,
}

fn background_repeat_keyword(word: &str) -> Option<BackgroundRepeat> {
    Some(match word {
        "repeat" => BackgroundRepeat::Repeat,
        "repeat-x" => BackgroundRepeat::RepeatX,
        "repeat-y" => BackgroundRepeat::RepeatY,
        "no-repeat" => BackgroundRepeat::NoRepeat,
        _ => return None,
    })
}

fn position_keyword(word: &str) -> Option<Length> {
    Some(match word {
        "left" | "top" => Length::percent(0.0),
        "center" => Length::percent(50.0),
        "right" | "bottom" => Length::percent(100.0),
        _ => return None,
    })
}

/// Parse the `background` shorthand, accepting its components in any order.
#[must_use]
pub fn parse_background(cursor: &mut TokenCursor) -> BackgroundValue {
    let mut result = BackgroundValue::default();
    let position_flags = LengthAcceptFlags {
        percent: true,
        ..LengthAcceptFlags::default()
    };
    let mut position_terms: Vec<Length> = Vec::new();

    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::Url(url) => {
                let _ = cursor.advance();
                result.image_url = Some(url);
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
                let _ = cursor.advance();
                if let CSSToken::String(s) = cursor.peek().clone() {
                    let _ = cursor.advance();
                    result.image_url = Some(s);
                }
                if matches!(cursor.peek(), CSSToken::RightParen) {
                    let _ = cursor.advance();
                }
            }
            CSSToken::Ident(word) => {
                let lower = word.to_ascii_lowercase();
                if let Some(repeat) = background_repeat_keyword(&lower) {
                    let _ = cursor.advance();
                    result.repeat = Some(repeat);
                } else if let Some(term) = position_keyword(&lower) {
                    let _ = cursor.advance();
                    position_terms.push(term);
                } else {
                    break;
                }
            }
            _ => {
                if let Some(color) = parse_color(cursor) {
                    result.color = Some(color);
                } else if let Some(length) = parse_length(cursor, position_flags) {
                    position_terms.push(length);
                } else {
                    break;
                }
            }
        }
    }

    if position_terms.len() == 1 {
        result.position = Some((position_terms[0], Length::percent(50.0)));
    } else if position_terms.len() >= 2 {
        result.position = Some((position_terms[0], position_terms[1]));
    }

    result
}

/// The two longhands `list-style` expands into (its `image` component is
/// parsed and discarded, consistent with `background-image`).
#[derive(Debug, Clone, Copy, Default)]
pub struct ListStyleValue {
    /// `list-style-type`.
    pub kind: Option<ListStyleType>,
    /// `list-style-position`.
    pub position: Option<ListStylePosition>,
}

fn list_style_type_keyword(word: &str) -> Option<ListStyleType> {
    Some(match word {
        "disc" => ListStyleType::Disc,
        "circle" => ListStyleType::Circle,
        "square" => ListStyleType::Square,
        "decimal" => ListStyleType::Decimal,
        "lower-roman" => ListStyleType::LowerRoman,
        "upper-roman" => ListStyleType::UpperRoman,
        "lower-alpha" | "lower-latin" => ListStyleType::LowerAlpha,
        "upper-alpha" | "upper-latin" => ListStyleType::UpperAlpha,
        "none" => ListStyleType::None,
        _ => return None,
    })
}

fn list_style_position_keyword(word: &str) -> Option<ListStylePosition> {
    Some(match word {
        "inside" => ListStylePosition::Inside,
        "outside" => ListStylePosition::Outside,
        "-cr-outside" => ListStylePosition::CrOutside,
        _ => return None,
    })
}

/// Parse the `list-style` shorthand, accepting type and position in any order.
#[must_use]
pub fn parse_list_style(cursor: &mut TokenCursor) -> ListStyleValue {
    let mut result = ListStyleValue::default();
    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::Ident(word) => {
                let lower = word.to_ascii_lowercase();
                if let Some(kind) = list_style_type_keyword(&lower) {
                    let _ = cursor.advance();
                    result.kind = Some(kind);
                } else if let Some(position) = list_style_position_keyword(&lower) {
                    let _ = cursor.advance();
                    result.position = Some(position);
                } else if lower == "none" && result.kind.is_none() {
                    let _ = cursor.advance();
                    result.kind = Some(ListStyleType::None);
                } else {
                    break;
                }
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
                let _ = cursor.advance();
                skip_to_right_paren(cursor);
            }
            _ => break,
        }
    }
    result
}

fn skip_to_right_paren(cursor: &mut TokenCursor) {
    while !matches!(cursor.peek(), CSSToken::RightParen | CSSToken::Eof) {
        let _ = cursor.advance();
    }
    if matches!(cursor.peek(), CSSToken::RightParen) {
        let _ = cursor.advance();
    }
}

bitflags! {
    /// `font-variant`'s subgrammars, mapped into one 32-bit feature bitmap
    /// (spec §4.3). Bitmap-ORed on application rather than overwritten,
    /// unless the reset keywords `normal`/`none` are present.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct FontVariant: u32 {
        /// `common-ligatures`
        const COMMON_LIGATURES = 1 << 0;
        /// `no-common-ligatures`
        const NO_COMMON_LIGATURES = 1 << 1;
        /// `discretionary-ligatures`
        const DISCRETIONARY_LIGATURES = 1 << 2;
        /// `historical-ligatures`
        const HISTORICAL_LIGATURES = 1 << 3;
        /// `contextual`
        const CONTEXTUAL = 1 << 4;
        /// `small-caps`
        const SMALL_CAPS = 1 << 5;
        /// `all-small-caps`
        const ALL_SMALL_CAPS = 1 << 6;
        /// `petite-caps`
        const PETITE_CAPS = 1 << 7;
        /// `unicase`
        const UNICASE = 1 << 8;
        /// `titling-caps`
        const TITLING_CAPS = 1 << 9;
        /// `lining-nums`
        const LINING_NUMS = 1 << 10;
        /// `oldstyle-nums`
        const OLDSTYLE_NUMS = 1 << 11;
        /// `proportional-nums`
        const PROPORTIONAL_NUMS = 1 << 12;
        /// `tabular-nums`
        const TABULAR_NUMS = 1 << 13;
        /// `ordinal`
        const ORDINAL = 1 << 14;
        /// `slashed-zero`
        const SLASHED_ZERO = 1 << 15;
        /// `sub`
        const SUB = 1 << 16;
        /// `super`
        const SUPER = 1 << 17;
        /// `ruby`
        const RUBY = 1 << 18;
        /// `full-width`
        const FULL_WIDTH = 1 << 19;
        /// `proportional-width`
        const PROPORTIONAL_WIDTH = 1 << 20;
    }
}

fn font_variant_keyword(word: &str) -> Option<FontVariant> {
    Some(match word {
        "common-ligatures" => FontVariant::COMMON_LIGATURES,
        "no-common-ligatures" => FontVariant::NO_COMMON_LIGATURES,
        "discretionary-ligatures" => FontVariant::DISCRETIONARY_LIGATURES,
        "historical-ligatures" => FontVariant::HISTORICAL_LIGATURES,
        "contextual" => FontVariant::CONTEXTUAL,
        "small-caps" => FontVariant::SMALL_CAPS,
        "all-small-caps" => FontVariant::ALL_SMALL_CAPS,
        "petite-caps" => FontVariant::PETITE_CAPS,
        "unicase" => FontVariant::UNICASE,
        "titling-caps" => FontVariant::TITLING_CAPS,
        "lining-nums" => FontVariant::LINING_NUMS,
        "oldstyle-nums" => FontVariant::OLDSTYLE_NUMS,
        "proportional-nums" => FontVariant::PROPORTIONAL_NUMS,
        "tabular-nums" => FontVariant::TABULAR_NUMS,
        "ordinal" => FontVariant::ORDINAL,
        "slashed-zero" => FontVariant::SLASHED_ZERO,
        "sub" => FontVariant::SUB,
        "super" => FontVariant::SUPER,
        "ruby" => FontVariant::RUBY,
        "full-width" => FontVariant::FULL_WIDTH,
        "proportional-width" => FontVariant::PROPORTIONAL_WIDTH,
        _ => return None,
    })
}

/// Parse `font-variant`'s keyword list into a feature bitmap. `normal`/
/// `none` return `Some(FontVariant::empty())` and signal a reset to the
/// caller (which must OR-reset rather than OR-accumulate in that case);
/// an unrecognised leading keyword returns `None` so the declaration is
/// dropped per the ordinary unknown-value recovery path.
#[must_use]
pub fn parse_font_variant(cursor: &mut TokenCursor) -> Option<(FontVariant, bool)> {
    cursor.skip_whitespace();
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        let lower = word.to_ascii_lowercase();
        if lower == "normal" || lower == "none" {
            let _ = cursor.advance();
            return Some((FontVariant::empty(), true));
        }
    }

    let mut flags = FontVariant::empty();
    let mut saw_any = false;
    loop {
        cursor.skip_whitespace();
        let CSSToken::Ident(word) = cursor.peek().clone() else {
            break;
        };
        let Some(flag) = font_variant_keyword(&word.to_ascii_lowercase()) else {
            break;
        };
        let _ = cursor.advance();
        flags |= flag;
        saw_any = true;
    }
    if saw_any {
        Some((flags, false))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn cursor_for(src: &str) -> TokenCursor {
        TokenCursor::new(CSSTokenizer::new(src).tokenize_all())
    }

    #[test]
    fn expand_trbl_one_value_sets_all_edges() {
        let expanded = expand_trbl(&[Length::px(1.0)]).unwrap();
        assert_eq!(expanded, [Length::px(1.0); 4]);
    }

    #[test]
    fn expand_trbl_three_values_duplicates_right_to_left() {
        let px = Length::px;
        let expanded = expand_trbl(&[px(1.0), px(2.0), px(3.0)]).unwrap();
        assert_eq!(expanded, [px(1.0), px(2.0), px(3.0), px(2.0)]);
    }

    #[test]
    fn margin_shorthand_with_three_values() {
        let mut cursor = cursor_for("1px 2px 3px");
        let flags = LengthAcceptFlags {
            auto: true,
            negative: true,
            ..Default::default()
        };
        let expanded = parse_trbl_lengths(&mut cursor, flags).unwrap();
        assert_eq!(expanded[0], Length::px(1.0));
        assert_eq!(expanded[1], Length::px(2.0));
        assert_eq!(expanded[2], Length::px(3.0));
        assert_eq!(expanded[3], Length::px(2.0));
    }

    #[test]
    fn border_side_any_order() {
        let mut cursor = cursor_for("solid red 2px");
        let side = parse_border_side(&mut cursor);
        assert_eq!(side.style, BorderStyle::Solid);
        assert_eq!(side.color, Some(Color::rgb(255, 0, 0)));
        assert_eq!(side.width, Length::px(2.0));
    }

    #[test]
    fn font_variant_normal_resets() {
        let mut cursor = cursor_for("normal");
        let (flags, reset) = parse_font_variant(&mut cursor).unwrap();
        assert!(reset);
        assert!(flags.is_empty());
    }
}
