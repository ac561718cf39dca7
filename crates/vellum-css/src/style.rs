//! The computed style record (spec §3 "Computed style record") and the
//! inheritance rules the Match & Apply engine (C7) uses to seed a node's
//! style from its parent before cascading its own matched declarations.

use crate::declaration::{
    BackgroundRepeat, BorderStyle, CrHint, Display, FontStyle, FontVariant, FontWeight,
    ListStylePosition, ListStyleType, TextAlign, TextDecorationLine, TextTransform, WhiteSpace,
};
use crate::values::{Color, ContentValue, GenericValue, Length};

/// Per-side box values in `[top, right, bottom, left]` order, matching the
/// order [`crate::declaration::expand_trbl`] already uses for shorthand
/// expansion.
pub type Sides<T> = [T; 4];

/// A node's fully cascaded style (spec §3). Layout and paint are out of
/// scope; this is the typed, post-cascade value for every property the
/// engine tracks, ready for a host's layout/render pass to consume.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    /// `display`.
    pub display: Display,
    /// `width`.
    pub width: Length,
    /// `height`.
    pub height: Length,
    /// `min-width`.
    pub min_width: Length,
    /// `min-height`.
    pub min_height: Length,
    /// `max-width`.
    pub max_width: Length,
    /// `max-height`.
    pub max_height: Length,
    /// `margin-{top,right,bottom,left}`.
    pub margin: Sides<Length>,
    /// `padding-{top,right,bottom,left}`.
    pub padding: Sides<Length>,
    /// `border-{top,right,bottom,left}-width`.
    pub border_width: Sides<Length>,
    /// `border-{top,right,bottom,left}-style`.
    pub border_style: Sides<BorderStyle>,
    /// `border-{top,right,bottom,left}-color`, with `currentcolor` already
    /// resolved against [`Self::color`] at the point the declaration applied
    /// (spec §4.3's `currentcolor` note; see [`crate::declaration::Value::Color`]).
    pub border_color: Sides<Color>,
    /// `color`.
    pub color: Color,
    /// `background-color`.
    pub background_color: Color,
    /// `background-image`, as the raw URL text (fetching/decoding is a host
    /// concern out of scope for this crate).
    pub background_image: Option<String>,
    /// `background-repeat`.
    pub background_repeat: BackgroundRepeat,
    /// `background-position-x`/`background-position-y`.
    pub background_position: (Length, Length),
    /// `font-family`, the comma-separated fallback list in source order.
    pub font_family: Vec<String>,
    /// `font-size`.
    pub font_size: Length,
    /// `font-style`.
    pub font_style: FontStyle,
    /// `font-weight`, always resolved to an absolute weight (`bolder`/
    /// `lighter` are resolved against the inherited weight at apply time).
    pub font_weight: FontWeight,
    /// `font-variant`, OR-accumulated unless reset by `normal`/`none`.
    pub font_variant: FontVariant,
    /// `line-height`.
    pub line_height: Length,
    /// `text-align`.
    pub text_align: TextAlign,
    /// `text-indent`.
    pub text_indent: Length,
    /// `text-transform`.
    pub text_transform: TextTransform,
    /// `text-decoration` (line keywords only).
    pub text_decoration: TextDecorationLine,
    /// `vertical-align`.
    pub vertical_align: Length,
    /// `white-space`.
    pub white_space: WhiteSpace,
    /// `letter-spacing`.
    pub letter_spacing: Length,
    /// `word-spacing`.
    pub word_spacing: Length,
    /// `list-style-type`.
    pub list_style_type: ListStyleType,
    /// `list-style-position`.
    pub list_style_position: ListStylePosition,
    /// `list-style-image`, as the raw URL text.
    pub list_style_image: Option<String>,
    /// `content`, consulted only for nodes with a pending `::before`/
    /// `::after` pseudo-element style (spec §3).
    pub content: Option<ContentValue>,
    /// `orphans`.
    pub orphans: i32,
    /// `widows`.
    pub widows: i32,
    /// `z-index`, `None` meaning `auto`.
    pub z_index: Option<i32>,
    /// `direction`: `true` means `rtl`.
    pub direction_rtl: bool,
    /// `-cr-hint`, OR-accumulated unless reset by `none`.
    pub cr_hint: CrHint,
    /// The cascaded `::before` style, if any selector matching this node
    /// carried a `::before` pseudo-element (spec §3 "two pending
    /// pseudo-element style slots").
    pub before: Option<Box<ComputedStyle>>,
    /// The cascaded `::after` style, if any selector matching this node
    /// carried an `::after` pseudo-element.
    pub after: Option<Box<ComputedStyle>>,
}

impl ComputedStyle {
    /// The CSS2.1 initial values for every tracked property, used to seed
    /// the document root (which has no parent to inherit from).
    #[must_use]
    pub fn initial() -> Self {
        Self {
            display: Display::Inline,
            width: Length::generic(GenericValue::Auto),
            height: Length::generic(GenericValue::Auto),
            min_width: Length::px(0.0),
            min_height: Length::px(0.0),
            max_width: Length::generic(GenericValue::None),
            max_height: Length::generic(GenericValue::None),
            margin: [Length::px(0.0); 4],
            padding: [Length::px(0.0); 4],
            border_width: [Length::px(3.0); 4],
            border_style: [BorderStyle::None; 4],
            border_color: [Color::rgb(0, 0, 0); 4],
            color: Color::rgb(0, 0, 0),
            background_color: Color::TRANSPARENT,
            background_image: None,
            background_repeat: BackgroundRepeat::Repeat,
            background_position: (Length::percent(0.0), Length::percent(0.0)),
            font_family: vec!["sans-serif".to_owned()],
            font_size: Length::px(16.0),
            font_style: FontStyle::Normal,
            font_weight: FontWeight::Absolute(400),
            font_variant: FontVariant::empty(),
            line_height: Length::generic(GenericValue::Normal),
            text_align: TextAlign::Left,
            text_indent: Length::px(0.0),
            text_transform: TextTransform::None,
            text_decoration: TextDecorationLine::empty(),
            vertical_align: Length::px(0.0),
            white_space: WhiteSpace::Normal,
            letter_spacing: Length::generic(GenericValue::Normal),
            word_spacing: Length::generic(GenericValue::Normal),
            list_style_type: ListStyleType::Disc,
            list_style_position: ListStylePosition::Outside,
            list_style_image: None,
            content: None,
            orphans: 2,
            widows: 2,
            z_index: None,
            direction_rtl: false,
            cr_hint: CrHint::empty(),
            before: None,
            after: None,
        }
    }

    /// Seed a child's style from its parent: inheritable properties copy
    /// forward (spec §3 "Inheritance"), everything else resets to its
    /// initial value. `::before`/`::after` slots never inherit — they are
    /// populated fresh per node by whichever selectors match it.
    #[must_use]
    pub fn inherit_from(parent: &Self) -> Self {
        Self {
            color: parent.color,
            font_family: parent.font_family.clone(),
            font_size: parent.font_size,
            font_style: parent.font_style,
            font_weight: parent.font_weight,
            font_variant: parent.font_variant,
            line_height: parent.line_height,
            text_align: parent.text_align,
            text_indent: parent.text_indent,
            text_transform: parent.text_transform,
            white_space: parent.white_space,
            letter_spacing: parent.letter_spacing,
            word_spacing: parent.word_spacing,
            list_style_type: parent.list_style_type,
            list_style_position: parent.list_style_position,
            list_style_image: parent.list_style_image.clone(),
            orphans: parent.orphans,
            widows: parent.widows,
            direction_rtl: parent.direction_rtl,
            cr_hint: parent.cr_hint & (CrHint::INHERITABLE_MASK | CrHint::INHERITABLE_EARLY_MASK),
            ..Self::initial()
        }
    }
}

/// Resolve `font-weight: bolder` relative to an inherited absolute weight
/// (CSS2.1 §15.6's "nearest absolute value" table).
#[must_use]
pub const fn resolve_bolder(inherited: u16) -> u16 {
    if inherited < 400 {
        400
    } else if inherited < 700 {
        700
    } else {
        900
    }
}

/// Resolve `font-weight: lighter` relative to an inherited absolute weight.
#[must_use]
pub const fn resolve_lighter(inherited: u16) -> u16 {
    if inherited <= 500 {
        100
    } else if inherited <= 700 {
        400
    } else {
        700
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inherit_from_copies_inheritable_and_resets_the_rest() {
        let mut parent = ComputedStyle::initial();
        parent.color = Color::rgb(10, 20, 30);
        parent.display = Display::Block;
        parent.cr_hint = CrHint::FIT_GLYPHS | CrHint::FOOTNOTE_INPAGE;

        let child = ComputedStyle::inherit_from(&parent);
        assert_eq!(child.color, parent.color);
        assert_eq!(child.display, Display::Inline);
        assert!(child.cr_hint.contains(CrHint::FIT_GLYPHS));
        assert!(!child.cr_hint.contains(CrHint::FOOTNOTE_INPAGE));
    }

    #[test]
    fn bolder_and_lighter_tables_match_css21() {
        assert_eq!(resolve_bolder(100), 400);
        assert_eq!(resolve_bolder(500), 700);
        assert_eq!(resolve_bolder(900), 900);
        assert_eq!(resolve_lighter(100), 100);
        assert_eq!(resolve_lighter(600), 400);
        assert_eq!(resolve_lighter(900), 700);
    }
}
