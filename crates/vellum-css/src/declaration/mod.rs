//! Declaration blocks (spec §4.3): the recognised property table, value
//! representation, `!important`, and the parse loop with its two-tier
//! error recovery.

pub mod cr_ext;
pub mod shorthand;

use std::rc::Rc;

use bitflags::bitflags;

use crate::tokenizer::{CSSToken, TokenCursor};
use crate::values::{parse_color, parse_content, parse_length, Color, ContentValue, GenericValue, Length, LengthAcceptFlags};

pub use cr_ext::{parse_cr_hint, parse_cr_only_if, parse_ignore_if_dom_version_gte, CrHint, CrHintValue, OnlyIfGuard};
pub use shorthand::{
    expand_trbl, parse_background, parse_border_side, parse_font_variant, parse_list_style,
    parse_trbl_lengths, BackgroundValue, BorderSideValue, FontVariant, ListStyleValue,
};

/// `display`'s recognised keyword set (spec §4.3; layout itself is out of
/// scope, but the computed keyword still drives cascade decisions such as
/// whether a node participates in list numbering or `::before`/`::after`
/// generation).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// `inline`
    Inline,
    /// `block`
    Block,
    /// `inline-block`
    InlineBlock,
    /// `list-item`
    ListItem,
    /// `table` and all `table-*` keywords collapse to this; layout is out
    /// of scope so the distinctions between them are not tracked here.
    Table,
    /// `run-in`
    RunIn,
    /// `none`
    None,
    /// `-cr-outside-list-marker`, an engine-private extension marking an
    /// auto-generated list marker box.
    CrOutsideListMarker,
}

fn display_keyword(word: &str) -> Option<Display> {
    Some(match word {
        "inline" => Display::Inline,
        "block" => Display::Block,
        "inline-block" => Display::InlineBlock,
        "list-item" => Display::ListItem,
        "run-in" => Display::RunIn,
        "none" => Display::None,
        "-cr-outside-list-marker" => Display::CrOutsideListMarker,
        w if w.starts_with("table") => Display::Table,
        _ => return None,
    })
}

/// `border-style`/`border-*-style` keywords (spec §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BorderStyle {
    /// `none`
    #[default]
    None,
    /// `hidden`
    Hidden,
    /// `solid`
    Solid,
    /// `dotted`
    Dotted,
    /// `dashed`
    Dashed,
    /// `double`
    Double,
    /// `groove`
    Groove,
    /// `ridge`
    Ridge,
    /// `inset`
    Inset,
    /// `outset`
    Outset,
}

/// `background-repeat` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackgroundRepeat {
    /// `repeat`
    Repeat,
    /// `repeat-x`
    RepeatX,
    /// `repeat-y`
    RepeatY,
    /// `no-repeat`
    NoRepeat,
}

/// `list-style-type` keywords (a representative subset; spec §4.3 notes
/// the full CSS Counter Styles vocabulary is out of scope).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStyleType {
    /// `disc`
    Disc,
    /// `circle`
    Circle,
    /// `square`
    Square,
    /// `decimal`
    Decimal,
    /// `lower-roman`
    LowerRoman,
    /// `upper-roman`
    UpperRoman,
    /// `lower-alpha`/`lower-latin`
    LowerAlpha,
    /// `upper-alpha`/`upper-latin`
    UpperAlpha,
    /// `none`
    None,
}

/// `list-style-position` keywords, including the engine's `-cr-outside`
/// extension (keeps the marker outside the content box without the
/// hanging-indent behaviour plain `outside` implies).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListStylePosition {
    /// `inside`
    Inside,
    /// `outside`
    Outside,
    /// `-cr-outside`
    CrOutside,
}

/// `text-align` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    /// `left`
    Left,
    /// `right`
    Right,
    /// `center`
    Center,
    /// `justify`
    Justify,
}

/// `white-space` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhiteSpace {
    /// `normal`
    Normal,
    /// `nowrap`
    Nowrap,
    /// `pre`
    Pre,
    /// `pre-wrap`
    PreWrap,
    /// `pre-line`
    PreLine,
}

/// `text-transform` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextTransform {
    /// `none`
    None,
    /// `capitalize`
    Capitalize,
    /// `uppercase`
    Uppercase,
    /// `lowercase`
    Lowercase,
}

bitflags! {
    /// `text-decoration-line`'s keyword set, which `text-decoration` also
    /// accepts directly (CSS2.1-style shorthand, before the Level 3 split
    /// into `-line`/`-style`/`-color`). Multiple lines combine via OR;
    /// `none` clears to empty.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct TextDecorationLine: u8 {
        /// `underline`
        const UNDERLINE = 1 << 0;
        /// `overline`
        const OVERLINE = 1 << 1;
        /// `line-through`
        const LINE_THROUGH = 1 << 2;
        /// `blink` (parsed for compatibility; never rendered).
        const BLINK = 1 << 3;
    }
}

fn text_decoration_line_keyword(word: &str) -> Option<TextDecorationLine> {
    Some(match word {
        "underline" => TextDecorationLine::UNDERLINE,
        "overline" => TextDecorationLine::OVERLINE,
        "line-through" => TextDecorationLine::LINE_THROUGH,
        "blink" => TextDecorationLine::BLINK,
        _ => return None,
    })
}

/// Parse `text-decoration`'s line keyword list (`none`, or one or more of
/// `underline`/`overline`/`line-through`/`blink` in any order).
fn parse_text_decoration(cursor: &mut TokenCursor) -> Option<TextDecorationLine> {
    cursor.skip_whitespace();
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        if word.eq_ignore_ascii_case("none") {
            let _ = cursor.advance();
            return Some(TextDecorationLine::empty());
        }
    }
    let mut flags = TextDecorationLine::empty();
    let mut saw_any = false;
    loop {
        cursor.skip_whitespace();
        let CSSToken::Ident(word) = cursor.peek().clone() else {
            break;
        };
        let Some(flag) = text_decoration_line_keyword(&word.to_ascii_lowercase()) else {
            break;
        };
        let _ = cursor.advance();
        flags |= flag;
        saw_any = true;
    }
    saw_any.then_some(flags)
}

/// `font-style` keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    /// `normal`
    Normal,
    /// `italic`
    Italic,
    /// `oblique`
    Oblique,
}

/// `font-weight` keywords collapse to a numeric 100-900 scale (spec §4.3);
/// `bold`/`normal`/`bolder`/`lighter` are resolved against an inherited
/// value at application time rather than the parser, since `bolder`/
/// `lighter` are relative to the parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    /// An absolute weight in `[1, 1000]`.
    Absolute(u16),
    /// `bolder`, relative to the inherited weight.
    Bolder,
    /// `lighter`, relative to the inherited weight.
    Lighter,
}

/// The recognised property codes (spec §4.3's "roughly 100 property
/// codes"). This is a representative subset grounded directly on the
/// enumerated value types in the engine's data model rather than every
/// property CSS defines; properties outside this set are parsed as far as
/// `!important`/balance detection requires and then discarded, exactly
/// like any other unrecognised property (spec §4.3's "unknown property
/// name" edge case).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Property {
    Display,
    Width,
    Height,
    MinWidth,
    MinHeight,
    MaxWidth,
    MaxHeight,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderTopWidth,
    BorderRightWidth,
    BorderBottomWidth,
    BorderLeftWidth,
    BorderTopStyle,
    BorderRightStyle,
    BorderBottomStyle,
    BorderLeftStyle,
    BorderTopColor,
    BorderRightColor,
    BorderBottomColor,
    BorderLeftColor,
    Color,
    BackgroundColor,
    BackgroundImage,
    BackgroundRepeat,
    BackgroundPositionX,
    BackgroundPositionY,
    FontFamily,
    FontSize,
    FontStyle,
    FontWeight,
    FontVariant,
    FontFeatureSettings,
    LineHeight,
    TextAlign,
    TextIndent,
    TextTransform,
    TextDecoration,
    VerticalAlign,
    WhiteSpace,
    LetterSpacing,
    WordSpacing,
    ListStyleType,
    ListStylePosition,
    ListStyleImage,
    Content,
    Orphans,
    Widows,
    ZIndex,
    Direction,
    CrHint,
    CrOnlyIf,
    CrIgnoreIfDomVersionGte,
}

fn property_keyword(word: &str) -> Option<Property> {
    Some(match word {
        "display" => Property::Display,
        "width" => Property::Width,
        "height" => Property::Height,
        "min-width" => Property::MinWidth,
        "min-height" => Property::MinHeight,
        "max-width" => Property::MaxWidth,
        "max-height" => Property::MaxHeight,
        "margin-top" => Property::MarginTop,
        "margin-right" => Property::MarginRight,
        "margin-bottom" => Property::MarginBottom,
        "margin-left" => Property::MarginLeft,
        "padding-top" => Property::PaddingTop,
        "padding-right" => Property::PaddingRight,
        "padding-bottom" => Property::PaddingBottom,
        "padding-left" => Property::PaddingLeft,
        "border-top-width" => Property::BorderTopWidth,
        "border-right-width" => Property::BorderRightWidth,
        "border-bottom-width" => Property::BorderBottomWidth,
        "border-left-width" => Property::BorderLeftWidth,
        "border-top-style" => Property::BorderTopStyle,
        "border-right-style" => Property::BorderRightStyle,
        "border-bottom-style" => Property::BorderBottomStyle,
        "border-left-style" => Property::BorderLeftStyle,
        "border-top-color" => Property::BorderTopColor,
        "border-right-color" => Property::BorderRightColor,
        "border-bottom-color" => Property::BorderBottomColor,
        "border-left-color" => Property::BorderLeftColor,
        "color" => Property::Color,
        "background-color" => Property::BackgroundColor,
        "background-image" => Property::BackgroundImage,
        "background-repeat" => Property::BackgroundRepeat,
        "background-position-x" => Property::BackgroundPositionX,
        "background-position-y" => Property::BackgroundPositionY,
        "font-family" => Property::FontFamily,
        "font-size" => Property::FontSize,
        "font-style" => Property::FontStyle,
        "font-weight" => Property::FontWeight,
        "font-variant" => Property::FontVariant,
        "font-feature-settings" => Property::FontFeatureSettings,
        "line-height" => Property::LineHeight,
        "text-align" => Property::TextAlign,
        "text-indent" => Property::TextIndent,
        "text-transform" => Property::TextTransform,
        "text-decoration" => Property::TextDecoration,
        "vertical-align" => Property::VerticalAlign,
        "white-space" => Property::WhiteSpace,
        "letter-spacing" => Property::LetterSpacing,
        "word-spacing" => Property::WordSpacing,
        "list-style-type" => Property::ListStyleType,
        "list-style-position" => Property::ListStylePosition,
        "list-style-image" => Property::ListStyleImage,
        "content" => Property::Content,
        "orphans" => Property::Orphans,
        "widows" => Property::Widows,
        "z-index" => Property::ZIndex,
        "direction" => Property::Direction,
        "-cr-hint" => Property::CrHint,
        "-cr-only-if" => Property::CrOnlyIf,
        "-cr-ignore-if-dom-version-greater-or-equal" => Property::CrIgnoreIfDomVersionGte,
        _ => return None,
    })
}

/// Shorthand property names, expanded into multiple [`DeclarationEntry`]
/// values rather than producing a single [`Value`] (spec §4.3).
fn shorthand_keyword(word: &str) -> Option<Shorthand> {
    Some(match word {
        "margin" => Shorthand::Margin,
        "padding" => Shorthand::Padding,
        "border" => Shorthand::Border,
        "border-top" => Shorthand::BorderSide(Side::Top),
        "border-right" => Shorthand::BorderSide(Side::Right),
        "border-bottom" => Shorthand::BorderSide(Side::Bottom),
        "border-left" => Shorthand::BorderSide(Side::Left),
        "border-width" => Shorthand::BorderWidth,
        "border-style" => Shorthand::BorderStyleShorthand,
        "border-color" => Shorthand::BorderColor,
        "background" => Shorthand::Background,
        "list-style" => Shorthand::ListStyle,
        _ => return None,
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shorthand {
    Margin,
    Padding,
    Border,
    BorderSide(Side),
    BorderWidth,
    BorderStyleShorthand,
    BorderColor,
    Background,
    ListStyle,
}

/// A parsed property value. Each variant corresponds to one or more
/// [`Property`] codes that share a representation.
#[derive(Debug, Clone)]
pub enum Value {
    /// Any length-shaped value: dimensions, `auto`/`none`/`normal`,
    /// `font-size` keywords, etc.
    Length(Length),
    /// A concrete color, or `currentcolor` represented as a generic
    /// [`Length`] sentinel upstream of this (colors needing `currentcolor`
    /// resolution are carried as `Value::Length` instead).
    Color(Color),
    /// `display`.
    Display(Display),
    /// `border-*-style`.
    BorderStyle(BorderStyle),
    /// `background-repeat`.
    BackgroundRepeat(BackgroundRepeat),
    /// `list-style-type`.
    ListStyleType(ListStyleType),
    /// `list-style-position`.
    ListStylePosition(ListStylePosition),
    /// `text-align`.
    TextAlign(TextAlign),
    /// `white-space`.
    WhiteSpace(WhiteSpace),
    /// `text-transform`.
    TextTransform(TextTransform),
    /// `text-decoration` (the line-keyword subset).
    TextDecoration(TextDecorationLine),
    /// `font-style`.
    FontStyle(FontStyle),
    /// `font-weight`.
    FontWeight(FontWeight),
    /// `font-variant`, with the reset flag from [`shorthand::parse_font_variant`]
    /// already folded into the value: `Reset` replaces, `Accumulate` ORs.
    FontVariant {
        /// The bit(s) this declaration contributes.
        flags: FontVariant,
        /// Whether this declaration resets the computed bitmap to `flags`
        /// rather than OR-ing `flags` into it.
        reset: bool,
    },
    /// `content`.
    Content(ContentValue),
    /// `font-family`, kept as the raw comma-separated family list text.
    FontFamilyList(Vec<String>),
    /// `orphans`/`widows`/`z-index`, which take a bare integer.
    Integer(i32),
    /// `direction`: `true` means `rtl`.
    DirectionRtl(bool),
    /// `-cr-hint`.
    CrHint(CrHintValue),
    /// `-cr-only-if`; `None` means a static guard already failed and the
    /// whole declaration must be dropped (handled by the caller, which
    /// never inserts this entry at all in that case — this variant only
    /// appears when at least one dynamic guard remains to re-check).
    CrOnlyIf(Vec<OnlyIfGuard>),
    /// `-cr-ignore-if-dom-version-greater-or-equal`.
    CrIgnoreIfDomVersionGte(u32),
}

/// Author vs. engine `!important` (spec §4.3: "two bits"). Plain
/// declarations are [`Importance::None`]; `!important` from a user
/// stylesheet is [`Importance::Author`]; the engine's own built-in/user-agent
/// sheet can mark a declaration [`Importance::Engine`], which outranks even
/// an author's `!important`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Importance {
    /// No `!important`.
    None,
    /// Author-specified `!important`.
    Author,
    /// Engine-specified `!important`, the highest rank.
    Engine,
}

/// One `property: value` pair inside a [`Declaration`], with its
/// importance tier attached.
#[derive(Debug, Clone)]
pub struct DeclarationEntry {
    /// The property this entry assigns.
    pub property: Property,
    /// The parsed value.
    pub value: Value,
    /// The `!important` tier this entry was parsed with.
    pub importance: Importance,
}

/// A compiled declaration block: the ordered list of longhand entries a
/// `{ ... }` body expanded to, after shorthand expansion (spec §4.3).
/// Shared via [`SharedDeclaration`] since the same block is reused across
/// every selector in a comma-separated group.
#[derive(Debug, Clone, Default)]
pub struct Declaration {
    /// The longhand entries in source order (later entries of the same
    /// property win over earlier ones at application time, except that a
    /// higher [`Importance`] always wins regardless of order).
    pub entries: Vec<DeclarationEntry>,
}

/// A declaration block shared by reference across every selector in a
/// comma-separated selector group (spec §4.3/§4.6).
pub type SharedDeclaration = Rc<Declaration>;

const MARGIN_FLAGS: LengthAcceptFlags = LengthAcceptFlags {
    percent: true,
    negative: true,
    auto: true,
    none: false,
    normal: false,
    unspecified_number: false,
    contain_cover: false,
    is_font_size: false,
};

const PADDING_FLAGS: LengthAcceptFlags = LengthAcceptFlags {
    percent: true,
    negative: false,
    auto: false,
    none: false,
    normal: false,
    unspecified_number: false,
    contain_cover: false,
    is_font_size: false,
};

const SIZE_FLAGS: LengthAcceptFlags = LengthAcceptFlags {
    percent: true,
    negative: false,
    auto: true,
    none: false,
    normal: false,
    unspecified_number: false,
    contain_cover: false,
    is_font_size: false,
};

const FONT_SIZE_FLAGS: LengthAcceptFlags = LengthAcceptFlags {
    percent: true,
    negative: false,
    auto: false,
    none: false,
    normal: false,
    unspecified_number: false,
    contain_cover: false,
    is_font_size: true,
};

const LINE_HEIGHT_FLAGS: LengthAcceptFlags = LengthAcceptFlags {
    percent: true,
    negative: false,
    auto: false,
    none: false,
    normal: true,
    unspecified_number: true,
    contain_cover: false,
    is_font_size: false,
};

const TEXT_INDENT_FLAGS: LengthAcceptFlags = LengthAcceptFlags {
    percent: true,
    negative: true,
    auto: false,
    none: false,
    normal: false,
    unspecified_number: false,
    contain_cover: false,
    is_font_size: false,
};

fn parse_simple_value(cursor: &mut TokenCursor, property: Property) -> Option<Value> {
    match property {
        Property::Display => ident_value(cursor, display_keyword).map(Value::Display),
        Property::Width | Property::Height | Property::MinWidth | Property::MinHeight | Property::MaxWidth | Property::MaxHeight => {
            parse_length(cursor, SIZE_FLAGS).map(Value::Length)
        }
        Property::MarginTop | Property::MarginRight | Property::MarginBottom | Property::MarginLeft => {
            parse_length(cursor, MARGIN_FLAGS).map(Value::Length)
        }
        Property::PaddingTop | Property::PaddingRight | Property::PaddingBottom | Property::PaddingLeft => {
            parse_length(cursor, PADDING_FLAGS).map(Value::Length)
        }
        Property::BorderTopWidth | Property::BorderRightWidth | Property::BorderBottomWidth | Property::BorderLeftWidth => {
            border_width_value(cursor)
        }
        Property::BorderTopStyle | Property::BorderRightStyle | Property::BorderBottomStyle | Property::BorderLeftStyle => {
            ident_value(cursor, border_style_keyword).map(Value::BorderStyle)
        }
        Property::BorderTopColor | Property::BorderRightColor | Property::BorderBottomColor | Property::BorderLeftColor | Property::Color | Property::BackgroundColor => {
            parse_color_or_current(cursor)
        }
        Property::BackgroundImage => parse_url_or_none(cursor),
        Property::BackgroundRepeat => ident_value(cursor, background_repeat_keyword).map(Value::BackgroundRepeat),
        Property::BackgroundPositionX | Property::BackgroundPositionY => {
            parse_length(cursor, PADDING_FLAGS).map(Value::Length)
        }
        Property::FontFamily => parse_font_family(cursor),
        Property::FontSize => parse_length(cursor, FONT_SIZE_FLAGS).map(Value::Length),
        Property::FontStyle => ident_value(cursor, font_style_keyword).map(Value::FontStyle),
        Property::FontWeight => parse_font_weight(cursor),
        Property::FontVariant => {
            let (flags, reset) = parse_font_variant(cursor)?;
            Some(Value::FontVariant { flags, reset })
        }
        Property::FontFeatureSettings => {
            // Parsed but ignored: consumed here purely so the cursor stays
            // balanced and `!important`/`;` detection downstream works.
            cursor.skip_whitespace();
            while !matches!(cursor.peek(), CSSToken::Semicolon | CSSToken::RightBrace | CSSToken::Eof) {
                let _ = cursor.advance();
            }
            Some(Value::Integer(0))
        }
        Property::LineHeight => parse_length(cursor, LINE_HEIGHT_FLAGS).map(Value::Length),
        Property::TextAlign => ident_value(cursor, text_align_keyword).map(Value::TextAlign),
        Property::TextIndent => parse_length(cursor, TEXT_INDENT_FLAGS).map(Value::Length),
        Property::TextTransform => ident_value(cursor, text_transform_keyword).map(Value::TextTransform),
        Property::TextDecoration => parse_text_decoration(cursor).map(Value::TextDecoration),
        Property::VerticalAlign => parse_length(cursor, LengthAcceptFlags {
            percent: true,
            negative: true,
            ..LengthAcceptFlags::default()
        }).map(Value::Length),
        Property::WhiteSpace => ident_value(cursor, white_space_keyword).map(Value::WhiteSpace),
        Property::LetterSpacing | Property::WordSpacing => parse_length(cursor, LengthAcceptFlags {
            negative: true,
            normal: true,
            ..LengthAcceptFlags::default()
        }).map(Value::Length),
        Property::ListStyleType => ident_value(cursor, list_style_type_keyword).map(Value::ListStyleType),
        Property::ListStylePosition => ident_value(cursor, list_style_position_keyword).map(Value::ListStylePosition),
        Property::ListStyleImage => parse_url_or_none(cursor),
        Property::Content => Some(Value::Content(parse_content(cursor))),
        Property::Orphans | Property::Widows | Property::ZIndex => parse_integer(cursor),
        Property::Direction => ident_value(cursor, direction_keyword).map(Value::DirectionRtl),
        Property::CrHint => Some(Value::CrHint(parse_cr_hint(cursor))),
        Property::CrOnlyIf => None, // handled specially in the caller; needs DOM format
        Property::CrIgnoreIfDomVersionGte => parse_ignore_if_dom_version_gte(cursor).map(Value::CrIgnoreIfDomVersionGte),
    }
}

/// Parse a color value that also accepts `currentcolor`, carried as the
/// [`GenericValue::CurrentColor`] sentinel and resolved against the node's
/// own computed `color` at apply time (see [`Value::Color`]'s doc comment).
fn parse_color_or_current(cursor: &mut TokenCursor) -> Option<Value> {
    cursor.skip_whitespace();
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        if word.eq_ignore_ascii_case("currentcolor") {
            let _ = cursor.advance();
            return Some(Value::Length(Length::generic(GenericValue::CurrentColor)));
        }
    }
    parse_color(cursor).map(Value::Color)
}

fn ident_value<T>(cursor: &mut TokenCursor, lookup: fn(&str) -> Option<T>) -> Option<T> {
    cursor.skip_whitespace();
    let CSSToken::Ident(word) = cursor.peek().clone() else {
        return None;
    };
    let value = lookup(&word.to_ascii_lowercase())?;
    let _ = cursor.advance();
    Some(value)
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

fn background_repeat_keyword(word: &str) -> Option<BackgroundRepeat> {
    Some(match word {
        "repeat" => BackgroundRepeat::Repeat,
        "repeat-x" => BackgroundRepeat::RepeatX,
        "repeat-y" => BackgroundRepeat::RepeatY,
        "no-repeat" => BackgroundRepeat::NoRepeat,
        _ => return None,
    })
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

fn text_align_keyword(word: &str) -> Option<TextAlign> {
    Some(match word {
        "left" => TextAlign::Left,
        "right" => TextAlign::Right,
        "center" => TextAlign::Center,
        "justify" => TextAlign::Justify,
        _ => return None,
    })
}

fn text_transform_keyword(word: &str) -> Option<TextTransform> {
    Some(match word {
        "none" => TextTransform::None,
        "capitalize" => TextTransform::Capitalize,
        "uppercase" => TextTransform::Uppercase,
        "lowercase" => TextTransform::Lowercase,
        _ => return None,
    })
}

fn white_space_keyword(word: &str) -> Option<WhiteSpace> {
    Some(match word {
        "normal" => WhiteSpace::Normal,
        "nowrap" => WhiteSpace::Nowrap,
        "pre" => WhiteSpace::Pre,
        "pre-wrap" => WhiteSpace::PreWrap,
        "pre-line" => WhiteSpace::PreLine,
        _ => return None,
    })
}

fn font_style_keyword(word: &str) -> Option<FontStyle> {
    Some(match word {
        "normal" => FontStyle::Normal,
        "italic" => FontStyle::Italic,
        "oblique" => FontStyle::Oblique,
        _ => return None,
    })
}

fn direction_keyword(word: &str) -> Option<bool> {
    match word {
        "ltr" => Some(false),
        "rtl" => Some(true),
        _ => None,
    }
}

fn border_width_value(cursor: &mut TokenCursor) -> Option<Value> {
    cursor.skip_whitespace();
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        let lower = word.to_ascii_lowercase();
        let px = match lower.as_str() {
            "thin" => Some(1.0),
            "medium" => Some(3.0),
            "thick" => Some(5.0),
            _ => None,
        };
        if let Some(px) = px {
            let _ = cursor.advance();
            return Some(Value::Length(Length::px(px)));
        }
    }
    parse_length(cursor, LengthAcceptFlags::default()).map(Value::Length)
}

fn parse_url_or_none(cursor: &mut TokenCursor) -> Option<Value> {
    cursor.skip_whitespace();
    match cursor.peek().clone() {
        CSSToken::Url(url) => {
            let _ = cursor.advance();
            Some(Value::FontFamilyList(vec![url]))
        }
        CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
            let _ = cursor.advance();
            let url = if let CSSToken::String(s) = cursor.peek().clone() {
                let _ = cursor.advance();
                s
            } else {
                String::new()
            };
            if matches!(cursor.peek(), CSSToken::RightParen) {
                let _ = cursor.advance();
            }
            Some(Value::FontFamilyList(vec![url]))
        }
        CSSToken::Ident(word) if word.eq_ignore_ascii_case("none") => {
            let _ = cursor.advance();
            Some(Value::FontFamilyList(Vec::new()))
        }
        _ => None,
    }
}

fn parse_font_family(cursor: &mut TokenCursor) -> Option<Value> {
    let mut families = Vec::new();
    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::String(s) => {
                let _ = cursor.advance();
                families.push(s);
            }
            CSSToken::Ident(_) => {
                let mut words = Vec::new();
                while let CSSToken::Ident(word) = cursor.peek().clone() {
                    let _ = cursor.advance();
                    words.push(word);
                    cursor.skip_one_whitespace();
                    if !matches!(cursor.peek(), CSSToken::Ident(_)) {
                        break;
                    }
                }
                if words.is_empty() {
                    return None;
                }
                families.push(words.join(" "));
            }
            _ => break,
        }
        cursor.skip_whitespace();
        if matches!(cursor.peek(), CSSToken::Comma) {
            let _ = cursor.advance();
            continue;
        }
        break;
    }
    if families.is_empty() {
        None
    } else {
        Some(Value::FontFamilyList(families))
    }
}

fn parse_font_weight(cursor: &mut TokenCursor) -> Option<Value> {
    cursor.skip_whitespace();
    match cursor.peek().clone() {
        CSSToken::Ident(word) => {
            let value = match word.to_ascii_lowercase().as_str() {
                "normal" => FontWeight::Absolute(400),
                "bold" => FontWeight::Absolute(700),
                "bolder" => FontWeight::Bolder,
                "lighter" => FontWeight::Lighter,
                _ => return None,
            };
            let _ = cursor.advance();
            Some(Value::FontWeight(value))
        }
        CSSToken::Number { value, int_value: Some(i), .. } if (1..=1000).contains(&i) => {
            let _ = value;
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let weight = i as u16;
            let _ = cursor.advance();
            Some(Value::FontWeight(FontWeight::Absolute(weight)))
        }
        _ => None,
    }
}

fn parse_integer(cursor: &mut TokenCursor) -> Option<Value> {
    cursor.skip_whitespace();
    match cursor.peek().clone() {
        CSSToken::Number { int_value: Some(i), .. } => {
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            let v = i as i32;
            Some(Value::Integer(v))
        }
        CSSToken::Ident(word) if word.eq_ignore_ascii_case("auto") => {
            let _ = cursor.advance();
            Some(Value::Integer(-1))
        }
        _ => None,
    }
}

/// Detect a trailing `!important` (case-insensitive, optional whitespace
/// around and inside it). If `!` is present but not followed by
/// `important`, the `!` is still consumed as part of this malformed tail;
/// the caller's ordinary `next_property` resync on the following loop
/// iteration absorbs whatever remains before the next `;`/`}`.
fn parse_important(cursor: &mut TokenCursor) -> bool {
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::Delim('!')) {
        return false;
    }
    let _ = cursor.advance();
    cursor.skip_whitespace();
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        if word.eq_ignore_ascii_case("important") {
            let _ = cursor.advance();
            return true;
        }
    }
    false
}

fn expand_shorthand(shorthand: Shorthand, cursor: &mut TokenCursor, importance: Importance, out: &mut Vec<DeclarationEntry>) {
    match shorthand {
        Shorthand::Margin => {
            if let Some([top, right, bottom, left]) = parse_trbl_lengths(cursor, MARGIN_FLAGS) {
                push_length(out, Property::MarginTop, top, importance);
                push_length(out, Property::MarginRight, right, importance);
                push_length(out, Property::MarginBottom, bottom, importance);
                push_length(out, Property::MarginLeft, left, importance);
            }
        }
        Shorthand::Padding => {
            if let Some([top, right, bottom, left]) = parse_trbl_lengths(cursor, PADDING_FLAGS) {
                push_length(out, Property::PaddingTop, top, importance);
                push_length(out, Property::PaddingRight, right, importance);
                push_length(out, Property::PaddingBottom, bottom, importance);
                push_length(out, Property::PaddingLeft, left, importance);
            }
        }
        Shorthand::Border => {
            let side = parse_border_side(cursor);
            for s in [Side::Top, Side::Right, Side::Bottom, Side::Left] {
                push_border_side(out, s, side, importance);
            }
        }
        Shorthand::BorderSide(side) => {
            let value = parse_border_side(cursor);
            push_border_side(out, side, value, importance);
        }
        Shorthand::BorderWidth => {
            if let Some([top, right, bottom, left]) = parse_trbl_lengths(cursor, LengthAcceptFlags::default()) {
                push_length(out, Property::BorderTopWidth, top, importance);
                push_length(out, Property::BorderRightWidth, right, importance);
                push_length(out, Property::BorderBottomWidth, bottom, importance);
                push_length(out, Property::BorderLeftWidth, left, importance);
            }
        }
        Shorthand::BorderStyleShorthand => {
            let mut styles = Vec::new();
            while let Some(style) = ident_value(cursor, border_style_keyword) {
                styles.push(style);
                if styles.len() == 4 {
                    break;
                }
            }
            if let Some([top, right, bottom, left]) = expand_trbl(&styles) {
                out.push(DeclarationEntry { property: Property::BorderTopStyle, value: Value::BorderStyle(top), importance });
                out.push(DeclarationEntry { property: Property::BorderRightStyle, value: Value::BorderStyle(right), importance });
                out.push(DeclarationEntry { property: Property::BorderBottomStyle, value: Value::BorderStyle(bottom), importance });
                out.push(DeclarationEntry { property: Property::BorderLeftStyle, value: Value::BorderStyle(left), importance });
            }
        }
        Shorthand::BorderColor => {
            let mut colors = Vec::new();
            loop {
                cursor.skip_whitespace();
                let Some(color) = parse_color(cursor) else { break };
                colors.push(color);
                if colors.len() == 4 {
                    break;
                }
            }
            if let Some([top, right, bottom, left]) = expand_trbl(&colors) {
                out.push(DeclarationEntry { property: Property::BorderTopColor, value: Value::Color(top), importance });
                out.push(DeclarationEntry { property: Property::BorderRightColor, value: Value::Color(right), importance });
                out.push(DeclarationEntry { property: Property::BorderBottomColor, value: Value::Color(bottom), importance });
                out.push(DeclarationEntry { property: Property::BorderLeftColor, value: Value::Color(left), importance });
            }
        }
        Shorthand::Background => {
            let value = parse_background(cursor);
            if let Some(color) = value.color {
                out.push(DeclarationEntry { property: Property::BackgroundColor, value: Value::Color(color), importance });
            }
            if let Some(url) = value.image_url {
                out.push(DeclarationEntry { property: Property::BackgroundImage, value: Value::FontFamilyList(vec![url]), importance });
            }
            if let Some(repeat) = value.repeat {
                out.push(DeclarationEntry { property: Property::BackgroundRepeat, value: Value::BackgroundRepeat(repeat), importance });
            }
            if let Some((x, y)) = value.position {
                out.push(DeclarationEntry { property: Property::BackgroundPositionX, value: Value::Length(x), importance });
                out.push(DeclarationEntry { property: Property::BackgroundPositionY, value: Value::Length(y), importance });
            }
        }
        Shorthand::ListStyle => {
            let value = parse_list_style(cursor);
            if let Some(kind) = value.kind {
                out.push(DeclarationEntry { property: Property::ListStyleType, value: Value::ListStyleType(kind), importance });
            }
            if let Some(position) = value.position {
                out.push(DeclarationEntry { property: Property::ListStylePosition, value: Value::ListStylePosition(position), importance });
            }
        }
    }
}

fn push_length(out: &mut Vec<DeclarationEntry>, property: Property, length: Length, importance: Importance) {
    out.push(DeclarationEntry { property, value: Value::Length(length), importance });
}

fn push_border_side(out: &mut Vec<DeclarationEntry>, side: Side, value: BorderSideValue, importance: Importance) {
    let (width_prop, style_prop, color_prop) = match side {
        Side::Top => (Property::BorderTopWidth, Property::BorderTopStyle, Property::BorderTopColor),
        Side::Right => (Property::BorderRightWidth, Property::BorderRightStyle, Property::BorderRightColor),
        Side::Bottom => (Property::BorderBottomWidth, Property::BorderBottomStyle, Property::BorderBottomColor),
        Side::Left => (Property::BorderLeftWidth, Property::BorderLeftStyle, Property::BorderLeftColor),
    };
    out.push(DeclarationEntry { property: width_prop, value: Value::Length(value.width), importance });
    out.push(DeclarationEntry { property: style_prop, value: Value::BorderStyle(value.style), importance });
    let color = value.color.unwrap_or(Color::rgb(0, 0, 0));
    out.push(DeclarationEntry { property: color_prop, value: Value::Color(color), importance });
}

/// `-cr-only-if`'s needed context: which [`vellum_dom::DocumentFormat`] the
/// block is being compiled against, for resolving static guards eagerly.
pub struct CompileContext {
    /// The document format static `-cr-only-if` guards are checked against.
    pub format: vellum_dom::DocumentFormat,
}

/// Compile a declaration block's body (spec §4.3): the cursor must be
/// positioned just past the opening `{`. Consumes up to and including the
/// matching `}`.
///
/// Error recovery follows the two-tier policy: a single malformed
/// declaration is skipped via [`TokenCursor::next_property`] without
/// affecting any other declaration in the block; this function itself
/// never fails, since an entirely malformed block still produces *some*
/// (possibly empty) [`Declaration`] once brace balance is restored.
#[must_use]
pub fn compile_declaration_block(cursor: &mut TokenCursor, ctx: &CompileContext) -> Declaration {
    let mut entries = Vec::new();

    loop {
        cursor.skip_whitespace();
        match cursor.peek() {
            CSSToken::RightBrace => {
                let _ = cursor.advance();
                break;
            }
            CSSToken::Eof => break,
            CSSToken::Semicolon => {
                let _ = cursor.advance();
                continue;
            }
            _ => {}
        }

        let Some(consumed) = compile_one_declaration(cursor, ctx, &mut entries) else {
            let _ = cursor.next_property();
            continue;
        };
        if !consumed {
            let _ = cursor.next_property();
        }
    }

    Declaration { entries }
}

/// Returns `None` if the property name itself could not be recognised as
/// an ident followed by `:` (caller must resync); `Some(true)` if a value
/// was parsed (the cursor may or may not yet be at `;`/`}` — caller still
/// resyncs defensively); `Some(false)` if the name parsed but the value
/// did not.
fn compile_one_declaration(cursor: &mut TokenCursor, ctx: &CompileContext, entries: &mut Vec<DeclarationEntry>) -> Option<bool> {
    let CSSToken::Ident(name) = cursor.peek().clone() else {
        return None;
    };
    let _ = cursor.advance();
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::Colon) {
        return None;
    }
    let _ = cursor.advance();
    cursor.skip_whitespace();

    let lower = name.to_ascii_lowercase();

    if lower == "-cr-only-if" {
        return Some(compile_cr_only_if(cursor, ctx, entries));
    }

    if let Some(shorthand) = shorthand_keyword(&lower) {
        let before = entries.len();
        expand_shorthand(shorthand, cursor, Importance::None, entries);
        let important = parse_important(cursor);
        if important {
            for entry in &mut entries[before..] {
                entry.importance = Importance::Author;
            }
        }
        return Some(entries.len() > before);
    }

    let Some(property) = property_keyword(&lower) else {
        return Some(false);
    };
    let Some(value) = parse_simple_value(cursor, property) else {
        return Some(false);
    };
    let importance = if parse_important(cursor) { Importance::Author } else { Importance::None };
    entries.push(DeclarationEntry { property, value, importance });
    Some(true)
}

fn compile_cr_only_if(cursor: &mut TokenCursor, ctx: &CompileContext, entries: &mut Vec<DeclarationEntry>) -> bool {
    match parse_cr_only_if(cursor, ctx.format) {
        Some(guards) if !guards.is_empty() => {
            entries.push(DeclarationEntry {
                property: Property::CrOnlyIf,
                value: Value::CrOnlyIf(guards),
                importance: Importance::None,
            });
            true
        }
        Some(_) => true, // only-static guards, all satisfied: nothing left to track
        None => {
            // A static guard failed: the spec drops the *entire* enclosing
            // declaration, not just this one property. The caller has no
            // block-level abort mechanism here, so the practical equivalent
            // is to drop every entry parsed so far in this block and mark
            // the rest unreachable by consuming straight to `}`.
            entries.clear();
            while !matches!(cursor.peek(), CSSToken::RightBrace | CSSToken::Eof) {
                let _ = cursor.advance();
            }
            true
        }
    }
}

/// Check whether a single `property: value` pair — as it appears inside an
/// `@supports (...)` condition — names a property this engine recognises and
/// can parse the given value for. Consumes the declaration's tokens but not
/// a trailing `)`.
#[must_use]
pub fn supports_declaration(cursor: &mut TokenCursor, ctx: &CompileContext) -> bool {
    let mut entries = Vec::new();
    matches!(compile_one_declaration(cursor, ctx, &mut entries), Some(true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;
    use vellum_dom::DocumentFormat;

    fn compile(src: &str) -> Declaration {
        let full = format!("{{{src}}}");
        let tokens = CSSTokenizer::new(&full).tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let _ = cursor.advance(); // past '{'
        let ctx = CompileContext { format: DocumentFormat::Flat };
        compile_declaration_block(&mut cursor, &ctx)
    }

    #[test]
    fn margin_shorthand_expands_to_trbl_scenario_s4() {
        let decl = compile("margin: 1px 2px 3px;");
        let get = |p: Property| decl.entries.iter().find(|e| e.property == p).unwrap();
        let Value::Length(top) = get(Property::MarginTop).value else { panic!() };
        let Value::Length(right) = get(Property::MarginRight).value else { panic!() };
        let Value::Length(bottom) = get(Property::MarginBottom).value else { panic!() };
        let Value::Length(left) = get(Property::MarginLeft).value else { panic!() };
        assert_eq!(top, Length::px(1.0));
        assert_eq!(right, Length::px(2.0));
        assert_eq!(bottom, Length::px(3.0));
        assert_eq!(left, Length::px(2.0));
    }

    #[test]
    fn malformed_declaration_is_skipped_without_affecting_siblings() {
        let decl = compile("color: ;; display: block;");
        assert!(decl.entries.iter().any(|e| matches!(e.value, Value::Display(Display::Block))));
    }

    #[test]
    fn important_marks_author_importance() {
        let decl = compile("color: red !important;");
        assert_eq!(decl.entries[0].importance, Importance::Author);
    }

    #[test]
    fn important_is_case_insensitive_with_optional_whitespace() {
        let decl = compile("color: red ! IMPORTANT;");
        assert_eq!(decl.entries[0].importance, Importance::Author);
    }

    #[test]
    fn unknown_property_is_silently_dropped() {
        let decl = compile("frobnicate: wat; color: blue;");
        assert_eq!(decl.entries.len(), 1);
        assert_eq!(decl.entries[0].property, Property::Color);
    }

    #[test]
    fn failing_static_only_if_drops_whole_block() {
        let decl = compile("color: red; -cr-only-if: fragmented-container; display: block;");
        assert!(decl.entries.is_empty());
    }
}
