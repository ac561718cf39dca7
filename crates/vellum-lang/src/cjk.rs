//! CJK fullwidth-punctuation classification and width-adjustment tables
//! (spec §3 `TextLangCfg.cjk_width_adjustment_table`, §4.8.5, §9 "Unicode
//! operations").
//!
//! Grounded on `textlang.h`'s `cjk_type_t`/`getCJKCharType` (the classifier
//! is script-agnostic; only how adjacent classes interact depends on the
//! language, via [`CjkWidthAdjustmentTable`]). The source's own numeric
//! width-adjustment table was not present in the retrieved excerpt of
//! `textlang.cpp`; DESIGN.md records this table's values as a documented
//! construction from the class semantics `textlang.h` does give (adjacent
//! closing+opening brackets, and punctuation next to fullwidth space, are
//! the classic "half advance can be shared" jlreq cases), not a verbatim
//! port of unseen source numbers.

/// Fullwidth CJK punctuation classes, based on jlreq
/// (<https://www.w3.org/TR/jlreq/#character_classes>), mirroring `cjk_type_t`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CjkType {
    /// Anything not specifically handled; keeps its initial width.
    Other = 0,
    /// Start of a line.
    StartOfLine,
    /// End of a line.
    EndOfLine,
    /// Fullwidth quotation mark or apostrophe (ambiguous open/close).
    AmbiguousQuote,
    /// jlreq cl-01: opening parenthesis, left quotation mark, ...
    OpeningBracket,
    /// jlreq cl-02: closing parenthesis, right quotation mark, ...
    ClosingBracket,
    /// jlreq cl-04: single/double exclamation and question mark.
    DividingPunct,
    /// jlreq cl-05: colon, semicolon, middle dot.
    MiddleDot,
    /// jlreq cl-06: ideographic full stop, ASCII full stop.
    FullStop,
    /// jlreq cl-07: ideographic comma, ASCII comma.
    Comma,
    /// jlreq cl-14: fullwidth ideographic space.
    FullwidthSpace,
}

/// Number of [`CjkType`] variants; the width-adjustment table is square with
/// this side length.
pub const CJK_TYPE_COUNT: usize = 11;

impl CjkType {
    const fn index(self) -> usize {
        self as u8 as usize
    }
}

/// Classify a fullwidth CJK character's punctuation role (`getCJKCharType`).
///
/// Also recognises the four non-CJK curly-quote codepoints
/// (U+2018/2019/201C/201D) as opening/closing brackets: when rendered in a
/// CJK font they commonly receive a fullwidth glyph, so typography that
/// adjusts for neighbouring fullwidth punctuation should treat them the
/// same way.
#[must_use]
pub fn classify(ch: char) -> CjkType {
    let cp = ch as u32;
    if (0x3000..=0x30FB).contains(&cp) {
        return match cp {
            0x3000 => CjkType::FullwidthSpace,
            0x3001 => CjkType::Comma,
            0x3002 => CjkType::FullStop,
            0x30FB => CjkType::MiddleDot,
            0x3009 | 0x300B | 0x300D | 0x300F | 0x3011 | 0x3015 | 0x3017 | 0x3019 | 0x301B
            | 0x301E | 0x301F => CjkType::ClosingBracket,
            0x3008 | 0x300A | 0x300C | 0x300E | 0x3010 | 0x3014 | 0x3016 | 0x3018 | 0x301A
            | 0x301D => CjkType::OpeningBracket,
            _ => CjkType::Other,
        };
    }
    if (0xFF01..=0xFF60).contains(&cp) {
        return match cp {
            0xFF01 | 0xFF1F => CjkType::DividingPunct,
            0xFF0C => CjkType::Comma,
            0xFF0E => CjkType::FullStop,
            0xFF1A | 0xFF1B => CjkType::MiddleDot,
            0xFF09 | 0xFF3D | 0xFF5D | 0xFF60 => CjkType::ClosingBracket,
            0xFF08 | 0xFF3B | 0xFF5B | 0xFF5F => CjkType::OpeningBracket,
            0xFF02 | 0xFF07 => CjkType::AmbiguousQuote,
            _ => CjkType::Other,
        };
    }
    if (0x2018..=0x201D).contains(&cp) {
        return match cp {
            0x2019 | 0x201D => CjkType::ClosingBracket,
            0x2018 | 0x201C => CjkType::OpeningBracket,
            _ => CjkType::Other,
        };
    }
    CjkType::Other
}

/// A 11x11 table of per-language width-adjustment percentages (spec: "a
/// 10x10 CJK width-adjustment table"; the source's own `cjk_type_t` has 11
/// variants, so this port uses the exact class count rather than rounding
/// down). Entry `[current][other]` gives the percent by which `current`'s
/// advance may be reduced when immediately followed by a glyph of class
/// `other` (0 = no adjustment).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CjkWidthAdjustmentTable(pub [[i8; CJK_TYPE_COUNT]; CJK_TYPE_COUNT]);

impl CjkWidthAdjustmentTable {
    /// Look up the adjustment percentage for a `(current, other)` pair
    /// (`TextLangCfg::getCJKWidthAdjustment`).
    #[must_use]
    pub fn get(&self, current: CjkType, other: CjkType) -> i8 {
        self.0[current.index()][other.index()]
    }

    const fn set(mut self, a: CjkType, b: CjkType, percent: i8) -> Self {
        self.0[a.index()][b.index()] = percent;
        self
    }

    const fn symmetric(self, a: CjkType, b: CjkType, percent: i8) -> Self {
        self.set(a, b, percent).set(b, a, percent)
    }
}

const ZERO_TABLE: CjkWidthAdjustmentTable =
    CjkWidthAdjustmentTable([[0; CJK_TYPE_COUNT]; CJK_TYPE_COUNT]);

/// Adjustments shared by every CJK typographic convention: two adjacent
/// brackets/punctuation marks that each carry visual whitespace in their
/// advance (a closing bracket followed by an opening one, a comma/full-stop
/// followed by another punctuation mark) can have that shared whitespace
/// collapsed by half, per jlreq's "clustered punctuation" guidance.
const fn base_table() -> CjkWidthAdjustmentTable {
    ZERO_TABLE
        .symmetric(CjkType::ClosingBracket, CjkType::OpeningBracket, 50)
        .symmetric(CjkType::ClosingBracket, CjkType::ClosingBracket, 50)
        .symmetric(CjkType::OpeningBracket, CjkType::OpeningBracket, 50)
        .symmetric(CjkType::Comma, CjkType::Comma, 50)
        .symmetric(CjkType::FullStop, CjkType::FullStop, 50)
        .symmetric(CjkType::Comma, CjkType::FullStop, 50)
        .symmetric(CjkType::Comma, CjkType::ClosingBracket, 50)
        .symmetric(CjkType::FullStop, CjkType::ClosingBracket, 50)
        .symmetric(CjkType::MiddleDot, CjkType::MiddleDot, 50)
}

/// Default (non-CJK) table: no adjustments, since Latin text has no
/// fullwidth punctuation to cluster.
pub const DEFAULT_TABLE: CjkWidthAdjustmentTable = ZERO_TABLE;

/// Japanese typographic convention: jlreq additionally tightens a dividing
/// punctuation mark (`！`/`？`) followed by a closing bracket, and a
/// fullwidth space adjacent to any bracket.
pub const JAPANESE_TABLE: CjkWidthAdjustmentTable = base_table()
    .symmetric(CjkType::DividingPunct, CjkType::ClosingBracket, 50)
    .symmetric(CjkType::FullwidthSpace, CjkType::OpeningBracket, 50)
    .symmetric(CjkType::FullwidthSpace, CjkType::ClosingBracket, 50);

/// Simplified Chinese convention: shares the base clustering rules; GB
/// typesetting does not customarily tighten dividing punctuation the way
/// jlreq does for Japanese.
pub const ZH_SC_TABLE: CjkWidthAdjustmentTable = base_table();

/// Traditional Chinese convention: identical to simplified for the
/// adjustments this table tracks (both follow the same clustered-punctuation
/// convention; they differ in which exact glyphs are in use, not in this
/// table's shape).
pub const ZH_TC_TABLE: CjkWidthAdjustmentTable = base_table();

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_ideographic_punctuation() {
        assert_eq!(classify('\u{3000}'), CjkType::FullwidthSpace);
        assert_eq!(classify('\u{3001}'), CjkType::Comma);
        assert_eq!(classify('\u{3002}'), CjkType::FullStop);
        assert_eq!(classify('\u{300C}'), CjkType::OpeningBracket);
        assert_eq!(classify('\u{300D}'), CjkType::ClosingBracket);
    }

    #[test]
    fn classifies_fullwidth_ascii_forms() {
        assert_eq!(classify('\u{FF0C}'), CjkType::Comma);
        assert_eq!(classify('\u{FF01}'), CjkType::DividingPunct);
        assert_eq!(classify('\u{FF08}'), CjkType::OpeningBracket);
    }

    #[test]
    fn classifies_curly_quotes_as_brackets() {
        assert_eq!(classify('\u{2018}'), CjkType::OpeningBracket);
        assert_eq!(classify('\u{2019}'), CjkType::ClosingBracket);
        assert_eq!(classify('\u{2014}'), CjkType::Other);
    }

    #[test]
    fn default_table_has_no_adjustment() {
        assert_eq!(
            DEFAULT_TABLE.get(CjkType::ClosingBracket, CjkType::OpeningBracket),
            0
        );
    }

    #[test]
    fn japanese_table_tightens_adjacent_brackets() {
        assert_eq!(
            JAPANESE_TABLE.get(CjkType::ClosingBracket, CjkType::OpeningBracket),
            50
        );
        assert_eq!(
            JAPANESE_TABLE.get(CjkType::OpeningBracket, CjkType::ClosingBracket),
            50
        );
    }
}
