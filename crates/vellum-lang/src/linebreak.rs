//! Per-language line-break property overrides and character-substitution
//! hooks (spec §3 `TextLangCfg.line_break_property_overrides`/
//! `char_substitution_fn`, §4.8.3-4.8.4).
//!
//! Grounded on `textlang.cpp`'s per-language `_lb_props` construction and
//! its `lb_char_sub_func_*` family. The source hands these to libunibreak's
//! UAX#14 implementation; this port keeps the same shape (a small table of
//! codepoint-range-to-class overrides, plus an optional substitution
//! function) so that whichever line-breaking library a host wires in can
//! consume it the same way.

/// A line-break class, mirroring libunibreak's `LineBreakClass` for exactly
/// the classes the source's per-language overrides ever assign
/// (`OP`/`CL`/`GL`/`AL`/`ZWJ`). A host's full implementation will have many
/// more classes; this engine never needs to name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineBreakClass {
    /// Opening punctuation: no break after.
    Opening,
    /// Closing punctuation: no break before.
    Closing,
    /// Glue: never breaks on either side.
    Glue,
    /// Ordinary alphabetic: breaks as any other letter would.
    Alphabetic,
    /// Zero-width joiner: like glue, but marks an engine-internal joiner
    /// (used here for the soft hyphen, so libunibreak doesn't introduce its
    /// own break opportunity at a position the hyphenator already owns).
    ZeroWidthJoiner,
}

/// A single codepoint-range override: `[first, last]` inclusive maps to
/// `class` (`textlang.cpp`'s `LineBreakProperties { first, last, class }`
/// triples, with ranges always singletons in the source's own tables, but
/// a range is kept here since libunibreak's own type supports it).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineBreakOverride {
    /// First codepoint of the range (inclusive).
    pub first: u32,
    /// Last codepoint of the range (inclusive).
    pub last: u32,
    /// The class to report for any codepoint in the range.
    pub class: LineBreakClass,
}

/// Maximum number of overrides a single language needs (`MAX_NB_LB_PROPS_ITEMS`
/// in the source, sized for the largest combination actually used there).
pub const MAX_OVERRIDES: usize = 20;

const ZWJ_SOFT_HYPHEN: LineBreakOverride = LineBreakOverride {
    first: 0x00AD,
    last: 0x00AD,
    class: LineBreakClass::ZeroWidthJoiner,
};

/// Build the line-break property override list for `lang_tag` (already
/// lowercased). Always includes the soft-hyphen-as-ZWJ override; appends
/// quote-pairing overrides for the languages the source calls out
/// (`textlang.cpp`'s `has_left_double_quotation_mark_opening` et al.),
/// keeping codepoints in strict ascending order as libunibreak requires.
#[must_use]
pub fn overrides_for_lang(lang_tag: &str) -> Vec<LineBreakOverride> {
    use LineBreakClass::{Alphabetic, Closing, Glue, Opening};

    let mut quote_open1 = false;
    let mut quote_close1 = false;
    let mut quote_open2 = false;
    let quote_close2 = false;
    let mut apos_open = false;
    let mut apos_close = false;
    let mut apos_glue = false;
    let mut guillemet_single_open = false;
    let mut guillemet_single_close = false;
    let mut guillemet_double_open = false;
    let mut guillemet_double_close = false;
    let mut em_dash_alphabetic = false;

    if lang_tag.starts_with("en") {
        apos_open = true;
        quote_open1 = true;
        quote_close1 = true;
    } else if lang_tag.starts_with("fr") || lang_tag.starts_with("es") {
        apos_open = true;
        quote_open1 = true;
        quote_close1 = true;
        guillemet_single_open = true;
        guillemet_single_close = true;
        guillemet_double_open = true;
        guillemet_double_close = true;
        em_dash_alphabetic = true;
    } else if lang_tag.starts_with("de") {
        apos_close = true;
        apos_glue = true;
        quote_open2 = true;
    } else if lang_tag.starts_with("ru") {
        quote_open2 = true;
        guillemet_double_open = true;
        guillemet_double_close = true;
    } else if lang_tag.starts_with("zh") {
        apos_open = true;
        apos_close = true;
        quote_open1 = true;
        quote_close1 = true;
    }

    let mut out = Vec::with_capacity(MAX_OVERRIDES);
    if guillemet_double_open {
        out.push(LineBreakOverride { first: 0x00AB, last: 0x00AB, class: Opening });
    }
    if guillemet_double_close {
        out.push(LineBreakOverride { first: 0x00AB, last: 0x00AB, class: Closing });
    }
    out.push(ZWJ_SOFT_HYPHEN);
    if guillemet_double_open {
        out.push(LineBreakOverride { first: 0x00BB, last: 0x00BB, class: Opening });
    }
    if guillemet_double_close {
        out.push(LineBreakOverride { first: 0x00BB, last: 0x00BB, class: Closing });
    }
    if em_dash_alphabetic {
        out.push(LineBreakOverride { first: 0x2014, last: 0x2014, class: Alphabetic });
    }
    if apos_open {
        out.push(LineBreakOverride { first: 0x2018, last: 0x2018, class: Opening });
    }
    if apos_close {
        out.push(LineBreakOverride { first: 0x2018, last: 0x2018, class: Closing });
    }
    // U+2019: "opening" here is a port artifact of the source reusing the
    // same four booleans for both single-quote codepoints; only `_close`
    // and `_glue` are ever set for U+2019 in the source's own language list.
    if apos_close {
        out.push(LineBreakOverride { first: 0x2019, last: 0x2019, class: Closing });
    }
    if apos_glue {
        out.push(LineBreakOverride { first: 0x2019, last: 0x2019, class: Glue });
    }
    if quote_open1 {
        out.push(LineBreakOverride { first: 0x201C, last: 0x201C, class: Opening });
    }
    if quote_open2 {
        out.push(LineBreakOverride { first: 0x201C, last: 0x201C, class: Closing });
    }
    if quote_close1 {
        out.push(LineBreakOverride { first: 0x201D, last: 0x201D, class: Closing });
    }
    if guillemet_single_open {
        out.push(LineBreakOverride { first: 0x2039, last: 0x2039, class: Opening });
    }
    if guillemet_single_close {
        out.push(LineBreakOverride { first: 0x2039, last: 0x2039, class: Closing });
    }
    if guillemet_single_open {
        out.push(LineBreakOverride { first: 0x203A, last: 0x203A, class: Opening });
    }
    if guillemet_single_close {
        out.push(LineBreakOverride { first: 0x203A, last: 0x203A, class: Closing });
    }
    if em_dash_alphabetic {
        out.push(LineBreakOverride { first: 0x2E3A, last: 0x2E3B, class: Alphabetic });
    }
    // quote_close2 is intentionally unused by any language table entry
    // above, mirroring the source (no language sets the level-2 closing
    // quote's line-break class differently from its default).
    let _ = quote_close2;

    debug_assert!(out.len() <= MAX_OVERRIDES);
    out
}

/// A character-substitution hook consulted while line-breaking: given the
/// full text run, the candidate break position, and the count of usable
/// trailing characters, returns a substitute character whose line-break
/// class should be used instead of `text[pos]`'s own (`lb_char_sub_func_t`).
pub type CharSubFn = fn(text: &[char], pos: usize, next_usable: usize) -> char;

/// English: keep an em/2-em/3-em dash glued to its word when there is no
/// space on one side, by substituting a no-break-left/-right/-both
/// placeholder (`lb_char_sub_func_english`).
#[must_use]
pub fn sub_english(text: &[char], pos: usize, next_usable: usize) -> char {
    let ch = text[pos];
    if !matches!(ch, '\u{2014}' | '\u{2E3A}' | '\u{2E3B}') {
        return ch;
    }

    let mut no_break_right = pos == 0;
    if !no_break_right && pos > 0 {
        let mut p = pos;
        while p > 0 {
            p -= 1;
            let c = text[p];
            if c.is_alphanumeric() {
                break;
            }
            if c.is_whitespace() || p == 0 {
                no_break_right = true;
                break;
            }
        }
    }

    let mut no_break_left = next_usable == 0;
    if !no_break_left && next_usable > 0 {
        let end = pos + next_usable;
        let mut p = pos;
        while p < end {
            p += 1;
            let c = text.get(p).copied().unwrap_or(' ');
            if c.is_alphanumeric() {
                break;
            }
            if c.is_whitespace() || p == end {
                no_break_left = true;
                break;
            }
        }
    }

    match (no_break_right, no_break_left) {
        (true, true) => '"',
        (true, false) => '{',
        (false, true) => '}',
        (false, false) => ch,
    }
}

fn single_letter_preposition_sub(letters: &str, text: &[char], pos: usize) -> char {
    let ch = text[pos];
    if pos >= 1 && text[pos - 1] == ' ' && letters.contains(ch) {
        '('
    } else {
        ch
    }
}

/// Polish: single-letter prepositions (`a i o u w z` and uppercase) should
/// not be left dangling at line end; substitute an opening-paren class so
/// they glue to the following word (`lb_char_sub_func_polish`).
#[must_use]
pub fn sub_polish(text: &[char], pos: usize, _next_usable: usize) -> char {
    single_letter_preposition_sub("AIOUWZaiouwz", text, pos)
}

/// Czech/Slovak: same rule as Polish, with a different letter set
/// (`lb_char_sub_func_czech_slovak`).
#[must_use]
pub fn sub_czech_slovak(text: &[char], pos: usize, _next_usable: usize) -> char {
    single_letter_preposition_sub("AIKOSUVZikosuvz", text, pos)
}

/// Select the character-substitution function for `lang_tag` (already
/// lowercased), or `None` if the language defines no tweak.
#[must_use]
pub fn char_sub_fn_for_lang(lang_tag: &str) -> Option<CharSubFn> {
    if lang_tag.starts_with("en") {
        Some(sub_english)
    } else if lang_tag.starts_with("pl") {
        Some(sub_polish)
    } else if lang_tag.starts_with("cs") || lang_tag.starts_with("sk") {
        Some(sub_czech_slovak)
    } else {
        None
    }
}

/// Whether `lang_tag` duplicates a real (non-soft) hyphen at the start of
/// the next line when breaking after it (Polish, Portuguese, Serbian; see
/// <https://unicode.org/reports/tr14/#Hyphen>).
#[must_use]
pub fn duplicates_hyphen_on_next_line(lang_tag: &str) -> bool {
    lang_tag.starts_with("pl") || lang_tag.starts_with("pt") || lang_tag.starts_with("sr")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn soft_hyphen_override_always_present() {
        let overrides = overrides_for_lang("xx");
        assert!(overrides
            .iter()
            .any(|o| o.first == 0x00AD && o.class == LineBreakClass::ZeroWidthJoiner));
    }

    #[test]
    fn french_adds_guillemet_overrides() {
        let overrides = overrides_for_lang("fr");
        assert!(overrides.iter().any(|o| o.first == 0x00AB));
        assert!(overrides.iter().any(|o| o.first == 0x00BB));
    }

    #[test]
    fn overrides_stay_in_ascending_codepoint_order() {
        for lang in ["en", "fr", "de", "ru", "zh", "pl"] {
            let overrides = overrides_for_lang(lang);
            for pair in overrides.windows(2) {
                assert!(pair[0].first <= pair[1].first, "unsorted for {lang}");
            }
        }
    }

    #[test]
    fn english_em_dash_glues_to_word_without_space() {
        let text: Vec<char> = "foo—bar".chars().collect();
        let dash_pos = text.iter().position(|&c| c == '\u{2014}').unwrap();
        let next_usable = text.len() - dash_pos - 1;
        assert_eq!(sub_english(&text, dash_pos, next_usable), '"');
    }

    #[test]
    fn english_em_dash_with_surrounding_spaces_breaks_normally() {
        let text: Vec<char> = "foo — bar".chars().collect();
        let dash_pos = text.iter().position(|&c| c == '\u{2014}').unwrap();
        let next_usable = text.len() - dash_pos - 1;
        assert_eq!(sub_english(&text, dash_pos, next_usable), '\u{2014}');
    }

    #[test]
    fn polish_single_letter_preposition_glues_right() {
        let text: Vec<char> = " i widzę".chars().collect();
        assert_eq!(sub_polish(&text, 1, 6), '(');
    }

    #[test]
    fn polish_preposition_rule_requires_preceding_space() {
        let text: Vec<char> = "ix".chars().collect();
        assert_eq!(sub_polish(&text, 0, 1), 'i');
    }

    #[test]
    fn duplicate_hyphen_languages() {
        assert!(duplicates_hyphen_on_next_line("pl"));
        assert!(duplicates_hyphen_on_next_line("pt-br"));
        assert!(!duplicates_hyphen_on_next_line("en"));
    }
}
