//! Per-language opening/closing quotation-mark pairs (spec §3
//! `TextLangCfg.opening_quotes`/`closing_quotes`, §4.8.2, §6 scenario S6).
//!
//! Grounded verbatim on `textlang.cpp`'s `_quotes_spec_table`, built from
//! <https://html.spec.whatwg.org/multipage/rendering.html#quotes> (snapshot
//! dated 2020-06-01 in a source comment). Lookup is longest-matching-prefix
//! over the lowercased language tag, same as `langStartsWith` in the source.

/// One language's CSS `quotes` property equivalent: the level-1 (outer) and
/// level-2 (nested) opening/closing pairs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuoteSpec {
    /// BCP-47 prefix this entry matches (lowercased, longest-match-first in
    /// the table; never matched exactly, only as an ASCII-case-insensitive
    /// prefix of the subject tag).
    pub lang_prefix: &'static str,
    /// Level-1 (outermost) opening quote.
    pub open1: char,
    /// Level-1 (outermost) closing quote.
    pub close1: char,
    /// Level-2 (first nesting) opening quote.
    pub open2: char,
    /// Level-2 (first nesting) closing quote.
    pub close2: char,
}

/// Default quotes (English) used when no table entry's prefix matches.
pub const DEFAULT_QUOTES: QuoteSpec = QuoteSpec {
    lang_prefix: "",
    open1: '\u{201c}',
    close1: '\u{201d}',
    open2: '\u{2018}',
    close2: '\u{2019}',
};

/// Find the quote spec for `lang_tag` (already lowercased by the caller),
/// matching the longest table entry whose `lang_prefix` is a prefix of the
/// tag, falling back to [`DEFAULT_QUOTES`].
///
/// The table is ordered so that a longer, more specific prefix (e.g.
/// `"fr-ch"`) is tried before its shorter general form (`"fr"`); the first
/// match wins, mirroring `langStartsWith`'s linear scan in the source.
#[must_use]
pub fn lookup(lang_tag: &str) -> QuoteSpec {
    for entry in QUOTES_TABLE {
        if lang_tag.starts_with(entry.lang_prefix) {
            return entry;
        }
    }
    DEFAULT_QUOTES
}

macro_rules! q {
    ($tag:literal, $o1:literal, $c1:literal, $o2:literal, $c2:literal) => {
        QuoteSpec {
            lang_prefix: $tag,
            open1: $o1,
            close1: $c1,
            open2: $o2,
            close2: $c2,
        }
    };
}

/// Built 2020-06-01 from the WHATWG quotes table; longer/more specific
/// prefixes are listed before their shorter general form.
pub const QUOTES_TABLE: &[QuoteSpec] = &[
    q!("af", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("agq", '\u{201e}', '\u{201d}', '\u{201a}', '\u{2019}'),
    q!("ak", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("am", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("ar", '\u{201d}', '\u{201c}', '\u{2019}', '\u{2018}'),
    q!("asa", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ast", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("az-cyrl", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("az", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("bas", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201c}'),
    q!("bem", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("bez", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("be", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201c}'),
    q!("bg", '\u{201e}', '\u{201c}', '\u{2018}', '\u{2019}'),
    q!("bm", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("bn", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("brx", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("br", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("bs-cyrl", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("bs", '\u{201e}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ca", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("cgg", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("chr", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("cs", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("cy", '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}'),
    q!("dav", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("da", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("de", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("dje", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("dsb", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("dua", '\u{00ab}', '\u{00bb}', '\u{2018}', '\u{2019}'),
    q!("dyo", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("dz", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ebu", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ee", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("el", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("en", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("eo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("es", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("et", '\u{201e}', '\u{201c}', '\u{00ab}', '\u{00bb}'),
    q!("eu", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("ewo", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("fa", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("ff", '\u{201e}', '\u{201d}', '\u{201a}', '\u{2019}'),
    q!("fil", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("fi", '\u{201d}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("fo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("fr-ch", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("fr", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("fur", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("ga", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("gd", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("gl", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("gsw", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("guz", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("gu", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ha", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("he", '\u{201d}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("hi", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("hr", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("hsb", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("hu", '\u{201e}', '\u{201d}', '\u{00bb}', '\u{00ab}'),
    q!("hy", '\u{00ab}', '\u{00bb}', '\u{00ab}', '\u{00bb}'),
    q!("id", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ig", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("is", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("it", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("ja", '\u{300c}', '\u{300d}', '\u{300e}', '\u{300f}'),
    q!("jgo", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("jmc", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("kab", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("kam", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ka", '\u{201e}', '\u{201c}', '\u{2018}', '\u{2019}'),
    q!("kde", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("kea", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("khq", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ki", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("kkj", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("kk", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("kln", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("km", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("kn", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ko", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ksb", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ksf", '\u{00ab}', '\u{00bb}', '\u{2018}', '\u{2019}'),
    q!("ky", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201c}'),
    q!("la-lit", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("la", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("lag", '\u{201d}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("lb", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("lg", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ln", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("lo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("lrc", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("lt", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("luo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("luy", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("lu", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("lv", '\u{201c}', '\u{201d}', '\u{201e}', '\u{201d}'),
    q!("mas", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mer", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mfe", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mgo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mg", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("mk", '\u{201e}', '\u{201c}', '\u{2019}', '\u{2018}'),
    q!("ml", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mn", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mr", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ms", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mt", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mua", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("my", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("mzn", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("naq", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("nb", '\u{00ab}', '\u{00bb}', '\u{2018}', '\u{2019}'),
    q!("nd", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ne", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("nl", '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}'),
    q!("nmg", '\u{201e}', '\u{201d}', '\u{00ab}', '\u{00bb}'),
    q!("nnh", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("nn", '\u{00ab}', '\u{00bb}', '\u{2018}', '\u{2019}'),
    q!("nus", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("nyn", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("oc", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("pa", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("pl", '\u{201e}', '\u{201d}', '\u{00ab}', '\u{00bb}'),
    q!("pms", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("pt-br", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("pt-pt", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("pt", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("rm", '\u{00ab}', '\u{00bb}', '\u{2039}', '\u{203a}'),
    q!("rn", '\u{201d}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("rof", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ro", '\u{201e}', '\u{201d}', '\u{00ab}', '\u{00bb}'),
    q!("ru", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201c}'),
    q!("rwk", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("rw", '\u{00ab}', '\u{00bb}', '\u{2018}', '\u{2019}'),
    q!("sah", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201c}'),
    q!("saq", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("sbp", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("seh", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ses", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("sg", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("shi-latn", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201d}'),
    q!("shi", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201d}'),
    q!("si", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("sk", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("sl", '\u{201e}', '\u{201c}', '\u{201a}', '\u{2018}'),
    q!("sn", '\u{201d}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("so", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("sq", '\u{00ab}', '\u{00bb}', '\u{201c}', '\u{201d}'),
    q!("sr-latn", '\u{201e}', '\u{201c}', '\u{2018}', '\u{2018}'),
    q!("sr", '\u{201e}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("sv", '\u{201d}', '\u{201d}', '\u{2019}', '\u{2019}'),
    q!("sw", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ta", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("teo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("te", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("th", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("ti-er", '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}'),
    q!("tk", '\u{201c}', '\u{201d}', '\u{201c}', '\u{201d}'),
    q!("to", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("tr", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("twq", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("tzm", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("uk", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201c}'),
    q!("ur", '\u{201d}', '\u{201c}', '\u{2019}', '\u{2018}'),
    q!("uz-cyrl", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("uz", '\u{201c}', '\u{201d}', '\u{2019}', '\u{2018}'),
    q!("vai-latn", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("vai", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("vi", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("vun", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("xog", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("yav", '\u{00ab}', '\u{00bb}', '\u{00ab}', '\u{00bb}'),
    q!("yo", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("yue-hans", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("yue", '\u{300c}', '\u{300d}', '\u{300e}', '\u{300f}'),
    q!("zgh", '\u{00ab}', '\u{00bb}', '\u{201e}', '\u{201d}'),
    q!("zh-hant", '\u{300c}', '\u{300d}', '\u{300e}', '\u{300f}'),
    q!("zh", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
    q!("zu", '\u{201c}', '\u{201d}', '\u{2018}', '\u{2019}'),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn french_uses_guillemets_outer_and_curly_inner() {
        let spec = lookup("fr");
        assert_eq!(spec.open1, '\u{00ab}');
        assert_eq!(spec.close1, '\u{00bb}');
        assert_eq!(spec.open2, '\u{201c}');
        assert_eq!(spec.close2, '\u{201d}');
    }

    #[test]
    fn regional_variant_is_more_specific_than_base_tag() {
        let ch_spec = lookup("fr-ch");
        assert_eq!(ch_spec.open2, '\u{2039}');
        let base_spec = lookup("fr-ca");
        assert_eq!(base_spec.open2, '\u{201c}');
    }

    #[test]
    fn unknown_tag_falls_back_to_default() {
        assert_eq!(lookup("xx-unknown"), DEFAULT_QUOTES);
    }

    #[test]
    fn german_uses_low9_opening_quotes() {
        let spec = lookup("de");
        assert_eq!(spec.open1, '\u{201e}');
        assert_eq!(spec.close1, '\u{201c}');
    }
}
