//! The per–lang-tag configuration object and its document-lifetime cache
//! (spec §3 `TextLangCfg`, §4.8 "Language registry", C8).
//!
//! Grounded on `TextLangMan`/`TextLangCfg` in `textlang.h`/`textlang.cpp`.
//! Per the Design Notes, the source's process-global `TextLangMan` statics
//! (main language, embedded-langs toggle, hyphenation overrides) are not
//! reproduced as Rust statics: they live on [`vellum_common::EngineConfig`]
//! and are threaded in explicitly, and [`LangRegistry`] plays the role of
//! `TextLangMan::_lang_cfg_list` alone — a per-document cache, not a process
//! singleton.

use std::rc::Rc;

use vellum_common::EngineConfig;

use crate::cjk::{self, CjkWidthAdjustmentTable};
use crate::hyphenate::method::HyphMethod;
use crate::hyphenate::{DictionaryLoader, DictionaryRegistry};
use crate::linebreak::{self, CharSubFn, LineBreakOverride};
use crate::quotes;

/// Quote nesting is tracked modulo 2 (level-1/level-2 alternation); a
/// counter is kept rather than a flag so `getOpeningQuote`/`getClosingQuote`
/// can be called in any order a document's nested `<q>`s require.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct QuoteNesting(i32);

/// Per-language configuration resolved once per `lang` tag seen in a
/// document and cached for its lifetime (spec §3 `TextLangCfg`).
///
/// Quote nesting state is interior-mutable ([`std::cell::Cell`]) because
/// `getOpeningQuote`/`getClosingQuote` mutate a running nesting counter as a
/// side effect of being called, exactly as the source's methods do, while
/// every other field is fixed at construction time and shared (via the
/// registry's `Rc`) across every run of text that resolves to this
/// language.
#[derive(Debug)]
pub struct TextLangCfg {
    lang_tag: String,
    hyph_method: Rc<dyn HyphMethod>,
    quotes: quotes::QuoteSpec,
    quote_nesting: std::cell::Cell<QuoteNesting>,
    line_break_overrides: Vec<LineBreakOverride>,
    char_sub_fn: Option<CharSubFn>,
    duplicate_hyphen_on_next_line: bool,
    is_japanese: bool,
    is_zh_sc: bool,
    is_zh_tc: bool,
    is_ja_or_zh: bool,
    cjk_width_adjustment_table: CjkWidthAdjustmentTable,
}

impl TextLangCfg {
    fn new(lang_tag: &str, hyph_method: Rc<dyn HyphMethod>) -> Self {
        let folded = lang_tag.to_ascii_lowercase();
        let quotes = quotes::lookup(&folded);
        let is_japanese = folded.starts_with("ja");
        let is_zh_tc = folded.starts_with("zh-hant") || folded.starts_with("zh-tw") || folded.starts_with("yue");
        let is_zh_sc = folded.starts_with("zh") && !is_zh_tc;
        let is_ja_or_zh = is_japanese || folded.starts_with("zh") || folded.starts_with("yue");

        let cjk_width_adjustment_table = if is_japanese {
            cjk::JAPANESE_TABLE
        } else if is_zh_tc {
            cjk::ZH_TC_TABLE
        } else if is_zh_sc {
            cjk::ZH_SC_TABLE
        } else {
            cjk::DEFAULT_TABLE
        };

        Self {
            lang_tag: lang_tag.to_string(),
            hyph_method,
            quotes,
            quote_nesting: std::cell::Cell::new(QuoteNesting::default()),
            line_break_overrides: linebreak::overrides_for_lang(&folded),
            char_sub_fn: linebreak::char_sub_fn_for_lang(&folded),
            duplicate_hyphen_on_next_line: linebreak::duplicates_hyphen_on_next_line(&folded),
            is_japanese,
            is_zh_sc,
            is_zh_tc,
            is_ja_or_zh,
            cjk_width_adjustment_table,
        }
    }

    /// The lang tag this configuration was built for (kept in its original,
    /// non-lowercased form, same as the source's `_lang_tag`).
    #[must_use]
    pub fn lang_tag(&self) -> &str {
        &self.lang_tag
    }

    /// The hyphenation method this language resolved to, subject to any
    /// [`EngineConfig`] override (soft-hyphens-only, force-algorithmic, or
    /// hyphenation disabled entirely) applied by the caller — callers should
    /// go through [`LangRegistry::hyph_method_for`] rather than this
    /// accessor directly, since the override is a registry-level (not a
    /// per-`TextLangCfg`) concern in this port.
    #[must_use]
    pub fn default_hyph_method(&self) -> &Rc<dyn HyphMethod> {
        &self.hyph_method
    }

    /// The opening quote for the current nesting level, advancing the
    /// nesting counter as a side effect (`getOpeningQuote`). Odd nesting
    /// depths use the level-1 pair, even depths the level-2 pair.
    pub fn opening_quote(&self) -> char {
        let mut n = self.quote_nesting.get();
        n.0 += 1;
        self.quote_nesting.set(n);
        if n.0 % 2 != 0 { self.quotes.open1 } else { self.quotes.open2 }
    }

    /// The closing quote for the current nesting level, retreating the
    /// nesting counter as a side effect (`getClosingQuote`).
    pub fn closing_quote(&self) -> char {
        let mut n = self.quote_nesting.get();
        n.0 -= 1;
        self.quote_nesting.set(n);
        if (n.0 + 1) % 2 != 0 { self.quotes.close1 } else { self.quotes.close2 }
    }

    /// Reset the quote-nesting counter to zero (source:
    /// `TextLangCfg::resetCounters`, called between unrelated paragraphs per
    /// spec §6 scenario S6).
    pub fn reset_quote_nesting(&self) {
        self.quote_nesting.set(QuoteNesting::default());
    }

    /// The language's line-break property overrides (spec §3).
    #[must_use]
    pub fn line_break_overrides(&self) -> &[LineBreakOverride] {
        &self.line_break_overrides
    }

    /// The language's character-substitution hook, if it has one.
    #[must_use]
    pub fn char_substitution_fn(&self) -> Option<CharSubFn> {
        self.char_sub_fn
    }

    /// Whether a real (non-soft) hyphen at line end should be duplicated at
    /// the start of the next line for this language.
    #[must_use]
    pub fn duplicate_hyphen_on_next_line(&self) -> bool {
        self.duplicate_hyphen_on_next_line
    }

    /// Whether this is Japanese.
    #[must_use]
    pub fn is_japanese(&self) -> bool {
        self.is_japanese
    }

    /// Whether this is Simplified Chinese.
    #[must_use]
    pub fn is_simplified_chinese(&self) -> bool {
        self.is_zh_sc
    }

    /// Whether this is Traditional Chinese.
    #[must_use]
    pub fn is_traditional_chinese(&self) -> bool {
        self.is_zh_tc
    }

    /// Whether this is Japanese or any variant of Chinese — the coarser
    /// check `getCssLbCharSub` uses for rules shared across all CJK
    /// typography rather than split per-script.
    #[must_use]
    pub fn is_ja_or_zh(&self) -> bool {
        self.is_ja_or_zh
    }

    /// The CJK width-adjustment table for this language (spec §3, §4.8.5).
    #[must_use]
    pub fn cjk_width_adjustment_table(&self) -> &CjkWidthAdjustmentTable {
        &self.cjk_width_adjustment_table
    }
}

/// A small LRU-ordered cache of [`TextLangCfg`] objects, one per distinct
/// `lang` tag encountered in a document, plus the shared hyphenation
/// dictionary registry that creates new entries (spec §3 "Ownership &
/// lifecycle", §5 "recently used moved to front").
///
/// This plays the document-scoped role of the source's process-global
/// `TextLangMan::_lang_cfg_list`; callers own one `LangRegistry` per open
/// document rather than reading a shared static.
pub struct LangRegistry {
    /// Most-recently-used first.
    entries: Vec<Rc<TextLangCfg>>,
    dictionaries: DictionaryRegistry,
}

impl LangRegistry {
    /// Create an empty registry backed by `loader` for dictionary fetches.
    #[must_use]
    pub fn new(loader: Box<dyn DictionaryLoader>) -> Self {
        Self {
            entries: Vec::new(),
            dictionaries: DictionaryRegistry::new(loader),
        }
    }

    /// Resolve `tag` to a cached or newly created [`TextLangCfg`]
    /// (`TextLangMan::getTextLangCfg(lang_tag, force)`). When
    /// `config.embedded_langs_enabled` is `false` and `force` is `false`,
    /// `tag` is ignored in favour of `main_lang` — embedded per-node `lang`
    /// attributes are suppressed document-wide.
    pub fn get(
        &mut self,
        tag: &str,
        main_lang: &str,
        config: &EngineConfig,
        force: bool,
    ) -> Rc<TextLangCfg> {
        let effective_tag = if config.embedded_langs_enabled || force { tag } else { main_lang };
        self.get_exact(effective_tag)
    }

    fn get_exact(&mut self, tag: &str) -> Rc<TextLangCfg> {
        if let Some(pos) = self.entries.iter().position(|e| e.lang_tag() == tag) {
            let entry = self.entries.remove(pos);
            self.entries.insert(0, Rc::clone(&entry));
            return entry;
        }

        let hyph_method = self.dictionaries.method_for_lang(tag);
        let cfg = Rc::new(TextLangCfg::new(tag, hyph_method));
        self.entries.insert(0, Rc::clone(&cfg));
        cfg
    }

    /// The hyphenation method to actually use for `cfg`, applying any
    /// `EngineConfig` override (hyphenation disabled, soft-hyphens-only,
    /// force-algorithmic) ahead of the language's own dictionary-derived
    /// default (`TextLangCfg::getHyphMethod`'s override-checking logic,
    /// moved here since the override lives on `EngineConfig` rather than on
    /// a `TextLangMan` static per the Design Notes).
    #[must_use]
    pub fn hyph_method_for(&self, cfg: &TextLangCfg, config: &EngineConfig) -> Rc<dyn HyphMethod> {
        if !config.hyphenation_enabled {
            Rc::clone(self.dictionaries.no_hyph_method())
        } else if config.hyphenation_soft_hyphens_only {
            Rc::clone(self.dictionaries.soft_hyphens_method())
        } else if config.hyphenation_force_algorithmic {
            Rc::clone(self.dictionaries.algo_hyph_method())
        } else {
            Rc::clone(cfg.default_hyph_method())
        }
    }

    /// Every distinct language tag currently cached, most-recently-used
    /// first (for host "languages seen in this document" UIs).
    #[must_use]
    pub fn seen_tags(&self) -> Vec<&str> {
        self.entries.iter().map(|e| e.lang_tag()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hyphenate::NullDictionaryLoader;

    fn registry() -> LangRegistry {
        LangRegistry::new(Box::new(NullDictionaryLoader))
    }

    #[test]
    fn caches_by_exact_tag() {
        let mut reg = registry();
        let config = EngineConfig { embedded_langs_enabled: true, ..EngineConfig::default() };
        let a = reg.get("fr", "en", &config, false);
        let b = reg.get("fr", "en", &config, false);
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn embedded_langs_disabled_forces_main_lang() {
        let mut reg = registry();
        let config = EngineConfig { embedded_langs_enabled: false, ..EngineConfig::default() };
        let cfg = reg.get("fr", "en", &config, false);
        assert_eq!(cfg.lang_tag(), "en");
    }

    #[test]
    fn force_bypasses_embedded_langs_disabled() {
        let mut reg = registry();
        let config = EngineConfig { embedded_langs_enabled: false, ..EngineConfig::default() };
        let cfg = reg.get("fr", "en", &config, true);
        assert_eq!(cfg.lang_tag(), "fr");
    }

    #[test]
    fn quote_nesting_alternates_s6_scenario() {
        let mut reg = registry();
        let config = EngineConfig { embedded_langs_enabled: true, ..EngineConfig::default() };
        let cfg = reg.get("fr", "fr", &config, false);
        assert_eq!(cfg.opening_quote(), '\u{00ab}');
        assert_eq!(cfg.opening_quote(), '\u{201c}');
        assert_eq!(cfg.closing_quote(), '\u{201d}');
        assert_eq!(cfg.closing_quote(), '\u{00bb}');
        cfg.reset_quote_nesting();
        assert_eq!(cfg.opening_quote(), '\u{00ab}');
    }

    #[test]
    fn recently_used_moves_to_front() {
        let mut reg = registry();
        let config = EngineConfig { embedded_langs_enabled: true, ..EngineConfig::default() };
        let _ = reg.get("en", "en", &config, false);
        let _ = reg.get("fr", "en", &config, false);
        assert_eq!(reg.seen_tags(), vec!["fr", "en"]);
        let _ = reg.get("en", "en", &config, false);
        assert_eq!(reg.seen_tags(), vec!["en", "fr"]);
    }

    #[test]
    fn japanese_flags_and_cjk_table() {
        let mut reg = registry();
        let config = EngineConfig { embedded_langs_enabled: true, ..EngineConfig::default() };
        let cfg = reg.get("ja", "en", &config, false);
        assert!(cfg.is_japanese());
        assert!(cfg.is_ja_or_zh());
        assert!(!cfg.is_simplified_chinese());
    }
}
