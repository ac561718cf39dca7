//! Hyphenation engine (C9): dictionary loading, pattern matching, the
//! algorithmic fallback, soft-hyphen-only mode, and user word list override
//! (spec §4.9).

/// The `HyphMethod` trait and its three built-in, dictionary-free
/// implementations.
pub mod method;
/// Dictionary identifiers and the host-provided loader trait (spec §6.3).
pub mod loader;
/// TeX/Liang pattern store and both recognised on-disk formats.
pub mod pattern;
/// User word-list override, binary-searched ahead of pattern matching.
pub mod wordlist;

use std::collections::HashMap;
use std::rc::Rc;

pub use loader::{DictionaryId, DictionaryLoader, NullDictionaryLoader};
pub use method::HyphMethod;
pub use pattern::PatternHyphMethod;
pub use wordlist::{UserWordList, UserWordListError};

use method::{AlgoHyphMethod, NoHyphMethod, SoftHyphensMethod};
use vellum_common::warning::warn_once;

/// A small per-language-tag lookup table, backed by a host [`DictionaryLoader`],
/// that resolves a BCP-47 tag to a loaded [`HyphMethod`] (the piece of
/// `HyphMan` that [`crate::registry::LangRegistry`] delegates dictionary
/// fetches to; the language-config caching itself lives on
/// `LangRegistry`, not here).
///
/// Construction of the language→dictionary-id mapping is host policy in the
/// source (`HyphDictionaryList`, populated from a descriptor file the host
/// ships); this port exposes [`DictionaryRegistry::set_dictionary_for_lang`]
/// for a host to populate that mapping instead of parsing a fixed file
/// format no host is guaranteed to provide.
pub struct DictionaryRegistry {
    loader: Box<dyn DictionaryLoader>,
    lang_to_dict: HashMap<String, String>,
    loaded: HashMap<String, Rc<dyn HyphMethod>>,
    no_hyph: Rc<dyn HyphMethod>,
    algo_hyph: Rc<dyn HyphMethod>,
    soft_hyphens: Rc<dyn HyphMethod>,
}

impl DictionaryRegistry {
    /// Create a registry with no language mappings configured; every
    /// [`Self::method_for_lang`] call falls back to [`AlgoHyphMethod`] until
    /// [`Self::set_dictionary_for_lang`] is called.
    #[must_use]
    pub fn new(loader: Box<dyn DictionaryLoader>) -> Self {
        Self {
            loader,
            lang_to_dict: HashMap::new(),
            loaded: HashMap::new(),
            no_hyph: Rc::new(NoHyphMethod),
            algo_hyph: Rc::new(AlgoHyphMethod),
            soft_hyphens: Rc::new(SoftHyphensMethod),

        }
    }

    /// Register which dictionary id a BCP-47 tag (or sub-tag prefix) should
    /// resolve to (`HyphMan::getHyphMethodForDictionary`'s lookup key).
    pub fn set_dictionary_for_lang(&mut self, lang_tag: &str, dictionary_id: &str) {
        let _ = self.lang_to_dict.insert(lang_tag.to_ascii_lowercase(), dictionary_id.to_string());
    }

    /// The singleton `@none` method.
    #[must_use]
    pub fn no_hyph_method(&self) -> &Rc<dyn HyphMethod> {
        &self.no_hyph
    }

    /// The singleton `@algorithm` method.
    #[must_use]
    pub fn algo_hyph_method(&self) -> &Rc<dyn HyphMethod> {
        &self.algo_hyph
    }

    /// The singleton `@softhyphens` method.
    #[must_use]
    pub fn soft_hyphens_method(&self) -> &Rc<dyn HyphMethod> {
        &self.soft_hyphens
    }

    /// Resolve the hyphenation method for `lang_tag` (exact match, then
    /// progressively shorter `-`-separated sub-tags, else the algorithmic
    /// fallback), loading and caching the backing pattern file on first use
    /// (spec §4.8 step 1: "Looks up the hyphenation method for the tag:
    /// exact match, then first sub-tag, then falls back to a configured
    /// default").
    pub fn method_for_lang(&mut self, lang_tag: &str) -> Rc<dyn HyphMethod> {
        let folded = lang_tag.to_ascii_lowercase();
        let mut candidate = folded.as_str();
        loop {
            if let Some(dict_id) = self.lang_to_dict.get(candidate).cloned() {
                return self.method_for_dictionary_id(&dict_id);
            }
            match candidate.rfind('-') {
                Some(pos) => candidate = &candidate[..pos],
                None => break,
            }
        }
        Rc::clone(&self.algo_hyph)
    }

    fn method_for_dictionary_id(&mut self, dict_id: &str) -> Rc<dyn HyphMethod> {
        match DictionaryId::parse(dict_id) {
            DictionaryId::None => Rc::clone(&self.no_hyph),
            DictionaryId::SoftHyphens => Rc::clone(&self.soft_hyphens),
            DictionaryId::Algorithm => Rc::clone(&self.algo_hyph),
            DictionaryId::File(filename) => {
                if let Some(cached) = self.loaded.get(&filename) {
                    return Rc::clone(cached);
                }
                match self.load_file(&filename) {
                    Ok(method) => {
                        let rc: Rc<dyn HyphMethod> = Rc::from(method);
                        let _ = self.loaded.insert(filename, Rc::clone(&rc));
                        rc
                    }
                    Err(err) => {
                        warn_once("hyph", &format!("{filename}: {err}, falling back to English US algorithmic hyphenation"));
                        Rc::clone(&self.algo_hyph)
                    }
                }
            }
        }
    }

    fn load_file(&self, filename: &str) -> Result<Box<dyn HyphMethod>, vellum_common::StyleError> {
        let bytes = self.loader.load(filename)?;
        if bytes.starts_with(b"<") {
            let text = String::from_utf8_lossy(&bytes);
            Ok(Box::new(PatternHyphMethod::load_xml(filename, &text)?))
        } else {
            Ok(Box::new(PatternHyphMethod::load_pdb(filename, &bytes)?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedLoader(&'static str);
    impl DictionaryLoader for FixedLoader {
        fn load(&self, _id: &str) -> Result<Vec<u8>, vellum_common::StyleError> {
            Ok(self.0.as_bytes().to_vec())
        }
    }

    #[test]
    fn falls_back_to_algorithmic_with_no_mapping() {
        let mut reg = DictionaryRegistry::new(Box::new(NullDictionaryLoader));
        let method = reg.method_for_lang("fr");
        assert_eq!(method.id(), "@algorithm");
    }

    #[test]
    fn resolves_reserved_ids_without_loading() {
        let mut reg = DictionaryRegistry::new(Box::new(NullDictionaryLoader));
        reg.set_dictionary_for_lang("en", "@none");
        assert_eq!(reg.method_for_lang("en").id(), "@none");
    }

    #[test]
    fn loads_and_caches_a_pattern_file() {
        let mut reg = DictionaryRegistry::new(Box::new(FixedLoader(
            "<patterns><pattern>hy1phen</pattern></patterns>",
        )));
        reg.set_dictionary_for_lang("en", "English_US.pattern");
        let a = reg.method_for_lang("en");
        let b = reg.method_for_lang("en");
        assert!(Rc::ptr_eq(&a, &b));
    }

    #[test]
    fn falls_back_on_load_failure() {
        let mut reg = DictionaryRegistry::new(Box::new(NullDictionaryLoader));
        reg.set_dictionary_for_lang("en", "English_US.pattern");
        assert_eq!(reg.method_for_lang("en").id(), "@algorithm");
    }

    #[test]
    fn sub_tag_fallback_finds_broader_mapping() {
        let mut reg = DictionaryRegistry::new(Box::new(NullDictionaryLoader));
        reg.set_dictionary_for_lang("en", "@none");
        assert_eq!(reg.method_for_lang("en-gb").id(), "@none");
    }
}
