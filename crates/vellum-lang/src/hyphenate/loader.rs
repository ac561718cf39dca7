//! Dictionary identifiers and the host-provided loader interface (spec §6.3).

use vellum_common::StyleError;

/// A dictionary identifier: either a host-defined filename (e.g.
/// `English_US.pattern`) naming a pattern file to fetch, or one of the three
/// reserved built-in methods that need no file at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DictionaryId {
    /// Hyphenation turned off entirely (`@none`).
    None,
    /// Soft-hyphen-only mode (`@softhyphens`).
    SoftHyphens,
    /// The vowel-heuristic algorithmic fallback (`@algorithm`).
    Algorithm,
    /// A host-resolved filename for a TeX/Liang or legacy PDB pattern file.
    File(String),
}

impl DictionaryId {
    /// Parse a raw id string as it would appear in a `HyphDictionaryList`
    /// entry or a `lang` attribute's dictionary reference.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        match raw {
            "@none" => Self::None,
            "@softhyphens" => Self::SoftHyphens,
            "@algorithm" => Self::Algorithm,
            other => Self::File(other.to_string()),
        }
    }
}

/// Host-provided fetch of dictionary bytes by id (spec §6.3). The core never
/// touches a filesystem or network directly; every pattern file load goes
/// through this trait, exactly as stylesheet `@import` goes through its own
/// loader trait in `vellum-css`.
pub trait DictionaryLoader {
    /// Fetch the raw bytes backing `id`, or fail with a reason a caller can
    /// present to the user. Reserved ids (`None`/`SoftHyphens`/`Algorithm`)
    /// never reach this method; only [`DictionaryId::File`] does.
    fn load(&self, id: &str) -> Result<Vec<u8>, StyleError>;
}

/// A [`DictionaryLoader`] that fails every request, for hosts or tests that
/// never resolve any file-backed dictionary (only the three built-in
/// methods are ever used).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDictionaryLoader;

impl DictionaryLoader for NullDictionaryLoader {
    fn load(&self, id: &str) -> Result<Vec<u8>, StyleError> {
        Err(StyleError::DictionaryLoad {
            id: id.to_string(),
            reason: "no dictionary loader configured".to_string(),
        })
    }
}
