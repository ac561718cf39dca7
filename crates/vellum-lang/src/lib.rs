//! Per-language configuration and hyphenation engine (components C8-C9 of
//! the style engine; spec §2, §4.8-4.9).
//!
//! This crate depends only on [`vellum_dom::StyleTree`] for the node-level
//! `lang` lookup a document embedder needs ([`node_language`]); the
//! hyphenation and quote/line-break tables themselves are plain data and
//! algorithms with no document dependency at all.

/// CJK fullwidth-punctuation classification and width-adjustment tables.
pub mod cjk;
/// Hyphenation engine: dictionary loading, pattern matching, algorithmic
/// fallback, soft-hyphen-only mode, user word list override.
pub mod hyphenate;
/// Per-language line-break property overrides and character-substitution hooks.
pub mod linebreak;
/// Per-language opening/closing quotation-mark pairs.
pub mod quotes;
/// `TextLangCfg` and the per-document language registry.
pub mod registry;

pub use hyphenate::{DictionaryId, DictionaryLoader, HyphMethod, UserWordList};
pub use registry::{LangRegistry, TextLangCfg};

use vellum_dom::StyleTree;

/// Resolve the effective language for `node` by walking `unboxed_parent`
/// links up to (and including) the root, looking for the nearest `lang`
/// attribute, the way `TextLangMan::getLangNodeIndex` walks the DOM before
/// handing the found attribute value to [`LangRegistry::get`]. Returns
/// `None` if no ancestor (including `node` itself) carries one, in which
/// case the caller should fall back to the document's main language.
pub fn node_language<T: StyleTree>(tree: &T, node: T::Node, lang_attr: vellum_dom::NameId) -> Option<String> {
    let mut current = Some(node);
    while let Some(n) = current {
        if let Some(value) = tree.attribute(n, lang_attr) {
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
        if tree.is_root(n) {
            break;
        }
        current = tree.unboxed_parent(n, None);
    }
    None
}
