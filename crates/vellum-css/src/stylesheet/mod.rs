//! Compiled rule storage (spec §6): selectors bucketed by the interned id
//! of their rightmost (subject) element name, each bucket kept sorted in
//! ascending specificity order so matching can simply walk forward and
//! never needs to re-sort at apply time.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use vellum_dom::{NameId, StyleTree};

use crate::matcher::matches_selector;
use crate::selector::{ParsedSelector, SelectorChain};

/// A compiled stylesheet: every rule the engine has parsed so far, indexed
/// for fast per-node matching.
#[derive(Debug, Default)]
pub struct Stylesheet {
    /// Rules bucketed by subject element-name id; [`NameId::NONE`] holds
    /// every selector whose subject compound is the universal selector.
    buckets: HashMap<NameId, Vec<ParsedSelector>>,
    /// Saved bucket states for [`Self::push_snapshot`]/[`Self::pop_snapshot`].
    snapshots: Vec<HashMap<NameId, Vec<ParsedSelector>>>,
}

impl Stylesheet {
    /// An empty stylesheet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert one compiled selector into its bucket, keeping the bucket
    /// sorted in ascending specificity order.
    pub fn insert(&mut self, selector: ParsedSelector) {
        let key = selector.chain.compound.element_name.unwrap_or(NameId::NONE);
        let bucket = self.buckets.entry(key).or_default();
        let pos = bucket.partition_point(|existing| existing.specificity <= selector.specificity);
        bucket.insert(pos, selector);
    }

    /// Insert every selector parsed from one rule (a comma-separated
    /// selector list shares one declaration block but buckets independently,
    /// since each item may have a different subject element name).
    pub fn extend(&mut self, selectors: impl IntoIterator<Item = ParsedSelector>) {
        for selector in selectors {
            self.insert(selector);
        }
    }

    /// The bucket holding every selector whose subject is the universal
    /// selector (matches any element name).
    #[must_use]
    pub fn universal_bucket(&self) -> &[ParsedSelector] {
        self.buckets.get(&NameId::NONE).map_or(&[], Vec::as_slice)
    }

    /// The bucket holding every selector whose subject names `name`.
    #[must_use]
    pub fn bucket_for(&self, name: NameId) -> &[ParsedSelector] {
        self.buckets.get(&name).map_or(&[], Vec::as_slice)
    }

    /// Save the current bucket contents on an internal stack, so a
    /// subsequently `@import`ed or document-fragment-scoped stylesheet can be
    /// layered on top and later discarded with [`Self::pop_snapshot`]
    /// (spec §6: "push/pop snapshot stack for document-fragment scoping").
    pub fn push_snapshot(&mut self) {
        self.snapshots.push(self.buckets.clone());
    }

    /// Restore the bucket contents saved by the matching [`Self::push_snapshot`].
    /// A no-op if the snapshot stack is empty.
    pub fn pop_snapshot(&mut self) {
        if let Some(previous) = self.snapshots.pop() {
            self.buckets = previous;
        }
    }

    /// How many snapshot levels are currently pushed.
    #[must_use]
    pub fn snapshot_depth(&self) -> usize {
        self.snapshots.len()
    }

    /// A content hash over the compiled rule set, independent of source
    /// formatting or comment placement (spec §B: declaration/selector/
    /// stylesheet hashing for snapshot purity — two stylesheets compiled
    /// from byte-identical *semantics* hash equal even if whitespace or
    /// `!important` casing differed in the source text).
    #[must_use]
    pub fn content_hash(&self) -> u64 {
        let mut keys: Vec<&NameId> = self.buckets.keys().collect();
        keys.sort_by_key(|id| id.0);
        let mut hasher = DefaultHasher::new();
        for key in keys {
            key.hash(&mut hasher);
            for selector in &self.buckets[key] {
                selector.specificity.hash(&mut hasher);
                selector.pseudo_element.is_some().hash(&mut hasher);
                hash_chain(&selector.chain, &mut hasher);
                selector.declaration.entries.len().hash(&mut hasher);
                for entry in &selector.declaration.entries {
                    format!("{:?}", entry.property).hash(&mut hasher);
                    entry.importance.hash(&mut hasher);
                }
            }
        }
        hasher.finish()
    }

    /// Every selector in this sheet that would match `node`, in the same
    /// specificity/source order the cascade itself applies them (spec §B,
    /// grounded on the source's `gatherNodeMatchingRulesets` devtools-shaped
    /// introspection). This walks both the universal bucket and `node`'s own
    /// element-name bucket; it is not on the render-critical path and is
    /// meant for a host's "inspect element" style tooling.
    #[must_use]
    pub fn matching_rule_sources<T: StyleTree>(&self, tree: &T, node: T::Node) -> Vec<&ParsedSelector> {
        let name = tree.element_name_id(node);
        let mut matches: Vec<&ParsedSelector> = self
            .universal_bucket()
            .iter()
            .chain(self.bucket_for(name))
            .filter(|selector| matches_selector(tree, node, selector))
            .collect();
        matches.sort_by_key(|selector| selector.specificity);
        matches
    }
}

impl Hash for crate::declaration::Importance {
    fn hash<H: Hasher>(&self, state: &mut H) {
        (*self as u8).hash(state);
    }
}

fn hash_chain(chain: &SelectorChain, hasher: &mut DefaultHasher) {
    chain.compound.element_name.hash(hasher);
    chain.compound.rules.len().hash(hasher);
    for rule in &chain.compound.rules {
        format!("{rule:?}").hash(hasher);
    }
    if let Some(boxed) = &chain.left {
        format!("{:?}", boxed.0).hash(hasher);
        hash_chain(&boxed.1, hasher);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use crate::selector::parse_selector_list;
    use crate::tokenizer::{CSSTokenizer, TokenCursor};
    use std::rc::Rc;
    use vellum_dom::{DocumentFormat, NameTable};

    fn compile(src: &str, names: &mut NameTable) -> Vec<ParsedSelector> {
        let tokens = CSSTokenizer::new(src).tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let decl = Rc::new(Declaration::default());
        let mut seq = 0;
        parse_selector_list(&mut cursor, names, DocumentFormat::Flat, &decl, false, &mut seq).unwrap()
    }

    #[test]
    fn buckets_by_subject_name_and_sorts_by_specificity() {
        let mut names = NameTable::new();
        let mut sheet = Stylesheet::new();
        sheet.extend(compile("p", &mut names));
        sheet.extend(compile("p.note", &mut names));
        sheet.extend(compile("#x", &mut names));

        let p_id = names.intern("p");
        let bucket = sheet.bucket_for(p_id);
        assert_eq!(bucket.len(), 2);
        assert!(bucket[0].specificity < bucket[1].specificity);
        assert!(sheet.universal_bucket().is_empty());
    }

    #[test]
    fn universal_selector_lands_in_the_none_bucket() {
        let mut names = NameTable::new();
        let mut sheet = Stylesheet::new();
        sheet.extend(compile("*", &mut names));
        assert_eq!(sheet.universal_bucket().len(), 1);
    }

    #[test]
    fn snapshot_push_pop_restores_prior_contents() {
        let mut names = NameTable::new();
        let mut sheet = Stylesheet::new();
        sheet.extend(compile("p", &mut names));
        let before = sheet.bucket_for(names.intern("p")).len();

        sheet.push_snapshot();
        sheet.extend(compile("p", &mut names));
        assert_eq!(sheet.bucket_for(names.intern("p")).len(), before + 1);

        sheet.pop_snapshot();
        assert_eq!(sheet.bucket_for(names.intern("p")).len(), before);
    }

    #[test]
    fn content_hash_is_stable_and_order_independent_of_insertion_bucket() {
        let mut names = NameTable::new();
        let mut sheet_a = Stylesheet::new();
        sheet_a.extend(compile("p", &mut names));
        sheet_a.extend(compile("div", &mut names));

        let mut sheet_b = Stylesheet::new();
        sheet_b.extend(compile("div", &mut names));
        sheet_b.extend(compile("p", &mut names));

        assert_eq!(sheet_a.content_hash(), sheet_b.content_hash());
    }
}
