//! Interned element/attribute name identifiers.
//!
//! Selectors and declarations are compiled against small integer ids rather
//! than strings so that matching never touches string data on the hot path
//! (other than the literal comparisons attribute selectors require). Id `0`
//! is reserved to mean "no name" / "universal" (spec §3, Stylesheet): a
//! selector with no element name buckets under id `0`.

use std::collections::HashMap;

/// An interned element or attribute name. `NameId::NONE` (`0`) means "no
/// name" — the universal selector, or "name not interned".
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NameId(pub u32);

impl NameId {
    /// The reserved "no name" / universal id.
    pub const NONE: Self = Self(0);

    /// Whether this is the universal/none id.
    #[must_use]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }
}

impl Default for NameId {
    fn default() -> Self {
        Self::NONE
    }
}

/// A two-way element/attribute name interning table.
///
/// Element and attribute names share one table in this implementation
/// (matching the source, which interns both through the same document-wide
/// name table); nothing requires they be disjoint, since callers always
/// know from context whether an id denotes an element or an attribute.
#[derive(Debug, Clone, Default)]
pub struct NameTable {
    by_name: HashMap<String, NameId>,
    by_id: Vec<String>,
}

impl NameTable {
    /// Create an empty table. Id `0` is reserved and never assigned to a name.
    #[must_use]
    pub fn new() -> Self {
        Self {
            by_name: HashMap::new(),
            by_id: vec![String::new()], // index 0 is the NONE sentinel
        }
    }

    /// Intern `name`, returning its existing id if already known, or
    /// assigning it the next id. Names are folded to ASCII lowercase, since
    /// CSS type selectors and HTML tag/attribute names are case-insensitive.
    pub fn intern(&mut self, name: &str) -> NameId {
        let folded = name.to_ascii_lowercase();
        if let Some(&id) = self.by_name.get(&folded) {
            return id;
        }
        let id = NameId(u32::try_from(self.by_id.len()).expect("name table overflow"));
        self.by_id.push(folded.clone());
        let _ = self.by_name.insert(folded, id);
        id
    }

    /// Look up an already-interned name without assigning a new id.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<NameId> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    /// Resolve an id back to its name.
    #[must_use]
    pub fn name(&self, id: NameId) -> Option<&str> {
        self.by_id.get(id.0 as usize).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interning_is_case_insensitive_and_stable() {
        let mut table = NameTable::new();
        let div1 = table.intern("div");
        let div2 = table.intern("DIV");
        assert_eq!(div1, div2);
        assert_eq!(table.name(div1), Some("div"));
    }

    #[test]
    fn zero_is_reserved() {
        let table = NameTable::new();
        assert!(NameId::NONE.is_none());
        assert_eq!(table.name(NameId::NONE), Some(""));
    }
}
