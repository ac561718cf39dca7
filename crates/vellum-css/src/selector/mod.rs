//! Selector parsing and specificity (spec §3, §4.4).
//!
//! A selector is represented as a right-to-left linked chain of
//! [`CompoundSelector`]s: the rightmost (subject) compound owns the whole
//! chain, and each link points further left across the combinator that
//! precedes it. Matching walks the chain subject-first, which is also the
//! direction the DOM traversal needs to go (a node's ancestors/siblings are
//! cheap to reach; its descendants are not known yet while cascading
//! top-down).

mod nth;

pub use nth::NthArgs;

use vellum_dom::{DocumentFormat, NameId, NameTable};

use crate::declaration::SharedDeclaration;
use crate::tokenizer::{CSSToken, TokenCursor};

/// The relationship between two adjacent compounds in a selector chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// `A B` — `B` is any descendant of `A`.
    Descendant,
    /// `A > B` — `B` is a direct child of `A`.
    Child,
    /// `A + B` — `B` immediately follows `A` as a sibling.
    Adjacent,
    /// `A ~ B` — `B` follows `A` as a sibling, not necessarily immediately.
    Sibling,
}

/// `::before` / `::after`, tracked separately from the matched element since
/// they style synthetic content the matched node doesn't itself own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoElement {
    /// `::before` (or legacy single-colon `:before`).
    Before,
    /// `::after` (or legacy single-colon `:after`).
    After,
}

/// A structural or state pseudo-class (spec §3 "pseudo-classes").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PseudoClass {
    /// `:root`
    Root,
    /// `:dir(ltr)` / `:dir(rtl)` — `true` means `rtl`.
    Dir(bool),
    /// `:first-child`
    FirstChild,
    /// `:first-of-type`
    FirstOfType,
    /// `:nth-child(An+B)`
    NthChild(NthArgs),
    /// `:nth-of-type(An+B)`
    NthOfType(NthArgs),
    /// `:last-child`
    LastChild,
    /// `:last-of-type`
    LastOfType,
    /// `:nth-last-child(An+B)`
    NthLastChild(NthArgs),
    /// `:nth-last-of-type(An+B)`
    NthLastOfType(NthArgs),
    /// `:only-child`
    OnlyChild,
    /// `:only-of-type`
    OnlyOfType,
    /// `:empty`
    Empty,
}

impl PseudoClass {
    /// Whether matching this pseudo-class needs the fully built DOM rather
    /// than just the ancestors and preceding siblings seen so far while
    /// parsing top-down (spec §4.4: "anything after `:last-child`" in the
    /// enumerated list needs a later sibling's existence, or a full sibling
    /// count, neither of which is known until the subtree is complete).
    #[must_use]
    pub const fn requires_full_dom(self) -> bool {
        matches!(
            self,
            PseudoClass::LastOfType
                | PseudoClass::NthLastChild(_)
                | PseudoClass::NthLastOfType(_)
                | PseudoClass::OnlyChild
                | PseudoClass::OnlyOfType
                | PseudoClass::Empty
        )
    }
}

/// One simple selector: a class, id, attribute test, or pseudo-class.
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleRule {
    /// `.foo`
    ClassContains(String),
    /// `#foo`
    IdEquals(String),
    /// `[attr]`
    AttrExists(NameId),
    /// `[attr=val]`, optionally case-insensitive.
    AttrEq {
        /// The attribute name.
        name: NameId,
        /// The value to compare against (already lower-cased if `ci`).
        value: String,
        /// Whether the `i` flag was present.
        ci: bool,
    },
    /// `[attr~=val]` — `val` is one of a whitespace-separated word list.
    AttrHas {
        /// The attribute name.
        name: NameId,
        /// The word to look for.
        value: String,
        /// Whether the `i` flag was present.
        ci: bool,
    },
    /// `[attr|=val]` — `val`, or `val` followed by `-`.
    AttrDashPrefix {
        /// The attribute name.
        name: NameId,
        /// The prefix to match.
        value: String,
        /// Whether the `i` flag was present.
        ci: bool,
    },
    /// `[attr^=val]`
    AttrPrefix {
        /// The attribute name.
        name: NameId,
        /// The prefix to match.
        value: String,
        /// Whether the `i` flag was present.
        ci: bool,
    },
    /// `[attr$=val]`
    AttrSuffix {
        /// The attribute name.
        name: NameId,
        /// The suffix to match.
        value: String,
        /// Whether the `i` flag was present.
        ci: bool,
    },
    /// `[attr*=val]`
    AttrSubstring {
        /// The attribute name.
        name: NameId,
        /// The substring to look for.
        value: String,
        /// Whether the `i` flag was present.
        ci: bool,
    },
    /// A pseudo-class test.
    PseudoClass(PseudoClass),
}

/// One compound selector: an optional element-name test plus zero or more
/// [`SimpleRule`]s, all ANDed together.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundSelector {
    /// `None` means the universal selector `*`.
    pub element_name: Option<NameId>,
    /// Class/id/attribute/pseudo-class tests, ANDed with `element_name`.
    pub rules: Vec<SimpleRule>,
}

/// A right-to-left linked selector chain. `compound` is matched against the
/// candidate node; `left`, if present, names the combinator connecting
/// `compound` to the chain further toward the selector's left edge.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectorChain {
    /// The compound at this link.
    pub compound: CompoundSelector,
    /// The combinator and chain to this compound's left, if any.
    pub left: Option<Box<(Combinator, SelectorChain)>>,
}

/// Specificity bit layout (spec §3): a single packed `u32` so selectors
/// compare with a plain integer `<`, sequence number included so two
/// selectors of otherwise-equal weight still tie-break by source order.
mod specificity_bits {
    pub const LATE_BIT: u32 = 1 << 31;
    pub const ID_SHIFT: u32 = 26;
    pub const ID_BITS: u32 = 5;
    pub const CLASS_SHIFT: u32 = 20;
    pub const CLASS_BITS: u32 = 6;
    pub const ELEM_SHIFT: u32 = 16;
    pub const ELEM_BITS: u32 = 4;
    pub const SEQ_BITS: u32 = 16;
}

/// A fully parsed selector, paired with the declaration block it guards.
#[derive(Debug, Clone)]
pub struct ParsedSelector {
    /// The subject-rooted combinator chain.
    pub chain: SelectorChain,
    /// `::before`/`::after`, if the selector ends in one.
    pub pseudo_element: Option<PseudoElement>,
    /// Packed specificity, including the `-cr-hint: late` extra-weight bit
    /// and a source-order sequence number for final tie-breaking.
    pub specificity: u32,
    /// Whether any compound in the chain needs the fully built DOM to match.
    pub requires_full_dom: bool,
    /// The declaration block this selector, if matched, contributes.
    pub declaration: SharedDeclaration,
}

fn clamp_bits(value: u32, bits: u32) -> u32 {
    value.min((1 << bits) - 1)
}

/// Compute the packed specificity for a chain plus pseudo-element, given the
/// `-cr-hint: late` flag and a caller-supplied source-order sequence number.
#[must_use]
pub fn compute_specificity(
    chain: &SelectorChain,
    pseudo_element: Option<PseudoElement>,
    late: bool,
    sequence: u32,
) -> u32 {
    use specificity_bits::{CLASS_BITS, CLASS_SHIFT, ELEM_BITS, ELEM_SHIFT, ID_BITS, ID_SHIFT, LATE_BIT, SEQ_BITS};

    let mut ids = 0u32;
    let mut classes = 0u32;
    let mut elems = 0u32;

    let mut cur = Some(chain);
    while let Some(link) = cur {
        if link.compound.element_name.is_some() {
            elems += 1;
        }
        for rule in &link.compound.rules {
            match rule {
                SimpleRule::IdEquals(_) => ids += 1,
                _ => classes += 1,
            }
        }
        cur = link.left.as_ref().map(|b| &b.1);
    }
    if pseudo_element.is_some() {
        elems += 1;
    }

    let late_bit = if late { LATE_BIT } else { 0 };
    let seq_mask = (1u32 << SEQ_BITS) - 1;
    late_bit
        | (clamp_bits(ids, ID_BITS) << ID_SHIFT)
        | (clamp_bits(classes, CLASS_BITS) << CLASS_SHIFT)
        | (clamp_bits(elems, ELEM_BITS) << ELEM_SHIFT)
        | (sequence & seq_mask)
}

fn intern_element_name(names: &mut NameTable, raw: &str, format: DocumentFormat) -> NameId {
    if matches!(format, DocumentFormat::FragmentedContainer) && raw.eq_ignore_ascii_case("html") {
        names.intern(vellum_dom::FRAGMENT_ROOT_TAG)
    } else {
        names.intern(raw)
    }
}

fn simple_pseudo_class_keyword(word: &str) -> Option<PseudoClass> {
    Some(match word {
        "root" => PseudoClass::Root,
        "first-child" => PseudoClass::FirstChild,
        "first-of-type" => PseudoClass::FirstOfType,
        "last-child" => PseudoClass::LastChild,
        "last-of-type" => PseudoClass::LastOfType,
        "only-child" => PseudoClass::OnlyChild,
        "only-of-type" => PseudoClass::OnlyOfType,
        "empty" => PseudoClass::Empty,
        _ => return None,
    })
}

fn pseudo_element_keyword(word: &str) -> Option<PseudoElement> {
    match word {
        "before" => Some(PseudoElement::Before),
        "after" => Some(PseudoElement::After),
        _ => None,
    }
}

fn parse_functional_pseudo_class(cursor: &mut TokenCursor, name: &str) -> Option<PseudoClass> {
    let result = match name {
        "dir" => {
            cursor.skip_whitespace();
            let CSSToken::Ident(word) = cursor.peek().clone() else {
                return None;
            };
            let _ = cursor.advance();
            let rtl = match word.to_ascii_lowercase().as_str() {
                "ltr" => false,
                "rtl" => true,
                _ => return None,
            };
            PseudoClass::Dir(rtl)
        }
        "nth-child" => PseudoClass::NthChild(nth::parse_nth_args(cursor)?),
        "nth-of-type" => PseudoClass::NthOfType(nth::parse_nth_args(cursor)?),
        "nth-last-child" => PseudoClass::NthLastChild(nth::parse_nth_args(cursor)?),
        "nth-last-of-type" => PseudoClass::NthLastOfType(nth::parse_nth_args(cursor)?),
        _ => return None,
    };
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::RightParen) {
        return None;
    }
    let _ = cursor.advance();
    Some(result)
}

fn parse_attr_selector(cursor: &mut TokenCursor, names: &mut NameTable) -> Option<SimpleRule> {
    cursor.skip_whitespace();
    let CSSToken::Ident(name) = cursor.peek().clone() else {
        return None;
    };
    let _ = cursor.advance();
    let attr_id = names.intern(&name);
    cursor.skip_whitespace();
    match cursor.peek().clone() {
        CSSToken::RightBracket => {
            let _ = cursor.advance();
            Some(SimpleRule::AttrExists(attr_id))
        }
        CSSToken::Delim(op @ ('~' | '|' | '^' | '$' | '*')) => {
            let _ = cursor.advance();
            if !matches!(cursor.peek(), CSSToken::Delim('=')) {
                return None;
            }
            let _ = cursor.advance();
            finish_attr_match(cursor, attr_id, op)
        }
        CSSToken::Delim('=') => {
            let _ = cursor.advance();
            finish_attr_match(cursor, attr_id, '=')
        }
        _ => None,
    }
}

fn finish_attr_match(cursor: &mut TokenCursor, name: NameId, op: char) -> Option<SimpleRule> {
    cursor.skip_whitespace();
    let raw_value = match cursor.peek().clone() {
        CSSToken::String(s) | CSSToken::Ident(s) => {
            let _ = cursor.advance();
            s
        }
        _ => return None,
    };
    cursor.skip_whitespace();
    let ci = matches!(cursor.peek(), CSSToken::Ident(flag) if flag.eq_ignore_ascii_case("i"));
    if ci {
        let _ = cursor.advance();
    }
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::RightBracket) {
        return None;
    }
    let _ = cursor.advance();
    let value = if ci { raw_value.to_ascii_lowercase() } else { raw_value };
    Some(match op {
        '=' => SimpleRule::AttrEq { name, value, ci },
        '~' => SimpleRule::AttrHas { name, value, ci },
        '|' => SimpleRule::AttrDashPrefix { name, value, ci },
        '^' => SimpleRule::AttrPrefix { name, value, ci },
        '$' => SimpleRule::AttrSuffix { name, value, ci },
        '*' => SimpleRule::AttrSubstring { name, value, ci },
        _ => unreachable!("only comparison delimiters reach here"),
    })
}

struct ParsedCompound {
    compound: CompoundSelector,
    pseudo_element: Option<PseudoElement>,
}

fn parse_compound(cursor: &mut TokenCursor, names: &mut NameTable, format: DocumentFormat) -> Option<ParsedCompound> {
    let mut compound = CompoundSelector::default();
    let mut pseudo_element = None;
    let mut any = false;

    match cursor.peek().clone() {
        CSSToken::Delim('*') => {
            let _ = cursor.advance();
            any = true;
        }
        CSSToken::Ident(name) => {
            let _ = cursor.advance();
            any = true;
            compound.element_name = Some(intern_element_name(names, &name, format));
        }
        _ => {}
    }

    loop {
        match cursor.peek().clone() {
            CSSToken::Delim('.') => {
                let _ = cursor.advance();
                let CSSToken::Ident(class) = cursor.peek().clone() else {
                    return None;
                };
                let _ = cursor.advance();
                compound.rules.push(SimpleRule::ClassContains(class));
                any = true;
            }
            CSSToken::Hash { value, .. } => {
                let _ = cursor.advance();
                compound.rules.push(SimpleRule::IdEquals(value));
                any = true;
            }
            CSSToken::LeftBracket => {
                let _ = cursor.advance();
                let Some(rule) = parse_attr_selector(cursor, names) else {
                    return None;
                };
                compound.rules.push(rule);
                any = true;
            }
            CSSToken::Colon => {
                let _ = cursor.advance();
                let double = matches!(cursor.peek(), CSSToken::Colon);
                if double {
                    let _ = cursor.advance();
                }
                match cursor.peek().clone() {
                    CSSToken::Ident(name) => {
                        let _ = cursor.advance();
                        let lower = name.to_ascii_lowercase();
                        if double || lower == "before" || lower == "after" {
                            let Some(pe) = pseudo_element_keyword(&lower) else {
                                return None;
                            };
                            pseudo_element = Some(pe);
                        } else {
                            let Some(pc) = simple_pseudo_class_keyword(&lower) else {
                                return None;
                            };
                            compound.rules.push(SimpleRule::PseudoClass(pc));
                        }
                    }
                    CSSToken::Function(name) => {
                        let _ = cursor.advance();
                        let lower = name.to_ascii_lowercase();
                        let Some(pc) = parse_functional_pseudo_class(cursor, &lower) else {
                            return None;
                        };
                        compound.rules.push(SimpleRule::PseudoClass(pc));
                    }
                    _ => return None,
                }
                any = true;
            }
            _ => break,
        }
    }

    any.then_some(ParsedCompound { compound, pseudo_element })
}

fn parse_one_selector(cursor: &mut TokenCursor, names: &mut NameTable, format: DocumentFormat) -> Option<(SelectorChain, Option<PseudoElement>, bool)> {
    let mut parts: Vec<(CompoundSelector, Option<Combinator>)> = Vec::new();
    let mut pseudo_element = None;
    let mut requires_full_dom = false;
    let mut pseudo_element_seen = false;

    loop {
        if pseudo_element_seen {
            // A pseudo-element must be the last compound in the selector.
            return None;
        }
        let parsed = parse_compound(cursor, names, format)?;
        requires_full_dom |= parsed
            .compound
            .rules
            .iter()
            .any(|r| matches!(r, SimpleRule::PseudoClass(pc) if pc.requires_full_dom()));
        if parsed.pseudo_element.is_some() {
            pseudo_element = parsed.pseudo_element;
            pseudo_element_seen = true;
        }

        let saw_space = cursor.peek().is_whitespace();
        cursor.skip_whitespace();
        let combinator = match cursor.peek().clone() {
            CSSToken::Delim('>') => {
                let _ = cursor.advance();
                cursor.skip_whitespace();
                Some(Combinator::Child)
            }
            CSSToken::Delim('+') => {
                let _ = cursor.advance();
                cursor.skip_whitespace();
                Some(Combinator::Adjacent)
            }
            CSSToken::Delim('~') => {
                let _ = cursor.advance();
                cursor.skip_whitespace();
                Some(Combinator::Sibling)
            }
            CSSToken::Comma | CSSToken::LeftBrace | CSSToken::Eof => None,
            _ if saw_space => Some(Combinator::Descendant),
            _ => return None,
        };
        parts.push((parsed.compound, combinator));
        if combinator.is_none() {
            break;
        }
    }

    let mut iter = parts.into_iter().rev();
    let (last_compound, _) = iter.next()?;
    let mut chain = SelectorChain { compound: last_compound, left: None };
    for (compound, combinator) in iter {
        let comb = combinator.expect("non-tail parts always carry the combinator to their right");
        chain = SelectorChain { compound, left: Some(Box::new((comb, chain))) };
    }

    Some((chain, pseudo_element, requires_full_dom))
}

fn skip_to_comma_or_brace(cursor: &mut TokenCursor) {
    loop {
        match cursor.peek() {
            CSSToken::Comma | CSSToken::LeftBrace | CSSToken::Eof => return,
            _ => {
                let _ = cursor.advance();
            }
        }
    }
}

/// Parse a comma-separated selector list, stopping before the rule's `{`
/// (never consuming it). Each selector is paired with `declaration` to
/// produce one [`ParsedSelector`] per comma-separated item (they all share
/// the same declaration block). Returns `None` if any selector in the list
/// is malformed — per spec §7, an invalid selector invalidates the whole
/// rule, not just the one selector.
#[must_use]
pub fn parse_selector_list(
    cursor: &mut TokenCursor,
    names: &mut NameTable,
    format: DocumentFormat,
    declaration: &SharedDeclaration,
    late: bool,
    next_sequence: &mut u32,
) -> Option<Vec<ParsedSelector>> {
    let mut out = Vec::new();
    let mut failed = false;

    loop {
        cursor.skip_whitespace();
        if matches!(cursor.peek(), CSSToken::LeftBrace | CSSToken::Eof) {
            break;
        }
        match parse_one_selector(cursor, names, format) {
            Some((chain, pseudo_element, requires_full_dom)) => {
                let sequence = *next_sequence;
                *next_sequence = next_sequence.wrapping_add(1);
                let specificity = compute_specificity(&chain, pseudo_element, late, sequence);
                out.push(ParsedSelector {
                    chain,
                    pseudo_element,
                    specificity,
                    requires_full_dom,
                    declaration: declaration.clone(),
                });
            }
            None => {
                failed = true;
                skip_to_comma_or_brace(cursor);
            }
        }
        cursor.skip_whitespace();
        match cursor.peek() {
            CSSToken::Comma => {
                let _ = cursor.advance();
            }
            _ => break,
        }
    }

    if failed {
        None
    } else {
        Some(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use crate::tokenizer::CSSTokenizer;
    use std::rc::Rc;

    fn parse_list(src: &str) -> Option<Vec<ParsedSelector>> {
        let tokens = CSSTokenizer::new(src).tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let mut names = NameTable::new();
        let decl = Rc::new(Declaration::default());
        let mut seq = 0;
        parse_selector_list(&mut cursor, &mut names, DocumentFormat::Flat, &decl, false, &mut seq)
    }

    #[test]
    fn simple_type_selector() {
        let list = parse_list("div").unwrap();
        assert_eq!(list.len(), 1);
        assert!(list[0].chain.left.is_none());
        assert!(list[0].chain.compound.element_name.is_some());
    }

    #[test]
    fn descendant_and_child_combinators() {
        let list = parse_list("div > p.note a").unwrap();
        let sel = &list[0];
        assert!(sel.chain.compound.element_name.is_some());
        let (comb1, left1) = sel.chain.left.as_deref().unwrap();
        assert_eq!(*comb1, Combinator::Descendant);
        let (comb2, _) = left1.left.as_deref().unwrap();
        assert_eq!(*comb2, Combinator::Child);
    }

    #[test]
    fn comma_separated_list_shares_declaration() {
        let list = parse_list("h1, h2, h3").unwrap();
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn universal_and_class_and_id() {
        let list = parse_list("*.foo#bar").unwrap();
        assert!(list[0].chain.compound.element_name.is_none());
        assert_eq!(list[0].chain.compound.rules.len(), 2);
    }

    #[test]
    fn attribute_selectors_with_case_insensitive_flag() {
        let list = parse_list("a[href^=\"http\" i]").unwrap();
        match &list[0].chain.compound.rules[0] {
            SimpleRule::AttrPrefix { ci, value, .. } => {
                assert!(*ci);
                assert_eq!(value, "http");
            }
            other => panic!("unexpected rule: {other:?}"),
        }
    }

    #[test]
    fn nth_child_pseudo_class() {
        let list = parse_list("li:nth-child(2n+1)").unwrap();
        match &list[0].chain.compound.rules[0] {
            SimpleRule::PseudoClass(PseudoClass::NthChild(args)) => {
                assert_eq!(*args, NthArgs { step: 2, offset: 1 });
            }
            other => panic!("unexpected rule: {other:?}"),
        }
    }

    #[test]
    fn pseudo_element_must_be_last() {
        assert!(parse_list("a::before span").is_none());
        assert!(parse_list("a::before").is_some());
    }

    #[test]
    fn malformed_selector_invalidates_whole_list() {
        assert!(parse_list("h1, h2[, h3").is_none());
    }

    #[test]
    fn specificity_orders_id_over_class_over_type() {
        let id_sel = parse_list("#a").unwrap();
        let class_sel = parse_list(".a").unwrap();
        let type_sel = parse_list("a").unwrap();
        assert!(id_sel[0].specificity > class_sel[0].specificity);
        assert!(class_sel[0].specificity > type_sel[0].specificity);
    }

    #[test]
    fn late_hint_outweighs_specificity() {
        let tokens = CSSTokenizer::new("#a").tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let mut names = NameTable::new();
        let decl = Rc::new(Declaration::default());
        let mut seq = 0;
        let normal = parse_selector_list(&mut cursor, &mut names, DocumentFormat::Flat, &decl, false, &mut seq).unwrap();

        let tokens = CSSTokenizer::new("a").tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let late = parse_selector_list(&mut cursor, &mut names, DocumentFormat::Flat, &decl, true, &mut seq).unwrap();

        assert!(late[0].specificity > normal[0].specificity);
    }

    #[test]
    fn html_aliases_to_fragment_root_for_fragmented_containers() {
        let tokens = CSSTokenizer::new("html").tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let mut names = NameTable::new();
        let decl = Rc::new(Declaration::default());
        let mut seq = 0;
        let list = parse_selector_list(&mut cursor, &mut names, DocumentFormat::FragmentedContainer, &decl, false, &mut seq).unwrap();
        let id = list[0].chain.compound.element_name.unwrap();
        assert_eq!(names.name(id), Some(vellum_dom::FRAGMENT_ROOT_TAG));
    }
}
