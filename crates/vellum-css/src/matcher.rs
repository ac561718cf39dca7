//! Match & Apply (spec §3/§4.4-§4.7, "C7"): selector matching against a
//! [`StyleTree`] and cascade application into a [`ComputedStyle`].
//!
//! Matching walks a [`SelectorChain`] subject-first, which is also the
//! direction cheap DOM access goes (ancestors and preceding siblings are
//! known; descendants and following siblings of a node being styled
//! top-down are not, except where a pseudo-class is explicitly flagged
//! [`PseudoClass::requires_full_dom`] and the caller supplies a complete
//! tree anyway).

use std::collections::HashMap;

use vellum_dom::{NameId, PseudoClassCache, StyleTree};

use crate::declaration::{
    Declaration, FontWeight, Importance, OnlyIfGuard, Property, Value,
};
use crate::selector::{Combinator, CompoundSelector, ParsedSelector, PseudoClass, PseudoElement, SelectorChain, SimpleRule};
use crate::style::{resolve_bolder, resolve_lighter, ComputedStyle};
use crate::stylesheet::Stylesheet;
use crate::values::{Color, GenericValue};
use crate::declaration::{BorderStyle, CrHint, Display};

/// Compute `node`'s cascaded style: merge the stylesheet's universal and
/// element-name buckets in ascending specificity order, apply every
/// matching declaration, and resolve `::before`/`::after` into their own
/// pending style slots. `parent` is the already-computed style of `node`'s
/// styling parent (`None` for the document root).
#[must_use]
pub fn compute_style<T: StyleTree>(
    tree: &T,
    node: T::Node,
    sheet: &Stylesheet,
    parent: Option<&ComputedStyle>,
) -> ComputedStyle {
    let mut style = parent.map_or_else(ComputedStyle::initial, ComputedStyle::inherit_from);
    let inherited_font_weight = absolute_weight_of(style.font_weight, 400);

    let name = tree.element_name_id(node);
    let universal = sheet.universal_bucket();
    let named = sheet.bucket_for(name);

    let mut importance: HashMap<Property, Importance> = HashMap::new();
    let mut before_decls = Vec::new();
    let mut after_decls = Vec::new();

    for selector in merge_by_specificity(universal, named) {
        if !matches_chain(tree, node, &selector.chain) {
            continue;
        }
        match selector.pseudo_element {
            None => apply_declaration(tree, node, &mut style, &selector.declaration, inherited_font_weight, &mut importance),
            Some(PseudoElement::Before) => before_decls.push(&selector.declaration),
            Some(PseudoElement::After) => after_decls.push(&selector.declaration),
        }
    }

    style.before = build_pseudo_element_style(tree, node, &style, &before_decls);
    style.after = build_pseudo_element_style(tree, node, &style, &after_decls);
    style
}

fn build_pseudo_element_style<T: StyleTree>(
    tree: &T,
    node: T::Node,
    host: &ComputedStyle,
    decls: &[&Declaration],
) -> Option<Box<ComputedStyle>> {
    if decls.is_empty() {
        return None;
    }
    let mut pseudo_style = ComputedStyle::inherit_from(host);
    let inherited_font_weight = absolute_weight_of(pseudo_style.font_weight, 400);
    let mut importance: HashMap<Property, Importance> = HashMap::new();
    for decl in decls {
        apply_declaration(tree, node, &mut pseudo_style, decl, inherited_font_weight, &mut importance);
    }
    Some(Box::new(pseudo_style))
}

/// Yield selectors from two already-sorted buckets in ascending specificity
/// order (a plain merge, mirroring [`Stylesheet::insert`]'s own ordering
/// invariant).
fn merge_by_specificity<'a>(universal: &'a [ParsedSelector], named: &'a [ParsedSelector]) -> Vec<&'a ParsedSelector> {
    let mut out = Vec::with_capacity(universal.len() + named.len());
    let (mut ui, mut ni) = (0, 0);
    while ui < universal.len() && ni < named.len() {
        if universal[ui].specificity <= named[ni].specificity {
            out.push(&universal[ui]);
            ui += 1;
        } else {
            out.push(&named[ni]);
            ni += 1;
        }
    }
    out.extend(universal[ui..].iter());
    out.extend(named[ni..].iter());
    out
}

fn absolute_weight_of(weight: FontWeight, fallback_inherited: u16) -> u16 {
    match weight {
        FontWeight::Absolute(w) => w,
        FontWeight::Bolder => resolve_bolder(fallback_inherited),
        FontWeight::Lighter => resolve_lighter(fallback_inherited),
    }
}

fn apply_declaration<T: StyleTree>(
    tree: &T,
    node: T::Node,
    style: &mut ComputedStyle,
    declaration: &Declaration,
    inherited_font_weight: u16,
    importance: &mut HashMap<Property, Importance>,
) {
    for entry in &declaration.entries {
        match &entry.value {
            Value::CrOnlyIf(guards) => {
                if !guards.iter().all(|g| dynamic_guard_holds(*g, style)) {
                    return;
                }
                continue;
            }
            Value::CrIgnoreIfDomVersionGte(threshold) => {
                if tree.dom_version() >= *threshold {
                    return;
                }
                continue;
            }
            _ => {}
        }

        let current = importance.get(&entry.property).copied().unwrap_or(Importance::None);
        if entry.importance < current {
            continue;
        }
        apply_value(style, inherited_font_weight, entry.property, &entry.value);
        let _ = importance.insert(entry.property, entry.importance);
    }
}

fn dynamic_guard_holds(guard: OnlyIfGuard, style: &ComputedStyle) -> bool {
    match guard {
        OnlyIfGuard::Inline(expected) => {
            matches!(style.display, Display::Inline | Display::InlineBlock) == expected
        }
        OnlyIfGuard::InpageFootnote(expected) => style.cr_hint.contains(CrHint::FOOTNOTE_INPAGE) == expected,
        OnlyIfGuard::InsideInpageFootnote(expected) => {
            style.cr_hint.contains(CrHint::INSIDE_FOOTNOTE_INPAGE) == expected
        }
        // Static guards are already resolved at compile time; a declaration
        // carrying one never reaches apply time unless it held.
        OnlyIfGuard::FragmentedContainer(_) => true,
    }
}

fn resolve_color(style: &ComputedStyle, value: &Value) -> Color {
    match value {
        Value::Color(c) => *c,
        Value::Length(length) if length.as_generic() == Some(GenericValue::CurrentColor) => style.color,
        _ => style.color,
    }
}

#[allow(clippy::too_many_lines)]
fn apply_value(style: &mut ComputedStyle, inherited_font_weight: u16, property: Property, value: &Value) {
    match (property, value) {
        (Property::Display, Value::Display(d)) => style.display = *d,
        (Property::Width, Value::Length(l)) => style.width = *l,
        (Property::Height, Value::Length(l)) => style.height = *l,
        (Property::MinWidth, Value::Length(l)) => style.min_width = *l,
        (Property::MinHeight, Value::Length(l)) => style.min_height = *l,
        (Property::MaxWidth, Value::Length(l)) => style.max_width = *l,
        (Property::MaxHeight, Value::Length(l)) => style.max_height = *l,
        (Property::MarginTop, Value::Length(l)) => style.margin[0] = *l,
        (Property::MarginRight, Value::Length(l)) => style.margin[1] = *l,
        (Property::MarginBottom, Value::Length(l)) => style.margin[2] = *l,
        (Property::MarginLeft, Value::Length(l)) => style.margin[3] = *l,
        (Property::PaddingTop, Value::Length(l)) => style.padding[0] = *l,
        (Property::PaddingRight, Value::Length(l)) => style.padding[1] = *l,
        (Property::PaddingBottom, Value::Length(l)) => style.padding[2] = *l,
        (Property::PaddingLeft, Value::Length(l)) => style.padding[3] = *l,
        (Property::BorderTopWidth, Value::Length(l)) => style.border_width[0] = *l,
        (Property::BorderRightWidth, Value::Length(l)) => style.border_width[1] = *l,
        (Property::BorderBottomWidth, Value::Length(l)) => style.border_width[2] = *l,
        (Property::BorderLeftWidth, Value::Length(l)) => style.border_width[3] = *l,
        (Property::BorderTopStyle, Value::BorderStyle(s)) => style.border_style[0] = *s,
        (Property::BorderRightStyle, Value::BorderStyle(s)) => style.border_style[1] = *s,
        (Property::BorderBottomStyle, Value::BorderStyle(s)) => style.border_style[2] = *s,
        (Property::BorderLeftStyle, Value::BorderStyle(s)) => style.border_style[3] = *s,
        (Property::BorderTopColor, v) => {
            let c = resolve_color(style, v);
            style.border_color[0] = c;
        }
        (Property::BorderRightColor, v) => {
            let c = resolve_color(style, v);
            style.border_color[1] = c;
        }
        (Property::BorderBottomColor, v) => {
            let c = resolve_color(style, v);
            style.border_color[2] = c;
        }
        (Property::BorderLeftColor, v) => {
            let c = resolve_color(style, v);
            style.border_color[3] = c;
        }
        (Property::Color, v) => style.color = resolve_color(style, v),
        (Property::BackgroundColor, v) => style.background_color = resolve_color(style, v),
        (Property::BackgroundImage, Value::FontFamilyList(urls)) => {
            style.background_image = urls.first().cloned();
        }
        (Property::BackgroundRepeat, Value::BackgroundRepeat(r)) => style.background_repeat = *r,
        (Property::BackgroundPositionX, Value::Length(l)) => style.background_position.0 = *l,
        (Property::BackgroundPositionY, Value::Length(l)) => style.background_position.1 = *l,
        (Property::FontFamily, Value::FontFamilyList(families)) => style.font_family = families.clone(),
        (Property::FontSize, Value::Length(l)) => style.font_size = *l,
        (Property::FontStyle, Value::FontStyle(s)) => style.font_style = *s,
        (Property::FontWeight, Value::FontWeight(w)) => {
            style.font_weight = FontWeight::Absolute(absolute_weight_of(*w, inherited_font_weight));
        }
        (Property::FontVariant, Value::FontVariant { flags, reset }) => {
            if *reset {
                style.font_variant = *flags;
            } else {
                style.font_variant |= *flags;
            }
        }
        (Property::FontFeatureSettings, _) => {}
        (Property::LineHeight, Value::Length(l)) => style.line_height = *l,
        (Property::TextAlign, Value::TextAlign(a)) => style.text_align = *a,
        (Property::TextIndent, Value::Length(l)) => style.text_indent = *l,
        (Property::TextTransform, Value::TextTransform(t)) => style.text_transform = *t,
        (Property::TextDecoration, Value::TextDecoration(d)) => style.text_decoration = *d,
        (Property::VerticalAlign, Value::Length(l)) => style.vertical_align = *l,
        (Property::WhiteSpace, Value::WhiteSpace(w)) => style.white_space = *w,
        (Property::LetterSpacing, Value::Length(l)) => style.letter_spacing = *l,
        (Property::WordSpacing, Value::Length(l)) => style.word_spacing = *l,
        (Property::ListStyleType, Value::ListStyleType(t)) => style.list_style_type = *t,
        (Property::ListStylePosition, Value::ListStylePosition(p)) => style.list_style_position = *p,
        (Property::ListStyleImage, Value::FontFamilyList(urls)) => {
            style.list_style_image = urls.first().cloned();
        }
        (Property::Content, Value::Content(c)) => style.content = Some(c.clone()),
        (Property::Orphans, Value::Integer(n)) => style.orphans = *n,
        (Property::Widows, Value::Integer(n)) => style.widows = *n,
        (Property::ZIndex, Value::Integer(n)) => style.z_index = (*n >= 0).then_some(*n),
        (Property::Direction, Value::DirectionRtl(rtl)) => style.direction_rtl = *rtl,
        (Property::CrHint, Value::CrHint(v)) => {
            if v.reset {
                style.cr_hint = v.flags;
            } else {
                style.cr_hint |= v.flags;
            }
        }
        // Handled earlier in `apply_declaration`, or a property/value shape
        // the parser never actually produces together.
        _ => {}
    }
}

/// Whether `node` (via `chain`'s subject compound) matches at `node`,
/// recursing leftward across combinators.
pub(crate) fn matches_chain<T: StyleTree>(tree: &T, node: T::Node, chain: &SelectorChain) -> bool {
    if !matches_compound(tree, node, &chain.compound) {
        return false;
    }
    let Some(boxed) = &chain.left else {
        return true;
    };
    let (combinator, left_chain) = boxed.as_ref();
    let except = left_chain.compound.element_name;
    match combinator {
        Combinator::Child => tree
            .unboxed_parent(node, except)
            .is_some_and(|parent| matches_chain(tree, parent, left_chain)),
        Combinator::Descendant => {
            let mut cur = node;
            loop {
                match tree.unboxed_parent(cur, except) {
                    Some(parent) => {
                        if matches_chain(tree, parent, left_chain) {
                            return true;
                        }
                        cur = parent;
                    }
                    None => return false,
                }
            }
        }
        Combinator::Adjacent => tree
            .unboxed_prev_sibling(node, true, except)
            .is_some_and(|prev| matches_chain(tree, prev, left_chain)),
        Combinator::Sibling => {
            let mut cur = node;
            loop {
                match tree.unboxed_prev_sibling(cur, true, except) {
                    Some(prev) => {
                        if matches_chain(tree, prev, left_chain) {
                            return true;
                        }
                        cur = prev;
                    }
                    None => return false,
                }
            }
        }
    }
}

fn matches_compound<T: StyleTree>(tree: &T, node: T::Node, compound: &CompoundSelector) -> bool {
    if tree.is_text(node) {
        return false;
    }
    if let Some(name) = compound.element_name {
        if tree.element_name_id(node) != name {
            return false;
        }
    }
    compound.rules.iter().all(|rule| matches_simple_rule(tree, node, rule))
}

fn attr_value<T: StyleTree>(tree: &T, node: T::Node, name: NameId, ci: bool) -> Option<String> {
    tree.attribute(node, name).map(|v| if ci { v.to_ascii_lowercase() } else { v.to_owned() })
}

fn matches_simple_rule<T: StyleTree>(tree: &T, node: T::Node, rule: &SimpleRule) -> bool {
    match rule {
        SimpleRule::ClassContains(class) => {
            let Some(class_name) = tree.lookup_name("class") else {
                return false;
            };
            tree.attribute(node, class_name)
                .is_some_and(|value| value.split_ascii_whitespace().any(|word| word == class))
        }
        SimpleRule::IdEquals(id) => {
            let Some(id_name) = tree.lookup_name("id") else {
                return false;
            };
            tree.attribute(node, id_name) == Some(id.as_str())
        }
        SimpleRule::AttrExists(name) => tree.has_attribute(node, *name),
        SimpleRule::AttrEq { name, value, ci } => attr_value(tree, node, *name, *ci).is_some_and(|v| v == *value),
        SimpleRule::AttrHas { name, value, ci } => {
            attr_value(tree, node, *name, *ci).is_some_and(|v| v.split_ascii_whitespace().any(|w| w == value))
        }
        SimpleRule::AttrDashPrefix { name, value, ci } => attr_value(tree, node, *name, *ci)
            .is_some_and(|v| v == *value || v.strip_prefix(value.as_str()).is_some_and(|rest| rest.starts_with('-'))),
        SimpleRule::AttrPrefix { name, value, ci } => {
            attr_value(tree, node, *name, *ci).is_some_and(|v| v.starts_with(value.as_str()))
        }
        SimpleRule::AttrSuffix { name, value, ci } => {
            attr_value(tree, node, *name, *ci).is_some_and(|v| v.ends_with(value.as_str()))
        }
        SimpleRule::AttrSubstring { name, value, ci } => {
            attr_value(tree, node, *name, *ci).is_some_and(|v| v.contains(value.as_str()))
        }
        SimpleRule::PseudoClass(pc) => matches_pseudo_class(tree, node, *pc),
    }
}

fn matches_pseudo_class<T: StyleTree>(tree: &T, node: T::Node, pc: PseudoClass) -> bool {
    match pc {
        PseudoClass::Root => tree.is_root(node),
        PseudoClass::Dir(rtl) => matches_dir(tree, node, rtl),
        PseudoClass::FirstChild => is_first_child(tree, node),
        PseudoClass::FirstOfType => is_first_of_type(tree, node),
        PseudoClass::NthChild(args) => args.matches(cached_nth_child_ordinal(tree, node)),
        PseudoClass::NthOfType(args) => args.matches(cached_nth_of_type_ordinal(tree, node)),
        PseudoClass::LastChild => is_last_child(tree, node),
        PseudoClass::LastOfType => is_last_of_type(tree, node),
        PseudoClass::NthLastChild(args) => args.matches(sibling_ordinal_backward(tree, node, false)),
        PseudoClass::NthLastOfType(args) => args.matches(sibling_ordinal_backward(tree, node, true)),
        PseudoClass::OnlyChild => is_only_child(tree, node),
        PseudoClass::OnlyOfType => is_only_of_type(tree, node),
        PseudoClass::Empty => is_empty(tree, node),
    }
}

fn matches_dir<T: StyleTree>(tree: &T, node: T::Node, want_rtl: bool) -> bool {
    let Some(dir_name) = tree.lookup_name("dir") else {
        return !want_rtl;
    };
    let mut cur = Some(node);
    while let Some(n) = cur {
        if let Some(value) = tree.attribute(n, dir_name) {
            if value.eq_ignore_ascii_case("rtl") {
                return want_rtl;
            }
            if value.eq_ignore_ascii_case("ltr") {
                return !want_rtl;
            }
        }
        cur = tree.unboxed_parent(n, None);
    }
    !want_rtl
}

fn sibling_ordinal_forward<T: StyleTree>(tree: &T, node: T::Node, same_type_only: bool) -> u32 {
    let name = tree.element_name_id(node);
    let mut ordinal = 1u32;
    let mut cur = node;
    while let Some(prev) = tree.unboxed_prev_sibling(cur, true, None) {
        if !same_type_only || tree.element_name_id(prev) == name {
            ordinal += 1;
        }
        cur = prev;
    }
    ordinal
}

/// Ordinal counted from the *last* sibling inward, used by `:nth-last-child`
/// and kin. Not cached: [`PseudoClassCache`] reserves its ordinal fields for
/// the forward direction, and a reverse count needs the fully built subtree
/// regardless (see [`PseudoClass::requires_full_dom`]).
fn sibling_ordinal_backward<T: StyleTree>(tree: &T, node: T::Node, same_type_only: bool) -> u32 {
    let name = tree.element_name_id(node);
    let mut ordinal = 1u32;
    let mut cur = node;
    while let Some(next) = tree.unboxed_next_sibling(cur, true, None) {
        if !same_type_only || tree.element_name_id(next) == name {
            ordinal += 1;
        }
        cur = next;
    }
    ordinal
}

fn cached_nth_child_ordinal<T: StyleTree>(tree: &T, node: T::Node) -> u32 {
    let cell = tree.pseudo_class_cache(node);
    let mut cache = cell.get();
    if cache.nth_child_ordinal != 0 {
        return u32::from(cache.nth_child_ordinal);
    }
    let ordinal = sibling_ordinal_forward(tree, node, false);
    cache.nth_child_ordinal = u16::try_from(ordinal).unwrap_or(u16::MAX);
    cell.set(cache);
    ordinal
}

fn cached_nth_of_type_ordinal<T: StyleTree>(tree: &T, node: T::Node) -> u32 {
    let cell = tree.pseudo_class_cache(node);
    let mut cache = cell.get();
    if cache.nth_of_type_ordinal != 0 {
        return u32::from(cache.nth_of_type_ordinal);
    }
    let ordinal = sibling_ordinal_forward(tree, node, true);
    cache.nth_of_type_ordinal = u16::try_from(ordinal).unwrap_or(u16::MAX);
    cell.set(cache);
    ordinal
}

fn cached_bool<T: StyleTree>(
    tree: &T,
    node: T::Node,
    field: fn(&PseudoClassCache) -> u16,
    set_field: fn(&mut PseudoClassCache, u16),
    compute: impl FnOnce(&T, T::Node) -> bool,
) -> bool {
    let cell = tree.pseudo_class_cache(node);
    let mut cache = cell.get();
    if let Some(cached) = PseudoClassCache::decode_bool(field(&cache)) {
        return cached;
    }
    let result = compute(tree, node);
    set_field(&mut cache, PseudoClassCache::encode_bool(result));
    cell.set(cache);
    result
}

fn is_first_child<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.first_child, |c, v| c.first_child = v, |t, n| {
        t.unboxed_prev_sibling(n, true, None).is_none()
    })
}

fn is_last_child<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.last_child, |c, v| c.last_child = v, |t, n| {
        t.unboxed_next_sibling(n, true, None).is_none()
    })
}

fn is_first_of_type<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.first_of_type, |c, v| c.first_of_type = v, |t, n| {
        cached_nth_of_type_ordinal(t, n) == 1
    })
}

fn is_last_of_type<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.last_of_type, |c, v| c.last_of_type = v, |t, n| {
        sibling_ordinal_backward(t, n, true) == 1
    })
}

fn is_only_child<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.only_child, |c, v| c.only_child = v, |t, n| {
        is_first_child(t, n) && is_last_child(t, n)
    })
}

fn is_only_of_type<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.only_of_type, |c, v| c.only_of_type = v, |t, n| {
        is_first_of_type(t, n) && is_last_of_type(t, n)
    })
}

fn is_empty<T: StyleTree>(tree: &T, node: T::Node) -> bool {
    cached_bool(tree, node, |c| c.empty, |c, v| c.empty = v, |t, n| {
        t.unboxed_first_child(n, false, None).is_none()
    })
}

/// Whether `selector` matches `node` (used by
/// [`crate::stylesheet::Stylesheet::matching_rule_sources`]).
#[must_use]
pub(crate) fn matches_selector<T: StyleTree>(tree: &T, node: T::Node, selector: &ParsedSelector) -> bool {
    matches_chain(tree, node, &selector.chain)
}

// `BorderStyle` is only referenced through `ComputedStyle`'s field types;
// this import keeps the module self-contained if that ever changes.
#[allow(unused_imports)]
use BorderStyle as _BorderStyleUsedByComputedStyle;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::Declaration;
    use crate::selector::parse_selector_list;
    use crate::tokenizer::{CSSTokenizer, TokenCursor};
    use std::rc::Rc;
    use vellum_dom::{DocumentFormat, NameTable, RefTree};

    fn style_sheet_from(src: &str, names: &mut NameTable) -> Stylesheet {
        let tokens = CSSTokenizer::new(src).tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        let mut sheet = Stylesheet::new();
        loop {
            cursor.skip_whitespace();
            if matches!(cursor.peek(), crate::tokenizer::CSSToken::Eof) {
                break;
            }
            let mut selector_tokens = Vec::new();
            loop {
                match cursor.peek() {
                    crate::tokenizer::CSSToken::LeftBrace | crate::tokenizer::CSSToken::Eof => break,
                    _ => selector_tokens.push(cursor.advance()),
                }
            }
            let _ = cursor.advance();
            let ctx = crate::declaration::CompileContext { format: DocumentFormat::Flat };
            let declaration = Rc::new(crate::declaration::compile_declaration_block(&mut cursor, &ctx));
            let mut sel_cursor = TokenCursor::new(selector_tokens);
            let mut seq = 0;
            if let Some(selectors) = parse_selector_list(&mut sel_cursor, names, DocumentFormat::Flat, &declaration, false, &mut seq) {
                sheet.extend(selectors);
            }
        }
        sheet
    }

    #[test]
    fn descendant_combinator_matches_through_intermediate_levels() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let body = tree.add_element(html, "body");
        let div = tree.add_element(body, "div");
        let span = tree.add_element(div, "span");

        let mut sheet = style_sheet_from("body span { color: #ff0000; }", &mut tree.names_mut_for_test());
        let _ = sheet;
        let sheet = style_sheet_from("body span { color: #ff0000; }", &mut tree.names_mut_for_test());
        let style = compute_style(&tree, span, &sheet, None);
        assert_eq!(style.color, Color::rgb(0xff, 0, 0));
        let div_style = compute_style(&tree, div, &sheet, None);
        assert_ne!(div_style.color, Color::rgb(0xff, 0, 0));
    }

    #[test]
    fn child_combinator_does_not_reach_through_grandchildren() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let body = tree.add_element(html, "body");
        let div = tree.add_element(body, "div");
        let span = tree.add_element(div, "span");

        let sheet = style_sheet_from("body > span { color: #00ff00; }", &mut tree.names_mut_for_test());
        let span_style = compute_style(&tree, span, &sheet, None);
        assert_ne!(span_style.color, Color::rgb(0, 0xff, 0));
        let div_style = compute_style(&tree, div, &sheet, None);
        let _ = div_style;
    }

    #[test]
    fn important_outranks_higher_specificity() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let p = tree.add_element(html, "p");
        tree.set_attr(p, "class", "note");

        let sheet = style_sheet_from(
            "p.note { color: #0000ff; } p { color: #ff0000 !important; }",
            &mut tree.names_mut_for_test(),
        );
        let style = compute_style(&tree, p, &sheet, None);
        assert_eq!(style.color, Color::rgb(0xff, 0, 0));
    }

    #[test]
    fn nth_child_matches_expected_ordinal() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let ul = tree.add_element(html, "ul");
        let li1 = tree.add_element(ul, "li");
        let li2 = tree.add_element(ul, "li");
        let li3 = tree.add_element(ul, "li");

        let sheet = style_sheet_from("li:nth-child(2) { color: #112233; }", &mut tree.names_mut_for_test());
        assert_ne!(compute_style(&tree, li1, &sheet, None).color, Color(0x0011_2233));
        assert_eq!(compute_style(&tree, li2, &sheet, None).color, Color(0x0011_2233));
        assert_ne!(compute_style(&tree, li3, &sheet, None).color, Color(0x0011_2233));
    }

    #[test]
    fn before_pseudo_element_is_routed_to_its_own_slot() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let q = tree.add_element(html, "q");

        let sheet = style_sheet_from("q::before { content: open-quote; }", &mut tree.names_mut_for_test());
        let style = compute_style(&tree, q, &sheet, None);
        assert!(style.content.is_none());
        assert!(style.before.is_some());
    }

    #[test]
    fn boxing_wrapper_is_transparent_to_child_combinator() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let table = tree.add_element(html, "table");
        let wrapper = tree.add_boxing_wrapper(table, "tabularBox");
        let row = tree.add_element(wrapper, "tr");

        let sheet = style_sheet_from("table > tr { color: #abcdef; }", &mut tree.names_mut_for_test());
        let style = compute_style(&tree, row, &sheet, None);
        assert_eq!(style.color, Color(0x00ab_cdef));
    }
}
