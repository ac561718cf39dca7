//! Integration coverage for at-rule handling (spec §4.5/§5, "C5"):
//! `@import` resolution through a host-supplied loader, `@media`/`@supports`
//! gating, and the brace-balance-preserving discard of rules this engine
//! assigns no behaviour to.

use std::cell::RefCell;

use vellum_common::StyleError;
use vellum_css::atrule::{MediaContext, StylesheetLoader};
use vellum_css::{compute_style, parse_stylesheet};
use vellum_dom::{DocumentFormat, RefTree, StyleTree};

fn media_ctx() -> MediaContext {
    MediaContext { viewport_width: 320, viewport_height: 480, screen_width: 320, screen_height: 480, render_dpi: 96 }
}

struct FixedLoader {
    sources: RefCell<Vec<(String, String)>>,
}

impl FixedLoader {
    fn new(entries: &[(&str, &str)]) -> Self {
        Self {
            sources: RefCell::new(entries.iter().map(|(u, s)| ((*u).to_string(), (*s).to_string())).collect()),
        }
    }
}

impl StylesheetLoader for FixedLoader {
    fn load(&self, _base: &str, url: &str) -> Result<String, StyleError> {
        self.sources
            .borrow()
            .iter()
            .find(|(u, _)| u == url)
            .map(|(_, s)| s.clone())
            .ok_or_else(|| StyleError::StylesheetLoad { url: url.to_string(), reason: "not found".to_string() })
    }
}

#[test]
fn import_is_resolved_and_prepended_via_loader() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let loader = FixedLoader::new(&[("base.css", "p { color: red }")]);
    let sheet = parse_stylesheet(
        "@import url(base.css);",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        Some(&loader),
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (255, 0, 0));
}

#[test]
fn import_without_loader_is_parsed_but_never_fetched() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let sheet = parse_stylesheet(
        "@import url(base.css); p { color: blue }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (0, 0, 255));
}

#[test]
fn import_gated_by_media_query_is_skipped_when_it_fails() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let loader = FixedLoader::new(&[("wide.css", "p { color: red }")]);
    let sheet = parse_stylesheet(
        "@import url(wide.css) (min-width: 2000px); p { color: green }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        Some(&loader),
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (0, 128, 0));
}

#[test]
fn media_query_matching_viewport_applies_its_rules() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let sheet = parse_stylesheet(
        "@media (max-width: 400px) { p { color: red } }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (255, 0, 0));
}

#[test]
fn media_query_list_comma_is_logical_or() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    // The first branch fails (viewport is portrait-narrow); the second
    // matches, so the comma-joined list as a whole should still apply.
    let sheet = parse_stylesheet(
        "@media (min-width: 2000px), (orientation: portrait) { p { color: red } }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (255, 0, 0));
}

#[test]
fn unsupported_at_rule_is_discarded_but_keeps_brace_balance() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let sheet = parse_stylesheet(
        "@font-face { font-family: Foo; src: url(foo.woff); } p { color: red }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    // The rule after the unrecognised at-rule still parses, which only
    // happens if the `{...}` body was skipped in balance rather than
    // de-synchronising the cursor.
    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (255, 0, 0));
}

#[test]
fn charset_rule_is_skipped_to_next_semicolon() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let sheet = parse_stylesheet(
        "@charset \"UTF-8\"; p { color: red }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!((style.color.r(), style.color.g(), style.color.b()), (255, 0, 0));
}
