//! Integration coverage for compiled rule storage (spec §4.6, "C6"):
//! snapshot push/pop scoping, content hashing for snapshot purity (spec's
//! Testable Property 4), and `matching_rule_sources` introspection, all
//! driven through `parse_stylesheet` against a [`RefTree`] rather than
//! by constructing `ParsedSelector`s by hand.

use vellum_css::atrule::MediaContext;
use vellum_css::parse_stylesheet;
use vellum_dom::{DocumentFormat, RefTree, StyleTree};

fn media_ctx() -> MediaContext {
    MediaContext { viewport_width: 800, viewport_height: 600, screen_width: 800, screen_height: 600, render_dpi: 96 }
}

#[test]
fn snapshot_push_pop_scopes_a_fragment_stylesheet() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);

    let mut sheet = parse_stylesheet(
        "p { color: red }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let p_id = tree.names_mut_for_test().intern("p");
    let before = sheet.bucket_for(p_id).len();
    assert_eq!(sheet.snapshot_depth(), 0);

    sheet.push_snapshot();
    let fragment = parse_stylesheet(
        "p { color: blue } p { color: green }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();
    sheet.extend(fragment.bucket_for(p_id).iter().cloned());
    assert_eq!(sheet.snapshot_depth(), 1);
    assert_eq!(sheet.bucket_for(p_id).len(), before + 2);

    sheet.pop_snapshot();
    assert_eq!(sheet.snapshot_depth(), 0);
    assert_eq!(sheet.bucket_for(p_id).len(), before);
}

#[test]
fn pop_snapshot_on_empty_stack_is_a_harmless_no_op() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let mut sheet = parse_stylesheet(
        "p { color: red }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let p_id = tree.names_mut_for_test().intern("p");
    let before = sheet.bucket_for(p_id).len();
    sheet.pop_snapshot();
    assert_eq!(sheet.bucket_for(p_id).len(), before);
}

#[test]
fn content_hash_is_stable_across_reformatted_but_semantically_equal_sources() {
    let mut names_a = vellum_dom::NameTable::new();
    let mut names_b = vellum_dom::NameTable::new();

    let sheet_a = parse_stylesheet(
        "p.note{color:RED;margin:1PX 2px}\n",
        &mut names_a,
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let sheet_b = parse_stylesheet(
        "/* comment */ p.note { color: red; margin: 1px 2px; }",
        &mut names_b,
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    assert_eq!(sheet_a.content_hash(), sheet_b.content_hash());
}

#[test]
fn content_hash_changes_when_a_declaration_changes() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);

    let sheet_a = parse_stylesheet(
        "p { color: red }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();
    let sheet_b = parse_stylesheet(
        "p { color: blue }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    assert_ne!(sheet_a.content_hash(), sheet_b.content_hash());
}

#[test]
fn matching_rule_sources_includes_universal_and_named_buckets_in_specificity_order() {
    let mut tree = RefTree::new("div", DocumentFormat::Flat);
    let root = tree.root();
    tree.set_attr(root, "class", "note");

    let sheet = parse_stylesheet(
        "* { color: black } div { color: red } .note { color: blue } div.note { color: green }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let matches = sheet.matching_rule_sources(&tree, root);
    assert_eq!(matches.len(), 4);
    for pair in matches.windows(2) {
        assert!(pair[0].specificity <= pair[1].specificity);
    }
}

#[test]
fn matching_rule_sources_excludes_rules_for_other_elements() {
    let mut tree = RefTree::new("div", DocumentFormat::Flat);
    let root = tree.root();
    let para = tree.add_element(root, "p");

    let sheet = parse_stylesheet(
        "div { color: red } p { color: blue }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    assert_eq!(sheet.matching_rule_sources(&tree, para).len(), 1);
    assert_eq!(sheet.matching_rule_sources(&tree, root).len(), 1);
}
