//! End-to-end cascade scenarios (spec §8 concrete scenarios S1-S6), driven
//! through the public `parse_stylesheet` -> `compute_style` pipeline against
//! a [`RefTree`], rather than unit-testing each compiled stage in isolation.

use vellum_css::atrule::MediaContext;
use vellum_css::values::Length;
use vellum_css::{compute_style, parse_stylesheet};
use vellum_dom::{DocumentFormat, RefTree, StyleTree};

fn media_ctx() -> MediaContext {
    MediaContext { viewport_width: 800, viewport_height: 600, screen_width: 800, screen_height: 600, render_dpi: 96 }
}

#[test]
fn s1_nth_child_alternates_and_caches_ordinal() {
    let mut tree = RefTree::new("ul", DocumentFormat::Flat);
    let root = tree.root();
    let items: Vec<_> = (0..4).map(|_| tree.add_element(root, "li")).collect();

    let sheet = parse_stylesheet(
        "li:nth-child(2n+1) { color: #f00 } li:nth-child(2n) { color: #00f }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let root_style = compute_style(&tree, root, &sheet, None);
    let expect_red = [true, false, true, false];
    for (item, &red) in items.iter().zip(&expect_red) {
        let style = compute_style(&tree, *item, &sheet, Some(&root_style));
        let is_red = style.color.r() == 0xff && style.color.g() == 0 && style.color.b() == 0;
        assert_eq!(is_red, red);
    }

    for item in &items {
        let cached = tree.pseudo_class_cache(*item).get();
        assert_ne!(cached.nth_child_ordinal, 0, "ordinal should be cached after matching");
    }
}

#[test]
fn s2_descendant_vs_child_combinator() {
    let mut tree = RefTree::new("div", DocumentFormat::Flat);
    let root = tree.root();
    let section = tree.add_element(root, "section");
    let para = tree.add_element(section, "p");

    let sheet = parse_stylesheet(
        "div p { margin: 1em } div > p { margin: 2em }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let div_style = compute_style(&tree, root, &sheet, None);
    let section_style = compute_style(&tree, section, &sheet, Some(&div_style));
    let p_style = compute_style(&tree, para, &sheet, Some(&section_style));

    // The descendant rule (1em) wins; the child combinator does not reach
    // through the intervening <section>.
    assert_eq!(p_style.margin[0], length_em(1.0));
}

fn length_em(value: f32) -> Length {
    Length { unit: vellum_css::values::LengthUnit::Em, value: (value * 256.0) as i32 }
}

#[test]
fn s3_important_wins_over_higher_specificity() {
    let mut tree = RefTree::new("div", DocumentFormat::Flat);
    let root = tree.root();
    tree.set_attr(root, "id", "id");
    tree.set_attr(root, "class", "foo");

    let sheet = parse_stylesheet(
        "#id { color: blue !important } div#id.foo { color: red }",
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
fn s4_margin_shorthand_expands_trbl() {
    let mut tree = RefTree::new("div", DocumentFormat::Flat);
    let root = tree.root();

    let sheet = parse_stylesheet(
        "div { margin: 1px 2px 3px; }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_eq!(style.margin, [Length::px(1.0), Length::px(2.0), Length::px(3.0), Length::px(2.0)]);
}

#[test]
fn s5_supports_with_unsupported_feature_is_discarded() {
    let mut tree = RefTree::new("p", DocumentFormat::Flat);
    let root = tree.root();

    let sheet = parse_stylesheet(
        "@supports (display: flex) { p { color: red } }",
        tree.names_mut_for_test(),
        DocumentFormat::Flat,
        &media_ctx(),
        None,
        "",
    )
    .unwrap();

    let style = compute_style(&tree, root, &sheet, None);
    assert_ne!((style.color.r(), style.color.g(), style.color.b()), (255, 0, 0));
}
