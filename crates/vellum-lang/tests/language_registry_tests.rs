use vellum_common::EngineConfig;
use vellum_dom::{DocumentFormat, RefTree, StyleTree};
use vellum_lang::hyphenate::NullDictionaryLoader;
use vellum_lang::{node_language, LangRegistry};

fn loaderless_registry() -> LangRegistry {
    LangRegistry::new(Box::new(NullDictionaryLoader))
}

#[test]
fn node_language_walks_up_to_nearest_lang_attribute() {
    let mut tree = RefTree::new("body", DocumentFormat::Flat);
    let lang_id = tree.names_mut_for_test().intern("lang");
    let root = tree.root();
    tree.set_attr(root, "lang", "fr");
    let section = tree.add_element(root, "section");
    let para = tree.add_element(section, "p");

    assert_eq!(node_language(&tree, para, lang_id).as_deref(), Some("fr"));
}

#[test]
fn node_language_prefers_the_nearest_ancestor() {
    let mut tree = RefTree::new("body", DocumentFormat::Flat);
    let lang_id = tree.names_mut_for_test().intern("lang");
    let root = tree.root();
    tree.set_attr(root, "lang", "en");
    let section = tree.add_element(root, "section");
    tree.set_attr(section, "lang", "de");
    let para = tree.add_element(section, "p");

    assert_eq!(node_language(&tree, para, lang_id).as_deref(), Some("de"));
}

#[test]
fn node_language_is_none_with_no_lang_anywhere() {
    let mut tree = RefTree::new("body", DocumentFormat::Flat);
    let lang_id = tree.names_mut_for_test().intern("lang");
    let root = tree.root();
    let para = tree.add_element(root, "p");

    assert_eq!(node_language(&tree, para, lang_id), None);
}

#[test]
fn registry_assembles_german_quotes_and_line_breaks() {
    let mut reg = loaderless_registry();
    let config = EngineConfig { embedded_langs_enabled: true, ..EngineConfig::default() };
    let cfg = reg.get("de", "en", &config, false);
    assert_eq!(cfg.opening_quote(), '\u{201e}');
    assert!(!cfg.is_ja_or_zh());
}

#[test]
fn registry_reuses_the_same_cfg_across_a_document() {
    let mut reg = loaderless_registry();
    let config = EngineConfig { embedded_langs_enabled: true, ..EngineConfig::default() };
    let first = reg.get("ja", "en", &config, false);
    let second = reg.get("ja", "en", &config, false);
    assert!(std::rc::Rc::ptr_eq(&first, &second));
    assert!(first.is_japanese());
}
