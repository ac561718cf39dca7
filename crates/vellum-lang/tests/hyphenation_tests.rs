use vellum_common::EngineConfig;
use vellum_lang::hyphenate::method::{AlgoHyphMethod, NoHyphMethod, SoftHyphensMethod};
use vellum_lang::hyphenate::pattern::PatternHyphMethod;
use vellum_lang::hyphenate::{DictionaryRegistry, NullDictionaryLoader, UserWordList};
use vellum_lang::HyphMethod;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn no_hyph_method_is_selectable_and_inert() {
    let config = EngineConfig { hyphenation_enabled: false, ..EngineConfig::default() };
    let mut reg = DictionaryRegistry::new(Box::new(NullDictionaryLoader));
    let method = reg.no_hyph_method();
    assert_eq!(method.id(), "@none");
    assert_eq!(method.hyphenate(&chars("vocabulary"), &config, None), None);
}

#[test]
fn soft_hyphen_only_mode_ignores_dictionary_matches() {
    let method = SoftHyphensMethod;
    let config = EngineConfig::default();
    let word = chars("encyclo\u{00ad}pedia");
    let flags = method.hyphenate(&word, &config, None).unwrap();
    assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
}

#[test]
fn user_word_list_overrides_pattern_matching() {
    let list = UserWordList::parse("encyclopedia;en-cy-clo-pe-dia\n").unwrap();
    let dict = "<patterns><pattern>hy1phen</pattern></patterns>";
    let method = PatternHyphMethod::load_xml("test.pattern", dict).unwrap();
    let word = chars("encyclopedia");
    let flags = method.hyphenate(&word, &EngineConfig::default(), Some(&list)).unwrap();
    assert_eq!(flags.iter().filter(|&&f| f).count(), 4);
}

#[test]
fn trust_soft_hyphens_short_circuits_pattern_matching() {
    let dict = "<patterns><pattern>hy1phen</pattern></patterns>";
    let method = PatternHyphMethod::load_xml("test.pattern", dict).unwrap();
    let config = EngineConfig { trust_soft_hyphens: true, ..EngineConfig::default() };
    let word = chars("hyp\u{00ad}henation");
    let flags = method.hyphenate(&word, &config, None).unwrap();
    assert_eq!(flags.iter().filter(|&&f| f).count(), 1);
    assert!(flags[3]);
}

#[test]
fn algorithmic_fallback_used_for_unmapped_language() {
    let mut reg = DictionaryRegistry::new(Box::new(NullDictionaryLoader));
    let method = reg.method_for_lang("qq-unknown");
    assert_eq!(method.id(), "@algorithm");
    let flags = method.hyphenate(&chars("fundamental"), &EngineConfig::default(), None);
    assert!(flags.is_some());
}

#[test]
fn hyphen_min_config_override_is_honoured() {
    let method = AlgoHyphMethod;
    let config = EngineConfig { left_hyphen_min: 6, right_hyphen_min: 6, ..EngineConfig::default() };
    assert_eq!(method.hyphenate(&chars("fundamental"), &config, None), None);
}

#[test]
fn no_hyph_struct_is_distinguishable_from_algorithmic() {
    assert_eq!(NoHyphMethod.id(), "@none");
    assert_eq!(AlgoHyphMethod.id(), "@algorithm");
}
