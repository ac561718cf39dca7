//! Top-level stylesheet source parsing: the driver that ties the tokenizer
//! (C1), declaration compiler (C3), selector compiler (C4), and at-rule
//! evaluator (C5) together into "parse this CSS source text into a
//! [`Stylesheet`]" (spec §2 "Data flow").
//!
//! This is the one entry point most hosts need; everything else in this
//! crate is exposed for callers (or tests) that want to drive the pipeline
//! by hand.

use std::rc::Rc;

use vellum_common::StyleError;
use vellum_dom::{DocumentFormat, NameTable};

use crate::atrule::{
    classify_at_rule, evaluate_media_condition_tokens, evaluate_media_query_list,
    evaluate_supports_condition, parse_import, AtRuleKind, MediaContext, StylesheetLoader,
};
use crate::declaration::{compile_declaration_block, CompileContext, Declaration, Property, Value};
use crate::selector::parse_selector_list;
use crate::stylesheet::Stylesheet;
use crate::tokenizer::{CSSToken, CSSTokenizer, TokenCursor};

/// Parse a complete CSS source text into a compiled [`Stylesheet`].
///
/// `base` is the path/URL this source was itself loaded from, passed to
/// `loader` (if any) to resolve `@import` targets (spec §4.5, §6.2). Pass
/// `loader: None` to have `@import` rules parsed (for brace balance) but
/// never fetched — equivalent to every import's condition failing.
///
/// # Errors
/// Returns [`StyleError::StylesheetLoad`] if `loader` is given and fails to
/// resolve an `@import` target whose condition holds.
pub fn parse_stylesheet(
    source: &str,
    names: &mut NameTable,
    format: DocumentFormat,
    media_ctx: &MediaContext,
    loader: Option<&dyn StylesheetLoader>,
    base: &str,
) -> Result<Stylesheet, StyleError> {
    let mut sheet = Stylesheet::new();
    let mut seq: u32 = 0;
    let tokens = CSSTokenizer::new(source).tokenize_all();
    let mut cursor = TokenCursor::new(tokens);
    parse_rules(&mut cursor, &mut sheet, names, format, media_ctx, loader, base, &mut seq, true)?;
    Ok(sheet)
}

/// Whether a compiled declaration carried a `-cr-hint: late` entry (spec
/// §4.3: raises the owning selector's specificity "extra weight" bit rather
/// than accumulating into the hint bitmap).
fn declaration_is_late(declaration: &Declaration) -> bool {
    declaration.entries.iter().any(|entry| {
        matches!(&entry.property, Property::CrHint)
            && matches!(&entry.value, Value::CrHint(v) if v.late)
    })
}

/// Parse a run of rules (top-level, or the body of a conditional at-rule)
/// into `sheet`, stopping at the matching `}` (nested) or end of input (top
/// level). `allow_imports` starts `true` only for `top_level`, and becomes
/// `false` the moment any other construct is seen (spec §4.5: "`@import`
/// ... at top of file only").
#[allow(clippy::too_many_arguments)]
fn parse_rules(
    cursor: &mut TokenCursor,
    sheet: &mut Stylesheet,
    names: &mut NameTable,
    format: DocumentFormat,
    media_ctx: &MediaContext,
    loader: Option<&dyn StylesheetLoader>,
    base: &str,
    seq: &mut u32,
    top_level: bool,
) -> Result<(), StyleError> {
    let mut allow_imports = top_level;

    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::Eof => break,
            CSSToken::RightBrace if !top_level => {
                let _ = cursor.advance();
                break;
            }
            CSSToken::RightBrace => {
                // Stray closing brace at top level: not balanced by anything
                // we opened; skip it and keep parsing (spec §7 fatal-input
                // recovery: "parsed from the next recognisable top-level
                // construct").
                let _ = cursor.advance();
            }
            CSSToken::AtKeyword(keyword) => {
                let _ = cursor.advance();
                match classify_at_rule(&keyword.to_ascii_lowercase()) {
                    AtRuleKind::Import if allow_imports => {
                        handle_import(cursor, media_ctx, loader, base, |text, new_base| {
                            let sub_tokens = CSSTokenizer::new(text).tokenize_all();
                            let mut sub_cursor = TokenCursor::new(sub_tokens);
                            parse_rules(&mut sub_cursor, sheet, names, format, media_ctx, loader, new_base, seq, true)
                        })?;
                    }
                    AtRuleKind::Import => {
                        // Not at the top of the file: parsed to preserve
                        // balance, never honoured (non-conforming per CSS).
                        let _ = parse_import(cursor);
                    }
                    AtRuleKind::Media => {
                        allow_imports = false;
                        let holds = evaluate_media_query_list(cursor, media_ctx);
                        enter_conditional_block(cursor, sheet, names, format, media_ctx, loader, base, seq, holds)?;
                    }
                    AtRuleKind::Supports => {
                        allow_imports = false;
                        let holds = evaluate_supports_condition(cursor, format);
                        enter_conditional_block(cursor, sheet, names, format, media_ctx, loader, base, seq, holds)?;
                    }
                    AtRuleKind::Ignored => {
                        allow_imports = false;
                        skip_unrecognised_at_rule(cursor);
                    }
                }
            }
            CSSToken::LeftBrace => {
                // A block with no selector before it: malformed, drop it
                // while keeping balance (spec §7 "recoverable selector error").
                let _ = cursor.advance();
                cursor.skip_balanced_block();
            }
            _ => {
                allow_imports = false;
                parse_one_rule(cursor, sheet, names, format, seq);
            }
        }
    }
    Ok(())
}

/// Parse and, if `loader` is present and the import's condition holds, fetch
/// and recursively parse one `@import` target. `parse_into` is invoked with
/// the fetched text and its resolved base once the caller should recurse.
fn handle_import(
    cursor: &mut TokenCursor,
    media_ctx: &MediaContext,
    loader: Option<&dyn StylesheetLoader>,
    base: &str,
    mut parse_into: impl FnMut(&str, &str) -> Result<(), StyleError>,
) -> Result<(), StyleError> {
    let Some(rule) = parse_import(cursor) else {
        // Malformed @import: no URL/string found where expected. Recover by
        // skipping to the next top-level `;` (spec §4.1 `next_property`).
        let _ = cursor.next_property();
        return Ok(());
    };
    let applies = rule
        .media_condition
        .as_ref()
        .is_none_or(|tokens| evaluate_media_condition_tokens(tokens, media_ctx));
    if !applies {
        return Ok(());
    }
    let Some(loader) = loader else { return Ok(()) };
    let text = loader.load(base, &rule.url)?;
    parse_into(&text, &rule.url)
}

/// Parse a conditional at-rule's `{ ... }` body. The body is always parsed
/// (to keep the outer token stream in balance, spec §4.5); the parsed rules
/// are only kept if `holds` is `true`.
#[allow(clippy::too_many_arguments)]
fn enter_conditional_block(
    cursor: &mut TokenCursor,
    sheet: &mut Stylesheet,
    names: &mut NameTable,
    format: DocumentFormat,
    media_ctx: &MediaContext,
    loader: Option<&dyn StylesheetLoader>,
    base: &str,
    seq: &mut u32,
    holds: bool,
) -> Result<(), StyleError> {
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::LeftBrace) {
        return Ok(());
    }
    let _ = cursor.advance();
    if holds {
        parse_rules(cursor, sheet, names, format, media_ctx, loader, base, seq, false)
    } else {
        let mut discarded = Stylesheet::new();
        let mut discarded_seq = *seq;
        parse_rules(cursor, &mut discarded, names, format, media_ctx, loader, base, &mut discarded_seq, false)
    }
}

/// Skip an at-rule this engine gives no special meaning to, preserving
/// brace balance: a block-shaped at-rule (`@font-face { ... }`) has its
/// whole block discarded; a statement-shaped one (`@charset "...";`) is
/// skipped to its terminating `;` (spec §4.5).
fn skip_unrecognised_at_rule(cursor: &mut TokenCursor) {
    cursor.skip_whitespace();
    if matches!(cursor.peek(), CSSToken::LeftBrace) {
        let _ = cursor.advance();
        cursor.skip_balanced_block();
    } else {
        let _ = cursor.next_property();
    }
}

/// Parse one `selector-list { declaration-block }` rule and, if the
/// selector list compiled cleanly, insert its selectors into `sheet` (spec
/// §4.4, §4.6). A malformed selector list drops the whole rule (spec §7);
/// the declaration block is still fully consumed first so balance holds.
fn parse_one_rule(
    cursor: &mut TokenCursor,
    sheet: &mut Stylesheet,
    names: &mut NameTable,
    format: DocumentFormat,
    seq: &mut u32,
) {
    let mut selector_tokens = Vec::new();
    loop {
        match cursor.peek() {
            CSSToken::LeftBrace | CSSToken::Eof => break,
            CSSToken::RightBrace => {
                // No opening brace ever came: malformed top-level text.
                // Recovery happens at the `parse_rules` level (the `}` is
                // left for the caller to see next iteration).
                return;
            }
            _ => selector_tokens.push(cursor.advance()),
        }
    }
    if !matches!(cursor.peek(), CSSToken::LeftBrace) {
        return;
    }
    let _ = cursor.advance();

    let ctx = CompileContext { format };
    let declaration = Rc::new(compile_declaration_block(cursor, &ctx));
    let late = declaration_is_late(&declaration);

    let mut selector_cursor = TokenCursor::new(selector_tokens);
    if let Some(selectors) =
        parse_selector_list(&mut selector_cursor, names, format, &declaration, late, seq)
    {
        sheet.extend(selectors);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::Color;
    use vellum_dom::RefTree;

    fn ctx() -> MediaContext {
        MediaContext { viewport_width: 480, viewport_height: 800, screen_width: 480, screen_height: 800, render_dpi: 212 }
    }

    #[test]
    fn parses_plain_rules() {
        let mut names = NameTable::new();
        let sheet = parse_stylesheet("p { color: red; } div { color: blue; }", &mut names, DocumentFormat::Flat, &ctx(), None, "").unwrap();
        assert_eq!(sheet.bucket_for(names.intern("p")).len(), 1);
        assert_eq!(sheet.bucket_for(names.intern("div")).len(), 1);
    }

    #[test]
    fn media_false_condition_is_parsed_but_discarded() {
        let mut names = NameTable::new();
        let sheet = parse_stylesheet(
            "@media (min-width: 99999px) { p { color: red; } } p { color: blue; }",
            &mut names,
            DocumentFormat::Flat,
            &ctx(),
            None,
            "",
        )
        .unwrap();
        let bucket = sheet.bucket_for(names.intern("p"));
        assert_eq!(bucket.len(), 1);
    }

    #[test]
    fn supports_unknown_property_is_discarded() {
        let mut names = NameTable::new();
        let sheet = parse_stylesheet(
            "@supports (display: flex) { p { color: red; } }",
            &mut names,
            DocumentFormat::Flat,
            &ctx(),
            None,
            "",
        )
        .unwrap();
        assert!(sheet.bucket_for(names.intern("p")).is_empty());
    }

    #[test]
    fn unrecognised_at_rule_is_skipped_without_breaking_balance() {
        let mut names = NameTable::new();
        let sheet = parse_stylesheet(
            "@font-face { font-family: x; src: url(x.woff); } p { color: red; }",
            &mut names,
            DocumentFormat::Flat,
            &ctx(),
            None,
            "",
        )
        .unwrap();
        assert_eq!(sheet.bucket_for(names.intern("p")).len(), 1);
    }

    struct StubLoader;
    impl StylesheetLoader for StubLoader {
        fn load(&self, _base: &str, url: &str) -> Result<String, StyleError> {
            if url == "base.css" {
                Ok("p { color: red; }".to_owned())
            } else {
                Err(StyleError::StylesheetLoad { url: url.to_owned(), reason: "not found".to_owned() })
            }
        }
    }

    #[test]
    fn import_prepends_rules_before_local_ones() {
        let mut tree = RefTree::new("html", DocumentFormat::Flat);
        let html = tree.root();
        let p = tree.add_element(html, "p");

        let loader = StubLoader;
        let sheet = parse_stylesheet(
            "@import url(\"base.css\"); p { color: blue; }",
            tree.names_mut_for_test(),
            DocumentFormat::Flat,
            &ctx(),
            Some(&loader),
            "",
        )
        .unwrap();
        let bucket = sheet.bucket_for(tree.names_mut_for_test().intern("p"));
        assert_eq!(bucket.len(), 2);

        let style = crate::compute_style(&tree, p, &sheet, None);
        // Same specificity on both sides: later (local) rule wins (spec §8 TP2).
        assert_eq!(style.color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn import_failure_propagates() {
        let mut names = NameTable::new();
        let loader = StubLoader;
        let err = parse_stylesheet(
            "@import url(\"missing.css\");",
            &mut names,
            DocumentFormat::Flat,
            &ctx(),
            Some(&loader),
            "",
        )
        .unwrap_err();
        assert!(matches!(err, StyleError::StylesheetLoad { .. }));
    }
}
