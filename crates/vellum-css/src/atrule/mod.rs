//! At-rule handling (spec §5): `@import`/`@media`/`@supports` condition
//! evaluation, plus balance-preserving skip-and-discard for every other
//! at-rule this engine doesn't give special meaning to.

use vellum_dom::DocumentFormat;

use crate::declaration::{supports_declaration, CompileContext};
use crate::tokenizer::{CSSToken, TokenCursor};

/// How the top-level rule parser should treat an `@`-rule it just saw the
/// keyword for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtRuleKind {
    /// `@import` — may pull in another stylesheet.
    Import,
    /// `@media` — conditionally includes a nested block of rules.
    Media,
    /// `@supports` — conditionally includes a nested block of rules.
    Supports,
    /// `@charset`, `@namespace`, `@custom-selector`, `@custom-media`, or any
    /// other at-rule this engine assigns no behaviour to: skipped for
    /// balance, never applied.
    Ignored,
}

/// Classify an at-rule keyword (already lower-cased by the caller).
#[must_use]
pub fn classify_at_rule(keyword: &str) -> AtRuleKind {
    match keyword {
        "import" => AtRuleKind::Import,
        "media" => AtRuleKind::Media,
        "supports" => AtRuleKind::Supports,
        _ => AtRuleKind::Ignored,
    }
}

/// A parsed `@import` rule: the target URL and an optional media-query list
/// that must hold for the import to actually apply.
#[derive(Debug, Clone)]
pub struct ImportRule {
    /// The (unresolved) URL or quoted string naming the stylesheet.
    pub url: String,
    /// Raw condition tokens to evaluate against a [`MediaContext`] once one
    /// is available, or `None` if no media query was given (unconditional).
    pub media_condition: Option<Vec<CSSToken>>,
}

/// Parse `@import url(...) <media-query-list>? ;` (or the quoted-string
/// form), stopping just past the terminating `;`. Returns `None` if the
/// rule doesn't start with a URL or string, in which case the caller should
/// fall back to [`crate::tokenizer::TokenCursor::next_property`] for
/// recovery.
#[must_use]
pub fn parse_import(cursor: &mut TokenCursor) -> Option<ImportRule> {
    cursor.skip_whitespace();
    let url = match cursor.peek().clone() {
        CSSToken::String(s) | CSSToken::Url(s) => {
            let _ = cursor.advance();
            s
        }
        CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
            let _ = cursor.advance();
            cursor.skip_whitespace();
            let inner = match cursor.peek().clone() {
                CSSToken::String(s) => {
                    let _ = cursor.advance();
                    s
                }
                _ => String::new(),
            };
            cursor.skip_whitespace();
            if matches!(cursor.peek(), CSSToken::RightParen) {
                let _ = cursor.advance();
            }
            inner
        }
        _ => return None,
    };

    let mut condition = Vec::new();
    loop {
        match cursor.peek() {
            CSSToken::Semicolon => {
                let _ = cursor.advance();
                break;
            }
            CSSToken::Eof | CSSToken::RightBrace => break,
            _ => condition.push(cursor.advance()),
        }
    }
    let media_condition = if condition.iter().all(CSSToken::is_whitespace) { None } else { Some(condition) };
    Some(ImportRule { url, media_condition })
}

/// A host-supplied resolver for `@import` targets: given the URL text from
/// the rule (and the base the importing stylesheet was itself loaded from,
/// if the host needs it for relative resolution), return the imported
/// stylesheet's source text.
pub trait StylesheetLoader {
    /// Load and return the text of the stylesheet named by `url`, resolved
    /// relative to `base`.
    ///
    /// # Errors
    /// Returns [`vellum_common::StyleError::StylesheetLoad`] if the target
    /// cannot be found or read.
    fn load(&self, base: &str, url: &str) -> Result<String, vellum_common::StyleError>;
}

/// The viewport/device facts `@media` feature queries are evaluated against
/// (spec §5, mirroring the handful of fields [`vellum_dom::StyleTree`]
/// exposes for this purpose).
#[derive(Debug, Clone, Copy)]
pub struct MediaContext {
    /// Current viewport width in CSS pixels.
    pub viewport_width: u32,
    /// Current viewport height in CSS pixels.
    pub viewport_height: u32,
    /// Physical screen width in device pixels.
    pub screen_width: u32,
    /// Physical screen height in device pixels.
    pub screen_height: u32,
    /// Configured rendering DPI.
    pub render_dpi: u32,
}

fn matches_ident(cursor: &TokenCursor, word: &str) -> bool {
    matches!(cursor.peek(), CSSToken::Ident(w) if w.eq_ignore_ascii_case(word))
}

fn length_px_value(cursor: &mut TokenCursor) -> Option<u32> {
    match cursor.peek().clone() {
        CSSToken::Dimension { value, ref unit, .. } if unit.eq_ignore_ascii_case("px") => {
            let _ = cursor.advance();
            Some(value.max(0.0) as u32)
        }
        CSSToken::Number { value, .. } => {
            let _ = cursor.advance();
            Some(value.max(0.0) as u32)
        }
        _ => None,
    }
}

fn parse_ratio(cursor: &mut TokenCursor) -> Option<(u32, u32)> {
    let CSSToken::Number { int_value: Some(w), .. } = cursor.peek().clone() else {
        return None;
    };
    let _ = cursor.advance();
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::Delim('/')) {
        return None;
    }
    let _ = cursor.advance();
    cursor.skip_whitespace();
    let CSSToken::Number { int_value: Some(h), .. } = cursor.peek().clone() else {
        return None;
    };
    let _ = cursor.advance();
    if w < 0 || h <= 0 {
        return None;
    }
    #[allow(clippy::cast_sign_loss)]
    Some((w as u32, h as u32))
}

fn resolution_dpi_value(cursor: &mut TokenCursor) -> Option<u32> {
    match cursor.peek().clone() {
        CSSToken::Dimension { value, ref unit, .. } => {
            let _ = cursor.advance();
            match unit.to_ascii_lowercase().as_str() {
                "dpi" => Some(value as u32),
                "dpcm" => Some((value * 2.54) as u32),
                "dppx" => Some((value * 96.0) as u32),
                _ => None,
            }
        }
        _ => None,
    }
}

/// Statically-answered boolean media features this engine gives a fixed
/// truth value to, since it has no notion of scripting, a pointer, or a
/// scrolling viewport the way a browser does.
fn static_feature_truth(name: &str) -> Option<bool> {
    Some(match name {
        "color" => true,
        "monochrome" | "grid" => false,
        "scripting" => false,
        "update" => false,
        "overflow-inline" => false,
        "overflow-block" => true,
        _ => return None,
    })
}

/// Evaluate a single `(feature)` or `(feature: value)` atom, with the cursor
/// positioned just past the `(` (the caller consumes the matching `)`).
#[must_use]
pub fn media_feature_atom(cursor: &mut TokenCursor, ctx: &MediaContext) -> bool {
    cursor.skip_whitespace();
    let CSSToken::Ident(name) = cursor.peek().clone() else {
        return false;
    };
    let _ = cursor.advance();
    let name = name.to_ascii_lowercase();
    cursor.skip_whitespace();

    if !matches!(cursor.peek(), CSSToken::Colon) {
        return static_feature_truth(&name).unwrap_or(false);
    }
    let _ = cursor.advance();
    cursor.skip_whitespace();

    match name.as_str() {
        "width" => length_px_value(cursor).is_some_and(|px| px == ctx.viewport_width),
        "min-width" => length_px_value(cursor).is_some_and(|px| ctx.viewport_width >= px),
        "max-width" => length_px_value(cursor).is_some_and(|px| ctx.viewport_width <= px),
        "height" => length_px_value(cursor).is_some_and(|px| px == ctx.viewport_height),
        "min-height" => length_px_value(cursor).is_some_and(|px| ctx.viewport_height >= px),
        "max-height" => length_px_value(cursor).is_some_and(|px| ctx.viewport_height <= px),
        "device-width" => length_px_value(cursor).is_some_and(|px| px == ctx.screen_width),
        "device-height" => length_px_value(cursor).is_some_and(|px| px == ctx.screen_height),
        "resolution" | "min-resolution" | "max-resolution" => match resolution_dpi_value(cursor) {
            Some(dpi) if name == "min-resolution" => ctx.render_dpi >= dpi,
            Some(dpi) if name == "max-resolution" => ctx.render_dpi <= dpi,
            Some(dpi) => dpi == ctx.render_dpi,
            None => false,
        },
        "orientation" => {
            let CSSToken::Ident(v) = cursor.peek().clone() else {
                return false;
            };
            let _ = cursor.advance();
            let is_portrait = ctx.viewport_height >= ctx.viewport_width;
            match v.to_ascii_lowercase().as_str() {
                "portrait" => is_portrait,
                "landscape" => !is_portrait,
                _ => false,
            }
        }
        "aspect-ratio" => {
            parse_ratio(cursor).is_some_and(|(w, h)| u64::from(ctx.viewport_width) * u64::from(h) == u64::from(ctx.viewport_height) * u64::from(w))
        }
        "device-aspect-ratio" => {
            parse_ratio(cursor).is_some_and(|(w, h)| u64::from(ctx.screen_width) * u64::from(h) == u64::from(ctx.screen_height) * u64::from(w))
        }
        "color" | "monochrome" | "grid" | "scripting" | "update" | "overflow-inline" | "overflow-block" => {
            let _ = cursor.advance();
            static_feature_truth(&name).unwrap_or(false)
        }
        _ => {
            let _ = cursor.advance();
            false
        }
    }
}

fn evaluate_one_media_query(cursor: &mut TokenCursor, ctx: &MediaContext) -> bool {
    cursor.skip_whitespace();
    let mut negate = false;
    if matches_ident(cursor, "not") {
        negate = true;
        let _ = cursor.advance();
        cursor.skip_whitespace();
    } else if matches_ident(cursor, "only") {
        let _ = cursor.advance();
        cursor.skip_whitespace();
    }

    let mut result = true;
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        if !word.eq_ignore_ascii_case("and") && !matches!(cursor.peek(), CSSToken::LeftParen) {
            let _ = cursor.advance();
            // `print` is the one media type this reading engine never is;
            // everything else (screen, all, speech, ...) is treated as a match.
            result = !word.eq_ignore_ascii_case("print");
            cursor.skip_whitespace();
            if matches_ident(cursor, "and") {
                let _ = cursor.advance();
                cursor.skip_whitespace();
            }
        }
    }

    loop {
        cursor.skip_whitespace();
        if !matches!(cursor.peek(), CSSToken::LeftParen) {
            break;
        }
        let _ = cursor.advance();
        let ok = media_feature_atom(cursor, ctx);
        cursor.skip_whitespace();
        if matches!(cursor.peek(), CSSToken::RightParen) {
            let _ = cursor.advance();
        }
        result = result && ok;
        cursor.skip_whitespace();
        if matches_ident(cursor, "and") {
            let _ = cursor.advance();
            continue;
        }
        break;
    }

    if negate {
        !result
    } else {
        result
    }
}

/// Evaluate a comma-separated media query list (each item logically OR'd),
/// stopping just before `{` (never consuming it).
#[must_use]
pub fn evaluate_media_query_list(cursor: &mut TokenCursor, ctx: &MediaContext) -> bool {
    let mut any = false;
    loop {
        cursor.skip_whitespace();
        if matches!(cursor.peek(), CSSToken::LeftBrace | CSSToken::Eof | CSSToken::Semicolon) {
            break;
        }
        let matched = evaluate_one_media_query(cursor, ctx);
        any = any || matched;
        cursor.skip_whitespace();
        match cursor.peek() {
            CSSToken::Comma => {
                let _ = cursor.advance();
            }
            _ => break,
        }
    }
    any
}

/// Evaluate a media query list already captured as a standalone token
/// stream (used for `@import url(...) <media-query-list>`).
#[must_use]
pub fn evaluate_media_condition_tokens(tokens: &[CSSToken], ctx: &MediaContext) -> bool {
    let mut cursor = TokenCursor::new(tokens.to_vec());
    evaluate_media_query_list(&mut cursor, ctx)
}

/// Generic `and`/`or`/`not`/parenthesized-group boolean condition grammar
/// shared by `@supports`; `eval_atom` is called with the cursor positioned
/// just past a `(` that was *not* a nested group, and must leave the cursor
/// positioned just before the matching `)`.
fn parse_or(cursor: &mut TokenCursor, eval_atom: &mut dyn FnMut(&mut TokenCursor) -> bool) -> bool {
    let mut result = parse_and(cursor, eval_atom);
    loop {
        cursor.skip_whitespace();
        if matches_ident(cursor, "or") {
            let _ = cursor.advance();
            cursor.skip_whitespace();
            let rhs = parse_and(cursor, eval_atom);
            result = result || rhs;
        } else {
            break;
        }
    }
    result
}

fn parse_and(cursor: &mut TokenCursor, eval_atom: &mut dyn FnMut(&mut TokenCursor) -> bool) -> bool {
    let mut result = parse_unary(cursor, eval_atom);
    loop {
        cursor.skip_whitespace();
        if matches_ident(cursor, "and") {
            let _ = cursor.advance();
            cursor.skip_whitespace();
            let rhs = parse_unary(cursor, eval_atom);
            result = result && rhs;
        } else {
            break;
        }
    }
    result
}

fn parse_unary(cursor: &mut TokenCursor, eval_atom: &mut dyn FnMut(&mut TokenCursor) -> bool) -> bool {
    cursor.skip_whitespace();
    if matches_ident(cursor, "not") {
        let _ = cursor.advance();
        cursor.skip_whitespace();
        return !parse_unary(cursor, eval_atom);
    }
    parse_primary(cursor, eval_atom)
}

fn parse_primary(cursor: &mut TokenCursor, eval_atom: &mut dyn FnMut(&mut TokenCursor) -> bool) -> bool {
    cursor.skip_whitespace();
    if !matches!(cursor.peek(), CSSToken::LeftParen) {
        return false;
    }
    let _ = cursor.advance();
    cursor.skip_whitespace();
    let is_group = matches!(cursor.peek(), CSSToken::LeftParen) || matches_ident(cursor, "not");
    let result = if is_group { parse_or(cursor, eval_atom) } else { eval_atom(cursor) };
    cursor.skip_whitespace();
    if matches!(cursor.peek(), CSSToken::RightParen) {
        let _ = cursor.advance();
    }
    result
}

/// Evaluate an `@supports (...)` condition, stopping just before `{`.
#[must_use]
pub fn evaluate_supports_condition(cursor: &mut TokenCursor, format: DocumentFormat) -> bool {
    let ctx = CompileContext { format };
    let mut eval_atom = |c: &mut TokenCursor| supports_declaration(c, &ctx);
    parse_or(cursor, &mut eval_atom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn cursor_for(src: &str) -> TokenCursor {
        TokenCursor::new(CSSTokenizer::new(src).tokenize_all())
    }

    fn ctx() -> MediaContext {
        MediaContext { viewport_width: 480, viewport_height: 800, screen_width: 480, screen_height: 800, render_dpi: 212 }
    }

    #[test]
    fn import_url_form() {
        let mut cursor = cursor_for("url(\"chapter.css\");");
        let rule = parse_import(&mut cursor).unwrap();
        assert_eq!(rule.url, "chapter.css");
        assert!(rule.media_condition.is_none());
    }

    #[test]
    fn import_string_form_with_media_query() {
        let mut cursor = cursor_for("\"chapter.css\" screen and (max-width: 600px);");
        let rule = parse_import(&mut cursor).unwrap();
        assert_eq!(rule.url, "chapter.css");
        let tokens = rule.media_condition.unwrap();
        assert!(evaluate_media_condition_tokens(&tokens, &ctx()));
    }

    #[test]
    fn media_feature_width_range() {
        let mut cursor = cursor_for("(max-width: 600px)");
        assert!(evaluate_media_query_list(&mut cursor, &ctx()));

        let mut cursor = cursor_for("(min-width: 2000px)");
        assert!(!evaluate_media_query_list(&mut cursor, &ctx()));
    }

    #[test]
    fn media_type_and_feature_conjunction() {
        let mut cursor = cursor_for("screen and (orientation: portrait)");
        assert!(evaluate_media_query_list(&mut cursor, &ctx()));

        let mut cursor = cursor_for("print and (orientation: portrait)");
        assert!(!evaluate_media_query_list(&mut cursor, &ctx()));
    }

    #[test]
    fn media_query_list_is_comma_or() {
        let mut cursor = cursor_for("print, (min-width: 100px)");
        assert!(evaluate_media_query_list(&mut cursor, &ctx()));
    }

    #[test]
    fn supports_known_vs_unknown_property() {
        let mut cursor = cursor_for("(text-align: center)");
        assert!(evaluate_supports_condition(&mut cursor, DocumentFormat::Flat));

        let mut cursor = cursor_for("(definitely-not-a-real-property: 1)");
        assert!(!evaluate_supports_condition(&mut cursor, DocumentFormat::Flat));
    }

    #[test]
    fn supports_and_or_not() {
        let mut cursor = cursor_for("(text-align: center) and (not (definitely-not-a-real-property: 1))");
        assert!(evaluate_supports_condition(&mut cursor, DocumentFormat::Flat));
    }

    #[test]
    fn classify_recognised_and_ignored_at_rules() {
        assert_eq!(classify_at_rule("import"), AtRuleKind::Import);
        assert_eq!(classify_at_rule("media"), AtRuleKind::Media);
        assert_eq!(classify_at_rule("supports"), AtRuleKind::Supports);
        assert_eq!(classify_at_rule("charset"), AtRuleKind::Ignored);
        assert_eq!(classify_at_rule("namespace"), AtRuleKind::Ignored);
        assert_eq!(classify_at_rule("font-face"), AtRuleKind::Ignored);
    }
}
