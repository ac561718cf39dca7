//! The `content:` micro-language (spec §4.2), used for `::before`/`::after`
//! pseudo-element generated content.

use crate::tokenizer::{CSSToken, TokenCursor};

/// One term of a parsed `content:` value. The letters in each doc comment
/// are the instruction-stream tag the source encodes this term as; this
/// port keeps them as an enum instead of a byte stream, but documents the
/// correspondence for anyone cross-checking against the original.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentToken {
    /// `'X'` — no content at all (e.g. `content: none`).
    None,
    /// `'s' len chars` — a literal string.
    Literal(String),
    /// `'a' len chars` — `attr(name)`, substituted with the node's attribute
    /// value at render time.
    Attr(String),
    /// `'Q'` — `open-quote`.
    OpenQuote,
    /// `'q'` — `close-quote`.
    CloseQuote,
    /// `'N'` — `no-open-quote`.
    NoOpenQuote,
    /// `'n'` — `no-close-quote`.
    NoCloseQuote,
    /// `'u'` — an unsupported `url(...)` term (images are out of scope).
    UnsupportedUrl,
    /// `'z'` — any other unsupported term; skipped but does not abort the
    /// rest of the value.
    UnsupportedToken,
}

/// A parsed `content:` value plus whether it contains any quote term that
/// requires resolving the owning node's language-specific quote characters
/// and nesting level at render time (the leading `'$'` marker in spec §4.2).
#[derive(Debug, Clone, Default)]
pub struct ContentValue {
    /// The parsed terms in source order.
    pub tokens: Vec<ContentToken>,
    /// Whether [`Self::tokens`] contains an open/close/no-open/no-close
    /// quote term.
    pub needs_quote_resolution: bool,
}

fn is_quote_term(token: &ContentToken) -> bool {
    matches!(
        token,
        ContentToken::OpenQuote
            | ContentToken::CloseQuote
            | ContentToken::NoOpenQuote
            | ContentToken::NoCloseQuote
    )
}

/// Parse a `content:` value up to (not including) the next `;` or `}`.
#[must_use]
pub fn parse_content(cursor: &mut TokenCursor) -> ContentValue {
    cursor.skip_whitespace();
    if let CSSToken::Ident(name) = cursor.peek() {
        if name.eq_ignore_ascii_case("none") || name.eq_ignore_ascii_case("normal") {
            let _ = cursor.advance();
            return ContentValue {
                tokens: vec![ContentToken::None],
                needs_quote_resolution: false,
            };
        }
    }

    let mut tokens = Vec::new();
    loop {
        cursor.skip_whitespace();
        match cursor.peek().clone() {
            CSSToken::Semicolon | CSSToken::RightBrace | CSSToken::Eof => break,
            CSSToken::String(s) => {
                let _ = cursor.advance();
                tokens.push(ContentToken::Literal(s));
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("attr") => {
                let _ = cursor.advance();
                cursor.skip_whitespace();
                if let CSSToken::Ident(attr_name) = cursor.peek().clone() {
                    let _ = cursor.advance();
                    tokens.push(ContentToken::Attr(attr_name));
                } else {
                    tokens.push(ContentToken::UnsupportedToken);
                }
                cursor.skip_whitespace();
                if matches!(cursor.peek(), CSSToken::RightParen) {
                    let _ = cursor.advance();
                }
            }
            CSSToken::Function(name) if name.eq_ignore_ascii_case("url") => {
                skip_function_args(cursor);
                tokens.push(ContentToken::UnsupportedUrl);
            }
            CSSToken::Url(_) => {
                let _ = cursor.advance();
                tokens.push(ContentToken::UnsupportedUrl);
            }
            CSSToken::Ident(name) => {
                let _ = cursor.advance();
                match name.as_str() {
                    n if n.eq_ignore_ascii_case("open-quote") => tokens.push(ContentToken::OpenQuote),
                    n if n.eq_ignore_ascii_case("close-quote") => tokens.push(ContentToken::CloseQuote),
                    n if n.eq_ignore_ascii_case("no-open-quote") => {
                        tokens.push(ContentToken::NoOpenQuote);
                    }
                    n if n.eq_ignore_ascii_case("no-close-quote") => {
                        tokens.push(ContentToken::NoCloseQuote);
                    }
                    _ => tokens.push(ContentToken::UnsupportedToken),
                }
            }
            CSSToken::Function(_) => {
                skip_function_args(cursor);
                tokens.push(ContentToken::UnsupportedToken);
            }
            _ => {
                let _ = cursor.advance();
                tokens.push(ContentToken::UnsupportedToken);
            }
        }
    }

    let needs_quote_resolution = tokens.iter().any(is_quote_term);
    ContentValue {
        tokens,
        needs_quote_resolution,
    }
}

fn skip_function_args(cursor: &mut TokenCursor) {
    let mut depth: i32 = 1;
    loop {
        match cursor.peek() {
            CSSToken::Eof => return,
            CSSToken::LeftParen => {
                depth += 1;
                let _ = cursor.advance();
            }
            CSSToken::RightParen => {
                depth -= 1;
                let _ = cursor.advance();
                if depth == 0 {
                    return;
                }
            }
            _ => {
                let _ = cursor.advance();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn cursor_for(src: &str) -> TokenCursor {
        TokenCursor::new(CSSTokenizer::new(src).tokenize_all())
    }

    #[test]
    fn none_keyword_yields_single_none_token() {
        let mut cursor = cursor_for("none");
        let value = parse_content(&mut cursor);
        assert_eq!(value.tokens, vec![ContentToken::None]);
        assert!(!value.needs_quote_resolution);
    }

    #[test]
    fn string_then_attr_then_close_quote() {
        let mut cursor = cursor_for(r#""- " attr(title) close-quote"#);
        let value = parse_content(&mut cursor);
        assert_eq!(
            value.tokens,
            vec![
                ContentToken::Literal("- ".to_string()),
                ContentToken::Attr("title".to_string()),
                ContentToken::CloseQuote,
            ]
        );
        assert!(value.needs_quote_resolution);
    }

    #[test]
    fn unsupported_url_does_not_abort_remaining_terms() {
        let mut cursor = cursor_for(r#"url(foo.png) "x""#);
        let value = parse_content(&mut cursor);
        assert_eq!(
            value.tokens,
            vec![ContentToken::UnsupportedUrl, ContentToken::Literal("x".to_string())]
        );
    }
}
