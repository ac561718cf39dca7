//! CSS token types per [CSS Syntax Level 3 § 4](https://www.w3.org/TR/css-syntax-3/#tokenization).

use core::fmt;

/// A `<hash-token>`'s type flag: whether its value is itself a valid identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashType {
    /// The hash value would also be a valid ident sequence (e.g. `#main`).
    Id,
    /// The hash value is not a valid ident sequence (e.g. `#1a2b3c`).
    Unrestricted,
}

/// A `<number-token>`'s type flag: integer literal vs. one with a fraction or exponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericType {
    /// No decimal point or exponent was present.
    Integer,
    /// A decimal point or exponent was present.
    Number,
}

/// CSS Syntax Level 3 tokens.
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// `<ident-token>`
    Ident(String),
    /// `<function-token>` — an ident immediately followed by `(`.
    Function(String),
    /// `<at-keyword-token>` — `@` followed by an ident sequence.
    AtKeyword(String),
    /// `<hash-token>` — `#` followed by an ident-code-point sequence.
    Hash {
        /// The text following the `#`.
        value: String,
        /// Whether `value` would itself be a valid identifier.
        hash_type: HashType,
    },
    /// `<string-token>`
    String(String),
    /// `<bad-string-token>` — an unterminated or newline-containing string.
    BadString,
    /// `<url-token>` — the unquoted `url(...)` form.
    Url(String),
    /// `<bad-url-token>`
    BadUrl,
    /// `<delim-token>` — a single code point with no other token meaning.
    Delim(char),
    /// `<number-token>`
    Number {
        /// The numeric value.
        value: f64,
        /// The exact integer value, if the literal had no fraction or exponent.
        int_value: Option<i64>,
        /// Integer vs. number type flag.
        numeric_type: NumericType,
    },
    /// `<percentage-token>`
    Percentage {
        /// The numeric value, ignoring the trailing `%`.
        value: f64,
        /// The exact integer value, if the literal had no fraction or exponent.
        int_value: Option<i64>,
        /// Integer vs. number type flag.
        numeric_type: NumericType,
    },
    /// `<dimension-token>` — a number immediately followed by an ident sequence.
    Dimension {
        /// The numeric value.
        value: f64,
        /// The exact integer value, if the literal had no fraction or exponent.
        int_value: Option<i64>,
        /// Integer vs. number type flag.
        numeric_type: NumericType,
        /// The unit text (not case-folded here; callers fold it).
        unit: String,
    },
    /// `<whitespace-token>` — one or more consecutive whitespace code points.
    Whitespace,
    /// `<CDO-token>` — `<!--`.
    Cdo,
    /// `<CDC-token>` — `-->`.
    Cdc,
    /// `<colon-token>`
    Colon,
    /// `<semicolon-token>`
    Semicolon,
    /// `<comma-token>`
    Comma,
    /// `<[-token>`
    LeftBracket,
    /// `<]-token>`
    RightBracket,
    /// `<(-token>`
    LeftParen,
    /// `<)-token>`
    RightParen,
    /// `<{-token>`
    LeftBrace,
    /// `<}-token>`
    RightBrace,
    /// Not part of CSS Syntax proper; emitted once the input is exhausted so
    /// callers never have to special-case running off the end of the stream.
    Eof,
}

impl CSSToken {
    /// Whether this is the sentinel end-of-input token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, CSSToken::Eof)
    }

    /// Whether this is a whitespace token.
    #[must_use]
    pub const fn is_whitespace(&self) -> bool {
        matches!(self, CSSToken::Whitespace)
    }

    /// The ident text, if this is an `<ident-token>`.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            CSSToken::Ident(v) => Some(v.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CSSToken::Ident(v) => write!(f, "<ident:{v}>"),
            CSSToken::Function(v) => write!(f, "<function:{v}(>"),
            CSSToken::AtKeyword(v) => write!(f, "<at-keyword:@{v}>"),
            CSSToken::Hash { value, .. } => write!(f, "<hash:#{value}>"),
            CSSToken::String(v) => write!(f, "<string:\"{v}\">"),
            CSSToken::BadString => write!(f, "<bad-string>"),
            CSSToken::Url(v) => write!(f, "<url:{v}>"),
            CSSToken::BadUrl => write!(f, "<bad-url>"),
            CSSToken::Delim(c) => write!(f, "<delim:{c}>"),
            CSSToken::Number { value, .. } => write!(f, "<number:{value}>"),
            CSSToken::Percentage { value, .. } => write!(f, "<percentage:{value}%>"),
            CSSToken::Dimension { value, unit, .. } => write!(f, "<dimension:{value}{unit}>"),
            CSSToken::Whitespace => write!(f, "<whitespace>"),
            CSSToken::Cdo => write!(f, "<CDO>"),
            CSSToken::Cdc => write!(f, "<CDC>"),
            CSSToken::Colon => write!(f, "<colon>"),
            CSSToken::Semicolon => write!(f, "<semicolon>"),
            CSSToken::Comma => write!(f, "<comma>"),
            CSSToken::LeftBracket => write!(f, "<[>"),
            CSSToken::RightBracket => write!(f, "<]>"),
            CSSToken::LeftParen => write!(f, "<(>"),
            CSSToken::RightParen => write!(f, "<)>"),
            CSSToken::LeftBrace => write!(f, "<{{>"),
            CSSToken::RightBrace => write!(f, "<}}>"),
            CSSToken::Eof => write!(f, "<EOF>"),
        }
    }
}
