use super::token::{CSSToken, HashType, NumericType};

/// Tokenizes a CSS source string per
/// [CSS Syntax Level 3 § 4.3](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms).
pub struct CSSTokenizer {
    input: Vec<char>,
    position: usize,
}

impl CSSTokenizer {
    /// Build a tokenizer over `input`.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the whole input, including a trailing [`CSSToken::Eof`].
    #[must_use]
    pub fn tokenize_all(mut self) -> Vec<CSSToken> {
        let mut tokens = Vec::new();
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        tokens
    }

    fn consume_token(&mut self) -> CSSToken {
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CSSToken::Eof;
        };

        match c {
            c if is_whitespace(c) => {
                self.consume_whitespace();
                CSSToken::Whitespace
            }
            '"' => self.consume_string_token('"'),
            '#' => {
                if self.peek().is_some_and(is_ident_code_point)
                    || self.is_valid_escape(self.peek(), self.peek_at(1))
                {
                    let hash_type = if self.would_start_ident_sequence() {
                        HashType::Id
                    } else {
                        HashType::Unrestricted
                    };
                    let value = self.consume_ident_sequence();
                    CSSToken::Hash { value, hash_type }
                } else {
                    CSSToken::Delim('#')
                }
            }
            '\'' => self.consume_string_token('\''),
            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,
            '+' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('+')
                }
            }
            ',' => CSSToken::Comma,
            '-' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    let _ = self.consume();
                    let _ = self.consume();
                    CSSToken::Cdc
                } else if self.would_start_ident_sequence_with(Some('-')) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('-')
                }
            }
            '.' => {
                if self.would_start_number() {
                    self.reconsume();
                    self.consume_numeric_token()
                } else {
                    CSSToken::Delim('.')
                }
            }
            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,
            '<' => {
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    let _ = self.consume();
                    let _ = self.consume();
                    let _ = self.consume();
                    CSSToken::Cdo
                } else {
                    CSSToken::Delim('<')
                }
            }
            '@' => {
                if self.would_start_ident_sequence() {
                    CSSToken::AtKeyword(self.consume_ident_sequence())
                } else {
                    CSSToken::Delim('@')
                }
            }
            '[' => CSSToken::LeftBracket,
            '\\' => {
                if self.is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like_token()
                } else {
                    CSSToken::Delim('\\')
                }
            }
            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,
            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric_token()
            }
            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like_token()
            }
            c => CSSToken::Delim(c),
        }
    }

    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let _ = self.consume();
            let _ = self.consume();
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => continue,
                    None => break,
                }
            }
        }
    }

    fn consume_whitespace(&mut self) {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
    }

    fn consume_string_token(&mut self, ending_code_point: char) -> CSSToken {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == ending_code_point => return CSSToken::String(value),
                None => return CSSToken::String(value),
                Some('\n') => {
                    self.reconsume();
                    return CSSToken::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => {
                        if let Some(c) = self.consume_escaped_code_point() {
                            value.push(c);
                        }
                    }
                },
                Some(c) => value.push(c),
            }
        }
    }

    fn consume_numeric_token(&mut self) -> CSSToken {
        let (value, int_value, numeric_type) = self.consume_number();
        if self.would_start_ident_sequence() {
            let unit = self.consume_ident_sequence();
            CSSToken::Dimension {
                value,
                int_value,
                numeric_type,
                unit,
            }
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            CSSToken::Percentage {
                value,
                int_value,
                numeric_type,
            }
        } else {
            CSSToken::Number {
                value,
                int_value,
                numeric_type,
            }
        }
    }

    fn consume_ident_like_token(&mut self) -> CSSToken {
        let string = self.consume_ident_sequence();
        if string.eq_ignore_ascii_case("url") && self.peek() == Some('(') {
            let _ = self.consume();
            while self.peek().is_some_and(is_whitespace) {
                let _ = self.consume();
            }
            match self.peek() {
                Some('"' | '\'') => CSSToken::Function(string),
                _ => self.consume_url_token(),
            }
        } else if self.peek() == Some('(') {
            let _ = self.consume();
            CSSToken::Function(string)
        } else {
            CSSToken::Ident(string)
        }
    }

    fn consume_url_token(&mut self) -> CSSToken {
        let mut value = String::new();
        self.consume_whitespace();
        loop {
            match self.consume() {
                Some(')') | None => return CSSToken::Url(value),
                Some(c) if is_whitespace(c) => {
                    self.consume_whitespace();
                    match self.peek() {
                        Some(')') => {
                            let _ = self.consume();
                            return CSSToken::Url(value);
                        }
                        None => return CSSToken::Url(value),
                        _ => {
                            self.consume_bad_url_remnants();
                            return CSSToken::BadUrl;
                        }
                    }
                }
                Some('"' | '\'' | '(') => {
                    self.consume_bad_url_remnants();
                    return CSSToken::BadUrl;
                }
                Some('\\') => {
                    if self.is_valid_escape(Some('\\'), self.peek()) {
                        if let Some(c) = self.consume_escaped_code_point() {
                            value.push(c);
                        }
                    } else {
                        self.consume_bad_url_remnants();
                        return CSSToken::BadUrl;
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn consume_bad_url_remnants(&mut self) {
        loop {
            match self.consume() {
                Some(')') | None => return,
                Some('\\') => {
                    if self.is_valid_escape(Some('\\'), self.peek()) {
                        let _ = self.consume_escaped_code_point();
                    }
                }
                _ => {}
            }
        }
    }

    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.consume() {
                Some(c) if is_ident_code_point(c) => result.push(c),
                Some('\\') if self.is_valid_escape(Some('\\'), self.peek()) => {
                    if let Some(c) = self.consume_escaped_code_point() {
                        result.push(c);
                    }
                }
                Some(_) => {
                    self.reconsume();
                    return result;
                }
                None => return result,
            }
        }
    }

    fn consume_number(&mut self) -> (f64, Option<i64>, NumericType) {
        let mut numeric_type = NumericType::Integer;
        let mut repr = String::new();

        if self.peek() == Some('+') || self.peek() == Some('-') {
            if let Some(c) = self.consume() {
                repr.push(c);
            }
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            if let Some(c) = self.consume() {
                repr.push(c);
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            if let Some(c) = self.consume() {
                repr.push(c);
            }
            if let Some(c) = self.consume() {
                repr.push(c);
            }
            numeric_type = NumericType::Number;
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                if let Some(c) = self.consume() {
                    repr.push(c);
                }
            }
        }
        if self.peek() == Some('e') || self.peek() == Some('E') {
            let next = self.peek_at(1);
            let has_sign = next == Some('+') || next == Some('-');
            let digit_pos = if has_sign { 2 } else { 1 };
            if self.peek_at(digit_pos).is_some_and(|c| c.is_ascii_digit()) {
                if let Some(c) = self.consume() {
                    repr.push(c);
                }
                if has_sign {
                    if let Some(c) = self.consume() {
                        repr.push(c);
                    }
                }
                if let Some(c) = self.consume() {
                    repr.push(c);
                }
                numeric_type = NumericType::Number;
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    if let Some(c) = self.consume() {
                        repr.push(c);
                    }
                }
            }
        }

        let value: f64 = repr.parse().unwrap_or(0.0);
        let int_value = if numeric_type == NumericType::Integer {
            repr.parse().ok()
        } else {
            None
        };
        (value, int_value, numeric_type)
    }

    fn consume_escaped_code_point(&mut self) -> Option<char> {
        match self.consume() {
            Some(c) if c.is_ascii_hexdigit() => {
                let mut hex = c.to_string();
                for _ in 0..5 {
                    if self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                        if let Some(c) = self.consume() {
                            hex.push(c);
                        }
                    } else {
                        break;
                    }
                }
                if self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                let code_point = u32::from_str_radix(&hex, 16).unwrap_or(0xFFFD);
                if code_point == 0 || (0xD800..=0xDFFF).contains(&code_point) || code_point > 0x0010_FFFF {
                    Some('\u{FFFD}')
                } else {
                    char::from_u32(code_point)
                }
            }
            None => Some('\u{FFFD}'),
            Some(c) => Some(c),
        }
    }

    fn is_valid_escape(&self, first: Option<char>, second: Option<char>) -> bool {
        first == Some('\\') && second != Some('\n')
    }

    fn would_start_ident_sequence(&self) -> bool {
        self.would_start_ident_sequence_with(self.peek())
    }

    fn would_start_ident_sequence_with(&self, first: Option<char>) -> bool {
        match first {
            Some('-') => {
                let second = self.peek_at(1);
                second.is_some_and(is_ident_start_code_point)
                    || second == Some('-')
                    || self.is_valid_escape(second, self.peek_at(2))
            }
            Some(c) if is_ident_start_code_point(c) => true,
            Some('\\') => self.is_valid_escape(Some('\\'), self.peek_at(1)),
            _ => false,
        }
    }

    fn would_start_number(&self) -> bool {
        match self.peek() {
            Some('+' | '-') => {
                let second = self.peek_at(1);
                if second.is_some_and(|c| c.is_ascii_digit()) {
                    return true;
                }
                if second == Some('.') {
                    return self.peek_at(2).is_some_and(|c| c.is_ascii_digit());
                }
                false
            }
            Some('.') => self.peek_at(1).is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// A newline, tab, space, carriage return, or form feed.
fn is_whitespace(c: char) -> bool {
    matches!(c, '\n' | '\t' | ' ' | '\r' | '\x0C')
}

/// A letter, a non-ASCII code point, or `_`.
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// An ident-start code point, a digit, or `-`.
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(src: &str) -> Vec<CSSToken> {
        let mut tokens = CSSTokenizer::new(src).tokenize_all();
        assert_eq!(tokens.pop(), Some(CSSToken::Eof));
        tokens
    }

    #[test]
    fn skips_comments_like_whitespace() {
        let tokens = tokenize("a/* comment */b");
        assert_eq!(
            tokens,
            vec![CSSToken::Ident("a".into()), CSSToken::Ident("b".into())]
        );
    }

    #[test]
    fn distinguishes_ident_function_and_at_keyword() {
        let tokens = tokenize("div rgba( @media");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Ident("div".into()),
                CSSToken::Whitespace,
                CSSToken::Function("rgba".into()),
                CSSToken::Whitespace,
                CSSToken::AtKeyword("media".into()),
            ]
        );
    }

    #[test]
    fn hash_token_flags_ident_vs_unrestricted() {
        let tokens = tokenize("#main #1a2b3c");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Hash { value: "main".into(), hash_type: HashType::Id },
                CSSToken::Whitespace,
                CSSToken::Hash { value: "1a2b3c".into(), hash_type: HashType::Unrestricted },
            ]
        );
    }

    #[test]
    fn numbers_percentages_and_dimensions() {
        let tokens = tokenize("12px 3.5% -2 +4.0e1");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Dimension {
                    value: 12.0,
                    int_value: Some(12),
                    numeric_type: NumericType::Integer,
                    unit: "px".into(),
                },
                CSSToken::Whitespace,
                CSSToken::Percentage {
                    value: 3.5,
                    int_value: None,
                    numeric_type: NumericType::Number,
                },
                CSSToken::Whitespace,
                CSSToken::Number {
                    value: -2.0,
                    int_value: Some(-2),
                    numeric_type: NumericType::Integer,
                },
                CSSToken::Whitespace,
                CSSToken::Number {
                    value: 40.0,
                    int_value: None,
                    numeric_type: NumericType::Number,
                },
            ]
        );
    }

    #[test]
    fn strings_support_both_quote_styles_and_escapes() {
        let tokens = tokenize(r#""a\"b" 'c\'d'"#);
        assert_eq!(
            tokens,
            vec![
                CSSToken::String("a\"b".into()),
                CSSToken::Whitespace,
                CSSToken::String("c'd".into()),
            ]
        );
    }

    #[test]
    fn unterminated_string_is_bad_string_not_panic() {
        let tokens = tokenize("\"unterminated\nrest");
        assert_eq!(tokens[0], CSSToken::BadString);
    }

    #[test]
    fn url_token_unquoted_and_quoted_forms() {
        let tokens = tokenize("url(foo.png) url(\"foo.png\")");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Url("foo.png".into()),
                CSSToken::Whitespace,
                CSSToken::Function("url".into()),
                CSSToken::String("foo.png".into()),
                CSSToken::RightParen,
            ]
        );
    }

    #[test]
    fn bad_url_recovers_to_next_right_paren() {
        let tokens = tokenize("url(bad 'url) ident");
        assert_eq!(
            tokens,
            vec![
                CSSToken::BadUrl,
                CSSToken::Whitespace,
                CSSToken::Ident("ident".into()),
            ]
        );
    }

    #[test]
    fn cdo_and_cdc_tokens() {
        let tokens = tokenize("<!-- -->");
        assert_eq!(tokens, vec![CSSToken::Cdo, CSSToken::Whitespace, CSSToken::Cdc]);
    }

    #[test]
    fn leading_hyphen_and_escape_ident_sequences() {
        let tokens = tokenize(r"-webkit-box \2d foo");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Ident("-webkit-box".into()),
                CSSToken::Whitespace,
                CSSToken::Ident("-foo".into()),
            ]
        );
    }

    #[test]
    fn punctuation_tokens() {
        let tokens = tokenize(",:;[](){}");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Comma,
                CSSToken::Colon,
                CSSToken::Semicolon,
                CSSToken::LeftBracket,
                CSSToken::RightBracket,
                CSSToken::LeftParen,
                CSSToken::RightParen,
                CSSToken::LeftBrace,
                CSSToken::RightBrace,
            ]
        );
    }

    #[test]
    fn stray_delim_characters() {
        let tokens = tokenize("a~b");
        assert_eq!(
            tokens,
            vec![
                CSSToken::Ident("a".into()),
                CSSToken::Delim('~'),
                CSSToken::Ident("b".into()),
            ]
        );
    }
}
