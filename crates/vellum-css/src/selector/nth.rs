//! `An+B` microsyntax parsing for `:nth-child()` and kin (spec §3).

use crate::tokenizer::{CSSToken, TokenCursor};

/// A parsed `An+B` expression. `step == 0` means "match only the `offset`th
/// element" (the bare-integer form); otherwise an element at 1-based ordinal
/// `ord` matches when `(ord - offset)` is an exact, non-negative multiple of
/// `step`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NthArgs {
    /// The `A` coefficient (`step` of the arithmetic sequence).
    pub step: i32,
    /// The `B` offset.
    pub offset: i32,
}

impl NthArgs {
    /// Whether the 1-based ordinal `ord` falls in this sequence.
    #[must_use]
    pub const fn matches(self, ord: u32) -> bool {
        let diff = ord as i64 - self.offset as i64;
        if self.step == 0 {
            return diff == 0;
        }
        diff % self.step as i64 == 0 && diff / self.step as i64 >= 0
    }
}

/// Parse the contents of a `:nth-*()` functional pseudo-class, stopping
/// before the closing `)` (the caller consumes it). Accepts `even`, `odd`,
/// `n`, `-n`, `<integer>`, `<integer>n`, and the `±n` forms optionally
/// followed by a signed integer offset, with or without intervening
/// whitespace around an explicit sign.
#[must_use]
pub fn parse_nth_args(cursor: &mut TokenCursor) -> Option<NthArgs> {
    cursor.skip_whitespace();
    if let CSSToken::Ident(word) = cursor.peek().clone() {
        let lower = word.to_ascii_lowercase();
        match lower.as_str() {
            "even" => {
                let _ = cursor.advance();
                return Some(NthArgs { step: 2, offset: 0 });
            }
            "odd" => {
                let _ = cursor.advance();
                return Some(NthArgs { step: 2, offset: 1 });
            }
            "n" => {
                let _ = cursor.advance();
                return Some(finish_nth(cursor, 1));
            }
            "-n" => {
                let _ = cursor.advance();
                return Some(finish_nth(cursor, -1));
            }
            _ => {}
        }
        // The unspaced `An-B` form (e.g. `n-1`, `-n-1`) lexes as a single
        // ident, since `-` and digits are ordinary ident code points.
        if let Some(rest) = lower.strip_prefix('-') {
            if let Some(offset) = parse_n_dash_digits(rest) {
                let _ = cursor.advance();
                return Some(NthArgs { step: -1, offset });
            }
        } else if let Some(offset) = parse_n_dash_digits(&lower) {
            let _ = cursor.advance();
            return Some(NthArgs { step: 1, offset });
        }
    }
    match cursor.peek().clone() {
        CSSToken::Dimension { int_value: Some(n), ref unit, .. } => {
            let unit_lower = unit.to_ascii_lowercase();
            #[allow(clippy::cast_possible_truncation)]
            let step = n as i32;
            if unit_lower == "n" {
                let _ = cursor.advance();
                return Some(finish_nth(cursor, step));
            }
            // The unspaced `<n-dimension>-B` form (e.g. `4n-1`): the tokenizer
            // folds the `n-1` suffix into the dimension's unit text.
            if let Some(offset) = parse_n_dash_digits(&unit_lower) {
                let _ = cursor.advance();
                return Some(NthArgs { step, offset });
            }
            None
        }
        CSSToken::Number { int_value: Some(n), .. } => {
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            let offset = n as i32;
            Some(NthArgs { step: 0, offset })
        }
        _ => None,
    }
}

/// If `text` is exactly `n-<digits>`, return the negative offset those
/// digits encode (e.g. `"n-1"` -> `Some(-1)`). Used for the unspaced
/// `An-B` forms, where the tokenizer has already folded the literal `-`
/// and following digits into the preceding ident/dimension-unit text.
fn parse_n_dash_digits(text: &str) -> Option<i32> {
    let digits = text.strip_prefix("n-")?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse::<i32>().ok().map(|v| -v)
}

/// Consume the optional `±<integer>` offset following an `n`/`An` term.
fn finish_nth(cursor: &mut TokenCursor, step: i32) -> NthArgs {
    cursor.skip_whitespace();
    let offset = match cursor.peek().clone() {
        CSSToken::Delim('+') => {
            let _ = cursor.advance();
            cursor.skip_whitespace();
            parse_signed_int(cursor).unwrap_or(0)
        }
        CSSToken::Delim('-') => {
            let _ = cursor.advance();
            cursor.skip_whitespace();
            parse_signed_int(cursor).map(|n| -n).unwrap_or(0)
        }
        CSSToken::Number { int_value: Some(n), .. } => {
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            {
                n as i32
            }
        }
        _ => 0,
    };
    NthArgs { step, offset }
}

fn parse_signed_int(cursor: &mut TokenCursor) -> Option<i32> {
    match cursor.peek().clone() {
        CSSToken::Number { int_value: Some(n), .. } => {
            let _ = cursor.advance();
            #[allow(clippy::cast_possible_truncation)]
            Some(n.unsigned_abs() as i32)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn parse(src: &str) -> NthArgs {
        let tokens = CSSTokenizer::new(src).tokenize_all();
        let mut cursor = TokenCursor::new(tokens);
        parse_nth_args(&mut cursor).expect("valid An+B")
    }

    #[test]
    fn even_odd_keywords() {
        assert_eq!(parse("even"), NthArgs { step: 2, offset: 0 });
        assert_eq!(parse("odd"), NthArgs { step: 2, offset: 1 });
    }

    #[test]
    fn plain_integer_is_bare_offset() {
        assert_eq!(parse("3"), NthArgs { step: 0, offset: 3 });
    }

    #[test]
    fn an_plus_b_forms() {
        assert_eq!(parse("2n+1"), NthArgs { step: 2, offset: 1 });
        assert_eq!(parse("2n + 1"), NthArgs { step: 2, offset: 1 });
        assert_eq!(parse("-n+3"), NthArgs { step: -1, offset: 3 });
        assert_eq!(parse("n"), NthArgs { step: 1, offset: 0 });
        assert_eq!(parse("n-1"), NthArgs { step: 1, offset: -1 });
        assert_eq!(parse("4n-1"), NthArgs { step: 4, offset: -1 });
        assert_eq!(parse("-n-1"), NthArgs { step: -1, offset: -1 });
        assert_eq!(parse("-4n-12"), NthArgs { step: -4, offset: -12 });
    }

    #[test]
    fn sequence_membership() {
        let odd = NthArgs { step: 2, offset: 1 };
        assert!(odd.matches(1));
        assert!(!odd.matches(2));
        assert!(odd.matches(3));

        let first_three = NthArgs { step: -1, offset: 3 };
        assert!(first_three.matches(1));
        assert!(first_three.matches(3));
        assert!(!first_three.matches(4));
    }
}
