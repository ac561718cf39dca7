use super::token::CSSToken;

/// A cursor over a pre-tokenized CSS source, with the lexical primitives the
/// rest of the engine is built from: whitespace skipping, balanced-group
/// skipping for error recovery, and simple lookahead.
///
/// Tokens already fold matched quotes, so only bracket/brace/paren nesting
/// needs to be tracked here; a string or URL token that never closed its
/// quote was already turned into `BadString`/`BadUrl` by the tokenizer.
pub struct TokenCursor {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl TokenCursor {
    /// Wrap a token stream (normally produced by [`super::CSSTokenizer`]).
    #[must_use]
    pub fn new(tokens: Vec<CSSToken>) -> Self {
        Self { tokens, position: 0 }
    }

    /// The token at the cursor, or [`CSSToken::Eof`] past the end.
    #[must_use]
    pub fn peek(&self) -> &CSSToken {
        self.peek_at(0)
    }

    /// The token `offset` positions ahead of the cursor.
    #[must_use]
    pub fn peek_at(&self, offset: usize) -> &CSSToken {
        self.tokens.get(self.position + offset).unwrap_or(&CSSToken::Eof)
    }

    /// Advance past the current token and return it.
    pub fn advance(&mut self) -> CSSToken {
        let token = self.tokens.get(self.position).cloned().unwrap_or(CSSToken::Eof);
        if self.position < self.tokens.len() {
            self.position += 1;
        }
        token
    }

    /// Advance past a single whitespace token, if the cursor is on one.
    pub fn skip_one_whitespace(&mut self) {
        if self.peek().is_whitespace() {
            let _ = self.advance();
        }
    }

    /// Advance past any run of whitespace tokens (comments never reach the
    /// token stream: the tokenizer consumes them while scanning).
    pub fn skip_whitespace(&mut self) {
        while self.peek().is_whitespace() {
            let _ = self.advance();
        }
    }

    /// Whether the cursor has reached the end of input.
    #[must_use]
    pub fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// Advance to just past the next top-level `;`, or stop *before* an
    /// enclosing `}` without consuming it, honouring `()`/`[]`/`{}` nesting
    /// (spec §4.1's `next_property`). Returns `true` if a `;` was consumed,
    /// `false` if recovery stopped at `}` or end of input.
    pub fn next_property(&mut self) -> bool {
        let mut depth: i32 = 0;
        loop {
            match self.peek() {
                CSSToken::Eof => return false,
                CSSToken::RightBrace if depth == 0 => return false,
                CSSToken::Semicolon if depth == 0 => {
                    let _ = self.advance();
                    return true;
                }
                CSSToken::LeftParen | CSSToken::LeftBracket | CSSToken::LeftBrace => {
                    depth += 1;
                    let _ = self.advance();
                }
                CSSToken::RightParen | CSSToken::RightBracket | CSSToken::RightBrace => {
                    depth -= 1;
                    let _ = self.advance();
                }
                _ => {
                    let _ = self.advance();
                }
            }
        }
    }

    /// Advance past tokens up to and including the matching `}` for a brace
    /// the cursor has already stepped past (depth starts at 1). Used when an
    /// entire block must be discarded while keeping the outer stream balanced
    /// (a guarded `@media`/`@supports` body, or a malformed rule).
    pub fn skip_balanced_block(&mut self) {
        let mut depth: i32 = 1;
        loop {
            match self.peek() {
                CSSToken::Eof => return,
                CSSToken::LeftBrace => {
                    depth += 1;
                    let _ = self.advance();
                }
                CSSToken::RightBrace => {
                    depth -= 1;
                    let _ = self.advance();
                    if depth == 0 {
                        return;
                    }
                }
                _ => {
                    let _ = self.advance();
                }
            }
        }
    }

    /// Current token index, for diagnostics and tests.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }
}
