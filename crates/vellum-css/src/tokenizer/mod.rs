//! Lexical primitives: tokenization and declaration-block error recovery (C1).

mod cursor;
mod token;
mod tokenizer;

pub use cursor::TokenCursor;
pub use token::{CSSToken, HashType, NumericType};
pub use tokenizer::CSSTokenizer;
