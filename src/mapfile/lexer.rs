//! Lexer module for map documents
//!
//! Tokenization happens in two steps. logos produces raw lexemes
//! ([`RawToken`]): quoted strings, numbers, parenthesized expressions,
//! slash-delimited regexes and bare words. The [`TokenSource`] then turns bare
//! words into keywords (case-insensitively), `END` into the block terminator and
//! everything else into strings, and hands tokens to the parser one at a time.

pub mod keywords;
pub mod source;
pub mod tokens;

pub use keywords::Keyword;
pub use source::{tokenize_map, Mode, SourceLocation, Token, TokenSource};
pub use tokens::RawToken;
