//! Token source consumed by the parser
//!
//! A [`TokenSource`] classifies raw lexemes into parser tokens and tracks the
//! position of the token last handed out. It runs in one of two modes:
//! [`Mode::Document`] for whole files, with line numbers for diagnostics, and
//! [`Mode::SingleValue`] for a single request value, without line tracking.

use super::keywords::Keyword;
use super::tokens::RawToken;
use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use logos::Logos;
use std::ops::Range;
use tracing::trace;

/// Where the token stream comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Document,
    SingleValue,
}

/// A classified token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Keyword(Keyword),
    String(String),
    Number(f64),
    Expression(String),
    Regex(String),
    End,
    Eof,
}

impl Token {
    pub fn is_end(&self) -> bool {
        matches!(self, Token::End)
    }

    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}

/// Converts byte offsets to 1-based line numbers.
#[derive(Debug, Clone)]
pub struct SourceLocation {
    line_starts: Vec<usize>,
}

impl SourceLocation {
    pub fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (byte_pos, ch) in source.char_indices() {
            if ch == '\n' {
                line_starts.push(byte_pos + 1);
            }
        }
        Self { line_starts }
    }

    pub fn line_of(&self, byte_offset: usize) -> usize {
        let index = self
            .line_starts
            .binary_search(&byte_offset)
            .unwrap_or_else(|i| i - 1);
        index + 1
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

struct Lexeme {
    token: std::result::Result<Token, ()>,
    span: Range<usize>,
    quoted: bool,
}

/// The stream of tokens for one parse.
pub struct TokenSource {
    text: String,
    lexemes: Vec<Lexeme>,
    position: usize,
    mode: Mode,
    location: Option<SourceLocation>,
}

impl TokenSource {
    /// Tokens of a whole document, with line tracking.
    pub fn document(text: impl Into<String>) -> Self {
        let text = text.into();
        let lexemes = lex(&text, 0);
        let location = Some(SourceLocation::new(&text));
        Self {
            text,
            lexemes,
            position: 0,
            mode: Mode::Document,
            location,
        }
    }

    /// Tokens of one request value.
    ///
    /// A value starting with `#` is a hex color, not a comment.
    pub fn single_value(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed_start = text.len() - text.trim_start().len();
        let lexemes = if text[trimmed_start..].starts_with('#') {
            let word_end = text[trimmed_start..]
                .find(char::is_whitespace)
                .map(|offset| trimmed_start + offset)
                .unwrap_or(text.len());
            let mut lexemes = vec![Lexeme {
                token: Ok(Token::String(text[trimmed_start..word_end].to_string())),
                span: trimmed_start..word_end,
                quoted: false,
            }];
            lexemes.extend(lex(&text[word_end..], word_end));
            lexemes
        } else {
            lex(&text, 0)
        };

        Self {
            text,
            lexemes,
            position: 0,
            mode: Mode::SingleValue,
            location: None,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Pull the next token. The end of input is reported as [`Token::Eof`].
    pub fn next(&mut self) -> Result<Token> {
        let Some(lexeme) = self.lexemes.get(self.position) else {
            self.position = self.lexemes.len() + 1;
            return Ok(Token::Eof);
        };
        self.position += 1;

        if self.mode == Mode::SingleValue {
            trace!(token = ?lexeme.token, "single value token");
        }

        match &lexeme.token {
            Ok(token) => Ok(token.clone()),
            Err(()) => Err(MapfileError::new(
                ErrorKind::Symbol,
                "lexer",
                format!("Parsing error near ({})", self.text()),
            )
            .at_line(self.line())),
        }
    }

    /// The next token, without consuming it.
    pub fn peek(&self) -> Option<&Token> {
        self.lexemes
            .get(self.position)
            .and_then(|lexeme| lexeme.token.as_ref().ok())
    }

    fn current(&self) -> Option<&Lexeme> {
        self.position
            .checked_sub(1)
            .and_then(|index| self.lexemes.get(index))
    }

    /// Text of the token last returned by [`TokenSource::next`].
    pub fn text(&self) -> &str {
        match self.current() {
            Some(lexeme) => &self.text[lexeme.span.clone()],
            None => "",
        }
    }

    /// Whether the token last returned was quoted text.
    pub fn was_quoted(&self) -> bool {
        self.current().map(|lexeme| lexeme.quoted).unwrap_or(false)
    }

    /// Line of the token last returned, in document mode only.
    pub fn line(&self) -> Option<usize> {
        let location = self.location.as_ref()?;
        match self.current() {
            Some(lexeme) => Some(location.line_of(lexeme.span.start)),
            None if self.position > 0 => Some(location.line_count()),
            None => Some(1),
        }
    }

    /// The whole text behind this source.
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// Consume everything not yet read and return it as one value.
    ///
    /// A lone quoted string is returned without its quotes.
    pub fn take_rest(&mut self) -> String {
        let remaining = &self.lexemes[self.position.min(self.lexemes.len())..];
        let value = match remaining {
            [Lexeme {
                token: Ok(Token::String(text)),
                quoted: true,
                ..
            }] => text.clone(),
            [first, ..] => self.text[first.span.start..].trim().to_string(),
            [] => String::new(),
        };
        self.position = self.lexemes.len();
        value
    }
}

fn lex(text: &str, base: usize) -> Vec<Lexeme> {
    let mut lexer = RawToken::lexer(text);
    let mut lexemes = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        let span = (span.start + base)..(span.end + base);
        let quoted = matches!(result, Ok(RawToken::Quoted(_)));
        let token = result.map(classify).map_err(|_| ());
        lexemes.push(Lexeme {
            token,
            span,
            quoted,
        });
    }

    lexemes
}

fn classify(raw: RawToken) -> Token {
    match raw {
        RawToken::Quoted(text) => Token::String(text),
        RawToken::Number(value) => Token::Number(value),
        RawToken::Expression(text) => Token::Expression(text),
        RawToken::Regex(text) => Token::Regex(text),
        RawToken::Word(word) => match Keyword::lookup(&word) {
            Some(Keyword::End) => Token::End,
            Some(keyword) => Token::Keyword(keyword),
            None => Token::String(word),
        },
    }
}

/// Every token of a document as text: strings quoted, expressions in parens,
/// regexes between slashes.
pub fn tokenize_map(text: &str) -> Result<Vec<String>> {
    let mut source = TokenSource::document(text);
    let mut tokens = Vec::new();

    loop {
        let rendered = match source.next()? {
            Token::Eof => break,
            Token::End => "END".to_string(),
            Token::Keyword(keyword) => keyword.as_str().to_string(),
            Token::String(text) => format!("\"{}\"", text),
            Token::Number(_) => source.text().to_string(),
            Token::Expression(text) => format!("({})", text),
            Token::Regex(text) => format!("/{}/", text),
        };
        tokens.push(rendered);
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(mut source: TokenSource) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = source.next().unwrap();
            if token.is_eof() {
                break;
            }
            tokens.push(token);
        }
        tokens
    }

    #[test]
    fn test_keywords_and_strings() {
        let tokens = collect(TokenSource::document("LAYER name \"END\" end"));
        assert_eq!(
            tokens,
            vec![
                Token::Keyword(Keyword::Layer),
                Token::Keyword(Keyword::Name),
                Token::String("END".into()),
                Token::End,
            ]
        );
    }

    #[test]
    fn test_bare_word_is_string() {
        let tokens = collect(TokenSource::document("roads"));
        assert_eq!(tokens, vec![Token::String("roads".into())]);
    }

    #[test]
    fn test_lines_in_document_mode() {
        let mut source = TokenSource::document("MAP\n  NAME\n  \"x\"\nEND");
        source.next().unwrap();
        assert_eq!(source.line(), Some(1));
        source.next().unwrap();
        assert_eq!(source.line(), Some(2));
        source.next().unwrap();
        assert_eq!(source.line(), Some(3));
        assert!(source.was_quoted());
        assert_eq!(source.next().unwrap(), Token::End);
        assert_eq!(source.line(), Some(4));
    }

    #[test]
    fn test_no_lines_in_single_value_mode() {
        let mut source = TokenSource::single_value("255 0 0");
        assert_eq!(source.mode(), Mode::SingleValue);
        assert_eq!(source.next().unwrap(), Token::Number(255.0));
        assert_eq!(source.line(), None);
    }

    #[test]
    fn test_hex_color_value_is_not_a_comment() {
        let tokens = collect(TokenSource::single_value("#ff0000"));
        assert_eq!(tokens, vec![Token::String("#ff0000".into())]);
    }

    #[test]
    fn test_take_rest() {
        let mut source = TokenSource::single_value("  /data/roads (1).shp ");
        assert_eq!(source.take_rest(), "/data/roads (1).shp");
        assert_eq!(source.next().unwrap(), Token::Eof);

        let mut quoted = TokenSource::single_value("'Main Roads'");
        assert_eq!(quoted.take_rest(), "Main Roads");
    }

    #[test]
    fn test_eof_repeats() {
        let mut source = TokenSource::single_value("");
        assert_eq!(source.next().unwrap(), Token::Eof);
        assert_eq!(source.next().unwrap(), Token::Eof);
    }

    #[test]
    fn test_lexing_error_reports_text_and_line() {
        let mut source = TokenSource::document("NAME\n(unclosed");
        source.next().unwrap();
        let err = source.next().unwrap_err();
        assert_eq!(err.kind, ErrorKind::Symbol);
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_tokenize_map_renders_literals() {
        let tokens = tokenize_map("CLASS EXPRESSION ([A] > 1) TEXT 'x' SIZE 8 /^a/ END").unwrap();
        assert_eq!(
            tokens,
            vec!["CLASS", "EXPRESSION", "([A] > 1)", "TEXT", "\"x\"", "SIZE", "8", "/^a/", "END"]
        );
    }
}
