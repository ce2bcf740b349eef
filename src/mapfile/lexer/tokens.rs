//! Raw token definitions for map documents
//!
//! These are the lexemes produced directly by logos. Bare words are not yet
//! classified as keywords here; [`super::source::TokenSource`] does that so
//! quoted text can never be mistaken for a keyword.
use logos::{Lexer, Logos};

/// All lexemes of the map definition language
#[derive(Logos, Debug, PartialEq, Clone)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"#[^\n]*")]
pub enum RawToken {
    // Quoted strings, either quote style, content without the quotes
    #[regex(r#""([^"\\]|\\.)*""#, unquote)]
    #[regex(r#"'([^'\\]|\\.)*'"#, unquote)]
    Quoted(String),

    // Signed decimal numbers with optional exponent
    #[regex(r"[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)([eE][+-]?[0-9]+)?", number, priority = 10)]
    Number(f64),

    // Parenthesized expression, outer parens stripped
    #[token("(", expression)]
    Expression(String),

    // Slash delimited regular expression, slashes stripped
    #[regex(r"/([^/\\\n]|\\.)*/", regex_body, priority = 8)]
    Regex(String),

    // Anything else up to whitespace: keyword or bare string
    #[regex(r#"[^\s"'()#]+"#, word)]
    Word(String),
}

impl RawToken {
    /// Check if this token came from quoted text
    pub fn is_quoted(&self) -> bool {
        matches!(self, RawToken::Quoted(_))
    }

    /// Check if this token is a literal that selects features
    pub fn is_match_literal(&self) -> bool {
        matches!(self, RawToken::Expression(_) | RawToken::Regex(_))
    }
}

/// Strip the quotes. `\<quote>` and `\\` are escapes; any other backslash
/// is kept so Windows paths and regex classes read as written.
fn unquote(lex: &mut Lexer<RawToken>) -> String {
    let slice = lex.slice();
    let quote = slice.chars().next().unwrap_or('"');
    let body = &slice[1..slice.len() - 1];

    let mut text = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(ch) = chars.next() {
        if ch != '\\' {
            text.push(ch);
            continue;
        }
        match chars.next() {
            Some(escaped) if escaped == quote || escaped == '\\' => text.push(escaped),
            Some(other) => {
                text.push('\\');
                text.push(other);
            }
            None => text.push('\\'),
        }
    }
    text
}

fn number(lex: &mut Lexer<RawToken>) -> Option<f64> {
    lex.slice().parse().ok()
}

fn regex_body(lex: &mut Lexer<RawToken>) -> String {
    let slice = lex.slice();
    slice[1..slice.len() - 1].to_string()
}

fn word(lex: &mut Lexer<RawToken>) -> String {
    lex.slice().to_string()
}

/// Consume up to the paren matching the opening one, skipping quoted text.
fn expression(lex: &mut Lexer<RawToken>) -> Option<String> {
    let rest = lex.remainder();
    let mut depth = 1usize;
    let mut quote: Option<char> = None;

    for (offset, ch) in rest.char_indices() {
        if let Some(open) = quote {
            if ch == open {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    let body = rest[..offset].to_string();
                    lex.bump(offset + 1);
                    return Some(body);
                }
            }
            _ => {}
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<RawToken> {
        RawToken::lexer(source).filter_map(|t| t.ok()).collect()
    }

    #[test]
    fn test_quoted_strings() {
        assert_eq!(lex(r#""roads""#), vec![RawToken::Quoted("roads".into())]);
        assert_eq!(lex("'roads'"), vec![RawToken::Quoted("roads".into())]);
        assert_eq!(
            lex(r#""say \"hi\"""#),
            vec![RawToken::Quoted(r#"say "hi""#.into())]
        );
    }

    #[test]
    fn test_backslash_escapes() {
        assert_eq!(lex(r#""C:\\maps\\""#), vec![RawToken::Quoted(r"C:\maps\".into())]);
        assert_eq!(lex(r"'^data/[a-z]+\.shp$'"), vec![RawToken::Quoted(r"^data/[a-z]+\.shp$".into())]);
        assert_eq!(lex(r"'it\'s'"), vec![RawToken::Quoted("it's".into())]);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            lex("1 -2.5 .5 3e2"),
            vec![
                RawToken::Number(1.0),
                RawToken::Number(-2.5),
                RawToken::Number(0.5),
                RawToken::Number(300.0)
            ]
        );
    }

    #[test]
    fn test_nested_expression() {
        assert_eq!(
            lex("([POP] > (2 * 3))"),
            vec![RawToken::Expression("[POP] > (2 * 3)".into())]
        );
    }

    #[test]
    fn test_expression_ignores_quoted_parens() {
        assert_eq!(
            lex(r#"("[NAME]" eq "a)b")"#),
            vec![RawToken::Expression(r#""[NAME]" eq "a)b""#.into())]
        );
    }

    #[test]
    fn test_unbalanced_expression_is_an_error() {
        let results: Vec<_> = RawToken::lexer("(abc").collect();
        assert!(results.iter().any(|r| r.is_err()));
    }

    #[test]
    fn test_regex_and_paths() {
        assert_eq!(lex("/^a.*/"), vec![RawToken::Regex("^a.*".into())]);
        assert_eq!(
            lex("/data/roads.shp"),
            vec![RawToken::Word("/data/roads.shp".into())]
        );
    }

    #[test]
    fn test_comments_are_skipped() {
        assert_eq!(
            lex("NAME # trailing comment\n\"x\""),
            vec![RawToken::Word("NAME".into()), RawToken::Quoted("x".into())]
        );
    }

    #[test]
    fn test_word_with_hyphen() {
        assert_eq!(lex("ONE-TO-MANY"), vec![RawToken::Word("ONE-TO-MANY".into())]);
    }

    #[test]
    fn test_predicates() {
        assert!(RawToken::Quoted("a".into()).is_quoted());
        assert!(RawToken::Regex("a".into()).is_match_literal());
        assert!(!RawToken::Word("a".into()).is_match_literal());
    }
}
