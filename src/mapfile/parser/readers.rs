//! Field readers shared by the document parser and the partial-update engine
//!
//! Each reader pulls the tokens of one field value from the context. In a
//! document they read from the token stream; in a single value they read the
//! request value. Free-text fields take a single value whole, without lexing.

use super::context::ParserContext;
use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use crate::mapfile::lexer::{Keyword, Mode, Token};
use crate::mapfile::model::{Color, Expression, OrAuto, Point, Rect};

/// Whether a block reader recognized the keyword it was given.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOutcome {
    Applied,
    Unknown,
}

impl ParserContext<'_> {
    fn wrong_token(&self, routine: &'static str) -> MapfileError {
        self.fail(
            ErrorKind::Symbol,
            routine,
            format!("Parsing error near ({})", self.text()),
        )
    }

    fn next_value(&mut self, routine: &'static str) -> Result<Token> {
        match self.next()? {
            Token::Eof => Err(self.end_of_input(routine)),
            token => Ok(token),
        }
    }

    /// A string token. Keywords are not accepted as strings.
    pub fn read_string(&mut self, routine: &'static str) -> Result<String> {
        match self.next_value(routine)? {
            Token::String(text) => Ok(text),
            _ => Err(self.wrong_token(routine)),
        }
    }

    /// Free text: a string token in a document, the whole value otherwise.
    pub fn read_text(&mut self, routine: &'static str) -> Result<String> {
        match self.mode() {
            Mode::Document => self.read_string(routine),
            Mode::SingleValue => Ok(self.take_rest()),
        }
    }

    /// Any single token as text, keywords included.
    pub fn read_word(&mut self, routine: &'static str) -> Result<String> {
        match self.next_value(routine)? {
            Token::String(text) => Ok(text),
            Token::Keyword(keyword) => Ok(keyword.as_str().to_string()),
            Token::Number(_) => Ok(self.text().to_string()),
            _ => Err(self.wrong_token(routine)),
        }
    }

    pub fn read_number(&mut self, routine: &'static str) -> Result<f64> {
        match self.next_value(routine)? {
            Token::Number(value) => Ok(value),
            _ => Err(self.wrong_token(routine)),
        }
    }

    pub fn read_int(&mut self, routine: &'static str) -> Result<i32> {
        let value = self.read_number(routine)?;
        if value < i32::MIN as f64 || value > i32::MAX as f64 {
            return Err(self.fail(
                ErrorKind::OutOfRange,
                routine,
                format!("Value {} out of range", value),
            ));
        }
        Ok(value as i32)
    }

    /// A non-negative integer, used for indexes and counts.
    pub fn read_index(&mut self, routine: &'static str) -> Result<usize> {
        let value = self.read_int(routine)?;
        usize::try_from(value).map_err(|_| {
            self.fail(
                ErrorKind::OutOfRange,
                routine,
                format!("Value {} out of range", value),
            )
        })
    }

    pub fn read_pair(&mut self, routine: &'static str) -> Result<(i32, i32)> {
        Ok((self.read_int(routine)?, self.read_int(routine)?))
    }

    pub fn read_rect(&mut self, routine: &'static str) -> Result<Rect> {
        Ok(Rect::new(
            self.read_number(routine)?,
            self.read_number(routine)?,
            self.read_number(routine)?,
            self.read_number(routine)?,
        ))
    }

    /// `r g b` or a `#rrggbb` string.
    pub fn read_color(&mut self, routine: &'static str) -> Result<Color> {
        match self.next_value(routine)? {
            Token::Number(red) => {
                let green = self.read_int(routine)?;
                let blue = self.read_int(routine)?;
                Ok(Color::rgb(red as i32, green, blue))
            }
            Token::String(text) => {
                Color::from_hex(&text).ok_or_else(|| self.wrong_token(routine))
            }
            _ => Err(self.wrong_token(routine)),
        }
    }

    /// `r g b a`.
    pub fn read_color_with_alpha(&mut self, routine: &'static str) -> Result<Color> {
        Ok(Color::rgba(
            self.read_int(routine)?,
            self.read_int(routine)?,
            self.read_int(routine)?,
            self.read_int(routine)?,
        ))
    }

    /// One keyword out of an allowed set.
    pub fn read_choice<T: Copy>(&mut self, routine: &'static str, choices: &[(Keyword, T)]) -> Result<T> {
        match self.next_value(routine)? {
            Token::Keyword(keyword) => choices
                .iter()
                .find(|(candidate, _)| *candidate == keyword)
                .map(|(_, value)| *value)
                .ok_or_else(|| self.wrong_token(routine)),
            _ => Err(self.wrong_token(routine)),
        }
    }

    pub fn read_on_off(&mut self, routine: &'static str) -> Result<bool> {
        self.read_choice(routine, &[(Keyword::On, true), (Keyword::Off, false)])
    }

    pub fn read_true_false(&mut self, routine: &'static str) -> Result<bool> {
        self.read_choice(routine, &[(Keyword::True, true), (Keyword::False, false)])
    }

    /// A number or `AUTO`.
    pub fn read_number_or_auto(&mut self, routine: &'static str) -> Result<OrAuto<f64>> {
        match self.next_value(routine)? {
            Token::Number(value) => Ok(OrAuto::Fixed(value)),
            Token::Keyword(Keyword::Auto) => Ok(OrAuto::Auto),
            _ => Err(self.wrong_token(routine)),
        }
    }

    /// A string, parenthesized expression or regex literal.
    ///
    /// A single value that is not an expression or regex is taken whole as
    /// a string.
    pub fn read_expression(&mut self, routine: &'static str) -> Result<Expression> {
        if self.mode() == Mode::SingleValue
            && !matches!(self.peek(), Some(Token::Expression(_) | Token::Regex(_)))
        {
            return Ok(Expression::string(self.take_rest()));
        }
        match self.next_value(routine)? {
            Token::String(text) => Ok(Expression::string(text)),
            Token::Expression(text) => Ok(Expression::expression(text)),
            Token::Regex(text) => Ok(Expression::regex(text)),
            _ => Err(self.wrong_token(routine)),
        }
    }

    /// A symbol by index or by name.
    ///
    /// In a document a name is resolved after the parse. In a partial update
    /// it must already exist in the map's symbol catalog.
    pub fn read_symbol(&mut self, routine: &'static str) -> Result<(usize, Option<String>)> {
        match self.next_value(routine)? {
            Token::Number(value) if value >= 0.0 => Ok((value as usize, None)),
            Token::String(name) => match self.scope() {
                None => Ok((0, Some(name))),
                Some(scope) => match scope.symbols.index_of(&name) {
                    Some(index) => Ok((index, Some(name))),
                    None => Err(self.fail(
                        ErrorKind::Symbol,
                        routine,
                        format!("Undefined symbol \"{}\".", name),
                    )),
                },
            },
            _ => Err(self.wrong_token(routine)),
        }
    }

    /// `x y` pairs up to `END`. A single value may also end without `END`.
    pub fn read_points(&mut self, routine: &'static str) -> Result<Vec<Point>> {
        let mut points = Vec::new();
        loop {
            match self.next()? {
                Token::Number(x) => {
                    let y = self.read_number(routine)?;
                    points
                        .try_reserve(1)
                        .map_err(|_| MapfileError::memory(routine))?;
                    points.push(Point::new(x, y));
                }
                Token::End => return Ok(points),
                Token::Eof if self.mode() == Mode::SingleValue => return Ok(points),
                Token::Eof => return Err(self.end_of_input(routine)),
                _ => return Err(self.unexpected(routine)),
            }
        }
    }

    /// The first character of a string.
    pub fn read_character(&mut self, routine: &'static str) -> Result<char> {
        let text = self.read_string(routine)?;
        text.chars().next().ok_or_else(|| self.wrong_token(routine))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::model::{FontCatalog, Status, Symbol, SymbolCatalog};
    use crate::mapfile::parser::context::{ParserOptions, UpdateScope};

    fn document(text: &str) -> ParserContext<'static> {
        ParserContext::document(text, ParserOptions::default())
    }

    #[test]
    fn test_read_color_forms() {
        let mut ctx = document("255 0 10 \"#00ff00\"");
        assert_eq!(ctx.read_color("parse_style").unwrap(), Color::rgb(255, 0, 10));
        assert_eq!(ctx.read_color("parse_style").unwrap(), Color::rgb(0, 255, 0));
    }

    #[test]
    fn test_read_color_rejects_words() {
        let mut ctx = document("red");
        let err = ctx.read_color("parse_style").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Symbol);
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_read_choice_limits_symbols() {
        let mut ctx = document("ON EMBED");
        assert_eq!(ctx.read_choice("parse_layer", Status::LAYER).unwrap(), Status::On);
        assert_eq!(
            ctx.read_choice("parse_layer", Status::LAYER).unwrap_err().kind,
            ErrorKind::Symbol
        );
    }

    #[test]
    fn test_string_rejects_keyword() {
        let mut ctx = document("NAME");
        assert_eq!(ctx.read_string("parse_layer").unwrap_err().kind, ErrorKind::Symbol);
    }

    #[test]
    fn test_end_of_input() {
        let mut ctx = document("12");
        assert_eq!(ctx.read_int("parse_map").unwrap(), 12);
        assert_eq!(ctx.read_int("parse_map").unwrap_err().kind, ErrorKind::EndOfInput);
    }

    #[test]
    fn test_read_expression_forms() {
        let mut ctx = document("\"abc\" (abc > 1) /abc/");
        assert_eq!(ctx.read_expression("parse_class").unwrap(), Expression::string("abc"));
        assert_eq!(ctx.read_expression("parse_class").unwrap(), Expression::expression("abc > 1"));
        assert_eq!(ctx.read_expression("parse_class").unwrap(), Expression::regex("abc"));
    }

    #[test]
    fn test_text_takes_whole_single_value() {
        let symbols = SymbolCatalog::default();
        let fonts = FontCatalog::default();
        let scope = UpdateScope {
            template_pattern: None,
            data_pattern: None,
            symbols: &symbols,
            fonts: &fonts,
        };
        let mut ctx = ParserContext::single_value("Main Roads END", ParserOptions::default(), scope);
        assert_eq!(ctx.read_text("update_layer").unwrap(), "Main Roads END");
    }

    #[test]
    fn test_single_value_expressions() {
        let symbols = SymbolCatalog::default();
        let fonts = FontCatalog::default();
        let scope = UpdateScope {
            template_pattern: None,
            data_pattern: None,
            symbols: &symbols,
            fonts: &fonts,
        };
        let mut ctx = ParserContext::single_value("([POP] > 10)", ParserOptions::default(), scope);
        assert_eq!(ctx.read_expression("update_class").unwrap(), Expression::expression("[POP] > 10"));

        let mut ctx = ParserContext::single_value("Main Street", ParserOptions::default(), scope);
        assert_eq!(ctx.read_expression("update_class").unwrap(), Expression::string("Main Street"));
    }

    #[test]
    fn test_symbol_names_resolve_in_updates() {
        let mut symbols = SymbolCatalog::default();
        symbols.symbols.push(Symbol {
            name: Some("circle".into()),
            ..Symbol::default()
        });
        let fonts = FontCatalog::default();
        let scope = UpdateScope {
            template_pattern: None,
            data_pattern: None,
            symbols: &symbols,
            fonts: &fonts,
        };

        let mut found = ParserContext::single_value("circle", ParserOptions::default(), scope);
        assert_eq!(found.read_symbol("update_class").unwrap(), (1, Some("circle".into())));

        let mut missing = ParserContext::single_value("star", ParserOptions::default(), scope);
        assert_eq!(missing.read_symbol("update_class").unwrap_err().kind, ErrorKind::Symbol);

        let mut deferred = document("star");
        assert_eq!(deferred.read_symbol("parse_style").unwrap(), (0, Some("star".into())));
    }
}
