use super::read_block;
use crate::mapfile::error::{push_checked, Result};
use crate::mapfile::lexer::{Keyword, Token};
use crate::mapfile::model::{Symbol, SymbolCatalog, SymbolType, Symbolic};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const ROUTINE: &str = "parse_symbol";
const SYMBOLSET_ROUTINE: &str = "parse_symbol_set";

/// `SYMBOL ... END`
pub fn parse_symbol(ctx: &mut ParserContext<'_>) -> Result<Symbol> {
    let mut symbol = Symbol::default();
    read_block(ctx, ROUTINE, |ctx, keyword| {
        match keyword {
            Keyword::Antialias => symbol.antialias = ctx.read_true_false(ROUTINE)?,
            Keyword::Character => symbol.character = Some(ctx.read_string(ROUTINE)?),
            Keyword::Filled => symbol.filled = ctx.read_true_false(ROUTINE)?,
            Keyword::Font => symbol.font = Some(ctx.read_string(ROUTINE)?),
            Keyword::Gap => symbol.gap = ctx.read_int(ROUTINE)?,
            Keyword::Image => symbol.image = Some(ctx.read_string(ROUTINE)?),
            Keyword::Name => symbol.name = Some(ctx.read_string(ROUTINE)?),
            Keyword::Points => symbol.points = ctx.read_points(ROUTINE)?,
            Keyword::Style => symbol.style = read_dash_pattern(ctx)?,
            Keyword::Transparent => symbol.transparent = Some(ctx.read_int(ROUTINE)?),
            Keyword::Type => symbol.symbol_type = ctx.read_choice(ROUTINE, SymbolType::ALL)?,
            _ => return Ok(FieldOutcome::Unknown),
        }
        Ok(FieldOutcome::Applied)
    })?;
    Ok(symbol)
}

/// On/off lengths up to `END`.
fn read_dash_pattern(ctx: &mut ParserContext<'_>) -> Result<Vec<i32>> {
    let mut pattern = Vec::new();
    loop {
        match ctx.next()? {
            Token::Number(length) => push_checked(&mut pattern, length as i32, ROUTINE)?,
            Token::End => return Ok(pattern),
            Token::Eof => return Err(ctx.end_of_input(ROUTINE)),
            _ => return Err(ctx.unexpected(ROUTINE)),
        }
    }
}

/// A symbol-set file: `SYMBOLSET SYMBOL ... END ... END`.
///
/// Symbols are appended to `catalog` after the entries it already holds.
pub fn parse_symbol_set(ctx: &mut ParserContext<'_>, catalog: &mut SymbolCatalog) -> Result<()> {
    match ctx.next()? {
        Token::Keyword(Keyword::SymbolSet) => {}
        Token::Eof => return Err(ctx.end_of_input(SYMBOLSET_ROUTINE)),
        _ => return Err(ctx.unexpected(SYMBOLSET_ROUTINE)),
    }

    let limit = ctx.limits().max_symbols;
    loop {
        match ctx.next()? {
            Token::Keyword(Keyword::Symbol) => {
                let symbol = parse_symbol(ctx)?;
                catalog
                    .insert(symbol, limit, SYMBOLSET_ROUTINE)
                    .map_err(|err| err.at_line(ctx.line()))?;
            }
            Token::End => return Ok(()),
            Token::Eof => return Err(ctx.end_of_input(SYMBOLSET_ROUTINE)),
            _ => return Err(ctx.unexpected(SYMBOLSET_ROUTINE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::error::ErrorKind;
    use crate::mapfile::model::Point;
    use crate::mapfile::parser::context::ParserOptions;

    fn document(text: &str) -> ParserContext<'static> {
        ParserContext::document(text, ParserOptions::default())
    }

    #[test]
    fn test_vector_symbol() {
        let mut ctx = document(
            "NAME 'triangle' TYPE VECTOR FILLED TRUE POINTS 0 4 2 0 4 4 0 4 END END",
        );
        let symbol = parse_symbol(&mut ctx).unwrap();
        assert_eq!(symbol.name.as_deref(), Some("triangle"));
        assert_eq!(symbol.symbol_type, SymbolType::Vector);
        assert!(symbol.filled);
        assert_eq!(symbol.points.len(), 4);
        assert_eq!(symbol.points[1], Point::new(2.0, 0.0));
    }

    #[test]
    fn test_dash_pattern_and_pixmap() {
        let mut ctx = document("NAME 'dash' TYPE CARTOLINE STYLE 5 3 END GAP 2 END");
        let symbol = parse_symbol(&mut ctx).unwrap();
        assert_eq!(symbol.style, vec![5, 3]);
        assert_eq!(symbol.gap, 2);

        let mut ctx = document("TYPE PIXMAP IMAGE 'star.png' TRANSPARENT 0 END");
        let symbol = parse_symbol(&mut ctx).unwrap();
        assert_eq!(symbol.image.as_deref(), Some("star.png"));
        assert_eq!(symbol.transparent, Some(0));
    }

    #[test]
    fn test_symbol_set_appends_after_default() {
        let mut ctx = document(
            "SYMBOLSET\n SYMBOL NAME 'circle' TYPE ELLIPSE END\n SYMBOL NAME 'square' END\nEND",
        );
        let mut catalog = SymbolCatalog::default();
        parse_symbol_set(&mut ctx, &mut catalog).unwrap();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.index_of("square"), Some(2));
        assert!(!catalog.symbols[1].in_mapfile);
    }

    #[test]
    fn test_symbol_set_capacity() {
        let mut options = ParserOptions::default();
        options.limits.max_symbols = 2;
        let mut ctx = ParserContext::document(
            "SYMBOLSET SYMBOL NAME 'a' END\nSYMBOL NAME 'b' END END",
            options,
        );
        let err = parse_symbol_set(&mut ctx, &mut SymbolCatalog::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);
        assert_eq!(err.line, Some(2));
    }

    #[test]
    fn test_symbol_set_needs_header() {
        let mut ctx = document("SYMBOL NAME 'a' END");
        let err = parse_symbol_set(&mut ctx, &mut SymbolCatalog::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Identifier);
    }
}
