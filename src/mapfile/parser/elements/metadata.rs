use crate::mapfile::error::Result;
use crate::mapfile::lexer::Token;
use crate::mapfile::model::Metadata;
use crate::mapfile::parser::context::ParserContext;

const ROUTINE: &str = "parse_metadata";

/// `METADATA "key" "value" ... END`, added to `metadata`.
pub fn parse_metadata(ctx: &mut ParserContext<'_>, metadata: &mut Metadata) -> Result<()> {
    loop {
        match ctx.next()? {
            Token::Eof => return Err(ctx.end_of_input(ROUTINE)),
            Token::End => return Ok(()),
            Token::String(key) => {
                let value = ctx.read_string(ROUTINE)?;
                metadata.set(key, value);
            }
            _ => return Err(ctx.unexpected(ROUTINE)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::error::ErrorKind;
    use crate::mapfile::parser::context::ParserOptions;

    #[test]
    fn test_pairs_until_end() {
        let mut ctx = ParserContext::document(
            "'wms_title' 'Roads' \"wms_srs\" 'EPSG:4326' END",
            ParserOptions::default(),
        );
        let mut metadata = Metadata::new();
        parse_metadata(&mut ctx, &mut metadata).unwrap();
        assert_eq!(metadata.len(), 2);
        assert_eq!(metadata.get("WMS_TITLE"), Some("Roads"));
    }

    #[test]
    fn test_missing_value() {
        let mut ctx = ParserContext::document("'wms_title' END", ParserOptions::default());
        let err = parse_metadata(&mut ctx, &mut Metadata::new()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Symbol);
    }
}
