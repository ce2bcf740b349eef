use crate::mapfile::error::Result;
use crate::mapfile::lexer::Token;
use crate::mapfile::model::Projection;
use crate::mapfile::parser::context::ParserContext;

const ROUTINE: &str = "parse_projection";

/// `PROJECTION "arg" ... END`.
///
/// A single argument holding a `+` definition is split like a proj string.
pub fn parse_projection(ctx: &mut ParserContext<'_>) -> Result<Projection> {
    let mut args = Vec::new();
    loop {
        match ctx.next()? {
            Token::Eof => return Err(ctx.end_of_input(ROUTINE)),
            Token::End => break,
            Token::String(arg) => args.push(arg),
            Token::Keyword(_) => args.push(ctx.text().to_string()),
            _ => return Err(ctx.unexpected(ROUTINE)),
        }
    }

    let max_args = ctx.limits().max_projection_args;
    let line = ctx.line();
    let projection = match args.as_slice() {
        [single] if single.contains('+') => Projection::from_definition(single, max_args),
        _ => {
            let projection = Projection::new(args);
            projection
                .check_arg_count(max_args, ROUTINE)
                .and_then(|_| projection.validate())
                .map(|_| projection)
        }
    };
    projection.map_err(|err| err.at_line(line))
}

/// A whole projection given as one value, `+proj=...` or comma separated.
pub fn read_projection_value(ctx: &mut ParserContext<'_>) -> Result<Projection> {
    let definition = ctx.take_rest();
    Projection::from_definition(&definition, ctx.limits().max_projection_args)
}
