use super::{read_block, Routine};
use crate::mapfile::error::Result;
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::Style;
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const ROUTINE: Routine = ("parse_style", "update_style");

/// `STYLE ... END`
pub fn parse_style(ctx: &mut ParserContext<'_>) -> Result<Style> {
    let mut style = Style::default();
    let routine = ctx.routine(ROUTINE);
    read_block(ctx, routine, |ctx, keyword| apply_style_field(ctx, &mut style, keyword))?;
    Ok(style)
}

pub fn apply_style_field(ctx: &mut ParserContext<'_>, style: &mut Style, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    match keyword {
        Keyword::Antialias => style.antialias = ctx.read_true_false(routine)?,
        Keyword::BackgroundColor => style.background_color = ctx.read_color(routine)?,
        Keyword::Color => style.color = ctx.read_color(routine)?,
        Keyword::AlphaColor if ctx.capabilities().alpha_color => {
            style.color = ctx.read_color_with_alpha(routine)?
        }
        Keyword::MaxSize => style.max_size = ctx.read_int(routine)?,
        Keyword::MinSize => style.min_size = ctx.read_int(routine)?,
        Keyword::Offset => (style.offset_x, style.offset_y) = ctx.read_pair(routine)?,
        Keyword::OutlineColor => style.outline_color = ctx.read_color(routine)?,
        Keyword::Size => style.size = ctx.read_int(routine)?,
        Keyword::Symbol => (style.symbol, style.symbol_name) = ctx.read_symbol(routine)?,
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}
