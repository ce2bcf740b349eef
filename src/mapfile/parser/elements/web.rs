use super::metadata::parse_metadata;
use super::{read_block, Routine};
use crate::mapfile::error::Result;
use crate::mapfile::lexer::{Keyword, Mode};
use crate::mapfile::model::Web;
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const ROUTINE: Routine = ("parse_web", "update_web");

/// `WEB ... END`, updating the map's web block in place.
pub fn parse_web(ctx: &mut ParserContext<'_>, web: &mut Web) -> Result<()> {
    let routine = ctx.routine(ROUTINE);
    read_block(ctx, routine, |ctx, keyword| match keyword {
        Keyword::Metadata => {
            parse_metadata(ctx, &mut web.metadata)?;
            Ok(FieldOutcome::Applied)
        }
        _ => apply_web_field(ctx, web, keyword),
    })
}

/// Apply one web keyword. `LOG` names a file the server appends to, so it is
/// read from documents only.
pub fn apply_web_field(ctx: &mut ParserContext<'_>, web: &mut Web, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    let template_slot = match keyword {
        Keyword::Empty => &mut web.empty,
        Keyword::Error => &mut web.error,
        Keyword::Footer => &mut web.footer,
        Keyword::Header => &mut web.header,
        Keyword::MaxTemplate => &mut web.max_template,
        Keyword::MinTemplate => &mut web.min_template,
        Keyword::Template => &mut web.template,
        Keyword::Extent => {
            web.extent = ctx.read_rect(routine)?;
            return Ok(FieldOutcome::Applied);
        }
        Keyword::ImagePath => {
            web.image_path = ctx.read_text(routine)?;
            return Ok(FieldOutcome::Applied);
        }
        Keyword::ImageUrl => {
            web.image_url = ctx.read_text(routine)?;
            return Ok(FieldOutcome::Applied);
        }
        Keyword::Log if ctx.mode() == Mode::Document => {
            web.log = Some(ctx.read_text(routine)?);
            return Ok(FieldOutcome::Applied);
        }
        Keyword::MaxScale => {
            web.max_scale = ctx.read_number(routine)?;
            return Ok(FieldOutcome::Applied);
        }
        Keyword::MinScale => {
            web.min_scale = ctx.read_number(routine)?;
            return Ok(FieldOutcome::Applied);
        }
        Keyword::QueryFormat => {
            web.query_format = ctx.read_text(routine)?;
            return Ok(FieldOutcome::Applied);
        }
        _ => return Ok(FieldOutcome::Unknown),
    };

    let value = ctx.read_text(routine)?;
    ctx.check_template(routine, &value)?;
    *template_slot = Some(value);
    Ok(FieldOutcome::Applied)
}
