use super::read_block;
use crate::mapfile::error::{ErrorKind, Result};
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::{ImageMode, OutputFormat, Renderer};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const ROUTINE: &str = "parse_output_format";

/// `OUTPUTFORMAT ... END`.
///
/// The driver's default format is built at `END`, then every field that was
/// given overrides it.
pub fn parse_output_format(ctx: &mut ParserContext<'_>) -> Result<OutputFormat> {
    let mut name = None;
    let mut mime_type = None;
    let mut driver = None;
    let mut extension = None;
    let mut image_mode = None;
    let mut transparent = None;
    let mut options = Vec::new();
    let max_options = ctx.limits().max_format_options;

    read_block(ctx, ROUTINE, |ctx, keyword| {
        match keyword {
            Keyword::Name => name = Some(ctx.read_word(ROUTINE)?),
            Keyword::MimeType => mime_type = Some(ctx.read_string(ROUTINE)?),
            Keyword::Driver => driver = Some(ctx.read_string(ROUTINE)?),
            Keyword::Extension => {
                let value = ctx.read_string(ROUTINE)?;
                extension = Some(value.strip_prefix('.').unwrap_or(&value).to_string());
            }
            Keyword::FormatOption => {
                let option = ctx.read_string(ROUTINE)?;
                if options.len() >= max_options {
                    return Err(ctx.fail(
                        ErrorKind::Capacity,
                        ROUTINE,
                        format!("Too many FORMATOPTIONs, only {} allowed.", max_options),
                    ));
                }
                options.push(option);
            }
            Keyword::ImageMode => {
                let value = ctx.read_word(ROUTINE)?;
                image_mode = Some(ImageMode::parse(&value).ok_or_else(|| {
                    ctx.fail(
                        ErrorKind::Identifier,
                        ROUTINE,
                        format!(
                            "Parsing error near ({}), expected PC256, RGB, RGBA, BYTE, INT16, or FLOAT32 for IMAGEMODE.",
                            value
                        ),
                    )
                })?);
            }
            Keyword::Transparent => transparent = Some(ctx.read_on_off(ROUTINE)?),
            _ => return Ok(FieldOutcome::Unknown),
        }
        Ok(FieldOutcome::Applied)
    })?;

    let Some(driver) = driver else {
        return Err(ctx.fail(
            ErrorKind::Misc,
            ROUTINE,
            format!("OUTPUTFORMAT clause lacks DRIVER keyword near ({})", ctx.text()),
        ));
    };
    let mut format = OutputFormat::from_driver(&driver).ok_or_else(|| {
        ctx.fail(
            ErrorKind::Misc,
            ROUTINE,
            format!(
                "OUTPUTFORMAT clause references driver {}, but this driver isn't configured.",
                driver
            ),
        )
    })?;

    if let Some(name) = name {
        format.name = name;
    }
    if let Some(transparent) = transparent {
        format.transparent = transparent;
    }
    if extension.is_some() {
        format.extension = extension;
    }
    if mime_type.is_some() {
        format.mime_type = mime_type;
    }
    if let Some(image_mode) = image_mode {
        format.image_mode = image_mode;
        if transparent.is_none() {
            match image_mode {
                ImageMode::Rgb => format.transparent = false,
                ImageMode::Rgba => format.transparent = true,
                _ => {}
            }
        }
        if image_mode.is_raw() {
            format.renderer = Renderer::RawData;
        }
    }
    format.options = options;
    format.in_mapfile = true;

    let line = ctx.line();
    format.validate().map_err(|err| err.at_line(line))?;
    Ok(format)
}
