//! The document root: `MAP ... END`
//!
//! Everything else in a document is reached from here. Catalog files, output
//! format defaults and symbol names are left for the resolver, since they may
//! be referenced before they are declared.

use super::map_elements::{parse_legend, parse_query_map, parse_reference_map, parse_scalebar};
use super::layer::parse_layer;
use super::outputformat::parse_output_format;
use super::projection::{parse_projection, read_projection_value};
use super::symbol::parse_symbol;
use super::web::parse_web;
use super::{read_block, Routine};
use crate::mapfile::error::{push_checked, ErrorKind, Result};
use crate::mapfile::lexer::{Keyword, Mode, Token};
use crate::mapfile::model::{MapDefinition, Status, Units};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;
use tracing::trace;

pub(crate) const ROUTINE: Routine = ("parse_map", "update_map");

/// Parse a whole document. It must open with `MAP`.
pub fn parse_map(ctx: &mut ParserContext<'_>) -> Result<MapDefinition> {
    let routine = ctx.routine(ROUTINE);
    match ctx.next()? {
        Token::Keyword(Keyword::Map) => {}
        Token::Eof => return Err(ctx.end_of_input(routine)),
        _ => return Err(ctx.unexpected(routine)),
    }

    let mut map = MapDefinition::new();
    let limits = ctx.limits();

    read_block(ctx, routine, |ctx, keyword| {
        match keyword {
            Keyword::Config => {
                let key = ctx.read_string(routine)?;
                let value = ctx.read_string(routine)?;
                map.set_config_option(&key, &value);
            }
            Keyword::LatLon => map.latlon = parse_projection(ctx)?,
            Keyword::Layer => {
                let index = map.layers.len();
                if index >= limits.max_layers {
                    return Err(ctx.fail(
                        ErrorKind::Capacity,
                        routine,
                        format!("Too many layers defined, only {} allowed.", limits.max_layers),
                    ));
                }
                let layer = parse_layer(ctx, index)?;
                trace!(index, name = ?layer.name, "parsed layer");
                map.insert_layer(layer, limits.max_layers)
                    .map_err(|err| err.at_line(ctx.line()))?;
            }
            Keyword::Legend => parse_legend(ctx, &mut map.legend)?,
            Keyword::OutputFormat => {
                let format = parse_output_format(ctx)?;
                push_checked(&mut map.output_formats, format, routine)?;
            }
            Keyword::Projection => map.projection = parse_projection(ctx)?,
            Keyword::QueryMap => parse_query_map(ctx, &mut map.query_map)?,
            Keyword::Reference => parse_reference_map(ctx, &mut map.reference)?,
            Keyword::Scalebar => parse_scalebar(ctx, &mut map.scalebar)?,
            Keyword::Symbol => {
                let mut symbol = parse_symbol(ctx)?;
                symbol.in_mapfile = true;
                map.symbol_set
                    .insert(symbol, limits.max_symbols, routine)
                    .map_err(|err| err.at_line(ctx.line()))?;
            }
            Keyword::Web => parse_web(ctx, &mut map.web)?,
            _ => return apply_map_field(ctx, &mut map, keyword),
        }
        Ok(FieldOutcome::Applied)
    })?;

    Ok(map)
}

/// Scalar fields of the map.
///
/// Paths, patterns, catalogs and the size ceiling are only read from a
/// document; a single value may not change them.
pub fn apply_map_field(ctx: &mut ParserContext<'_>, map: &mut MapDefinition, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    let document = ctx.mode() == Mode::Document;
    match keyword {
        Keyword::DataPattern if document => map.data_pattern = Some(ctx.read_string(routine)?),
        Keyword::Debug if document => map.debug = ctx.read_on_off(routine)?,
        Keyword::Extent => map.extent = ctx.read_rect(routine)?,
        Keyword::FontSet if document => map.font_set.filename = Some(ctx.read_string(routine)?),
        Keyword::ImageColor => map.image_color = ctx.read_color(routine)?,
        Keyword::ImageQuality => map.image_quality = Some(ctx.read_int(routine)?),
        Keyword::ImageType => map.image_type = Some(ctx.read_word(routine)?),
        Keyword::Interlace => map.interlace = Some(ctx.read_on_off(routine)?),
        Keyword::MaxSize if document => map.max_size = ctx.read_int(routine)?,
        Keyword::Name if document => map.name = ctx.read_string(routine)?,
        Keyword::Projection if !document => map.projection = read_projection_value(ctx)?,
        Keyword::Resolution => map.resolution = ctx.read_number(routine)?,
        Keyword::Scale if document => map.scale = ctx.read_number(routine)?,
        Keyword::ShapePath => map.shape_path = Some(ctx.read_text(routine)?),
        Keyword::Size => {
            let (width, height) = ctx.read_pair(routine)?;
            let allowed = 0..=map.max_size;
            if !document && !(allowed.contains(&width) && allowed.contains(&height)) {
                return Err(ctx.fail(ErrorKind::OutOfRange, routine, "Image size out of range."));
            }
            map.width = width;
            map.height = height;
        }
        Keyword::Status => map.status = ctx.read_choice(routine, Status::ON_OFF)?,
        Keyword::SymbolSet if document => map.symbol_set.filename = Some(ctx.read_string(routine)?),
        Keyword::TemplatePattern if document => map.template_pattern = Some(ctx.read_string(routine)?),
        Keyword::Transparent => map.transparent = Some(ctx.read_on_off(routine)?),
        Keyword::Units => map.units = ctx.read_choice(routine, Units::MAP)?,
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}
