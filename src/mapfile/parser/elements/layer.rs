use super::class::parse_class;
use super::feature::{parse_feature, parse_grid};
use super::join::parse_join;
use super::metadata::parse_metadata;
use super::projection::{parse_projection, read_projection_value};
use super::{read_block, Routine};
use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use crate::mapfile::lexer::{Keyword, Mode};
use crate::mapfile::model::{ConnectionType, Layer, LayerType, Status, Symbolic, Units};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

pub(crate) const ROUTINE: Routine = ("parse_layer", "update_layer");

/// `LAYER ... END`, stored at `index` in the map's layer list.
pub fn parse_layer(ctx: &mut ParserContext<'_>, index: usize) -> Result<Layer> {
    let mut layer = Layer::new(index);
    let routine = ctx.routine(ROUTINE);
    let limits = ctx.limits();

    read_block(ctx, routine, |ctx, keyword| {
        match keyword {
            Keyword::Class => {
                let mut class = parse_class(ctx, index)?;
                if class.class_type.is_none() {
                    class.class_type = layer.layer_type;
                }
                layer
                    .insert_class(class, None, limits.max_classes)
                    .map_err(|err| err.at_line(ctx.line()))?;
            }
            Keyword::Feature => {
                let Some(layer_type) = layer.layer_type else {
                    return Err(ctx.fail(
                        ErrorKind::Misc,
                        routine,
                        "Layer type must be set before defining inline features.",
                    ));
                };
                layer.connection_type = ConnectionType::Inline;
                let feature = parse_feature(ctx, layer_type.shape_type())?;
                layer
                    .features
                    .try_reserve(1)
                    .map_err(|_| MapfileError::memory(routine))?;
                layer.features.push(feature);
            }
            Keyword::Grid => {
                layer.connection_type = ConnectionType::Graticule;
                layer.grid = Some(parse_grid(ctx)?);
            }
            Keyword::Join => {
                if layer.joins.len() >= limits.max_joins {
                    return Err(ctx.fail(
                        ErrorKind::Capacity,
                        routine,
                        format!("Too many joins defined in layer, only {} allowed.", limits.max_joins),
                    ));
                }
                let join = parse_join(ctx)?;
                layer.joins.push(join);
            }
            Keyword::Metadata => parse_metadata(ctx, &mut layer.metadata)?,
            Keyword::Projection => layer.projection = parse_projection(ctx)?,
            _ => return apply_layer_field(ctx, &mut layer, keyword),
        }
        Ok(FieldOutcome::Applied)
    })?;

    let Some(layer_type) = layer.layer_type else {
        return Err(ctx.fail(ErrorKind::Misc, routine, "Layer type not set."));
    };
    for class in layer.classes.iter_mut().filter(|class| class.class_type.is_none()) {
        class.class_type = Some(layer_type);
    }
    Ok(layer)
}

/// An attribute item. In an update, `null` clears it.
fn read_item(ctx: &mut ParserContext<'_>, routine: &'static str) -> Result<Option<String>> {
    let item = ctx.read_text(routine)?;
    if ctx.mode() == Mode::SingleValue && item.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    Ok(Some(item))
}

pub fn apply_layer_field(ctx: &mut ParserContext<'_>, layer: &mut Layer, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    match keyword {
        Keyword::ClassItem => layer.class_item = Some(ctx.read_text(routine)?),
        Keyword::Connection => {
            let connection = ctx.read_text(routine)?;
            ctx.check_data(routine, &connection)?;
            layer.connection = Some(connection);
        }
        Keyword::ConnectionType => {
            layer.connection_type = ctx.read_choice(routine, ConnectionType::SELECTABLE)?
        }
        Keyword::Data => {
            let data = ctx.read_text(routine)?;
            ctx.check_data(routine, &data)?;
            layer.data = Some(data);
        }
        Keyword::Debug => layer.debug = ctx.read_on_off(routine)?,
        Keyword::Dump => layer.dump = ctx.read_true_false(routine)?,
        Keyword::Filter => layer.filter = Some(ctx.read_expression(routine)?),
        Keyword::FilterItem => layer.filter_item = Some(ctx.read_text(routine)?),
        Keyword::Footer => {
            let footer = ctx.read_text(routine)?;
            ctx.check_template(routine, &footer)?;
            layer.footer = Some(footer);
        }
        Keyword::Group => layer.group = Some(ctx.read_text(routine)?),
        Keyword::Header => {
            let header = ctx.read_text(routine)?;
            ctx.check_template(routine, &header)?;
            layer.header = Some(header);
        }
        Keyword::LabelAngleItem => layer.label_angle_item = read_item(ctx, routine)?,
        Keyword::LabelCache => layer.label_cache = ctx.read_on_off(routine)?,
        Keyword::LabelItem => layer.label_item = read_item(ctx, routine)?,
        Keyword::LabelMaxScale => layer.label_max_scale = ctx.read_number(routine)?,
        Keyword::LabelMinScale => layer.label_min_scale = ctx.read_number(routine)?,
        Keyword::LabelRequires => layer.label_requires = Some(ctx.read_text(routine)?),
        Keyword::LabelSizeItem => layer.label_size_item = read_item(ctx, routine)?,
        Keyword::MaxFeatures => layer.max_features = ctx.read_int(routine)?,
        Keyword::MaxScale => layer.max_scale = ctx.read_number(routine)?,
        Keyword::MinScale => layer.min_scale = ctx.read_number(routine)?,
        Keyword::Name => layer.name = Some(ctx.read_text(routine)?),
        Keyword::Offsite => layer.offsite = ctx.read_color(routine)?,
        Keyword::PostLabelCache => {
            layer.post_label_cache = ctx.read_true_false(routine)?;
            if layer.post_label_cache {
                layer.label_cache = false;
            }
        }
        Keyword::Processing => apply_processing(ctx, layer, routine)?,
        Keyword::Projection if ctx.mode() == Mode::SingleValue => {
            layer.projection = read_projection_value(ctx)?
        }
        Keyword::Requires => layer.requires = Some(ctx.read_text(routine)?),
        Keyword::SizeUnits => layer.size_units = ctx.read_choice(routine, Units::ALL)?,
        Keyword::Status => layer.status = ctx.read_choice(routine, Status::LAYER)?,
        Keyword::StyleItem => layer.style_item = Some(ctx.read_text(routine)?),
        Keyword::SymbolScale => layer.symbol_scale = ctx.read_number(routine)?,
        Keyword::Template => {
            let template = ctx.read_text(routine)?;
            ctx.check_template(routine, &template)?;
            layer.template = Some(template);
        }
        Keyword::TileIndex => {
            let tile_index = ctx.read_text(routine)?;
            ctx.check_data(routine, &tile_index)?;
            layer.tile_index = Some(tile_index);
        }
        Keyword::TileItem => layer.tile_item = Some(ctx.read_text(routine)?),
        Keyword::Tolerance => layer.tolerance = ctx.read_number(routine)?,
        Keyword::ToleranceUnits => layer.tolerance_units = ctx.read_choice(routine, Units::ALL)?,
        Keyword::Transform => layer.transform = ctx.read_true_false(routine)?,
        Keyword::Transparency => layer.transparency = ctx.read_int(routine)?,
        Keyword::Type => layer.layer_type = Some(ctx.read_choice(routine, LayerType::ALL)?),
        Keyword::Units => layer.units = ctx.read_choice(routine, Units::ALL)?,
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}

/// A document appends every directive. An update may only set `BANDS`,
/// replacing an existing directive with the same key.
fn apply_processing(ctx: &mut ParserContext<'_>, layer: &mut Layer, routine: &'static str) -> Result<()> {
    let directive = ctx.read_text(routine)?;
    match ctx.mode() {
        Mode::Document => {
            layer
                .processing
                .try_reserve(1)
                .map_err(|_| MapfileError::memory(routine))?;
            layer.processing.push(directive);
        }
        Mode::SingleValue => {
            let is_bands = directive
                .get(..5)
                .map(|prefix| prefix.eq_ignore_ascii_case("bands"))
                .unwrap_or(false);
            if !is_bands {
                return Err(MapfileError::validation(
                    routine,
                    format!("Only BANDS processing directives can be changed ({}).", directive),
                ));
            }
            layer.set_processing(&directive);
        }
    }
    Ok(())
}
