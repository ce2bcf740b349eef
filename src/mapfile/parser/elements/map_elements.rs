//! Map elements drawn around the map image: legend, scalebar, query map and
//! reference map.

use super::label::parse_label;
use super::{read_block, Routine};
use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use crate::mapfile::lexer::{Keyword, Mode};
use crate::mapfile::model::{
    FontType, Label, Legend, OrAuto, Position, QueryMap, QueryMapStyle, ReferenceMap, Scalebar,
    Status, Symbolic, Units,
};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

pub(crate) const LEGEND_ROUTINE: Routine = ("parse_legend", "update_legend");
pub(crate) const SCALEBAR_ROUTINE: Routine = ("parse_scalebar", "update_scalebar");
const QUERYMAP_ROUTINE: Routine = ("parse_query_map", "update_query_map");
const REFERENCE_ROUTINE: Routine = ("parse_reference_map", "update_reference_map");

/// Legend labels are placed by the legend itself.
pub fn settle_legend_label(label: &mut Label) {
    label.angle = OrAuto::Fixed(0.0);
    label.position = Position::Xy;
}

/// Scalebar labels are never rotated and only bitmap fonts are drawn.
pub fn settle_scalebar_label(label: &mut Label, routine: &'static str) -> Result<()> {
    label.angle = OrAuto::Fixed(0.0);
    label.position = Position::Xy;
    if label.font_type != FontType::Bitmap {
        return Err(MapfileError::new(
            ErrorKind::Type,
            routine,
            "Scalebars only support bitmapped fonts.",
        ));
    }
    Ok(())
}

/// `LEGEND ... END`, updating the map's legend in place.
pub fn parse_legend(ctx: &mut ParserContext<'_>, legend: &mut Legend) -> Result<()> {
    let routine = ctx.routine(LEGEND_ROUTINE);
    read_block(ctx, routine, |ctx, keyword| match keyword {
        Keyword::Label => {
            legend.label = parse_label(ctx, legend.label.clone())?;
            settle_legend_label(&mut legend.label);
            Ok(FieldOutcome::Applied)
        }
        _ => apply_legend_field(ctx, legend, keyword),
    })?;
    legend.label.position = Position::Xy;
    Ok(())
}

pub fn apply_legend_field(ctx: &mut ParserContext<'_>, legend: &mut Legend, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(LEGEND_ROUTINE);
    match keyword {
        Keyword::ImageColor => legend.image_color = ctx.read_color(routine)?,
        Keyword::Interlace => legend.interlace = Some(ctx.read_on_off(routine)?),
        Keyword::KeySize => legend.key_size = ctx.read_pair(routine)?,
        Keyword::KeySpacing => legend.key_spacing = ctx.read_pair(routine)?,
        Keyword::OutlineColor => legend.outline_color = ctx.read_color(routine)?,
        Keyword::Position => legend.position = ctx.read_choice(routine, Position::ELEMENT)?,
        Keyword::PostLabelCache => legend.post_label_cache = ctx.read_true_false(routine)?,
        Keyword::Status => legend.status = ctx.read_choice(routine, Status::ELEMENT)?,
        Keyword::Template => {
            let template = ctx.read_text(routine)?;
            ctx.check_template(routine, &template)?;
            legend.template = Some(template);
        }
        Keyword::Transparent => legend.transparent = Some(ctx.read_on_off(routine)?),
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}

/// `SCALEBAR ... END`, updating the map's scalebar in place.
pub fn parse_scalebar(ctx: &mut ParserContext<'_>, scalebar: &mut Scalebar) -> Result<()> {
    let routine = ctx.routine(SCALEBAR_ROUTINE);
    read_block(ctx, routine, |ctx, keyword| match keyword {
        Keyword::Label => {
            scalebar.label = parse_label(ctx, scalebar.label.clone())?;
            let line = ctx.line();
            settle_scalebar_label(&mut scalebar.label, routine).map_err(|err| err.at_line(line))?;
            Ok(FieldOutcome::Applied)
        }
        _ => apply_scalebar_field(ctx, scalebar, keyword),
    })
}

pub fn apply_scalebar_field(ctx: &mut ParserContext<'_>, scalebar: &mut Scalebar, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(SCALEBAR_ROUTINE);
    match keyword {
        Keyword::BackgroundColor => scalebar.background_color = ctx.read_color(routine)?,
        Keyword::Color => scalebar.color = ctx.read_color(routine)?,
        Keyword::AlphaColor if ctx.capabilities().alpha_color => {
            scalebar.color = ctx.read_color_with_alpha(routine)?
        }
        Keyword::ImageColor => scalebar.image_color = ctx.read_color(routine)?,
        Keyword::Interlace => scalebar.interlace = Some(ctx.read_on_off(routine)?),
        Keyword::Intervals => scalebar.intervals = ctx.read_int(routine)?,
        Keyword::OutlineColor => scalebar.outline_color = ctx.read_color(routine)?,
        Keyword::Position => {
            // updates only offer the four corners
            let choices = match ctx.mode() {
                Mode::Document => Position::ELEMENT,
                Mode::SingleValue => &Position::ELEMENT[..4],
            };
            scalebar.position = ctx.read_choice(routine, choices)?;
        }
        Keyword::PostLabelCache => scalebar.post_label_cache = ctx.read_true_false(routine)?,
        Keyword::Size => scalebar.size = ctx.read_pair(routine)?,
        Keyword::Status => scalebar.status = ctx.read_choice(routine, Status::ELEMENT)?,
        Keyword::Style => scalebar.style = ctx.read_int(routine)?,
        Keyword::Transparent => scalebar.transparent = Some(ctx.read_on_off(routine)?),
        Keyword::Units => scalebar.units = ctx.read_choice(routine, Units::SCALEBAR)?,
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}

/// `QUERYMAP ... END`, updating the map's query map in place.
pub fn parse_query_map(ctx: &mut ParserContext<'_>, query_map: &mut QueryMap) -> Result<()> {
    let routine = ctx.routine(QUERYMAP_ROUTINE);
    read_block(ctx, routine, |ctx, keyword| apply_query_map_field(ctx, query_map, keyword))
}

pub fn apply_query_map_field(ctx: &mut ParserContext<'_>, query_map: &mut QueryMap, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(QUERYMAP_ROUTINE);
    match keyword {
        Keyword::Color => query_map.color = ctx.read_color(routine)?,
        Keyword::AlphaColor if ctx.capabilities().alpha_color => {
            query_map.color = ctx.read_color_with_alpha(routine)?
        }
        Keyword::Size => query_map.size = ctx.read_pair(routine)?,
        Keyword::Status => query_map.status = ctx.read_choice(routine, Status::ON_OFF)?,
        Keyword::Style => query_map.style = ctx.read_choice(routine, QueryMapStyle::ALL)?,
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}

/// `REFERENCE ... END`. An image and a non-zero size are required.
pub fn parse_reference_map(ctx: &mut ParserContext<'_>, reference: &mut ReferenceMap) -> Result<()> {
    let routine = ctx.routine(REFERENCE_ROUTINE);
    read_block(ctx, routine, |ctx, keyword| apply_reference_map_field(ctx, reference, keyword))?;

    if reference.image.is_none() {
        return Err(ctx.fail(ErrorKind::Misc, routine, "No image defined for the reference map."));
    }
    if reference.size.0 == 0 || reference.size.1 == 0 {
        return Err(ctx.fail(
            ErrorKind::Misc,
            routine,
            "No image size defined for the reference map.",
        ));
    }
    Ok(())
}

pub fn apply_reference_map_field(ctx: &mut ParserContext<'_>, reference: &mut ReferenceMap, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(REFERENCE_ROUTINE);
    match keyword {
        Keyword::Color => reference.color = ctx.read_color(routine)?,
        Keyword::AlphaColor if ctx.capabilities().alpha_color => {
            reference.color = ctx.read_color_with_alpha(routine)?
        }
        Keyword::Extent => reference.extent = ctx.read_rect(routine)?,
        Keyword::Image => reference.image = Some(ctx.read_text(routine)?),
        Keyword::Marker => (reference.marker, reference.marker_name) = ctx.read_symbol(routine)?,
        Keyword::MarkerSize => reference.marker_size = ctx.read_int(routine)?,
        Keyword::MaxBoxSize => reference.max_box_size = ctx.read_int(routine)?,
        Keyword::MinBoxSize => reference.min_box_size = ctx.read_int(routine)?,
        Keyword::OutlineColor => reference.outline_color = ctx.read_color(routine)?,
        Keyword::Size => reference.size = ctx.read_pair(routine)?,
        Keyword::Status => reference.status = ctx.read_choice(routine, Status::ON_OFF)?,
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::model::{Color, FontSize, LabelSize, Rect};
    use crate::mapfile::parser::context::ParserOptions;

    fn document(text: &str) -> ParserContext<'static> {
        ParserContext::document(text, ParserOptions::default())
    }

    #[test]
    fn test_legend_label_is_forced() {
        let mut legend = Legend::default();
        let mut ctx = document("STATUS EMBED POSITION UR LABEL ANGLE 45 POSITION UL SIZE SMALL END END");
        parse_legend(&mut ctx, &mut legend).unwrap();
        assert_eq!(legend.status, Status::Embed);
        assert_eq!(legend.position, Position::Ur);
        assert_eq!(legend.label.angle, OrAuto::Fixed(0.0));
        assert_eq!(legend.label.position, Position::Xy);
        assert_eq!(legend.label.size, LabelSize::Named(FontSize::Small));
    }

    #[test]
    fn test_scalebar_requires_bitmap_label() {
        let mut scalebar = Scalebar::default();
        let mut ctx = document("LABEL TYPE TRUETYPE END END");
        let err = parse_scalebar(&mut ctx, &mut scalebar).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
    }

    #[test]
    fn test_scalebar_fields() {
        let mut scalebar = Scalebar::default();
        let mut ctx = document("UNITS KILOMETERS INTERVALS 5 SIZE 300 4 TRANSPARENT ON END");
        parse_scalebar(&mut ctx, &mut scalebar).unwrap();
        assert_eq!(scalebar.units, Units::Kilometers);
        assert_eq!(scalebar.intervals, 5);
        assert_eq!(scalebar.size, (300, 4));
        assert_eq!(scalebar.transparent, Some(true));
    }

    #[test]
    fn test_scalebar_units_exclude_dd() {
        let mut ctx = document("UNITS DD END");
        let err = parse_scalebar(&mut ctx, &mut Scalebar::default()).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Symbol);
    }

    #[test]
    fn test_query_map() {
        let mut query_map = QueryMap::default();
        let mut ctx = document("STYLE SELECTED COLOR 0 0 255 STATUS ON END");
        parse_query_map(&mut ctx, &mut query_map).unwrap();
        assert_eq!(query_map.style, QueryMapStyle::Selected);
        assert_eq!(query_map.color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_reference_map() {
        let mut reference = ReferenceMap::default();
        let mut ctx = document(
            "IMAGE 'ref.png' SIZE 120 90 EXTENT 0 0 100 100 MARKER 'star' MARKERSIZE 8 END",
        );
        parse_reference_map(&mut ctx, &mut reference).unwrap();
        assert_eq!(reference.size, (120, 90));
        assert_eq!(reference.extent, Rect::new(0.0, 0.0, 100.0, 100.0));
        assert_eq!(reference.marker_name.as_deref(), Some("star"));
    }

    #[test]
    fn test_reference_map_requirements() {
        let mut ctx = document("SIZE 10 10 END");
        let err = parse_reference_map(&mut ctx, &mut ReferenceMap::default()).unwrap_err();
        assert!(err.message.contains("No image defined"));

        let mut ctx = document("IMAGE 'ref.png' END");
        let err = parse_reference_map(&mut ctx, &mut ReferenceMap::default()).unwrap_err();
        assert!(err.message.contains("No image size"));
    }
}
