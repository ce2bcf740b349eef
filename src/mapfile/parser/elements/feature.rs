use super::{read_block, Routine};
use crate::mapfile::error::{MapfileError, Result};
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::{Feature, Grid, ShapeType};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const FEATURE_ROUTINE: Routine = ("parse_feature", "update_feature");
const GRID_ROUTINE: &str = "parse_grid";

/// `FEATURE ... END`: one line per `POINTS` block, plus optional `TEXT`.
pub fn parse_feature(ctx: &mut ParserContext<'_>, shape_type: ShapeType) -> Result<Feature> {
    let routine = ctx.routine(FEATURE_ROUTINE);
    let mut feature = Feature::new(shape_type);
    read_block(ctx, routine, |ctx, keyword| {
        match keyword {
            Keyword::Points => add_line(ctx, &mut feature, routine)?,
            Keyword::Text => feature.text = Some(ctx.read_text(routine)?),
            _ => return Ok(FieldOutcome::Unknown),
        }
        Ok(FieldOutcome::Applied)
    })?;
    Ok(feature)
}

/// Read a point list and append it to `feature` as a new line.
pub fn add_line(ctx: &mut ParserContext<'_>, feature: &mut Feature, routine: &'static str) -> Result<()> {
    let points = ctx.read_points(routine)?;
    feature
        .lines
        .try_reserve(1)
        .map_err(|_| MapfileError::memory(routine))?;
    feature.lines.push(points);
    Ok(())
}

/// `GRID ... END`
pub fn parse_grid(ctx: &mut ParserContext<'_>) -> Result<Grid> {
    let mut grid = Grid::default();
    read_block(ctx, GRID_ROUTINE, |ctx, keyword| {
        let slot = match keyword {
            Keyword::LabelFormat => {
                grid.label_format = Some(ctx.read_string(GRID_ROUTINE)?);
                return Ok(FieldOutcome::Applied);
            }
            Keyword::MinArcs => &mut grid.min_arcs,
            Keyword::MaxArcs => &mut grid.max_arcs,
            Keyword::MinInterval => &mut grid.min_interval,
            Keyword::MaxInterval => &mut grid.max_interval,
            Keyword::MinSubdivide => &mut grid.min_subdivide,
            Keyword::MaxSubdivide => &mut grid.max_subdivide,
            _ => return Ok(FieldOutcome::Unknown),
        };
        *slot = ctx.read_number(GRID_ROUTINE)?;
        Ok(FieldOutcome::Applied)
    })?;
    Ok(grid)
}
