use super::label::parse_label;
use super::metadata::parse_metadata;
use super::style::{apply_style_field, parse_style};
use super::{read_block, Routine};
use crate::mapfile::error::{ErrorKind, Result};
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::{Class, ExpressionKind, Label, LayerType, Status};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

pub(crate) const ROUTINE: Routine = ("parse_class", "update_class");

/// Class-level keywords that stand for a field of style 0 or style 1.
fn style_shortcut(keyword: Keyword) -> Option<(usize, Keyword)> {
    let shortcut = match keyword {
        Keyword::BackgroundColor => (0, Keyword::BackgroundColor),
        Keyword::Color => (0, Keyword::Color),
        Keyword::AlphaColor => (0, Keyword::AlphaColor),
        Keyword::MaxSize => (0, Keyword::MaxSize),
        Keyword::MinSize => (0, Keyword::MinSize),
        Keyword::OutlineColor => (0, Keyword::OutlineColor),
        Keyword::Size => (0, Keyword::Size),
        Keyword::Symbol => (0, Keyword::Symbol),
        Keyword::OverlayBackgroundColor => (1, Keyword::BackgroundColor),
        Keyword::OverlayColor => (1, Keyword::Color),
        Keyword::OverlayMaxSize => (1, Keyword::MaxSize),
        Keyword::OverlayMinSize => (1, Keyword::MinSize),
        Keyword::OverlayOutlineColor => (1, Keyword::OutlineColor),
        Keyword::OverlaySize => (1, Keyword::Size),
        Keyword::OverlaySymbol => (1, Keyword::Symbol),
        _ => return None,
    };
    Some(shortcut)
}

/// `CLASS ... END` of the layer at `layer`.
pub fn parse_class(ctx: &mut ParserContext<'_>, layer: usize) -> Result<Class> {
    let mut class = Class::new(layer);
    let routine = ctx.routine(ROUTINE);
    let max_styles = ctx.limits().max_styles;

    read_block(ctx, routine, |ctx, keyword| {
        match keyword {
            Keyword::Label => class.label = Some(parse_label(ctx, Label::default())?),
            Keyword::Style => {
                let style = parse_style(ctx)?;
                class
                    .push_style(style, max_styles, routine)
                    .map_err(|err| err.at_line(ctx.line()))?;
            }
            Keyword::Metadata => parse_metadata(ctx, &mut class.metadata)?,
            _ => return apply_class_field(ctx, &mut class, keyword),
        }
        Ok(FieldOutcome::Applied)
    })?;

    Ok(class)
}

pub fn apply_class_field(ctx: &mut ParserContext<'_>, class: &mut Class, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    match keyword {
        Keyword::Debug => class.debug = ctx.read_on_off(routine)?,
        Keyword::Expression => class.expression = Some(ctx.read_expression(routine)?),
        Keyword::KeyImage => class.keyimage = Some(ctx.read_text(routine)?),
        Keyword::MaxScale => class.max_scale = ctx.read_number(routine)?,
        Keyword::MinScale => class.min_scale = ctx.read_number(routine)?,
        Keyword::Name => class.name = Some(ctx.read_text(routine)?),
        Keyword::Status => class.status = ctx.read_choice(routine, Status::ON_OFF)?,
        Keyword::Template => {
            let template = ctx.read_text(routine)?;
            ctx.check_template(routine, &template)?;
            class.template = Some(template);
        }
        Keyword::Text => {
            let text = ctx.read_expression(routine)?;
            if text.kind == ExpressionKind::Regex {
                return Err(ctx.fail(
                    ErrorKind::Misc,
                    routine,
                    "Text expressions support constant or replacement strings.",
                ));
            }
            class.text = Some(text);
        }
        Keyword::Title => class.title = Some(ctx.read_text(routine)?),
        Keyword::Type => class.class_type = Some(ctx.read_choice(routine, LayerType::CLASS)?),
        _ => match style_shortcut(keyword) {
            Some((index, style_keyword)) if ctx.capabilities().legacy_style_shortcuts => {
                let max_styles = ctx.limits().max_styles;
                let line = ctx.line();
                let style = class
                    .style_at(index, max_styles, routine)
                    .map_err(|err| err.at_line(line))?;
                return apply_style_field(ctx, style, style_keyword);
            }
            _ => return Ok(FieldOutcome::Unknown),
        },
    }
    Ok(FieldOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::model::{Color, Expression, Style};
    use crate::mapfile::parser::context::ParserOptions;

    fn parse_with(text: &str, options: ParserOptions) -> Result<Class> {
        let mut ctx = ParserContext::document(text, options);
        parse_class(&mut ctx, 0)
    }

    fn parse(text: &str) -> Result<Class> {
        parse_with(text, ParserOptions::default())
    }

    #[test]
    fn test_color_shortcut_creates_one_style() {
        let class = parse("COLOR 255 0 0 END").unwrap();
        assert_eq!(class.styles.len(), 1);
        assert_eq!(class.styles[0].color, Color::rgb(255, 0, 0));
        assert_eq!(class.styles[0].size, Style::default().size);
    }

    #[test]
    fn test_overlay_shortcut_creates_second_style() {
        let class = parse("COLOR 255 0 0 OVERLAYCOLOR 0 0 255 OVERLAYSIZE 3 END").unwrap();
        assert_eq!(class.styles.len(), 2);
        assert_eq!(class.styles[1].color, Color::rgb(0, 0, 255));
        assert_eq!(class.styles[1].size, 3);
    }

    #[test]
    fn test_style_block_follows_shortcut() {
        let class = parse("COLOR 1 1 1 STYLE COLOR 2 2 2 END END").unwrap();
        assert_eq!(class.styles.len(), 2);
        assert_eq!(class.styles[1].color, Color::rgb(2, 2, 2));
    }

    #[test]
    fn test_shortcuts_can_be_disabled() {
        let mut options = ParserOptions::default();
        options.capabilities.legacy_style_shortcuts = false;
        let err = parse_with("COLOR 1 1 1 END", options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Identifier);
    }

    #[test]
    fn test_style_capacity() {
        let mut options = ParserOptions::default();
        options.limits.max_styles = 2;
        let err = parse_with("STYLE END STYLE END STYLE END END", options).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);
        assert_eq!(err.line, Some(1));
    }

    #[test]
    fn test_class_fields() {
        let class = parse(
            "NAME 'Highways' EXPRESSION ([TYPE] = 1) TEXT ([NAME]) TYPE LINE \
             LABEL COLOR 0 0 0 END METADATA 'key' 'value' END END",
        )
        .unwrap();
        assert_eq!(class.name.as_deref(), Some("Highways"));
        assert_eq!(class.expression, Some(Expression::expression("[TYPE] = 1")));
        assert_eq!(class.text, Some(Expression::expression("[NAME]")));
        assert_eq!(class.class_type, Some(LayerType::Line));
        assert!(class.label.is_some());
        assert_eq!(class.metadata.get("key"), Some("value"));
        assert!(class.styles.is_empty());
    }

    #[test]
    fn test_text_rejects_regex() {
        let err = parse("TEXT /abc/ END").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Misc);
    }

    #[test]
    fn test_query_is_not_a_class_type() {
        assert_eq!(parse("TYPE QUERY END").unwrap_err().kind, ErrorKind::Symbol);
    }
}
