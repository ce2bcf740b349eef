use super::{read_block, Routine};
use crate::mapfile::error::{ErrorKind, Result};
use crate::mapfile::lexer::{Keyword, Token};
use crate::mapfile::model::{FontSize, FontType, Label, LabelSize, OrAuto, Position, Symbolic};
use crate::mapfile::parser::context::ParserContext;
use crate::mapfile::parser::readers::FieldOutcome;

const ROUTINE: Routine = ("parse_label", "update_label");

/// `LABEL ... END`, starting from `label`.
pub fn parse_label(ctx: &mut ParserContext<'_>, mut label: Label) -> Result<Label> {
    let routine = ctx.routine(ROUTINE);
    read_block(ctx, routine, |ctx, keyword| apply_label_field(ctx, &mut label, keyword))?;
    Ok(label)
}

pub fn apply_label_field(ctx: &mut ParserContext<'_>, label: &mut Label, keyword: Keyword) -> Result<FieldOutcome> {
    let routine = ctx.routine(ROUTINE);
    let truetype = ctx.capabilities().truetype_fonts;
    match keyword {
        Keyword::Angle => {
            label.angle = ctx.read_number_or_auto(routine)?;
        }
        Keyword::Antialias => label.antialias = ctx.read_true_false(routine)?,
        Keyword::BackgroundColor => label.background_color = ctx.read_color(routine)?,
        Keyword::BackgroundShadowColor => label.background_shadow_color = ctx.read_color(routine)?,
        Keyword::BackgroundShadowSize => label.background_shadow_size = ctx.read_pair(routine)?,
        Keyword::Buffer => label.buffer = ctx.read_int(routine)?,
        Keyword::AlphaColor if ctx.capabilities().alpha_color => {
            label.color = ctx.read_color_with_alpha(routine)?
        }
        Keyword::Color => label.color = ctx.read_color(routine)?,
        Keyword::Font if truetype => {
            let font = ctx.read_text(routine)?;
            if let Some(scope) = ctx.scope() {
                if !scope.fonts.contains(&font) {
                    return Err(ctx.fail(
                        ErrorKind::Identifier,
                        routine,
                        format!("Unknown font alias. ({})", font),
                    ));
                }
            }
            label.font = Some(font);
        }
        Keyword::Force => label.force = ctx.read_true_false(routine)?,
        Keyword::MaxSize => label.max_size = ctx.read_int(routine)?,
        Keyword::MinDistance => label.min_distance = ctx.read_int(routine)?,
        Keyword::MinFeatureSize => {
            label.min_feature_size = match ctx.read_number_or_auto(routine)? {
                OrAuto::Fixed(value) => OrAuto::Fixed(value as i32),
                OrAuto::Auto => OrAuto::Auto,
            }
        }
        Keyword::MinSize => label.min_size = ctx.read_int(routine)?,
        Keyword::Offset => label.offset = ctx.read_pair(routine)?,
        Keyword::OutlineColor => label.outline_color = ctx.read_color(routine)?,
        Keyword::Partials => label.partials = ctx.read_true_false(routine)?,
        Keyword::Position => label.position = ctx.read_choice(routine, Position::LABEL)?,
        Keyword::ShadowColor => label.shadow_color = ctx.read_color(routine)?,
        Keyword::ShadowSize => label.shadow_size = ctx.read_pair(routine)?,
        Keyword::Size => label.size = read_label_size(ctx, routine, truetype)?,
        Keyword::Type => {
            let choices: &[(Keyword, FontType)] = if truetype {
                FontType::ALL
            } else {
                &[(Keyword::Bitmap, FontType::Bitmap)]
            };
            label.font_type = ctx.read_choice(routine, choices)?;
        }
        Keyword::Wrap => label.wrap = Some(ctx.read_character(routine)?),
        _ => return Ok(FieldOutcome::Unknown),
    }
    Ok(FieldOutcome::Applied)
}

/// A bitmap size name, or a point size when truetype fonts are enabled.
fn read_label_size(ctx: &mut ParserContext<'_>, routine: &'static str, truetype: bool) -> Result<LabelSize> {
    match ctx.next()? {
        Token::Number(points) if truetype => Ok(LabelSize::Points(points as i32)),
        Token::Keyword(keyword) => FontSize::ALL
            .iter()
            .find(|(candidate, _)| *candidate == keyword)
            .map(|(_, size)| LabelSize::Named(*size))
            .ok_or_else(|| {
                ctx.fail(
                    ErrorKind::Symbol,
                    routine,
                    format!("Parsing error near ({})", ctx.text()),
                )
            }),
        Token::Eof => Err(ctx.end_of_input(routine)),
        _ => Err(ctx.fail(
            ErrorKind::Symbol,
            routine,
            format!("Parsing error near ({})", ctx.text()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::model::{Color, FontCatalog, SymbolCatalog};
    use crate::mapfile::parser::context::{ParserOptions, UpdateScope};

    fn parse_with(text: &str, options: ParserOptions) -> Result<Label> {
        let mut ctx = ParserContext::document(text, options);
        parse_label(&mut ctx, Label::default())
    }

    fn parse(text: &str) -> Result<Label> {
        parse_with(text, ParserOptions::default())
    }

    #[test]
    fn test_label_fields() {
        let label = parse(
            "TYPE TRUETYPE FONT 'arial' SIZE 10 ANGLE AUTO POSITION UR WRAP ' ' \
             COLOR 255 0 0 MINFEATURESIZE AUTO FORCE TRUE END",
        )
        .unwrap();
        assert_eq!(label.font_type, FontType::TrueType);
        assert_eq!(label.font.as_deref(), Some("arial"));
        assert_eq!(label.size, LabelSize::Points(10));
        assert!(label.angle.is_auto());
        assert_eq!(label.position, Position::Ur);
        assert_eq!(label.wrap, Some(' '));
        assert_eq!(label.color, Color::rgb(255, 0, 0));
        assert!(label.min_feature_size.is_auto());
        assert!(label.force);
    }

    #[test]
    fn test_named_size() {
        assert_eq!(
            parse("SIZE SMALL END").unwrap().size,
            LabelSize::Named(FontSize::Small)
        );
    }

    #[test]
    fn test_truetype_disabled() {
        let mut options = ParserOptions::default();
        options.capabilities.truetype_fonts = false;
        assert_eq!(
            parse_with("FONT 'arial' END", options).unwrap_err().kind,
            ErrorKind::Identifier
        );
        assert_eq!(
            parse_with("SIZE 10 END", options).unwrap_err().kind,
            ErrorKind::Symbol
        );
        assert_eq!(
            parse_with("TYPE TRUETYPE END", options).unwrap_err().kind,
            ErrorKind::Symbol
        );
    }

    #[test]
    fn test_unknown_font_in_update() {
        let symbols = SymbolCatalog::default();
        let mut fonts = FontCatalog::default();
        fonts.fonts.insert("arial".into(), "arial.ttf".into());
        let scope = UpdateScope {
            template_pattern: None,
            data_pattern: None,
            symbols: &symbols,
            fonts: &fonts,
        };
        let mut label = Label::default();

        let mut ctx = ParserContext::single_value("arial", ParserOptions::default(), scope);
        apply_label_field(&mut ctx, &mut label, Keyword::Font).unwrap();
        assert_eq!(label.font.as_deref(), Some("arial"));

        let mut ctx = ParserContext::single_value("comic", ParserOptions::default(), scope);
        assert!(apply_label_field(&mut ctx, &mut label, Keyword::Font).is_err());
        assert_eq!(label.font.as_deref(), Some("arial"));
    }
}
