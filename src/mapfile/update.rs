//! Partial-update engine
//!
//! Applies one `(path, value)` request to a loaded map. The path picks the
//! target (`MAP LAYER 0 CLASS 1 COLOR`, `MAP WEB TEMPLATE`, ...), the value is
//! lexed on its own in single-value mode and handed to the same field
//! dispatcher the document parser uses.
//!
//! A request either changes exactly one field or leaves the map untouched:
//! the update runs on a copy that replaces the map only once the field was
//! applied. Unknown paths and out-of-range indexes are reported as ignored;
//! a value that does not parse, or that a security pattern refuses, is an
//! error for that request only.

use crate::mapfile::error::{Result, UpdateOutcome, UpdateReport};
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::{Class, ConnectionType, Feature, Layer, LayerType, MapDefinition, ShapeType};
use crate::mapfile::parser::elements::class::apply_class_field;
use crate::mapfile::parser::elements::map_elements::{
    apply_legend_field, apply_query_map_field, apply_reference_map_field, apply_scalebar_field,
    settle_legend_label, settle_scalebar_label,
};
use crate::mapfile::parser::elements::feature::add_line;
use crate::mapfile::parser::elements::label::apply_label_field;
use crate::mapfile::parser::elements::layer::apply_layer_field;
use crate::mapfile::parser::elements::map::apply_map_field;
use crate::mapfile::parser::elements::style::apply_style_field;
use crate::mapfile::parser::elements::web::apply_web_field;
use crate::mapfile::parser::{acquire_parse_lock, FieldOutcome, ParserContext, ParserOptions, UpdateScope};
use crate::mapfile::resolve::setup_output_formats;
use tracing::{debug, warn};

const FEATURE_ROUTINE: &str = "update_feature";

/// One element of an object path.
#[derive(Debug, Clone, PartialEq)]
struct Segment {
    text: String,
    /// Quoted segments are never keywords.
    keyword: Option<Keyword>,
}

impl Segment {
    fn index(&self) -> Option<usize> {
        self.text.parse().ok()
    }
}

/// Split a path on whitespace, `.` and `_`. Quoted text is one segment.
fn split_path(path: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut chars = path.chars();

    let flush = |current: &mut String, segments: &mut Vec<Segment>| {
        if !current.is_empty() {
            let text = std::mem::take(current);
            segments.push(Segment {
                keyword: Keyword::lookup(&text),
                text,
            });
        }
    };

    while let Some(ch) = chars.next() {
        match ch {
            '"' | '\'' => {
                flush(&mut current, &mut segments);
                let quoted: String = chars.by_ref().take_while(|&c| c != ch).collect();
                segments.push(Segment {
                    text: quoted,
                    keyword: None,
                });
            }
            '.' | '_' => flush(&mut current, &mut segments),
            ch if ch.is_whitespace() => flush(&mut current, &mut segments),
            ch => current.push(ch),
        }
    }
    flush(&mut current, &mut segments);
    segments
}

struct PathCursor {
    segments: Vec<Segment>,
    position: usize,
}

impl PathCursor {
    fn new(path: &str) -> Self {
        Self {
            segments: split_path(path),
            position: 0,
        }
    }

    fn peek(&self) -> Option<&Segment> {
        self.segments.get(self.position)
    }

    fn next(&mut self) -> Option<Segment> {
        let segment = self.segments.get(self.position).cloned();
        self.position += 1;
        segment
    }

    fn next_keyword(&mut self) -> Option<Keyword> {
        self.next().and_then(|segment| segment.keyword)
    }
}

fn ignored(reason: impl Into<String>) -> Result<UpdateOutcome> {
    Ok(UpdateOutcome::Ignored(reason.into()))
}

/// What values are checked against while updating `map`.
fn scope_of(map: &MapDefinition) -> UpdateScope<'_> {
    UpdateScope {
        template_pattern: map.template_pattern.as_deref(),
        data_pattern: map.data_pattern.as_deref(),
        symbols: &map.symbol_set,
        fonts: &map.font_set,
    }
}

/// Lex `value` and apply it to one field of `target`.
fn apply_field<T, F>(
    original: &MapDefinition,
    target: &mut T,
    keyword: Keyword,
    value: &str,
    options: ParserOptions,
    apply: F,
) -> Result<UpdateOutcome>
where
    F: FnOnce(&mut ParserContext<'_>, &mut T, Keyword) -> Result<FieldOutcome>,
{
    let mut ctx = ParserContext::single_value(value, options, scope_of(original));
    match apply(&mut ctx, target, keyword)? {
        FieldOutcome::Applied => Ok(UpdateOutcome::Applied),
        FieldOutcome::Unknown => ignored(format!("{} cannot be updated here", keyword)),
    }
}

/// Apply one request. The map changes only when the result is
/// [`UpdateOutcome::Applied`].
pub fn apply_update(map: &mut MapDefinition, path: &str, value: &str, options: ParserOptions) -> Result<UpdateOutcome> {
    let _guard = acquire_parse_lock();
    let outcome = update_locked(map, path, value, options);
    match &outcome {
        Ok(UpdateOutcome::Applied) => debug!(path, value, "applied update"),
        Ok(UpdateOutcome::Ignored(reason)) => warn!(path, reason = %reason, "ignored update"),
        Err(err) => warn!(path, error = %err, "update failed"),
    }
    outcome
}

/// Apply a batch of requests in order. A failed request never stops the
/// batch.
pub fn apply_updates<I, P, V>(map: &mut MapDefinition, updates: I, options: ParserOptions) -> UpdateReport
where
    I: IntoIterator<Item = (P, V)>,
    P: AsRef<str>,
    V: AsRef<str>,
{
    let mut report = UpdateReport::new();
    for (path, value) in updates {
        let (path, value) = (path.as_ref(), value.as_ref());
        let result = apply_update(map, path, value, options);
        report.record(path, value, result);
    }
    report
}

fn update_locked(map: &mut MapDefinition, path: &str, value: &str, options: ParserOptions) -> Result<UpdateOutcome> {
    let mut path = PathCursor::new(path);
    if path.next_keyword() != Some(Keyword::Map) {
        return ignored("object paths start with MAP");
    }

    let mut updated = map.clone();
    let outcome = update_map(&mut updated, map, &mut path, value, options)?;
    if outcome == UpdateOutcome::Applied {
        *map = updated;
    }
    Ok(outcome)
}

fn update_map(
    updated: &mut MapDefinition,
    original: &MapDefinition,
    path: &mut PathCursor,
    value: &str,
    options: ParserOptions,
) -> Result<UpdateOutcome> {
    let Some(segment) = path.next() else {
        return ignored("no field after MAP");
    };
    let Some(keyword) = segment.keyword else {
        // a bare name addresses a layer
        return match original.layer_index(&segment.text) {
            Some(index) => update_layer(&mut updated.layers[index], original, path, value, options),
            None => ignored(format!("no layer named {}", segment.text)),
        };
    };

    match keyword {
        Keyword::Config => match path.next() {
            Some(key) => {
                updated.set_config_option(&key.text, value);
                Ok(UpdateOutcome::Applied)
            }
            None => ignored("CONFIG needs a key"),
        },
        Keyword::Layer => {
            let Some(target) = path.next() else {
                return ignored("LAYER needs an index or a name");
            };
            let index = target.index().or_else(|| original.layer_index(&target.text));
            match index.filter(|&index| index < updated.layers.len()) {
                Some(index) => update_layer(&mut updated.layers[index], original, path, value, options),
                None => ignored(format!("no layer {}", target.text)),
            }
        }
        Keyword::Legend => match path.next_keyword() {
            Some(Keyword::Label) => {
                let Some(field) = path.next_keyword() else {
                    return ignored("LEGEND LABEL needs a field");
                };
                let outcome = apply_field(original, &mut updated.legend.label, field, value, options, apply_label_field)?;
                settle_legend_label(&mut updated.legend.label);
                Ok(outcome)
            }
            Some(field) => apply_field(original, &mut updated.legend, field, value, options, apply_legend_field),
            None => ignored("LEGEND needs a field"),
        },
        Keyword::Scalebar => match path.next_keyword() {
            Some(Keyword::Label) => {
                let Some(field) = path.next_keyword() else {
                    return ignored("SCALEBAR LABEL needs a field");
                };
                let outcome =
                    apply_field(original, &mut updated.scalebar.label, field, value, options, apply_label_field)?;
                settle_scalebar_label(&mut updated.scalebar.label, "update_scalebar")?;
                Ok(outcome)
            }
            Some(field) => apply_field(original, &mut updated.scalebar, field, value, options, apply_scalebar_field),
            None => ignored("SCALEBAR needs a field"),
        },
        Keyword::QueryMap => match path.next_keyword() {
            Some(field) => apply_field(original, &mut updated.query_map, field, value, options, apply_query_map_field),
            None => ignored("QUERYMAP needs a field"),
        },
        Keyword::Reference => match path.next_keyword() {
            Some(field) => apply_field(original, &mut updated.reference, field, value, options, apply_reference_map_field),
            None => ignored("REFERENCE needs a field"),
        },
        Keyword::Web => match path.next_keyword() {
            Some(field) => apply_field(original, &mut updated.web, field, value, options, apply_web_field),
            None => ignored("WEB needs a field"),
        },
        Keyword::MaxSize => ignored("MAXSIZE cannot be changed"),
        _ => {
            let outcome = apply_field(original, updated, keyword, value, options, apply_map_field)?;
            let format_field = matches!(
                keyword,
                Keyword::ImageType | Keyword::ImageQuality | Keyword::Interlace | Keyword::Transparent
            );
            if outcome == UpdateOutcome::Applied && format_field {
                setup_output_formats(updated)?;
            }
            Ok(outcome)
        }
    }
}

fn update_layer(
    layer: &mut Layer,
    original: &MapDefinition,
    path: &mut PathCursor,
    value: &str,
    options: ParserOptions,
) -> Result<UpdateOutcome> {
    match path.next_keyword() {
        Some(Keyword::Class) => {
            let Some(index) = select_class(layer, path) else {
                return ignored("no such class");
            };
            update_class(&mut layer.classes[index], original, path, value, options)
        }
        Some(Keyword::Feature) => update_feature(layer, original, path, value, options),
        Some(field) => apply_field(original, layer, field, value, options, apply_layer_field),
        None => ignored("LAYER needs a field"),
    }
}

/// A class by index or by name; a layer with one class needs neither.
///
/// With duplicate names the first match wins.
fn select_class(layer: &Layer, path: &mut PathCursor) -> Option<usize> {
    let selector = match path.peek() {
        Some(segment) if segment.keyword.is_none() => path.next(),
        _ => None,
    };
    let index = match selector {
        Some(segment) => segment.index().or_else(|| layer.class_by_name(&segment.text))?,
        None if layer.classes.len() == 1 => 0,
        None => return None,
    };
    (index < layer.classes.len()).then_some(index)
}

fn update_class(
    class: &mut Class,
    original: &MapDefinition,
    path: &mut PathCursor,
    value: &str,
    options: ParserOptions,
) -> Result<UpdateOutcome> {
    match path.next_keyword() {
        Some(Keyword::Label) => match path.next_keyword() {
            Some(field) => apply_field(original, class.label_mut(), field, value, options, apply_label_field),
            None => ignored("LABEL needs a field"),
        },
        Some(Keyword::Style) => {
            let index = path.next().and_then(|segment| segment.index());
            let Some(style) = index.and_then(|index| class.styles.get_mut(index)) else {
                return ignored("no such style");
            };
            match path.next_keyword() {
                Some(field) => apply_field(original, style, field, value, options, apply_style_field),
                None => ignored("STYLE needs a field"),
            }
        }
        Some(field) => apply_field(original, class, field, value, options, apply_class_field),
        None => ignored("CLASS needs a field"),
    }
}

/// `FEATURE POINTS` adds a line to the last feature, `FEATURE TEXT` sets its
/// text and anything else starts a new feature.
fn update_feature(
    layer: &mut Layer,
    original: &MapDefinition,
    path: &mut PathCursor,
    value: &str,
    options: ParserOptions,
) -> Result<UpdateOutcome> {
    let shape_type = layer
        .layer_type
        .map(LayerType::shape_type)
        .unwrap_or(ShapeType::Point);
    let field = path.next_keyword();
    if !matches!(field, Some(Keyword::Points | Keyword::Text)) || layer.features.is_empty() {
        layer.features.push(Feature::new(shape_type));
    }
    layer.connection_type = ConnectionType::Inline;

    let mut ctx = ParserContext::single_value(value, options, scope_of(original));
    if let Some(feature) = layer.features.last_mut() {
        match field {
            Some(Keyword::Points) => add_line(&mut ctx, feature, FEATURE_ROUTINE)?,
            Some(Keyword::Text) => feature.text = Some(ctx.read_text(FEATURE_ROUTINE)?),
            _ => {}
        }
    }
    Ok(UpdateOutcome::Applied)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapfile::error::ErrorKind;
    use crate::mapfile::model::{Color, Expression, Position, Projection};
    use crate::mapfile::parser::parse_document;
    use crate::mapfile::resolve::resolve_map;
    use crate::mapfile::serializer::write_map;
    use rstest::rstest;

    const DOCUMENT: &str = r#"
MAP
  NAME "updates"
  SIZE 400 300
  SYMBOL NAME "circle" TYPE ELLIPSE END
  LAYER NAME "water" TYPE POLYGON
    CLASS NAME "lakes" COLOR 0 0 255 END
  END
  LAYER NAME "roads" TYPE LINE
    CLASS NAME "major" EXPRESSION ([TYPE] = 1) STYLE COLOR 255 0 0 END END
    CLASS NAME "minor" STYLE COLOR 128 128 128 END END
  END
  LAYER NAME "towns" TYPE POINT
    LABELITEM "NAME"
    CLASS NAME "town" STYLE SYMBOL "circle" SIZE 4 END LABEL COLOR 0 0 0 END END
  END
END
"#;

    fn load() -> MapDefinition {
        let options = ParserOptions::default();
        let mut map = parse_document(DOCUMENT, options).unwrap();
        resolve_map(&mut map, options).unwrap();
        map
    }

    fn update(map: &mut MapDefinition, path: &str, value: &str) -> Result<UpdateOutcome> {
        apply_update(map, path, value, ParserOptions::default())
    }

    #[test]
    fn test_split_path() {
        let segments = split_path("map.layer_0 \"my roads\"  CLASS");
        let texts: Vec<&str> = segments.iter().map(|s| s.text.as_str()).collect();
        assert_eq!(texts, vec!["map", "layer", "0", "my roads", "CLASS"]);
        assert_eq!(segments[0].keyword, Some(Keyword::Map));
        assert_eq!(segments[2].keyword, None);
        assert_eq!(segments[3].keyword, None);
    }

    #[test]
    fn test_layer_name_update_is_isolated() {
        let mut map = load();
        let before = map.clone();
        assert_eq!(update(&mut map, "map layer 2 name", "cities"), Ok(UpdateOutcome::Applied));

        assert_eq!(map.layers[2].name.as_deref(), Some("cities"));
        let mut restored = map.clone();
        restored.layers[2].name = before.layers[2].name.clone();
        assert_eq!(restored, before);
    }

    #[rstest]
    #[case("map layer roads status", "ON")]
    #[case("map roads status", "ON")]
    #[case("map.layer.1.status", "on")]
    #[case("map_layer_1_status", "ON")]
    fn test_layer_addressing(#[case] path: &str, #[case] value: &str) {
        let mut map = load();
        assert_eq!(update(&mut map, path, value), Ok(UpdateOutcome::Applied));
        assert_eq!(map.layers[1].status, crate::mapfile::model::Status::On);
    }

    #[rstest]
    #[case("map layer 7 name")]
    #[case("map layer nowhere name")]
    #[case("map layer 0 bogus")]
    #[case("layer 0 name")]
    #[case("map maxsize")]
    #[case("map layer 1 class color")]
    #[case("map layer 1 class 5 color")]
    fn test_ignored_paths_leave_map_unchanged(#[case] path: &str) {
        let mut map = load();
        let before = map.clone();
        let outcome = update(&mut map, path, "4096").unwrap();
        assert!(matches!(outcome, UpdateOutcome::Ignored(_)));
        assert_eq!(map, before);
    }

    #[test]
    fn test_class_selection() {
        let mut map = load();
        update(&mut map, "map layer water class color", "1 2 3").unwrap();
        assert_eq!(map.layers[0].classes[0].styles[0].color, Color::rgb(1, 2, 3));

        update(&mut map, "map layer roads class minor color", "4 5 6").unwrap();
        assert_eq!(map.layers[1].classes[1].styles[0].color, Color::rgb(4, 5, 6));

        update(&mut map, "map layer roads class 0 expression", "/^A/").unwrap();
        assert_eq!(map.layers[1].classes[0].expression, Some(Expression::regex("^A")));

        update(&mut map, "map layer roads class 0 style 0 size", "3").unwrap();
        assert_eq!(map.layers[1].classes[0].styles[0].size, 3);
    }

    #[test]
    fn test_bad_value_is_scoped_to_the_request() {
        let mut map = load();
        let before = map.clone();
        let err = update(&mut map, "map layer roads class 0 overlaycolor", "12 x").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Symbol);
        assert_eq!(err.line, None);
        assert_eq!(map, before);
    }

    #[test]
    fn test_security_patterns() {
        let mut map = load();
        let err = update(&mut map, "map layer 0 template", "/etc/passwd").unwrap_err();
        assert!(err.is_validation());
        assert_eq!(map.layers[0].template, None);

        map.template_pattern = Some("^templates/".into());
        map.data_pattern = Some(r"^data/[a-z]+\.shp$".into());
        assert!(update(&mut map, "map layer 0 template", "templates/lakes.html").is_ok());
        assert!(update(&mut map, "map web footer", "../footer.html").unwrap_err().is_validation());
        assert!(update(&mut map, "map layer 0 data", "data/lakes.shp").is_ok());
        assert!(update(&mut map, "map layer 0 data", "/etc/passwd").unwrap_err().is_validation());
        assert_eq!(map.layers[0].data.as_deref(), Some("data/lakes.shp"));
    }

    #[test]
    fn test_item_null_clears() {
        let mut map = load();
        update(&mut map, "map layer towns labelitem", "null").unwrap();
        assert_eq!(map.layers[2].label_item, None);
    }

    #[test]
    fn test_processing_accepts_bands_only() {
        let mut map = load();
        update(&mut map, "map layer 0 processing", "BANDS=1,2,3").unwrap();
        update(&mut map, "map layer 0 processing", "BANDS=3").unwrap();
        assert_eq!(map.layers[0].processing, vec!["BANDS=3"]);
        assert!(update(&mut map, "map layer 0 processing", "SCALE=AUTO")
            .unwrap_err()
            .is_validation());
    }

    #[test]
    fn test_map_size_range() {
        let mut map = load();
        update(&mut map, "map size", "800 600").unwrap();
        assert_eq!((map.width, map.height), (800, 600));
        let err = update(&mut map, "map size", "5000 600").unwrap_err();
        assert_eq!(err.kind, ErrorKind::OutOfRange);
        assert_eq!((map.width, map.height), (800, 600));
    }

    #[test]
    fn test_image_type_reselects_format() {
        let mut map = load();
        update(&mut map, "map imagetype", "png24").unwrap();
        assert_eq!(map.output_format.as_ref().map(|f| f.name.as_str()), Some("png24"));
        assert!(update(&mut map, "map imagetype", "bmp").is_err());
        assert_eq!(map.image_type.as_deref(), Some("png24"));
    }

    #[test]
    fn test_symbols_resolve_against_catalog() {
        let mut map = load();
        update(&mut map, "map layer towns class 0 symbol", "circle").unwrap();
        assert_eq!(map.layers[2].classes[0].styles[0].symbol, 1);
        let err = update(&mut map, "map layer towns class 0 symbol", "star").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Symbol);
    }

    #[test]
    fn test_element_labels_are_settled() {
        let mut map = load();
        update(&mut map, "map legend label position", "UL").unwrap();
        assert_eq!(map.legend.label.position, Position::Xy);

        let err = update(&mut map, "map scalebar label type", "TRUETYPE").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Type);
        assert_eq!(map.scalebar.label.font_type, crate::mapfile::model::FontType::Bitmap);
    }

    #[test]
    fn test_features() {
        let mut map = load();
        update(&mut map, "map layer roads feature points", "0 0 10 10").unwrap();
        update(&mut map, "map layer roads feature text", "Main Street").unwrap();
        update(&mut map, "map layer roads feature new", "").unwrap();
        update(&mut map, "map layer roads feature points", "5 5").unwrap();

        let layer = &map.layers[1];
        assert_eq!(layer.connection_type, ConnectionType::Inline);
        assert_eq!(layer.features.len(), 2);
        assert_eq!(layer.features[0].text.as_deref(), Some("Main Street"));
        assert_eq!(layer.features[0].shape_type, ShapeType::Line);
        assert_eq!(layer.features[1].point_count(), 1);
    }

    #[test]
    fn test_config_and_projection() {
        let mut map = load();
        update(&mut map, "map config 'PROJ_LIB'", "/opt/proj").unwrap();
        assert_eq!(map.config_option("PROJ_LIB"), Some("/opt/proj"));

        update(&mut map, "map projection", "+proj=utm +zone=11 +ellps=WGS84").unwrap();
        assert_eq!(
            map.projection,
            Projection::new(vec!["proj=utm".into(), "zone=11".into(), "ellps=WGS84".into()])
        );
    }

    #[test]
    fn test_web_log_is_document_only() {
        let mut map = load();
        map.template_pattern = Some("^templates/".into());
        map.data_pattern = Some("^data/".into());
        let before = map.clone();
        let outcome = update(&mut map, "map web log", "/etc/cron.d/job").unwrap();
        assert!(matches!(outcome, UpdateOutcome::Ignored(_)));
        assert_eq!(map.web.log, None);
        assert_eq!(map, before);
    }

    #[test]
    fn test_trailing_backslash_survives_reload() {
        let mut map = load();
        update(&mut map, "map shapepath", r"C:\maps\").unwrap();
        update(&mut map, "map layer roads class minor expression", r"ends\").unwrap();

        let options = ParserOptions::default();
        let mut reloaded = parse_document(&write_map(&map), options).unwrap();
        resolve_map(&mut reloaded, options).unwrap();
        assert_eq!(reloaded.shape_path.as_deref(), Some(r"C:\maps\"));
        assert_eq!(reloaded.layers[1].classes[1].expression, Some(Expression::string(r"ends\")));
    }

    #[test]
    fn test_batch_continues_after_failures() {
        let mut map = load();
        let report = apply_updates(
            &mut map,
            [
                ("map layer 0 name", "rivers"),
                ("map layer 0 data", "/etc/passwd"),
                ("map layer 9 name", "x"),
                ("map web imagepath", "/tmp/ms/"),
            ],
            ParserOptions::default(),
        );
        assert_eq!(report.applied(), 2);
        assert_eq!(report.rejections().count(), 1);
        assert_eq!(report.ignored().count(), 1);
        assert_eq!(map.layers[0].name.as_deref(), Some("rivers"));
        assert_eq!(map.web.image_path, "/tmp/ms/");
    }
}
