//! Post-parse resolution
//!
//! Runs once after a whole document parsed: output formats are completed and
//! selected, the symbol and font catalogs named by the document are loaded,
//! and symbol names are bound to catalog indexes. Partial updates never run
//! this pass; they resolve names against the catalogs already loaded.

use crate::mapfile::error::{push_checked, ErrorKind, MapfileError, Result};
use crate::mapfile::model::outputformat::DEFAULT_FORMATS;
use crate::mapfile::model::{FontCatalog, MapDefinition, OutputFormat, SymbolCatalog};
use crate::mapfile::parser::elements::symbol::parse_symbol_set;
use crate::mapfile::parser::{ParserContext, ParserOptions};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Every resolution step, in order. Any failure fails the whole load.
pub fn resolve_map(map: &mut MapDefinition, options: ParserOptions) -> Result<()> {
    setup_output_formats(map)?;
    load_symbol_set(map, options)?;
    resolve_symbol_names(map)?;
    if options.capabilities.truetype_fonts {
        load_font_set(map)?;
    }
    Ok(())
}

/// Add the library formats that are missing, default `IMAGETYPE` to the
/// first format and select the current format with the map's overrides.
///
/// Also re-run when a partial update changes the image type or one of the
/// overrides.
pub fn setup_output_formats(map: &mut MapDefinition) -> Result<()> {
    let routine = "setup_output_formats";
    for (name, driver) in DEFAULT_FORMATS {
        if map.select_output_format(name).is_some() {
            continue;
        }
        if let Some(format) = OutputFormat::from_driver(driver) {
            push_checked(&mut map.output_formats, format, routine)?;
        }
    }

    if map.image_type.is_none() {
        map.image_type = map.output_formats.first().map(|format| format.name.clone());
    }
    let image_type = map.image_type.as_deref().unwrap_or("");
    let selected = map.select_output_format(image_type).ok_or_else(|| {
        MapfileError::misc(
            routine,
            format!("Unable to select IMAGETYPE `{}'.", image_type),
        )
    })?;
    let current = selected.with_overrides(map.transparent, map.interlace, map.image_quality);
    debug!(format = %current.name, driver = %current.driver, "selected output format");
    map.output_format = Some(current);
    Ok(())
}

/// A catalog path relative to the document's directory.
fn relative_to_map(map: &MapDefinition, file: &str) -> PathBuf {
    let path = Path::new(file);
    match &map.map_path {
        Some(base) if path.is_relative() => base.join(path),
        _ => path.to_path_buf(),
    }
}

fn read_catalog(path: &Path, routine: &'static str) -> Result<String> {
    fs::read_to_string(path).map_err(|err| MapfileError::io(routine, &err, &path.display().to_string()))
}

/// Append the symbols of the `SYMBOLSET` file after the inline symbols.
pub fn load_symbol_set(map: &mut MapDefinition, options: ParserOptions) -> Result<()> {
    let routine = "load_symbol_set";
    let Some(filename) = map.symbol_set.filename.clone() else {
        return Ok(());
    };
    let path = relative_to_map(map, &filename);
    let text = read_catalog(&path, routine)?;

    let mut ctx = ParserContext::document(text, options);
    parse_symbol_set(&mut ctx, &mut map.symbol_set)?;
    debug!(path = %path.display(), symbols = map.symbol_set.len(), "loaded symbol set");
    Ok(())
}

/// Bind style symbols and the reference marker given by name.
pub fn resolve_symbol_names(map: &mut MapDefinition) -> Result<()> {
    let routine = "resolve_symbol_names";
    let symbols: &SymbolCatalog = &map.symbol_set;
    let mut resolved = 0;

    for layer in &mut map.layers {
        for (class_index, class) in layer.classes.iter_mut().enumerate() {
            for (style_index, style) in class.styles.iter_mut().enumerate() {
                let Some(name) = style.symbol_name.as_deref() else {
                    continue;
                };
                style.symbol = symbols.index_of(name).ok_or_else(|| {
                    MapfileError::misc(
                        routine,
                        format!(
                            "Undefined overlay symbol \"{}\" in class {}, style {} of layer {}.",
                            name,
                            class_index,
                            style_index,
                            layer.name.as_deref().unwrap_or("")
                        ),
                    )
                })?;
                resolved += 1;
            }
        }
    }

    if let Some(name) = map.reference.marker_name.as_deref() {
        map.reference.marker = symbols.index_of(name).ok_or_else(|| {
            MapfileError::misc(
                routine,
                format!("Undefined symbol \"{}\" in reference map.", name),
            )
        })?;
        resolved += 1;
    }

    debug!(resolved, "resolved symbol names");
    Ok(())
}

/// Load the `FONTSET` file: one `alias path` pair per line.
pub fn load_font_set(map: &mut MapDefinition) -> Result<()> {
    let routine = "load_font_set";
    let Some(filename) = map.font_set.filename.clone() else {
        return Ok(());
    };
    let path = relative_to_map(map, &filename);
    let text = read_catalog(&path, routine)?;
    let base = path.parent().map(Path::to_path_buf).unwrap_or_default();

    let fonts = parse_font_set(&text, &base, routine)?;
    debug!(path = %path.display(), fonts = fonts.fonts.len(), "loaded font set");
    map.font_set.fonts = fonts.fonts;
    Ok(())
}

/// Font aliases from font-set text. `#` starts a comment; relative font
/// paths are taken from `base`.
pub fn parse_font_set(text: &str, base: &Path, routine: &'static str) -> Result<FontCatalog> {
    let mut catalog = FontCatalog::default();
    for (number, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(alias), Some(file)) = (parts.next(), parts.next()) else {
            return Err(MapfileError::new(
                ErrorKind::Misc,
                routine,
                format!("Font set entry is missing a path: ({})", line),
            )
            .at_line(Some(number + 1)));
        };
        let file = Path::new(file);
        let resolved = if file.is_relative() {
            base.join(file)
        } else {
            file.to_path_buf()
        };
        catalog
            .fonts
            .insert(alias.to_string(), resolved.display().to_string());
    }
    Ok(catalog)
}
