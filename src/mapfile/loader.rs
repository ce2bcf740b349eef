//! Loading whole documents
//!
//! [`MapLoader`] is what hosts call: it checks the document filename against
//! the configured pattern, falls back to the configured default document,
//! and runs the parser and the resolver under the parse lock. A failure at
//! any step leaves nothing behind.

use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use crate::mapfile::model::MapDefinition;
use crate::mapfile::parser::{acquire_parse_lock, parse_document, ParserOptions};
use crate::mapfile::resolve::resolve_map;
use mapfile_config::EngineConfig;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Filenames accepted when no pattern is configured.
pub const DEFAULT_MAPFILE_PATTERN: &str = r"\.map$";

#[derive(Debug, Clone)]
pub struct MapLoader {
    pattern: String,
    default_path: Option<PathBuf>,
    options: ParserOptions,
}

impl Default for MapLoader {
    fn default() -> Self {
        Self::new(ParserOptions::default())
    }
}

impl MapLoader {
    pub fn new(options: ParserOptions) -> Self {
        Self {
            pattern: DEFAULT_MAPFILE_PATTERN.to_string(),
            default_path: None,
            options,
        }
    }

    /// A loader with the filename pattern, default document, capabilities
    /// and limits of `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self {
            pattern: config.mapfile_pattern.clone(),
            default_path: config.mapfile.as_ref().map(PathBuf::from),
            options: ParserOptions::from(config),
        }
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.pattern = pattern.into();
        self
    }

    pub fn with_default_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.default_path = Some(path.into());
        self
    }

    pub fn options(&self) -> ParserOptions {
        self.options
    }

    /// Reject document names that do not match the configured pattern.
    pub fn check_filename(&self, path: &Path) -> Result<()> {
        let routine = "load_map";
        let regex = Regex::new(&self.pattern).map_err(|err| {
            MapfileError::new(
                ErrorKind::Regex,
                routine,
                format!("Failed to compile mapfile pattern ({}): {}", self.pattern, err),
            )
        })?;
        let name = path.to_string_lossy();
        if !regex.is_match(&name) {
            return Err(MapfileError::validation(
                routine,
                format!("Parameter pattern validation failed for ({}).", name),
            ));
        }
        Ok(())
    }

    /// Load `path`, or the default document when `path` is `None`.
    pub fn load_map(&self, path: Option<&Path>) -> Result<MapDefinition> {
        let routine = "load_map";
        let path = match (path, &self.default_path) {
            (Some(path), _) => path.to_path_buf(),
            (None, Some(default_path)) => default_path.clone(),
            (None, None) => {
                return Err(MapfileError::misc(
                    routine,
                    "No map document given and no default document is configured.",
                ))
            }
        };
        self.check_filename(&path)?;

        let text = fs::read_to_string(&path)
            .map_err(|err| MapfileError::io(routine, &err, &path.display().to_string()))?;
        let base = path.parent().map(Path::to_path_buf);
        debug!(path = %path.display(), "loading map");
        self.load_map_from_string(&text, base)
    }

    /// Parse and resolve document text. Catalog files named by the document
    /// are looked up relative to `map_path`.
    pub fn load_map_from_string(&self, text: &str, map_path: Option<PathBuf>) -> Result<MapDefinition> {
        let _guard = acquire_parse_lock();
        let mut map = parse_document(text, self.options)?;
        map.map_path = map_path;
        resolve_map(&mut map, self.options)?;
        debug!(name = %map.name, layers = map.layers.len(), "loaded map");
        Ok(map)
    }
}

/// Load a document with the default configuration.
pub fn load_map(path: impl AsRef<Path>) -> Result<MapDefinition> {
    MapLoader::default().load_map(Some(path.as_ref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_loads_and_resolves() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "symbols.sym",
            "SYMBOLSET SYMBOL NAME 'circle' TYPE ELLIPSE FILLED TRUE POINTS 1 1 END END END",
        );
        let path = write_file(
            dir.path(),
            "demo.map",
            "MAP SYMBOLSET 'symbols.sym' LAYER NAME 'pts' TYPE POINT \
             CLASS STYLE SYMBOL 'circle' END END END END",
        );

        let map = load_map(&path).unwrap();
        assert_eq!(map.map_path.as_deref(), Some(dir.path()));
        assert_eq!(map.layers[0].classes[0].styles[0].symbol, 1);
        assert!(map.output_format.is_some());
    }

    #[test]
    fn test_filename_pattern() {
        let loader = MapLoader::default();
        assert!(loader.check_filename(Path::new("/srv/maps/demo.map")).is_ok());
        let err = loader.check_filename(Path::new("/etc/passwd")).unwrap_err();
        assert!(err.is_validation());

        let err = MapLoader::default()
            .with_pattern("(")
            .check_filename(Path::new("a.map"))
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Regex);
    }

    #[test]
    fn test_default_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "default.map", "MAP NAME 'fallback' END");

        let loader = MapLoader::default().with_default_path(&path);
        assert_eq!(loader.load_map(None).unwrap().name, "fallback");

        let err = MapLoader::default().load_map(None).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Misc);
    }

    #[test]
    fn test_missing_file() {
        let err = load_map("/definitely/not/here.map").unwrap_err();
        assert_eq!(err.kind, ErrorKind::Io);
    }

    #[test]
    fn test_unresolved_symbol_fails_the_load() {
        let loader = MapLoader::default();
        let err = loader
            .load_map_from_string(
                "MAP LAYER TYPE POINT CLASS STYLE SYMBOL 'nowhere' END END END END",
                None,
            )
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Misc);
        assert_eq!(err.routine, "resolve_symbol_names");
    }

    #[test]
    fn test_from_config() {
        let config = mapfile_config::Loader::new()
            .set_override("mapfile_pattern", r"\.cfg$")
            .unwrap()
            .set_override("limits.max_layers", 1_i64)
            .unwrap()
            .build()
            .unwrap();
        let loader = MapLoader::from_config(&config);
        assert_eq!(loader.options().limits.max_layers, 1);
        assert!(loader.check_filename(Path::new("a.map")).is_err());

        let err = loader
            .load_map_from_string("MAP LAYER TYPE POINT END LAYER TYPE LINE END END", None)
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);
    }
}
