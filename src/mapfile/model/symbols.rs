//! Symbol and font catalogs

use super::enums::SymbolType;
use super::geometry::Point;
use crate::mapfile::error::{push_checked, MapfileError, Result};
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Symbol {
    pub name: Option<String>,
    pub symbol_type: SymbolType,
    pub filled: bool,
    pub points: Vec<Point>,
    pub image: Option<String>,
    pub character: Option<String>,
    pub font: Option<String>,
    /// Palette index drawn as transparent in pixmaps.
    pub transparent: Option<i32>,
    pub antialias: bool,
    pub gap: i32,
    /// On/off dash pattern.
    pub style: Vec<i32>,
    /// Declared inline in the map document rather than in a symbol set.
    pub in_mapfile: bool,
}

impl Default for Symbol {
    fn default() -> Self {
        Self {
            name: None,
            symbol_type: SymbolType::Vector,
            filled: false,
            points: Vec::new(),
            image: None,
            character: None,
            font: None,
            transparent: None,
            antialias: false,
            gap: 0,
            style: Vec::new(),
            in_mapfile: false,
        }
    }
}

/// Symbols referenced by styles. Entry 0 is always the unnamed default.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SymbolCatalog {
    pub filename: Option<String>,
    pub symbols: Vec<Symbol>,
}

impl Default for SymbolCatalog {
    fn default() -> Self {
        Self {
            filename: None,
            symbols: vec![Symbol::default()],
        }
    }
}

impl SymbolCatalog {
    /// Index of a named symbol, ignoring case. The default symbol is never
    /// matched by name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.symbols
            .iter()
            .enumerate()
            .skip(1)
            .find(|(_, symbol)| {
                symbol
                    .name
                    .as_deref()
                    .map(|n| n.eq_ignore_ascii_case(name))
                    .unwrap_or(false)
            })
            .map(|(index, _)| index)
    }

    /// Append a symbol, enforcing the catalog capacity. The default symbol
    /// counts toward it.
    pub fn insert(&mut self, symbol: Symbol, limit: usize, routine: &'static str) -> Result<usize> {
        if self.symbols.len() >= limit {
            return Err(MapfileError::capacity(routine, "Too many symbols defined."));
        }
        push_checked(&mut self.symbols, symbol, routine)?;
        Ok(self.symbols.len() - 1)
    }

    /// Symbols declared inside the map document, in order.
    pub fn inline_symbols(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter().filter(|symbol| symbol.in_mapfile)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.len() <= 1
    }
}

/// Truetype fonts by alias.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct FontCatalog {
    pub filename: Option<String>,
    pub fonts: IndexMap<String, String>,
}

impl FontCatalog {
    pub fn path_of(&self, alias: &str) -> Option<&str> {
        self.fonts.get(alias).map(String::as_str)
    }

    pub fn contains(&self, alias: &str) -> bool {
        self.fonts.contains_key(alias)
    }
}
