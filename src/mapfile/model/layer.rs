//! Layers: one data source plus its classes

use super::class::Class;
use super::enums::{ConnectionType, LayerType, Status, Units};
use super::expression::Expression;
use super::feature::{Feature, Grid};
use super::geometry::Color;
use super::join::Join;
use super::metadata::Metadata;
use super::projection::Projection;
use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layer {
    /// Position in the map's layer list. Stable for the life of the map.
    pub index: usize,
    pub name: Option<String>,
    pub group: Option<String>,
    pub status: Status,
    pub debug: bool,
    pub layer_type: Option<LayerType>,
    pub data: Option<String>,
    pub connection: Option<String>,
    pub connection_type: ConnectionType,
    pub tile_index: Option<String>,
    pub tile_item: Option<String>,
    pub template: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub class_item: Option<String>,
    pub filter: Option<Expression>,
    pub filter_item: Option<String>,
    pub style_item: Option<String>,
    pub label_item: Option<String>,
    pub label_size_item: Option<String>,
    pub label_angle_item: Option<String>,
    pub requires: Option<String>,
    pub label_requires: Option<String>,
    pub tolerance: f64,
    pub tolerance_units: Units,
    pub size_units: Units,
    pub units: Units,
    pub symbol_scale: f64,
    pub min_scale: f64,
    pub max_scale: f64,
    pub label_min_scale: f64,
    pub label_max_scale: f64,
    pub max_features: i32,
    pub transform: bool,
    pub offsite: Color,
    pub label_cache: bool,
    pub post_label_cache: bool,
    pub transparency: i32,
    pub dump: bool,
    pub processing: Vec<String>,
    pub projection: Projection,
    pub metadata: Metadata,
    pub classes: Vec<Class>,
    pub joins: Vec<Join>,
    pub features: Vec<Feature>,
    pub grid: Option<Grid>,
}

impl Layer {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            name: None,
            group: None,
            status: Status::Off,
            debug: false,
            layer_type: None,
            data: None,
            connection: None,
            connection_type: ConnectionType::Shapefile,
            tile_index: None,
            tile_item: Some("location".to_string()),
            template: None,
            header: None,
            footer: None,
            class_item: None,
            filter: None,
            filter_item: None,
            style_item: None,
            label_item: None,
            label_size_item: None,
            label_angle_item: None,
            requires: None,
            label_requires: None,
            tolerance: 0.0,
            tolerance_units: Units::Pixels,
            size_units: Units::Pixels,
            units: Units::Meters,
            symbol_scale: -1.0,
            min_scale: -1.0,
            max_scale: -1.0,
            label_min_scale: -1.0,
            label_max_scale: -1.0,
            max_features: -1,
            transform: true,
            offsite: Color::UNSET,
            label_cache: true,
            post_label_cache: false,
            transparency: 0,
            dump: false,
            processing: Vec::new(),
            projection: Projection::default(),
            metadata: Metadata::new(),
            classes: Vec::new(),
            joins: Vec::new(),
            features: Vec::new(),
            grid: None,
        }
    }

    /// Class by name. With duplicate names the first match wins.
    pub fn class_by_name(&self, name: &str) -> Option<usize> {
        self.classes
            .iter()
            .position(|class| class.name.as_deref() == Some(name))
    }

    /// Add a class, enforcing the classes-per-layer capacity.
    pub fn insert_class(&mut self, mut class: Class, at: Option<usize>, limit: usize) -> Result<usize> {
        if self.classes.len() >= limit {
            return Err(MapfileError::capacity(
                "insert_class",
                format!("Maximum number of classes, {}, has been reached", limit),
            ));
        }
        class.layer = self.index;
        let index = match at {
            Some(at) if at <= self.classes.len() => at,
            Some(at) => {
                return Err(MapfileError::new(
                    ErrorKind::OutOfRange,
                    "insert_class",
                    format!("Cannot insert class at index {}", at),
                ))
            }
            None => self.classes.len(),
        };
        self.classes.insert(index, class);
        Ok(index)
    }

    pub fn remove_class(&mut self, index: usize) -> Option<Class> {
        (index < self.classes.len()).then(|| self.classes.remove(index))
    }

    /// Value of a `KEY=VALUE` processing directive.
    pub fn processing_value(&self, key: &str) -> Option<&str> {
        self.processing.iter().find_map(|directive| {
            let (name, value) = directive.split_once('=')?;
            name.eq_ignore_ascii_case(key).then_some(value)
        })
    }

    /// Replace the directive with the same key, or append a new one.
    pub fn set_processing(&mut self, directive: &str) {
        let key = directive.split_once('=').map(|(k, _)| k).unwrap_or(directive);
        let existing = self.processing.iter_mut().find(|current| {
            current
                .split_once('=')
                .map(|(name, _)| name.eq_ignore_ascii_case(key))
                .unwrap_or(false)
        });
        match existing {
            Some(slot) => *slot = directive.to_string(),
            None => self.processing.push(directive.to_string()),
        }
    }

    /// Renumber this layer and its classes.
    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
        for class in &mut self.classes {
            class.layer = index;
        }
    }
}
