//! The map definition root and the accessors consumers read it through

use super::map_elements::{Legend, QueryMap, ReferenceMap, Scalebar};
use super::enums::{Status, Units};
use super::geometry::{Color, Rect};
use super::layer::Layer;
use super::metadata::Metadata;
use super::outputformat::OutputFormat;
use super::projection::Projection;
use super::symbols::{FontCatalog, SymbolCatalog};
use super::web::Web;
use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use serde::Serialize;
use std::path::PathBuf;

pub const MAX_IMAGE_SIZE_DEFAULT: i32 = 2048;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapDefinition {
    pub name: String,
    pub status: Status,
    pub debug: bool,
    pub extent: Rect,
    pub width: i32,
    pub height: i32,
    pub max_size: i32,
    pub units: Units,
    pub scale: f64,
    pub resolution: f64,
    pub shape_path: Option<String>,
    /// Directory of the document, used to resolve catalog paths.
    pub map_path: Option<PathBuf>,
    pub image_color: Color,
    pub image_type: Option<String>,
    pub image_quality: Option<i32>,
    pub interlace: Option<bool>,
    pub transparent: Option<bool>,
    pub output_formats: Vec<OutputFormat>,
    /// The selected format with map overrides applied.
    pub output_format: Option<OutputFormat>,
    pub font_set: FontCatalog,
    pub symbol_set: SymbolCatalog,
    pub projection: Projection,
    pub latlon: Projection,
    pub legend: Legend,
    pub scalebar: Scalebar,
    pub query_map: QueryMap,
    pub reference: ReferenceMap,
    pub web: Web,
    pub config: Metadata,
    pub template_pattern: Option<String>,
    pub data_pattern: Option<String>,
    pub layers: Vec<Layer>,
    /// Draw order as a permutation of layer indexes.
    pub layer_order: Vec<usize>,
}

impl Default for MapDefinition {
    fn default() -> Self {
        Self {
            name: "MS".to_string(),
            status: Status::On,
            debug: false,
            extent: Rect::UNSET,
            width: -1,
            height: -1,
            max_size: MAX_IMAGE_SIZE_DEFAULT,
            units: Units::Meters,
            scale: -1.0,
            resolution: 72.0,
            shape_path: None,
            map_path: None,
            image_color: Color::WHITE,
            image_type: None,
            image_quality: None,
            interlace: None,
            transparent: None,
            output_formats: Vec::new(),
            output_format: None,
            font_set: FontCatalog::default(),
            symbol_set: SymbolCatalog::default(),
            projection: Projection::default(),
            latlon: Projection::latlong(),
            legend: Legend::default(),
            scalebar: Scalebar::default(),
            query_map: QueryMap::default(),
            reference: ReferenceMap::default(),
            web: Web::default(),
            config: Metadata::new(),
            template_pattern: None,
            data_pattern: None,
            layers: Vec::new(),
            layer_order: Vec::new(),
        }
    }
}

impl MapDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layers in the order they are drawn.
    pub fn layers_in_draw_order(&self) -> impl Iterator<Item = &Layer> {
        self.layer_order
            .iter()
            .filter_map(move |&index| self.layers.get(index))
    }

    pub fn layer_by_name(&self, name: &str) -> Option<&Layer> {
        self.layer_index(name).map(|index| &self.layers[index])
    }

    pub fn layer_by_name_mut(&mut self, name: &str) -> Option<&mut Layer> {
        self.layer_index(name).map(move |index| &mut self.layers[index])
    }

    /// Index of the first layer with this name.
    pub fn layer_index(&self, name: &str) -> Option<usize> {
        self.layers
            .iter()
            .position(|layer| layer.name.as_deref() == Some(name))
    }

    /// Indexes of every layer in a group, in list order.
    pub fn layers_in_group(&self, group: &str) -> Vec<usize> {
        self.layers
            .iter()
            .filter(|layer| layer.group.as_deref() == Some(group))
            .map(|layer| layer.index)
            .collect()
    }

    /// Add a layer, enforcing the layer capacity.
    ///
    /// The layer takes the next index and is drawn last.
    pub fn insert_layer(&mut self, mut layer: Layer, limit: usize) -> Result<usize> {
        if self.layers.len() >= limit {
            return Err(MapfileError::capacity(
                "insert_layer",
                format!("Maximum number of layers, {}, has been reached", limit),
            ));
        }
        let index = self.layers.len();
        layer.set_index(index);
        self.layers.push(layer);
        self.layer_order.push(index);
        Ok(index)
    }

    /// Remove a layer. Later layers are renumbered and the draw order keeps
    /// its relative sequence.
    pub fn remove_layer(&mut self, index: usize) -> Option<Layer> {
        if index >= self.layers.len() {
            return None;
        }
        let removed = self.layers.remove(index);
        for (position, layer) in self.layers.iter_mut().enumerate().skip(index) {
            layer.set_index(position);
        }
        self.layer_order = self
            .layer_order
            .iter()
            .filter(|&&current| current != index)
            .map(|&current| if current > index { current - 1 } else { current })
            .collect();
        Some(removed)
    }

    /// Draw a layer one step earlier. Returns false when it is already first.
    pub fn move_layer_up(&mut self, index: usize) -> bool {
        match self.layer_order.iter().position(|&current| current == index) {
            Some(position) if position > 0 => {
                self.layer_order.swap(position, position - 1);
                true
            }
            _ => false,
        }
    }

    /// Draw a layer one step later. Returns false when it is already last.
    pub fn move_layer_down(&mut self, index: usize) -> bool {
        match self.layer_order.iter().position(|&current| current == index) {
            Some(position) if position + 1 < self.layer_order.len() => {
                self.layer_order.swap(position, position + 1);
                true
            }
            _ => false,
        }
    }

    /// Replace the draw order. It must be a permutation of the layer indexes.
    pub fn set_layer_order(&mut self, order: &[usize]) -> Result<()> {
        let mut seen = vec![false; self.layers.len()];
        let is_permutation = order.len() == self.layers.len()
            && order.iter().all(|&index| {
                index < seen.len() && !std::mem::replace(&mut seen[index], true)
            });
        if !is_permutation {
            return Err(MapfileError::new(
                ErrorKind::OutOfRange,
                "set_layer_order",
                "Layer order must be a permutation of the layer indexes.",
            ));
        }
        self.layer_order = order.to_vec();
        Ok(())
    }

    /// Map metadata lives in the web block.
    pub fn metadata(&self) -> &Metadata {
        &self.web.metadata
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        &mut self.web.metadata
    }

    pub fn config_option(&self, key: &str) -> Option<&str> {
        self.config.get(key)
    }

    pub fn set_config_option(&mut self, key: &str, value: &str) {
        self.config.set(key, value);
    }

    /// Find a format by MIME type, then by name, ignoring case.
    pub fn select_output_format(&self, image_type: &str) -> Option<&OutputFormat> {
        if image_type.is_empty() {
            return None;
        }
        self.output_formats
            .iter()
            .find(|format| {
                format
                    .mime_type
                    .as_deref()
                    .map(|mime| mime.eq_ignore_ascii_case(image_type))
                    .unwrap_or(false)
            })
            .or_else(|| {
                self.output_formats
                    .iter()
                    .find(|format| format.name.eq_ignore_ascii_case(image_type))
            })
    }

    /// Distinct MIME types of the known formats, in list order.
    pub fn output_mime_types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = Vec::new();
        for mime in self.output_formats.iter().filter_map(|f| f.mime_type.as_deref()) {
            if !types.iter().any(|known| known.eq_ignore_ascii_case(mime)) {
                types.push(mime);
            }
        }
        types
    }

    pub fn symbol_index(&self, name: &str) -> Option<usize> {
        self.symbol_set.index_of(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map_with_layers(names: &[&str]) -> MapDefinition {
        let mut map = MapDefinition::new();
        for name in names {
            let mut layer = Layer::new(0);
            layer.name = Some(name.to_string());
            map.insert_layer(layer, 10).unwrap();
        }
        map
    }

    fn draw_names(map: &MapDefinition) -> Vec<&str> {
        map.layers_in_draw_order()
            .filter_map(|layer| layer.name.as_deref())
            .collect()
    }

    #[test]
    fn test_insert_assigns_index_and_order() {
        let map = map_with_layers(&["a", "b", "c"]);
        assert_eq!(map.layers[2].index, 2);
        assert_eq!(map.layer_order, vec![0, 1, 2]);
        assert_eq!(map.layer_by_name("b").map(|l| l.index), Some(1));
    }

    #[test]
    fn test_layer_capacity() {
        let mut map = map_with_layers(&["a", "b"]);
        let err = map.insert_layer(Layer::new(0), 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);
    }

    #[test]
    fn test_move_layers() {
        let mut map = map_with_layers(&["a", "b", "c"]);
        assert!(map.move_layer_up(2));
        assert_eq!(draw_names(&map), vec!["a", "c", "b"]);
        assert!(map.move_layer_down(0));
        assert_eq!(draw_names(&map), vec!["c", "a", "b"]);
        assert!(!map.move_layer_up(2));
        assert!(!map.move_layer_down(1));
    }

    #[test]
    fn test_set_layer_order_requires_permutation() {
        let mut map = map_with_layers(&["a", "b", "c"]);
        assert!(map.set_layer_order(&[0, 0, 1]).is_err());
        assert!(map.set_layer_order(&[0, 1]).is_err());
        assert!(map.set_layer_order(&[0, 1, 3]).is_err());
        map.set_layer_order(&[2, 0, 1]).unwrap();
        assert_eq!(draw_names(&map), vec!["c", "a", "b"]);
    }

    #[test]
    fn test_remove_layer_renumbers() {
        let mut map = map_with_layers(&["a", "b", "c"]);
        map.set_layer_order(&[2, 1, 0]).unwrap();
        let removed = map.remove_layer(1).unwrap();
        assert_eq!(removed.name.as_deref(), Some("b"));
        assert_eq!(map.layers[1].index, 1);
        assert_eq!(map.layer_order, vec![1, 0]);
        assert_eq!(draw_names(&map), vec!["c", "a"]);
    }

    #[test]
    fn test_groups() {
        let mut map = map_with_layers(&["a", "b", "c"]);
        map.layers[0].group = Some("roads".into());
        map.layers[2].group = Some("roads".into());
        assert_eq!(map.layers_in_group("roads"), vec![0, 2]);
    }

    #[test]
    fn test_select_output_format_prefers_mime() {
        let mut map = MapDefinition::new();
        let mut png = OutputFormat::from_driver("GD/PNG").unwrap();
        png.name = "image/png24".into();
        map.output_formats.push(OutputFormat::from_driver("GD/PNG24").unwrap());
        map.output_formats.push(png);
        assert_eq!(map.select_output_format("IMAGE/PNG").map(|f| f.name.as_str()), Some("png24"));
        assert_eq!(map.select_output_format("PNG24").map(|f| f.name.as_str()), Some("png24"));
        assert!(map.select_output_format("").is_none());
        assert_eq!(map.output_mime_types(), vec!["image/png"]);
    }

    #[test]
    fn test_metadata_and_config() {
        let mut map = MapDefinition::new();
        map.metadata_mut().set("wms_title", "Demo");
        assert_eq!(map.web.metadata.get("WMS_TITLE"), Some("Demo"));
        map.set_config_option("PROJ_LIB", "/usr/share/proj");
        assert_eq!(map.config_option("proj_lib"), Some("/usr/share/proj"));
    }
}
