//! Canonical writer
//!
//! The inverse of the document parser: one writer per block kind, called in a
//! fixed order. Fields still at their defaults are left out, so the output is
//! not the original text, but parsing it again yields the same model.
//!
//! ## Order
//!
//! General map fields, output formats declared in the document, inline
//! symbols, projection, legend, query map, reference map, scalebar, web, then
//! the layers in draw order with their classes and inline features.

use crate::mapfile::error::{MapfileError, Result};
use crate::mapfile::lexer::Keyword;
use crate::mapfile::model::map::MAX_IMAGE_SIZE_DEFAULT;
use crate::mapfile::model::{
    Class, Color, ConnectionType, Feature, Grid, Join, JoinConnection, JoinType, Label, LabelSize, Layer, Legend,
    MapDefinition, Metadata, OrAuto, OutputFormat, Projection, QueryMap, QueryMapStyle, Rect, ReferenceMap,
    Scalebar, Status, Style, Symbol, SymbolType, Symbolic, Units, Web,
};
use std::fmt::Display;
use std::fs;
use std::path::Path;
use tracing::debug;

const INDENT: &str = "  ";

/// Quote a string so the lexer reads it back unchanged.
fn quote(text: &str) -> String {
    let escaped = text.replace('\\', "\\\\");
    if text.contains('"') && !text.contains('\'') {
        format!("'{}'", escaped)
    } else {
        format!("\"{}\"", escaped.replace('"', "\\\""))
    }
}

fn color_value(color: Color) -> String {
    format!("{} {} {}", color.red, color.green, color.blue)
}

fn rect_value(rect: Rect) -> String {
    format!("{} {} {} {}", rect.minx, rect.miny, rect.maxx, rect.maxy)
}

/// Indented `KEYWORD value` lines with `KEYWORD ... END` blocks.
struct BlockWriter {
    out: String,
    depth: usize,
}

impl BlockWriter {
    fn new() -> Self {
        Self {
            out: String::new(),
            depth: 0,
        }
    }

    fn line(&mut self, text: impl Display) {
        for _ in 0..self.depth {
            self.out.push_str(INDENT);
        }
        self.out.push_str(&text.to_string());
        self.out.push('\n');
    }

    fn open(&mut self, keyword: Keyword) {
        self.line(keyword);
        self.depth += 1;
    }

    fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.line(Keyword::End);
    }

    fn field(&mut self, keyword: Keyword, value: impl Display) {
        self.line(format_args!("{} {}", keyword, value));
    }

    fn string(&mut self, keyword: Keyword, text: Option<&str>) {
        if let Some(text) = text {
            self.field(keyword, quote(text));
        }
    }

    fn int(&mut self, keyword: Keyword, value: i32, default: i32) {
        if value != default {
            self.field(keyword, value);
        }
    }

    fn number(&mut self, keyword: Keyword, value: f64, default: f64) {
        if value != default {
            self.field(keyword, value);
        }
    }

    fn pair(&mut self, keyword: Keyword, value: (i32, i32), default: (i32, i32)) {
        if value != default {
            self.field(keyword, format_args!("{} {}", value.0, value.1));
        }
    }

    fn color(&mut self, keyword: Keyword, color: Color, default: Color) {
        if color == default || !color.is_set() {
            return;
        }
        if color.alpha != 0 {
            self.field(
                Keyword::AlphaColor,
                format_args!("{} {}", color_value(color), color.alpha),
            );
        } else {
            self.field(keyword, color_value(color));
        }
    }

    fn rect(&mut self, keyword: Keyword, rect: Rect) {
        if rect.is_set() {
            self.field(keyword, rect_value(rect));
        }
    }

    fn on_off(&mut self, keyword: Keyword, value: Option<bool>) {
        if let Some(value) = value {
            self.field(keyword, if value { Keyword::On } else { Keyword::Off });
        }
    }

    fn true_false(&mut self, keyword: Keyword, value: bool, default: bool) {
        if value != default {
            self.field(keyword, if value { Keyword::True } else { Keyword::False });
        }
    }

    fn choice<T: Symbolic>(&mut self, keyword: Keyword, value: T, default: T) {
        if value != default {
            self.field(keyword, value.keyword());
        }
    }

    fn metadata(&mut self, metadata: &Metadata) {
        if metadata.is_empty() {
            return;
        }
        self.open(Keyword::Metadata);
        for (key, value) in metadata.iter() {
            self.line(format_args!("{} {}", quote(key), quote(value)));
        }
        self.close();
    }

    fn projection(&mut self, keyword: Keyword, projection: &Projection) {
        if projection.is_empty() {
            return;
        }
        self.open(keyword);
        for arg in &projection.args {
            self.line(quote(arg));
        }
        self.close();
    }

    fn finish(self) -> String {
        self.out
    }
}

/// Render a whole map document.
pub fn write_map(map: &MapDefinition) -> String {
    let mut w = BlockWriter::new();
    w.open(Keyword::Map);
    write_map_fields(&mut w, map);

    for format in map.output_formats.iter().filter(|format| format.in_mapfile) {
        write_output_format(&mut w, format);
    }
    for symbol in map.symbol_set.inline_symbols() {
        write_symbol(&mut w, symbol);
    }
    w.projection(Keyword::Projection, &map.projection);
    write_legend(&mut w, &map.legend);
    write_query_map(&mut w, &map.query_map);
    write_reference_map(&mut w, &map.reference);
    write_scalebar(&mut w, &map.scalebar);
    write_web(&mut w, &map.web);
    for layer in map.layers_in_draw_order() {
        write_layer(&mut w, layer);
    }

    w.close();
    w.finish()
}

/// Write the document to `path`, replacing the file.
pub fn save_map(map: &MapDefinition, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, write_map(map))
        .map_err(|err| MapfileError::io("save_map", &err, &path.display().to_string()))?;
    debug!(path = %path.display(), layers = map.layers.len(), "saved map");
    Ok(())
}

fn write_map_fields(w: &mut BlockWriter, map: &MapDefinition) {
    let defaults = MapDefinition::default();
    w.field(Keyword::Name, quote(&map.name));
    w.choice(Keyword::Status, map.status, defaults.status);
    if map.debug {
        w.on_off(Keyword::Debug, Some(true));
    }
    w.rect(Keyword::Extent, map.extent);
    w.pair(Keyword::Size, (map.width, map.height), (defaults.width, defaults.height));
    w.int(Keyword::MaxSize, map.max_size, MAX_IMAGE_SIZE_DEFAULT);
    w.choice(Keyword::Units, map.units, defaults.units);
    w.number(Keyword::Scale, map.scale, defaults.scale);
    w.number(Keyword::Resolution, map.resolution, defaults.resolution);
    w.string(Keyword::ShapePath, map.shape_path.as_deref());
    w.color(Keyword::ImageColor, map.image_color, defaults.image_color);
    if let Some(image_type) = &map.image_type {
        w.field(Keyword::ImageType, image_type);
    }
    if let Some(quality) = map.image_quality {
        w.field(Keyword::ImageQuality, quality);
    }
    w.on_off(Keyword::Interlace, map.interlace);
    w.on_off(Keyword::Transparent, map.transparent);
    w.string(Keyword::FontSet, map.font_set.filename.as_deref());
    w.string(Keyword::SymbolSet, map.symbol_set.filename.as_deref());
    w.string(Keyword::DataPattern, map.data_pattern.as_deref());
    w.string(Keyword::TemplatePattern, map.template_pattern.as_deref());
    for (key, value) in map.config.iter() {
        w.field(Keyword::Config, format_args!("{} {}", quote(key), quote(value)));
    }
    if map.latlon != defaults.latlon {
        w.projection(Keyword::LatLon, &map.latlon);
    }
}

fn write_output_format(w: &mut BlockWriter, format: &OutputFormat) {
    w.open(Keyword::OutputFormat);
    w.field(Keyword::Name, quote(&format.name));
    w.string(Keyword::MimeType, format.mime_type.as_deref());
    w.field(Keyword::Driver, quote(&format.driver));
    w.string(Keyword::Extension, format.extension.as_deref());
    w.field(Keyword::ImageMode, format.image_mode.as_str());
    w.on_off(Keyword::Transparent, Some(format.transparent));
    for option in &format.options {
        w.field(Keyword::FormatOption, quote(option));
    }
    w.close();
}

fn write_symbol(w: &mut BlockWriter, symbol: &Symbol) {
    let defaults = Symbol::default();
    w.open(Keyword::Symbol);
    w.string(Keyword::Name, symbol.name.as_deref());
    w.choice(Keyword::Type, symbol.symbol_type, SymbolType::Vector);
    w.true_false(Keyword::Filled, symbol.filled, defaults.filled);
    w.true_false(Keyword::Antialias, symbol.antialias, defaults.antialias);
    w.string(Keyword::Image, symbol.image.as_deref());
    w.string(Keyword::Character, symbol.character.as_deref());
    w.string(Keyword::Font, symbol.font.as_deref());
    if let Some(transparent) = symbol.transparent {
        w.field(Keyword::Transparent, transparent);
    }
    w.int(Keyword::Gap, symbol.gap, defaults.gap);
    if !symbol.points.is_empty() {
        w.open(Keyword::Points);
        for point in &symbol.points {
            w.line(format_args!("{} {}", point.x, point.y));
        }
        w.close();
    }
    if !symbol.style.is_empty() {
        let pattern: Vec<String> = symbol.style.iter().map(i32::to_string).collect();
        w.field(Keyword::Style, format_args!("{} {}", pattern.join(" "), Keyword::End));
    }
    w.close();
}

fn write_label(w: &mut BlockWriter, label: &Label, defaults: &Label) {
    w.open(Keyword::Label);
    w.string(Keyword::Font, label.font.as_deref());
    if label.font_type != defaults.font_type {
        w.field(Keyword::Type, label.font_type.keyword());
    }
    if label.size != defaults.size {
        match label.size {
            LabelSize::Named(size) => w.field(Keyword::Size, size.keyword()),
            LabelSize::Points(points) => w.field(Keyword::Size, points),
        }
    }
    w.int(Keyword::MinSize, label.min_size, defaults.min_size);
    w.int(Keyword::MaxSize, label.max_size, defaults.max_size);
    if label.angle != defaults.angle {
        match label.angle {
            OrAuto::Fixed(angle) => w.field(Keyword::Angle, angle),
            OrAuto::Auto => w.field(Keyword::Angle, Keyword::Auto),
        }
    }
    if label.position != defaults.position {
        if let Some(position) = label.position.keyword() {
            w.field(Keyword::Position, position);
        }
    }
    w.color(Keyword::Color, label.color, defaults.color);
    w.color(Keyword::OutlineColor, label.outline_color, defaults.outline_color);
    w.color(Keyword::ShadowColor, label.shadow_color, defaults.shadow_color);
    w.pair(Keyword::ShadowSize, label.shadow_size, defaults.shadow_size);
    w.color(Keyword::BackgroundColor, label.background_color, defaults.background_color);
    w.color(
        Keyword::BackgroundShadowColor,
        label.background_shadow_color,
        defaults.background_shadow_color,
    );
    w.pair(
        Keyword::BackgroundShadowSize,
        label.background_shadow_size,
        defaults.background_shadow_size,
    );
    w.pair(Keyword::Offset, label.offset, defaults.offset);
    w.int(Keyword::Buffer, label.buffer, defaults.buffer);
    w.int(Keyword::MinDistance, label.min_distance, defaults.min_distance);
    if label.min_feature_size != defaults.min_feature_size {
        match label.min_feature_size {
            OrAuto::Fixed(size) => w.field(Keyword::MinFeatureSize, size),
            OrAuto::Auto => w.field(Keyword::MinFeatureSize, Keyword::Auto),
        }
    }
    if let Some(wrap) = label.wrap {
        w.field(Keyword::Wrap, quote(&wrap.to_string()));
    }
    w.true_false(Keyword::Partials, label.partials, defaults.partials);
    w.true_false(Keyword::Force, label.force, defaults.force);
    w.true_false(Keyword::Antialias, label.antialias, defaults.antialias);
    w.close();
}

/// Element labels are only written when they differ from the element default.
fn write_element_label(w: &mut BlockWriter, label: &Label) {
    let defaults = Label::for_element();
    if *label != defaults {
        write_label(w, label, &defaults);
    }
}

fn write_legend(w: &mut BlockWriter, legend: &Legend) {
    let defaults = Legend::default();
    if *legend == defaults {
        return;
    }
    w.open(Keyword::Legend);
    w.color(Keyword::ImageColor, legend.image_color, defaults.image_color);
    w.color(Keyword::OutlineColor, legend.outline_color, defaults.outline_color);
    w.pair(Keyword::KeySize, legend.key_size, defaults.key_size);
    w.pair(Keyword::KeySpacing, legend.key_spacing, defaults.key_spacing);
    w.choice(Keyword::Status, legend.status, defaults.status);
    if let Some(position) = legend.position.keyword().filter(|_| legend.position != defaults.position) {
        w.field(Keyword::Position, position);
    }
    w.on_off(Keyword::Transparent, legend.transparent);
    w.on_off(Keyword::Interlace, legend.interlace);
    w.true_false(Keyword::PostLabelCache, legend.post_label_cache, defaults.post_label_cache);
    w.string(Keyword::Template, legend.template.as_deref());
    write_element_label(w, &legend.label);
    w.close();
}

fn write_query_map(w: &mut BlockWriter, query_map: &QueryMap) {
    let defaults = QueryMap::default();
    if *query_map == defaults {
        return;
    }
    w.open(Keyword::QueryMap);
    w.pair(Keyword::Size, query_map.size, defaults.size);
    w.choice(Keyword::Style, query_map.style, QueryMapStyle::Hilite);
    w.choice(Keyword::Status, query_map.status, defaults.status);
    w.color(Keyword::Color, query_map.color, defaults.color);
    w.close();
}

fn write_reference_map(w: &mut BlockWriter, reference: &ReferenceMap) {
    let defaults = ReferenceMap::default();
    // a reference map without an image cannot be read back
    let Some(image) = reference.image.as_deref() else {
        return;
    };
    w.open(Keyword::Reference);
    w.field(Keyword::Image, quote(image));
    w.pair(Keyword::Size, reference.size, defaults.size);
    w.rect(Keyword::Extent, reference.extent);
    w.choice(Keyword::Status, reference.status, defaults.status);
    w.color(Keyword::Color, reference.color, defaults.color);
    w.color(Keyword::OutlineColor, reference.outline_color, defaults.outline_color);
    match reference.marker_name.as_deref() {
        Some(name) => w.field(Keyword::Marker, quote(name)),
        None => w.int(Keyword::Marker, reference.marker as i32, 0),
    }
    w.int(Keyword::MarkerSize, reference.marker_size, defaults.marker_size);
    w.int(Keyword::MinBoxSize, reference.min_box_size, defaults.min_box_size);
    w.int(Keyword::MaxBoxSize, reference.max_box_size, defaults.max_box_size);
    w.close();
}

fn write_scalebar(w: &mut BlockWriter, scalebar: &Scalebar) {
    let defaults = Scalebar::default();
    if *scalebar == defaults {
        return;
    }
    w.open(Keyword::Scalebar);
    w.color(Keyword::ImageColor, scalebar.image_color, defaults.image_color);
    w.color(Keyword::BackgroundColor, scalebar.background_color, defaults.background_color);
    w.color(Keyword::Color, scalebar.color, defaults.color);
    w.color(Keyword::OutlineColor, scalebar.outline_color, defaults.outline_color);
    w.pair(Keyword::Size, scalebar.size, defaults.size);
    w.int(Keyword::Style, scalebar.style, defaults.style);
    w.int(Keyword::Intervals, scalebar.intervals, defaults.intervals);
    w.choice(Keyword::Units, scalebar.units, Units::Miles);
    w.choice(Keyword::Status, scalebar.status, defaults.status);
    if let Some(position) = scalebar.position.keyword().filter(|_| scalebar.position != defaults.position) {
        w.field(Keyword::Position, position);
    }
    w.on_off(Keyword::Transparent, scalebar.transparent);
    w.on_off(Keyword::Interlace, scalebar.interlace);
    w.true_false(Keyword::PostLabelCache, scalebar.post_label_cache, defaults.post_label_cache);
    write_element_label(w, &scalebar.label);
    w.close();
}

fn write_web(w: &mut BlockWriter, web: &Web) {
    let defaults = Web::default();
    if *web == defaults {
        return;
    }
    w.open(Keyword::Web);
    w.rect(Keyword::Extent, web.extent);
    w.string(Keyword::Template, web.template.as_deref());
    w.string(Keyword::Header, web.header.as_deref());
    w.string(Keyword::Footer, web.footer.as_deref());
    w.string(Keyword::Empty, web.empty.as_deref());
    w.string(Keyword::Error, web.error.as_deref());
    w.string(Keyword::MinTemplate, web.min_template.as_deref());
    w.string(Keyword::MaxTemplate, web.max_template.as_deref());
    w.string(Keyword::Log, web.log.as_deref());
    w.number(Keyword::MinScale, web.min_scale, defaults.min_scale);
    w.number(Keyword::MaxScale, web.max_scale, defaults.max_scale);
    if !web.image_path.is_empty() {
        w.field(Keyword::ImagePath, quote(&web.image_path));
    }
    if !web.image_url.is_empty() {
        w.field(Keyword::ImageUrl, quote(&web.image_url));
    }
    if web.query_format != defaults.query_format {
        w.field(Keyword::QueryFormat, quote(&web.query_format));
    }
    w.metadata(&web.metadata);
    w.close();
}

fn write_layer(w: &mut BlockWriter, layer: &Layer) {
    let defaults = Layer::new(layer.index);
    w.open(Keyword::Layer);
    w.string(Keyword::Name, layer.name.as_deref());
    w.string(Keyword::Group, layer.group.as_deref());
    if let Some(layer_type) = layer.layer_type {
        w.field(Keyword::Type, layer_type.keyword());
    }
    w.choice(Keyword::Status, layer.status, Status::Off);
    if layer.debug {
        w.on_off(Keyword::Debug, Some(true));
    }
    w.string(Keyword::Data, layer.data.as_deref());
    if let Some(connection_type) = layer.connection_type.keyword() {
        // graticules are implied by their GRID block
        if layer.connection_type != ConnectionType::Graticule || layer.grid.is_none() {
            w.field(Keyword::ConnectionType, connection_type);
        }
    }
    w.string(Keyword::Connection, layer.connection.as_deref());
    w.string(Keyword::TileIndex, layer.tile_index.as_deref());
    if layer.tile_item != defaults.tile_item {
        w.string(Keyword::TileItem, layer.tile_item.as_deref());
    }
    w.string(Keyword::Template, layer.template.as_deref());
    w.string(Keyword::Header, layer.header.as_deref());
    w.string(Keyword::Footer, layer.footer.as_deref());
    w.string(Keyword::ClassItem, layer.class_item.as_deref());
    if let Some(filter) = &layer.filter {
        w.field(Keyword::Filter, filter);
    }
    w.string(Keyword::FilterItem, layer.filter_item.as_deref());
    w.string(Keyword::StyleItem, layer.style_item.as_deref());
    w.string(Keyword::LabelItem, layer.label_item.as_deref());
    w.string(Keyword::LabelSizeItem, layer.label_size_item.as_deref());
    w.string(Keyword::LabelAngleItem, layer.label_angle_item.as_deref());
    w.string(Keyword::Requires, layer.requires.as_deref());
    w.string(Keyword::LabelRequires, layer.label_requires.as_deref());
    w.number(Keyword::Tolerance, layer.tolerance, defaults.tolerance);
    w.choice(Keyword::ToleranceUnits, layer.tolerance_units, defaults.tolerance_units);
    w.choice(Keyword::SizeUnits, layer.size_units, defaults.size_units);
    w.choice(Keyword::Units, layer.units, defaults.units);
    w.number(Keyword::SymbolScale, layer.symbol_scale, defaults.symbol_scale);
    w.number(Keyword::MinScale, layer.min_scale, defaults.min_scale);
    w.number(Keyword::MaxScale, layer.max_scale, defaults.max_scale);
    w.number(Keyword::LabelMinScale, layer.label_min_scale, defaults.label_min_scale);
    w.number(Keyword::LabelMaxScale, layer.label_max_scale, defaults.label_max_scale);
    w.int(Keyword::MaxFeatures, layer.max_features, defaults.max_features);
    w.true_false(Keyword::Transform, layer.transform, defaults.transform);
    w.color(Keyword::Offsite, layer.offsite, defaults.offsite);
    if layer.post_label_cache {
        w.true_false(Keyword::PostLabelCache, true, false);
    } else if !layer.label_cache {
        w.on_off(Keyword::LabelCache, Some(false));
    }
    w.int(Keyword::Transparency, layer.transparency, defaults.transparency);
    w.true_false(Keyword::Dump, layer.dump, defaults.dump);
    for directive in &layer.processing {
        w.field(Keyword::Processing, quote(directive));
    }
    w.projection(Keyword::Projection, &layer.projection);
    w.metadata(&layer.metadata);
    for join in &layer.joins {
        write_join(w, join);
    }
    if let Some(grid) = &layer.grid {
        write_grid(w, grid);
    }
    for class in &layer.classes {
        write_class(w, class, layer);
    }
    for feature in &layer.features {
        write_feature(w, feature);
    }
    w.close();
}

fn write_class(w: &mut BlockWriter, class: &Class, layer: &Layer) {
    let defaults = Class::default();
    w.open(Keyword::Class);
    w.string(Keyword::Name, class.name.as_deref());
    w.string(Keyword::Title, class.title.as_deref());
    w.choice(Keyword::Status, class.status, defaults.status);
    if class.debug {
        w.on_off(Keyword::Debug, Some(true));
    }
    if let Some(class_type) = class.class_type.filter(|&class_type| Some(class_type) != layer.layer_type) {
        w.field(Keyword::Type, class_type.keyword());
    }
    if let Some(expression) = &class.expression {
        w.field(Keyword::Expression, expression);
    }
    if let Some(text) = &class.text {
        w.field(Keyword::Text, text);
    }
    w.string(Keyword::Template, class.template.as_deref());
    w.string(Keyword::KeyImage, class.keyimage.as_deref());
    w.number(Keyword::MinScale, class.min_scale, defaults.min_scale);
    w.number(Keyword::MaxScale, class.max_scale, defaults.max_scale);
    w.metadata(&class.metadata);
    for style in &class.styles {
        write_style(w, style);
    }
    if let Some(label) = &class.label {
        write_label(w, label, &Label::default());
    }
    w.close();
}

fn write_style(w: &mut BlockWriter, style: &Style) {
    let defaults = Style::default();
    w.open(Keyword::Style);
    match style.symbol_name.as_deref() {
        Some(name) => w.field(Keyword::Symbol, quote(name)),
        None => w.int(Keyword::Symbol, style.symbol as i32, 0),
    }
    w.color(Keyword::Color, style.color, defaults.color);
    w.color(Keyword::BackgroundColor, style.background_color, defaults.background_color);
    w.color(Keyword::OutlineColor, style.outline_color, defaults.outline_color);
    w.int(Keyword::Size, style.size, defaults.size);
    w.int(Keyword::MinSize, style.min_size, defaults.min_size);
    w.int(Keyword::MaxSize, style.max_size, defaults.max_size);
    w.pair(
        Keyword::Offset,
        (style.offset_x, style.offset_y),
        (defaults.offset_x, defaults.offset_y),
    );
    w.true_false(Keyword::Antialias, style.antialias, defaults.antialias);
    w.close();
}

fn write_join(w: &mut BlockWriter, join: &Join) {
    w.open(Keyword::Join);
    w.string(Keyword::Name, join.name.as_deref());
    w.string(Keyword::Table, join.table.as_deref());
    w.string(Keyword::From, join.from.as_deref());
    w.string(Keyword::To, join.to.as_deref());
    w.string(Keyword::Header, join.header.as_deref());
    w.string(Keyword::Template, join.template.as_deref());
    w.string(Keyword::Footer, join.footer.as_deref());
    w.string(Keyword::Connection, join.connection.as_deref());
    w.choice(Keyword::ConnectionType, join.connection_type, JoinConnection::Xbase);
    w.choice(Keyword::Type, join.join_type, JoinType::OneToOne);
    w.close();
}

fn write_grid(w: &mut BlockWriter, grid: &Grid) {
    w.open(Keyword::Grid);
    w.string(Keyword::LabelFormat, grid.label_format.as_deref());
    w.number(Keyword::MinArcs, grid.min_arcs, 0.0);
    w.number(Keyword::MaxArcs, grid.max_arcs, 0.0);
    w.number(Keyword::MinInterval, grid.min_interval, 0.0);
    w.number(Keyword::MaxInterval, grid.max_interval, 0.0);
    w.number(Keyword::MinSubdivide, grid.min_subdivide, 0.0);
    w.number(Keyword::MaxSubdivide, grid.max_subdivide, 0.0);
    w.close();
}

fn write_feature(w: &mut BlockWriter, feature: &Feature) {
    w.open(Keyword::Feature);
    for line in &feature.lines {
        let points: Vec<String> = line.iter().map(|p| format!("{} {}", p.x, p.y)).collect();
        w.field(Keyword::Points, format_args!("{} {}", points.join(" "), Keyword::End));
    }
    w.string(Keyword::Text, feature.text.as_deref());
    w.close();
}
