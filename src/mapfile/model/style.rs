//! Styles and labels

use super::enums::{FontSize, FontType, Position};
use super::geometry::Color;
use serde::Serialize;

pub const MIN_SYMBOL_SIZE: i32 = 1;
pub const MAX_SYMBOL_SIZE: i32 = 500;
pub const MIN_FONT_SIZE: i32 = 4;
pub const MAX_FONT_SIZE: i32 = 256;

/// One visual treatment applied when a class matches.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Style {
    pub color: Color,
    pub background_color: Color,
    pub outline_color: Color,
    /// Index into the map's symbol catalog. 0 is the default symbol.
    pub symbol: usize,
    /// Name given in the document, resolved to `symbol` after the parse.
    pub symbol_name: Option<String>,
    pub size: i32,
    pub min_size: i32,
    pub max_size: i32,
    pub offset_x: i32,
    pub offset_y: i32,
    pub antialias: bool,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::UNSET,
            background_color: Color::UNSET,
            outline_color: Color::UNSET,
            symbol: 0,
            symbol_name: None,
            size: 1,
            min_size: MIN_SYMBOL_SIZE,
            max_size: MAX_SYMBOL_SIZE,
            offset_x: 0,
            offset_y: 0,
            antialias: false,
        }
    }
}

/// A value that may instead be computed automatically.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum OrAuto<T> {
    Fixed(T),
    Auto,
}

impl<T> OrAuto<T> {
    pub fn is_auto(&self) -> bool {
        matches!(self, OrAuto::Auto)
    }
}

/// Size of label text: a bitmap bucket or a point size for truetype fonts.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum LabelSize {
    Named(FontSize),
    Points(i32),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Label {
    pub font: Option<String>,
    pub font_type: FontType,
    pub size: LabelSize,
    pub min_size: i32,
    pub max_size: i32,
    pub angle: OrAuto<f64>,
    pub position: Position,
    pub color: Color,
    pub outline_color: Color,
    pub shadow_color: Color,
    pub shadow_size: (i32, i32),
    pub background_color: Color,
    pub background_shadow_color: Color,
    pub background_shadow_size: (i32, i32),
    pub offset: (i32, i32),
    pub buffer: i32,
    pub min_distance: i32,
    pub min_feature_size: OrAuto<i32>,
    pub wrap: Option<char>,
    pub partials: bool,
    pub force: bool,
    pub antialias: bool,
}

impl Default for Label {
    fn default() -> Self {
        Self {
            font: None,
            font_type: FontType::Bitmap,
            size: LabelSize::Named(FontSize::Medium),
            min_size: MIN_FONT_SIZE,
            max_size: MAX_FONT_SIZE,
            angle: OrAuto::Fixed(0.0),
            position: Position::Cc,
            color: Color::BLACK,
            outline_color: Color::UNSET,
            shadow_color: Color::UNSET,
            shadow_size: (1, 1),
            background_color: Color::UNSET,
            background_shadow_color: Color::UNSET,
            background_shadow_size: (1, 1),
            offset: (0, 0),
            buffer: 0,
            min_distance: -1,
            min_feature_size: OrAuto::Fixed(-1),
            wrap: None,
            partials: true,
            force: false,
            antialias: false,
        }
    }
}

impl Label {
    /// Label of a legend or scalebar, placed by the element itself.
    pub fn for_element() -> Self {
        Self {
            position: Position::Xy,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_defaults() {
        let style = Style::default();
        assert_eq!(style.size, 1);
        assert_eq!(style.symbol, 0);
        assert!(!style.color.is_set());
    }

    #[test]
    fn test_label_defaults() {
        let label = Label::default();
        assert_eq!(label.size, LabelSize::Named(FontSize::Medium));
        assert_eq!(label.position, Position::Cc);
        assert_eq!(label.color, Color::BLACK);
        assert!(label.partials);
        assert_eq!(Label::for_element().position, Position::Xy);
    }
}
