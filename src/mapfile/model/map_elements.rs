//! Map elements drawn around the map image: legend, scalebar, query map and
//! reference map

use super::enums::{Position, QueryMapStyle, Status, Units};
use super::geometry::{Color, Rect};
use super::style::Label;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub image_color: Color,
    pub outline_color: Color,
    pub label: Label,
    pub key_size: (i32, i32),
    pub key_spacing: (i32, i32),
    pub status: Status,
    pub position: Position,
    pub transparent: Option<bool>,
    pub interlace: Option<bool>,
    pub post_label_cache: bool,
    pub template: Option<String>,
}

impl Default for Legend {
    fn default() -> Self {
        Self {
            image_color: Color::WHITE,
            outline_color: Color::UNSET,
            label: Label::for_element(),
            key_size: (20, 10),
            key_spacing: (5, 5),
            status: Status::Off,
            position: Position::Ll,
            transparent: None,
            interlace: None,
            post_label_cache: false,
            template: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scalebar {
    pub image_color: Color,
    pub background_color: Color,
    pub color: Color,
    pub outline_color: Color,
    pub label: Label,
    pub size: (i32, i32),
    pub style: i32,
    pub intervals: i32,
    pub units: Units,
    pub status: Status,
    pub position: Position,
    pub transparent: Option<bool>,
    pub interlace: Option<bool>,
    pub post_label_cache: bool,
}

impl Default for Scalebar {
    fn default() -> Self {
        Self {
            image_color: Color::WHITE,
            background_color: Color::UNSET,
            color: Color::BLACK,
            outline_color: Color::UNSET,
            label: Label::for_element(),
            size: (200, 3),
            style: 0,
            intervals: 4,
            units: Units::Miles,
            status: Status::Off,
            position: Position::Ll,
            transparent: None,
            interlace: None,
            post_label_cache: false,
        }
    }
}

/// How query results are highlighted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryMap {
    pub size: (i32, i32),
    pub style: QueryMapStyle,
    pub status: Status,
    pub color: Color,
}

impl Default for QueryMap {
    fn default() -> Self {
        Self {
            size: (-1, -1),
            style: QueryMapStyle::Hilite,
            status: Status::Off,
            color: Color::rgb(255, 255, 0),
        }
    }
}

/// Overview image showing the current extent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReferenceMap {
    pub image: Option<String>,
    pub size: (i32, i32),
    pub extent: Rect,
    pub color: Color,
    pub outline_color: Color,
    pub status: Status,
    pub marker: usize,
    pub marker_name: Option<String>,
    pub marker_size: i32,
    pub min_box_size: i32,
    pub max_box_size: i32,
}

impl Default for ReferenceMap {
    fn default() -> Self {
        Self {
            image: None,
            size: (0, 0),
            extent: Rect::UNSET,
            color: Color::rgb(255, 0, 0),
            outline_color: Color::BLACK,
            status: Status::Off,
            marker: 0,
            marker_name: None,
            marker_size: 0,
            min_box_size: 3,
            max_box_size: 0,
        }
    }
}
