//! Object model of a map definition
//!
//! Everything is owned by a single [`MapDefinition`]. Back-references from a
//! layer or class to its owner are stored as indexes. Every entity starts from
//! its documented defaults via `Default` or `new`.

pub mod class;
pub mod enums;
pub mod expression;
pub mod feature;
pub mod geometry;
pub mod join;
pub mod layer;
pub mod map;
pub mod map_elements;
pub mod metadata;
pub mod outputformat;
pub mod projection;
pub mod style;
pub mod symbols;
pub mod web;

pub use class::Class;
pub use enums::{
    ConnectionType, FontSize, FontType, ImageMode, JoinConnection, JoinType, LayerType, Position,
    QueryMapStyle, Renderer, ShapeType, Status, SymbolType, Symbolic, Units,
};
pub use expression::{Expression, ExpressionKind};
pub use feature::{Feature, Grid};
pub use geometry::{Color, Point, Rect};
pub use join::Join;
pub use layer::Layer;
pub use map::MapDefinition;
pub use map_elements::{Legend, QueryMap, ReferenceMap, Scalebar};
pub use metadata::Metadata;
pub use outputformat::OutputFormat;
pub use projection::Projection;
pub use style::{Label, LabelSize, OrAuto, Style};
pub use symbols::{FontCatalog, Symbol, SymbolCatalog};
pub use web::Web;
