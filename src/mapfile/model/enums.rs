//! Enumerated field values and the keywords that spell them

use crate::mapfile::lexer::Keyword;
use serde::Serialize;

/// A value written as a single keyword.
pub trait Symbolic: Copy + PartialEq + 'static {
    /// Every value paired with its keyword.
    const ALL: &'static [(Keyword, Self)];

    fn keyword(self) -> Keyword;
}

macro_rules! symbolic {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $keyword:ident,)+ }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum $name {
            $($variant,)+
        }

        impl Symbolic for $name {
            const ALL: &'static [(Keyword, Self)] = &[$((Keyword::$keyword, $name::$variant),)+];

            fn keyword(self) -> Keyword {
                match self {
                    $($name::$variant => Keyword::$keyword,)+
                }
            }
        }
    };
}

symbolic! {
    /// Visibility of a map, layer, class or map element.
    Status {
        Off => Off,
        On => On,
        Default => Default,
        Embed => Embed,
    }
}

impl Status {
    pub const ON_OFF: &'static [(Keyword, Status)] =
        &[(Keyword::On, Status::On), (Keyword::Off, Status::Off)];
    pub const LAYER: &'static [(Keyword, Status)] = &[
        (Keyword::On, Status::On),
        (Keyword::Off, Status::Off),
        (Keyword::Default, Status::Default),
    ];
    pub const ELEMENT: &'static [(Keyword, Status)] = &[
        (Keyword::On, Status::On),
        (Keyword::Off, Status::Off),
        (Keyword::Embed, Status::Embed),
    ];
}

symbolic! {
    Units {
        Inches => Inches,
        Feet => Feet,
        Miles => Miles,
        Meters => Meters,
        Kilometers => Kilometers,
        Dd => Dd,
        Pixels => Pixels,
    }
}

impl Units {
    pub const MAP: &'static [(Keyword, Units)] = &[
        (Keyword::Inches, Units::Inches),
        (Keyword::Feet, Units::Feet),
        (Keyword::Miles, Units::Miles),
        (Keyword::Meters, Units::Meters),
        (Keyword::Kilometers, Units::Kilometers),
        (Keyword::Dd, Units::Dd),
    ];
    pub const SCALEBAR: &'static [(Keyword, Units)] = &[
        (Keyword::Inches, Units::Inches),
        (Keyword::Feet, Units::Feet),
        (Keyword::Miles, Units::Miles),
        (Keyword::Meters, Units::Meters),
        (Keyword::Kilometers, Units::Kilometers),
    ];
}

symbolic! {
    /// Geometry type of a layer or class.
    LayerType {
        Point => Point,
        Line => Line,
        Polygon => Polygon,
        Raster => Raster,
        Annotation => Annotation,
        Query => Query,
        Circle => Circle,
    }
}

impl LayerType {
    /// Class types exclude QUERY.
    pub const CLASS: &'static [(Keyword, LayerType)] = &[
        (Keyword::Point, LayerType::Point),
        (Keyword::Line, LayerType::Line),
        (Keyword::Raster, LayerType::Raster),
        (Keyword::Polygon, LayerType::Polygon),
        (Keyword::Annotation, LayerType::Annotation),
        (Keyword::Circle, LayerType::Circle),
    ];

    /// Shape type of inline features drawn on a layer of this type.
    pub fn shape_type(self) -> ShapeType {
        match self {
            LayerType::Polygon => ShapeType::Polygon,
            LayerType::Line => ShapeType::Line,
            _ => ShapeType::Point,
        }
    }
}

symbolic! {
    ShapeType {
        Point => Point,
        Line => Line,
        Polygon => Polygon,
    }
}

symbolic! {
    /// Named bitmap font sizes.
    FontSize {
        Tiny => Tiny,
        Small => Small,
        Medium => Medium,
        Large => Large,
        Giant => Giant,
    }
}

symbolic! {
    FontType {
        TrueType => TrueType,
        Bitmap => Bitmap,
    }
}

symbolic! {
    QueryMapStyle {
        Normal => Normal,
        Hilite => Hilite,
        Selected => Selected,
    }
}

symbolic! {
    JoinType {
        OneToOne => OneToOne,
        OneToMany => OneToMany,
    }
}

symbolic! {
    /// Backend of a join table.
    JoinConnection {
        Xbase => Xbase,
        MySql => MySql,
        Oracle => Oracle,
        Postgres => Postgres,
        Csv => Csv,
    }
}

symbolic! {
    SymbolType {
        Vector => Vector,
        Ellipse => Ellipse,
        Pixmap => Pixmap,
        TrueType => TrueType,
        Simple => Simple,
        Cartoline => Cartoline,
    }
}

/// How a layer reaches its data.
///
/// `Shapefile` and `Inline` are never written: the first is the default and
/// the second follows from the presence of inline features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ConnectionType {
    Shapefile,
    Inline,
    Sde,
    Ogr,
    PostGis,
    Wms,
    OracleSpatial,
    Wfs,
    Graticule,
    MyGis,
}

impl ConnectionType {
    pub const SELECTABLE: &'static [(Keyword, ConnectionType)] = &[
        (Keyword::Sde, ConnectionType::Sde),
        (Keyword::Ogr, ConnectionType::Ogr),
        (Keyword::PostGis, ConnectionType::PostGis),
        (Keyword::Wms, ConnectionType::Wms),
        (Keyword::OracleSpatial, ConnectionType::OracleSpatial),
        (Keyword::Wfs, ConnectionType::Wfs),
        (Keyword::Graticule, ConnectionType::Graticule),
        (Keyword::MyGis, ConnectionType::MyGis),
    ];

    pub fn keyword(self) -> Option<Keyword> {
        Self::SELECTABLE
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(keyword, _)| *keyword)
    }
}

/// Anchor of a label, legend or scalebar.
///
/// `Xy` is only set internally for legend and scalebar labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Position {
    Ul,
    Lr,
    Ur,
    Ll,
    Cr,
    Cl,
    Uc,
    Lc,
    Cc,
    Auto,
    Xy,
}

impl Position {
    pub const LABEL: &'static [(Keyword, Position)] = &[
        (Keyword::Ul, Position::Ul),
        (Keyword::Uc, Position::Uc),
        (Keyword::Ur, Position::Ur),
        (Keyword::Cl, Position::Cl),
        (Keyword::Cc, Position::Cc),
        (Keyword::Cr, Position::Cr),
        (Keyword::Ll, Position::Ll),
        (Keyword::Lc, Position::Lc),
        (Keyword::Lr, Position::Lr),
        (Keyword::Auto, Position::Auto),
    ];
    pub const ELEMENT: &'static [(Keyword, Position)] = &[
        (Keyword::Ul, Position::Ul),
        (Keyword::Ur, Position::Ur),
        (Keyword::Ll, Position::Ll),
        (Keyword::Lr, Position::Lr),
        (Keyword::Uc, Position::Uc),
        (Keyword::Lc, Position::Lc),
    ];

    pub fn keyword(self) -> Option<Keyword> {
        Self::LABEL
            .iter()
            .find(|(_, value)| *value == self)
            .map(|(keyword, _)| *keyword)
    }
}

/// Pixel encoding of an output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ImageMode {
    Pc256,
    Rgb,
    Rgba,
    Int16,
    Float32,
    Byte,
}

impl ImageMode {
    const NAMES: &'static [(&'static str, ImageMode)] = &[
        ("PC256", ImageMode::Pc256),
        ("RGB", ImageMode::Rgb),
        ("RGBA", ImageMode::Rgba),
        ("INT16", ImageMode::Int16),
        ("FLOAT32", ImageMode::Float32),
        ("BYTE", ImageMode::Byte),
    ];

    pub fn parse(name: &str) -> Option<ImageMode> {
        Self::NAMES
            .iter()
            .find(|(text, _)| text.eq_ignore_ascii_case(name))
            .map(|(_, mode)| *mode)
    }

    pub fn as_str(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(_, mode)| *mode == self)
            .map(|(text, _)| *text)
            .unwrap_or("PC256")
    }

    /// Modes that carry raw data values instead of colors.
    pub fn is_raw(self) -> bool {
        matches!(self, ImageMode::Int16 | ImageMode::Float32 | ImageMode::Byte)
    }
}

/// Which rendering backend draws a format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Renderer {
    Gd,
    Swf,
    Pdf,
    Gdal,
    Imagemap,
    RawData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symbolic_keywords() {
        assert_eq!(Status::Embed.keyword(), Keyword::Embed);
        assert_eq!(JoinType::OneToMany.keyword(), Keyword::OneToMany);
        assert_eq!(Units::ALL.len(), 7);
    }

    #[test]
    fn test_internal_values_have_no_keyword() {
        assert_eq!(ConnectionType::Shapefile.keyword(), None);
        assert_eq!(ConnectionType::Inline.keyword(), None);
        assert_eq!(ConnectionType::Wms.keyword(), Some(Keyword::Wms));
        assert_eq!(Position::Xy.keyword(), None);
        assert_eq!(Position::Auto.keyword(), Some(Keyword::Auto));
    }

    #[test]
    fn test_image_mode_names() {
        assert_eq!(ImageMode::parse("rgba"), Some(ImageMode::Rgba));
        assert_eq!(ImageMode::parse("CMYK"), None);
        assert_eq!(ImageMode::Float32.as_str(), "FLOAT32");
        assert!(ImageMode::Byte.is_raw());
        assert!(!ImageMode::Rgb.is_raw());
    }

    #[test]
    fn test_shape_type_follows_layer_type() {
        assert_eq!(LayerType::Polygon.shape_type(), ShapeType::Polygon);
        assert_eq!(LayerType::Line.shape_type(), ShapeType::Line);
        assert_eq!(LayerType::Annotation.shape_type(), ShapeType::Point);
    }
}
