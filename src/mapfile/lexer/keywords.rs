//! Keyword table
//!
//! Keywords are matched case-insensitively against bare words. Quoted text is
//! never a keyword.

use once_cell::sync::Lazy;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

macro_rules! keywords {
    ($($variant:ident => $text:literal,)+) => {
        /// Every reserved word of the map definition language.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
        pub enum Keyword {
            $($variant,)+
        }

        impl Keyword {
            pub const ALL: &'static [Keyword] = &[$(Keyword::$variant,)+];

            /// Canonical upper-case spelling.
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Keyword::$variant => $text,)+
                }
            }
        }
    };
}

keywords! {
    AlphaColor => "ALPHACOLOR",
    Angle => "ANGLE",
    Annotation => "ANNOTATION",
    Antialias => "ANTIALIAS",
    Auto => "AUTO",
    BackgroundColor => "BACKGROUNDCOLOR",
    BackgroundShadowColor => "BACKGROUNDSHADOWCOLOR",
    BackgroundShadowSize => "BACKGROUNDSHADOWSIZE",
    Bitmap => "BITMAP",
    Buffer => "BUFFER",
    Cartoline => "CARTOLINE",
    Cc => "CC",
    Character => "CHARACTER",
    Circle => "CIRCLE",
    Cl => "CL",
    Class => "CLASS",
    ClassItem => "CLASSITEM",
    Color => "COLOR",
    Config => "CONFIG",
    Connection => "CONNECTION",
    ConnectionType => "CONNECTIONTYPE",
    Cr => "CR",
    Csv => "CSV",
    Data => "DATA",
    DataPattern => "DATAPATTERN",
    Dd => "DD",
    Debug => "DEBUG",
    Default => "DEFAULT",
    Driver => "DRIVER",
    Dump => "DUMP",
    Ellipse => "ELLIPSE",
    Embed => "EMBED",
    Empty => "EMPTY",
    End => "END",
    Error => "ERROR",
    Expression => "EXPRESSION",
    Extension => "EXTENSION",
    Extent => "EXTENT",
    False => "FALSE",
    Feature => "FEATURE",
    Feet => "FEET",
    Filled => "FILLED",
    Filter => "FILTER",
    FilterItem => "FILTERITEM",
    Font => "FONT",
    FontSet => "FONTSET",
    Footer => "FOOTER",
    Force => "FORCE",
    FormatOption => "FORMATOPTION",
    From => "FROM",
    Gap => "GAP",
    Giant => "GIANT",
    Graticule => "GRATICULE",
    Grid => "GRID",
    Group => "GROUP",
    Header => "HEADER",
    Hilite => "HILITE",
    Image => "IMAGE",
    ImageColor => "IMAGECOLOR",
    ImageMode => "IMAGEMODE",
    ImagePath => "IMAGEPATH",
    ImageQuality => "IMAGEQUALITY",
    ImageType => "IMAGETYPE",
    ImageUrl => "IMAGEURL",
    Inches => "INCHES",
    Interlace => "INTERLACE",
    Intervals => "INTERVALS",
    Join => "JOIN",
    KeyImage => "KEYIMAGE",
    KeySize => "KEYSIZE",
    KeySpacing => "KEYSPACING",
    Kilometers => "KILOMETERS",
    Label => "LABEL",
    LabelAngleItem => "LABELANGLEITEM",
    LabelCache => "LABELCACHE",
    LabelFormat => "LABELFORMAT",
    LabelItem => "LABELITEM",
    LabelMaxScale => "LABELMAXSCALE",
    LabelMinScale => "LABELMINSCALE",
    LabelRequires => "LABELREQUIRES",
    LabelSizeItem => "LABELSIZEITEM",
    Large => "LARGE",
    LatLon => "LATLON",
    Layer => "LAYER",
    Lc => "LC",
    Legend => "LEGEND",
    Line => "LINE",
    Ll => "LL",
    Log => "LOG",
    Lr => "LR",
    Map => "MAP",
    Marker => "MARKER",
    MarkerSize => "MARKERSIZE",
    MaxArcs => "MAXARCS",
    MaxBoxSize => "MAXBOXSIZE",
    MaxFeatures => "MAXFEATURES",
    MaxInterval => "MAXINTERVAL",
    MaxScale => "MAXSCALE",
    MaxSize => "MAXSIZE",
    MaxSubdivide => "MAXSUBDIVIDE",
    MaxTemplate => "MAXTEMPLATE",
    Medium => "MEDIUM",
    Metadata => "METADATA",
    Meters => "METERS",
    Miles => "MILES",
    MimeType => "MIMETYPE",
    MinArcs => "MINARCS",
    MinBoxSize => "MINBOXSIZE",
    MinDistance => "MINDISTANCE",
    MinFeatureSize => "MINFEATURESIZE",
    MinInterval => "MININTERVAL",
    MinScale => "MINSCALE",
    MinSize => "MINSIZE",
    MinSubdivide => "MINSUBDIVIDE",
    MinTemplate => "MINTEMPLATE",
    MyGis => "MYGIS",
    MySql => "MYSQL",
    Name => "NAME",
    Normal => "NORMAL",
    Off => "OFF",
    Offset => "OFFSET",
    Offsite => "OFFSITE",
    Ogr => "OGR",
    On => "ON",
    OneToMany => "ONE-TO-MANY",
    OneToOne => "ONE-TO-ONE",
    Oracle => "ORACLE",
    OracleSpatial => "ORACLESPATIAL",
    OutlineColor => "OUTLINECOLOR",
    OutputFormat => "OUTPUTFORMAT",
    OverlayBackgroundColor => "OVERLAYBACKGROUNDCOLOR",
    OverlayColor => "OVERLAYCOLOR",
    OverlayMaxSize => "OVERLAYMAXSIZE",
    OverlayMinSize => "OVERLAYMINSIZE",
    OverlayOutlineColor => "OVERLAYOUTLINECOLOR",
    OverlaySize => "OVERLAYSIZE",
    OverlaySymbol => "OVERLAYSYMBOL",
    Partials => "PARTIALS",
    Pixels => "PIXELS",
    Pixmap => "PIXMAP",
    Point => "POINT",
    Points => "POINTS",
    Polygon => "POLYGON",
    Position => "POSITION",
    PostGis => "POSTGIS",
    Postgres => "POSTGRES",
    PostLabelCache => "POSTLABELCACHE",
    Processing => "PROCESSING",
    Projection => "PROJECTION",
    Query => "QUERY",
    QueryFormat => "QUERYFORMAT",
    QueryMap => "QUERYMAP",
    Raster => "RASTER",
    Reference => "REFERENCE",
    Requires => "REQUIRES",
    Resolution => "RESOLUTION",
    Scale => "SCALE",
    Scalebar => "SCALEBAR",
    Sde => "SDE",
    Selected => "SELECTED",
    ShadowColor => "SHADOWCOLOR",
    ShadowSize => "SHADOWSIZE",
    ShapePath => "SHAPEPATH",
    Simple => "SIMPLE",
    Size => "SIZE",
    SizeUnits => "SIZEUNITS",
    Small => "SMALL",
    Status => "STATUS",
    Style => "STYLE",
    StyleItem => "STYLEITEM",
    Symbol => "SYMBOL",
    SymbolScale => "SYMBOLSCALE",
    SymbolSet => "SYMBOLSET",
    Table => "TABLE",
    Template => "TEMPLATE",
    TemplatePattern => "TEMPLATEPATTERN",
    Text => "TEXT",
    TileIndex => "TILEINDEX",
    TileItem => "TILEITEM",
    Tiny => "TINY",
    Title => "TITLE",
    To => "TO",
    Tolerance => "TOLERANCE",
    ToleranceUnits => "TOLERANCEUNITS",
    Transform => "TRANSFORM",
    Transparency => "TRANSPARENCY",
    Transparent => "TRANSPARENT",
    True => "TRUE",
    TrueType => "TRUETYPE",
    Type => "TYPE",
    Uc => "UC",
    Ul => "UL",
    Units => "UNITS",
    Ur => "UR",
    Vector => "VECTOR",
    Web => "WEB",
    Wfs => "WFS",
    Wms => "WMS",
    Wrap => "WRAP",
    Xbase => "XBASE",
}

static KEYWORD_TABLE: Lazy<HashMap<&'static str, Keyword>> = Lazy::new(|| {
    Keyword::ALL
        .iter()
        .map(|keyword| (keyword.as_str(), *keyword))
        .collect()
});

impl Keyword {
    /// Look up a bare word, ignoring case.
    pub fn lookup(word: &str) -> Option<Keyword> {
        KEYWORD_TABLE.get(word.to_ascii_uppercase().as_str()).copied()
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
