use super::geometry::Rect;
use super::metadata::Metadata;
use serde::Serialize;

/// Web interface settings: templates, image locations and service metadata.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Web {
    pub extent: Rect,
    pub template: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub error: Option<String>,
    pub empty: Option<String>,
    pub min_template: Option<String>,
    pub max_template: Option<String>,
    pub log: Option<String>,
    pub min_scale: f64,
    pub max_scale: f64,
    pub image_path: String,
    pub image_url: String,
    pub query_format: String,
    pub metadata: Metadata,
}

impl Default for Web {
    fn default() -> Self {
        Self {
            extent: Rect::UNSET,
            template: None,
            header: None,
            footer: None,
            error: None,
            empty: None,
            min_template: None,
            max_template: None,
            log: None,
            min_scale: -1.0,
            max_scale: -1.0,
            image_path: String::new(),
            image_url: String::new(),
            query_format: "text/html".to_string(),
            metadata: Metadata::new(),
        }
    }
}
