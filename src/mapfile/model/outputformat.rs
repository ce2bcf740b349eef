//! Output formats
//!
//! A format names a driver and the pixel encoding it writes. Formats declared
//! in the document are flagged `in_mapfile`; the library defaults added after
//! the parse are not, and are never written back.

use super::enums::{ImageMode, Renderer};
use crate::mapfile::error::{MapfileError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputFormat {
    pub name: String,
    pub mime_type: Option<String>,
    pub driver: String,
    pub extension: Option<String>,
    pub renderer: Renderer,
    pub image_mode: ImageMode,
    pub transparent: bool,
    /// `KEY=VALUE` driver options.
    pub options: Vec<String>,
    pub in_mapfile: bool,
}

impl OutputFormat {
    fn new(name: &str, driver: &str, mime_type: &str, extension: &str, image_mode: ImageMode, renderer: Renderer) -> Self {
        Self {
            name: name.to_string(),
            mime_type: Some(mime_type.to_string()),
            driver: driver.to_string(),
            extension: Some(extension.to_string()),
            renderer,
            image_mode,
            transparent: false,
            options: Vec::new(),
            in_mapfile: false,
        }
    }

    /// The default format a driver produces, or `None` for an unknown driver.
    ///
    /// `GD/PC256` is an alias of `GD/GIF`. `GDAL/<name>` formats are named
    /// after the GDAL driver.
    pub fn from_driver(driver: &str) -> Option<OutputFormat> {
        let format = match driver.to_ascii_uppercase().as_str() {
            "GD/PC256" | "GD/GIF" => {
                Self::new("gif", "GD/GIF", "image/gif", "gif", ImageMode::Pc256, Renderer::Gd)
            }
            "GD/PNG" => Self::new("png", "GD/PNG", "image/png", "png", ImageMode::Pc256, Renderer::Gd),
            "GD/PNG24" => Self::new("png24", "GD/PNG", "image/png", "png", ImageMode::Rgb, Renderer::Gd),
            "GD/JPEG" => Self::new("jpeg", "GD/JPEG", "image/jpeg", "jpg", ImageMode::Rgb, Renderer::Gd),
            "GD/WBMP" => Self::new("wbmp", "GD/WBMP", "image/wbmp", "wbmp", ImageMode::Pc256, Renderer::Gd),
            "SWF" => Self::new(
                "swf",
                "swf",
                "application/x-shockwave-flash",
                "swf",
                ImageMode::Pc256,
                Renderer::Swf,
            ),
            "PDF" => Self::new("pdf", "pdf", "application/x-pdf", "pdf", ImageMode::Pc256, Renderer::Pdf),
            "IMAGEMAP" => Self::new(
                "imagemap",
                "imagemap",
                "text/html",
                "html",
                ImageMode::Pc256,
                Renderer::Imagemap,
            ),
            upper if upper.starts_with("GDAL/") && driver.len() > 5 => {
                let gdal_name = &driver[5..];
                let (mime_type, extension) = match gdal_name.to_ascii_uppercase().as_str() {
                    "GTIFF" => ("image/tiff", "tif"),
                    "PNG" => ("image/png", "png"),
                    "JPEG" => ("image/jpeg", "jpg"),
                    "AAIGRID" => ("text/plain", "grd"),
                    _ => ("application/octet-stream", "dat"),
                };
                Self::new(gdal_name, driver, mime_type, extension, ImageMode::Rgb, Renderer::Gdal)
            }
            _ => return None,
        };
        Some(format)
    }

    /// Value of a `KEY=VALUE` option, or `default` when absent.
    pub fn option<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.options
            .iter()
            .find_map(|option| split_option(option, key))
            .unwrap_or(default)
    }

    /// Replace an option in place, or append it.
    pub fn set_option(&mut self, key: &str, value: &str) {
        let line = format!("{}={}", key, value);
        match self
            .options
            .iter_mut()
            .find(|option| split_option(option, key).is_some())
        {
            Some(slot) => *slot = line,
            None => self.options.push(line),
        }
    }

    /// Transparency must agree with an RGB or RGBA image mode.
    pub fn validate(&self) -> Result<()> {
        let routine = "validate_output_format";
        if self.transparent && self.image_mode == ImageMode::Rgb {
            return Err(MapfileError::misc(
                routine,
                format!(
                    "OUTPUTFORMAT {} has TRANSPARENT set ON, but an IMAGEMODE of RGB instead of RGBA.",
                    self.name
                ),
            ));
        }
        if !self.transparent && self.image_mode == ImageMode::Rgba {
            return Err(MapfileError::misc(
                routine,
                format!(
                    "OUTPUTFORMAT {} has TRANSPARENT set OFF, but an IMAGEMODE of RGBA instead of RGB.",
                    self.name
                ),
            ));
        }
        Ok(())
    }

    /// A copy with the map-level overrides applied.
    ///
    /// Transparency promotes RGB to RGBA. Quality and interlacing are stored
    /// as `QUALITY` and `INTERLACE` options, written only when they change.
    pub fn with_overrides(&self, transparent: Option<bool>, interlace: Option<bool>, quality: Option<i32>) -> OutputFormat {
        let mut format = self.clone();

        if let Some(transparent) = transparent {
            if transparent != format.transparent {
                format.transparent = transparent;
                if transparent && format.image_mode == ImageMode::Rgb {
                    format.image_mode = ImageMode::Rgba;
                }
            }
        }

        if let Some(quality) = quality {
            let current: i32 = format.option("QUALITY", "75").trim().parse().unwrap_or(75);
            if current != quality {
                format.set_option("QUALITY", &quality.to_string());
            }
        }

        if let Some(interlace) = interlace {
            let current = !format.option("INTERLACE", "ON").eq_ignore_ascii_case("OFF");
            if current != interlace {
                format.set_option("INTERLACE", if interlace { "ON" } else { "OFF" });
            }
        }

        format
    }
}

fn split_option<'a>(option: &'a str, key: &str) -> Option<&'a str> {
    let (name, value) = option.split_once('=')?;
    name.eq_ignore_ascii_case(key).then_some(value)
}

/// Names of the formats every map offers, with their drivers.
pub const DEFAULT_FORMATS: &[(&str, &str)] = &[
    ("gif", "GD/GIF"),
    ("png", "GD/PNG"),
    ("png24", "GD/PNG24"),
    ("jpeg", "GD/JPEG"),
    ("wbmp", "GD/WBMP"),
    ("swf", "swf"),
    ("imagemap", "imagemap"),
    ("pdf", "pdf"),
    ("GTiff", "GDAL/GTiff"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("GD/PNG", "png", "image/png")]
    #[case("gd/pc256", "gif", "image/gif")]
    #[case("GD/PNG24", "png24", "image/png")]
    #[case("GDAL/GTiff", "GTiff", "image/tiff")]
    #[case("imagemap", "imagemap", "text/html")]
    fn test_default_formats(#[case] driver: &str, #[case] name: &str, #[case] mime: &str) {
        let format = OutputFormat::from_driver(driver).unwrap();
        assert_eq!(format.name, name);
        assert_eq!(format.mime_type.as_deref(), Some(mime));
        assert!(!format.in_mapfile);
    }

    #[test]
    fn test_unknown_driver() {
        assert!(OutputFormat::from_driver("GD/BMP").is_none());
        assert!(OutputFormat::from_driver("GDAL/").is_none());
    }

    #[test]
    fn test_options() {
        let mut format = OutputFormat::from_driver("GD/JPEG").unwrap();
        assert_eq!(format.option("QUALITY", "75"), "75");
        format.set_option("QUALITY", "90");
        format.set_option("quality", "80");
        assert_eq!(format.options, vec!["quality=80"]);
        assert_eq!(format.option("Quality", "75"), "80");
    }

    #[test]
    fn test_validate_transparency_against_mode() {
        let mut format = OutputFormat::from_driver("GD/PNG24").unwrap();
        format.transparent = true;
        assert!(format.validate().is_err());
        format.image_mode = ImageMode::Rgba;
        assert!(format.validate().is_ok());
        format.transparent = false;
        assert!(format.validate().is_err());
    }

    #[test]
    fn test_overrides_promote_rgb() {
        let format = OutputFormat::from_driver("GD/PNG24").unwrap();
        let applied = format.with_overrides(Some(true), Some(false), Some(75));
        assert!(applied.transparent);
        assert_eq!(applied.image_mode, ImageMode::Rgba);
        assert_eq!(applied.options, vec!["INTERLACE=OFF"]);
        assert_eq!(format.image_mode, ImageMode::Rgb);
    }
}
