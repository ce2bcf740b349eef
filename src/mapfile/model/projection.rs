//! Projection definitions
//!
//! A projection is kept as its ordered list of proj arguments. Nothing here
//! transforms coordinates; definitions are only split, checked and written.

use crate::mapfile::error::{ErrorKind, MapfileError, Result};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Projection {
    pub args: Vec<String>,
}

fn projection_error(routine: &'static str, message: impl Into<String>) -> MapfileError {
    MapfileError::new(ErrorKind::Projection, routine, message)
}

impl Projection {
    pub fn new(args: Vec<String>) -> Self {
        Self { args }
    }

    /// The map's geographic reference system.
    pub fn latlong() -> Self {
        Self::new(vec!["proj=latlong".into(), "ellps=WGS84".into()])
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    /// Split a one-line definition into arguments and validate it.
    ///
    /// `+proj=utm +zone=11` splits on `+` with whitespace removed, `AUTO:...`
    /// stays whole and anything else splits on commas.
    pub fn from_definition(definition: &str, max_args: usize) -> Result<Self> {
        let args: Vec<String> = if let Some(rest) = definition.strip_prefix('+') {
            let trimmed: String = rest.chars().filter(|c| !c.is_whitespace()).collect();
            trimmed.split('+').map(str::to_string).collect()
        } else if starts_with_ignore_case(definition, "AUTO:") {
            vec![definition.to_string()]
        } else {
            definition.split(',').map(str::to_string).collect()
        };

        let projection = Self::new(args);
        projection.check_arg_count(max_args, "load_projection_string")?;
        projection.validate()?;
        Ok(projection)
    }

    pub(crate) fn check_arg_count(&self, max_args: usize, routine: &'static str) -> Result<()> {
        if self.args.len() > max_args {
            return Err(MapfileError::capacity(
                routine,
                format!("Too many projection arguments, only {} allowed.", max_args),
            ));
        }
        Ok(())
    }

    /// Reject unsupported forms. An empty projection is valid.
    pub fn validate(&self) -> Result<()> {
        let Some(first) = self.args.first() else {
            return Ok(());
        };
        if first.eq_ignore_ascii_case("GEOGRAPHIC") {
            return Err(projection_error(
                "process_projection",
                "PROJECTION 'GEOGRAPHIC' no longer supported. Provide explicit definition, ie. proj=latlong ellps=clrk66",
            ));
        }
        if starts_with_ignore_case(first, "AUTO:") {
            self.auto_definition()?;
        }
        Ok(())
    }

    /// Whether the projection is taken from the request at run time.
    pub fn is_auto(&self) -> bool {
        self.args
            .first()
            .map(|first| first.eq_ignore_ascii_case("AUTO"))
            .unwrap_or(false)
    }

    /// Proj arguments of an `AUTO:proj_id,units_id,lon0,lat0` definition.
    pub fn auto_definition(&self) -> Result<Vec<String>> {
        let routine = "process_auto_projection";
        let definition = self.args.first().map(String::as_str).unwrap_or("");
        let parts: Vec<&str> = definition.split(',').collect();
        if parts.len() != 4 || !starts_with_ignore_case(parts[0], "AUTO:") {
            return Err(projection_error(
                routine,
                format!(
                    "WMS/WFS AUTO PROJECTION must be in the format 'AUTO:proj_id,units_id,lon0,lat0' (got '{}').",
                    definition
                ),
            ));
        }

        let proj_id: i64 = parts[0][5..].trim().parse().unwrap_or(0);
        let units_id: i64 = parts[1].trim().parse().unwrap_or(0);
        let lon0: f64 = parts[2].trim().parse().unwrap_or(0.0);
        let lat0: f64 = parts[3].trim().parse().unwrap_or(0.0);

        if units_id != 9001 {
            return Err(projection_error(
                routine,
                format!("WMS/WFS AUTO PROJECTION: EPSG Units {} not supported.", units_id),
            ));
        }

        let false_northing = if lat0 >= 0.0 { 0.0 } else { 10_000_000.0 };
        let definition = match proj_id {
            42001 => {
                let zone = ((lon0 + 180.0) / 6.0).floor() + 1.0;
                format!(
                    "proj=tmerc+lat_0=0+lon_0={}+k=0.999600+x_0=500000+y_0={}+ellps=WGS84+datum=WGS84+units=m",
                    -183.0 + zone * 6.0,
                    false_northing
                )
            }
            42002 => format!(
                "proj=tmerc+lat_0=0+lon_0={}+k=0.999600+x_0=500000+y_0={}+ellps=WGS84+datum=WGS84+units=m",
                lon0, false_northing
            ),
            42003 => format!(
                "proj=ortho+lon_0={}+lat_0={}+x_0=0+y_0=0+ellps=WGS84+datum=WGS84+units=m",
                lon0, lat0
            ),
            42004 => format!(
                "proj=eqc+lon_ts={}+lat_ts={}+x_0=0+y_0=0+ellps=WGS84+datum=WGS84+units=m",
                lon0, lat0
            ),
            42005 => format!(
                "proj=moll+lon_0={}+x_0=0+y_0=0+ellps=WGS84+datum=WGS84+units=m",
                lon0
            ),
            other => {
                return Err(projection_error(
                    routine,
                    format!("WMS/WFS AUTO PROJECTION {} not supported.", other),
                ))
            }
        };

        Ok(definition.split('+').map(str::to_string).collect())
    }
}

fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.len() >= prefix.len()
        && text.is_char_boundary(prefix.len())
        && text[..prefix.len()].eq_ignore_ascii_case(prefix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("+proj=utm +zone=11 +ellps=WGS84", &["proj=utm", "zone=11", "ellps=WGS84"])]
    #[case("proj=utm,zone=11", &["proj=utm", "zone=11"])]
    #[case("AUTO:42001,9001,-100,45", &["AUTO:42001,9001,-100,45"])]
    #[case("init=epsg:4326", &["init=epsg:4326"])]
    fn test_definition_forms(#[case] definition: &str, #[case] expected: &[&str]) {
        let projection = Projection::from_definition(definition, 20).unwrap();
        assert_eq!(projection.args, expected);
    }

    #[test]
    fn test_geographic_rejected() {
        let err = Projection::from_definition("GEOGRAPHIC", 20).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Projection);
    }

    #[test]
    fn test_bare_auto_is_valid() {
        let projection = Projection::new(vec!["AUTO".into()]);
        assert!(projection.validate().is_ok());
        assert!(projection.is_auto());
    }

    #[rstest]
    #[case("AUTO:42001,9001,-100")]
    #[case("AUTO:42001,9002,-100,45")]
    #[case("AUTO:41000,9001,-100,45")]
    fn test_bad_auto_definitions(#[case] definition: &str) {
        let err = Projection::from_definition(definition, 20).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Projection);
    }

    #[test]
    fn test_auto_utm_zone() {
        let projection = Projection::new(vec!["AUTO:42001,9001,-100,45".into()]);
        let args = projection.auto_definition().unwrap();
        assert_eq!(args[0], "proj=tmerc");
        assert!(args.contains(&"lon_0=-99".to_string()));
        assert!(args.contains(&"y_0=0".to_string()));
    }

    #[test]
    fn test_too_many_args() {
        let err = Projection::from_definition("a,b,c", 2).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Capacity);
    }
}
