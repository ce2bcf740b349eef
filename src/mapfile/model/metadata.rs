//! Metadata tables
//!
//! Free-form key/value pairs attached to maps, layers and classes. Keys compare
//! without regard to case; insertion order is kept so output is stable.

use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Indexed by the lowercased key. Each entry keeps the key as first written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata(IndexMap<String, Entry>);

#[derive(Debug, Clone, PartialEq)]
struct Entry {
    key: String,
    value: String,
}

fn fold(key: &str) -> String {
    key.to_ascii_lowercase()
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(&fold(key)).map(|entry| entry.value.as_str())
    }

    /// Insert or replace a value, keeping the spelling of an existing key.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let folded = fold(&key);
        match self.0.get_mut(&folded) {
            Some(entry) => entry.value = value,
            None => {
                self.0.insert(folded, Entry { key, value });
            }
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.shift_remove(&fold(key)).map(|entry| entry.value)
    }

    /// Look up `name` under each OGC namespace letter in turn.
    ///
    /// `M` is `wms_`, `F` is `wfs_`, `C` is `wcs_`, `G` is `gml_` and `O` is
    /// `ows_`. The first key present wins.
    pub fn lookup_namespaced(&self, namespaces: &str, name: &str) -> Option<&str> {
        let name = fold(name);
        namespaces.chars().find_map(|letter| {
            let prefix = match letter.to_ascii_uppercase() {
                'M' => "wms_",
                'F' => "wfs_",
                'C' => "wcs_",
                'G' => "gml_",
                'O' => "ows_",
                _ => return None,
            };
            self.0
                .get(&format!("{}{}", prefix, name))
                .map(|entry| entry.value.as_str())
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0
            .values()
            .map(|entry| (entry.key.as_str(), entry.value.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_ignore_case() {
        let mut metadata = Metadata::new();
        metadata.set("WMS_Title", "Roads");
        assert_eq!(metadata.get("wms_title"), Some("Roads"));
        metadata.set("wms_title", "Streets");
        assert_eq!(metadata.len(), 1);
        assert_eq!(metadata.iter().next(), Some(("WMS_Title", "Streets")));
    }

    #[test]
    fn test_namespaced_lookup_order() {
        let mut metadata = Metadata::new();
        metadata.set("ows_title", "generic");
        metadata.set("WFS_TITLE", "features");
        assert_eq!(metadata.lookup_namespaced("MFO", "title"), Some("features"));
        assert_eq!(metadata.lookup_namespaced("mo", "Title"), Some("generic"));
        assert_eq!(metadata.lookup_namespaced("M", "title"), None);
    }

    #[test]
    fn test_remove() {
        let mut metadata = Metadata::new();
        metadata.set("a", "1");
        metadata.set("b", "2");
        assert_eq!(metadata.remove("A"), Some("1".to_string()));
        assert_eq!(metadata.remove("A"), None);
        assert_eq!(metadata.iter().collect::<Vec<_>>(), vec![("b", "2")]);
    }

    #[test]
    fn test_large_table_keeps_order_and_spelling() {
        let mut metadata = Metadata::new();
        for index in 0..2000 {
            metadata.set(format!("Key_{}", index), index.to_string());
        }
        for index in (0..2000).step_by(2) {
            metadata.set(format!("KEY_{}", index), "even");
        }
        assert_eq!(metadata.len(), 2000);
        assert_eq!(metadata.get("key_1999"), Some("1999"));
        assert_eq!(metadata.get("key_1998"), Some("even"));
        let first: Vec<_> = metadata.iter().take(2).collect();
        assert_eq!(first, vec![("Key_0", "even"), ("Key_1", "1")]);
    }

    #[test]
    fn test_serializes_with_written_keys() {
        let mut metadata = Metadata::new();
        metadata.set("WMS_Title", "Roads");
        metadata.set("ows_srs", "EPSG:4326");
        let json = serde_json::to_string(&metadata).unwrap();
        assert_eq!(json, r#"{"WMS_Title":"Roads","ows_srs":"EPSG:4326"}"#);
    }
}
