use anyhow::{Context, Result};
use geojson::{Feature, FeatureCollection, GeoJson, JsonObject, JsonValue};
use std::fs;
use std::path::{Path, PathBuf};

use crate::config::HighwayClass;

/// Writes one GeoJSON FeatureCollection per road group under
/// `<root>/<region>/<highway class>/<sanitized name>.geojson`.
///
/// Re-running replaces any file at the same path; there is no versioning.
pub struct GroupWriter {
    output_path: PathBuf,
}

impl GroupWriter {
    pub fn new<P: Into<PathBuf>>(output_path: P) -> Self {
        GroupWriter {
            output_path: output_path.into(),
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    /// Target file for one (region, highway class, name value) group.
    pub fn group_path(&self, region: &str, class: HighwayClass, name: &str) -> PathBuf {
        self.output_path
            .join(region)
            .join(class.as_str())
            .join(format!("{}.geojson", sanitize(name)))
    }

    /// Serialize the group's features (lines first, then points) with a
    /// WGS84 longitude/latitude CRS declaration, creating intermediate
    /// directories as needed.
    pub fn write_group(
        &self,
        region: &str,
        class: HighwayClass,
        name: &str,
        features: Vec<Feature>,
    ) -> Result<PathBuf> {
        let path = self.group_path(region, class, name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {:?}", parent))?;
        }

        let collection = FeatureCollection {
            bbox: None,
            features,
            foreign_members: Some(crs_member()),
        };
        let body = GeoJson::from(collection).to_string();
        fs::write(&path, body)
            .with_context(|| format!("Failed to write GeoJSON file: {:?}", path))?;
        Ok(path)
    }
}

/// Path separators and spaces are the only character classes escaped in the
/// per-group file name.
pub fn sanitize(name: &str) -> String {
    name.chars()
        .map(|c| match c {
            '/' | '\\' | ' ' => '_',
            other => other,
        })
        .collect()
}

/// Legacy `crs` member pinning the collection to WGS84 longitude/latitude.
fn crs_member() -> JsonObject {
    let mut properties = JsonObject::new();
    properties.insert(
        "name".to_string(),
        JsonValue::String("urn:ogc:def:crs:OGC:1.3:CRS84".to_string()),
    );
    let mut crs = JsonObject::new();
    crs.insert("type".to_string(), JsonValue::String("name".to_string()));
    crs.insert("properties".to_string(), JsonValue::Object(properties));

    let mut members = JsonObject::new();
    members.insert("crs".to_string(), JsonValue::Object(crs));
    members
}
