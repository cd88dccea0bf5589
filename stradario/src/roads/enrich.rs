use geojson::JsonObject;
use serde_json::Value;
use std::collections::HashMap;

/// Native tags merged over the default schema: every schema key is present in
/// the output, as JSON null unless the element carries it. Never overwrites a
/// native value. Applied identically to line and point features.
///
/// Native keys are inserted in sorted order so identical input serializes to
/// identical bytes.
pub fn enrich_tags(tags: &HashMap<String, String>, default_schema: &[String]) -> JsonObject {
    let mut properties = JsonObject::new();
    let mut keys: Vec<&String> = tags.keys().collect();
    keys.sort();
    for key in keys {
        properties.insert(key.clone(), Value::String(tags[key].clone()));
    }
    for key in default_schema {
        properties.entry(key.clone()).or_insert(Value::Null);
    }
    properties
}
