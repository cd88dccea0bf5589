use std::collections::{BTreeSet, HashMap};

use crate::collect::overpass::Way;

/// Scan tags against the priority-ordered name keys; the first present key
/// wins, so an element yields at most one name value even when several name
/// keys are set.
///
/// Indexing and grouping both go through this function so the two can never
/// disagree on which group an element belongs to.
pub fn first_name_value<'a>(
    name_keys: &[String],
    tags: &'a HashMap<String, String>,
) -> Option<&'a str> {
    name_keys
        .iter()
        .find_map(|key| tags.get(key).map(String::as_str))
}

/// Distinct name values across all ways, sorted. An empty set is a valid
/// result, not an error.
pub fn index_names(name_keys: &[String], ways: &[Way]) -> BTreeSet<String> {
    ways.iter()
        .filter_map(|way| first_name_value(name_keys, &way.tags))
        .map(String::from)
        .collect()
}
