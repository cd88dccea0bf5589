use std::collections::{BTreeSet, HashSet};

use crate::collect::overpass::{Node, RawElements, Way};

use super::naming::first_name_value;

/// Ways and nodes sharing one name value within one (region, class) query.
///
/// A node referenced by ways in two different groups appears in both; the
/// one-file-per-group output duplicates it deliberately.
#[derive(Debug)]
pub struct RoadGroup<'a> {
    pub name: String,
    pub ways: Vec<&'a Way>,
    pub nodes: Vec<&'a Node>,
}

/// Partition the raw elements into one group per name value. A name carried
/// only by standalone nodes matches no way and produces no group.
pub fn group_roads<'a>(
    name_keys: &[String],
    names: &BTreeSet<String>,
    elements: &'a RawElements,
) -> Vec<RoadGroup<'a>> {
    names
        .iter()
        .filter_map(|name| build_group(name_keys, name, elements))
        .collect()
}

fn build_group<'a>(
    name_keys: &[String],
    name: &str,
    elements: &'a RawElements,
) -> Option<RoadGroup<'a>> {
    let ways: Vec<&Way> = elements
        .ways
        .iter()
        .filter(|way| first_name_value(name_keys, &way.tags) == Some(name))
        .collect();
    if ways.is_empty() {
        return None;
    }

    let referenced: HashSet<i64> = ways
        .iter()
        .flat_map(|way| way.nodes.iter().copied())
        .collect();

    // Nodes belong to the group when a selected way references them or when
    // they independently carry the group's name value.
    let nodes: Vec<&Node> = elements
        .nodes
        .iter()
        .filter(|node| {
            referenced.contains(&node.id)
                || first_name_value(name_keys, &node.tags) == Some(name)
        })
        .collect();

    Some(RoadGroup {
        name: name.to_string(),
        ways,
        nodes,
    })
}
