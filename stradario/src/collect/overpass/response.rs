use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Decoded body of an Overpass `[out:json]` response.
#[derive(Debug, Deserialize)]
pub struct OverpassResponse {
    #[serde(default)]
    pub elements: Vec<OverpassElement>,
}

/// One entry of the `elements` array. Relations only ever carry ids here
/// because the boundary lookup requests `out ids`.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum OverpassElement {
    Node {
        id: i64,
        lat: f64,
        lon: f64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Way {
        id: i64,
        #[serde(default)]
        nodes: Vec<i64>,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
    Relation {
        id: i64,
        #[serde(default)]
        tags: HashMap<String, String>,
    },
}

/// An OSM way: ordered node references plus tags. The reference order defines
/// the vertex order of the line.
#[derive(Debug, Clone, Serialize)]
pub struct Way {
    pub id: i64,
    pub nodes: Vec<i64>,
    pub tags: HashMap<String, String>,
}

/// An OSM node: WGS84 coordinates plus optional tags.
#[derive(Debug, Clone, Serialize)]
pub struct Node {
    pub id: i64,
    pub lat: f64,
    pub lon: f64,
    pub tags: HashMap<String, String>,
}

/// Ways and nodes returned by one (area, highway class) query. Read-only
/// downstream of the fetch.
#[derive(Debug, Default, Serialize)]
pub struct RawElements {
    pub ways: Vec<Way>,
    pub nodes: Vec<Node>,
}

impl RawElements {
    /// Partition a decoded response into ways and nodes, keeping response
    /// order. Relations are not part of the highway query result.
    pub fn from_response(response: OverpassResponse) -> Self {
        let mut elements = RawElements::default();
        for element in response.elements {
            match element {
                OverpassElement::Way { id, nodes, tags } => {
                    elements.ways.push(Way { id, nodes, tags });
                }
                OverpassElement::Node { id, lat, lon, tags } => {
                    elements.nodes.push(Node { id, lat, lon, tags });
                }
                OverpassElement::Relation { .. } => {}
            }
        }
        elements
    }

    pub fn is_empty(&self) -> bool {
        self.ways.is_empty() && self.nodes.is_empty()
    }
}

impl OverpassResponse {
    /// Relation ids present in the response, in response order.
    pub fn relation_ids(&self) -> Vec<i64> {
        self.elements
            .iter()
            .filter_map(|element| match element {
                OverpassElement::Relation { id, .. } => Some(*id),
                _ => None,
            })
            .collect()
    }
}
