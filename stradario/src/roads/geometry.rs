use geo::{LineString, Point};
use std::collections::HashMap;

use crate::collect::overpass::{Node, Way};

/// Node id → (longitude, latitude), built from one group's node set only.
/// Node references pointing outside the group are simply not resolvable.
pub fn coordinate_lookup(nodes: &[&Node]) -> HashMap<i64, (f64, f64)> {
    nodes.iter().map(|node| (node.id, (node.lon, node.lat))).collect()
}

/// Ordered vertices of a way, skipping references that do not resolve inside
/// the group. Fewer than two vertices cannot form a line: the way is dropped
/// silently.
pub fn way_line(way: &Way, lookup: &HashMap<i64, (f64, f64)>) -> Option<LineString<f64>> {
    let coords: Vec<(f64, f64)> = way
        .nodes
        .iter()
        .filter_map(|id| lookup.get(id).copied())
        .collect();
    if coords.len() < 2 {
        return None;
    }
    Some(LineString::from(coords))
}

/// Every group node becomes a point, independent of its role in any line.
pub fn node_point(node: &Node) -> Point<f64> {
    Point::new(node.lon, node.lat)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: i64, lat: f64, lon: f64) -> Node {
        Node {
            id,
            lat,
            lon,
            tags: HashMap::new(),
        }
    }

    fn way(id: i64, nodes: Vec<i64>) -> Way {
        Way {
            id,
            nodes,
            tags: HashMap::new(),
        }
    }

    #[test]
    fn test_line_follows_reference_order() {
        let nodes = vec![node(1, 41.0, 14.0), node(2, 41.1, 14.1), node(3, 41.2, 14.2)];
        let refs: Vec<&Node> = nodes.iter().collect();
        let lookup = coordinate_lookup(&refs);

        let line = way_line(&way(100, vec![3, 1, 2]), &lookup).unwrap();
        assert_eq!(line.0.len(), 3);
        // Vertex order comes from the reference order, not node ids.
        assert_eq!((line.0[0].x, line.0[0].y), (14.2, 41.2));
        assert_eq!((line.0[1].x, line.0[1].y), (14.0, 41.0));
        assert_eq!((line.0[2].x, line.0[2].y), (14.1, 41.1));
    }

    #[test]
    fn test_unresolvable_references_are_dropped() {
        let nodes = vec![node(1, 41.0, 14.0), node(2, 41.1, 14.1)];
        let refs: Vec<&Node> = nodes.iter().collect();
        let lookup = coordinate_lookup(&refs);

        let line = way_line(&way(100, vec![1, 99, 2]), &lookup).unwrap();
        assert_eq!(line.0.len(), 2);
    }

    #[test]
    fn test_fewer_than_two_vertices_is_no_line() {
        let nodes = vec![node(1, 41.0, 14.0)];
        let refs: Vec<&Node> = nodes.iter().collect();
        let lookup = coordinate_lookup(&refs);

        assert!(way_line(&way(100, vec![1]), &lookup).is_none());
        assert!(way_line(&way(101, vec![98, 99]), &lookup).is_none());
    }

    #[test]
    fn test_point_is_longitude_latitude() {
        let point = node_point(&node(1, 41.0, 14.0));
        assert_eq!(point.x(), 14.0);
        assert_eq!(point.y(), 41.0);
    }
}
