use anyhow::{Context, Result};
use geojson::{Feature, Geometry, Value};
use std::collections::HashMap;
use std::fs;
use std::thread;

use crate::collect::overpass::{OverpassCollect, RawElements};
use crate::config::{HighwayClass, PipelineConfig, Region};
use crate::roads::enrich::enrich_tags;
use crate::roads::geometry;
use crate::roads::group::{group_roads, RoadGroup};
use crate::roads::naming::index_names;
use crate::roads::writer::GroupWriter;

/// Counters for one pipeline run.
#[derive(Debug, Default, Clone)]
pub struct RunSummary {
    pub files_written: usize,
    pub regions_skipped: usize,
    pub fetches_skipped: usize,
    pub groups_failed: usize,
}

/// Sequential extraction pipeline: regions outer, highway classes inner.
///
/// Resolution and fetch failures abort only their own unit of work; a failure
/// while writing one name group does not abort its siblings. The two
/// configured delays are the only pauses between Overpass requests.
pub struct RoadNetwork {
    config: PipelineConfig,
    collect: OverpassCollect,
    writer: GroupWriter,
    /// Region name → area id. A region is resolved at most once per run;
    /// `None` marks a region that failed resolution and stays unusable.
    resolved: HashMap<String, Option<i64>>,
    dump_raw: bool,
}

impl RoadNetwork {
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let collect = OverpassCollect::new()?;
        Ok(Self::with_collect(config, collect))
    }

    /// Build the pipeline around an existing client, e.g. one pointed at an
    /// alternative Overpass instance.
    pub fn with_collect(config: PipelineConfig, collect: OverpassCollect) -> Self {
        let writer = GroupWriter::new(config.output_path.clone());
        RoadNetwork {
            config,
            collect,
            writer,
            resolved: HashMap::new(),
            dump_raw: false,
        }
    }

    /// Keep a JSON snapshot of every raw query result next to the group files.
    pub fn set_dump_raw(&mut self, dump_raw: bool) {
        self.dump_raw = dump_raw;
    }

    pub fn run(&mut self) -> Result<RunSummary> {
        let mut summary = RunSummary::default();
        let regions = self.config.regions.clone();
        let classes = self.config.highway_classes.clone();

        for region in &regions {
            let area_id = match self.resolve(region) {
                Some(area_id) => area_id,
                None => {
                    summary.regions_skipped += 1;
                    continue;
                }
            };
            for class in &classes {
                match self.collect.fetch_highways(area_id, *class) {
                    Ok(elements) => {
                        self.process_fetch(region, *class, &elements, &mut summary);
                    }
                    Err(e) => {
                        log::warn!("skipping {} / {}: {}", region.name, class, e);
                        summary.fetches_skipped += 1;
                    }
                }
                thread::sleep(self.config.class_delay);
            }
            thread::sleep(self.config.region_delay);
        }
        Ok(summary)
    }

    fn resolve(&mut self, region: &Region) -> Option<i64> {
        if let Some(cached) = self.resolved.get(&region.name) {
            return *cached;
        }
        let resolved = match self.collect.resolve_region(region) {
            Ok(area_id) => {
                log::info!("region '{}' resolved to area {}", region.name, area_id);
                Some(area_id)
            }
            Err(e) => {
                log::warn!("skipping region '{}': {}", region.name, e);
                None
            }
        };
        self.resolved.insert(region.name.clone(), resolved);
        resolved
    }

    fn process_fetch(
        &self,
        region: &Region,
        class: HighwayClass,
        elements: &RawElements,
        summary: &mut RunSummary,
    ) {
        if self.dump_raw {
            if let Err(e) = self.dump_snapshot(region, class, elements) {
                log::warn!("raw snapshot for {} / {} failed: {:#}", region.name, class, e);
            }
        }

        if elements.is_empty() {
            log::info!("{} / {}: empty result", region.name, class);
            return;
        }

        let names = index_names(&self.config.name_keys, &elements.ways);
        if names.is_empty() {
            log::info!("{} / {}: no named roads", region.name, class);
            return;
        }

        let groups = group_roads(&self.config.name_keys, &names, elements);
        log::info!(
            "{} / {}: {} ways, {} road groups",
            region.name,
            class,
            elements.ways.len(),
            groups.len()
        );

        for group in &groups {
            let features = group_features(group, &self.config.default_schema);
            match self
                .writer
                .write_group(&region.name, class, &group.name, features)
            {
                Ok(path) => {
                    summary.files_written += 1;
                    log::debug!("wrote {:?}", path);
                }
                Err(e) => {
                    summary.groups_failed += 1;
                    log::warn!("{} / {} / {}: {:#}", region.name, class, group.name, e);
                }
            }
        }
    }

    fn dump_snapshot(
        &self,
        region: &Region,
        class: HighwayClass,
        elements: &RawElements,
    ) -> Result<()> {
        let dir = self.config.output_path.join(&region.name);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create directory: {:?}", dir))?;
        let path = dir.join(format!("{}_raw.json", class));
        let body = serde_json::to_string(elements).context("Failed to serialize raw elements")?;
        fs::write(&path, body)
            .with_context(|| format!("Failed to write raw snapshot: {:?}", path))?;
        Ok(())
    }
}

/// Line features for every emittable way followed by one point feature per
/// group node. Ways with fewer than two resolvable vertices are dropped
/// silently; nodes are never deduplicated against their role inside a line.
pub fn group_features(group: &RoadGroup<'_>, default_schema: &[String]) -> Vec<Feature> {
    let lookup = geometry::coordinate_lookup(&group.nodes);
    let mut features = Vec::new();

    for way in &group.ways {
        if let Some(line) = geometry::way_line(way, &lookup) {
            features.push(Feature {
                bbox: None,
                geometry: Some(Geometry::new(Value::from(&line))),
                id: None,
                properties: Some(enrich_tags(&way.tags, default_schema)),
                foreign_members: None,
            });
        }
    }
    for node in &group.nodes {
        let point = geometry::node_point(node);
        features.push(Feature {
            bbox: None,
            geometry: Some(Geometry::new(Value::from(&point))),
            id: None,
            properties: Some(enrich_tags(&node.tags, default_schema)),
            foreign_members: None,
        });
    }
    features
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collect::overpass::{Node, Way};
    use crate::roads::naming::index_names;
    use std::collections::HashMap;
    use std::time::Duration;

    fn keys() -> Vec<String> {
        ["ref", "nat_ref", "reg_ref", "alt_name"]
            .iter()
            .map(|k| k.to_string())
            .collect()
    }

    fn schema() -> Vec<String> {
        [
            "maxheight",
            "maxweight",
            "maxwidth",
            "maxaxleload",
            "roadowner",
            "owner_id",
        ]
        .iter()
        .map(|k| k.to_string())
        .collect()
    }

    fn tags(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn node(id: i64, lat: f64, lon: f64) -> Node {
        Node {
            id,
            lat,
            lon,
            tags: HashMap::new(),
        }
    }

    #[test]
    fn test_ss7_scenario() {
        let elements = RawElements {
            ways: vec![Way {
                id: 100,
                nodes: vec![1, 2, 3],
                tags: tags(&[("highway", "primary"), ("ref", "SS7")]),
            }],
            nodes: vec![node(1, 0.0, 0.0), node(2, 1.0, 1.0), node(3, 2.0, 2.0)],
        };

        let names = index_names(&keys(), &elements.ways);
        assert_eq!(names.len(), 1);
        assert!(names.contains("SS7"));

        let groups = group_roads(&keys(), &names, &elements);
        assert_eq!(groups.len(), 1);

        let features = group_features(&groups[0], &schema());
        // One line with three vertices, then one point per node.
        assert_eq!(features.len(), 4);
        match &features[0].geometry.as_ref().unwrap().value {
            Value::LineString(positions) => assert_eq!(positions.len(), 3),
            other => panic!("expected LineString, got {:?}", other),
        }
        let properties = features[0].properties.as_ref().unwrap();
        assert_eq!(properties["ref"], "SS7");
        assert_eq!(properties["maxweight"], serde_json::Value::Null);

        for feature in &features[1..] {
            assert!(matches!(
                feature.geometry.as_ref().unwrap().value,
                Value::Point(_)
            ));
        }
    }

    #[test]
    fn test_single_resolvable_node_way_is_skipped_silently() {
        let elements = RawElements {
            ways: vec![
                Way {
                    id: 100,
                    nodes: vec![1, 99],
                    tags: tags(&[("ref", "SS7")]),
                },
                Way {
                    id: 101,
                    nodes: vec![2, 3],
                    tags: tags(&[("ref", "SS7")]),
                },
            ],
            nodes: vec![node(1, 41.0, 14.0), node(2, 41.1, 14.1), node(3, 41.2, 14.2)],
        };

        let names = index_names(&keys(), &elements.ways);
        let groups = group_roads(&keys(), &names, &elements);
        assert_eq!(groups.len(), 1);
        // Way 100 still counts toward the group but emits no line.
        assert_eq!(groups[0].ways.len(), 2);

        let features = group_features(&groups[0], &schema());
        let lines = features
            .iter()
            .filter(|f| matches!(f.geometry.as_ref().unwrap().value, Value::LineString(_)))
            .count();
        assert_eq!(lines, 1);
        let points = features.len() - lines;
        assert_eq!(points, 3);
    }

    #[test]
    fn test_unresolved_region_is_skipped_and_run_continues() {
        // Nothing listens on this port, so resolution fails immediately and
        // the region's whole highway-class loop is skipped.
        let dir = tempfile::tempdir().unwrap();
        let mut config = PipelineConfig::default();
        config.regions = vec![Region::new("Toscana", 41977)];
        config.class_delay = Duration::ZERO;
        config.region_delay = Duration::ZERO;
        config.output_path = dir.path().to_path_buf();

        let collect = OverpassCollect::with_endpoint("http://127.0.0.1:9/interpreter").unwrap();
        let mut pipeline = RoadNetwork::with_collect(config, collect);
        let summary = pipeline.run().unwrap();

        assert_eq!(summary.regions_skipped, 1);
        assert_eq!(summary.fetches_skipped, 0);
        assert_eq!(summary.files_written, 0);
    }
}
