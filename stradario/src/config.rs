use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// One entry of the static region table: the region name exactly as it
/// appears on the OSM administrative boundary, plus the relation id used to
/// cross-check what the boundary query resolves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    pub name: String,
    pub relation_id: i64,
}

impl Region {
    pub fn new(name: &str, relation_id: i64) -> Self {
        Region {
            name: name.to_string(),
            relation_id,
        }
    }
}

/// Road categories extracted by the pipeline, one Overpass query each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighwayClass {
    Motorway,
    Trunk,
    Primary,
    Secondary,
    Tertiary,
}

impl HighwayClass {
    pub const ALL: [HighwayClass; 5] = [
        HighwayClass::Motorway,
        HighwayClass::Trunk,
        HighwayClass::Primary,
        HighwayClass::Secondary,
        HighwayClass::Tertiary,
    ];

    /// The `highway=*` tag value for this class.
    pub fn as_str(&self) -> &'static str {
        match self {
            HighwayClass::Motorway => "motorway",
            HighwayClass::Trunk => "trunk",
            HighwayClass::Primary => "primary",
            HighwayClass::Secondary => "secondary",
            HighwayClass::Tertiary => "tertiary",
        }
    }
}

impl fmt::Display for HighwayClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable pipeline configuration, built once at startup and passed
/// explicitly to the components.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Regions to extract, in run order.
    pub regions: Vec<Region>,
    /// Highway classes queried for each region, in run order.
    pub highway_classes: Vec<HighwayClass>,
    /// Name-tag keys scanned in priority order; the first present key wins.
    pub name_keys: Vec<String>,
    /// Attribute keys guaranteed on every output feature (null when absent).
    pub default_schema: Vec<String>,
    /// Pause after each highway-class fetch.
    pub class_delay: Duration,
    /// Pause after each region completes.
    pub region_delay: Duration,
    /// Root directory for the per-group GeoJSON files.
    pub output_path: PathBuf,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        PipelineConfig {
            regions: italian_regions(),
            highway_classes: HighwayClass::ALL.to_vec(),
            name_keys: ["ref", "nat_ref", "reg_ref", "alt_name"]
                .iter()
                .map(|k| k.to_string())
                .collect(),
            default_schema: [
                "maxheight",
                "maxweight",
                "maxwidth",
                "maxaxleload",
                "roadowner",
                "owner_id",
            ]
            .iter()
            .map(|k| k.to_string())
            .collect(),
            class_delay: Duration::from_secs(2),
            region_delay: Duration::from_secs(10),
            output_path: PathBuf::from("./output"),
        }
    }
}

/// The twenty Italian administrative regions with their OSM relation ids.
pub fn italian_regions() -> Vec<Region> {
    vec![
        Region::new("Sicilia", 39152),
        Region::new("Puglia", 40095),
        Region::new("Basilicata", 40137),
        Region::new("Campania", 40218),
        Region::new("Lazio", 40784),
        Region::new("Molise", 41256),
        Region::new("Toscana", 41977),
        Region::new("Umbria", 42004),
        Region::new("Emilia-Romagna", 42611),
        Region::new("Veneto", 43648),
        Region::new("Piemonte", 44874),
        Region::new("Lombardia", 44879),
        Region::new("Valle d'Aosta", 45155),
        Region::new("Trentino-Alto Adige", 45757),
        Region::new("Marche", 53060),
        Region::new("Abruzzo", 53937),
        Region::new("Friuli-Venezia Giulia", 179296),
        Region::new("Liguria", 301482),
        Region::new("Calabria", 1783980),
        Region::new("Sardegna", 7361997),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_tables() {
        let config = PipelineConfig::default();
        assert_eq!(config.regions.len(), 20);
        assert_eq!(config.highway_classes.len(), 5);
        assert_eq!(
            config.name_keys,
            vec!["ref", "nat_ref", "reg_ref", "alt_name"]
        );
        assert_eq!(config.default_schema.len(), 6);
    }

    #[test]
    fn test_highway_class_tag_values() {
        assert_eq!(HighwayClass::Motorway.as_str(), "motorway");
        assert_eq!(HighwayClass::Tertiary.to_string(), "tertiary");
        assert_eq!(HighwayClass::ALL[0], HighwayClass::Motorway);
    }

    #[test]
    fn test_region_table_entries() {
        let regions = italian_regions();
        let toscana = regions.iter().find(|r| r.name == "Toscana").unwrap();
        assert_eq!(toscana.relation_id, 41977);
        let aosta = regions.iter().find(|r| r.name == "Valle d'Aosta");
        assert!(aosta.is_some());
    }
}
