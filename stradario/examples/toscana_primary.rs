use anyhow::Result;
use stradario::collect::overpass::OverpassCollect;
use stradario::config::{HighwayClass, PipelineConfig, Region};
use stradario::pipeline::group_features;
use stradario::roads::group::group_roads;
use stradario::roads::naming::index_names;
use stradario::roads::writer::GroupWriter;

/// Example: primary roads of a single region, driven through the library
/// seams instead of the full pipeline.
fn main() -> Result<()> {
    env_logger::init();

    let config = PipelineConfig::default();
    let region = Region::new("Toscana", 41977);
    let class = HighwayClass::Primary;

    let collect = OverpassCollect::new()?;

    println!("Resolving boundary for {}...", region.name);
    let area_id = collect.resolve_region(&region)?;
    println!("Area id: {}\n", area_id);

    println!("Fetching {} ways...", class);
    let elements = collect.fetch_highways(area_id, class)?;
    println!(
        "Received {} ways and {} nodes",
        elements.ways.len(),
        elements.nodes.len()
    );

    let names = index_names(&config.name_keys, &elements.ways);
    println!("Distinct road names: {}\n", names.len());

    let writer = GroupWriter::new("./output");
    let groups = group_roads(&config.name_keys, &names, &elements);
    for group in &groups {
        let features = group_features(group, &config.default_schema);
        let path = writer.write_group(&region.name, class, &group.name, features)?;
        println!("  - {} -> {:?}", group.name, path);
    }

    println!("\nDone: {} road groups written", groups.len());
    Ok(())
}
