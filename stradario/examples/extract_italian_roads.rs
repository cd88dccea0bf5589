use anyhow::Result;
use stradario::config::PipelineConfig;
use stradario::pipeline::RoadNetwork;

/// Example: extracting the whole Italian road network from the Overpass API,
/// one GeoJSON file per (region, highway class, road reference).
fn main() -> Result<()> {
    env_logger::init();

    let mut config = PipelineConfig::default();
    config.output_path = "./output".into();

    println!("=== Extracting Italian roads from Overpass ===\n");
    println!("Regions: {}", config.regions.len());
    println!(
        "Highway classes: {:?}",
        config
            .highway_classes
            .iter()
            .map(|c| c.as_str())
            .collect::<Vec<_>>()
    );
    println!("Output: {:?}\n", config.output_path);

    let mut pipeline = RoadNetwork::new(config)?;
    let summary = pipeline.run()?;

    println!("\nRun finished:");
    println!("  - files written: {}", summary.files_written);
    println!("  - regions skipped: {}", summary.regions_skipped);
    println!("  - fetches skipped: {}", summary.fetches_skipped);
    println!("  - groups failed: {}", summary.groups_failed);

    Ok(())
}
