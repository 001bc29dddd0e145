//! Island Gen CLI - Generate an island map from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use island_gen::{compute::IslandGenerator, export::MapExport, schema::MapConfig};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 && args[1] == "--example" {
        print_example_config();
        return;
    }

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json> [output.json]", args[0]);
        eprintln!();
        eprintln!("Generate an island heightmap from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to map configuration file");
        eprintln!("  output.json  Export path (default: <config>.map.json)");
        eprintln!();
        eprintln!("Example configuration is printed with --example flag.");
        std::process::exit(1);
    }

    let config_path = PathBuf::from(&args[1]);
    let output_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| config_path.with_extension("map.json"));

    // Load configuration
    let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
        eprintln!("Error reading config file: {}", e);
        std::process::exit(1);
    });

    let config: MapConfig = serde_json::from_str(&config_str).unwrap_or_else(|e| {
        eprintln!("Error parsing config: {}", e);
        std::process::exit(1);
    });

    let generator = IslandGenerator::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });
    let config = generator.config();

    println!("Island Map Generation");
    println!("=====================");
    println!("Grid: {}x{}", config.width, config.height);
    println!(
        "Islands: {}, spawn probability: {}, buffer: {}",
        config.islands, config.spawn_probability, config.buffer
    );
    println!(
        "Smoothing: sigma=({}, {}), {:?}",
        config.smoothing.sigma_x, config.smoothing.sigma_y, config.smoothing.backend
    );
    match config.random_seed {
        Some(seed) => println!("Seed: {}", seed),
        None => println!("Seed: entropy"),
    }
    println!();

    let start = Instant::now();
    let mut rng = generator.rng();
    let (map, stats) = generator.generate(&mut rng).unwrap_or_else(|e| {
        eprintln!("Generation failed: {}", e);
        std::process::exit(1);
    });
    let elapsed = start.elapsed();

    println!("Growth:");
    println!("  Rounds: {}", stats.growth.rounds);
    println!("  Converged: {}", stats.growth.converged);
    println!(
        "  Land cells: {} ({:.2}%)",
        stats.growth.land_cells,
        stats.growth.land_cells as f32 / (map.width() * map.height()) as f32 * 100.0
    );
    println!();
    println!("Bands:");
    for band in &map.bands {
        println!("  {:<14} {:>5.2}  {} cells", band.name, band.value, band.cells);
    }
    println!();

    let export = MapExport::new(config, &map, &stats);
    if let Err(e) = export.save(&output_path) {
        eprintln!("Error writing {}: {}", output_path.display(), e);
        std::process::exit(1);
    }

    println!(
        "Wrote {} ({} render targets)",
        output_path.display(),
        export.targets().len()
    );
    println!("Time: {:.2}s", elapsed.as_secs_f32());
}

fn print_example_config() {
    let config = MapConfig::default();

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing config: {}", e),
    }
}
