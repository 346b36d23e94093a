//! Turing Engine CLI - Run the pattern engine headless from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use turing_engine::{
    compute::{Engine, GridStats},
    schema::EngineConfig,
};

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.get(1).is_some_and(|a| a == "--example") {
        print_example_config();
        return;
    }

    if args.get(1).is_some_and(|a| a == "--help" || a == "-h") {
        print_usage(&args[0]);
        return;
    }

    // Config path is optional; a bare number is taken as the tick count.
    let (config, ticks_arg) = match args.get(1) {
        Some(arg) if arg.parse::<u64>().is_err() => {
            let path = PathBuf::from(arg);
            let config = EngineConfig::from_json_file(&path).unwrap_or_else(|e| {
                eprintln!("Error loading config {}: {}", path.display(), e);
                std::process::exit(1);
            });
            (config, args.get(2))
        }
        other => (EngineConfig::default(), other),
    };

    let ticks: u64 = match ticks_arg {
        Some(s) => s.parse().unwrap_or_else(|_| {
            eprintln!("Invalid tick count: {s}");
            print_usage(&args[0]);
            std::process::exit(1);
        }),
        None => 1000,
    };

    let mut engine = Engine::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {e}");
        std::process::exit(1);
    });

    let config = engine.config();
    println!("Turing Engine");
    println!("=============");
    println!("Grid: {}x{}", config.width, config.height);
    println!("Steps per tick: {}", config.steps_per_tick);
    println!("dt: {}", config.dt);
    println!("Ticks: {}", ticks);
    println!("Initial params: {:?}", engine.params());
    println!();

    println!("Running engine...");
    let start = Instant::now();
    let progress_every = (ticks / 10).max(1);

    let mut tick = 0u64;
    let mut archived = 0usize;
    engine.run_with_callback(ticks, |report| {
        tick += 1;
        archived += report.archived as usize;

        // Print progress every 10%
        if tick % progress_every == 0 {
            let ticks_per_sec = tick as f32 / start.elapsed().as_secs_f32();
            println!(
                "  Tick {}/{}: fitness={:.4}, change={:.6}, archived={}, {:.1} ticks/s",
                tick, ticks, report.fitness, report.change_rate, archived, ticks_per_sec
            );
        }
    });

    let elapsed = start.elapsed();
    let stats = GridStats::from_grid(&engine.pattern().grid);
    let features = engine.features();

    println!();
    println!("Final state:");
    println!("  Params: {:?}", engine.params());
    println!("  Age: {} steps", engine.pattern().age);
    println!("  Fitness: {:.4}", engine.pattern().fitness);
    println!(
        "  A range: [{:.4}, {:.4}], mean {:.4}",
        stats.min_a, stats.max_a, stats.mean_a
    );
    println!(
        "  B range: [{:.4}, {:.4}], mean {:.4}",
        stats.min_b, stats.max_b, stats.mean_b
    );
    println!("  Active cells: {}", stats.active_cells);
    println!(
        "  Features: symmetry={:.3} complexity={:.3} density={:.3} dynamism={:.3} entropy={:.3} coherence={:.3}",
        features.symmetry,
        features.complexity,
        features.density,
        features.dynamism,
        features.entropy,
        features.temporal_coherence
    );
    println!();
    println!("Regenerations: {}", engine.regenerations());
    println!("Mutations: {}", engine.mutations());
    println!("Archive ({} entries):", engine.archive().len());
    match engine.archive().to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing archive: {e}"),
    }
    println!();
    println!(
        "Time: {:.2}s ({:.1} ticks/s)",
        elapsed.as_secs_f32(),
        ticks as f32 / elapsed.as_secs_f32()
    );
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [config.json] [ticks]", program);
    eprintln!();
    eprintln!("Run the Turing pattern engine headless.");
    eprintln!();
    eprintln!("Arguments:");
    eprintln!("  config.json  Path to engine configuration file (default: built-in)");
    eprintln!("  ticks        Number of engine ticks (default: 1000)");
    eprintln!();
    eprintln!("Example configuration is generated with --example flag.");
}

fn print_example_config() {
    let config = EngineConfig {
        random_seed: Some(42),
        ..Default::default()
    };

    println!("Example configuration (config.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{json}"),
        Err(e) => eprintln!("Error serializing config: {e}"),
    }
}
