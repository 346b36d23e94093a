//! Quick engine performance test

use std::time::Instant;

use turing_engine::{Engine, EngineConfig};

fn main() {
    println!("=== Engine Performance Test ===\n");

    // Test different grid sizes
    for grid_size in [40, 80, 160] {
        println!("Grid size: {}x{}", grid_size, grid_size);

        let config = EngineConfig {
            width: grid_size,
            height: grid_size,
            random_seed: Some(42),
            ..Default::default()
        };

        let ticks = 500;
        let start = Instant::now();
        let mut engine = match Engine::new(config) {
            Ok(engine) => engine,
            Err(e) => {
                eprintln!("  Invalid configuration: {e}");
                continue;
            }
        };
        engine.run(ticks);
        let elapsed = start.elapsed();

        let steps = ticks * engine.config().steps_per_tick as u64;
        println!("  Ticks:          {}", ticks);
        println!("  Elapsed:        {:.2}s", elapsed.as_secs_f64());
        println!("  Ticks/sec:      {:.1}", ticks as f64 / elapsed.as_secs_f64());
        println!("  Steps/sec:      {:.1}", steps as f64 / elapsed.as_secs_f64());
        println!("  Regenerations:  {}", engine.regenerations());
        println!("  Mutations:      {}", engine.mutations());
        println!("  Archive size:   {}", engine.archive().len());
        println!();
    }

    println!("=== Steps-per-tick Scaling (fixed 80x80 grid) ===\n");

    for steps_per_tick in [1, 3, 6, 12] {
        let config = EngineConfig {
            steps_per_tick,
            random_seed: Some(42),
            ..Default::default()
        };

        let Ok(mut engine) = Engine::new(config) else {
            continue;
        };
        let start = Instant::now();
        engine.run(200);
        let elapsed = start.elapsed();

        println!(
            "  {:>2} steps/tick: {:.2}s, {} mutations, {} regenerations",
            steps_per_tick,
            elapsed.as_secs_f64(),
            engine.mutations(),
            engine.regenerations()
        );
    }
}
