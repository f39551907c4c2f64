//! Run a synthetic correlation analysis and print what the dashboard shows.
//!
//! ```sh
//! RUST_LOG=debug cargo run --example explore_engine -- 180
//! ```

use commodity_lens_workspace::{
    init_logging, pair_spread, CorrelationEngine, EngineConfig, SpreadRules,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let horizon: u32 = match std::env::args().nth(1) {
        Some(arg) => arg.parse()?,
        None => 180,
    };

    let config = match std::env::var("ENGINE_CONFIG") {
        Ok(path) => EngineConfig::from_json_file(path)?,
        Err(_) => EngineConfig::default(),
    };
    let engine = CorrelationEngine::new(config)?;
    let mut rng = StdRng::seed_from_u64(42);

    let series = engine.generate_series(horizon, &mut rng)?;
    info!(points = series.len(), "generated synthetic history");
    let report = engine.analyze(&series)?;

    println!("Correlation heatmap");
    print!("{:>14}", "");
    for name in &report.commodities {
        print!("{:>14}", name);
    }
    println!();
    for (name, row) in report.commodities.iter().zip(report.heatmap()) {
        print!("{:>14}", name);
        for value in row {
            print!("{:>14.3}", value);
        }
        println!();
    }

    println!("\nInsights");
    for insight in &report.insights {
        println!("  [{}] {}: {}", insight.kind, insight.title, insight.description);
    }

    if let Some((date, values)) = report.rolling_by_date().into_iter().next_back() {
        println!("\nRolling correlation as of {}", date);
        for (pair, value) in values {
            println!("  {:<28}{:>8.3}", pair, value);
        }
    }

    let spread = pair_spread(&series, "Cocoa Butter", "Palm Oil")?;
    println!("\nCocoa Butter / Palm Oil spread signals");
    for signal in SpreadRules::default().evaluate(&spread) {
        println!("  {} ({:.1}): {}", signal.action, signal.strength, signal.message);
    }

    println!("\n{}", serde_json::to_string_pretty(&report.insights)?);
    Ok(())
}
