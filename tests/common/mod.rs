// Common test utilities and helpers
#![allow(dead_code)]

use menu_exchange::{Catalog, Config, Exchange, Item, PriceSimulator, ScriptedFluctuation, SimulationParams};
use tempfile::TempDir;
use std::path::PathBuf;

/// The two-item catalog used by the reference scenario
pub fn scenario_items() -> Vec<Item> {
    vec![
        Item::bounded("A", 50.0, 40.0, 80.0),
        Item::new("B", 60.0),
    ]
}

/// Default timing/pricing over the given catalog, with logging quiet
pub fn create_test_config(catalog: Vec<Item>) -> Config {
    let mut config = Config::default();
    config.catalog = catalog;
    config.logging.enable_price_logging = false;
    config.logging.enable_order_logging = false;
    config
}

pub fn scripted_exchange(catalog: Vec<Item>, script: Vec<f64>) -> Exchange {
    let config = create_test_config(catalog);
    Exchange::with_source(&config, Box::new(ScriptedFluctuation::new(script)))
        .expect("Failed to build exchange")
}

pub fn scripted_simulator(catalog: Vec<Item>, script: Vec<f64>) -> PriceSimulator {
    let catalog = Catalog::new(catalog).expect("Invalid test catalog");
    PriceSimulator::new(catalog, SimulationParams::default(), Box::new(ScriptedFluctuation::new(script)))
}

/// Create a temporary directory for config files
pub fn create_temp_config_path() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let path = temp_dir.path().join("config.toml");
    (temp_dir, path)
}

/// Random catalog with a mix of bounded and unbounded items
pub fn generate_test_catalog(rng: &mut impl rand::Rng, count: usize) -> Vec<Item> {
    (0..count)
        .map(|i| {
            let base = rng.gen_range(10..=100) as f64;
            if rng.gen_bool(0.5) {
                let min = base - rng.gen_range(0..=30) as f64;
                let max = base + rng.gen_range(0..=30) as f64;
                Item::bounded(format!("Item {}", i), base, min, max)
            } else {
                Item::new(format!("Item {}", i), base)
            }
        })
        .collect()
}
