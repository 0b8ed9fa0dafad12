// Menu Exchange Library
//
// Simulated, fluctuating menu prices with price history and a purchase cart

pub mod core;
pub mod config;
pub mod engine;
pub mod error;     // Unified error handling
pub mod progress;  // Progress bars for offline simulation

// Re-export core types
pub use core::{
    Catalog, Direction, FluctuationSource, HistoryEntry, Item, LineItem, OrderLedger,
    OrderReceipt, PriceMove, PriceSimulator, PriceSnapshot, RandomFluctuation,
    ScriptedFluctuation, SimulationParams,
};

// Re-export error types
pub use error::{ExchangeError, ExchangeResult};

// Re-export configuration
pub use config::{Config, ConfigError, LoggingConfig, PricingConfig, TimingConfig};

// Re-export engine components
pub use engine::{EventBus, Exchange, ExchangeEvent, ExchangeHandle, ExchangeRuntime};
