// Core pricing and order logic

pub mod types;
pub mod catalog;
pub mod fluctuation;
pub mod price_simulator;
pub mod order_ledger;

// Re-export commonly used types
pub use types::{Direction, HistoryEntry, LineItem, OrderReceipt, PriceMove, PriceSnapshot};
pub use catalog::{Catalog, Item};
pub use fluctuation::{FluctuationSource, RandomFluctuation, ScriptedFluctuation};
pub use price_simulator::{PriceSimulator, SimulationParams};
pub use order_ledger::OrderLedger;
