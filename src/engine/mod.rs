// Engine Module
// Owns the simulator and ledger and serialises every command onto one task

pub mod events;
pub mod exchange;
pub mod runtime;

pub use events::{EventBus, ExchangeEvent};
pub use exchange::Exchange;
pub use runtime::{ExchangeHandle, ExchangeRuntime};
