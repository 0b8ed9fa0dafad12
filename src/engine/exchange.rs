// Exchange engine: price simulator + order ledger behind one command/query surface

use std::collections::VecDeque;

use tokio::sync::broadcast;
use tracing::{debug, info};

use crate::config::{Config, LoggingConfig};
use crate::core::fluctuation::{FluctuationSource, RandomFluctuation};
use crate::core::order_ledger::OrderLedger;
use crate::core::price_simulator::PriceSimulator;
use crate::core::types::{HistoryEntry, LineItem, OrderReceipt, PriceMove, PriceSnapshot};
use crate::engine::events::{EventBus, ExchangeEvent};
use crate::error::ExchangeResult;

/// Owned engine state. Every method runs to completion before returning,
/// so callers that serialise access never observe a partial tick.
#[derive(Debug)]
pub struct Exchange {
    simulator: PriceSimulator,
    ledger: OrderLedger,
    events: EventBus,
    logging: LoggingConfig,
}

impl Exchange {
    pub fn new(simulator: PriceSimulator, logging: LoggingConfig) -> Self {
        Self {
            simulator,
            ledger: OrderLedger::new(),
            events: EventBus::new(),
            logging,
        }
    }

    /// Build from config, drawing fluctuations from the configured seed (or entropy)
    pub fn from_config(config: &Config) -> ExchangeResult<Self> {
        let source = RandomFluctuation::from_seed_option(config.pricing.seed);
        Self::with_source(config, Box::new(source))
    }

    pub fn with_source(config: &Config, source: Box<dyn FluctuationSource>) -> ExchangeResult<Self> {
        let catalog = config.build_catalog()?;
        let simulator = PriceSimulator::new(catalog, config.simulation_params(), source);
        Ok(Self::new(simulator, config.logging.clone()))
    }

    /// Apply one tick if auto-update is on; returns the applied moves
    pub fn tick(&mut self) -> Vec<PriceMove> {
        if !self.simulator.is_auto_update_enabled() {
            debug!("⏸️  Tick skipped: auto-update disabled");
            return Vec::new();
        }

        let moves = self.simulator.tick();
        for mv in &moves {
            if self.logging.enable_price_logging {
                info!("{} {}: ₹{} → ₹{}", mv.direction.arrow(), mv.name, mv.previous, mv.price);
            }
            self.events.publish(ExchangeEvent::from_move(mv));
        }
        moves
    }

    pub fn crash(&mut self) {
        self.simulator.crash();
        let floor = self.simulator.params().crash_floor;
        info!("💥 MARKET CRASH: every price forced to ₹{}", floor);
        self.events.publish(ExchangeEvent::MarketCrashed { floor });
    }

    /// Returns true when the flag actually changed
    pub fn set_auto_update(&mut self, enabled: bool) -> bool {
        if self.simulator.is_auto_update_enabled() == enabled {
            return false;
        }
        self.simulator.set_auto_update(enabled);
        info!("🔁 Auto-update {}", if enabled { "enabled" } else { "disabled" });
        self.events.publish(ExchangeEvent::AutoUpdateChanged { enabled });
        true
    }

    /// End of a crash window: auto-update is forced on whatever it was set to meanwhile
    pub fn complete_crash_recovery(&mut self) -> bool {
        debug!("🩹 Crash recovery delay elapsed");
        self.set_auto_update(true)
    }

    pub fn buy(&mut self, index: usize) -> ExchangeResult<LineItem> {
        let line = self.ledger.buy(index, &self.simulator)?;
        if self.logging.enable_order_logging {
            info!("🛒 Bought {} @ ₹{} | cart total ₹{}", line.name, line.price_at_purchase, self.ledger.total());
        }
        self.events.publish(ExchangeEvent::PurchaseCompleted {
            index,
            line: line.clone(),
        });
        Ok(line)
    }

    pub fn clear(&mut self) {
        self.ledger.clear();
        if self.logging.enable_order_logging {
            info!("🧹 Cart cleared");
        }
    }

    pub fn finish(&mut self) -> OrderReceipt {
        let receipt = self.ledger.finish();
        if self.logging.enable_order_logging {
            info!(
                "✅ Order {} finished: {} items, total ₹{}",
                receipt.order_id,
                receipt.lines.len(),
                receipt.total
            );
        }
        self.events.publish(ExchangeEvent::OrderFinished {
            receipt: receipt.clone(),
        });
        receipt
    }

    pub fn snapshot(&self) -> Vec<PriceSnapshot> {
        self.simulator.current_snapshot()
    }

    pub fn history_of(&self, index: usize) -> ExchangeResult<&VecDeque<HistoryEntry>> {
        self.simulator.history_of(index)
    }

    pub fn cart_contents(&self) -> &[LineItem] {
        self.ledger.contents()
    }

    pub fn total(&self) -> f64 {
        self.ledger.total()
    }

    pub fn is_auto_update_enabled(&self) -> bool {
        self.simulator.is_auto_update_enabled()
    }

    pub fn is_order_finished(&self) -> bool {
        self.ledger.is_finished()
    }

    pub fn simulator(&self) -> &PriceSimulator {
        &self.simulator
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.events.subscribe()
    }

    pub(crate) fn event_bus(&self) -> EventBus {
        self.events.clone()
    }
}
