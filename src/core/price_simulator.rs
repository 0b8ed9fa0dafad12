// Periodic price simulation over the catalog

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

use crate::core::catalog::Catalog;
use crate::core::fluctuation::FluctuationSource;
use crate::core::types::{Direction, HistoryEntry, PriceMove, PriceSnapshot};
use crate::error::{ExchangeError, ExchangeResult};

/// Tunables for the price process
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub fluctuation_step: f64,
    pub crash_floor: f64,
    /// Oldest entries are dropped beyond this many per item; `None` keeps everything
    pub history_limit: Option<usize>,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            fluctuation_step: 5.0,
            crash_floor: 20.0,
            history_limit: None,
        }
    }
}

#[derive(Debug, Clone)]
struct PriceState {
    current_price: f64,
    last_direction: Option<Direction>,
    history: VecDeque<HistoryEntry>,
}

/// Owns current prices and per-item history
pub struct PriceSimulator {
    catalog: Catalog,
    states: Vec<PriceState>,
    params: SimulationParams,
    source: Box<dyn FluctuationSource>,
    auto_update_enabled: bool,
    ticks: u64,
}

impl PriceSimulator {
    /// Seed every item at its base price with an empty history; auto-update starts on
    pub fn new(catalog: Catalog, params: SimulationParams, source: Box<dyn FluctuationSource>) -> Self {
        let states = catalog
            .items()
            .iter()
            .map(|item| PriceState {
                current_price: item.base_price,
                last_direction: None,
                history: VecDeque::new(),
            })
            .collect();

        Self {
            catalog,
            states,
            params,
            source,
            auto_update_enabled: true,
            ticks: 0,
        }
    }

    pub fn tick(&mut self) -> Vec<PriceMove> {
        self.tick_at(Utc::now())
    }

    /// Advance every item by one fluctuation.
    ///
    /// New prices are computed for the whole catalog before any state is
    /// written, so a tick is applied as one unit.
    pub fn tick_at(&mut self, timestamp: DateTime<Utc>) -> Vec<PriceMove> {
        let step = self.params.fluctuation_step;

        let moves: Vec<PriceMove> = self
            .catalog
            .items()
            .iter()
            .zip(&self.states)
            .enumerate()
            .map(|(index, (item, state))| {
                let previous = state.current_price;
                let candidate = previous + self.source.next_fluctuation(step);
                let price = item.clamp(candidate);
                PriceMove {
                    index,
                    name: item.name.clone(),
                    previous,
                    price,
                    direction: Direction::between(previous, price),
                }
            })
            .collect();

        for mv in &moves {
            let state = &mut self.states[mv.index];
            state.history.push_back(HistoryEntry {
                timestamp,
                price: mv.price,
                direction: mv.direction,
            });
            if let Some(limit) = self.params.history_limit {
                while state.history.len() > limit {
                    state.history.pop_front();
                }
            }
            state.current_price = mv.price;
            state.last_direction = Some(mv.direction);
        }

        self.ticks += 1;
        moves
    }

    /// Force every price to the crash floor, ignoring bounds. No history is recorded.
    pub fn crash(&mut self) {
        let floor = self.params.crash_floor;
        for state in &mut self.states {
            state.current_price = floor;
        }
    }

    pub fn set_auto_update(&mut self, enabled: bool) {
        self.auto_update_enabled = enabled;
    }

    pub fn is_auto_update_enabled(&self) -> bool {
        self.auto_update_enabled
    }

    pub fn current_snapshot(&self) -> Vec<PriceSnapshot> {
        self.catalog
            .items()
            .iter()
            .zip(&self.states)
            .map(|(item, state)| PriceSnapshot {
                name: item.name.clone(),
                price: state.current_price,
                base_price: item.base_price,
                direction: state.last_direction,
            })
            .collect()
    }

    pub fn current_price(&self, index: usize) -> ExchangeResult<f64> {
        self.state(index).map(|s| s.current_price)
    }

    pub fn history_of(&self, index: usize) -> ExchangeResult<&VecDeque<HistoryEntry>> {
        self.state(index).map(|s| &s.history)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn params(&self) -> &SimulationParams {
        &self.params
    }

    pub fn item_count(&self) -> usize {
        self.states.len()
    }

    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    fn state(&self, index: usize) -> ExchangeResult<&PriceState> {
        self.states.get(index).ok_or(ExchangeError::InvalidIndex {
            index,
            len: self.states.len(),
        })
    }
}

impl std::fmt::Debug for PriceSimulator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PriceSimulator")
            .field("catalog", &self.catalog)
            .field("params", &self.params)
            .field("auto_update_enabled", &self.auto_update_enabled)
            .field("ticks", &self.ticks)
            .finish()
    }
}
