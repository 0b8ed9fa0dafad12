// Common types shared by the simulator, the ledger and the engine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Movement of a price relative to the previous tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

impl Direction {
    /// `Up` only on a strict increase; an unchanged price counts as `Down`
    pub fn between(previous: f64, new: f64) -> Self {
        if new > previous {
            Direction::Up
        } else {
            Direction::Down
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            Direction::Up => "⬆️",
            Direction::Down => "⬇️",
        }
    }
}

/// One recorded price point for an item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Utc>,
    pub price: f64,
    pub direction: Direction,
}

/// A price change applied to one item during a tick
#[derive(Debug, Clone, PartialEq)]
pub struct PriceMove {
    pub index: usize,
    pub name: String,
    pub previous: f64,
    pub price: f64,
    pub direction: Direction,
}

/// Read-only view of one item for presentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSnapshot {
    pub name: String,
    pub price: f64,
    pub base_price: f64,
    /// `None` until the item has been ticked at least once
    pub direction: Option<Direction>,
}

impl PriceSnapshot {
    pub fn is_above_base(&self) -> bool {
        self.price > self.base_price
    }
}

/// Cart entry, frozen at the price seen when it was bought
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub price_at_purchase: f64,
}

/// Confirmation produced when an order is finished
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    pub order_id: Uuid,
    pub lines: Vec<LineItem>,
    pub total: f64,
    pub finished_at: DateTime<Utc>,
}
