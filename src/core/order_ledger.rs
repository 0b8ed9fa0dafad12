// Cart accounting for the current customer

use chrono::Utc;
use uuid::Uuid;

use crate::core::price_simulator::PriceSimulator;
use crate::core::types::{LineItem, OrderReceipt};
use crate::error::ExchangeResult;

#[derive(Debug, Clone, Default)]
pub struct OrderLedger {
    cart: Vec<LineItem>,
    finished: bool,
}

impl OrderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the item at the price the simulator shows right now
    pub fn buy(&mut self, index: usize, simulator: &PriceSimulator) -> ExchangeResult<LineItem> {
        let price = simulator.current_price(index)?;
        let item = simulator.catalog().get(index)?;

        let line = LineItem {
            name: item.name.clone(),
            price_at_purchase: price,
        };
        self.cart.push(line.clone());
        Ok(line)
    }

    pub fn total(&self) -> f64 {
        // f64 `sum` of an empty iterator is -0.0
        self.cart.iter().fold(0.0, |acc, line| acc + line.price_at_purchase)
    }

    pub fn clear(&mut self) {
        self.cart.clear();
        self.finished = false;
    }

    /// Mark the order as completed. The cart is left untouched; call `clear`
    /// to start a fresh one.
    pub fn finish(&mut self) -> OrderReceipt {
        self.finished = true;
        OrderReceipt {
            order_id: Uuid::new_v4(),
            lines: self.cart.clone(),
            total: self.total(),
            finished_at: Utc::now(),
        }
    }

    pub fn contents(&self) -> &[LineItem] {
        &self.cart
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    pub fn len(&self) -> usize {
        self.cart.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::catalog::Catalog;
    use crate::core::fluctuation::ScriptedFluctuation;
    use crate::core::price_simulator::SimulationParams;
    use crate::error::ExchangeError;

    fn simulator() -> PriceSimulator {
        PriceSimulator::new(
            Catalog::reference(),
            SimulationParams::default(),
            Box::new(ScriptedFluctuation::always_up()),
        )
    }

    #[test]
    fn test_empty_total_is_zero() {
        let ledger = OrderLedger::new();
        assert_eq!(ledger.total(), 0.0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_empty_total_is_positive_zero() {
        let sim = simulator();
        let mut ledger = OrderLedger::new();
        assert!(!ledger.total().is_sign_negative());
        assert_eq!(ledger.total().to_string(), "0");

        ledger.buy(1, &sim).unwrap();
        ledger.clear();
        assert!(!ledger.total().is_sign_negative());
        assert!(!ledger.finish().total.is_sign_negative());
    }

    #[test]
    fn test_buy_captures_current_price() {
        let mut sim = simulator();
        let mut ledger = OrderLedger::new();

        let line = ledger.buy(2, &sim).unwrap();
        assert_eq!(line.name, "Mocktail C");
        assert_eq!(line.price_at_purchase, 70.0);

        sim.tick();
        assert_eq!(ledger.contents()[0].price_at_purchase, 70.0);

        ledger.buy(2, &sim).unwrap();
        assert_eq!(ledger.contents()[1].price_at_purchase, 75.0);
        assert_eq!(ledger.total(), 145.0);
    }

    #[test]
    fn test_buy_out_of_range() {
        let sim = simulator();
        let mut ledger = OrderLedger::new();
        assert_eq!(
            ledger.buy(5, &sim).unwrap_err(),
            ExchangeError::InvalidIndex { index: 5, len: 5 }
        );
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let sim = simulator();
        let mut ledger = OrderLedger::new();
        ledger.buy(0, &sim).unwrap();

        ledger.clear();
        let once = ledger.contents().to_vec();
        ledger.clear();
        assert_eq!(ledger.contents(), once.as_slice());
        assert_eq!(ledger.total(), 0.0);
    }

    #[test]
    fn test_finish_keeps_cart() {
        let sim = simulator();
        let mut ledger = OrderLedger::new();
        ledger.buy(0, &sim).unwrap();
        ledger.buy(4, &sim).unwrap();

        let receipt = ledger.finish();
        assert!(ledger.is_finished());
        assert_eq!(receipt.total, 80.0);
        assert_eq!(receipt.lines.len(), 2);
        assert_eq!(ledger.len(), 2);

        ledger.clear();
        assert!(!ledger.is_finished());
    }
}
