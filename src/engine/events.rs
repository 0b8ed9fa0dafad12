// Fire-and-forget notifications for whatever is rendering the exchange

use serde::Serialize;
use tokio::sync::broadcast;

use crate::core::types::{Direction, LineItem, OrderReceipt, PriceMove};

/// Capacity of the notification channel; slow subscribers see `Lagged`
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ExchangeEvent {
    PriceIncreased { index: usize, name: String, price: f64 },
    PriceDecreased { index: usize, name: String, price: f64 },
    PurchaseCompleted { index: usize, line: LineItem },
    MarketCrashed { floor: f64 },
    AutoUpdateChanged { enabled: bool },
    OrderFinished { receipt: OrderReceipt },
}

impl ExchangeEvent {
    pub fn from_move(mv: &PriceMove) -> Self {
        match mv.direction {
            Direction::Up => ExchangeEvent::PriceIncreased {
                index: mv.index,
                name: mv.name.clone(),
                price: mv.price,
            },
            Direction::Down => ExchangeEvent::PriceDecreased {
                index: mv.index,
                name: mv.name.clone(),
                price: mv.price,
            },
        }
    }
}

/// Broadcast publisher; publishing without subscribers is silently dropped
#[derive(Debug, Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ExchangeEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self { sender }
    }

    pub fn publish(&self, event: ExchangeEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExchangeEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::new();
        bus.publish(ExchangeEvent::MarketCrashed { floor: 20.0 });
    }

    #[test]
    fn test_subscriber_receives_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(ExchangeEvent::AutoUpdateChanged { enabled: false });
        bus.publish(ExchangeEvent::MarketCrashed { floor: 20.0 });

        assert_eq!(rx.try_recv().unwrap(), ExchangeEvent::AutoUpdateChanged { enabled: false });
        assert_eq!(rx.try_recv().unwrap(), ExchangeEvent::MarketCrashed { floor: 20.0 });
    }

    #[test]
    fn test_event_from_move() {
        let mv = PriceMove {
            index: 1,
            name: "B".to_string(),
            previous: 60.0,
            price: 60.0,
            direction: Direction::Down,
        };
        assert!(matches!(
            ExchangeEvent::from_move(&mv),
            ExchangeEvent::PriceDecreased { index: 1, .. }
        ));
    }
}
