// End-to-end scenarios over the exchange engine

mod common;

use menu_exchange::{Direction, ExchangeError, ExchangeEvent};
use common::{scenario_items, scripted_exchange};

#[test]
fn test_reference_scenario() {
    let mut exchange = scripted_exchange(scenario_items(), vec![5.0, -5.0]);

    // Step 1: one tick with forced fluctuations [+5, -5]
    exchange.tick();
    let snapshot = exchange.snapshot();
    assert_eq!(snapshot[0].price, 55.0);
    assert_eq!(snapshot[1].price, 55.0);

    // Step 2: buy A at its current price
    let line = exchange.buy(0).expect("Failed to buy");
    assert_eq!(line.name, "A");
    assert_eq!(line.price_at_purchase, 55.0);
    assert_eq!(exchange.cart_contents().len(), 1);
    assert_eq!(exchange.total(), 55.0);

    // Step 3: crash forces the floor on both items
    exchange.crash();
    let snapshot = exchange.snapshot();
    assert_eq!(snapshot[0].price, 20.0);
    assert_eq!(snapshot[1].price, 20.0);

    // Purchases keep their original price
    assert_eq!(exchange.cart_contents()[0].price_at_purchase, 55.0);

    // Step 4: clear
    exchange.clear();
    assert!(exchange.cart_contents().is_empty());
    assert_eq!(exchange.total(), 0.0);
}

#[test]
fn test_crash_does_not_record_history() {
    let mut exchange = scripted_exchange(scenario_items(), vec![5.0]);
    exchange.tick();
    exchange.crash();

    for index in 0..2 {
        let history = exchange.history_of(index).unwrap();
        assert_eq!(history.len(), 1);
        assert_ne!(history[0].price, 20.0);
    }
}

#[test]
fn test_history_directions_follow_previous_price() {
    let mut exchange = scripted_exchange(scenario_items(), vec![5.0, 5.0, -5.0, -5.0]);
    for _ in 0..4 {
        exchange.tick();
    }

    // A: 55 (+), 50 (-), 55 (+), 50 (-)
    let a: Vec<(f64, Direction)> = exchange
        .history_of(0)
        .unwrap()
        .iter()
        .map(|e| (e.price, e.direction))
        .collect();
    assert_eq!(
        a,
        vec![
            (55.0, Direction::Up),
            (50.0, Direction::Down),
            (55.0, Direction::Up),
            (50.0, Direction::Down),
        ]
    );

    let timestamps: Vec<_> = exchange.history_of(0).unwrap().iter().map(|e| e.timestamp).collect();
    assert!(timestamps.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_buy_invalid_index_leaves_cart_untouched() {
    let mut exchange = scripted_exchange(scenario_items(), vec![5.0]);
    let result = exchange.buy(2);

    assert_eq!(result, Err(ExchangeError::InvalidIndex { index: 2, len: 2 }));
    assert!(exchange.cart_contents().is_empty());
    assert!(matches!(
        exchange.history_of(7),
        Err(ExchangeError::InvalidIndex { index: 7, len: 2 })
    ));
}

#[test]
fn test_notifications_for_a_session() {
    let mut exchange = scripted_exchange(scenario_items(), vec![5.0, -5.0]);
    let mut events = exchange.subscribe();

    exchange.tick();
    exchange.buy(1).unwrap();
    exchange.crash();
    exchange.finish();

    let mut seen = Vec::new();
    while let Ok(event) = events.try_recv() {
        seen.push(event);
    }

    assert!(matches!(seen[0], ExchangeEvent::PriceIncreased { index: 0, price, .. } if price == 55.0));
    assert!(matches!(seen[1], ExchangeEvent::PriceDecreased { index: 1, price, .. } if price == 55.0));
    assert!(matches!(seen[2], ExchangeEvent::PurchaseCompleted { index: 1, .. }));
    assert!(matches!(seen[3], ExchangeEvent::MarketCrashed { floor } if floor == 20.0));
    assert!(matches!(&seen[4], ExchangeEvent::OrderFinished { receipt } if receipt.total == 55.0));
    assert_eq!(seen.len(), 5);
}

#[test]
fn test_finish_does_not_clear_cart() {
    let mut exchange = scripted_exchange(scenario_items(), vec![5.0]);
    exchange.buy(0).unwrap();
    exchange.buy(1).unwrap();

    let receipt = exchange.finish();
    assert_eq!(receipt.lines.len(), 2);
    assert_eq!(exchange.cart_contents().len(), 2);
    assert_eq!(exchange.total(), 110.0);
    assert!(exchange.is_order_finished());
}
