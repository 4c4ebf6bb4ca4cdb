//! Cross-checks the shadow book oracle against the matching book by driving
//! both from the same stream of operations, translating each matching-book
//! outcome into the event records the shadow book consumes.

use matching_book::prelude::*;

struct Harness {
    book: MatchingBook,
    shadow: ShadowBook,
}

impl Harness {
    fn new() -> Self {
        Harness { book: MatchingBook::new(), shadow: ShadowBook::new() }
    }

    fn add(&mut self, id: u64, side: Side, price: i64, qty: u64) {
        let order = Order::make_limit_gtc(OrderId::new(id), side, Price::new(price), Quantity::new(qty)).unwrap();
        let result = self.book.add(order).unwrap();

        for m in &result.matches {
            self.shadow.apply_trade(TradeEvent {
                resting_id: m.resting_order_id,
                resting_side: side.opposite(),
                price: m.execution_price,
                qty: m.matched,
            });
        }

        if let Some(remaining_id) = result.remaining {
            let remaining_qty = qty - result.matches.iter().map(|m| m.matched.get()).sum::<u64>();
            self.shadow.apply_add(AddEvent { id: remaining_id, side, price: Price::new(price), qty: Quantity::new(remaining_qty) });
        }

        self.assert_in_sync();
    }

    fn cancel(&mut self, id: u64, side: Side, price: i64, qty_before_cancel: u64) {
        assert!(self.book.cancel(OrderId::new(id)));
        self.shadow.apply_cancel(CancelEvent { id: OrderId::new(id), side, price: Price::new(price), qty: Quantity::new(qty_before_cancel) });
        self.assert_in_sync();
    }

    fn assert_in_sync(&self) {
        assert_eq!(self.book.best_bid(), self.shadow.best_bid());
        assert_eq!(self.book.best_ask(), self.shadow.best_ask());
        assert_eq!(self.book.bids(10), self.shadow.bids(10));
        assert_eq!(self.book.asks(10), self.shadow.asks(10));
    }
}

#[test]
fn resting_orders_stay_in_sync() {
    let mut h = Harness::new();
    h.add(1, Side::Buy, 100, 10);
    h.add(2, Side::Buy, 100, 20);
    h.add(3, Side::Buy, 90, 5);
    h.add(4, Side::Sell, 110, 7);
}

#[test]
fn crossing_trades_stay_in_sync() {
    let mut h = Harness::new();
    h.add(1, Side::Buy, 100, 50);
    h.add(2, Side::Buy, 105, 50);
    h.add(3, Side::Sell, 100, 70);
}

#[test]
fn cancel_clears_both_views() {
    let mut h = Harness::new();
    h.add(1, Side::Sell, 100, 10);
    h.add(2, Side::Sell, 100, 10);
    h.cancel(1, Side::Sell, 100, 10);
    h.cancel(2, Side::Sell, 100, 10);
}
