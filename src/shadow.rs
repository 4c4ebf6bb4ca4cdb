//! The shadow book: an oracle that reconstructs aggregate depth purely from
//! a stream of [`AddEvent`]/[`ModifyEvent`]/[`CancelEvent`]/[`TradeEvent`]
//! records, independent of how [`crate::book::MatchingBook`] computes it.
//! Used in tests to check the two agree.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use crate::book::PriceLevelSummary;
use crate::events::{AddEvent, CancelEvent, ModifyEvent, TradeEvent};
use crate::types::{OrderId, Price, Quantity, Side};

struct OrderState {
    side: Side,
    price: Price,
    qty: Quantity,
}

/// Stateless-over-events depth reconstruction. Unknown ids on modify,
/// cancel or trade are silently ignored, since events may arrive
/// speculatively in test harnesses.
#[derive(Default)]
pub struct ShadowBook {
    bids: BTreeMap<Reverse<Price>, Quantity>,
    asks: BTreeMap<Price, Quantity>,
    orders: HashMap<OrderId, OrderState>,
}

impl ShadowBook {
    pub fn new() -> Self {
        Self::default()
    }

    fn credit(&mut self, side: Side, price: Price, qty: Quantity) {
        let bucket = match side {
            Side::Buy => self.bids.entry(Reverse(price)).or_insert(Quantity::ZERO),
            Side::Sell => self.asks.entry(price).or_insert(Quantity::ZERO),
        };
        *bucket += qty;
    }

    fn debit(&mut self, side: Side, price: Price, qty: Quantity) {
        match side {
            Side::Buy => {
                let key = Reverse(price);
                if let Some(bucket) = self.bids.get_mut(&key) {
                    *bucket -= qty;
                    if bucket.is_zero() {
                        self.bids.remove(&key);
                    }
                }
            }
            Side::Sell => {
                if let Some(bucket) = self.asks.get_mut(&price) {
                    *bucket -= qty;
                    if bucket.is_zero() {
                        self.asks.remove(&price);
                    }
                }
            }
        }
    }

    pub fn apply_add(&mut self, e: AddEvent) {
        self.orders.insert(e.id, OrderState { side: e.side, price: e.price, qty: e.qty });
        self.credit(e.side, e.price, e.qty);
    }

    pub fn apply_modify(&mut self, e: ModifyEvent) {
        let Some(state) = self.orders.get_mut(&e.id) else { return };
        let side = state.side;
        self.debit(side, state.price, state.qty);

        let state = self.orders.get_mut(&e.id).expect("just looked up above");
        state.price = e.new_price;
        state.qty = e.new_qty;
        self.credit(side, e.new_price, e.new_qty);
    }

    pub fn apply_cancel(&mut self, e: CancelEvent) {
        let Some(state) = self.orders.remove(&e.id) else { return };
        self.debit(state.side, state.price, state.qty);
    }

    pub fn apply_trade(&mut self, e: TradeEvent) {
        let Some(state) = self.orders.get_mut(&e.resting_id) else { return };
        let side = state.side;
        let price = state.price;
        state.qty -= e.qty;
        let exhausted = state.qty.is_zero();
        self.debit(side, price, e.qty);
        if exhausted {
            self.orders.remove(&e.resting_id);
        }
    }

    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next().map(|Reverse(p)| *p)
    }

    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    pub fn bids(&self, depth: usize) -> Vec<PriceLevelSummary> {
        self.bids
            .iter()
            .take(depth)
            .map(|(Reverse(price), qty)| PriceLevelSummary { price: *price, quantity: *qty })
            .collect()
    }

    pub fn asks(&self, depth: usize) -> Vec<PriceLevelSummary> {
        self.asks
            .iter()
            .take(depth)
            .map(|(price, qty)| PriceLevelSummary { price: *price, quantity: *qty })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_then_cancel_clears_level() {
        let mut shadow = ShadowBook::new();
        shadow.apply_add(AddEvent { id: OrderId::new(1), side: Side::Buy, price: Price::new(100), qty: Quantity::new(10) });
        assert_eq!(shadow.best_bid(), Some(Price::new(100)));

        shadow.apply_cancel(CancelEvent { id: OrderId::new(1), side: Side::Buy, price: Price::new(100), qty: Quantity::new(10) });
        assert_eq!(shadow.best_bid(), None);
    }

    #[test]
    fn trade_partially_drains_then_fully_removes() {
        let mut shadow = ShadowBook::new();
        shadow.apply_add(AddEvent { id: OrderId::new(1), side: Side::Sell, price: Price::new(100), qty: Quantity::new(10) });

        shadow.apply_trade(TradeEvent { resting_id: OrderId::new(1), resting_side: Side::Sell, price: Price::new(100), qty: Quantity::new(4) });
        assert_eq!(shadow.ask_size_for_test(Price::new(100)), Quantity::new(6));

        shadow.apply_trade(TradeEvent { resting_id: OrderId::new(1), resting_side: Side::Sell, price: Price::new(100), qty: Quantity::new(6) });
        assert_eq!(shadow.best_ask(), None);
    }

    #[test]
    fn modify_moves_liquidity_between_buckets() {
        let mut shadow = ShadowBook::new();
        shadow.apply_add(AddEvent { id: OrderId::new(1), side: Side::Buy, price: Price::new(100), qty: Quantity::new(10) });
        shadow.apply_modify(ModifyEvent {
            id: OrderId::new(1),
            side: Side::Buy,
            old_price: Price::new(100),
            new_price: Price::new(105),
            old_qty: Quantity::new(10),
            new_qty: Quantity::new(20),
        });

        assert_eq!(shadow.best_bid(), Some(Price::new(105)));
        assert_eq!(shadow.bid_size_for_test(Price::new(100)), Quantity::ZERO);
        assert_eq!(shadow.bid_size_for_test(Price::new(105)), Quantity::new(20));
    }

    #[test]
    fn unknown_id_events_are_ignored() {
        let mut shadow = ShadowBook::new();
        shadow.apply_cancel(CancelEvent { id: OrderId::new(1), side: Side::Buy, price: Price::new(100), qty: Quantity::new(10) });
        shadow.apply_trade(TradeEvent { resting_id: OrderId::new(1), resting_side: Side::Buy, price: Price::new(100), qty: Quantity::new(1) });
        assert_eq!(shadow.best_bid(), None);
    }

    impl ShadowBook {
        fn ask_size_for_test(&self, price: Price) -> Quantity {
            self.asks.get(&price).copied().unwrap_or(Quantity::ZERO)
        }

        fn bid_size_for_test(&self, price: Price) -> Quantity {
            self.bids.get(&Reverse(price)).copied().unwrap_or(Quantity::ZERO)
        }
    }
}
