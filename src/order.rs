//! A single order's identity and mutable remaining quantity.

use crate::types::{OrderId, OrderType, Price, Quantity, Side, TimeInForce};

/// A resting or incoming order.
///
/// Identity (`id`, `side`, `order_type`, `tif`, `price`, `initial_qty`) is
/// fixed at construction. Only `remaining_qty` ever changes, and only
/// monotonically downward via [`Order::apply_fill`] or by outright
/// replacement via [`Order::change_quantity`] (used by `modify`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    side: Side,
    order_type: OrderType,
    tif: TimeInForce,
    price: Option<Price>,
    initial_qty: Quantity,
    remaining_qty: Quantity,
}

impl Order {
    /// Builds a limit order, or returns `None` if `qty` is zero or `price`
    /// is negative. Never constructs an invalid order.
    pub fn make_limit(
        id: OrderId,
        side: Side,
        price: Price,
        qty: Quantity,
        tif: TimeInForce,
    ) -> Option<Order> {
        if qty.is_zero() || price.get() < 0 {
            return None;
        }

        Some(Order {
            id,
            side,
            order_type: OrderType::Limit,
            tif,
            price: Some(price),
            initial_qty: qty,
            remaining_qty: qty,
        })
    }

    /// Builds a limit order defaulting to `TimeInForce::Gtc`.
    pub fn make_limit_gtc(id: OrderId, side: Side, price: Price, qty: Quantity) -> Option<Order> {
        Self::make_limit(id, side, price, qty, TimeInForce::Gtc)
    }

    /// Builds a market order (no price), or returns `None` if `qty` is zero.
    pub fn make_market(id: OrderId, side: Side, qty: Quantity, tif: TimeInForce) -> Option<Order> {
        if qty.is_zero() {
            return None;
        }

        Some(Order {
            id,
            side,
            order_type: OrderType::Market,
            tif,
            price: None,
            initial_qty: qty,
            remaining_qty: qty,
        })
    }

    /// Builds a market order defaulting to `TimeInForce::Ioc`.
    pub fn make_market_ioc(id: OrderId, side: Side, qty: Quantity) -> Option<Order> {
        Self::make_market(id, side, qty, TimeInForce::Ioc)
    }

    #[inline]
    pub fn id(&self) -> OrderId {
        self.id
    }

    #[inline]
    pub fn side(&self) -> Side {
        self.side
    }

    #[inline]
    pub fn order_type(&self) -> OrderType {
        self.order_type
    }

    #[inline]
    pub fn time_in_force(&self) -> TimeInForce {
        self.tif
    }

    /// `None` only for market orders.
    #[inline]
    pub fn price(&self) -> Option<Price> {
        self.price
    }

    #[inline]
    pub fn initial_quantity(&self) -> Quantity {
        self.initial_qty
    }

    #[inline]
    pub fn remaining_quantity(&self) -> Quantity {
        self.remaining_qty
    }

    #[inline]
    pub fn is_limit(&self) -> bool {
        matches!(self.order_type, OrderType::Limit)
    }

    #[inline]
    pub fn is_market(&self) -> bool {
        matches!(self.order_type, OrderType::Market)
    }

    #[inline]
    pub fn is_filled(&self) -> bool {
        self.remaining_qty.is_zero()
    }

    /// Fills up to `qty` against this order's remaining quantity, returning
    /// the amount actually matched (`min(qty, remaining)`).
    pub fn apply_fill(&mut self, qty: Quantity) -> Quantity {
        let matched = qty.min(self.remaining_qty);
        self.remaining_qty -= matched;
        matched
    }

    /// Replaces the remaining quantity outright. Used by `modify`, which is
    /// defined as cancel-then-re-add with the new quantity.
    pub fn change_quantity(&mut self, qty: Quantity) {
        self.remaining_qty = qty;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_quantity_limit() {
        assert!(Order::make_limit_gtc(OrderId::new(1), Side::Buy, Price::new(100), Quantity::ZERO).is_none());
    }

    #[test]
    fn rejects_negative_price_limit() {
        assert!(
            Order::make_limit_gtc(OrderId::new(1), Side::Buy, Price::new(-1), Quantity::new(10))
                .is_none()
        );
    }

    #[test]
    fn rejects_zero_quantity_market() {
        assert!(Order::make_market_ioc(OrderId::new(1), Side::Buy, Quantity::ZERO).is_none());
    }

    #[test]
    fn market_order_has_no_price() {
        let o = Order::make_market_ioc(OrderId::new(1), Side::Buy, Quantity::new(5)).unwrap();
        assert_eq!(o.price(), None);
        assert!(o.is_market());
    }

    #[test]
    fn apply_fill_caps_at_remaining() {
        let mut o =
            Order::make_limit_gtc(OrderId::new(1), Side::Buy, Price::new(100), Quantity::new(10))
                .unwrap();
        assert_eq!(o.apply_fill(Quantity::new(4)), Quantity::new(4));
        assert_eq!(o.remaining_quantity(), Quantity::new(6));
        assert_eq!(o.apply_fill(Quantity::new(100)), Quantity::new(6));
        assert!(o.is_filled());
    }

    #[test]
    fn change_quantity_replaces_remaining() {
        let mut o =
            Order::make_limit_gtc(OrderId::new(1), Side::Buy, Price::new(100), Quantity::new(10))
                .unwrap();
        o.apply_fill(Quantity::new(3));
        o.change_quantity(Quantity::new(50));
        assert_eq!(o.remaining_quantity(), Quantity::new(50));
        assert_eq!(o.initial_quantity(), Quantity::new(10));
    }
}
