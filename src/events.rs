//! Plain event records describing operations applied to a book, used to
//! drive the [`crate::shadow::ShadowBook`] oracle.

use crate::types::{OrderId, Price, Quantity, Side};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddEvent {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub qty: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModifyEvent {
    pub id: OrderId,
    pub side: Side,
    pub old_price: Price,
    pub new_price: Price,
    pub old_qty: Quantity,
    pub new_qty: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CancelEvent {
    pub id: OrderId,
    pub side: Side,
    pub price: Price,
    pub qty: Quantity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TradeEvent {
    pub resting_id: OrderId,
    pub resting_side: Side,
    pub price: Price,
    pub qty: Quantity,
}
