//! Convenience re-export of the types most call sites need.
//!
//! ```
//! use matching_book::prelude::*;
//! ```

pub use crate::book::{AddResult, MatchResult, MatchingBook, PriceLevelSummary};
pub use crate::error::OrderBookError;
pub use crate::events::{AddEvent, CancelEvent, ModifyEvent, TradeEvent};
pub use crate::order::Order;
pub use crate::shadow::ShadowBook;
pub use crate::types::{MAX_PRICE, MIN_PRICE, OrderId, OrderType, Price, Quantity, Side, TimeInForce};
