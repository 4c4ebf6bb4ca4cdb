//! A single-instrument limit order book with price-time priority matching.
//!
//! The book supports limit and market orders under GTC, IOC and FOK
//! time-in-force, resting liquidity in price levels ordered best-first on
//! each side. Matching, resting, cancelling and modifying are total
//! operations: invalid or no-op requests report themselves through sentinel
//! results (`Option`, `bool`, an empty match list) rather than errors. See
//! [`error::OrderBookError`] for the one boundary condition that isn't.
//!
//! The engine is single-threaded by design: [`book::MatchingBook`] carries
//! no internal synchronisation and is not `Sync`. Callers needing concurrent
//! access serialise around it themselves.
//!
//! ```
//! use matching_book::prelude::*;
//!
//! let mut book = MatchingBook::new();
//! book.add(Order::make_limit_gtc(OrderId::new(1), Side::Buy, Price::new(100), Quantity::new(10)).unwrap()).unwrap();
//!
//! let incoming = Order::make_limit_gtc(OrderId::new(2), Side::Sell, Price::new(100), Quantity::new(4)).unwrap();
//! let result = book.add(incoming).unwrap();
//! assert_eq!(result.matches.len(), 1);
//! assert_eq!(book.bid_size_at(Price::new(100)), Quantity::new(6));
//! ```

pub mod book;
pub mod error;
pub mod events;
pub mod level;
pub mod order;
pub mod pool;
pub mod prelude;
pub mod shadow;
pub mod types;

pub use book::{AddResult, MatchResult, MatchingBook, PriceLevelSummary};
pub use error::OrderBookError;
pub use order::Order;
pub use shadow::ShadowBook;
pub use types::{MAX_PRICE, MIN_PRICE, OrderId, OrderType, Price, Quantity, Side, TimeInForce};
