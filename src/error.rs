//! Boundary-facing error type.
//!
//! Most of the matching hot path (`cancel`, queries) is total and never
//! returns this type — see §7 of `SPEC_FULL.md` for the sentinel results
//! (`Option`, `bool`, `Quantity(0)`) used for every expected condition.
//! `OrderBookError` exists for the one genuinely exceptional condition: a
//! capacity-bounded node pool running out of slots while resting an order,
//! surfaced by [`crate::book::MatchingBook::add`] and
//! [`crate::book::MatchingBook::modify`]/`modify_price` when the book was
//! built with [`crate::book::MatchingBook::with_fixed_capacity`].

use crate::pool::PoolExhausted;

/// Errors surfaced at the edges of the engine rather than on the matching
/// hot path.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum OrderBookError {
    /// The node allocator could not service an allocation. Only reachable
    /// when the book is built over a fixed-capacity, non-growing pool.
    #[error("node allocator exhausted")]
    AllocatorExhausted,
}

impl From<PoolExhausted> for OrderBookError {
    fn from(_: PoolExhausted) -> Self {
        OrderBookError::AllocatorExhausted
    }
}
