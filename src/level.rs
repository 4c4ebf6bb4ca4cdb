//! A single price level: a doubly-linked FIFO of resting orders plus a
//! cached liquidity total, backed by the slab allocator in [`crate::pool`].

use crate::order::Order;
use crate::pool::{Handle, NodePool, PoolExhausted};
use crate::types::Quantity;

/// A node in a price level's intrusive FIFO. Owned by exactly one
/// [`PriceLevel`] at a time; `prev`/`next` are slab handles, not pointers.
pub struct OrderNode {
    pub order: Order,
    prev: Option<Handle>,
    next: Option<Handle>,
}

impl OrderNode {
    fn new(order: Order) -> Self {
        OrderNode { order, prev: None, next: None }
    }
}

/// All resting orders at one `(side, price)` pair: an arrival-ordered FIFO
/// and the liquidity cache that invariant L requires to always equal the
/// sum of remaining quantities in the FIFO.
#[derive(Default)]
pub struct PriceLevel {
    head: Option<Handle>,
    tail: Option<Handle>,
    pub liquidity: Quantity,
}

impl PriceLevel {
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    #[inline]
    pub fn head(&self) -> Option<Handle> {
        self.head
    }

    /// Allocates a node for `order` and appends it to the FIFO tail,
    /// crediting its quantity to the liquidity cache. Fails without touching
    /// the FIFO or the liquidity cache if the pool is exhausted.
    pub fn push_back(&mut self, pool: &mut NodePool<OrderNode>, order: Order) -> Result<Handle, PoolExhausted> {
        let qty = order.remaining_quantity();
        let handle = pool.allocate(OrderNode::new(order))?;

        match self.tail {
            None => {
                self.head = Some(handle);
                self.tail = Some(handle);
            }
            Some(tail) => {
                pool.get_mut(tail).next = Some(handle);
                pool.get_mut(handle).prev = Some(tail);
                self.tail = Some(handle);
            }
        }

        self.liquidity += qty;
        Ok(handle)
    }

    /// Unlinks `handle` from the FIFO (does not touch liquidity; callers
    /// debit liquidity themselves since the amount to debit differs between
    /// a full removal and a partial fill) and frees its slot, returning the
    /// order that was stored there.
    pub fn remove(&mut self, pool: &mut NodePool<OrderNode>, handle: Handle) -> Order {
        let (prev, next) = {
            let node = pool.get(handle);
            (node.prev, node.next)
        };

        match prev {
            Some(p) => pool.get_mut(p).next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => pool.get_mut(n).prev = prev,
            None => self.tail = prev,
        }

        pool.deallocate(handle).order
    }
}
