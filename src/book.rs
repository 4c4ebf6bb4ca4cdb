//! The matching book: price-level index, per-level FIFO, id→location map,
//! and the add/cancel/modify/match algorithm described in `SPEC_FULL.md` §4.3.
//!
//! This is the intrusive-list-with-pool variant (see `DESIGN.md` for why the
//! linked-FIFO and vector-of-levels alternatives are not shipped alongside
//! it). Resting orders live in a slab ([`crate::pool::NodePool`]); levels are
//! held in ordered maps so iteration yields best price first on each side.

use std::cmp::Reverse;
use std::collections::{BTreeMap, HashMap};

use tracing::trace;

use crate::error::OrderBookError;
use crate::level::{OrderNode, PriceLevel};
use crate::order::Order;
use crate::pool::{Handle, NodePool};
use crate::types::{MAX_PRICE, MIN_PRICE, OrderId, Price, Quantity, Side, TimeInForce};

/// One resting-order fill produced while matching an incoming order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchResult {
    pub resting_order_id: OrderId,
    pub matched: Quantity,
    pub execution_price: Price,
}

/// The outcome of [`MatchingBook::add`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AddResult {
    pub matches: Vec<MatchResult>,
    pub remaining: Option<OrderId>,
}

/// A best-first depth snapshot entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceLevelSummary {
    pub price: Price,
    pub quantity: Quantity,
}

struct OrderLocation {
    side: Side,
    price: Price,
    handle: Handle,
}

const DEFAULT_POOL_BLOCK_SIZE: usize = 4096;

/// The single-instrument limit order book.
///
/// Not `Sync`/`Send`-bounded by design: §5 mandates a single-threaded,
/// cooperative owner with no internal synchronisation. A deployment needing
/// multi-producer access must serialise externally.
pub struct MatchingBook {
    bids: BTreeMap<Reverse<Price>, PriceLevel>,
    asks: BTreeMap<Price, PriceLevel>,
    orders: HashMap<OrderId, OrderLocation>,
    pool: NodePool<OrderNode>,
}

impl Default for MatchingBook {
    fn default() -> Self {
        Self::new()
    }
}

impl MatchingBook {
    /// A book whose node pool grows in blocks of the default size.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_POOL_BLOCK_SIZE)
    }

    /// A book whose node pool grows in blocks of `block_size` slots.
    pub fn with_capacity(block_size: usize) -> Self {
        MatchingBook {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            pool: NodePool::new(block_size),
        }
    }

    /// A book whose node pool has a fixed `capacity` and never grows;
    /// `add`/`modify`/`modify_price` return
    /// `Err(OrderBookError::AllocatorExhausted)` once it fills up. Exists to
    /// exercise the allocator-exhaustion boundary (§7); the default,
    /// growing pool from [`MatchingBook::new`]/[`MatchingBook::with_capacity`]
    /// never takes this path.
    pub fn with_fixed_capacity(capacity: usize) -> Self {
        MatchingBook {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            orders: HashMap::new(),
            pool: NodePool::with_fixed_capacity(capacity),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    #[inline]
    pub fn best_bid(&self) -> Option<Price> {
        self.bids.keys().next().map(|Reverse(p)| *p)
    }

    #[inline]
    pub fn best_ask(&self) -> Option<Price> {
        self.asks.keys().next().copied()
    }

    pub fn bid_size_at(&self, price: Price) -> Quantity {
        self.bids.get(&Reverse(price)).map(|l| l.liquidity).unwrap_or(Quantity::ZERO)
    }

    pub fn ask_size_at(&self, price: Price) -> Quantity {
        self.asks.get(&price).map(|l| l.liquidity).unwrap_or(Quantity::ZERO)
    }

    /// Best-first snapshot of up to `depth` bid levels.
    pub fn bids(&self, depth: usize) -> Vec<PriceLevelSummary> {
        self.bids
            .iter()
            .take(depth)
            .map(|(Reverse(price), level)| PriceLevelSummary { price: *price, quantity: level.liquidity })
            .collect()
    }

    /// Best-first snapshot of up to `depth` ask levels.
    pub fn asks(&self, depth: usize) -> Vec<PriceLevelSummary> {
        self.asks
            .iter()
            .take(depth)
            .map(|(price, level)| PriceLevelSummary { price: *price, quantity: level.liquidity })
            .collect()
    }

    /// Matches `order` against the opposite side and rests any eligible
    /// residual. Consumes `order`. Fails only if the node pool backing this
    /// book is capacity-bounded (see [`MatchingBook::with_fixed_capacity`])
    /// and has no free slot left to rest the residual in.
    pub fn add(&mut self, mut order: Order) -> Result<AddResult, OrderBookError> {
        trace!(
            id = order.id().get(),
            side = %order.side(),
            qty = order.remaining_quantity().get(),
            "add"
        );

        let mut result = AddResult::default();

        if self.can_match(&order) {
            result.matches = self.match_order(&mut order);
            self.debug_assert_not_crossed();
        }

        if self.should_rest(&order) {
            let side = order.side();
            let price = self.effective_price(&order);
            let id = order.id();

            let level = match side {
                Side::Buy => self.bids.entry(Reverse(price)).or_default(),
                Side::Sell => self.asks.entry(price).or_default(),
            };
            let handle = level.push_back(&mut self.pool, order)?;
            self.orders.insert(id, OrderLocation { side, price, handle });
            result.remaining = Some(id);
        }

        Ok(result)
    }

    /// Removes a resting order. Returns `false` if `id` is unknown.
    pub fn cancel(&mut self, id: OrderId) -> bool {
        let Some(location) = self.orders.remove(&id) else {
            trace!(id = id.get(), "cancel miss");
            return false;
        };

        self.remove_resting(&location);
        trace!(id = id.get(), "cancel hit");
        true
    }

    /// Equivalent to `cancel(id)` followed by a re-`add` at the same price
    /// with the new quantity, GTC. Loses time priority. `Ok(false)` if `id`
    /// is unknown. Can fail with `OrderBookError::AllocatorExhausted` for
    /// the same reason `add` can: the order has already been unlinked from
    /// its old slot by the time the re-`add` runs, so on this error `id` no
    /// longer rests anywhere in the book.
    pub fn modify(&mut self, id: OrderId, new_qty: Quantity) -> Result<bool, OrderBookError> {
        let Some(location) = self.orders.remove(&id) else {
            return Ok(false);
        };
        let mut order = self.remove_resting(&location);
        order.change_quantity(new_qty);
        trace!(id = id.get(), new_qty = new_qty.get(), "modify quantity");
        self.add(order)?;
        Ok(true)
    }

    /// As [`MatchingBook::modify`] but also relocates the order to
    /// `new_price`. `Ok(false)` if `id` is unknown or if `new_qty`/`new_price`
    /// are invalid (the order is discarded in that case, per spec this path
    /// is only reachable with well-formed input).
    pub fn modify_price(&mut self, id: OrderId, new_qty: Quantity, new_price: Price) -> Result<bool, OrderBookError> {
        let Some(location) = self.orders.remove(&id) else {
            return Ok(false);
        };
        let old = self.remove_resting(&location);
        let Some(replacement) =
            Order::make_limit(id, old.side(), new_price, new_qty, old.time_in_force())
        else {
            return Ok(false);
        };
        trace!(id = id.get(), new_qty = new_qty.get(), new_price = new_price.get(), "modify price");
        self.add(replacement)?;
        Ok(true)
    }

    /// Unlinks and frees the resting order at `location`, debiting the
    /// level's liquidity and removing the level if it's now empty.
    fn remove_resting(&mut self, location: &OrderLocation) -> Order {
        match location.side {
            Side::Buy => {
                let key = Reverse(location.price);
                let level = self.bids.get_mut(&key).expect("id index points at a live level");
                let order = level.remove(&mut self.pool, location.handle);
                level.liquidity -= order.remaining_quantity();
                if level.is_empty() {
                    self.bids.remove(&key);
                }
                debug_assert!(!self.bids.get(&key).is_some_and(PriceLevel::is_empty), "empty bid level left in map");
                order
            }
            Side::Sell => {
                let level = self.asks.get_mut(&location.price).expect("id index points at a live level");
                let order = level.remove(&mut self.pool, location.handle);
                level.liquidity -= order.remaining_quantity();
                if level.is_empty() {
                    self.asks.remove(&location.price);
                }
                debug_assert!(
                    !self.asks.get(&location.price).is_some_and(PriceLevel::is_empty),
                    "empty ask level left in map"
                );
                order
            }
        }
    }

    /// Invariant I1 (never cross): after matching runs to completion, the
    /// best bid must be strictly below the best ask.
    fn debug_assert_not_crossed(&self) {
        debug_assert!(
            match (self.best_bid(), self.best_ask()) {
                (Some(bid), Some(ask)) => bid < ask,
                _ => true,
            },
            "book crossed: best_bid={:?} best_ask={:?}",
            self.best_bid(),
            self.best_ask(),
        );
    }

    fn effective_price(&self, order: &Order) -> Price {
        match order.price() {
            Some(p) => p,
            None => match order.side() {
                Side::Buy => MAX_PRICE,
                Side::Sell => MIN_PRICE,
            },
        }
    }

    fn should_rest(&self, order: &Order) -> bool {
        !order.remaining_quantity().is_zero() && matches!(order.time_in_force(), TimeInForce::Gtc)
    }

    /// Eligibility check per §4.3.1: GTC/IOC need any crossing level; FOK
    /// needs aggregate crossing liquidity to cover the whole order.
    fn can_match(&self, order: &Order) -> bool {
        let price = self.effective_price(order);
        let side = order.side();

        match order.time_in_force() {
            TimeInForce::Gtc | TimeInForce::Ioc => match side {
                Side::Buy => self.best_ask().is_some_and(|ask| ask <= price),
                Side::Sell => self.best_bid().is_some_and(|bid| bid >= price),
            },
            TimeInForce::Fok => {
                let crossing_liquidity: Quantity = match side {
                    Side::Buy => self
                        .asks
                        .range(..=price)
                        .map(|(_, level)| level.liquidity)
                        .fold(Quantity::ZERO, |a, b| a + b),
                    Side::Sell => self
                        .bids
                        .range(..=Reverse(price))
                        .map(|(_, level)| level.liquidity)
                        .fold(Quantity::ZERO, |a, b| a + b),
                };
                crossing_liquidity >= order.remaining_quantity()
            }
        }
    }

    /// Runs the match loop, consuming opposite-side liquidity into `order`
    /// and returning the fills produced. `order`'s remaining quantity is
    /// left reflecting whatever could not be matched.
    fn match_order(&mut self, order: &mut Order) -> Vec<MatchResult> {
        let price = self.effective_price(order);
        let side = order.side();
        let mut matches = Vec::new();

        loop {
            if order.remaining_quantity().is_zero() {
                break;
            }

            let crosses = match side {
                Side::Buy => self.best_ask().is_some_and(|ask| ask <= price),
                Side::Sell => self.best_bid().is_some_and(|bid| bid >= price),
            };
            if !crosses {
                break;
            }

            let (level_price, head) = match side {
                Side::Buy => {
                    let (p, level) = self.asks.iter().next().expect("crosses implies a level");
                    (*p, level.head().expect("non-empty level has a head"))
                }
                Side::Sell => {
                    let (Reverse(p), level) = self.bids.iter().next().expect("crosses implies a level");
                    (*p, level.head().expect("non-empty level has a head"))
                }
            };

            let (matched_qty, resting_id, resting_filled) = match side {
                Side::Buy => {
                    let level = self.asks.get_mut(&level_price).expect("level present");
                    let node = self.pool.get_mut(head);
                    let matched = node.order.apply_fill(order.remaining_quantity());
                    level.liquidity -= matched;
                    order.apply_fill(matched);
                    (matched, node.order.id(), node.order.is_filled())
                }
                Side::Sell => {
                    let level = self.bids.get_mut(&Reverse(level_price)).expect("level present");
                    let node = self.pool.get_mut(head);
                    let matched = node.order.apply_fill(order.remaining_quantity());
                    level.liquidity -= matched;
                    order.apply_fill(matched);
                    (matched, node.order.id(), node.order.is_filled())
                }
            };

            trace!(
                resting_id = resting_id.get(),
                matched = matched_qty.get(),
                price = level_price.get(),
                "match"
            );
            matches.push(MatchResult { resting_order_id: resting_id, matched: matched_qty, execution_price: level_price });

            if resting_filled {
                self.orders.remove(&resting_id);
                match side {
                    Side::Buy => {
                        let level = self.asks.get_mut(&level_price).expect("level present");
                        level.remove(&mut self.pool, head);
                        if level.is_empty() {
                            self.asks.remove(&level_price);
                        }
                        debug_assert!(
                            !self.asks.get(&level_price).is_some_and(PriceLevel::is_empty),
                            "empty ask level left in map"
                        );
                    }
                    Side::Sell => {
                        let level = self.bids.get_mut(&Reverse(level_price)).expect("level present");
                        level.remove(&mut self.pool, head);
                        if level.is_empty() {
                            self.bids.remove(&Reverse(level_price));
                        }
                        debug_assert!(
                            !self.bids.get(&Reverse(level_price)).is_some_and(PriceLevel::is_empty),
                            "empty bid level left in map"
                        );
                    }
                }
            }
        }

        matches
    }
}
