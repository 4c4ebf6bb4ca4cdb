//! Strongly-typed value types shared across the matching book.
//!
//! `Price`, `Quantity` and `OrderId` are thin newtypes over integers rather
//! than bare `i64`/`u64`, so a price can never be passed where a quantity is
//! expected and vice versa. Ordering and arithmetic are derived or hand-rolled
//! per type; hashing always delegates to the underlying integer.

use std::fmt;
use std::ops::{Add, AddAssign, Sub, SubAssign};

/// Generates a newtype wrapping an integer, with `get()`, total ordering and
/// `Display` delegated straight to the inner value.
macro_rules! strong_int {
    ($name:ident, $inner:ty) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
        pub struct $name($inner);

        impl $name {
            #[inline]
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            #[inline]
            pub const fn get(self) -> $inner {
                self.0
            }
        }

        impl From<$inner> for $name {
            #[inline]
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

strong_int!(Price, i64);
strong_int!(Quantity, u64);
strong_int!(OrderId, u64);

impl Add for Price {
    type Output = Price;
    #[inline]
    fn add(self, rhs: Price) -> Price {
        Price(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Price;
    #[inline]
    fn sub(self, rhs: Price) -> Price {
        Price(self.0 - rhs.0)
    }
}

impl Add for Quantity {
    type Output = Quantity;
    #[inline]
    fn add(self, rhs: Quantity) -> Quantity {
        Quantity(self.0 + rhs.0)
    }
}

impl AddAssign for Quantity {
    #[inline]
    fn add_assign(&mut self, rhs: Quantity) {
        self.0 += rhs.0;
    }
}

impl Sub for Quantity {
    type Output = Quantity;
    #[inline]
    fn sub(self, rhs: Quantity) -> Quantity {
        // Never observed below zero in valid book states; invariant I5 /
        // liquidity bookkeeping guarantee the subtrahend is always <= self.
        Quantity(self.0 - rhs.0)
    }
}

impl SubAssign for Quantity {
    #[inline]
    fn sub_assign(&mut self, rhs: Quantity) {
        self.0 -= rhs.0;
    }
}

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    #[inline]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub fn min(self, other: Quantity) -> Quantity {
        Quantity(self.0.min(other.0))
    }
}

/// Sentinel for a market sell's effective matchable price (crosses any bid).
pub const MIN_PRICE: Price = Price(0);
/// Sentinel for a market buy's effective matchable price (crosses any ask).
pub const MAX_PRICE: Price = Price(i64::MAX);

/// Which side of the book an order rests on or aggresses against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    #[inline]
    pub const fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Buy => write!(f, "buy"),
            Side::Sell => write!(f, "sell"),
        }
    }
}

/// Whether an order carries an explicit limit price or matches at the best
/// available price on the opposite side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum OrderType {
    Limit,
    Market,
}

/// How long an order may rest before it must be filled or discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum TimeInForce {
    /// Good-Till-Cancelled: any unfilled residual rests on the book.
    Gtc,
    /// Immediate-Or-Cancel: fill what you can immediately, discard the rest.
    Ioc,
    /// Fill-Or-Kill: fill the whole order immediately, or do nothing at all.
    Fok,
}
