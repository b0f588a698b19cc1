use derive_more::{Add, AddAssign, Sub, SubAssign, Sum};
use serde::{Deserialize, Serialize};

/// Amount of a single resource dimension.
///
/// Signed, because running totals are maintained by subtraction and a late
/// completion notice may temporarily push a total below zero.
#[derive(
    Debug,
    Default,
    Serialize,
    Deserialize,
    Clone,
    Copy,
    Hash,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    AddAssign,
    SubAssign,
    Sub,
    Add,
    Sum,
)]
#[serde(transparent)]
pub struct Quantity(i64);

impl Quantity {
    pub const ZERO: Quantity = Quantity(0);

    #[inline]
    pub fn new(value: i64) -> Self {
        Quantity(value)
    }

    #[inline]
    pub fn value(&self) -> i64 {
        self.0
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn saturating_add(&self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_add(other.0))
    }

    pub fn saturating_sub(&self, other: Quantity) -> Quantity {
        Quantity(self.0.saturating_sub(other.0))
    }

    pub fn saturating_pow(&self, exp: u32) -> Quantity {
        Quantity(self.0.saturating_pow(exp))
    }

    /// Ratio of `self` against `capacity`; `None` when the ratio is undefined
    /// (zero capacity, positive usage).
    pub fn ratio(&self, capacity: Quantity) -> Option<f64> {
        if capacity.0 == 0 {
            if self.0 > 0 { None } else { Some(0.0) }
        } else {
            Some(self.0 as f64 / capacity.0 as f64)
        }
    }
}

impl From<i64> for Quantity {
    fn from(value: i64) -> Self {
        Quantity(value)
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
