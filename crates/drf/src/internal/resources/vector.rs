use crate::internal::common::error::DrfError;
use crate::internal::resources::Quantity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::{Add, Sub};
use std::str::FromStr;

/// Multi-dimensional resource amount (cpu, memory, custom resources).
///
/// Dimensions that are not present are zero. All operations return a new vector,
/// running totals are never updated in place through a shared reference.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceVector {
    resources: BTreeMap<String, Quantity>,
}

impl ResourceVector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with<Q: Into<Quantity>>(mut self, name: &str, amount: Q) -> Self {
        self.set(name, amount);
        self
    }

    pub fn set<Q: Into<Quantity>>(&mut self, name: &str, amount: Q) {
        self.resources.insert(name.to_string(), amount.into());
    }

    #[inline]
    pub fn get(&self, name: &str) -> Quantity {
        self.resources.get(name).copied().unwrap_or(Quantity::ZERO)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Quantity)> {
        self.resources.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn dimensions(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(|k| k.as_str())
    }

    pub fn is_zero(&self) -> bool {
        self.resources.values().all(|v| v.is_zero())
    }

    /// Per-dimension sum, saturating at the bounds of [`Quantity`].
    pub fn add(&self, other: &ResourceVector) -> ResourceVector {
        let mut result = self.clone();
        for (name, amount) in other.iter() {
            let value = result
                .resources
                .entry(name.to_string())
                .or_insert(Quantity::ZERO);
            *value = value.saturating_add(amount);
        }
        result
    }

    /// Per-dimension difference, saturating at the bounds of [`Quantity`].
    pub fn subtract(&self, other: &ResourceVector) -> ResourceVector {
        let mut result = self.clone();
        for (name, amount) in other.iter() {
            let value = result
                .resources
                .entry(name.to_string())
                .or_insert(Quantity::ZERO);
            *value = value.saturating_sub(amount);
        }
        result
    }

    /// Raises every dimension to `exp`, saturating on overflow.
    pub fn power(&self, exp: u32) -> ResourceVector {
        ResourceVector {
            resources: self
                .resources
                .iter()
                .map(|(k, v)| (k.clone(), v.saturating_pow(exp)))
                .collect(),
        }
    }

    /// Largest single-dimension value, `None` for a vector without dimensions.
    pub fn max(&self) -> Option<Quantity> {
        self.resources.values().copied().max()
    }

    /// Per-dimension average of `vectors` (integer division).
    pub fn average(vectors: &[ResourceVector]) -> ResourceVector {
        if vectors.is_empty() {
            return ResourceVector::new();
        }
        let sum = vectors
            .iter()
            .fold(ResourceVector::new(), |acc, v| acc.add(v));
        let count = vectors.len() as i64;
        ResourceVector {
            resources: sum
                .resources
                .into_iter()
                .map(|(k, v)| (k, Quantity::new(v.value() / count)))
                .collect(),
        }
    }

    /// Per-dimension ratio of this vector against `capacity`.
    ///
    /// Covers every dimension present in either vector.
    pub fn ratios(&self, capacity: &ResourceVector) -> crate::Result<BTreeMap<String, f64>> {
        let mut result = BTreeMap::new();
        for name in self.dimensions().chain(capacity.dimensions()) {
            if result.contains_key(name) {
                continue;
            }
            let usage = self.get(name);
            let ratio =
                usage
                    .ratio(capacity.get(name))
                    .ok_or_else(|| DrfError::InvalidCapacity {
                        dimension: name.to_string(),
                        usage: usage.value(),
                    })?;
            result.insert(name.to_string(), ratio);
        }
        Ok(result)
    }
}

/// Dominant share of `used` relative to `capacity`: the largest per-dimension ratio.
///
/// Never returns a value below zero.
pub fn dominant_ratio(used: &ResourceVector, capacity: &ResourceVector) -> crate::Result<f64> {
    Ok(used
        .ratios(capacity)?
        .into_values()
        .fold(0.0, f64::max))
}

impl Add for &ResourceVector {
    type Output = ResourceVector;

    fn add(self, rhs: Self) -> Self::Output {
        ResourceVector::add(self, rhs)
    }
}

impl Sub for &ResourceVector {
    type Output = ResourceVector;

    fn sub(self, rhs: Self) -> Self::Output {
        self.subtract(rhs)
    }
}

impl<'a, Q: Into<Quantity>> FromIterator<(&'a str, Q)> for ResourceVector {
    fn from_iter<I: IntoIterator<Item = (&'a str, Q)>>(iter: I) -> Self {
        let mut result = ResourceVector::new();
        for (name, amount) in iter {
            result.set(name, amount);
        }
        result
    }
}

impl Display for ResourceVector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (i, (name, amount)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{name}={amount}")?;
        }
        Ok(())
    }
}

/// Parses `cpu=10,memory=512`. An empty string is an empty vector.
impl FromStr for ResourceVector {
    type Err = DrfError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut result = ResourceVector::new();
        for item in s.split(',').map(str::trim).filter(|item| !item.is_empty()) {
            let (name, amount) = item
                .split_once('=')
                .ok_or_else(|| format!("Invalid resource item '{item}', expected <name>=<amount>"))?;
            let name = name.trim();
            if name.is_empty() {
                return Err(format!("Missing resource name in '{item}'").into());
            }
            let amount: i64 = amount
                .trim()
                .parse()
                .map_err(|e| format!("Invalid amount of resource '{name}': {e}"))?;
            result.set(name, amount);
        }
        Ok(result)
    }
}
