//! Size vectors - the fixed five-slot quantity breakdown used by every ledger.
//!
//! Production entries, order lines and cutting batches all carry one quantity per
//! size in the fixed set `PP, P, M, G, GG`. No other sizes are representable.
//! Netted stock may go negative, so the counters are signed.

use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::str::FromStr;

/// Largest quantity accepted for a single size or sheet count.
pub const MAX_QUANTITY: i64 = 2_147_483_647;

/// One of the five garment sizes, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Size {
    /// Extra small
    PP,
    /// Small
    P,
    /// Medium
    M,
    /// Large
    G,
    /// Extra large
    GG,
}

impl Size {
    /// All sizes in canonical order.
    pub const ALL: [Self; 5] = [Self::PP, Self::P, Self::M, Self::G, Self::GG];

    /// The label operators type and read.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PP => "PP",
            Self::P => "P",
            Self::M => "M",
            Self::G => "G",
            Self::GG => "GG",
        }
    }

    /// Parses a size label, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Quantities per size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SizeVector {
    /// Quantity of size PP
    pub pp: i64,
    /// Quantity of size P
    pub p: i64,
    /// Quantity of size M
    pub m: i64,
    /// Quantity of size G
    pub g: i64,
    /// Quantity of size GG
    pub gg: i64,
}

impl SizeVector {
    /// Builds a vector from the five counters in canonical order.
    #[must_use]
    pub const fn new(pp: i64, p: i64, m: i64, g: i64, gg: i64) -> Self {
        Self { pp, p, m, g, gg }
    }

    /// A vector holding `quantity` of a single size and zero elsewhere.
    #[must_use]
    pub fn single(size: Size, quantity: i64) -> Self {
        let mut vector = Self::default();
        *vector.get_mut(size) += quantity;
        vector
    }

    /// Quantity held for `size`.
    #[must_use]
    pub const fn get(&self, size: Size) -> i64 {
        match size {
            Size::PP => self.pp,
            Size::P => self.p,
            Size::M => self.m,
            Size::G => self.g,
            Size::GG => self.gg,
        }
    }

    /// Mutable access to the counter for `size`.
    pub const fn get_mut(&mut self, size: Size) -> &mut i64 {
        match size {
            Size::PP => &mut self.pp,
            Size::P => &mut self.p,
            Size::M => &mut self.m,
            Size::G => &mut self.g,
            Size::GG => &mut self.gg,
        }
    }

    /// Sum of all five counters, saturating at the `i64` bounds.
    #[must_use]
    pub const fn total(&self) -> i64 {
        self.pp
            .saturating_add(self.p)
            .saturating_add(self.m)
            .saturating_add(self.g)
            .saturating_add(self.gg)
    }

    /// Sum of all five counters, failing instead of saturating.
    ///
    /// Write workflows store this value in the `total` column.
    pub fn checked_total(&self) -> Result<i64> {
        Size::ALL
            .into_iter()
            .try_fold(0_i64, |sum, size| sum.checked_add(self.get(size)))
            .ok_or(Error::InvalidQuantity {
                quantity: self.total(),
            })
    }

    /// True when every counter is zero.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.pp == 0 && self.p == 0 && self.m == 0 && self.g == 0 && self.gg == 0
    }

    /// Sizes whose counter is strictly positive, in canonical order.
    #[must_use]
    pub fn positive_sizes(&self) -> Vec<Size> {
        Size::ALL
            .into_iter()
            .filter(|size| self.get(*size) > 0)
            .collect()
    }

    /// Every counter multiplied by `factor` (pieces per sheet times sheets).
    pub fn scaled(&self, factor: i64) -> Result<Self> {
        let mut scaled = Self::default();
        for size in Size::ALL {
            let quantity = self.get(size);
            *scaled.get_mut(size) = quantity
                .checked_mul(factor)
                .ok_or(Error::InvalidQuantity { quantity })?;
        }
        Ok(scaled)
    }

    /// Returns the first counter outside `0..=MAX_QUANTITY`, if any.
    ///
    /// Write workflows call this before touching the store.
    pub fn ensure_in_range(&self) -> Result<()> {
        match Size::ALL
            .into_iter()
            .map(|size| self.get(size))
            .find(|qty| !(0..=MAX_QUANTITY).contains(qty))
        {
            Some(quantity) => Err(Error::InvalidQuantity { quantity }),
            None => Ok(()),
        }
    }
}

impl AddAssign for SizeVector {
    fn add_assign(&mut self, rhs: Self) {
        for size in Size::ALL {
            *self.get_mut(size) += rhs.get(size);
        }
    }
}

impl SubAssign for SizeVector {
    fn sub_assign(&mut self, rhs: Self) {
        for size in Size::ALL {
            *self.get_mut(size) -= rhs.get(size);
        }
    }
}

impl fmt::Display for SizeVector {
    /// Formats as `PP=1,P=0,M=3,G=0,GG=0`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = Size::ALL
            .into_iter()
            .map(|size| format!("{size}={}", self.get(size)))
            .collect();
        f.write_str(&parts.join(","))
    }
}

impl FromStr for SizeVector {
    type Err = Error;

    /// Parses the operator form `PP=1,M=3`. Omitted sizes are zero.
    fn from_str(input: &str) -> Result<Self> {
        let invalid = |reason: String| Error::InvalidSizes {
            input: input.to_string(),
            reason,
        };

        let mut vector = Self::default();
        let mut seen = Vec::new();

        for pair in input.split(',').map(str::trim).filter(|p| !p.is_empty()) {
            let Some((label, quantity)) = pair.split_once('=') else {
                return Err(invalid(format!("expected SIZE=QTY, got '{pair}'")));
            };
            let size = Size::from_label(label)
                .ok_or_else(|| invalid(format!("unknown size '{}'", label.trim())))?;
            if seen.contains(&size) {
                return Err(invalid(format!("size {size} given twice")));
            }
            let quantity: i64 = quantity
                .trim()
                .parse()
                .map_err(|_| invalid(format!("'{}' is not a whole number", quantity.trim())))?;
            if quantity < 0 {
                return Err(invalid(format!("size {size} has a negative quantity")));
            }
            if quantity > MAX_QUANTITY {
                return Err(invalid(format!("size {size} exceeds {MAX_QUANTITY}")));
            }
            seen.push(size);
            *vector.get_mut(size) = quantity;
        }

        Ok(vector)
    }
}

/// Amount still missing when `produced` falls short of `ordered`.
#[must_use]
pub fn shortfall(ordered: i64, produced: i64) -> i64 {
    (ordered - produced).max(0)
}

/// Amount produced beyond what was `ordered`.
#[must_use]
pub fn surplus(ordered: i64, produced: i64) -> i64 {
    (produced - ordered).max(0)
}
