//! Unit-safe capacity quantities.
//!
//! Capacities cross crate boundaries as [`Megawatts`] so nameplate ratings,
//! load offsets and removed capacity cannot be confused with dimensionless
//! capacity factors or outage rates. The wrapper is `#[repr(transparent)]` and
//! serializes as a bare number.
//!
//! ```
//! use elcc_core::units::Megawatts;
//!
//! let fleet = Megawatts(150.0) + Megawatts(50.0);
//! assert_eq!(fleet.value(), 200.0);
//! assert_eq!((fleet / 2.0).value(), 100.0);
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// Active power capacity in MW.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct Megawatts(pub f64);

impl Megawatts {
    pub const ZERO: Megawatts = Megawatts(0.0);

    #[inline]
    pub const fn new(value: f64) -> Self {
        Self(value)
    }

    /// Raw numeric value in MW.
    #[inline]
    pub const fn value(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn abs(self) -> Self {
        Self(self.0.abs())
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.0.is_finite()
    }

    #[inline]
    pub fn min(self, other: Self) -> Self {
        Self(self.0.min(other.0))
    }

    #[inline]
    pub fn max(self, other: Self) -> Self {
        Self(self.0.max(other.0))
    }
}

impl Add for Megawatts {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0 + rhs.0)
    }
}

impl AddAssign for Megawatts {
    fn add_assign(&mut self, rhs: Self) {
        self.0 += rhs.0;
    }
}

impl Sub for Megawatts {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Megawatts {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Neg for Megawatts {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Mul<f64> for Megawatts {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        Self(self.0 * rhs)
    }
}

impl Mul<Megawatts> for f64 {
    type Output = Megawatts;
    fn mul(self, rhs: Megawatts) -> Self::Output {
        Megawatts(self * rhs.0)
    }
}

impl Div<f64> for Megawatts {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        Self(self.0 / rhs)
    }
}

impl Div<Megawatts> for Megawatts {
    type Output = f64;
    fn div(self, rhs: Megawatts) -> Self::Output {
        self.0 / rhs.0
    }
}

impl std::iter::Sum for Megawatts {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        Self(iter.map(|mw| mw.0).sum())
    }
}

impl<'a> std::iter::Sum<&'a Megawatts> for Megawatts {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self {
        Self(iter.map(|mw| mw.0).sum())
    }
}

impl std::fmt::Display for Megawatts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4} MW", self.0)
    }
}
