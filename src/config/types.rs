//! Strongly-typed price, volume and percentage values.

use serde::{Deserialize, Serialize};
use std::ops::{Div, Mul, Sub};

/// A behavioral contract for anything that behaves like a price.
pub trait PriceLike {
    fn value(&self) -> f64;

    const MIN_EPSILON: f64 = 1e-12;

    fn is_positive(&self) -> bool {
        self.value() > Self::MIN_EPSILON
    }

    /// Signed % change from `reference` to `self` (e.g. +2.5 for a 2.5% rise).
    /// Returns 0 when the reference is not a usable divisor.
    fn percent_change_from<R: PriceLike>(&self, reference: &R) -> f64 {
        if !reference.is_positive() {
            return 0.0;
        }
        (self.value() - reference.value()) / reference.value() * 100.0
    }

    /// Formats a price with adaptive decimals.
    fn format_price(&self) -> String {
        let price = self.value();
        if price == 0.0 {
            return "0.00".to_string();
        }

        let abs_price = price.abs();

        if abs_price >= 1.0 {
            format!("{:.2}", price)
        } else if abs_price >= 0.01 {
            format!("{:.4}", price)
        } else {
            format!("{:.8}", price)
        }
    }
}

macro_rules! impl_into_price {
    ($from:ident) => {
        impl From<$from> for Price {
            fn from(p: $from) -> Self {
                Price::new(p.value())
            }
        }
    };
}

macro_rules! define_price_type {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
        #[serde(transparent)]
        pub struct $name(f64);

        impl From<f64> for $name {
            fn from(v: f64) -> Self {
                $name::new(v)
            }
        }

        impl $name {
            pub const fn new(val: f64) -> Self {
                // Absolute prices should not be negative
                let v = if val < 0.0 { 0.0 } else { val };
                Self(v)
            }
        }

        impl Sub for $name {
            type Output = f64;

            fn sub(self, rhs: Self) -> Self::Output {
                self.value() - rhs.value()
            }
        }

        impl Div for $name {
            type Output = f64;

            fn div(self, rhs: Self) -> Self::Output {
                self.value() / rhs.value()
            }
        }

        impl Mul<f64> for $name {
            type Output = $name;

            fn mul(self, rhs: f64) -> Self::Output {
                $name::new(self.value() * rhs)
            }
        }

        impl PriceLike for $name {
            fn value(&self) -> f64 {
                self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.format_price())
            }
        }
    };
}

macro_rules! impl_price_compare {
    ($a:ty, $b:ty) => {
        impl PartialEq<$b> for $a {
            fn eq(&self, other: &$b) -> bool {
                self.value() == other.value()
            }
        }

        impl PartialOrd<$b> for $a {
            fn partial_cmp(&self, other: &$b) -> Option<std::cmp::Ordering> {
                self.value().partial_cmp(&other.value())
            }
        }
    };
}

define_price_type!(Price);
define_price_type!(OpenPrice);
define_price_type!(HighPrice);
define_price_type!(LowPrice);
define_price_type!(ClosePrice);

impl_into_price!(OpenPrice);
impl_into_price!(HighPrice);
impl_into_price!(LowPrice);
impl_into_price!(ClosePrice);

impl_price_compare!(LowPrice, HighPrice);
impl_price_compare!(HighPrice, LowPrice);
impl_price_compare!(OpenPrice, HighPrice);
impl_price_compare!(OpenPrice, LowPrice);
impl_price_compare!(ClosePrice, HighPrice);
impl_price_compare!(ClosePrice, LowPrice);

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Volume(f64);

impl Volume {
    pub const fn new(val: f64) -> Self {
        let v = if val < 0.0 { 0.0 } else { val };
        Self(v)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for Volume {
    fn from(v: f64) -> Self {
        Volume::new(v)
    }
}

impl std::fmt::Display for Volume {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let val = self.0;
        if val >= 1_000_000.0 {
            write!(f, "{:.1}M", val / 1_000_000.0)
        } else if val >= 1_000.0 {
            write!(f, "{:.0}K", val / 1_000.0)
        } else {
            write!(f, "{:.0}", val)
        }
    }
}

/// Signed percentage move, already scaled by 100 (2.5 means +2.5%).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct MovePct(f64);

impl MovePct {
    pub const ZERO: Self = Self(0.0);

    pub const fn new(val: f64) -> Self {
        Self(val)
    }

    #[inline]
    pub fn value(self) -> f64 {
        self.0
    }

    /// % move from `from` to `to`. Zero when `from` is not a usable divisor.
    pub fn between<A: PriceLike, B: PriceLike>(from: &A, to: &B) -> Self {
        Self(to.percent_change_from(from))
    }
}

impl std::fmt::Display for MovePct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:+.2}%", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_prices_clamp_to_zero() {
        assert_eq!(ClosePrice::new(-3.0).value(), 0.0);
        assert_eq!(Volume::new(-1.0).value(), 0.0);
    }

    #[test]
    fn move_pct_is_relative_to_the_starting_price() {
        let from = ClosePrice::new(200.0);
        let to = ClosePrice::new(210.0);
        assert!((MovePct::between(&from, &to).value() - 5.0).abs() < 1e-12);
        assert_eq!(MovePct::between(&ClosePrice::new(0.0), &to), MovePct::ZERO);
    }

    #[test]
    fn mixed_price_types_compare_by_value() {
        assert!(ClosePrice::new(10.0) > LowPrice::new(9.0));
        assert!(ClosePrice::new(10.0) < HighPrice::new(11.0));
        assert!(LowPrice::new(5.0) == HighPrice::new(5.0));
    }
}
