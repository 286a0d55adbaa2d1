use std::{
    fmt::Display,
    iter::Sum,
    ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign},
};

use serde::{Deserialize, Serialize};
use sqlx::Type;
use thiserror::Error;

use crate::op;

//--------------------------------------        Vnd          ---------------------------------------------------------
/// An amount of Vietnamese dong. Dong has no fractional unit, so a plain integer suffices.
#[derive(Debug, Clone, Copy, Default, Type, Ord, PartialOrd, Serialize, Deserialize)]
#[sqlx(transparent)]
pub struct Vnd(i64);

op!(binary Vnd, Add, add);
op!(binary Vnd, Sub, sub);
op!(inplace Vnd, AddAssign, add_assign);
op!(inplace Vnd, SubAssign, sub_assign);
op!(unary Vnd, Neg, neg);

impl Mul<i64> for Vnd {
    type Output = Self;

    fn mul(self, rhs: i64) -> Self::Output {
        Self::from(self.value() * rhs)
    }
}

impl Sum for Vnd {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), Add::add)
    }
}

#[derive(Debug, Clone, Error)]
#[error("Value cannot be represented in dong: {0}")]
pub struct VndConversionError(String);

impl From<i64> for Vnd {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl PartialEq for Vnd {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

impl Eq for Vnd {}

impl TryFrom<u64> for Vnd {
    type Error = VndConversionError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        if value > i64::MAX as u64 {
            Err(VndConversionError(format!("Value {} is too large to convert to Vnd", value)))
        } else {
            #[allow(clippy::cast_possible_wrap)]
            Ok(Self(value as i64))
        }
    }
}

impl Display for Vnd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ₫", group_thousands(self.0))
    }
}

impl Vnd {
    pub fn value(&self) -> i64 {
        self.0
    }

    pub const fn zero() -> Self {
        Self(0)
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Rounds to the nearest 1000 dong, half away from zero. Storefront prices are always quoted
    /// in whole thousands.
    pub fn round_to_thousand(self) -> Self {
        let half = if self.0 >= 0 { 500 } else { -500 };
        Self((self.0 + half).div_euclid(1000) * 1000)
    }

    /// Multiplies by a price multiplier. The result is an exact dong amount; call
    /// [`Vnd::round_to_thousand`] afterwards to get a quotable price.
    pub fn scale(self, factor: f64) -> Self {
        #[allow(clippy::cast_possible_truncation)]
        Self((self.0 as f64 * factor).round() as i64)
    }
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut groups = Vec::new();
    let bytes = digits.as_bytes();
    let mut i = bytes.len();
    while i > 3 {
        groups.push(&digits[i - 3..i]);
        i -= 3;
    }
    groups.push(&digits[..i]);
    groups.reverse();
    let sign = if value < 0 { "-" } else { "" };
    format!("{sign}{}", groups.join("."))
}
