//! Fixed-point decimal arithmetic with 18 fractional digits.
//!
//! [`UFixed18`] holds non-negative quantities (odds, rates, prize counts),
//! [`SFixed18`] holds values that may be negative (logarithms, exponents).
//! Both are integers scaled by [`UNIT`].
//!
//! Multiplication and division go through a 256-bit intermediate and truncate
//! toward zero, so every result is the exact quotient rounded toward zero
//! (floor for non-negative values). Nothing wraps or saturates: a result that
//! does not fit the 128-bit backing is [`MathError::Overflow`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{UNIT, UNIT_SIGNED};
use crate::error::MathError;

uint::construct_uint! {
    /// 256-bit unsigned integer used for wide intermediates.
    pub struct U256(4);
}

impl U256 {
    /// Narrow to `u128`, failing if the value does not fit.
    pub fn try_to_u128(self) -> Result<u128, MathError> {
        if self > U256::from(u128::MAX) {
            return Err(MathError::Overflow);
        }
        Ok(self.low_u128())
    }
}

/// `floor(a * b / den)` computed without intermediate overflow.
pub fn mul_div(a: u128, b: u128, den: u128) -> Result<u128, MathError> {
    if den == 0 {
        return Err(MathError::DivisionByZero);
    }
    // Two 128-bit factors never overflow 256 bits.
    let product = U256::from(a) * U256::from(b);
    (product / U256::from(den)).try_to_u128()
}

/// Signed `a * b / den`, truncated toward zero.
fn signed_mul_div(a: i128, b: i128, den: i128) -> Result<i128, MathError> {
    let negative = (a < 0) ^ (b < 0) ^ (den < 0);
    let magnitude = mul_div(a.unsigned_abs(), b.unsigned_abs(), den.unsigned_abs())?;
    if negative {
        0i128
            .checked_sub_unsigned(magnitude)
            .ok_or(MathError::Overflow)
    } else {
        i128::try_from(magnitude).map_err(|_| MathError::Overflow)
    }
}

/// Unsigned fixed-point value scaled by 10^18.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct UFixed18(u128);

impl UFixed18 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(UNIT);
    pub const MAX: Self = Self(u128::MAX);

    /// Wrap an already-scaled raw value.
    pub const fn from_raw(raw: u128) -> Self {
        Self(raw)
    }

    /// The scaled raw value.
    pub const fn raw(self) -> u128 {
        self.0
    }

    /// Convert a whole number.
    ///
    /// # Examples
    ///
    /// ```
    /// use tierdraw_core::fixed::UFixed18;
    /// assert_eq!(UFixed18::from_int(3).unwrap().raw(), 3_000_000_000_000_000_000);
    /// ```
    pub fn from_int(n: u128) -> Result<Self, MathError> {
        n.checked_mul(UNIT).map(Self).ok_or(MathError::Overflow)
    }

    /// `num / den` as a fixed-point value, truncated.
    pub fn from_ratio(num: u128, den: u128) -> Result<Self, MathError> {
        mul_div(num, UNIT, den).map(Self)
    }

    pub fn is_zero(self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, MathError> {
        self.0.checked_add(rhs.0).map(Self).ok_or(MathError::Overflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, MathError> {
        self.0.checked_sub(rhs.0).map(Self).ok_or(MathError::Overflow)
    }

    /// Fixed-point product, truncated.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, MathError> {
        mul_div(self.0, rhs.0, UNIT).map(Self)
    }

    /// Fixed-point quotient, truncated (floor).
    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        mul_div(self.0, UNIT, rhs.0).map(Self)
    }

    /// `floor(self * n)` for a whole number `n`.
    pub fn mul_int_floor(self, n: u128) -> Result<u128, MathError> {
        mul_div(self.0, n, UNIT)
    }

    /// Whole part, rounded down.
    pub fn floor_int(self) -> u128 {
        self.0 / UNIT
    }

    /// Whole part, rounded toward positive infinity.
    ///
    /// # Examples
    ///
    /// ```
    /// use tierdraw_core::fixed::UFixed18;
    /// assert_eq!(UFixed18::from_raw(1).ceil_int(), 1);
    /// assert_eq!(UFixed18::from_int(7).unwrap().ceil_int(), 7);
    /// ```
    pub fn ceil_int(self) -> u128 {
        self.0.div_ceil(UNIT)
    }
}

impl fmt::Display for UFixed18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:018}", self.0 / UNIT, self.0 % UNIT)
    }
}

impl FromStr for UFixed18 {
    type Err = MathError;

    /// Parse a plain decimal such as `"0.25"` or `"12"`, at most 18 fractional digits.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_unsigned(s).map(Self)
    }
}

fn parse_unsigned(s: &str) -> Result<u128, MathError> {
    let invalid = || MathError::InvalidDecimal(s.to_string());
    let (whole, frac) = match s.split_once('.') {
        Some((w, f)) => (w, f),
        None => (s, ""),
    };
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if whole.is_empty() || !all_digits(whole) || !all_digits(frac) || frac.len() > 18 {
        return Err(invalid());
    }
    if s.contains('.') && frac.is_empty() {
        return Err(invalid());
    }

    let whole: u128 = whole.parse().map_err(|_| invalid())?;
    let mut frac_raw: u128 = 0;
    if !frac.is_empty() {
        let digits: u128 = frac.parse().map_err(|_| invalid())?;
        frac_raw = digits * 10u128.pow(18 - frac.len() as u32);
    }
    whole
        .checked_mul(UNIT)
        .and_then(|w| w.checked_add(frac_raw))
        .ok_or(MathError::Overflow)
}

/// Signed fixed-point value scaled by 10^18.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
#[serde(transparent)]
pub struct SFixed18(i128);

impl SFixed18 {
    pub const ZERO: Self = Self(0);
    pub const ONE: Self = Self(UNIT_SIGNED);

    pub const fn from_raw(raw: i128) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> i128 {
        self.0
    }

    pub fn from_int(n: i128) -> Result<Self, MathError> {
        n.checked_mul(UNIT_SIGNED).map(Self).ok_or(MathError::Overflow)
    }

    pub fn is_negative(self) -> bool {
        self.0 < 0
    }

    pub fn checked_add(self, rhs: Self) -> Result<Self, MathError> {
        self.0.checked_add(rhs.0).map(Self).ok_or(MathError::Overflow)
    }

    pub fn checked_sub(self, rhs: Self) -> Result<Self, MathError> {
        self.0.checked_sub(rhs.0).map(Self).ok_or(MathError::Overflow)
    }

    /// Fixed-point product, truncated toward zero.
    pub fn checked_mul(self, rhs: Self) -> Result<Self, MathError> {
        signed_mul_div(self.0, rhs.0, UNIT_SIGNED).map(Self)
    }

    /// Fixed-point quotient, truncated toward zero.
    pub fn checked_div(self, rhs: Self) -> Result<Self, MathError> {
        signed_mul_div(self.0, UNIT_SIGNED, rhs.0).map(Self)
    }

    pub fn to_unsigned(self) -> Result<UFixed18, MathError> {
        u128::try_from(self.0)
            .map(UFixed18)
            .map_err(|_| MathError::NegativeValue(self.0))
    }
}

impl fmt::Display for SFixed18 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let magnitude = self.0.unsigned_abs();
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{sign}{}.{:018}", magnitude / UNIT, magnitude % UNIT)
    }
}

impl FromStr for SFixed18 {
    type Err = MathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (negative, digits) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let magnitude = parse_unsigned(digits)?;
        let raw = if negative {
            0i128.checked_sub_unsigned(magnitude)
        } else {
            i128::try_from(magnitude).ok()
        };
        raw.map(Self).ok_or(MathError::Overflow)
    }
}
