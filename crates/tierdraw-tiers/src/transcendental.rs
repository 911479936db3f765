//! Pinned fixed-point natural logarithm and exponential.
//!
//! All computation uses integer arithmetic only. The algorithm is part of
//! the protocol: tier odds must reproduce bit-for-bit, so any change here
//! needs a new [`TRANSCENDENTAL_V1`] tag.
//!
//! - `log2(x)`, `x >= 1`: integer part from the most significant bit of
//!   `x / UNIT`, then one fractional bit per squaring of the normalized
//!   mantissa. For `0 < x < 1`, `log2(x) = -log2(UNIT^2 / x)`.
//! - `ln(x) = log2(x) * UNIT / LOG2_E`.
//! - `exp(x)`: `x = k*ln2 + r` with `r` in `[0, ln2)`, `e^r` by Taylor series
//!   (each term truncated, stop at the first zero term), then shift by `k`.

use tierdraw_core::constants::{LN2, LOG2_E, MAX_EXP_TERMS, TRANSCENDENTAL_V1, UNIT};
use tierdraw_core::error::MathError;
use tierdraw_core::fixed::SFixed18;
use tierdraw_core::traits::Transcendental;

const HALF_UNIT: u128 = UNIT / 2;
const DOUBLE_UNIT: u128 = 2 * UNIT;
const UNIT_SQUARED: u128 = UNIT * UNIT;

/// The shipped `ln`/`exp` backend, version [`TRANSCENDENTAL_V1`].
#[derive(Debug, Clone, Copy, Default)]
pub struct BinaryLogExp;

impl BinaryLogExp {
    pub fn new() -> Self {
        Self
    }
}

/// `log2(x / UNIT) * UNIT` for `x >= UNIT`.
fn log2_at_least_one(x: u128) -> u128 {
    let n = 127 - (x / UNIT).leading_zeros();
    let mut result = n as u128 * UNIT;

    // Mantissa in [UNIT, 2 * UNIT).
    let mut y = x >> n;
    if y == UNIT {
        return result;
    }

    let mut delta = HALF_UNIT;
    while delta > 0 {
        // y < 2 * UNIT, so y * y < 4e36 fits u128.
        y = y * y / UNIT;
        if y >= DOUBLE_UNIT {
            result += delta;
            y >>= 1;
        }
        delta >>= 1;
    }
    result
}

/// Binary logarithm in fixed point.
pub fn log2(x: SFixed18) -> Result<SFixed18, MathError> {
    let raw = x.raw();
    if raw <= 0 {
        return Err(MathError::NonPositiveLogarithm(raw));
    }
    let raw = raw as u128;
    // Results are bounded by 128 * UNIT in magnitude.
    if raw >= UNIT {
        Ok(SFixed18::from_raw(log2_at_least_one(raw) as i128))
    } else {
        Ok(SFixed18::from_raw(-(log2_at_least_one(UNIT_SQUARED / raw) as i128)))
    }
}

/// Natural logarithm in fixed point.
pub fn ln(x: SFixed18) -> Result<SFixed18, MathError> {
    log2(x)?.checked_div(SFixed18::from_raw(LOG2_E as i128))
}

/// `e^x` in fixed point.
pub fn exp(x: SFixed18) -> Result<SFixed18, MathError> {
    let ln2 = LN2 as i128;
    let k = x.raw().div_euclid(ln2);
    let r = x.raw().rem_euclid(ln2) as u128;

    let mut sum = UNIT;
    let mut term = UNIT;
    for n in 1..=MAX_EXP_TERMS {
        term = term * r / UNIT / n as u128;
        if term == 0 {
            break;
        }
        sum += term;
    }

    if k >= 0 {
        if k >= 127 {
            return Err(MathError::Overflow);
        }
        (sum as i128)
            .checked_mul(1i128 << k)
            .map(SFixed18::from_raw)
            .ok_or(MathError::Overflow)
    } else {
        let shift = k.unsigned_abs();
        if shift >= 128 {
            return Ok(SFixed18::ZERO);
        }
        Ok(SFixed18::from_raw((sum >> shift) as i128))
    }
}

impl Transcendental for BinaryLogExp {
    fn id(&self) -> &'static str {
        TRANSCENDENTAL_V1
    }

    fn ln(&self, x: SFixed18) -> Result<SFixed18, MathError> {
        ln(x)
    }

    fn exp(&self, x: SFixed18) -> Result<SFixed18, MathError> {
        exp(x)
    }
}
