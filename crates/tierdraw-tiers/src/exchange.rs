//! Exchange-rate and remainder accounting.
//!
//! Splitting a contributed amount across shares truncates; the undistributed
//! remainder is returned so the caller can fold it into the next
//! contribution. Invariant per split:
//!
//! ```text
//! floor(delta * total_shares) + remainder == total_contributed
//! ```
//!
//! [`ExchangeRateLedger`] chains distributions and carries the remainder at
//! raw fixed-point resolution instead of in whole units.

use serde::{Deserialize, Serialize};
use tierdraw_core::error::{ExchangeRateError, MathError};
use tierdraw_core::constants::UNIT;
use tierdraw_core::fixed::{U256, UFixed18};

/// Per-share amount of one distribution and the value left undistributed.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExchangeRateDelta {
    pub delta: UFixed18,
    pub remainder: u128,
}

/// Split `total_contributed` across `total_shares`.
///
/// # Examples
///
/// ```
/// use tierdraw_tiers::compute_next_exchange_rate_delta;
///
/// let split = compute_next_exchange_rate_delta(3, 10).unwrap();
/// assert_eq!(split.delta.to_string(), "3.333333333333333333");
/// assert_eq!(split.remainder, 1);
/// ```
pub fn compute_next_exchange_rate_delta(
    total_shares: u128,
    total_contributed: u128,
) -> Result<ExchangeRateDelta, ExchangeRateError> {
    if total_shares == 0 {
        return Err(ExchangeRateError::ZeroShares);
    }
    let delta = UFixed18::from_ratio(total_contributed, total_shares)?;
    let distributed = delta.mul_int_floor(total_shares)?;
    let remainder = total_contributed
        .checked_sub(distributed)
        .ok_or(MathError::Overflow)?;
    Ok(ExchangeRateDelta { delta, remainder })
}

/// Running exchange rate with the undistributed value carried between
/// distributions.
///
/// The carried remainder is kept in raw fixed-point units (10^-18 of a whole
/// unit), so after any sequence of distributions
///
/// ```text
/// exchange_rate * total_shares + carried_remainder == total_contributed
/// ```
///
/// holds exactly in raw units and nothing is counted twice. An immutable
/// value: [`distribute`](Self::distribute) returns the next ledger rather
/// than mutating this one.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct ExchangeRateLedger {
    /// Cumulative amount distributed per share.
    pub exchange_rate: UFixed18,
    /// Value not yet distributed, always below `total_shares` raw units.
    pub carried_remainder: UFixed18,
}

impl ExchangeRateLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Distribute `contributed` plus the carried remainder across `total_shares`.
    ///
    /// Returns the next ledger and the per-share delta of this distribution.
    pub fn distribute(
        &self,
        total_shares: u128,
        contributed: u128,
    ) -> Result<(Self, UFixed18), ExchangeRateError> {
        if total_shares == 0 {
            return Err(ExchangeRateError::ZeroShares);
        }
        let shares = U256::from(total_shares);
        let available = U256::from(contributed) * U256::from(UNIT)
            + U256::from(self.carried_remainder.raw());
        let delta = available / shares;
        let remainder = (available - delta * shares).try_to_u128()?;
        let delta = UFixed18::from_raw(delta.try_to_u128()?);

        let next = Self {
            exchange_rate: self.exchange_rate.checked_add(delta)?,
            carried_remainder: UFixed18::from_raw(remainder),
        };
        Ok((next, delta))
    }

    /// Whole amount owed to `shares` since the rate stood at `since`.
    pub fn accrued(&self, shares: u128, since: UFixed18) -> Result<u128, ExchangeRateError> {
        if since > self.exchange_rate {
            return Err(ExchangeRateError::SnapshotAhead {
                since: since.raw(),
                current: self.exchange_rate.raw(),
            });
        }
        Ok(self.exchange_rate.checked_sub(since)?.mul_int_floor(shares)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn ten_over_three() {
        let split = compute_next_exchange_rate_delta(3, 10).unwrap();
        assert_eq!(split.delta.raw(), 3_333_333_333_333_333_333);
        assert_eq!(split.remainder, 1);
    }

    #[test]
    fn even_split_has_no_remainder() {
        let split = compute_next_exchange_rate_delta(4, 100).unwrap();
        assert_eq!(split.delta, UFixed18::from_int(25).unwrap());
        assert_eq!(split.remainder, 0);
    }

    #[test]
    fn single_share_takes_everything() {
        let split = compute_next_exchange_rate_delta(1, 12_345).unwrap();
        assert_eq!(split.delta, UFixed18::from_int(12_345).unwrap());
        assert_eq!(split.remainder, 0);
    }

    #[test]
    fn zero_contribution() {
        let split = compute_next_exchange_rate_delta(7, 0).unwrap();
        assert_eq!(split.delta, UFixed18::ZERO);
        assert_eq!(split.remainder, 0);
    }

    #[test]
    fn zero_shares_fails() {
        assert_eq!(
            compute_next_exchange_rate_delta(0, 10),
            Err(ExchangeRateError::ZeroShares)
        );
    }

    #[test]
    fn oversized_rate_fails() {
        assert_eq!(
            compute_next_exchange_rate_delta(1, u128::MAX),
            Err(ExchangeRateError::Math(MathError::Overflow))
        );
    }

    #[test]
    fn ledger_carries_remainder() {
        let (ledger, first) = ExchangeRateLedger::new().distribute(3, 10).unwrap();
        assert_eq!(first.raw(), 3_333_333_333_333_333_333);
        assert_eq!(ledger.carried_remainder.raw(), 1);

        // 5 whole units plus 1 raw unit carried split evenly across 3 shares.
        let (ledger, second) = ledger.distribute(3, 5).unwrap();
        assert_eq!(second.raw(), 1_666_666_666_666_666_667);
        assert_eq!(ledger.carried_remainder, UFixed18::ZERO);
        assert_eq!(ledger.exchange_rate, UFixed18::from_int(5).unwrap());
        assert_eq!(ledger.accrued(3, UFixed18::ZERO).unwrap(), 15);
    }

    #[test]
    fn repeated_distributions_never_overpay() {
        let mut ledger = ExchangeRateLedger::new();
        for _ in 0..2 {
            ledger = ledger.distribute(3, 10).unwrap().0;
        }
        assert_eq!(ledger.exchange_rate.raw(), 6_666_666_666_666_666_666);
        assert_eq!(ledger.carried_remainder.raw(), 2);
        assert_eq!(ledger.accrued(3, UFixed18::ZERO).unwrap(), 19);
    }

    #[test]
    fn ledger_zero_shares_fails() {
        assert_eq!(
            ExchangeRateLedger::new().distribute(0, 10),
            Err(ExchangeRateError::ZeroShares)
        );
    }

    #[test]
    fn ledger_accrued() {
        let (ledger, _) = ExchangeRateLedger::new().distribute(3, 10).unwrap();
        assert_eq!(ledger.accrued(3, UFixed18::ZERO).unwrap(), 9);
        assert_eq!(ledger.accrued(3, ledger.exchange_rate).unwrap(), 0);
    }

    #[test]
    fn ledger_accrued_rejects_future_snapshot() {
        let ledger = ExchangeRateLedger::new();
        assert_eq!(
            ledger.accrued(1, UFixed18::ONE),
            Err(ExchangeRateError::SnapshotAhead { since: UFixed18::ONE.raw(), current: 0 })
        );
    }

    #[test]
    fn ledger_serializes() {
        let (ledger, _) = ExchangeRateLedger::new().distribute(3, 10).unwrap();
        let json = serde_json::to_string(&ledger).unwrap();
        let back: ExchangeRateLedger = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ledger);
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn split_conserves_value(shares in 1u128..1_000_000_000_000u128, contributed in 0u128..100_000_000_000_000_000_000u128) {
            let split = compute_next_exchange_rate_delta(shares, contributed).unwrap();
            let distributed = split.delta.mul_int_floor(shares).unwrap();
            prop_assert_eq!(distributed + split.remainder, contributed);
            prop_assert!(split.remainder < shares);
        }

        #[test]
        fn ledger_conserves_value(
            shares in 1u128..1_000_000u128,
            contributions in proptest::collection::vec(0u128..1_000_000_000_000_000u128, 1..20),
        ) {
            let mut ledger = ExchangeRateLedger::new();
            for c in &contributions {
                ledger = ledger.distribute(shares, *c).unwrap().0;
                prop_assert!(ledger.carried_remainder.raw() < shares);
            }
            let total: u128 = contributions.iter().sum();
            prop_assert_eq!(
                ledger.exchange_rate.raw() * shares + ledger.carried_remainder.raw(),
                total * UNIT
            );
            prop_assert!(ledger.accrued(shares, UFixed18::ZERO).unwrap() <= total);
        }
    }
}
