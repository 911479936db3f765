//! Error types for the tierdraw kernel.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("arithmetic overflow")] Overflow,
    #[error("division by zero")] DivisionByZero,
    #[error("logarithm of non-positive value: {0}")] NonPositiveLogarithm(i128),
    #[error("negative value where unsigned expected: {0}")] NegativeValue(i128),
    #[error("invalid decimal: {0}")] InvalidDecimal(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ShareError {
    #[error("tier shares must be positive")] ZeroTierShares,
    #[error("share total overflow")] Overflow,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TierError {
    #[error("too few tiers: {got} < {min}")] TooFewTiers { got: u8, min: u8 },
    #[error("too many tiers: {got} > {max}")] TooManyTiers { got: u8, max: u8 },
    #[error("tier {tier} out of range for {number_of_tiers} tiers")] TierOutOfRange { tier: u8, number_of_tiers: u8 },
    #[error("grand prize period must be positive")] ZeroGrandPrizePeriod,
    #[error("zero odds for tier {0}")] ZeroOdds(u8),
    #[error(transparent)] Math(#[from] MathError),
    #[error(transparent)] Share(#[from] ShareError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExchangeRateError {
    #[error("total shares must be positive")] ZeroShares,
    #[error("rate snapshot {since} is ahead of current rate {current}")] SnapshotAhead { since: u128, current: u128 },
    #[error(transparent)] Math(#[from] MathError),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("too long: {len} > {max} bytes")] TooLong { len: usize, max: usize },
    #[error("empty input")] Empty,
    #[error("invalid decimal: {0}")] InvalidDecimal(String),
}
