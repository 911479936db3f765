//! Prize count model.
//!
//! Each tier carries four times the prizes of the tier before it: one grand
//! prize at tier 0, 4 at tier 1, 16 at tier 2, and so on. The canary count
//! previews the tier that would be added next, weighted by share allocation
//! rather than by the odds curve. Its fractional value is intentional.

use tierdraw_core::constants::PRIZE_COUNT_BASE;
use tierdraw_core::error::{MathError, ShareError, TierError};
use tierdraw_core::fixed::UFixed18;
use tierdraw_core::types::{validate_number_of_tiers, ShareConfig};

/// `4^tier`. Fails once the count no longer fits `u128` (tier 64 and up).
pub fn prize_count(tier: u8) -> Result<u128, MathError> {
    PRIZE_COUNT_BASE
        .checked_pow(tier as u32)
        .ok_or(MathError::Overflow)
}

/// Estimated prize count of the canary tier, index `number_of_tiers`.
///
/// ```text
/// numerator   = canary * ((tiers + 1) * tier_shares + canary + reserve)
/// denominator = tier_shares * (tiers * tier_shares + canary + reserve)
/// canary      = numerator / denominator * 4^tiers
/// ```
pub fn canary_prize_count(
    number_of_tiers: u8,
    shares: &ShareConfig,
) -> Result<UFixed18, TierError> {
    validate_number_of_tiers(number_of_tiers)?;
    shares.validate()?;

    let numerator = shares
        .total_shares(number_of_tiers + 1)?
        .checked_mul(shares.canary_shares)
        .ok_or(ShareError::Overflow)?;
    let denominator = shares
        .total_shares(number_of_tiers)?
        .checked_mul(shares.tier_shares)
        .ok_or(ShareError::Overflow)?;

    let ratio = UFixed18::from_ratio(numerator, denominator)?;
    let next_tier_prizes = UFixed18::from_int(prize_count(number_of_tiers)?)?;
    Ok(ratio.checked_mul(next_tier_prizes)?)
}

/// Prizes a tier is expected to award per draw: `prize_count * odds`.
pub fn expected_prizes_per_draw(odds: UFixed18, prize_count: u128) -> Result<UFixed18, MathError> {
    odds.checked_mul(UFixed18::from_int(prize_count)?)
}
