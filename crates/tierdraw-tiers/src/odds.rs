//! Tier odds model.
//!
//! Odds interpolate geometrically across tiers:
//!
//! ```text
//! k    = ln(1 / grand_prize_period) / (1 - number_of_tiers)
//! odds = e^(k * (tier - (number_of_tiers - 1)))
//! ```
//!
//! Tier 0 lands on `1 / grand_prize_period` and the last tier on exactly 1,
//! with `k > 0` controlling how fast odds rise in between.

use tierdraw_core::error::TierError;
use tierdraw_core::fixed::{SFixed18, UFixed18};
use tierdraw_core::traits::Transcendental;
use tierdraw_core::types::DrawParams;

/// Growth rate `k` of the odds curve.
pub fn growth_rate<M: Transcendental + ?Sized>(
    math: &M,
    number_of_tiers: u8,
    grand_prize_period: u32,
) -> Result<SFixed18, TierError> {
    DrawParams::new(number_of_tiers, grand_prize_period).validate()?;

    let period = SFixed18::from_int(grand_prize_period as i128)?;
    let grand_prize_odds = SFixed18::ONE.checked_div(period)?;
    let steps = SFixed18::from_int(1 - number_of_tiers as i128)?;
    Ok(math.ln(grand_prize_odds)?.checked_div(steps)?)
}

/// Per-draw probability that `tier` awards prizes, in `(0, 1]`.
pub fn tier_odds<M: Transcendental + ?Sized>(
    math: &M,
    tier: u8,
    number_of_tiers: u8,
    grand_prize_period: u32,
) -> Result<UFixed18, TierError> {
    let k = growth_rate(math, number_of_tiers, grand_prize_period)?;
    if tier >= number_of_tiers {
        return Err(TierError::TierOutOfRange { tier, number_of_tiers });
    }

    let distance = SFixed18::from_int(tier as i128 - (number_of_tiers as i128 - 1))?;
    let odds = math.exp(k.checked_mul(distance)?)?.to_unsigned()?;
    if odds.is_zero() {
        return Err(TierError::ZeroOdds(tier));
    }
    Ok(odds)
}

/// Expected draws between occurrences of a tier with the given odds.
///
/// Rounds up: a tier that occurs "every 3.2 draws" is reported as every 4,
/// never promising more often than the odds support.
pub fn frequency_from_odds(tier: u8, odds: UFixed18) -> Result<u128, TierError> {
    if odds.is_zero() {
        return Err(TierError::ZeroOdds(tier));
    }
    Ok(UFixed18::ONE.checked_div(odds)?.ceil_int())
}

/// `ceil(1 / tier_odds(...))`.
pub fn prize_frequency_in_draws<M: Transcendental + ?Sized>(
    math: &M,
    tier: u8,
    number_of_tiers: u8,
    grand_prize_period: u32,
) -> Result<u128, TierError> {
    let odds = tier_odds(math, tier, number_of_tiers, grand_prize_period)?;
    frequency_from_odds(tier, odds)
}
