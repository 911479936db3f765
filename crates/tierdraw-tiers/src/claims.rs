//! Claim count estimation.
//!
//! Sums, over every tier, the whole number of prizes the tier is expected
//! to award per draw. Each tier is floored before summing, so fractional
//! expectations never accumulate into an extra claim.

use tracing::debug;

use tierdraw_core::error::{MathError, TierError};
use tierdraw_core::traits::Transcendental;
use tierdraw_core::types::DrawParams;

use crate::odds::tier_odds;
use crate::prize::{expected_prizes_per_draw, prize_count};

/// `sum(floor(prize_count(tier) * tier_odds(tier)))` over all tiers.
pub fn estimated_claim_count<M: Transcendental + ?Sized>(
    math: &M,
    number_of_tiers: u8,
    grand_prize_period: u32,
) -> Result<u64, TierError> {
    let params = DrawParams::new(number_of_tiers, grand_prize_period);
    params.validate()?;

    let mut total: u64 = 0;
    for tier in params.tiers() {
        let odds = tier_odds(math, tier, number_of_tiers, grand_prize_period)?;
        let expected = expected_prizes_per_draw(odds, prize_count(tier)?)?.floor_int();
        let expected = u64::try_from(expected).map_err(|_| MathError::Overflow)?;
        total = total.checked_add(expected).ok_or(MathError::Overflow)?;
    }

    debug!(number_of_tiers, grand_prize_period, total, "estimated claim count");
    Ok(total)
}
