//! Trait interfaces for the tierdraw kernel.
//!
//! These traits define the contracts between crates:
//! - [`Transcendental`]: pinned fixed-point `ln`/`exp` backend (tierdraw-tiers implements)
//! - [`DrawHasher`]: pinned 256-bit hash for pseudo-random trials (this crate implements)
//! - [`TierCalculator`]: tier odds, prize counts and winner checks (tierdraw-tiers implements)

use crate::error::{MathError, TierError};
use crate::fixed::{SFixed18, UFixed18};
use crate::types::{DrawEntry, DrawParams, Hash256, Participant, ShareConfig};

/// Fixed-point natural logarithm and exponential.
///
/// Every implementation must be bit-exact and versioned: two backends with
/// the same [`id`](Self::id) must return identical raw values for identical
/// inputs, or tier odds diverge across deployments.
pub trait Transcendental: Send + Sync {
    /// Version tag of the approximation algorithm, e.g. `"binary-log-exp/v1"`.
    fn id(&self) -> &'static str;

    /// Natural logarithm. Fails for `x <= 0`.
    fn ln(&self, x: SFixed18) -> Result<SFixed18, MathError>;

    /// `e^x`. Fails if the result does not fit; underflows to zero.
    fn exp(&self, x: SFixed18) -> Result<SFixed18, MathError>;
}

/// Collision-resistant 256-bit hash over a pseudo-random preimage.
///
/// The hash is public: anyone holding the draw's random number can recompute
/// every trial.
pub trait DrawHasher: Send + Sync {
    /// Version tag of the hash function, e.g. `"sha256/v1"`.
    fn id(&self) -> &'static str;

    fn hash(&self, preimage: &[u8]) -> Hash256;
}

/// Probabilistic parameters of a multi-tier draw and per-user outcomes.
///
/// All methods are pure: identical inputs always yield identical outputs.
/// Implemented by the tier engine (tierdraw-tiers).
pub trait TierCalculator: Send + Sync {
    /// Per-draw probability that `tier` awards prizes.
    ///
    /// Tier 0 (the grand prize) has odds `1 / grand_prize_period`; odds grow
    /// geometrically to exactly 1 at the last tier.
    fn tier_odds(
        &self,
        tier: u8,
        number_of_tiers: u8,
        grand_prize_period: u32,
    ) -> Result<UFixed18, TierError>;

    /// Number of prizes in `tier`: `4^tier`.
    fn prize_count(&self, tier: u8) -> Result<u128, TierError>;

    /// Fractional prize count of the hypothetical tier `number_of_tiers`.
    fn canary_prize_count(
        &self,
        number_of_tiers: u8,
        shares: &ShareConfig,
    ) -> Result<UFixed18, TierError>;

    /// Decide whether `entry.user` wins `entry.tier`.
    fn is_winner(&self, entry: &DrawEntry) -> Result<bool, TierError>;

    /// Expected draws between occurrences of `tier`: `ceil(1 / odds)`.
    fn prize_frequency_in_draws(
        &self,
        tier: u8,
        number_of_tiers: u8,
        grand_prize_period: u32,
    ) -> Result<u128, TierError>;

    /// Expected claimable prizes in a draw: `sum(floor(prize_count * odds))`.
    fn estimated_claim_count(
        &self,
        number_of_tiers: u8,
        grand_prize_period: u32,
    ) -> Result<u64, TierError>;

    /// Tiers of `params` won by `participant`, ascending.
    fn winning_tiers(
        &self,
        params: &DrawParams,
        participant: &Participant,
    ) -> Result<Vec<u8>, TierError> {
        params.validate()?;
        let mut won = Vec::new();
        for tier in params.tiers() {
            let odds = self.tier_odds(tier, params.number_of_tiers, params.grand_prize_period)?;
            let entry = participant.entry(tier, odds, self.prize_count(tier)?);
            if self.is_winner(&entry)? {
                won.push(tier);
            }
        }
        Ok(won)
    }
}
