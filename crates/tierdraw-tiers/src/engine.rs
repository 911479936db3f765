//! Tier engine implementing the [`TierCalculator`] trait.
//!
//! Binds a pinned `ln`/`exp` backend and a draw hasher to the free
//! functions of this crate. The defaults are [`BinaryLogExp`] and
//! [`Sha256DrawHasher`]; swapping either changes every derived value, so
//! deployments that must agree should also agree on the backend ids.

use tracing::debug;

use tierdraw_core::crypto::Sha256DrawHasher;
use tierdraw_core::error::TierError;
use tierdraw_core::fixed::UFixed18;
use tierdraw_core::traits::{DrawHasher, TierCalculator, Transcendental};
use tierdraw_core::types::{DrawEntry, DrawParams, PrizeTable, ShareConfig, TierInfo};

use crate::transcendental::BinaryLogExp;
use crate::{claims, odds, prize, winner};

/// The production tier calculator.
#[derive(Debug, Clone, Default)]
pub struct TierEngine<M = BinaryLogExp, H = Sha256DrawHasher> {
    math: M,
    hasher: H,
}

impl TierEngine {
    /// Engine with the pinned default backends.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<M: Transcendental, H: DrawHasher> TierEngine<M, H> {
    pub fn with_backends(math: M, hasher: H) -> Self {
        Self { math, hasher }
    }

    pub fn math(&self) -> &M {
        &self.math
    }

    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    /// Derived parameters of every tier in `params`, the canary estimate
    /// for `shares`, and the draw's estimated claim count.
    pub fn prize_table(&self, params: &DrawParams, shares: &ShareConfig) -> Result<PrizeTable, TierError> {
        params.validate()?;

        let mut tiers = Vec::with_capacity(params.number_of_tiers as usize);
        for tier in params.tiers() {
            let odds = self.tier_odds(tier, params.number_of_tiers, params.grand_prize_period)?;
            let prize_count = self.prize_count(tier)?;
            tiers.push(TierInfo {
                tier,
                odds,
                prize_count,
                frequency_in_draws: odds::frequency_from_odds(tier, odds)?,
                expected_prizes_per_draw: prize::expected_prizes_per_draw(odds, prize_count)?,
            });
        }

        let table = PrizeTable {
            params: *params,
            shares: *shares,
            tiers,
            canary_prize_count: self.canary_prize_count(params.number_of_tiers, shares)?,
            estimated_claim_count: self
                .estimated_claim_count(params.number_of_tiers, params.grand_prize_period)?,
        };
        debug!(
            number_of_tiers = params.number_of_tiers,
            grand_prize_period = params.grand_prize_period,
            canary = %table.canary_prize_count,
            claims = table.estimated_claim_count,
            math = self.math.id(),
            "prize table"
        );
        Ok(table)
    }
}

impl<M: Transcendental, H: DrawHasher> TierCalculator for TierEngine<M, H> {
    fn tier_odds(
        &self,
        tier: u8,
        number_of_tiers: u8,
        grand_prize_period: u32,
    ) -> Result<UFixed18, TierError> {
        let odds = odds::tier_odds(&self.math, tier, number_of_tiers, grand_prize_period)?;
        debug!(tier, number_of_tiers, grand_prize_period, odds = %odds, "tier odds");
        Ok(odds)
    }

    fn prize_count(&self, tier: u8) -> Result<u128, TierError> {
        Ok(prize::prize_count(tier)?)
    }

    fn canary_prize_count(
        &self,
        number_of_tiers: u8,
        shares: &ShareConfig,
    ) -> Result<UFixed18, TierError> {
        prize::canary_prize_count(number_of_tiers, shares)
    }

    fn is_winner(&self, entry: &DrawEntry) -> Result<bool, TierError> {
        winner::is_winner(&self.hasher, entry)
    }

    fn prize_frequency_in_draws(
        &self,
        tier: u8,
        number_of_tiers: u8,
        grand_prize_period: u32,
    ) -> Result<u128, TierError> {
        odds::prize_frequency_in_draws(&self.math, tier, number_of_tiers, grand_prize_period)
    }

    fn estimated_claim_count(
        &self,
        number_of_tiers: u8,
        grand_prize_period: u32,
    ) -> Result<u64, TierError> {
        claims::estimated_claim_count(&self.math, number_of_tiers, grand_prize_period)
    }
}
