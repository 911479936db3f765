//! Winner determination.
//!
//! Each (user, tier) pair in a draw is an independent trial:
//!
//! ```text
//! prn          = H(user || tier || winning_random_number) mod vault_twab_total_supply
//! winning_zone = user_twab * tier_odds * vault_portion * tier_prize_count
//! winner       = prn < winning_zone
//! ```
//!
//! `prn` is uniform over `[0, supply)` and the zone is measured in the same
//! balance units, so the win probability is `zone / supply`. A zone at or
//! above the supply is a guaranteed win; it is not clamped.

use tracing::{trace, warn};

use tierdraw_core::constants::UNIT;
use tierdraw_core::crypto::encode_preimage_v1;
use tierdraw_core::error::{MathError, TierError};
use tierdraw_core::fixed::{U256, UFixed18};
use tierdraw_core::traits::DrawHasher;
use tierdraw_core::types::{AccountId, DrawEntry, WinningRandomNumber};

/// Hash-derived trial value in `[0, vault_twab_total_supply)`.
pub fn calculate_pseudo_random_number<H: DrawHasher + ?Sized>(
    hasher: &H,
    user: &AccountId,
    tier: u8,
    winning_random_number: &WinningRandomNumber,
    vault_twab_total_supply: u128,
) -> Result<u128, MathError> {
    if vault_twab_total_supply == 0 {
        return Err(MathError::DivisionByZero);
    }
    let digest = hasher.hash(&encode_preimage_v1(user, tier, winning_random_number));
    Ok((digest.to_u256() % U256::from(vault_twab_total_supply)).low_u128())
}

/// Size of the winning interval, in balance units.
///
/// Evaluated left to right in 256-bit arithmetic, truncating after each
/// fixed-point product:
/// `((twab * UNIT) * odds / UNIT) * portion / UNIT * prize_count / UNIT`.
pub fn calculate_winning_zone(
    user_twab: u128,
    tier_odds: UFixed18,
    vault_portion: UFixed18,
    tier_prize_count: u128,
) -> Result<U256, MathError> {
    let unit = U256::from(UNIT);
    let mut zone = U256::from(user_twab) * unit;
    zone = zone
        .checked_mul(U256::from(tier_odds.raw()))
        .ok_or(MathError::Overflow)?
        / unit;
    zone = zone
        .checked_mul(U256::from(vault_portion.raw()))
        .ok_or(MathError::Overflow)?
        / unit;
    zone = zone
        .checked_mul(U256::from(tier_prize_count))
        .ok_or(MathError::Overflow)?;
    Ok(zone / unit)
}

/// Decide one trial. Zero supply means no winners.
pub fn is_winner<H: DrawHasher + ?Sized>(hasher: &H, entry: &DrawEntry) -> Result<bool, TierError> {
    if entry.vault_twab_total_supply == 0 {
        return Ok(false);
    }

    let prn = calculate_pseudo_random_number(
        hasher,
        &entry.user,
        entry.tier,
        &entry.winning_random_number,
        entry.vault_twab_total_supply,
    )?;
    let zone = calculate_winning_zone(
        entry.user_twab,
        entry.tier_odds,
        entry.vault_portion,
        entry.tier_prize_count,
    )?;

    let supply = U256::from(entry.vault_twab_total_supply);
    if zone >= supply {
        warn!(
            user = %entry.user,
            tier = entry.tier,
            zone = %zone,
            supply = entry.vault_twab_total_supply,
            "winning zone covers the whole supply; guaranteed win"
        );
    }

    let won = U256::from(prn) < zone;
    trace!(user = %entry.user, tier = entry.tier, prn, zone = %zone, won, "winner check");
    Ok(won)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tierdraw_core::crypto::{Blake3DrawHasher, Sha256DrawHasher};

    fn user() -> AccountId {
        AccountId::from([0x11; 32])
    }

    fn entry(user_twab: u128, supply: u128, odds: UFixed18, portion: UFixed18, prizes: u128) -> DrawEntry {
        DrawEntry {
            user: user(),
            tier: 0,
            user_twab,
            vault_twab_total_supply: supply,
            vault_portion: portion,
            tier_odds: odds,
            tier_prize_count: prizes,
            winning_random_number: WinningRandomNumber::from(42u128),
        }
    }

    // --- pseudo-random number ---

    #[test]
    fn prn_known_vectors() {
        let n = WinningRandomNumber::from(42u128);
        let prn = |tier| calculate_pseudo_random_number(&Sha256DrawHasher, &user(), tier, &n, 1000).unwrap();
        assert_eq!(prn(0), 547);
        assert_eq!(prn(1), 156);
        assert_eq!(prn(2), 359);
        assert_eq!(prn(3), 778);
    }

    #[test]
    fn prn_full_width_modulus() {
        let n = WinningRandomNumber::from(42u128);
        let prn = calculate_pseudo_random_number(&Sha256DrawHasher, &user(), 0, &n, u128::MAX).unwrap();
        assert_eq!(prn, 160_489_034_124_446_043_050_619_561_281_205_148_357);
    }

    #[test]
    fn prn_zero_supply_fails() {
        let n = WinningRandomNumber::from(1u128);
        assert_eq!(
            calculate_pseudo_random_number(&Sha256DrawHasher, &user(), 0, &n, 0),
            Err(MathError::DivisionByZero)
        );
    }

    #[test]
    fn prn_depends_on_hasher() {
        let n = WinningRandomNumber::from(42u128);
        let sha = calculate_pseudo_random_number(&Sha256DrawHasher, &user(), 0, &n, u128::MAX).unwrap();
        let b3 = calculate_pseudo_random_number(&Blake3DrawHasher, &user(), 0, &n, u128::MAX).unwrap();
        assert_ne!(sha, b3);
    }

    // --- winning zone ---

    #[test]
    fn zone_product() {
        let quarter = UFixed18::from_raw(UNIT / 4);
        let half = UFixed18::from_raw(UNIT / 2);
        assert_eq!(calculate_winning_zone(100, quarter, half, 4).unwrap(), U256::from(50u8));
        assert_eq!(
            calculate_winning_zone(1, UFixed18::ONE, UFixed18::ONE, 1).unwrap(),
            U256::from(1u8)
        );
    }

    #[test]
    fn zone_truncates() {
        // 1000 * 0.396850262992049866 * 4 = 1587.40...
        let odds = UFixed18::from_raw(396_850_262_992_049_866);
        assert_eq!(
            calculate_winning_zone(1000, odds, UFixed18::ONE, 4).unwrap(),
            U256::from(1587u16)
        );
    }

    #[test]
    fn zone_exceeds_u128_without_failing() {
        let zone = calculate_winning_zone(u128::MAX, UFixed18::ONE, UFixed18::ONE, 4).unwrap();
        assert_eq!(zone, U256::from(u128::MAX) * U256::from(4u8));
    }

    #[test]
    fn zone_overflow_fails() {
        assert_eq!(
            calculate_winning_zone(u128::MAX, UFixed18::MAX, UFixed18::MAX, u128::MAX),
            Err(MathError::Overflow)
        );
    }

    // --- is_winner ---

    #[test]
    fn zero_supply_never_wins() {
        let e = entry(u128::MAX, 0, UFixed18::ONE, UFixed18::ONE, 1_000);
        assert!(!is_winner(&Sha256DrawHasher, &e).unwrap());
    }

    #[test]
    fn boundary_at_prn() {
        // prn for tier 0 is 547 with supply 1000.
        let win = entry(548, 1000, UFixed18::ONE, UFixed18::ONE, 1);
        let lose = entry(547, 1000, UFixed18::ONE, UFixed18::ONE, 1);
        assert!(is_winner(&Sha256DrawHasher, &win).unwrap());
        assert!(!is_winner(&Sha256DrawHasher, &lose).unwrap());
    }

    #[test]
    fn zero_balance_never_wins() {
        let e = entry(0, 1000, UFixed18::ONE, UFixed18::ONE, 1);
        assert!(!is_winner(&Sha256DrawHasher, &e).unwrap());
    }

    #[test]
    fn zero_portion_never_wins() {
        let e = entry(1000, 1000, UFixed18::ONE, UFixed18::ZERO, 64);
        assert!(!is_winner(&Sha256DrawHasher, &e).unwrap());
    }

    #[test]
    fn oversized_zone_guarantees_win() {
        // 300 * 1 * 1 * 4 = 1200 > 1000: every prn wins.
        for seed in 0..50u128 {
            let mut e = entry(300, 1000, UFixed18::ONE, UFixed18::ONE, 4);
            e.winning_random_number = WinningRandomNumber::from(seed);
            assert!(is_winner(&Sha256DrawHasher, &e).unwrap(), "seed {seed}");
        }
    }

    #[test]
    fn prize_count_widens_zone() {
        // 150 alone loses against prn 547; four prizes make the zone 600.
        let one = entry(150, 1000, UFixed18::ONE, UFixed18::ONE, 1);
        let four = entry(150, 1000, UFixed18::ONE, UFixed18::ONE, 4);
        assert!(!is_winner(&Sha256DrawHasher, &one).unwrap());
        assert!(is_winner(&Sha256DrawHasher, &four).unwrap());
    }

    // --- proptest ---

    proptest! {
        #[test]
        fn deterministic(twab in 0u128..1_000_000, supply in 0u128..1_000_000, seed in any::<u128>(), tier in 0u8..16) {
            let mut e = entry(twab, supply, UFixed18::from_raw(UNIT / 3), UFixed18::from_raw(UNIT / 2), 16);
            e.tier = tier;
            e.winning_random_number = WinningRandomNumber::from(seed);
            prop_assert_eq!(is_winner(&Sha256DrawHasher, &e), is_winner(&Sha256DrawHasher, &e));
        }

        #[test]
        fn zero_supply_always_loses(twab in any::<u128>(), seed in any::<u128>(), prizes in 0u128..1_000_000) {
            let mut e = entry(twab, 0, UFixed18::ONE, UFixed18::ONE, prizes);
            e.winning_random_number = WinningRandomNumber::from(seed);
            prop_assert_eq!(is_winner(&Sha256DrawHasher, &e), Ok(false));
        }

        #[test]
        fn prn_within_supply(supply in 1u128..u128::MAX, seed in any::<u128>(), tier in 0u8..16) {
            let n = WinningRandomNumber::from(seed);
            let prn = calculate_pseudo_random_number(&Sha256DrawHasher, &user(), tier, &n, supply).unwrap();
            prop_assert!(prn < supply);
        }
    }
}
