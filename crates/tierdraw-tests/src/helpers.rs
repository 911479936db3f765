//! Shared builders for integration tests.

use tierdraw_core::fixed::UFixed18;
use tierdraw_core::types::{AccountId, DrawEntry, Participant, WinningRandomNumber};

/// Account id filled with a seed byte.
pub fn user(seed: u8) -> AccountId {
    AccountId::from([seed; 32])
}

/// A participant holding `user_twab` of `supply`, with the full vault portion.
pub fn participant(seed: u8, user_twab: u128, supply: u128, random: u128) -> Participant {
    Participant {
        user: user(seed),
        user_twab,
        vault_twab_total_supply: supply,
        vault_portion: UFixed18::ONE,
        winning_random_number: WinningRandomNumber::from(random),
    }
}

/// A tier-0 winner check with explicit odds, portion and prize count.
pub fn entry(
    user_twab: u128,
    supply: u128,
    odds: UFixed18,
    portion: UFixed18,
    prize_count: u128,
    random: WinningRandomNumber,
) -> DrawEntry {
    DrawEntry {
        user: user(0x11),
        tier: 0,
        user_twab,
        vault_twab_total_supply: supply,
        vault_portion: portion,
        tier_odds: odds,
        tier_prize_count: prize_count,
        winning_random_number: random,
    }
}
