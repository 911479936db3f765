//! Core value types: identifiers, draw parameters, share configuration,
//! and the inputs of a single winner check.
//!
//! Every type here is an immutable value built fresh from caller-supplied
//! scalars; nothing is stored between calls.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_CANARY_SHARES, DEFAULT_GRAND_PRIZE_PERIOD, DEFAULT_NUMBER_OF_TIERS,
    DEFAULT_RESERVE_SHARES, DEFAULT_TIER_SHARES, MAX_ACCOUNT_ID_LEN, MAX_NUMBER_OF_TIERS,
    MIN_NUMBER_OF_TIERS, PREIMAGE_WORD_LEN,
};
use crate::error::{ParseError, ShareError, TierError};
use crate::fixed::{U256, UFixed18};

/// A 32-byte hash value.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// Interpret the digest as a big-endian 256-bit integer.
    pub fn to_u256(&self) -> U256 {
        U256::from_big_endian(&self.0)
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

/// Decode hex with an optional `0x` prefix into 1 to `max` bytes.
fn decode_hex(s: &str, max: usize) -> Result<Vec<u8>, ParseError> {
    let digits = s.strip_prefix("0x").unwrap_or(s);
    if digits.is_empty() {
        return Err(ParseError::Empty);
    }
    let bytes = hex::decode(digits).map_err(|e| ParseError::InvalidHex(e.to_string()))?;
    if bytes.len() > max {
        return Err(ParseError::TooLong { len: bytes.len(), max });
    }
    Ok(bytes)
}

/// Left-pad `bytes` with zeros into one preimage word.
fn left_pad(bytes: &[u8]) -> [u8; PREIMAGE_WORD_LEN] {
    let mut word = [0u8; PREIMAGE_WORD_LEN];
    word[PREIMAGE_WORD_LEN - bytes.len()..].copy_from_slice(bytes);
    word
}

/// Opaque participant identifier.
///
/// Stored as one 32-byte word; shorter identifiers (such as 20-byte
/// addresses) are left-padded with zeros, so `0xab` and `0x00ab` are the
/// same account.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct AccountId([u8; PREIMAGE_WORD_LEN]);

impl AccountId {
    /// Build from a byte slice of at most 32 bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, ParseError> {
        if bytes.len() > MAX_ACCOUNT_ID_LEN {
            return Err(ParseError::TooLong { len: bytes.len(), max: MAX_ACCOUNT_ID_LEN });
        }
        Ok(Self(left_pad(bytes)))
    }

    /// The padded 32-byte word.
    pub fn as_word(&self) -> &[u8; PREIMAGE_WORD_LEN] {
        &self.0
    }
}

impl From<[u8; 32]> for AccountId {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for AccountId {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_slice(&decode_hex(s, MAX_ACCOUNT_ID_LEN)?)
    }
}

/// Public per-draw random seed, a 256-bit big-endian integer.
#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default,
)]
pub struct WinningRandomNumber([u8; PREIMAGE_WORD_LEN]);

impl WinningRandomNumber {
    pub fn from_be_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn to_be_bytes(&self) -> [u8; 32] {
        self.0
    }
}

impl From<u128> for WinningRandomNumber {
    fn from(value: u128) -> Self {
        Self(left_pad(&value.to_be_bytes()))
    }
}

impl fmt::Display for WinningRandomNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for WinningRandomNumber {
    type Err = ParseError;

    /// Parse `0x`-prefixed hex of up to 32 bytes, or a decimal below 2^256.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.starts_with("0x") {
            let bytes = decode_hex(s, PREIMAGE_WORD_LEN)?;
            return Ok(Self(left_pad(&bytes)));
        }
        if s.is_empty() {
            return Err(ParseError::Empty);
        }
        let value =
            U256::from_dec_str(s).map_err(|e| ParseError::InvalidDecimal(format!("{s}: {e:?}")))?;
        let mut word = [0u8; PREIMAGE_WORD_LEN];
        value.to_big_endian(&mut word);
        Ok(Self(word))
    }
}

/// Tier layout of a draw: how many tiers and how rare the grand prize is.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawParams {
    pub number_of_tiers: u8,
    /// Expected number of draws between grand prizes.
    pub grand_prize_period: u32,
}

impl Default for DrawParams {
    fn default() -> Self {
        Self {
            number_of_tiers: DEFAULT_NUMBER_OF_TIERS,
            grand_prize_period: DEFAULT_GRAND_PRIZE_PERIOD,
        }
    }
}

impl DrawParams {
    pub fn new(number_of_tiers: u8, grand_prize_period: u32) -> Self {
        Self { number_of_tiers, grand_prize_period }
    }

    /// Check the tier count bounds and the grand prize period.
    pub fn validate(&self) -> Result<(), TierError> {
        validate_number_of_tiers(self.number_of_tiers)?;
        if self.grand_prize_period == 0 {
            return Err(TierError::ZeroGrandPrizePeriod);
        }
        Ok(())
    }

    /// Indices of every tier in the draw, grand prize first.
    pub fn tiers(&self) -> impl Iterator<Item = u8> {
        0..self.number_of_tiers
    }
}

/// Reject tier counts outside `[MIN_NUMBER_OF_TIERS, MAX_NUMBER_OF_TIERS]`.
pub fn validate_number_of_tiers(number_of_tiers: u8) -> Result<(), TierError> {
    if number_of_tiers < MIN_NUMBER_OF_TIERS {
        return Err(TierError::TooFewTiers { got: number_of_tiers, min: MIN_NUMBER_OF_TIERS });
    }
    if number_of_tiers > MAX_NUMBER_OF_TIERS {
        return Err(TierError::TooManyTiers { got: number_of_tiers, max: MAX_NUMBER_OF_TIERS });
    }
    Ok(())
}

/// How a contributed amount is apportioned among tiers, canary and reserve.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct ShareConfig {
    /// Shares per prize tier.
    pub tier_shares: u128,
    pub canary_shares: u128,
    pub reserve_shares: u128,
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            tier_shares: DEFAULT_TIER_SHARES,
            canary_shares: DEFAULT_CANARY_SHARES,
            reserve_shares: DEFAULT_RESERVE_SHARES,
        }
    }
}

impl ShareConfig {
    pub fn new(tier_shares: u128, canary_shares: u128, reserve_shares: u128) -> Self {
        Self { tier_shares, canary_shares, reserve_shares }
    }

    pub fn validate(&self) -> Result<(), ShareError> {
        if self.tier_shares == 0 {
            return Err(ShareError::ZeroTierShares);
        }
        Ok(())
    }

    /// `tiers * tier_shares + canary_shares + reserve_shares`.
    ///
    /// # Examples
    ///
    /// ```
    /// use tierdraw_core::types::ShareConfig;
    /// let shares = ShareConfig::new(100, 30, 10);
    /// assert_eq!(shares.total_shares(4).unwrap(), 440);
    /// ```
    pub fn total_shares(&self, number_of_tiers: u8) -> Result<u128, ShareError> {
        (number_of_tiers as u128)
            .checked_mul(self.tier_shares)
            .and_then(|t| t.checked_add(self.canary_shares))
            .and_then(|t| t.checked_add(self.reserve_shares))
            .ok_or(ShareError::Overflow)
    }
}

/// Inputs of a single winner check for one (user, tier) pair.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct DrawEntry {
    pub user: AccountId,
    pub tier: u8,
    /// Time-weighted average balance of the user.
    pub user_twab: u128,
    /// Time-weighted average total supply of the vault; zero means no winners.
    pub vault_twab_total_supply: u128,
    /// Fraction of the tier's prize funding contributed by the vault.
    pub vault_portion: UFixed18,
    pub tier_odds: UFixed18,
    pub tier_prize_count: u128,
    pub winning_random_number: WinningRandomNumber,
}

/// One user's standing in a draw, independent of tier.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Participant {
    pub user: AccountId,
    pub user_twab: u128,
    pub vault_twab_total_supply: u128,
    pub vault_portion: UFixed18,
    pub winning_random_number: WinningRandomNumber,
}

impl Participant {
    /// The winner-check inputs for `tier` given its odds and prize count.
    pub fn entry(&self, tier: u8, tier_odds: UFixed18, tier_prize_count: u128) -> DrawEntry {
        DrawEntry {
            user: self.user,
            tier,
            user_twab: self.user_twab,
            vault_twab_total_supply: self.vault_twab_total_supply,
            vault_portion: self.vault_portion,
            tier_odds,
            tier_prize_count,
            winning_random_number: self.winning_random_number,
        }
    }
}

/// Derived parameters of one tier.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct TierInfo {
    pub tier: u8,
    pub odds: UFixed18,
    pub prize_count: u128,
    /// Expected draws between occurrences, rounded up.
    pub frequency_in_draws: u128,
    /// `prize_count * odds`.
    pub expected_prizes_per_draw: UFixed18,
}

/// Every tier of a draw plus the canary estimate and claim count.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct PrizeTable {
    pub params: DrawParams,
    pub shares: ShareConfig,
    pub tiers: Vec<TierInfo>,
    pub canary_prize_count: UFixed18,
    pub estimated_claim_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash256_display_hex() {
        let h = Hash256([0xab; 32]);
        assert_eq!(h.to_string(), "ab".repeat(32));
    }

    #[test]
    fn hash256_to_u256_big_endian() {
        let mut bytes = [0u8; 32];
        bytes[31] = 0x02;
        bytes[30] = 0x01;
        assert_eq!(Hash256(bytes).to_u256(), U256::from(0x0102u64));
    }

    #[test]
    fn account_id_left_pads_address() {
        let id = AccountId::from_slice(&[0x11; 20]).unwrap();
        assert_eq!(&id.as_word()[..12], &[0u8; 12]);
        assert_eq!(&id.as_word()[12..], &[0x11; 20]);
    }

    #[test]
    fn account_id_from_slice_rejects_long() {
        assert_eq!(
            AccountId::from_slice(&[0u8; 33]),
            Err(ParseError::TooLong { len: 33, max: 32 })
        );
    }

    #[test]
    fn account_id_parse_hex() {
        let id: AccountId = "0x00ab".parse().unwrap();
        let short: AccountId = "ab".parse().unwrap();
        assert_eq!(id, short);
        assert_eq!(id.as_word()[31], 0xab);
        assert!("0xzz".parse::<AccountId>().is_err());
    }

    #[test]
    fn account_id_rejects_empty() {
        assert_eq!("0x".parse::<AccountId>(), Err(ParseError::Empty));
        assert_eq!("".parse::<AccountId>(), Err(ParseError::Empty));
    }

    #[test]
    fn account_id_display() {
        let id = AccountId::from([0x01; 32]);
        assert_eq!(id.to_string(), format!("0x{}", "01".repeat(32)));
    }

    #[test]
    fn random_number_from_u128() {
        let n = WinningRandomNumber::from(258u128);
        let bytes = n.to_be_bytes();
        assert_eq!(bytes[31], 2);
        assert_eq!(bytes[30], 1);
        assert_eq!(&bytes[..30], &[0u8; 30]);
    }

    #[test]
    fn random_number_parse_decimal_and_hex() {
        let dec: WinningRandomNumber = "258".parse().unwrap();
        let hex: WinningRandomNumber = "0x0102".parse().unwrap();
        assert_eq!(dec, hex);
        let too_long = format!("0x{}", "ff".repeat(33));
        assert!(too_long.parse::<WinningRandomNumber>().is_err());
    }

    #[test]
    fn random_number_parse_wide_decimal() {
        let n: WinningRandomNumber = "1000000000000000000000000000000000000000".parse().unwrap();
        assert_eq!(n.to_string(), format!("0x{:0>64}", "2f050fe938943acc45f65568000000000"));

        let above_u128: WinningRandomNumber =
            "340282366920938463463374607431768211456".parse().unwrap();
        assert_eq!(above_u128.to_be_bytes()[15], 1);
        assert_eq!(&above_u128.to_be_bytes()[16..], &[0u8; 16]);
    }

    #[test]
    fn random_number_rejects_unprefixed_hex_and_overflow() {
        assert!(matches!("ff".parse::<WinningRandomNumber>(), Err(ParseError::InvalidDecimal(_))));
        let too_big = format!("1{}", "0".repeat(78));
        assert!(matches!(too_big.parse::<WinningRandomNumber>(), Err(ParseError::InvalidDecimal(_))));
        assert_eq!("".parse::<WinningRandomNumber>(), Err(ParseError::Empty));
        assert_eq!("0x".parse::<WinningRandomNumber>(), Err(ParseError::Empty));
    }

    #[test]
    fn draw_params_validation() {
        assert!(DrawParams::default().validate().is_ok());
        assert_eq!(
            DrawParams::new(1, 10).validate(),
            Err(TierError::TooFewTiers { got: 1, min: 2 })
        );
        assert_eq!(
            DrawParams::new(17, 10).validate(),
            Err(TierError::TooManyTiers { got: 17, max: 16 })
        );
        assert_eq!(DrawParams::new(4, 0).validate(), Err(TierError::ZeroGrandPrizePeriod));
    }

    #[test]
    fn draw_params_tiers_iterates_all() {
        let tiers: Vec<u8> = DrawParams::new(3, 10).tiers().collect();
        assert_eq!(tiers, vec![0, 1, 2]);
    }

    #[test]
    fn share_config_validation_and_total() {
        assert!(ShareConfig::default().validate().is_ok());
        assert_eq!(ShareConfig::new(0, 1, 1).validate(), Err(ShareError::ZeroTierShares));
        assert_eq!(ShareConfig::new(u128::MAX, 0, 0).total_shares(2), Err(ShareError::Overflow));
        assert_eq!(ShareConfig::new(100, 0, 0).total_shares(3).unwrap(), 300);
    }

    #[test]
    fn participant_entry_copies_fields() {
        let p = Participant {
            user: AccountId::from([7; 32]),
            user_twab: 10,
            vault_twab_total_supply: 100,
            vault_portion: UFixed18::ONE,
            winning_random_number: WinningRandomNumber::from(1u128),
        };
        let e = p.entry(2, UFixed18::from_ratio(1, 4).unwrap(), 16);
        assert_eq!(e.user, p.user);
        assert_eq!(e.tier, 2);
        assert_eq!(e.tier_prize_count, 16);
        assert_eq!(e.user_twab, 10);
        assert_eq!(e.vault_twab_total_supply, 100);
    }
}
