//! Pseudo-random preimage encoding and the shipped draw hashers.
//!
//! The v1 preimage is three 32-byte big-endian words:
//!
//! ```text
//! user (left zero-padded) || tier (u8 widened to 256 bits) || winning_random_number
//! ```
//!
//! The layout and the hash together pin every trial, so both carry version
//! tags. Changing either breaks reproducibility of published draws.

use sha2::{Digest, Sha256};

use crate::constants::{PREIMAGE_LEN_V1, PREIMAGE_WORD_LEN};
use crate::traits::DrawHasher;
use crate::types::{AccountId, Hash256, WinningRandomNumber};

/// Encode the v1 pseudo-random preimage for one (user, tier, draw).
///
/// # Examples
///
/// ```
/// use tierdraw_core::crypto::encode_preimage_v1;
/// use tierdraw_core::types::{AccountId, WinningRandomNumber};
///
/// let preimage = encode_preimage_v1(&AccountId::default(), 3, &WinningRandomNumber::from(9u128));
/// assert_eq!(preimage.len(), 96);
/// assert_eq!(preimage[63], 3);
/// assert_eq!(preimage[95], 9);
/// ```
pub fn encode_preimage_v1(
    user: &AccountId,
    tier: u8,
    winning_random_number: &WinningRandomNumber,
) -> [u8; PREIMAGE_LEN_V1] {
    let mut out = [0u8; PREIMAGE_LEN_V1];
    out[..PREIMAGE_WORD_LEN].copy_from_slice(user.as_word());
    out[2 * PREIMAGE_WORD_LEN - 1] = tier;
    out[2 * PREIMAGE_WORD_LEN..].copy_from_slice(&winning_random_number.to_be_bytes());
    out
}

/// SHA-256 draw hasher. The default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256DrawHasher;

impl DrawHasher for Sha256DrawHasher {
    fn id(&self) -> &'static str {
        "sha256/v1"
    }

    fn hash(&self, preimage: &[u8]) -> Hash256 {
        Hash256(Sha256::digest(preimage).into())
    }
}

/// BLAKE3 draw hasher.
#[derive(Debug, Clone, Copy, Default)]
pub struct Blake3DrawHasher;

impl DrawHasher for Blake3DrawHasher {
    fn id(&self) -> &'static str {
        "blake3/v1"
    }

    fn hash(&self, preimage: &[u8]) -> Hash256 {
        Hash256(blake3::hash(preimage).into())
    }
}
