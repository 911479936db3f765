//! Protocol constants. All fractional values are fixed-point with 18 decimals.

/// One whole unit in the fixed-point representation (10^18).
///
/// # Examples
///
/// ```
/// use tierdraw_core::constants::UNIT;
/// assert_eq!(UNIT, 10u128.pow(18));
/// ```
pub const UNIT: u128 = 1_000_000_000_000_000_000;

/// `UNIT` as a signed value.
pub const UNIT_SIGNED: i128 = UNIT as i128;

/// `log2(e)` scaled by [`UNIT`], truncated.
pub const LOG2_E: u128 = 1_442_695_040_888_963_407;

/// `ln(2)` scaled by [`UNIT`], truncated.
pub const LN2: u128 = 693_147_180_559_945_309;

/// Upper bound on Taylor terms evaluated by the pinned `exp` approximation.
///
/// The series over `[0, ln 2)` truncates to zero well before this bound; the
/// cap only makes the iteration count part of the pinned algorithm.
pub const MAX_EXP_TERMS: u32 = 32;

/// Identifier of the pinned ln/exp approximation shipped with the kernel.
pub const TRANSCENDENTAL_V1: &str = "binary-log-exp/v1";

/// Fewest tiers a draw may have. The odds model divides by `number_of_tiers - 1`.
pub const MIN_NUMBER_OF_TIERS: u8 = 2;

/// Most tiers a draw may have.
///
/// Bounds `prize_count(tier) = 4^tier`; the canary estimate reads one tier
/// past the last, so the largest prize count the kernel evaluates is `4^16`.
pub const MAX_NUMBER_OF_TIERS: u8 = 16;

/// Growth factor of prize counts between consecutive tiers.
pub const PRIZE_COUNT_BASE: u128 = 4;

/// Version tag of the pseudo-random preimage layout.
///
/// v1: `user || tier || winning_random_number`, each a 32-byte big-endian word.
pub const PSEUDO_RANDOM_ENCODING_V1: u8 = 1;

/// Width of one word in the pseudo-random preimage.
pub const PREIMAGE_WORD_LEN: usize = 32;

/// Total length of a v1 pseudo-random preimage.
pub const PREIMAGE_LEN_V1: usize = 3 * PREIMAGE_WORD_LEN;

/// Longest account identifier accepted (one preimage word).
pub const MAX_ACCOUNT_ID_LEN: usize = PREIMAGE_WORD_LEN;

/// Default tier count for a draw.
pub const DEFAULT_NUMBER_OF_TIERS: u8 = 4;

/// Default number of draws between grand prizes.
pub const DEFAULT_GRAND_PRIZE_PERIOD: u32 = 365;

/// Default shares allocated to each prize tier.
pub const DEFAULT_TIER_SHARES: u128 = 100;

/// Default shares allocated to the canary tier.
pub const DEFAULT_CANARY_SHARES: u128 = 30;

/// Default shares allocated to the reserve.
pub const DEFAULT_RESERVE_SHARES: u128 = 10;
