//! # tierdraw-tiers: multi-tier prize draw kernel.
//!
//! All calculations use fixed-point integer arithmetic only for determinism.
//!
//! - **Tier odds**: geometric interpolation from `1 / grand_prize_period` at
//!   tier 0 to certainty at the last tier, via a pinned `ln`/`exp` backend.
//! - **Prize counts**: `4^tier` prizes per tier, plus a fractional canary
//!   estimate for the next tier, weighted by share allocation.
//! - **Exchange rates**: contributed value split across shares with the
//!   indivisible remainder carried forward.
//! - **Winner determination**: a public hash-derived trial per (user, tier),
//!   weighted by balance share, tier odds, vault portion and prize count.
//! - **Claim counts**: expected claimable prizes per draw.

pub mod claims;
pub mod engine;
pub mod exchange;
pub mod odds;
pub mod prize;
pub mod transcendental;
pub mod winner;

pub use engine::TierEngine;
pub use exchange::{compute_next_exchange_rate_delta, ExchangeRateDelta, ExchangeRateLedger};
pub use transcendental::BinaryLogExp;
