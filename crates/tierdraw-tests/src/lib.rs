//! Cross-crate test suite for tierdraw.
//!
//! Integration tests live under `tests/`: pinned vectors shared by every
//! implementation of the draw, property tests over the public API, and
//! seeded statistical checks that observed win rates match the odds.

pub mod helpers;
