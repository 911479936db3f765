//! # tierdraw-core
//! Foundation types and traits for the tierdraw prize kernel.

pub mod constants;
pub mod crypto;
pub mod error;
pub mod fixed;
pub mod traits;
pub mod types;
