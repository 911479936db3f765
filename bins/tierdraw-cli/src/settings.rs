//! Settings for the tierdraw CLI.
//!
//! Layered lowest to highest: built-in defaults, an optional TOML file,
//! `TIERDRAW_*` environment variables, then command-line flags (applied by
//! the caller). Nested keys use a double underscore in the environment, for
//! example `TIERDRAW_DRAW__NUMBER_OF_TIERS=5`.

use std::path::Path;

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use tierdraw_core::constants::{
    DEFAULT_CANARY_SHARES, DEFAULT_GRAND_PRIZE_PERIOD, DEFAULT_NUMBER_OF_TIERS,
    DEFAULT_RESERVE_SHARES, DEFAULT_TIER_SHARES,
};
use tierdraw_core::types::{DrawParams, ShareConfig};

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "TIERDRAW";

/// Hash function used for pseudo-random trials.
#[derive(Serialize, Deserialize, ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HasherKind {
    #[default]
    Sha256,
    Blake3,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct DrawSection {
    pub number_of_tiers: u8,
    pub grand_prize_period: u32,
    pub hasher: HasherKind,
}

impl Default for DrawSection {
    fn default() -> Self {
        Self {
            number_of_tiers: DEFAULT_NUMBER_OF_TIERS,
            grand_prize_period: DEFAULT_GRAND_PRIZE_PERIOD,
            hasher: HasherKind::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct SharesSection {
    pub tier_shares: u64,
    pub canary_shares: u64,
    pub reserve_shares: u64,
}

impl Default for SharesSection {
    fn default() -> Self {
        Self {
            tier_shares: DEFAULT_TIER_SHARES as u64,
            canary_shares: DEFAULT_CANARY_SHARES as u64,
            reserve_shares: DEFAULT_RESERVE_SHARES as u64,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct LogSection {
    /// Filter directive, e.g. "info" or "tierdraw_tiers=debug".
    pub level: String,
    /// "text" or "json".
    pub format: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self { level: "info".to_string(), format: "text".to_string() }
    }
}

/// Complete CLI settings.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub draw: DrawSection,
    pub shares: SharesSection,
    pub log: LogSection,
}

impl Settings {
    /// Load from an optional file and the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = path.map(|p| config::File::from(p).required(true));
        Self::load_from(file, None)
            .with_context(|| match path {
                Some(p) => format!("failed to load settings from {}", p.display()),
                None => "failed to load settings from environment".to_string(),
            })
    }

    /// Load from an explicit source and environment map (`None` reads the
    /// process environment).
    pub fn load_from<S>(file: Option<S>, env: Option<config::Map<String, String>>) -> Result<Self>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let mut builder = config::Config::builder();
        if let Some(file) = file {
            builder = builder.add_source(file);
        }
        builder = builder.add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true)
                .source(env),
        );
        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.params().validate()?;
        settings.share_config().validate()?;
        Ok(settings)
    }

    pub fn params(&self) -> DrawParams {
        DrawParams::new(self.draw.number_of_tiers, self.draw.grand_prize_period)
    }

    pub fn share_config(&self) -> ShareConfig {
        ShareConfig::new(
            self.shares.tier_shares as u128,
            self.shares.canary_shares as u128,
            self.shares.reserve_shares as u128,
        )
    }
}
