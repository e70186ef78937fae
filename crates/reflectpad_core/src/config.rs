//! Engine configuration.
//!
//! The configuration is read once, either installed explicitly with [`init`] or
//! loaded lazily from the environment on first use:
//!
//! - `REFLECTPAD_POOLS`: number of worker pools (`Device::Pool(0..n)`), default 1
//! - `REFLECTPAD_NUM_THREADS`: threads per pool, default rayon's choice
//! - `REFLECTPAD_ACCUMULATION`: `atomic` (default) or `partitioned`

use crate::error::{Error, Result};
use log::warn;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use std::{str::FromStr, sync::OnceLock};

pub const ENV_POOLS: &str = "REFLECTPAD_POOLS";
pub const ENV_NUM_THREADS: &str = "REFLECTPAD_NUM_THREADS";
pub const ENV_ACCUMULATION: &str = "REFLECTPAD_ACCUMULATION";

/// How the backward pass merges contributions that land on the same input cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(rename_all = "lowercase"))]
pub enum Accumulation {
    /// Compare-and-swap add on a shared gradient buffer.
    #[default]
    Atomic,
    /// Private per-worker buffers summed after the parallel phase.
    Partitioned,
}

impl Accumulation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::Partitioned => "partitioned",
        }
    }
}

impl FromStr for Accumulation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "partitioned" | "partition" => Ok(Self::Partitioned),
            other => Err(Error::Config(format!(
                "unknown accumulation strategy '{}', expected 'atomic' or 'partitioned'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct EngineConfig {
    pub pools: usize,
    pub num_threads: Option<usize>,
    pub accumulation: Accumulation,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pools: 1,
            num_threads: None,
            accumulation: Accumulation::default(),
        }
    }
}

impl EngineConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a configuration from a key lookup, falling back to defaults for
    /// missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(pools) = lookup(ENV_POOLS) {
            config.pools = parse_count(ENV_POOLS, &pools)?;
        }
        if let Some(threads) = lookup(ENV_NUM_THREADS) {
            config.num_threads = Some(parse_count(ENV_NUM_THREADS, &threads)?);
        }
        if let Some(accumulation) = lookup(ENV_ACCUMULATION) {
            config.accumulation = accumulation.parse()?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.pools == 0 {
            return Err(Error::Config("at least one worker pool is required".to_string()));
        }
        if self.num_threads == Some(0) {
            return Err(Error::Config("a worker pool needs at least one thread".to_string()));
        }
        Ok(())
    }
}

fn parse_count(key: &str, value: &str) -> Result<usize> {
    value
        .trim()
        .parse()
        .map_err(|_| Error::Config(format!("{} must be a non-negative integer, got '{}'", key, value)))
}

static CONFIG: OnceLock<EngineConfig> = OnceLock::new();

/// Installs the process-wide configuration. Fails if one is already in place,
/// including one loaded lazily by [`get`].
pub fn init(config: EngineConfig) -> Result<()> {
    config.validate()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("engine configuration is already initialized".to_string()))
}

pub fn get() -> &'static EngineConfig {
    CONFIG.get_or_init(|| {
        EngineConfig::from_env().unwrap_or_else(|e| {
            warn!("ignoring environment configuration: {}", e);
            EngineConfig::default()
        })
    })
}
