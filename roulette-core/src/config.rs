//! TOML roulette definitions.
//!
//! ```toml
//! seed = 42
//!
//! [[entry]]
//! value = "A"
//! weight = 5.0
//!
//! [[entry]]
//! value = "B"
//! weight = 2.0
//! ```
//!
//! `seed` is optional; without it the roulette draws from entropy.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::error::RouletteError;
use crate::rng::RngSource;
use crate::roulette::Roulette;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error(transparent)]
    Roulette(#[from] RouletteError),
}

/// One stored value and its weight.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EntryConfig {
    pub value: String,
    pub weight: f64,
}

/// A roulette described in TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RouletteConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,

    #[serde(default, rename = "entry")]
    pub entries: Vec<EntryConfig>,
}

impl RouletteConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Seeded source when `seed` is set, entropy otherwise.
    pub fn source(&self) -> RngSource {
        match self.seed {
            Some(seed) => RngSource::seeded(seed),
            None => RngSource::from_entropy(),
        }
    }

    /// Insert every entry, in file order, into a fresh roulette.
    pub fn build(&self) -> Result<Roulette<String>, ConfigError> {
        let entries = self
            .entries
            .iter()
            .map(|entry| (entry.value.clone(), entry.weight));
        Ok(Roulette::try_from_entries(entries, self.source())?)
    }
}
