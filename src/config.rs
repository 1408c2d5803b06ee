use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::models::Currency;
use crate::rates::providers::{EcbSource, FrankfurterSource};
use crate::rates::ObservationSource;

/// Default lookback before the range start.
fn default_lookback_days() -> u32 {
    crate::rates::DEFAULT_LOOKBACK_DAYS
}

/// Which currencies to produce rows for.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestConfig {
    /// "From" side of every pair. Empty means the whole universe.
    pub from_currencies: Vec<Currency>,

    /// "To" side of every pair. Empty means the whole universe.
    pub to_currencies: Vec<Currency>,

    /// Extra days fetched before the start of the range so the first days
    /// can be carried forward from a real observation.
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            from_currencies: Vec::new(),
            to_currencies: Vec::new(),
            lookback_days: default_lookback_days(),
        }
    }
}

/// Feed providing the EUR observations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum SourceKind {
    /// ECB data portal (SDMX EXR dataflow)
    #[default]
    Ecb,
    /// Frankfurter JSON API
    Frankfurter,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub kind: SourceKind,

    /// Overrides the source's public endpoint.
    pub base_url: Option<String>,
}

impl SourceConfig {
    pub fn build(&self) -> Arc<dyn ObservationSource> {
        match self.kind {
            SourceKind::Ecb => {
                let source = EcbSource::new();
                match &self.base_url {
                    Some(url) => Arc::new(source.with_base_url(url)),
                    None => Arc::new(source),
                }
            }
            SourceKind::Frankfurter => {
                let source = FrankfurterSource::new();
                match &self.base_url {
                    Some(url) => Arc::new(source.with_base_url(url)),
                    None => Arc::new(source),
                }
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputFormat {
    /// Comma separated values with a header line
    #[default]
    Csv,
    /// One JSON object per line
    Json,
}

/// Output rendering settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,

    /// If set, values are rounded to this many decimal places when written.
    /// Calculations always use full precision.
    pub decimals: Option<u32>,
}

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Currencies used when a request leaves a side open. Defaults to the
    /// ECB reference currencies plus EUR.
    pub universe: Option<Vec<Currency>>,

    pub request: RequestConfig,

    pub source: SourceConfig,

    pub output: OutputConfig,
}

impl Config {
    /// Load config from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Load config from a file, or return default config if file doesn't exist.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// The configured universe, or the default one.
    pub fn universe(&self) -> Vec<Currency> {
        match &self.universe {
            Some(universe) if !universe.is_empty() => universe.clone(),
            _ => Currency::default_universe(),
        }
    }
}

/// Returns the default config file path.
///
/// Resolution order:
/// 1. `./eurocross.toml` if it exists in current directory
/// 2. `<config dir>/eurocross/eurocross.toml` (e.g. `~/.config` on Linux)
pub fn default_config_path() -> PathBuf {
    let local_config = PathBuf::from("eurocross.toml");
    if local_config.exists() {
        return local_config;
    }

    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("eurocross").join("eurocross.toml");
    }

    local_config
}
