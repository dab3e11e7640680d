pub mod env;
pub use env::apply_env_overrides;

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "birdfetcher.toml";

/// Complete Bird Fetcher configuration
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BirdFetcherConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub skill: SkillConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub geocoding: GeocodingConfig,
    #[serde(default)]
    pub observations: ObservationConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Skill identity. Events carrying any other application id are rejected.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SkillConfig {
    #[serde(default)]
    pub application_id: String,
}

/// Inbound request limits
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_body_size_limit")]
    pub body_size_limit_bytes: usize,
}

fn default_body_size_limit() -> usize {
    65_536 // 64 KB
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            body_size_limit_bytes: default_body_size_limit(),
        }
    }
}

/// Geocoding collaborator (Google Maps geocode API shape)
#[derive(Debug, Clone, Deserialize)]
pub struct GeocodingConfig {
    #[serde(default = "default_geocoding_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_geocoding_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_timeout_seconds() -> u64 {
    5
}

impl Default for GeocodingConfig {
    fn default() -> Self {
        Self {
            base_url: default_geocoding_base_url(),
            api_key: None,
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

/// Observation collaborator (eBird recent-observations API shape)
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationConfig {
    #[serde(default = "default_observations_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

fn default_observations_base_url() -> String {
    "https://api.ebird.org".to_string()
}

fn default_max_results() -> u32 {
    10
}

impl Default for ObservationConfig {
    fn default() -> Self {
        Self {
            base_url: default_observations_base_url(),
            api_token: None,
            max_results: default_max_results(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl BirdFetcherConfig {
    /// Reject configurations the service cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.skill.application_id.trim().is_empty() {
            bail!("skill.application_id is not set (BIRDFETCHER_APPLICATION_ID)");
        }
        if self.observations.max_results == 0 {
            bail!("observations.max_results must be at least 1");
        }
        Ok(())
    }
}

/// Load configuration from TOML file
pub fn load_config(path: impl AsRef<Path>) -> Result<BirdFetcherConfig> {
    let path = path.as_ref();
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: BirdFetcherConfig = toml::from_str(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    Ok(config)
}

/// Load configuration from `path` if it exists (defaults otherwise), then
/// overlay environment variables.
pub fn load_or_default(path: impl AsRef<Path>) -> Result<BirdFetcherConfig> {
    let path = path.as_ref();
    let mut config = if path.exists() {
        load_config(path)?
    } else {
        BirdFetcherConfig::default()
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}
