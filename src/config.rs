use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::models::ScoringWeights;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub store: StoreSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub sessions: SessionSettings,
    #[serde(default)]
    pub media: MediaSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub workers: Option<usize>,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: None,
        }
    }
}

fn default_host() -> String { "127.0.0.1".to_string() }
fn default_port() -> u16 { 8080 }

/// Which store implementation backs the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    Memory,
    Csv,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    #[serde(default = "default_backend")]
    pub backend: StoreBackend,
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            backend: default_backend(),
            data_dir: default_data_dir(),
        }
    }
}

fn default_backend() -> StoreBackend { StoreBackend::Csv }
fn default_data_dir() -> PathBuf { PathBuf::from("data") }

#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    /// Recommendations per session when the client does not ask for a
    /// limit. 0 returns the whole ranked list.
    #[serde(default = "default_limit")]
    pub default_limit: usize,
    /// Upper bound on any limit. 0 leaves limits uncapped.
    #[serde(default = "default_max_limit")]
    pub max_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            default_limit: default_limit(),
            max_limit: default_max_limit(),
        }
    }
}

fn default_limit() -> usize { 5 }
fn default_max_limit() -> usize { 100 }

impl MatchingSettings {
    /// Limit to apply for a request, capped at `max_limit`.
    ///
    /// `None` means the whole ranked list.
    pub fn effective_limit(&self, requested: Option<usize>) -> Option<usize> {
        let limit = match requested {
            Some(limit) => limit,
            None if self.default_limit == 0 => return None,
            None => self.default_limit,
        };

        if self.max_limit == 0 {
            Some(limit)
        } else {
            Some(limit.min(self.max_limit))
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    #[serde(default = "default_apartment_size_threshold")]
    pub apartment_size_threshold: f64,
}

impl Default for ScoringSettings {
    fn default() -> Self {
        Self {
            weights: WeightsConfig::default(),
            apartment_size_threshold: default_apartment_size_threshold(),
        }
    }
}

fn default_apartment_size_threshold() -> f64 { 50.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_species_weight")]
    pub species: f64,
    #[serde(default = "default_gender_weight")]
    pub gender: f64,
    #[serde(default = "default_activity_weight")]
    pub activity: f64,
    #[serde(default = "default_allergy_weight")]
    pub allergy: f64,
    #[serde(default = "default_space_weight")]
    pub space: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            species: default_species_weight(),
            gender: default_gender_weight(),
            activity: default_activity_weight(),
            allergy: default_allergy_weight(),
            space: default_space_weight(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(config: &WeightsConfig) -> Self {
        ScoringWeights {
            species: config.species,
            gender: config.gender,
            activity: config.activity,
            allergy: config.allergy,
            space: config.space,
        }
    }
}

fn default_species_weight() -> f64 { 0.3 }
fn default_gender_weight() -> f64 { 0.1 }
fn default_activity_weight() -> f64 { 0.2 }
fn default_allergy_weight() -> f64 { 0.2 }
fn default_space_weight() -> f64 { 0.2 }

#[derive(Debug, Clone, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_capacity")]
    pub capacity: u64,
    #[serde(default = "default_session_ttl")]
    pub ttl_secs: u64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            capacity: default_session_capacity(),
            ttl_secs: default_session_ttl(),
        }
    }
}

fn default_session_capacity() -> u64 { 10_000 }
fn default_session_ttl() -> u64 { 1800 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MediaSettings {
    pub base_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with PAWMATCH__)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., PAWMATCH__SERVER__PORT -> server.port
            .add_source(
                Environment::with_prefix("PAWMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let settings = apply_env_overrides(settings)?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(
                Environment::with_prefix("PAWMATCH")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        settings.try_deserialize()
    }
}

/// Unprefixed variables commonly set by deployment tooling
fn apply_env_overrides(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(data_dir) = env::var("DATA_DIR") {
        builder = builder.set_override("store.data_dir", data_dir)?;
    }
    if let Ok(port) = env::var("PORT") {
        builder = builder.set_override("server.port", port)?;
    }
    if let Ok(level) = env::var("LOG_LEVEL") {
        builder = builder.set_override("logging.level", level)?;
    }
    if let Ok(format) = env::var("LOG_FORMAT") {
        builder = builder.set_override("logging.format", format)?;
    }

    builder.build()
}
