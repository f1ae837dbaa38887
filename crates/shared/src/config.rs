//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Share code and membership settings.
    pub access: AccessConfig,
    /// Remote store call boundary settings.
    pub remote: RemoteConfig,
    /// Entity validation policy.
    pub validation: ValidationConfig,
    /// Change-event delivery settings.
    pub sync: SyncConfig,
    /// Logging settings.
    pub telemetry: TelemetryConfig,
}

/// Share code and membership configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Maximum number of members per workspace.
    #[serde(default = "default_member_capacity")]
    pub member_capacity: usize,
    /// Shortest accepted share code after normalization.
    #[serde(default = "default_share_code_min_len")]
    pub share_code_min_len: usize,
    /// Longest accepted share code after normalization.
    #[serde(default = "default_share_code_max_len")]
    pub share_code_max_len: usize,
}

fn default_member_capacity() -> usize {
    2
}

fn default_share_code_min_len() -> usize {
    4
}

fn default_share_code_max_len() -> usize {
    16
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            member_capacity: default_member_capacity(),
            share_code_min_len: default_share_code_min_len(),
            share_code_max_len: default_share_code_max_len(),
        }
    }
}

/// Remote store call boundary configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteConfig {
    /// Per-attempt timeout in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Total attempts for calls failing with `Unavailable`.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Base delay between attempts in milliseconds (grows linearly).
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,
}

fn default_timeout_ms() -> u64 {
    10_000
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    250
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
        }
    }
}

/// Entity validation policy configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidationConfig {
    /// How many days past today an expense or settlement date may be.
    #[serde(default = "default_max_future_days")]
    pub max_future_days: u32,
    /// Longest accepted display name, in characters.
    #[serde(default = "default_max_name_len")]
    pub max_name_len: usize,
    /// Largest accepted expense or settlement amount, in whole currency units.
    #[serde(default = "default_max_amount")]
    pub max_amount: u64,
    /// Reject settlements larger than the outstanding pairwise balance.
    #[serde(default)]
    pub enforce_settlement_balance: bool,
}

fn default_max_future_days() -> u32 {
    366
}

fn default_max_name_len() -> usize {
    60
}

fn default_max_amount() -> u64 {
    1_000_000_000
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            max_future_days: default_max_future_days(),
            max_name_len: default_max_name_len(),
            max_amount: default_max_amount(),
            enforce_settlement_balance: false,
        }
    }
}

/// Change-event delivery configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Capacity of each subscription channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Maximum events merged by a single drain.
    #[serde(default = "default_drain_batch_limit")]
    pub drain_batch_limit: usize,
}

fn default_channel_capacity() -> usize {
    256
}

fn default_drain_batch_limit() -> usize {
    512
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            drain_batch_limit: default_drain_batch_limit(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    /// Default `EnvFilter` directive when `RUST_LOG` is unset.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

fn default_log_filter() -> String {
    "casal=info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Loads configuration from `.env`, config files and environment.
    ///
    /// Sources, later ones winning: `config/default`, `config/{RUN_MODE}`,
    /// then `CASAL__SECTION__KEY` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(
                config::Environment::with_prefix("CASAL")
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
