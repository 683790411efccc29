use serde::Deserialize;
use std::{path::Path, time::Duration};
use thiserror::Error;
use tokio::fs;
use tracing::warn;

// -----------------------------------------------------------------------------
// ----- Defaults --------------------------------------------------------------

pub const DEFAULT_TRANSACTION_TIMEOUT: Duration = Duration::from_secs(3);
pub const DEFAULT_PROBE_INTERVAL: Duration = Duration::from_secs(2);

// Shorter timeouts tend to fire on ordinary pool contention rather than
// real outages. Accepted, but logged.
const TIMEOUT_WARN_FLOOR: Duration = Duration::from_millis(10);

// -----------------------------------------------------------------------------
// ----- GatewayConfig ---------------------------------------------------------

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    /// Hard wall-clock bound on every begin call.
    pub transaction_timeout: Duration,

    /// Spacing between reachability probes during an outage.
    pub probe_interval: Duration,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            transaction_timeout: DEFAULT_TRANSACTION_TIMEOUT,
            probe_interval: DEFAULT_PROBE_INTERVAL,
        }
    }
}

// -----------------------------------------------------------------------------
// ----- GatewayConfig: Static -------------------------------------------------

impl GatewayConfig {
    pub async fn from_file_async(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path)
            .await
            .map_err(|source| ConfigError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let file: GatewayFileConfig =
            toml::from_str(&raw).map_err(|source| ConfigError::Toml { source })?;

        let cfg = Self {
            transaction_timeout: file
                .transaction_timeout_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_TRANSACTION_TIMEOUT),
            probe_interval: file
                .probe_interval_ms
                .map(Duration::from_millis)
                .unwrap_or(DEFAULT_PROBE_INTERVAL),
        };

        cfg.validate()?;
        Ok(cfg)
    }
}

// -----------------------------------------------------------------------------
// ----- GatewayConfig: Public -------------------------------------------------

impl GatewayConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.transaction_timeout.is_zero() {
            return Err(ConfigError::InvalidField("transaction_timeout_ms".into()));
        }
        if self.probe_interval.is_zero() {
            return Err(ConfigError::InvalidField("probe_interval_ms".into()));
        }
        if self.transaction_timeout < TIMEOUT_WARN_FLOOR {
            warn!(
                "transaction timeout {:?} is below {:?}; expect spurious timeouts under load",
                self.transaction_timeout, TIMEOUT_WARN_FLOOR
            );
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// ----- Internal: On-disk shape -----------------------------------------------

#[derive(Debug, Deserialize)]
struct GatewayFileConfig {
    #[serde(default)]
    transaction_timeout_ms: Option<u64>,

    #[serde(default)]
    probe_interval_ms: Option<u64>,
}

// -----------------------------------------------------------------------------
// ----- Errors ----------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid or missing field '{0}'")]
    InvalidField(String),

    #[error("read error for {path:?}: {source}")]
    Io {
        path: std::path::PathBuf,
        source: std::io::Error,
    },

    #[error("toml parse error: {source}")]
    Toml { source: toml::de::Error },
}

// -----------------------------------------------------------------------------
// ----- Tests -----------------------------------------------------------------


// -----------------------------------------------------------------------------
// -----------------------------------------------------------------------------
