//! Orchestrator configuration with TOML file support.
//!
//! Credentials are never part of this file: the operator's default
//! credential is handed to [`pollgate_identity::IdentityResolver`] by the
//! embedding application.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use pollgate_identity::{IdentityPolicy, IdentityResolver};
use pollgate_types::{Credential, Usermail};
use pollgate_store_lmdb::{LmdbEnvironment, LmdbPollStore};

use crate::logging::LogFormat;
use crate::SetupError;

/// Configuration for a poll orchestrator.
///
/// Can be loaded from a TOML file via [`OrchestratorConfig::from_toml_file`]
/// or built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Deadline for every ledger call, in seconds. A timed-out call has an
    /// unknown outcome and is never retried.
    #[serde(default = "default_ledger_timeout_secs")]
    pub ledger_timeout_secs: u64,

    /// Maximum number of create/vote/close operations in flight at once.
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,

    /// Reject an expiry sweep while another one is still running.
    /// Disable only when the external scheduler guarantees single-flight.
    #[serde(default = "default_true")]
    pub sweep_single_flight: bool,

    /// Sign for actors without their own credential with the operator's
    /// default credential. When off, only the operator may omit a key.
    #[serde(default = "default_true")]
    pub allow_operator_fallback: bool,

    /// Directory of the LMDB poll index.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// LMDB map size in bytes.
    #[serde(default = "default_lmdb_map_size")]
    pub lmdb_map_size: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_ledger_timeout_secs() -> u64 {
    60
}

fn default_max_in_flight() -> usize {
    64
}

fn default_true() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./pollgate_data")
}

fn default_lmdb_map_size() -> usize {
    64 * 1024 * 1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl OrchestratorConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: &str) -> Result<Self, SetupError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| SetupError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, SetupError> {
        let config: Self = toml::from_str(s).map_err(|e| SetupError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, SetupError> {
        toml::to_string_pretty(self).map_err(|e| SetupError::Config(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), SetupError> {
        if self.ledger_timeout_secs == 0 {
            return Err(SetupError::Config("ledger_timeout_secs must be positive".into()));
        }
        if self.max_in_flight == 0 {
            return Err(SetupError::Config("max_in_flight must be positive".into()));
        }
        self.log_format()?;
        Ok(())
    }

    pub fn ledger_timeout(&self) -> Duration {
        Duration::from_secs(self.ledger_timeout_secs)
    }

    pub fn identity_policy(&self) -> IdentityPolicy {
        if self.allow_operator_fallback {
            IdentityPolicy::OperatorFallback
        } else {
            IdentityPolicy::RequireOwnCredential
        }
    }

    /// Build the resolver for `operator`, who signs with `default_credential`.
    pub fn identity_resolver(
        &self,
        operator: Usermail,
        default_credential: Credential,
    ) -> IdentityResolver {
        IdentityResolver::new(operator, default_credential, self.identity_policy())
    }

    pub fn log_format(&self) -> Result<LogFormat, SetupError> {
        self.log_format.parse()
    }

    /// Open (or create) the LMDB poll index under `data_dir`.
    pub fn open_poll_index(&self) -> Result<LmdbPollStore, SetupError> {
        let env = LmdbEnvironment::open(&self.data_dir, self.lmdb_map_size)?;
        Ok(env.poll_store())
    }
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            ledger_timeout_secs: default_ledger_timeout_secs(),
            max_in_flight: default_max_in_flight(),
            sweep_single_flight: default_true(),
            allow_operator_fallback: default_true(),
            data_dir: default_data_dir(),
            lmdb_map_size: default_lmdb_map_size(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}
