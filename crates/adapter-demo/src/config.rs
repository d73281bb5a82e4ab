//! Demo configuration: defaults, then environment, then CLI flags.

use std::env;
use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::time::Duration;

use ledger_rpc::{Cluster, RpcClientConfig};
use thiserror::Error;

pub const DEFAULT_PROVIDER_URL: &str = "https://www.sollet.io";

const CONFIRM_TIMEOUT_SECS: RangeInclusive<u64> = 1..=86_400;
const POLL_INTERVAL_MS: RangeInclusive<u64> = 10..=60_000;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: unknown cluster {value:?}")]
    UnknownCluster { var: &'static str, value: String },

    #[error("{var}: expected a whole number, got {value:?}")]
    InvalidNumber { var: &'static str, value: String },

    #[error("{var}: {value} is outside {min}..={max}")]
    OutOfRange {
        var: &'static str,
        value: u64,
        min: u64,
        max: u64,
    },

    #[error("{var} must not be empty")]
    Empty { var: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DemoConfig {
    pub cluster: Cluster,
    /// Replaces the cluster's public endpoint when set.
    pub rpc_url: Option<String>,
    pub provider_url: String,
    /// Solana CLI keypair file handed to the app as the injected wallet.
    pub keypair: Option<PathBuf>,
    pub rpc: RpcClientConfig,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            cluster: Cluster::default(),
            rpc_url: None,
            provider_url: DEFAULT_PROVIDER_URL.to_string(),
            keypair: None,
            rpc: RpcClientConfig::default(),
        }
    }
}

impl DemoConfig {
    /// Load configuration from environment variables.
    ///
    /// - `DEMO_CLUSTER`: `mainnet-beta` (default), `devnet` or `testnet`
    /// - `DEMO_RPC_URL`: explicit RPC endpoint
    /// - `DEMO_PROVIDER_URL`: URL-based wallet provider
    /// - `DEMO_KEYPAIR`: keypair file for the injected wallet
    /// - `DEMO_CONFIRM_TIMEOUT_SECS`, `DEMO_POLL_INTERVAL_MS`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(value) = lookup("DEMO_CLUSTER") {
            config.cluster = parse_cluster("DEMO_CLUSTER", &value)?;
        }
        if let Some(value) = lookup("DEMO_RPC_URL") {
            config.rpc_url = Some(non_empty("DEMO_RPC_URL", &value)?);
        }
        if let Some(value) = lookup("DEMO_PROVIDER_URL") {
            config.provider_url = non_empty("DEMO_PROVIDER_URL", &value)?;
        }
        if let Some(value) = lookup("DEMO_KEYPAIR") {
            config.keypair = Some(PathBuf::from(non_empty("DEMO_KEYPAIR", &value)?));
        }
        if let Some(value) = lookup("DEMO_CONFIRM_TIMEOUT_SECS") {
            let secs = parse_bounded("DEMO_CONFIRM_TIMEOUT_SECS", &value, CONFIRM_TIMEOUT_SECS)?;
            config.rpc.confirm_timeout = Duration::from_secs(secs);
        }
        if let Some(value) = lookup("DEMO_POLL_INTERVAL_MS") {
            let millis = parse_bounded("DEMO_POLL_INTERVAL_MS", &value, POLL_INTERVAL_MS)?;
            config.rpc.poll_interval = Duration::from_millis(millis);
        }

        Ok(config)
    }

    pub fn with_cluster(mut self, name: &str) -> Result<Self, ConfigError> {
        self.cluster = parse_cluster("--cluster", name)?;
        Ok(self)
    }

    /// The endpoint the app talks to: the explicit URL if any, else the
    /// cluster's public API.
    pub fn rpc_url(&self) -> String {
        self.rpc_url
            .clone()
            .unwrap_or_else(|| self.cluster.api_url().to_string())
    }
}

fn parse_cluster(var: &'static str, value: &str) -> Result<Cluster, ConfigError> {
    value.parse().map_err(|_| ConfigError::UnknownCluster {
        var,
        value: value.to_string(),
    })
}

fn parse_bounded(
    var: &'static str,
    value: &str,
    range: RangeInclusive<u64>,
) -> Result<u64, ConfigError> {
    let number: u64 = value.trim().parse().map_err(|_| ConfigError::InvalidNumber {
        var,
        value: value.to_string(),
    })?;
    if !range.contains(&number) {
        return Err(ConfigError::OutOfRange {
            var,
            value: number,
            min: *range.start(),
            max: *range.end(),
        });
    }
    Ok(number)
}

fn non_empty(var: &'static str, value: &str) -> Result<String, ConfigError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(ConfigError::Empty { var });
    }
    Ok(value.to_string())
}
