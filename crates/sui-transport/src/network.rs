//! Endpoints and client configuration.

use std::str::FromStr;
use std::time::Duration;

use sui_tx_types::RetryConfig;

const MAINNET_RPC: &str = "https://fullnode.mainnet.sui.io:443";
const TESTNET_RPC: &str = "https://fullnode.testnet.sui.io:443";
const DEVNET_RPC: &str = "https://fullnode.devnet.sui.io:443";
const LOCALNET_RPC: &str = "http://127.0.0.1:9000";

/// Default request timeout in seconds (can be overridden by env).
const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Default connect timeout in seconds (can be overridden by env).
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

pub fn infer_network_from_url(url: &str) -> Option<&'static str> {
    let lower = url.to_lowercase();
    if lower.contains("testnet") {
        Some("testnet")
    } else if lower.contains("devnet") {
        Some("devnet")
    } else if lower.contains("mainnet") {
        Some("mainnet")
    } else if lower.contains("127.0.0.1") || lower.contains("localhost") {
        Some("localnet")
    } else {
        None
    }
}

pub fn default_rpc_endpoint(network: &str) -> &'static str {
    match network {
        "testnet" => TESTNET_RPC,
        "devnet" => DEVNET_RPC,
        "localnet" => LOCALNET_RPC,
        _ => MAINNET_RPC,
    }
}

fn env_var<T: FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

/// Connection settings for [`JsonRpcClient`](crate::JsonRpcClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub retry: RetryConfig,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }

    pub fn mainnet() -> Self {
        Self::new(MAINNET_RPC)
    }

    pub fn testnet() -> Self {
        Self::new(TESTNET_RPC)
    }

    pub fn devnet() -> Self {
        Self::new(DEVNET_RPC)
    }

    pub fn localnet() -> Self {
        Self::new(LOCALNET_RPC)
    }

    /// Configuration from the environment, falling back to mainnet defaults.
    ///
    /// - `SUI_RPC_URL` - fullnode JSON-RPC endpoint
    /// - `SUI_RPC_TIMEOUT_SECS` - request timeout
    /// - `SUI_RPC_CONNECT_TIMEOUT_SECS` - connect timeout
    /// - `SUI_RPC_RETRIES` - retry attempts for transient failures
    pub fn from_env() -> Self {
        let endpoint = std::env::var("SUI_RPC_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| MAINNET_RPC.to_string());
        let mut config = Self::new(endpoint);
        if let Some(secs) = env_var::<u64>("SUI_RPC_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_var::<u64>("SUI_RPC_CONNECT_TIMEOUT_SECS") {
            config.connect_timeout = Duration::from_secs(secs);
        }
        if let Some(retries) = env_var::<usize>("SUI_RPC_RETRIES") {
            config.retry.retries = retries;
        }
        config
    }

    pub fn with_timeouts(mut self, timeout: Duration, connect_timeout: Duration) -> Self {
        self.timeout = timeout;
        self.connect_timeout = connect_timeout;
        self
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn network(&self) -> Option<&'static str> {
        infer_network_from_url(&self.endpoint)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::mainnet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_network() {
        assert_eq!(infer_network_from_url(TESTNET_RPC), Some("testnet"));
        assert_eq!(infer_network_from_url(LOCALNET_RPC), Some("localnet"));
        assert_eq!(infer_network_from_url("https://rpc.example.com"), None);
    }

    #[test]
    fn test_default_endpoints() {
        assert_eq!(default_rpc_endpoint("devnet"), DEVNET_RPC);
        assert_eq!(default_rpc_endpoint("unknown"), MAINNET_RPC);
        assert_eq!(ClientConfig::testnet().network(), Some("testnet"));
    }

    #[test]
    fn test_builder_overrides() {
        let config = ClientConfig::localnet()
            .with_timeouts(Duration::from_secs(5), Duration::from_secs(1))
            .with_retry(RetryConfig::none());
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.retry.retries, 0);
    }
}
