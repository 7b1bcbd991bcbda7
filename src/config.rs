//! Configuration management for Shuttergate.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

use crate::error::{Result, ShuttergateError};
use crate::ratelimit::RateLimitPolicy;

/// Main configuration for the Shuttergate service.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShuttergateConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Rate limiting configuration
    #[serde(default)]
    pub rate_limiting: RateLimitingConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

fn default_listen_addr() -> SocketAddr {
    "127.0.0.1:8080".parse().unwrap()
}

/// Rate limiting configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitingConfig {
    /// Maximum requests allowed per client within one window
    #[serde(default = "default_limit")]
    pub limit: u32,

    /// Window duration in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Path prefixes subject to throttling
    #[serde(default = "default_protected_paths")]
    pub protected_paths: Vec<String>,

    /// Interval between sweeps of expired counters, in seconds
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitingConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_secs: default_window_secs(),
            protected_paths: default_protected_paths(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_limit() -> u32 {
    10
}

fn default_window_secs() -> u64 {
    60
}

fn default_protected_paths() -> Vec<String> {
    vec!["/image/".to_string()]
}

fn default_sweep_interval_secs() -> u64 {
    60
}

impl RateLimitingConfig {
    /// Build the throttling policy, validating the configured values.
    pub fn policy(&self) -> Result<RateLimitPolicy> {
        if self.limit == 0 {
            return Err(ShuttergateError::Config(
                "rate_limiting.limit must be greater than zero".to_string(),
            ));
        }
        if self.window_secs == 0 {
            return Err(ShuttergateError::Config(
                "rate_limiting.window_secs must be greater than zero".to_string(),
            ));
        }

        Ok(RateLimitPolicy::new(
            self.limit,
            Duration::from_secs(self.window_secs),
            self.protected_paths.clone(),
        ))
    }

    /// Interval at which expired counters are swept out of the store.
    pub fn sweep_interval(&self) -> Result<Duration> {
        if self.sweep_interval_secs == 0 {
            return Err(ShuttergateError::Config(
                "rate_limiting.sweep_interval_secs must be greater than zero".to_string(),
            ));
        }
        Ok(Duration::from_secs(self.sweep_interval_secs))
    }
}

impl ShuttergateConfig {
    /// Load configuration from a file path.
    pub fn from_file(path: &str) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: ShuttergateConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ShuttergateError::Config(e.to_string()))?;
        Ok(config)
    }
}
