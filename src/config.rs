//! Configuration management for Forgechain

use serde::Deserialize;
use std::fs;

use crate::error::{ChainError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub consensus: ConsensusConfig,
}

#[derive(Debug, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Peer addresses registered at startup, e.g. "http://other-node:8888".
    #[serde(default)]
    pub bootstrap_peers: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ConsensusConfig {
    /// Upper bound on each peer chain fetch during a resolution pass.
    #[serde(default = "default_peer_timeout_secs")]
    pub peer_timeout_secs: u64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            api_port: default_api_port(),
            bootstrap_peers: Vec::new(),
        }
    }
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        Self {
            peer_timeout_secs: default_peer_timeout_secs(),
        }
    }
}

fn default_api_port() -> u16 {
    8888
}

fn default_peer_timeout_secs() -> u64 {
    5
}

/// Load `config.toml` from the working directory, falling back to defaults
/// when it is absent.
pub fn load_config() -> Result<Config> {
    let config_str = fs::read_to_string("config.toml").unwrap_or_default();

    let config: Config = if config_str.is_empty() {
        Config {
            network: NetworkConfig::default(),
            consensus: ConsensusConfig::default(),
        }
    } else {
        toml::from_str(&config_str).map_err(|e| ChainError::ConfigError(e.to_string()))?
    };

    // Validate critical values
    if config.consensus.peer_timeout_secs == 0 {
        return Err(ChainError::ConfigError(
            "consensus.peer_timeout_secs must be greater than zero".to_string(),
        ));
    }

    Ok(config)
}
