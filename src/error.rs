//! Error types for Forgechain

use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum ChainError {
    #[error("Invalid transaction: {0}")]
    InvalidTransaction(String),

    #[error("Invalid peer address '{address}': {reason}")]
    InvalidPeerAddress { address: String, reason: String },

    #[error("Peer {0} unreachable: {1}")]
    PeerUnreachable(String, String),

    #[error("Peer {0} returned a malformed chain: {1}")]
    MalformedChain(String, String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Convenience alias used across the crate
pub type Result<T> = std::result::Result<T, ChainError>;
