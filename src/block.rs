//! Block structure and deterministic hashing

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::transaction::Transaction;

/// Hash reported for the block preceding the first real block: the digest of
/// the absent sentinel, fixed at 64 zero characters.
pub const ABSENT_BLOCK_HASH: &str =
    "0000000000000000000000000000000000000000000000000000000000000000";

/// One immutable record in the chain.
///
/// Hashing covers the canonical JSON form of the whole block, so field
/// declaration order is part of the wire and hashing contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    pub index: u64,
    pub previous_hash: String,
    pub proof: u64,
    pub timestamp: String,
    pub transactions: Vec<Transaction>,
}

impl Block {
    /// The sentinel standing in for the block before the chain starts.
    ///
    /// Recognizable by its empty timestamp; its hash is [`ABSENT_BLOCK_HASH`].
    pub fn absent() -> Self {
        Self {
            index: 0,
            previous_hash: String::new(),
            proof: 0,
            timestamp: String::new(),
            transactions: Vec::new(),
        }
    }

    /// True when this value is the absent sentinel rather than a forged block.
    pub fn is_absent(&self) -> bool {
        self.timestamp.is_empty()
    }

    /// Hex-encoded SHA-256 digest of the block's canonical JSON serialization.
    ///
    /// The serialization follows field declaration order, never map iteration
    /// order, so a peer's reported hash and a local recomputation agree
    /// bit-for-bit. The absent sentinel hashes to 64 zero characters.
    pub fn hash(&self) -> String {
        if self.is_absent() {
            return ABSENT_BLOCK_HASH.to_string();
        }

        let encoded =
            serde_json::to_string(self).expect("a block always serializes to JSON");
        hex::encode(Sha256::digest(encoded.as_bytes()))
    }
}

/// Current UTC time in the node's wire format (`YYYY-MM-DD HH:MM:SS`).
pub fn utc_timestamp() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
