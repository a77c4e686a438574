//! Transaction type and structural validation

use serde::{Deserialize, Serialize};

use crate::block::utc_timestamp;

/// The account that mining rewards are drawn from.
pub const REWARD_SENDER: &str = "0";

/// The fixed reward paid to a node for forging a block.
pub const REWARD_AMOUNT: f64 = 1.0;

/// A value transfer waiting in the pending pool or embedded in a block.
///
/// Field order is part of the hashing contract: blocks are hashed over their
/// canonical JSON serialization, so the declaration order here must not change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub amount: f64,
    pub recipient: String,
    pub sender: String,
    #[serde(default)]
    pub timestamp: String,
}

impl Transaction {
    /// Create a transaction stamped with the current UTC time.
    pub fn new(amount: f64, recipient: String, sender: String) -> Self {
        Self {
            amount,
            recipient,
            sender,
            timestamp: utc_timestamp(),
        }
    }

    /// The reward transaction credited to `node_id` when it forges a block.
    pub fn reward(node_id: &str) -> Self {
        Self::new(REWARD_AMOUNT, node_id.to_string(), REWARD_SENDER.to_string())
    }

    /// Structural acceptance check: a non-zero amount and non-empty endpoints.
    pub fn is_valid(&self) -> bool {
        self.amount != 0.0 && !self.sender.is_empty() && !self.recipient.is_empty()
    }
}
