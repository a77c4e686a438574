//! The ledger: block sequence, pending pool and mining

use serde::{Deserialize, Serialize};

use crate::block::{utc_timestamp, Block};
use crate::pow;
use crate::transaction::Transaction;

/// Read-only export of the full chain, also the payload exchanged with peers
/// during consensus resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainSnapshot {
    pub chain: Vec<Block>,
    pub length: usize,
}

/// The authoritative chain plus the pool of transactions awaiting a block.
///
/// All mutating operations take `&mut self`; callers that share a ledger
/// across request handlers serialize them behind a single exclusive lock so
/// that [`Blockchain::mine`]'s read-tail / solve / append sequence can never
/// interleave with a concurrent submission.
pub struct Blockchain {
    blocks: Vec<Block>,
    pending: Vec<Transaction>,
    node_id: String,
}

impl Blockchain {
    /// Create an empty ledger owned by the node identified by `node_id`.
    pub fn new(node_id: String) -> Self {
        Self {
            blocks: Vec::new(),
            pending: Vec::new(),
            node_id,
        }
    }

    /// This node's opaque self-identifier (the mining reward recipient).
    pub fn node_id(&self) -> &str {
        &self.node_id
    }

    /// Number of blocks in the chain.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// All blocks in the chain.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Transactions accepted but not yet embedded in a block.
    pub fn pending(&self) -> &[Transaction] {
        &self.pending
    }

    /// The tail block, or the absent sentinel when the chain is empty.
    pub fn last_block(&self) -> Block {
        self.blocks.last().cloned().unwrap_or_else(Block::absent)
    }

    /// Queue `transaction` for the next mined block and return the index of
    /// the block that will eventually contain it.
    ///
    /// Validation is the caller's responsibility; the pool accepts whatever
    /// it is handed.
    pub fn submit_transaction(&mut self, transaction: Transaction) -> u64 {
        self.pending.push(transaction);

        let last = self.last_block();
        if last.is_absent() {
            0
        } else {
            last.index + 1
        }
    }

    /// Forge the next block: solve the puzzle posed by the tail, credit the
    /// mining reward, and move the whole pending pool into a new block.
    ///
    /// One compound read-modify-write over `blocks` and `pending`; hold the
    /// ledger's exclusive lock for its entire duration.
    pub fn mine(&mut self) -> Block {
        let last = self.last_block();
        let last_hash = last.hash();
        let proof = pow::solve(last.proof);

        let reward = Transaction::reward(&self.node_id);
        let index = self.submit_transaction(reward);

        let block = Block {
            index,
            previous_hash: last_hash,
            proof,
            timestamp: utc_timestamp(),
            transactions: std::mem::take(&mut self.pending),
        };
        self.blocks.push(block.clone());
        block
    }

    /// Wholesale replacement of the chain.
    ///
    /// Only the consensus resolver calls this, and only with a chain that
    /// already passed validation.
    pub fn replace_chain(&mut self, chain: Vec<Block>) {
        self.blocks = chain;
    }

    /// Export the chain and its length for the wire.
    pub fn snapshot(&self) -> ChainSnapshot {
        ChainSnapshot {
            chain: self.blocks.clone(),
            length: self.blocks.len(),
        }
    }
}
