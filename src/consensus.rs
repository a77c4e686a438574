//! Chain validation and longest-chain conflict resolution
//!
//! A node resolves disagreements by asking every known peer for its chain and
//! adopting the longest one that validates end to end, provided it is strictly
//! longer than the local chain. Peers that cannot be reached or answer with
//! garbage are skipped rather than failing the whole pass.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::block::Block;
use crate::blockchain::{Blockchain, ChainSnapshot};
use crate::error::ChainError;
use crate::pow;

/// Verify hash-linkage and proof-of-work continuity across a candidate chain.
///
/// Walks each adjacent pair: the later block must record the hash of the
/// earlier one, and its proof must solve the puzzle posed by the earlier
/// proof. Chains of length 0 or 1 have no pairs and are trivially valid.
pub fn is_valid_chain(chain: &[Block]) -> bool {
    for window in chain.windows(2) {
        let previous = &window[0];
        let current = &window[1];

        if current.previous_hash != previous.hash() {
            return false;
        }
        if !pow::valid_proof(previous.proof, current.proof) {
            return false;
        }
    }
    true
}

/// The capability to fetch a peer's chain, kept behind a trait so the
/// resolver can be exercised without a network.
#[async_trait]
pub trait ChainFetcher: Send + Sync {
    async fn fetch_chain(&self, host: &str) -> Result<ChainSnapshot, ChainError>;
}

/// Fetches `http://{host}/chain` with a bounded per-request timeout so one
/// unresponsive peer cannot stall a resolution pass.
pub struct HttpChainFetcher {
    client: Client,
}

impl HttpChainFetcher {
    pub fn new(timeout: Duration) -> Result<Self, ChainError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ChainError::NetworkError(e.to_string()))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChainFetcher for HttpChainFetcher {
    async fn fetch_chain(&self, host: &str) -> Result<ChainSnapshot, ChainError> {
        let url = format!("http://{}/chain", host);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ChainError::PeerUnreachable(host.to_string(), e.to_string()))?;

        if !response.status().is_success() {
            return Err(ChainError::PeerUnreachable(
                host.to_string(),
                format!("status {}", response.status()),
            ));
        }

        response
            .json::<ChainSnapshot>()
            .await
            .map_err(|e| ChainError::MalformedChain(host.to_string(), e.to_string()))
    }
}

/// Query every host for its chain and adopt the longest valid one that beats
/// the local length. Returns true when the local chain was replaced.
///
/// The ledger lock is not held while fetching; only the final replacement
/// takes the write guard, where strict improvement is re-checked in case a
/// concurrent mine grew the local chain in the meantime. Ties favour the
/// local chain, and among equally long peer chains the first one in `hosts`
/// order wins.
pub async fn resolve_conflicts(
    ledger: &RwLock<Blockchain>,
    hosts: &[String],
    fetcher: &dyn ChainFetcher,
) -> bool {
    let mut best_len = ledger.read().await.len();
    let mut best_chain: Option<Vec<Block>> = None;

    for host in hosts {
        let snapshot = match fetcher.fetch_chain(host).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(peer = %host, error = %e, "skipping peer during consensus");
                continue;
            }
        };

        if snapshot.length > best_len && is_valid_chain(&snapshot.chain) {
            best_len = snapshot.length;
            best_chain = Some(snapshot.chain);
        }
    }

    if let Some(chain) = best_chain {
        let mut guard = ledger.write().await;
        if best_len > guard.len() {
            info!(
                old_length = guard.len(),
                new_length = best_len,
                "adopting longer chain from peers"
            );
            guard.replace_chain(chain);
            return true;
        }
    }

    false
}
