#![forbid(unsafe_code)]
//! Forgechain node entry point

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};
use uuid::Uuid;

use forgechain::api::{run_api_server, Node};
use forgechain::blockchain::Blockchain;
use forgechain::config::load_config;
use forgechain::consensus::HttpChainFetcher;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let config = load_config()?;

    // Opaque self-identifier; also the recipient of this node's mining rewards.
    let node_id = Uuid::new_v4().simple().to_string();
    info!(%node_id, "starting forgechain node");

    let blockchain = Blockchain::new(node_id);
    let fetcher = Arc::new(HttpChainFetcher::new(Duration::from_secs(
        config.consensus.peer_timeout_secs,
    ))?);

    let node = Arc::new(Node::new(blockchain, fetcher));

    {
        let mut registry = node.peers.write().await;
        for address in &config.network.bootstrap_peers {
            if let Err(e) = registry.register(address) {
                warn!(%address, error = %e, "skipping bootstrap peer");
            }
        }
        if !registry.is_empty() {
            info!(peers = registry.len(), "registered bootstrap peers");
        }
    }

    run_api_server(node, config.network.api_port).await
}
