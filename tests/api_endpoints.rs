//! Integration tests for the Forgechain node endpoints
//!
//! Drives the full HTTP surface: mining, transaction submission, the chain
//! export, peer registration and consensus resolution.

use async_trait::async_trait;
use axum_test::TestServer;
use serde_json::{json, Value};
use std::sync::Arc;

use forgechain::api::{build_api_router, Node};
use forgechain::blockchain::{Blockchain, ChainSnapshot};
use forgechain::consensus::{is_valid_chain, ChainFetcher};
use forgechain::error::ChainError;

/// Serves a canned chain for one host and refuses everything else.
struct StubFetcher {
    host: String,
    snapshot: ChainSnapshot,
}

#[async_trait]
impl ChainFetcher for StubFetcher {
    async fn fetch_chain(&self, host: &str) -> Result<ChainSnapshot, ChainError> {
        if host == self.host {
            Ok(self.snapshot.clone())
        } else {
            Err(ChainError::PeerUnreachable(
                host.to_string(),
                "connection refused".to_string(),
            ))
        }
    }
}

/// A fetcher for tests that never reach the network.
struct NoFetcher;

#[async_trait]
impl ChainFetcher for NoFetcher {
    async fn fetch_chain(&self, host: &str) -> Result<ChainSnapshot, ChainError> {
        Err(ChainError::PeerUnreachable(
            host.to_string(),
            "no network in this test".to_string(),
        ))
    }
}

fn test_server(fetcher: Arc<dyn ChainFetcher>) -> TestServer {
    let blockchain = Blockchain::new("test-node".to_string());
    let node = Arc::new(Node::new(blockchain, fetcher));
    TestServer::new(build_api_router(node)).expect("failed to create test server")
}

#[tokio::test]
async fn test_mining_and_transaction_flow() {
    let server = test_server(Arc::new(NoFetcher));

    // Empty chain export
    let response = server.get("/chain").await;
    assert_eq!(response.status_code(), 200);
    let snapshot: ChainSnapshot = response.json();
    assert_eq!(snapshot.length, 0);

    // First mined block: index 0, linked to the all-zero sentinel hash,
    // carrying exactly the mining reward.
    let response = server.get("/mine").await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["index"], 0);
    assert_eq!(json["previous_hash"], "0".repeat(64));
    assert_eq!(json["transactions"].as_array().unwrap().len(), 1);
    assert_eq!(json["transactions"][0]["sender"], "0");
    assert_eq!(json["transactions"][0]["recipient"], "test-node");

    // A submission lands in the next block.
    let response = server
        .post("/transactions/new")
        .json(&json!({"amount": 5.0, "sender": "A", "recipient": "B"}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["block_index"], 1);

    // The second block links to the first and carries the submission plus a
    // fresh reward.
    let response = server.get("/mine").await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["index"], 1);
    assert_eq!(json["transactions"].as_array().unwrap().len(), 2);

    let response = server.get("/chain").await;
    let snapshot: ChainSnapshot = response.json();
    assert_eq!(snapshot.length, 2);
    assert!(is_valid_chain(&snapshot.chain));
    assert_eq!(snapshot.chain[1].previous_hash, snapshot.chain[0].hash());
}

#[tokio::test]
async fn test_invalid_transaction_rejected() {
    let server = test_server(Arc::new(NoFetcher));

    let response = server
        .post("/transactions/new")
        .json(&json!({"amount": 0.0, "sender": "A", "recipient": "B"}))
        .await;
    assert_eq!(response.status_code(), 400);
    let json: Value = response.json();
    assert!(json["error"].is_string());

    let response = server
        .post("/transactions/new")
        .json(&json!({"amount": 1.0, "sender": "", "recipient": "B"}))
        .await;
    assert_eq!(response.status_code(), 400);

    // A rejected transaction never reaches the pending pool.
    server.get("/mine").await;
    let response = server.get("/chain").await;
    let snapshot: ChainSnapshot = response.json();
    assert_eq!(snapshot.chain[0].transactions.len(), 1);
}

#[tokio::test]
async fn test_malformed_transaction_payload() {
    let server = test_server(Arc::new(NoFetcher));

    let response = server
        .post("/transactions/new")
        .json(&json!({"amount": 5.0}))
        .await;
    assert!(response.status_code().is_client_error());
}

#[tokio::test]
async fn test_register_nodes_deduplicates() {
    let server = test_server(Arc::new(NoFetcher));

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://a:1", "http://a:1", "http://b:2"]}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["total_nodes"], json!(["a:1", "b:2"]));
    assert_eq!(json["rejected"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_register_nodes_reports_bad_addresses() {
    let server = test_server(Arc::new(NoFetcher));

    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://a:1", "not a url"]}))
        .await;
    assert_eq!(response.status_code(), 201);
    let json: Value = response.json();
    assert_eq!(json["total_nodes"], json!(["a:1"]));
    assert_eq!(json["rejected"], json!(["not a url"]));

    // Empty list is a plain rejection.
    let response = server.post("/nodes/register").json(&json!({"nodes": []})).await;
    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn test_resolve_without_peers_is_authoritative() {
    let server = test_server(Arc::new(NoFetcher));
    server.get("/mine").await;

    let response = server.get("/nodes/resolve").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Our chain is authoritative");
    assert_eq!(json["length"], 1);
}

#[tokio::test]
async fn test_resolve_adopts_longer_peer_chain() {
    // Build a longer chain to hand out from the stubbed peer.
    let mut peer_ledger = Blockchain::new("peer-node".to_string());
    for _ in 0..3 {
        peer_ledger.mine();
    }
    let fetcher = Arc::new(StubFetcher {
        host: "a:1".to_string(),
        snapshot: peer_ledger.snapshot(),
    });

    let server = test_server(fetcher);
    server.get("/mine").await;

    // One reachable peer with a longer chain, one unreachable peer that must
    // be skipped.
    let response = server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://a:1", "http://unreachable:9"]}))
        .await;
    assert_eq!(response.status_code(), 201);

    let response = server.get("/nodes/resolve").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["message"], "Our chain has been replaced");
    assert_eq!(json["length"], 3);

    let response = server.get("/chain").await;
    let snapshot: ChainSnapshot = response.json();
    assert_eq!(snapshot.length, 3);
    assert!(is_valid_chain(&snapshot.chain));
}

#[tokio::test]
async fn test_health_reports_height_and_peers() {
    let server = test_server(Arc::new(NoFetcher));
    server.get("/mine").await;
    server
        .post("/nodes/register")
        .json(&json!({"nodes": ["http://a:1"]}))
        .await;

    let response = server.get("/health").await;
    assert_eq!(response.status_code(), 200);
    let json: Value = response.json();
    assert_eq!(json["status"], "healthy");
    assert_eq!(json["height"], 1);
    assert_eq!(json["peers"], 1);
    assert!(json["timestamp"].is_string());
}
