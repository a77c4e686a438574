//! HTTP surface for a Forgechain node
//!
//! Exposes mining, transaction submission, the chain export consumed by
//! peers, peer registration and consensus resolution as JSON endpoints.

use axum::{
    extract::{Request, State},
    http::{self, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::block::Block;
use crate::blockchain::{Blockchain, ChainSnapshot};
use crate::consensus::{self, ChainFetcher};
use crate::error::ChainError;
use crate::peers::PeerRegistry;
use crate::transaction::Transaction;

/// Shared node state handed to every request handler.
///
/// The ledger and the registry are the only shared mutable resources; both
/// sit behind their own lock, and every ledger mutation runs entirely under
/// the write guard.
#[derive(Clone)]
pub struct Node {
    pub blockchain: Arc<RwLock<Blockchain>>,
    pub peers: Arc<RwLock<PeerRegistry>>,
    fetcher: Arc<dyn ChainFetcher>,
}

impl Node {
    /// Create a node around a fresh ledger and the given chain fetcher.
    pub fn new(blockchain: Blockchain, fetcher: Arc<dyn ChainFetcher>) -> Self {
        Self {
            blockchain: Arc::new(RwLock::new(blockchain)),
            peers: Arc::new(RwLock::new(PeerRegistry::new())),
            fetcher,
        }
    }
}

// ============================================================================
// API Error Handling
// ============================================================================

#[derive(Debug)]
pub enum ApiError {
    ChainError(ChainError),
    InvalidInput(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::ChainError(e) => (StatusCode::BAD_REQUEST, e.to_string()),
            ApiError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

impl From<ChainError> for ApiError {
    fn from(err: ChainError) -> Self {
        ApiError::ChainError(err)
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct NewTransactionRequest {
    pub amount: f64,
    pub recipient: String,
    pub sender: String,
}

#[derive(Serialize)]
pub struct NewTransactionResponse {
    pub message: String,
    pub block_index: u64,
}

#[derive(Serialize)]
pub struct MineResponse {
    pub message: String,
    pub index: u64,
    pub previous_hash: String,
    pub proof: u64,
    pub transactions: Vec<Transaction>,
}

#[derive(Deserialize)]
pub struct RegisterNodesRequest {
    pub nodes: Vec<String>,
}

#[derive(Serialize)]
pub struct RegisterNodesResponse {
    pub message: String,
    pub total_nodes: Vec<String>,
    pub rejected: Vec<String>,
}

#[derive(Serialize)]
pub struct ResolveResponse {
    pub message: String,
    pub chain: Vec<Block>,
    pub length: usize,
}

// ============================================================================
// Middleware
// ============================================================================

/// Request logging middleware. Logs method, path, status and duration.
async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;

    tracing::info!(
        method = %method,
        path = %path,
        status = %response.status().as_u16(),
        duration_ms = %start.elapsed().as_millis(),
        "api.request"
    );

    response
}

// ============================================================================
// API Server
// ============================================================================

/// Build the API router with all endpoints (for testing)
pub fn build_api_router(node: Arc<Node>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(vec![
            http::Method::GET,
            http::Method::POST,
            http::Method::OPTIONS,
        ])
        .allow_headers(vec![http::header::CONTENT_TYPE])
        .allow_credentials(true);

    Router::new()
        .route("/mine", get(mine))
        .route("/transactions/new", post(new_transaction))
        .route("/chain", get(get_chain))
        .route("/nodes/register", post(register_nodes))
        .route("/nodes/resolve", get(resolve_consensus))
        .route("/health", get(health_check))
        .layer(middleware::from_fn(logging_middleware))
        .with_state(node)
        .layer(cors)
}

/// Run the API server on the given port until shutdown.
pub async fn run_api_server(node: Arc<Node>, port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let app = build_api_router(node);
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "node API listening");

    axum::serve(listener, app).await?;

    Ok(())
}

// ============================================================================
// Route Handlers
// ============================================================================

async fn health_check(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let height = node.blockchain.read().await.len();
    let peers = node.peers.read().await.len();

    Json(serde_json::json!({
        "status": "healthy",
        "height": height,
        "peers": peers,
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

async fn mine(State(node): State<Arc<Node>>) -> impl IntoResponse {
    let block = node.blockchain.write().await.mine();

    (
        StatusCode::CREATED,
        Json(MineResponse {
            message: "New block forged".to_string(),
            index: block.index,
            previous_hash: block.previous_hash,
            proof: block.proof,
            transactions: block.transactions,
        }),
    )
}

async fn new_transaction(
    State(node): State<Arc<Node>>,
    Json(req): Json<NewTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let transaction = Transaction::new(req.amount, req.recipient, req.sender);

    if !transaction.is_valid() {
        return Err(ApiError::ChainError(ChainError::InvalidTransaction(
            "amount must be non-zero and sender and recipient non-empty".to_string(),
        )));
    }

    let block_index = node.blockchain.write().await.submit_transaction(transaction);

    Ok((
        StatusCode::CREATED,
        Json(NewTransactionResponse {
            message: format!("Transaction will be added in block {}", block_index),
            block_index,
        }),
    ))
}

async fn get_chain(State(node): State<Arc<Node>>) -> Json<ChainSnapshot> {
    Json(node.blockchain.read().await.snapshot())
}

async fn register_nodes(
    State(node): State<Arc<Node>>,
    Json(req): Json<RegisterNodesRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if req.nodes.is_empty() {
        return Err(ApiError::InvalidInput(
            "please supply a non-empty list of node addresses".to_string(),
        ));
    }

    let mut registry = node.peers.write().await;
    let mut rejected = Vec::new();

    // One bad address never poisons the rest of the batch.
    for address in &req.nodes {
        if let Err(e) = registry.register(address) {
            tracing::warn!(%address, error = %e, "rejected peer address");
            rejected.push(address.clone());
        }
    }

    Ok((
        StatusCode::CREATED,
        Json(RegisterNodesResponse {
            message: "Peer registration processed".to_string(),
            total_nodes: registry.unique(),
            rejected,
        }),
    ))
}

async fn resolve_consensus(State(node): State<Arc<Node>>) -> Json<ResolveResponse> {
    let hosts = node.peers.read().await.unique();
    let replaced =
        consensus::resolve_conflicts(&node.blockchain, &hosts, node.fetcher.as_ref()).await;

    let message = if replaced {
        "Our chain has been replaced"
    } else {
        "Our chain is authoritative"
    };

    let snapshot = node.blockchain.read().await.snapshot();
    Json(ResolveResponse {
        message: message.to_string(),
        chain: snapshot.chain,
        length: snapshot.length,
    })
}
