//! Forgechain - a minimal proof-of-work ledger node
//!
//! # Architecture
//!
//! The crate is organized into logical modules:
//!
//! ## Core Ledger
//! - [`blockchain`] - Block sequence, pending pool and mining
//! - [`block`] - Block structure and hashing
//! - [`transaction`] - Transaction type and validation
//!
//! ## Consensus
//! - [`pow`] - Proof-of-work puzzle
//! - [`consensus`] - Chain validation and longest-chain resolution
//!
//! ## Networking
//! - [`peers`] - Peer host registry
//! - [`api`] - HTTP node surface
//!
//! ## Configuration & Utilities
//! - [`config`] - Configuration management
//! - [`error`] - Error types

#![forbid(unsafe_code)]

// ============================================================================
// Core Ledger
// ============================================================================
pub mod block;
pub mod blockchain;
pub mod transaction;

// ============================================================================
// Consensus & Mining
// ============================================================================
pub mod consensus;
pub mod pow;

// ============================================================================
// Networking
// ============================================================================
pub mod api;
pub mod peers;

// ============================================================================
// Configuration & Utilities
// ============================================================================
pub mod config;
pub mod error;
