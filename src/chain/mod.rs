//! Chain module - node RPC access
//!
//! This module provides:
//! - A single-endpoint JSON-RPC client with a pluggable transport
//! - Typed `txpool_content` snapshots with on-demand field decoding

pub mod provider;
pub mod txpool;

pub use provider::RpcClient;
pub use txpool::RawPoolTransaction;
