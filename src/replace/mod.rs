//! Pending-pool replacement
//!
//! Re-signs a sender's stuck pending transactions with the same nonce and a
//! higher gas price so the node evicts the originals.

pub mod engine;

pub use engine::{ReplaceRequest, ReplacementEngine};
