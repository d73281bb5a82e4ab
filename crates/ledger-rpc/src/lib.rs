//! Ledger RPC for the wallet adapter demo.
//!
//! The demo consumes three ledger calls: fetch the latest blockhash, submit a
//! signed wire transaction, and wait for a signature to reach a commitment
//! level. [`LedgerRpc`] is that seam; [`HttpRpcClient`] implements it over
//! Solana's JSON-RPC 2.0 HTTP API. The JSON-RPC envelope itself lives in
//! [`jsonrpc`] so other HTTP peers (the URL-based wallet) can reuse it.

pub mod client;
pub mod cluster;
pub mod error;
pub mod http;
pub mod jsonrpc;

pub use client::{Commitment, LedgerRpc, SendOptions};
pub use cluster::Cluster;
pub use error::{JsonRpcError, RpcError};
pub use http::{HttpRpcClient, RpcClientConfig, SignatureStatus};
pub use jsonrpc::JsonRpcClient;
