use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sol_tx::{Hash, Signature};

use crate::error::RpcError;

/// How settled a transaction must be before a call treats it as done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    Confirmed,
    Finalized,
}

/// Options for `sendTransaction`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendOptions {
    pub skip_preflight: bool,
    pub preflight_commitment: Commitment,
}

impl Default for SendOptions {
    fn default() -> Self {
        Self {
            skip_preflight: false,
            preflight_commitment: Commitment::Finalized,
        }
    }
}

/// The ledger calls a submission flow needs.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Fetch a blockhash recent enough to anchor a new transaction.
    async fn get_recent_blockhash(&self) -> Result<Hash, RpcError>;

    /// Submit a fully signed wire transaction and return its signature.
    async fn send_raw_transaction(
        &self,
        wire: &[u8],
        options: &SendOptions,
    ) -> Result<Signature, RpcError>;

    /// Resolve once `signature` reaches `commitment`.
    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> Result<(), RpcError>;
}
