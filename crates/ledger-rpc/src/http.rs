//! [`LedgerRpc`] over Solana's JSON-RPC HTTP API.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use serde::Deserialize;
use serde_json::{json, Value};
use sol_tx::{Hash, Signature};
use tokio::time::Instant;

use crate::client::{Commitment, LedgerRpc, SendOptions};
use crate::error::RpcError;
use crate::jsonrpc::JsonRpcClient;

/// Timeouts for [`HttpRpcClient`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RpcClientConfig {
    /// Per-request HTTP timeout.
    pub request_timeout: Duration,
    /// How long `confirm_transaction` polls before giving up.
    pub confirm_timeout: Duration,
    /// Delay between `getSignatureStatuses` polls.
    pub poll_interval: Duration,
}

impl Default for RpcClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            confirm_timeout: Duration::from_secs(60),
            poll_interval: Duration::from_millis(500),
        }
    }
}

/// One entry of a `getSignatureStatuses` reply.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureStatus {
    pub slot: u64,
    /// `None` once the block is rooted.
    pub confirmations: Option<u64>,
    #[serde(default)]
    pub err: Option<Value>,
    #[serde(default)]
    pub confirmation_status: Option<Commitment>,
}

impl SignatureStatus {
    /// Whether this status satisfies `commitment`; a recorded transaction
    /// error is surfaced as [`RpcError::TransactionFailed`].
    pub fn reached(&self, signature: &Signature, commitment: Commitment) -> Result<bool, RpcError> {
        if let Some(err) = self.err.as_ref().filter(|e| !e.is_null()) {
            return Err(RpcError::TransactionFailed {
                signature: signature.to_string(),
                reason: err.to_string(),
            });
        }

        Ok(match self.confirmation_status {
            Some(status) => status >= commitment,
            None => self.confirmations.is_none(),
        })
    }
}

#[derive(Deserialize)]
struct ContextWrapped<T> {
    value: T,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LatestBlockhash {
    blockhash: String,
}

/// HTTP JSON-RPC ledger client.
#[derive(Debug)]
pub struct HttpRpcClient {
    rpc: JsonRpcClient,
    config: RpcClientConfig,
}

impl HttpRpcClient {
    pub fn new(url: &str) -> Result<Self, RpcError> {
        Self::with_config(url, RpcClientConfig::default())
    }

    pub fn with_config(url: &str, config: RpcClientConfig) -> Result<Self, RpcError> {
        let rpc = JsonRpcClient::new(url, config.request_timeout)?;
        log::info!("ledger rpc endpoint {}", rpc.url());
        Ok(Self { rpc, config })
    }

    pub fn url(&self) -> &str {
        self.rpc.url().as_str()
    }

    pub fn config(&self) -> &RpcClientConfig {
        &self.config
    }

    async fn signature_status(
        &self,
        signature: &Signature,
    ) -> Result<Option<SignatureStatus>, RpcError> {
        let reply: ContextWrapped<Vec<Option<SignatureStatus>>> = self
            .rpc
            .call("getSignatureStatuses", json!([[signature.to_string()]]))
            .await?;
        Ok(reply.value.into_iter().next().flatten())
    }
}

#[async_trait]
impl LedgerRpc for HttpRpcClient {
    async fn get_recent_blockhash(&self) -> Result<Hash, RpcError> {
        let reply: ContextWrapped<LatestBlockhash> = self
            .rpc
            .call(
                "getLatestBlockhash",
                json!([{ "commitment": Commitment::Finalized }]),
            )
            .await?;

        reply
            .value
            .blockhash
            .parse()
            .map_err(|e: sol_tx::SolError| RpcError::InvalidResponse(e.to_string()))
    }

    async fn send_raw_transaction(
        &self,
        wire: &[u8],
        options: &SendOptions,
    ) -> Result<Signature, RpcError> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(wire);
        let signature: String = self
            .rpc
            .call(
                "sendTransaction",
                json!([
                    encoded,
                    {
                        "encoding": "base64",
                        "skipPreflight": options.skip_preflight,
                        "preflightCommitment": options.preflight_commitment,
                    }
                ]),
            )
            .await?;

        signature
            .parse()
            .map_err(|e: sol_tx::SolError| RpcError::InvalidResponse(e.to_string()))
    }

    async fn confirm_transaction(
        &self,
        signature: &Signature,
        commitment: Commitment,
    ) -> Result<(), RpcError> {
        // `None` when the timeout is past what the clock can represent.
        let deadline = Instant::now().checked_add(self.config.confirm_timeout);

        loop {
            if let Some(status) = self.signature_status(signature).await? {
                log::debug!("status of {}: {:?}", signature, status.confirmation_status);
                if status.reached(signature, commitment)? {
                    return Ok(());
                }
            }

            let next_poll = Instant::now().checked_add(self.config.poll_interval);
            let expired = match (deadline, next_poll) {
                (None, _) => false,
                (Some(deadline), Some(next_poll)) => next_poll > deadline,
                (Some(_), None) => true,
            };
            if expired {
                return Err(RpcError::ConfirmationTimeout {
                    signature: signature.to_string(),
                    secs: self.config.confirm_timeout.as_secs(),
                });
            }
            tokio::time::sleep(self.config.poll_interval).await;
        }
    }
}
