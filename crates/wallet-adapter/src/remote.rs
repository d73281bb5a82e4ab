//! URL-based wallet: a signer service reached over JSON-RPC.
//!
//! | method            | params                         | result                    |
//! |-------------------|--------------------------------|---------------------------|
//! | `connect`         | `{network}`                    | `{publicKey}`             |
//! | `disconnect`      | `{}`                           | `null`                    |
//! | `signTransaction` | `{message}` (base58)           | `{publicKey, signature}`  |
//! | `sign`            | `{data, display}` (data base58)| `{publicKey, signature}`  |
//!
//! Any JSON-RPC error object is treated as the user refusing the request.

use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use ledger_rpc::JsonRpcClient;
use serde::Deserialize;
use serde_json::{json, Value};
use sol_tx::{Pubkey, Signature};

use crate::error::WalletError;
use crate::provider::{MessageDisplay, WalletProvider};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConnectReply {
    public_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SignReply {
    public_key: String,
    signature: String,
}

#[derive(Debug)]
pub struct RemoteProvider {
    name: String,
    rpc: JsonRpcClient,
    public_key: Mutex<Option<Pubkey>>,
}

impl RemoteProvider {
    pub fn new(provider_url: &str) -> Result<Self, WalletError> {
        let rpc = JsonRpcClient::new(provider_url, REQUEST_TIMEOUT)?;
        Ok(Self {
            name: format!("url:{}", rpc.url()),
            rpc,
            public_key: Mutex::new(None),
        })
    }

    pub fn url(&self) -> &str {
        self.rpc.url().as_str()
    }

    fn session_key(&self) -> Option<Pubkey> {
        *self.public_key.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Decode a signing reply and check it came from the connected key.
    fn check_sign_reply(&self, reply: SignReply) -> Result<Signature, WalletError> {
        let signer = parse_pubkey(&reply.public_key)?;
        if let Some(expected) = self.session_key() {
            if expected != signer {
                return Err(WalletError::InvalidResponse(format!(
                    "signed by {signer}, expected {expected}"
                )));
            }
        }
        reply
            .signature
            .parse()
            .map_err(|e: sol_tx::SolError| WalletError::InvalidResponse(e.to_string()))
    }
}

fn parse_pubkey(text: &str) -> Result<Pubkey, WalletError> {
    text.parse()
        .map_err(|e: sol_tx::SolError| WalletError::InvalidResponse(e.to_string()))
}

fn sign_params(data: &[u8], display: MessageDisplay) -> Value {
    json!({
        "data": bs58::encode(data).into_string(),
        "display": display,
    })
}

#[async_trait]
impl WalletProvider for RemoteProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn connect(&self, network: &str) -> Result<Pubkey, WalletError> {
        let reply: ConnectReply = self
            .rpc
            .call("connect", json!({ "network": network }))
            .await?;
        let key = parse_pubkey(&reply.public_key)?;
        *self.public_key.lock().unwrap_or_else(PoisonError::into_inner) = Some(key);
        Ok(key)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        *self.public_key.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.rpc.call::<Value>("disconnect", json!({})).await?;
        Ok(())
    }

    async fn sign_transaction(&self, message: &[u8]) -> Result<Signature, WalletError> {
        let reply: SignReply = self
            .rpc
            .call(
                "signTransaction",
                json!({ "message": bs58::encode(message).into_string() }),
            )
            .await?;
        self.check_sign_reply(reply)
    }

    async fn sign_message(
        &self,
        data: &[u8],
        display: MessageDisplay,
    ) -> Result<Signature, WalletError> {
        let reply: SignReply = self.rpc.call("sign", sign_params(data, display)).await?;
        self.check_sign_reply(reply)
    }
}
