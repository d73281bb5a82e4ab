use async_trait::async_trait;
use serde::Serialize;
use sol_tx::{Pubkey, Signature};

use crate::error::WalletError;

/// How the wallet should show a message to its user before signing it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageDisplay {
    Hex,
    Utf8,
}

/// Result of signing an arbitrary message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageSignature {
    pub public_key: Pubkey,
    pub signature: Signature,
}

/// The signing capability behind a [`crate::Wallet`].
///
/// Providers are stateless from the adapter's point of view: the adapter
/// tracks connection state and only calls the signing methods while
/// connected.
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Short label for diagnostics.
    fn name(&self) -> &str;

    /// Open a session on `network` and report the wallet's public key.
    async fn connect(&self, network: &str) -> Result<Pubkey, WalletError>;

    async fn disconnect(&self) -> Result<(), WalletError>;

    /// Sign serialized transaction message bytes.
    async fn sign_transaction(&self, message: &[u8]) -> Result<Signature, WalletError>;

    /// Sign arbitrary bytes.
    async fn sign_message(
        &self,
        data: &[u8],
        display: MessageDisplay,
    ) -> Result<Signature, WalletError>;
}
