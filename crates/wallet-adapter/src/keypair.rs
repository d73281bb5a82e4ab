//! In-process Ed25519 wallet.
//!
//! Loads keypairs in the Solana CLI JSON format: an array of 64 integers,
//! the 32-byte secret seed followed by the 32-byte public key.

use std::path::Path;

use async_trait::async_trait;
use ed25519_dalek::{Signer, SigningKey};
use sol_tx::{Pubkey, Signature};
use zeroize::Zeroize;

use crate::error::WalletError;
use crate::provider::{MessageDisplay, WalletProvider};

pub struct KeypairProvider {
    signing_key: SigningKey,
}

impl KeypairProvider {
    /// Build from a 32-byte seed or a 64-byte seed-plus-public-key pair.
    ///
    /// For 64-byte input the trailing public key must match the seed.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        if bytes.len() != 32 && bytes.len() != 64 {
            return Err(WalletError::InvalidKeypair(format!(
                "expected 32 or 64 bytes, got {}",
                bytes.len()
            )));
        }

        let mut seed = [0u8; 32];
        seed.copy_from_slice(&bytes[..32]);
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();

        if bytes.len() == 64 && signing_key.verifying_key().as_bytes() != &bytes[32..] {
            return Err(WalletError::InvalidKeypair(
                "public key does not match secret key".into(),
            ));
        }

        Ok(Self { signing_key })
    }

    /// Load a Solana CLI keypair file.
    pub fn from_json_file(path: &Path) -> Result<Self, WalletError> {
        let mut text = std::fs::read_to_string(path)
            .map_err(|e| WalletError::InvalidKeypair(format!("{}: {e}", path.display())))?;
        let parsed: Result<Vec<u8>, _> = serde_json::from_str(&text);
        text.zeroize();

        let mut bytes =
            parsed.map_err(|e| WalletError::InvalidKeypair(format!("{}: {e}", path.display())))?;
        let provider = Self::from_bytes(&bytes);
        bytes.zeroize();
        provider
    }

    /// Fresh random keypair.
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut rand::rngs::OsRng),
        }
    }

    pub fn pubkey(&self) -> Pubkey {
        Pubkey::new(self.signing_key.verifying_key().to_bytes())
    }

    fn sign_bytes(&self, bytes: &[u8]) -> Signature {
        Signature::new(self.signing_key.sign(bytes).to_bytes())
    }
}

#[async_trait]
impl WalletProvider for KeypairProvider {
    fn name(&self) -> &str {
        "keypair"
    }

    async fn connect(&self, network: &str) -> Result<Pubkey, WalletError> {
        log::debug!("keypair wallet {} serving {}", self.pubkey(), network);
        Ok(self.pubkey())
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }

    async fn sign_transaction(&self, message: &[u8]) -> Result<Signature, WalletError> {
        Ok(self.sign_bytes(message))
    }

    async fn sign_message(
        &self,
        data: &[u8],
        _display: MessageDisplay,
    ) -> Result<Signature, WalletError> {
        Ok(self.sign_bytes(data))
    }
}
