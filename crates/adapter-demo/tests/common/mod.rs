//! Scripted wallet and ledger doubles shared by the integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use adapter_demo::payload::REQUIRED_SIGNER;
use adapter_demo::AppEvent;
use async_trait::async_trait;
use ledger_rpc::{Commitment, LedgerRpc, RpcError, SendOptions};
use sol_tx::{Hash, Pubkey, Signature};
use tokio::sync::mpsc::UnboundedReceiver;
use wallet_adapter::{MessageDisplay, Wallet, WalletError, WalletProvider};

pub const NETWORK: &str = "https://api.devnet.solana.com";

pub fn wallet_signature() -> Signature {
    Signature::new([8u8; 64])
}

pub struct MockWallet {
    pub key: Pubkey,
    pub reject: bool,
    pub connect_delay: Duration,
}

impl MockWallet {
    /// Holds the key the demo instruction requires.
    pub fn required_signer() -> Self {
        Self {
            key: REQUIRED_SIGNER.parse().unwrap(),
            reject: false,
            connect_delay: Duration::ZERO,
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::required_signer()
        }
    }

    /// Answers `connect` only after a short wait.
    pub fn slow_to_connect() -> Self {
        Self {
            connect_delay: Duration::from_millis(10),
            ..Self::required_signer()
        }
    }

    pub fn foreign() -> Self {
        Self {
            key: Pubkey::new([1u8; 32]),
            reject: false,
            connect_delay: Duration::ZERO,
        }
    }

    pub fn into_wallet(self) -> Wallet {
        Wallet::new(Arc::new(self), NETWORK)
    }
}

#[async_trait]
impl WalletProvider for MockWallet {
    fn name(&self) -> &str {
        "mock"
    }

    async fn connect(&self, _network: &str) -> Result<Pubkey, WalletError> {
        if !self.connect_delay.is_zero() {
            tokio::time::sleep(self.connect_delay).await;
        }
        Ok(self.key)
    }

    async fn disconnect(&self) -> Result<(), WalletError> {
        Ok(())
    }

    async fn sign_transaction(&self, _message: &[u8]) -> Result<Signature, WalletError> {
        if self.reject {
            return Err(WalletError::Rejected("User rejected".into()));
        }
        Ok(wallet_signature())
    }

    async fn sign_message(
        &self,
        _data: &[u8],
        display: MessageDisplay,
    ) -> Result<Signature, WalletError> {
        assert_eq!(display, MessageDisplay::Hex);
        if self.reject {
            return Err(WalletError::Rejected("User rejected".into()));
        }
        Ok(wallet_signature())
    }
}

/// Confirms everything immediately and counts calls.
#[derive(Default)]
pub struct MockLedger {
    pub calls: AtomicUsize,
    pub sent: std::sync::Mutex<Vec<(Vec<u8>, SendOptions)>>,
}

impl MockLedger {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn submitted_signature() -> Signature {
        Signature::new([5u8; 64])
    }
}

#[async_trait]
impl LedgerRpc for MockLedger {
    async fn get_recent_blockhash(&self) -> Result<Hash, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Hash::new([3u8; 32]))
    }

    async fn send_raw_transaction(
        &self,
        wire: &[u8],
        options: &SendOptions,
    ) -> Result<Signature, RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().unwrap().push((wire.to_vec(), *options));
        Ok(Self::submitted_signature())
    }

    async fn confirm_transaction(
        &self,
        _signature: &Signature,
        commitment: Commitment,
    ) -> Result<(), RpcError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        assert_eq!(commitment, Commitment::Confirmed);
        Ok(())
    }
}

/// Every log line queued so far, ignoring connection updates.
pub fn drain_logs(rx: &mut UnboundedReceiver<AppEvent>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Ok(event) = rx.try_recv() {
        if let AppEvent::Log(line) = event {
            lines.push(line);
        }
    }
    lines
}
