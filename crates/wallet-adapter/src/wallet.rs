use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use sol_tx::{Pubkey, Transaction};

use crate::error::WalletError;
use crate::events::{Observers, Subscription, WalletEvent, WalletEventKind};
use crate::provider::{MessageDisplay, MessageSignature, WalletProvider};
use crate::remote::RemoteProvider;

#[derive(Debug, Default, Clone, Copy)]
struct WalletState {
    connected: bool,
    /// A provider connect is in flight.
    connecting: bool,
    public_key: Option<Pubkey>,
}

/// Clears `connecting` however the attempt ends.
struct ConnectAttempt<'a> {
    wallet: &'a Wallet,
}

impl Drop for ConnectAttempt<'_> {
    fn drop(&mut self) {
        self.wallet.lock_state().connecting = false;
    }
}

struct WalletInner {
    provider: Arc<dyn WalletProvider>,
    network: String,
    state: Mutex<WalletState>,
    observers: Observers,
}

/// A wallet handle. Clones share connection state and observers.
#[derive(Clone)]
pub struct Wallet {
    inner: Arc<WalletInner>,
}

impl Wallet {
    pub fn new(provider: Arc<dyn WalletProvider>, network: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(WalletInner {
                provider,
                network: network.into(),
                state: Mutex::new(WalletState::default()),
                observers: Observers::default(),
            }),
        }
    }

    /// A wallet backed by the signer service at `provider_url`.
    pub fn from_url(provider_url: &str, network: impl Into<String>) -> Result<Self, WalletError> {
        let provider = RemoteProvider::new(provider_url)?;
        Ok(Self::new(Arc::new(provider), network))
    }

    pub fn name(&self) -> &str {
        self.inner.provider.name()
    }

    pub fn network(&self) -> &str {
        &self.inner.network
    }

    pub fn connected(&self) -> bool {
        self.state().connected
    }

    pub fn connecting(&self) -> bool {
        self.state().connecting
    }

    pub fn public_key(&self) -> Option<Pubkey> {
        self.state().public_key
    }

    /// Whether both handles refer to the same wallet.
    pub fn ptr_eq(&self, other: &Wallet) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attach an observer for `kind`; it stays attached while the returned
    /// guard lives.
    pub fn on(
        &self,
        kind: WalletEventKind,
        handler: impl Fn(&WalletEvent) + Send + Sync + 'static,
    ) -> Subscription {
        self.inner.observers.subscribe(kind, handler)
    }

    pub fn observer_count(&self) -> usize {
        self.inner.observers.len()
    }

    /// Connect and fire `connect` observers. No-op when already connected
    /// or while another connect on this wallet is in flight.
    pub async fn connect(&self) -> Result<(), WalletError> {
        {
            let mut state = self.lock_state();
            if state.connected || state.connecting {
                return Ok(());
            }
            state.connecting = true;
        }
        let _attempt = ConnectAttempt { wallet: self };

        log::debug!("connecting to {} on {}", self.name(), self.network());
        let public_key = self.inner.provider.connect(&self.inner.network).await?;
        {
            let mut state = self.lock_state();
            state.connected = true;
            state.public_key = Some(public_key);
        }
        log::info!("{} connected as {}", self.name(), public_key);

        self.inner.observers.emit(&WalletEvent::Connect(public_key));
        Ok(())
    }

    /// Disconnect and fire `disconnect` observers. No-op when not connected.
    ///
    /// Local state is cleared even if the provider fails to close its
    /// session; that failure is still returned.
    pub async fn disconnect(&self) -> Result<(), WalletError> {
        if !self.connected() {
            return Ok(());
        }

        let result = self.inner.provider.disconnect().await;
        *self.lock_state() = WalletState::default();
        log::info!("{} disconnected", self.name());

        self.inner.observers.emit(&WalletEvent::Disconnect);
        result
    }

    /// Sign `transaction` as its fee payer (or any other signer slot that
    /// matches this wallet's key) and return the signed copy.
    pub async fn sign_transaction(
        &self,
        mut transaction: Transaction,
    ) -> Result<Transaction, WalletError> {
        let public_key = self.require_connected()?;
        let message = transaction.serialize_message()?;

        let signature = self.inner.provider.sign_transaction(&message).await?;
        transaction.add_signature(public_key, signature)?;
        Ok(transaction)
    }

    /// Sign arbitrary bytes.
    pub async fn sign(
        &self,
        data: &[u8],
        display: MessageDisplay,
    ) -> Result<MessageSignature, WalletError> {
        let public_key = self.require_connected()?;
        let signature = self.inner.provider.sign_message(data, display).await?;
        Ok(MessageSignature {
            public_key,
            signature,
        })
    }

    fn require_connected(&self) -> Result<Pubkey, WalletError> {
        let state = self.state();
        match (state.connected, state.public_key) {
            (true, Some(key)) => Ok(key),
            _ => Err(WalletError::NotConnected),
        }
    }

    fn state(&self) -> WalletState {
        *self.lock_state()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, WalletState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Wallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state();
        f.debug_struct("Wallet")
            .field("provider", &self.name())
            .field("network", &self.network())
            .field("connected", &state.connected)
            .field("connecting", &state.connecting)
            .field("public_key", &state.public_key)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keypair::KeypairProvider;
    use sol_tx::{AccountMeta, Hash, Instruction};
    use std::sync::atomic::{AtomicUsize, Ordering};

    const NETWORK: &str = "https://api.devnet.solana.com";

    fn keypair_wallet() -> (Wallet, Pubkey) {
        let provider = KeypairProvider::generate();
        let key = provider.pubkey();
        (Wallet::new(Arc::new(provider), NETWORK), key)
    }

    fn draft(fee_payer: Pubkey) -> Transaction {
        let mut tx = Transaction::new().add(Instruction::new(
            Pubkey::new([9u8; 32]),
            vec![AccountMeta::new(Pubkey::new([2u8; 32]), false, true)],
            vec![1, 2, 3],
        ));
        tx.set_recent_blockhash(Hash::new([7u8; 32]));
        tx.set_fee_payer(fee_payer);
        tx
    }

    #[tokio::test]
    async fn connect_sets_state_and_fires_observers() {
        let (wallet, key) = keypair_wallet();
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        let _sub = wallet.on(WalletEventKind::Connect, move |event| {
            assert!(matches!(event, WalletEvent::Connect(_)));
            seen.fetch_add(1, Ordering::SeqCst);
        });

        assert!(!wallet.connected());
        wallet.connect().await.unwrap();
        assert!(wallet.connected());
        assert_eq!(wallet.public_key(), Some(key));
        assert_eq!(fired.load(Ordering::SeqCst), 1);

        // Second connect is a no-op.
        wallet.connect().await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn disconnect_clears_state_and_fires_once() {
        let (wallet, _) = keypair_wallet();
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        let _sub = wallet.on(WalletEventKind::Disconnect, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        wallet.disconnect().await.unwrap();
        assert_eq!(fired.load(Ordering::SeqCst), 0);

        wallet.connect().await.unwrap();
        wallet.disconnect().await.unwrap();
        assert!(!wallet.connected());
        assert_eq!(wallet.public_key(), None);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn signing_requires_connection() {
        let (wallet, key) = keypair_wallet();
        assert_eq!(
            wallet.sign(b"hi", MessageDisplay::Hex).await.unwrap_err(),
            WalletError::NotConnected
        );
        assert_eq!(
            wallet.sign_transaction(draft(key)).await.unwrap_err(),
            WalletError::NotConnected
        );
    }

    #[tokio::test]
    async fn signed_transaction_verifies() {
        let (wallet, key) = keypair_wallet();
        wallet.connect().await.unwrap();

        let signed = wallet.sign_transaction(draft(key)).await.unwrap();
        assert!(signed.verify_signatures().unwrap());
        assert!(signed.signature().is_some());
        assert!(signed.serialize().is_ok());
    }

    #[tokio::test]
    async fn signing_for_foreign_fee_payer_fails() {
        let (wallet, _) = keypair_wallet();
        wallet.connect().await.unwrap();

        let err = wallet
            .sign_transaction(draft(Pubkey::new([1u8; 32])))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            WalletError::Transaction(sol_tx::SolError::UnknownSigner(_))
        ));
    }

    #[tokio::test]
    async fn message_signature_verifies() {
        let (wallet, key) = keypair_wallet();
        wallet.connect().await.unwrap();

        let signed = wallet.sign(b"proof", MessageDisplay::Hex).await.unwrap();
        assert_eq!(signed.public_key, key);
        assert!(signed.signature.verify(&key, b"proof"));
    }

    #[test]
    fn clones_share_identity() {
        let (wallet, _) = keypair_wallet();
        let (other, _) = keypair_wallet();
        assert!(wallet.ptr_eq(&wallet.clone()));
        assert!(!wallet.ptr_eq(&other));
    }

    /// Connects only after a short sleep, counting provider calls.
    struct SlowProvider {
        key: Pubkey,
        connects: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl WalletProvider for SlowProvider {
        fn name(&self) -> &str {
            "slow"
        }

        async fn connect(&self, _network: &str) -> Result<Pubkey, WalletError> {
            self.connects.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
            Ok(self.key)
        }

        async fn disconnect(&self) -> Result<(), WalletError> {
            Ok(())
        }

        async fn sign_transaction(&self, _message: &[u8]) -> Result<sol_tx::Signature, WalletError> {
            Err(WalletError::Rejected("unsupported".into()))
        }

        async fn sign_message(
            &self,
            _data: &[u8],
            _display: MessageDisplay,
        ) -> Result<sol_tx::Signature, WalletError> {
            Err(WalletError::Rejected("unsupported".into()))
        }
    }

    #[tokio::test]
    async fn overlapping_connects_reach_the_provider_once() {
        let provider = Arc::new(SlowProvider {
            key: Pubkey::new([5u8; 32]),
            connects: AtomicUsize::new(0),
        });
        let wallet = Wallet::new(provider.clone(), NETWORK);
        let fired = Arc::new(AtomicUsize::new(0));
        let seen = fired.clone();
        let _sub = wallet.on(WalletEventKind::Connect, move |_| {
            seen.fetch_add(1, Ordering::SeqCst);
        });

        let second = wallet.clone();
        let (a, b) = tokio::join!(wallet.connect(), async {
            tokio::task::yield_now().await;
            assert!(second.connecting());
            second.connect().await
        });
        a.unwrap();
        b.unwrap();

        assert!(wallet.connected());
        assert!(!wallet.connecting());
        assert_eq!(provider.connects.load(Ordering::SeqCst), 1);
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failed_connect_can_be_retried() {
        // Nothing listens on port 1.
        let wallet = Wallet::from_url("http://127.0.0.1:1/", NETWORK).unwrap();
        assert!(wallet.connect().await.is_err());
        assert!(!wallet.connecting());
        assert!(wallet.connect().await.is_err());
    }

    #[test]
    fn from_url_rejects_garbage() {
        assert!(matches!(
            Wallet::from_url("not a url", NETWORK),
            Err(WalletError::InvalidProviderUrl(_))
        ));
        let wallet = Wallet::from_url("https://www.sollet.io", NETWORK).unwrap();
        assert_eq!(wallet.network(), NETWORK);
        assert!(wallet.name().contains("sollet.io"));
    }
}
