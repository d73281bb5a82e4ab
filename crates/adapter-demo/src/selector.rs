//! Which wallet is active, and the observers bound to that choice.
//!
//! Each selection gets a fresh id. Observer callbacks tag their updates with
//! it so the app can ignore connect/disconnect flips from a wallet that has
//! since been swapped out, while still logging them.

use wallet_adapter::{Subscription, Wallet, WalletEvent, WalletEventKind};

use crate::app::AppEvent;
use crate::log_store::LogSink;

/// The active wallet plus the observers attached on its activation.
#[derive(Debug)]
pub struct Selection {
    id: u64,
    wallet: Wallet,
    observers: Vec<Subscription>,
}

impl Selection {
    fn attach(id: u64, wallet: Wallet, sink: &LogSink) -> Self {
        let log = sink.clone();
        let on_connect = wallet.on(WalletEventKind::Connect, move |event| {
            if let WalletEvent::Connect(public_key) = event {
                log.append(format!("Connected to wallet {public_key}"));
                log.send(AppEvent::Connected {
                    selection: id,
                    public_key: *public_key,
                });
            }
        });

        let log = sink.clone();
        let on_disconnect = wallet.on(WalletEventKind::Disconnect, move |_| {
            log.append("Disconnected from wallet");
            log.send(AppEvent::Disconnected { selection: id });
        });

        Self {
            id,
            wallet,
            observers: vec![on_connect, on_disconnect],
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn wallet(&self) -> &Wallet {
        &self.wallet
    }

    /// Disconnect the wallet, then detach the observers. The observers stay
    /// attached until the disconnect settles so its event is still reported.
    pub async fn release(self) {
        if let Err(e) = self.wallet.disconnect().await {
            log::warn!("disconnect from {} failed: {e}", self.wallet.name());
        }
        drop(self.observers);
    }
}

fn spawn_connect(wallet: Wallet) {
    tokio::spawn(async move {
        if let Err(e) = wallet.connect().await {
            log::warn!("connect to {} failed: {e}", wallet.name());
        }
    });
}

#[derive(Debug)]
pub struct WalletSelector {
    current: Option<Selection>,
    next_id: u64,
    sink: LogSink,
}

impl WalletSelector {
    pub fn new(sink: LogSink) -> Self {
        Self {
            current: None,
            next_id: 1,
            sink,
        }
    }

    /// Make `candidate` the active wallet. Returns `true` when the selection
    /// actually changed.
    ///
    /// Reselecting the active wallet retries the connect if it is neither
    /// connected nor connecting. An absent candidate clears the selection.
    pub fn select(&mut self, candidate: Option<Wallet>) -> bool {
        if let (Some(current), Some(wallet)) = (&self.current, &candidate) {
            if current.wallet.ptr_eq(wallet) {
                if !wallet.connected() && !wallet.connecting() {
                    spawn_connect(wallet.clone());
                }
                return false;
            }
        }
        if self.current.is_none() && candidate.is_none() {
            return false;
        }

        if let Some(previous) = self.current.take() {
            log::debug!("releasing selection {}", previous.id);
            tokio::spawn(previous.release());
        }

        if let Some(wallet) = candidate {
            let id = self.next_id;
            self.next_id += 1;
            log::debug!("selection {id}: {}", wallet.name());
            let selection = Selection::attach(id, wallet.clone(), &self.sink);
            self.current = Some(selection);
            spawn_connect(wallet);
        }
        true
    }

    pub fn active(&self) -> Option<&Wallet> {
        self.current.as_ref().map(Selection::wallet)
    }

    pub fn current_id(&self) -> Option<u64> {
        self.current.as_ref().map(Selection::id)
    }

    pub fn is_current(&self, id: u64) -> bool {
        self.current_id() == Some(id)
    }

    /// Release the active selection and wait for its disconnect.
    pub async fn shutdown(&mut self) {
        if let Some(selection) = self.current.take() {
            selection.release().await;
        }
    }
}
