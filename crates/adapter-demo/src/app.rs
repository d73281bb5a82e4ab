//! App state and the event loop that owns it.
//!
//! The loop is the only writer. Flows and wallet observers run elsewhere
//! and report back through one unbounded channel, so updates land in the
//! order they were sent.

use std::io::{self, Write};
use std::sync::Arc;

use ledger_rpc::LedgerRpc;
use sol_tx::Pubkey;
use tokio::sync::mpsc::{self, UnboundedReceiver};
use wallet_adapter::{InjectedWallet, Wallet};

use crate::flows;
use crate::log_store::{LogSink, LogStore};
use crate::selector::WalletSelector;
use crate::view::{self, parse_command, Command, ViewState, USAGE};

/// An update for the loop to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Log(String),
    Connected { selection: u64, public_key: Pubkey },
    Disconnected { selection: u64 },
}

/// Something the user asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    SetProviderUrl(String),
    ConnectUrlWallet,
    ConnectInjectedWallet,
    SendTransaction,
    SignMessage,
    Disconnect,
}

pub struct App {
    network: String,
    provider_url: String,
    url_wallet: Option<Wallet>,
    injected_wallet: Option<Wallet>,
    selector: WalletSelector,
    connected_as: Option<Pubkey>,
    logs: LogStore,
    rpc: Arc<dyn LedgerRpc>,
    sink: LogSink,
    events: UnboundedReceiver<AppEvent>,
}

fn url_wallet(provider_url: &str, network: &str) -> Option<Wallet> {
    match Wallet::from_url(provider_url, network) {
        Ok(wallet) => Some(wallet),
        Err(e) => {
            log::warn!("no URL wallet for {provider_url:?}: {e}");
            None
        }
    }
}

impl App {
    pub fn new(
        network: impl Into<String>,
        provider_url: impl Into<String>,
        rpc: Arc<dyn LedgerRpc>,
        injected: InjectedWallet,
    ) -> Self {
        let network = network.into();
        let provider_url = provider_url.into().trim().to_string();
        let (tx, events) = mpsc::unbounded_channel();

        Self {
            url_wallet: url_wallet(&provider_url, &network),
            injected_wallet: injected.into_wallet(&network),
            selector: WalletSelector::new(LogSink::new(tx.clone())),
            sink: LogSink::new(tx),
            connected_as: None,
            logs: LogStore::new(),
            network,
            provider_url,
            rpc,
            events,
        }
    }

    /// Start whatever `action` asks for. Network work is spawned; this
    /// returns without waiting for it.
    pub fn dispatch(&mut self, action: Action) {
        log::debug!("dispatch {action:?}");
        match action {
            Action::SetProviderUrl(url) => {
                self.provider_url = url.trim().to_string();
                self.url_wallet = url_wallet(&self.provider_url, &self.network);
            }
            Action::ConnectUrlWallet => self.select(self.url_wallet.clone()),
            Action::ConnectInjectedWallet => self.select(self.injected_wallet.clone()),
            Action::SendTransaction => {
                let wallet = self.selector.active().cloned();
                let rpc = Arc::clone(&self.rpc);
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    flows::send_transaction(wallet.as_ref(), rpc.as_ref(), &sink).await;
                });
            }
            Action::SignMessage => {
                let wallet = self.selector.active().cloned();
                let sink = self.sink.clone();
                tokio::spawn(async move {
                    flows::sign_message(wallet.as_ref(), &sink).await;
                });
            }
            Action::Disconnect => {
                if let Some(wallet) = self.selector.active().cloned() {
                    tokio::spawn(async move {
                        if let Err(e) = wallet.disconnect().await {
                            log::warn!("disconnect from {} failed: {e}", wallet.name());
                        }
                    });
                }
            }
        }
    }

    fn select(&mut self, candidate: Option<Wallet>) {
        if self.selector.select(candidate) {
            self.connected_as = None;
        }
    }

    pub fn apply(&mut self, event: AppEvent) {
        match event {
            AppEvent::Log(line) => self.logs.append(line),
            AppEvent::Connected {
                selection,
                public_key,
            } => {
                if self.selector.is_current(selection) {
                    self.connected_as = Some(public_key);
                }
            }
            AppEvent::Disconnected { selection } => {
                if self.selector.is_current(selection) {
                    self.connected_as = None;
                }
            }
        }
    }

    /// Wait for the next update and apply it.
    pub async fn next_event(&mut self) {
        if let Some(event) = self.events.recv().await {
            self.apply(event);
        }
    }

    /// Apply every update already queued. Returns how many there were.
    pub fn drain_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events.try_recv() {
            self.apply(event);
            applied += 1;
        }
        applied
    }

    pub fn view(&self) -> ViewState<'_> {
        ViewState {
            network: &self.network,
            provider_url: &self.provider_url,
            connected_as: self.connected_as,
            logs: self.logs.entries(),
        }
    }

    pub fn logs(&self) -> &LogStore {
        &self.logs
    }

    pub fn is_connected(&self) -> bool {
        self.connected_as.is_some()
    }

    pub fn active_wallet(&self) -> Option<&Wallet> {
        self.selector.active()
    }

    pub fn url_candidate(&self) -> Option<&Wallet> {
        self.url_wallet.as_ref()
    }

    pub fn injected_candidate(&self) -> Option<&Wallet> {
        self.injected_wallet.as_ref()
    }

    /// Release the active wallet, wait for its disconnect, and apply what
    /// it reported.
    pub async fn shutdown(&mut self) {
        self.selector.shutdown().await;
        self.connected_as = None;
        self.drain_pending();
    }

    fn render_to(&self, out: &mut impl Write) -> io::Result<()> {
        write!(out, "\n{}", view::render(&self.view()))?;
        out.flush()
    }

    /// Read commands until `quit` or end of input, re-rendering after every
    /// change.
    pub async fn run(
        mut self,
        mut commands: UnboundedReceiver<String>,
        out: &mut impl Write,
    ) -> io::Result<()> {
        self.render_to(out)?;
        loop {
            tokio::select! {
                line = commands.recv() => {
                    let Some(line) = line else { break };
                    match parse_command(&line) {
                        Command::Action(action) => self.dispatch(action),
                        Command::Help => {
                            writeln!(out, "{USAGE}")?;
                            continue;
                        }
                        Command::Quit => break,
                        Command::Empty => continue,
                        Command::Unknown(input) => {
                            writeln!(out, "unknown command: {input}\n{USAGE}")?;
                            continue;
                        }
                    }
                }
                Some(event) = self.events.recv() => {
                    self.apply(event);
                    self.drain_pending();
                }
            }
            self.render_to(out)?;
        }

        self.shutdown().await;
        self.render_to(out)
    }
}
