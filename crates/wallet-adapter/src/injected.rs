use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::keypair::KeypairProvider;
use crate::provider::WalletProvider;
use crate::wallet::Wallet;

/// The wallet capability a host may inject, or why there is none.
#[derive(Clone)]
pub enum InjectedWallet {
    Available(Arc<dyn WalletProvider>),
    Unavailable(String),
}

impl InjectedWallet {
    /// Use the Solana CLI keypair at `path` as the injected wallet.
    pub fn from_keypair_file(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return InjectedWallet::Unavailable("no injected wallet configured".into());
        };
        match KeypairProvider::from_json_file(path) {
            Ok(provider) => InjectedWallet::Available(Arc::new(provider)),
            Err(e) => InjectedWallet::Unavailable(e.to_string()),
        }
    }

    /// Wrap the capability in a wallet handle. An unavailable capability is
    /// reported on the diagnostic log and yields no candidate.
    pub fn into_wallet(self, network: &str) -> Option<Wallet> {
        match self {
            InjectedWallet::Available(provider) => Some(Wallet::new(provider, network)),
            InjectedWallet::Unavailable(reason) => {
                log::info!("Could not create injected wallet: {reason}");
                None
            }
        }
    }
}

impl fmt::Debug for InjectedWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectedWallet::Available(provider) => {
                f.debug_tuple("Available").field(&provider.name()).finish()
            }
            InjectedWallet::Unavailable(reason) => f.debug_tuple("Unavailable").field(reason).finish(),
        }
    }
}
