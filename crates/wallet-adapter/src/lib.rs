//! Wallet adapter: one [`Wallet`] handle over any [`WalletProvider`].
//!
//! Providers do the actual signing. Two kinds ship here: a URL-based
//! [`RemoteProvider`] that talks JSON-RPC to an external signer, and an
//! in-process [`KeypairProvider`] that the host can hand in as the injected
//! wallet. The [`Wallet`] tracks connection state, fills transaction
//! signature slots, and notifies connect/disconnect observers whose
//! lifetime is bound to a [`Subscription`] guard.

pub mod error;
pub mod events;
pub mod injected;
pub mod keypair;
pub mod provider;
pub mod remote;
pub mod wallet;

pub use error::WalletError;
pub use events::{Subscription, WalletEvent, WalletEventKind};
pub use injected::InjectedWallet;
pub use keypair::KeypairProvider;
pub use provider::{MessageDisplay, MessageSignature, WalletProvider};
pub use remote::RemoteProvider;
pub use wallet::Wallet;
