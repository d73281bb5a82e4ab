use ledger_rpc::JsonRpcError;
use sol_tx::SolError;
use thiserror::Error;

/// Wallet adapter errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("wallet not connected")]
    NotConnected,

    /// The wallet (or its user) refused the request.
    #[error("{0}")]
    Rejected(String),

    #[error("invalid provider url: {0}")]
    InvalidProviderUrl(String),

    #[error("wallet transport error: {0}")]
    Transport(String),

    #[error("invalid wallet response: {0}")]
    InvalidResponse(String),

    #[error("invalid keypair: {0}")]
    InvalidKeypair(String),

    #[error(transparent)]
    Transaction(#[from] SolError),
}

impl From<JsonRpcError> for WalletError {
    fn from(err: JsonRpcError) -> Self {
        match err {
            JsonRpcError::InvalidUrl(msg) => WalletError::InvalidProviderUrl(msg),
            JsonRpcError::Transport(msg) => WalletError::Transport(msg),
            JsonRpcError::Server { message, .. } => WalletError::Rejected(message),
            JsonRpcError::InvalidResponse(msg) => WalletError::InvalidResponse(msg),
        }
    }
}
