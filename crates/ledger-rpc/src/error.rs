use thiserror::Error;

/// Failures of a single JSON-RPC exchange.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum JsonRpcError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// The request never produced a JSON-RPC reply (connect, timeout, HTTP status).
    #[error("{0}")]
    Transport(String),

    /// The peer answered with a JSON-RPC error object.
    #[error("{message}")]
    Server { code: i64, message: String },

    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

/// Ledger RPC errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RpcError {
    #[error(transparent)]
    JsonRpc(#[from] JsonRpcError),

    #[error("unknown cluster: {0}")]
    UnknownCluster(String),

    #[error("invalid response: {0}")]
    InvalidResponse(String),

    #[error("Transaction {signature} failed: {reason}")]
    TransactionFailed { signature: String, reason: String },

    #[error(
        "Transaction was not confirmed in {secs} seconds. It is unknown if it succeeded or failed. \
         Check signature {signature} using the Solana Explorer or CLI tools."
    )]
    ConfirmationTimeout { signature: String, secs: u64 },
}
