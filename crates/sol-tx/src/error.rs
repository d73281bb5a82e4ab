use thiserror::Error;

/// Errors raised while decoding keys or building and serializing transactions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SolError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid blockhash: {0}")]
    InvalidHash(String),

    #[error("invalid signature: {0}")]
    InvalidSignature(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("Transaction recentBlockhash required")]
    MissingBlockhash,

    #[error("Transaction fee payer required")]
    MissingFeePayer,

    #[error("Missing signature for public key {0}")]
    MissingSignature(String),

    #[error("unknown signer: {0}")]
    UnknownSigner(String),

    #[error("transaction build error: {0}")]
    TransactionBuildError(String),
}
