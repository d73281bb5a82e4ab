//! Solana primitives for the wallet adapter demo.
//!
//! Keys, hashes and signatures are Base58 newtypes over fixed-size byte
//! arrays. Transactions are drafted from instructions, compiled into the
//! legacy message format and serialized to the compact wire layout by hand,
//! so the demo never needs `solana-sdk`.

pub mod error;
pub mod pubkey;
pub mod transaction;

pub use error::SolError;
pub use pubkey::{Hash, Pubkey, Signature};
pub use transaction::{
    compile_message, encode_compact_u16, AccountMeta, CompiledInstruction, Instruction, Message,
    Transaction,
};
