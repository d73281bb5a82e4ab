//! Transaction drafts, message compilation and the legacy wire format.
//!
//! A [`Transaction`] is a draft: instructions plus an optional blockhash and
//! fee payer. Once both are set it compiles into a [`Message`], whose bytes
//! are what every signer signs. Serialization for submission requires a
//! signature for every required signer.
//!
//! ```text
//! Transaction:
//!   num_signatures          compact-u16
//!   signatures              64 bytes * num_signatures
//!   message:
//!     num_required_sigs     u8
//!     num_readonly_signed   u8
//!     num_readonly_unsigned u8
//!     num_accounts          compact-u16
//!     account_keys          32 bytes * num_accounts
//!     recent_blockhash      32 bytes
//!     num_instructions      compact-u16
//!     instructions[]        (see below)
//!
//! Instruction:
//!   program_id_index        u8
//!   num_accounts            compact-u16
//!   account_indices         u8 * num_accounts
//!   data_len                compact-u16
//!   data                    u8 * data_len
//! ```

use crate::error::SolError;
use crate::pubkey::{Hash, Pubkey, Signature};

// ---------------------------------------------------------------------------
// Compact-u16 encoding
// ---------------------------------------------------------------------------

/// Encode a `u16` value in Solana's compact-u16 format.
///
/// - Values 0..0x7f       -> 1 byte
/// - Values 0x80..0x3fff  -> 2 bytes
/// - Values 0x4000..      -> 3 bytes
pub fn encode_compact_u16(value: u16) -> Vec<u8> {
    let mut val = value as u32;
    let mut out = Vec::with_capacity(3);

    loop {
        let mut byte = (val & 0x7f) as u8;
        val >>= 7;
        if val > 0 {
            byte |= 0x80;
        }
        out.push(byte);
        if val == 0 {
            break;
        }
    }

    out
}

fn compact_len(len: usize, what: &str) -> Result<Vec<u8>, SolError> {
    let len = u16::try_from(len)
        .map_err(|_| SolError::TransactionBuildError(format!("too many {what}: {len}")))?;
    Ok(encode_compact_u16(len))
}

// ---------------------------------------------------------------------------
// Instructions
// ---------------------------------------------------------------------------

/// A single account reference in an instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    pub fn new(pubkey: Pubkey, is_signer: bool, is_writable: bool) -> Self {
        Self {
            pubkey,
            is_signer,
            is_writable,
        }
    }
}

/// An instruction before it is compiled into a message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

impl Instruction {
    pub fn new(program_id: Pubkey, accounts: Vec<AccountMeta>, data: Vec<u8>) -> Self {
        Self {
            program_id,
            accounts,
            data,
        }
    }
}

/// A compiled instruction where account references are replaced by u8
/// indices into the message's `account_keys`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub account_indices: Vec<u8>,
    pub data: Vec<u8>,
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A compiled legacy message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// All account keys in canonical order:
    ///   1. writable signers (fee payer first)
    ///   2. read-only signers
    ///   3. writable non-signers
    ///   4. read-only non-signers
    pub account_keys: Vec<Pubkey>,

    pub num_required_signatures: u8,
    pub num_readonly_signed: u8,
    pub num_readonly_unsigned: u8,

    pub recent_blockhash: Hash,

    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// The keys whose signatures the transaction needs, in slot order.
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.num_required_signatures as usize]
    }

    /// Serialize the message (the bytes that get signed).
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let mut buf = Vec::with_capacity(64 + self.account_keys.len() * 32);

        buf.push(self.num_required_signatures);
        buf.push(self.num_readonly_signed);
        buf.push(self.num_readonly_unsigned);

        buf.extend_from_slice(&compact_len(self.account_keys.len(), "account keys")?);
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_bytes());
        }

        buf.extend_from_slice(self.recent_blockhash.as_bytes());

        buf.extend_from_slice(&compact_len(self.instructions.len(), "instructions")?);
        for ix in &self.instructions {
            buf.push(ix.program_id_index);

            buf.extend_from_slice(&compact_len(ix.account_indices.len(), "instruction accounts")?);
            buf.extend_from_slice(&ix.account_indices);

            buf.extend_from_slice(&compact_len(ix.data.len(), "instruction data bytes")?);
            buf.extend_from_slice(&ix.data);
        }

        Ok(buf)
    }
}

/// Compile instructions into a message with a single fee payer.
///
/// The fee payer is always a writable signer and lands at index 0.
pub fn compile_message(
    instructions: &[Instruction],
    fee_payer: &Pubkey,
    recent_blockhash: &Hash,
) -> Result<Message, SolError> {
    if instructions.is_empty() {
        return Err(SolError::TransactionBuildError(
            "no instructions provided".into(),
        ));
    }

    struct AccountEntry {
        pubkey: Pubkey,
        is_signer: bool,
        is_writable: bool,
    }

    let mut entries: Vec<AccountEntry> = Vec::new();

    let mut upsert = |pubkey: Pubkey, signer: bool, writable: bool| {
        if let Some(entry) = entries.iter_mut().find(|e| e.pubkey == pubkey) {
            entry.is_signer |= signer;
            entry.is_writable |= writable;
        } else {
            entries.push(AccountEntry {
                pubkey,
                is_signer: signer,
                is_writable: writable,
            });
        }
    };

    upsert(*fee_payer, true, true);

    for ix in instructions {
        for meta in &ix.accounts {
            upsert(meta.pubkey, meta.is_signer, meta.is_writable);
        }
        // Program ids are non-signer, read-only accounts.
        upsert(ix.program_id, false, false);
    }

    // Stable sort: within a category insertion order is kept, so the fee
    // payer (inserted first as a writable signer) stays at index 0.
    entries.sort_by_key(|e| match (e.is_signer, e.is_writable) {
        (true, true) => 0u8,
        (true, false) => 1,
        (false, true) => 2,
        (false, false) => 3,
    });

    if entries.len() > u8::MAX as usize {
        return Err(SolError::TransactionBuildError(format!(
            "too many account keys: {}",
            entries.len()
        )));
    }

    let count = |pred: fn(&AccountEntry) -> bool| entries.iter().filter(|e| pred(e)).count() as u8;
    let num_required_signatures = count(|e| e.is_signer);
    let num_readonly_signed = count(|e| e.is_signer && !e.is_writable);
    let num_readonly_unsigned = count(|e| !e.is_signer && !e.is_writable);

    let account_keys: Vec<Pubkey> = entries.iter().map(|e| e.pubkey).collect();
    let index_of = |key: &Pubkey| -> Result<u8, SolError> {
        account_keys
            .iter()
            .position(|k| k == key)
            .map(|i| i as u8)
            .ok_or_else(|| SolError::TransactionBuildError(format!("{key} not in account keys")))
    };

    let mut compiled = Vec::with_capacity(instructions.len());
    for ix in instructions {
        let account_indices = ix
            .accounts
            .iter()
            .map(|meta| index_of(&meta.pubkey))
            .collect::<Result<Vec<u8>, SolError>>()?;

        compiled.push(CompiledInstruction {
            program_id_index: index_of(&ix.program_id)?,
            account_indices,
            data: ix.data.clone(),
        });
    }

    Ok(Message {
        account_keys,
        num_required_signatures,
        num_readonly_signed,
        num_readonly_unsigned,
        recent_blockhash: *recent_blockhash,
        instructions: compiled,
    })
}

// ---------------------------------------------------------------------------
// Transaction draft
// ---------------------------------------------------------------------------

/// A transaction draft that collects signatures before submission.
///
/// Changing the blockhash or the fee payer changes the message bytes, so any
/// signatures collected so far are dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transaction {
    instructions: Vec<Instruction>,
    recent_blockhash: Option<Hash>,
    fee_payer: Option<Pubkey>,
    signatures: Vec<(Pubkey, Signature)>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an instruction.
    pub fn add(mut self, instruction: Instruction) -> Self {
        self.instructions.push(instruction);
        self.signatures.clear();
        self
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn recent_blockhash(&self) -> Option<&Hash> {
        self.recent_blockhash.as_ref()
    }

    pub fn set_recent_blockhash(&mut self, blockhash: Hash) {
        self.recent_blockhash = Some(blockhash);
        self.signatures.clear();
    }

    pub fn fee_payer(&self) -> Option<&Pubkey> {
        self.fee_payer.as_ref()
    }

    pub fn set_fee_payer(&mut self, fee_payer: Pubkey) {
        self.fee_payer = Some(fee_payer);
        self.signatures.clear();
    }

    /// Compile the draft into a message. Needs a blockhash and a fee payer.
    pub fn compile_message(&self) -> Result<Message, SolError> {
        let blockhash = self.recent_blockhash.ok_or(SolError::MissingBlockhash)?;
        let fee_payer = self.fee_payer.ok_or(SolError::MissingFeePayer)?;
        compile_message(&self.instructions, &fee_payer, &blockhash)
    }

    pub fn serialize_message(&self) -> Result<Vec<u8>, SolError> {
        self.compile_message()?.serialize()
    }

    /// Attach `signature` for `signer`, replacing an earlier one.
    pub fn add_signature(&mut self, signer: Pubkey, signature: Signature) -> Result<(), SolError> {
        let message = self.compile_message()?;
        if !message.signer_keys().contains(&signer) {
            return Err(SolError::UnknownSigner(signer.to_string()));
        }

        match self.signatures.iter_mut().find(|(key, _)| *key == signer) {
            Some(slot) => slot.1 = signature,
            None => self.signatures.push((signer, signature)),
        }
        Ok(())
    }

    pub fn signatures(&self) -> &[(Pubkey, Signature)] {
        &self.signatures
    }

    /// The fee payer's signature, which identifies the transaction on chain.
    pub fn signature(&self) -> Option<&Signature> {
        let fee_payer = self.fee_payer?;
        self.signatures
            .iter()
            .find(|(key, _)| *key == fee_payer)
            .map(|(_, sig)| sig)
    }

    /// Check every attached signature against the message bytes.
    pub fn verify_signatures(&self) -> Result<bool, SolError> {
        let message = self.serialize_message()?;
        Ok(self
            .signatures
            .iter()
            .all(|(key, sig)| sig.verify(key, &message)))
    }

    /// Serialize into wire format. Every required signer must have signed.
    pub fn serialize(&self) -> Result<Vec<u8>, SolError> {
        let message = self.compile_message()?;
        let message_bytes = message.serialize()?;
        let signers = message.signer_keys();

        let mut wire = Vec::with_capacity(3 + signers.len() * 64 + message_bytes.len());
        wire.extend_from_slice(&compact_len(signers.len(), "signatures")?);
        for signer in signers {
            let (_, sig) = self
                .signatures
                .iter()
                .find(|(key, _)| key == signer)
                .ok_or_else(|| SolError::MissingSignature(signer.to_string()))?;
            wire.extend_from_slice(sig.as_bytes());
        }
        wire.extend_from_slice(&message_bytes);

        Ok(wire)
    }
}
