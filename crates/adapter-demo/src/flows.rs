//! Transaction submission and message signing.
//!
//! Both flows catch their own failures: whatever goes wrong is written to the
//! visible log as a single `Error: <message>` line and to the diagnostic log,
//! and the flow returns normally.

use ledger_rpc::{Commitment, LedgerRpc, RpcError, SendOptions};
use sol_tx::{Signature, SolError, Transaction};
use thiserror::Error;
use wallet_adapter::{MessageDisplay, MessageSignature, Wallet, WalletError};

use crate::encoding::to_hex;
use crate::log_store::LogSink;
use crate::payload::{demo_instruction, PROOF_MESSAGE};

#[derive(Debug, Error)]
pub enum FlowError {
    #[error("wallet not connected")]
    WalletNotConnected,

    #[error(transparent)]
    Wallet(#[from] WalletError),

    #[error(transparent)]
    Rpc(#[from] RpcError),

    #[error(transparent)]
    Transaction(#[from] SolError),
}

/// Where a submission is, or where it stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Idle,
    FetchingBlockhash,
    AwaitingWalletSignature,
    Submitting,
    AwaitingConfirmation,
    Confirmed,
    Failed,
}

const SUBMIT_OPTIONS: SendOptions = SendOptions {
    skip_preflight: true,
    preflight_commitment: Commitment::Confirmed,
};

struct Submission<'a> {
    stage: SubmissionStage,
    log: &'a LogSink,
}

impl<'a> Submission<'a> {
    fn new(log: &'a LogSink) -> Self {
        Self {
            stage: SubmissionStage::Idle,
            log,
        }
    }

    fn advance(&mut self, next: SubmissionStage) {
        log::debug!("submission {:?} -> {:?}", self.stage, next);
        self.stage = next;
    }

    async fn run(
        &mut self,
        wallet: Option<&Wallet>,
        rpc: &dyn LedgerRpc,
    ) -> Result<Signature, FlowError> {
        let (wallet, fee_payer) = wallet
            .and_then(|w| w.public_key().map(|key| (w, key)))
            .ok_or(FlowError::WalletNotConnected)?;

        let mut transaction = Transaction::new().add(demo_instruction()?);

        self.advance(SubmissionStage::FetchingBlockhash);
        self.log.append("Getting recent blockhash");
        transaction.set_recent_blockhash(rpc.get_recent_blockhash().await?);

        self.advance(SubmissionStage::AwaitingWalletSignature);
        self.log.append("Sending signature request to wallet");
        transaction.set_fee_payer(fee_payer);
        let signed = wallet.sign_transaction(transaction).await?;

        self.advance(SubmissionStage::Submitting);
        self.log.append("Got signature, submitting transaction");
        let wire = signed.serialize()?;
        let signature = rpc.send_raw_transaction(&wire, &SUBMIT_OPTIONS).await?;

        self.advance(SubmissionStage::AwaitingConfirmation);
        self.log.append(format!(
            "Submitted transaction {signature}, awaiting confirmation"
        ));
        rpc.confirm_transaction(&signature, Commitment::Confirmed)
            .await?;
        self.log.append(format!("Transaction {signature} confirmed"));

        Ok(signature)
    }
}

fn report_failure(log: &LogSink, err: &FlowError) {
    log::warn!("{err:?}");
    log.append(format!("Error: {err}"));
}

/// Build, sign, submit and confirm the fixed demo transaction.
pub async fn send_transaction(
    wallet: Option<&Wallet>,
    rpc: &dyn LedgerRpc,
    log: &LogSink,
) -> SubmissionStage {
    let mut submission = Submission::new(log);
    match submission.run(wallet, rpc).await {
        Ok(signature) => {
            submission.advance(SubmissionStage::Confirmed);
            log::info!("transaction {signature} confirmed");
        }
        Err(err) => {
            log::debug!("submission failed while {:?}", submission.stage);
            report_failure(log, &err);
            submission.advance(SubmissionStage::Failed);
        }
    }
    submission.stage
}

/// Ask the wallet to sign the proof-of-ownership message.
pub async fn sign_message(wallet: Option<&Wallet>, log: &LogSink) -> Option<MessageSignature> {
    match try_sign_message(wallet, log).await {
        Ok(signed) => Some(signed),
        Err(err) => {
            report_failure(log, &err);
            None
        }
    }
}

async fn try_sign_message(
    wallet: Option<&Wallet>,
    log: &LogSink,
) -> Result<MessageSignature, FlowError> {
    let wallet = wallet.ok_or(FlowError::WalletNotConnected)?;

    log.append("Sending message signature request to wallet");
    let signed = wallet
        .sign(PROOF_MESSAGE.as_bytes(), MessageDisplay::Hex)
        .await?;
    log.append(format!(
        "Got signature: {}",
        to_hex(signed.signature.as_bytes())
    ));
    Ok(signed)
}
