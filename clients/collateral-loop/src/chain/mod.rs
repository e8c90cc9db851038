//! Live cluster adapter implementing every role in `crate::roles`

use anchor_client::solana_client::client_error::ClientError;
use anchor_client::solana_client::rpc_client::RpcClient;
use anchor_client::solana_sdk::account::Account as RawAccount;
use anchor_client::solana_sdk::commitment_config::CommitmentConfig;
use anchor_client::solana_sdk::signature::{Keypair, Signature, Signer};
use anchor_client::solana_sdk::transaction::Transaction;
use anchor_lang::prelude::*;
use solana_program::instruction::Instruction;
use std::thread;
use std::time::{Duration, Instant};

use crate::constants::*;
use crate::errors::LoopError;
use crate::roles::Operator;

pub mod lending;
pub mod pyth;
pub mod token;

pub struct RpcChain {
    rpc: RpcClient,
    payer: Keypair,
    confirm_timeout: Duration,
    oracle_program: Pubkey,
}

impl RpcChain {
    /// `confirm_timeout` bounds how long a submitted transaction may take to reach
    /// `confirmed` commitment
    pub fn new(
        rpc_url: &str,
        payer: Keypair,
        confirm_timeout: Duration,
        oracle_program: Pubkey,
    ) -> Self {
        let rpc = RpcClient::new_with_timeout_and_commitment(
            rpc_url.to_string(),
            confirm_timeout,
            CommitmentConfig::confirmed(),
        );
        Self {
            rpc,
            payer,
            confirm_timeout,
            oracle_program,
        }
    }

    /// Operator context for the signing keypair
    pub fn operator(&self) -> Operator {
        Operator::new(self.payer.pubkey())
    }

    /// Sign, send and wait for one confirmation
    fn submit(&self, operator: &Operator, instructions: &[Instruction]) -> Result<Signature> {
        require_keys_eq!(
            operator.authority,
            self.payer.pubkey(),
            LoopError::OperatorMismatch
        );

        let blockhash = self.rpc.get_latest_blockhash().map_err(rpc_error)?;
        let transaction = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &[&self.payer],
            blockhash,
        );

        let signature = self.rpc.send_transaction(&transaction).map_err(send_error)?;
        self.await_confirmation(&signature)?;

        Ok(signature)
    }

    fn await_confirmation(&self, signature: &Signature) -> Result<()> {
        let deadline = Instant::now() + self.confirm_timeout;

        loop {
            match self.rpc.get_signature_status(signature).map_err(rpc_error)? {
                Some(Ok(())) => return Ok(()),
                Some(Err(reason)) => {
                    msg!("Transaction {} reverted: {}", signature, reason);
                    return err!(LoopError::TransactionReverted);
                }
                None => {}
            }

            if Instant::now() >= deadline {
                msg!(
                    "Transaction {} not confirmed after {}s",
                    signature,
                    self.confirm_timeout.as_secs()
                );
                return err!(LoopError::ConfirmationTimeout);
            }

            thread::sleep(Duration::from_millis(CONFIRM_POLL_MILLIS));
        }
    }

    /// `None` when the account does not exist
    fn fetch_account(&self, address: &Pubkey) -> Result<Option<RawAccount>> {
        let response = self
            .rpc
            .get_account_with_commitment(address, self.rpc.commitment())
            .map_err(rpc_error)?;
        Ok(response.value)
    }
}

fn rpc_error(err: ClientError) -> Error {
    msg!("RPC error: {}", err);
    error!(LoopError::RpcFailure)
}

/// Preflight rejections carry the revert; anything else is the network
fn send_error(err: ClientError) -> Error {
    match err.get_transaction_error() {
        Some(reason) => {
            msg!("Transaction rejected in preflight: {} ({})", reason, err);
            error!(LoopError::TransactionReverted)
        }
        None => rpc_error(err),
    }
}
