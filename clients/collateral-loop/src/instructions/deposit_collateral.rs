use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use crate::errors::LoopError;
use crate::roles::{LendingEntryPoint, Operator};
use crate::state::EntryPoint;

/// Deposit previously approved collateral for the operator
pub fn handler<L: LendingEntryPoint + ?Sized>(
    lending: &L,
    operator: &Operator,
    entry_point: &EntryPoint,
    asset: &Pubkey,
    amount: u64,
    referral_code: u16,
) -> Result<Signature> {
    require_gt!(amount, 0, LoopError::AmountTooSmall);

    msg!("Depositing {} of {}", amount, asset);
    let signature = lending.deposit(
        operator,
        entry_point,
        asset,
        amount,
        &operator.authority,
        referral_code,
    )?;
    msg!("Deposited {} of {} ({})", amount, asset, signature);

    Ok(signature)
}
