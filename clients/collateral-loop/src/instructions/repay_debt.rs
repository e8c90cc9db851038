use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use crate::errors::LoopError;
use crate::roles::{LendingEntryPoint, Operator};
use crate::state::{EntryPoint, RateMode};

/// Repay previously approved debt for the operator
/// Interest accrued since the borrow is left outstanding
pub fn handler<L: LendingEntryPoint + ?Sized>(
    lending: &L,
    operator: &Operator,
    entry_point: &EntryPoint,
    asset: &Pubkey,
    amount: u64,
    rate_mode: RateMode,
) -> Result<Signature> {
    require_gt!(amount, 0, LoopError::AmountTooSmall);

    let signature = lending.repay(
        operator,
        entry_point,
        asset,
        amount,
        rate_mode,
        &operator.authority,
    )?;
    msg!("Repaid {} of {} ({})", amount, asset, signature);

    Ok(signature)
}
