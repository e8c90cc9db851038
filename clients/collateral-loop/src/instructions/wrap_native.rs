use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::LoopError;
use crate::roles::{Operator, WrappedNative};
use crate::utils::format_units;

/// Wrap `amount` lamports and return the operator's wrapped balance afterwards
pub fn handler<T: WrappedNative + ?Sized>(
    token: &T,
    operator: &Operator,
    wrapped_mint: &Pubkey,
    amount: u64,
) -> Result<u64> {
    require_gt!(amount, 0, LoopError::AmountTooSmall);

    let signature = token.wrap(operator, wrapped_mint, amount)?;
    msg!(
        "Wrapped {} SOL for {} ({})",
        format_units(amount, SOL_DECIMALS),
        operator.authority,
        signature
    );

    let balance = token.balance_of(&operator.authority, wrapped_mint)?;
    msg!("Got {} WSOL", format_units(balance, SOL_DECIMALS));

    Ok(balance)
}
