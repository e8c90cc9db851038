use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use crate::errors::LoopError;
use crate::roles::{Operator, TokenContract};

/// Approve `spender` for exactly the amount about to be pulled
pub fn handler<T: TokenContract + ?Sized>(
    token: &T,
    operator: &Operator,
    mint: &Pubkey,
    spender: &Pubkey,
    amount: u64,
) -> Result<Signature> {
    require_gt!(amount, 0, LoopError::AmountTooSmall);

    let signature = token.approve(operator, mint, spender, amount)?;
    msg!("Approved {} of {} for {}", amount, mint, spender);

    Ok(signature)
}
