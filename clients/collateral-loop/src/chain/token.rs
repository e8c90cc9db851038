use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::spl_token;
use anchor_spl::token::spl_token::state::{Account as TokenAccount, Mint};
use solana_program::instruction::Instruction;
use solana_program::program_pack::Pack;
use solana_program::system_instruction;
use spl_associated_token_account::instruction::create_associated_token_account_idempotent;

use super::RpcChain;
use crate::errors::LoopError;
use crate::roles::{Operator, TokenContract, WrappedNative};

impl TokenContract for RpcChain {
    fn approve(
        &self,
        operator: &Operator,
        mint: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        let source = get_associated_token_address(&operator.authority, mint);
        let ix = spl_token::instruction::approve(
            &spl_token::ID,
            &source,
            spender,
            &operator.authority,
            &[],
            amount,
        )?;
        self.submit(operator, &[ix])
    }

    /// Balance of the owner's associated token account; 0 if it was never created
    fn balance_of(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
        let address = get_associated_token_address(owner, mint);
        match self.fetch_account(&address)? {
            Some(account) => {
                let token_account = TokenAccount::unpack(&account.data)?;
                require_keys_eq!(token_account.mint, *mint, LoopError::InvalidAddress);
                Ok(token_account.amount)
            }
            None => Ok(0),
        }
    }

    fn decimals(&self, mint: &Pubkey) -> Result<u8> {
        let account = self
            .fetch_account(mint)?
            .ok_or(error!(LoopError::MintNotFound))?;
        require_keys_eq!(account.owner, spl_token::ID, LoopError::MintNotFound);
        let mint = Mint::unpack(&account.data)?;
        Ok(mint.decimals)
    }
}

impl WrappedNative for RpcChain {
    fn wrap(&self, operator: &Operator, mint: &Pubkey, amount: u64) -> Result<Signature> {
        let instructions = wrap_instructions(&operator.authority, mint, amount)?;
        self.submit(operator, &instructions)
    }
}

/// Create the wSOL account if needed, fund it with lamports and sync its balance
pub fn wrap_instructions(owner: &Pubkey, mint: &Pubkey, amount: u64) -> Result<Vec<Instruction>> {
    require_keys_eq!(
        *mint,
        spl_token::native_mint::ID,
        LoopError::InvalidAddress
    );

    let wrapped = get_associated_token_address(owner, mint);
    Ok(vec![
        create_associated_token_account_idempotent(owner, owner, mint, &spl_token::ID),
        system_instruction::transfer(owner, &wrapped, amount),
        spl_token::instruction::sync_native(&spl_token::ID, &wrapped)?,
    ])
}
