//! Lending program ABI: Anchor-style discriminators, borsh arguments and PDAs

use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use anchor_spl::associated_token::get_associated_token_address;
use anchor_spl::token::spl_token;
use solana_program::hash::hash;
use solana_program::instruction::Instruction;
use solana_program::system_program;

use super::RpcChain;
use crate::constants::*;
use crate::errors::LoopError;
use crate::roles::{LendingEntryPoint, Operator, Registry};
use crate::state::{AccountSnapshot, EntryPoint, LendingRegistry, RateMode};

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct DepositArgs {
    pub amount: u64,
    pub on_behalf_of: Pubkey,
    pub referral_code: u16,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct BorrowArgs {
    pub amount: u64,
    pub rate_mode: u8,
    pub referral_code: u16,
    pub on_behalf_of: Pubkey,
}

#[derive(AnchorSerialize, AnchorDeserialize, Clone, Debug, PartialEq, Eq)]
pub struct RepayArgs {
    pub amount: u64,
    pub rate_mode: u8,
    pub on_behalf_of: Pubkey,
}

fn discriminator(namespace: &str, name: &str) -> [u8; 8] {
    let preimage = format!("{}:{}", namespace, name);
    let mut out = [0u8; 8];
    out.copy_from_slice(&hash(preimage.as_bytes()).to_bytes()[..8]);
    out
}

pub fn instruction_discriminator(name: &str) -> [u8; 8] {
    discriminator("global", name)
}

pub fn account_discriminator(name: &str) -> [u8; 8] {
    discriminator("account", name)
}

/// Discriminator followed by borsh encoded arguments
pub fn encode_instruction<T: AnchorSerialize>(name: &str, args: &T) -> Result<Vec<u8>> {
    let mut data = instruction_discriminator(name).to_vec();
    args.serialize(&mut data)
        .map_err(|_| error!(anchor_lang::error::ErrorCode::InstructionDidNotSerialize))?;
    Ok(data)
}

/// Decode an account body after checking its discriminator
pub fn decode_account<T: AnchorDeserialize>(name: &str, data: &[u8]) -> Result<T> {
    require!(
        data.len() >= 8 && data[..8] == account_discriminator(name),
        anchor_lang::error::ErrorCode::AccountDiscriminatorMismatch
    );
    T::deserialize(&mut &data[8..])
        .map_err(|_| error!(anchor_lang::error::ErrorCode::AccountDidNotDeserialize))
}

pub fn reserve_address(entry_point: &EntryPoint, mint: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[RESERVE_SEED, entry_point.pool.as_ref(), mint.as_ref()],
        &entry_point.program_id,
    )
    .0
}

pub fn reserve_vault_address(entry_point: &EntryPoint, reserve: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[RESERVE_VAULT_SEED, reserve.as_ref()],
        &entry_point.program_id,
    )
    .0
}

pub fn obligation_address(entry_point: &EntryPoint, user: &Pubkey) -> Pubkey {
    Pubkey::find_program_address(
        &[OBLIGATION_SEED, entry_point.pool.as_ref(), user.as_ref()],
        &entry_point.program_id,
    )
    .0
}

/// Every pool instruction takes the same accounts
pub fn pool_instruction(
    entry_point: &EntryPoint,
    authority: &Pubkey,
    user: &Pubkey,
    asset: &Pubkey,
    data: Vec<u8>,
) -> Instruction {
    let reserve = reserve_address(entry_point, asset);
    let accounts = vec![
        AccountMeta::new(entry_point.pool, false),
        AccountMeta::new(reserve, false),
        AccountMeta::new(reserve_vault_address(entry_point, &reserve), false),
        AccountMeta::new(obligation_address(entry_point, user), false),
        AccountMeta::new(get_associated_token_address(authority, asset), false),
        AccountMeta::new_readonly(*asset, false),
        AccountMeta::new(*authority, true),
        AccountMeta::new_readonly(spl_token::ID, false),
        AccountMeta::new_readonly(system_program::ID, false),
    ];

    Instruction {
        program_id: entry_point.program_id,
        accounts,
        data,
    }
}

impl Registry for RpcChain {
    fn resolve_entry_point(&self, registry: &Pubkey) -> Result<EntryPoint> {
        let account = self.fetch_account(registry)?.ok_or_else(|| {
            msg!("Registry {} does not exist", registry);
            error!(LoopError::InvalidRegistry)
        })?;

        let decoded: LendingRegistry = decode_account(REGISTRY_ACCOUNT_NAME, &account.data)
            .map_err(|_| {
                msg!("Registry {} is not a {}", registry, REGISTRY_ACCOUNT_NAME);
                error!(LoopError::InvalidRegistry)
            })?;

        Ok(decoded.into())
    }
}

impl LendingEntryPoint for RpcChain {
    fn deposit(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        on_behalf_of: &Pubkey,
        referral_code: u16,
    ) -> Result<Signature> {
        let data = encode_instruction(
            "deposit",
            &DepositArgs {
                amount,
                on_behalf_of: *on_behalf_of,
                referral_code,
            },
        )?;
        let ix = pool_instruction(entry_point, &operator.authority, on_behalf_of, asset, data);
        self.submit(operator, &[ix])
    }

    fn borrow(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        rate_mode: RateMode,
        referral_code: u16,
        on_behalf_of: &Pubkey,
    ) -> Result<Signature> {
        let data = encode_instruction(
            "borrow",
            &BorrowArgs {
                amount,
                rate_mode: rate_mode.code(),
                referral_code,
                on_behalf_of: *on_behalf_of,
            },
        )?;
        let ix = pool_instruction(entry_point, &operator.authority, on_behalf_of, asset, data);
        self.submit(operator, &[ix])
    }

    fn repay(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        rate_mode: RateMode,
        on_behalf_of: &Pubkey,
    ) -> Result<Signature> {
        let data = encode_instruction(
            "repay",
            &RepayArgs {
                amount,
                rate_mode: rate_mode.code(),
                on_behalf_of: *on_behalf_of,
            },
        )?;
        let ix = pool_instruction(entry_point, &operator.authority, on_behalf_of, asset, data);
        self.submit(operator, &[ix])
    }

    /// An obligation that was never opened is an empty position
    fn user_account_data(&self, entry_point: &EntryPoint, user: &Pubkey) -> Result<AccountSnapshot> {
        let address = obligation_address(entry_point, user);
        match self.fetch_account(&address)? {
            Some(account) => {
                require_keys_eq!(
                    account.owner,
                    entry_point.program_id,
                    LoopError::InvalidRegistry
                );
                decode_account(OBLIGATION_ACCOUNT_NAME, &account.data)
            }
            None => Ok(AccountSnapshot::default()),
        }
    }
}
