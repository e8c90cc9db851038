//! One narrow trait per on-chain collaborator
//!
//! The workflow only ever talks to these traits. `chain::RpcChain` implements
//! all of them against a cluster; tests implement them in memory.

#![allow(clippy::too_many_arguments)]

use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use crate::state::{AccountSnapshot, EntryPoint, PriceRound, RateMode};

/// The account every call is made for and signed by
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Operator {
    pub authority: Pubkey,
}

impl Operator {
    pub fn new(authority: Pubkey) -> Self {
        Self { authority }
    }
}

/// Well-known account that points at the current lending entry point
pub trait Registry {
    fn resolve_entry_point(&self, registry: &Pubkey) -> Result<EntryPoint>;
}

/// Fungible token held by the operator
pub trait TokenContract {
    /// Grant `spender` exactly `amount` over the operator's token account.
    /// Blocks until confirmed.
    fn approve(
        &self,
        operator: &Operator,
        mint: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> Result<Signature>;

    fn balance_of(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64>;

    fn decimals(&self, mint: &Pubkey) -> Result<u8>;
}

/// Token backed 1:1 by the native currency
pub trait WrappedNative: TokenContract {
    /// Move `amount` of native currency into the operator's wrapped balance.
    /// Blocks until confirmed.
    fn wrap(&self, operator: &Operator, mint: &Pubkey, amount: u64) -> Result<Signature>;
}

/// Lending pool entry point. Mutating calls block until confirmed.
pub trait LendingEntryPoint {
    fn deposit(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        on_behalf_of: &Pubkey,
        referral_code: u16,
    ) -> Result<Signature>;

    fn borrow(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        rate_mode: RateMode,
        referral_code: u16,
        on_behalf_of: &Pubkey,
    ) -> Result<Signature>;

    fn repay(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        rate_mode: RateMode,
        on_behalf_of: &Pubkey,
    ) -> Result<Signature>;

    /// Read-only, never cached
    fn user_account_data(&self, entry_point: &EntryPoint, user: &Pubkey) -> Result<AccountSnapshot>;
}

/// Price feed publishing rounds
pub trait PriceFeed {
    fn latest_round_data(&self, feed: &Pubkey) -> Result<PriceRound>;
}

/// Chain time, used to judge oracle freshness
pub trait ChainClock {
    fn unix_timestamp(&self) -> Result<i64>;
}
