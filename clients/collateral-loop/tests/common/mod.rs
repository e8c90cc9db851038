#![allow(dead_code)]

use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::program_error::ProgramError;
use collateral_loop::constants::*;
use collateral_loop::errors::LoopError;
use collateral_loop::roles::*;
use collateral_loop::state::{AccountSnapshot, EntryPoint, PriceRound, RateMode};
use collateral_loop::LoopConfig;
use std::cell::RefCell;
use std::collections::HashMap;

pub const NOW: i64 = 1_700_000_000;
pub const SOL_PRICE: u64 = 150_000_000; // $150, valuation decimals
pub const LTV_BPS: u16 = 8_000;
pub const LIQUIDATION_THRESHOLD_BPS: u16 = 8_500;
pub const INTEREST_ON_REPAY: u64 = 37;
pub const STARTING_LAMPORTS: u64 = 1_000_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Call {
    Wrap,
    BalanceOf,
    Decimals,
    Approve,
    ResolveEntryPoint,
    Deposit,
    Borrow,
    Repay,
    UserAccountData,
    LatestRoundData,
    UnixTimestamp,
}

impl Call {
    pub fn mutating(&self) -> bool {
        matches!(
            self,
            Call::Wrap | Call::Approve | Call::Deposit | Call::Borrow | Call::Repay
        )
    }
}

pub fn custom(err: LoopError) -> ProgramError {
    ProgramError::Custom(err.into())
}

pub fn code(err: anchor_lang::error::Error) -> ProgramError {
    ProgramError::from(err)
}

struct Ledger {
    calls: Vec<Call>,
    failures: Vec<(Call, usize)>,
    lamports: u64,
    balances: HashMap<Pubkey, u64>,
    allowances: HashMap<(Pubkey, Pubkey), u64>,
    collateral: u64,
    debt: u64,
    sol_price: u64,
    ltv_bps: u16,
    round: PriceRound,
    now: i64,
    reprice_after: Option<(usize, u64)>,
    reprice_on_borrow: Option<u64>,
    fail_after_borrow: Option<LoopError>,
    borrow_rate_modes: Vec<RateMode>,
}

/// In-memory lending pool with one SOL collateral reserve and one USDC borrow reserve
pub struct FakeChain {
    pub authority: Pubkey,
    pub registry: Pubkey,
    pub entry_point: EntryPoint,
    pub wrapped_mint: Pubkey,
    pub borrow_mint: Pubkey,
    pub price_feed: Pubkey,
    ledger: RefCell<Ledger>,
}

impl FakeChain {
    pub fn new() -> Self {
        let wrapped_mint = anchor_spl::token::spl_token::native_mint::ID;
        let borrow_mint = Pubkey::new_unique();
        Self {
            authority: Pubkey::new_unique(),
            registry: Pubkey::new_unique(),
            entry_point: EntryPoint {
                program_id: Pubkey::new_unique(),
                pool: Pubkey::new_unique(),
            },
            wrapped_mint,
            borrow_mint,
            price_feed: Pubkey::new_unique(),
            ledger: RefCell::new(Ledger {
                calls: Vec::new(),
                failures: Vec::new(),
                lamports: STARTING_LAMPORTS,
                balances: HashMap::new(),
                allowances: HashMap::new(),
                collateral: 0,
                debt: 0,
                sol_price: SOL_PRICE,
                ltv_bps: LTV_BPS,
                round: PriceRound {
                    round_id: 7,
                    answer: 100_000_000,
                    decimals: 8,
                    started_at: NOW - 20,
                    updated_at: NOW - 10,
                    answered_in_round: 7,
                    confidence: 10_000,
                },
                now: NOW,
                reprice_after: None,
                reprice_on_borrow: None,
                fail_after_borrow: None,
                borrow_rate_modes: Vec::new(),
            }),
        }
    }

    pub fn operator(&self) -> Operator {
        Operator::new(self.authority)
    }

    pub fn config(&self) -> LoopConfig {
        LoopConfig {
            wrapped_mint: self.wrapped_mint,
            borrow_mint: self.borrow_mint,
            price_feed: self.price_feed,
            ..LoopConfig::new(self.registry).unwrap()
        }
    }

    /// Fail the `occurrence`th call (1-based) of `call`
    pub fn fail_on(&self, call: Call, occurrence: usize) {
        self.ledger.borrow_mut().failures.push((call, occurrence));
    }

    /// Move the SOL price once `reads` position reads have happened
    pub fn reprice_sol_after(&self, reads: usize, price: u64) {
        self.ledger.borrow_mut().reprice_after = Some((reads, price));
    }

    /// Move the SOL price just before the pool executes a borrow
    pub fn reprice_sol_on_borrow(&self, price: u64) {
        self.ledger.borrow_mut().reprice_on_borrow = Some(price);
    }

    /// Apply the next borrow, then report `err` as if confirmation was lost
    pub fn fail_after_borrow(&self, err: LoopError) {
        self.ledger.borrow_mut().fail_after_borrow = Some(err);
    }

    pub fn set_ltv(&self, ltv_bps: u16) {
        self.ledger.borrow_mut().ltv_bps = ltv_bps;
    }

    pub fn set_round(&self, round: PriceRound) {
        self.ledger.borrow_mut().round = round;
    }

    pub fn round(&self) -> PriceRound {
        self.ledger.borrow().round
    }

    pub fn advance_clock(&self, secs: i64) {
        self.ledger.borrow_mut().now += secs;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.ledger.borrow().calls.clone()
    }

    pub fn count(&self, call: Call) -> usize {
        self.ledger.borrow().calls.iter().filter(|c| **c == call).count()
    }

    /// Outstanding debt in borrow token units
    pub fn debt(&self) -> u64 {
        self.ledger.borrow().debt
    }

    pub fn lamports(&self) -> u64 {
        self.ledger.borrow().lamports
    }

    pub fn balance(&self, mint: &Pubkey) -> u64 {
        self.ledger.borrow().balances.get(mint).copied().unwrap_or_default()
    }

    pub fn allowance(&self, mint: &Pubkey) -> u64 {
        let ledger = self.ledger.borrow();
        ledger
            .allowances
            .get(&(*mint, self.entry_point.pool))
            .copied()
            .unwrap_or_default()
    }

    pub fn borrow_rate_modes(&self) -> Vec<RateMode> {
        self.ledger.borrow().borrow_rate_modes.clone()
    }

    fn record(&self, call: Call) -> Result<()> {
        let mut ledger = self.ledger.borrow_mut();
        ledger.calls.push(call);
        let seen = ledger.calls.iter().filter(|c| **c == call).count();
        if ledger.failures.contains(&(call, seen)) {
            return err!(LoopError::RpcFailure);
        }
        Ok(())
    }

    fn signed(&self, operator: &Operator, call: Call) -> Result<()> {
        self.record(call)?;
        require_keys_eq!(operator.authority, self.authority, LoopError::OperatorMismatch);
        Ok(())
    }

    fn snapshot(ledger: &Ledger) -> AccountSnapshot {
        let collateral_value =
            (ledger.collateral as u128 * ledger.sol_price as u128 / 1_000_000_000) as u64;
        // USDC has the same decimals as the valuation unit
        let debt_value = (ledger.debt as u128 * ledger.round.answer.max(0) as u128
            / 10u128.pow(ledger.round.decimals as u32)) as u64;
        let capacity = collateral_value as u128 * ledger.ltv_bps as u128 / BPS_PRECISION as u128;
        let health_factor = if debt_value == 0 {
            u128::MAX
        } else {
            collateral_value as u128 * LIQUIDATION_THRESHOLD_BPS as u128 * WAD_PRECISION
                / BPS_PRECISION as u128
                / debt_value as u128
        };

        AccountSnapshot {
            total_collateral_value: collateral_value,
            total_debt_value: debt_value,
            available_borrows_value: (capacity as u64).saturating_sub(debt_value),
            current_liquidation_threshold_bps: LIQUIDATION_THRESHOLD_BPS,
            ltv_bps: ledger.ltv_bps,
            health_factor,
        }
    }

    fn spend_allowance(ledger: &mut Ledger, mint: &Pubkey, spender: &Pubkey, amount: u64) -> Result<()> {
        let allowance = ledger.allowances.entry((*mint, *spender)).or_default();
        require!(*allowance >= amount, LoopError::TransactionReverted);
        *allowance -= amount;

        let balance = ledger.balances.entry(*mint).or_default();
        require!(*balance >= amount, LoopError::TransactionReverted);
        *balance -= amount;
        Ok(())
    }
}

impl Registry for FakeChain {
    fn resolve_entry_point(&self, registry: &Pubkey) -> Result<EntryPoint> {
        self.record(Call::ResolveEntryPoint)?;
        require_keys_eq!(*registry, self.registry, LoopError::InvalidRegistry);
        Ok(self.entry_point)
    }
}

impl TokenContract for FakeChain {
    fn approve(
        &self,
        operator: &Operator,
        mint: &Pubkey,
        spender: &Pubkey,
        amount: u64,
    ) -> Result<Signature> {
        self.signed(operator, Call::Approve)?;
        self.ledger
            .borrow_mut()
            .allowances
            .insert((*mint, *spender), amount);
        Ok(Signature::new_unique())
    }

    fn balance_of(&self, owner: &Pubkey, mint: &Pubkey) -> Result<u64> {
        self.record(Call::BalanceOf)?;
        if *owner != self.authority {
            return Ok(0);
        }
        Ok(self.balance(mint))
    }

    fn decimals(&self, mint: &Pubkey) -> Result<u8> {
        self.record(Call::Decimals)?;
        if *mint == self.wrapped_mint {
            Ok(SOL_DECIMALS)
        } else if *mint == self.borrow_mint {
            Ok(USDC_DECIMALS)
        } else {
            err!(LoopError::MintNotFound)
        }
    }
}

impl WrappedNative for FakeChain {
    fn wrap(&self, operator: &Operator, mint: &Pubkey, amount: u64) -> Result<Signature> {
        self.signed(operator, Call::Wrap)?;
        require_keys_eq!(*mint, self.wrapped_mint, LoopError::InvalidAddress);

        let mut ledger = self.ledger.borrow_mut();
        require!(ledger.lamports >= amount, LoopError::TransactionReverted);
        ledger.lamports -= amount;
        *ledger.balances.entry(*mint).or_default() += amount;
        Ok(Signature::new_unique())
    }
}

impl LendingEntryPoint for FakeChain {
    fn deposit(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        on_behalf_of: &Pubkey,
        _referral_code: u16,
    ) -> Result<Signature> {
        self.signed(operator, Call::Deposit)?;
        require_keys_eq!(*asset, self.wrapped_mint, LoopError::TransactionReverted);
        require_keys_eq!(*on_behalf_of, self.authority, LoopError::TransactionReverted);

        let mut ledger = self.ledger.borrow_mut();
        Self::spend_allowance(&mut ledger, asset, &entry_point.spender(), amount)?;
        ledger.collateral += amount;
        Ok(Signature::new_unique())
    }

    fn borrow(
        &self,
        operator: &Operator,
        _entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        rate_mode: RateMode,
        _referral_code: u16,
        on_behalf_of: &Pubkey,
    ) -> Result<Signature> {
        self.signed(operator, Call::Borrow)?;
        require_keys_eq!(*asset, self.borrow_mint, LoopError::TransactionReverted);
        require_keys_eq!(*on_behalf_of, self.authority, LoopError::TransactionReverted);

        let mut ledger = self.ledger.borrow_mut();
        if let Some(price) = ledger.reprice_on_borrow.take() {
            ledger.sol_price = price;
        }

        let available = Self::snapshot(&ledger).available_borrows_value;
        let needed = (amount as u128 * ledger.round.answer.max(0) as u128
            / 10u128.pow(ledger.round.decimals as u32)) as u64;
        require!(needed <= available, LoopError::TransactionReverted);

        ledger.debt += amount;
        *ledger.balances.entry(*asset).or_default() += amount;
        ledger.borrow_rate_modes.push(rate_mode);
        if let Some(err) = ledger.fail_after_borrow.take() {
            return Err(error!(err));
        }
        Ok(Signature::new_unique())
    }

    fn repay(
        &self,
        operator: &Operator,
        entry_point: &EntryPoint,
        asset: &Pubkey,
        amount: u64,
        _rate_mode: RateMode,
        on_behalf_of: &Pubkey,
    ) -> Result<Signature> {
        self.signed(operator, Call::Repay)?;
        require_keys_eq!(*asset, self.borrow_mint, LoopError::TransactionReverted);
        require_keys_eq!(*on_behalf_of, self.authority, LoopError::TransactionReverted);

        let mut ledger = self.ledger.borrow_mut();
        // Interest accrued since the borrow
        ledger.debt += INTEREST_ON_REPAY;

        let repaid = amount.min(ledger.debt);
        Self::spend_allowance(&mut ledger, asset, &entry_point.spender(), repaid)?;
        ledger.debt -= repaid;
        Ok(Signature::new_unique())
    }

    fn user_account_data(&self, _entry_point: &EntryPoint, user: &Pubkey) -> Result<AccountSnapshot> {
        self.record(Call::UserAccountData)?;
        if *user != self.authority {
            return Ok(AccountSnapshot::default());
        }

        let mut ledger = self.ledger.borrow_mut();
        let reads = ledger
            .calls
            .iter()
            .filter(|c| **c == Call::UserAccountData)
            .count();
        if let Some((after, price)) = ledger.reprice_after {
            if reads > after {
                ledger.sol_price = price;
            }
        }
        Ok(Self::snapshot(&ledger))
    }
}

impl PriceFeed for FakeChain {
    fn latest_round_data(&self, feed: &Pubkey) -> Result<PriceRound> {
        self.record(Call::LatestRoundData)?;
        require_keys_eq!(*feed, self.price_feed, LoopError::InvalidOracle);
        Ok(self.round())
    }
}

impl ChainClock for FakeChain {
    fn unix_timestamp(&self) -> Result<i64> {
        self.record(Call::UnixTimestamp)?;
        Ok(self.ledger.borrow().now)
    }
}
