use anchor_client::solana_sdk::signature::Signature;
use anchor_lang::prelude::*;
use crate::config::LoopConfig;
use crate::errors::LoopError;
use crate::instructions::{fetch_oracle_price, read_account_state};
use crate::roles::{ChainClock, LendingEntryPoint, Operator, PriceFeed};
use crate::state::{AccountSnapshot, EntryPoint, OraclePrice, RateMode};
use crate::utils::{compute_borrow_amount, value_of_amount};

/// A sized borrow and the price it was sized against
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BorrowQuote {
    /// Smallest units of the borrowed token
    pub amount: u64,
    pub price: OraclePrice,
    pub token_decimals: u8,
    pub valuation_decimals: u8,
}

impl BorrowQuote {
    pub fn new(
        snapshot: &AccountSnapshot,
        price: OraclePrice,
        safety_margin_bps: u16,
        token_decimals: u8,
        valuation_decimals: u8,
    ) -> Result<Self> {
        let amount = compute_borrow_amount(
            snapshot.available_borrows_value,
            price.price,
            price.decimals,
            safety_margin_bps,
            token_decimals,
            valuation_decimals,
        )?;

        Ok(Self {
            amount,
            price,
            token_decimals,
            valuation_decimals,
        })
    }

    /// Capacity this borrow consumes, in the pool's valuation unit
    pub fn value(&self) -> Result<u64> {
        value_of_amount(
            self.amount,
            self.price.price,
            self.price.decimals,
            self.token_decimals,
            self.valuation_decimals,
        )
    }
}

/// Quote again right before submitting and never borrow more than the fresh quote allows
pub fn requote<C: LendingEntryPoint + PriceFeed + ChainClock + ?Sized>(
    chain: &C,
    operator: &Operator,
    entry_point: &EntryPoint,
    config: &LoopConfig,
    quote: &BorrowQuote,
) -> Result<BorrowQuote> {
    let snapshot = read_account_state::handler(chain, entry_point, operator)?;
    let price = fetch_oracle_price::handler(
        chain,
        &config.price_feed,
        config.max_oracle_age_secs,
        config.max_confidence_bps,
    )?;

    let fresh = BorrowQuote::new(
        &snapshot,
        price,
        config.safety_margin_bps,
        quote.token_decimals,
        quote.valuation_decimals,
    )?;
    require_gt!(fresh.amount, 0, LoopError::BorrowCapacityExceeded);

    if fresh.amount < quote.amount {
        msg!(
            "Capacity moved since quote, borrowing {} instead of {}",
            fresh.amount,
            quote.amount
        );
        return Ok(fresh);
    }

    Ok(*quote)
}

/// Borrow `quote.amount` of `asset` for the operator
pub fn handler<L: LendingEntryPoint + ?Sized>(
    lending: &L,
    operator: &Operator,
    entry_point: &EntryPoint,
    asset: &Pubkey,
    quote: &BorrowQuote,
    rate_mode: RateMode,
    referral_code: u16,
) -> Result<Signature> {
    require_gt!(quote.amount, 0, LoopError::AmountTooSmall);

    let submitted = lending.borrow(
        operator,
        entry_point,
        asset,
        quote.amount,
        rate_mode,
        referral_code,
        &operator.authority,
    );

    let err = match submitted {
        Ok(signature) => {
            msg!(
                "You've borrowed {} of {} at {} rate ({})",
                quote.amount,
                asset,
                rate_mode,
                signature
            );
            return Ok(signature);
        }
        Err(err) => err,
    };
    msg!("Borrow of {} of {} failed: {}", quote.amount, asset, err);

    // A timeout or RPC failure may hide a borrow that landed and consumed the capacity
    if !LoopError::TransactionReverted.matches(&err) {
        return Err(err);
    }

    // Tell exceeded capacity apart from any other revert
    let fresh = lending.user_account_data(entry_point, &operator.authority);
    match (quote.value(), fresh) {
        (Ok(needed), Ok(snapshot)) if needed > snapshot.available_borrows_value => {
            msg!(
                "Borrow of {} needs {} of capacity, {} available",
                quote.amount,
                needed,
                snapshot.available_borrows_value
            );
            err!(LoopError::BorrowCapacityExceeded)
        }
        _ => Err(err),
    }
}
