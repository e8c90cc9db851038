use anchor_lang::prelude::*;
use std::str::FromStr;

use crate::constants::*;
use crate::errors::LoopError;
use crate::state::RateMode;
use crate::utils::validate_safety_margin;

/// Everything the collateral loop needs besides a chain and an operator
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopConfig {
    /// Registry account that resolves the lending entry point
    pub registry: Pubkey,

    /// Wrapped native mint (wSOL)
    pub wrapped_mint: Pubkey,

    /// Asset to borrow and repay
    pub borrow_mint: Pubkey,

    /// Price feed for `borrow_mint`, quoted in the pool's valuation unit
    pub price_feed: Pubkey,

    /// Lamports to wrap and deposit
    pub wrap_amount: u64,

    /// Share of available capacity to borrow (e.g., 9500 = 95%)
    pub safety_margin_bps: u16,

    pub rate_mode: RateMode,

    pub referral_code: u16,

    /// Oldest oracle round accepted
    pub max_oracle_age_secs: u64,

    /// Widest oracle confidence interval accepted, relative to price
    pub max_confidence_bps: u16,

    /// Decimals of the pool's valuation unit
    pub valuation_decimals: u8,
}

impl LoopConfig {
    /// Defaults: wrap 0.02 SOL, borrow USDC at 95% of capacity, variable rate
    pub fn new(registry: Pubkey) -> Result<Self> {
        Ok(Self {
            registry,
            wrapped_mint: parse_pubkey(WSOL_MINT)?,
            borrow_mint: parse_pubkey(USDC_MINT)?,
            price_feed: parse_pubkey(USDC_USD_FEED)?,
            wrap_amount: DEFAULT_WRAP_AMOUNT,
            safety_margin_bps: DEFAULT_SAFETY_MARGIN_BPS,
            rate_mode: RateMode::Variable,
            referral_code: DEFAULT_REFERRAL_CODE,
            max_oracle_age_secs: MAX_ORACLE_AGE_SECS,
            max_confidence_bps: MAX_CONFIDENCE_DEVIATION_BPS,
            valuation_decimals: VALUATION_DECIMALS,
        })
    }

    pub fn validate(&self) -> Result<()> {
        require!(self.wrap_amount > 0, LoopError::AmountTooSmall);

        validate_safety_margin(self.safety_margin_bps)?;

        require!(
            self.max_confidence_bps as u64 <= BPS_PRECISION,
            LoopError::InvalidPercentage
        );

        require!(self.max_oracle_age_secs > 0, LoopError::InvalidOracle);

        require!(
            self.valuation_decimals <= MAX_DECIMALS,
            LoopError::InvalidAmount
        );

        // Borrowing the collateral asset itself is not a loop
        require_keys_neq!(
            self.wrapped_mint,
            self.borrow_mint,
            LoopError::InvalidAddress
        );

        Ok(())
    }
}

pub fn parse_pubkey(value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim()).map_err(|_| {
        msg!("Invalid address: {}", value);
        error!(LoopError::InvalidAddress)
    })
}
