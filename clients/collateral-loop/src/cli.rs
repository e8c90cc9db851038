use anchor_client::solana_sdk::signature::read_keypair_file;
use anchor_lang::prelude::*;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

use crate::chain::RpcChain;
use crate::config::{parse_pubkey, LoopConfig};
use crate::constants::*;
use crate::errors::LoopError;
use crate::state::RateMode;
use crate::utils::{format_units, parse_units};
use crate::workflow::{run_workflow, show_account, wrap_only};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None, name = "collateral-loop")]
pub struct LoopCli {
    /// JSON RPC endpoint of the cluster
    #[clap(long, default_value = DEFAULT_RPC_URL)]
    pub rpc_url: String,

    /// Operator keypair; signs and pays for every transaction
    #[clap(short, long)]
    pub keypair: PathBuf,

    /// Seconds to wait for each transaction to confirm
    #[clap(long, default_value_t = CONFIRM_TIMEOUT_SECS)]
    pub confirm_timeout_secs: u64,

    /// Program that owns price feed accounts
    #[clap(long, default_value = PYTH_PROGRAM)]
    pub oracle_program: String,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Wrap native SOL and print the wrapped balance
    Wrap(WrapArgs),
    /// Run the full deposit, borrow and repay loop
    Run(RunArgs),
    /// Print the operator's position without changing it
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct WrapArgs {
    /// SOL to wrap, e.g. 0.02
    #[clap(short, long, default_value = "0.02")]
    pub amount: String,
}

#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Registry account resolving the lending entry point
    pub registry: String,

    /// SOL to wrap and deposit, e.g. 0.02
    #[clap(short, long, default_value = "0.02")]
    pub amount: String,

    #[clap(long, default_value = WSOL_MINT)]
    pub wrapped_mint: String,

    #[clap(long, default_value = USDC_MINT)]
    pub borrow_mint: String,

    /// Price feed for the borrow asset
    #[clap(long, default_value = USDC_USD_FEED)]
    pub price_feed: String,

    /// Share of available capacity to borrow, in basis points
    #[clap(long, default_value_t = DEFAULT_SAFETY_MARGIN_BPS)]
    pub safety_margin_bps: u16,

    /// stable | variable
    #[clap(long, default_value = "variable")]
    pub rate_mode: String,

    #[clap(long, default_value_t = DEFAULT_REFERRAL_CODE)]
    pub referral_code: u16,

    #[clap(long, default_value_t = MAX_ORACLE_AGE_SECS)]
    pub max_oracle_age_secs: u64,

    #[clap(long, default_value_t = MAX_CONFIDENCE_DEVIATION_BPS)]
    pub max_confidence_bps: u16,

    #[clap(long, default_value_t = VALUATION_DECIMALS)]
    pub valuation_decimals: u8,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Registry account resolving the lending entry point
    pub registry: String,

    #[clap(long, default_value_t = VALUATION_DECIMALS)]
    pub valuation_decimals: u8,
}

impl RunArgs {
    pub fn to_config(&self) -> Result<LoopConfig> {
        let config = LoopConfig {
            wrapped_mint: parse_pubkey(&self.wrapped_mint)?,
            borrow_mint: parse_pubkey(&self.borrow_mint)?,
            price_feed: parse_pubkey(&self.price_feed)?,
            wrap_amount: parse_units(&self.amount, SOL_DECIMALS)?,
            safety_margin_bps: self.safety_margin_bps,
            rate_mode: self.rate_mode.parse::<RateMode>()?,
            referral_code: self.referral_code,
            max_oracle_age_secs: self.max_oracle_age_secs,
            max_confidence_bps: self.max_confidence_bps,
            valuation_decimals: self.valuation_decimals,
            ..LoopConfig::new(parse_pubkey(&self.registry)?)?
        };
        config.validate()?;
        Ok(config)
    }
}

impl LoopCli {
    fn connect(&self) -> Result<RpcChain> {
        let payer = read_keypair_file(&self.keypair).map_err(|e| {
            msg!("Cannot read keypair {}: {}", self.keypair.display(), e);
            error!(LoopError::InvalidKeypair)
        })?;
        Ok(RpcChain::new(
            &self.rpc_url,
            payer,
            Duration::from_secs(self.confirm_timeout_secs),
            parse_pubkey(&self.oracle_program)?,
        ))
    }

    pub fn run(&self) -> std::result::Result<(), Box<dyn std::error::Error>> {
        let chain = self.connect()?;
        let operator = chain.operator();
        msg!("Operator: {}", operator.authority);

        match &self.command {
            Command::Wrap(args) => {
                let mut config = LoopConfig::new(Pubkey::default())?;
                config.wrap_amount = parse_units(&args.amount, SOL_DECIMALS)?;
                config.validate()?;

                let balance = wrap_only(&chain, &operator, &config)?;
                println!("Wrapped balance: {} SOL", format_units(balance, SOL_DECIMALS));
            }
            Command::Run(args) => {
                let config = args.to_config()?;
                let report = run_workflow(&chain, &operator, &config)?;

                println!(
                    "Deposited {} SOL into pool {}",
                    format_units(report.collateral_deposited, SOL_DECIMALS),
                    report.entry_point.pool
                );
                if report.borrowed() {
                    println!("Borrowed and repaid {} units", report.borrow_amount);
                } else {
                    println!("Nothing was borrowed");
                }
                println!(
                    "Residual debt value: {}",
                    format_units(report.residual_debt_value(), config.valuation_decimals)
                );
            }
            Command::Show(args) => {
                let registry = parse_pubkey(&args.registry)?;
                let (entry_point, snapshot) = show_account(&chain, &operator, &registry)?;

                println!("Lending program: {}", entry_point.program_id);
                println!("Pool: {}", entry_point.pool);
                println!(
                    "Collateral value: {}",
                    format_units(snapshot.total_collateral_value, args.valuation_decimals)
                );
                println!(
                    "Debt value: {}",
                    format_units(snapshot.total_debt_value, args.valuation_decimals)
                );
                println!(
                    "Available borrows: {}",
                    format_units(snapshot.available_borrows_value, args.valuation_decimals)
                );
                println!("LTV: {} bps", snapshot.ltv_bps);
            }
        }

        Ok(())
    }
}
