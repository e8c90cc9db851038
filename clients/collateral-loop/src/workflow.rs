//! Collateral -> borrow -> repay loop
//!
//! Steps run strictly in order and every mutating step waits for its
//! confirmation before the next one starts. The only branch is skipping the
//! borrow side when there is nothing to borrow. A failure stops the loop at
//! the failing step; nothing already confirmed is rolled back.

use anchor_lang::prelude::*;
use std::fmt;

use crate::config::LoopConfig;
use crate::instructions::*;
use crate::roles::{ChainClock, LendingEntryPoint, Operator, PriceFeed, Registry, WrappedNative};
use crate::state::{AccountSnapshot, EntryPoint, OraclePrice};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Step {
    WrapNative,
    ResolveLendingEntryPoint,
    ApproveCollateral,
    DepositCollateral,
    ReadAccountState,
    FetchOraclePrice,
    ComputeBorrowAmount,
    BorrowAsset,
    ReadBorrowedAccountState,
    ApproveDebt,
    RepayDebt,
    ReadRepaidAccountState,
}

impl Step {
    pub const SEQUENCE: [Step; 12] = [
        Step::WrapNative,
        Step::ResolveLendingEntryPoint,
        Step::ApproveCollateral,
        Step::DepositCollateral,
        Step::ReadAccountState,
        Step::FetchOraclePrice,
        Step::ComputeBorrowAmount,
        Step::BorrowAsset,
        Step::ReadBorrowedAccountState,
        Step::ApproveDebt,
        Step::RepayDebt,
        Step::ReadRepaidAccountState,
    ];

    /// Steps that only run when there is something to borrow
    pub const BORROW_SIDE: [Step; 4] = [
        Step::BorrowAsset,
        Step::ReadBorrowedAccountState,
        Step::ApproveDebt,
        Step::RepayDebt,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Step::WrapNative => "wrap native",
            Step::ResolveLendingEntryPoint => "resolve lending entry point",
            Step::ApproveCollateral => "approve collateral",
            Step::DepositCollateral => "deposit collateral",
            Step::ReadAccountState => "read account state",
            Step::FetchOraclePrice => "fetch oracle price",
            Step::ComputeBorrowAmount => "compute borrow amount",
            Step::BorrowAsset => "borrow asset",
            Step::ReadBorrowedAccountState => "read account state after borrow",
            Step::ApproveDebt => "approve debt",
            Step::RepayDebt => "repay debt",
            Step::ReadRepaidAccountState => "read account state after repay",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Terminal failure of the loop, tagged with the step that failed
#[derive(Debug)]
pub struct StepFailure {
    pub step: Step,
    pub error: anchor_lang::error::Error,
}

impl fmt::Display for StepFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {}", self.step, self.error)
    }
}

impl std::error::Error for StepFailure {}

/// Everything observed during one run of the loop
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoopReport {
    pub wrapped_balance: u64,
    pub entry_point: EntryPoint,
    pub collateral_deposited: u64,
    pub initial_state: AccountSnapshot,
    pub oracle_price: OraclePrice,
    /// Smallest units of the borrow asset; 0 when the borrow side was skipped
    pub borrow_amount: u64,
    pub borrowed_state: Option<AccountSnapshot>,
    pub final_state: AccountSnapshot,
    pub completed: Vec<Step>,
    pub skipped: Vec<Step>,
}

impl LoopReport {
    pub fn borrowed(&self) -> bool {
        self.borrow_amount > 0
    }

    /// Debt left after repaying the borrowed amount (interest accrued in between)
    pub fn residual_debt_value(&self) -> u64 {
        self.final_state.total_debt_value
    }
}

struct Progress {
    completed: Vec<Step>,
}

impl Progress {
    fn run<T>(&mut self, step: Step, result: Result<T>) -> std::result::Result<T, StepFailure> {
        match result {
            Ok(value) => {
                self.completed.push(step);
                Ok(value)
            }
            Err(error) => {
                msg!("Stopped at {}: {}", step, error);
                Err(StepFailure { step, error })
            }
        }
    }
}

/// Run the full loop for `operator`
pub fn run_workflow<C>(
    chain: &C,
    operator: &Operator,
    config: &LoopConfig,
) -> std::result::Result<LoopReport, StepFailure>
where
    C: Registry + LendingEntryPoint + WrappedNative + PriceFeed + ChainClock + ?Sized,
{
    let mut progress = Progress {
        completed: Vec::with_capacity(Step::SEQUENCE.len()),
    };

    let wrapped_balance = progress.run(
        Step::WrapNative,
        wrap_native::handler(chain, operator, &config.wrapped_mint, config.wrap_amount),
    )?;

    let entry_point = progress.run(
        Step::ResolveLendingEntryPoint,
        resolve_entry_point::handler(chain, &config.registry),
    )?;

    progress.run(
        Step::ApproveCollateral,
        approve_spend::handler(
            chain,
            operator,
            &config.wrapped_mint,
            &entry_point.spender(),
            config.wrap_amount,
        ),
    )?;

    progress.run(
        Step::DepositCollateral,
        deposit_collateral::handler(
            chain,
            operator,
            &entry_point,
            &config.wrapped_mint,
            config.wrap_amount,
            config.referral_code,
        ),
    )?;

    let initial_state = progress.run(
        Step::ReadAccountState,
        read_account_state::handler(chain, &entry_point, operator),
    )?;

    let oracle_price = progress.run(
        Step::FetchOraclePrice,
        fetch_oracle_price::handler(
            chain,
            &config.price_feed,
            config.max_oracle_age_secs,
            config.max_confidence_bps,
        ),
    )?;

    let quote = progress.run(
        Step::ComputeBorrowAmount,
        chain.decimals(&config.borrow_mint).and_then(|token_decimals| {
            let quote = BorrowQuote::new(
                &initial_state,
                oracle_price,
                config.safety_margin_bps,
                token_decimals,
                config.valuation_decimals,
            )?;
            msg!("You can borrow {} units of {}", quote.amount, config.borrow_mint);
            Ok(quote)
        }),
    )?;

    let mut skipped = Vec::new();
    let mut borrowed_state = None;
    let mut borrow_amount = 0;

    if quote.amount == 0 {
        msg!("Nothing to borrow, skipping borrow and repay");
        skipped.extend_from_slice(&Step::BORROW_SIDE);
    } else {
        let submitted = progress.run(
            Step::BorrowAsset,
            borrow_asset::requote(chain, operator, &entry_point, config, &quote).and_then(|quote| {
                borrow_asset::handler(
                    chain,
                    operator,
                    &entry_point,
                    &config.borrow_mint,
                    &quote,
                    config.rate_mode,
                    config.referral_code,
                )
                .map(|_| quote)
            }),
        )?;
        borrow_amount = submitted.amount;

        borrowed_state = Some(progress.run(
            Step::ReadBorrowedAccountState,
            read_account_state::handler(chain, &entry_point, operator),
        )?);

        progress.run(
            Step::ApproveDebt,
            approve_spend::handler(
                chain,
                operator,
                &config.borrow_mint,
                &entry_point.spender(),
                borrow_amount,
            ),
        )?;

        progress.run(
            Step::RepayDebt,
            repay_debt::handler(
                chain,
                operator,
                &entry_point,
                &config.borrow_mint,
                borrow_amount,
                config.rate_mode,
            ),
        )?;
    }

    let final_state = progress.run(
        Step::ReadRepaidAccountState,
        read_account_state::handler(chain, &entry_point, operator),
    )?;

    if borrow_amount > 0 && final_state.has_debt() {
        // Interest accrued between borrow and repay; expected, not a reconciliation failure
        msg!(
            "Residual debt of {} left after repaying {}",
            final_state.total_debt_value,
            borrow_amount
        );
    }

    Ok(LoopReport {
        wrapped_balance,
        entry_point,
        collateral_deposited: config.wrap_amount,
        initial_state,
        oracle_price,
        borrow_amount,
        borrowed_state,
        final_state,
        completed: progress.completed,
        skipped,
    })
}

/// Wrap only, reporting the resulting wrapped balance
pub fn wrap_only<C: WrappedNative + ?Sized>(
    chain: &C,
    operator: &Operator,
    config: &LoopConfig,
) -> std::result::Result<u64, StepFailure> {
    let mut progress = Progress {
        completed: Vec::with_capacity(1),
    };
    progress.run(
        Step::WrapNative,
        wrap_native::handler(chain, operator, &config.wrapped_mint, config.wrap_amount),
    )
}

/// Resolve the entry point and read the operator's position without changing it
pub fn show_account<C: Registry + LendingEntryPoint + ?Sized>(
    chain: &C,
    operator: &Operator,
    registry: &Pubkey,
) -> std::result::Result<(EntryPoint, AccountSnapshot), StepFailure> {
    let mut progress = Progress {
        completed: Vec::with_capacity(2),
    };
    let entry_point = progress.run(
        Step::ResolveLendingEntryPoint,
        resolve_entry_point::handler(chain, registry),
    )?;
    let snapshot = progress.run(
        Step::ReadAccountState,
        read_account_state::handler(chain, &entry_point, operator),
    )?;
    Ok((entry_point, snapshot))
}
