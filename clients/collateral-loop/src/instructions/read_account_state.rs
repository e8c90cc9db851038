use anchor_lang::prelude::*;
use crate::roles::{LendingEntryPoint, Operator};
use crate::state::{AccountSnapshot, EntryPoint};

/// Fresh read of the operator's pool position
pub fn handler<L: LendingEntryPoint + ?Sized>(
    lending: &L,
    entry_point: &EntryPoint,
    operator: &Operator,
) -> Result<AccountSnapshot> {
    let snapshot = lending.user_account_data(entry_point, &operator.authority)?;

    msg!("You have {} worth of collateral deposited.", snapshot.total_collateral_value);
    msg!("You have {} worth of debt.", snapshot.total_debt_value);
    msg!("You can borrow {} worth more.", snapshot.available_borrows_value);

    Ok(snapshot)
}
