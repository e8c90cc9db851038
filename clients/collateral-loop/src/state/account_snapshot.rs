use anchor_lang::prelude::*;

/// Aggregated position of one user in a lending pool
/// All values are in the pool's valuation unit (USD, `VALUATION_DECIMALS`)
#[derive(AnchorSerialize, AnchorDeserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AccountSnapshot {
    /// Value of everything the user has posted as collateral
    pub total_collateral_value: u64,

    /// Value of outstanding debt, including accrued interest
    pub total_debt_value: u64,

    /// Value the user can still borrow
    pub available_borrows_value: u64,

    /// Weighted liquidation threshold in basis points
    pub current_liquidation_threshold_bps: u16,

    /// Weighted loan-to-value in basis points
    pub ltv_bps: u16,

    /// Health factor in WAD (1e18 = 1.0), u128::MAX when there is no debt
    pub health_factor: u128,
}

impl AccountSnapshot {
    pub const LEN: usize = 8 + // discriminator
        8 + // total_collateral_value
        8 + // total_debt_value
        8 + // available_borrows_value
        2 + // current_liquidation_threshold_bps
        2 + // ltv_bps
        16; // health_factor

    pub fn has_debt(&self) -> bool {
        self.total_debt_value > 0
    }
}
