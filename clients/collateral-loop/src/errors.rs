use anchor_lang::prelude::*;

#[error_code]
pub enum LoopError {
    #[msg("Amount too small")]
    AmountTooSmall,

    #[msg("Invalid token amount")]
    InvalidAmount,

    #[msg("Invalid percentage value")]
    InvalidPercentage,

    #[msg("Safety margin must be between 0 and 10000 bps, exclusive")]
    InvalidSafetyMargin,

    #[msg("Invalid interest rate mode")]
    InvalidRateMode,

    #[msg("Invalid address")]
    InvalidAddress,

    #[msg("Invalid keypair")]
    InvalidKeypair,

    #[msg("Operator is not the signing keypair")]
    OperatorMismatch,

    #[msg("Registry account is missing or malformed")]
    InvalidRegistry,

    #[msg("Token mint not found")]
    MintNotFound,

    #[msg("Invalid oracle account")]
    InvalidOracle,

    #[msg("Oracle price must be positive")]
    InvalidOraclePrice,

    #[msg("Oracle round is incomplete")]
    IncompleteOracleRound,

    #[msg("Oracle price is stale")]
    StaleOracle,

    #[msg("Oracle confidence interval too wide")]
    OracleConfidenceTooWide,

    #[msg("Math overflow")]
    MathOverflow,

    #[msg("Borrow amount exceeds available capacity")]
    BorrowCapacityExceeded,

    #[msg("Transaction reverted")]
    TransactionReverted,

    #[msg("Transaction not confirmed before timeout")]
    ConfirmationTimeout,

    #[msg("RPC request failed")]
    RpcFailure,
}

impl LoopError {
    /// Whether `err` was raised as this variant
    pub fn matches(self, err: &anchor_lang::error::Error) -> bool {
        matches!(
            err,
            anchor_lang::error::Error::AnchorError(anchor_err)
                if anchor_err.error_code_number == u32::from(self)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_only_its_own_variant() {
        let err = error!(LoopError::TransactionReverted);
        assert!(LoopError::TransactionReverted.matches(&err));
        assert!(!LoopError::ConfirmationTimeout.matches(&err));

        let err: anchor_lang::error::Error =
            anchor_lang::solana_program::program_error::ProgramError::InvalidArgument.into();
        assert!(!LoopError::TransactionReverted.matches(&err));
    }
}
