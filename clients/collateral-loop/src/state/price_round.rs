/// Latest round reported by a price feed
/// `answer` is scaled by 10^`decimals`
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PriceRound {
    pub round_id: u64,
    pub answer: i64,
    pub decimals: u8,
    pub started_at: i64,
    pub updated_at: i64,
    pub answered_in_round: u64,
    /// Confidence interval in the same scale as `answer`, 0 if the feed has none
    pub confidence: u64,
}

/// A validated price, ready for borrow sizing
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OraclePrice {
    pub price: u64,
    pub decimals: u8,
    pub updated_at: i64,
}
