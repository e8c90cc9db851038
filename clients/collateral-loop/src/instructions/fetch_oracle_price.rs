use anchor_lang::prelude::*;
use crate::oracle::validate_round;
use crate::roles::{ChainClock, PriceFeed};
use crate::state::OraclePrice;

/// Latest validated price of the borrow asset
pub fn handler<C: PriceFeed + ChainClock + ?Sized>(
    chain: &C,
    feed: &Pubkey,
    max_age_secs: u64,
    max_confidence_bps: u16,
) -> Result<OraclePrice> {
    let round = chain.latest_round_data(feed)?;
    let now = chain.unix_timestamp()?;

    let price = validate_round(&round, now, max_age_secs, max_confidence_bps)?;

    msg!(
        "Borrow asset price is {} (10^-{}), round {}",
        price.price,
        price.decimals,
        round.round_id
    );

    Ok(price)
}
