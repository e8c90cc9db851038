use anchor_lang::prelude::*;
use crate::constants::*;
use crate::errors::LoopError;
use crate::state::{OraclePrice, PriceRound};

/// Validate the latest round of a feed before using its answer
/// A stale or incomplete round is treated the same as a failed fetch
pub fn validate_round(
    round: &PriceRound,
    now: i64,
    max_age_secs: u64,
    max_confidence_bps: u16,
) -> Result<OraclePrice> {
    // A zero price would otherwise reach the borrow sizing division
    require!(round.answer > 0, LoopError::InvalidOraclePrice);

    require!(round.decimals <= MAX_DECIMALS, LoopError::InvalidOracle);

    require!(
        round.updated_at > 0 && round.answered_in_round >= round.round_id,
        LoopError::IncompleteOracleRound
    );

    // Clock skew can put updated_at slightly ahead of the chain clock
    let age = now.saturating_sub(round.updated_at).max(0) as u64;
    if age > max_age_secs {
        msg!(
            "Oracle round {} is {}s old (max {}s)",
            round.round_id,
            age,
            max_age_secs
        );
        return err!(LoopError::StaleOracle);
    }

    let price = round.answer as u64;

    // confidence / price <= max_confidence_bps / 10000
    let confidence_bps = (round.confidence as u128)
        .checked_mul(BPS_PRECISION as u128)
        .ok_or(error!(LoopError::MathOverflow))?
        .checked_div(price as u128)
        .ok_or(error!(LoopError::MathOverflow))?;
    require!(
        confidence_bps <= max_confidence_bps as u128,
        LoopError::OracleConfidenceTooWide
    );

    Ok(OraclePrice {
        price,
        decimals: round.decimals,
        updated_at: round.updated_at,
    })
}

/// Map a Pyth aggregate price onto the round shape the workflow validates
/// Pyth has no round ids; the publish time stands in and is always complete
pub fn round_from_pyth(price: &pyth_sdk_solana::Price) -> Result<PriceRound> {
    require!(price.expo <= 0, LoopError::InvalidOracle);
    let decimals = u8::try_from(price.expo.unsigned_abs())
        .map_err(|_| error!(LoopError::InvalidOracle))?;

    let round_id = u64::try_from(price.publish_time).unwrap_or_default();

    Ok(PriceRound {
        round_id,
        answer: price.price,
        decimals,
        started_at: price.publish_time,
        updated_at: price.publish_time,
        answered_in_round: round_id,
        confidence: price.conf,
    })
}
