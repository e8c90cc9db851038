use anchor_client::solana_sdk::account::from_account;
use anchor_lang::prelude::*;
use anchor_lang::solana_program::sysvar::clock;

use super::RpcChain;
use crate::errors::LoopError;
use crate::oracle::round_from_pyth;
use crate::roles::{ChainClock, PriceFeed};
use crate::state::PriceRound;

impl PriceFeed for RpcChain {
    /// Latest aggregate of a Pyth price account, unchecked; the workflow validates it
    fn latest_round_data(&self, feed: &Pubkey) -> Result<PriceRound> {
        let mut account = self.fetch_account(feed)?.ok_or_else(|| {
            msg!("Price feed {} does not exist", feed);
            error!(LoopError::InvalidOracle)
        })?;

        require_keys_eq!(account.owner, self.oracle_program, LoopError::InvalidOracle);

        let info = AccountInfo::new(
            feed,
            false,
            false,
            &mut account.lamports,
            &mut account.data,
            &account.owner,
            account.executable,
            account.rent_epoch,
        );

        #[allow(deprecated)]
        let price_feed = pyth_sdk_solana::load_price_feed_from_account_info(&info).map_err(|e| {
            msg!("Price feed {} did not load: {:?}", feed, e);
            error!(LoopError::InvalidOracle)
        })?;

        round_from_pyth(&price_feed.get_price_unchecked())
    }
}

impl ChainClock for RpcChain {
    fn unix_timestamp(&self) -> Result<i64> {
        let account = self
            .fetch_account(&clock::ID)?
            .ok_or(error!(LoopError::RpcFailure))?;
        let clock: Clock = from_account(&account).ok_or(error!(LoopError::RpcFailure))?;
        Ok(clock.unix_timestamp)
    }
}
