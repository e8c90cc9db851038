pub mod wrap_native;
pub mod resolve_entry_point;
pub mod approve_spend;
pub mod deposit_collateral;
pub mod read_account_state;
pub mod fetch_oracle_price;
pub mod borrow_asset;
pub mod repay_debt;

pub use borrow_asset::BorrowQuote;
