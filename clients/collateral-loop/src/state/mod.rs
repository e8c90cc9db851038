use anchor_lang::prelude::*;
use std::fmt;
use std::str::FromStr;

use crate::errors::LoopError;

pub mod account_snapshot;
pub mod entry_point;
pub mod price_round;

pub use account_snapshot::*;
pub use entry_point::*;
pub use price_round::*;

/// Interest accrual mode of a borrow
/// Stable borrowing is disabled on most pools, so `Variable` is the default
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RateMode {
    Stable,
    #[default]
    Variable,
}

impl RateMode {
    /// Wire value expected by the lending program
    pub fn code(self) -> u8 {
        match self {
            RateMode::Stable => 1,
            RateMode::Variable => 2,
        }
    }
}

impl FromStr for RateMode {
    type Err = anchor_lang::error::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "stable" | "1" => Ok(RateMode::Stable),
            "variable" | "2" => Ok(RateMode::Variable),
            _ => err!(LoopError::InvalidRateMode),
        }
    }
}

impl fmt::Display for RateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateMode::Stable => write!(f, "stable"),
            RateMode::Variable => write!(f, "variable"),
        }
    }
}
