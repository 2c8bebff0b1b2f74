//! Validation errors shared by the record types.
//!
//! Uses thiserror for ergonomic error definition.

use crate::purse::Denomination;
use thiserror::Error;

/// Bad user input rejected by a record operation.
///
/// Whenever one of these is returned the record is left exactly as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Character name cannot be empty")]
    EmptyName,

    #[error("Item name cannot be empty")]
    EmptyItemName,

    #[error("{field} must be a finite, non-negative number")]
    InvalidNumber { field: &'static str },

    #[error("No item at position {index} (inventory holds {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Not enough {denomination}: have {available}, need {requested}")]
    InsufficientFunds {
        denomination: Denomination,
        available: u32,
        requested: u64,
    },

    #[error("Too much {denomination} to hold")]
    CurrencyOverflow { denomination: Denomination },
}
