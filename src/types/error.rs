// Error handling module for the timelock ledger
//
// Every rejection is a total rejection: a failed operation leaves the ledger
// state exactly as it was before the call.

use crate::types::ledger_types::Address;
use std::result;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = result::Result<T, LedgerError>;

/// Error type for ledger operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A balance-reducing operation asked for more than the unlocked portion
    #[error("insufficient available balance: requested {requested}, available {available}")]
    InsufficientAvailableBalance {
        /// Amount the caller tried to move
        requested: u128,
        /// Unlocked balance at evaluation time
        available: u128,
    },

    /// Lock creation with a zero amount or an amount exceeding the available balance
    #[error("invalid lock amount: {0}")]
    InvalidAmount(String),

    /// Lock creation with a release time that is not strictly in the future
    #[error("invalid release time {release_time}: not after current time {now}")]
    InvalidTime {
        /// Requested release timestamp
        release_time: u64,
        /// Ledger time at evaluation
        now: u64,
    },

    /// Lock index outside the account's lock list
    #[error("lock index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Current lock list length
        len: usize,
    },

    /// Transfer touching a frozen account, in either direction
    #[error("account {0} is frozen")]
    FrozenAccount(Address),

    /// Transfer attempted while the ledger-wide pause flag is set
    #[error("ledger is paused")]
    Paused,

    /// Caller lacks the role the operation requires
    #[error("caller {0} is not authorized")]
    Unauthorized(Address),
}
