// Timelock Ledger Library Entry Point

// Module declarations - expose all modules through the library
pub mod core;
pub mod types;
pub mod utils;

// Re-export key components for easier access
pub use crate::core::ledger::access_control::RoleTable;
pub use crate::core::ledger::state_manager::LedgerStateManager;
pub use types::error::{LedgerError, Result};
pub use types::ledger_types::{
    AccountState, Address, Balance, LedgerMetadata, LedgerSnapshot, TimeLock,
};
pub use utils::time::{ManualTimeSource, SystemTimeSource, TimeSource};

/// Returns the version of the crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
