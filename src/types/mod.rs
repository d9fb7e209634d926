// Types Module Declarations
pub mod error;
pub mod ledger_types;

// Re-export commonly used types
pub use error::{LedgerError, Result};
pub use ledger_types::{AccountState, Address, Balance, LedgerMetadata, TimeLock};
