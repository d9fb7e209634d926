// Ledger Module Declarations
pub mod access_control;
pub mod state_manager;

pub use access_control::RoleTable;
pub use state_manager::LedgerStateManager;
