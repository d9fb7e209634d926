// Core Module Declarations
pub mod ledger;
