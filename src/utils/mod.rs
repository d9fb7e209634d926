// Utility Module Declarations
pub mod time;
