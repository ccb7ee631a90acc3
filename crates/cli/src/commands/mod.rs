//! Command implementations

pub mod cost;
pub mod fleet;
pub mod instance;
