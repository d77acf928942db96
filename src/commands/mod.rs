//! Subcommand implementations.

pub mod due;
pub mod query;
pub mod register;
