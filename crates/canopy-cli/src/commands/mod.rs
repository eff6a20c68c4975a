//! CLI command implementations.

pub mod clean;
pub mod list;
pub mod rehost;
pub mod upload;
