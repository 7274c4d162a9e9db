//! CLI subcommand implementations.

pub mod predict;
pub mod summary;
pub mod validate;
