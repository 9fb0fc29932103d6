//! CLI subcommands.

pub mod locale;
pub mod migrate;
