//! Subcommands of the `morris` binary

pub mod describe;
pub mod run;
