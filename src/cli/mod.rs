//! CLI infrastructure for the morris toolkit
//!
//! This module provides the command-line interface for training learners on
//! task models and computing their figures.

pub mod commands;
pub mod config;
pub mod output;

pub use config::RunConfig;
