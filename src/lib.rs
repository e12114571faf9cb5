//! Reinforcement learning on behavioural decision graphs
//!
//! This crate provides:
//! - A decision-graph model of a behavioural task, built in code or read from text
//! - Actor-critic, SARSA and Q-learning agents with shared policy and statistics bookkeeping
//! - Dopamine-proxy figure analysis over a trained agent
//! - A session driver, figure export and a command-line front end

pub mod analysis;
pub mod cli;
pub mod error;
pub mod export;
pub mod identifiers;
pub mod learning;
pub mod model;
pub mod pipeline;
pub mod ports;
pub mod utils;

pub use error::{Error, Result};
pub use learning::{LearnerConfig, MethodKind, build_learner};
pub use model::{ExperimentalModel, ModelBuilder};
pub use ports::Learner;
