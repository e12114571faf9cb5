//! Reinforcement-learning engine.
//!
//! A [`LearnerCore`] owns everything the methods have in common (policy and
//! preference tables, bookkeeping, random stream). An [`UpdateRule`] owns the
//! value table and the trial loop. [`RlLearner`] glues the two together
//! behind the [`Learner`](crate::ports::Learner) port.

pub mod actor_critic;
pub mod config;
pub mod core;
pub mod learner;
mod lookahead;
pub mod policy;
pub mod q_learning;
pub mod report;
pub mod sarsa;
pub mod stats;
pub mod values;

pub use actor_critic::ActorCritic;
pub use config::{ActionSelection, CueCredit, LearnerConfig, MethodKind, PeReport};
pub use self::core::LearnerCore;
pub use learner::{
    ActorCriticLearner, QLearningLearner, RlLearner, SarsaLearner, UpdateRule, build_learner,
};
pub use policy::PolicyTable;
pub use q_learning::QLearning;
pub use report::{CueReport, LearnerReport, StateReport, TransitionReport};
pub use sarsa::Sarsa;
pub use stats::{CueRecord, RunningAverage, StateRecord, Statistics, TransitionRecord};
pub use values::{ActionValues, StateValues, ValueFunction};
