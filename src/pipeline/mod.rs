//! Session pipeline
//!
//! This module provides:
//! - A driver that runs a learner for K trials
//! - Observers that watch the learner between trials

pub mod observers;
pub mod session;

pub use observers::ProgressObserver;
pub use session::{SessionConfig, SessionResult, TrialSession};

pub use crate::ports::{Learner, Observer};
