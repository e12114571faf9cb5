//! Repeated-trial driver for a single learner

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    ports::{Learner, Observer},
};

/// Session configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Number of trials to run
    pub trials: usize,

    /// Log every step of every trial
    pub verbose: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            trials: 30_000,
            verbose: false,
        }
    }
}

/// Outcome of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionResult {
    /// Trials run by this session
    pub trials: usize,

    /// Trials completed by the learner since its last reset
    pub learner_trials: u64,
}

/// Runs a learner for a fixed number of trials, notifying observers
pub struct TrialSession {
    config: SessionConfig,
    observers: Vec<Box<dyn Observer>>,
}

impl TrialSession {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            observers: Vec::new(),
        }
    }

    /// Add an observer to the session
    pub fn with_observer(mut self, observer: Box<dyn Observer>) -> Self {
        self.observers.push(observer);
        self
    }

    /// Run the configured number of trials.
    ///
    /// The first failing trial aborts the session and its error is returned;
    /// observers are not told about the end of an aborted run.
    pub fn run(&mut self, learner: &mut dyn Learner) -> Result<SessionResult> {
        log::debug!(
            "running {} learner for {} trials",
            learner.name(),
            self.config.trials
        );
        for observer in &mut self.observers {
            observer.on_run_start(learner, self.config.trials)?;
        }

        for trial in 0..self.config.trials {
            learner.trial(self.config.verbose)?;
            for observer in &mut self.observers {
                observer.on_trial_end(learner, trial)?;
            }
        }

        for observer in &mut self.observers {
            observer.on_run_end(learner)?;
        }
        log::debug!("{} learner finished {} trials", learner.name(), learner.trials());

        Ok(SessionResult {
            trials: self.config.trials,
            learner_trials: learner.trials(),
        })
    }
}
