//! Observer port - hooks into a training session
//!
//! Observers see the learner after every trial without being able to change
//! it, which keeps progress display and data collection out of the learning
//! loop.

use crate::{Result, ports::Learner};

/// Observer trait for monitoring a session
///
/// # Event Sequence
///
/// 1. `on_run_start(learner, total_trials)` - once at the beginning
/// 2. `on_trial_end(learner, trial)` - after each completed trial
/// 3. `on_run_end(learner)` - once after the last trial
///
/// # Examples
///
/// ```no_run
/// use morris_rl::ports::{Learner, Observer};
///
/// struct StartVisits(Vec<u64>);
///
/// impl Observer for StartVisits {
///     fn on_trial_end(&mut self, learner: &dyn Learner, _trial: usize) -> morris_rl::Result<()> {
///         let start = learner.model().start();
///         self.0.push(learner.statistics().state(start).visits);
///         Ok(())
///     }
/// }
/// ```
pub trait Observer: Send {
    /// Called when the session starts.
    fn on_run_start(&mut self, _learner: &dyn Learner, _total_trials: usize) -> Result<()> {
        Ok(())
    }

    /// Called after each trial; `trial` is 0-based within the session.
    fn on_trial_end(&mut self, _learner: &dyn Learner, _trial: usize) -> Result<()> {
        Ok(())
    }

    /// Called once the last trial has completed.
    fn on_run_end(&mut self, _learner: &dyn Learner) -> Result<()> {
        Ok(())
    }
}
