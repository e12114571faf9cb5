//! Learner port - the surface every learning method exposes
//!
//! Drivers only ever run trials and reset; the analysis layer and reports
//! only ever read. Both go through this trait so they work with any method.

use crate::{
    Result,
    identifiers::{StateId, TransitionId},
    learning::{LearnerConfig, MethodKind, PolicyTable, Statistics},
    model::ExperimentalModel,
};

/// Learner trait - unified interface over actor-critic, SARSA and Q-learning
///
/// # Examples
///
/// ```no_run
/// use morris_rl::{ports::Learner, Result};
///
/// fn train(learner: &mut dyn Learner, trials: usize) -> Result<()> {
///     for _ in 0..trials {
///         learner.trial(false)?;
///     }
///     Ok(())
/// }
/// ```
pub trait Learner: Send {
    fn kind(&self) -> MethodKind;

    /// Get the learner's name.
    ///
    /// Used for identification in reports and logging.
    fn name(&self) -> &str {
        self.kind().as_str()
    }

    /// Run one trial from the start state to the end state.
    ///
    /// With `verbose` set, every step is logged at `info` level. The flag
    /// never affects numerical state.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DegeneratePolicy`](crate::Error::DegeneratePolicy)
    /// when a policy refresh cannot be normalised and
    /// [`Error::NonTerminatingTrial`](crate::Error::NonTerminatingTrial) when
    /// the step ceiling is hit before the end state.
    fn trial(&mut self, verbose: bool) -> Result<()>;

    /// Reinitialise policy, preference, value and bookkeeping tables.
    ///
    /// Hyperparameters are kept; changing them requires a new learner.
    fn reset(&mut self);

    /// The fatal error of an aborted trial, if any.
    ///
    /// A trial that fails midway leaves its steps half booked, so the learner
    /// refuses further trials and analysis with that error until
    /// [`reset`](Learner::reset).
    fn health(&self) -> Result<()> {
        Ok(())
    }

    fn model(&self) -> &ExperimentalModel;

    fn config(&self) -> &LearnerConfig;

    fn policy(&self) -> &PolicyTable;

    fn statistics(&self) -> &Statistics;

    /// Completed trials since construction or the last reset.
    fn trials(&self) -> u64;

    /// Learned state value V, for state-value methods.
    fn state_value(&self, _state: StateId) -> Option<f64> {
        None
    }

    /// Learned action value Q, for action-value methods.
    fn action_value(&self, _transition: TransitionId) -> Option<f64> {
        None
    }
}
