//! Off-policy action-value learning.

use super::{
    config::MethodKind,
    core::LearnerCore,
    learner::UpdateRule,
    lookahead::{self, Bootstrap},
    values::{ActionValues, ValueFunction},
};
use crate::{Result, identifiers::TransitionId, model::ExperimentalModel};

/// Q-learning over per-transition values Q.
///
/// Sampling follows the behaviour policy exactly as SARSA does; only the
/// bootstrap differs. When the next state is deterministic the target is
/// its greedy choice, recomputed from the current Q rather than read from
/// the policy cache.
#[derive(Debug, Clone)]
pub struct QLearning {
    values: ActionValues,
}

impl QLearning {
    pub fn values(&self) -> &ActionValues {
        &self.values
    }
}

impl UpdateRule for QLearning {
    const KIND: MethodKind = MethodKind::QLearning;

    fn new(model: &ExperimentalModel) -> Self {
        Self {
            values: ActionValues::new(model),
        }
    }

    fn value_function(&self) -> &dyn ValueFunction {
        &self.values
    }

    fn run_trial(&mut self, core: &mut LearnerCore, verbose: bool) -> Result<()> {
        lookahead::run_trial(&mut self.values, Bootstrap::Greedy, core, verbose)
    }

    fn action_value(&self, transition: TransitionId) -> Option<f64> {
        Some(self.values.get(transition))
    }
}
