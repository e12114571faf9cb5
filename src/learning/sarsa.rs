//! On-policy action-value learning.

use super::{
    config::MethodKind,
    core::LearnerCore,
    learner::UpdateRule,
    lookahead::{self, Bootstrap},
    values::{ActionValues, ValueFunction},
};
use crate::{Result, identifiers::TransitionId, model::ExperimentalModel};

/// SARSA over per-transition values Q.
///
/// `PE = R(next) + γ·Q[a'] − Q[a]` where `a'` is the edge sampled out of
/// `next`, and the edge taken on the following step.
#[derive(Debug, Clone)]
pub struct Sarsa {
    values: ActionValues,
}

impl Sarsa {
    pub fn values(&self) -> &ActionValues {
        &self.values
    }
}

impl UpdateRule for Sarsa {
    const KIND: MethodKind = MethodKind::Sarsa;

    fn new(model: &ExperimentalModel) -> Self {
        Self {
            values: ActionValues::new(model),
        }
    }

    fn value_function(&self) -> &dyn ValueFunction {
        &self.values
    }

    fn run_trial(&mut self, core: &mut LearnerCore, verbose: bool) -> Result<()> {
        lookahead::run_trial(&mut self.values, Bootstrap::Sampled, core, verbose)
    }

    fn action_value(&self, transition: TransitionId) -> Option<f64> {
        Some(self.values.get(transition))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        learning::config::LearnerConfig,
        model::{ModelBuilder, StateKind},
    };

    #[test]
    fn two_step_chain_bootstraps_on_next_edge() {
        let mut b = ModelBuilder::new();
        b.add_state("start", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("mid", 2.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("end", 10.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_chance("start", "mid", 1.0).unwrap();
        b.add_chance("mid", "end", 1.0).unwrap();
        let model = Arc::new(b.build().unwrap());

        let config = LearnerConfig::for_method(MethodKind::Sarsa)
            .with_learning_rates(0.5, 0.1)
            .with_gamma(1.0)
            .with_seed(5);
        let mut core = LearnerCore::new(Arc::clone(&model), config).unwrap();
        let mut rule = Sarsa::new(&model);
        rule.run_trial(&mut core, false).unwrap();

        let first = TransitionId::new(0);
        let second = TransitionId::new(1);
        // Q[first]: PE = 2 + Q[second] (0) - 0 = 2
        assert_eq!(rule.action_value(first), Some(1.0));
        // Q[second]: PE = 10 + 0 - 0 = 10
        assert_eq!(rule.action_value(second), Some(5.0));
        // one-step report: 10 + 2
        assert_eq!(core.statistics().transition(second).pe.mean(), Some(12.0));
        assert_eq!(core.statistics().transition(first).pe.mean(), Some(2.0));
    }
}
