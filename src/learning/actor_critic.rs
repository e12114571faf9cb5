//! State-value actor-critic.

use super::{
    config::MethodKind,
    core::{LearnerCore, TrialRecorder},
    learner::UpdateRule,
    values::{StateValues, ValueFunction},
};
use crate::{
    Result,
    identifiers::StateId,
    model::ExperimentalModel,
};

/// Critic over state values V; the actor is the shared preference table.
///
/// Each step: `PE = R(next) + γ·V[next] − V[current]`, `V[current] += η·PE`,
/// `H[choice] += α·PE`.
#[derive(Debug, Clone)]
pub struct ActorCritic {
    values: StateValues,
}

impl ActorCritic {
    pub fn values(&self) -> &StateValues {
        &self.values
    }
}

impl UpdateRule for ActorCritic {
    const KIND: MethodKind = MethodKind::ActorCritic;

    fn new(model: &ExperimentalModel) -> Self {
        Self {
            values: StateValues::new(model),
        }
    }

    fn value_function(&self) -> &dyn ValueFunction {
        &self.values
    }

    fn run_trial(&mut self, core: &mut LearnerCore, verbose: bool) -> Result<()> {
        let model = core.shared_model();
        let (gamma, eta) = (core.config().gamma, core.config().eta);
        let mut trial = TrialRecorder::begin(core, verbose);

        let mut current = model.start();
        while current != model.end() {
            trial.advance(core)?;
            let action = core.pick_required(current)?;
            let next = model.transition(action).to;

            let pe = model.state(next).reward + gamma * self.values.get(next)
                - self.values.get(current);
            self.values.add(current, eta * pe);
            core.reinforce(action, pe);
            core.update_policy(current, &self.values)?;

            trial.record(core, action, pe);
            current = next;
        }
        trial.finish(core);
        Ok(())
    }

    fn state_value(&self, state: StateId) -> Option<f64> {
        Some(self.values.get(state))
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
    fn single_step_update_matches_formula() {
        let mut b = ModelBuilder::new();
        b.add_state("start", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("end", 10.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_chance("start", "end", 1.0).unwrap();
        let model = Arc::new(b.build().unwrap());

        let config = LearnerConfig::for_method(MethodKind::ActorCritic)
            .with_learning_rates(0.5, 0.1)
            .with_gamma(1.0)
            .with_seed(3);
        let mut core = LearnerCore::new(Arc::clone(&model), config).unwrap();
        let mut rule = ActorCritic::new(&model);

        rule.run_trial(&mut core, false).unwrap();
        // PE = 10 + 0 - 0, V[start] = 0.5 * 10
        assert_eq!(rule.state_value(model.start()), Some(5.0));
        rule.run_trial(&mut core, false).unwrap();
        // PE = 10 - 5
        assert_eq!(rule.state_value(model.start()), Some(7.5));

        let edge = core.statistics().transition(model.state(model.start()).outgoing[0]);
        assert_eq!(edge.visits(), 2);
        assert_eq!(edge.pe.mean(), Some(7.5));
        assert_eq!(core.trials(), 2);
    }
}
