//! Value tables: per-state V for the actor-critic, per-transition Q for the
//! action-value learners.

use serde::{Deserialize, Serialize};

use crate::{
    identifiers::{StateId, TransitionId},
    model::ExperimentalModel,
};

/// Value estimate that action selection can consult.
pub trait ValueFunction {
    /// Value the policy attaches to taking `choice`.
    fn choice_value(&self, model: &ExperimentalModel, choice: TransitionId) -> f64;

    /// Highest-valued outgoing choice of a deterministic state.
    ///
    /// Ties go to the first choice in edge order. Probabilistic states have no
    /// optimal choice.
    fn optimal_choice(&self, model: &ExperimentalModel, state: StateId) -> Option<TransitionId> {
        let origin = model.state(state);
        if !origin.is_deterministic() {
            return None;
        }
        let mut best = None;
        let mut best_value = f64::NEG_INFINITY;
        for &choice in &origin.outgoing {
            let value = self.choice_value(model, choice);
            if value > best_value {
                best = Some(choice);
                best_value = value;
            }
        }
        best
    }
}

/// State values V, all starting at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateValues {
    values: Vec<f64>,
}

impl StateValues {
    pub fn new(model: &ExperimentalModel) -> Self {
        Self {
            values: vec![0.0; model.states().len()],
        }
    }

    pub fn get(&self, state: StateId) -> f64 {
        self.values[state.index()]
    }

    pub(crate) fn add(&mut self, state: StateId, delta: f64) {
        self.values[state.index()] += delta;
    }
}

impl ValueFunction for StateValues {
    /// A choice is worth the value of the state it leads to.
    fn choice_value(&self, model: &ExperimentalModel, choice: TransitionId) -> f64 {
        self.get(model.transition(choice).to)
    }
}

/// Action values Q, one per transition, all starting at zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionValues {
    values: Vec<f64>,
}

impl ActionValues {
    pub fn new(model: &ExperimentalModel) -> Self {
        Self {
            values: vec![0.0; model.transitions().len()],
        }
    }

    pub fn get(&self, transition: TransitionId) -> f64 {
        self.values[transition.index()]
    }

    pub(crate) fn add(&mut self, transition: TransitionId, delta: f64) {
        self.values[transition.index()] += delta;
    }
}

impl ValueFunction for ActionValues {
    fn choice_value(&self, _model: &ExperimentalModel, choice: TransitionId) -> f64 {
        self.get(choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelBuilder, StateKind};

    fn fork() -> ExperimentalModel {
        let mut b = ModelBuilder::new();
        b.add_state("pick", 0.0, StateKind::Deterministic, None, "")
            .unwrap();
        b.add_state("a", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("b", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_choice("pick", "a", "left").unwrap();
        b.add_choice("pick", "b", "right").unwrap();
        b.add_chance("a", "end", 1.0).unwrap();
        b.add_chance("b", "end", 1.0).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn ties_go_to_first_choice() {
        let model = fork();
        let q = ActionValues::new(&model);
        assert_eq!(
            q.optimal_choice(&model, model.start()),
            Some(TransitionId::new(0))
        );
    }

    #[test]
    fn optimal_follows_highest_value() {
        let model = fork();
        let mut q = ActionValues::new(&model);
        q.add(TransitionId::new(1), 2.0);
        assert_eq!(
            q.optimal_choice(&model, model.start()),
            Some(TransitionId::new(1))
        );

        let mut v = StateValues::new(&model);
        v.add(model.state_by_name("a").unwrap().id, 1.0);
        assert_eq!(
            v.optimal_choice(&model, model.start()),
            Some(TransitionId::new(0))
        );
    }

    #[test]
    fn probabilistic_state_has_no_optimal_choice() {
        let model = fork();
        let v = StateValues::new(&model);
        let a = model.state_by_name("a").unwrap().id;
        assert_eq!(v.optimal_choice(&model, a), None);
    }
}
