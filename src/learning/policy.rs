//! Policy, preference (H) and optimal-choice tables.
//!
//! Only choice transitions carry entries. Chance transitions keep their fixed
//! probability on the graph and are never represented here.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    identifiers::{StateId, TransitionId},
    model::{ExperimentalModel, State},
    utils::normalize_weights,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyTable {
    probability: Vec<Option<f64>>,
    preference: Vec<Option<f64>>,
    optimal: Vec<Option<TransitionId>>,
}

impl PolicyTable {
    /// Uniform policy and zero preference over every deterministic state's
    /// choices.
    pub fn new(model: &ExperimentalModel) -> Self {
        let mut probability = vec![None; model.transitions().len()];
        let mut preference = vec![None; model.transitions().len()];
        for state in model.states().iter().filter(|s| s.is_deterministic()) {
            let uniform = 1.0 / state.out_degree() as f64;
            for &choice in &state.outgoing {
                probability[choice.index()] = Some(uniform);
                preference[choice.index()] = Some(0.0);
            }
        }
        Self {
            probability,
            preference,
            optimal: vec![None; model.states().len()],
        }
    }

    /// Current selection probability of a choice; `None` for chance edges.
    pub fn probability(&self, transition: TransitionId) -> Option<f64> {
        self.probability[transition.index()]
    }

    /// Accumulated preference H of a choice; `None` for chance edges.
    pub fn preference(&self, transition: TransitionId) -> Option<f64> {
        self.preference[transition.index()]
    }

    /// Cached optimal choice as of the state's last policy refresh.
    pub fn optimal(&self, state: StateId) -> Option<TransitionId> {
        self.optimal[state.index()]
    }

    pub(crate) fn set_optimal(&mut self, state: StateId, choice: Option<TransitionId>) {
        self.optimal[state.index()] = choice;
    }

    /// `H[choice] += delta`; chance edges are left untouched.
    pub(crate) fn reinforce(&mut self, transition: TransitionId, delta: f64) {
        if let Some(h) = self.preference[transition.index()].as_mut() {
            *h += delta;
        }
    }

    /// Replace the distribution over `state`'s choices by the normalised
    /// `weights` (one per outgoing edge, in edge order).
    pub(crate) fn assign(&mut self, state: &State, weights: &[f64]) -> Result<()> {
        debug_assert_eq!(weights.len(), state.out_degree());
        let normalized = normalize_weights(weights).ok_or_else(|| Error::DegeneratePolicy {
            state: state.name.clone(),
            total: weights.iter().sum(),
        })?;
        for (&choice, p) in state.outgoing.iter().zip(normalized) {
            self.probability[choice.index()] = Some(p);
        }
        Ok(())
    }
}
