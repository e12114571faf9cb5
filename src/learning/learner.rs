//! Generic learner assembling a [`LearnerCore`] with one update rule.

use std::sync::Arc;

use super::{
    actor_critic::ActorCritic,
    config::{LearnerConfig, MethodKind},
    core::LearnerCore,
    policy::PolicyTable,
    q_learning::QLearning,
    sarsa::Sarsa,
    stats::Statistics,
    values::ValueFunction,
};
use crate::{
    Result,
    identifiers::{StateId, TransitionId},
    model::ExperimentalModel,
    ports::Learner,
};

/// Value representation plus trial loop of one learning method.
///
/// The action-selection rules only see the rule through
/// [`value_function`](UpdateRule::value_function), so adding a method means
/// supplying a value table and a loop that drives the core.
pub trait UpdateRule: Send {
    const KIND: MethodKind;

    /// Fresh value tables, all zero.
    fn new(model: &ExperimentalModel) -> Self
    where
        Self: Sized;

    fn value_function(&self) -> &dyn ValueFunction;

    /// Walk the graph once from start to end, updating values, policy and
    /// bookkeeping in `core`.
    fn run_trial(&mut self, core: &mut LearnerCore, verbose: bool) -> Result<()>;

    fn state_value(&self, _state: StateId) -> Option<f64> {
        None
    }

    fn action_value(&self, _transition: TransitionId) -> Option<f64> {
        None
    }
}

#[derive(Debug, Clone)]
pub struct RlLearner<R> {
    core: LearnerCore,
    rule: R,
}

pub type ActorCriticLearner = RlLearner<ActorCritic>;
pub type SarsaLearner = RlLearner<Sarsa>;
pub type QLearningLearner = RlLearner<QLearning>;

impl<R: UpdateRule> RlLearner<R> {
    /// Validate `config` and initialise all tables for `model`.
    pub fn new(model: Arc<ExperimentalModel>, config: LearnerConfig) -> Result<Self> {
        let rule = R::new(&model);
        let core = LearnerCore::new(model, config)?;
        log::debug!(
            "{} learner over {} states, {} transitions, {} cues",
            R::KIND,
            core.model().states().len(),
            core.model().transitions().len(),
            core.model().cues().len()
        );
        Ok(Self { core, rule })
    }

    pub fn core(&self) -> &LearnerCore {
        &self.core
    }

    pub fn rule(&self) -> &R {
        &self.rule
    }
}

impl<R: UpdateRule> Learner for RlLearner<R> {
    fn kind(&self) -> MethodKind {
        R::KIND
    }

    fn trial(&mut self, verbose: bool) -> Result<()> {
        self.core.health()?;
        let outcome = self.rule.run_trial(&mut self.core, verbose);
        if let Err(err) = &outcome {
            self.core.poison(err);
        }
        outcome
    }

    fn health(&self) -> Result<()> {
        self.core.health()
    }

    fn reset(&mut self) {
        log::debug!("resetting {} learner", R::KIND);
        self.core.reset();
        self.rule = R::new(self.core.model());
    }

    fn model(&self) -> &ExperimentalModel {
        self.core.model()
    }

    fn config(&self) -> &LearnerConfig {
        self.core.config()
    }

    fn policy(&self) -> &PolicyTable {
        self.core.policy()
    }

    fn statistics(&self) -> &Statistics {
        self.core.statistics()
    }

    fn trials(&self) -> u64 {
        self.core.trials()
    }

    fn state_value(&self, state: StateId) -> Option<f64> {
        self.rule.state_value(state)
    }

    fn action_value(&self, transition: TransitionId) -> Option<f64> {
        self.rule.action_value(transition)
    }
}

/// Construct the learner for `kind` behind the [`Learner`] port.
pub fn build_learner(
    kind: MethodKind,
    model: Arc<ExperimentalModel>,
    config: LearnerConfig,
) -> Result<Box<dyn Learner>> {
    Ok(match kind {
        MethodKind::ActorCritic => Box::new(ActorCriticLearner::new(model, config)?),
        MethodKind::Sarsa => Box::new(SarsaLearner::new(model, config)?),
        MethodKind::QLearning => Box::new(QLearningLearner::new(model, config)?),
    })
}
