//! Machinery shared by every update rule: transition sampling, policy
//! refresh, per-step bookkeeping and the trial step ceiling.

use std::sync::Arc;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::{
    config::{ActionSelection, LearnerConfig},
    policy::PolicyTable,
    stats::{PeWindow, Statistics, TrialCredit},
    values::ValueFunction,
};
use crate::{
    Error, Result,
    identifiers::{StateId, TransitionId},
    model::{Edge, ExperimentalModel},
    utils::inverse_cdf_index,
};

/// Fatal condition that aborted a trial. Its bookkeeping is left half
/// written, so every later call reports it again until the next reset.
#[derive(Debug, Clone, PartialEq)]
enum Fault {
    DegeneratePolicy { state: String, total: f64 },
    NonTerminatingTrial { steps: usize },
    InvalidGraph { message: String },
}

impl Fault {
    fn capture(err: &Error) -> Option<Self> {
        match err {
            Error::DegeneratePolicy { state, total } => Some(Fault::DegeneratePolicy {
                state: state.clone(),
                total: *total,
            }),
            Error::NonTerminatingTrial { steps } => {
                Some(Fault::NonTerminatingTrial { steps: *steps })
            }
            Error::InvalidGraph { message } => Some(Fault::InvalidGraph {
                message: message.clone(),
            }),
            _ => None,
        }
    }

    fn to_error(&self) -> Error {
        match self {
            Fault::DegeneratePolicy { state, total } => Error::DegeneratePolicy {
                state: state.clone(),
                total: *total,
            },
            Fault::NonTerminatingTrial { steps } => Error::NonTerminatingTrial { steps: *steps },
            Fault::InvalidGraph { message } => Error::InvalidGraph {
                message: message.clone(),
            },
        }
    }
}

fn build_rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_rng(&mut rand::rng())
    }
}

/// Mutable learning state common to all methods.
///
/// Owns the policy, preference and bookkeeping tables for one learner; the
/// graph itself is shared read-only.
#[derive(Debug, Clone)]
pub struct LearnerCore {
    model: Arc<ExperimentalModel>,
    config: LearnerConfig,
    policy: PolicyTable,
    stats: Statistics,
    trials: u64,
    rng: StdRng,
    fault: Option<Fault>,
}

impl LearnerCore {
    pub fn new(model: Arc<ExperimentalModel>, config: LearnerConfig) -> Result<Self> {
        config.validate()?;
        let policy = PolicyTable::new(&model);
        let stats = Statistics::new(&model);
        let rng = build_rng(config.seed);
        Ok(Self {
            model,
            config,
            policy,
            stats,
            trials: 0,
            rng,
            fault: None,
        })
    }

    pub fn model(&self) -> &ExperimentalModel {
        &self.model
    }

    pub fn shared_model(&self) -> Arc<ExperimentalModel> {
        Arc::clone(&self.model)
    }

    pub fn config(&self) -> &LearnerConfig {
        &self.config
    }

    pub fn policy(&self) -> &PolicyTable {
        &self.policy
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Completed trials since construction or the last reset.
    pub fn trials(&self) -> u64 {
        self.trials
    }

    /// `Err` with the fatal error of an aborted trial, if one happened since
    /// construction or the last reset.
    pub fn health(&self) -> Result<()> {
        self.fault.as_ref().map_or(Ok(()), |fault| Err(fault.to_error()))
    }

    /// Remember `err` if it leaves the tables inconsistent.
    pub(crate) fn poison(&mut self, err: &Error) {
        if let Some(fault) = Fault::capture(err) {
            log::warn!("learner poisoned: {err}");
            self.fault = Some(fault);
        }
    }

    /// Reinitialise every table. A seeded learner also replays its random
    /// stream from the start.
    pub(crate) fn reset(&mut self) {
        self.policy = PolicyTable::new(&self.model);
        self.stats = Statistics::new(&self.model);
        self.trials = 0;
        self.rng = build_rng(self.config.seed);
        self.fault = None;
    }

    /// Sample one outgoing transition of `state`, or `None` for the end state.
    ///
    /// Chance edges weigh by their fixed probability, choices by the current
    /// policy. Leaving a deterministic state, a second independent draw below
    /// `noise` replaces the pick by a uniformly random outgoing edge.
    pub(crate) fn pick_transition(&mut self, state: StateId) -> Option<TransitionId> {
        let origin = self.model.state(state);
        if origin.outgoing.is_empty() {
            return None;
        }
        let draw: f64 = self.rng.random();
        let probabilities = origin.outgoing.iter().map(|&t| match self.model.transition(t).edge {
            Edge::Chance { probability } => probability,
            Edge::Choice { .. } => self.policy.probability(t).unwrap_or(0.0),
        });
        let mut picked = origin.outgoing[inverse_cdf_index(probabilities, draw)?];

        if origin.is_deterministic() {
            let slip: f64 = self.rng.random();
            if slip < self.config.noise {
                picked = origin.outgoing[self.rng.random_range(0..origin.out_degree())];
            }
        }
        Some(picked)
    }

    /// Like [`pick_transition`](Self::pick_transition) for a state that must
    /// not be terminal.
    pub(crate) fn pick_required(&mut self, state: StateId) -> Result<TransitionId> {
        self.pick_transition(state)
            .ok_or_else(|| Error::InvalidGraph {
                message: format!("state {} has no outgoing transition", self.model.state(state).name),
            })
    }

    /// `H[transition] += α·pe`; no-op on chance edges.
    pub(crate) fn reinforce(&mut self, transition: TransitionId, pe: f64) {
        self.policy.reinforce(transition, self.config.alpha * pe);
    }

    /// Recompute the optimal choice and the choice distribution of a
    /// deterministic state. Probabilistic states are left alone.
    pub(crate) fn update_policy(&mut self, state: StateId, values: &dyn ValueFunction) -> Result<()> {
        let origin = self.model.state(state);
        if !origin.is_deterministic() {
            return Ok(());
        }
        let optimal = values.optimal_choice(&self.model, state);
        self.policy.set_optimal(state, optimal);

        let config = &self.config;
        let weights: Vec<f64> = origin
            .outgoing
            .iter()
            .map(|&choice| match config.action_selection {
                ActionSelection::Softmax => {
                    (config.beta * self.policy.preference(choice).unwrap_or(0.0)).exp()
                }
                ActionSelection::ProbabilityMatching => values
                    .choice_value(&self.model, choice)
                    .max(config.min_reward),
                ActionSelection::EpsilonGreedy if optimal == Some(choice) => 1.0 - config.epsilon,
                ActionSelection::EpsilonGreedy => config.epsilon / origin.out_degree() as f64,
            })
            .collect();
        self.policy.assign(origin, &weights)
    }
}

/// Per-trial bookkeeping: step ceiling, PE reporting and cue credit.
pub(crate) struct TrialRecorder {
    window: PeWindow,
    credit: TrialCredit,
    steps: usize,
    verbose: bool,
}

impl TrialRecorder {
    pub(crate) fn begin(core: &LearnerCore, verbose: bool) -> Self {
        if verbose {
            log::info!("trial {} begins", core.trials + 1);
        }
        Self {
            window: PeWindow::new(core.config.pe_report),
            credit: TrialCredit::default(),
            steps: 0,
            verbose,
        }
    }

    /// Count a step, failing once the configured ceiling is reached.
    pub(crate) fn advance(&mut self, core: &LearnerCore) -> Result<()> {
        if self.steps >= core.config.max_steps {
            return Err(Error::NonTerminatingTrial { steps: self.steps });
        }
        self.steps += 1;
        Ok(())
    }

    /// Book a completed step along `transition` with its raw prediction error.
    pub(crate) fn record(&mut self, core: &mut LearnerCore, transition: TransitionId, pe: f64) {
        let step = core.model.transition(transition);
        let origin = core.model.state(step.from);
        if self.verbose {
            log::info!(
                "from {} to {}, PE = {pe}",
                origin.name,
                core.model.state(step.to).name
            );
        }
        let reported = self.window.report(pe, origin);
        core.stats.record_step(step, reported);
        self.credit.observe(origin);
    }

    /// Credit the cues seen this trial and count the trial.
    pub(crate) fn finish(self, core: &mut LearnerCore) {
        let terminal = core.model.state(core.model.end());
        self.credit
            .settle(&mut core.stats, core.config.cue_credit, terminal);
        core.trials += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        learning::values::{ActionValues, StateValues},
        model::{ModelBuilder, StateKind},
    };

    fn three_way() -> Arc<ExperimentalModel> {
        let mut b = ModelBuilder::new();
        b.add_state("pick", 0.0, StateKind::Deterministic, None, "")
            .unwrap();
        for leaf in ["a", "b", "c"] {
            b.add_state(leaf, 0.0, StateKind::Probabilistic, None, "")
                .unwrap();
        }
        b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        for leaf in ["a", "b", "c"] {
            b.add_choice("pick", leaf, leaf).unwrap();
            b.add_chance(leaf, "end", 1.0).unwrap();
        }
        Arc::new(b.build().unwrap())
    }

    fn core(config: LearnerConfig) -> LearnerCore {
        LearnerCore::new(three_way(), config.with_seed(11)).unwrap()
    }

    #[test]
    fn invalid_config_is_rejected() {
        let err = LearnerCore::new(three_way(), LearnerConfig::default().with_gamma(2.0));
        assert!(matches!(err, Err(Error::InvalidConfiguration { .. })));
    }

    #[test]
    fn end_state_has_no_transition() {
        let mut core = core(LearnerConfig::default());
        let end = core.model().end();
        assert_eq!(core.pick_transition(end), None);
        assert!(core.pick_required(end).is_err());
    }

    #[test]
    fn policy_refresh_sums_to_one_for_every_rule() {
        for selection in [
            ActionSelection::Softmax,
            ActionSelection::ProbabilityMatching,
            ActionSelection::EpsilonGreedy,
        ] {
            let mut core = core(LearnerConfig::default().with_action_selection(selection));
            let model = core.shared_model();
            let pick = model.start();
            let mut q = ActionValues::new(&model);
            q.add(TransitionId::new(4), 4.0);
            core.reinforce(TransitionId::new(4), 4.0);
            core.update_policy(pick, &q).unwrap();

            let probabilities: Vec<f64> = model
                .state(pick)
                .outgoing
                .iter()
                .map(|&t| core.policy().probability(t).unwrap())
                .collect();
            let total: f64 = probabilities.iter().sum();
            assert!((total - 1.0).abs() < 1e-12, "{selection}: {total}");
            assert!(probabilities.iter().all(|&p| p >= 0.0));
            assert!(probabilities[2] > probabilities[0], "{selection}");
            assert_eq!(core.policy().optimal(pick), Some(TransitionId::new(4)));
        }
    }

    #[test]
    fn epsilon_greedy_weights() {
        let mut core = core(
            LearnerConfig::default()
                .with_action_selection(ActionSelection::EpsilonGreedy)
                .with_epsilon(0.3),
        );
        let model = core.shared_model();
        let v = StateValues::new(&model);
        core.update_policy(model.start(), &v).unwrap();
        // optimal gets 0.7, the other two 0.1 each, total 0.9
        let first = model.state(model.start()).outgoing[0];
        let second = model.state(model.start()).outgoing[1];
        let p_first = core.policy().probability(first).unwrap();
        let p_second = core.policy().probability(second).unwrap();
        assert!((p_first - 0.7 / 0.9).abs() < 1e-12);
        assert!((p_second - 0.1 / 0.9).abs() < 1e-12);
    }

    #[test]
    fn softmax_overflow_is_fatal() {
        let mut core = core(
            LearnerConfig::default()
                .with_action_selection(ActionSelection::Softmax)
                .with_beta(1.0),
        );
        let model = core.shared_model();
        let choice = model.state(model.start()).outgoing[0];
        core.reinforce(choice, 1e4);
        let v = StateValues::new(&model);
        let err = core.update_policy(model.start(), &v).unwrap_err();
        assert!(matches!(err, Error::DegeneratePolicy { .. }));
    }

    #[test]
    fn probabilistic_state_keeps_no_policy() {
        let mut core = core(LearnerConfig::default());
        let model = core.shared_model();
        let leaf = model.state_by_name("a").unwrap().id;
        let v = StateValues::new(&model);
        core.update_policy(leaf, &v).unwrap();
        let out = model.state(leaf).outgoing[0];
        assert_eq!(core.policy().probability(out), None);
        assert_eq!(core.policy().optimal(leaf), None);
        assert_eq!(core.pick_transition(leaf), Some(out));
    }

    #[test]
    fn full_noise_is_uniform() {
        let mut core = core(LearnerConfig::default().with_noise(1.0));
        let model = core.shared_model();
        let mut counts = [0usize; 3];
        for _ in 0..30_000 {
            let t = core.pick_transition(model.start()).unwrap();
            counts[t.index() / 2] += 1;
        }
        for count in counts {
            let frequency = count as f64 / 30_000.0;
            assert!((frequency - 1.0 / 3.0).abs() < 0.02, "{frequency}");
        }
    }

    #[test]
    fn reset_replays_seeded_stream() {
        let mut core = core(LearnerConfig::default());
        let start = core.model().start();
        let first: Vec<_> = (0..20).map(|_| core.pick_transition(start)).collect();
        core.reset();
        let second: Vec<_> = (0..20).map(|_| core.pick_transition(start)).collect();
        assert_eq!(first, second);
    }
}
