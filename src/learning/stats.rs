//! Online learning statistics.
//!
//! Every average here is maintained with the incremental-mean recurrence
//! `avg' = (avg·n + x)/(n+1), n' = n+1` and is never recomputed from history.

use serde::{Deserialize, Serialize};

use super::config::{CueCredit, PeReport};
use crate::{
    identifiers::{CueId, StateId, TransitionId},
    model::{ExperimentalModel, State, Transition},
};

/// Incrementally maintained mean of a stream of observations.
///
/// # Examples
///
/// ```
/// use morris_rl::learning::RunningAverage;
///
/// let mut avg = RunningAverage::default();
/// assert_eq!(avg.mean(), None);
/// for x in [1.0, 2.0, 6.0] {
///     avg.push(x);
/// }
/// assert_eq!(avg.count(), 3);
/// assert_eq!(avg.mean(), Some(3.0));
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RunningAverage {
    value: f64,
    count: u64,
}

impl RunningAverage {
    pub fn push(&mut self, x: f64) {
        let n = self.count as f64;
        self.value = (self.value * n + x) / (n + 1.0);
        self.count += 1;
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    /// The average, or `None` before the first observation.
    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then_some(self.value)
    }
}

/// Per-state bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Number of times a transition left this state.
    pub visits: u64,
    /// Reward credited to this state at trial end; cue states only.
    pub reward: RunningAverage,
}

/// Per-transition bookkeeping. The visit count is the count of the PE average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub pe: RunningAverage,
}

impl TransitionRecord {
    pub fn visits(&self) -> u64 {
        self.pe.count()
    }
}

/// Per-cue bookkeeping. The visit count is the count of the reward average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CueRecord {
    pub reward: RunningAverage,
}

impl CueRecord {
    pub fn visits(&self) -> u64 {
        self.reward.count()
    }
}

/// All bookkeeping records of one learner, indexed by graph id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statistics {
    states: Vec<StateRecord>,
    transitions: Vec<TransitionRecord>,
    cues: Vec<CueRecord>,
}

impl Statistics {
    pub fn new(model: &ExperimentalModel) -> Self {
        Self {
            states: vec![StateRecord::default(); model.states().len()],
            transitions: vec![TransitionRecord::default(); model.transitions().len()],
            cues: vec![CueRecord::default(); model.cues().len()],
        }
    }

    pub fn state(&self, id: StateId) -> &StateRecord {
        &self.states[id.index()]
    }

    pub fn transition(&self, id: TransitionId) -> &TransitionRecord {
        &self.transitions[id.index()]
    }

    pub fn cue(&self, id: CueId) -> &CueRecord {
        &self.cues[id.index()]
    }

    /// Fraction of departures from the origin state that took `transition`.
    pub fn measured_probability(
        &self,
        model: &ExperimentalModel,
        transition: TransitionId,
    ) -> Option<f64> {
        let origin = self.state(model.transition(transition).from).visits;
        (origin > 0).then(|| self.transition(transition).visits() as f64 / origin as f64)
    }

    /// Record one step along `transition` with its reported prediction error.
    pub(crate) fn record_step(&mut self, transition: &Transition, reported_pe: f64) {
        self.transitions[transition.id.index()].pe.push(reported_pe);
        self.states[transition.from.index()].visits += 1;
    }
}

/// Sliding window over the last prediction errors of a trial.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PeWindow {
    report: PeReport,
    previous: f64,
    before_previous: f64,
}

impl PeWindow {
    pub(crate) fn new(report: PeReport) -> Self {
        Self {
            report,
            previous: 0.0,
            before_previous: 0.0,
        }
    }

    /// Error to record for a step leaving `origin`, then shift the window.
    pub(crate) fn report(&mut self, pe: f64, origin: &State) -> f64 {
        let reported = match self.report {
            PeReport::Immediate => pe,
            PeReport::OneStep => pe + self.previous,
            PeReport::TwoStep => pe + self.previous + self.before_previous,
            PeReport::CueDeferred if origin.cue.is_some() => self.previous,
            PeReport::CueDeferred => pe,
        };
        self.before_previous = self.previous;
        self.previous = pe;
        reported
    }
}

/// Cues and cue states seen so far in a trial, with the reward each has
/// accumulated since it was first seen.
#[derive(Debug, Clone, Default)]
pub(crate) struct TrialCredit {
    cues: Vec<(CueId, f64)>,
    cue_states: Vec<(StateId, f64)>,
}

impl TrialCredit {
    /// Account for departing `state`.
    pub(crate) fn observe(&mut self, state: &State) {
        if let Some(cue) = state.cue {
            if !self.cues.iter().any(|&(seen, _)| seen == cue) {
                self.cues.push((cue, 0.0));
            }
            if !self.cue_states.iter().any(|&(seen, _)| seen == state.id) {
                self.cue_states.push((state.id, 0.0));
            }
        }
        self.accrue(state.reward);
    }

    fn accrue(&mut self, reward: f64) {
        for (_, total) in &mut self.cues {
            *total += reward;
        }
        for (_, total) in &mut self.cue_states {
            *total += reward;
        }
    }

    /// Credit every cue and cue state seen this trial exactly once.
    pub(crate) fn settle(
        mut self,
        stats: &mut Statistics,
        credit: CueCredit,
        terminal: &State,
    ) {
        if credit == CueCredit::IncludeTerminal {
            self.accrue(terminal.reward);
        }
        for (cue, total) in self.cues {
            stats.cues[cue.index()].reward.push(total);
        }
        for (state, total) in self.cue_states {
            stats.states[state.index()].reward.push(total);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ModelBuilder, StateKind};

    fn cued_chain() -> ExperimentalModel {
        let mut b = ModelBuilder::new();
        let cue = b.add_cue("cue", 5.0).unwrap();
        b.add_state("fix", 1.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("shown", 2.0, StateKind::Probabilistic, Some(cue), "")
            .unwrap();
        b.add_state("juice", 10.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_state("end", 100.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_chance("fix", "shown", 1.0).unwrap();
        b.add_chance("shown", "juice", 1.0).unwrap();
        b.add_chance("juice", "end", 1.0).unwrap();
        b.build().unwrap()
    }

    #[test]
    fn replaying_observations_is_deterministic() {
        let xs = [0.3, -1.2, 4.5, 2.25, 0.0, 7.0];
        let mut a = RunningAverage::default();
        let mut b = RunningAverage::default();
        xs.iter().for_each(|&x| a.push(x));
        xs.iter().for_each(|&x| b.push(x));
        assert_eq!(a, b);
        assert_eq!(a.count(), xs.len() as u64);
        let direct = xs.iter().sum::<f64>() / xs.len() as f64;
        assert!((a.mean().unwrap() - direct).abs() < 1e-12);
    }

    #[test]
    fn pe_window_variants() {
        let model = cued_chain();
        let plain = model.state_by_name("fix").unwrap();
        let cued = model.state_by_name("shown").unwrap();
        let steps = [1.0, 2.0, 4.0];

        let run = |report: PeReport, origins: [&State; 3]| {
            let mut window = PeWindow::new(report);
            steps
                .iter()
                .zip(origins)
                .map(|(&pe, origin)| window.report(pe, origin))
                .collect::<Vec<_>>()
        };

        let origins = [plain, plain, plain];
        assert_eq!(run(PeReport::Immediate, origins), vec![1.0, 2.0, 4.0]);
        assert_eq!(run(PeReport::OneStep, origins), vec![1.0, 3.0, 6.0]);
        assert_eq!(run(PeReport::TwoStep, origins), vec![1.0, 3.0, 7.0]);
        assert_eq!(
            run(PeReport::CueDeferred, [plain, cued, plain]),
            vec![1.0, 1.0, 4.0]
        );
    }

    #[test]
    fn cue_credit_accumulates_from_cue_onwards() {
        let model = cued_chain();
        for (credit, expected) in [
            (CueCredit::Cumulative, 12.0),
            (CueCredit::IncludeTerminal, 112.0),
        ] {
            let mut stats = Statistics::new(&model);
            let mut trial = TrialCredit::default();
            for name in ["fix", "shown", "juice"] {
                trial.observe(model.state_by_name(name).unwrap());
            }
            trial.settle(&mut stats, credit, model.state(model.end()));

            let cue = model.cue_by_name("cue").unwrap().id;
            assert_eq!(stats.cue(cue).reward.mean(), Some(expected));
            assert_eq!(stats.cue(cue).visits(), 1);
            let shown = model.state_by_name("shown").unwrap().id;
            assert_eq!(stats.state(shown).reward.mean(), Some(expected));
            let fix = model.state_by_name("fix").unwrap().id;
            assert_eq!(stats.state(fix).reward.count(), 0);
        }
    }

    #[test]
    fn cue_seen_twice_is_credited_once() {
        let model = cued_chain();
        let mut stats = Statistics::new(&model);
        let mut trial = TrialCredit::default();
        let shown = model.state_by_name("shown").unwrap();
        trial.observe(shown);
        trial.observe(shown);
        trial.settle(&mut stats, CueCredit::Cumulative, model.state(model.end()));
        let cue = shown.cue.unwrap();
        assert_eq!(stats.cue(cue).visits(), 1);
        assert_eq!(stats.cue(cue).reward.mean(), Some(4.0));
    }

    #[test]
    fn measured_probability_needs_visits() {
        let model = cued_chain();
        let mut stats = Statistics::new(&model);
        let first = TransitionId::new(0);
        assert_eq!(stats.measured_probability(&model, first), None);
        stats.record_step(model.transition(first), 0.5);
        assert_eq!(stats.measured_probability(&model, first), Some(1.0));
        assert_eq!(stats.state(model.start()).visits, 1);
    }
}
