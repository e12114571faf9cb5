//! Dopamine-proxy and choice-behaviour figures computed from a trained
//! learner's bookkeeping.
//!
//! Every quantity is a visit-weighted average of per-transition records.
//! Where a parent record and its children both count visits, the children
//! must add up to the parent exactly; a disagreement is reported as
//! [`Error::VisitCountMismatch`] rather than tolerated. Children that were
//! never visited carry zero weight and are skipped.
//!
//! Reward states name the reference cue whose outcome they deliver through
//! their `extra` tag; that tag is the only link between a decision-trial
//! action and the reference cue it is compared with.

use std::fmt;

use super::{
    figure::{Figure, FigureId, PlotKind, Point, Series},
    layout::TaskLayout,
};
use crate::{
    Error, Result,
    identifiers::{CueId, StateId, TransitionId},
    learning::Statistics,
    model::{Cue, ExperimentalModel, State},
    ports::Learner,
    utils::weighted_sum,
};

/// Baseline added to prediction errors before they are read as a dopamine
/// response.
pub const DEFAULT_BIAS: f64 = 75.0;

const PE_LABEL: &str = "PE ~ Dopamine response";
const PAIR_LABEL: &str = "State (pair)";

fn insufficient(what: String) -> Error {
    Error::InsufficientData { what }
}

fn check_counts(what: impl FnOnce() -> String, expected: u64, actual: u64) -> Result<()> {
    if expected == actual {
        Ok(())
    } else {
        Err(Error::VisitCountMismatch {
            what: what(),
            expected,
            actual,
        })
    }
}

/// Read-only figure computations over one learner.
pub struct Morris<'a> {
    learner: &'a dyn Learner,
    layout: TaskLayout,
    bias: f64,
}

impl fmt::Debug for Morris<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Morris")
            .field("learner", &self.learner.name())
            .field("layout", &self.layout)
            .field("bias", &self.bias)
            .finish()
    }
}

impl<'a> Morris<'a> {
    /// Validate `layout` against the learner's graph. A learner whose last
    /// trial aborted is rejected with that trial's error.
    pub fn new(learner: &'a dyn Learner, layout: TaskLayout, bias: f64) -> Result<Self> {
        learner.health()?;
        layout.validate(learner.model())?;
        Ok(Self {
            learner,
            layout,
            bias,
        })
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn layout(&self) -> &TaskLayout {
        &self.layout
    }

    fn model(&self) -> &'a ExperimentalModel {
        self.learner.model()
    }

    fn stats(&self) -> &'a Statistics {
        self.learner.statistics()
    }

    /// `(PE average, visits)` of a transition; never-taken edges weigh zero.
    fn pe_sample(&self, transition: TransitionId) -> (f64, u64) {
        let record = self.stats().transition(transition);
        (record.pe.mean().unwrap_or(0.0), record.visits())
    }

    fn describe(&self, transition: TransitionId) -> String {
        let model = self.model();
        let t = model.transition(transition);
        format!("{} -> {}", model.state(t.from).name, model.state(t.to).name)
    }

    /// Cue named by a reward state's tag.
    pub fn tagged_cue(&self, state: &State) -> Result<&'a Cue> {
        self.model()
            .cue_by_name(&state.extra)
            .ok_or_else(|| Error::UnknownCueTag {
                state: state.name.clone(),
                tag: state.extra.clone(),
            })
    }

    pub fn cue_reward(&self, cue: CueId) -> Result<f64> {
        self.stats()
            .cue(cue)
            .reward
            .mean()
            .ok_or_else(|| insufficient(format!("cue '{}' was never seen", self.model().cue(cue).name)))
    }

    pub fn state_reward(&self, state: StateId) -> Result<f64> {
        self.stats()
            .state(state)
            .reward
            .mean()
            .ok_or_else(|| {
                insufficient(format!(
                    "cue state '{}' was never credited",
                    self.model().state(state).name
                ))
            })
    }

    pub fn transition_pe(&self, transition: TransitionId) -> Result<f64> {
        self.stats()
            .transition(transition)
            .pe
            .mean()
            .map(|pe| pe + self.bias)
            .ok_or_else(|| insufficient(format!("transition {} was never taken", self.describe(transition))))
    }

    /// Visit-weighted PE over the state's outgoing transitions, plus bias.
    pub fn state_pe(&self, state: StateId) -> Result<f64> {
        let origin = self.model().state(state);
        let visits = self.stats().state(state).visits;
        let (sum, count) = weighted_sum(origin.outgoing.iter().map(|&t| self.pe_sample(t)));
        check_counts(|| format!("state '{}'", origin.name), visits, count)?;
        if visits == 0 {
            return Err(insufficient(format!("state '{}' was never left", origin.name)));
        }
        Ok(sum / visits as f64 + self.bias)
    }

    /// Visit-weighted [`state_pe`](Self::state_pe) over the cue's states.
    pub fn cue_pe(&self, cue: CueId) -> Result<f64> {
        self.over_cue(cue, Self::state_pe)
    }

    /// PE of reward delivery downstream of `state`, plus bias.
    ///
    /// Single-successor chains (waiting periods) are followed to the first
    /// branching state; its edges into rewarded states are averaged by
    /// visits. A branch with no rewarded edge yields the bare bias.
    pub fn rewarded_pe_from(&self, state: StateId) -> Result<f64> {
        let model = self.model();
        let mut current = model.state(state);
        let mut hops = 0;
        while current.out_degree() == 1 {
            hops += 1;
            if hops > model.states().len() {
                return Err(Error::InvalidGraph {
                    message: format!("chain from state '{}' never branches", model.state(state).name),
                });
            }
            current = model.destination(current.outgoing[0]);
        }

        let mut rewarded = current
            .outgoing
            .iter()
            .copied()
            .filter(|&t| model.destination(t).reward > 0.0)
            .peekable();
        if rewarded.peek().is_none() {
            return Ok(self.bias);
        }
        let (sum, count) = weighted_sum(rewarded.map(|t| self.pe_sample(t)));
        if count == 0 {
            return Err(insufficient(format!(
                "no rewarded transition out of '{}' was ever taken",
                current.name
            )));
        }
        Ok(sum / count as f64 + self.bias)
    }

    /// Visit-weighted [`rewarded_pe_from`](Self::rewarded_pe_from) over the
    /// destinations of the state's outgoing transitions.
    pub fn rewarded_pe_of_children(&self, state: StateId) -> Result<f64> {
        let model = self.model();
        let origin = model.state(state);
        let visits = self.stats().state(state).visits;
        let mut samples = Vec::with_capacity(origin.out_degree());
        for &t in &origin.outgoing {
            let taken = self.stats().transition(t).visits();
            if taken > 0 {
                samples.push((self.rewarded_pe_from(model.transition(t).to)?, taken));
            }
        }
        let (sum, count) = weighted_sum(samples);
        check_counts(|| format!("state '{}'", origin.name), visits, count)?;
        if visits == 0 {
            return Err(insufficient(format!("state '{}' was never left", origin.name)));
        }
        Ok(sum / visits as f64)
    }

    pub fn rewarded_pe_of_cue(&self, cue: CueId) -> Result<f64> {
        self.over_cue(cue, Self::rewarded_pe_of_children)
    }

    fn over_cue(&self, cue: CueId, per_state: impl Fn(&Self, StateId) -> Result<f64>) -> Result<f64> {
        let cue = self.model().cue(cue);
        let mut samples = Vec::with_capacity(cue.states.len());
        for &state in &cue.states {
            let visits = self.stats().state(state).visits;
            if visits > 0 {
                samples.push((per_state(self, state)?, visits));
            }
        }
        let expected = self.stats().cue(cue.id).visits();
        let (sum, count) = weighted_sum(samples);
        check_counts(|| format!("cue '{}'", cue.name), expected, count)?;
        if expected == 0 {
            return Err(insufficient(format!("cue '{}' was never seen", cue.name)));
        }
        Ok(sum / expected as f64)
    }

    fn side_name(&self, position: usize) -> String {
        if position == self.layout.left_action {
            "left".to_string()
        } else if position == self.layout.right_action {
            "right".to_string()
        } else {
            format!("state {position}")
        }
    }

    /// One bar group per reference cue, one bar per member state.
    fn reference_bars(
        &self,
        id: FigureId,
        y_label: &str,
        value: impl Fn(&Self, StateId) -> Result<f64>,
    ) -> Result<Figure> {
        let model = self.model();
        let mut series: Vec<Series> = Vec::new();
        for cue in TaskLayout::cues(model, &self.layout.reference_cues) {
            for (position, &state) in cue.states.iter().enumerate() {
                if series.len() <= position {
                    series.push(Series::new(self.side_name(position)));
                }
                series[position].push(Point::bar(&cue.name, value(self, state)?));
            }
        }
        Ok(series.into_iter().fold(
            Figure::new(id, PlotKind::Bar, "Reward probability", y_label),
            Figure::with_series,
        ))
    }

    /// Relative value of the right option against its measured choice
    /// frequency, one point per decision state.
    fn choice_scatter(
        &self,
        id: FigureId,
        x_label: &str,
        option_value: impl Fn(&Self, CueId) -> Result<f64>,
    ) -> Result<Figure> {
        let model = self.model();
        let stats = self.stats();
        let right_position = self.layout.right_action;
        let mut points = Series::new("decision states");
        for cue in TaskLayout::cues(model, &self.layout.decision_cues) {
            for &state in &cue.states {
                let origin = model.state(state);
                let mut total = 0.0;
                let mut right = 0.0;
                for (position, &t) in origin.outgoing.iter().enumerate() {
                    let value = option_value(self, self.tagged_cue(model.destination(t))?.id)?;
                    total += value;
                    if position == right_position {
                        right = value;
                    }
                }
                if total == 0.0 {
                    return Err(insufficient(format!(
                        "option values at '{}' sum to zero",
                        origin.name
                    )));
                }
                let right_choice = origin.outgoing[right_position];
                let frequency = stats
                    .measured_probability(model, right_choice)
                    .ok_or_else(|| insufficient(format!("state '{}' was never left", origin.name)))?;
                points.push(Point::scatter(&origin.name, right / total, frequency));
            }
        }
        Ok(Figure::new(id, PlotKind::Scatter, x_label, "C_{right}").with_series(points))
    }

    fn decision_bars(&self, id: FigureId, value: impl Fn(&Self, CueId) -> Result<f64>) -> Result<Figure> {
        let mut bars = Series::new("PE");
        for cue in TaskLayout::cues(self.model(), &self.layout.decision_cues) {
            bars.push(Point::bar(&cue.name, value(self, cue.id)?));
        }
        Ok(Figure::new(id, PlotKind::Bar, PAIR_LABEL, PE_LABEL).with_series(bars))
    }

    /// High- and low-valued option of each contrast cue, averaged over the
    /// cue's states.
    fn contrast_bars(
        &self,
        id: FigureId,
        value: impl Fn(&Self, TransitionId) -> Result<f64>,
    ) -> Result<Figure> {
        let model = self.model();
        let mut high = Series::new("high");
        let mut low = Series::new("low");
        for cue in TaskLayout::cues(model, &self.layout.contrast_cues) {
            if cue.states.is_empty() {
                return Err(insufficient(format!("cue '{}' has no states", cue.name)));
            }
            let (mut high_sum, mut low_sum) = (0.0, 0.0);
            for &state in &cue.states {
                let origin = model.state(state);
                let left = origin.outgoing[self.layout.left_action];
                let right = origin.outgoing[self.layout.right_action];
                let left_cue = self.tagged_cue(model.destination(left))?;
                let right_cue = self.tagged_cue(model.destination(right))?;
                let (better, worse) = if left_cue.value > right_cue.value {
                    (left, right)
                } else {
                    (right, left)
                };
                high_sum += value(self, better)?;
                low_sum += value(self, worse)?;
            }
            let n = cue.states.len() as f64;
            high.push(Point::bar(&cue.name, high_sum / n));
            low.push(Point::bar(&cue.name, low_sum / n));
        }
        Ok(Figure::new(id, PlotKind::Bar, PAIR_LABEL, PE_LABEL)
            .with_series(high)
            .with_series(low))
    }

    /// Reference cues plotted by obtained reward, then decision actions
    /// pooled by the reference cue they lead to, plotted by nominal value.
    fn value_scatter(
        &self,
        id: FigureId,
        reference: impl Fn(&Self, CueId) -> Result<f64>,
        action: impl Fn(&Self, TransitionId) -> Result<f64>,
    ) -> Result<Figure> {
        let model = self.model();
        let stats = self.stats();
        let mut reference_points = Series::new("reference");
        let mut decision_points = Series::new("decision");
        for cue in TaskLayout::cues(model, &self.layout.reference_cues) {
            reference_points.push(Point::scatter(
                &cue.name,
                self.cue_reward(cue.id)?,
                reference(self, cue.id)?,
            ));

            let mut samples = Vec::new();
            for transition in model.transitions() {
                let leads_here = model
                    .cue_by_name(&model.state(transition.to).extra)
                    .is_some_and(|tagged| tagged.id == cue.id);
                let taken = stats.transition(transition.id).visits();
                if leads_here && taken > 0 {
                    samples.push((action(self, transition.id)?, taken));
                }
            }
            let (sum, count) = weighted_sum(samples);
            if count == 0 {
                return Err(insufficient(format!(
                    "no action leading to cue '{}' was taken",
                    cue.name
                )));
            }
            decision_points.push(Point::scatter(&cue.name, cue.value, sum / count as f64));
        }
        Ok(Figure::new(id, PlotKind::Scatter, "Action value", PE_LABEL)
            .with_series(reference_points)
            .with_series(decision_points))
    }

    /// Obtained reward per reference-cue state.
    pub fn figure_2a(&self) -> Result<Figure> {
        self.reference_bars(FigureId::Fig2a, "Obtained reward (R) (%)", Self::state_reward)
    }

    /// Relative obtained reward of the right option vs. right choice frequency.
    pub fn figure_2b(&self) -> Result<Figure> {
        self.choice_scatter(FigureId::Fig2b, "R_{right} / (R_{right} + R_{left})", Self::cue_reward)
    }

    /// Dopamine proxy per reference-cue state.
    pub fn figure_2c(&self) -> Result<Figure> {
        self.reference_bars(FigureId::Fig2c, PE_LABEL, Self::state_pe)
    }

    /// Relative dopamine proxy of the right option vs. right choice frequency.
    pub fn figure_2d(&self) -> Result<Figure> {
        self.choice_scatter(FigureId::Fig2d, "D_{right} / (D_{right} + D_{left})", Self::cue_pe)
    }

    /// Dopamine proxy at each decision cue.
    pub fn figure_4a(&self) -> Result<Figure> {
        self.decision_bars(FigureId::Fig4a, Self::cue_pe)
    }

    /// Action PE of the high and low option at each contrast cue.
    pub fn figure_4b(&self) -> Result<Figure> {
        self.contrast_bars(FigureId::Fig4b, Self::transition_pe)
    }

    /// Action PE against action value.
    pub fn figure_4c(&self) -> Result<Figure> {
        self.value_scatter(FigureId::Fig4c, Self::cue_pe, Self::transition_pe)
    }

    /// Reward-delivery PE following each decision cue.
    pub fn figure_4d(&self) -> Result<Figure> {
        self.decision_bars(FigureId::Fig4d, Self::rewarded_pe_of_cue)
    }

    /// Reward-delivery PE after the high and low option at each contrast cue.
    pub fn figure_4e(&self) -> Result<Figure> {
        self.contrast_bars(FigureId::Fig4e, |m, t| {
            m.rewarded_pe_from(m.model().transition(t).to)
        })
    }

    /// Reward-delivery PE against action value.
    pub fn figure_4f(&self) -> Result<Figure> {
        self.value_scatter(FigureId::Fig4f, Self::rewarded_pe_of_cue, |m, t| {
            m.rewarded_pe_from(m.model().transition(t).to)
        })
    }

    pub fn figure(&self, id: FigureId) -> Result<Figure> {
        match id {
            FigureId::Fig2a => self.figure_2a(),
            FigureId::Fig2b => self.figure_2b(),
            FigureId::Fig2c => self.figure_2c(),
            FigureId::Fig2d => self.figure_2d(),
            FigureId::Fig4a => self.figure_4a(),
            FigureId::Fig4b => self.figure_4b(),
            FigureId::Fig4c => self.figure_4c(),
            FigureId::Fig4d => self.figure_4d(),
            FigureId::Fig4e => self.figure_4e(),
            FigureId::Fig4f => self.figure_4f(),
        }
    }

    /// Every figure in panel order.
    pub fn all_figures(&self) -> Result<Vec<Figure>> {
        FigureId::ALL.into_iter().map(|id| self.figure(id)).collect()
    }
}
