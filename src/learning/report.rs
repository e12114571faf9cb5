//! Snapshot of a learner's tables for printing or serialisation.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::config::MethodKind;
use crate::ports::Learner;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateReport {
    pub name: String,
    /// V for state-value methods
    pub value: Option<f64>,
    /// Label of the cached optimal choice
    pub optimal: Option<String>,
    pub visits: u64,
    pub reward_average: Option<f64>,
    pub reward_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionReport {
    pub from: String,
    pub to: String,
    pub label: Option<String>,
    /// Q for action-value methods
    pub value: Option<f64>,
    pub policy: Option<f64>,
    pub preference: Option<f64>,
    pub pe_average: Option<f64>,
    pub visits: u64,
    pub measured_probability: Option<f64>,
    pub origin_visits: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueReport {
    pub name: String,
    pub value: f64,
    pub reward_average: Option<f64>,
    pub visits: u64,
}

/// Every state, transition and cue with its learned and bookkept quantities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearnerReport {
    pub method: MethodKind,
    pub trials: u64,
    pub states: Vec<StateReport>,
    pub transitions: Vec<TransitionReport>,
    pub cues: Vec<CueReport>,
}

impl LearnerReport {
    pub fn collect(learner: &dyn Learner) -> Self {
        let model = learner.model();
        let policy = learner.policy();
        let stats = learner.statistics();

        let states = model
            .states()
            .iter()
            .map(|state| {
                let record = stats.state(state.id);
                StateReport {
                    name: state.name.clone(),
                    value: learner.state_value(state.id),
                    optimal: policy
                        .optimal(state.id)
                        .and_then(|t| model.transition(t).choice_label())
                        .map(str::to_string),
                    visits: record.visits,
                    reward_average: record.reward.mean(),
                    reward_count: record.reward.count(),
                }
            })
            .collect();

        let transitions = model
            .transitions()
            .iter()
            .map(|transition| {
                let record = stats.transition(transition.id);
                TransitionReport {
                    from: model.state(transition.from).name.clone(),
                    to: model.state(transition.to).name.clone(),
                    label: transition.choice_label().map(str::to_string),
                    value: learner.action_value(transition.id),
                    policy: policy.probability(transition.id),
                    preference: policy.preference(transition.id),
                    pe_average: record.pe.mean(),
                    visits: record.visits(),
                    measured_probability: stats.measured_probability(model, transition.id),
                    origin_visits: stats.state(transition.from).visits,
                }
            })
            .collect();

        let cues = model
            .cues()
            .iter()
            .map(|cue| CueReport {
                name: cue.name.clone(),
                value: cue.value,
                reward_average: stats.cue(cue.id).reward.mean(),
                visits: stats.cue(cue.id).visits(),
            })
            .collect();

        Self {
            method: learner.kind(),
            trials: learner.trials(),
            states,
            transitions,
            cues,
        }
    }
}

struct Maybe(Option<f64>);

impl fmt::Display for Maybe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value:.4}"),
            None => f.write_str("n/a"),
        }
    }
}

impl fmt::Display for LearnerReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} after {} trials", self.method, self.trials)?;

        writeln!(f, "\n  States:")?;
        for state in &self.states {
            write!(f, "    {}", state.name)?;
            if let Some(value) = state.value {
                write!(f, ": V = {value:.4}")?;
            }
            if let Some(optimal) = &state.optimal {
                write!(f, ", optimal = {optimal}")?;
            }
            writeln!(
                f,
                ", visits = {}, reward avg = {}, reward count = {}",
                state.visits,
                Maybe(state.reward_average),
                state.reward_count
            )?;
        }

        writeln!(f, "\n  Transitions:")?;
        for t in &self.transitions {
            write!(f, "    {} -> {}", t.from, t.to)?;
            if let Some(value) = t.value {
                write!(f, ": Q = {value:.4}")?;
            }
            if let Some(label) = &t.label {
                write!(
                    f,
                    " ({label}) policy = {}, H = {}",
                    Maybe(t.policy),
                    Maybe(t.preference)
                )?;
            }
            writeln!(
                f,
                ", PE avg = {}, visits = {}, measured prob = {} ({})",
                Maybe(t.pe_average),
                t.visits,
                Maybe(t.measured_probability),
                t.origin_visits
            )?;
        }

        writeln!(f, "\n  Cues:")?;
        for cue in &self.cues {
            writeln!(
                f,
                "    {} ({}): reward avg = {}, visits = {}",
                cue.name,
                cue.value,
                Maybe(cue.reward_average),
                cue.visits
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        learning::{LearnerConfig, SarsaLearner},
        model::{ModelBuilder, StateKind},
    };

    #[test]
    fn report_covers_every_entity() {
        let mut b = ModelBuilder::new();
        let cue = b.add_cue("go", 1.0).unwrap();
        b.add_state("pick", 0.0, StateKind::Deterministic, Some(cue), "")
            .unwrap();
        b.add_state("end", 1.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b.add_choice("pick", "end", "left").unwrap();
        b.add_choice("pick", "end", "right").unwrap();
        let model = Arc::new(b.build().unwrap());

        let mut learner = SarsaLearner::new(model, LearnerConfig::default().with_seed(9)).unwrap();
        for _ in 0..5 {
            learner.trial(false).unwrap();
        }
        let report = LearnerReport::collect(&learner);
        assert_eq!(report.trials, 5);
        assert_eq!(report.states.len(), 2);
        assert_eq!(report.states[0].visits, 5);
        assert!(report.states[0].optimal.is_some());
        assert_eq!(report.transitions.len(), 2);
        assert!(report.transitions.iter().all(|t| t.value.is_some()));
        assert_eq!(report.cues[0].visits, 5);

        let text = report.to_string();
        assert!(text.contains("pick -> end"));
        assert!(text.contains("(left)"));
    }
}
