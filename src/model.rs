//! Decision graph describing a behavioural task.
//!
//! The graph is a set of [`State`]s joined by [`Transition`]s. Probabilistic
//! states are controlled by the environment and leave through fixed-probability
//! chance edges; deterministic states are controlled by the agent and leave
//! through choice edges whose probability is set by a learner's policy.
//! [`Cue`]s tag groups of states that share a reward identity.
//!
//! An [`ExperimentalModel`] is immutable once built. Construct one with
//! [`ModelBuilder`] or read one from text with [`parser::parse_model`].

pub mod builder;
pub mod parser;

use std::{collections::HashMap, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

pub use builder::ModelBuilder;
pub use parser::{parse_model, read_model};

use crate::identifiers::{CueId, StateId, TransitionId};

/// Who controls the outgoing edges of a state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StateKind {
    /// Environment-controlled; outgoing edges are [`Edge::Chance`].
    Probabilistic,
    /// Agent-controlled; outgoing edges are [`Edge::Choice`].
    Deterministic,
}

impl fmt::Display for StateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateKind::Probabilistic => f.write_str("probabilistic"),
            StateKind::Deterministic => f.write_str("deterministic"),
        }
    }
}

impl FromStr for StateKind {
    type Err = crate::Error;

    /// Tokens starting with `d`/`D` are deterministic, everything else is
    /// probabilistic.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().chars().next() {
            Some('d') | Some('D') => Ok(StateKind::Deterministic),
            Some(_) => Ok(StateKind::Probabilistic),
            None => Err(crate::Error::ParseToken {
                kind: "state type",
                input: s.to_string(),
                expected: "deterministic, probabilistic".to_string(),
            }),
        }
    }
}

/// Node of the decision graph.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct State {
    pub id: StateId,
    pub name: String,
    /// External reward delivered on entering this state.
    pub reward: f64,
    pub cue: Option<CueId>,
    pub kind: StateKind,
    pub outgoing: Vec<TransitionId>,
    pub incoming: Vec<TransitionId>,
    /// Free-form tag; on reward states it names the cue whose expected value
    /// the state delivers.
    pub extra: String,
}

impl State {
    pub fn is_deterministic(&self) -> bool {
        self.kind == StateKind::Deterministic
    }

    pub fn is_probabilistic(&self) -> bool {
        self.kind == StateKind::Probabilistic
    }

    pub fn out_degree(&self) -> usize {
        self.outgoing.len()
    }
}

/// Named group of states sharing an expected-reward identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cue {
    pub id: CueId,
    pub name: String,
    /// Nominal expected reward; only the analysis layer reads it.
    pub value: f64,
    pub states: Vec<StateId>,
}

/// Payload of a directed edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Edge {
    /// Outgoing edge of a probabilistic state.
    Chance { probability: f64 },
    /// Outgoing edge of a deterministic state.
    Choice { label: String },
}

/// Directed edge between two states.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transition {
    pub id: TransitionId,
    pub from: StateId,
    pub to: StateId,
    pub edge: Edge,
}

impl Transition {
    pub fn is_choice(&self) -> bool {
        matches!(self.edge, Edge::Choice { .. })
    }

    /// Fixed probability of a chance edge.
    pub fn chance_probability(&self) -> Option<f64> {
        match self.edge {
            Edge::Chance { probability } => Some(probability),
            Edge::Choice { .. } => None,
        }
    }

    /// Action label of a choice edge.
    pub fn choice_label(&self) -> Option<&str> {
        match &self.edge {
            Edge::Choice { label } => Some(label),
            Edge::Chance { .. } => None,
        }
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Edge::Chance { probability } => write!(f, "prob = {probability}"),
            Edge::Choice { label } => write!(f, "ACTION: {label}"),
        }
    }
}

/// Immutable decision graph.
#[derive(Debug, Clone)]
pub struct ExperimentalModel {
    states: Vec<State>,
    transitions: Vec<Transition>,
    cues: Vec<Cue>,
    state_index: HashMap<String, StateId>,
    cue_index: HashMap<String, CueId>,
    start: StateId,
    end: StateId,
}

impl ExperimentalModel {
    pub fn states(&self) -> &[State] {
        &self.states
    }

    pub fn transitions(&self) -> &[Transition] {
        &self.transitions
    }

    pub fn cues(&self) -> &[Cue] {
        &self.cues
    }

    pub fn state(&self, id: StateId) -> &State {
        &self.states[id.index()]
    }

    pub fn transition(&self, id: TransitionId) -> &Transition {
        &self.transitions[id.index()]
    }

    pub fn cue(&self, id: CueId) -> &Cue {
        &self.cues[id.index()]
    }

    /// The unique state without incoming edges.
    pub fn start(&self) -> StateId {
        self.start
    }

    /// The unique state without outgoing edges.
    pub fn end(&self) -> StateId {
        self.end
    }

    pub fn state_by_name(&self, name: &str) -> Option<&State> {
        self.state_index.get(name).map(|&id| self.state(id))
    }

    pub fn cue_by_name(&self, name: &str) -> Option<&Cue> {
        self.cue_index.get(name).map(|&id| self.cue(id))
    }

    /// Outgoing transitions of `state` in emission order.
    pub fn outgoing(&self, state: StateId) -> impl Iterator<Item = &Transition> + '_ {
        self.state(state)
            .outgoing
            .iter()
            .map(move |&id| self.transition(id))
    }

    /// Destination state of a transition.
    pub fn destination(&self, transition: TransitionId) -> &State {
        self.state(self.transition(transition).to)
    }
}
