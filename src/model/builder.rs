//! Programmatic construction of an [`ExperimentalModel`].

use std::collections::HashMap;

use super::{Cue, Edge, ExperimentalModel, State, StateKind, Transition};
use crate::{
    Error, Result,
    identifiers::{CueId, StateId, TransitionId},
};

/// Incremental builder that validates names and edge kinds as they are added
/// and the start/end structure on [`ModelBuilder::build`].
///
/// # Examples
///
/// ```
/// use morris_rl::model::{ModelBuilder, StateKind};
///
/// let mut builder = ModelBuilder::new();
/// builder.add_state("start", 0.0, StateKind::Probabilistic, None, "")?;
/// builder.add_state("juice", 10.0, StateKind::Probabilistic, None, "")?;
/// builder.add_state("end", 0.0, StateKind::Probabilistic, None, "")?;
/// builder.add_chance("start", "juice", 1.0)?;
/// builder.add_chance("juice", "end", 1.0)?;
/// let model = builder.build()?;
/// assert_eq!(model.state(model.start()).name, "start");
/// # Ok::<(), morris_rl::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ModelBuilder {
    states: Vec<State>,
    transitions: Vec<Transition>,
    cues: Vec<Cue>,
    state_index: HashMap<String, StateId>,
    cue_index: HashMap<String, CueId>,
}

impl ModelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a cue. Cues must exist before the states that reference them.
    pub fn add_cue(&mut self, name: impl Into<String>, value: f64) -> Result<CueId> {
        let name = name.into();
        if self.cue_index.contains_key(&name) {
            return Err(Error::DuplicateName { kind: "cue", name });
        }
        let id = CueId::new(self.cues.len());
        self.cue_index.insert(name.clone(), id);
        self.cues.push(Cue {
            id,
            name,
            value,
            states: Vec::new(),
        });
        Ok(id)
    }

    /// Look up a cue registered earlier.
    pub fn cue_id(&self, name: &str) -> Option<CueId> {
        self.cue_index.get(name).copied()
    }

    pub fn add_state(
        &mut self,
        name: impl Into<String>,
        reward: f64,
        kind: StateKind,
        cue: Option<CueId>,
        extra: impl Into<String>,
    ) -> Result<StateId> {
        let name = name.into();
        if self.state_index.contains_key(&name) {
            return Err(Error::DuplicateName {
                kind: "state",
                name,
            });
        }
        let id = StateId::new(self.states.len());
        if let Some(cue) = cue {
            let owner = self
                .cues
                .get_mut(cue.index())
                .ok_or_else(|| Error::InvalidGraph {
                    message: format!("state '{name}' references unknown cue {cue}"),
                })?;
            owner.states.push(id);
        }
        self.state_index.insert(name.clone(), id);
        self.states.push(State {
            id,
            name,
            reward,
            cue,
            kind,
            outgoing: Vec::new(),
            incoming: Vec::new(),
            extra: extra.into(),
        });
        Ok(id)
    }

    pub fn add_chance(&mut self, from: &str, to: &str, probability: f64) -> Result<TransitionId> {
        self.add_edge(from, to, Edge::Chance { probability })
    }

    pub fn add_choice(
        &mut self,
        from: &str,
        to: &str,
        label: impl Into<String>,
    ) -> Result<TransitionId> {
        self.add_edge(
            from,
            to,
            Edge::Choice {
                label: label.into(),
            },
        )
    }

    /// Add an edge; its variant must match the kind of the origin state.
    pub fn add_edge(&mut self, from: &str, to: &str, edge: Edge) -> Result<TransitionId> {
        let from_id = self.resolve(from)?;
        let to_id = self.resolve(to)?;
        let origin = &self.states[from_id.index()];
        let matches_kind = matches!(
            (origin.kind, &edge),
            (StateKind::Probabilistic, Edge::Chance { .. })
                | (StateKind::Deterministic, Edge::Choice { .. })
        );
        if !matches_kind {
            return Err(Error::InvalidGraph {
                message: format!("{} state '{from}' cannot emit edge '{edge}'", origin.kind),
            });
        }

        let id = TransitionId::new(self.transitions.len());
        self.transitions.push(Transition {
            id,
            from: from_id,
            to: to_id,
            edge,
        });
        self.states[from_id.index()].outgoing.push(id);
        self.states[to_id.index()].incoming.push(id);
        Ok(id)
    }

    /// Kind of a state registered earlier.
    pub fn state_kind(&self, name: &str) -> Result<StateKind> {
        let id = self.resolve(name)?;
        Ok(self.states[id.index()].kind)
    }

    fn resolve(&self, name: &str) -> Result<StateId> {
        self.state_index
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownState {
                name: name.to_string(),
            })
    }

    /// Finish construction, locating the unique start and end states.
    pub fn build(self) -> Result<ExperimentalModel> {
        let start = unique_state(&self.states, "incoming", |s| s.incoming.is_empty())?;
        let end = unique_state(&self.states, "outgoing", |s| s.outgoing.is_empty())?;
        if start == end {
            return Err(Error::InvalidGraph {
                message: "start and end state coincide".to_string(),
            });
        }

        Ok(ExperimentalModel {
            states: self.states,
            transitions: self.transitions,
            cues: self.cues,
            state_index: self.state_index,
            cue_index: self.cue_index,
            start,
            end,
        })
    }
}

fn unique_state(
    states: &[State],
    direction: &str,
    predicate: impl Fn(&State) -> bool,
) -> Result<StateId> {
    let mut found = states.iter().filter(|s| predicate(s));
    match (found.next(), found.next()) {
        (Some(state), None) => Ok(state.id),
        (None, _) => Err(Error::InvalidGraph {
            message: format!("no state without {direction} transitions"),
        }),
        (Some(first), Some(second)) => Err(Error::InvalidGraph {
            message: format!(
                "more than one state without {direction} transitions ('{}', '{}')",
                first.name, second.name
            ),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> ModelBuilder {
        let mut b = ModelBuilder::new();
        let cue = b.add_cue("c", 1.0).unwrap();
        b.add_state("a", 0.0, StateKind::Deterministic, Some(cue), "")
            .unwrap();
        b.add_state("b", 1.0, StateKind::Probabilistic, None, "c")
            .unwrap();
        b.add_state("z", 0.0, StateKind::Probabilistic, None, "")
            .unwrap();
        b
    }

    #[test]
    fn builds_linear_graph() {
        let mut b = chain();
        b.add_choice("a", "b", "go").unwrap();
        b.add_chance("b", "z", 1.0).unwrap();
        let model = b.build().unwrap();

        assert_eq!(model.state(model.start()).name, "a");
        assert_eq!(model.state(model.end()).name, "z");
        assert_eq!(model.cue_by_name("c").unwrap().states, vec![model.start()]);
        assert_eq!(model.state_by_name("b").unwrap().incoming.len(), 1);
        assert_eq!(model.destination(TransitionId::new(0)).name, "b");
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut b = chain();
        assert!(matches!(
            b.add_state("a", 0.0, StateKind::Probabilistic, None, ""),
            Err(Error::DuplicateName { kind: "state", .. })
        ));
        assert!(matches!(
            b.add_cue("c", 2.0),
            Err(Error::DuplicateName { kind: "cue", .. })
        ));
    }

    #[test]
    fn rejects_edge_of_wrong_kind() {
        let mut b = chain();
        assert!(matches!(
            b.add_chance("a", "b", 1.0),
            Err(Error::InvalidGraph { .. })
        ));
        assert!(matches!(
            b.add_choice("b", "z", "x"),
            Err(Error::InvalidGraph { .. })
        ));
    }

    #[test]
    fn rejects_dangling_reference() {
        let mut b = chain();
        assert!(matches!(
            b.add_choice("a", "nowhere", "go"),
            Err(Error::UnknownState { .. })
        ));
    }

    #[test]
    fn rejects_two_starts() {
        let mut b = chain();
        b.add_chance("b", "z", 1.0).unwrap();
        assert!(matches!(b.build(), Err(Error::InvalidGraph { .. })));
    }
}
