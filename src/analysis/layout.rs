//! Roles the figure functions assign to cues and choice positions.

use serde::{Deserialize, Serialize};

use crate::{
    Error, Result,
    model::{Cue, ExperimentalModel},
};

/// Which cues (by position in the model) are reference or decision trials,
/// and which outgoing edge of a decision state is the left or right press.
///
/// The default is the two-armed task: four reference cues, ten decision
/// pairs, six of which pair distinct outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskLayout {
    pub reference_cues: Vec<usize>,
    pub decision_cues: Vec<usize>,
    /// Decision cues whose two options have different nominal values
    pub contrast_cues: Vec<usize>,
    pub left_action: usize,
    pub right_action: usize,
}

impl Default for TaskLayout {
    fn default() -> Self {
        Self {
            reference_cues: (0..4).collect(),
            decision_cues: (4..14).collect(),
            contrast_cues: vec![5, 7, 8, 9, 11, 12],
            left_action: 0,
            right_action: 1,
        }
    }
}

impl TaskLayout {
    pub fn new(
        reference_cues: impl IntoIterator<Item = usize>,
        decision_cues: impl IntoIterator<Item = usize>,
        contrast_cues: impl IntoIterator<Item = usize>,
    ) -> Self {
        Self {
            reference_cues: reference_cues.into_iter().collect(),
            decision_cues: decision_cues.into_iter().collect(),
            contrast_cues: contrast_cues.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_actions(mut self, left: usize, right: usize) -> Self {
        self.left_action = left;
        self.right_action = right;
        self
    }

    /// Check that every index resolves in `model` and every decision state
    /// has both a left and a right edge.
    pub fn validate(&self, model: &ExperimentalModel) -> Result<()> {
        if self.left_action == self.right_action {
            return Err(Error::InvalidLayout {
                message: format!(
                    "left and right actions share edge index {}",
                    self.left_action
                ),
            });
        }
        let roles = [
            ("reference", &self.reference_cues),
            ("decision", &self.decision_cues),
            ("contrast", &self.contrast_cues),
        ];
        for (role, indices) in roles {
            if let Some(&index) = indices.iter().find(|&&i| i >= model.cues().len()) {
                return Err(Error::InvalidLayout {
                    message: format!(
                        "{role} cue index {index} out of range, model has {} cues",
                        model.cues().len()
                    ),
                });
            }
        }

        let needed = self.left_action.max(self.right_action) + 1;
        for &index in self.decision_cues.iter().chain(&self.contrast_cues) {
            let cue = &model.cues()[index];
            for &state in &cue.states {
                let state = model.state(state);
                if state.out_degree() < needed {
                    return Err(Error::InvalidLayout {
                        message: format!(
                            "decision state {} of cue {} has {} outgoing edges, need {needed}",
                            state.name,
                            cue.name,
                            state.out_degree()
                        ),
                    });
                }
            }
        }
        Ok(())
    }

    /// Cues at `indices`, which must already have been validated.
    pub(crate) fn cues<'m>(
        model: &'m ExperimentalModel,
        indices: &'m [usize],
    ) -> impl Iterator<Item = &'m Cue> + 'm {
        indices.iter().map(move |&i| &model.cues()[i])
    }
}
