//! Trial loop of the action-value learners.
//!
//! The transition out of the next state is sampled before the current edge
//! is updated and is then the one actually taken on the following step.

use super::{
    core::{LearnerCore, TrialRecorder},
    values::{ActionValues, ValueFunction},
};
use crate::Result;

/// Which edge out of the next state supplies the bootstrap value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Bootstrap {
    /// The edge sampled by the behaviour policy (on-policy).
    Sampled,
    /// The greedy choice when the next state is deterministic (off-policy).
    Greedy,
}

pub(crate) fn run_trial(
    values: &mut ActionValues,
    bootstrap: Bootstrap,
    core: &mut LearnerCore,
    verbose: bool,
) -> Result<()> {
    let model = core.shared_model();
    let (gamma, eta) = (core.config().gamma, core.config().eta);
    let mut trial = TrialRecorder::begin(core, verbose);

    let mut current = model.start();
    let mut action = core.pick_required(current)?;
    loop {
        trial.advance(core)?;
        let next = model.transition(action).to;
        let sampled = core.pick_transition(next);
        let target = match bootstrap {
            Bootstrap::Greedy if model.state(next).is_deterministic() => {
                values.optimal_choice(&model, next)
            }
            Bootstrap::Greedy | Bootstrap::Sampled => sampled,
        };

        // the end state has no outgoing edge and bootstraps on zero
        let future = target.map_or(0.0, |t| values.get(t));
        let pe = model.state(next).reward + gamma * future - values.get(action);
        values.add(action, eta * pe);
        core.reinforce(action, pe);
        core.update_policy(current, values)?;

        trial.record(core, action, pe);
        current = next;
        match sampled {
            Some(following) if current != model.end() => action = following,
            _ => break,
        }
    }
    trial.finish(core);
    Ok(())
}
