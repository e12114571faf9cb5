//! Observers for trial sessions

use indicatif::{ProgressBar, ProgressStyle};

use crate::{
    Result,
    ports::{Learner, Observer},
};

/// Progress bar observer - shows session progress with the start state's
/// current value estimate
pub struct ProgressObserver {
    progress_bar: Option<ProgressBar>,
    refresh_every: usize,
}

impl ProgressObserver {
    pub fn new() -> Self {
        Self {
            progress_bar: None,
            refresh_every: 100,
        }
    }

    /// Redraw only every `trials` trials
    pub fn with_refresh_every(mut self, trials: usize) -> Self {
        self.refresh_every = trials.max(1);
        self
    }

    fn message(learner: &dyn Learner) -> String {
        let start = learner.model().start();
        match learner.state_value(start) {
            Some(value) => format!("V[start] = {value:.3}"),
            None => format!("{} trials", learner.trials()),
        }
    }
}

impl Default for ProgressObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer for ProgressObserver {
    fn on_run_start(&mut self, _learner: &dyn Learner, total_trials: usize) -> Result<()> {
        let pb = ProgressBar::new(total_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} trials ({msg})")
                .map_err(|e| crate::Error::ProgressBarTemplate {
                    message: e.to_string(),
                })?
                .progress_chars("=>-"),
        );
        self.progress_bar = Some(pb);
        Ok(())
    }

    fn on_trial_end(&mut self, learner: &dyn Learner, trial: usize) -> Result<()> {
        if (trial + 1) % self.refresh_every == 0
            && let Some(pb) = &self.progress_bar
        {
            pb.set_position(trial as u64 + 1);
            pb.set_message(Self::message(learner));
        }
        Ok(())
    }

    fn on_run_end(&mut self, learner: &dyn Learner) -> Result<()> {
        if let Some(pb) = self.progress_bar.take() {
            pb.finish_with_message(Self::message(learner));
        }
        Ok(())
    }
}
