//! Run configuration file for the `run` command

use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    Error, Result,
    analysis::{DEFAULT_BIAS, TaskLayout},
    learning::{LearnerConfig, MethodKind},
    pipeline::SessionConfig,
};

/// Everything a run needs besides the model file.
///
/// Every field is optional in the JSON file. The `learner` block may be
/// partial; whatever it leaves out takes the defaults of `method`, so the
/// prediction-error report matches the rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RunFile")]
pub struct RunConfig {
    pub method: MethodKind,
    pub learner: Option<LearnerConfig>,
    pub layout: TaskLayout,
    pub trials: usize,
    /// Baseline added to every dopamine proxy
    pub bias: f64,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            method: MethodKind::ActorCritic,
            learner: None,
            layout: TaskLayout::default(),
            trials: SessionConfig::default().trials,
            bias: DEFAULT_BIAS,
        }
    }
}

/// On-disk shape of [`RunConfig`] before the defaults are filled in.
#[derive(Deserialize)]
struct RunFile {
    method: Option<MethodKind>,
    learner: Option<Map<String, Value>>,
    layout: Option<TaskLayout>,
    trials: Option<usize>,
    bias: Option<f64>,
}

impl TryFrom<RunFile> for RunConfig {
    type Error = serde_json::Error;

    fn try_from(file: RunFile) -> std::result::Result<Self, Self::Error> {
        let defaults = RunConfig::default();
        let method = file.method.unwrap_or(defaults.method);
        let learner = file
            .learner
            .map(|overrides| {
                let mut merged = match serde_json::to_value(LearnerConfig::for_method(method))? {
                    Value::Object(fields) => fields,
                    _ => Map::new(),
                };
                merged.extend(overrides);
                serde_json::from_value(Value::Object(merged))
            })
            .transpose()?;
        Ok(Self {
            method,
            learner,
            layout: file.layout.unwrap_or(defaults.layout),
            trials: file.trials.unwrap_or(defaults.trials),
            bias: file.bias.unwrap_or(defaults.bias),
        })
    }
}

impl RunConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| Error::Io {
            operation: format!("open run config {}", path.display()),
            source,
        })?;
        let config = serde_json::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Learner parameters, falling back to the method's defaults.
    pub fn learner_config(&self) -> LearnerConfig {
        self.learner
            .clone()
            .unwrap_or_else(|| LearnerConfig::for_method(self.method))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::learning::PeReport;

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "method": "sarsa", "trials": 500 }}"#).unwrap();

        let config = RunConfig::load(file.path()).unwrap();
        assert_eq!(config.method, MethodKind::Sarsa);
        assert_eq!(config.trials, 500);
        assert_eq!(config.bias, DEFAULT_BIAS);
        assert_eq!(config.layout, TaskLayout::default());
        assert_eq!(config.learner_config().pe_report, PeReport::OneStep);
    }

    #[test]
    fn explicit_learner_block_wins() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "learner": {{ "eta": 0.5, "pe_report": "immediate" }} }}"#
        )
        .unwrap();

        let learner = RunConfig::load(file.path()).unwrap().learner_config();
        assert_eq!(learner.eta, 0.5);
        assert_eq!(learner.pe_report, PeReport::Immediate);
        assert_eq!(learner.noise, LearnerConfig::default().noise);
    }

    #[test]
    fn partial_learner_block_keeps_method_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "method": "actor-critic", "learner": {{ "eta": 0.2 }} }}"#
        )
        .unwrap();

        let learner = RunConfig::load(file.path()).unwrap().learner_config();
        assert_eq!(learner.eta, 0.2);
        assert_eq!(learner.pe_report, PeReport::CueDeferred);
        assert_eq!(
            learner,
            LearnerConfig::for_method(MethodKind::ActorCritic).with_learning_rates(0.2, 0.1)
        );
    }

    #[test]
    fn learner_block_rejects_bad_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "learner": {{ "eta": "fast" }} }}"#).unwrap();
        assert!(RunConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_names_the_operation() {
        let err = RunConfig::load("/nonexistent/run.json").unwrap_err();
        assert!(err.to_string().contains("open run config"));
    }
}
