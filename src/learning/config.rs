//! Learner hyperparameters and bookkeeping variants.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

/// Rule turning per-choice quantities into unnormalised policy weights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionSelection {
    /// `exp(β · H[choice])`
    Softmax,
    /// `max(value of choice, min_R)`
    #[default]
    ProbabilityMatching,
    /// `1 − ε` for the optimal choice, `ε / out-degree` for the others.
    EpsilonGreedy,
}

/// Which prediction error is written into a transition's running average.
///
/// Summing earlier steps' errors models a dopamine response that spreads
/// backwards in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PeReport {
    /// The error of the step itself.
    Immediate,
    /// Step error plus the previous step's error.
    OneStep,
    /// Step error plus the two previous steps' errors.
    TwoStep,
    /// The previous step's error when leaving a cue state, the step error
    /// otherwise.
    CueDeferred,
}

/// How cues seen during a trial are credited with reward at trial end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CueCredit {
    /// Sum of the rewards of every state departed from, starting at the cue.
    #[default]
    Cumulative,
    /// As `Cumulative`, plus the reward of the end state.
    IncludeTerminal,
}

/// Concrete value-update rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MethodKind {
    ActorCritic,
    Sarsa,
    QLearning,
}

impl MethodKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MethodKind::ActorCritic => "actor-critic",
            MethodKind::Sarsa => "sarsa",
            MethodKind::QLearning => "q-learning",
        }
    }

    /// Prediction-error report the method has historically been run with.
    pub fn default_pe_report(self) -> PeReport {
        match self {
            MethodKind::ActorCritic => PeReport::CueDeferred,
            MethodKind::Sarsa | MethodKind::QLearning => PeReport::OneStep,
        }
    }
}

/// Hyperparameters of a learner, fixed for its lifetime.
///
/// # Examples
///
/// ```
/// use morris_rl::learning::{ActionSelection, LearnerConfig, MethodKind, PeReport};
///
/// let config = LearnerConfig::for_method(MethodKind::Sarsa)
///     .with_action_selection(ActionSelection::Softmax)
///     .with_noise(0.0)
///     .with_seed(7);
/// assert_eq!(config.pe_report, PeReport::OneStep);
/// config.validate()?;
/// # Ok::<(), morris_rl::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LearnerConfig {
    /// Critic learning rate η
    pub eta: f64,
    /// Actor learning rate α
    pub alpha: f64,
    /// Discount factor γ
    pub gamma: f64,
    pub action_selection: ActionSelection,
    /// Softmax temperature β
    pub beta: f64,
    /// Probability-matching weight floor
    pub min_reward: f64,
    /// Fraction of choices replaced by a uniformly random button press
    pub noise: f64,
    /// ε for epsilon-greedy selection
    pub epsilon: f64,
    pub pe_report: PeReport,
    pub cue_credit: CueCredit,
    /// Step ceiling after which a trial is declared non-terminating
    pub max_steps: usize,
    /// Random seed for reproducibility
    pub seed: Option<u64>,
}

impl Default for LearnerConfig {
    fn default() -> Self {
        Self {
            eta: 0.1,
            alpha: 0.1,
            gamma: 0.99,
            action_selection: ActionSelection::default(),
            beta: 0.01,
            min_reward: 1.0,
            noise: 0.1,
            epsilon: 0.05,
            pe_report: PeReport::OneStep,
            cue_credit: CueCredit::default(),
            max_steps: 100_000,
            seed: None,
        }
    }
}

impl LearnerConfig {
    /// Defaults with the prediction-error report customary for `method`.
    pub fn for_method(method: MethodKind) -> Self {
        Self {
            pe_report: method.default_pe_report(),
            ..Self::default()
        }
    }

    pub fn with_learning_rates(mut self, eta: f64, alpha: f64) -> Self {
        self.eta = eta;
        self.alpha = alpha;
        self
    }

    pub fn with_gamma(mut self, gamma: f64) -> Self {
        self.gamma = gamma;
        self
    }

    pub fn with_action_selection(mut self, method: ActionSelection) -> Self {
        self.action_selection = method;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_min_reward(mut self, min_reward: f64) -> Self {
        self.min_reward = min_reward;
        self
    }

    pub fn with_noise(mut self, noise: f64) -> Self {
        self.noise = noise;
        self
    }

    pub fn with_epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = epsilon;
        self
    }

    pub fn with_pe_report(mut self, report: PeReport) -> Self {
        self.pe_report = report;
        self
    }

    pub fn with_cue_credit(mut self, credit: CueCredit) -> Self {
        self.cue_credit = credit;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Set the random seed for deterministic behavior.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Reject parameters outside their meaningful range.
    pub fn validate(&self) -> crate::Result<()> {
        let unit = [
            ("eta", self.eta),
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("noise", self.noise),
            ("epsilon", self.epsilon),
        ];
        for (name, value) in unit {
            if !(0.0..=1.0).contains(&value) {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must lie in [0, 1], got {value}"),
                });
            }
        }
        for (name, value) in [("beta", self.beta), ("min_reward", self.min_reward)] {
            if !value.is_finite() {
                return Err(Error::InvalidConfiguration {
                    message: format!("{name} must be finite, got {value}"),
                });
            }
        }
        if self.action_selection == ActionSelection::ProbabilityMatching && self.min_reward <= 0.0
        {
            return Err(Error::InvalidConfiguration {
                message: format!(
                    "probability matching needs a positive min_reward floor, got {}",
                    self.min_reward
                ),
            });
        }
        if self.max_steps == 0 {
            return Err(Error::InvalidConfiguration {
                message: "max_steps must be positive".to_string(),
            });
        }
        Ok(())
    }
}

macro_rules! token_enum {
    ($ty:ty, $kind:literal, $expected:literal, { $($variant:path => $label:literal $(| $alias:literal)*),+ $(,)? }) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let label = match self {
                    $($variant => $label,)+
                };
                f.write_str(label)
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s.trim().to_ascii_lowercase().as_str() {
                    $($label $(| $alias)* => Ok($variant),)+
                    _ => Err(Error::ParseToken {
                        kind: $kind,
                        input: s.to_string(),
                        expected: $expected.to_string(),
                    }),
                }
            }
        }
    };
}

token_enum!(ActionSelection, "action selection", "softmax, probability-matching, epsilon-greedy", {
    ActionSelection::Softmax => "softmax",
    ActionSelection::ProbabilityMatching => "probability-matching" | "matching" | "pm",
    ActionSelection::EpsilonGreedy => "epsilon-greedy" | "eps-greedy" | "greedy",
});

token_enum!(PeReport, "PE report", "immediate, one-step, two-step, cue-deferred", {
    PeReport::Immediate => "immediate" | "0",
    PeReport::OneStep => "one-step" | "1",
    PeReport::TwoStep => "two-step" | "2",
    PeReport::CueDeferred => "cue-deferred" | "standard",
});

token_enum!(CueCredit, "cue credit", "cumulative, include-terminal", {
    CueCredit::Cumulative => "cumulative",
    CueCredit::IncludeTerminal => "include-terminal" | "terminal",
});

token_enum!(MethodKind, "learning method", "actor-critic, sarsa, q-learning", {
    MethodKind::ActorCritic => "actor-critic" | "ac",
    MethodKind::Sarsa => "sarsa",
    MethodKind::QLearning => "q-learning" | "qlearning" | "q",
});
