//! Run command - train a learner on a model and compute its figures

use std::{fs::File, io::BufWriter, path::PathBuf, sync::Arc};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use serde_json::to_writer_pretty;

use crate::{
    analysis::{Figure, FigureId, Morris},
    cli::{
        config::RunConfig,
        output::{format_number, print_figure, print_kv, print_section},
    },
    export::{ExportFormat, save_figures},
    learning::{
        ActionSelection, CueCredit, LearnerConfig, LearnerReport, MethodKind, PeReport,
        build_learner,
    },
    model::read_model,
    pipeline::{Learner, ProgressObserver, SessionConfig, TrialSession},
};

#[derive(Parser, Debug)]
#[command(about = "Train a learner on a task model", allow_negative_numbers = true)]
pub struct RunArgs {
    /// Model description file
    pub model: PathBuf,

    /// JSON run configuration; explicit flags override its fields
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    /// Learning method (actor-critic, sarsa, q-learning)
    #[arg(long, short = 'm')]
    pub method: Option<MethodKind>,

    /// Number of trials
    #[arg(long, short = 't')]
    pub trials: Option<usize>,

    /// Random seed for reproducibility
    #[arg(long)]
    pub seed: Option<u64>,

    /// Critic learning rate η
    #[arg(long)]
    pub eta: Option<f64>,

    /// Actor learning rate α
    #[arg(long)]
    pub alpha: Option<f64>,

    /// Discount factor γ
    #[arg(long)]
    pub gamma: Option<f64>,

    /// Action selection (softmax, probability-matching, epsilon-greedy)
    #[arg(long)]
    pub selection: Option<ActionSelection>,

    /// Softmax β
    #[arg(long)]
    pub beta: Option<f64>,

    /// Probability-matching weight floor
    #[arg(long)]
    pub min_reward: Option<f64>,

    /// Probability of a uniformly random button press
    #[arg(long)]
    pub noise: Option<f64>,

    /// ε for epsilon-greedy selection
    #[arg(long)]
    pub epsilon: Option<f64>,

    /// Prediction error written to the statistics (immediate, one-step, two-step, cue-deferred)
    #[arg(long)]
    pub pe_report: Option<PeReport>,

    /// Cue reward crediting (cumulative, include-terminal)
    #[arg(long)]
    pub cue_credit: Option<CueCredit>,

    /// Step ceiling per trial
    #[arg(long)]
    pub max_steps: Option<usize>,

    /// Dopamine baseline added to every PE figure
    #[arg(long)]
    pub bias: Option<f64>,

    /// Only compute these figures (2a, 2b, ..., 4f); repeatable
    #[arg(long = "figure", short = 'f')]
    pub figures: Vec<FigureId>,

    /// Skip the figure analysis
    #[arg(long, default_value_t = false)]
    pub no_figures: bool,

    /// Write figures to this file (.json or .csv); repeatable
    #[arg(long, short = 'o')]
    pub output: Vec<PathBuf>,

    /// Write the learner report as JSON
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Log every step of every trial
    #[arg(long, short = 'v', default_value_t = false)]
    pub verbose: bool,

    /// Hide the progress bar
    #[arg(long, default_value_t = false)]
    pub no_progress: bool,
}

impl RunArgs {
    /// Merge the configuration file (if any) with the command-line flags.
    pub fn resolve(&self) -> Result<(RunConfig, LearnerConfig)> {
        let mut run = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(method) = self.method {
            run.method = method;
        }
        if let Some(trials) = self.trials {
            run.trials = trials;
        }
        if let Some(bias) = self.bias {
            run.bias = bias;
        }

        let mut learner = run.learner_config();
        if let Some(seed) = self.seed {
            learner.seed = Some(seed);
        }
        let overrides = [
            (&mut learner.eta, self.eta),
            (&mut learner.alpha, self.alpha),
            (&mut learner.gamma, self.gamma),
            (&mut learner.beta, self.beta),
            (&mut learner.min_reward, self.min_reward),
            (&mut learner.noise, self.noise),
            (&mut learner.epsilon, self.epsilon),
        ];
        for (field, value) in overrides {
            if let Some(value) = value {
                *field = value;
            }
        }
        if let Some(selection) = self.selection {
            learner.action_selection = selection;
        }
        if let Some(report) = self.pe_report {
            learner.pe_report = report;
        }
        if let Some(credit) = self.cue_credit {
            learner.cue_credit = credit;
        }
        if let Some(max_steps) = self.max_steps {
            learner.max_steps = max_steps;
        }
        learner.validate()?;
        Ok((run, learner))
    }
}

pub fn execute(args: RunArgs) -> Result<()> {
    let (run, learner_config) = args.resolve()?;
    let model = Arc::new(
        read_model(&args.model).with_context(|| format!("reading {}", args.model.display()))?,
    );

    print_section("Run");
    print_kv("Model", &args.model.display().to_string());
    print_kv("Method", run.method.as_str());
    print_kv("Trials", &format_number(run.trials));
    print_kv("Selection", &learner_config.action_selection.to_string());
    print_kv("PE report", &learner_config.pe_report.to_string());
    print_kv(
        "Seed",
        &learner_config
            .seed
            .map_or_else(|| "random".to_string(), |s| s.to_string()),
    );

    let mut learner = build_learner(run.method, model, learner_config)?;
    let mut session = TrialSession::new(SessionConfig {
        trials: run.trials,
        verbose: args.verbose,
    });
    if !args.no_progress {
        session = session.with_observer(Box::new(ProgressObserver::new()));
    }
    session.run(learner.as_mut())?;

    let report = LearnerReport::collect(learner.as_ref());
    print_section("Learner");
    print!("{report}");
    if let Some(path) = &args.report {
        let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
        to_writer_pretty(BufWriter::new(file), &report)?;
        println!("\nReport written to {}", path.display());
    }

    if args.no_figures {
        return Ok(());
    }
    let figures = compute_figures(learner.as_ref(), &run, &args.figures)?;
    print_section("Figures");
    for figure in &figures {
        print_figure(figure);
    }
    for path in &args.output {
        let format = ExportFormat::from_path(path).ok_or_else(|| {
            anyhow!(
                "cannot infer export format of {}; use a .json or .csv extension",
                path.display()
            )
        })?;
        save_figures(path, &figures, format)?;
        println!("\nFigures written to {} ({format})", path.display());
    }
    Ok(())
}

fn compute_figures(learner: &dyn Learner, run: &RunConfig, ids: &[FigureId]) -> Result<Vec<Figure>> {
    let morris = Morris::new(learner, run.layout.clone(), run.bias)?;
    if ids.is_empty() {
        return Ok(morris.all_figures()?);
    }
    ids.iter()
        .map(|&id| morris.figure(id).with_context(|| format!("figure {id}")))
        .collect()
}
