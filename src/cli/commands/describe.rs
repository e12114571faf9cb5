//! Describe command - list the cues, states and edges of a model

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use crate::{
    cli::output::{print_kv, print_section, print_subsection},
    model::{ExperimentalModel, read_model},
};

#[derive(Parser, Debug)]
#[command(about = "Describe a task model")]
pub struct DescribeArgs {
    /// Model description file
    pub model: PathBuf,
}

pub fn execute(args: DescribeArgs) -> Result<()> {
    let model =
        read_model(&args.model).with_context(|| format!("reading {}", args.model.display()))?;
    print_section(&format!("Model {}", args.model.display()));
    print_model(&model);
    Ok(())
}

pub fn print_model(model: &ExperimentalModel) {
    print_kv("Cues", &model.cues().len().to_string());
    print_kv("States", &model.states().len().to_string());
    print_kv("Transitions", &model.transitions().len().to_string());
    print_kv("Start", &model.state(model.start()).name);
    print_kv("End", &model.state(model.end()).name);

    print_subsection("Cues");
    for cue in model.cues() {
        let members: Vec<&str> = cue
            .states
            .iter()
            .map(|&s| model.state(s).name.as_str())
            .collect();
        println!("  {} ({}): {}", cue.name, cue.value, members.join(", "));
    }

    print_subsection("States");
    for state in model.states() {
        let cue = state
            .cue
            .map_or("-", |c| model.cue(c).name.as_str());
        println!(
            "  {} [{}] reward = {}, cue = {}, extra = {}",
            state.name,
            state.kind,
            state.reward,
            cue,
            if state.extra.is_empty() { "-" } else { state.extra.as_str() }
        );
        for transition in model.outgoing(state.id) {
            println!(
                "      -> {} ({})",
                model.state(transition.to).name,
                transition.edge
            );
        }
    }
}
