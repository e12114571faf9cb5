//! Common fixtures for the morris-rl test suite.
//!
//! Small decision graphs with known fixed points, plus a miniature version of
//! the two-armed task that exercises every figure.

#![allow(dead_code)]

use std::sync::Arc;

use morris_rl::{
    ExperimentalModel, ModelBuilder,
    analysis::TaskLayout,
    model::{StateKind, parse_model},
};

/// Two reference cues (25% and 75% juice) and one decision cue pairing them.
pub const MINI_TASK: &str = "
    3
    ref-25 25
    ref-75 75
    pair 50
    9
    fix   0 P -      -
    r25   0 P ref-25 -
    r75   0 P ref-75 -
    pick  0 D pair   -
    w25   0 P -      ref-25
    w75   0 P -      ref-75
    juice 1 P -      -
    dry   0 P -      -
    end   0 P -      -
    fix r25 0.25
    fix r75 0.25
    fix pick 0.5
    r25 juice 0.25
    r25 dry 0.75
    r75 juice 0.75
    r75 dry 0.25
    pick w25 left
    pick w75 right
    w25 juice 0.25
    w25 dry 0.75
    w75 juice 0.75
    w75 dry 0.25
    juice end 1
    dry end 1
";

pub fn mini_task() -> Arc<ExperimentalModel> {
    Arc::new(parse_model(MINI_TASK).unwrap())
}

/// Cue roles of [`MINI_TASK`]: cues 0 and 1 are references, cue 2 is the
/// only (and contrasting) decision cue.
pub fn mini_layout() -> TaskLayout {
    TaskLayout::new([0, 1], [2], [2])
}

/// `start` flips a fair coin between an unrewarded and a 10-reward leaf.
/// With γ = 1 the value of `start` is 5.
pub fn coin_flip() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    b.add_state("start", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("zero", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("ten", 10.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_chance("start", "zero", 0.5).unwrap();
    b.add_chance("start", "ten", 0.5).unwrap();
    b.add_chance("zero", "end", 1.0).unwrap();
    b.add_chance("ten", "end", 1.0).unwrap();
    Arc::new(b.build().unwrap())
}

/// `pick` chooses between a 10-reward state (first edge) and an unrewarded
/// one (second edge).
pub fn two_armed() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    b.add_state("pick", 0.0, StateKind::Deterministic, None, "")
        .unwrap();
    b.add_state("high", 10.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("low", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_choice("pick", "high", "left").unwrap();
    b.add_choice("pick", "low", "right").unwrap();
    b.add_chance("high", "end", 1.0).unwrap();
    b.add_chance("low", "end", 1.0).unwrap();
    Arc::new(b.build().unwrap())
}

/// A forced choice `start -> mid` followed by [`two_armed`]'s decision.
/// On-policy and off-policy learners disagree on the value of `go`.
pub fn delayed_choice() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    b.add_state("start", 0.0, StateKind::Deterministic, None, "")
        .unwrap();
    b.add_state("mid", 0.0, StateKind::Deterministic, None, "")
        .unwrap();
    b.add_state("high", 10.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("low", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_choice("start", "mid", "go").unwrap();
    b.add_choice("mid", "high", "left").unwrap();
    b.add_choice("mid", "low", "right").unwrap();
    b.add_chance("high", "end", 1.0).unwrap();
    b.add_chance("low", "end", 1.0).unwrap();
    Arc::new(b.build().unwrap())
}

/// `pick` offers three choices, each to a distinct leaf.
pub fn three_way() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    b.add_state("pick", 0.0, StateKind::Deterministic, None, "")
        .unwrap();
    for (leaf, reward) in [("a", 1.0), ("b", 2.0), ("c", 3.0)] {
        b.add_state(leaf, reward, StateKind::Probabilistic, None, "")
            .unwrap();
    }
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    for (leaf, label) in [("a", "one"), ("b", "two"), ("c", "three")] {
        b.add_choice("pick", leaf, label).unwrap();
        b.add_chance(leaf, "end", 1.0).unwrap();
    }
    Arc::new(b.build().unwrap())
}

/// `spin` returns to itself with certainty; the edge to `end` never fires.
pub fn endless_loop() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    b.add_state("start", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("spin", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_chance("start", "spin", 1.0).unwrap();
    b.add_chance("spin", "spin", 1.0).unwrap();
    b.add_chance("spin", "end", 0.0).unwrap();
    Arc::new(b.build().unwrap())
}

/// [`endless_loop`] with its start shown as a cue, so an aborted trial
/// leaves a departure from a cue state whose credit is never settled.
pub fn cued_endless_loop() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    let cue = b.add_cue("flash", 1.0).unwrap();
    b.add_state("start", 0.0, StateKind::Probabilistic, Some(cue), "")
        .unwrap();
    b.add_state("spin", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_chance("start", "spin", 1.0).unwrap();
    b.add_chance("spin", "spin", 1.0).unwrap();
    b.add_chance("spin", "end", 0.0).unwrap();
    Arc::new(b.build().unwrap())
}

/// Like [`two_armed`] but the juice arrives one step after `high`, so the
/// choice is only worth something through the value of the state it enters.
pub fn relayed_arms() -> Arc<ExperimentalModel> {
    let mut b = ModelBuilder::new();
    b.add_state("pick", 0.0, StateKind::Deterministic, None, "")
        .unwrap();
    b.add_state("high", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("juice", 10.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("low", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_state("end", 0.0, StateKind::Probabilistic, None, "")
        .unwrap();
    b.add_choice("pick", "high", "left").unwrap();
    b.add_choice("pick", "low", "right").unwrap();
    b.add_chance("high", "juice", 1.0).unwrap();
    b.add_chance("juice", "end", 1.0).unwrap();
    b.add_chance("low", "end", 1.0).unwrap();
    Arc::new(b.build().unwrap())
}
