//! Figure analysis over a trained learner
//!
//! This module provides:
//! - The cue roles a task assigns ([`TaskLayout`])
//! - Dopamine-proxy and choice-frequency figure computations ([`Morris`])
//! - Plain data types for the resulting series ([`Figure`])

pub mod figure;
pub mod layout;
pub mod morris;

pub use figure::{Figure, FigureId, PlotKind, Point, Series};
pub use layout::TaskLayout;
pub use morris::{DEFAULT_BIAS, Morris};
