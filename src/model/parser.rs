//! Reader for the whitespace-separated model description format.
//!
//! ```text
//! <cue count>
//! <cue name> <value>                          (repeated)
//! <state count>
//! <name> <reward> <type> <cue name> <extra>   (repeated)
//! <from> <to> <probability | action label>    (until end of input)
//! ```
//!
//! A state type starting with `d`/`D` is deterministic. A cue name that was
//! not declared means the state has no cue; by convention `-` is used.

use std::{fs, path::Path, str::FromStr};

use super::{ExperimentalModel, ModelBuilder, StateKind};
use crate::{Error, Result};

/// Errors name tokens by their 1-based ordinal in the input.
struct Tokens<'a> {
    inner: std::iter::Enumerate<std::str::SplitWhitespace<'a>>,
    /// Tokens consumed so far, i.e. the ordinal of the last one returned.
    consumed: usize,
}

impl<'a> Tokens<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            inner: input.split_whitespace().enumerate(),
            consumed: 0,
        }
    }

    fn next_token(&mut self) -> Option<&'a str> {
        self.inner.next().map(|(index, token)| {
            self.consumed = index + 1;
            token
        })
    }

    fn expect(&mut self, what: &str) -> Result<&'a str> {
        self.next_token().ok_or_else(|| Error::Parse {
            position: self.consumed + 1,
            message: format!("unexpected end of input, expected {what}"),
        })
    }

    fn expect_parsed<T: FromStr>(&mut self, what: &str) -> Result<T> {
        let token = self.expect(what)?;
        token.parse().map_err(|_| Error::Parse {
            position: self.consumed,
            message: format!("expected {what}, found '{token}'"),
        })
    }
}

/// Parse a model description held in memory.
pub fn parse_model(input: &str) -> Result<ExperimentalModel> {
    let mut tokens = Tokens::new(input);
    let mut builder = ModelBuilder::new();

    let cue_count: usize = tokens.expect_parsed("cue count")?;
    for _ in 0..cue_count {
        let name = tokens.expect("cue name")?;
        let value: f64 = tokens.expect_parsed("cue value")?;
        builder.add_cue(name, value)?;
    }

    let state_count: usize = tokens.expect_parsed("state count")?;
    for _ in 0..state_count {
        let name = tokens.expect("state name")?;
        let reward: f64 = tokens.expect_parsed("state reward")?;
        let kind: StateKind = tokens.expect_parsed("state type")?;
        let cue = builder.cue_id(tokens.expect("cue name")?);
        let extra = tokens.expect("extra tag")?;
        builder.add_state(name, reward, kind, cue, extra)?;
    }

    while let Some(from) = tokens.next_token() {
        let to = tokens.expect("destination state")?;
        match builder.state_kind(from)? {
            StateKind::Probabilistic => {
                let probability: f64 = tokens.expect_parsed("transition probability")?;
                builder.add_chance(from, to, probability)?;
            }
            StateKind::Deterministic => {
                let label = tokens.expect("action name")?;
                builder.add_choice(from, to, label)?;
            }
        }
    }

    builder.build()
}

/// Read and parse a model description file.
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<ExperimentalModel> {
    let path = path.as_ref();
    let input = fs::read_to_string(path).map_err(|source| Error::Io {
        operation: format!("read model '{}'", path.display()),
        source,
    })?;
    parse_model(&input)
}
