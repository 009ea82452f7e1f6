//! Errors surfaced to whoever drives a parse or builds a grammar.

use crate::{outcome::Mismatch, policy::FarthestFailure};

/// A rejected input.
///
/// Carries the mismatch of the outermost parser together with the
/// farthest-failure report, which usually pinpoints the problem better.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{mismatch}")]
pub struct ParseError {
    mismatch: Mismatch,
    farthest: Option<FarthestFailure>,
}

impl ParseError {
    pub fn new(mismatch: Mismatch, farthest: Option<FarthestFailure>) -> Self {
        Self { mismatch, farthest }
    }

    /// The mismatch returned by the start parser.
    pub fn mismatch(&self) -> &Mismatch {
        &self.mismatch
    }

    /// The failures recorded deepest into the input.
    pub fn farthest(&self) -> Option<&FarthestFailure> {
        self.farthest.as_ref()
    }

    /// The position to blame: the farthest failure if known, else unknown.
    pub fn position(&self) -> Option<usize> {
        self.farthest.as_ref().map(|farthest| farthest.position)
    }
}

/// A grammar that could not be built.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("invalid regular expression `{pattern}`: {source}")]
    Regex {
        pattern: String,
        #[source]
        source: regex_automata::meta::BuildError,
    },
    #[error("rule `{0}` is already defined")]
    Redefined(String),
    #[error("rule `{0}` was defined after its arena was dropped")]
    ArenaDropped(String),
}
