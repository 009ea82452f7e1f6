//! The cursor that drives a parse.
//!
//! If you only want to parse something, [`parse`](crate::parse) wraps all of
//! this. If you write terminal parsers or want diagnostics, read on.

use std::{cell::Cell, rc::Rc};

use crate::{
    error::ParseError,
    input::{Input, Tail},
    outcome::{Match, Mismatch, Outcome, Span, Tag},
    parser::Parser,
    policy::{AnySymbol, Call, FarthestFailure, Policy, Standard},
    primitive::End,
};

// Left recursion nests one call per remaining element, so the call stack is
// grown on demand whenever less than `RED_ZONE` bytes are left.
const RED_ZONE: usize = 128 * 1024;
const STACK_SEGMENT: usize = 1024 * 1024;

/// The state of one parse.
///
/// `Engine` owns the only mutable position in a parse, plus the policy chain
/// every call is threaded through. It is created once per input, driven by
/// one top-level [`run`](Engine::run), and dropped afterwards; nothing it
/// holds survives the parse.
///
/// # Reading input
///
/// [`accept`](Engine::accept) is the single primitive that reads input. It
/// hands the remaining input to a probe; if the probe reports a [`Match`],
/// the cursor moves to the end of the match.
///
/// ```
/// # use parse_core::*;
/// let engine = Engine::new("abc");
/// let a = engine.accept(|tail| tail.rest().starts_with('a').then(|| tail.matched('a', 1)));
/// assert_eq!(a, Some('a'));
/// assert_eq!(engine.position(), 1);
/// ```
///
/// # Running parsers
///
/// [`run`](Engine::run) executes a parser at the current position. On
/// failure the cursor is restored to where the call started, so a failed
/// attempt never leaves a trace on the position and the caller can simply
/// try something else.
///
/// ```
/// # use parse_core::*;
/// let engine = Engine::new("abc");
/// assert!(engine.run(&text::literal("abd")).is_err());
/// assert_eq!(engine.position(), 0);
/// assert_eq!(engine.run(&text::literal("ab")).unwrap(), "ab");
/// assert_eq!(engine.position(), 2);
/// ```
///
/// Please note that `Engine` uses interior mutability, so that parsers can
/// share it by reference while it advances.
pub struct Engine<'src, I: ?Sized> {
    input: &'src I,
    position: Cell<usize>,
    policies: Box<dyn Policy + 'src>,
}

impl<'src, I: ?Sized + Input> Engine<'src, I> {
    /// Create an engine over `input` with the [`Standard`] policy chain.
    pub fn new(input: &'src I) -> Self {
        Self::with_policies(input, Standard::default())
    }

    /// Create an engine over `input` with a custom policy chain.
    pub fn with_policies(input: &'src I, policies: impl Policy + 'src) -> Self {
        Self {
            input,
            position: Cell::new(0),
            policies: Box::new(policies),
        }
    }

    /// The whole input.
    pub fn input(&self) -> &'src I {
        self.input
    }

    /// Get the current parsing position.
    pub fn position(&self) -> usize {
        self.position.get()
    }

    /// The input from the current position onward.
    pub fn rest(&self) -> &'src I {
        &self.input[self.position.get()..]
    }

    /// Whether the cursor is at the end of the input.
    pub fn is_at_end(&self) -> bool {
        self.position.get() >= self.input.end()
    }

    pub fn policies(&self) -> &dyn Policy {
        &*self.policies
    }

    /// Offer the remaining input to `probe` and consume whatever it matches.
    ///
    /// The match must start at the current position. On `None` the cursor
    /// does not move.
    pub fn accept<T>(&self, probe: impl FnOnce(Tail<'src, I>) -> Option<Match<T>>) -> Option<T> {
        let start = self.position.get();
        let matched = probe(Tail::new(self.input, start))?;
        debug_assert_eq!(matched.span.start, start, "match does not start at the cursor");
        debug_assert!(matched.span.end <= self.input.end(), "match runs past the input");
        self.position.set(matched.span.end);
        Some(matched.symbol)
    }

    /// Run `parser` here, returning its symbol and the input it consumed.
    pub fn run_match<P>(&self, parser: &P) -> Outcome<P::Output>
    where
        P: Parser<I> + ?Sized,
    {
        let start = self.position.get();
        let call = Call {
            position: start,
            tag: parser.tag(),
            remaining: self.input.remaining(start),
        };
        let outcome = stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, || {
            self.policies.trace(&call, &mut || {
                let symbol = parser.parse(self)?;
                let symbol: AnySymbol = Rc::new(symbol);
                Ok(Match::new(symbol, Span::new(start, self.position.get())))
            })
        })
        .and_then(|matched| downcast(matched, call.tag));
        match &outcome {
            // Also replays the advancement of answers served from a cache.
            Ok(matched) => self.position.set(matched.span.end),
            Err(_) => self.position.set(start),
        }
        outcome
    }

    /// Run `parser` here.
    ///
    /// On failure the cursor is back where it was before the call.
    pub fn run<P>(&self, parser: &P) -> Result<P::Output, Mismatch>
    where
        P: Parser<I> + ?Sized,
    {
        self.run_match(parser).map(|matched| matched.symbol)
    }

    /// Run `parser` and require that it consumes the whole input.
    ///
    /// On failure the error carries the farthest-failure report, if the
    /// policy chain keeps one.
    pub fn run_to_end<P>(&self, parser: &P) -> Result<P::Output, ParseError>
    where
        P: Parser<I> + ?Sized,
    {
        let outcome = self
            .run(parser)
            .and_then(|symbol| self.run(&End).map(|()| symbol));
        outcome.map_err(|mismatch| ParseError::new(mismatch, self.farthest_failure()))
    }

    /// The mismatches recorded at the deepest failing position so far.
    pub fn farthest_failure(&self) -> Option<FarthestFailure> {
        self.policies.farthest_failure()
    }

    /// What the policy chain observed, rendered for humans.
    pub fn report(&self) -> Option<String> {
        self.policies.report()
    }
}

/// Take a symbol back out of the policy chain.
///
/// A cached symbol of another type means two rules share a tag; that is
/// reported as a mismatch rather than trusted.
fn downcast<T: Clone + 'static>(matched: Match<AnySymbol>, tag: Option<&Tag>) -> Outcome<T> {
    let Match { symbol, span } = matched;
    match symbol.downcast::<T>() {
        Ok(symbol) => {
            let symbol = Rc::try_unwrap(symbol).unwrap_or_else(|shared| (*shared).clone());
            Ok(Match::new(symbol, span))
        }
        Err(_) => {
            tracing::warn!(
                tag = %crate::outcome::describe(tag),
                position = span.start,
                "tag shared by rules of different symbol types"
            );
            Err(Mismatch::expected(tag.cloned(), "a single symbol type per tag"))
        }
    }
}
