#![doc = include_str!("../../README.md")]

mod arena;
mod charset;
mod choice;
mod combinator;
mod count;
mod engine;
mod error;
mod input;
#[cfg(feature = "logos")]
pub mod lexer;
mod outcome;
mod parser;
pub mod policy;
mod primitive;
mod recursive;
mod regex;
mod rule;
pub mod text;
pub mod token;

pub use crate::{
    arena::Arena,
    charset::CharSet,
    choice::{one_of, Alternatives, OneOf},
    combinator::{
        AndThen, IgnoreThen, Labelled, List, Map, MapErr, Maybe, Repeat, Then, ThenIgnore,
        TryMap,
    },
    count::CountLimit,
    engine::Engine,
    error::{GrammarError, ParseError},
    input::{Input, Tail},
    outcome::{Match, Mismatch, Outcome, Reason, Span, Tag},
    parser::Parser,
    policy::{Chain, DepthLimiter, FarthestFailure, FarthestMismatchTracer, Memoizer, Policy},
    primitive::{empty, end, lazy, list, many, maybe, repeat, skip, some, Empty, End, Lazy, Skip},
    recursive::Recursive,
    regex::{Captures, PrefixMatcher, Regex},
    rule::Rule,
};

/// Parses the whole of `input` with the standard policies.
///
/// Trailing input is an error. On failure the error carries the farthest
/// position any terminal reached, which usually points closer to the real
/// problem than the top-level mismatch does.
///
/// ```
/// # use parse_core::*;
/// let greeting = text::literal("hello");
/// assert_eq!(parse(&greeting, "hello").unwrap(), "hello");
///
/// let error = parse(&greeting, "hello!").unwrap_err();
/// assert_eq!(error.to_string(), "Expected end of input");
/// assert_eq!(error.position(), Some(5));
/// ```
pub fn parse<I, P>(parser: &P, input: &I) -> Result<P::Output, ParseError>
where
    I: ?Sized + Input,
    P: Parser<I> + ?Sized,
{
    Engine::new(input).run_to_end(parser)
}
