use crate::{
    combinator::{List, Maybe, Repeat},
    count::CountLimit,
    engine::Engine,
    input::Input,
    outcome::Mismatch,
    parser::Parser,
};

/// Succeeds with `()` exactly at the end of the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct End;

pub fn end() -> End {
    End
}

impl<I: ?Sized + Input> Parser<I> for End {
    type Output = ();

    fn parse(&self, engine: &Engine<'_, I>) -> Result<(), Mismatch> {
        engine
            .accept(|tail| tail.is_empty().then(|| tail.matched((), 0)))
            .ok_or_else(|| Mismatch::expected(None, "end of input"))
    }
}

/// Always succeeds with `()` without consuming input.
#[derive(Debug, Clone, Copy, Default)]
pub struct Empty;

pub fn empty() -> Empty {
    Empty
}

impl<I: ?Sized + Input> Parser<I> for Empty {
    type Output = ();

    fn parse(&self, _engine: &Engine<'_, I>) -> Result<(), Mismatch> {
        Ok(())
    }
}

/// Runs a parser if it matches and discards its symbol; always succeeds.
#[derive(Debug, Clone, Copy)]
pub struct Skip<P> {
    pub parser: P,
}

pub fn skip<P>(parser: P) -> Skip<P> {
    Skip { parser }
}

impl<I, P> Parser<I> for Skip<P>
where
    I: ?Sized + Input,
    P: Parser<I>,
{
    type Output = ();

    fn parse(&self, engine: &Engine<'_, I>) -> Result<(), Mismatch> {
        let _ = engine.run(&self.parser);
        Ok(())
    }
}

/// Builds its parser when called rather than when the grammar is built.
#[derive(Clone, Copy)]
pub struct Lazy<F> {
    pub f: F,
}

pub fn lazy<F>(f: F) -> Lazy<F> {
    Lazy { f }
}

impl<I, P, F> Parser<I> for Lazy<F>
where
    I: ?Sized + Input,
    P: Parser<I>,
    F: Fn() -> P,
{
    type Output = P::Output;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<P::Output, Mismatch> {
        engine.run(&(self.f)())
    }
}

/// `parser` or nothing; see [`Parser::or_not`].
pub fn maybe<P>(parser: P) -> Maybe<P> {
    Maybe { parser }
}

/// Zero or more repetitions of `parser`. Never fails.
pub fn many<P>(parser: P) -> Repeat<P> {
    repeat(parser, CountLimit::at_least(0))
}

/// One or more repetitions of `parser`; fails iff the first attempt does.
pub fn some<P>(parser: P) -> Repeat<P> {
    repeat(parser, CountLimit::at_least(1))
}

/// Repetitions of `parser` whose count must satisfy `limit`.
pub fn repeat<P>(parser: P, limit: CountLimit) -> Repeat<P> {
    Repeat {
        parser,
        limit,
        tag: None,
    }
}

/// `item (separator item)*`, or an empty list if the first item fails.
///
/// ```
/// # use parse_core::*;
/// let digits = text::take_while(CountLimit::at_least(1), |c| c.is_ascii_digit());
/// let numbers = list(digits, text::literal(","));
/// assert_eq!(parse(&numbers, "1,22,333").unwrap(), ["1", "22", "333"]);
/// assert!(parse(&numbers, "").unwrap().is_empty());
/// ```
pub fn list<P, S>(item: P, separator: S) -> List<P, S> {
    List {
        item,
        separator,
        tag: None,
    }
}
