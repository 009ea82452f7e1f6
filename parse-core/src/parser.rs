//! The combinator abstraction.

use std::rc::Rc;

use crate::{
    combinator::{
        AndThen, IgnoreThen, Labelled, List, Map, MapErr, Maybe, Repeat, Then, ThenIgnore, TryMap,
    },
    count::CountLimit,
    engine::Engine,
    input::Input,
    outcome::{Mismatch, Tag},
    rule::Rule,
};

/// A unit of parsing logic.
///
/// A parser has an optional diagnostic [`Tag`] and a body that reads input
/// through an [`Engine`] and yields a symbol or a [`Mismatch`]. Parsers are
/// immutable and reusable: the only thing a body changes is the engine's
/// cursor.
///
/// Do not call [`parse`](Parser::parse) directly from other parsers; go
/// through [`Engine::run`], which backtracks on failure and threads the call
/// through the memoizer, the depth limiter and the failure tracer.
///
/// Symbols must be `Clone + 'static` because the memoizer keeps copies of
/// them.
pub trait Parser<I: ?Sized> {
    type Output: Clone + 'static;

    /// The diagnostic tag; tagged calls are memoized and depth limited.
    fn tag(&self) -> Option<&Tag> {
        None
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch>;

    /// Transform the symbol on success.
    fn map<U, F>(self, f: F) -> Map<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> U,
    {
        Map { parser: self, f }
    }

    /// Transform the symbol with a step that may itself fail, e.g. to
    /// validate matched text.
    fn try_map<U, F>(self, f: F) -> TryMap<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Result<U, Mismatch>,
    {
        TryMap { parser: self, f }
    }

    /// Parse `self`, then the parser built from its symbol.
    fn and_then<Q, F>(self, f: F) -> AndThen<Self, F>
    where
        Self: Sized,
        F: Fn(Self::Output) -> Q,
        Q: Parser<I>,
    {
        AndThen { parser: self, f }
    }

    /// Parse `self` then `other`, keeping both symbols.
    fn then<Q>(self, other: Q) -> Then<Self, Q>
    where
        Self: Sized,
        Q: Parser<I>,
    {
        Then {
            parser1: self,
            parser2: other,
        }
    }

    /// Parse `self` then `other`, keeping the first symbol.
    fn then_ignore<Q>(self, other: Q) -> ThenIgnore<Self, Q>
    where
        Self: Sized,
        Q: Parser<I>,
    {
        ThenIgnore {
            parser1: self,
            parser2: other,
        }
    }

    /// Parse `self` then `other`, keeping the second symbol.
    fn ignore_then<Q>(self, other: Q) -> IgnoreThen<Self, Q>
    where
        Self: Sized,
        Q: Parser<I>,
    {
        IgnoreThen {
            parser1: self,
            parser2: other,
        }
    }

    /// Rewrite the mismatch on failure.
    fn map_err<F>(self, f: F) -> MapErr<Self, F>
    where
        Self: Sized,
        F: Fn(Mismatch) -> Mismatch,
    {
        MapErr { parser: self, f }
    }

    /// Attach a diagnostic tag.
    ///
    /// A failure is re-reported as "cannot parse `tag`" with the inner
    /// mismatch kept as its cause.
    fn labelled(self, tag: impl Into<Tag>) -> Labelled<Self>
    where
        Self: Sized,
    {
        Labelled {
            parser: self,
            tag: tag.into(),
        }
    }

    /// Always succeeds, with `None` if `self` fails.
    fn or_not(self) -> Maybe<Self>
    where
        Self: Sized,
    {
        Maybe { parser: self }
    }

    /// Zero or more repetitions.
    fn repeated(self) -> Repeat<Self>
    where
        Self: Sized,
    {
        self.repeated_within(CountLimit::AtLeast(0))
    }

    /// Repetitions whose count must satisfy `limit`.
    fn repeated_within(self, limit: CountLimit) -> Repeat<Self>
    where
        Self: Sized,
    {
        Repeat {
            parser: self,
            limit,
            tag: None,
        }
    }

    /// `self (separator self)*`; an empty sequence if the first item fails.
    fn separated_by<S>(self, separator: S) -> List<Self, S>
    where
        Self: Sized,
        S: Parser<I>,
    {
        List {
            item: self,
            separator,
            tag: None,
        }
    }

    /// Erase the type into a cheaply clonable [`Rule`].
    fn boxed(self) -> Rule<I, Self::Output>
    where
        Self: Sized + 'static,
        I: Input,
    {
        let tag = self.tag().cloned();
        let rule = Rule::anonymous(move |_, engine| self.parse(engine));
        match tag {
            Some(tag) => rule.with_tag(tag),
            None => rule,
        }
    }
}

impl<I, P> Parser<I> for &P
where
    I: ?Sized,
    P: Parser<I> + ?Sized,
{
    type Output = P::Output;

    fn tag(&self) -> Option<&Tag> {
        (**self).tag()
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch> {
        (**self).parse(engine)
    }
}

impl<I, P> Parser<I> for Rc<P>
where
    I: ?Sized,
    P: Parser<I> + ?Sized,
{
    type Output = P::Output;

    fn tag(&self) -> Option<&Tag> {
        (**self).tag()
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch> {
        (**self).parse(engine)
    }
}
