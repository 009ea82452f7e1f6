//! Terminal parsers over slices of tokens.
//!
//! ```
//! # use parse_core::*;
//! #[derive(Debug, Clone, PartialEq)]
//! enum Token {
//!     Number(i64),
//!     Plus,
//! }
//!
//! let number = token::select(|token: Token| match token {
//!     Token::Number(n) => Some(n),
//!     _ => None,
//! });
//! let sum = list(number, token::just(Token::Plus)).map(|ns: Vec<i64>| ns.iter().sum::<i64>());
//! let tokens = [Token::Number(1), Token::Plus, Token::Number(2)];
//! assert_eq!(parse(&sum, &tokens[..]).unwrap(), 3);
//! ```

use std::fmt::Debug;

use crate::{engine::Engine, outcome::Mismatch, parser::Parser};

/// Matches one token equal to `value`.
#[derive(Debug, Clone)]
pub struct Just<T> {
    value: T,
}

pub fn just<T>(value: T) -> Just<T> {
    Just { value }
}

impl<T> Parser<[T]> for Just<T>
where
    T: PartialEq + Clone + Debug + 'static,
{
    type Output = T;

    fn parse(&self, engine: &Engine<'_, [T]>) -> Result<T, Mismatch> {
        engine
            .accept(|tail| {
                let token = tail.rest().first().filter(|token| **token == self.value)?;
                Some(tail.matched(token.clone(), 1))
            })
            .ok_or_else(|| Mismatch::expected(None, format!("{:?}", self.value)))
    }
}

/// Matches a run of tokens equal to `values`.
#[derive(Debug, Clone)]
pub struct Sequence<T> {
    values: Vec<T>,
}

pub fn sequence<T>(values: impl Into<Vec<T>>) -> Sequence<T> {
    Sequence {
        values: values.into(),
    }
}

impl<T> Parser<[T]> for Sequence<T>
where
    T: PartialEq + Clone + Debug + 'static,
{
    type Output = Vec<T>;

    fn parse(&self, engine: &Engine<'_, [T]>) -> Result<Vec<T>, Mismatch> {
        engine
            .accept(|tail| {
                tail.rest()
                    .starts_with(&self.values)
                    .then(|| tail.matched(self.values.clone(), self.values.len()))
            })
            .ok_or_else(|| Mismatch::expected(None, format!("{:?}", self.values)))
    }
}

/// Matches one token accepted by a predicate.
#[derive(Clone, Copy)]
pub struct Satisfy<F> {
    predicate: F,
}

pub fn satisfy<T, F: Fn(&T) -> bool>(predicate: F) -> Satisfy<F> {
    Satisfy { predicate }
}

impl<T, F> Parser<[T]> for Satisfy<F>
where
    T: Clone + 'static,
    F: Fn(&T) -> bool,
{
    type Output = T;

    fn parse(&self, engine: &Engine<'_, [T]>) -> Result<T, Mismatch> {
        engine
            .accept(|tail| {
                let token = tail.rest().first().filter(|token| (self.predicate)(token))?;
                Some(tail.matched(token.clone(), 1))
            })
            .ok_or_else(|| Mismatch::expected(None, "a matching token"))
    }
}

/// Matches one token that `f` maps to a symbol.
#[derive(Clone, Copy)]
pub struct Select<F> {
    f: F,
}

/// `f` receives a clone of the next token; `None` rejects it.
pub fn select<T, U, F: Fn(T) -> Option<U>>(f: F) -> Select<F> {
    Select { f }
}

impl<T, U, F> Parser<[T]> for Select<F>
where
    T: Clone + 'static,
    U: Clone + 'static,
    F: Fn(T) -> Option<U>,
{
    type Output = U;

    fn parse(&self, engine: &Engine<'_, [T]>) -> Result<U, Mismatch> {
        engine
            .accept(|tail| {
                let symbol = (self.f)(tail.rest().first()?.clone())?;
                Some(tail.matched(symbol, 1))
            })
            .ok_or_else(|| Mismatch::expected(None, "a matching token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_compares_tokens() {
        let tokens = [1, 2, 3];
        let engine = Engine::new(&tokens[..]);
        assert_eq!(engine.run(&just(1)).unwrap(), 1);
        let error = engine.run(&just(3)).unwrap_err();
        assert_eq!(error.to_string(), "Expected 3");
        assert_eq!(engine.position(), 1);
    }

    #[test]
    fn sequence_matches_a_prefix() {
        let tokens = ['a', 'b', 'c'];
        let engine = Engine::new(&tokens[..]);
        assert!(engine.run(&sequence(['a', 'c'])).is_err());
        assert_eq!(engine.run(&sequence(['a', 'b'])).unwrap(), ['a', 'b']);
        assert_eq!(engine.position(), 2);
    }

    #[test]
    fn satisfy_and_select() {
        let tokens = [4, 7];
        let engine = Engine::new(&tokens[..]);
        let even = satisfy(|n: &i32| n % 2 == 0);
        assert_eq!(engine.run(&even).unwrap(), 4);
        assert!(engine.run(&even).is_err());
        let halved = select(|n: i32| (n > 5).then_some(n / 2));
        assert_eq!(engine.run(&halved).unwrap(), 3);
        assert!(engine.is_at_end());
    }
}
