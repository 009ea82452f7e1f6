use std::cell::RefCell;
use std::fmt::Debug;

use rustc_hash::FxHashMap;

use super::{AnySymbol, Body, Call, Policy};
use crate::outcome::{Outcome, Tag};

/// The identity of a memoized call.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Key {
    pub position: usize,
    pub tag: Tag,
}

/// Packrat cache keyed by position and tag.
///
/// Outcomes of different symbol types share one map, so they are stored
/// type-erased; the engine checks the type when it takes a symbol back out.
/// Untagged calls are never cached.
///
/// Besides avoiding repeated work, the cache is what makes left recursion
/// converge: a re-entrant call at the same position answers with whatever is
/// cached so far, and an outer call that manages to consume more input
/// replaces the entry. Entries only ever grow.
#[derive(Default)]
pub struct Memoizer {
    map: RefCell<FxHashMap<Key, Outcome<AnySymbol>>>,
}

impl Debug for Memoizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.map.borrow().keys()).finish()
    }
}

impl Memoizer {
    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.map.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.borrow().is_empty()
    }

    pub fn get(&self, key: &Key) -> Option<Outcome<AnySymbol>> {
        self.map.borrow().get(key).cloned()
    }

    pub fn insert(&self, key: Key, outcome: Outcome<AnySymbol>) {
        self.map.borrow_mut().insert(key, outcome);
    }
}

/// Whether `candidate` should replace `cached`: only a success that beats a
/// failure, or that consumed strictly more input.
fn improves<T>(cached: &Outcome<T>, candidate: &Outcome<T>) -> bool {
    match (cached, candidate) {
        (_, Err(_)) => false,
        (Err(_), Ok(_)) => true,
        (Ok(cached), Ok(candidate)) => candidate.span.end > cached.span.end,
    }
}

impl Policy for Memoizer {
    fn trace(&self, call: &Call<'_>, body: Body<'_>) -> Outcome<AnySymbol> {
        let Some(tag) = call.tag else {
            return body();
        };
        let key = Key {
            position: call.position,
            tag: tag.clone(),
        };
        if let Some(cached) = self.get(&key) {
            tracing::trace!(%tag, position = call.position, "memo hit");
            return cached;
        }

        let candidate = body();
        // Re-entrant calls made by `body` may have filled the entry already.
        if let Some(cached) = self.get(&key) {
            if !improves(&cached, &candidate) {
                return cached;
            }
        }
        tracing::trace!(
            %tag,
            position = call.position,
            matched = candidate.is_ok(),
            "memo store"
        );
        self.insert(key, candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;
    use crate::outcome::{Match, Mismatch, Span};

    fn call(tag: &Tag) -> Call<'_> {
        Call {
            position: 3,
            tag: Some(tag),
            remaining: 10,
        }
    }

    fn matched(symbol: &'static str, end: usize) -> Outcome<AnySymbol> {
        Ok(Match::new(Rc::new(symbol) as AnySymbol, Span::new(3, end)))
    }

    /// The symbol and extent of an outcome, for comparisons.
    fn seen(outcome: &Outcome<AnySymbol>) -> Option<(&'static str, usize)> {
        let matched = outcome.as_ref().ok()?;
        let symbol = matched.symbol.downcast_ref::<&'static str>()?;
        Some((*symbol, matched.span.end))
    }

    #[test]
    fn second_call_is_answered_from_cache() {
        let memo = Memoizer::default();
        let tag = Tag::from("rule");
        let runs = Cell::new(0);
        let mut body = || {
            runs.set(runs.get() + 1);
            matched("x", 5)
        };
        assert_eq!(seen(&memo.trace(&call(&tag), &mut body)), Some(("x", 5)));
        assert_eq!(seen(&memo.trace(&call(&tag), &mut body)), Some(("x", 5)));
        assert_eq!(runs.get(), 1);
        assert_eq!(memo.len(), 1);
    }

    #[test]
    fn untagged_calls_are_not_cached() {
        let memo = Memoizer::default();
        let call = Call {
            position: 0,
            tag: None,
            remaining: 0,
        };
        let _ = memo.trace(&call, &mut || matched("x", 4));
        assert!(memo.is_empty());
    }

    #[test]
    fn only_longer_matches_replace_the_entry() {
        let memo = Memoizer::default();
        let tag = Tag::from("rule");
        let key = Key {
            position: 3,
            tag: tag.clone(),
        };

        // A re-entrant call stores a longer match while the outer body runs.
        let outcome = memo.trace(&call(&tag), &mut || {
            memo.insert(key.clone(), matched("inner", 6));
            matched("outer", 4)
        });
        assert_eq!(seen(&outcome), Some(("inner", 6)));

        let outcome = memo.trace(&call(&tag), &mut || unreachable!("cached"));
        assert_eq!(seen(&outcome), Some(("inner", 6)));

        memo.map.borrow_mut().clear();
        let outcome = memo.trace(&call(&tag), &mut || {
            memo.insert(key.clone(), Err(Mismatch::empty()));
            matched("outer", 4)
        });
        assert_eq!(seen(&outcome), Some(("outer", 4)));
        assert_eq!(memo.get(&key).as_ref().and_then(seen), Some(("outer", 4)));
    }

    #[test]
    fn ties_keep_the_cached_entry() {
        let memo = Memoizer::default();
        let tag = Tag::from("rule");
        let key = Key {
            position: 3,
            tag: tag.clone(),
        };
        let outcome = memo.trace(&call(&tag), &mut || {
            memo.insert(key.clone(), matched("cached", 5));
            matched("fresh", 5)
        });
        assert_eq!(seen(&outcome), Some(("cached", 5)));
    }

    #[test]
    fn failures_are_cached_too() {
        let memo = Memoizer::default();
        let tag = Tag::from("rule");
        let _ = memo.trace(&call(&tag), &mut || Err(Mismatch::expected(None, "digit")));
        let outcome = memo.trace(&call(&tag), &mut || unreachable!("cached"));
        assert_eq!(outcome.unwrap_err().to_string(), "Expected digit");
    }
}
