use std::cell::RefCell;

use rustc_hash::FxHashMap;

use super::{AnySymbol, Body, Call, Policy};
use crate::outcome::{Mismatch, Outcome, Tag};

/// Bounds how often a tagged call may be re-entered at the same position.
///
/// A match can consume at most the remaining input, so a rule that calls
/// itself at an unchanged position more often than there are elements left
/// cannot produce anything new. Such calls are refused with a mismatch,
/// which turns left recursion into a finite descent that the [`Memoizer`]
/// then grows into the longest match.
///
/// [`Memoizer`]: super::Memoizer
#[derive(Debug, Default)]
pub struct DepthLimiter {
    depths: RefCell<FxHashMap<usize, FxHashMap<Tag, usize>>>,
}

impl DepthLimiter {
    /// How many calls to `tag` are currently active at `position`.
    pub fn depth(&self, position: usize, tag: &Tag) -> usize {
        self.depths
            .borrow()
            .get(&position)
            .and_then(|tags| tags.get(tag))
            .copied()
            .unwrap_or(0)
    }

    fn set(&self, position: usize, tag: &Tag, depth: usize) {
        let mut depths = self.depths.borrow_mut();
        if depth > 0 {
            depths
                .entry(position)
                .or_default()
                .insert(tag.clone(), depth);
        } else if let Some(tags) = depths.get_mut(&position) {
            tags.remove(tag);
            if tags.is_empty() {
                depths.remove(&position);
            }
        }
    }
}

impl Policy for DepthLimiter {
    fn trace(&self, call: &Call<'_>, body: Body<'_>) -> Outcome<AnySymbol> {
        let Some(tag) = call.tag else {
            return body();
        };

        let depth = self.depth(call.position, tag);
        if depth > call.remaining {
            tracing::debug!(%tag, position = call.position, depth, "recursion refused");
            return Err(Mismatch::expected(
                Some(tag.clone()),
                format!(
                    "at most {} nested attempts at this position (recursion bound exceeded)",
                    call.remaining + 1
                ),
            ));
        }

        self.set(call.position, tag, depth + 1);
        let outcome = body();
        self.set(call.position, tag, depth);
        outcome
    }
}
