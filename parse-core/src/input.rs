//! Sources the engine can read from.

use std::ops::{Index, RangeFrom};

use crate::outcome::{Match, Span};

/// An indexable, immutable sequence the engine parses.
///
/// Positions are `usize` offsets: byte offsets on character boundaries for
/// `str`, element indices for slices.
pub trait Input: Index<RangeFrom<usize>, Output = Self> {
    /// The position just past the last element.
    fn end(&self) -> usize;

    /// An over-estimate of how many elements remain from `position` onward.
    ///
    /// The depth limiter uses this as the re-entrancy bound, so it must never
    /// be smaller than the true element count.
    fn remaining(&self, position: usize) -> usize {
        self.end().saturating_sub(position)
    }
}

impl Input for str {
    fn end(&self) -> usize {
        self.len()
    }
}

impl<T> Input for [T] {
    fn end(&self) -> usize {
        self.len()
    }
}

/// A non-destructive view of the input from the current position to its end.
///
/// This is what [`Engine::accept`](crate::Engine::accept) hands to a probe.
pub struct Tail<'src, I: ?Sized> {
    input: &'src I,
    start: usize,
}

impl<I: ?Sized> Clone for Tail<'_, I> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<I: ?Sized> Copy for Tail<'_, I> {}

impl<'src, I: ?Sized + Input> Tail<'src, I> {
    pub(crate) fn new(input: &'src I, start: usize) -> Self {
        Self { input, start }
    }

    /// The whole input, for matchers that need context before the cursor.
    pub fn input(&self) -> &'src I {
        self.input
    }

    /// The position the view starts at.
    pub fn position(&self) -> usize {
        self.start
    }

    /// The remaining input.
    pub fn rest(&self) -> &'src I {
        &self.input[self.start..]
    }

    pub fn is_empty(&self) -> bool {
        self.start >= self.input.end()
    }

    /// A match of `len` positions starting here.
    pub fn matched<T>(&self, symbol: T, len: usize) -> Match<T> {
        Match::new(symbol, Span::new(self.start, self.start + len))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_tail_is_a_suffix() {
        let tail = Tail::new("hello", 2);
        assert_eq!(tail.rest(), "llo");
        assert_eq!(tail.matched('l', 1).span, Span::new(2, 3));
        assert!(!tail.is_empty());
        assert!(Tail::new("hello", 5).is_empty());
    }

    #[test]
    fn slice_remaining_counts_elements() {
        let tokens = [1, 2, 3];
        assert_eq!(tokens[..].remaining(1), 2);
        assert_eq!(tokens[..].remaining(3), 0);
    }

    #[test]
    fn str_remaining_over_estimates_chars() {
        let text = "héllo";
        assert!(text.remaining(0) >= text.chars().count());
    }
}
