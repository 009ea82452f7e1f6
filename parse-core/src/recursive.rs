use std::rc::Rc;

use crate::{
    arena::{Arena, Slot, SlotError},
    engine::Engine,
    error::GrammarError,
    input::Input,
    outcome::{Mismatch, Tag},
    parser::Parser,
    rule::Rule,
};

/// A parser that can be referenced before it is defined.
///
/// Declare every recursive rule of a grammar up front, build the parsers
/// that refer to the handles, then [`define`](Recursive::define) each
/// handle. Handles are tagged so that left-recursive references are depth
/// limited and memoized.
///
/// ```
/// # use parse_core::*;
/// let arena = Arena::new();
/// let value = Recursive::<str, usize>::declare(&arena, "value");
/// let array = text::literal("[")
///     .ignore_then(list(value.clone(), text::literal(",")))
///     .then_ignore(text::literal("]"))
///     .map(|items| items.into_iter().max().unwrap_or(0) + 1);
/// value.define(one_of((array, text::literal("0").map(|_| 0)))).unwrap();
/// assert_eq!(parse(&value, "[0,[[0]],[]]").unwrap(), 3);
/// ```
pub struct Recursive<I: ?Sized, T> {
    slot: Slot<Rule<I, T>>,
    tag: Tag,
}

impl<I: ?Sized, T> Clone for Recursive<I, T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            tag: self.tag.clone(),
        }
    }
}

impl<I, T> Recursive<I, T>
where
    I: ?Sized + Input + 'static,
    T: Clone + 'static,
{
    pub fn declare(arena: &Rc<Arena>, tag: impl Into<Tag>) -> Self {
        Recursive {
            slot: arena.alloc(),
            tag: tag.into(),
        }
    }

    /// Give the handle its parser. A handle can be defined only once.
    pub fn define(
        &self,
        parser: impl Parser<I, Output = T> + 'static,
    ) -> Result<(), GrammarError> {
        self.slot.store(parser.boxed()).map_err(|error| match error {
            SlotError::Occupied => GrammarError::Redefined(self.tag.to_string()),
            SlotError::Dropped | SlotError::Vacant => {
                GrammarError::ArenaDropped(self.tag.to_string())
            }
        })
    }
}

impl<I, T> Parser<I> for Recursive<I, T>
where
    I: ?Sized + Input + 'static,
    T: Clone + 'static,
{
    type Output = T;

    fn tag(&self) -> Option<&Tag> {
        Some(&self.tag)
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<T, Mismatch> {
        match self.slot.get() {
            Ok(rule) => rule.parse(engine),
            Err(SlotError::Dropped) => Err(Mismatch::expected(
                Some(self.tag.clone()),
                "a rule whose arena is still alive",
            )),
            Err(SlotError::Vacant | SlotError::Occupied) => Err(Mismatch::expected(
                Some(self.tag.clone()),
                "a defined rule (declared but never defined)",
            )),
        }
    }
}
