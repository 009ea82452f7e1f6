use std::{
    any::Any,
    cell::{OnceCell, RefCell},
    marker::PhantomData,
    rc::{Rc, Weak},
};

/// Owner of the parsers behind [`Recursive`](crate::Recursive) handles.
///
/// Handles only hold weak references into the arena, so grammars that refer
/// to themselves do not leak. Keep the arena alive for as long as the
/// grammar is used.
pub struct Arena {
    slots: RefCell<Vec<OnceCell<Rc<dyn Any>>>>,
}

impl Arena {
    pub fn new() -> Rc<Self> {
        Rc::new(Arena {
            slots: RefCell::new(Vec::new()),
        })
    }

    pub(crate) fn alloc<P>(self: &Rc<Self>) -> Slot<P> {
        let index = {
            let mut slots = self.slots.borrow_mut();
            slots.push(OnceCell::new());
            slots.len() - 1
        };

        Slot {
            arena: Rc::downgrade(self),
            index,
            _phantom: PhantomData,
        }
    }
}

/// Why a slot could not be filled or read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SlotError {
    Dropped,
    Occupied,
    Vacant,
}

pub(crate) struct Slot<P> {
    arena: Weak<Arena>,
    index: usize,
    _phantom: PhantomData<P>,
}

impl<P> Clone for Slot<P> {
    fn clone(&self) -> Self {
        Slot {
            arena: self.arena.clone(),
            index: self.index,
            _phantom: PhantomData,
        }
    }
}

impl<P: 'static> Slot<P> {
    pub(crate) fn store(&self, value: P) -> Result<(), SlotError> {
        let arena = self.arena.upgrade().ok_or(SlotError::Dropped)?;
        let slots = arena.slots.borrow();
        slots[self.index]
            .set(Rc::new(value))
            .map_err(|_| SlotError::Occupied)
    }

    pub(crate) fn get(&self) -> Result<Rc<P>, SlotError> {
        let arena = self.arena.upgrade().ok_or(SlotError::Dropped)?;
        let slots = arena.slots.borrow();
        let value = slots[self.index].get().ok_or(SlotError::Vacant)?.clone();
        // Slots are typed by construction; only `store` writes them.
        value.downcast().map_err(|_| SlotError::Vacant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_is_written_once() {
        let arena = Arena::new();
        let slot = arena.alloc::<u32>();
        assert_eq!(slot.get().unwrap_err(), SlotError::Vacant);
        slot.store(7).unwrap();
        assert_eq!(slot.store(8).unwrap_err(), SlotError::Occupied);
        assert_eq!(*slot.get().unwrap(), 7);
    }

    #[test]
    fn dropped_arena_is_reported() {
        let arena = Arena::new();
        let slot = arena.alloc::<u32>();
        drop(arena);
        assert_eq!(slot.store(1).unwrap_err(), SlotError::Dropped);
    }
}
