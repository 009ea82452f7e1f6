//! Cross-cutting execution policies.
//!
//! Every [`Engine::run`](crate::Engine::run) call is threaded through a
//! [`Policy`] before the parser body executes. Policies see the position and
//! tag of the call and the outcome of the body, and may answer without
//! running the body at all (the [`Memoizer`]) or refuse to run it (the
//! [`DepthLimiter`]).
//!
//! Policies compose with [`Chain`]: `Chain::new(outer, inner)` lets `outer`
//! wrap `inner`, which wraps the body. The [`Standard`] chain is
//!
//! ```text
//! FarthestMismatchTracer( DepthLimiter( Memoizer( body ) ) )
//! ```
//!
//! Depth limiting wraps memoization so a refused re-entrant call never
//! poisons the cache, and the tracer sits outermost so it observes every
//! attempted outcome, refusals included.

mod depth;
mod farthest;
mod memo;

pub use depth::DepthLimiter;
pub use farthest::{Failure, FarthestFailure, FarthestMismatchTracer, Frame, Trace};
pub use memo::{Key, Memoizer};

use std::{any::Any, rc::Rc};

use crate::outcome::{Outcome, Tag};

/// A symbol as policies see it: shared and type-erased.
///
/// Policies handle outcomes of every parser in the grammar through one
/// interface; the engine downcasts back to the parser's symbol type.
pub type AnySymbol = Rc<dyn Any>;

/// The parser body a policy wraps.
pub type Body<'a> = &'a mut dyn FnMut() -> Outcome<AnySymbol>;

/// The identity of one attempted parser call.
#[derive(Debug, Clone, Copy)]
pub struct Call<'a> {
    /// Cursor position when the call started.
    pub position: usize,
    /// The tag of the parser being called, if any.
    pub tag: Option<&'a Tag>,
    /// Over-estimate of the input elements left from `position`.
    pub remaining: usize,
}

/// A hook wrapped around every traced parser call.
pub trait Policy {
    /// Run `body` for `call`, possibly short-circuiting or post-processing it.
    fn trace(&self, call: &Call<'_>, body: Body<'_>) -> Outcome<AnySymbol>;

    /// The deepest failure observed so far, if this policy tracks one.
    fn farthest_failure(&self) -> Option<FarthestFailure> {
        None
    }

    /// A human-readable summary of what the policy observed.
    fn report(&self) -> Option<String> {
        None
    }
}

/// The identity policy.
impl Policy for () {
    fn trace(&self, _call: &Call<'_>, body: Body<'_>) -> Outcome<AnySymbol> {
        body()
    }
}

/// Two policies, `outer` wrapping `inner`.
#[derive(Debug, Default)]
pub struct Chain<Outer, Inner> {
    pub outer: Outer,
    pub inner: Inner,
}

impl<Outer, Inner> Chain<Outer, Inner> {
    pub fn new(outer: Outer, inner: Inner) -> Self {
        Self { outer, inner }
    }
}

impl<Outer: Policy, Inner: Policy> Policy for Chain<Outer, Inner> {
    fn trace(&self, call: &Call<'_>, body: Body<'_>) -> Outcome<AnySymbol> {
        self.outer.trace(call, &mut || self.inner.trace(call, &mut *body))
    }

    fn farthest_failure(&self) -> Option<FarthestFailure> {
        self.outer
            .farthest_failure()
            .or_else(|| self.inner.farthest_failure())
    }

    fn report(&self) -> Option<String> {
        match (self.outer.report(), self.inner.report()) {
            (Some(outer), Some(inner)) => Some(format!("{outer}\n\n{inner}")),
            (outer, inner) => outer.or(inner),
        }
    }
}

/// The policy chain used by [`Engine::new`](crate::Engine::new).
pub type Standard = Chain<FarthestMismatchTracer, Chain<DepthLimiter, Memoizer>>;
