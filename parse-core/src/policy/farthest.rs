use std::cell::RefCell;
use std::fmt;

use super::{AnySymbol, Body, Call, Policy};
use crate::outcome::{describe, Mismatch, Outcome, Tag};

/// One active call on the tracer's stack.
///
/// Immediately repeated calls with the same position and tag share a frame
/// and bump its `depth`, which keeps traces short under repetition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub position: usize,
    pub tag: Option<Tag>,
    pub depth: usize,
}

/// A snapshot of the call stack, outermost call first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trace(pub Vec<Frame>);

impl Trace {
    pub fn frames(&self) -> &[Frame] {
        &self.0
    }
}

/// Renders the tagged frames innermost first, e.g. `5:value ◂ 1:member ◂ 0:object`.
impl fmt::Display for Trace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for frame in self.0.iter().rev().filter(|frame| frame.tag.is_some()) {
            if !first {
                f.write_str(" ◂ ")?;
            }
            first = false;
            write!(f, "{}:{}", frame.position, describe(frame.tag.as_ref()))?;
            if frame.depth > 1 {
                write!(f, "×{}", frame.depth)?;
            }
        }
        Ok(())
    }
}

/// A mismatch together with the calls that led to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub trace: Trace,
    pub mismatch: Mismatch,
}

/// Every failure recorded at the deepest failing position of a parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FarthestFailure {
    pub position: usize,
    pub failures: Vec<Failure>,
}

impl fmt::Display for FarthestFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Mismatches at position {}:", self.position)?;
        for failure in &self.failures {
            write!(f, "\n\n{}\n{}", failure.trace, failure.mismatch)?;
        }
        Ok(())
    }
}

/// Remembers the mismatches produced farthest into the input.
///
/// Backtracking throws most failures away, and the outermost one is usually
/// the least helpful ("cannot parse document"). The failure that started
/// deepest into the input is what a user wants to see.
#[derive(Debug, Default)]
pub struct FarthestMismatchTracer {
    stack: RefCell<Vec<Frame>>,
    farthest: RefCell<Option<FarthestFailure>>,
}

impl FarthestMismatchTracer {
    /// The current call stack.
    pub fn trace_snapshot(&self) -> Trace {
        Trace(self.stack.borrow().clone())
    }

    fn enter(&self, position: usize, tag: Option<&Tag>) {
        let mut stack = self.stack.borrow_mut();
        match stack.last_mut() {
            Some(frame) if frame.position == position && frame.tag.as_ref() == tag => {
                frame.depth += 1;
            }
            _ => stack.push(Frame {
                position,
                tag: tag.cloned(),
                depth: 1,
            }),
        }
    }

    fn leave(&self) {
        let mut stack = self.stack.borrow_mut();
        if let Some(frame) = stack.last_mut() {
            if frame.depth > 1 {
                frame.depth -= 1;
            } else {
                stack.pop();
            }
        }
    }

    fn register(&self, position: usize, mismatch: &Mismatch) {
        let mut farthest = self.farthest.borrow_mut();
        if let Some(current) = farthest.as_mut() {
            if position < current.position {
                return;
            }
            if position == current.position {
                if current.failures.last().map(|failure| &failure.mismatch) != Some(mismatch) {
                    current.failures.push(Failure {
                        trace: self.trace_snapshot(),
                        mismatch: mismatch.clone(),
                    });
                }
                return;
            }
        }
        tracing::debug!(position, %mismatch, "new farthest failure");
        *farthest = Some(FarthestFailure {
            position,
            failures: vec![Failure {
                trace: self.trace_snapshot(),
                mismatch: mismatch.clone(),
            }],
        });
    }
}

impl Policy for FarthestMismatchTracer {
    fn trace(&self, call: &Call<'_>, body: Body<'_>) -> Outcome<AnySymbol> {
        self.enter(call.position, call.tag);
        let outcome = body();
        if let Err(mismatch) = &outcome {
            self.register(call.position, mismatch);
        }
        self.leave();
        outcome
    }

    fn farthest_failure(&self) -> Option<FarthestFailure> {
        self.farthest.borrow().clone()
    }

    fn report(&self) -> Option<String> {
        self.farthest.borrow().as_ref().map(ToString::to_string)
    }
}
