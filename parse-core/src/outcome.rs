//! What a parser produces: a [`Match`] on success, a [`Mismatch`] otherwise.

use std::{fmt, rc::Rc};

/// A span in the source, measured in input positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Span {
    /// The start of the span, inclusive
    pub start: usize,
    /// The end of the span, exclusive
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end, "span ends before it starts");
        Self { start, end }
    }

    /// Number of positions covered by the span.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<std::ops::Range<usize>> for Span {
    fn from(range: std::ops::Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A diagnostic label attached to a parser.
///
/// Tags show up in error messages and call traces, and together with a
/// position they identify a call for memoization and depth accounting.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(Rc<str>);

impl Tag {
    pub fn new(name: impl AsRef<str>) -> Self {
        Tag(Rc::from(name.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Tag {
    fn from(name: &str) -> Self {
        Tag::new(name)
    }
}

impl From<String> for Tag {
    fn from(name: String) -> Self {
        Tag(Rc::from(name))
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&*self.0, f)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Render an optional tag the way traces and expectations print it.
pub(crate) fn describe(tag: Option<&Tag>) -> String {
    match tag {
        Some(tag) => tag.to_string(),
        None => "<untagged>".to_owned(),
    }
}

/// A successfully parsed symbol together with the input it consumed.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<T> {
    pub symbol: T,
    pub span: Span,
}

impl<T> Match<T> {
    pub fn new(symbol: T, span: Span) -> Self {
        Self { symbol, span }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Match<U> {
        Match {
            symbol: f(self.symbol),
            span: self.span,
        }
    }
}

/// Why a parser did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reason {
    /// Free-text description of what was expected.
    Expected(String),
    /// A more specific mismatch this one was caused by.
    Cause(Box<Mismatch>),
}

/// A structured, always recoverable parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mismatch {
    pub tag: Option<Tag>,
    pub reason: Option<Reason>,
}

impl Mismatch {
    pub fn new(tag: Option<Tag>, reason: Option<Reason>) -> Self {
        Self { tag, reason }
    }

    /// The "no match" mismatch: no tag, no reason.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn expected(tag: Option<Tag>, expectation: impl Into<String>) -> Self {
        Self::new(tag, Some(Reason::Expected(expectation.into())))
    }

    /// Wrap `cause` under `tag`, keeping it reachable through [`Mismatch::root_cause`].
    pub fn caused_by(tag: Option<Tag>, cause: Mismatch) -> Self {
        Self::new(tag, Some(Reason::Cause(Box::new(cause))))
    }

    /// The innermost mismatch of the cause chain.
    pub fn root_cause(&self) -> &Mismatch {
        let mut current = self;
        while let Some(Reason::Cause(cause)) = &current.reason {
            current = cause;
        }
        current
    }
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.tag, &self.reason) {
            (Some(tag), Some(Reason::Expected(what))) => {
                write!(f, "Cannot parse {tag}: expected {what}")
            }
            (Some(tag), Some(Reason::Cause(cause))) => write!(f, "Cannot parse {tag}: {cause}"),
            (Some(tag), None) => write!(f, "Cannot parse {tag}"),
            (None, Some(Reason::Expected(what))) => write!(f, "Expected {what}"),
            (None, Some(Reason::Cause(cause))) => cause.fmt(f),
            (None, None) => f.write_str("No match"),
        }
    }
}

impl std::error::Error for Mismatch {}

/// The result of one traced parser call.
pub type Outcome<T> = Result<Match<T>, Mismatch>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_mismatch_renders_generic_message() {
        assert_eq!(Mismatch::empty().to_string(), "No match");
    }

    #[test]
    fn mismatch_messages() {
        let tagged = Mismatch::expected(Some("NUMBER".into()), "a digit");
        assert_eq!(tagged.to_string(), "Cannot parse NUMBER: expected a digit");
        let untagged = Mismatch::expected(None, "end of input");
        assert_eq!(untagged.to_string(), "Expected end of input");
        let bare = Mismatch::new(Some("LIST".into()), None);
        assert_eq!(bare.to_string(), "Cannot parse LIST");
    }

    #[test]
    fn cause_chain_keeps_deepest_reason() {
        let inner = Mismatch::expected(None, "\"}\"");
        let outer = Mismatch::caused_by(
            Some("object".into()),
            Mismatch::caused_by(Some("members".into()), inner.clone()),
        );
        assert_eq!(outer.root_cause(), &inner);
        assert_eq!(
            outer.to_string(),
            "Cannot parse object: Cannot parse members: Expected \"}\""
        );
    }
}
