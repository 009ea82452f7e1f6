//! Terminal parsers over `str`.
//!
//! Each terminal reads through [`Engine::accept`] and yields an owned
//! symbol. Runs of characters ([`take_while`], [`charset`]) take a
//! [`CountLimit`] on the number of characters they match.

use crate::{
    charset::CharSet,
    count::CountLimit,
    engine::Engine,
    error::GrammarError,
    input::Tail,
    outcome::{Match, Mismatch},
    parser::Parser,
    regex::{Captures, PrefixMatcher, Regex},
};

/// Matches `text` exactly.
#[derive(Debug, Clone)]
pub struct Literal {
    text: String,
}

pub fn literal(text: impl Into<String>) -> Literal {
    Literal { text: text.into() }
}

impl Parser<str> for Literal {
    type Output = String;

    fn parse(&self, engine: &Engine<'_, str>) -> Result<String, Mismatch> {
        engine
            .accept(|tail| {
                tail.rest()
                    .starts_with(self.text.as_str())
                    .then(|| tail.matched(self.text.clone(), self.text.len()))
            })
            .ok_or_else(|| Mismatch::expected(None, format!("{:?}", self.text)))
    }
}

/// Matches one character accepted by a predicate.
#[derive(Clone, Copy)]
pub struct Satisfy<F> {
    predicate: F,
}

pub fn satisfy<F: Fn(char) -> bool>(predicate: F) -> Satisfy<F> {
    Satisfy { predicate }
}

impl<F: Fn(char) -> bool> Parser<str> for Satisfy<F> {
    type Output = char;

    fn parse(&self, engine: &Engine<'_, str>) -> Result<char, Mismatch> {
        engine
            .accept(|tail| {
                let c = tail.rest().chars().next().filter(|&c| (self.predicate)(c))?;
                Some(tail.matched(c, c.len_utf8()))
            })
            .ok_or_else(|| Mismatch::expected(None, "a matching character"))
    }
}

/// Matches one character of a [`CharSet`].
#[derive(Debug, Clone)]
pub struct CharIn {
    set: CharSet,
}

pub fn char_in(set: CharSet) -> CharIn {
    CharIn { set }
}

impl Parser<str> for CharIn {
    type Output = char;

    fn parse(&self, engine: &Engine<'_, str>) -> Result<char, Mismatch> {
        engine
            .accept(|tail| {
                let c = tail.rest().chars().next().filter(|&c| self.set.contains(c))?;
                Some(tail.matched(c, c.len_utf8()))
            })
            .ok_or_else(|| Mismatch::expected(None, format!("one of {}", self.set)))
    }
}

/// The longest run of accepted characters allowed by `limit`, if the run
/// length satisfies it.
fn run_of(
    tail: Tail<'_, str>,
    limit: CountLimit,
    accepts: impl Fn(char) -> bool,
) -> Option<Match<String>> {
    let rest = tail.rest();
    let mut count = 0;
    let mut len = 0;
    for c in rest.chars() {
        if !limit.wants_more(count) || !accepts(c) {
            break;
        }
        count += 1;
        len += c.len_utf8();
    }
    limit
        .admits(count)
        .then(|| tail.matched(rest[..len].to_owned(), len))
}

/// Matches a run of characters accepted by a predicate.
#[derive(Clone, Copy)]
pub struct TakeWhile<F> {
    predicate: F,
    limit: CountLimit,
}

pub fn take_while<F: Fn(char) -> bool>(limit: CountLimit, predicate: F) -> TakeWhile<F> {
    TakeWhile { predicate, limit }
}

impl<F: Fn(char) -> bool> Parser<str> for TakeWhile<F> {
    type Output = String;

    fn parse(&self, engine: &Engine<'_, str>) -> Result<String, Mismatch> {
        engine
            .accept(|tail| run_of(tail, self.limit, &self.predicate))
            .ok_or_else(|| {
                Mismatch::expected(None, format!("{} matching characters", self.limit))
            })
    }
}

/// Matches a run of characters from a [`CharSet`].
#[derive(Debug, Clone)]
pub struct Charset {
    set: CharSet,
    limit: CountLimit,
}

pub fn charset(set: CharSet, limit: CountLimit) -> Charset {
    Charset { set, limit }
}

impl Parser<str> for Charset {
    type Output = String;

    fn parse(&self, engine: &Engine<'_, str>) -> Result<String, Mismatch> {
        engine
            .accept(|tail| run_of(tail, self.limit, |c| self.set.contains(c)))
            .ok_or_else(|| {
                Mismatch::expected(None, format!("{} characters of {}", self.limit, self.set))
            })
    }
}

/// Matches whatever a [`PrefixMatcher`] matches at the cursor, yielding the
/// matched text and its capture groups.
#[derive(Debug, Clone)]
pub struct RegexMatch<M = Regex> {
    matcher: M,
    description: String,
}

/// Compile `pattern` into an anchored regex terminal.
///
/// ```
/// # use parse_core::*;
/// let escape = text::regex(r"\\u([0-9a-fA-F]{4})").unwrap();
/// let captures = parse(&escape, r"\u00e9").unwrap();
/// assert_eq!(captures.group(1), Some("00e9"));
/// ```
pub fn regex(pattern: &str) -> Result<RegexMatch, GrammarError> {
    let matcher = Regex::new(pattern).map_err(|source| GrammarError::Regex {
        pattern: pattern.to_owned(),
        source,
    })?;
    Ok(regex_with(matcher, format!("regular expression `{pattern}`")))
}

/// A terminal for any [`PrefixMatcher`]; `description` names what it
/// matches in mismatches.
pub fn regex_with<M: PrefixMatcher>(
    matcher: M,
    description: impl Into<String>,
) -> RegexMatch<M> {
    RegexMatch {
        matcher,
        description: description.into(),
    }
}

impl<M: PrefixMatcher> Parser<str> for RegexMatch<M> {
    type Output = Captures;

    fn parse(&self, engine: &Engine<'_, str>) -> Result<Captures, Mismatch> {
        engine
            .accept(|tail| {
                let captures = self.matcher.match_prefix(tail.input(), tail.position())?;
                let len = captures.text.len();
                Some(tail.matched(captures, len))
            })
            .ok_or_else(|| {
                Mismatch::expected(None, format!("text matching {}", self.description))
            })
    }
}
