//! A JSON value grammar built from `parse-core` combinators.
//!
//! ```
//! use parse_json::{Json, JsonParser};
//!
//! let parser = JsonParser::new().unwrap();
//! let value = parser.parse(r#"{"answer": [42, true]}"#).unwrap();
//! assert_eq!(
//!     value,
//!     Json::Object([(
//!         "answer".to_string(),
//!         Json::Array(vec![Json::Number(42.0), Json::Bool(true)]),
//!     )]
//!     .into()),
//! );
//! ```

use std::{collections::BTreeMap, rc::Rc};

use parse_core::{
    list, many, maybe, one_of, parse,
    text::{self, Charset},
    Arena, CharSet, CountLimit, GrammarError, IgnoreThen, Labelled, Mismatch, ParseError, Parser,
    Recursive, Rule,
};
use serde::Serialize;

/// A parsed JSON value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Json {
    Object(BTreeMap<String, Json>),
    Array(Vec<Json>),
    Number(f64),
    String(String),
    Bool(bool),
    Null,
}

/// A compiled JSON grammar.
///
/// Building the grammar compiles a regular expression, so build it once and
/// reuse it for every document.
pub struct JsonParser {
    start: Rule<str, Json>,
    // Owns the `value` rule that `start` refers to.
    _arena: Rc<Arena>,
}

impl JsonParser {
    pub fn new() -> Result<Self, GrammarError> {
        let arena = Arena::new();
        let value = Recursive::<str, Json>::declare(&arena, "value");
        let string = string()?;
        value.define(
            one_of((
                object(&value, string.clone())
                    .map(Json::Object)
                    .labelled("object"),
                array(&value).map(Json::Array).labelled("array"),
                number().map(Json::Number).labelled("number"),
                token(string).map(Json::String).labelled("string literal"),
                boolean().map(Json::Bool).labelled("boolean literal"),
                token(text::literal("null")).map(|_| Json::Null).labelled("null"),
            ))
            .with_tag("value"),
        )?;

        Ok(JsonParser {
            start: value.then_ignore(whitespace()).boxed(),
            _arena: arena,
        })
    }

    /// Parse a complete document; trailing whitespace is allowed.
    pub fn parse(&self, source: &str) -> Result<Json, ParseError> {
        let result = parse(&self.start, source);
        if let Err(error) = &result {
            tracing::debug!(position = ?error.position(), %error, "document rejected");
        }
        result
    }
}

fn whitespace() -> Labelled<Charset> {
    text::charset(CharSet::chars(" \t\n\r"), CountLimit::at_least(0)).labelled("whitespace")
}

/// `parser` after insignificant whitespace.
fn token<P: Parser<str>>(parser: P) -> IgnoreThen<Labelled<Charset>, P> {
    whitespace().ignore_then(parser)
}

fn object(
    value: &Recursive<str, Json>,
    key: Rule<str, String>,
) -> Rule<str, BTreeMap<String, Json>> {
    let property = token(key)
        .then_ignore(token(text::literal(":")))
        .then(value.clone())
        .labelled("property");

    token(text::literal("{"))
        .ignore_then(list(property, token(text::literal(","))))
        .then_ignore(token(text::literal("}")))
        // Later duplicates overwrite earlier ones.
        .map(|properties| properties.into_iter().collect::<BTreeMap<_, _>>())
        .boxed()
}

fn array(value: &Recursive<str, Json>) -> Rule<str, Vec<Json>> {
    token(text::literal("["))
        .ignore_then(list(value.clone(), token(text::literal(","))))
        .then_ignore(token(text::literal("]")))
        .boxed()
}

fn boolean() -> Rule<str, bool> {
    token(one_of((
        text::literal("true").map(|_| true),
        text::literal("false").map(|_| false),
    )))
    .boxed()
}

fn number() -> Rule<str, f64> {
    let digits = |limit| text::charset(CharSet::range('0'..='9'), limit);

    let integer = one_of((
        text::literal("0"),
        text::char_in(CharSet::range('1'..='9'))
            .then(digits(CountLimit::at_least(0)))
            .map(|(first, rest)| format!("{first}{rest}")),
    ));
    let fraction = text::literal(".")
        .then(digits(CountLimit::at_least(1)))
        .map(|(dot, digits)| dot + &digits);
    let exponent = text::char_in(CharSet::chars("eE"))
        .then(maybe(text::char_in(CharSet::chars("+-"))))
        .then(digits(CountLimit::at_least(1)))
        .map(|((e, sign), digits)| {
            let sign = sign.map(String::from).unwrap_or_default();
            format!("{e}{sign}{digits}")
        });

    token(
        maybe(text::literal("-"))
            .then(integer)
            .then(maybe(fraction))
            .then(maybe(exponent)),
    )
    .try_map(|(((minus, integer), fraction), exponent)| {
        let literal: String = [minus, Some(integer), fraction, exponent]
            .into_iter()
            .flatten()
            .collect();
        literal
            .parse::<f64>()
            .map_err(|_| Mismatch::expected(None, "a double precision floating point number"))
    })
    .boxed()
}

/// A quoted string, without leading whitespace.
fn string() -> Result<Rule<str, String>, GrammarError> {
    let unescaped = CharSet::chars("\"\\")
        .union(&CharSet::range('\0'..='\u{1f}'))
        .inverted();

    let simple_escape = text::char_in(CharSet::chars("\"\\/bfnrt")).map(|c| match c {
        'b' => '\u{8}',
        'f' => '\u{c}',
        'n' => '\n',
        'r' => '\r',
        't' => '\t',
        other => other,
    });
    // A high surrogate escape swallows the low surrogate escape after it.
    let unicode_escape = text::literal("u")
        .ignore_then(text::regex(r"([0-9A-Fa-f]{4})(?:\\u([dD][c-fC-F][0-9A-Fa-f]{2}))?")?)
        .try_map(|captures| {
            decode_unicode_escape(captures.group(1), captures.group(2)).ok_or_else(|| {
                let escape = &captures.text;
                Mismatch::expected(None, format!("a valid unicode escape, not `{escape}`"))
            })
        });
    let escape = text::literal("\\")
        .ignore_then(one_of((simple_escape, unicode_escape)))
        .map(String::from)
        .labelled("escape sequence");

    Ok(text::literal("\"")
        .ignore_then(many(one_of((
            text::charset(unescaped, CountLimit::at_least(1)),
            escape,
        ))))
        .then_ignore(text::literal("\""))
        .map(|parts| parts.concat())
        .boxed())
}

fn decode_unicode_escape(high: Option<&str>, low: Option<&str>) -> Option<char> {
    let high = u32::from_str_radix(high?, 16).ok()?;
    match low {
        None => char::from_u32(high),
        Some(low) if (0xD800..0xDC00).contains(&high) => {
            let low = u32::from_str_radix(low, 16).ok()?;
            char::from_u32(0x10000 + ((high - 0xD800) << 10) + (low - 0xDC00))
        }
        Some(_) => None,
    }
}

/// 1-based line and column (in characters) of a byte offset in `source`.
pub fn line_col(source: &str, offset: usize) -> (usize, usize) {
    let before = source.get(..offset).unwrap_or(source);
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |index| index + 1);
    (line, before[line_start..].chars().count() + 1)
}
