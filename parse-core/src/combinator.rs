use crate::{
    count::CountLimit,
    engine::Engine,
    input::Input,
    outcome::{Mismatch, Tag},
    parser::Parser,
};

#[derive(Clone, Copy)]
pub struct Map<P, F> {
    pub parser: P,
    pub f: F,
}

impl<I, U, P, F> Parser<I> for Map<P, F>
where
    I: ?Sized + Input,
    P: Parser<I>,
    F: Fn(P::Output) -> U,
    U: Clone + 'static,
{
    type Output = U;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<U, Mismatch> {
        engine.run(&self.parser).map(&self.f)
    }
}

#[derive(Clone, Copy)]
pub struct TryMap<P, F> {
    pub parser: P,
    pub f: F,
}

impl<I, U, P, F> Parser<I> for TryMap<P, F>
where
    I: ?Sized + Input,
    P: Parser<I>,
    F: Fn(P::Output) -> Result<U, Mismatch>,
    U: Clone + 'static,
{
    type Output = U;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<U, Mismatch> {
        engine.run(&self.parser).and_then(&self.f)
    }
}

#[derive(Clone, Copy)]
pub struct AndThen<P, F> {
    pub parser: P,
    pub f: F,
}

impl<I, P, Q, F> Parser<I> for AndThen<P, F>
where
    I: ?Sized + Input,
    P: Parser<I>,
    Q: Parser<I>,
    F: Fn(P::Output) -> Q,
{
    type Output = Q::Output;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Q::Output, Mismatch> {
        let value = engine.run(&self.parser)?;
        engine.run(&(self.f)(value))
    }
}

#[derive(Clone, Copy)]
pub struct Then<P1, P2> {
    pub parser1: P1,
    pub parser2: P2,
}

impl<I, P1, P2> Parser<I> for Then<P1, P2>
where
    I: ?Sized + Input,
    P1: Parser<I>,
    P2: Parser<I>,
{
    type Output = (P1::Output, P2::Output);

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch> {
        let value1 = engine.run(&self.parser1)?;
        let value2 = engine.run(&self.parser2)?;
        Ok((value1, value2))
    }
}

#[derive(Clone, Copy)]
pub struct ThenIgnore<P1, P2> {
    pub parser1: P1,
    pub parser2: P2,
}

impl<I, P1, P2> Parser<I> for ThenIgnore<P1, P2>
where
    I: ?Sized + Input,
    P1: Parser<I>,
    P2: Parser<I>,
{
    type Output = P1::Output;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<P1::Output, Mismatch> {
        let value1 = engine.run(&self.parser1)?;
        engine.run(&self.parser2)?;
        Ok(value1)
    }
}

#[derive(Clone, Copy)]
pub struct IgnoreThen<P1, P2> {
    pub parser1: P1,
    pub parser2: P2,
}

impl<I, P1, P2> Parser<I> for IgnoreThen<P1, P2>
where
    I: ?Sized + Input,
    P1: Parser<I>,
    P2: Parser<I>,
{
    type Output = P2::Output;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<P2::Output, Mismatch> {
        engine.run(&self.parser1)?;
        engine.run(&self.parser2)
    }
}

#[derive(Clone, Copy)]
pub struct MapErr<P, F> {
    pub parser: P,
    pub f: F,
}

impl<I, P, F> Parser<I> for MapErr<P, F>
where
    I: ?Sized + Input,
    P: Parser<I>,
    F: Fn(Mismatch) -> Mismatch,
{
    type Output = P::Output;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<P::Output, Mismatch> {
        engine.run(&self.parser).map_err(&self.f)
    }
}

#[derive(Clone)]
pub struct Labelled<P> {
    pub parser: P,
    pub tag: Tag,
}

impl<I, P> Parser<I> for Labelled<P>
where
    I: ?Sized + Input,
    P: Parser<I>,
{
    type Output = P::Output;

    fn tag(&self) -> Option<&Tag> {
        Some(&self.tag)
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<P::Output, Mismatch> {
        engine
            .run(&self.parser)
            .map_err(|cause| Mismatch::caused_by(Some(self.tag.clone()), cause))
    }
}

#[derive(Clone, Copy)]
pub struct Maybe<P> {
    pub parser: P,
}

impl<I, P> Parser<I> for Maybe<P>
where
    I: ?Sized + Input,
    P: Parser<I>,
{
    type Output = Option<P::Output>;

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch> {
        Ok(engine.run(&self.parser).ok())
    }
}

/// Repeats a parser as often as it matches, up to the limit's maximum.
///
/// An iteration that matches without consuming anything ends the repetition,
/// since repeating it would match the same nothing forever.
#[derive(Clone)]
pub struct Repeat<P> {
    pub parser: P,
    pub limit: CountLimit,
    pub tag: Option<Tag>,
}

impl<P> Repeat<P> {
    pub fn with_tag(self, tag: impl Into<Tag>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..self
        }
    }
}

impl<I, P> Parser<I> for Repeat<P>
where
    I: ?Sized + Input,
    P: Parser<I>,
{
    type Output = Vec<P::Output>;

    fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch> {
        let mut values = Vec::new();
        let mut last_failure = None;
        while self.limit.wants_more(values.len()) {
            match engine.run_match(&self.parser) {
                Ok(matched) => {
                    values.push(matched.symbol);
                    if matched.span.is_empty() {
                        break;
                    }
                }
                Err(mismatch) => {
                    last_failure = Some(mismatch);
                    break;
                }
            }
        }
        if self.limit.admits(values.len()) {
            return Ok(values);
        }
        Err(match (self.parser.tag(), last_failure) {
            (Some(item), _) => {
                Mismatch::expected(self.tag.clone(), format!("{} {item}", self.limit))
            }
            (None, Some(cause)) => Mismatch::caused_by(self.tag.clone(), cause),
            (None, None) => Mismatch::expected(self.tag.clone(), self.limit.to_string()),
        })
    }
}

/// `item (separator item)*`.
///
/// A failing first item yields an empty list rather than a mismatch. After
/// that, the repetition stops at the first separator or item that fails and
/// the cursor rests after the last complete item.
#[derive(Clone)]
pub struct List<P, S> {
    pub item: P,
    pub separator: S,
    pub tag: Option<Tag>,
}

impl<P, S> List<P, S> {
    pub fn with_tag(self, tag: impl Into<Tag>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..self
        }
    }
}

impl<I, P, S> Parser<I> for List<P, S>
where
    I: ?Sized + Input,
    P: Parser<I>,
    S: Parser<I>,
{
    type Output = Vec<P::Output>;

    fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<Self::Output, Mismatch> {
        let Ok(first) = engine.run(&self.item) else {
            return Ok(Vec::new());
        };
        let mut values = vec![first];
        let following = IgnoreThen {
            parser1: &self.separator,
            parser2: &self.item,
        };
        while let Ok(matched) = engine.run_match(&following) {
            values.push(matched.symbol);
            if matched.span.is_empty() {
                break;
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::{literal, satisfy};

    fn digit() -> impl Parser<str, Output = char> {
        satisfy(|c| c.is_ascii_digit()).labelled("digit")
    }

    #[test]
    fn map_transforms_only_successes() {
        let engine = Engine::new("7");
        let value = engine.run(&digit().map(|c| c.to_digit(10))).unwrap();
        assert_eq!(value, Some(7));
        let engine = Engine::new("x");
        assert!(engine.run(&digit().map(|c| c.to_digit(10))).is_err());
    }

    #[test]
    fn try_map_reports_validation_failures() {
        let even = digit().try_map(|c| {
            let n = c.to_digit(10).unwrap_or(1);
            if n % 2 == 0 {
                Ok(n)
            } else {
                Err(Mismatch::expected(None, "an even digit"))
            }
        });
        let engine = Engine::new("3");
        let error = engine.run(&even).unwrap_err();
        assert_eq!(error.to_string(), "Expected an even digit");
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn and_then_feeds_the_symbol_forward() {
        // a digit n followed by exactly n 'x'
        let counted = digit().and_then(|n| {
            let n = n.to_digit(10).unwrap_or(0) as usize;
            literal("x").repeated_within(CountLimit::exactly(n))
        });
        let engine = Engine::new("3xxxx");
        assert_eq!(engine.run(&counted).unwrap().len(), 3);
        assert_eq!(engine.position(), 4);
    }

    #[test]
    fn sequence_shorthands() {
        let engine = Engine::new("(1)");
        let wrapped = literal("(").ignore_then(digit()).then_ignore(literal(")"));
        assert_eq!(engine.run(&wrapped).unwrap(), '1');

        let engine = Engine::new("12");
        assert_eq!(engine.run(&digit().then(digit())).unwrap(), ('1', '2'));
    }

    #[test]
    fn labelled_keeps_the_deeper_cause() {
        let engine = Engine::new("x");
        let error = engine.run(&digit().labelled("number")).unwrap_err();
        assert_eq!(error.tag, Some(Tag::from("number")));
        assert_eq!(error.root_cause().tag, None);
        assert!(error.to_string().starts_with("Cannot parse number: Cannot parse digit"));
    }

    #[test]
    fn map_err_rewrites_failures() {
        let engine = Engine::new("x");
        let error = engine
            .run(&digit().map_err(|_| Mismatch::expected(None, "a number")))
            .unwrap_err();
        assert_eq!(error.to_string(), "Expected a number");
    }

    #[test]
    fn maybe_never_fails() {
        let engine = Engine::new("x");
        assert_eq!(engine.run(&digit().or_not()).unwrap(), None);
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn bounded_repetition_stops_at_the_maximum() {
        let engine = Engine::new("12345");
        let values = engine
            .run(&digit().repeated_within(CountLimit::at_most(3)))
            .unwrap();
        assert_eq!(values, ['1', '2', '3']);
        assert_eq!(engine.position(), 3);
    }

    #[test]
    fn unmet_minimum_names_the_item() {
        let engine = Engine::new("1x");
        let error = engine
            .run(&digit().repeated_within(CountLimit::at_least(2)))
            .unwrap_err();
        assert_eq!(error.to_string(), "Expected at least 2 digit");
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn zero_width_items_do_not_loop() {
        let engine = Engine::new("abc");
        let values = engine.run(&literal("").repeated()).unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn list_keeps_items_before_a_dangling_separator() {
        let engine = Engine::new("1,2,x");
        let values = engine.run(&digit().separated_by(literal(","))).unwrap();
        assert_eq!(values, ['1', '2']);
        assert_eq!(engine.position(), 3);
    }
}
