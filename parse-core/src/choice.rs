use crate::{
    engine::Engine,
    input::Input,
    outcome::{describe, Mismatch, Reason, Tag},
    parser::Parser,
};

/// A list of candidate parsers with a common symbol type.
///
/// Implemented for `Vec<P>` and for tuples of up to eight parsers.
pub trait Alternatives<I: ?Sized> {
    type Output: Clone + 'static;

    /// Run the candidates in order and return the first symbol produced.
    fn first_match(&self, engine: &Engine<'_, I>) -> Option<Self::Output>;

    /// The tag of every candidate, in order.
    fn tags(&self) -> Vec<Option<&Tag>>;
}

impl<I, P> Alternatives<I> for Vec<P>
where
    I: ?Sized + Input,
    P: Parser<I>,
{
    type Output = P::Output;

    fn first_match(&self, engine: &Engine<'_, I>) -> Option<P::Output> {
        self.iter().find_map(|parser| engine.run(parser).ok())
    }

    fn tags(&self) -> Vec<Option<&Tag>> {
        self.iter().map(|parser| parser.tag()).collect()
    }
}

macro_rules! impl_alternatives_for_tuple {
    ($first:ident $(, $rest:ident)*) => {
        impl<I, $first, $($rest),*> Alternatives<I> for ($first, $($rest,)*)
        where
            I: ?Sized + Input,
            $first: Parser<I>,
            $($rest: Parser<I, Output = <$first as Parser<I>>::Output>,)*
        {
            type Output = <$first as Parser<I>>::Output;

            #[allow(non_snake_case)]
            fn first_match(&self, engine: &Engine<'_, I>) -> Option<Self::Output> {
                let ($first, $($rest,)*) = self;
                if let Ok(value) = engine.run($first) {
                    return Some(value);
                }
                $(
                    if let Ok(value) = engine.run($rest) {
                        return Some(value);
                    }
                )*
                None
            }

            #[allow(non_snake_case)]
            fn tags(&self) -> Vec<Option<&Tag>> {
                let ($first, $($rest,)*) = self;
                vec![$first.tag(), $($rest.tag()),*]
            }
        }
    };
}

impl_alternatives_for_tuple!(A, B);
impl_alternatives_for_tuple!(A, B, C);
impl_alternatives_for_tuple!(A, B, C, D);
impl_alternatives_for_tuple!(A, B, C, D, E);
impl_alternatives_for_tuple!(A, B, C, D, E, F);
impl_alternatives_for_tuple!(A, B, C, D, E, F, G);
impl_alternatives_for_tuple!(A, B, C, D, E, F, G, H);

/// Ordered choice: the first candidate that matches wins.
///
/// If every candidate fails, the mismatch lists the candidates' tags joined
/// with "or"; when no candidate is tagged there is nothing to list and the
/// mismatch carries no reason.
#[derive(Clone)]
pub struct OneOf<A> {
    alternatives: A,
    tag: Option<Tag>,
}

/// Try `alternatives` in order at the same position.
///
/// ```
/// # use parse_core::*;
/// let keyword = one_of((
///     text::literal("true").labelled("true"),
///     text::literal("false").labelled("false"),
/// ));
/// assert_eq!(parse(&keyword, "false").unwrap(), "false");
/// let error = parse(&keyword, "nil").unwrap_err();
/// assert_eq!(error.to_string(), "Expected true or false");
/// ```
pub fn one_of<A>(alternatives: A) -> OneOf<A> {
    OneOf {
        alternatives,
        tag: None,
    }
}

impl<A> OneOf<A> {
    pub fn with_tag(self, tag: impl Into<Tag>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..self
        }
    }
}

impl<I, A> Parser<I> for OneOf<A>
where
    I: ?Sized + Input,
    A: Alternatives<I>,
{
    type Output = A::Output;

    fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<A::Output, Mismatch> {
        if let Some(value) = self.alternatives.first_match(engine) {
            return Ok(value);
        }
        let tags = self.alternatives.tags();
        let reason = tags.iter().any(Option::is_some).then(|| {
            let names: Vec<String> = tags.iter().map(|tag| describe(*tag)).collect();
            Reason::Expected(names.join(" or "))
        });
        Err(Mismatch::new(self.tag.clone(), reason))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::literal;

    #[test]
    fn first_match_wins() {
        let engine = Engine::new("abc");
        let choice = one_of((literal("a").map(|_| 1), literal("ab").map(|_| 2)));
        assert_eq!(engine.run(&choice).unwrap(), 1);
        assert_eq!(engine.position(), 1);
    }

    #[test]
    fn later_candidates_run_from_the_same_position() {
        let engine = Engine::new("abd");
        let choice = one_of(vec![
            literal("abc").boxed(),
            literal("ab").then(literal("d")).map(|(a, d)| a + &d).boxed(),
        ]);
        assert_eq!(engine.run(&choice).unwrap(), "abd");
    }

    #[test]
    fn failure_lists_tagged_candidates() {
        let engine = Engine::new("x");
        let choice = one_of((literal("a").labelled("a"), literal("b")))
            .with_tag("letter");
        let error = engine.run(&choice).unwrap_err();
        assert_eq!(error.to_string(), "Cannot parse letter: expected a or <untagged>");
        assert_eq!(engine.position(), 0);
    }

    #[test]
    fn untagged_candidates_leave_no_reason() {
        let engine = Engine::new("x");
        let error = engine
            .run(&one_of((literal("a"), literal("b"))))
            .unwrap_err();
        assert_eq!(error, Mismatch::empty());
    }
}
