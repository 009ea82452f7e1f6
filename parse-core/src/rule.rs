use std::rc::Rc;

use crate::{
    engine::Engine,
    input::Input,
    outcome::{Mismatch, Tag},
    parser::Parser,
};

type Body<I, T> = dyn Fn(&Rule<I, T>, &Engine<'_, I>) -> Result<T, Mismatch>;

/// A type-erased parser whose body receives the rule itself.
///
/// Cloning a rule is cheap and clones share the body, so a rule can hand
/// itself to the parsers it builds. This is how self-referential grammars
/// are written:
///
/// ```
/// # use parse_core::*;
/// // sum := sum "+" digit | digit
/// let digit = || text::satisfy(|c| c.is_ascii_digit()).map(|c| c as i64 - '0' as i64);
/// let sum = Rule::recursive("sum", move |sum: Rule<str, i64>| {
///     one_of((
///         sum.then_ignore(text::literal("+")).then(digit()).map(|(a, b)| a + b),
///         digit(),
///     ))
/// });
/// assert_eq!(parse(&sum, "1+2+3").unwrap(), 6);
/// ```
///
/// The left-recursive reference above terminates because the rule is tagged:
/// tagged calls are depth limited and memoized by the [`Standard`] policy
/// chain.
///
/// [`Standard`]: crate::policy::Standard
pub struct Rule<I: ?Sized, T> {
    tag: Option<Tag>,
    body: Rc<Body<I, T>>,
}

impl<I: ?Sized, T> Clone for Rule<I, T> {
    fn clone(&self) -> Self {
        Self {
            tag: self.tag.clone(),
            body: self.body.clone(),
        }
    }
}

impl<I: ?Sized + Input, T: Clone + 'static> Rule<I, T> {
    /// A tagged rule. `body` receives the rule and the engine.
    pub fn new(
        tag: impl Into<Tag>,
        body: impl Fn(&Rule<I, T>, &Engine<'_, I>) -> Result<T, Mismatch> + 'static,
    ) -> Self {
        Self::anonymous(body).with_tag(tag)
    }

    /// An untagged rule: never memoized, never depth limited.
    pub fn anonymous(
        body: impl Fn(&Rule<I, T>, &Engine<'_, I>) -> Result<T, Mismatch> + 'static,
    ) -> Self {
        Self {
            tag: None,
            body: Rc::new(body),
        }
    }

    /// A tagged rule whose parser is built from the rule itself.
    ///
    /// `build` runs each time the rule is entered.
    pub fn recursive<P>(tag: impl Into<Tag>, build: impl Fn(Rule<I, T>) -> P + 'static) -> Self
    where
        P: Parser<I, Output = T>,
    {
        Self::new(tag, move |this, engine| engine.run(&build(this.clone())))
    }

    pub fn with_tag(self, tag: impl Into<Tag>) -> Self {
        Self {
            tag: Some(tag.into()),
            ..self
        }
    }
}

impl<I: ?Sized + Input, T: Clone + 'static> Parser<I> for Rule<I, T> {
    type Output = T;

    fn tag(&self) -> Option<&Tag> {
        self.tag.as_ref()
    }

    fn parse(&self, engine: &Engine<'_, I>) -> Result<T, Mismatch> {
        (self.body)(self, engine)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::{
        choice::one_of,
        text::{literal, satisfy},
    };

    #[test]
    fn tagged_rule_bodies_run_once_per_position() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let a = Rule::new("a", move |_, engine: &Engine<'_, str>| {
            counter.set(counter.get() + 1);
            engine.run(&literal("a"))
        });
        // Both alternatives start with `a` at position 0.
        let choice = one_of((a.clone().then(literal("x")), a.clone().then(literal("y"))));
        let engine = Engine::new("ay");
        assert!(engine.run(&choice).is_ok());
        assert_eq!(runs.get(), 1);
    }

    #[test]
    fn anonymous_rules_are_not_memoized() {
        let runs = Rc::new(Cell::new(0));
        let counter = runs.clone();
        let a = Rule::anonymous(move |_, engine: &Engine<'_, str>| {
            counter.set(counter.get() + 1);
            engine.run(&literal("a"))
        });
        let choice = one_of((a.clone().then(literal("x")), a.clone().then(literal("y"))));
        let engine = Engine::new("ay");
        assert!(engine.run(&choice).is_ok());
        assert_eq!(runs.get(), 2);
    }

    #[test]
    fn right_recursion_through_the_handle() {
        // nested := "(" nested ")" | "x"
        let nested = Rule::recursive("nested", |nested: Rule<str, usize>| {
            one_of((
                literal("(")
                    .ignore_then(nested)
                    .then_ignore(literal(")"))
                    .map(|depth| depth + 1),
                literal("x").map(|_| 0),
            ))
        });
        let engine = Engine::new("((x))");
        assert_eq!(engine.run(&nested).unwrap(), 2);
        assert!(engine.is_at_end());
    }

    #[test]
    fn left_recursion_consumes_everything() {
        // list := list "," item | item
        let item = satisfy(|c| c.is_ascii_lowercase());
        let list = Rule::recursive("list", move |list: Rule<str, String>| {
            one_of((
                list.then_ignore(literal(","))
                    .then(item)
                    .map(|(mut items, c)| {
                        items.push(c);
                        items
                    }),
                item.map(String::from),
            ))
        });
        let engine = Engine::new("a,b,c,d");
        assert_eq!(engine.run(&list).unwrap(), "abcd");
        assert!(engine.is_at_end());
    }
}
