use std::rc::Rc;

use parse_core::*;
use rstest::rstest;

fn digit() -> impl Parser<str, Output = i64> + Clone {
    text::char_in(CharSet::range('0'..='9'))
        .map(|c| i64::from(c as u8 - b'0'))
        .labelled("digit")
}

/// `sum := sum "+" digit | digit`
fn left_sum() -> Rule<str, i64> {
    Rule::recursive("sum", |sum: Rule<str, i64>| {
        one_of((
            sum.then_ignore(text::literal("+"))
                .then(digit())
                .map(|(lhs, rhs)| lhs + rhs),
            digit(),
        ))
    })
}

#[rstest]
#[case("7", 7)]
#[case("1+2+3", 6)]
#[case("9+9+9+9+9+9+9+9+9+9", 90)]
fn left_recursive_sum(#[case] input: &str, #[case] expected: i64) {
    assert_eq!(parse(&left_sum(), input).unwrap(), expected);
}

#[rstest]
#[case(60)]
#[case(1000)]
fn left_recursive_sum_of_many_terms(#[case] terms: usize) {
    let input = vec!["1"; terms].join("+");
    let engine = Engine::new(input.as_str());
    assert_eq!(engine.run(&left_sum()).unwrap(), terms as i64);
    assert!(engine.is_at_end());
}

#[test]
fn left_recursive_sum_stops_at_a_dangling_operator() {
    let engine = Engine::new("1+2+");
    assert_eq!(engine.run(&left_sum()).unwrap(), 3);
    assert_eq!(engine.position(), 3);
}

#[test]
fn division_by_zero_is_a_mismatch() {
    let quotient = digit()
        .then_ignore(text::literal("/"))
        .then(digit())
        .try_map(|(lhs, rhs)| {
            lhs.checked_div(rhs)
                .ok_or_else(|| Mismatch::expected(None, "a non-zero divisor"))
        });
    assert_eq!(Engine::new("8/2").run(&quotient).unwrap(), 4);

    let engine = Engine::new("8/0");
    let error = engine.run(&quotient).unwrap_err();
    assert_eq!(error.to_string(), "Expected a non-zero divisor");
    assert_eq!(engine.position(), 0);
}

fn padded<P: Parser<str>>(parser: P) -> impl Parser<str, Output = P::Output> {
    let space = || text::charset(CharSet::chars(" \t"), CountLimit::at_least(0));
    space().ignore_then(parser).then_ignore(space())
}

/// The classic three-level grammar, built from declared handles.
fn expression(arena: &Rc<Arena>) -> Recursive<str, i64> {
    let expr = Recursive::<str, i64>::declare(arena, "expr");
    let product = Recursive::<str, i64>::declare(arena, "product");

    let number = text::take_while(CountLimit::at_least(1), |c| c.is_ascii_digit())
        .try_map(|digits| {
            digits
                .parse::<i64>()
                .map_err(|_| Mismatch::expected(None, "a small number"))
        })
        .labelled("number");
    let term = one_of((
        padded(number),
        padded(text::literal("("))
            .ignore_then(expr.clone())
            .then_ignore(padded(text::literal(")"))),
    ))
    .with_tag("term")
    .boxed();

    expr.define(one_of((
        expr.clone()
            .then_ignore(text::literal("+"))
            .then(product.clone())
            .map(|(lhs, rhs)| lhs + rhs),
        product.clone(),
    )))
    .unwrap();
    product
        .define(one_of((
            product
                .clone()
                .then_ignore(text::literal("*"))
                .then(term.clone())
                .map(|(lhs, rhs)| lhs * rhs),
            term,
        )))
        .unwrap();
    expr
}

#[test]
fn nested_expression_consumes_everything() {
    let arena = Arena::new();
    let expr = expression(&arena);
    let engine = Engine::new("(1 + 2 + 3 * 4 * 5) * 6 + 7");
    assert_eq!(engine.run(&expr).unwrap(), 385);
    assert!(engine.is_at_end());
}

#[test]
fn unbalanced_parenthesis_is_blamed_at_the_end() {
    let arena = Arena::new();
    let expr = expression(&arena);
    let input = "(1 + 2";
    let error = parse(&expr, input).unwrap_err();
    assert_eq!(error.position(), Some(input.len()));
}
