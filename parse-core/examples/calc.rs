use parse_core::{
    one_of, parse, text, Arena, CharSet, CountLimit, GrammarError, Mismatch, Parser, Recursive,
};

fn padded<P>(parser: P) -> impl Parser<str, Output = P::Output>
where
    P: Parser<str>,
{
    let space = || text::charset(CharSet::chars(" \t\n"), CountLimit::at_least(0));
    space().ignore_then(parser).then_ignore(space())
}

fn parser(arena: &std::rc::Rc<Arena>) -> Result<Recursive<str, i64>, GrammarError> {
    let expr = Recursive::<str, i64>::declare(arena, "expr");
    let add_expr = Recursive::<str, i64>::declare(arena, "sum");
    let mul_expr = Recursive::<str, i64>::declare(arena, "product");

    let num = text::charset(CharSet::range('0'..='9'), CountLimit::at_least(1))
        .try_map(|digits| {
            digits
                .parse::<i64>()
                .map_err(|_| Mismatch::expected(None, "a number that fits in 64 bits"))
        })
        .labelled("number");

    let term = one_of((
        padded(num),
        padded(text::literal("("))
            .ignore_then(expr.clone())
            .then_ignore(padded(text::literal(")"))),
    ))
    .with_tag("term")
    .boxed();

    expr.define(add_expr.clone())?;

    add_expr.define(one_of((
        add_expr
            .clone()
            .then_ignore(text::literal("+"))
            .then(mul_expr.clone())
            .map(|(lhs, rhs)| lhs + rhs),
        add_expr
            .clone()
            .then_ignore(text::literal("-"))
            .then(mul_expr.clone())
            .map(|(lhs, rhs)| lhs - rhs),
        mul_expr.clone(),
    )))?;

    mul_expr.define(one_of((
        mul_expr
            .clone()
            .then_ignore(text::literal("*"))
            .then(term.clone())
            .map(|(lhs, rhs)| lhs * rhs),
        mul_expr
            .clone()
            .then_ignore(text::literal("/"))
            .then(term.clone())
            .try_map(|(lhs, rhs)| {
                lhs.checked_div(rhs)
                    .ok_or_else(|| Mismatch::expected(None, "a non-zero divisor"))
            }),
        term,
    )))?;

    Ok(expr)
}

fn main() -> Result<(), GrammarError> {
    let arena = Arena::new();
    let expr = parser(&arena)?;

    let input = "11+2*(3+4)/5";
    let result = parse(&expr, input).unwrap();
    println!("{input} = {result}");
    assert_eq!(result, 13);

    let input = "10 - 4 - 3";
    let result = parse(&expr, input).unwrap();
    println!("{input} = {result}");
    assert_eq!(result, 3);

    match parse(&expr, "1 + (2 * 3") {
        Ok(result) => println!("unexpected success: {result}"),
        Err(error) => {
            println!("{error}");
            if let Some(farthest) = error.farthest() {
                println!("{farthest}");
            }
        }
    }

    Ok(())
}
