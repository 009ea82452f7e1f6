use logos::Logos;
use parse_core::{lexer, one_of, parse, token, Mismatch, Parser, Rule};

#[derive(Logos, Clone, Eq, Debug, PartialEq)]
#[logos(skip r"[ \t\n\f]+")]
pub enum Token {
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Mul,

    #[token("/")]
    Div,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[regex(r"\d+", |lex| lex.slice().parse::<i32>().ok())]
    Number(i32),
}

fn expr() -> Rule<[Token], i32> {
    Rule::recursive("expr", |expr: Rule<[Token], i32>| {
        let term = one_of((
            token::select(|token: Token| match token {
                Token::Number(n) => Some(n),
                _ => None,
            }),
            token::just(Token::LParen)
                .ignore_then(expr.clone())
                .then_ignore(token::just(Token::RParen)),
        ))
        .with_tag("term");

        let product = Rule::recursive("product", move |product: Rule<[Token], i32>| {
            one_of((
                product
                    .clone()
                    .then_ignore(token::just(Token::Mul))
                    .then(term.clone())
                    .map(|(lhs, rhs)| lhs * rhs),
                product
                    .then_ignore(token::just(Token::Div))
                    .then(term.clone())
                    .try_map(|(lhs, rhs)| {
                        lhs.checked_div(rhs)
                            .ok_or_else(|| Mismatch::expected(None, "a non-zero divisor"))
                    }),
                term.clone(),
            ))
        });

        one_of((
            expr.clone()
                .then_ignore(token::just(Token::Plus))
                .then(product.clone())
                .map(|(lhs, rhs)| lhs + rhs),
            expr.then_ignore(token::just(Token::Minus))
                .then(product.clone())
                .map(|(lhs, rhs)| lhs - rhs),
            product,
        ))
    })
}

fn main() {
    let input = "1 + 2 * (3 - 4)";
    let lexed = lexer::lex::<Token>(input).unwrap();
    let result = parse(&expr(), &lexed.tokens[..]);
    println!("{:?}", result);
    assert_eq!(result.unwrap(), -1);

    let input = "1 + * 2";
    let lexed = lexer::lex::<Token>(input).unwrap();
    if let Err(error) = parse(&expr(), &lexed.tokens[..]) {
        let at = error.position().and_then(|index| lexed.span(index));
        println!("{error} at {at:?}");
    }

    let lexed = lexer::lex::<Token>("8 / (2 - 2)").unwrap();
    assert!(parse(&expr(), &lexed.tokens[..]).is_err());
}
