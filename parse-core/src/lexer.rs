//! Tokenizing with [logos] ahead of parsing.
//!
//! The token terminals in [`token`](crate::token) run over a plain token
//! slice; [`Lexed::span`] maps a token index in a diagnostic back to the
//! source text.

use logos::Logos;
use thiserror::Error;

use crate::outcome::Span;

/// Tokens of a source text, with the byte span of each token.
#[derive(Debug, Clone, PartialEq)]
pub struct Lexed<T> {
    pub tokens: Vec<T>,
    pub spans: Vec<Span>,
}

impl<T> Lexed<T> {
    /// Span of the token at `index`. An index one past the last token maps
    /// to the empty span at the end of the source.
    pub fn span(&self, index: usize) -> Option<Span> {
        match self.spans.get(index) {
            Some(span) => Some(*span),
            None if index == self.spans.len() => {
                let end = self.spans.last().map_or(0, |span| span.end);
                Some(Span::new(end, end))
            }
            None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unrecognized input at {}..{}", span.start, span.end)]
pub struct LexError {
    pub span: Span,
}

/// Tokenizes `source`, stopping at the first text no token matches.
pub fn lex<'s, T>(source: &'s str) -> Result<Lexed<T>, LexError>
where
    T: Logos<'s, Source = str>,
    T::Extras: Default,
{
    let mut lexer = T::lexer(source);
    let mut lexed = Lexed {
        tokens: Vec::new(),
        spans: Vec::new(),
    };

    while let Some(result) = lexer.next() {
        let span = Span::from(lexer.span());
        match result {
            Ok(token) => {
                lexed.tokens.push(token);
                lexed.spans.push(span);
            }
            Err(_) => {
                tracing::debug!(start = span.start, end = span.end, "lexing stopped");
                return Err(LexError { span });
            }
        }
    }

    Ok(lexed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Logos, Debug, Clone, PartialEq)]
    #[logos(skip r"[ \t\n]+")]
    enum Token {
        #[token("+")]
        Plus,
        #[regex(r"[0-9]+", |lex| lex.slice().parse::<i64>().ok())]
        Number(i64),
    }

    #[test]
    fn tokens_carry_spans() {
        let lexed = lex::<Token>("12 + 3").unwrap();
        assert_eq!(
            lexed.tokens,
            [Token::Number(12), Token::Plus, Token::Number(3)]
        );
        assert_eq!(lexed.span(1), Some(Span::new(3, 4)));
        assert_eq!(lexed.span(3), Some(Span::new(6, 6)));
        assert_eq!(lexed.span(4), None);
    }

    #[test]
    fn unknown_text_is_an_error() {
        let error = lex::<Token>("1 ? 2").unwrap_err();
        assert_eq!(error.span, Span::new(2, 3));
        assert_eq!(error.to_string(), "unrecognized input at 2..3");
    }
}
