//! Shared chumsky parser utilities
//!
//! Whitespace and comment combinators for the text notations.

use chumsky::prelude::*;

/// Parse inline whitespace only (spaces and tabs, no newlines).
pub fn inline_whitespace<'src>(
) -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    one_of(" \t").repeated().ignored()
}

/// Parse a Mermaid-style comment (%% to end of line).
pub fn mermaid_comment<'src>(
) -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    just("%%").ignore_then(none_of('\n').repeated()).ignored()
}

/// Parse any run of whitespace, newlines and `%%` comments.
///
/// Uses explicit character matching to avoid the "repeated combinator making
/// no progress" issue of `chumsky::text::whitespace().repeated()`.
pub fn blank<'src>() -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone {
    one_of(" \t\r\n")
        .ignored()
        .or(mermaid_comment())
        .repeated()
        .ignored()
}

/// Parse a line terminator, optionally preceded by inline whitespace and a comment.
pub fn line_end<'src>() -> impl Parser<'src, &'src str, (), extra::Err<Rich<'src, char>>> + Clone
{
    inline_whitespace()
        .then(mermaid_comment().or_not())
        .then(just("\r").or_not())
        .then(just('\n').ignored().or(end()))
        .ignored()
}
