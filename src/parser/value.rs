use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::sequence::*;
use nom::Parser;

use crate::node::{ConfigNode, NodeKind};
use crate::result::{ParseResult, Span};

/// parse the value of an assignment, a quoted string or the unquoted text up
/// to an inline comment
///
/// A quoted string followed by more text is not a quoted value, the whole text
/// is taken unquoted.
pub fn value(input: Span) -> ParseResult<Span, ConfigNode> {
    map(alt((terminated(quoted, peek(value_end)), unquoted)), |span: Span| {
        ConfigNode::leaf(NodeKind::Literal, *span.fragment())
    })
    .parse(input)
}

/// a quoted string with its quotes, they are only stripped when the value is read
pub fn quoted(input: Span) -> ParseResult<Span, Span> {
    recognize(alt((
        delimited(char('"'), take_till(|c: char| c == '"' || c == '\n'), char('"')),
        delimited(char('\''), take_till(|c: char| c == '\'' || c == '\n'), char('\'')),
    )))
    .parse(input)
}

fn value_end(input: Span) -> ParseResult<Span, Span> {
    preceded(space0, alt((tag("#"), line_ending, eof))).parse(input)
}

/// everything before a `#` or the line ending, trailing blanks excluded
pub fn unquoted(input: Span) -> ParseResult<Span, Span> {
    let (_, raw) = take_till(|c: char| matches!(c, '#' | '\r' | '\n')).parse(input)?;
    take(raw.fragment().trim_end().chars().count()).parse(input)
}
