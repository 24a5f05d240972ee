use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::error::context;
use nom::sequence::*;
use nom::Parser;

use crate::node::{ConfigNode, NodeKind};
use crate::result::{ParseResult, Span};

use super::comment::comment;
use super::common::{at_end_of_line, blank, end_of_line, literal, trailing};
use super::identifier::variable_name;
use super::value::value;

/// parse one line of an ini style file, including its line break
pub fn line(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, indent) = opt(blank).parse(input)?;
    let (input, item) =
        opt(alt((commented, comment_line, section, include, assignment))).parse(input)?;
    let (input, end) = cut(end_of_line).parse(input)?;

    let nodes = indent
        .into_iter()
        .chain(item.unwrap_or_default())
        .chain(end)
        .collect();

    Ok((input, nodes))
}

/// `# name=value`, a disabled assignment written exactly the way it is rendered
pub fn commented(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, _) = tag("# ").parse(input)?;
    let (input, (name, operator, value)) =
        terminated((variable_name, operator, value), at_end_of_line).parse(input)?;

    Ok((
        input,
        vec![ConfigNode::binary_with_text(
            NodeKind::Commented,
            *operator.fragment(),
            ConfigNode::leaf(NodeKind::Variable, *name.fragment()),
            Some(value),
        )],
    ))
}

fn comment_line(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    map(comment, |node| vec![node]).parse(input)
}

/// `=` with the blanks around it, kept to write the assignment back unchanged
fn operator(input: Span) -> ParseResult<Span, Span> {
    recognize((space0, char('='), space0)).parse(input)
}

/// `[section]`
pub fn section(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, _) = char('[').parse(input)?;
    let (input, name) = cut(context(
        "expected ']' after the section name",
        terminated(take_till(|c: char| matches!(c, ']' | '\r' | '\n')), char(']')),
    ))
    .parse(input)?;
    let (input, rest) = trailing(input)?;

    let mut nodes = vec![ConfigNode::section(name.fragment())];
    nodes.extend(rest);
    Ok((input, nodes))
}

/// `!include file` or `!includedir directory`
pub fn include(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, (keyword, kind)) = alt((
        map(tag("!includedir"), |s| (s, NodeKind::IncludeDir)),
        map(tag("!include"), |s| (s, NodeKind::Include)),
    ))
    .parse(input)?;
    let (input, (separator, file_name)) = cut(context(
        "expected a file name after the include directive",
        (space1, take_till1(|c: char| c.is_whitespace())),
    ))
    .parse(input)?;
    let (input, rest) = trailing(input)?;

    let mut nodes = vec![ConfigNode::binary_with_text(
        kind,
        *separator.fragment(),
        ConfigNode::leaf(NodeKind::Keyword, *keyword.fragment()),
        Some(literal(file_name)),
    )];
    nodes.extend(rest);
    Ok((input, nodes))
}

/// `name = value`, or a bare `name` switching an option on
pub fn assignment(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, name) = variable_name(input)?;
    let (input, operator) = opt(operator).parse(input)?;
    let (input, value) = match operator {
        Some(_) => value(input)?,
        None => (input, ConfigNode::leaf(NodeKind::Literal, "")),
    };
    let (input, rest) = trailing(input)?;

    let operator = operator.map(|op| *op.fragment()).unwrap_or_default();
    let mut nodes = vec![ConfigNode::binary_with_text(
        NodeKind::Assignment,
        operator,
        ConfigNode::leaf(NodeKind::Variable, *name.fragment()),
        Some(value),
    )];
    nodes.extend(rest);
    Ok((input, nodes))
}
