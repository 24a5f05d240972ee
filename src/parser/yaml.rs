use nom::branch::*;
use nom::bytes::complete::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::error::context;
use nom::sequence::*;
use nom::Parser;

use crate::node::{ConfigNode, NodeKind};
use crate::result::{ParseResult, Span};

use super::comment::hash_comment;
use super::common::{at_end_of_line, blank, end_of_line, literal, trailing};
use super::identifier::yaml_key;
use super::value::value;

/// parse one line of the YAML subset, including its line break
///
/// A section line keeps its line break, the section node renders it.
pub fn line(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    alt((empty_line, section, content)).parse(input)
}

/// a line holding nothing but blanks and maybe a comment
fn empty_line(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, (space, comment)) =
        terminated((opt(blank), opt(hash_comment)), at_end_of_line).parse(input)?;
    let (input, end) = end_of_line(input)?;

    Ok((input, space.into_iter().chain(comment).chain(end).collect()))
}

fn indentation(input: Span) -> ParseResult<Span, Span> {
    terminated(
        take_while(|c: char| c == ' '),
        cut(context("tabs are not allowed in indentation", not(char('\t')))),
    )
    .parse(input)
}

/// `name:` alone on its line opens a (possibly nested) section
pub fn section(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, indent) = indentation(input)?;
    let (input, name) =
        terminated(yaml_key, (char(':'), space0, at_end_of_line)).parse(input)?;
    let (input, _) = opt(line_ending).parse(input)?;

    let mut node = ConfigNode::section(name.fragment());
    node.set_indent(indent.fragment().len());
    Ok((input, vec![node]))
}

fn content(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, indent) = indentation(input)?;
    let (input, mut nodes) = cut(context(
        "expected a key, a list item or a document marker",
        alt((assignment, marker, list_item)),
    ))
    .parse(input)?;
    let (input, end) = cut(end_of_line).parse(input)?;

    if nodes.first().is_some_and(ConfigNode::is_assignment) {
        nodes[0].set_indent(indent.fragment().len());
    } else if !indent.fragment().is_empty() {
        nodes.insert(0, literal(indent));
    }

    nodes.extend(end);
    Ok((input, nodes))
}

/// `key: value`
pub fn assignment(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, (name, separator, value)) =
        (yaml_key, recognize((char(':'), space1)), value).parse(input)?;
    let (input, rest) = trailing(input)?;

    let mut nodes = vec![ConfigNode::binary_with_text(
        NodeKind::Assignment,
        *separator.fragment(),
        ConfigNode::leaf(NodeKind::Variable, *name.fragment()),
        Some(value),
    )];
    nodes.extend(rest);
    Ok((input, nodes))
}

/// `---` and `...` around a document
fn marker(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, keyword) = alt((tag("---"), tag("..."))).parse(input)?;
    let (input, rest) = trailing(input)?;

    let mut nodes = vec![ConfigNode::leaf(NodeKind::Keyword, *keyword.fragment())];
    nodes.extend(rest);
    Ok((input, nodes))
}

/// `- item`, kept as it is
fn list_item(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    map(recognize(preceded(char('-'), not_line_ending)), |item| {
        vec![literal(item)]
    })
    .parse(input)
}
