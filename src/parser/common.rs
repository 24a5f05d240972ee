use nom::branch::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::error::context;
use nom::Parser;
use nom_language::error::{VerboseError, VerboseErrorKind};

use crate::error::{ConfigError, Result};
use crate::node::{ConfigNode, NodeKind};
use crate::result::{ParseResult, Span};

use super::comment::hash_comment;

/// Runs `line` until the input is consumed, handing over every node in
/// document order.
pub fn parse_lines<'a, L, E>(input: &'a str, mut line: L, mut emit: E) -> Result<()>
where
    L: FnMut(Span<'a>) -> ParseResult<Span<'a>, Vec<ConfigNode>>,
    E: FnMut(ConfigNode),
{
    let mut input = Span::new(input);

    while !input.fragment().is_empty() {
        let (rest, nodes) = line(input).map_err(into_config_error)?;

        if rest.location_offset() == input.location_offset() {
            return Err(ConfigError::Parse {
                line: input.location_line(),
                column: input.get_utf8_column(),
                message: "unexpected input".to_string(),
            });
        }

        nodes.into_iter().for_each(&mut emit);
        input = rest;
    }

    Ok(())
}

/// Converts the error of a grammar into one that tells the user where the
/// problem is.
pub fn into_config_error(err: nom::Err<VerboseError<Span>>) -> ConfigError {
    let err = match err {
        nom::Err::Error(err) | nom::Err::Failure(err) => err,
        nom::Err::Incomplete(_) => {
            return ConfigError::Parse {
                line: 0,
                column: 0,
                message: "unexpected end of input".to_string(),
            }
        }
    };

    let message = err
        .errors
        .iter()
        .find_map(|(_, kind)| match kind {
            VerboseErrorKind::Context(context) => Some(context.to_string()),
            _ => None,
        })
        .or_else(|| err.errors.first().map(|(_, kind)| describe(kind)))
        .unwrap_or_else(|| "syntax error".to_string());

    let (line, column) = err
        .errors
        .first()
        .map(|(span, _)| (span.location_line(), span.get_utf8_column()))
        .unwrap_or((0, 0));

    ConfigError::Parse {
        line,
        column,
        message,
    }
}

fn describe(kind: &VerboseErrorKind) -> String {
    match kind {
        VerboseErrorKind::Context(context) => context.to_string(),
        VerboseErrorKind::Char(c) => format!("expected '{}'", c),
        VerboseErrorKind::Nom(kind) => kind.description().to_string(),
    }
}

pub fn literal(span: Span) -> ConfigNode {
    ConfigNode::leaf(NodeKind::Literal, *span.fragment())
}

/// spaces and tabs kept verbatim
pub fn blank(input: Span) -> ParseResult<Span, ConfigNode> {
    map(space1, literal).parse(input)
}

/// the line break itself, or nothing at the end of the input
pub fn end_of_line(input: Span) -> ParseResult<Span, Option<ConfigNode>> {
    context(
        "expected end of line",
        alt((
            map(line_ending, |span: Span| {
                Some(ConfigNode::leaf(NodeKind::NewLine, *span.fragment()))
            }),
            value(None, eof),
        )),
    )
    .parse(input)
}

/// checks that the line ends here without consuming anything
pub fn at_end_of_line(input: Span) -> ParseResult<Span, ()> {
    value((), peek(alt((line_ending, eof)))).parse(input)
}

/// blanks and an inline comment after the meaningful part of a line
pub fn trailing(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, (space, comment)) = (opt(blank), opt(hash_comment)).parse(input)?;
    Ok((input, space.into_iter().chain(comment).collect()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_line() {
        let (rest, node) = end_of_line(Span::new("\r\nnext")).unwrap();
        assert_eq!(*rest.fragment(), "next");
        assert_eq!(node, Some(ConfigNode::leaf(NodeKind::NewLine, "\r\n")));

        let (rest, node) = end_of_line(Span::new("")).unwrap();
        assert_eq!(*rest.fragment(), "");
        assert_eq!(node, None);

        assert!(end_of_line(Span::new("x\n")).is_err());
    }

    #[test]
    fn test_trailing() {
        let (rest, nodes) = trailing(Span::new("  # comment\n")).unwrap();
        assert_eq!(*rest.fragment(), "\n");
        assert_eq!(
            nodes,
            vec![
                ConfigNode::leaf(NodeKind::Literal, "  "),
                ConfigNode::leaf(NodeKind::Comment, "# comment"),
            ]
        );

        let (rest, nodes) = trailing(Span::new("\n")).unwrap();
        assert_eq!(*rest.fragment(), "\n");
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_error_position() {
        let err = end_of_line(Span::new("\nabc")).and_then(|(rest, _)| end_of_line(rest));
        match err.map_err(into_config_error) {
            Err(ConfigError::Parse {
                line,
                column,
                message,
            }) => {
                assert_eq!(line, 2);
                assert_eq!(column, 1);
                assert_eq!(message, "expected end of line");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
