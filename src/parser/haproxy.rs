use nom::branch::*;
use nom::character::complete::*;
use nom::combinator::*;
use nom::multi::*;
use nom::sequence::*;
use nom::Parser;

use crate::node::{ConfigNode, NodeKind};
use crate::result::{ParseResult, Span};

use super::comment::hash_comment;
use super::common::{blank, end_of_line, literal, trailing};
use super::identifier::word;

/// Keywords that open a new section when they start at the first column.
pub const SECTION_KEYWORDS: &[&str] = &[
    "global",
    "defaults",
    "frontend",
    "backend",
    "listen",
    "userlist",
    "peers",
    "resolvers",
    "mailers",
    "program",
    "cache",
    "http-errors",
    "ring",
];

/// parse one line of a haproxy.cfg, including its line break
pub fn line(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, mut nodes) = alt((
        section,
        comment_line,
        statement,
        map(opt(blank), |space: Option<ConfigNode>| {
            space.into_iter().collect::<Vec<_>>()
        }),
    ))
    .parse(input)?;
    let (input, end) = cut(end_of_line).parse(input)?;

    nodes.extend(end);
    Ok((input, nodes))
}

/// `frontend http-in`, the arguments become the only child of the section
pub fn section(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, keyword) =
        verify(word, |w: &Span| SECTION_KEYWORDS.contains(w.fragment())).parse(input)?;
    let (input, arguments) = opt(preceded(space1, arguments)).parse(input)?;
    let (input, rest) = trailing(input)?;

    let mut node = ConfigNode::section(keyword.fragment());
    if arguments.is_some() {
        node.set_children(arguments, None);
    }

    let mut nodes = vec![node];
    nodes.extend(rest);
    Ok((input, nodes))
}

fn comment_line(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, (space, comment)) = (opt(blank), hash_comment).parse(input)?;
    Ok((input, space.into_iter().chain(Some(comment)).collect()))
}

/// `    timeout connect 5s`, a keyword with its arguments
///
/// The indentation and the blanks between the words are not kept, the
/// statement is written back with four spaces and single blanks.
pub fn statement(input: Span) -> ParseResult<Span, Vec<ConfigNode>> {
    let (input, _) = space0(input)?;
    let (input, keyword) = word(input)?;
    let (input, arguments) = opt(preceded(space1, arguments)).parse(input)?;
    let (input, rest) = trailing(input)?;

    let separator = if arguments.is_some() { " " } else { "" };
    let mut nodes = vec![ConfigNode::binary_with_text(
        NodeKind::Assignment,
        separator,
        ConfigNode::leaf(NodeKind::Keyword, *keyword.fragment()),
        arguments,
    )];
    nodes.extend(rest);
    Ok((input, nodes))
}

fn arguments(input: Span) -> ParseResult<Span, ConfigNode> {
    map(separated_list1(space1, word), |words| literal_list(&words)).parse(input)
}

/// Chains the words into right leaning list nodes. Every list node carries
/// the joined text of its words so the whole chain reads as one value.
fn literal_list(words: &[Span]) -> ConfigNode {
    match words {
        [] => ConfigNode::leaf(NodeKind::Literal, ""),
        [single] => literal(*single),
        [first, rest @ ..] => {
            let text = words
                .iter()
                .map(|w| *w.fragment())
                .collect::<Vec<_>>()
                .join(" ");

            ConfigNode::binary_with_text(
                NodeKind::LiteralList,
                text,
                literal(*first),
                Some(literal_list(rest)),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Syntax;

    fn render(nodes: &[ConfigNode]) -> String {
        let mut content = String::new();
        for node in nodes {
            node.render(Syntax::HaProxy, &mut content);
        }
        content
    }

    #[test]
    fn test_section() {
        let (_, nodes) = line(Span::new("frontend http-in\n")).unwrap();
        assert!(nodes[0].is_section());
        assert_eq!(nodes[0].section_name(), "frontend");
        assert_eq!(nodes[0].child1().map(ConfigNode::text), Some("http-in"));
        assert_eq!(render(&nodes), "frontend http-in\n");

        let (_, nodes) = line(Span::new("global\n")).unwrap();
        assert!(nodes[0].is_section());
        assert!(nodes[0].child1().is_none());
    }

    #[test]
    fn test_indented_keyword_is_not_a_section() {
        let (_, nodes) = line(Span::new("    log global\n")).unwrap();
        assert!(nodes[0].is_assignment());
        assert_eq!(nodes[0].left_value(), "log");
        assert_eq!(nodes[0].right_value(), "global");
    }

    #[test]
    fn test_statement() {
        let (_, nodes) = line(Span::new("    timeout connect 5000ms\n")).unwrap();
        assert_eq!(nodes[0].left_value(), "timeout");
        assert_eq!(nodes[0].right_value(), "connect 5000ms");
        assert_eq!(nodes[0].child2().map(ConfigNode::kind), Some(NodeKind::LiteralList));
        assert_eq!(render(&nodes), "    timeout connect 5000ms\n");

        let (_, nodes) = line(Span::new("    daemon\n")).unwrap();
        assert_eq!(nodes[0].left_value(), "daemon");
        assert_eq!(nodes[0].right_value(), "");
        assert_eq!(render(&nodes), "    daemon\n");
    }

    #[test]
    fn test_statement_is_normalized() {
        let (_, nodes) = line(Span::new("\tbind   *:80  # public\n")).unwrap();
        assert_eq!(nodes[0].right_value(), "*:80");
        assert_eq!(render(&nodes), "    bind *:80  # public\n");
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let (_, nodes) = line(Span::new("# global settings\n")).unwrap();
        assert_eq!(nodes[0].kind(), NodeKind::Comment);

        let (_, nodes) = line(Span::new("    # indented\n")).unwrap();
        assert_eq!(render(&nodes), "    # indented\n");

        let (_, nodes) = line(Span::new("\n")).unwrap();
        assert_eq!(nodes, vec![ConfigNode::leaf(NodeKind::NewLine, "\n")]);

        let (_, nodes) = line(Span::new("   \n")).unwrap();
        assert_eq!(render(&nodes), "   \n");
    }
}
