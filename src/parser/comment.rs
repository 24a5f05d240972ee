use nom::character::complete::*;
use nom::combinator::*;
use nom::sequence::*;
use nom::Parser;

use crate::node::{ConfigNode, NodeKind};
use crate::result::{ParseResult, Span};

/// parse a whole line comment like `# comment` or `; comment`
pub fn comment(input: Span) -> ParseResult<Span, ConfigNode> {
    map(recognize(pair(one_of("#;"), not_line_ending)), comment_node).parse(input)
}

/// parse a comment like `# comment`, the only marker accepted after a value
pub fn hash_comment(input: Span) -> ParseResult<Span, ConfigNode> {
    map(recognize(pair(char('#'), not_line_ending)), comment_node).parse(input)
}

fn comment_node(span: Span) -> ConfigNode {
    ConfigNode::leaf(NodeKind::Comment, *span.fragment())
}
