//! Nodes of the config file AST.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::syntax::Syntax;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum NodeKind {
    Keyword,
    Literal,
    Comment,
    Section,
    Assignment,
    /// A disabled assignment, rendered with a leading `# `.
    Commented,
    Include,
    IncludeDir,
    Variable,
    NewLine,
    LiteralList,
}

impl NodeKind {
    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Keyword => "Keyword",
            NodeKind::Literal => "Literal",
            NodeKind::Comment => "Comment",
            NodeKind::Section => "Section",
            NodeKind::Assignment => "Assignment",
            NodeKind::Commented => "Commented",
            NodeKind::Include => "Include",
            NodeKind::IncludeDir => "IncludeDir",
            NodeKind::Variable => "Variable",
            NodeKind::NewLine => "NewLine",
            NodeKind::LiteralList => "LiteralList",
        }
    }
}

/// One piece of information found while parsing a config file.
///
/// `text` is the verbatim source the node was built from: the operator of an
/// assignment, the name of a section, the whole text of a comment. A node owns
/// its children, dropping it drops the subtree.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigNode {
    kind: NodeKind,
    text: String,
    line_number: usize,
    indent: usize,
    child1: Option<Box<ConfigNode>>,
    child2: Option<Box<ConfigNode>>,
}

impl ConfigNode {
    pub fn leaf(kind: NodeKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            line_number: 0,
            indent: 0,
            child1: None,
            child2: None,
        }
    }

    pub fn binary(kind: NodeKind, child1: ConfigNode, child2: Option<ConfigNode>) -> Self {
        let mut node = Self::leaf(kind, "");
        node.set_children(Some(child1), child2);
        node
    }

    /// Same as [`ConfigNode::binary`] with the captured text of the node
    /// itself, e.g. the `" = "` of an assignment.
    pub fn binary_with_text(
        kind: NodeKind,
        text: impl Into<String>,
        child1: ConfigNode,
        child2: Option<ConfigNode>,
    ) -> Self {
        let mut node = Self::binary(kind, child1, child2);
        node.text = text.into();
        node
    }

    /// A freshly created `name=value` assignment.
    pub fn assignment(name: &str, value: &str) -> Self {
        Self::binary_with_text(
            NodeKind::Assignment,
            "=",
            Self::leaf(NodeKind::Variable, name),
            Some(Self::leaf(NodeKind::Literal, value)),
        )
    }

    pub fn section(name: &str) -> Self {
        Self::leaf(NodeKind::Section, name)
    }

    pub fn new_line() -> Self {
        Self::leaf(NodeKind::NewLine, "\n")
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn set_kind(&mut self, kind: NodeKind) {
        self.kind = kind;
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn child1(&self) -> Option<&ConfigNode> {
        self.child1.as_deref()
    }

    pub fn child2(&self) -> Option<&ConfigNode> {
        self.child2.as_deref()
    }

    pub fn set_children(&mut self, child1: Option<ConfigNode>, child2: Option<ConfigNode>) {
        self.child1 = child1.map(Box::new);
        self.child2 = child2.map(Box::new);
    }

    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn set_line_number(&mut self, line_number: usize) {
        self.line_number = line_number;
        self.children_mut()
            .for_each(|child| child.set_line_number(line_number));
    }

    pub fn indent(&self) -> usize {
        self.indent
    }

    pub fn set_indent(&mut self, indent: usize) {
        self.indent = indent;
        self.children_mut().for_each(|child| child.set_indent(indent));
    }

    fn children_mut(&mut self) -> impl Iterator<Item = &mut ConfigNode> {
        self.child1
            .as_deref_mut()
            .into_iter()
            .chain(self.child2.as_deref_mut())
    }

    pub fn is_new_line(&self) -> bool {
        self.kind == NodeKind::NewLine
    }

    pub fn is_include(&self) -> bool {
        self.kind == NodeKind::Include
    }

    pub fn is_include_dir(&self) -> bool {
        self.kind == NodeKind::IncludeDir
    }

    pub fn is_assignment(&self) -> bool {
        self.kind == NodeKind::Assignment
    }

    pub fn is_commented(&self) -> bool {
        self.kind == NodeKind::Commented
    }

    pub fn is_section(&self) -> bool {
        self.kind == NodeKind::Section
    }

    /// The file name of an include directive, empty for every other node.
    pub fn file_name(&self) -> &str {
        match (&self.kind, &self.child2) {
            (NodeKind::Include | NodeKind::IncludeDir, Some(child)) => &child.text,
            _ => "",
        }
    }

    /// The variable name of an enabled or disabled assignment.
    pub fn left_value(&self) -> &str {
        match (&self.kind, &self.child1) {
            (NodeKind::Assignment | NodeKind::Commented, Some(child)) => &child.text,
            _ => "",
        }
    }

    /// The value of an enabled assignment, disabled ones have no value.
    pub fn right_value(&self) -> &str {
        match (&self.kind, &self.child2) {
            (NodeKind::Assignment, Some(child)) => &child.text,
            _ => "",
        }
    }

    /// Replaces the value of an assignment in place.
    ///
    /// A value list collapses into one literal. A bare flag gets an `=`
    /// operator, otherwise the new value would be glued to the name.
    pub fn set_right_value(&mut self, value: &str) {
        if !matches!(self.kind, NodeKind::Assignment | NodeKind::Commented) {
            return;
        }

        match self.child2.as_deref_mut() {
            Some(child) => {
                child.text = value.to_string();
                if child.kind == NodeKind::LiteralList {
                    child.kind = NodeKind::Literal;
                    child.child1 = None;
                    child.child2 = None;
                }
            }
            None => {
                let mut child = ConfigNode::leaf(NodeKind::Literal, value);
                child.line_number = self.line_number;
                child.indent = self.indent;
                self.child2 = Some(Box::new(child));
            }
        }

        if self.text.is_empty() && !value.is_empty() {
            self.text = "=".to_string();
        }
    }

    pub fn section_name(&self) -> &str {
        if self.kind == NodeKind::Section {
            &self.text
        } else {
            ""
        }
    }

    /// Appends the text form of the node (and its subtree) to `content`.
    pub fn render(&self, syntax: Syntax, content: &mut String) {
        match syntax {
            syntax if syntax.is_ini() => self.render_ini(content),
            Syntax::HaProxy => self.render_haproxy(content),
            Syntax::Yaml => self.render_yaml(content),
            // If the syntax is not known there is no sense to generate anything.
            _ => {}
        }
    }

    fn render_children(&self, syntax: Syntax, content: &mut String) {
        if let Some(child) = &self.child1 {
            child.render(syntax, content);
        }

        content.push_str(&self.text);

        if let Some(child) = &self.child2 {
            child.render(syntax, content);
        }
    }

    fn render_include(&self, syntax: Syntax, content: &mut String) {
        if let Some(child) = &self.child1 {
            child.render(syntax, content);
        }

        if self.text.is_empty() {
            content.push(' ');
        } else {
            content.push_str(&self.text);
        }

        if let Some(child) = &self.child2 {
            child.render(syntax, content);
        }
    }

    // We do not know the original comment marker and spacing of a disabled
    // assignment, it is always written back as "# ".
    fn render_commented(&self, syntax: Syntax, content: &mut String) {
        content.push_str("# ");
        self.render_children(syntax, content);
    }

    fn push_indent(&self, content: &mut String) {
        content.extend(std::iter::repeat(' ').take(self.indent));
    }

    fn render_ini(&self, content: &mut String) {
        match self.kind {
            NodeKind::Include | NodeKind::IncludeDir => self.render_include(Syntax::Generic, content),
            NodeKind::Section => {
                if !self.text.is_empty() {
                    content.push('[');
                    content.push_str(&self.text);
                    content.push(']');
                }
            }
            NodeKind::Commented => self.render_commented(Syntax::Generic, content),
            _ => self.render_children(Syntax::Generic, content),
        }
    }

    fn render_haproxy(&self, content: &mut String) {
        match self.kind {
            NodeKind::Include | NodeKind::IncludeDir => self.render_include(Syntax::HaProxy, content),
            NodeKind::Section => {
                content.push_str(&self.text);

                if let Some(child) = &self.child1 {
                    content.push(' ');
                    child.render_haproxy(content);
                }
            }
            NodeKind::Commented => self.render_commented(Syntax::HaProxy, content),
            NodeKind::Assignment => {
                if let Some(child) = &self.child1 {
                    content.push_str("    ");
                    child.render_haproxy(content);
                }

                if let Some(child) = &self.child2 {
                    content.push(' ');
                    child.render_haproxy(content);
                }
            }
            NodeKind::LiteralList if self.child1.is_some() => {
                if let Some(child) = &self.child1 {
                    child.render_haproxy(content);
                }

                if let Some(child) = &self.child2 {
                    content.push(' ');
                    child.render_haproxy(content);
                }
            }
            _ => self.render_children(Syntax::HaProxy, content),
        }
    }

    fn render_yaml(&self, content: &mut String) {
        match self.kind {
            NodeKind::Include | NodeKind::IncludeDir => self.render_include(Syntax::Yaml, content),
            NodeKind::Section => {
                self.push_indent(content);
                content.push_str(&self.text);
                content.push_str(":\n");
            }
            NodeKind::Commented => self.render_commented(Syntax::Yaml, content),
            NodeKind::Assignment => {
                self.push_indent(content);
                self.render_children(Syntax::Yaml, content);
            }
            _ => self.render_children(Syntax::Yaml, content),
        }
    }

    /// Writes a human readable listing of the subtree, one node per line.
    pub fn dump(&self, depth: usize, out: &mut String) {
        let text = self.text.replace('\n', "\\n").replace('\r', "\\r");
        let padding = "     ".repeat(depth);

        out.push_str(&format!(
            "{:04}:{:03} {}{:<14} '{}'\n",
            self.line_number,
            self.indent,
            padding,
            self.kind_name(),
            text
        ));

        if let Some(child) = &self.child1 {
            child.dump(depth + 1, out);
        }

        if let Some(child) = &self.child2 {
            child.dump(depth + 1, out);
        }
    }
}
