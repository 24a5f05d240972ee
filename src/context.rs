//! The parsed representation of one config file and the operations to query
//! and edit it.
//!
//! Nodes are kept in a flat list in document order. Sections are not parents
//! of their variables: a variable belongs to the section that was seen last
//! before it.

use std::collections::BTreeMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::node::{ConfigNode, NodeKind};
use crate::syntax::Syntax;

/// One variable assignment found in a config file.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VariableRecord {
    pub variable_name: String,
    pub line_number: usize,
    pub value: String,
    pub file_path: String,
    pub section: String,
}

#[derive(Debug, Clone)]
pub struct ParseContext {
    syntax: Syntax,
    nodes: Vec<ConfigNode>,
    line_number: usize,
    error: Option<String>,
}

impl ParseContext {
    pub fn new(syntax: Syntax) -> Self {
        Self {
            syntax,
            nodes: Vec::new(),
            line_number: 1,
            error: None,
        }
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    pub fn nodes(&self) -> &[ConfigNode] {
        &self.nodes
    }

    /// Drops every node and starts counting lines from the first line again.
    pub fn reset(&mut self) {
        self.nodes.clear();
        self.line_number = 1;
        self.error = None;
    }

    /// The line the grammar is currently on, starting from 1.
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    pub fn increment_line_number(&mut self) {
        self.line_number += 1;
    }

    pub fn set_error(&mut self, error: impl Into<String>) {
        self.error = Some(error.into());
    }

    pub fn error_string(&self) -> &str {
        self.error.as_deref().unwrap_or_default()
    }

    /// Called by the grammar for every syntax element, in document order.
    pub fn append(&mut self, mut node: ConfigNode) {
        node.set_line_number(self.line_number);

        if node.is_new_line() {
            self.increment_line_number();
        }

        self.nodes.push(node);
    }

    pub fn name_equal(&self, name1: &str, name2: &str) -> bool {
        name1 == name2
    }

    pub fn section_equal(&self, section1: &str, section2: &str) -> bool {
        section1 == section2
    }

    /// The section every node belongs to, indexed the same way as the nodes.
    fn section_index(&self) -> Vec<&str> {
        let mut current = "";

        self.nodes
            .iter()
            .map(|node| {
                if node.is_section() {
                    current = node.section_name();
                }
                current
            })
            .collect()
    }

    /// Indices of the enabled and disabled assignments of `name`. With no
    /// section every occurrence is returned.
    fn matching_variables(&self, section: Option<&str>, name: &str) -> Vec<usize> {
        let index = self.section_index();

        self.nodes
            .iter()
            .enumerate()
            .filter(|(idx, node)| {
                (node.is_assignment() || node.is_commented())
                    && self.name_equal(node.left_value(), name)
                    && section.map_or(true, |s| self.section_equal(index[*idx], s))
            })
            .map(|(idx, _)| idx)
            .collect()
    }

    fn first_seen<'a>(
        &'a self,
        filter: impl Fn(&ConfigNode) -> bool,
        key: impl Fn(&'a ConfigNode) -> &'a str,
    ) -> BTreeMap<String, usize> {
        let mut found = BTreeMap::new();

        for node in self.nodes.iter().filter(|node| filter(node)) {
            found
                .entry(key(node).to_string())
                .or_insert(node.line_number());
        }

        found
    }

    /// The file names of the include directives as they are written in the
    /// file, mapped to the line they were found in.
    ///
    /// Relative names are returned as relative names, the caller has to know
    /// where the file was to resolve them.
    pub fn include_files(&self) -> BTreeMap<String, usize> {
        self.first_seen(ConfigNode::is_include, ConfigNode::file_name)
    }

    pub fn include_dirs(&self) -> BTreeMap<String, usize> {
        self.first_seen(ConfigNode::is_include_dir, ConfigNode::file_name)
    }

    pub fn variable_names(&self) -> BTreeMap<String, usize> {
        self.first_seen(ConfigNode::is_assignment, ConfigNode::left_value)
    }

    /// Collects the enabled variables, all of them if `name` is empty.
    pub fn collect_variables(&self, name: &str, file_path: &str) -> Vec<VariableRecord> {
        let index = self.section_index();

        self.nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.is_assignment())
            .filter(|(_, node)| name.is_empty() || self.name_equal(node.left_value(), name))
            .map(|(idx, node)| VariableRecord {
                variable_name: node.left_value().to_string(),
                line_number: node.line_number(),
                value: node.right_value().to_string(),
                file_path: file_path.to_string(),
                section: index[idx].to_string(),
            })
            .collect()
    }

    /// Changes the value of a variable and enables it if it was commented
    /// out. Without a section every occurrence in the file is changed.
    ///
    /// Returns true if at least one assignment has been changed.
    pub fn change_variable(&mut self, section: Option<&str>, name: &str, value: &str) -> bool {
        let found = self.matching_variables(section, name);

        for &idx in &found {
            let node = &mut self.nodes[idx];
            node.set_right_value(value);
            node.set_kind(NodeKind::Assignment);
        }

        !found.is_empty()
    }

    /// Comments out a variable. A variable that is already disabled counts as
    /// a success.
    pub fn disable_variable(&mut self, section: Option<&str>, name: &str) -> bool {
        let found = self.matching_variables(section, name);

        for &idx in &found {
            self.nodes[idx].set_kind(NodeKind::Commented);
        }

        !found.is_empty()
    }

    /// Removes the first occurrence of the variable, enabled or not.
    pub fn remove_variable(&mut self, section: Option<&str>, name: &str) -> bool {
        match self.matching_variables(section, name).first() {
            Some(&idx) => {
                self.nodes.remove(idx);
                true
            }
            None => false,
        }
    }

    /// Removes the first section with the given name together with everything
    /// up to the next section.
    pub fn remove_section(&mut self, name: &str) -> bool {
        let (start, end) = {
            let index = self.section_index();
            let Some(start) = self
                .nodes
                .iter()
                .position(|node| node.is_section() && self.section_equal(node.section_name(), name))
            else {
                return false;
            };

            let count = index[start..]
                .iter()
                .take_while(|section| self.section_equal(section, name))
                .count();

            (start, start + count)
        };

        log::debug!("removing section '{}', nodes {}..{}", name, start, end);
        self.nodes.drain(start..end);
        true
    }

    /// True for nodes whose rendered text already ends the line.
    fn ends_line(&self, node: &ConfigNode) -> bool {
        node.is_new_line() || (self.syntax == Syntax::Yaml && node.is_section())
    }

    /// An assignment written the way the syntax of the file expects it.
    fn new_assignment(&self, name: &str, value: &str) -> ConfigNode {
        match self.syntax {
            Syntax::Yaml => ConfigNode::binary_with_text(
                NodeKind::Assignment,
                ": ",
                ConfigNode::leaf(NodeKind::Variable, name),
                Some(ConfigNode::leaf(NodeKind::Literal, value)),
            ),
            _ => ConfigNode::assignment(name, value),
        }
    }

    /// Adds a variable after the last assignment of the section. A missing
    /// section is appended to the end of the file first.
    pub fn add_variable(&mut self, section: Option<&str>, name: &str, value: &str) -> bool {
        let section = section.unwrap_or_default();

        let last_candidate = {
            let index = self.section_index();
            self.nodes
                .iter()
                .enumerate()
                .filter(|(idx, node)| {
                    self.section_equal(index[*idx], section)
                        && (node.is_assignment() || node.is_section())
                })
                .map(|(idx, _)| idx)
                .last()
        };

        let mut anchor = match last_candidate {
            Some(idx) => idx,
            // The global section has no header, the variable goes to the top.
            None if section.is_empty() => {
                self.nodes.insert(0, self.new_assignment(name, value));
                self.nodes.insert(1, ConfigNode::new_line());
                return true;
            }
            None => {
                let line_number = self.nodes.last().map_or(1, ConfigNode::line_number);
                let mut new_line = ConfigNode::new_line();
                let mut header = ConfigNode::section(section);
                new_line.set_line_number(line_number);
                header.set_line_number(line_number);

                self.nodes.push(new_line);
                self.nodes.push(header);
                self.nodes.len() - 1
            }
        };

        let line_number = self.nodes[anchor].line_number();
        let indent = match (self.syntax, &self.nodes[anchor]) {
            (Syntax::Yaml, node) if node.is_section() => node.indent() + 2,
            (_, node) => node.indent(),
        };

        // Keep trailing blanks and comments on the line of the anchor.
        while !self.ends_line(&self.nodes[anchor])
            && self.nodes.get(anchor + 1).is_some_and(|next| {
                matches!(next.kind(), NodeKind::Literal | NodeKind::Comment)
                    && next.line_number() == line_number
            })
        {
            anchor += 1;
        }

        let mut position = anchor + 1;
        if self.ends_line(&self.nodes[anchor]) {
            // Nothing to do, the new line starts right here.
        } else if self.nodes.get(position).is_some_and(ConfigNode::is_new_line) {
            position += 1;
        } else {
            let mut new_line = ConfigNode::new_line();
            new_line.set_line_number(line_number);
            self.nodes.insert(position, new_line);
            position += 1;
        }

        let mut assignment = self.new_assignment(name, value);
        assignment.set_line_number(line_number);
        assignment.set_indent(indent);

        let mut new_line = ConfigNode::new_line();
        new_line.set_line_number(line_number);

        self.nodes.insert(position, assignment);
        self.nodes.insert(position + 1, new_line);
        true
    }

    /// Checks if the section has the variable. An empty section name means
    /// the global part of the file before the first section.
    pub fn has_variable(&self, section: &str, name: &str, including_disabled: bool) -> bool {
        let mut path_to_indent: BTreeMap<usize, Vec<&str>> = BTreeMap::new();
        let mut path: Vec<&str> = Vec::new();
        let mut current_indent = 0;
        let mut current_section = "";

        for node in &self.nodes {
            if node.is_new_line() {
                continue;
            }

            if node.is_section() {
                current_section = node.section_name();

                if path.is_empty() || node.indent() > current_indent {
                    path_to_indent.insert(node.indent(), path.clone());
                    current_indent = node.indent();
                } else if node.indent() < current_indent {
                    path = path_to_indent
                        .get(&node.indent())
                        .cloned()
                        .unwrap_or_default();
                    current_indent = node.indent();
                } else {
                    path.pop();
                }

                path.push(current_section);
                log::trace!("section path: {}", path.join("."));
            } else if node.is_assignment() {
                log::trace!("variable path: {}.{}", path.join("."), node.left_value());
            }

            if !self.section_equal(current_section, section)
                || !self.name_equal(node.left_value(), name)
            {
                continue;
            }

            if node.is_assignment() || (including_disabled && node.is_commented()) {
                return true;
            }
        }

        false
    }

    pub fn has_section(&self, name: &str) -> bool {
        self.nodes
            .iter()
            .any(|node| node.is_section() && self.section_equal(node.section_name(), name))
    }

    /// Renders the nodes back into the text of a config file. Unless the
    /// nodes were edited the result equals the parsed input.
    pub fn build(&self) -> String {
        let mut content = String::new();

        for node in &self.nodes {
            node.render(self.syntax, &mut content);
        }

        content
    }

    pub fn dump(&self) -> String {
        let mut out = String::new();

        for node in &self.nodes {
            node.dump(0, &mut out);
        }

        out
    }
}
