//! Stylesheet tree.
//!
//! An ordered, mutable tree of rules, at-rules, declarations and comments,
//! plus the placeholder node the pipeline uses as a join key between token
//! injection and reference resolution. Each node keeps its source
//! formatting in [`Raws`] so re-emitted stylesheets match their neighbours.
//!
//! Parsing stylesheet text is the host's job; this module only builds,
//! traverses and prints the tree.
//!
//! # Example
//!
//! ```
//! use lazysprite::document::{AtRule, Node, Rule, Stylesheet};
//!
//! let mut sheet = Stylesheet::new(vec![
//!     Node::AtRule(AtRule::new("lazysprite", "\"icons\"")),
//!     Node::Rule(Rule::new(".logo", vec![])),
//! ]);
//! sheet.expand_at_rules("lazysprite", |_| Vec::new());
//! assert_eq!(sheet.nodes.len(), 1);
//! ```

mod print;

use std::path::{Path, PathBuf};

use crate::error::Result;

/// Source formatting around a node.
///
/// `None` means "use the printer default".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Raws {
    /// Whitespace before the node.
    pub before: Option<String>,
    /// Between selector/prop and `{`/value.
    pub between: Option<String>,
    /// Before the closing `}` of a block.
    pub after: Option<String>,
}

/// A style rule: `selector { ... }`.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub selector: String,
    pub nodes: Vec<Node>,
    pub raws: Raws,
}

impl Rule {
    pub fn new(selector: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            selector: selector.into(),
            nodes,
            raws: Raws::default(),
        }
    }
}

/// An at-rule, with or without a block: `@media ... { }` or `@name params;`.
#[derive(Debug, Clone, PartialEq)]
pub struct AtRule {
    pub name: String,
    pub params: String,
    pub nodes: Option<Vec<Node>>,
    pub raws: Raws,
}

impl AtRule {
    /// A statement at-rule without a block.
    pub fn new(name: impl Into<String>, params: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: params.into(),
            nodes: None,
            raws: Raws::default(),
        }
    }

    /// A block at-rule.
    pub fn block(name: impl Into<String>, params: impl Into<String>, nodes: Vec<Node>) -> Self {
        Self {
            nodes: Some(nodes),
            ..Self::new(name, params)
        }
    }
}

/// A declaration: `prop: value;`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub prop: String,
    pub value: String,
    pub raws: Raws,
}

impl Declaration {
    pub fn new(prop: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            prop: prop.into(),
            value: value.into(),
            raws: Raws::default(),
        }
    }
}

/// A comment: `/* text */`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comment {
    pub text: String,
    pub raws: Raws,
}

/// Stand-in for the declarations of one sprite image.
///
/// Carries the image's absolute path; nothing reads it except by exact match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    pub path: PathBuf,
    pub raws: Raws,
}

impl Placeholder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            raws: Raws::default(),
        }
    }
}

/// A node in the stylesheet tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Rule(Rule),
    AtRule(AtRule),
    Declaration(Declaration),
    Comment(Comment),
    Placeholder(Placeholder),
}

impl Node {
    /// Child nodes of container nodes.
    pub fn children(&self) -> Option<&[Node]> {
        match self {
            Node::Rule(rule) => Some(&rule.nodes),
            Node::AtRule(at) => at.nodes.as_deref(),
            _ => None,
        }
    }

    fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match self {
            Node::Rule(rule) => Some(&mut rule.nodes),
            Node::AtRule(at) => at.nodes.as_mut(),
            _ => None,
        }
    }
}

/// A whole stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    pub nodes: Vec<Node>,
    /// The file this stylesheet was read from, if any.
    pub source: Option<PathBuf>,
}

impl Stylesheet {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self {
            nodes,
            source: None,
        }
    }

    /// Attach the path the stylesheet was read from.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Visit every at-rule named `name`, depth first in document order.
    ///
    /// The callback also receives the at-rule's siblings (itself included).
    /// Matching at-rules are not descended into, mirroring [`Stylesheet::expand_at_rules`].
    pub fn walk_at_rules<'a>(&'a self, name: &str, mut f: impl FnMut(&'a AtRule, &'a [Node])) {
        walk_at_rules_in(&self.nodes, name, &mut f);
    }

    /// Replace every at-rule named `name` with the nodes `f` returns.
    ///
    /// Replacement nodes are spliced in place, keeping document order, and
    /// are not themselves visited.
    pub fn expand_at_rules(&mut self, name: &str, mut f: impl FnMut(&AtRule) -> Vec<Node>) {
        expand_at_rules_in(&mut self.nodes, name, &mut f);
    }

    /// Visit every rule, depth first. Stops at the first error.
    pub fn walk_rules_mut(&mut self, mut f: impl FnMut(&mut Rule) -> Result<()>) -> Result<()> {
        walk_rules_in(&mut self.nodes, &mut f)
    }

    /// Paths of all placeholders still in the tree, in document order.
    pub fn placeholders(&self) -> Vec<&Path> {
        let mut found = Vec::new();
        collect_placeholders(&self.nodes, &mut found);
        found
    }

    /// Print the stylesheet as CSS text.
    pub fn to_css(&self) -> String {
        print::print(self)
    }
}

fn walk_at_rules_in<'a>(
    nodes: &'a [Node],
    name: &str,
    f: &mut impl FnMut(&'a AtRule, &'a [Node]),
) {
    for node in nodes {
        match node {
            Node::AtRule(at) if at.name.eq_ignore_ascii_case(name) => f(at, nodes),
            _ => {
                if let Some(children) = node.children() {
                    walk_at_rules_in(children, name, f);
                }
            }
        }
    }
}

fn expand_at_rules_in(nodes: &mut Vec<Node>, name: &str, f: &mut impl FnMut(&AtRule) -> Vec<Node>) {
    let mut i = 0;
    while i < nodes.len() {
        let replacement = match &nodes[i] {
            Node::AtRule(at) if at.name.eq_ignore_ascii_case(name) => Some(f(at)),
            _ => None,
        };

        match replacement {
            Some(replacement) => {
                let count = replacement.len();
                nodes.splice(i..=i, replacement);
                i += count;
            }
            None => {
                if let Some(children) = nodes[i].children_mut() {
                    expand_at_rules_in(children, name, f);
                }
                i += 1;
            }
        }
    }
}

fn walk_rules_in(nodes: &mut [Node], f: &mut impl FnMut(&mut Rule) -> Result<()>) -> Result<()> {
    for node in nodes.iter_mut() {
        if let Node::Rule(rule) = node {
            f(rule)?;
        }
        if let Some(children) = node.children_mut() {
            walk_rules_in(children, f)?;
        }
    }
    Ok(())
}

fn collect_placeholders<'a>(nodes: &'a [Node], found: &mut Vec<&'a Path>) {
    for node in nodes {
        match node {
            Node::Placeholder(p) => found.push(&p.path),
            other => {
                if let Some(children) = other.children() {
                    collect_placeholders(children, found);
                }
            }
        }
    }
}
