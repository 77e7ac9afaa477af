//! CSS printer for the stylesheet tree.
//!
//! Raws win when present; otherwise nodes go on their own line, indented two
//! spaces per nesting level.

use super::{Node, Raws, Stylesheet};

/// Marker text that introduces a placeholder comment.
pub const PLACEHOLDER_MARKER: &str = "@replace|";

pub(super) fn print(sheet: &Stylesheet) -> String {
    let mut out = String::new();
    for (i, node) in sheet.nodes.iter().enumerate() {
        print_node(node, 0, i == 0, &mut out);
    }
    if !out.is_empty() {
        out.push('\n');
    }
    out
}

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn before(raws: &Raws, depth: usize, first: bool) -> String {
    match &raws.before {
        Some(before) => before.clone(),
        None if first && depth == 0 => String::new(),
        None => format!("\n{}", indent(depth)),
    }
}

fn print_block(nodes: &[Node], raws: &Raws, depth: usize, out: &mut String) {
    out.push('{');
    for node in nodes {
        print_node(node, depth + 1, false, out);
    }
    match &raws.after {
        Some(after) => out.push_str(after),
        None if nodes.is_empty() => {}
        None => {
            out.push('\n');
            out.push_str(&indent(depth));
        }
    }
    out.push('}');
}

fn print_node(node: &Node, depth: usize, first: bool, out: &mut String) {
    match node {
        Node::Rule(rule) => {
            out.push_str(&before(&rule.raws, depth, first));
            out.push_str(&rule.selector);
            out.push_str(rule.raws.between.as_deref().unwrap_or(" "));
            print_block(&rule.nodes, &rule.raws, depth, out);
        }
        Node::AtRule(at) => {
            out.push_str(&before(&at.raws, depth, first));
            out.push('@');
            out.push_str(&at.name);
            if !at.params.is_empty() {
                out.push(' ');
                out.push_str(&at.params);
            }
            match &at.nodes {
                Some(nodes) => {
                    out.push_str(at.raws.between.as_deref().unwrap_or(" "));
                    print_block(nodes, &at.raws, depth, out);
                }
                None => {
                    out.push_str(at.raws.between.as_deref().unwrap_or(""));
                    out.push(';');
                }
            }
        }
        Node::Declaration(decl) => {
            out.push_str(&before(&decl.raws, depth, first));
            out.push_str(&decl.prop);
            out.push_str(decl.raws.between.as_deref().unwrap_or(": "));
            out.push_str(&decl.value);
            out.push(';');
        }
        Node::Comment(comment) => {
            out.push_str(&before(&comment.raws, depth, first));
            out.push_str("/* ");
            out.push_str(&comment.text);
            out.push_str(" */");
        }
        Node::Placeholder(placeholder) => {
            out.push_str(&before(&placeholder.raws, depth, first));
            out.push_str("/* ");
            out.push_str(PLACEHOLDER_MARKER);
            out.push_str(&placeholder.path.display().to_string());
            out.push_str(" */");
        }
    }
}
