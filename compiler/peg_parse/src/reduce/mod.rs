//! Reduction of matched fragments into AST nodes.
//!
//! The engine collects [`Fragment`]s while a rule matches: borrowed slices of
//! the input for terminals and already-reduced nodes for named sub-rules.
//! When a named rule finishes, its fragments are reduced according to the
//! rule's [`Fidelity`]:
//!
//! - `Flatten`: one text node holding every matched character in order.
//! - `Structured`: adjacent text from the same terminal is joined into one
//!   text node, and sub-rule nodes are kept as distinct children.

use peg_ir::{AstNode, Fidelity};
use std::sync::Arc;

/// One piece of a rule's match, in input order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Fragment<'s> {
    /// Text matched by the terminal `name`.
    Text { name: Arc<str>, text: &'s str },
    /// A reduced named sub-rule.
    Node(AstNode),
}

impl Fragment<'_> {
    fn write_text(&self, out: &mut String) {
        match self {
            Fragment::Text { text, .. } => out.push_str(text),
            Fragment::Node(node) => node.flatten_into(out),
        }
    }
}

/// Reduce `fragments` into a node named `name`.
pub fn reduce(name: &Arc<str>, fidelity: Fidelity, fragments: Vec<Fragment<'_>>) -> AstNode {
    match fidelity {
        Fidelity::Flatten => AstNode::text(Arc::clone(name), flatten(&fragments)),
        Fidelity::Structured => AstNode::nodes(Arc::clone(name), structure(fragments)),
    }
}

/// Every character covered by `fragments`, in order.
pub fn flatten(fragments: &[Fragment<'_>]) -> String {
    let mut out = String::new();
    for fragment in fragments {
        fragment.write_text(&mut out);
    }
    out
}

/// Child nodes for a structured reduction.
///
/// Consecutive text from one terminal becomes a single text node. Text from
/// differently named terminals stays in separate nodes even when adjacent,
/// so `"ab"` matched as `a` then `b` gives two children.
pub fn structure(fragments: Vec<Fragment<'_>>) -> Vec<AstNode> {
    let mut nodes = Vec::with_capacity(fragments.len());
    let mut run: Option<(Arc<str>, String)> = None;

    for fragment in fragments {
        match fragment {
            Fragment::Text { name, text } => {
                if let Some((run_name, buffer)) = run.as_mut() {
                    if *run_name == name {
                        buffer.push_str(text);
                        continue;
                    }
                }
                close_run(&mut nodes, run.take());
                run = Some((name, text.to_owned()));
            }
            Fragment::Node(node) => {
                close_run(&mut nodes, run.take());
                nodes.push(node);
            }
        }
    }
    close_run(&mut nodes, run);
    nodes
}

fn close_run(nodes: &mut Vec<AstNode>, run: Option<(Arc<str>, String)>) {
    if let Some((name, text)) = run {
        nodes.push(AstNode::text(name, text));
    }
}

#[cfg(test)]
mod tests;
