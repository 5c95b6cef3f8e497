//! Reduced parse output.
//!
//! An [`AstNode`] is a name plus either flat text or an ordered list of
//! child nodes. Nodes are produced fresh by every parse, are never mutated
//! afterwards, and hold no reference to the grammar that produced them.

use std::fmt;
use std::sync::Arc;

/// Value carried by an [`AstNode`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AstValue {
    /// Matched text, with nested structure flattened away.
    Text(String),
    /// Structured children, in match order.
    Nodes(Vec<AstNode>),
}

/// A named node of the reduced syntax tree.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AstNode {
    name: Arc<str>,
    value: AstValue,
}

impl AstNode {
    pub fn new(name: impl Into<Arc<str>>, value: AstValue) -> Self {
        AstNode {
            name: name.into(),
            value,
        }
    }

    /// A leaf node holding text.
    pub fn text(name: impl Into<Arc<str>>, text: impl Into<String>) -> Self {
        Self::new(name, AstValue::Text(text.into()))
    }

    /// A structured node holding children.
    pub fn nodes(name: impl Into<Arc<str>>, children: Vec<AstNode>) -> Self {
        Self::new(name, AstValue::Nodes(children))
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn value(&self) -> &AstValue {
        &self.value
    }

    /// The text of a leaf node, `None` for structured nodes.
    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            AstValue::Text(text) => Some(text),
            AstValue::Nodes(_) => None,
        }
    }

    /// The children of a structured node; empty for leaf nodes.
    pub fn children(&self) -> &[AstNode] {
        match &self.value {
            AstValue::Text(_) => &[],
            AstValue::Nodes(children) => children,
        }
    }

    /// True for an empty text value or an empty child list.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            AstValue::Text(text) => text.is_empty(),
            AstValue::Nodes(children) => children.is_empty(),
        }
    }

    /// All text under this node, concatenated in order.
    ///
    /// Flattening a leaf returns its text unchanged.
    pub fn flatten(&self) -> String {
        match &self.value {
            AstValue::Text(text) => text.clone(),
            AstValue::Nodes(_) => {
                let mut out = String::new();
                self.flatten_into(&mut out);
                out
            }
        }
    }

    /// Append all text under this node to `out`.
    pub fn flatten_into(&self, out: &mut String) {
        match &self.value {
            AstValue::Text(text) => out.push_str(text),
            AstValue::Nodes(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }

    /// Pre-order iterator over this node and everything below it.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// First node named `name`, searching depth-first from `self`.
    pub fn find(&self, name: &str) -> Option<&AstNode> {
        self.descendants().find(|node| node.name() == name)
    }

    /// Every node named `name`, in pre-order.
    pub fn find_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a AstNode> + 'a {
        self.descendants().filter(move |node| node.name() == name)
    }
}

/// Renders `name("text")` for leaves and `name[child, ...]` for structured
/// nodes.
impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            AstValue::Text(text) => write!(f, "{}({:?})", self.name, text),
            AstValue::Nodes(children) => {
                write!(f, "{}[", self.name)?;
                for (i, child) in children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str("]")
            }
        }
    }
}

/// Pre-order traversal returned by [`AstNode::descendants`].
pub struct Descendants<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children().iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests;
