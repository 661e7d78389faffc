use std::collections::BTreeMap;
use std::fmt::Write as _;

#[cfg(feature = "serde")]
use serde::Serialize;

use crate::node::{Node, NodeKind, PropertyValue};

/// Structural copy of a tree: kinds, names, properties and children in order.
///
/// Two trees built from the same description produce equal snapshots, which
/// makes this the comparison used for parse round-trips and `grove check`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct NodeSnapshot {
    pub kind: NodeKind,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "BTreeMap::is_empty"))]
    pub properties: BTreeMap<String, PropertyValue>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    pub fn capture(node: &dyn Node) -> Self {
        Self {
            kind: node.kind(),
            name: node.name().to_string(),
            properties: node.properties().clone(),
            children: node
                .children()
                .iter()
                .map(|child| NodeSnapshot::capture(child.as_ref()))
                .collect(),
        }
    }

    /// Total number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(NodeSnapshot::node_count).sum::<usize>()
    }

    /// Indented one-node-per-line rendering:
    ///
    /// ```text
    /// Sequence root
    ///   Action Action:Patrol {speed: 2}
    /// ```
    pub fn render_outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(&mut out, 0);
        out
    }

    fn write_outline(&self, out: &mut String, depth: usize) {
        let _ = write!(out, "{:indent$}{} {}", "", self.kind, self.name, indent = depth * 2);
        if !self.properties.is_empty() {
            let props = self
                .properties
                .iter()
                .map(|(key, value)| match value {
                    PropertyValue::Text(text) => format!("{key}: {text:?}"),
                    PropertyValue::Number(n) => format!("{key}: {n}"),
                })
                .collect::<Vec<_>>()
                .join(", ");
            let _ = write!(out, " {{{props}}}");
        }
        out.push('\n');
        for child in &self.children {
            child.write_outline(out, depth + 1);
        }
    }
}
