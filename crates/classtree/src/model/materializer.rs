//! Instance tree materialization
//!
//! Walks the containment edges downward from the root class and builds a
//! template instance: every attribute becomes a scalar field whose value is
//! the declared type, and every aggregation into the current class becomes a
//! nested child node.

use std::collections::HashSet;
use tracing::{debug, span, trace, Level};

use super::{resolve_root, GraphIndex};
use crate::core::{ClassDef, ModelError};

/// Scalar leaf of an instance node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScalarField {
    pub name: String,
    pub value: String,
}

impl ScalarField {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// One materialized class instance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstanceNode {
    pub tag: String,
    pub fields: Vec<ScalarField>,
    pub children: Vec<InstanceNode>,
}

impl InstanceNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(ScalarField::new(name, value));
        self
    }

    pub fn with_child(mut self, child: InstanceNode) -> Self {
        self.children.push(child);
        self
    }

    /// True when the node has neither fields nor children
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.children.is_empty()
    }

    /// Number of class nodes in this subtree, including this one
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(InstanceNode::node_count).sum::<usize>()
    }

    /// Length of the longest root-to-leaf chain of class nodes
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(InstanceNode::depth).max().unwrap_or(0)
    }

    /// First direct child with the given tag
    pub fn child(&self, tag: &str) -> Option<&InstanceNode> {
        self.children.iter().find(|c| c.tag == tag)
    }

    /// Value of the named scalar field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .map(|f| f.value.as_str())
    }
}

/// Builds [`InstanceNode`] trees from a [`GraphIndex`]
#[derive(Debug, Clone, Copy, Default)]
pub struct TreeMaterializer;

impl TreeMaterializer {
    pub fn new() -> Self {
        Self
    }

    /// Resolve the root class and materialize the tree under it
    pub fn materialize_root(&self, index: &GraphIndex) -> Result<InstanceNode, ModelError> {
        let root = resolve_root(index)?;
        self.materialize(index, root)
    }

    /// Materialize the tree rooted at `root`
    ///
    /// A class that reappears on its own ancestor path is a containment cycle
    /// and fails with [`ModelError::CyclicContainment`]. A class reachable
    /// along several acyclic paths is materialized once per path.
    pub fn materialize(
        &self,
        index: &GraphIndex,
        root: &ClassDef,
    ) -> Result<InstanceNode, ModelError> {
        let materialize_span = span!(Level::INFO, "materialize_tree", root = %root.name);
        let _enter = materialize_span.enter();

        let mut path = Vec::new();
        let mut on_path = HashSet::new();
        let tree = self.build_node(index, root, &mut path, &mut on_path)?;

        debug!(
            nodes = tree.node_count(),
            depth = tree.depth(),
            "Materialization completed"
        );
        Ok(tree)
    }

    fn build_node<'a>(
        &self,
        index: &'a GraphIndex,
        class: &'a ClassDef,
        path: &mut Vec<&'a str>,
        on_path: &mut HashSet<&'a str>,
    ) -> Result<InstanceNode, ModelError> {
        if !on_path.insert(class.name.as_str()) {
            let mut cycle: Vec<String> = path.iter().map(|s| s.to_string()).collect();
            cycle.push(class.name.clone());
            return Err(ModelError::CyclicContainment { path: cycle });
        }
        path.push(class.name.as_str());
        trace!(class = %class.name, depth = path.len(), "Materializing class");

        let mut node = InstanceNode::new(&class.name);
        node.fields = class
            .attributes
            .iter()
            .map(|attr| ScalarField::new(&attr.name, &attr.attr_type))
            .collect();

        for edge in index.edges_into(&class.name) {
            let child_class =
                index
                    .class(&edge.source)
                    .ok_or_else(|| ModelError::UnresolvedReference {
                        endpoint: "source",
                        name: edge.source.clone(),
                        edge: edge.to_string(),
                    })?;
            node.children
                .push(self.build_node(index, child_class, path, on_path)?);
        }

        path.pop();
        on_path.remove(class.name.as_str());
        Ok(node)
    }
}
