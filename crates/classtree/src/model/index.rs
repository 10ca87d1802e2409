//! Name-keyed lookup over a validated class diagram
//!
//! [`GraphIndex`] is built once from a [`ClassDiagram`] and never mutated.
//! Every query answers in declaration order, which is what makes the
//! instance document and the schema deterministic.

use std::collections::HashMap;
use tracing::{debug, span, trace, Level};

use crate::core::{AggregationEdge, ClassDef, ClassDiagram, ModelError};

/// Immutable index of classes and aggregation edges
#[derive(Debug, Clone)]
pub struct GraphIndex {
    classes: Vec<ClassDef>,
    edges: Vec<AggregationEdge>,
    by_name: HashMap<String, usize>,
    by_target: HashMap<String, Vec<usize>>,
    by_source: HashMap<String, Vec<usize>>,
}

impl GraphIndex {
    /// Build the index, validating the diagram eagerly
    ///
    /// Fails on duplicate class names and on edges whose source or target
    /// does not name a known class.
    pub fn build(diagram: ClassDiagram) -> Result<Self, ModelError> {
        let build_span = span!(
            Level::DEBUG,
            "build_index",
            classes = diagram.class_count(),
            edges = diagram.edge_count()
        );
        let _enter = build_span.enter();

        let (classes, edges) = diagram.into_parts();

        let mut by_name = HashMap::with_capacity(classes.len());
        for (position, class) in classes.iter().enumerate() {
            if by_name.insert(class.name.clone(), position).is_some() {
                return Err(ModelError::DuplicateClass {
                    name: class.name.clone(),
                });
            }
        }

        let mut by_target: HashMap<String, Vec<usize>> = HashMap::new();
        let mut by_source: HashMap<String, Vec<usize>> = HashMap::new();
        for (position, edge) in edges.iter().enumerate() {
            for (endpoint, name) in [("source", &edge.source), ("target", &edge.target)] {
                if !by_name.contains_key(name) {
                    return Err(ModelError::UnresolvedReference {
                        endpoint,
                        name: name.clone(),
                        edge: edge.to_string(),
                    });
                }
            }
            trace!(source = %edge.source, target = %edge.target, "Indexed aggregation");
            by_target
                .entry(edge.target.clone())
                .or_default()
                .push(position);
            by_source
                .entry(edge.source.clone())
                .or_default()
                .push(position);
        }

        debug!(
            classes = classes.len(),
            edges = edges.len(),
            "Graph index built"
        );

        Ok(Self {
            classes,
            edges,
            by_name,
            by_target,
            by_source,
        })
    }

    /// Look up a class by name
    pub fn class(&self, name: &str) -> Option<&ClassDef> {
        self.by_name.get(name).map(|&i| &self.classes[i])
    }

    /// Edges whose `target` is `name`: the children a `name` instance holds
    pub fn edges_into<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a AggregationEdge> + 'a {
        self.lookup(&self.by_target, name)
    }

    /// Edges whose `source` is `name`: the parents a `name` instance may sit under
    pub fn edges_from<'a>(&'a self, name: &str) -> impl Iterator<Item = &'a AggregationEdge> + 'a {
        self.lookup(&self.by_source, name)
    }

    fn lookup<'a>(
        &'a self,
        map: &'a HashMap<String, Vec<usize>>,
        name: &str,
    ) -> impl Iterator<Item = &'a AggregationEdge> + 'a {
        map.get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
            .iter()
            .map(|&i| &self.edges[i])
    }

    /// All classes in declaration order
    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    /// All edges in declaration order
    pub fn edges(&self) -> &[AggregationEdge] {
        &self.edges
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }
}

impl TryFrom<ClassDiagram> for GraphIndex {
    type Error = ModelError;

    fn try_from(diagram: ClassDiagram) -> Result<Self, Self::Error> {
        Self::build(diagram)
    }
}
