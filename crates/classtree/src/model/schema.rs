//! Schema descriptor extraction
//!
//! One flat record per class: its attributes, the child classes it may hold,
//! and, when the class is itself aggregated somewhere, its cardinality bounds.

use serde::{Deserialize, Serialize};
use serde_json::ser::{PrettyFormatter, Serializer};
use tracing::{debug, span, Level};

use super::{GraphIndex, Multiplicity};
use crate::core::{ModelError, SchemaConfig};

/// Parameter type used for child-class references
pub const CLASS_PARAMETER_TYPE: &str = "class";

/// A `{name, type}` entry of a descriptor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: String,
}

impl Parameter {
    pub fn new(name: impl Into<String>, param_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param_type: param_type.into(),
        }
    }

    /// Reference to a child class
    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, CLASS_PARAMETER_TYPE)
    }

    pub fn is_class_reference(&self) -> bool {
        self.param_type == CLASS_PARAMETER_TYPE
    }
}

/// Flat per-class schema record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaDescriptor {
    pub name: String,
    #[serde(rename = "isRoot")]
    pub is_root: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<String>,
    pub parameters: Vec<Parameter>,
}

impl SchemaDescriptor {
    /// Declared bounds, if the class appears as some edge's source
    pub fn multiplicity(&self) -> Option<Multiplicity> {
        match (&self.min, &self.max) {
            (Some(min), Some(max)) => Some(Multiplicity::new(min, max)),
            _ => None,
        }
    }
}

/// Produces [`SchemaDescriptor`]s from a [`GraphIndex`]
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaExtractor {
    config: SchemaConfig,
}

impl SchemaExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SchemaConfig) -> Self {
        Self { config }
    }

    /// One descriptor per class, in class declaration order
    ///
    /// When a class is the source of several edges, the first one in
    /// declaration order supplies its multiplicity.
    pub fn extract(&self, index: &GraphIndex) -> Vec<SchemaDescriptor> {
        let extract_span = span!(Level::INFO, "extract_schema", classes = index.class_count());
        let _enter = extract_span.enter();

        let descriptors: Vec<_> = index
            .classes()
            .iter()
            .map(|class| {
                let mut parents = index.edges_from(&class.name);
                let multiplicity = parents
                    .next()
                    .map(|edge| Multiplicity::parse(&edge.source_multiplicity));
                let others = parents.count();
                if others > 0 {
                    debug!(
                        class = %class.name,
                        ignored = others,
                        "Class aggregated under several parents, using first multiplicity"
                    );
                }

                let parameters = class
                    .attributes
                    .iter()
                    .map(|attr| Parameter::new(&attr.name, &attr.attr_type))
                    .chain(index.edges_into(&class.name).map(|edge| Parameter::class(&edge.source)))
                    .collect();

                let (min, max) = match multiplicity {
                    Some(Multiplicity { min, max }) => (Some(min), Some(max)),
                    None => (None, None),
                };

                SchemaDescriptor {
                    name: class.name.clone(),
                    is_root: class.is_root,
                    min,
                    max,
                    parameters,
                }
            })
            .collect();

        debug!(descriptors = descriptors.len(), "Schema extraction completed");
        descriptors
    }

    /// Render descriptors as an indented JSON array, newline-terminated
    pub fn to_json(&self, descriptors: &[SchemaDescriptor]) -> Result<String, ModelError> {
        let indent = " ".repeat(self.config.indent);
        let mut buffer = Vec::new();
        let mut serializer =
            Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(indent.as_bytes()));
        descriptors.serialize(&mut serializer)?;
        buffer.push(b'\n');
        // serde_json only ever emits UTF-8
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Extract and render in one step
    pub fn extract_json(&self, index: &GraphIndex) -> Result<String, ModelError> {
        self.to_json(&self.extract(index))
    }
}
