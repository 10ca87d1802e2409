//! Classtree - Turn class diagrams into configuration skeletons
//!
//! Reads a class diagram (classes with typed attributes plus aggregation
//! edges), materializes the containment tree under the root class as an XML
//! instance document, and extracts a flat JSON schema with one descriptor
//! per class.
//!
//! # Quick Start
//!
//! ```rust
//! use classtree::materialize;
//!
//! let input = r#"classDiagram
//!     class Root <<root>> {
//!         duration: int
//!     }
//!     class Child {
//!         name: string
//!     }
//!     Root o-- "0..5" Child
//! "#;
//!
//! let xml = materialize(input).unwrap();
//! assert!(xml.contains("<duration>int</duration>"));
//! assert!(xml.contains("        <name>string</name>"));
//! ```
//!
//! # Advanced Usage
//!
//! For more control, use the individual stages:
//!
//! ```rust
//! use classtree::prelude::*;
//!
//! let input = r#"<Diagram>
//!     <Class name="Root" isRoot="true"/>
//!     <Class name="Leaf" isRoot="false"/>
//!     <Aggregation source="Leaf" target="Root" sourceMultiplicity="1..*"/>
//! </Diagram>"#;
//!
//! let diagram = XmlParser::new().parse_diagram(input).unwrap();
//! let index = GraphIndex::build(diagram).unwrap();
//!
//! let tree = TreeMaterializer::new().materialize_root(&index).unwrap();
//! assert_eq!(tree.node_count(), 2);
//!
//! let descriptors = SchemaExtractor::new().extract(&index);
//! assert_eq!(descriptors[1].max.as_deref(), Some("*"));
//! ```

pub mod core;
pub mod model;
pub mod output;
pub mod plugins;

pub use core::*;
pub use output::{ArtifactPaths, Artifacts};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::core::{
        AggregationEdge, Attribute, ClassDef, ClassDiagram, Detector, DiagramParser,
        InputFormat, ModelError, OutputConfig, SchemaConfig, SerializeConfig,
    };
    pub use crate::model::{
        resolve_root, DocumentSerializer, GraphIndex, InstanceNode, Multiplicity,
        SchemaDescriptor, SchemaExtractor, TreeMaterializer,
    };
    pub use crate::output::{ArtifactPaths, Artifacts};
    pub use crate::plugins::{MermaidDetector, MermaidParser, Pipeline, XmlDetector, XmlParser};
}

/// Render the instance document for a diagram
///
/// The input format is detected automatically.
///
/// # Example
/// ```rust
/// use classtree::materialize;
///
/// let xml = materialize("<<root>> Shelf\nShelf o-- \"0..*\" Book").unwrap();
/// assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Shelf>"));
/// ```
pub fn materialize(input: &str) -> anyhow::Result<String> {
    let pipeline = plugins::Pipeline::with_default_plugins();
    Ok(pipeline.render_tree(input, None)?)
}

/// Render the schema descriptor document for a diagram
///
/// # Example
/// ```rust
/// use classtree::extract_schema;
///
/// let json = extract_schema("<<root>> Shelf\nShelf o-- \"0..*\" Book").unwrap();
/// assert!(json.contains("\"max\": \"*\""));
/// ```
pub fn extract_schema(input: &str) -> anyhow::Result<String> {
    let pipeline = plugins::Pipeline::with_default_plugins();
    Ok(pipeline.render_schema(input, None)?)
}

/// Parse a diagram without materializing it
///
/// # Example
/// ```rust
/// use classtree::parse;
///
/// let diagram = parse("Car o-- \"4\" Wheel").unwrap();
/// assert_eq!(diagram.class_count(), 2);
/// assert_eq!(diagram.edges()[0].source, "Wheel");
/// ```
pub fn parse(input: &str) -> anyhow::Result<ClassDiagram> {
    let pipeline = plugins::Pipeline::with_default_plugins();
    Ok(pipeline.load(input, None)?)
}

/// Run the whole pipeline and return both documents without writing them
pub fn process(input: &str) -> anyhow::Result<Artifacts> {
    let pipeline = plugins::Pipeline::with_default_plugins();
    Ok(pipeline.process(input)?)
}

/// Run the whole pipeline and write both documents to `output`
///
/// Nothing is written unless both documents render successfully.
pub fn generate(input: &str, output: &OutputConfig) -> anyhow::Result<ArtifactPaths> {
    let artifacts = process(input)?;
    Ok(artifacts.write_to(output)?)
}
