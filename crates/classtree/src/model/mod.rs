//! The materialization engine
//!
//! [`GraphIndex`] is built once from a parsed [`ClassDiagram`](crate::core::ClassDiagram);
//! [`resolve_root`] finds the root; [`TreeMaterializer`] and [`SchemaExtractor`]
//! both read the index; [`DocumentSerializer`] renders the materialized tree.

mod index;
mod materializer;
mod multiplicity;
mod root;
mod schema;
mod serializer;

pub use index::GraphIndex;
pub use materializer::{InstanceNode, ScalarField, TreeMaterializer};
pub use multiplicity::{Multiplicity, RANGE_SEPARATOR};
pub use root::resolve_root;
pub use schema::{Parameter, SchemaDescriptor, SchemaExtractor, CLASS_PARAMETER_TYPE};
pub use serializer::{is_xml_name, DocumentSerializer};
