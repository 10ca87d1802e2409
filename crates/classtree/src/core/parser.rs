//! Core parser trait for diagram input
//!
//! A parser reads one concrete encoding and appends the classes and
//! aggregation edges it finds to a [`ClassDiagram`], in declaration order.

use super::{ClassDiagram, InputFormat, ModelError};

/// Core trait for diagram parsers
pub trait DiagramParser: Send + Sync {
    /// Parse `input` into `diagram`
    ///
    /// Parsing is all-or-nothing from the caller's point of view: on error the
    /// diagram contents are unspecified and must be discarded.
    fn parse(&self, input: &str, diagram: &mut ClassDiagram) -> Result<(), ModelError>;

    /// The format this parser reads
    fn format(&self) -> InputFormat;

    /// Parse into a fresh diagram
    fn parse_diagram(&self, input: &str) -> Result<ClassDiagram, ModelError> {
        let mut diagram = ClassDiagram::new();
        self.parse(input, &mut diagram)?;
        Ok(diagram)
    }
}
