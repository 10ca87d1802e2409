//! Mermaid-style class diagram parser
//!
//! Lowers the chumsky AST into a [`ClassDiagram`]. Classes referenced by a
//! relationship are created on first mention; repeated `class` blocks for
//! the same name merge into one definition.

use tracing::{debug, span, trace, Level};

use super::chumsky_parser::{
    is_root_annotation, ChumskyMermaidParser, ParsedClass, ParsedMember, ParsedRelationship,
    RelationKind, Side, Statement,
};
use crate::core::{AggregationEdge, Attribute, ClassDiagram, DiagramParser, InputFormat, ModelError};

/// Multiplicity used when an aggregation arrow has no cardinality on the part
pub const DEFAULT_CARDINALITY: &str = "1";

/// Parser for the Mermaid-style notation
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidParser {
    grammar: ChumskyMermaidParser,
}

impl MermaidParser {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_class(diagram: &mut ClassDiagram, parsed: ParsedClass) {
        let is_root = parsed.is_root();
        let class = diagram.get_or_create_class(&parsed.name);
        class.is_root |= is_root;

        for member in parsed.members {
            match member {
                ParsedMember::Attribute { name, attr_type } => {
                    class.add_attribute(Attribute::new(name, attr_type));
                }
                ParsedMember::Method { name } => {
                    trace!(class = %class.name, method = %name, "Skipping method member");
                }
                ParsedMember::Annotation(_) => {}
            }
        }
    }

    fn apply_relationship(diagram: &mut ClassDiagram, rel: ParsedRelationship) {
        diagram.get_or_create_class(&rel.left);
        diagram.get_or_create_class(&rel.right);

        let (whole, part, cardinality) = match rel.kind {
            RelationKind::Aggregation(Side::Left) => (rel.left, rel.right, rel.right_cardinality),
            RelationKind::Aggregation(Side::Right) => (rel.right, rel.left, rel.left_cardinality),
            other => {
                debug!(
                    left = %rel.left,
                    right = %rel.right,
                    kind = ?other,
                    "Ignoring non-aggregation relationship"
                );
                return;
            }
        };

        let multiplicity = cardinality.unwrap_or_else(|| DEFAULT_CARDINALITY.to_string());
        trace!(whole = %whole, part = %part, multiplicity = %multiplicity, "Parsed aggregation");
        diagram.add_edge(AggregationEdge::new(part, whole, multiplicity));
    }
}

impl DiagramParser for MermaidParser {
    fn parse(&self, input: &str, diagram: &mut ClassDiagram) -> Result<(), ModelError> {
        let parse_span = span!(Level::INFO, "parse_mermaid", input_len = input.len());
        let _enter = parse_span.enter();

        let statements = self.grammar.parse_document(input)?;
        debug!(statements = statements.len(), "Parsed statements");

        for statement in statements {
            match statement {
                Statement::Class(class) => Self::apply_class(diagram, class),
                Statement::Annotation { class, annotation } => {
                    let class = diagram.get_or_create_class(&class);
                    class.is_root |= is_root_annotation(&annotation);
                }
                Statement::Relationship(rel) => Self::apply_relationship(diagram, rel),
            }
        }

        debug!(
            classes = diagram.class_count(),
            edges = diagram.edge_count(),
            "Mermaid parsing completed"
        );
        Ok(())
    }

    fn format(&self) -> InputFormat {
        InputFormat::Mermaid
    }
}
