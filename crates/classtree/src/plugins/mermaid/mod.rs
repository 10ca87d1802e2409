//! Mermaid-style class diagram plugin

mod chumsky_parser;
mod detector;
mod parser;

pub use chumsky_parser::{
    ChumskyMermaidParser, ParsedClass, ParsedMember, ParsedRelationship, RelationKind, Side,
    Statement, ROOT_ANNOTATION,
};
pub use detector::MermaidDetector;
pub use parser::{MermaidParser, DEFAULT_CARDINALITY};
