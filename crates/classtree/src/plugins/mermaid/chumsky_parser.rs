//! Mermaid-style class diagram grammar using chumsky
//!
//! Only the subset needed for containment trees is interpreted: classes,
//! their typed attributes, a `<<root>>` annotation and aggregation arrows.
//! Other relationship arrows and method members are parsed and kept in the
//! AST so the caller can decide to ignore them.

use chumsky::prelude::*;

use crate::core::chumsky_utils::{blank, inline_whitespace, line_end};
use crate::core::ModelError;

type Extra<'src> = extra::Err<Rich<'src, char>>;

/// Annotation that flags the diagram root
pub const ROOT_ANNOTATION: &str = "root";

/// Which end of an arrow carries the aggregation diamond
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// `o--` or `--o`; the side names the whole
    Aggregation(Side),
    Composition,
    Inheritance,
    Realization,
    Association,
    Dependency,
    Link,
    DashedLink,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedMember {
    Attribute { name: String, attr_type: String },
    Method { name: String },
    Annotation(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedClass {
    pub name: String,
    pub annotation: Option<String>,
    pub members: Vec<ParsedMember>,
}

impl ParsedClass {
    /// True when the header or any body annotation is `<<root>>`
    pub fn is_root(&self) -> bool {
        let body = self.members.iter().filter_map(|m| match m {
            ParsedMember::Annotation(a) => Some(a.as_str()),
            _ => None,
        });
        self.annotation
            .as_deref()
            .into_iter()
            .chain(body)
            .any(is_root_annotation)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRelationship {
    pub left: String,
    pub right: String,
    pub left_cardinality: Option<String>,
    pub right_cardinality: Option<String>,
    pub kind: RelationKind,
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Class(ParsedClass),
    /// Standalone `<<annotation>> Name`
    Annotation { class: String, annotation: String },
    Relationship(ParsedRelationship),
}

pub fn is_root_annotation(annotation: &str) -> bool {
    annotation.trim().eq_ignore_ascii_case(ROOT_ANNOTATION)
}

/// Chumsky-based class diagram grammar
#[derive(Debug, Clone, Copy, Default)]
pub struct ChumskyMermaidParser;

impl ChumskyMermaidParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete diagram into statements
    pub fn parse_document(&self, input: &str) -> Result<Vec<Statement>, ModelError> {
        Self::document_parser()
            .parse(input)
            .into_result()
            .map_err(|errors| first_error(input, errors))
    }

    /// Parse a single statement
    pub fn parse_statement(&self, input: &str) -> Result<Statement, ModelError> {
        Self::statement_parser()
            .padded_by(blank())
            .then_ignore(end())
            .parse(input)
            .into_result()
            .map_err(|errors| first_error(input, errors))
    }

    fn document_parser<'src>() -> impl Parser<'src, &'src str, Vec<Statement>, Extra<'src>> {
        let header = just("classDiagram")
            .or(just("classdiagram"))
            .then(line_end());

        blank()
            .ignore_then(header.or_not())
            .ignore_then(blank())
            .ignore_then(
                Self::statement_parser()
                    .then_ignore(line_end())
                    .then_ignore(blank())
                    .repeated()
                    .collect(),
            )
            .then_ignore(end())
    }

    fn statement_parser<'src>() -> impl Parser<'src, &'src str, Statement, Extra<'src>> + Clone {
        let standalone_annotation = annotation()
            .then_ignore(inline_whitespace())
            .then(identifier())
            .map(|(annotation, class)| Statement::Annotation { class, annotation });

        Self::class_parser()
            .map(Statement::Class)
            .or(standalone_annotation)
            .or(Self::relationship_parser().map(Statement::Relationship))
    }

    fn class_parser<'src>() -> impl Parser<'src, &'src str, ParsedClass, Extra<'src>> + Clone {
        let body = just('{')
            .ignore_then(blank())
            .ignore_then(
                Self::member_parser()
                    .then_ignore(blank())
                    .repeated()
                    .collect::<Vec<_>>(),
            )
            .then_ignore(just('}'));

        just("class")
            .then(one_of(" \t").repeated().at_least(1))
            .ignore_then(identifier())
            .then_ignore(inline_whitespace())
            .then(annotation().or_not())
            .then_ignore(inline_whitespace())
            .then(body.or_not())
            .map(|((name, annotation), members)| ParsedClass {
                name,
                annotation,
                members: members.unwrap_or_default(),
            })
    }

    fn member_parser<'src>() -> impl Parser<'src, &'src str, ParsedMember, Extra<'src>> + Clone {
        let line = none_of("}\n")
            .repeated()
            .at_least(1)
            .to_slice()
            .try_map(|text: &str, span| {
                classify_member(text).map_err(|message| Rich::custom(span, message))
            });

        annotation()
            .then_ignore(inline_whitespace())
            .map(ParsedMember::Annotation)
            .or(line)
    }

    fn relationship_parser<'src>(
    ) -> impl Parser<'src, &'src str, ParsedRelationship, Extra<'src>> + Clone {
        let ws = inline_whitespace();

        let cardinality = just('"')
            .ignore_then(none_of("\"\n").repeated().to_slice())
            .then_ignore(just('"'))
            .map(|s: &str| s.trim().to_string());

        // Longest first to avoid partial matches
        let arrow = choice((
            just("<|--").to(RelationKind::Inheritance),
            just("--|>").to(RelationKind::Inheritance),
            just("..|>").to(RelationKind::Realization),
            just("<|..").to(RelationKind::Realization),
            just("*--").to(RelationKind::Composition),
            just("--*").to(RelationKind::Composition),
            just("o--").to(RelationKind::Aggregation(Side::Left)),
            just("--o").to(RelationKind::Aggregation(Side::Right)),
            just("..>").to(RelationKind::Dependency),
            just("<..").to(RelationKind::Dependency),
            just("-->").to(RelationKind::Association),
            just("<--").to(RelationKind::Association),
            just("..").to(RelationKind::DashedLink),
            just("--").to(RelationKind::Link),
        ));

        let label = just(':')
            .ignore_then(none_of("\n").repeated().to_slice())
            .map(|s: &str| strip_comment(s).trim().to_string());

        identifier()
            .then_ignore(ws.clone())
            .then(cardinality.clone().or_not())
            .then_ignore(ws.clone())
            .then(arrow)
            .then_ignore(ws.clone())
            .then(cardinality.or_not())
            .then_ignore(ws.clone())
            .then(identifier())
            .then_ignore(ws)
            .then(label.or_not())
            .map(
                |(((((left, left_cardinality), kind), right_cardinality), right), label)| {
                    ParsedRelationship {
                        left,
                        right,
                        left_cardinality,
                        right_cardinality,
                        kind,
                        label: label.filter(|s| !s.is_empty()),
                    }
                },
            )
    }
}

fn identifier<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    any()
        .filter(|c: &char| c.is_alphanumeric() || *c == '_')
        .repeated()
        .at_least(1)
        .collect::<String>()
}

fn annotation<'src>() -> impl Parser<'src, &'src str, String, Extra<'src>> + Clone {
    just("<<")
        .ignore_then(none_of(">\n").repeated().to_slice())
        .then_ignore(just(">>"))
        .map(|s: &str| s.trim().to_string())
}

fn strip_comment(text: &str) -> &str {
    match text.find("%%") {
        Some(pos) => &text[..pos],
        None => text,
    }
}

/// Classify one class body line
///
/// Accepts `[vis]name: type`, the Mermaid `[vis]Type name` form, and
/// methods (anything with parentheses).
fn classify_member(text: &str) -> Result<ParsedMember, String> {
    let line = strip_comment(text).trim();
    let line = line.strip_prefix(['+', '-', '#', '~']).unwrap_or(line).trim();

    if line.is_empty() {
        return Err(format!("expected a class member, found '{}'", text.trim()));
    }

    if let Some(paren) = line.find('(') {
        return Ok(ParsedMember::Method {
            name: line[..paren].trim().to_string(),
        });
    }

    if let Some((name, attr_type)) = line.split_once(':') {
        let (name, attr_type) = (name.trim(), attr_type.trim());
        if name.is_empty() || attr_type.is_empty() {
            return Err(format!("expected 'name: type', found '{line}'"));
        }
        return Ok(ParsedMember::Attribute {
            name: name.to_string(),
            attr_type: attr_type.to_string(),
        });
    }

    let words: Vec<&str> = line.split_whitespace().collect();
    match words.as_slice() {
        [attr_type, name] => Ok(ParsedMember::Attribute {
            name: name.to_string(),
            attr_type: attr_type.to_string(),
        }),
        _ => Err(format!("attribute '{line}' has no type")),
    }
}

fn first_error(input: &str, errors: Vec<Rich<'_, char>>) -> ModelError {
    match errors.into_iter().next() {
        Some(error) => ModelError::parse_error_at(error.to_string(), input, error.span().start),
        None => ModelError::parse_error("unknown parse failure", 1, 1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statement(input: &str) -> Statement {
        ChumskyMermaidParser::new().parse_statement(input).unwrap()
    }

    #[test]
    fn test_parse_simple_class() {
        match statement("class Animal") {
            Statement::Class(class) => {
                assert_eq!(class.name, "Animal");
                assert!(class.members.is_empty());
                assert!(!class.is_root());
            }
            other => panic!("Expected class statement, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_class_with_inline_body() {
        match statement("class Animal { +name: string }") {
            Statement::Class(class) => {
                assert_eq!(
                    class.members,
                    vec![ParsedMember::Attribute {
                        name: "name".to_string(),
                        attr_type: "string".to_string(),
                    }]
                );
            }
            other => panic!("Expected class statement, got {other:?}"),
        }
    }

    #[test]
    fn test_root_annotation_in_header_or_body() {
        match statement("class Root <<Root>>") {
            Statement::Class(class) => assert!(class.is_root()),
            other => panic!("Expected class statement, got {other:?}"),
        }
        match statement("class Root {\n    <<root>>\n    duration: int\n}") {
            Statement::Class(class) => {
                assert!(class.is_root());
                assert_eq!(class.members.len(), 2);
            }
            other => panic!("Expected class statement, got {other:?}"),
        }
    }

    #[test]
    fn test_member_forms() {
        assert_eq!(
            classify_member("-int count"),
            Ok(ParsedMember::Attribute {
                name: "count".to_string(),
                attr_type: "int".to_string(),
            })
        );
        assert_eq!(
            classify_member("+items: List~Item~ %% generic"),
            Ok(ParsedMember::Attribute {
                name: "items".to_string(),
                attr_type: "List~Item~".to_string(),
            })
        );
        assert_eq!(
            classify_member("+eat(food) bool"),
            Ok(ParsedMember::Method {
                name: "eat".to_string()
            })
        );
        assert!(classify_member("untyped").is_err());
        assert!(classify_member("name:").is_err());
    }

    #[test]
    fn test_parse_aggregation_with_cardinalities() {
        match statement("Root \"1\" o-- \"0..5\" Child : holds") {
            Statement::Relationship(rel) => {
                assert_eq!(rel.left, "Root");
                assert_eq!(rel.right, "Child");
                assert_eq!(rel.kind, RelationKind::Aggregation(Side::Left));
                assert_eq!(rel.left_cardinality.as_deref(), Some("1"));
                assert_eq!(rel.right_cardinality.as_deref(), Some("0..5"));
                assert_eq!(rel.label.as_deref(), Some("holds"));
            }
            other => panic!("Expected relationship, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_reversed_aggregation() {
        match statement("Wheel \"4\" --o Car") {
            Statement::Relationship(rel) => {
                assert_eq!(rel.kind, RelationKind::Aggregation(Side::Right));
                assert_eq!(rel.left_cardinality.as_deref(), Some("4"));
                assert_eq!(rel.right_cardinality, None);
            }
            other => panic!("Expected relationship, got {other:?}"),
        }
    }

    #[test]
    fn test_other_arrows() {
        let cases = [
            ("A <|-- B", RelationKind::Inheritance),
            ("A ..|> B", RelationKind::Realization),
            ("A *-- B", RelationKind::Composition),
            ("A --> B", RelationKind::Association),
            ("A ..> B", RelationKind::Dependency),
            ("A -- B", RelationKind::Link),
            ("A .. B", RelationKind::DashedLink),
        ];
        for (input, kind) in cases {
            match statement(input) {
                Statement::Relationship(rel) => assert_eq!(rel.kind, kind, "{input}"),
                other => panic!("Expected relationship for {input}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_standalone_annotation() {
        assert_eq!(
            statement("<<root>> Library"),
            Statement::Annotation {
                class: "Library".to_string(),
                annotation: "root".to_string(),
            }
        );
    }

    #[test]
    fn test_parse_document() {
        let input = "%% header comment\nclassDiagram\n    class Root <<root>> {\n        duration: int\n    }\n\n    %% parts\n    class Child {\n        +name: string\n    }\n    Root o-- \"0..5\" Child\n";
        let statements = ChumskyMermaidParser::new().parse_document(input).unwrap();
        assert_eq!(statements.len(), 3);
        assert!(matches!(&statements[2], Statement::Relationship(r) if r.right == "Child"));
    }

    #[test]
    fn test_parse_document_without_header() {
        let statements = ChumskyMermaidParser::new()
            .parse_document("A o-- B\r\nB o-- C")
            .unwrap();
        assert_eq!(statements.len(), 2);
    }

    #[test]
    fn test_error_reports_position() {
        let input = "classDiagram\n    class A {\n        x: int\n    }\n    A ?? B\n";
        match ChumskyMermaidParser::new().parse_document(input) {
            Err(ModelError::Parse { line, .. }) => assert_eq!(line, 5),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn test_untyped_attribute_is_an_error() {
        let input = "classDiagram\nclass A {\n    lonely\n}\n";
        match ChumskyMermaidParser::new().parse_document(input) {
            Err(ModelError::Parse { line, .. }) => assert_eq!(line, 3),
            other => panic!("Expected parse error, got {other:?}"),
        }
    }
}
