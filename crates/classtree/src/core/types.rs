//! Core type definitions for diagram processing
//!
//! The input model: classes with ordered attributes, aggregation edges
//! between them, and the [`ClassDiagram`] store that parsers fill in
//! declaration order.

use std::fmt;
use std::str::FromStr;

/// A typed attribute of a class: `name: type`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Attribute {
    pub name: String,
    pub attr_type: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, attr_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attr_type: attr_type.into(),
        }
    }
}

/// A class definition. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassDef {
    pub name: String,
    pub is_root: bool,
    pub attributes: Vec<Attribute>,
}

impl ClassDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            is_root: false,
            attributes: Vec::new(),
        }
    }

    /// Create the class flagged as diagram root
    pub fn root(name: impl Into<String>) -> Self {
        Self {
            is_root: true,
            ..Self::new(name)
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, attr_type: impl Into<String>) -> Self {
        self.attributes.push(Attribute::new(name, attr_type));
        self
    }

    pub fn add_attribute(&mut self, attribute: Attribute) {
        self.attributes.push(attribute);
    }
}

/// Interpret the textual `isRoot` flag: only a case-insensitive `true` counts
pub fn parse_root_flag(value: &str) -> bool {
    value.trim().eq_ignore_ascii_case("true")
}

/// Directed containment edge: one `target` instance holds `source` instances
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationEdge {
    pub source: String,
    pub target: String,
    pub source_multiplicity: String,
}

impl AggregationEdge {
    pub fn new(
        source: impl Into<String>,
        target: impl Into<String>,
        source_multiplicity: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_multiplicity: source_multiplicity.into(),
        }
    }
}

impl fmt::Display for AggregationEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} o-- \"{}\" {}",
            self.target, self.source_multiplicity, self.source
        )
    }
}

/// Class diagram store, filled by parsers in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassDiagram {
    classes: Vec<ClassDef>,
    edges: Vec<AggregationEdge>,
}

impl ClassDiagram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_class(&mut self, class: ClassDef) {
        self.classes.push(class);
    }

    pub fn add_edge(&mut self, edge: AggregationEdge) {
        self.edges.push(edge);
    }

    pub fn with_class(mut self, class: ClassDef) -> Self {
        self.add_class(class);
        self
    }

    pub fn with_edge(
        mut self,
        source: impl Into<String>,
        target: impl Into<String>,
        source_multiplicity: impl Into<String>,
    ) -> Self {
        self.add_edge(AggregationEdge::new(source, target, source_multiplicity));
        self
    }

    pub fn classes(&self) -> &[ClassDef] {
        &self.classes
    }

    pub fn get_class(&self, name: &str) -> Option<&ClassDef> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn get_class_mut(&mut self, name: &str) -> Option<&mut ClassDef> {
        self.classes.iter_mut().find(|c| c.name == name)
    }

    /// Get or create a class by name; new classes are appended
    pub fn get_or_create_class(&mut self, name: &str) -> &mut ClassDef {
        let position = match self.classes.iter().position(|c| c.name == name) {
            Some(position) => position,
            None => {
                self.classes.push(ClassDef::new(name));
                self.classes.len() - 1
            }
        };
        &mut self.classes[position]
    }

    pub fn edges(&self) -> &[AggregationEdge] {
        &self.edges
    }

    pub fn class_count(&self) -> usize {
        self.classes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty() && self.edges.is_empty()
    }

    pub fn clear(&mut self) {
        self.classes.clear();
        self.edges.clear();
    }

    pub(crate) fn into_parts(self) -> (Vec<ClassDef>, Vec<AggregationEdge>) {
        (self.classes, self.edges)
    }
}

/// Concrete encodings of the input model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputFormat {
    /// Markup export with `<Class>` and `<Aggregation>` elements
    Xml,
    /// Mermaid-style `classDiagram` text
    Mermaid,
}

impl InputFormat {
    pub fn all() -> &'static [InputFormat] {
        &[InputFormat::Xml, InputFormat::Mermaid]
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputFormat::Xml => write!(f, "xml"),
            InputFormat::Mermaid => write!(f, "mermaid"),
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "xml" => Ok(InputFormat::Xml),
            "mermaid" | "mmd" => Ok(InputFormat::Mermaid),
            _ => Err(format!("Unknown input format: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_flag_parsing() {
        assert!(parse_root_flag("true"));
        assert!(parse_root_flag("TRUE"));
        assert!(parse_root_flag(" True "));
        assert!(!parse_root_flag("false"));
        assert!(!parse_root_flag("yes"));
        assert!(!parse_root_flag(""));
    }

    #[test]
    fn test_class_builders() {
        let class = ClassDef::root("Root")
            .with_attribute("duration", "int")
            .with_attribute("name", "string");
        assert!(class.is_root);
        assert_eq!(class.attributes.len(), 2);
        assert_eq!(class.attributes[0], Attribute::new("duration", "int"));
        assert!(!ClassDef::new("Leaf").is_root);
    }

    #[test]
    fn test_diagram_keeps_declaration_order() {
        let diagram = ClassDiagram::new()
            .with_class(ClassDef::new("B"))
            .with_class(ClassDef::new("A"))
            .with_edge("A", "B", "0..*")
            .with_edge("B", "A", "1");

        let names: Vec<_> = diagram.classes().iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
        assert_eq!(diagram.edges()[0].source, "A");
        assert_eq!(diagram.edge_count(), 2);
    }

    #[test]
    fn test_get_or_create_class() {
        let mut diagram = ClassDiagram::new().with_class(ClassDef::new("A"));

        diagram.get_or_create_class("A").is_root = true;
        assert_eq!(diagram.class_count(), 1);
        assert!(diagram.get_class("A").unwrap().is_root);

        diagram.get_or_create_class("B");
        assert_eq!(diagram.class_count(), 2);
        assert_eq!(diagram.classes()[1].name, "B");
    }

    #[test]
    fn test_clear() {
        let mut diagram = ClassDiagram::new().with_class(ClassDef::new("A"));
        assert!(!diagram.is_empty());
        diagram.clear();
        assert!(diagram.is_empty());
    }

    #[test]
    fn test_edge_display() {
        let edge = AggregationEdge::new("Child", "Root", "0..5");
        assert_eq!(edge.to_string(), "Root o-- \"0..5\" Child");
    }

    #[test]
    fn test_input_format_round_trip_names() {
        for format in InputFormat::all() {
            assert_eq!(InputFormat::from_str(&format.to_string()), Ok(*format));
        }
        assert_eq!(InputFormat::from_str("mmd"), Ok(InputFormat::Mermaid));
        assert!(InputFormat::from_str("yaml").is_err());
    }
}
