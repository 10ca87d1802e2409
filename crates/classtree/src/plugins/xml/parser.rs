//! Markup diagram parser
//!
//! Reads the element/attribute export:
//!
//! ```xml
//! <Diagram>
//!     <Class name="Root" isRoot="true">
//!         <Attribute name="duration" type="int"/>
//!     </Class>
//!     <Aggregation source="Child" target="Root" sourceMultiplicity="0..5"/>
//! </Diagram>
//! ```
//!
//! `Class` and `Aggregation` elements are direct children of the document
//! element and may be interleaved. Unknown elements and attributes are
//! ignored. A missing required attribute is reported as
//! [`ModelError::MissingAttribute`] rather than defaulted.

use serde::Deserialize;
use tracing::{debug, span, trace, Level};

use crate::core::{
    parse_root_flag, AggregationEdge, Attribute, ClassDef, ClassDiagram, DiagramParser,
    InputFormat, ModelError,
};

#[derive(Debug, Deserialize)]
struct RawDiagram {
    #[serde(rename = "Class", default)]
    classes: Vec<RawClass>,
    #[serde(rename = "Aggregation", default)]
    aggregations: Vec<RawAggregation>,
}

#[derive(Debug, Deserialize)]
struct RawClass {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@isRoot", default)]
    is_root: Option<String>,
    #[serde(rename = "Attribute", default)]
    attributes: Vec<RawAttribute>,
}

#[derive(Debug, Deserialize)]
struct RawAttribute {
    #[serde(rename = "@name", default)]
    name: Option<String>,
    #[serde(rename = "@type", default)]
    attr_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawAggregation {
    #[serde(rename = "@source", default)]
    source: Option<String>,
    #[serde(rename = "@target", default)]
    target: Option<String>,
    #[serde(rename = "@sourceMultiplicity", default)]
    source_multiplicity: Option<String>,
}

/// Parser for the markup diagram export
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlParser;

impl XmlParser {
    pub fn new() -> Self {
        Self
    }

    fn convert_class(position: usize, raw: RawClass) -> Result<ClassDef, ModelError> {
        let name = raw.name.ok_or_else(|| {
            ModelError::missing_attribute("Class", "name", format!("class #{}", position + 1))
        })?;
        let is_root = raw.is_root.ok_or_else(|| {
            ModelError::missing_attribute("Class", "isRoot", format!("class '{}'", name))
        })?;

        let mut class = ClassDef::new(&name);
        class.is_root = parse_root_flag(&is_root);

        for (index, attr) in raw.attributes.into_iter().enumerate() {
            let context = || format!("attribute #{} of class '{}'", index + 1, name);
            let attr_name = attr
                .name
                .ok_or_else(|| ModelError::missing_attribute("Attribute", "name", context()))?;
            let attr_type = attr
                .attr_type
                .ok_or_else(|| ModelError::missing_attribute("Attribute", "type", context()))?;
            class.add_attribute(Attribute::new(attr_name, attr_type));
        }

        trace!(
            class = %class.name,
            is_root = class.is_root,
            attributes = class.attributes.len(),
            "Parsed class"
        );
        Ok(class)
    }

    fn convert_aggregation(
        position: usize,
        raw: RawAggregation,
    ) -> Result<AggregationEdge, ModelError> {
        let describe = |raw: &RawAggregation| {
            format!(
                "aggregation #{} (source={}, target={})",
                position + 1,
                raw.source.as_deref().unwrap_or("?"),
                raw.target.as_deref().unwrap_or("?")
            )
        };

        match (&raw.source, &raw.target, &raw.source_multiplicity) {
            (Some(source), Some(target), Some(multiplicity)) => {
                Ok(AggregationEdge::new(source, target, multiplicity))
            }
            (None, _, _) => Err(ModelError::missing_attribute(
                "Aggregation",
                "source",
                describe(&raw),
            )),
            (_, None, _) => Err(ModelError::missing_attribute(
                "Aggregation",
                "target",
                describe(&raw),
            )),
            (_, _, None) => Err(ModelError::missing_attribute(
                "Aggregation",
                "sourceMultiplicity",
                describe(&raw),
            )),
        }
    }
}

impl DiagramParser for XmlParser {
    fn parse(&self, input: &str, diagram: &mut ClassDiagram) -> Result<(), ModelError> {
        let parse_span = span!(Level::INFO, "parse_xml", input_len = input.len());
        let _enter = parse_span.enter();

        let raw: RawDiagram = quick_xml::de::from_str(input)?;

        for (position, class) in raw.classes.into_iter().enumerate() {
            diagram.add_class(Self::convert_class(position, class)?);
        }
        for (position, aggregation) in raw.aggregations.into_iter().enumerate() {
            diagram.add_edge(Self::convert_aggregation(position, aggregation)?);
        }

        debug!(
            classes = diagram.class_count(),
            edges = diagram.edge_count(),
            "XML parsing completed"
        );
        Ok(())
    }

    fn format(&self) -> InputFormat {
        InputFormat::Xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EXAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Diagram>
    <Class name="Root" isRoot="true" documentation="top level">
        <Attribute name="duration" type="int"/>
    </Class>
    <Aggregation source="Child" target="Root" sourceMultiplicity="0..5" targetMultiplicity="1"/>
    <Class name="Child" isRoot="false">
        <Attribute name="name" type="string"/>
        <Attribute name="size" type="float"/>
    </Class>
</Diagram>"#;

    #[test]
    fn test_parse_example() {
        let diagram = XmlParser::new().parse_diagram(EXAMPLE).unwrap();

        assert_eq!(diagram.class_count(), 2);
        let root = &diagram.classes()[0];
        assert_eq!(root.name, "Root");
        assert!(root.is_root);
        assert_eq!(root.attributes, vec![Attribute::new("duration", "int")]);

        let child = &diagram.classes()[1];
        assert!(!child.is_root);
        assert_eq!(child.attributes[1], Attribute::new("size", "float"));

        assert_eq!(
            diagram.edges(),
            &[AggregationEdge::new("Child", "Root", "0..5")]
        );
    }

    #[test]
    fn test_root_flag_is_case_insensitive() {
        let input = r#"<Diagram><Class name="A" isRoot="True"/><Class name="B" isRoot="no"/></Diagram>"#;
        let diagram = XmlParser::new().parse_diagram(input).unwrap();
        assert!(diagram.classes()[0].is_root);
        assert!(!diagram.classes()[1].is_root);
    }

    #[test]
    fn test_empty_document() {
        let diagram = XmlParser::new().parse_diagram("<Diagram></Diagram>").unwrap();
        assert!(diagram.is_empty());
    }

    #[test]
    fn test_missing_is_root() {
        let input = r#"<Diagram><Class name="Orphan"/></Diagram>"#;
        match XmlParser::new().parse_diagram(input) {
            Err(ModelError::MissingAttribute {
                element,
                attribute,
                context,
            }) => {
                assert_eq!(element, "Class");
                assert_eq!(attribute, "isRoot");
                assert!(context.contains("Orphan"));
            }
            other => panic!("Expected missing attribute error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_attribute_type() {
        let input = r#"<Diagram><Class name="A" isRoot="true"><Attribute name="x"/></Class></Diagram>"#;
        let err = XmlParser::new().parse_diagram(input).unwrap_err();
        assert!(matches!(
            err,
            ModelError::MissingAttribute { attribute: "type", .. }
        ));
    }

    #[test]
    fn test_missing_multiplicity() {
        let input = r#"<Diagram>
            <Class name="A" isRoot="true"/>
            <Class name="B" isRoot="false"/>
            <Aggregation source="B" target="A"/>
        </Diagram>"#;
        match XmlParser::new().parse_diagram(input) {
            Err(ModelError::MissingAttribute {
                attribute, context, ..
            }) => {
                assert_eq!(attribute, "sourceMultiplicity");
                assert!(context.contains("source=B"));
            }
            other => panic!("Expected missing attribute error, got {other:?}"),
        }
    }

    #[test]
    fn test_malformed_xml() {
        let err = XmlParser::new()
            .parse_diagram("<Diagram><Class name=\"A\" isRoot=\"true\"></Diagram>")
            .unwrap_err();
        assert!(matches!(err, ModelError::Xml { .. }));
    }
}
