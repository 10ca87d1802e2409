//! Edge case tests for the materialization engine

use classtree::model::{GraphIndex, Multiplicity, SchemaExtractor, TreeMaterializer};
use classtree::prelude::*;

fn index(diagram: ClassDiagram) -> GraphIndex {
    GraphIndex::build(diagram).unwrap()
}

#[test]
fn test_root_only() {
    let index = index(ClassDiagram::new().with_class(ClassDef::root("Solo")));
    let artifacts = Pipeline::with_default_plugins().generate(&index).unwrap();

    assert_eq!(
        artifacts.instance_document,
        "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n<Solo>\n</Solo>\n"
    );
    assert_eq!(
        artifacts.schema_document,
        "[\n    {\n        \"name\": \"Solo\",\n        \"isRoot\": true,\n        \"parameters\": []\n    }\n]\n"
    );
}

#[test]
fn test_shared_child_materialized_per_path() {
    let index = index(
        ClassDiagram::new()
            .with_class(ClassDef::root("Site"))
            .with_class(ClassDef::new("Office"))
            .with_class(ClassDef::new("Lab"))
            .with_class(ClassDef::new("Printer").with_attribute("model", "string"))
            .with_edge("Office", "Site", "1..*")
            .with_edge("Lab", "Site", "0..*")
            .with_edge("Printer", "Office", "0..2")
            .with_edge("Printer", "Lab", "1"),
    );

    let tree = TreeMaterializer::new().materialize_root(&index).unwrap();
    assert_eq!(tree.node_count(), 5);
    assert!(tree.child("Office").unwrap().child("Printer").is_some());
    assert!(tree.child("Lab").unwrap().child("Printer").is_some());

    // first edge with Printer as source supplies its bounds
    let printer = &SchemaExtractor::new().extract(&index)[3];
    assert_eq!(printer.multiplicity(), Some(Multiplicity::new("0", "2")));
}

#[test]
fn test_repeated_edge_yields_repeated_child() {
    let index = index(
        ClassDiagram::new()
            .with_class(ClassDef::root("Pair"))
            .with_class(ClassDef::new("Item"))
            .with_edge("Item", "Pair", "1")
            .with_edge("Item", "Pair", "1"),
    );

    let tree = TreeMaterializer::new().materialize_root(&index).unwrap();
    assert_eq!(tree.children.len(), 2);

    let root = &SchemaExtractor::new().extract(&index)[0];
    assert_eq!(root.parameters.len(), 2);
}

#[test]
fn test_unreachable_classes_still_described() {
    let index = index(
        ClassDiagram::new()
            .with_class(ClassDef::root("Root"))
            .with_class(ClassDef::new("Orphan").with_attribute("x", "int")),
    );

    let artifacts = Pipeline::with_default_plugins().generate(&index).unwrap();
    assert_eq!(artifacts.tree.node_count(), 1);
    assert_eq!(artifacts.descriptors.len(), 2);
    assert_eq!(artifacts.descriptors[1].name, "Orphan");
    assert!(artifacts.descriptors[1].min.is_none());
}

#[test]
fn test_multiplicity_strings_are_opaque() {
    assert_eq!(Multiplicity::parse("0..1"), Multiplicity::new("0", "1"));
    assert_eq!(Multiplicity::parse("1..*"), Multiplicity::new("1", "*"));
    assert_eq!(Multiplicity::parse("1"), Multiplicity::new("1", "1"));
    assert_eq!(Multiplicity::parse("*"), Multiplicity::new("1", "1"));
    assert_eq!(Multiplicity::parse("0..1..2"), Multiplicity::new("0", "1..2"));
    assert_eq!(Multiplicity::parse(" 2 .. n "), Multiplicity::new(" 2 ", " n "));
    assert_eq!(Multiplicity::parse(".."), Multiplicity::new("", ""));
}

#[test]
fn test_attribute_types_are_copied_verbatim() {
    let index = index(
        ClassDiagram::new().with_class(
            ClassDef::root("Root")
                .with_attribute("tags", "List<String>")
                .with_attribute("ratio", "float & double"),
        ),
    );

    let artifacts = Pipeline::with_default_plugins().generate(&index).unwrap();
    assert!(artifacts
        .instance_document
        .contains("<tags>List&lt;String&gt;</tags>"));
    assert_eq!(artifacts.descriptors[0].parameters[0].param_type, "List<String>");
    assert!(artifacts.schema_document.contains("\"type\": \"float & double\""));
}

#[test]
fn test_xml_root_flag_variants() {
    let input = r#"<Diagram>
        <Class name="A" isRoot=" TRUE "/>
        <Class name="B" isRoot="1"/>
    </Diagram>"#;
    let artifacts = classtree::process(input).unwrap();
    assert_eq!(artifacts.tree.tag, "A");
    assert!(!artifacts.descriptors[1].is_root);
}

#[test]
fn test_empty_mermaid_diagram() {
    let diagram = classtree::parse("classDiagram\n").unwrap();
    assert!(diagram.is_empty());
}

#[test]
fn test_windows_line_endings() {
    let input = "classDiagram\r\n    class Root <<root>> {\r\n        id: int\r\n    }\r\n    Root o-- \"0..1\" Leaf\r\n";
    let xml = classtree::materialize(input).unwrap();
    assert!(xml.contains("<id>int</id>"));
    assert!(xml.contains("<Leaf>"));
}
