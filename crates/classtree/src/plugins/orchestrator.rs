//! Pipeline orchestrator
//!
//! Runs input through every stage:
//! Detector → Parser → GraphIndex → RootResolver → TreeMaterializer →
//! DocumentSerializer, with SchemaExtractor reading the same index.

use tracing::{debug, info, span, trace, warn, Level};

use crate::core::{
    ClassDiagram, DiagramParser, Detector, InputFormat, ModelError, SchemaConfig, SerializeConfig,
};
use crate::model::{DocumentSerializer, GraphIndex, SchemaExtractor, TreeMaterializer};
use crate::output::Artifacts;
use crate::plugins::mermaid::{MermaidDetector, MermaidParser};
use crate::plugins::xml::{XmlDetector, XmlParser};

/// Coordinates detection, parsing and artifact generation
///
/// Detectors are consulted in registration order; the most confident one
/// wins and earlier registrations win ties.
pub struct Pipeline {
    detectors: Vec<Box<dyn Detector>>,
    parsers: Vec<Box<dyn DiagramParser>>,
    materializer: TreeMaterializer,
    serializer: DocumentSerializer,
    extractor: SchemaExtractor,
}

impl Pipeline {
    /// Create a pipeline with no plugins registered
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
            parsers: Vec::new(),
            materializer: TreeMaterializer::new(),
            serializer: DocumentSerializer::new(),
            extractor: SchemaExtractor::new(),
        }
    }

    /// Create a pipeline with the markup and Mermaid plugins registered
    pub fn with_default_plugins() -> Self {
        let mut pipeline = Self::new();
        pipeline.register_detector(Box::new(XmlDetector::new()));
        pipeline.register_detector(Box::new(MermaidDetector::new()));
        pipeline.register_parser(Box::new(XmlParser::new()));
        pipeline.register_parser(Box::new(MermaidParser::new()));
        pipeline
    }

    pub fn with_serialize_config(mut self, config: SerializeConfig) -> Self {
        self.serializer = DocumentSerializer::with_config(config);
        self
    }

    pub fn with_schema_config(mut self, config: SchemaConfig) -> Self {
        self.extractor = SchemaExtractor::with_config(config);
        self
    }

    /// Register a detector plugin
    pub fn register_detector(&mut self, detector: Box<dyn Detector>) {
        self.detectors.push(detector);
    }

    /// Register a parser plugin, replacing any parser for the same format
    pub fn register_parser(&mut self, parser: Box<dyn DiagramParser>) {
        self.parsers.retain(|p| p.format() != parser.format());
        self.parsers.push(parser);
    }

    pub fn detector_count(&self) -> usize {
        self.detectors.len()
    }

    /// Formats a parser is registered for
    pub fn supported_formats(&self) -> Vec<InputFormat> {
        self.parsers.iter().map(|p| p.format()).collect()
    }

    /// Detect the input format from raw text
    pub fn detect_format(&self, input: &str) -> Result<InputFormat, ModelError> {
        let detect_span = span!(Level::INFO, "detect_format", input_len = input.len());
        let _enter = detect_span.enter();

        let mut best: Option<(InputFormat, f64)> = None;
        for detector in &self.detectors {
            let confidence = detector.confidence(input);
            trace!(format = %detector.format(), confidence, "Checking detector");
            if !detector.detect(input) {
                continue;
            }
            let better = match best {
                Some((_, current)) => confidence > current,
                None => true,
            };
            if better {
                best = Some((detector.format(), confidence));
            }
        }

        match best {
            Some((format, confidence)) => {
                info!(%format, confidence, "Detected input format");
                Ok(format)
            }
            None => {
                warn!("No suitable detector found for input");
                Err(ModelError::UnknownFormat)
            }
        }
    }

    /// Parse input into a diagram, detecting the format when none is given
    pub fn load(
        &self,
        input: &str,
        format: Option<InputFormat>,
    ) -> Result<ClassDiagram, ModelError> {
        let format = match format {
            Some(format) => format,
            None => self.detect_format(input)?,
        };

        let parser = self
            .parsers
            .iter()
            .find(|p| p.format() == format)
            .ok_or(ModelError::UnknownFormat)?;

        let diagram = parser.parse_diagram(input)?;
        debug!(
            %format,
            classes = diagram.class_count(),
            edges = diagram.edge_count(),
            "Diagram loaded"
        );
        Ok(diagram)
    }

    /// Parse and index input
    pub fn index(&self, input: &str, format: Option<InputFormat>) -> Result<GraphIndex, ModelError> {
        GraphIndex::build(self.load(input, format)?)
    }

    /// Run the full pipeline with format detection
    pub fn process(&self, input: &str) -> Result<Artifacts, ModelError> {
        self.process_with_format(input, None)
    }

    /// Run the full pipeline; nothing is written, both documents are returned
    pub fn process_with_format(
        &self,
        input: &str,
        format: Option<InputFormat>,
    ) -> Result<Artifacts, ModelError> {
        let process_span = span!(Level::INFO, "process_diagram", input_len = input.len());
        let _enter = process_span.enter();

        info!("Starting generation pipeline");

        let index = self.index(input, format)?;
        self.generate(&index)
    }

    /// Produce both artifacts from an existing index
    pub fn generate(&self, index: &GraphIndex) -> Result<Artifacts, ModelError> {
        let tree = self.materializer.materialize_root(index)?;
        let instance_document = self.serializer.render(&tree)?;

        let descriptors = self.extractor.extract(index);
        let schema_document = self.extractor.to_json(&descriptors)?;

        info!(
            nodes = tree.node_count(),
            descriptors = descriptors.len(),
            "Pipeline completed successfully"
        );
        Ok(Artifacts {
            tree,
            descriptors,
            instance_document,
            schema_document,
        })
    }

    /// Render only the instance document
    pub fn render_tree(&self, input: &str, format: Option<InputFormat>) -> Result<String, ModelError> {
        let index = self.index(input, format)?;
        let tree = self.materializer.materialize_root(&index)?;
        self.serializer.render(&tree)
    }

    /// Render only the schema document
    ///
    /// Extraction does not need a root, so a diagram without one still
    /// yields descriptors here.
    pub fn render_schema(
        &self,
        input: &str,
        format: Option<InputFormat>,
    ) -> Result<String, ModelError> {
        let index = self.index(input, format)?;
        self.extractor.extract_json(&index)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::with_default_plugins()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XML: &str = r#"<Diagram>
    <Class name="Root" isRoot="true"><Attribute name="duration" type="int"/></Class>
    <Class name="Child" isRoot="false"><Attribute name="name" type="string"/></Class>
    <Aggregation source="Child" target="Root" sourceMultiplicity="0..5"/>
</Diagram>"#;

    const MERMAID: &str = "classDiagram\n    class Root <<root>> {\n        duration: int\n    }\n    class Child {\n        name: string\n    }\n    Root o-- \"0..5\" Child\n";

    #[test]
    fn test_empty_pipeline() {
        let pipeline = Pipeline::new();
        assert_eq!(pipeline.detector_count(), 0);
        assert!(matches!(
            pipeline.detect_format(XML),
            Err(ModelError::UnknownFormat)
        ));
        assert!(matches!(
            pipeline.load(XML, Some(InputFormat::Xml)),
            Err(ModelError::UnknownFormat)
        ));
    }

    #[test]
    fn test_default_plugins() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.detector_count(), 2);
        assert_eq!(
            pipeline.supported_formats(),
            vec![InputFormat::Xml, InputFormat::Mermaid]
        );
    }

    #[test]
    fn test_register_parser_replaces_same_format() {
        let mut pipeline = Pipeline::with_default_plugins();
        pipeline.register_parser(Box::new(XmlParser::new()));
        assert_eq!(pipeline.supported_formats().len(), 2);
    }

    #[test]
    fn test_detect_format() {
        let pipeline = Pipeline::with_default_plugins();
        assert_eq!(pipeline.detect_format(XML).unwrap(), InputFormat::Xml);
        assert_eq!(pipeline.detect_format(MERMAID).unwrap(), InputFormat::Mermaid);
        assert!(matches!(
            pipeline.detect_format("hello world"),
            Err(ModelError::UnknownFormat)
        ));
    }

    #[test]
    fn test_both_formats_produce_identical_artifacts() {
        let pipeline = Pipeline::with_default_plugins();
        let from_xml = pipeline.process(XML).unwrap();
        let from_mermaid = pipeline.process(MERMAID).unwrap();

        assert_eq!(from_xml.instance_document, from_mermaid.instance_document);
        assert_eq!(from_xml.schema_document, from_mermaid.schema_document);
        assert_eq!(from_xml.tree.node_count(), 2);
    }

    #[test]
    fn test_missing_root_fails_before_rendering() {
        let input = r#"<Diagram><Class name="A" isRoot="false"/></Diagram>"#;
        let err = Pipeline::with_default_plugins().process(input).unwrap_err();
        assert!(matches!(err, ModelError::RootNotFound));
    }

    #[test]
    fn test_schema_without_root() {
        let input = r#"<Diagram><Class name="A" isRoot="false"/></Diagram>"#;
        let schema = Pipeline::with_default_plugins()
            .render_schema(input, None)
            .unwrap();
        assert!(schema.contains("\"name\": \"A\""));
    }

    #[test]
    fn test_configs_apply() {
        let pipeline = Pipeline::with_default_plugins()
            .with_serialize_config(SerializeConfig::new(2, false))
            .with_schema_config(SchemaConfig { indent: 2 });
        let artifacts = pipeline.process(XML).unwrap();
        assert!(artifacts.instance_document.starts_with("<Root>\n  <duration>"));
        assert!(artifacts.schema_document.starts_with("[\n  {"));
    }

    #[test]
    fn test_forced_format_skips_detection() {
        let tree = Pipeline::with_default_plugins()
            .render_tree("Root o-- Child\n<<root>> Root\n", Some(InputFormat::Mermaid))
            .unwrap();
        assert!(tree.contains("<Child>\n    </Child>"));
    }
}
