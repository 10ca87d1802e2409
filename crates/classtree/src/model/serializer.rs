//! Canonical XML rendering of instance trees
//!
//! Output rules:
//! - every element gets an explicit start and end tag, never `<a/>`
//! - a scalar field is one line: `<name>type</name>`
//! - a class node opens on its own line, its fields then its children follow
//!   one level deeper, and it closes on its own line at the opening indent
//! - indentation is a fixed number of spaces per level
//! - output ends with a newline
//!
//! ```text
//! <?xml version="1.0" encoding="utf-8"?>
//! <Root>
//!     <duration>int</duration>
//!     <Child>
//!         <name>string</name>
//!     </Child>
//! </Root>
//! ```

use quick_xml::escape::escape;
use std::io::Write;
use tracing::{debug, span, Level};

use super::{InstanceNode, ScalarField};
use crate::core::{ModelError, SerializeConfig};

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="utf-8"?>"#;

/// Renders [`InstanceNode`] trees to canonical XML text
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentSerializer {
    config: SerializeConfig,
}

impl DocumentSerializer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SerializeConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SerializeConfig {
        &self.config
    }

    /// Render the tree into a string
    pub fn render(&self, root: &InstanceNode) -> Result<String, ModelError> {
        let mut buffer = Vec::new();
        self.write(root, &mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }

    /// Render the tree into any writer
    pub fn write<W: Write>(&self, root: &InstanceNode, writer: &mut W) -> Result<(), ModelError> {
        let serialize_span = span!(Level::INFO, "serialize_document", root = %root.tag);
        let _enter = serialize_span.enter();

        validate_names(root)?;

        if self.config.xml_declaration {
            writeln!(writer, "{}", XML_DECLARATION)?;
        }
        self.write_node(root, 0, writer)?;
        writer.flush()?;

        debug!(nodes = root.node_count(), "Document serialized");
        Ok(())
    }

    fn write_node<W: Write>(
        &self,
        node: &InstanceNode,
        level: usize,
        writer: &mut W,
    ) -> Result<(), ModelError> {
        let pad = self.indent(level);
        writeln!(writer, "{pad}<{}>", node.tag)?;
        for field in &node.fields {
            self.write_field(field, level + 1, writer)?;
        }
        for child in &node.children {
            self.write_node(child, level + 1, writer)?;
        }
        writeln!(writer, "{pad}</{}>", node.tag)?;
        Ok(())
    }

    fn write_field<W: Write>(
        &self,
        field: &ScalarField,
        level: usize,
        writer: &mut W,
    ) -> Result<(), ModelError> {
        writeln!(
            writer,
            "{}<{name}>{}</{name}>",
            self.indent(level),
            escape(field.value.as_str()),
            name = field.name
        )?;
        Ok(())
    }

    fn indent(&self, level: usize) -> String {
        " ".repeat(self.config.indent * level)
    }
}

fn validate_names(node: &InstanceNode) -> Result<(), ModelError> {
    let names = std::iter::once(node.tag.as_str())
        .chain(node.fields.iter().map(|f| f.name.as_str()));
    for name in names {
        if !is_xml_name(name) {
            return Err(ModelError::InvalidElementName {
                name: name.to_string(),
            });
        }
    }
    node.children.iter().try_for_each(validate_names)
}

/// Conservative XML element name check: letter or `_` first, then letters,
/// digits, `_`, `-` or `.`. Namespace prefixes are not allowed.
pub fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    if !(first.is_alphabetic() || first == '_') {
        return false;
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
}
