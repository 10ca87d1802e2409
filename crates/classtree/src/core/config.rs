//! Output configuration
//!
//! Formatting and destinations are passed explicitly into the serializer,
//! the schema extractor and the artifact writer.

use std::path::{Component, Path, PathBuf};

use super::ModelError;

/// Default directory artifacts are written to
pub const DEFAULT_OUTPUT_DIR: &str = "out";
/// Default file name of the instance document
pub const DEFAULT_INSTANCE_FILE: &str = "config.xml";
/// Default file name of the schema descriptor collection
pub const DEFAULT_SCHEMA_FILE: &str = "meta.json";

const DEFAULT_INDENT: usize = 4;

/// Formatting of the instance document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerializeConfig {
    /// Spaces per nesting level
    pub indent: usize,
    /// Emit the `<?xml ...?>` declaration line
    pub xml_declaration: bool,
}

impl SerializeConfig {
    pub fn new(indent: usize, xml_declaration: bool) -> Self {
        Self {
            indent,
            xml_declaration,
        }
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    pub fn without_declaration(mut self) -> Self {
        self.xml_declaration = false;
        self
    }
}

impl Default for SerializeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT, true)
    }
}

/// Formatting of the schema descriptor collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchemaConfig {
    /// Spaces per nesting level of the JSON document
    pub indent: usize,
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self {
            indent: DEFAULT_INDENT,
        }
    }
}

/// Where the artifacts of a run are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfig {
    pub dir: PathBuf,
    pub instance_file: String,
    pub schema_file: String,
}

impl OutputConfig {
    /// Write both artifacts into `dir` under their default file names
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            instance_file: DEFAULT_INSTANCE_FILE.to_string(),
            schema_file: DEFAULT_SCHEMA_FILE.to_string(),
        }
    }

    pub fn with_instance_file(mut self, name: impl Into<String>) -> Self {
        self.instance_file = name.into();
        self
    }

    pub fn with_schema_file(mut self, name: impl Into<String>) -> Self {
        self.schema_file = name.into();
        self
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn instance_path(&self) -> PathBuf {
        self.dir.join(&self.instance_file)
    }

    pub fn schema_path(&self) -> PathBuf {
        self.dir.join(&self.schema_file)
    }

    /// Check that both file names are distinct plain names inside `dir`
    pub fn validate(&self) -> Result<(), ModelError> {
        for name in [&self.instance_file, &self.schema_file] {
            if !is_plain_file_name(name) {
                return Err(ModelError::InvalidOutputFile {
                    name: name.clone(),
                    reason: "expected a file name without directory components",
                });
            }
        }
        if self.instance_file == self.schema_file {
            return Err(ModelError::InvalidOutputFile {
                name: self.schema_file.clone(),
                reason: "instance and schema documents cannot share a file",
            });
        }
        Ok(())
    }
}

fn is_plain_file_name(name: &str) -> bool {
    if name.ends_with(std::path::is_separator) {
        return false;
    }
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}
