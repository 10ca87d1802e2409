//! Core error types for diagram processing
//!
//! Every failure in the load → index → materialize → serialize pipeline is
//! reported through [`ModelError`]. None of them are recoverable: a run either
//! produces both artifacts or nothing.

use std::path::PathBuf;
use thiserror::Error;

/// Core error types for diagram processing
#[derive(Error, Debug)]
pub enum ModelError {
    #[error("Parse error: {message} at line {line}, column {column}")]
    Parse {
        message: String,
        line: usize,
        column: usize,
    },

    #[error("Invalid XML: {source}")]
    Xml {
        #[from]
        source: quick_xml::DeError,
    },

    #[error("Root class not found: no class is flagged isRoot=\"true\"")]
    RootNotFound,

    #[error("Multiple root classes: '{first}' and '{second}' are both flagged isRoot=\"true\"")]
    MultipleRoots { first: String, second: String },

    #[error("Missing attribute '{attribute}' on <{element}> ({context})")]
    MissingAttribute {
        element: String,
        attribute: &'static str,
        context: String,
    },

    #[error("Unresolved reference: {endpoint} class '{name}' of aggregation {edge} is not defined")]
    UnresolvedReference {
        endpoint: &'static str,
        name: String,
        edge: String,
    },

    #[error("Duplicate class definition: '{name}'")]
    DuplicateClass { name: String },

    #[error("Cyclic containment: {}", path.join(" -> "))]
    CyclicContainment { path: Vec<String> },

    #[error("Invalid element name: '{name}' cannot be used as an XML tag")]
    InvalidElementName { name: String },

    #[error("Unknown input format: no detector recognised the diagram")]
    UnknownFormat,

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Invalid output file '{name}': {reason}")]
    InvalidOutputFile { name: String, reason: &'static str },

    #[error("Failed to write '{}': {source}", path.display())]
    Output {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },
}

impl ModelError {
    /// Create a new parse error
    pub fn parse_error(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::Parse {
            message: message.into(),
            line,
            column,
        }
    }

    /// Create a parse error from a byte offset into `input`
    ///
    /// Lines and columns are 1-based; columns count characters, not bytes.
    pub fn parse_error_at(message: impl Into<String>, input: &str, offset: usize) -> Self {
        let (line, column) = line_column(input, offset);
        Self::parse_error(message, line, column)
    }

    /// Create a new missing-attribute error
    pub fn missing_attribute(
        element: impl Into<String>,
        attribute: &'static str,
        context: impl Into<String>,
    ) -> Self {
        Self::MissingAttribute {
            element: element.into(),
            attribute,
            context: context.into(),
        }
    }
}

fn line_column(input: &str, offset: usize) -> (usize, usize) {
    let offset = offset.min(input.len());
    let before = input
        .char_indices()
        .take_while(|(i, _)| *i < offset)
        .map(|(_, c)| c);

    let mut line = 1;
    let mut column = 1;
    for c in before {
        if c == '\n' {
            line += 1;
            column = 1;
        } else {
            column += 1;
        }
    }
    (line, column)
}
