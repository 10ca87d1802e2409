//! Markup diagram plugin
//!
//! The historical export format: `<Class>`, `<Attribute>` and
//! `<Aggregation>` elements carrying their data in attributes.

mod detector;
mod parser;

pub use detector::XmlDetector;
pub use parser::XmlParser;
