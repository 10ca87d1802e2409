//! Input format plugins
//!
//! Each plugin implements the core [`Detector`](crate::core::Detector) and
//! [`DiagramParser`](crate::core::DiagramParser) traits for one encoding.
//! The [`Pipeline`] wires them to the materialization engine.

pub mod mermaid;
pub mod orchestrator;
pub mod xml;

pub use mermaid::{MermaidDetector, MermaidParser};
pub use orchestrator::*;
pub use xml::{XmlDetector, XmlParser};
