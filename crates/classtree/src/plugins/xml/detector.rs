//! Markup diagram detector

use crate::core::{Detector, InputFormat};

/// Detector for the markup diagram export
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlDetector;

impl XmlDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for XmlDetector {
    fn confidence(&self, input: &str) -> f64 {
        let trimmed = input.trim_start_matches('\u{feff}').trim_start();

        if trimmed.starts_with("<?xml") {
            return 1.0;
        }
        if !trimmed.starts_with('<') || trimmed.starts_with("<<") {
            return 0.0;
        }
        if input.contains("<Class") || input.contains("<Aggregation") {
            return 0.9;
        }

        0.6
    }

    fn format(&self) -> InputFormat {
        InputFormat::Xml
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["<?xml", "<Class", "<Aggregation"]
    }
}
