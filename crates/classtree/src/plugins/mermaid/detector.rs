//! Mermaid-style class diagram detector

use crate::core::{Detector, InputFormat};

/// Detector for `classDiagram` text
#[derive(Debug, Clone, Copy, Default)]
pub struct MermaidDetector;

impl MermaidDetector {
    pub fn new() -> Self {
        Self
    }
}

impl Detector for MermaidDetector {
    fn confidence(&self, input: &str) -> f64 {
        let trimmed = input.trim_start();

        if trimmed.starts_with('<') && !trimmed.starts_with("<<") {
            return 0.0;
        }

        let starts_with_header = trimmed
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with("%%"))
            .is_some_and(|line| line.to_lowercase().starts_with("classdiagram"));
        if starts_with_header {
            return 1.0;
        }

        // Class with braces = high confidence
        if input.contains("class ") && input.contains('{') {
            return 0.8;
        }

        if input.contains("o--") || input.contains("--o") {
            return 0.7;
        }

        0.0
    }

    fn format(&self) -> InputFormat {
        InputFormat::Mermaid
    }

    fn patterns(&self) -> Vec<&'static str> {
        vec!["classDiagram", "class ", "o--", "--o"]
    }
}
