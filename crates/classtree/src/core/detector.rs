//! Core detector trait for input format identification
//!
//! Each input format plugin provides a detector that recognises its
//! encoding from the raw text.

use super::InputFormat;

/// Core trait for input format detectors
///
/// # Example
/// ```
/// use classtree::core::Detector;
/// use classtree::plugins::xml::XmlDetector;
///
/// let detector = XmlDetector::new();
/// assert!(detector.detect("<Diagram><Class name=\"A\" isRoot=\"true\"/></Diagram>"));
/// ```
pub trait Detector: Send + Sync {
    /// Detect if the input is encoded in this format
    fn detect(&self, input: &str) -> bool {
        self.confidence(input) > 0.5
    }

    /// Get the confidence level of the detection (0.0 to 1.0)
    fn confidence(&self, input: &str) -> f64;

    /// The format this detector recognises
    fn format(&self) -> InputFormat;

    /// Key patterns that this detector looks for
    fn patterns(&self) -> Vec<&'static str>;
}
