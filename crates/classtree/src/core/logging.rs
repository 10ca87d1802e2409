//! Logging infrastructure for diagram processing
//!
//! Structured logging uses the `tracing` crate. Every pipeline stage opens a
//! span (`detect_format`, `parse_xml`/`parse_mermaid`, `build_index`,
//! `materialize_tree`, `extract_schema`, `serialize_document`,
//! `write_artifacts`) and emits `debug!`/`trace!` events with counts as
//! structured fields.
//!
//! # Log Formats
//!
//! - `compact`: one line per event, no span timings
//! - `pretty`: multi-line events plus a timing line when each stage span closes
//! - `json`: one object per event with the current stage span, plus span timings
//!
//! # Environment Variables
//!
//! Consulted only when no explicit value is passed to [`init_logging`]:
//!
//! - `CLASSTREE_LOG_LEVEL`: level or filter directive (trace|debug|info|warn|error|off)
//! - `RUST_LOG`: standard `tracing-subscriber` filter, used when the above is unset
//! - `CLASSTREE_LOG_FORMAT`: log format (compact|pretty|json)
//!
//! # Filtering Logs
//!
//! ```bash
//! # Only the materializer at trace level
//! RUST_LOG="classtree::model::materializer=trace" classtree tree -i diagram.xml
//! ```

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{
    filter::ParseError,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::{SubscriberInitExt, TryInitError},
    EnvFilter, Layer, Registry,
};

const DEFAULT_LEVEL: &str = "warn";
const DEFAULT_FORMAT: LogFormat = LogFormat::Compact;

/// Log format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "compact" => Ok(LogFormat::Compact),
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            _ => Err(format!("Unknown log format: {}", s)),
        }
    }
}

impl LogFormat {
    /// Get all valid format names
    pub fn variants() -> &'static [&'static str] {
        &["compact", "pretty", "json"]
    }
}

/// Failure to install the global subscriber
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("{0}")]
    Format(String),

    #[error("Invalid log filter '{directive}': {source}")]
    Filter {
        directive: String,
        source: ParseError,
    },

    #[error("Logging already initialized: {0}")]
    AlreadyInitialized(#[from] TryInitError),
}

type StderrLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Initialize the tracing subscriber with the given filter and format
///
/// Missing values fall back to the environment (see the module docs), then to
/// `warn` and `compact`. Logs go to stderr so that documents written to stdout
/// stay clean.
pub fn init_logging(level: Option<&str>, format: Option<&str>) -> Result<(), LoggingError> {
    let directive = level
        .map(str::to_string)
        .or_else(|| std::env::var("CLASSTREE_LOG_LEVEL").ok())
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LEVEL.to_string());

    let format = match format
        .map(str::to_string)
        .or_else(|| std::env::var("CLASSTREE_LOG_FORMAT").ok())
    {
        Some(name) => LogFormat::from_str(&name).map_err(LoggingError::Format)?,
        None => DEFAULT_FORMAT,
    };

    let filter = EnvFilter::try_new(&directive).map_err(|source| LoggingError::Filter {
        directive: directive.clone(),
        source,
    })?;

    Registry::default()
        .with(stderr_layer(format).with_filter(filter))
        .try_init()?;
    Ok(())
}

fn stderr_layer(format: LogFormat) -> StderrLayer {
    let layer = fmt::layer().with_writer(std::io::stderr);
    match format {
        LogFormat::Compact => layer.compact().with_target(false).boxed(),
        LogFormat::Pretty => layer
            .pretty()
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
        LogFormat::Json => layer
            .json()
            .with_current_span(true)
            .with_span_list(false)
            .with_span_events(FmtSpan::CLOSE)
            .boxed(),
    }
}
