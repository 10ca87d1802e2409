//! Core abstractions for diagram processing
//!
//! The input model, the detector and parser traits implemented by each input
//! format, configuration, errors and logging.

pub mod chumsky_utils;
mod config;
mod detector;
mod error;
pub mod logging;
mod parser;
mod types;

pub use config::*;
pub use detector::*;
pub use error::*;
pub use logging::*;
pub use parser::*;
pub use types::*;
