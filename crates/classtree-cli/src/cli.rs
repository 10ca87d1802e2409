//! Command-line interface for the classtree utility
//!
//! Reads a class diagram and writes the instance document and schema
//! descriptors, or either one alone.

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::fs;
use std::io::{self, Read, Write};
use std::path::PathBuf;
use tracing::{debug, info};

use classtree::core::logging::init_logging;
use classtree::core::{
    InputFormat, OutputConfig, SchemaConfig, SerializeConfig, DEFAULT_INSTANCE_FILE,
    DEFAULT_OUTPUT_DIR, DEFAULT_SCHEMA_FILE,
};
use classtree::plugins::Pipeline;

/// Classtree - Materialize class diagrams into configuration skeletons
#[derive(Parser)]
#[command(name = "classtree")]
#[command(about = "Turn UML class diagrams into XML instance documents and JSON schema descriptors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = env!("CARGO_PKG_AUTHORS"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Set log level (trace|debug|info|warn|error|off)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,

    /// Set log format (compact|pretty|json)
    #[arg(long, value_enum, default_value_t = LogFormat::Compact)]
    pub log_format: LogFormat,
}

/// Log level options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

/// Log format options
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq)]
pub enum LogFormat {
    Compact,
    Pretty,
    Json,
}

impl LogFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogFormat::Compact => "compact",
            LogFormat::Pretty => "pretty",
            LogFormat::Json => "json",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write the instance document and the schema descriptors
    Generate {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory to write both artifacts into
        #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR)]
        out_dir: PathBuf,

        /// File name of the instance document
        #[arg(long, default_value = DEFAULT_INSTANCE_FILE)]
        instance_file: String,

        /// File name of the schema descriptors
        #[arg(long, default_value = DEFAULT_SCHEMA_FILE)]
        schema_file: String,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Print the instance document
    Tree {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Print the schema descriptors
    Schema {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (use - for stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        options: RenderOptions,
    },

    /// Detect the input format
    Detect {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },

    /// Check that a diagram materializes without writing anything
    Validate {
        /// Input diagram file (use - for stdin)
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Input format
        #[arg(short, long, value_enum, default_value_t = FormatChoice::Auto)]
        format: FormatChoice,
    },

    /// Show supported input formats
    Formats {
        /// Show in JSON format
        #[arg(long)]
        json: bool,
    },
}

/// Options shared by the rendering commands
#[derive(clap::Args, Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOptions {
    /// Input format
    #[arg(short, long, value_enum, default_value_t = FormatChoice::Auto)]
    pub format: FormatChoice,

    /// Spaces per indentation level
    #[arg(long, default_value_t = 4)]
    pub indent: usize,

    /// Omit the XML declaration from the instance document
    #[arg(long)]
    pub no_declaration: bool,
}

impl RenderOptions {
    fn pipeline(&self) -> Pipeline {
        let serialize = SerializeConfig::new(self.indent, !self.no_declaration);
        Pipeline::with_default_plugins()
            .with_serialize_config(serialize)
            .with_schema_config(SchemaConfig {
                indent: self.indent,
            })
    }
}

/// Input format selection
#[derive(Copy, Clone, Debug, ValueEnum, PartialEq, Eq, Default)]
pub enum FormatChoice {
    /// Detect from the input text
    #[default]
    Auto,
    /// `<Class>`/`<Aggregation>` markup export
    Xml,
    /// Mermaid-style `classDiagram` text
    Mermaid,
}

impl FormatChoice {
    pub fn input_format(self) -> Option<InputFormat> {
        match self {
            FormatChoice::Auto => None,
            FormatChoice::Xml => Some(InputFormat::Xml),
            FormatChoice::Mermaid => Some(InputFormat::Mermaid),
        }
    }
}

/// Main CLI application
pub struct ClasstreeApp {
    pipeline: Pipeline,
}

impl ClasstreeApp {
    /// Create a new application instance with default settings
    pub fn new() -> Self {
        Self {
            pipeline: Pipeline::with_default_plugins(),
        }
    }

    /// Run the application with the given CLI arguments
    pub fn run(&self, cli: Cli) -> Result<()> {
        // Environment variables take precedence over flags
        let log_level_str = std::env::var("CLASSTREE_LOG_LEVEL")
            .ok()
            .or_else(|| std::env::var("RUST_LOG").ok())
            .unwrap_or_else(|| cli.log_level.as_str().to_string());

        let log_format_str = std::env::var("CLASSTREE_LOG_FORMAT")
            .ok()
            .unwrap_or_else(|| cli.log_format.as_str().to_string());

        if let Err(e) = init_logging(Some(&log_level_str), Some(&log_format_str)) {
            eprintln!("Warning: Failed to initialize logging: {}", e);
        }

        if cli.verbose {
            eprintln!("Classtree v{}", env!("CARGO_PKG_VERSION"));
        }

        match cli.command {
            Commands::Generate {
                input,
                out_dir,
                instance_file,
                schema_file,
                options,
            } => {
                let output = OutputConfig::new(out_dir)
                    .with_instance_file(instance_file)
                    .with_schema_file(schema_file);
                self.generate_command(input, &output, options, cli.verbose)
            }
            Commands::Tree {
                input,
                output,
                options,
            } => self.tree_command(input, output, options, cli.verbose),
            Commands::Schema {
                input,
                output,
                options,
            } => self.schema_command(input, output, options, cli.verbose),
            Commands::Detect { input } => self.detect_command(input, cli.verbose),
            Commands::Validate { input, format } => {
                self.validate_command(input, format, cli.verbose)
            }
            Commands::Formats { json } => self.formats_command(json),
        }
    }

    /// Handle the generate command
    fn generate_command(
        &self,
        input: Option<PathBuf>,
        output: &OutputConfig,
        options: RenderOptions,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let artifacts = options
            .pipeline()
            .process_with_format(&content, options.format.input_format())?;
        let paths = artifacts.write_to(output)?;
        info!(
            instance = %paths.instance.display(),
            schema = %paths.schema.display(),
            "Generated artifacts"
        );

        if verbose {
            eprintln!(
                "Materialized {} nodes and {} schema descriptors",
                artifacts.tree.node_count(),
                artifacts.descriptors.len()
            );
        }

        println!("{}", paths.instance.display());
        println!("{}", paths.schema.display());
        Ok(())
    }

    /// Handle the tree command
    fn tree_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        options: RenderOptions,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let document = options
            .pipeline()
            .render_tree(&content, options.format.input_format())?;
        self.write_output(output, &document)
    }

    /// Handle the schema command
    fn schema_command(
        &self,
        input: Option<PathBuf>,
        output: Option<PathBuf>,
        options: RenderOptions,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let document = options
            .pipeline()
            .render_schema(&content, options.format.input_format())?;
        self.write_output(output, &document)
    }

    /// Handle the detect command
    fn detect_command(&self, input: Option<PathBuf>, verbose: bool) -> Result<()> {
        let content = self.read_input(input)?;

        if verbose {
            eprintln!("Read {} bytes of input", content.len());
        }

        let format = self.pipeline.detect_format(&content)?;
        println!("{}", format);
        Ok(())
    }

    /// Handle the validate command
    fn validate_command(
        &self,
        input: Option<PathBuf>,
        format: FormatChoice,
        verbose: bool,
    ) -> Result<()> {
        let content = self.read_input(input)?;

        let format = match format.input_format() {
            Some(format) => format,
            None => match self.pipeline.detect_format(&content) {
                Ok(format) => format,
                Err(e) => return Err(anyhow!("Could not detect input format: {}", e)),
            },
        };

        if verbose {
            eprintln!("Validating {} diagram", format);
        }

        match self.pipeline.process_with_format(&content, Some(format)) {
            Ok(artifacts) => {
                println!(
                    "✓ Valid {} diagram: {} classes, {} instance nodes",
                    format,
                    artifacts.descriptors.len(),
                    artifacts.tree.node_count()
                );
                Ok(())
            }
            Err(e) => Err(anyhow!("Invalid {} diagram: {}", format, e)),
        }
    }

    /// Handle the formats command
    fn formats_command(&self, json: bool) -> Result<()> {
        let formats = self.pipeline.supported_formats();

        if json {
            let listing = FormatListing {
                supported_formats: formats
                    .iter()
                    .map(|format| FormatEntry {
                        name: format.to_string(),
                        description: describe_format(*format),
                    })
                    .collect(),
                total: formats.len(),
            };
            println!("{}", serde_json::to_string_pretty(&listing)?);
        } else {
            println!("Supported input formats:");
            for format in &formats {
                println!("  {:<8} - {}", format.to_string(), describe_format(*format));
            }
        }

        Ok(())
    }

    /// Read input from file or stdin
    pub fn read_input(&self, input: Option<PathBuf>) -> Result<String> {
        debug!(input = ?input, "Reading input");
        match input {
            Some(path) if path.to_string_lossy() != "-" => fs::read_to_string(&path)
                .map_err(|e| anyhow!("Failed to read input file '{}': {}", path.display(), e)),
            _ => {
                let mut content = String::new();
                io::stdin().read_to_string(&mut content)?;
                Ok(content)
            }
        }
    }

    /// Write output to file or stdout
    pub fn write_output(&self, output: Option<PathBuf>, content: &str) -> Result<()> {
        match output {
            Some(path) if path.to_string_lossy() != "-" => {
                fs::write(&path, content).map_err(|e| {
                    anyhow!("Failed to write output file '{}': {}", path.display(), e)
                })?;
            }
            _ => {
                print!("{}", content);
                io::stdout().flush()?;
            }
        }
        Ok(())
    }
}

impl Default for ClasstreeApp {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
struct FormatEntry {
    name: String,
    description: &'static str,
}

#[derive(Serialize)]
struct FormatListing {
    supported_formats: Vec<FormatEntry>,
    total: usize,
}

fn describe_format(format: InputFormat) -> &'static str {
    match format {
        InputFormat::Xml => "<Class>/<Aggregation> markup export",
        InputFormat::Mermaid => "Mermaid-style classDiagram text",
    }
}
