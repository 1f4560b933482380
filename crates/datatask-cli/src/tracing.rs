//! Tracing configuration for the datatask CLI
//!
//! Logs always go to stderr so that canonical output on stdout stays
//! machine-readable.

use std::io;
pub use tracing::Level;
use tracing_subscriber::{filter::EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

/// Tracing output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// Compact single-line format
    Compact,
    /// Structured JSON format
    Json,
    /// Development format with file locations
    Dev,
}

/// Log level options for CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogLevel {
    /// Show all logs, including every resolved column
    Trace,
    /// Show debug and above
    Debug,
    /// Show info and above
    Info,
    /// Show warnings and above (default)
    Warn,
    /// Show errors only
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    pub format: TracingFormat,
    pub level: Level,
    /// Add source file and line to `dev` output
    pub enable_file_location: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            format: TracingFormat::Dev,
            level: Level::WARN,
            enable_file_location: false,
        }
    }
}

/// Global correlation ID for this run
static CORRELATION_ID: std::sync::OnceLock<Uuid> = std::sync::OnceLock::new();

/// Get or create the correlation ID for the current run
pub fn correlation_id() -> Uuid {
    *CORRELATION_ID.get_or_init(Uuid::new_v4)
}

/// Filter directives for the crates of this workspace at `level`
fn default_directives(level: Level) -> String {
    let level = level.as_str().to_lowercase();
    format!("datatask={level},datatask_cli={level}")
}

/// Initialize tracing with the given configuration
pub fn init_tracing(config: TracingConfig) -> miette::Result<()> {
    let correlation_id = correlation_id();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(config.level)))
        .map_err(|e| miette::miette!("Failed to create tracing filter: {e}"))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    match config.format {
        TracingFormat::Pretty => {
            let layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(io::stderr)
                .with_target(true);

            registry.with(layer).init();
        }
        TracingFormat::Compact => {
            let layer = tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(io::stderr)
                .with_target(false);

            registry.with(layer).init();
        }
        TracingFormat::Json => {
            let layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stderr)
                .with_current_span(true)
                .with_span_list(true);

            registry.with(layer).init();
        }
        TracingFormat::Dev => {
            let layer = tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_file(config.enable_file_location)
                .with_line_number(config.enable_file_location)
                .with_target(true)
                .with_level(true);

            registry.with(layer).init();
        }
    }

    tracing::info!(
        correlation_id = %correlation_id,
        version = env!("CARGO_PKG_VERSION"),
        format = ?config.format,
        "Tracing initialized for datatask CLI"
    );

    Ok(())
}

/// Create a new span for command execution with structured fields
#[macro_export]
macro_rules! command_span {
    ($command:expr) => {
        ::tracing::info_span!(
            "command",
            command = %$command,
            correlation_id = %$crate::tracing::correlation_id(),
            start_time = %chrono::Utc::now().to_rfc3339(),
        )
    };
}
