use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::commands::{Command, Input};
use crate::tracing::{LogLevel, TracingFormat};

#[derive(Parser, Debug)]
#[command(name = "datatask")]
#[command(about = "Validate, normalize and inspect portable data task descriptions")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(
        short = 'l',
        long,
        global = true,
        help = "Set logging level",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    #[arg(
        long,
        global = true,
        help = "Log output format",
        default_value = "dev",
        value_enum
    )]
    pub format: TracingFormat,

    #[arg(long, global = true, help = "Output logs in JSON format (same as --format json)")]
    pub json: bool,

    #[arg(
        long,
        global = true,
        env = "DATATASK_MAX_DEPTH",
        help = "Maximum nesting depth of a column expression",
        default_value_t = datatask::DEFAULT_MAX_DEPTH
    )]
    pub max_depth: usize,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(about = "Show version information")]
    Version,
    #[command(about = "Check that a task description is valid")]
    Validate {
        #[arg(help = "Task description file, or - for stdin", default_value = "-")]
        input: Input,
    },
    #[command(about = "Print the canonical form of a task description")]
    Normalize {
        #[arg(help = "Task description file, or - for stdin", default_value = "-")]
        input: Input,
        #[arg(long, help = "Indent the output")]
        pretty: bool,
        #[arg(long, short = 'o', help = "Write to a file instead of stdout")]
        output: Option<PathBuf>,
    },
    #[command(about = "Show which input columns each output column is derived from")]
    Lineage {
        #[arg(help = "Task description file, or - for stdin", default_value = "-")]
        input: Input,
    },
}

impl Cli {
    /// The log format selected by `--format`, overridden by `--json`
    pub const fn tracing_format(&self) -> TracingFormat {
        if self.json {
            TracingFormat::Json
        } else {
            self.format
        }
    }
}

impl From<Commands> for Command {
    fn from(cmd: Commands) -> Self {
        match cmd {
            Commands::Version => Self::Version,
            Commands::Validate { input } => Self::Validate { input },
            Commands::Normalize {
                input,
                pretty,
                output,
            } => Self::Normalize {
                input,
                pretty,
                output,
            },
            Commands::Lineage { input } => Self::Lineage { input },
        }
    }
}

pub fn parse() -> Cli {
    Cli::parse()
}
