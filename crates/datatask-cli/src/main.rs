//! `datatask` command-line interface

mod cli;
mod commands;
mod errors;
mod tracing;

use ::tracing::instrument;
use datatask::Normalizer;

use crate::cli::{Cli, parse};
use crate::commands::{Command, lineage, normalize, validate, version};
use crate::tracing::{LogLevel, TracingConfig};

#[allow(clippy::print_stderr)]
fn main() {
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    if let Err(error) = run_main() {
        eprintln!("{error:?}");
        std::process::exit(1);
    }
}

fn run_main() -> miette::Result<()> {
    let cli = parse();

    let tracing_config = TracingConfig {
        format: cli.tracing_format(),
        level: cli.level.into(),
        enable_file_location: matches!(cli.level, LogLevel::Debug | LogLevel::Trace),
    };
    crate::tracing::init_tracing(tracing_config)?;

    run_cli(cli)
}

#[instrument(name = "datatask_cli", skip_all)]
fn run_cli(cli: Cli) -> miette::Result<()> {
    let normalizer = Normalizer::builder().max_depth(cli.max_depth).build();
    ::tracing::debug!(max_depth = cli.max_depth, "Configured normalizer");

    let command: Command = cli.command.into();
    execute_command(command, &normalizer)
}

fn execute_command(command: Command, normalizer: &Normalizer) -> miette::Result<()> {
    let span = crate::command_span!(command.name());
    let _guard = span.enter();
    let start = std::time::Instant::now();

    let output = match command {
        Command::Version => Some(version::get_version_info()),
        Command::Validate { input } => Some(validate::execute_validate(&input, normalizer)?),
        Command::Normalize {
            input,
            pretty,
            output,
        } => normalize::execute_normalize(&input, pretty, output.as_deref(), normalizer)?,
        Command::Lineage { input } => Some(lineage::execute_lineage(&input, normalizer)?),
    };

    if let Some(text) = output {
        print_output(&text);
    }

    ::tracing::debug!(
        duration_ms = start.elapsed().as_millis(),
        "Command completed"
    );
    Ok(())
}

#[allow(clippy::print_stdout)]
fn print_output(text: &str) {
    if !text.is_empty() {
        println!("{text}");
    }
}
