//! Binary entry point for the classref CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Everything known about one class
//! classref inspect --unit unit.json --class app.ServiceFactory
//!
//! # Ancestors, breadth-first
//! classref supertypes --unit unit.json --class app.ServiceFactory --include-self
//!
//! # What ServiceFactory supplies for Factory's T
//! classref resolve-generic --unit unit.json --class app.ServiceFactory \
//!     --declaring lib.Factory --parameter T
//! ```

use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use classref::cli::{run_inspect, run_list, run_resolve_generic, run_supertypes, CliError};
use classref::output::{emit_response, ErrorInfo, ErrorResponse};
use classref_core::error::OutputErrorCode;

// ============================================================================
// CLI Structure
// ============================================================================

/// Query class references of a compilation unit.
///
/// The unit mixes parsed classes with already-resolved symbols. All output
/// is JSON on stdout.
#[derive(Parser, Debug)]
#[command(name = "classref", version, about = "Query class references of a compilation unit")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,
    #[command(subcommand)]
    command: Command,
}

/// Global arguments shared by all subcommands.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

/// Arguments naming a unit document and a class in it.
#[derive(clap::Args, Debug)]
struct ClassArgs {
    /// Path to the JSON compilation unit document.
    #[arg(long)]
    unit: PathBuf,
    /// Qualified name of the class, e.g. `app.ServiceFactory`.
    #[arg(long)]
    class: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report a class: flags, visibility, hierarchy, members and annotations.
    Inspect {
        #[command(flatten)]
        target: ClassArgs,
    },
    /// List a class's ancestors, breadth-first, each once.
    Supertypes {
        #[command(flatten)]
        target: ClassArgs,
        /// Start the list with the class itself.
        #[arg(long)]
        include_self: bool,
    },
    /// Resolve the type a class supplies for a supertype's type parameter.
    ResolveGeneric {
        #[command(flatten)]
        target: ClassArgs,
        /// Qualified name of the class declaring the type parameter.
        #[arg(long)]
        declaring: String,
        /// Name of the type parameter, e.g. `T`.
        #[arg(long)]
        parameter: String,
    },
    /// List every class in the unit with its availability.
    List {
        /// Path to the JSON compilation unit document.
        #[arg(long)]
        unit: PathBuf,
    },
}

// ============================================================================
// Main Entry Point
// ============================================================================

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let error_code = OutputErrorCode::from(&err);
            let response = ErrorResponse::new(ErrorInfo::from_error(&err));

            // Errors go to stdout as JSON, same as results.
            let _ = emit_response(&response, &mut io::stdout());
            let _ = io::stdout().flush();

            ExitCode::from(error_code.code())
        }
    }
}

/// Initialize tracing subscriber. `RUST_LOG` wins over `--log-level`.
fn init_tracing(level: LogLevel) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

/// Execute the CLI command.
fn execute(cli: Cli) -> Result<(), CliError> {
    let mut stdout = io::stdout();
    match cli.command {
        Command::Inspect { target } => {
            let response = run_inspect(&target.unit, &target.class)?;
            emit_response(&response, &mut stdout).map_err(CliError::Output)
        }
        Command::Supertypes {
            target,
            include_self,
        } => {
            let response = run_supertypes(&target.unit, &target.class, include_self)?;
            emit_response(&response, &mut stdout).map_err(CliError::Output)
        }
        Command::ResolveGeneric {
            target,
            declaring,
            parameter,
        } => {
            let response = run_resolve_generic(&target.unit, &target.class, &declaring, &parameter)?;
            emit_response(&response, &mut stdout).map_err(CliError::Output)
        }
        Command::List { unit } => {
            let response = run_list(&unit)?;
            emit_response(&response, &mut stdout).map_err(CliError::Output)
        }
    }
}
