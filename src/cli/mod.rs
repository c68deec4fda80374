//! CLI module for the chasqui test bridge.
//!
//! ## Commands
//!
//! - `discover <assemblies…>` - List the tests in the given assemblies
//! - `run <assemblies…>` - Run tests, streaming results to the console
//! - `filter <EXPR>` - Translate a host filter expression (debug)
//!
//! ## Modules
//!
//! - `commands` - Command implementations
//! - `reporter` - Console host sink
//!
//! ## Design
//!
//! The CLI uses clap for argument parsing with derive macros.
//! Command functions return `CliResult<T>` instead of calling `process::exit`.
//! Only the top-level `run()` function handles errors and exits.

// Enforce explicit error handling - no panicking in production code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

pub mod commands;
pub mod reporter;

use std::fmt;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use commands::EngineOptions;

// ============================================================================
// CLI Error handling
// ============================================================================

/// Exit code for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExitCode(pub i32);

impl ExitCode {
    pub const SUCCESS: ExitCode = ExitCode(0);
    pub const FAILURE: ExitCode = ExitCode(1);
}

/// Error type for CLI operations.
///
/// Contains a user-facing message and an exit code. The CLI entry point
/// catches these errors, prints the message, and exits with the code.
#[derive(Debug)]
pub struct CliError {
    /// User-facing error message (already formatted for display)
    pub message: String,
    /// Exit code to return to the shell
    pub exit_code: ExitCode,
}

impl CliError {
    /// Create a new CLI error with a message and exit code.
    pub fn new(message: impl Into<String>, exit_code: ExitCode) -> Self {
        Self {
            message: message.into(),
            exit_code,
        }
    }

    /// Create a failure error (exit code 1).
    pub fn failure(message: impl Into<String>) -> Self {
        Self::new(message, ExitCode::FAILURE)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// Clap CLI definition
// ============================================================================

/// Bridge the Quipu test engine to host test platforms
#[derive(Parser, Debug)]
#[command(name = "chasqui")]
#[command(version = VERSION)]
#[command(about = "Bridge the Quipu test engine to host test platforms", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the tests in the given assemblies
    Discover {
        /// Test assemblies to explore
        #[arg(value_name = "ASSEMBLY")]
        assemblies: Vec<PathBuf>,
        /// Settings file (JSON)
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
        /// Engine executable to launch
        #[arg(long, value_name = "CMD")]
        engine: Option<PathBuf>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Run tests, streaming results to the console
    Run {
        /// Test assemblies to run
        #[arg(value_name = "ASSEMBLY")]
        assemblies: Vec<PathBuf>,
        /// Host filter expression (e.g. "TestCategory=Fast&Priority=1")
        #[arg(short, long, value_name = "EXPR")]
        filter: Option<String>,
        /// The selection names explicit tests; do not exclude them
        #[arg(long)]
        explicit: bool,
        /// Design (IDE) mode: an empty filter runs everything passed in
        #[arg(long)]
        design: bool,
        /// Settings file (JSON)
        #[arg(long, value_name = "FILE")]
        settings: Option<PathBuf>,
        /// Engine executable to launch
        #[arg(long, value_name = "CMD")]
        engine: Option<PathBuf>,
        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Translate a host filter expression to engine filter XML (debug)
    Filter {
        /// Filter expression to translate
        #[arg(value_name = "EXPR")]
        expression: String,
    },
}

// ============================================================================
// CLI entry point
// ============================================================================

/// Main CLI entry point.
///
/// This is the only place where `process::exit` is called. All command
/// implementations return `CliResult` and errors are handled here.
pub fn run() {
    let cli = Cli::parse();

    match execute(cli) {
        Ok(exit_code) => {
            if exit_code.0 != 0 {
                process::exit(exit_code.0);
            }
        }
        Err(e) => {
            if !e.message.is_empty() {
                eprintln!("{}", e.message);
            }
            process::exit(e.exit_code.0);
        }
    }
}

/// Execute the CLI command and return result.
fn execute(cli: Cli) -> CliResult<ExitCode> {
    match cli.command {
        Command::Discover {
            assemblies,
            settings,
            engine,
            verbose,
        } => commands::discover(
            &assemblies,
            &EngineOptions {
                settings,
                engine,
                verbose,
            },
        ),
        Command::Run {
            assemblies,
            filter,
            explicit,
            design,
            settings,
            engine,
            verbose,
        } => commands::run(
            &assemblies,
            filter,
            explicit,
            design,
            &EngineOptions {
                settings,
                engine,
                verbose,
            },
        ),
        Command::Filter { expression } => commands::translate_filter(&expression),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_discover() {
        let cli = Cli::try_parse_from(["chasqui", "discover", "suite.dll"]).unwrap();
        assert!(matches!(cli.command, Command::Discover { .. }));
    }

    #[test]
    fn test_cli_parse_run_with_filter() {
        let cli = Cli::try_parse_from([
            "chasqui",
            "run",
            "suite.dll",
            "-f",
            "TestCategory=Fast",
            "--explicit",
            "-v",
        ])
        .unwrap();
        if let Command::Run {
            assemblies,
            filter,
            explicit,
            verbose,
            ..
        } = cli.command
        {
            assert_eq!(assemblies, [PathBuf::from("suite.dll")]);
            assert_eq!(filter.as_deref(), Some("TestCategory=Fast"));
            assert!(explicit);
            assert!(verbose);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_run_multiple_assemblies() {
        let cli = Cli::try_parse_from(["chasqui", "run", "a.dll", "b.dll"]).unwrap();
        if let Command::Run { assemblies, .. } = cli.command {
            assert_eq!(assemblies.len(), 2);
        } else {
            panic!("Expected Run command");
        }
    }

    #[test]
    fn test_cli_parse_filter() {
        let cli =
            Cli::try_parse_from(["chasqui", "filter", "TestCategory=Urgent|Priority=1"]).unwrap();
        if let Command::Filter { expression } = cli.command {
            assert_eq!(expression, "TestCategory=Urgent|Priority=1");
        } else {
            panic!("Expected Filter command");
        }
    }

    #[test]
    fn test_cli_parse_settings_flags() {
        let cli = Cli::try_parse_from([
            "chasqui",
            "discover",
            "suite.dll",
            "--settings",
            "run.json",
            "--engine",
            "/opt/quipu/engine",
        ])
        .unwrap();
        if let Command::Discover {
            settings, engine, ..
        } = cli.command
        {
            assert_eq!(settings, Some(PathBuf::from("run.json")));
            assert_eq!(engine, Some(PathBuf::from("/opt/quipu/engine")));
        } else {
            panic!("Expected Discover command");
        }
    }
}
