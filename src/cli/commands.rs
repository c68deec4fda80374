//! Command implementations.
//!
//! Commands return `CliResult<ExitCode>` instead of exiting; only the
//! top-level `cli::run()` touches the process.

use std::path::PathBuf;
use std::time::Instant;

use super::{CliError, CliResult, ExitCode};
use crate::cancellation::CancellationToken;
use crate::cli::reporter::ConsoleReporter;
use crate::engine::process::ProcessEngine;
use crate::navigation::SidecarNavigation;
use crate::orchestrator::{Orchestrator, RunRequest};
use chasqui_core::settings::RunSettings;

/// Shared flags for the engine-touching commands.
pub struct EngineOptions {
    pub settings: Option<PathBuf>,
    pub engine: Option<PathBuf>,
    pub verbose: bool,
}

fn load_settings(options: &EngineOptions) -> CliResult<RunSettings> {
    let mut settings = match &options.settings {
        Some(path) => RunSettings::load(path)
            .map_err(|e| CliError::failure(format!("Error loading settings: {e}")))?,
        None => RunSettings::default(),
    };
    if let Some(engine) = &options.engine {
        settings.engine_command = Some(engine.clone());
    }
    Ok(settings)
}

fn require_assemblies(assemblies: &[PathBuf]) -> CliResult<()> {
    if assemblies.is_empty() {
        return Err(CliError::failure(
            "Error: at least one test assembly is required",
        ));
    }
    Ok(())
}

/// `chasqui discover` — list the tests in the given assemblies.
pub fn discover(assemblies: &[PathBuf], options: &EngineOptions) -> CliResult<ExitCode> {
    require_assemblies(assemblies)?;
    let settings = load_settings(options)?;

    let mut engine = ProcessEngine::from_settings(&settings);
    let mut reporter = ConsoleReporter::new(options.verbose);
    let navigation = SidecarNavigation::new();
    let mut orchestrator = Orchestrator::new(
        &mut engine,
        &mut reporter,
        &navigation,
        &settings,
        CancellationToken::new(),
    );

    let summary = orchestrator.discover(assemblies);
    eprintln!(
        "discovered {} test(s) in {} assembly(ies) in {:.2}s",
        summary.tests,
        summary.assemblies,
        summary.duration.as_secs_f64()
    );

    if summary.failed > 0 {
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// `chasqui run` — execute the given assemblies through the engine.
pub fn run(
    assemblies: &[PathBuf],
    filter: Option<String>,
    explicit: bool,
    design: bool,
    options: &EngineOptions,
) -> CliResult<ExitCode> {
    require_assemblies(assemblies)?;
    let mut settings = load_settings(options)?;
    if design {
        settings.design_mode = true;
    }

    let request = RunRequest {
        filter_expression: filter,
        raw_filter: None,
        explicit_run: explicit,
    };

    let started = Instant::now();
    let mut engine = ProcessEngine::from_settings(&settings);
    let mut reporter = ConsoleReporter::new(options.verbose);
    let navigation = SidecarNavigation::new();
    let mut orchestrator = Orchestrator::new(
        &mut engine,
        &mut reporter,
        &navigation,
        &settings,
        CancellationToken::new(),
    );

    let summary = orchestrator.execute(assemblies, &request);
    reporter.finish(started.elapsed());

    if summary.failed > 0 || reporter.saw_failures() {
        // Summary already printed; exit nonzero without extra noise.
        Err(CliError::new("", ExitCode::FAILURE))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

/// `chasqui filter` — translate a host filter expression and print the
/// engine filter document (debug aid).
pub fn translate_filter(expression: &str) -> CliResult<ExitCode> {
    match chasqui_filter::translate(expression) {
        Ok(xml) => {
            println!("{xml}");
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            let report = miette::Report::new(err);
            Err(CliError::failure(format!("{report:?}")))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_filter_prints_xml() {
        assert_eq!(
            translate_filter("TestCategory=Fast").unwrap(),
            ExitCode::SUCCESS
        );
    }

    #[test]
    fn test_translate_filter_reports_syntax_errors() {
        let err = translate_filter("TestCategory=").unwrap_err();
        assert_eq!(err.exit_code, ExitCode::FAILURE);
        assert!(!err.message.is_empty());
    }

    #[test]
    fn test_empty_assembly_list_rejected() {
        let options = EngineOptions {
            settings: None,
            engine: None,
            verbose: false,
        };
        let err = discover(&[], &options).unwrap_err();
        assert!(err.message.contains("at least one test assembly"));
    }
}
