//! Execution orchestration: per-assembly filter resolution and engine runs.
//!
//! For each assembly the orchestrator decides which filter document the
//! engine actually receives — host filter translation, explicit-run policy,
//! and the select-limit safeguard — then drives the engine through the event
//! bridge. Assemblies are processed sequentially; a failure in one never
//! prevents the others from running.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::bridge::{EventBridge, RunPhase};
use crate::cancellation::CancellationToken;
use crate::convert::TestConverter;
use crate::engine::{EngineError, NativeEngine, events};
use crate::host::{HostSink, MessageLevel};
use crate::navigation::NavigationProvider;
use chasqui_core::settings::{DiscoveryMethod, ExplicitMode, RunSettings};
use chasqui_filter::emit::to_filter_xml;
use chasqui_filter::{EMPTY_FILTER, FilterError, FilterNode, combine, fastpath};

/// Sub-filter excluding tests marked explicit; combined onto bare
/// category/property filters under the Strict policy.
pub const EXCLUDE_EXPLICIT_FILTER: &str =
    "<filter><not><prop name='Explicit'>true</prop></not></filter>";

/// Sentinel that selects nothing: `::` cannot occur in an engine full name.
pub const NO_TESTS_FILTER: &str = "<filter><test>::no-tests-selected::</test></filter>";

/// A run request as the host hands it over.
#[derive(Debug, Clone, Default)]
pub struct RunRequest {
    /// The structured host filter's expression, if any.
    pub filter_expression: Option<String>,
    /// The raw host filter value; batch mode consults it when the structured
    /// expression is empty.
    pub raw_filter: Option<String>,
    /// The host explicitly selected these tests (e.g. by name).
    pub explicit_run: bool,
}

/// How one assembly's run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssemblyRunStatus {
    Completed,
    Cancelled,
    /// Not started: cancellation was already requested.
    NotRun,
    /// Degraded to the no-tests sentinel (selection over the limit).
    SkippedOversizedSelection,
    /// Not a test assembly; skipped silently.
    SkippedUnsupported,
    Failed,
}

/// Tally of a multi-assembly execution.
#[derive(Debug, Clone, Default)]
pub struct ExecutionSummary {
    pub assemblies: usize,
    pub completed: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: usize,
    pub duration: Duration,
}

/// Tally of a multi-assembly discovery.
#[derive(Debug, Clone, Default)]
pub struct DiscoverySummary {
    pub assemblies: usize,
    pub tests: usize,
    pub failed: usize,
    pub duration: Duration,
}

/// The filter the engine will actually receive.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ResolvedFilter {
    xml: String,
    /// A bare category/property filter (no name clause); subject to the
    /// explicit-run policy.
    category_only: bool,
    oversized: bool,
}

impl ResolvedFilter {
    fn run_everything() -> Self {
        Self {
            xml: EMPTY_FILTER.to_string(),
            category_only: false,
            oversized: false,
        }
    }
}

/// Drives discovery and execution across assemblies.
pub struct Orchestrator<'a, E: NativeEngine, S: HostSink> {
    engine: &'a mut E,
    sink: &'a mut S,
    navigation: &'a dyn NavigationProvider,
    settings: &'a RunSettings,
    cancellation: CancellationToken,
}

impl<'a, E: NativeEngine, S: HostSink> Orchestrator<'a, E, S> {
    pub fn new(
        engine: &'a mut E,
        sink: &'a mut S,
        navigation: &'a dyn NavigationProvider,
        settings: &'a RunSettings,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            engine,
            sink,
            navigation,
            settings,
            cancellation,
        }
    }

    // ========================================================================
    // Discovery
    // ========================================================================

    /// Discover tests in every assembly, reporting each to the sink.
    pub fn discover(&mut self, assemblies: &[PathBuf]) -> DiscoverySummary {
        let started = Instant::now();
        let mut summary = DiscoverySummary {
            assemblies: assemblies.len(),
            ..DiscoverySummary::default()
        };

        for assembly in assemblies {
            if self.cancellation.is_cancelled() {
                break;
            }
            match self.discover_assembly(assembly) {
                Ok(count) => summary.tests += count,
                Err(EngineError::UnsupportedBinary(path)) => {
                    debug!(%path, "not a test assembly; skipping");
                }
                Err(err) => {
                    summary.failed += 1;
                    self.report_assembly_error(assembly, "discovery", &err);
                }
            }
        }

        summary.duration = started.elapsed();
        summary
    }

    fn discover_assembly(&mut self, assembly: &Path) -> Result<usize, EngineError> {
        let xml = self.engine.discover(assembly, EMPTY_FILTER)?;
        let tests = events::parse_discovery(&xml)
            .map_err(|e| EngineError::Protocol(e.to_string()))?;

        let mut converter = TestConverter::new(assembly, self.navigation);
        for test in &tests {
            let case = converter.host_case(
                &test.identity,
                &test.name,
                test.run_state,
                &test.properties,
            );
            self.sink.record_discovered(&case);
        }
        Ok(tests.len())
    }

    // ========================================================================
    // Execution
    // ========================================================================

    /// Run every assembly with the request's filter, streaming results to
    /// the sink.
    pub fn execute(&mut self, assemblies: &[PathBuf], request: &RunRequest) -> ExecutionSummary {
        let started = Instant::now();
        let mut summary = ExecutionSummary {
            assemblies: assemblies.len(),
            ..ExecutionSummary::default()
        };

        for assembly in assemblies {
            match self.run_assembly(assembly, request) {
                AssemblyRunStatus::Completed => summary.completed += 1,
                AssemblyRunStatus::Failed => summary.failed += 1,
                AssemblyRunStatus::Cancelled | AssemblyRunStatus::NotRun => {
                    summary.cancelled += 1
                }
                AssemblyRunStatus::SkippedOversizedSelection
                | AssemblyRunStatus::SkippedUnsupported => summary.skipped += 1,
            }
        }

        summary.duration = started.elapsed();
        summary
    }

    /// The per-assembly decision procedure.
    pub fn run_assembly(&mut self, assembly: &Path, request: &RunRequest) -> AssemblyRunStatus {
        if self.cancellation.is_cancelled() {
            return AssemblyRunStatus::NotRun;
        }

        let resolved = match self.resolve_filter(request) {
            Ok(resolved) => resolved,
            Err(err) => {
                // A syntactically invalid filter stops this assembly's run;
                // it must never silently select nothing or everything.
                self.sink.send_message(
                    MessageLevel::Error,
                    &format!(
                        "invalid test filter for {}: {} (offset {})",
                        assembly.display(),
                        err,
                        err.offset()
                    ),
                );
                return AssemblyRunStatus::Failed;
            }
        };

        if resolved.oversized {
            info!(
                assembly = %assembly.display(),
                limit = self.settings.assembly_select_limit,
                "selection exceeds the assembly select limit; no tests will run"
            );
            self.sink.send_message(
                MessageLevel::Informational,
                &format!(
                    "selection for {} exceeds the assembly select limit ({}); skipping",
                    assembly.display(),
                    self.settings.assembly_select_limit
                ),
            );
        }

        let filter_xml = self.apply_explicit_policy(resolved.xml.clone(), &resolved, request);

        // Cancellation may have been requested while resolving.
        if self.cancellation.is_cancelled() {
            return AssemblyRunStatus::NotRun;
        }

        let converter = TestConverter::new(assembly, self.navigation);
        let mut bridge = EventBridge::new(&mut *self.sink, converter, self.cancellation.clone());
        bridge.begin();

        let run_result = self
            .engine
            .run(assembly, &filter_xml, &mut |event| bridge.on_raw_event(event));

        match run_result {
            Ok(report) => {
                bridge.complete();
                if bridge.phase() == RunPhase::Cancelled {
                    return AssemblyRunStatus::Cancelled;
                }
                if !self.cancellation.is_cancelled() {
                    self.write_run_report(assembly, &report);
                }
                if resolved.oversized {
                    AssemblyRunStatus::SkippedOversizedSelection
                } else {
                    AssemblyRunStatus::Completed
                }
            }
            Err(EngineError::UnsupportedBinary(path)) => {
                debug!(%path, "not a test assembly; skipping");
                AssemblyRunStatus::SkippedUnsupported
            }
            Err(EngineError::Fault(message)) if self.cancellation.is_cancelled() => {
                // The interrupted engine call is expected to end in a fault;
                // treat it as a clean cancellation, not an error.
                debug!(%message, "engine fault during cancellation; treating as cancelled");
                AssemblyRunStatus::Cancelled
            }
            Err(err) => {
                self.report_assembly_error(assembly, "run", &err);
                AssemblyRunStatus::Failed
            }
        }
    }

    // ========================================================================
    // Filter resolution
    // ========================================================================

    fn resolve_filter(&self, request: &RunRequest) -> Result<ResolvedFilter, FilterError> {
        let structured = non_empty(request.filter_expression.as_deref());
        let expression = if self.settings.design_mode {
            // Design mode: an empty host filter means "run everything passed in".
            structured
        } else {
            // Batch mode additionally consults the raw host filter value.
            structured.or_else(|| non_empty(request.raw_filter.as_deref()))
        };

        let Some(expression) = expression else {
            return Ok(ResolvedFilter::run_everything());
        };

        if self.settings.use_native_filter {
            // The user opted to write the engine's filter dialect directly.
            return Ok(ResolvedFilter {
                xml: ensure_wrapped(expression),
                category_only: false,
                oversized: false,
            });
        }

        if self.settings.discovery_method == DiscoveryMethod::Current
            && fastpath::is_fully_qualified_name_filter(expression)
        {
            let names = fastpath::fully_qualified_names(expression);
            if names.len() > self.settings.assembly_select_limit {
                return Ok(ResolvedFilter {
                    xml: NO_TESTS_FILTER.to_string(),
                    category_only: false,
                    oversized: true,
                });
            }
            if let Some(node) = FilterNode::full_name_list(names) {
                return Ok(ResolvedFilter {
                    xml: to_filter_xml(&node),
                    category_only: false,
                    oversized: false,
                });
            }
            // The checker accepted, so the name list cannot be empty; fall
            // through to the general parser all the same.
        }

        let node = chasqui_filter::parse(expression)?;
        Ok(ResolvedFilter {
            category_only: !node.has_name_clause(),
            xml: to_filter_xml(&node),
            oversized: false,
        })
    }

    fn apply_explicit_policy(
        &self,
        filter_xml: String,
        resolved: &ResolvedFilter,
        request: &RunRequest,
    ) -> String {
        if self.settings.explicit_mode == ExplicitMode::Strict
            && resolved.category_only
            && !request.explicit_run
        {
            combine::combine(&filter_xml, EXCLUDE_EXPLICIT_FILTER)
        } else {
            filter_xml
        }
    }

    // ========================================================================
    // Post-run and error reporting
    // ========================================================================

    fn write_run_report(&mut self, assembly: &Path, report: &str) {
        let Some(directory) = &self.settings.test_output_xml else {
            return;
        };
        if report.is_empty() {
            return;
        }

        let stem = assembly
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "run".to_string());
        let target = directory.join(format!("{stem}.xml"));

        let written = fs::create_dir_all(directory).and_then(|()| fs::write(&target, report));
        match written {
            Ok(()) => debug!(target = %target.display(), "wrote run report"),
            Err(err) => self.sink.send_message(
                MessageLevel::Warning,
                &format!("failed to write run report {}: {}", target.display(), err),
            ),
        }
    }

    fn report_assembly_error(&mut self, assembly: &Path, operation: &str, err: &EngineError) {
        error!(assembly = %assembly.display(), %err, "assembly {operation} failed");
        self.sink.send_message(
            MessageLevel::Error,
            &format!("{} failed for {}: {}", operation, assembly.display(), err),
        );
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

/// Accept either a complete filter document or a bare fragment.
fn ensure_wrapped(filter: &str) -> String {
    let trimmed = filter.trim();
    if trimmed.starts_with("<filter") {
        trimmed.to_string()
    } else {
        format!("<filter>{trimmed}</filter>")
    }
}

// ============================================================================
// TESTS
// ============================================================================
