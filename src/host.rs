//! Host-side object model and the sink the bridge drives.
//!
//! ## HostSink Trait
//!
//! The event bridge reports everything through a `HostSink` implementation,
//! separating host-protocol delivery from event conversion. This allows for
//! custom hosts (IDE adapters, console runners, recording sinks for tests)
//! by implementing the trait.

use std::sync::Arc;
use std::time::Duration;

use chasqui_core::outcome::TestOutcome;

/// A key/value trait attached to a test case (category, priority, custom
/// properties).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestTrait {
    pub key: String,
    pub value: String,
}

/// A test case as the host sees it.
///
/// Immutable once created. Within one source assembly the fully-qualified
/// name is the unique key; the host correlates start/result pairs by it, so
/// repeated events for the same test must reuse the identical object (the
/// converter's cache guarantees this).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostTestCase {
    /// Unique key within one source, including generic-argument backtick
    /// notation and nested-type `+` separators, exactly as discovery
    /// produced it.
    pub fully_qualified_name: String,
    /// Shown to the user as given; never re-escaped.
    pub display_name: String,
    /// Path of the source assembly the test lives in.
    pub source: String,
    pub code_file_path: Option<String>,
    pub line_number: Option<u32>,
    pub traits: Vec<TestTrait>,
    /// Marked to be excluded from normal runs unless specifically selected.
    pub explicit: bool,
}

/// The result of one finished test, as the host sees it.
///
/// Created fresh per received engine result event, never mutated after
/// construction, emitted once.
#[derive(Debug, Clone)]
pub struct HostTestResult {
    pub case: Arc<HostTestCase>,
    pub outcome: TestOutcome,
    pub duration: Duration,
    pub error_message: Option<String>,
    pub error_stack_trace: Option<String>,
    /// Derived from the first filtered stack frame that carries file info.
    pub error_file_path: Option<String>,
    pub error_line_number: Option<u32>,
    pub output: Vec<String>,
    pub attachments: Vec<String>,
}

/// Severity of an adapter message sent to the host log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Informational,
    Warning,
    Error,
}

/// Receives host-shaped records in engine-emitted order.
///
/// The bridge calls these synchronously from the engine's event dispatch, so
/// implementations must return quickly.
pub trait HostSink {
    /// Called once per test found during discovery.
    fn record_discovered(&mut self, _case: &Arc<HostTestCase>) {}

    /// Called when the engine starts a test.
    fn record_start(&mut self, case: &Arc<HostTestCase>);

    /// Called when the engine finishes a test.
    fn record_result(&mut self, result: &HostTestResult);

    /// Called for adapter diagnostics and engine-produced output.
    fn send_message(&mut self, _level: MessageLevel, _message: &str) {}
}
