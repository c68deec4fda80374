//! Streaming event bridge: engine events in, host records out.
//!
//! One bridge instance lives for one assembly's execution. The engine calls
//! back synchronously for every event; the bridge converts and forwards each
//! one immediately, in emission order, with no buffering or reordering and
//! at-most-once delivery (the engine does not replay).
//!
//! State machine: `Idle → Running → (Cancelled | Completed)`.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::cancellation::CancellationToken;
use crate::convert::{TestConverter, stacktrace};
use crate::engine::events::{
    self, EngineEvent, SuiteResult, TestCaseResult, TestOutput, TestStart,
};
use crate::host::{HostSink, HostTestCase, HostTestResult, MessageLevel};
use chasqui_core::outcome::{RunState, TestOutcome};

/// Lifecycle phase of one assembly's execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Running,
    Cancelled,
    Completed,
}

/// Converts and forwards the engine's live event stream for one assembly.
pub struct EventBridge<'s, 'n, S: HostSink> {
    sink: &'s mut S,
    converter: TestConverter<'n>,
    cancellation: CancellationToken,
    phase: RunPhase,
    /// Started but not yet finished, in start order. A suite-level setup
    /// failure closes these out.
    in_flight: Vec<(String, Arc<HostTestCase>)>,
}

impl<'s, 'n, S: HostSink> EventBridge<'s, 'n, S> {
    pub fn new(
        sink: &'s mut S,
        converter: TestConverter<'n>,
        cancellation: CancellationToken,
    ) -> Self {
        Self {
            sink,
            converter,
            cancellation,
            phase: RunPhase::Idle,
            in_flight: Vec::new(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    /// Mark the engine `run` call as issued.
    pub fn begin(&mut self) {
        if self.phase == RunPhase::Idle {
            self.phase = RunPhase::Running;
        }
    }

    /// Mark the engine `run` call as returned normally.
    pub fn complete(&mut self) {
        if self.phase == RunPhase::Running {
            self.phase = RunPhase::Completed;
        }
    }

    /// Handle one raw event document from the engine.
    pub fn on_raw_event(&mut self, xml: &str) {
        if self.cancellation.is_cancelled() {
            // The host asked to stop; drop everything still arriving from
            // the interrupted engine call.
            self.phase = RunPhase::Cancelled;
            return;
        }

        match events::parse_event(xml) {
            Ok(EngineEvent::TestStarted(start)) => self.on_test_started(start),
            Ok(EngineEvent::TestFinished(result)) => self.on_test_finished(result),
            Ok(EngineEvent::SuiteStarted(_)) => {}
            Ok(EngineEvent::SuiteFinished(suite)) => self.on_suite_finished(suite),
            Ok(EngineEvent::Output(output)) => self.on_output(output),
            Ok(EngineEvent::Unknown { element }) => {
                debug!(%element, "ignoring unmodelled engine event");
            }
            Err(error) => {
                warn!(%error, "dropping malformed engine event");
                self.sink.send_message(
                    MessageLevel::Warning,
                    &format!("dropped a malformed engine event: {error}"),
                );
            }
        }
    }

    fn on_test_started(&mut self, start: TestStart) {
        let case = self
            .converter
            .host_case(&start.identity, &start.name, RunState::default(), &[]);
        self.in_flight
            .push((start.identity.id.clone(), case.clone()));
        self.sink.record_start(&case);
    }

    fn on_test_finished(&mut self, result: TestCaseResult) {
        self.in_flight.retain(|(id, _)| *id != result.identity.id);
        let host_result = self.converter.host_result(&result);
        self.sink.record_result(&host_result);
    }

    /// Suite results are bookkeeping, never host test events. A suite-level
    /// setup failure closes out every started-but-unfinished case with the
    /// suite's failure message.
    fn on_suite_finished(&mut self, suite: SuiteResult) {
        if TestOutcome::from(suite.outcome) != TestOutcome::Failed {
            return;
        }
        let message = suite
            .failure
            .as_ref()
            .and_then(|f| f.message.clone())
            .or_else(|| suite.reason.clone());
        let Some(message) = message else {
            return;
        };

        self.sink.send_message(
            MessageLevel::Warning,
            &format!("suite {} failed: {}", suite.fullname, message),
        );

        let stack_trace = suite
            .failure
            .as_ref()
            .and_then(|f| f.stack_trace.as_deref())
            .map(stacktrace::filter_stack_trace);

        for (_, case) in std::mem::take(&mut self.in_flight) {
            let result = HostTestResult {
                case,
                outcome: TestOutcome::Failed,
                duration: Duration::ZERO,
                error_message: Some(message.clone()),
                error_stack_trace: stack_trace.clone(),
                error_file_path: None,
                error_line_number: None,
                output: Vec::new(),
                attachments: Vec::new(),
            };
            self.sink.record_result(&result);
        }
    }

    fn on_output(&mut self, output: TestOutput) {
        self.sink
            .send_message(MessageLevel::Informational, &output.text);
    }
}

// ============================================================================
// TESTS
// ============================================================================
