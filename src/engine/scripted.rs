//! Canned-response engine for tests and dry runs.
//!
//! Replays a fixed discovery document and a fixed event sequence, recording
//! the filters it was invoked with so callers can assert on filter
//! resolution. Can be told to fault mid-run or to reject the assembly as an
//! unsupported binary.

use std::path::Path;

use super::{EngineError, NativeEngine};

/// A [`NativeEngine`] that replays scripted responses.
#[derive(Default)]
pub struct ScriptedEngine {
    discovery: String,
    events: Vec<String>,
    report: String,
    /// Fault with this message after emitting `fault_after` events.
    fault: Option<(usize, String)>,
    unsupported: bool,
    /// Filters passed to `discover`, in call order.
    pub discover_filters: Vec<String>,
    /// Filters passed to `run`, in call order.
    pub run_filters: Vec<String>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_discovery(mut self, xml: impl Into<String>) -> Self {
        self.discovery = xml.into();
        self
    }

    pub fn with_events<I, S>(mut self, events: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.events = events.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_report(mut self, xml: impl Into<String>) -> Self {
        self.report = xml.into();
        self
    }

    /// Fault with `message` after emitting `events_before` events.
    pub fn faulting_after(mut self, events_before: usize, message: impl Into<String>) -> Self {
        self.fault = Some((events_before, message.into()));
        self
    }

    /// Reject every assembly as not-a-test-assembly.
    pub fn unsupported(mut self) -> Self {
        self.unsupported = true;
        self
    }
}

impl NativeEngine for ScriptedEngine {
    fn discover(&mut self, assembly: &Path, filter_xml: &str) -> Result<String, EngineError> {
        self.discover_filters.push(filter_xml.to_string());
        if self.unsupported {
            return Err(EngineError::UnsupportedBinary(
                assembly.display().to_string(),
            ));
        }
        Ok(self.discovery.clone())
    }

    fn run(
        &mut self,
        assembly: &Path,
        filter_xml: &str,
        on_event: &mut dyn FnMut(&str),
    ) -> Result<String, EngineError> {
        self.run_filters.push(filter_xml.to_string());
        if self.unsupported {
            return Err(EngineError::UnsupportedBinary(
                assembly.display().to_string(),
            ));
        }

        for (index, event) in self.events.iter().enumerate() {
            if let Some((fault_after, message)) = &self.fault {
                if index == *fault_after {
                    return Err(EngineError::Fault(message.clone()));
                }
            }
            on_event(event);
        }
        if let Some((fault_after, message)) = &self.fault {
            if *fault_after >= self.events.len() {
                return Err(EngineError::Fault(message.clone()));
            }
        }

        Ok(self.report.clone())
    }
}
