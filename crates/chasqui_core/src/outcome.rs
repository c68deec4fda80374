//! Outcome and run-state vocabulary for both sides of the bridge.
//!
//! The engine reports results through a `result` attribute, refined by an
//! optional `label` attribute; the host understands a four-value outcome.
//! The mapping between the two lives here so the converter and the reporters
//! agree on it.

use std::fmt;

/// The engine's result vocabulary, as reported on `test-case`/`test-suite`
/// result nodes (`result` attribute, refined by `label`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeOutcome {
    Success,
    Failure,
    /// A failure raised outside an assertion (unhandled error).
    Error,
    /// The run was stopped before this test completed.
    Cancelled,
    Inconclusive,
    /// The test is malformed and can never run.
    NotRunnable,
    Skipped,
    /// Skipped because the test is marked ignored.
    Ignored,
}

impl NativeOutcome {
    /// Resolve the `result`/`label` attribute pair into an outcome.
    ///
    /// Unrecognized combinations resolve to [`NativeOutcome::Inconclusive`],
    /// which the host mapping treats as "no outcome".
    pub fn from_attributes(result: &str, label: Option<&str>) -> Self {
        match (result, label) {
            ("Passed", _) => NativeOutcome::Success,
            ("Failed", Some("Error")) => NativeOutcome::Error,
            ("Failed", Some("Cancelled")) => NativeOutcome::Cancelled,
            ("Failed", Some("Invalid")) | ("Failed", Some("NotRunnable")) => {
                NativeOutcome::NotRunnable
            }
            ("Failed", _) => NativeOutcome::Failure,
            ("Skipped", Some("Ignored")) => NativeOutcome::Ignored,
            ("Skipped", _) => NativeOutcome::Skipped,
            ("Inconclusive", _) => NativeOutcome::Inconclusive,
            _ => NativeOutcome::Inconclusive,
        }
    }
}

/// The host's outcome vocabulary for a finished test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TestOutcome {
    /// No meaningful outcome (cancelled or inconclusive).
    #[default]
    None,
    Passed,
    Failed,
    Skipped,
}

impl From<NativeOutcome> for TestOutcome {
    fn from(native: NativeOutcome) -> Self {
        match native {
            NativeOutcome::Success => TestOutcome::Passed,
            NativeOutcome::Failure | NativeOutcome::Error | NativeOutcome::NotRunnable => {
                TestOutcome::Failed
            }
            NativeOutcome::Cancelled | NativeOutcome::Inconclusive => TestOutcome::None,
            NativeOutcome::Skipped | NativeOutcome::Ignored => TestOutcome::Skipped,
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TestOutcome::None => "None",
            TestOutcome::Passed => "Passed",
            TestOutcome::Failed => "Failed",
            TestOutcome::Skipped => "Skipped",
        };
        write!(f, "{}", s)
    }
}

/// The engine's `runstate` attribute on discovered tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum RunState {
    #[default]
    Runnable,
    NotRunnable,
    /// Excluded from normal runs unless specifically selected.
    Explicit,
    Skipped,
    Ignored,
}

impl RunState {
    /// Parse a `runstate` attribute value; unknown values read as runnable.
    pub fn from_attribute(value: &str) -> Self {
        match value {
            "NotRunnable" => RunState::NotRunnable,
            "Explicit" => RunState::Explicit,
            "Skipped" => RunState::Skipped,
            "Ignored" => RunState::Ignored,
            _ => RunState::Runnable,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_result_label_resolution() {
        assert_eq!(
            NativeOutcome::from_attributes("Passed", None),
            NativeOutcome::Success
        );
        assert_eq!(
            NativeOutcome::from_attributes("Failed", Some("Error")),
            NativeOutcome::Error
        );
        assert_eq!(
            NativeOutcome::from_attributes("Failed", Some("Invalid")),
            NativeOutcome::NotRunnable
        );
        assert_eq!(
            NativeOutcome::from_attributes("Skipped", Some("Ignored")),
            NativeOutcome::Ignored
        );
        assert_eq!(
            NativeOutcome::from_attributes("Skipped", None),
            NativeOutcome::Skipped
        );
    }

    #[test]
    fn test_host_mapping() {
        assert_eq!(TestOutcome::from(NativeOutcome::Success), TestOutcome::Passed);
        assert_eq!(TestOutcome::from(NativeOutcome::Failure), TestOutcome::Failed);
        assert_eq!(TestOutcome::from(NativeOutcome::Error), TestOutcome::Failed);
        assert_eq!(
            TestOutcome::from(NativeOutcome::NotRunnable),
            TestOutcome::Failed
        );
        assert_eq!(TestOutcome::from(NativeOutcome::Cancelled), TestOutcome::None);
        assert_eq!(
            TestOutcome::from(NativeOutcome::Inconclusive),
            TestOutcome::None
        );
        assert_eq!(
            TestOutcome::from(NativeOutcome::Skipped),
            TestOutcome::Skipped
        );
        assert_eq!(
            TestOutcome::from(NativeOutcome::Ignored),
            TestOutcome::Skipped
        );
    }

    #[test]
    fn test_runstate_parsing() {
        assert_eq!(RunState::from_attribute("Explicit"), RunState::Explicit);
        assert_eq!(RunState::from_attribute("Runnable"), RunState::Runnable);
        assert_eq!(RunState::from_attribute("anything"), RunState::Runnable);
    }
}
