//! Bidirectional mapping between engine XML records and host objects.
//!
//! Discovery direction: engine test nodes become [`HostTestCase`]s, with
//! source file/line resolved through the injected navigation provider
//! (failures are non-fatal). Cases are cached by fully-qualified name for
//! the lifetime of one run, so repeated sightings of the same test — at
//! discovery and again at execution — return the identical `Arc`; the host
//! correlates start/result pairs by that identity.
//!
//! Result direction: engine result nodes become [`HostTestResult`]s with the
//! outcome mapping, exact duration conversion, and filtered stack traces.
//!
//! ## Modules
//!
//! - `stacktrace` - frame filtering and source-location extraction

pub mod stacktrace;

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::engine::events::TestCaseResult;
use crate::host::{HostTestCase, HostTestResult, TestTrait};
use crate::navigation::NavigationProvider;
use chasqui_core::identity::NativeTestIdentity;
use chasqui_core::outcome::{RunState, TestOutcome};

/// Per-run cache of host test cases.
///
/// Owned by the run context and discarded with it; identity never leaks
/// across unrelated runs of the same assembly. Keyed by fully-qualified name
/// (the host key) with an engine-id index on the side, since execution
/// events correlate by the engine's discovery-time ids.
#[derive(Default)]
pub struct TestCaseCache {
    by_fqn: HashMap<String, Arc<HostTestCase>>,
    id_to_fqn: HashMap<String, String>,
}

impl TestCaseCache {
    pub fn lookup(&self, fully_qualified_name: &str) -> Option<Arc<HostTestCase>> {
        self.by_fqn.get(fully_qualified_name).cloned()
    }

    pub fn lookup_by_id(&self, id: &str) -> Option<Arc<HostTestCase>> {
        self.id_to_fqn.get(id).and_then(|fqn| self.lookup(fqn))
    }

    fn insert(&mut self, id: &str, case: Arc<HostTestCase>) {
        self.id_to_fqn
            .insert(id.to_string(), case.fully_qualified_name.clone());
        self.by_fqn
            .insert(case.fully_qualified_name.clone(), case);
    }

    pub fn len(&self) -> usize {
        self.by_fqn.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_fqn.is_empty()
    }
}

/// Converts engine records to host objects for one assembly's run.
pub struct TestConverter<'a> {
    assembly: PathBuf,
    navigation: &'a dyn NavigationProvider,
    cache: TestCaseCache,
}

impl<'a> TestConverter<'a> {
    pub fn new(assembly: impl Into<PathBuf>, navigation: &'a dyn NavigationProvider) -> Self {
        Self {
            assembly: assembly.into(),
            navigation,
            cache: TestCaseCache::default(),
        }
    }

    pub fn cache(&self) -> &TestCaseCache {
        &self.cache
    }

    /// Resolve (or create and cache) the host case for an engine test.
    ///
    /// Repeated calls for the same fully-qualified name return the identical
    /// `Arc`, regardless of which event carried the identity.
    pub fn host_case(
        &mut self,
        identity: &NativeTestIdentity,
        name: &str,
        run_state: RunState,
        properties: &[(String, String)],
    ) -> Arc<HostTestCase> {
        if let Some(existing) = self.cache.lookup(&identity.fullname) {
            // Later events may carry a different engine id for the same name;
            // keep the id index current either way.
            self.cache.insert(&identity.id, existing.clone());
            return existing;
        }

        let location = self.resolve_navigation(identity);
        let display_name = if name.is_empty() {
            identity.fullname.clone()
        } else {
            name.to_string()
        };

        let explicit = run_state == RunState::Explicit
            || properties
                .iter()
                .any(|(key, value)| key == "Explicit" && value != "false");

        let case = Arc::new(HostTestCase {
            fully_qualified_name: identity.fullname.clone(),
            display_name,
            source: self.assembly.display().to_string(),
            code_file_path: location.as_ref().map(|l| l.file_path.clone()),
            line_number: location.as_ref().map(|l| l.line_number),
            traits: properties
                .iter()
                .map(|(key, value)| TestTrait {
                    key: key.clone(),
                    value: value.clone(),
                })
                .collect(),
            explicit,
        });

        self.cache.insert(&identity.id, case.clone());
        case
    }

    /// Convert a terminal engine result into a host result.
    ///
    /// The case is taken from the cache when the test was seen before
    /// (discovery or `start-test`); otherwise it is created lazily here.
    pub fn host_result(&mut self, result: &TestCaseResult) -> HostTestResult {
        let case = self
            .cache
            .lookup_by_id(&result.identity.id)
            .unwrap_or_else(|| {
                self.host_case(
                    &result.identity,
                    &result.name,
                    result.run_state,
                    &result.properties,
                )
            });

        let outcome = TestOutcome::from(result.outcome);

        let error_message = match &result.failure {
            Some(failure) => failure.message.clone(),
            None => match outcome {
                TestOutcome::Skipped | TestOutcome::None => result.reason.clone(),
                _ => None,
            },
        };

        let (error_stack_trace, error_file_path, error_line_number) = match result
            .failure
            .as_ref()
            .and_then(|f| f.stack_trace.as_deref())
        {
            Some(raw) => {
                let filtered = stacktrace::filter_stack_trace(raw);
                let location = stacktrace::first_file_location(&filtered);
                (
                    Some(filtered),
                    location.as_ref().map(|l| l.file_path.clone()),
                    location.map(|l| l.line_number),
                )
            }
            None => (None, None, None),
        };

        HostTestResult {
            case,
            outcome,
            duration: exact_duration(result.duration_secs),
            error_message,
            error_stack_trace,
            error_file_path,
            error_line_number,
            output: result.output.clone(),
            attachments: result.attachments.clone(),
        }
    }

    fn resolve_navigation(
        &self,
        identity: &NativeTestIdentity,
    ) -> Option<crate::navigation::NavigationData> {
        let (classname, methodname) =
            (identity.classname.as_deref()?, identity.methodname.as_deref()?);
        match self
            .navigation
            .navigation_data(&self.assembly, classname, methodname)
        {
            Ok(data) => data,
            Err(error) => {
                debug!(
                    %classname,
                    %methodname,
                    %error,
                    "navigation lookup failed; leaving file/line unset"
                );
                None
            }
        }
    }
}

/// Engine seconds (float) to host duration, exact to floating-point
/// precision. Malformed values read as zero.
fn exact_duration(seconds: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or(Duration::ZERO)
}

// ============================================================================
// TESTS
// ============================================================================
