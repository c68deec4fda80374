//! Native engine boundary.
//!
//! The adapter observes the Quipu engine as one blocking call per assembly:
//! `discover` returns a test tree document, `run` streams event documents
//! through a callback and returns the final run report. Process management,
//! isolation, and symbol handling live behind this boundary, not in the core.
//!
//! ## Modules
//!
//! - `events` - typed ingestion of the engine's XML event stream
//! - `process` - engine client launching the `quipu-engine` executable
//! - `scripted` - canned-response engine for tests and dry runs

pub mod events;
pub mod process;
pub mod scripted;

use std::path::Path;

use thiserror::Error;

/// Errors surfaced by a native engine implementation.
#[derive(Debug, Error)]
pub enum EngineError {
    /// An internal engine fault. When the run was cancelled mid-flight this
    /// is the expected way for the interrupted call to end.
    #[error("engine fault: {0}")]
    Fault(String),

    /// The file is not a test assembly (wrong binary format). The caller
    /// skips it silently.
    #[error("`{0}` is not a test assembly")]
    UnsupportedBinary(String),

    #[error("failed to launch the engine: {0}")]
    Io(#[from] std::io::Error),

    /// The engine answered, but not in the expected protocol shape.
    #[error("malformed engine response: {0}")]
    Protocol(String),
}

/// A blocking test engine.
///
/// `run` invokes `on_event` synchronously, on the engine's own dispatch
/// context, once per emitted event and in emission order; callbacks must
/// return quickly.
pub trait NativeEngine {
    /// Discover the tests in `assembly` selected by `filter_xml`.
    /// Returns the engine's discovery document (a `<test-suite>` tree).
    fn discover(&mut self, assembly: &Path, filter_xml: &str) -> Result<String, EngineError>;

    /// Run the tests in `assembly` selected by `filter_xml`, forwarding each
    /// event document to `on_event`. Returns the final run report document.
    fn run(
        &mut self,
        assembly: &Path,
        filter_xml: &str,
        on_event: &mut dyn FnMut(&str),
    ) -> Result<String, EngineError>;
}
