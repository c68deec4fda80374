#![forbid(unsafe_code)]
//! chasqui — bridge the Quipu test engine to host test platforms.
//!
//! The adapter discovers tests in compiled assemblies, translates host filter
//! expressions into the engine's filter dialect, drives the engine's
//! streaming-event execution, and converts each engine event into host-shaped
//! test records, preserving ordering, explicit/skip semantics, and failure
//! detail in both directions.
//!
//! ## Panic Policy
//!
//! This codebase follows explicit error handling:
//!
//! - **Production code**: Use `Result` or `Option` with `?` / `ok_or` / `map_err`. The `cli` module enforces
//!   `#![deny(clippy::unwrap_used)]`.
//!
//! - **Test code**: `.unwrap()` and `.expect()` are acceptable in tests.
//!
//! - **True invariants**: If a panic represents an adapter bug (logic error), use `.expect("reason")` with a
//!   clear explanation.

pub mod bridge;
pub mod cancellation;
pub mod cli;
pub mod convert;
pub mod engine;
pub mod host;
pub mod navigation;
pub mod orchestrator;

pub use bridge::{EventBridge, RunPhase};
pub use cancellation::CancellationToken;
pub use convert::TestConverter;
pub use engine::{EngineError, NativeEngine};
pub use host::{HostSink, HostTestCase, HostTestResult, MessageLevel, TestTrait};
pub use navigation::{NavigationData, NavigationProvider, NoNavigation, SidecarNavigation};
pub use orchestrator::{Orchestrator, RunRequest};
