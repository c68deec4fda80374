//! Run settings consumed (not owned) by the adapter core.
//!
//! The surrounding shell loads these once — from a JSON settings file or from
//! host-provided defaults — and hands them to the orchestrator read-only.
//!
//! ## Examples
//! ```rust
//! use chasqui_core::settings::{DiscoveryMethod, RunSettings};
//!
//! let settings: RunSettings =
//!     serde_json::from_str(r#"{ "assembly-select-limit": 50 }"#).unwrap();
//! assert_eq!(settings.assembly_select_limit, 50);
//! assert_eq!(settings.discovery_method, DiscoveryMethod::Current);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

/// Which discovery/filter-resolution pipeline to use.
///
/// `Legacy` is frozen: it predates the fully-qualified-name fast path and the
/// select-limit safeguard, and is kept only for settings compatibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DiscoveryMethod {
    #[default]
    Current,
    Legacy,
}

/// Policy for tests marked explicit.
///
/// Under `Strict`, a normal (non-explicit) run combines the resolved filter
/// with an exclude-explicit sub-filter whenever the filter selects by
/// category/property rather than by name. Under `None`, explicit marks are
/// left to the engine's own defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExplicitMode {
    #[default]
    Strict,
    None,
}

/// The read-only settings bundle handed to the orchestrator.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct RunSettings {
    pub discovery_method: DiscoveryMethod,
    pub explicit_mode: ExplicitMode,
    /// Ceiling on the clause count of a name-list filter. A larger selection
    /// degrades to a no-tests sentinel for that assembly instead of passing
    /// an oversized filter to the engine.
    pub assembly_select_limit: usize,
    /// Treat the host filter string as engine filter XML, skipping translation.
    pub use_native_filter: bool,
    /// IDE (design) mode: an empty host filter means "run everything passed in".
    /// Batch mode additionally consults the raw host filter object.
    pub design_mode: bool,
    /// Where to dump the engine's run report after a completed run.
    pub test_output_xml: Option<PathBuf>,
    /// Engine executable to launch; `None` means the `quipu-engine` on PATH.
    pub engine_command: Option<PathBuf>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            discovery_method: DiscoveryMethod::default(),
            explicit_mode: ExplicitMode::default(),
            assembly_select_limit: 2000,
            use_native_filter: false,
            design_mode: false,
            test_output_xml: None,
            engine_command: None,
        }
    }
}

/// Errors raised while loading a settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed settings file '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RunSettings {
    /// Load settings from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}
