//! Navigation data: source file/line resolution for discovered tests.
//!
//! Resolving a compiled method to its source location needs debug symbols
//! and is owned by an external collaborator. The core only depends on the
//! [`NavigationProvider`] capability; implementations differ in isolation
//! strategy (in-process lookup, out-of-process sandbox, canned data), and
//! the collaborator selects one.
//!
//! Resolution failure is always non-fatal: a test case without navigation
//! data simply has no file/line.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Source location for a compiled method.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NavigationData {
    pub file_path: String,
    pub line_number: u32,
}

/// Errors raised by a navigation lookup. Callers treat these as "no data".
#[derive(Debug, Error)]
pub enum NavigationError {
    #[error("failed to read navigation sidecar '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed navigation sidecar '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Resolve source locations keyed by (assembly, classname, methodname).
pub trait NavigationProvider {
    fn navigation_data(
        &self,
        assembly: &Path,
        classname: &str,
        methodname: &str,
    ) -> Result<Option<NavigationData>, NavigationError>;
}

/// A provider that never resolves anything.
pub struct NoNavigation;

impl NavigationProvider for NoNavigation {
    fn navigation_data(
        &self,
        _assembly: &Path,
        _classname: &str,
        _methodname: &str,
    ) -> Result<Option<NavigationData>, NavigationError> {
        Ok(None)
    }
}

/// One entry in a navigation sidecar file.
#[derive(Debug, Deserialize)]
struct SidecarEntry {
    classname: String,
    methodname: String,
    #[serde(flatten)]
    data: NavigationData,
}

/// Navigation data loaded from a per-assembly JSON sidecar
/// (`<assembly>.navdata.json`), produced by the engine's inspection tooling.
///
/// Sidecars are loaded lazily, once per assembly; a missing sidecar means no
/// navigation data for that assembly.
#[derive(Default)]
pub struct SidecarNavigation {
    // Keyed by assembly path; the core is single-threaded, so a RefCell is
    // enough for the lazy load.
    loaded: RefCell<HashMap<PathBuf, HashMap<(String, String), NavigationData>>>,
}

impl SidecarNavigation {
    pub fn new() -> Self {
        Self::default()
    }

    fn sidecar_path(assembly: &Path) -> PathBuf {
        let mut name = assembly.file_name().unwrap_or_default().to_os_string();
        name.push(".navdata.json");
        assembly.with_file_name(name)
    }

    fn load(path: &Path) -> Result<HashMap<(String, String), NavigationData>, NavigationError> {
        if !path.exists() {
            return Ok(HashMap::new());
        }
        let text = fs::read_to_string(path).map_err(|source| NavigationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let entries: Vec<SidecarEntry> =
            serde_json::from_str(&text).map_err(|source| NavigationError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(entries
            .into_iter()
            .map(|e| ((e.classname, e.methodname), e.data))
            .collect())
    }
}

impl NavigationProvider for SidecarNavigation {
    fn navigation_data(
        &self,
        assembly: &Path,
        classname: &str,
        methodname: &str,
    ) -> Result<Option<NavigationData>, NavigationError> {
        let mut loaded = self.loaded.borrow_mut();
        if !loaded.contains_key(assembly) {
            let sidecar = Self::sidecar_path(assembly);
            let entries = Self::load(&sidecar)?;
            debug!(
                assembly = %assembly.display(),
                entries = entries.len(),
                "loaded navigation sidecar"
            );
            loaded.insert(assembly.to_path_buf(), entries);
        }

        Ok(loaded
            .get(assembly)
            .and_then(|map| map.get(&(classname.to_string(), methodname.to_string())))
            .cloned())
    }
}
