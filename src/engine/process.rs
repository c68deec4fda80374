//! Engine client that launches the engine executable.
//!
//! The engine is observed as one blocking process invocation per assembly:
//!
//! - `quipu-engine explore <assembly> --filter <xml>` prints the discovery
//!   document on stdout.
//! - `quipu-engine run <assembly> --filter <xml>` prints one event document
//!   per line on stdout while running; the final line is the run report
//!   (`<test-run …>`).
//!
//! Exit status 2 means the file is not a test assembly; any other non-zero
//! status is an engine fault.

use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::debug;

use super::{EngineError, NativeEngine};
use chasqui_core::settings::RunSettings;

/// Exit status the engine uses for files it cannot load as test assemblies.
const EXIT_UNSUPPORTED_BINARY: i32 = 2;

const DEFAULT_ENGINE_COMMAND: &str = "quipu-engine";

/// A [`NativeEngine`] backed by the engine executable.
pub struct ProcessEngine {
    command: PathBuf,
}

impl ProcessEngine {
    pub fn new(command: impl Into<PathBuf>) -> Self {
        Self {
            command: command.into(),
        }
    }

    /// Use the engine configured in the settings, or the default from PATH.
    pub fn from_settings(settings: &RunSettings) -> Self {
        match &settings.engine_command {
            Some(command) => Self::new(command.clone()),
            None => Self::new(DEFAULT_ENGINE_COMMAND),
        }
    }

    fn classify_exit(status: std::process::ExitStatus, stderr: &str, assembly: &Path) -> EngineError {
        if status.code() == Some(EXIT_UNSUPPORTED_BINARY) {
            EngineError::UnsupportedBinary(assembly.display().to_string())
        } else {
            EngineError::Fault(if stderr.trim().is_empty() {
                format!("engine exited with {status}")
            } else {
                stderr.trim().to_string()
            })
        }
    }
}

impl NativeEngine for ProcessEngine {
    fn discover(&mut self, assembly: &Path, filter_xml: &str) -> Result<String, EngineError> {
        debug!(engine = %self.command.display(), assembly = %assembly.display(), "exploring assembly");

        let output = Command::new(&self.command)
            .arg("explore")
            .arg(assembly)
            .arg("--filter")
            .arg(filter_xml)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Self::classify_exit(output.status, &stderr, assembly));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    fn run(
        &mut self,
        assembly: &Path,
        filter_xml: &str,
        on_event: &mut dyn FnMut(&str),
    ) -> Result<String, EngineError> {
        debug!(engine = %self.command.display(), assembly = %assembly.display(), "running assembly");

        let mut child = Command::new(&self.command)
            .arg("run")
            .arg(assembly)
            .arg("--filter")
            .arg(filter_xml)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| EngineError::Protocol("engine stdout was not captured".to_string()))?;

        let mut report = String::new();
        for line in BufReader::new(stdout).lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if line.starts_with("<test-run") {
                report = line.to_string();
            } else {
                on_event(line);
            }
        }

        let mut stderr = String::new();
        if let Some(mut pipe) = child.stderr.take() {
            let _ = pipe.read_to_string(&mut stderr);
        }

        let status = child.wait()?;
        if !status.success() {
            return Err(Self::classify_exit(status, &stderr, assembly));
        }
        if !stderr.trim().is_empty() {
            debug!(stderr = %stderr.trim(), "engine chatter on stderr");
        }

        Ok(report)
    }
}
