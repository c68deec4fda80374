//! Stack-trace filtering and source-location extraction.
//!
//! Engine stack traces are multi-line, one frame per line, in the shape
//! `at Namespace.Type.Method(args) in /path/file:line N` (the `in …` part is
//! present only when debug symbols resolved). Frames raised inside the test
//! framework's own namespaces carry no user information and are dropped; the
//! first remaining frame that carries file info becomes the host's error
//! file/line.

use std::sync::LazyLock;

use regex::Regex;

/// Frame shape: `at <site>` optionally followed by `in <file>:line <n>`.
static FRAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*at\s+(?P<site>.+?)(?:\s+in\s+(?P<file>.+?):line\s+(?P<line>\d+))?\s*$")
        .expect("frame pattern")
});

/// Namespaces the framework raises assertion/runner frames from.
const FRAMEWORK_FRAME_PREFIXES: &[&str] = &["Quipu.Framework.", "Quipu.Engine."];

/// A parsed source location from a stack frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameLocation {
    pub file_path: String,
    pub line_number: u32,
}

/// Drop framework-internal frames from a raw stack trace.
///
/// Lines that are not frames (runtime separators, wrapped messages) are kept
/// as-is; only recognizable frames from the framework's own namespaces are
/// removed.
pub fn filter_stack_trace(raw: &str) -> String {
    raw.lines()
        .filter(|line| !is_framework_frame(line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Find the first frame that carries file info.
pub fn first_file_location(stack_trace: &str) -> Option<FrameLocation> {
    stack_trace.lines().find_map(|line| {
        let captures = FRAME.captures(line)?;
        let file = captures.name("file")?;
        let line_number = captures.name("line")?.as_str().parse::<u32>().ok()?;
        Some(FrameLocation {
            file_path: file.as_str().to_string(),
            line_number,
        })
    })
}

fn is_framework_frame(line: &str) -> bool {
    let Some(captures) = FRAME.captures(line) else {
        return false;
    };
    let site = &captures["site"];
    FRAMEWORK_FRAME_PREFIXES
        .iter()
        .any(|prefix| site.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRACE: &str = "\
  at Quipu.Framework.Assert.AreEqual(Int32 expected, Int32 actual)
  at My.Tests.Calculator.Adds()
  at My.Tests.Helpers.Run(Action body) in /work/src/Helpers.cs:line 29
  at Quipu.Engine.Runner.Execute()";

    #[test]
    fn test_framework_frames_dropped() {
        let filtered = filter_stack_trace(TRACE);
        assert!(!filtered.contains("Quipu.Framework"));
        assert!(!filtered.contains("Quipu.Engine"));
        assert!(filtered.contains("My.Tests.Calculator.Adds"));
        assert!(filtered.contains("My.Tests.Helpers.Run"));
    }

    #[test]
    fn test_first_file_location_skips_fileless_frames() {
        // The first remaining frame has no file info; the one after does.
        let filtered = filter_stack_trace(TRACE);
        let location = first_file_location(&filtered).unwrap();
        assert!(location.file_path.ends_with("Helpers.cs"));
        assert_eq!(location.line_number, 29);
    }

    #[test]
    fn test_no_file_info_anywhere() {
        let filtered = filter_stack_trace("  at My.Tests.A()\n  at My.Tests.B()");
        assert_eq!(first_file_location(&filtered), None);
        assert_eq!(filtered.lines().count(), 2);
    }

    #[test]
    fn test_non_frame_lines_kept() {
        let raw = "--- End of inner exception stack trace ---\n  at My.Tests.A()";
        let filtered = filter_stack_trace(raw);
        assert_eq!(filtered.lines().count(), 2);
    }

    #[test]
    fn test_windows_paths() {
        let trace = r"  at My.Tests.X() in C:\src\X.cs:line 29";
        let location = first_file_location(trace).unwrap();
        assert_eq!(location.file_path, r"C:\src\X.cs");
        assert_eq!(location.line_number, 29);
    }
}
