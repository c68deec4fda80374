//! Console reporter: the default `HostSink` for command-line runs.

use std::sync::Arc;
use std::time::Duration;

use crate::host::{HostSink, HostTestCase, HostTestResult, MessageLevel};
use chasqui_core::outcome::TestOutcome;

/// Default console reporter.
#[derive(Default)]
pub struct ConsoleReporter {
    pub verbose: bool,
    passed: usize,
    failed: usize,
    skipped: usize,
    none: usize,
    discovered: usize,
}

impl ConsoleReporter {
    pub fn new(verbose: bool) -> Self {
        Self {
            verbose,
            ..Self::default()
        }
    }

    /// `true` if any test failed.
    pub fn saw_failures(&self) -> bool {
        self.failed > 0
    }

    pub fn discovered_count(&self) -> usize {
        self.discovered
    }

    /// Print the run summary line.
    pub fn finish(&self, duration: Duration) {
        eprintln!();

        let mut parts = Vec::new();
        if self.passed > 0 {
            parts.push(format!("\x1b[32m{} passed\x1b[0m", self.passed));
        }
        if self.failed > 0 {
            parts.push(format!("\x1b[31m{} failed\x1b[0m", self.failed));
        }
        if self.skipped > 0 {
            parts.push(format!("\x1b[33m{} skipped\x1b[0m", self.skipped));
        }
        if self.none > 0 {
            parts.push(format!("{} without outcome", self.none));
        }
        if parts.is_empty() {
            parts.push("no tests run".to_string());
        }

        eprintln!(
            "====== {} in {:.2}s ======",
            parts.join(", "),
            duration.as_secs_f64()
        );
    }
}

impl HostSink for ConsoleReporter {
    fn record_discovered(&mut self, case: &Arc<HostTestCase>) {
        self.discovered += 1;
        if self.verbose {
            match (&case.code_file_path, case.line_number) {
                (Some(file), Some(line)) => {
                    println!("{} ({}:{})", case.fully_qualified_name, file, line)
                }
                _ => println!("{}", case.fully_qualified_name),
            }
        } else {
            println!("{}", case.fully_qualified_name);
        }
    }

    fn record_start(&mut self, case: &Arc<HostTestCase>) {
        if self.verbose {
            eprint!("{} ... ", case.fully_qualified_name);
        }
    }

    fn record_result(&mut self, result: &HostTestResult) {
        let status = match result.outcome {
            TestOutcome::Passed => {
                self.passed += 1;
                format!(
                    "\x1b[32mPASSED\x1b[0m ({:.0}ms)",
                    result.duration.as_secs_f64() * 1000.0
                )
            }
            TestOutcome::Failed => {
                self.failed += 1;
                "\x1b[31mFAILED\x1b[0m".to_string()
            }
            TestOutcome::Skipped => {
                self.skipped += 1;
                match &result.error_message {
                    Some(reason) => format!("\x1b[33mSKIPPED\x1b[0m ({})", reason),
                    None => "\x1b[33mSKIPPED\x1b[0m".to_string(),
                }
            }
            TestOutcome::None => {
                self.none += 1;
                "NO OUTCOME".to_string()
            }
        };

        if self.verbose {
            eprintln!("{}", status);
        } else {
            eprintln!("{} {}", result.case.fully_qualified_name, status);
        }

        if result.outcome == TestOutcome::Failed {
            if let Some(message) = &result.error_message {
                eprintln!("\x1b[31m{}\x1b[0m", message);
            }
            if let Some(trace) = &result.error_stack_trace {
                eprintln!("{}", trace);
            }
            if let (Some(file), Some(line)) =
                (&result.error_file_path, result.error_line_number)
            {
                eprintln!("    at {}:{}", file, line);
            }
        }
    }

    fn send_message(&mut self, level: MessageLevel, message: &str) {
        match level {
            MessageLevel::Informational => {
                if self.verbose {
                    eprintln!("{}", message);
                }
            }
            MessageLevel::Warning => eprintln!("\x1b[33mwarning:\x1b[0m {}", message),
            MessageLevel::Error => eprintln!("\x1b[31merror:\x1b[0m {}", message),
        }
    }
}
