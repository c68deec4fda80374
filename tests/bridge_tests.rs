//! End-to-end tests: scripted engine → bridge → host sink.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chasqui::cancellation::CancellationToken;
use chasqui::engine::scripted::ScriptedEngine;
use chasqui::host::{HostSink, HostTestCase, HostTestResult, MessageLevel};
use chasqui::navigation::NoNavigation;
use chasqui::orchestrator::{Orchestrator, RunRequest};
use chasqui_core::outcome::TestOutcome;
use chasqui_core::settings::RunSettings;

/// Records every sink call, preserving order across call kinds.
#[derive(Default)]
struct RecordingSink {
    events: Vec<Event>,
}

#[derive(Debug, Clone)]
enum Event {
    Start(Arc<HostTestCase>),
    Result(Box<HostTestResult>),
    Message(MessageLevel, String),
}

impl HostSink for RecordingSink {
    fn record_start(&mut self, case: &Arc<HostTestCase>) {
        self.events.push(Event::Start(case.clone()));
    }

    fn record_result(&mut self, result: &HostTestResult) {
        self.events.push(Event::Result(Box::new(result.clone())));
    }

    fn send_message(&mut self, level: MessageLevel, message: &str) {
        self.events.push(Event::Message(level, message.to_string()));
    }
}

impl RecordingSink {
    fn results(&self) -> Vec<&HostTestResult> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Result(r) => Some(r.as_ref()),
                _ => None,
            })
            .collect()
    }

    fn starts(&self) -> Vec<&Arc<HostTestCase>> {
        self.events
            .iter()
            .filter_map(|e| match e {
                Event::Start(c) => Some(c),
                _ => None,
            })
            .collect()
    }
}

fn run_with_events(events: Vec<&str>) -> RecordingSink {
    let settings = RunSettings::default();
    let mut engine = ScriptedEngine::new()
        .with_events(events)
        .with_report("<test-run/>");
    let mut sink = RecordingSink::default();
    let navigation = NoNavigation;
    let mut orchestrator = Orchestrator::new(
        &mut engine,
        &mut sink,
        &navigation,
        &settings,
        CancellationToken::new(),
    );
    orchestrator.execute(&[PathBuf::from("suite.dll")], &RunRequest::default());
    sink
}

#[test]
fn test_events_forwarded_in_engine_order() {
    let sink = run_with_events(vec![
        r#"<start-suite id="1-0" name="Fixture" fullname="My.Fixture"/>"#,
        r#"<start-test id="1-1" name="First" fullname="My.Fixture.First"/>"#,
        r#"<test-case id="1-1" name="First" fullname="My.Fixture.First" result="Passed" duration="0.01"/>"#,
        r#"<start-test id="1-2" name="Second" fullname="My.Fixture.Second"/>"#,
        r#"<test-case id="1-2" name="Second" fullname="My.Fixture.Second" result="Failed" duration="0.02"/>"#,
        r#"<test-suite id="1-0" name="Fixture" fullname="My.Fixture" result="Failed"/>"#,
    ]);

    let order: Vec<String> = sink
        .events
        .iter()
        .map(|e| match e {
            Event::Start(c) => format!("start:{}", c.fully_qualified_name),
            Event::Result(r) => format!("result:{}", r.case.fully_qualified_name),
            Event::Message(_, _) => "message".to_string(),
        })
        .collect();
    assert_eq!(
        order,
        [
            "start:My.Fixture.First",
            "result:My.Fixture.First",
            "start:My.Fixture.Second",
            "result:My.Fixture.Second",
        ]
    );
}

#[test]
fn test_start_and_result_share_identity() {
    let sink = run_with_events(vec![
        r#"<start-test id="1-1" name="Check" fullname="My.Fixture.Check"/>"#,
        r#"<test-case id="1-1" name="Check" fullname="My.Fixture.Check" result="Passed" duration="0.01"/>"#,
    ]);

    let starts = sink.starts();
    let results = sink.results();
    assert_eq!(starts.len(), 1);
    assert_eq!(results.len(), 1);
    // The host correlates start/result pairs by identity: same Arc.
    assert!(Arc::ptr_eq(starts[0], &results[0].case));
}

#[test]
fn test_outcome_mapping_across_the_bridge() {
    let sink = run_with_events(vec![
        r#"<test-case id="1-1" name="a" fullname="T.a" result="Passed" duration="0"/>"#,
        r#"<test-case id="1-2" name="b" fullname="T.b" result="Failed" duration="0"/>"#,
        r#"<test-case id="1-3" name="c" fullname="T.c" result="Failed" label="Error" duration="0"/>"#,
        r#"<test-case id="1-4" name="d" fullname="T.d" result="Failed" label="Invalid" duration="0"/>"#,
        r#"<test-case id="1-5" name="e" fullname="T.e" result="Skipped" duration="0"/>"#,
        r#"<test-case id="1-6" name="f" fullname="T.f" result="Skipped" label="Ignored" duration="0"/>"#,
        r#"<test-case id="1-7" name="g" fullname="T.g" result="Inconclusive" duration="0"/>"#,
        r#"<test-case id="1-8" name="h" fullname="T.h" result="Failed" label="Cancelled" duration="0"/>"#,
    ]);

    let outcomes: Vec<TestOutcome> = sink.results().iter().map(|r| r.outcome).collect();
    assert_eq!(
        outcomes,
        [
            TestOutcome::Passed,
            TestOutcome::Failed,
            TestOutcome::Failed,
            TestOutcome::Failed,
            TestOutcome::Skipped,
            TestOutcome::Skipped,
            TestOutcome::None,
            TestOutcome::None,
        ]
    );
}

#[test]
fn test_error_location_from_first_frame_with_file_info() {
    // The first user frame has no file info; the next one does. Framework
    // frames before both are dropped entirely.
    let sink = run_with_events(vec![
        r#"<test-case id="1-1" name="Adds" fullname="My.Tests.Calculator.Adds" result="Failed" duration="0.2">
             <failure>
               <message><![CDATA[expected 3 but was 4]]></message>
               <stack-trace><![CDATA[  at Quipu.Framework.Assert.AreEqual(Int32 expected, Int32 actual)
  at My.Tests.Calculator.Adds()
  at My.Tests.Helpers.Run(Action body) in /work/src/X.cs:line 29
  at Quipu.Engine.Runner.Execute()]]></stack-trace>
             </failure>
           </test-case>"#,
    ]);

    let results = sink.results();
    let result = results[0];
    assert_eq!(result.outcome, TestOutcome::Failed);
    assert_eq!(result.error_message.as_deref(), Some("expected 3 but was 4"));
    assert!(result.error_file_path.as_deref().unwrap().ends_with("X.cs"));
    assert_eq!(result.error_line_number, Some(29));

    let trace = result.error_stack_trace.as_deref().unwrap();
    assert!(!trace.contains("Quipu."));
    assert!(trace.contains("My.Tests.Calculator.Adds"));
}

#[test]
fn test_duration_is_exact() {
    let sink = run_with_events(vec![
        r#"<test-case id="1-1" name="a" fullname="T.a" result="Passed" duration="1.5"/>"#,
    ]);
    assert_eq!(sink.results()[0].duration, Duration::from_secs_f64(1.5));
}

#[test]
fn test_output_events_become_informational_messages() {
    let sink = run_with_events(vec![
        r#"<test-output stream="Out" testid="1-1"><![CDATA[progress line]]></test-output>"#,
    ]);
    assert!(sink.events.iter().any(|e| matches!(
        e,
        Event::Message(MessageLevel::Informational, m) if m == "progress line"
    )));
}

#[test]
fn test_suite_setup_failure_closes_started_cases() {
    let sink = run_with_events(vec![
        r#"<start-test id="1-1" name="Check" fullname="My.Fixture.Check"/>"#,
        r#"<test-suite id="1-0" name="Fixture" fullname="My.Fixture" result="Failed" site="SetUp">
             <failure><message>OneTimeSetUp: connection refused</message></failure>
           </test-suite>"#,
    ]);

    let results = sink.results();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].case.fully_qualified_name, "My.Fixture.Check");
    assert_eq!(results[0].outcome, TestOutcome::Failed);
    assert_eq!(
        results[0].error_message.as_deref(),
        Some("OneTimeSetUp: connection refused")
    );
}

#[test]
fn test_attachments_and_properties_survive() {
    let sink = run_with_events(vec![
        r#"<test-case id="1-1" name="Snap" fullname="T.Snap" result="Passed" duration="0">
             <properties><property name="Category" value="Visual"/></properties>
             <attachments><attachment><filePath>/tmp/shot.png</filePath></attachment></attachments>
           </test-case>"#,
    ]);

    let results = sink.results();
    assert_eq!(results[0].attachments, ["/tmp/shot.png"]);
    let case = &results[0].case;
    assert!(case.traits.iter().any(|t| t.key == "Category" && t.value == "Visual"));
}

#[test]
fn test_multi_assembly_failure_isolation() {
    // First assembly faults immediately; the second still runs to completion.
    let settings = RunSettings::default();
    let mut sink = RecordingSink::default();
    let navigation = NoNavigation;

    {
        let mut engine = ScriptedEngine::new().faulting_after(0, "boom");
        let mut orchestrator = Orchestrator::new(
            &mut engine,
            &mut sink,
            &navigation,
            &settings,
            CancellationToken::new(),
        );
        let summary = orchestrator.execute(&[PathBuf::from("a.dll")], &RunRequest::default());
        assert_eq!(summary.failed, 1);
    }
    {
        let mut engine = ScriptedEngine::new()
            .with_events([
                r#"<test-case id="1-1" name="x" fullname="T.x" result="Passed" duration="0"/>"#,
            ])
            .with_report("<test-run/>");
        let mut orchestrator = Orchestrator::new(
            &mut engine,
            &mut sink,
            &navigation,
            &settings,
            CancellationToken::new(),
        );
        let summary = orchestrator.execute(&[PathBuf::from("b.dll")], &RunRequest::default());
        assert_eq!(summary.completed, 1);
    }

    assert!(sink.events.iter().any(|e| matches!(
        e,
        Event::Message(MessageLevel::Error, m) if m.contains("a.dll")
    )));
    assert_eq!(sink.results().len(), 1);
}

#[test]
fn test_run_report_written_after_completion() {
    let dir = std::env::temp_dir().join(format!("chasqui_report_{}", std::process::id()));
    let settings = RunSettings {
        test_output_xml: Some(dir.clone()),
        ..RunSettings::default()
    };

    let mut engine = ScriptedEngine::new().with_report(r#"<test-run id="2" result="Passed"/>"#);
    let mut sink = RecordingSink::default();
    let navigation = NoNavigation;
    let mut orchestrator = Orchestrator::new(
        &mut engine,
        &mut sink,
        &navigation,
        &settings,
        CancellationToken::new(),
    );
    orchestrator.execute(&[PathBuf::from("suite.dll")], &RunRequest::default());

    let report = std::fs::read_to_string(dir.join("suite.xml")).unwrap();
    assert!(report.contains("test-run"));
    let _ = std::fs::remove_dir_all(&dir);
}
