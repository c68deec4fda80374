//! Typed ingestion of the engine's XML event stream.
//!
//! The engine emits untyped XML documents during a run (`start-suite`,
//! `start-test`, `test-case`, `test-suite`, `test-output`). They are wrapped
//! into a closed set of typed variants at this boundary so that attribute
//! names are known in exactly one place; the rest of the adapter never sees
//! a raw node.

use chasqui_core::identity::NativeTestIdentity;
use chasqui_core::outcome::{NativeOutcome, RunState};
use thiserror::Error;

/// Errors raised while reading an engine document.
#[derive(Debug, Error)]
pub enum EventParseError {
    #[error("malformed event XML: {0}")]
    Xml(#[from] roxmltree::Error),

    #[error("`{element}` event is missing attribute `{attribute}`")]
    MissingAttribute {
        element: String,
        attribute: String,
    },
}

/// One event from the engine's run stream.
#[derive(Debug, Clone)]
pub enum EngineEvent {
    SuiteStarted(SuiteStart),
    SuiteFinished(SuiteResult),
    TestStarted(TestStart),
    TestFinished(TestCaseResult),
    Output(TestOutput),
    /// An element this adapter does not model; consumed and ignored.
    Unknown { element: String },
}

/// `<start-suite>` — bookkeeping only, never forwarded to the host.
#[derive(Debug, Clone)]
pub struct SuiteStart {
    pub id: String,
    pub name: String,
    pub fullname: String,
}

/// `<start-test>` — a test is about to run.
#[derive(Debug, Clone)]
pub struct TestStart {
    pub identity: NativeTestIdentity,
    pub name: String,
}

/// `<failure>` detail on a result node.
#[derive(Debug, Clone, Default)]
pub struct FailureDetail {
    pub message: Option<String>,
    pub stack_trace: Option<String>,
}

/// `<test-case>` — a terminal result for one test.
#[derive(Debug, Clone)]
pub struct TestCaseResult {
    pub identity: NativeTestIdentity,
    pub name: String,
    pub run_state: RunState,
    pub outcome: NativeOutcome,
    /// Engine-reported wall time, in seconds.
    pub duration_secs: f64,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub seed: Option<String>,
    /// Where a failure was raised (`SetUp`, `TearDown`, `Parent`, …).
    pub site: Option<String>,
    pub failure: Option<FailureDetail>,
    pub reason: Option<String>,
    pub output: Vec<String>,
    pub attachments: Vec<String>,
    pub properties: Vec<(String, String)>,
}

/// `<test-suite>` — a terminal result for a suite; bookkeeping only.
#[derive(Debug, Clone)]
pub struct SuiteResult {
    pub id: String,
    pub name: String,
    pub fullname: String,
    pub outcome: NativeOutcome,
    pub site: Option<String>,
    pub failure: Option<FailureDetail>,
    pub reason: Option<String>,
}

/// `<test-output>` — console output produced during the run.
#[derive(Debug, Clone)]
pub struct TestOutput {
    pub stream: Option<String>,
    pub test_id: Option<String>,
    pub test_name: Option<String>,
    pub text: String,
}

/// A test found in a discovery document.
#[derive(Debug, Clone)]
pub struct DiscoveredTest {
    pub identity: NativeTestIdentity,
    pub name: String,
    pub run_state: RunState,
    pub properties: Vec<(String, String)>,
}

/// Parse one event document from the run stream.
pub fn parse_event(xml: &str) -> Result<EngineEvent, EventParseError> {
    let doc = roxmltree::Document::parse(xml)?;
    let root = doc.root_element();

    match root.tag_name().name() {
        "start-suite" => Ok(EngineEvent::SuiteStarted(SuiteStart {
            id: require_attr(&root, "id")?.to_string(),
            name: attr_or_empty(&root, "name"),
            fullname: attr_or_empty(&root, "fullname"),
        })),
        "start-test" => Ok(EngineEvent::TestStarted(TestStart {
            identity: identity_of(&root)?,
            name: attr_or_empty(&root, "name"),
        })),
        "test-case" => Ok(EngineEvent::TestFinished(test_case_result(&root)?)),
        "test-suite" => Ok(EngineEvent::SuiteFinished(SuiteResult {
            id: require_attr(&root, "id")?.to_string(),
            name: attr_or_empty(&root, "name"),
            fullname: attr_or_empty(&root, "fullname"),
            outcome: outcome_of(&root),
            site: root.attribute("site").map(str::to_string),
            failure: failure_of(&root),
            reason: reason_of(&root),
        })),
        "test-output" => Ok(EngineEvent::Output(TestOutput {
            stream: root.attribute("stream").map(str::to_string),
            test_id: root.attribute("testid").map(str::to_string),
            test_name: root.attribute("testname").map(str::to_string),
            text: root.text().unwrap_or_default().to_string(),
        })),
        other => Ok(EngineEvent::Unknown {
            element: other.to_string(),
        }),
    }
}

/// Parse a discovery document (`<test-suite>` tree) into its test cases.
pub fn parse_discovery(xml: &str) -> Result<Vec<DiscoveredTest>, EventParseError> {
    let doc = roxmltree::Document::parse(xml)?;
    let mut tests = Vec::new();
    for node in doc
        .descendants()
        .filter(|n| n.is_element() && n.has_tag_name("test-case"))
    {
        tests.push(DiscoveredTest {
            identity: identity_of(&node)?,
            name: attr_or_empty(&node, "name"),
            run_state: node
                .attribute("runstate")
                .map(RunState::from_attribute)
                .unwrap_or_default(),
            properties: properties_of(&node),
        });
    }
    Ok(tests)
}

// ============================================================================
// Node helpers — all attribute-name knowledge lives below this line
// ============================================================================

fn require_attr<'a>(
    node: &roxmltree::Node<'a, '_>,
    name: &str,
) -> Result<&'a str, EventParseError> {
    node.attribute(name)
        .ok_or_else(|| EventParseError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: name.to_string(),
        })
}

fn attr_or_empty(node: &roxmltree::Node<'_, '_>, name: &str) -> String {
    node.attribute(name).unwrap_or_default().to_string()
}

fn identity_of(node: &roxmltree::Node<'_, '_>) -> Result<NativeTestIdentity, EventParseError> {
    let mut identity = NativeTestIdentity::new(
        require_attr(node, "id")?,
        require_attr(node, "fullname")?,
    );
    if let (Some(classname), Some(methodname)) =
        (node.attribute("classname"), node.attribute("methodname"))
    {
        identity = identity.with_method(classname, methodname);
    }
    Ok(identity)
}

fn outcome_of(node: &roxmltree::Node<'_, '_>) -> NativeOutcome {
    NativeOutcome::from_attributes(
        node.attribute("result").unwrap_or_default(),
        node.attribute("label"),
    )
}

fn child_element<'a, 'i>(
    node: &roxmltree::Node<'a, 'i>,
    tag: &str,
) -> Option<roxmltree::Node<'a, 'i>> {
    node.children()
        .find(|c| c.is_element() && c.tag_name().name() == tag)
}

fn child_text(node: &roxmltree::Node<'_, '_>, tag: &str) -> Option<String> {
    child_element(node, tag).and_then(|c| c.text().map(str::to_string))
}

fn failure_of(node: &roxmltree::Node<'_, '_>) -> Option<FailureDetail> {
    child_element(node, "failure").map(|failure| FailureDetail {
        message: child_text(&failure, "message"),
        stack_trace: child_text(&failure, "stack-trace"),
    })
}

fn reason_of(node: &roxmltree::Node<'_, '_>) -> Option<String> {
    child_element(node, "reason").and_then(|reason| child_text(&reason, "message"))
}

fn properties_of(node: &roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
    let Some(properties) = child_element(node, "properties") else {
        return Vec::new();
    };
    properties
        .children()
        .filter(|c| c.is_element() && c.has_tag_name("property"))
        .filter_map(|p| {
            Some((
                p.attribute("name")?.to_string(),
                p.attribute("value").unwrap_or_default().to_string(),
            ))
        })
        .collect()
}

fn output_of(node: &roxmltree::Node<'_, '_>) -> Vec<String> {
    node.children()
        .filter(|c| c.is_element() && c.has_tag_name("output"))
        .filter_map(|c| c.text().map(str::to_string))
        .collect()
}

fn attachments_of(node: &roxmltree::Node<'_, '_>) -> Vec<String> {
    let Some(attachments) = child_element(node, "attachments") else {
        return Vec::new();
    };
    attachments
        .children()
        .filter(|c| c.is_element() && c.has_tag_name("attachment"))
        .filter_map(|a| child_text(&a, "filePath"))
        .collect()
}

fn test_case_result(node: &roxmltree::Node<'_, '_>) -> Result<TestCaseResult, EventParseError> {
    Ok(TestCaseResult {
        identity: identity_of(node)?,
        name: attr_or_empty(node, "name"),
        run_state: node
            .attribute("runstate")
            .map(RunState::from_attribute)
            .unwrap_or_default(),
        outcome: outcome_of(node),
        duration_secs: node
            .attribute("duration")
            .and_then(|d| d.parse::<f64>().ok())
            .unwrap_or(0.0),
        start_time: node.attribute("start-time").map(str::to_string),
        end_time: node.attribute("end-time").map(str::to_string),
        seed: node.attribute("seed").map(str::to_string),
        site: node.attribute("site").map(str::to_string),
        failure: failure_of(node),
        reason: reason_of(node),
        output: output_of(node),
        attachments: attachments_of(node),
        properties: properties_of(node),
    })
}

// ============================================================================
// TESTS
// ============================================================================
