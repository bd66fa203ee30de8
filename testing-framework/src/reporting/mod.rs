// File: testing-framework/src/reporting/mod.rs
//
// Reporting
//
// Each test scope owns a `ScenarioContext` that accumulates feature, story,
// labels, steps, action outcomes and assertion results. Events are also
// forwarded to a `ReportSink` as they happen.

/// JSON scenario reports written on failure
pub mod artifacts;

pub use artifacts::{ScenarioMetadata, ScenarioReport};

use std::fmt;

use indexmap::IndexMap;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};

/// One thing that happened during a scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReportEvent {
    Feature { name: String },
    Story { name: String },
    Label { key: String, value: String },
    Step { title: String },
    Action { action: String, outcome: String },
    Assertion {
        predicate: String,
        result: String,
        passed: bool,
    },
}

impl fmt::Display for ReportEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Feature { name } => write!(f, "Feature: {name}"),
            Self::Story { name } => write!(f, "Story: {name}"),
            Self::Label { key, value } => write!(f, "Label {key}={value}"),
            Self::Step { title } => write!(f, "Step: {title}"),
            Self::Action { action, outcome } => write!(f, "{action} -> {outcome}"),
            Self::Assertion {
                predicate, result, ..
            } => write!(f, "should {predicate}: {result}"),
        }
    }
}

/// Reporting metadata of one scenario
///
/// Owned by a single test scope, never shared between tests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScenarioContext {
    pub scenario_id: String,
    pub feature: Option<String>,
    pub story: Option<String>,
    pub labels: IndexMap<String, String>,
    pub events: Vec<ReportEvent>,
}

impl ScenarioContext {
    pub fn new(scenario_id: impl Into<String>) -> Self {
        Self {
            scenario_id: scenario_id.into(),
            ..Self::default()
        }
    }

    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        let feature = feature.into();
        self.events.push(ReportEvent::Feature {
            name: feature.clone(),
        });
        self.feature = Some(feature);
        self
    }

    pub fn with_story(mut self, story: impl Into<String>) -> Self {
        let story = story.into();
        self.events.push(ReportEvent::Story {
            name: story.clone(),
        });
        self.story = Some(story);
        self
    }

    pub fn with_label(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(ReportEvent::Label {
            key: key.into(),
            value: value.into(),
        });
        self
    }

    /// Append an event, keeping the label map in sync
    pub fn push(&mut self, event: ReportEvent) {
        if let ReportEvent::Label { key, value } = &event {
            self.labels.insert(key.clone(), value.clone());
        }
        self.events.push(event);
    }

    /// Titles of the steps recorded so far
    pub fn steps(&self) -> impl Iterator<Item = &str> {
        self.events.iter().filter_map(|event| match event {
            ReportEvent::Step { title } => Some(title.as_str()),
            _ => None,
        })
    }

    /// Assertions recorded so far that did not pass
    pub fn failed_assertions(&self) -> impl Iterator<Item = &ReportEvent> {
        self.events
            .iter()
            .filter(|event| matches!(event, ReportEvent::Assertion { passed: false, .. }))
    }
}

/// Receives report events as they are recorded
pub trait ReportSink: Send + Sync {
    fn record(&self, context: &ScenarioContext, event: &ReportEvent);
}

/// Forwards events to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl ReportSink for LogSink {
    fn record(&self, context: &ScenarioContext, event: &ReportEvent) {
        match event {
            ReportEvent::Assertion { passed: false, .. } => {
                log::warn!("[{}] {}", context.scenario_id, event)
            }
            _ => log::info!("[{}] {}", context.scenario_id, event),
        }
    }
}

/// Keeps every event in memory, for tests of the harness itself
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<(String, ReportEvent)>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded events, in order
    pub fn events(&self) -> Vec<ReportEvent> {
        self.events.lock().iter().map(|(_, e)| e.clone()).collect()
    }

    /// Recorded events of one scenario
    pub fn events_for(&self, scenario_id: &str) -> Vec<ReportEvent> {
        self.events
            .lock()
            .iter()
            .filter(|(id, _)| id == scenario_id)
            .map(|(_, e)| e.clone())
            .collect()
    }
}

impl ReportSink for MemorySink {
    fn record(&self, context: &ScenarioContext, event: &ReportEvent) {
        self.events
            .lock()
            .push((context.scenario_id.clone(), event.clone()));
    }
}
