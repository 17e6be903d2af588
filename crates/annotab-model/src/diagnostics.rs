use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueCategory {
    Annotation,
    Manifest,
    Configuration,
}

impl IssueCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueCategory::Annotation => "annotation",
            IssueCategory::Manifest => "manifest",
            IssueCategory::Configuration => "configuration",
        }
    }
}

/// Ordered from least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Low,
    Medium,
    High,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Low => "low",
            IssueSeverity::Medium => "medium",
            IssueSeverity::High => "high",
        }
    }
}

/// A recoverable problem found while compiling a table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub category: IssueCategory,
    pub severity: IssueSeverity,
    pub message: String,
    pub code: Option<String>,
}

/// Fire-and-forget receiver for compile diagnostics.
///
/// Shared between independent compilations, so implementations must tolerate
/// concurrent calls.
pub trait DiagnosticsSink: Send + Sync {
    fn add_issue(
        &self,
        category: IssueCategory,
        severity: IssueSeverity,
        message: &str,
        code: Option<&str>,
    );
}

/// Default sink that keeps every issue in memory.
#[derive(Debug, Default)]
pub struct DiagnosticsCollector {
    issues: Mutex<Vec<Issue>>,
}

impl DiagnosticsCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the issues collected so far, in arrival order.
    pub fn issues(&self) -> Vec<Issue> {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn count(&self, severity: IssueSeverity) -> usize {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    pub fn has_at_least(&self, severity: IssueSeverity) -> bool {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .any(|issue| issue.severity >= severity)
    }

    pub fn is_empty(&self) -> bool {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl DiagnosticsSink for DiagnosticsCollector {
    fn add_issue(
        &self,
        category: IssueCategory,
        severity: IssueSeverity,
        message: &str,
        code: Option<&str>,
    ) {
        self.issues
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Issue {
                category,
                severity,
                message: message.to_string(),
                code: code.map(str::to_string),
            });
    }
}
