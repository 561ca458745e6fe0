//! Failure taxonomy surfaced to the test author.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Error configured on a stub; propagated to the caller as if the real
/// collaborator had failed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Error)]
#[error("{message}{}", format_payload(.payload))]
pub struct Thrown {
    /// Human-readable error message
    pub message: String,
    /// Optional structured detail carried with the error
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Thrown {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            payload: None,
        }
    }

    pub fn with_payload(mut self, payload: Value) -> Self {
        self.payload = Some(payload);
        self
    }
}

/// Errors produced by dispatching to or verifying a mock.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MockError {
    /// No registered behaviour matched the call, or every match is exhausted
    #[error("unexpected invocation: {invocation}{}", format_registered(.registered))]
    UnexpectedInvocation {
        invocation: String,
        registered: Vec<String>,
    },
    /// Expectations still waiting for invocations at verification time
    #[error("{mock}: {} unsatisfied expectation(s):{}", .unmet.len(), format_list(.unmet))]
    UnsatisfiedExpectations { mock: String, unmet: Vec<String> },
    /// Failure configured on the selected stub
    #[error("{0}")]
    Thrown(#[from] Thrown),
    /// A stub called back into the mock it is executing on
    #[error("re-entrant invocation while dispatching: {invocation}")]
    Reentrant { invocation: String },
    /// Stubbed value could not be converted to the caller's return type
    #[error("return value of {invocation} has the wrong type: {message}")]
    ReturnType { invocation: String, message: String },
}

impl MockError {
    /// Whether this error is the deliberate outcome of a throwing stub
    /// rather than a failed expectation.
    pub fn is_thrown(&self) -> bool {
        matches!(self, MockError::Thrown(_))
    }
}

/// Result alias for mock operations.
pub type MockResult<T> = Result<T, MockError>;

fn format_payload(payload: &Option<Value>) -> String {
    payload
        .as_ref()
        .map(|payload| format!(" ({payload})"))
        .unwrap_or_default()
}

fn format_list(items: &[String]) -> String {
    items.iter().map(|item| format!("\n  - {item}")).collect()
}

fn format_registered(registered: &[String]) -> String {
    if registered.is_empty() {
        "\nno behaviours registered".to_string()
    } else {
        format!("\nregistered behaviours:{}", format_list(registered))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;
    use std::error::Error;

    #[rstest]
    fn test_unexpected_invocation_display_lists_registered() {
        let error = MockError::UnexpectedInvocation {
            invocation: "mockFoo.bar(1)".to_string(),
            registered: vec!["method bar, expected once".to_string()],
        };
        let display = error.to_string();
        assert!(display.contains("unexpected invocation: mockFoo.bar(1)"));
        assert!(display.contains("registered behaviours:"));
        assert!(display.contains("  - method bar, expected once"));
    }

    #[rstest]
    fn test_unexpected_invocation_display_without_registered() {
        let error = MockError::UnexpectedInvocation {
            invocation: "mockFoo.bar()".to_string(),
            registered: vec![],
        };
        assert!(error.to_string().contains("no behaviours registered"));
    }

    #[rstest]
    fn test_unsatisfied_expectations_display_lists_all() {
        let error = MockError::UnsatisfiedExpectations {
            mock: "mockFoo".to_string(),
            unmet: vec!["first".to_string(), "second".to_string()],
        };
        let display = error.to_string();
        assert!(display.starts_with("mockFoo: 2 unsatisfied expectation(s):"));
        assert!(display.contains("  - first"));
        assert!(display.contains("  - second"));
    }

    #[rstest]
    #[case(Thrown::new("boom"), "boom")]
    #[case(Thrown::new("boom").with_payload(json!({"code": 7})), "boom ({\"code\":7})")]
    fn test_thrown_display(#[case] thrown: Thrown, #[case] expected: &str) {
        assert_eq!(thrown.to_string(), expected);
        assert_eq!(MockError::from(thrown).to_string(), expected);
    }

    #[rstest]
    fn test_is_thrown_distinguishes_configured_failures() {
        assert!(MockError::Thrown(Thrown::new("x")).is_thrown());
        assert!(!MockError::Reentrant {
            invocation: "m.f()".to_string()
        }
        .is_thrown());
    }

    #[rstest]
    fn test_thrown_deserialize_without_payload() {
        let thrown: Thrown = serde_json::from_value(json!({"message": "nope"})).unwrap();
        assert_eq!(thrown, Thrown::new("nope"));
        assert!(thrown.source().is_none());
    }
}
