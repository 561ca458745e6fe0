//! Reified calls made on a mock's proxy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_MOCK_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one mock instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MockId(u64);

impl MockId {
    /// Allocate a process-unique identity.
    pub fn next() -> Self {
        MockId(NEXT_MOCK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for MockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Invoked method identity: name plus enough type information to tell
/// overloads apart.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Method name
    pub name: String,
    /// Declared parameter types, in order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameter_types: Vec<String>,
    /// Declared return type (`None` for methods returning nothing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
}

impl MethodSignature {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            parameter_types: Vec::new(),
            return_type: None,
        }
    }

    pub fn with_parameters<I, S>(mut self, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_types = parameter_types.into_iter().map(Into::into).collect();
        self
    }

    pub fn returning(mut self, return_type: impl Into<String>) -> Self {
        self.return_type = Some(return_type.into());
        self
    }

    pub fn is_void(&self) -> bool {
        self.return_type.is_none()
    }
}

impl From<&str> for MethodSignature {
    fn from(name: &str) -> Self {
        MethodSignature::new(name)
    }
}

impl From<String> for MethodSignature {
    fn from(name: String) -> Self {
        MethodSignature::new(name)
    }
}

/// One call captured by a proxy.
///
/// Immutable once created: the dispatcher and every matcher and stub only
/// ever see it by shared reference.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    mock: MockId,
    mock_name: String,
    method: MethodSignature,
    arguments: Vec<Value>,
}

impl Invocation {
    pub fn new(
        mock: MockId,
        mock_name: impl Into<String>,
        method: impl Into<MethodSignature>,
        arguments: Vec<Value>,
    ) -> Self {
        Self {
            mock,
            mock_name: mock_name.into(),
            method: method.into(),
            arguments,
        }
    }

    pub fn mock(&self) -> MockId {
        self.mock
    }

    pub fn mock_name(&self) -> &str {
        &self.mock_name
    }

    pub fn method(&self) -> &MethodSignature {
        &self.method
    }

    pub fn method_name(&self) -> &str {
        &self.method.name
    }

    pub fn arguments(&self) -> &[Value] {
        &self.arguments
    }

    pub fn argument(&self, index: usize) -> Option<&Value> {
        self.arguments.get(index)
    }

    /// Argument list as a JSON array, for expression matching.
    pub fn arguments_value(&self) -> Value {
        Value::Array(self.arguments.clone())
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}(", self.mock_name, self.method.name)?;
        for (i, argument) in self.arguments.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{argument}")?;
        }
        f.write_str(")")
    }
}
