//! Declarative mock scripts.
//!
//! ```yaml
//! mock: mockRepository
//! behaviours:
//!   - method: find
//!     args: [42]
//!     returns: { id: 42, name: ann }
//!   - method: find
//!     kind: stub
//!     args: "${[0] > `100`}"
//!     throws: { message: not found }
//!   - method: save
//!     args: ["*", "${@ > `0`}"]
//!     times: { min: 1 }
//! ```

use crate::config::error::ConfigError;
use crate::error::Thrown;
use crate::expression::{is_expression, strip_expression};
use crate::matching::{Constraint, ExpressionMatcher};
use crate::mocks::mock::{Args, Mock};
use crate::types::cardinality::Cardinality;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Placeholder argument accepting any value.
pub const ANY_ARGUMENT: &str = "*";

/// Behaviours for one mock, in registration order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MockScript {
    /// Name given to mocks built from this script
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mock: Option<String>,
    #[serde(default)]
    pub behaviours: Vec<BehaviourScript>,
}

/// Whether a behaviour must be invoked (expect) or merely may be (stub).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BehaviourKind {
    #[default]
    Expect,
    Stub,
}

impl BehaviourKind {
    pub fn default_cardinality(self) -> Cardinality {
        match self {
            BehaviourKind::Expect => Cardinality::once(),
            BehaviourKind::Stub => Cardinality::any(),
        }
    }
}

/// One behaviour. With neither `returns` nor `throws` the call does nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BehaviourScript {
    pub method: String,
    #[serde(default)]
    pub kind: BehaviourKind,
    /// Parameter types selecting one overload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overload: Option<Vec<String>>,
    /// Arguments to match; any arguments when omitted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub args: Option<ArgsScript>,
    /// Value to return; an explicit `null` is kept and returned as such
    #[serde(
        default,
        deserialize_with = "deserialize_present",
        skip_serializing_if = "Option::is_none"
    )]
    pub returns: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub throws: Option<Thrown>,
    /// Overrides the default bound of `kind`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub times: Option<Cardinality>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

/// `Some` whenever the field is present, `null` included; absent fields
/// fall back to `None` through `#[serde(default)]`.
fn deserialize_present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Argument matching in a script: a list with one entry per argument, a
/// `${...}` expression over the argument array, or `*` for anything.
#[derive(Debug, Clone, PartialEq)]
pub enum ArgsScript {
    Any,
    Positional(Vec<Value>),
    Expression(String),
}

impl ArgsScript {
    fn into_args(self) -> Args {
        match self {
            ArgsScript::Any => Args::Any,
            ArgsScript::Expression(expr) => Args::matcher(ExpressionMatcher::new(expr)),
            ArgsScript::Positional(values) => {
                Args::Constraints(values.into_iter().map(constraint_from_value).collect())
            }
        }
    }
}

/// `*` accepts anything, `${...}` is an expression on the argument, any
/// other value must be equal.
fn constraint_from_value(value: Value) -> Constraint {
    match value {
        Value::String(s) if s == ANY_ARGUMENT => Constraint::Anything,
        Value::String(s) if is_expression(&s) => match strip_expression(&s) {
            Some(expr) => Constraint::expression(expr),
            None => Constraint::Eq(Value::String(s)),
        },
        other => Constraint::Eq(other),
    }
}

impl Serialize for ArgsScript {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ArgsScript::Any => ANY_ARGUMENT.serialize(serializer),
            ArgsScript::Positional(values) => values.serialize(serializer),
            ArgsScript::Expression(expr) => format!("${{{}}}", expr).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for ArgsScript {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        match value {
            Value::Array(values) => Ok(ArgsScript::Positional(values)),
            Value::String(s) if s == ANY_ARGUMENT => Ok(ArgsScript::Any),
            Value::String(s) => match strip_expression(&s) {
                Some(expr) => Ok(ArgsScript::Expression(expr.to_string())),
                None => Err(serde::de::Error::custom(
                    "Args must be a list, an expression string or \"*\"",
                )),
            },
            _ => Err(serde::de::Error::custom(
                "Args must be a list, an expression string or \"*\"",
            )),
        }
    }
}

impl BehaviourScript {
    fn invalid(&self, reason: &str) -> ConfigError {
        ConfigError::InvalidBehaviour {
            method: self.method.clone(),
            reason: reason.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.method.trim().is_empty() {
            return Err(self.invalid("method name is empty"));
        }
        if self.returns.is_some() && self.throws.is_some() {
            return Err(self.invalid("both returns and throws are set"));
        }
        Ok(())
    }

    /// Register this behaviour on `mock`.
    pub fn apply_to(&self, mock: &Mock) -> Result<(), ConfigError> {
        self.validate()?;

        let cardinality = self
            .times
            .unwrap_or_else(|| self.kind.default_cardinality());
        let mut builder = mock.allows(self.method.as_str()).times(cardinality);
        if let Some(overload) = &self.overload {
            builder = builder.overload(overload.iter().cloned());
        }
        if let Some(args) = &self.args {
            builder = builder.with(args.clone().into_args());
        }
        if let Some(label) = &self.label {
            builder = builder.label(label.as_str());
        }

        match (&self.returns, &self.throws) {
            (Some(result), _) => builder.returns(result.clone()),
            (None, Some(error)) => builder.throws(error.clone()),
            (None, None) => builder.does_nothing(),
        }
        Ok(())
    }
}

impl MockScript {
    /// Register every behaviour on `mock`, in script order.
    ///
    /// Stops at the first invalid behaviour; behaviours before it stay
    /// registered.
    pub fn apply_to(&self, mock: &Mock) -> Result<(), ConfigError> {
        self.behaviours
            .iter()
            .try_for_each(|behaviour| behaviour.apply_to(mock))
    }

    /// Fresh mock named after the script (or `mock`) with its behaviours.
    pub fn build_mock(&self) -> Result<Mock, ConfigError> {
        let mock = Mock::new(self.mock.as_deref().unwrap_or("mock"));
        self.apply_to(&mock)?;
        Ok(mock)
    }
}
