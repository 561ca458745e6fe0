//! JMESPath expressions over argument values.
//!
//! Expressions are written `${...}` in scripts and evaluated against either a
//! single argument or the whole argument array.

use jmespath::Variable;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::rc::Rc;

/// Whether a script string is an `${...}` expression.
pub fn is_expression(s: &str) -> bool {
    s.len() > 3 && s.starts_with("${") && s.ends_with('}')
}

/// Body of an `${...}` expression, or `None` for plain strings.
pub fn strip_expression(s: &str) -> Option<&str> {
    if !is_expression(s) {
        return None;
    }
    s.strip_prefix("${").and_then(|s| s.strip_suffix('}'))
}

fn to_variable(value: &Value) -> Rc<Variable> {
    let variable = match value {
        Value::Null => Variable::Null,
        Value::Bool(b) => Variable::Bool(*b),
        Value::Number(n) => Variable::Number(n.clone()),
        Value::String(s) => Variable::String(s.clone()),
        Value::Array(items) => Variable::Array(items.iter().map(to_variable).collect()),
        Value::Object(fields) => Variable::Object(
            fields
                .iter()
                .map(|(k, v)| (k.clone(), to_variable(v)))
                .collect::<BTreeMap<_, _>>(),
        ),
    };
    Rc::new(variable)
}

fn to_value(variable: &Variable) -> Option<Value> {
    let value = match variable {
        Variable::Null => Value::Null,
        Variable::Bool(b) => Value::Bool(*b),
        Variable::Number(n) => Value::Number(n.clone()),
        Variable::String(s) => Value::String(s.clone()),
        Variable::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| to_value(item))
                .collect::<Option<Vec<_>>>()?,
        ),
        Variable::Object(fields) => Value::Object(
            fields
                .iter()
                .map(|(k, v)| to_value(v).map(|v| (k.clone(), v)))
                .collect::<Option<Map<_, _>>>()?,
        ),
        // Expression references have no JSON form
        Variable::Expref(_) => return None,
    };
    Some(value)
}

/// Truthiness of an expression result: `null`, `false`, `0`, and empty
/// strings, arrays and objects are false.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(fields) => !fields.is_empty(),
    }
}

/// Evaluate `expression` against `data`.
///
/// Returns `None` when the expression does not compile or fails at runtime.
pub fn evaluate(expression: &str, data: &Value) -> Option<Value> {
    let compiled = jmespath::compile(expression).ok()?;
    let data = to_variable(data);
    let result = compiled.search(&data).ok()?;
    to_value(&result)
}

/// Evaluate `expression` against `data` as a predicate. Invalid expressions
/// never match.
pub fn matches(expression: &str, data: &Value) -> bool {
    evaluate(expression, data).is_some_and(|result| is_truthy(&result))
}
