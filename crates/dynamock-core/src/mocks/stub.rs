//! Behaviours executed once an invocation has been matched.

use crate::error::Thrown;
use crate::types::invocation::Invocation;
use serde_json::Value;
use std::cell::Cell;

/// Action performed for a matched invocation.
///
/// Stubs only execute; whether they apply is decided by matchers.
pub trait Stub {
    fn invoke(&self, invocation: &Invocation) -> Result<Value, Thrown>;

    /// Short description, e.g. `return 1`.
    fn describe(&self) -> String;
}

impl<S: Stub + ?Sized> Stub for Box<S> {
    fn invoke(&self, invocation: &Invocation) -> Result<Value, Thrown> {
        (**self).invoke(invocation)
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Returns a fixed value.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStub {
    result: Value,
}

impl ReturnStub {
    pub fn new(result: impl Into<Value>) -> Self {
        Self {
            result: result.into(),
        }
    }
}

impl Stub for ReturnStub {
    fn invoke(&self, _invocation: &Invocation) -> Result<Value, Thrown> {
        Ok(self.result.clone())
    }

    fn describe(&self) -> String {
        format!("return {}", self.result)
    }
}

/// Fails with a fixed error.
#[derive(Debug, Clone, PartialEq)]
pub struct ThrowStub {
    error: Thrown,
}

impl ThrowStub {
    pub fn new(error: Thrown) -> Self {
        Self { error }
    }
}

impl Stub for ThrowStub {
    fn invoke(&self, _invocation: &Invocation) -> Result<Value, Thrown> {
        Err(self.error.clone())
    }

    fn describe(&self) -> String {
        format!("throw \"{}\"", self.error)
    }
}

/// Does nothing and returns `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VoidStub;

impl Stub for VoidStub {
    fn invoke(&self, _invocation: &Invocation) -> Result<Value, Thrown> {
        Ok(Value::Null)
    }

    fn describe(&self) -> String {
        "do nothing".to_string()
    }
}

/// Returns each value in turn, then keeps returning the last one.
#[derive(Debug, Clone, PartialEq)]
pub struct ReturnSequence {
    results: Vec<Value>,
    next: Cell<usize>,
}

impl ReturnSequence {
    pub fn new<I, V>(results: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            results: results.into_iter().map(Into::into).collect(),
            next: Cell::new(0),
        }
    }
}

impl Stub for ReturnSequence {
    fn invoke(&self, _invocation: &Invocation) -> Result<Value, Thrown> {
        let index = self.next.get();
        if index + 1 < self.results.len() {
            self.next.set(index + 1);
        }
        Ok(self.results.get(index).cloned().unwrap_or(Value::Null))
    }

    fn describe(&self) -> String {
        let results: Vec<String> = self.results.iter().map(ToString::to_string).collect();
        format!("return {} in turn", results.join(", "))
    }
}

/// Application-specific behaviour.
pub struct CustomStub<F> {
    description: String,
    action: F,
}

impl<F> CustomStub<F>
where
    F: Fn(&Invocation) -> Result<Value, Thrown>,
{
    pub fn new(description: impl Into<String>, action: F) -> Self {
        Self {
            description: description.into(),
            action,
        }
    }
}

impl<F> Stub for CustomStub<F>
where
    F: Fn(&Invocation) -> Result<Value, Thrown>,
{
    fn invoke(&self, invocation: &Invocation) -> Result<Value, Thrown> {
        (self.action)(invocation)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::invocation::MockId;
    use rstest::rstest;
    use serde_json::json;

    fn call(arguments: Vec<Value>) -> Invocation {
        Invocation::new(MockId::next(), "mockTest", "f", arguments)
    }

    #[rstest]
    #[case(json!(1), "return 1")]
    #[case(json!({"id": 7}), "return {\"id\":7}")]
    fn test_return_stub(#[case] result: Value, #[case] description: &str) {
        let stub = ReturnStub::new(result.clone());
        assert_eq!(stub.invoke(&call(vec![])), Ok(result));
        assert_eq!(stub.describe(), description);
    }

    #[rstest]
    fn test_throw_stub() {
        let stub = ThrowStub::new(Thrown::new("disk full"));
        assert_eq!(stub.invoke(&call(vec![])), Err(Thrown::new("disk full")));
        assert_eq!(stub.describe(), "throw \"disk full\"");
    }

    #[rstest]
    fn test_void_stub() {
        assert_eq!(VoidStub.invoke(&call(vec![json!(1)])), Ok(Value::Null));
        assert_eq!(VoidStub.describe(), "do nothing");
    }

    #[rstest]
    fn test_return_sequence_repeats_last() {
        let stub = ReturnSequence::new([1, 2, 3]);
        let results: Vec<Value> = (0..5)
            .map(|_| stub.invoke(&call(vec![])).unwrap())
            .collect();
        assert_eq!(results, vec![json!(1), json!(2), json!(3), json!(3), json!(3)]);
        assert_eq!(stub.describe(), "return 1, 2, 3 in turn");
    }

    #[rstest]
    fn test_empty_return_sequence_returns_null() {
        let stub = ReturnSequence::new(Vec::<Value>::new());
        assert_eq!(stub.invoke(&call(vec![])), Ok(Value::Null));
    }

    #[rstest]
    fn test_custom_stub_sees_invocation() {
        let stub = CustomStub::new("echo first argument", |invocation: &Invocation| {
            invocation
                .argument(0)
                .cloned()
                .ok_or_else(|| Thrown::new("missing argument"))
        });
        assert_eq!(stub.invoke(&call(vec![json!("hi")])), Ok(json!("hi")));
        assert_eq!(stub.invoke(&call(vec![])), Err(Thrown::new("missing argument")));
        assert_eq!(stub.describe(), "echo first argument");
    }
}
