//! Mock state shared by the façade and its proxies.

use crate::error::{MockError, MockResult};
use crate::mocks::dispatcher::{InvocationDispatcher, LifoDispatcher};
use crate::mocks::invokable::Invokable;
use crate::types::invocation::{Invocation, MockId};
use serde_json::Value;
use tracing::debug;

/// One mock identity bound to exactly one dispatcher.
pub struct CoreMock {
    id: MockId,
    name: String,
    dispatcher: Box<dyn InvocationDispatcher>,
}

impl CoreMock {
    pub fn new(name: impl Into<String>, dispatcher: Box<dyn InvocationDispatcher>) -> Self {
        Self {
            id: MockId::next(),
            name: name.into(),
            dispatcher,
        }
    }

    /// Mock backed by a [`LifoDispatcher`].
    pub fn lifo(name: impl Into<String>) -> Self {
        Self::new(name, Box::new(LifoDispatcher::new()))
    }

    pub fn id(&self) -> MockId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, invokable: Box<dyn Invokable>) {
        self.dispatcher.add(invokable);
    }

    pub fn dispatch(&mut self, invocation: &Invocation) -> MockResult<Value> {
        self.dispatcher.dispatch(invocation)
    }

    pub fn verify(&self) -> MockResult<()> {
        self.dispatcher.verify().map_err(|unmet| {
            debug!(mock = %self.name, unmet = unmet.len(), "verification failed");
            MockError::UnsatisfiedExpectations {
                mock: self.name.clone(),
                unmet,
            }
        })
    }

    /// Drop every registered behaviour.
    pub fn reset(&mut self) {
        debug!(mock = %self.name, discarded = self.dispatcher.len(), "reset");
        self.dispatcher.clear();
    }

    pub fn behaviours(&self) -> Vec<String> {
        self.dispatcher.describe()
    }
}

/// Default mock name for a type: `mock` followed by the type's name without
/// references, `dyn`, extra trait bounds, its module path or generic
/// arguments, e.g. `mockRepository` for `&dyn repo::Repository + Send`.
pub fn mock_name_from_type<T: ?Sized>() -> String {
    let full = std::any::type_name::<T>();
    let name = full.trim_start_matches(['&', '(']);
    let name = name.strip_prefix("mut ").unwrap_or(name);
    let name = name.trim_start_matches('(');
    let name = name.strip_prefix("dyn ").unwrap_or(name);
    let name = name.split(" + ").next().unwrap_or(name);
    let name = name.split('<').next().unwrap_or(name);
    let short = name.rsplit("::").next().unwrap_or(name).trim_end_matches(')');
    format!("mock{short}")
}
