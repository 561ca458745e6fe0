//! Substitute handed to the code under test.
//!
//! Interception is explicit: implement the collaborator's trait for a
//! wrapper around [`Proxy`] and forward each method through
//! [`Proxy::invoke`] or [`Proxy::call_as`].
//!
//! ```ignore
//! struct RepositoryProxy(Proxy);
//!
//! impl Repository for RepositoryProxy {
//!     fn find(&self, id: u64) -> Result<Option<User>, MockError> {
//!         self.0.call_as("find", vec![json!(id)])
//!     }
//! }
//! ```

use crate::error::{MockError, MockResult};
use crate::mocks::core_mock::CoreMock;
use crate::types::invocation::{Invocation, MethodSignature, MockId};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Cloneable handle routing calls into its mock's dispatcher.
///
/// Not `Send`: a mock and its proxies belong to one test thread.
#[derive(Clone)]
pub struct Proxy {
    id: MockId,
    name: Rc<str>,
    core: Rc<RefCell<CoreMock>>,
}

impl Proxy {
    pub(crate) fn new(core: Rc<RefCell<CoreMock>>) -> Self {
        let (id, name) = {
            let core = core.borrow();
            (core.id(), Rc::from(core.name()))
        };
        Self { id, name, core }
    }

    pub fn mock_id(&self) -> MockId {
        self.id
    }

    pub fn mock_name(&self) -> &str {
        &self.name
    }

    /// Dispatch one call and return the stubbed value.
    ///
    /// # Errors
    /// - [`MockError::UnexpectedInvocation`] if no behaviour accepts the call
    /// - [`MockError::Thrown`] if the selected stub is configured to fail
    /// - [`MockError::Reentrant`] if called from inside a running stub of the
    ///   same mock
    pub fn invoke(
        &self,
        method: impl Into<MethodSignature>,
        arguments: Vec<Value>,
    ) -> MockResult<Value> {
        let invocation = Invocation::new(self.id, &*self.name, method, arguments);
        let mut core = self
            .core
            .try_borrow_mut()
            .map_err(|_| MockError::Reentrant {
                invocation: invocation.to_string(),
            })?;
        core.dispatch(&invocation)
    }

    /// Dispatch one call and deserialize the stubbed value into `T`.
    pub fn call_as<T: DeserializeOwned>(
        &self,
        method: impl Into<MethodSignature>,
        arguments: Vec<Value>,
    ) -> MockResult<T> {
        let method = method.into();
        let description = format!("{}.{}", self.name, method.name);
        let value = self.invoke(method, arguments)?;
        serde_json::from_value(value).map_err(|e| MockError::ReturnType {
            invocation: description,
            message: e.to_string(),
        })
    }

    /// Dispatch a call whose result is discarded.
    pub fn call_void(
        &self,
        method: impl Into<MethodSignature>,
        arguments: Vec<Value>,
    ) -> MockResult<()> {
        self.invoke(method, arguments).map(|_| ())
    }
}

impl fmt::Debug for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proxy")
            .field("id", &self.id)
            .field("name", &self.name)
            .finish()
    }
}

impl fmt::Display for Proxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
