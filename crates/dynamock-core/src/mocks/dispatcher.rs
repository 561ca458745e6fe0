//! Selection of the behaviour that handles an invocation.

use crate::error::{MockError, MockResult};
use crate::mocks::invokable::Invokable;
use crate::types::invocation::Invocation;
use serde_json::Value;
use tracing::{debug, trace};

/// Ordered collection of behaviours with a dispatch policy.
pub trait InvocationDispatcher {
    fn add(&mut self, invokable: Box<dyn Invokable>);

    /// Run the selected behaviour for `invocation`.
    ///
    /// # Errors
    /// - [`MockError::UnexpectedInvocation`] if no behaviour both matches and
    ///   allows more invocations
    /// - [`MockError::Thrown`] if the selected behaviour is configured to fail
    fn dispatch(&mut self, invocation: &Invocation) -> MockResult<Value>;

    /// Descriptions of every behaviour still needing invocations, in
    /// registration order.
    fn verify(&self) -> Result<(), Vec<String>>;

    /// Descriptions of every registered behaviour, in registration order.
    fn describe(&self) -> Vec<String>;

    fn clear(&mut self);

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tries the most recently added behaviour first.
///
/// A later, more specific registration overrides an earlier general one
/// until it is exhausted, after which dispatch falls through to the earlier
/// one.
#[derive(Default)]
pub struct LifoDispatcher {
    /// Registration order; searched from the back
    invokables: Vec<Box<dyn Invokable>>,
}

impl LifoDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InvocationDispatcher for LifoDispatcher {
    fn add(&mut self, invokable: Box<dyn Invokable>) {
        debug!(behaviour = %invokable.describe(), "registered behaviour");
        self.invokables.push(invokable);
    }

    fn dispatch(&mut self, invocation: &Invocation) -> MockResult<Value> {
        let selected = self.invokables.iter_mut().rev().find(|invokable| {
            if !invokable.matches(invocation) {
                return false;
            }
            if !invokable.allows_more_invocations() {
                trace!(
                    behaviour = %invokable.describe(),
                    invoked = invokable.invocation_count(),
                    "skipping exhausted behaviour"
                );
                return false;
            }
            true
        });

        match selected {
            Some(invokable) => {
                debug!(%invocation, behaviour = %invokable.describe(), "dispatching");
                invokable.invoke(invocation).map_err(MockError::from)
            }
            None => {
                debug!(%invocation, "no behaviour accepts invocation");
                Err(MockError::UnexpectedInvocation {
                    invocation: invocation.to_string(),
                    registered: self.describe(),
                })
            }
        }
    }

    fn verify(&self) -> Result<(), Vec<String>> {
        let unmet: Vec<String> = self
            .invokables
            .iter()
            .filter(|invokable| invokable.needs_more_invocations())
            .map(|invokable| invokable.describe())
            .collect();

        if unmet.is_empty() {
            Ok(())
        } else {
            Err(unmet)
        }
    }

    fn describe(&self) -> Vec<String> {
        self.invokables.iter().map(|i| i.describe()).collect()
    }

    fn clear(&mut self) {
        self.invokables.clear();
    }

    fn len(&self) -> usize {
        self.invokables.len()
    }
}
