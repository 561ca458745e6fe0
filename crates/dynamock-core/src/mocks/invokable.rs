//! Behaviour units selected by the dispatcher.

use crate::error::Thrown;
use crate::matching::InvocationMatcher;
use crate::mocks::stub::Stub;
use crate::types::cardinality::Cardinality;
use crate::types::invocation::Invocation;
use serde_json::Value;

/// A registered behaviour: what it matches, what it does, and how often it
/// may or must be invoked.
///
/// This is the hook for application-specific mock behaviour; every builder
/// and convenience method on [`Mock`](crate::mocks::mock::Mock) ends up
/// registering one of these.
pub trait Invokable {
    fn matches(&self, invocation: &Invocation) -> bool;

    /// `false` once the upper bound (if any) is reached.
    fn allows_more_invocations(&self) -> bool;

    /// `true` until the lower bound (if any) is reached.
    fn needs_more_invocations(&self) -> bool;

    /// Execute the behaviour and record the invocation.
    ///
    /// Callers must have checked [`matches`](Self::matches) and
    /// [`allows_more_invocations`](Self::allows_more_invocations) first.
    fn invoke(&mut self, invocation: &Invocation) -> Result<Value, Thrown>;

    /// Invocations recorded so far.
    fn invocation_count(&self) -> usize;

    fn describe(&self) -> String;
}

/// Matchers combined with AND, one stub, and a cardinality bound.
pub struct Expectation {
    matchers: Vec<Box<dyn InvocationMatcher>>,
    stub: Box<dyn Stub>,
    cardinality: Cardinality,
    invocation_count: usize,
    label: Option<String>,
}

impl Expectation {
    pub fn new(stub: impl Stub + 'static, cardinality: Cardinality) -> Self {
        Self {
            matchers: Vec::new(),
            stub: Box::new(stub),
            cardinality,
            invocation_count: 0,
            label: None,
        }
    }

    pub fn add_matcher(&mut self, matcher: impl InvocationMatcher + 'static) {
        self.add_boxed_matcher(Box::new(matcher));
    }

    pub fn add_boxed_matcher(&mut self, matcher: Box<dyn InvocationMatcher>) {
        self.matchers.push(matcher);
    }

    pub fn with_matcher(mut self, matcher: impl InvocationMatcher + 'static) -> Self {
        self.add_matcher(matcher);
        self
    }

    pub fn set_stub(&mut self, stub: impl Stub + 'static) {
        self.stub = Box::new(stub);
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        self.label = Some(label.into());
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }
}

impl Invokable for Expectation {
    fn matches(&self, invocation: &Invocation) -> bool {
        self.matchers.iter().all(|m| m.matches(invocation))
    }

    fn allows_more_invocations(&self) -> bool {
        self.cardinality.allows_more(self.invocation_count)
    }

    fn needs_more_invocations(&self) -> bool {
        self.cardinality.needs_more(self.invocation_count)
    }

    fn invoke(&mut self, invocation: &Invocation) -> Result<Value, Thrown> {
        assert!(
            self.allows_more_invocations(),
            "invoked exhausted behaviour [{}] with {}",
            self.describe(),
            invocation
        );
        self.invocation_count += 1;
        self.stub.invoke(invocation)
    }

    fn invocation_count(&self) -> usize {
        self.invocation_count
    }

    fn describe(&self) -> String {
        let matched = if self.matchers.is_empty() {
            "any invocation".to_string()
        } else {
            self.matchers
                .iter()
                .map(|m| m.describe())
                .collect::<Vec<_>>()
                .join(" ")
        };
        let description = format!(
            "{matched}, expected {}, invoked {} time{}, will {}",
            self.cardinality,
            self.invocation_count,
            if self.invocation_count == 1 { "" } else { "s" },
            self.stub.describe()
        );
        match &self.label {
            Some(label) => format!("{label}: {description}"),
            None => description,
        }
    }
}
