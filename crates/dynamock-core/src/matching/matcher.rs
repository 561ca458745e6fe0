//! Predicates over whole invocations.

use crate::expression;
use crate::matching::constraint::Constraint;
use crate::types::invocation::Invocation;

/// Decides whether a behaviour applies to an invocation.
///
/// Implementations must be side-effect free: the dispatcher may ask any
/// number of matchers about the same invocation before picking one.
pub trait InvocationMatcher {
    fn matches(&self, invocation: &Invocation) -> bool;

    /// Short description used in failure reports.
    fn describe(&self) -> String;
}

/// Plain closures match too; they describe themselves generically, so use
/// [`PredicateMatcher`] when the failure report should say more.
impl<F> InvocationMatcher for F
where
    F: Fn(&Invocation) -> bool,
{
    fn matches(&self, invocation: &Invocation) -> bool {
        self(invocation)
    }

    fn describe(&self) -> String {
        "matching a predicate".to_string()
    }
}

/// Matches on the invoked method's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodNameMatcher {
    name: String,
}

impl MethodNameMatcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl InvocationMatcher for MethodNameMatcher {
    fn matches(&self, invocation: &Invocation) -> bool {
        invocation.method_name() == self.name
    }

    fn describe(&self) -> String {
        format!("method {}", self.name)
    }
}

/// Matches on declared parameter types, to pick one overload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterTypesMatcher {
    parameter_types: Vec<String>,
}

impl ParameterTypesMatcher {
    pub fn new<I, S>(parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            parameter_types: parameter_types.into_iter().map(Into::into).collect(),
        }
    }
}

impl InvocationMatcher for ParameterTypesMatcher {
    fn matches(&self, invocation: &Invocation) -> bool {
        invocation.method().parameter_types == self.parameter_types
    }

    fn describe(&self) -> String {
        format!("overload ({})", self.parameter_types.join(", "))
    }
}

/// One constraint per argument position; the argument count must agree.
#[derive(Debug, Clone)]
pub struct ArgumentsMatcher {
    constraints: Vec<Constraint>,
}

impl ArgumentsMatcher {
    pub fn new(constraints: Vec<Constraint>) -> Self {
        Self { constraints }
    }

    /// Each argument equal to the corresponding value.
    pub fn equal<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<serde_json::Value>,
    {
        Self::new(values.into_iter().map(Constraint::eq).collect())
    }
}

impl InvocationMatcher for ArgumentsMatcher {
    fn matches(&self, invocation: &Invocation) -> bool {
        let arguments = invocation.arguments();
        arguments.len() == self.constraints.len()
            && self
                .constraints
                .iter()
                .zip(arguments)
                .all(|(constraint, argument)| constraint.eval(argument))
    }

    fn describe(&self) -> String {
        if self.constraints.is_empty() {
            return "with no arguments".to_string();
        }
        let constraints: Vec<String> = self.constraints.iter().map(ToString::to_string).collect();
        format!("with ({})", constraints.join(", "))
    }
}

/// Matches only invocations without arguments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NoArguments;

impl InvocationMatcher for NoArguments {
    fn matches(&self, invocation: &Invocation) -> bool {
        invocation.arguments().is_empty()
    }

    fn describe(&self) -> String {
        "with no arguments".to_string()
    }
}

/// Matches every argument list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnyArguments;

impl InvocationMatcher for AnyArguments {
    fn matches(&self, _invocation: &Invocation) -> bool {
        true
    }

    fn describe(&self) -> String {
        "with any arguments".to_string()
    }
}

/// JMESPath expression evaluated against the argument array,
/// e.g. `` [0] > `3` && [1] == 'x' ``.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionMatcher {
    expression: String,
}

impl ExpressionMatcher {
    pub fn new(expression: impl Into<String>) -> Self {
        Self {
            expression: expression.into(),
        }
    }
}

impl InvocationMatcher for ExpressionMatcher {
    fn matches(&self, invocation: &Invocation) -> bool {
        expression::matches(&self.expression, &invocation.arguments_value())
    }

    fn describe(&self) -> String {
        format!("where ${{{}}}", self.expression)
    }
}

/// Logical AND of its parts. Empty conjunctions match everything.
#[derive(Default)]
pub struct ConjunctionMatcher {
    matchers: Vec<Box<dyn InvocationMatcher>>,
}

impl ConjunctionMatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, matcher: impl InvocationMatcher + 'static) {
        self.add_boxed(Box::new(matcher));
    }

    pub fn add_boxed(&mut self, matcher: Box<dyn InvocationMatcher>) {
        self.matchers.push(matcher);
    }

    pub fn with(mut self, matcher: impl InvocationMatcher + 'static) -> Self {
        self.add(matcher);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl InvocationMatcher for ConjunctionMatcher {
    fn matches(&self, invocation: &Invocation) -> bool {
        self.matchers.iter().all(|m| m.matches(invocation))
    }

    fn describe(&self) -> String {
        if self.matchers.is_empty() {
            return "any invocation".to_string();
        }
        let parts: Vec<String> = self.matchers.iter().map(|m| m.describe()).collect();
        parts.join(" ")
    }
}

/// Application-specific predicate.
pub struct PredicateMatcher<F> {
    description: String,
    predicate: F,
}

impl<F> PredicateMatcher<F>
where
    F: Fn(&Invocation) -> bool,
{
    pub fn new(description: impl Into<String>, predicate: F) -> Self {
        Self {
            description: description.into(),
            predicate,
        }
    }
}

impl<F> InvocationMatcher for PredicateMatcher<F>
where
    F: Fn(&Invocation) -> bool,
{
    fn matches(&self, invocation: &Invocation) -> bool {
        (self.predicate)(invocation)
    }

    fn describe(&self) -> String {
        self.description.clone()
    }
}
