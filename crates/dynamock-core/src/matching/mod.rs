//! Argument constraints and invocation matchers.

mod constraint;
mod intersection;
mod matcher;

pub use constraint::Constraint;
pub use intersection::contains;
pub use matcher::{
    AnyArguments, ArgumentsMatcher, ConjunctionMatcher, ExpressionMatcher, InvocationMatcher,
    MethodNameMatcher, NoArguments, ParameterTypesMatcher, PredicateMatcher,
};
