//! Predicates over a single argument value.

use crate::expression;
use crate::matching::intersection::contains;
use regex::Regex;
use serde_json::Value;
use std::fmt;

/// Constraint on one argument.
///
/// Evaluation is pure: the same argument always gives the same answer.
#[derive(Debug, Clone)]
pub enum Constraint {
    /// Matches any value
    Anything,
    /// Structural equality
    Eq(Value),
    /// Deep containment, see [`contains`]
    Contains(Value),
    /// String argument matching a regular expression
    Regex(Regex),
    /// JMESPath expression evaluated against the argument
    Expression(String),
    Not(Box<Constraint>),
    And(Vec<Constraint>),
    Or(Vec<Constraint>),
}

impl Constraint {
    pub fn eq(value: impl Into<Value>) -> Self {
        Constraint::Eq(value.into())
    }

    pub fn contains(value: impl Into<Value>) -> Self {
        Constraint::Contains(value.into())
    }

    pub fn regex(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Constraint::Regex)
    }

    pub fn expression(expression: impl Into<String>) -> Self {
        Constraint::Expression(expression.into())
    }

    pub fn not(constraint: Constraint) -> Self {
        Constraint::Not(Box::new(constraint))
    }

    pub fn and(self, other: Constraint) -> Self {
        match self {
            Constraint::And(mut all) => {
                all.push(other);
                Constraint::And(all)
            }
            first => Constraint::And(vec![first, other]),
        }
    }

    pub fn or(self, other: Constraint) -> Self {
        match self {
            Constraint::Or(mut any) => {
                any.push(other);
                Constraint::Or(any)
            }
            first => Constraint::Or(vec![first, other]),
        }
    }

    pub fn eval(&self, argument: &Value) -> bool {
        match self {
            Constraint::Anything => true,
            Constraint::Eq(expected) => argument == expected,
            Constraint::Contains(expected) => contains(argument, expected),
            Constraint::Regex(regex) => argument.as_str().is_some_and(|s| regex.is_match(s)),
            Constraint::Expression(expr) => expression::matches(expr, argument),
            Constraint::Not(inner) => !inner.eval(argument),
            Constraint::And(all) => all.iter().all(|c| c.eval(argument)),
            Constraint::Or(any) => any.iter().any(|c| c.eval(argument)),
        }
    }
}

impl From<Value> for Constraint {
    fn from(value: Value) -> Self {
        Constraint::Eq(value)
    }
}

fn join(f: &mut fmt::Formatter<'_>, name: &str, items: &[Constraint]) -> fmt::Result {
    write!(f, "{name}(")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{item}")?;
    }
    f.write_str(")")
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Anything => f.write_str("anything"),
            Constraint::Eq(value) => write!(f, "eq({value})"),
            Constraint::Contains(value) => write!(f, "contains({value})"),
            Constraint::Regex(regex) => write!(f, "matches(/{}/)", regex.as_str()),
            Constraint::Expression(expr) => write!(f, "${{{expr}}}"),
            Constraint::Not(inner) => write!(f, "not({inner})"),
            Constraint::And(all) => join(f, "and", all),
            Constraint::Or(any) => join(f, "or", any),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(Constraint::Anything, json!(null), true)]
    #[case(Constraint::eq(1), json!(1), true)]
    #[case(Constraint::eq(1), json!(2), false)]
    #[case(Constraint::eq("a"), json!("a"), true)]
    #[case(Constraint::contains(json!({"id": 1})), json!({"id": 1, "name": "x"}), true)]
    #[case(Constraint::contains(json!({"id": 2})), json!({"id": 1}), false)]
    #[case(Constraint::expression("@ > `3`"), json!(5), true)]
    #[case(Constraint::expression("@ > `3`"), json!(2), false)]
    #[case(Constraint::expression("name == 'ann'"), json!({"name": "ann"}), true)]
    #[case(Constraint::not(Constraint::eq(1)), json!(2), true)]
    #[case(Constraint::not(Constraint::eq(1)), json!(1), false)]
    #[case(Constraint::eq(1).or(Constraint::eq(2)), json!(2), true)]
    #[case(Constraint::eq(1).or(Constraint::eq(2)), json!(3), false)]
    #[case(Constraint::expression("@ > `1`").and(Constraint::expression("@ < `5`")), json!(3), true)]
    #[case(Constraint::expression("@ > `1`").and(Constraint::expression("@ < `5`")), json!(7), false)]
    fn test_eval(#[case] constraint: Constraint, #[case] argument: Value, #[case] expected: bool) {
        assert_eq!(constraint.eval(&argument), expected);
    }

    #[rstest]
    #[case("^user-\\d+$", json!("user-12"), true)]
    #[case("^user-\\d+$", json!("admin"), false)]
    #[case("^1$", json!(1), false)]
    fn test_regex(#[case] pattern: &str, #[case] argument: Value, #[case] expected: bool) {
        let constraint = Constraint::regex(pattern).expect("Should compile");
        assert_eq!(constraint.eval(&argument), expected);
    }

    #[rstest]
    fn test_regex_invalid_pattern() {
        assert!(Constraint::regex("(").is_err());
    }

    #[rstest]
    fn test_and_flattens() {
        let constraint = Constraint::eq(1).and(Constraint::eq(2)).and(Constraint::eq(3));
        assert!(matches!(&constraint, Constraint::And(all) if all.len() == 3));
    }

    #[rstest]
    #[case(Constraint::Anything, "anything")]
    #[case(Constraint::eq("a"), "eq(\"a\")")]
    #[case(Constraint::contains(json!({"id": 1})), "contains({\"id\":1})")]
    #[case(Constraint::expression("@ > `1`"), "${@ > `1`}")]
    #[case(Constraint::not(Constraint::eq(1)), "not(eq(1))")]
    #[case(Constraint::eq(1).or(Constraint::eq(2)), "or(eq(1), eq(2))")]
    fn test_display(#[case] constraint: Constraint, #[case] expected: &str) {
        assert_eq!(constraint.to_string(), expected);
    }
}
