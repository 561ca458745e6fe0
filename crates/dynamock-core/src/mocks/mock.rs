//! Mock façade: registration builders, lifecycle, and proxies.

use crate::config::error::ConfigError;
use crate::config::script::MockScript;
use crate::error::{MockResult, Thrown};
use crate::matching::{
    AnyArguments, ArgumentsMatcher, Constraint, ExpressionMatcher, InvocationMatcher,
    MethodNameMatcher, NoArguments, ParameterTypesMatcher,
};
use crate::mocks::core_mock::{mock_name_from_type, CoreMock};
use crate::mocks::dispatcher::InvocationDispatcher;
use crate::mocks::invokable::{Expectation, Invokable};
use crate::mocks::proxy::Proxy;
use crate::mocks::stub::{ReturnSequence, ReturnStub, Stub, ThrowStub, VoidStub};
use crate::types::cardinality::Cardinality;
use crate::types::invocation::MockId;
use serde_json::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Argument matching accepted by the convenience methods.
///
/// `()` means no arguments, a [`Value`] one argument equal to it, and a
/// constraint list one constraint per argument.
pub enum Args {
    None,
    Any,
    Equal(Vec<Value>),
    Constraints(Vec<Constraint>),
    Matcher(Box<dyn InvocationMatcher>),
}

impl Args {
    pub fn matcher(matcher: impl InvocationMatcher + 'static) -> Self {
        Args::Matcher(Box::new(matcher))
    }

    pub fn into_matcher(self) -> Box<dyn InvocationMatcher> {
        match self {
            Args::None => Box::new(NoArguments),
            Args::Any => Box::new(AnyArguments),
            Args::Equal(values) => Box::new(ArgumentsMatcher::equal(values)),
            Args::Constraints(constraints) => Box::new(ArgumentsMatcher::new(constraints)),
            Args::Matcher(matcher) => matcher,
        }
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Args::None
    }
}

impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Args::Equal(vec![value])
    }
}

impl From<Constraint> for Args {
    fn from(constraint: Constraint) -> Self {
        Args::Constraints(vec![constraint])
    }
}

impl From<Vec<Constraint>> for Args {
    fn from(constraints: Vec<Constraint>) -> Self {
        Args::Constraints(constraints)
    }
}

impl From<ArgumentsMatcher> for Args {
    fn from(matcher: ArgumentsMatcher) -> Self {
        Args::matcher(matcher)
    }
}

impl From<ExpressionMatcher> for Args {
    fn from(matcher: ExpressionMatcher) -> Self {
        Args::matcher(matcher)
    }
}

/// Substitute for one collaborator in one test.
///
/// Behaviours are tried most-recent-first; see
/// [`LifoDispatcher`](crate::mocks::dispatcher::LifoDispatcher).
pub struct Mock {
    core: Rc<RefCell<CoreMock>>,
}

impl Mock {
    pub fn new(name: impl Into<String>) -> Self {
        Self::from_core(CoreMock::lifo(name))
    }

    /// Mock named after `T`, e.g. `mockRepository` for `dyn Repository`.
    pub fn for_type<T: ?Sized>() -> Self {
        Self::new(mock_name_from_type::<T>())
    }

    pub fn with_dispatcher(
        name: impl Into<String>,
        dispatcher: impl InvocationDispatcher + 'static,
    ) -> Self {
        Self::from_core(CoreMock::new(name, Box::new(dispatcher)))
    }

    fn from_core(core: CoreMock) -> Self {
        Self {
            core: Rc::new(RefCell::new(core)),
        }
    }

    pub fn id(&self) -> MockId {
        self.core.borrow().id()
    }

    pub fn name(&self) -> String {
        self.core.borrow().name().to_string()
    }

    /// Handle to pass to the code under test.
    pub fn proxy(&self) -> Proxy {
        Proxy::new(Rc::clone(&self.core))
    }

    /// Register a behaviour. Every builder and convenience method ends here.
    pub fn add(&self, invokable: impl Invokable + 'static) {
        self.core.borrow_mut().add(Box::new(invokable));
    }

    /// Discard all behaviours, as if newly constructed.
    pub fn reset(&self) {
        self.core.borrow_mut().reset();
    }

    /// # Errors
    /// [`MockError::UnsatisfiedExpectations`](crate::MockError::UnsatisfiedExpectations)
    /// listing every behaviour that was invoked fewer times than required.
    pub fn verify(&self) -> MockResult<()> {
        self.core.borrow().verify()
    }

    /// Descriptions of the registered behaviours, in registration order.
    pub fn behaviours(&self) -> Vec<String> {
        self.core.borrow().behaviours()
    }

    /// Register the behaviours of a mock script, in script order.
    ///
    /// # Errors
    /// [`ConfigError::InvalidBehaviour`] for the first behaviour that cannot
    /// be registered; behaviours before it stay registered.
    pub fn apply_script(&self, script: &MockScript) -> Result<(), ConfigError> {
        script.apply_to(self)
    }

    /// Start an expectation on `method`, invoked exactly once by default.
    pub fn expects(&self, method: impl Into<String>) -> InvokableBuilder<'_> {
        InvokableBuilder::new(self, method.into(), Cardinality::once())
    }

    /// Start a stub on `method`, invoked any number of times by default.
    pub fn allows(&self, method: impl Into<String>) -> InvokableBuilder<'_> {
        InvokableBuilder::new(self, method.into(), Cardinality::any())
    }

    /// Stub `method` with an application-specific behaviour.
    pub fn stub(&self, method: &str, args: impl Into<Args>, stub: impl Stub + 'static) {
        self.allows(method).with(args).will(stub);
    }

    pub fn stub_void(&self, method: &str, args: impl Into<Args>) {
        self.allows(method).with(args).does_nothing();
    }

    pub fn stub_and_return(&self, method: &str, args: impl Into<Args>, result: impl Into<Value>) {
        self.allows(method).with(args).returns(result);
    }

    pub fn stub_and_throw(&self, method: &str, args: impl Into<Args>, error: Thrown) {
        self.allows(method).with(args).throws(error);
    }

    pub fn expect(&self, method: &str, args: impl Into<Args>) {
        self.expects(method).with(args).does_nothing();
    }

    pub fn expect_and_return(
        &self,
        method: &str,
        args: impl Into<Args>,
        result: impl Into<Value>,
    ) {
        self.expects(method).with(args).returns(result);
    }

    pub fn expect_and_throw(&self, method: &str, args: impl Into<Args>, error: Thrown) {
        self.expects(method).with(args).throws(error);
    }
}

impl fmt::Display for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.core.borrow().name())
    }
}

impl fmt::Debug for Mock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let core = self.core.borrow();
        f.debug_struct("Mock")
            .field("id", &core.id())
            .field("name", &core.name())
            .field("behaviours", &core.behaviours().len())
            .finish()
    }
}

/// Assembles one behaviour: matchers, bound, then an action that registers it.
#[must_use = "a behaviour is only registered by returns, throws, does_nothing or will"]
pub struct InvokableBuilder<'a> {
    mock: &'a Mock,
    method: String,
    overload: Option<ParameterTypesMatcher>,
    arguments: Option<Box<dyn InvocationMatcher>>,
    extra: Vec<Box<dyn InvocationMatcher>>,
    cardinality: Cardinality,
    label: Option<String>,
}

impl<'a> InvokableBuilder<'a> {
    fn new(mock: &'a Mock, method: String, cardinality: Cardinality) -> Self {
        Self {
            mock,
            method,
            overload: None,
            arguments: None,
            extra: Vec::new(),
            cardinality,
            label: None,
        }
    }

    /// Argument matching; without it any arguments are accepted.
    pub fn with(mut self, args: impl Into<Args>) -> Self {
        self.arguments = Some(args.into().into_matcher());
        self
    }

    pub fn with_no_args(self) -> Self {
        self.with(Args::None)
    }

    /// Restrict to the overload with these parameter types.
    pub fn overload<I, S>(mut self, parameter_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.overload = Some(ParameterTypesMatcher::new(parameter_types));
        self
    }

    /// Additional matcher, ANDed with the others.
    pub fn matching(mut self, matcher: impl InvocationMatcher + 'static) -> Self {
        self.extra.push(Box::new(matcher));
        self
    }

    pub fn times(mut self, cardinality: Cardinality) -> Self {
        self.cardinality = cardinality;
        self
    }

    /// Name shown in failure reports.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn returns(self, result: impl Into<Value>) {
        self.will(ReturnStub::new(result));
    }

    pub fn returns_in_turn<I, V>(self, results: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.will(ReturnSequence::new(results));
    }

    pub fn throws(self, error: Thrown) {
        self.will(ThrowStub::new(error));
    }

    pub fn does_nothing(self) {
        self.will(VoidStub);
    }

    pub fn will(self, stub: impl Stub + 'static) {
        let mut expectation = Expectation::new(stub, self.cardinality)
            .with_matcher(MethodNameMatcher::new(self.method));
        if let Some(overload) = self.overload {
            expectation.add_matcher(overload);
        }
        if let Some(arguments) = self.arguments {
            expectation.add_boxed_matcher(arguments);
        }
        for matcher in self.extra {
            expectation.add_boxed_matcher(matcher);
        }
        if let Some(label) = self.label {
            expectation.set_label(label);
        }
        self.mock.add(expectation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MockError;
    use crate::matching::PredicateMatcher;
    use crate::mocks::dispatcher::LifoDispatcher;
    use crate::types::invocation::{Invocation, MethodSignature};
    use rstest::{fixture, rstest};
    use serde_json::json;

    /// Collaborator used by the scenario tests.
    trait Counter {
        fn foo(&self) -> MockResult<i64>;
        fn add(&self, amount: i64) -> MockResult<()>;
    }

    struct CounterProxy(Proxy);

    impl Counter for CounterProxy {
        fn foo(&self) -> MockResult<i64> {
            self.0.call_as("foo", vec![])
        }

        fn add(&self, amount: i64) -> MockResult<()> {
            self.0.call_void("add", vec![json!(amount)])
        }
    }

    #[fixture]
    fn counter_mock() -> Mock {
        Mock::for_type::<dyn Counter>()
    }

    /// Registers "foo returns 1, once" then "foo returns 2, once".
    fn foo_twice(mock: &Mock) {
        mock.expect_and_return("foo", (), 1);
        mock.expect_and_return("foo", (), 2);
    }

    #[rstest]
    fn test_most_recent_expectation_first_then_fallback(counter_mock: Mock) {
        foo_twice(&counter_mock);
        let counter = CounterProxy(counter_mock.proxy());

        assert_eq!(counter.foo(), Ok(2));
        assert_eq!(counter.foo(), Ok(1));
        assert!(matches!(
            counter.foo(),
            Err(MockError::UnexpectedInvocation { ref invocation, .. })
                if invocation == "mockCounter.foo()"
        ));
    }

    #[rstest]
    fn test_verify_after_both_calls_succeeds(counter_mock: Mock) {
        foo_twice(&counter_mock);
        let counter = CounterProxy(counter_mock.proxy());
        counter.foo().unwrap();
        counter.foo().unwrap();

        assert_eq!(counter_mock.verify(), Ok(()));
    }

    #[rstest]
    fn test_verify_after_one_call_reports_first_expectation(counter_mock: Mock) {
        foo_twice(&counter_mock);
        let counter = CounterProxy(counter_mock.proxy());
        assert_eq!(counter.foo(), Ok(2));

        match counter_mock.verify() {
            Err(MockError::UnsatisfiedExpectations { mock, unmet }) => {
                assert_eq!(mock, "mockCounter");
                assert_eq!(unmet.len(), 1);
                assert!(unmet[0].contains("will return 1"), "{}", unmet[0]);
            }
            other => panic!("expected unsatisfied expectations, got {other:?}"),
        }
    }

    #[rstest]
    fn test_verify_reports_all_unmet_expectations(counter_mock: Mock) {
        counter_mock.expect("add", json!(1));
        counter_mock.expect("add", json!(2));
        counter_mock.expect("add", json!(3));
        counter_mock.stub_and_return("foo", (), 0);

        let error = counter_mock.verify().unwrap_err();
        let display = error.to_string();
        assert!(display.starts_with("mockCounter: 3 unsatisfied expectation(s):"));
        for amount in 1..=3 {
            assert!(display.contains(&format!("with (eq({amount}))")), "{display}");
        }
    }

    #[rstest]
    fn test_reset_clears_behaviours(counter_mock: Mock) {
        counter_mock.expect_and_return("foo", (), 1);
        let counter = CounterProxy(counter_mock.proxy());

        counter_mock.reset();
        assert!(counter_mock.behaviours().is_empty());
        assert_eq!(counter_mock.verify(), Ok(()));
        assert!(matches!(
            counter.foo(),
            Err(MockError::UnexpectedInvocation { .. })
        ));

        counter_mock.expect_and_return("foo", (), 5);
        assert_eq!(counter.foo(), Ok(5));
    }

    #[rstest]
    fn test_specific_override_then_general_default(counter_mock: Mock) {
        counter_mock.stub_void("add", Args::Any);
        counter_mock.expect_and_throw("add", json!(-1), Thrown::new("negative amount"));
        let counter = CounterProxy(counter_mock.proxy());

        assert_eq!(counter.add(5), Ok(()));
        assert_eq!(
            counter.add(-1),
            Err(MockError::Thrown(Thrown::new("negative amount")))
        );
        assert_eq!(counter.add(-1), Ok(()));
        assert_eq!(counter_mock.verify(), Ok(()));
    }

    #[rstest]
    fn test_stub_defaults_to_unbounded(counter_mock: Mock) {
        counter_mock.stub_and_return("foo", (), 9);
        let counter = CounterProxy(counter_mock.proxy());
        for _ in 0..10 {
            assert_eq!(counter.foo(), Ok(9));
        }
        assert_eq!(counter_mock.verify(), Ok(()));
    }

    #[rstest]
    #[case(Cardinality::at_least(2), 1, false)]
    #[case(Cardinality::at_least(2), 3, true)]
    #[case(Cardinality::between(1, 2), 2, true)]
    #[case(Cardinality::never(), 0, true)]
    fn test_builder_cardinality(
        counter_mock: Mock,
        #[case] cardinality: Cardinality,
        #[case] calls: usize,
        #[case] satisfied: bool,
    ) {
        counter_mock.expects("add").with(Constraint::Anything).times(cardinality).does_nothing();
        let counter = CounterProxy(counter_mock.proxy());
        for i in 0..calls {
            counter.add(i as i64).unwrap();
        }
        assert_eq!(counter_mock.verify().is_ok(), satisfied);
    }

    #[rstest]
    fn test_calls_beyond_upper_bound_are_unexpected(counter_mock: Mock) {
        counter_mock.expects("add").times(Cardinality::at_most(1)).does_nothing();
        let counter = CounterProxy(counter_mock.proxy());
        assert_eq!(counter.add(1), Ok(()));
        assert!(matches!(
            counter.add(2),
            Err(MockError::UnexpectedInvocation { ref invocation, .. })
                if invocation == "mockCounter.add(2)"
        ));
    }

    #[rstest]
    fn test_builder_argument_forms(counter_mock: Mock) {
        counter_mock
            .allows("add")
            .with(vec![Constraint::expression("@ > `100`")])
            .returns("big");
        counter_mock
            .allows("add")
            .with(ExpressionMatcher::new("[0] < `0`"))
            .returns("negative");
        counter_mock
            .allows("add")
            .matching(PredicateMatcher::new("even amount", |i: &Invocation| {
                i.argument(0)
                    .and_then(Value::as_i64)
                    .is_some_and(|n| n % 2 == 0)
            }))
            .returns("even");
        let proxy = counter_mock.proxy();

        assert_eq!(proxy.invoke("add", vec![json!(101)]), Ok(json!("big")));
        assert_eq!(proxy.invoke("add", vec![json!(-3)]), Ok(json!("negative")));
        assert_eq!(proxy.invoke("add", vec![json!(4)]), Ok(json!("even")));
        assert!(proxy.invoke("add", vec![json!(3)]).is_err());
    }

    #[rstest]
    fn test_closure_matcher(counter_mock: Mock) {
        counter_mock
            .allows("add")
            .matching(|i: &Invocation| i.argument(0) == Some(&json!(7)))
            .returns("seven");
        let proxy = counter_mock.proxy();

        assert_eq!(proxy.invoke("add", vec![json!(7)]), Ok(json!("seven")));
        assert!(proxy.invoke("add", vec![json!(8)]).is_err());
        let behaviours = counter_mock.behaviours();
        assert_eq!(behaviours.len(), 1);
        assert!(behaviours[0].starts_with("method add matching a predicate, "));
        assert!(behaviours[0].ends_with("invoked 1 time, will return \"seven\""));
    }

    #[rstest]
    fn test_apply_script(counter_mock: Mock) {
        let script: MockScript = crate::config::parser::parse_yaml(
            "behaviours:\n  - method: foo\n    returns: 3\n  - method: add\n    kind: stub\n    args: []\n",
        )
        .expect("Should parse");
        counter_mock.apply_script(&script).expect("Should apply");
        let counter = CounterProxy(counter_mock.proxy());

        assert_eq!(counter.foo(), Ok(3));
        assert_eq!(
            counter.add(1),
            Err(MockError::UnexpectedInvocation {
                invocation: "mockCounter.add(1)".to_string(),
                registered: counter_mock.behaviours(),
            })
        );
        assert_eq!(counter_mock.verify(), Ok(()));
    }

    #[rstest]
    fn test_builder_overload(counter_mock: Mock) {
        counter_mock.allows("parse").overload(["String"]).returns("from text");
        counter_mock.allows("parse").overload(["i64"]).returns("from number");
        let proxy = counter_mock.proxy();

        let text = MethodSignature::new("parse").with_parameters(["String"]);
        let number = MethodSignature::new("parse").with_parameters(["i64"]);
        assert_eq!(proxy.invoke(text, vec![json!("1")]), Ok(json!("from text")));
        assert_eq!(proxy.invoke(number, vec![json!(1)]), Ok(json!("from number")));
    }

    #[rstest]
    fn test_returns_in_turn(counter_mock: Mock) {
        counter_mock.allows("foo").returns_in_turn([1, 2]);
        let counter = CounterProxy(counter_mock.proxy());
        assert_eq!(counter.foo(), Ok(1));
        assert_eq!(counter.foo(), Ok(2));
        assert_eq!(counter.foo(), Ok(2));
    }

    #[rstest]
    fn test_label_appears_in_failures(counter_mock: Mock) {
        counter_mock.expects("foo").label("initial read").returns(1);
        let error = counter_mock.verify().unwrap_err();
        assert!(error.to_string().contains("initial read: method foo"));
    }

    #[rstest]
    fn test_mocks_do_not_share_behaviours() {
        let first = Mock::new("first");
        let second = Mock::new("second");
        first.stub_and_return("foo", (), 1);

        assert_eq!(first.proxy().invoke("foo", vec![]), Ok(json!(1)));
        assert!(second.proxy().invoke("foo", vec![]).is_err());
        assert_ne!(first.id(), second.id());
    }

    #[rstest]
    fn test_with_dispatcher_and_display() {
        let mock = Mock::with_dispatcher("mockClock", LifoDispatcher::new());
        assert_eq!(mock.to_string(), "mockClock");
        assert_eq!(mock.name(), "mockClock");
        assert_eq!(mock.proxy().mock_id(), mock.id());
    }

    #[rstest]
    fn test_no_args_form_rejects_arguments(counter_mock: Mock) {
        counter_mock.stub_void("add", ());
        let proxy = counter_mock.proxy();
        assert_eq!(proxy.invoke("add", vec![]), Ok(Value::Null));
        assert!(proxy.invoke("add", vec![json!(1)]).is_err());
    }
}
