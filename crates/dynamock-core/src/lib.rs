//! Core library for dynamock mock objects.
//!
//! A [`Mock`](mocks::mock::Mock) owns an ordered set of behaviours
//! ([`Invokable`](mocks::invokable::Invokable)s). Calls made through its
//! [`Proxy`](mocks::proxy::Proxy) are reified as
//! [`Invocation`](types::invocation::Invocation)s and dispatched to the most
//! recently registered behaviour that matches and still accepts calls.
//! [`Mock::verify`](mocks::mock::Mock::verify) reports every expectation
//! that was not invoked often enough.

pub mod config;
pub mod error;
pub mod expression;
pub mod matching;
pub mod mocks;
pub mod types;

pub use error::{MockError, MockResult, Thrown};
pub use matching::{Constraint, InvocationMatcher};
pub use mocks::mock::{Args, Mock};
pub use mocks::proxy::Proxy;
pub use mocks::verify::{verify_all, Verifiable};
pub use types::cardinality::Cardinality;
pub use types::invocation::{Invocation, MethodSignature, MockId};
