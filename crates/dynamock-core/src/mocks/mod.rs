//! Mock objects and their dispatch engine.
//!
//! - [`mock::Mock`]: façade for registering behaviours, verifying and resetting
//! - [`proxy::Proxy`]: handle the code under test calls through
//! - [`dispatcher::LifoDispatcher`]: selects the behaviour for each invocation
//! - [`invokable::Expectation`]: matchers, stub and cardinality for one behaviour

pub mod core_mock;
pub mod dispatcher;
pub mod invokable;
pub mod mock;
pub mod proxy;
pub mod stub;
pub mod verify;
