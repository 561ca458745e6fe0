//! Core domain types for invocations and cardinality bounds.

pub mod cardinality;
pub mod invocation;
