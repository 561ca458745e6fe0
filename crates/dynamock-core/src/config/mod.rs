//! Mock script configuration: file formats, parsing and application.

pub mod error;
pub mod parser;
pub mod script;
