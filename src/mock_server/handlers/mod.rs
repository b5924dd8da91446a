//! HTTP request handlers for the mock server.

pub mod records;

pub use records::*;
