//! Common test utilities for package-fetch integration tests

#[allow(dead_code)]
pub mod fakes;

pub use fakes::*;
