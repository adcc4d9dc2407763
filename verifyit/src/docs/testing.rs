//! # Testing strategies
//!
//! There are two major testing strategies used in this repository: unit tests,
//! and integration tests.
//!
//! Unit tests should appear close to the code they are testing, using standard
//! Rust unit tests. Code that talks to the search provider is tested against an
//! [`httpmock`](https://docs.rs/httpmock) server standing in for the provider,
//! and the web handlers are tested with a provider that records its queries.
//!
//! The URLs we expose via the web service are the public API, and are tested by
//! [`verifyit-integration-tests`][test-crate], which starts an instance of
//! VerifyIt pointed at a mock search provider. HTTP requests can then be made to
//! that server in order to test its behavior.
//!
//! [test-crate]: ../../../verifyit_integration_tests/
