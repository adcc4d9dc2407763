#![warn(missing_docs, clippy::missing_docs_in_private_items)]
// None of the tests are seen by the linter, so none of the utilities are marked
// as used. But docs don't generate for the below if they are `#[cfg(test)]`.
// This is a compromise.
#![allow(dead_code)]

//! Tests for VerifyIt that work by reading from the external API only.
//!
//! Since the URL endpoints VerifyIt exposes to the world are its public API,
//! and the browser extension depends on them, the paths used in tests here are
//! important details, and used to keep compatibility.
//!
//! This is structured as a separate crate so that it produces a single test
//! binary instead of one test per file like would happen if this were
//! `verifyit/tests/...`. This improves compilation and test times.
//!
//! The primary tool used by tests is [`verifyit_test`], which creates a mock
//! search provider, sets up the application for testing, and calls the test
//! function that is passed to it, providing the above tools as an argument.
//!
//! ```no_run
//! use verifyit_integration_tests::{verifyit_test, TestingTools};
//! use reqwest::StatusCode;
//!
//! # async fn example() {
//! verifyit_test(
//!     |_| (),
//!     |TestingTools { test_client, .. }| async move {
//!         let response = test_client
//!             .get("/")
//!             .send()
//!             .await
//!             .expect("failed to execute request");
//!
//!         assert_eq!(response.status(), StatusCode::OK);
//!     },
//! )
//! .await
//! # }
//! ```

mod general;
mod search;
mod sources;
mod utils;

pub use crate::utils::test_tools::{verifyit_test, TestReqwestClient, TestingTools};
