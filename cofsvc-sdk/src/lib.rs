//! Shared wire types and an HTTP client for the coffee catalog service.
//!
//! The [`objects`] module is always available. The typed client lives
//! behind the `client` feature so the server does not pull in `reqwest`.

#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![forbid(unsafe_code)]

#[cfg(feature = "client")]
pub mod client;
pub mod objects;
pub mod sse;
