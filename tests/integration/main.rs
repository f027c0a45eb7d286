//! Integration tests for trace-correlation.
//!
//! These tests drive the public API end to end: inbound resolution, the
//! ambient stores, outbound propagation and asynchronous lifecycles.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test --test integration
//!
//! # With correlation diagnostics
//! RUST_LOG=trace_correlation=trace cargo test --test integration -- --nocapture
//! ```

mod common;
mod flow_tests;
mod inbound_tests;
mod lifecycle_tests;
mod outbound_tests;
