//! Test utilities for mapres development.
//!
//! Provides instrumented [`MemoryResource`](mapres_core::MemoryResource)
//! wrappers for checking allocation pairing and failure paths, a
//! value-type fixture, and a one-line logger setup for tests.
//!
//! - [`TrackingResource`]: records every live block and checks that each
//!   release replays the layout it was allocated with.
//! - [`FailingResource`]: succeeds a fixed number of times, then refuses.
//! - [`Person`]: a small heap-owning value for container tests.

#![deny(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;
pub mod resources;

pub use fixtures::Person;
pub use resources::{FailingResource, TrackingResource};

/// Install `env_logger` for the current test binary.
///
/// Safe to call from every test; only the first call installs the logger.
/// Output is captured by the test harness and filtered by `RUST_LOG`.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
