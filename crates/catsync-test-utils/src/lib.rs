//! Shared test utilities for catsync integration tests.
//!
//! This crate provides:
//! - [`RecordingKnownObjects`]: known-objects cache that records invalidations
//! - [`TableFixture`] and [`EventFixture`]: builders for Hive tables and hook events
//! - Custom assertion helpers for planned intents
//!
//! # Example
//!
//! ```rust,ignore
//! use catsync_test_utils::{EventFixture, TableFixture, TestContext, assert_rename_shape};
//!
//! #[test]
//! fn test_example() {
//!     let ctx = TestContext::new();
//!     let old = TableFixture::new("db1", "orders").columns(["id", "amount"]).build();
//!     let event = EventFixture::rename(old, "orders_v2").with_decoy().build();
//!     let intents = ctx.planner().plan_rename(&event);
//!     assert_rename_shape(&intents, 2, 0, false);
//! }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
// Test utilities use expect/unwrap for cleaner test code - panics are acceptable in tests
#![allow(clippy::expect_used)]
#![allow(clippy::unwrap_used)]
#![allow(clippy::missing_panics_doc)]

pub mod assertions;
pub mod fixtures;
pub mod known_objects;

pub use assertions::*;
pub use fixtures::*;
pub use known_objects::*;

/// Initialize test logging (call once per test module).
pub fn init_test_logging() {
    use tracing_subscriber::{EnvFilter, fmt};

    let _ = fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("catsync_hive=debug".parse().expect("valid directive"))
                .add_directive("catsync_core=debug".parse().expect("valid directive")),
        )
        .with_test_writer()
        .try_init();
}
