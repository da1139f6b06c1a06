//! Integration test suite for extgen
//!
//! End-to-end tests: full generation runs over the YAML and JSON
//! specifications in `fixtures/`, and runs of the `extgen` binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **generate**: Full generation runs, through the library and the binary
//! - **inspect**: The `types`, `schema` and `tree` commands
//! - **errors**: Failure reporting of the binary

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod errors;
mod generate;
mod inspect;
