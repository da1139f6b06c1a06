//! Unit test suite for extgen
//!
//! These tests drive the public library API directly, without the binary:
//! the expansion engine over the fixture component types, and the built-in
//! component library against in-memory extensions.
//!
//! # Running Unit Tests
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! # Test Organization
//!
//! - **engine**: Collection, merging and containment with fixture types
//! - **library**: Interactions between built-in component types

mod engine;
mod library;
