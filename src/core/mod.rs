//! Core types and functionality for extgen
//!
//! This module holds the foundations every other module builds on:
//!
//! - [`error`] - the [`ExtgenError`] taxonomy, [`ErrorContext`] and
//!   [`user_friendly_error`] for CLI display
//! - [`data`] - the untyped, insertion-ordered [`ComponentData`] trees that
//!   specifications and components exchange, plus emptiness/truthiness rules
//!
//! # Examples
//!
//! ```rust
//! use extgen_cli::core::{ComponentData, is_populated};
//! use serde_json::json;
//!
//! let data: ComponentData = json!({"root_name": "foo", "description": ""})
//!     .as_object()
//!     .cloned()
//!     .unwrap();
//! assert!(is_populated(&data, "root_name"));
//! assert!(!is_populated(&data, "description"));
//! ```

pub mod data;
pub mod error;

pub use data::{
    ComponentData, declared_type, get_str, get_string_list, is_empty_value, is_populated, is_set,
    is_truthy, scalar_to_string, value_kind,
};
pub use error::{ErrorContext, ExtgenError, Result, user_friendly_error};
