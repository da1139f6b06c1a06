//! Error handling for extgen
//!
//! This module provides the error types of the generator and the user-friendly
//! error reporting used by the CLI. The error system follows two principles:
//! 1. **Strongly-typed errors** so callers (and tests) can match on the exact
//!    failure of a generation run
//! 2. **User-friendly messages** with actionable suggestions for CLI users
//!
//! # Architecture
//!
//! - [`ExtgenError`] - one variant per failure mode of a generation run
//! - [`ErrorContext`] - wrapper that adds details and suggestions for display
//! - [`user_friendly_error`] - converts any [`anyhow::Error`] into an [`ErrorContext`]
//!
//! # Error Categories
//!
//! - **Type resolution**: [`ExtgenError::MissingType`], [`ExtgenError::UnknownComponentType`]
//! - **Data preparation**: [`ExtgenError::AcquisitionWithoutRequester`],
//!   [`ExtgenError::UnresolvedAcquisition`], [`ExtgenError::IncompatiblePresetMultiplicity`]
//! - **Collection**: [`ExtgenError::DuplicateLocalName`], [`ExtgenError::RegistryLocked`],
//!   [`ExtgenError::MergeDataLoss`], [`ExtgenError::CyclicExpansion`]
//! - **Containment and assembly**: [`ExtgenError::UnresolvableContainmentToken`],
//!   [`ExtgenError::DuplicateFile`]
//!
//! Every variant is fatal for the run that raised it: the generator never retries
//! and never produces partial output.
//!
//! # Examples
//!
//! ```rust,no_run
//! use extgen_cli::core::{ExtgenError, user_friendly_error};
//!
//! fn run() -> anyhow::Result<()> {
//!     Err(ExtgenError::MissingType {
//!         local_name: "root".to_string(),
//!     }
//!     .into())
//! }
//!
//! if let Err(e) = run() {
//!     user_friendly_error(e).display();
//! }
//! ```

use colored::Colorize;
use std::fmt;
use thiserror::Error;

/// The main error type for extgen operations.
///
/// Variants carry the request path (slash-joined chain of local names from the
/// run's root) wherever one is known, so a failure deep inside the expansion
/// can be traced back to the part of the input that caused it.
#[derive(Error, Debug)]
pub enum ExtgenError {
    /// A data subtree does not declare its component type.
    #[error("Component data for '{local_name}' does not declare a component type")]
    MissingType {
        /// Local name the data was requested under
        local_name: String,
    },

    /// A data subtree is not a mapping.
    #[error("Component data for '{local_name}' must be a mapping, found {found}")]
    InvalidComponentData {
        /// Local name the data was requested under
        local_name: String,
        /// JSON kind of the value that was found instead
        found: String,
    },

    /// The requested component type has no concrete implementation.
    #[error("Unknown component type: {component_type}")]
    UnknownComponentType {
        /// Type name as requested (after case normalization)
        component_type: String,
        /// Registered type names close to the requested one
        suggestions: Vec<String>,
    },

    /// An acquired property was prepared without a requester to acquire from.
    #[error("Property '{property}' of {component_type} must be acquired, but there is no requester")]
    AcquisitionWithoutRequester {
        /// Component type being prepared
        component_type: String,
        /// Acquired property name
        property: String,
    },

    /// No lookup strategy produced a value for an acquired property.
    #[error("Unable to acquire property '{property}' of {component_type} from {requester_type}")]
    UnresolvedAcquisition {
        /// Component type being prepared
        component_type: String,
        /// Acquired property name
        property: String,
        /// Component type of the requester that was searched
        requester_type: String,
    },

    /// Several selected presets force the same single-valued property.
    #[error(
        "Presets selected in '{property}' force '{target}' more than once, but '{target}' holds a single value"
    )]
    IncompatiblePresetMultiplicity {
        /// Property holding the preset selection
        property: String,
        /// Sibling property forced by more than one preset
        target: String,
    },

    /// A preset names a sibling it cannot affect.
    #[error("Preset '{preset}' of property '{property}' cannot target '{target}': {reason}")]
    InvalidPresetTarget {
        /// Property holding the preset table
        property: String,
        /// Preset key
        preset: String,
        /// Targeted sibling property
        target: String,
        /// Why the target is rejected
        reason: String,
    },

    /// A preset selection names a preset that does not exist.
    #[error("Property '{property}' selects unknown preset '{preset}'")]
    UnknownPreset {
        /// Property holding the preset selection
        property: String,
        /// Unknown preset key
        preset: String,
    },

    /// A processing callback or preset referenced an unknown property.
    #[error("Unknown property '{property}' referenced by {component_type}")]
    UnknownProperty {
        /// Component type whose schema was searched
        component_type: String,
        /// Property name that was not found
        property: String,
    },

    /// A required property is still empty after preparation.
    #[error("Required property '{property}' of {component_type} has no value")]
    MissingRequiredProperty {
        /// Component type being prepared
        component_type: String,
        /// Property without a value
        property: String,
    },

    /// A list-shaped binding targets a type without a primary property.
    #[error("Component type {component_type} has no primary property, so it cannot be bound from a list")]
    MissingPrimaryProperty {
        /// Bound component type
        component_type: String,
    },

    /// A property schema is malformed.
    #[error("Invalid schema for {component_type}: {reason}")]
    InvalidSchema {
        /// Component type whose schema failed validation
        component_type: String,
        /// Description of the problem
        reason: String,
    },

    /// Two children of the same requester share a local name.
    #[error("Local name '{local_name}' is already used by another component requested by '{requester}'")]
    DuplicateLocalName {
        /// Request path of the requester
        requester: String,
        /// Colliding local name
        local_name: String,
    },

    /// A component was registered after the containment tree was derived.
    #[error("Cannot register '{local_name}': the component collection is locked")]
    RegistryLocked {
        /// Local name of the rejected component
        local_name: String,
    },

    /// A component other than the first was registered without a requester.
    #[error("Component '{local_name}' has no requester, but the run already has a root")]
    OrphanComponent {
        /// Local name of the rejected component
        local_name: String,
    },

    /// A merge tag uses `%requester` but the component has no requester.
    #[error("Merge tag '{tag}' of {component_type} refers to a requester, but there is none")]
    MergeTagWithoutRequester {
        /// Component type
        component_type: String,
        /// Merge tag template
        tag: String,
    },

    /// Incoming data conflicts with data already held by a merge-tag match.
    #[error("Cannot merge data into '{path}': property '{property}' would lose information")]
    MergeDataLoss {
        /// Request path of the existing component
        path: String,
        /// Conflicting property
        property: String,
        /// Value held by the existing component
        existing: String,
        /// Value that was offered
        incoming: String,
    },

    /// A containing-component token could not be resolved.
    #[error("Cannot resolve containment token '{token}' of '{path}': {reason}")]
    UnresolvableContainmentToken {
        /// Request path of the component declaring the token
        path: String,
        /// The token as declared
        token: String,
        /// What failed to resolve
        reason: String,
    },

    /// Containment declarations form a cycle.
    #[error("Containment cycle detected: {chain}")]
    ContainmentCycle {
        /// Request paths participating in the cycle
        chain: String,
    },

    /// The required-components recursion went too deep.
    #[error("Expansion depth limit of {limit} exceeded at '{path}'")]
    ExpansionDepthExceeded {
        /// Configured limit
        limit: usize,
        /// Request path where the limit was hit
        path: String,
    },

    /// An expansion re-entered itself with identical data.
    #[error("Cyclic component expansion detected: {chain}")]
    CyclicExpansion {
        /// Types and local names along the cycle
        chain: String,
    },

    /// Two components resolved to the same output file.
    #[error("Duplicate output file '{path}' produced by '{first}' and '{second}'")]
    DuplicateFile {
        /// Final relative path
        path: String,
        /// Request path of the first provider
        first: String,
        /// Request path of the second provider
        second: String,
    },

    /// A component failed to render its contents.
    #[error("Failed to render '{path}': {reason}")]
    RenderFailed {
        /// Request path of the component
        path: String,
        /// Underlying failure
        reason: String,
    },

    /// Specification input could not be read or parsed.
    #[error("Failed to parse specification '{path}': {reason}")]
    SpecParseError {
        /// Path of the specification file
        path: String,
        /// Parser message
        reason: String,
    },

    /// Configuration file problem.
    #[error("Configuration error: {message}")]
    ConfigError {
        /// Description of the configuration error
        message: String,
    },

    /// I/O error from the standard library.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for results of the generation engine.
pub type Result<T, E = ExtgenError> = std::result::Result<T, E>;

/// Error context wrapper that provides user-friendly error information.
///
/// Wraps an error message with optional details (shown in yellow) and a
/// suggestion (shown in green). Built by [`user_friendly_error`] for the CLI.
#[derive(Debug)]
pub struct ErrorContext {
    /// The rendered error message
    pub message: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a new error context from anything displayable.
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            message: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add additional details explaining the error
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Display the error context to stderr with terminal colors
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.message);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`] with actionable suggestions.
///
/// Recognizes [`ExtgenError`] anywhere in the error chain and attaches a
/// suggestion tailored to the variant; other errors keep their full context
/// chain as details.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    if let Some(extgen_error) = error.chain().find_map(|e| e.downcast_ref::<ExtgenError>()) {
        let context = create_error_context(extgen_error);
        // Keep outer context messages ("Failed to generate ...") visible.
        if error.to_string() != extgen_error.to_string() && context.details.is_none() {
            return context.with_details(format!("{error:#}"));
        }
        return context;
    }

    let not_found = error
        .downcast_ref::<std::io::Error>()
        .is_some_and(|io_error| io_error.kind() == std::io::ErrorKind::NotFound);
    if not_found {
        return ErrorContext::new(&error)
            .with_suggestion("Check that the file or directory exists and the path is correct");
    }

    let details = error.chain().skip(1).map(ToString::to_string).collect::<Vec<_>>();
    let context = ErrorContext::new(&error);
    if details.is_empty() {
        context
    } else {
        context.with_details(details.join(": "))
    }
}

fn create_error_context(error: &ExtgenError) -> ErrorContext {
    let context = ErrorContext::new(error);
    match error {
        ExtgenError::MissingType { .. } => context
            .with_suggestion("Add a 'component_type' key (or 'base' at the top level) to the data"),
        ExtgenError::UnknownComponentType { suggestions, .. } => {
            let context = context.with_suggestion("Run 'extgen types' to list available component types");
            if suggestions.is_empty() {
                context
            } else {
                context.with_details(format!("Did you mean: {}?", suggestions.join(", ")))
            }
        }
        ExtgenError::UnresolvedAcquisition { requester_type, .. } => context.with_details(format!(
            "The property is neither declared by {requester_type}, aliased by it, nor given an explicit source"
        )),
        ExtgenError::IncompatiblePresetMultiplicity { .. } => context
            .with_suggestion("Select a single preset, or make the forced property a list"),
        ExtgenError::UnknownPreset { .. } => {
            context.with_suggestion("Run 'extgen schema <TYPE>' to list the presets of a property")
        }
        ExtgenError::MissingRequiredProperty { property, .. } => {
            context.with_suggestion(format!("Set '{property}' in the specification"))
        }
        ExtgenError::MergeDataLoss { existing, incoming, .. } => context
            .with_details(format!("Existing value: {existing}; incoming value: {incoming}"))
            .with_suggestion("Make both requests for this component agree on the conflicting value"),
        ExtgenError::DuplicateLocalName { .. } => context
            .with_suggestion("Rename one of the colliding entries in the specification"),
        ExtgenError::ExpansionDepthExceeded { .. } | ExtgenError::CyclicExpansion { .. } => context
            .with_details("A component keeps requesting new sub-components, so expansion never terminates")
            .with_suggestion("Raise 'max_expansion_depth' in the configuration if the nesting is intentional"),
        ExtgenError::DuplicateFile { .. } => context
            .with_suggestion("Give the colliding components distinct names so their files differ"),
        ExtgenError::SpecParseError { .. } => {
            context.with_suggestion("Specifications are YAML or JSON mappings with a top-level 'base' key")
        }
        ExtgenError::ConfigError { .. } => {
            context.with_suggestion("Check the TOML syntax of the configuration file")
        }
        _ => context,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ExtgenError::DuplicateLocalName {
            requester: "root/permissions".to_string(),
            local_name: "edit".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Local name 'edit' is already used by another component requested by 'root/permissions'"
        );
    }

    #[test]
    fn test_user_friendly_unknown_type() {
        let error = ExtgenError::UnknownComponentType {
            component_type: "Permision".to_string(),
            suggestions: vec!["Permission".to_string()],
        };
        let ctx = user_friendly_error(error.into());
        assert!(ctx.message.contains("Permision"));
        assert_eq!(ctx.details.as_deref(), Some("Did you mean: Permission?"));
        assert!(ctx.suggestion.is_some());
    }

    #[test]
    fn test_user_friendly_keeps_outer_context() {
        let error = anyhow::Error::from(ExtgenError::RegistryLocked {
            local_name: "late".to_string(),
        })
        .context("Failed to generate extension");
        let ctx = user_friendly_error(error);
        assert!(ctx.message.contains("locked"));
        assert!(ctx.details.unwrap().contains("Failed to generate extension"));
    }

    #[test]
    fn test_error_context_display() {
        let ctx = ErrorContext::new("boom").with_details("why").with_suggestion("fix");
        assert_eq!(ctx.to_string(), "boom\nDetails: why\nSuggestion: fix");
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::Other, "disk");
        let error: ExtgenError = io.into();
        assert!(matches!(error, ExtgenError::Io(_)));
    }
}
