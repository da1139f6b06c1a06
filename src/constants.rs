//! Global constants used throughout the extgen codebase.
//!
//! This module contains the reserved data keys, the tokens understood by
//! merge tags and containment declarations, and the numeric limits that are
//! shared between the collector, the registry and the assembler. Defining
//! them centrally keeps the token grammar discoverable in one place.

/// Key under which every component data subtree declares its component type.
pub const TYPE_KEY: &str = "component_type";

/// Key used by root specifications to declare the root component type.
///
/// Root input documents read more naturally with `base: module` than with
/// `component_type: Module`, so the collector accepts either at any level.
pub const ROOT_TYPE_KEY: &str = "base";

/// Local name given to the component that starts a generation run.
pub const ROOT_LOCAL_NAME: &str = "root";

/// Containment token: the run's outermost root component.
pub const TOKEN_ROOT: &str = "%root";

/// Containment and merge-tag token: the direct requester.
pub const TOKEN_REQUESTER: &str = "%requester";

/// Containment token step: the component the path is currently at.
pub const TOKEN_SELF: &str = "%self";

/// Containment token step: the closest requesting root of the current step.
pub const TOKEN_NEAREST_ROOT: &str = "%nearest_root";

/// Separator between steps of a compound containment token.
pub const TOKEN_SEPARATOR: char = ':';

/// Separator between local names in a request path.
pub const REQUEST_PATH_SEPARATOR: char = '/';

/// Default maximum depth of the required-components recursion.
///
/// Well-formed component libraries bottom out after a handful of levels;
/// anything deeper than this almost certainly comes from a component that
/// keeps requesting fresh children.
pub const DEFAULT_MAX_EXPANSION_DEPTH: usize = 64;

/// Default environment version used for version-specialized type resolution.
pub const DEFAULT_CORE_VERSION: u32 = 10;

/// Maximum number of "did you mean" suggestions for an unknown component type.
pub const MAX_TYPE_SUGGESTIONS: usize = 3;

/// Maximum Levenshtein distance for a type name to be offered as a suggestion.
pub const TYPE_SUGGESTION_DISTANCE: usize = 3;
