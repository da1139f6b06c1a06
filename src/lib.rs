//! extgen - Extension code generator
//!
//! extgen turns a declarative description of an extension ("a module named
//! `foo` with these permissions, a cron hook and a block plugin") into the
//! files that implement it. The description is expanded into a graph of
//! components: each component fills in its data from a property schema,
//! requests the further components it needs, and is merged with equivalent
//! requests made elsewhere in the graph. Once expansion finishes, components
//! are arranged by what contains what and rendered into files, merging with
//! files that already exist in the target extension.
//!
//! # Architecture Overview
//!
//! A generation run goes through four stages:
//!
//! 1. **Preparation** ([`prepare`]) - acquire values from the requester,
//!    apply defaults and presets, run processing callbacks, recurse into
//!    compound properties, enforce required properties
//! 2. **Collection** ([`collector`]) - instantiate components, merge
//!    equivalent ones, expand their bound properties and required components
//! 3. **Containment** ([`collection`]) - resolve each component's
//!    containment token into a parent, forming the output tree
//! 4. **Assembly** ([`assembler`]) - render the tree bottom-up into files,
//!    substitute tokens and merge with existing files
//!
//! # Core Modules
//!
//! ## Engine
//! - [`schema`] - Property definitions, presets and the schema cache
//! - [`types`] - Component type registry with version specialization
//! - [`component`] - The [`component::Component`] contract and data merging
//! - [`prepare`] - The data preparer
//! - [`collector`] - Recursive expansion with merge deduplication
//! - [`collection`] - Component arena, merge-tag table and containment tree
//! - [`assembler`] - Output assembly and the existing-extension read model
//! - [`generator`] - One run, end to end
//!
//! ## Component Library
//! - [`components`] - Built-in component types (module, info file,
//!   permissions, hooks, plugins, services, routes, forms, readme)
//!
//! ## Supporting Modules
//! - [`cli`] - Command-line interface
//! - [`config`] - Generator configuration (`~/.extgen/config.toml`)
//! - [`constants`] - Reserved keys, tokens and default limits
//! - [`core`] - Errors and component data helpers
//! - [`utils`] - Identifier case helpers and atomic file writes
//!
//! # Specification Format
//!
//! ```yaml
//! base: module
//! root_name: my_module
//! readable_name: My Module
//! permissions:
//!   - permission: administer my module
//!     title: Administer My Module
//! hooks: [cron, form_alter]
//! plugins:
//!   - plugin_type: block
//!     plugin_name: alpha
//! router_items:
//!   - path: /my-module/list
//!     controller: Controller\ListController
//!     permission: administer my module
//! readme: true
//! ```
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Generate into ./my_module
//! extgen generate my_module.yml
//!
//! # Preview against an existing module
//! extgen generate my_module.yml --output web/modules/custom/my_module --dry-run
//!
//! # See how the specification expands
//! extgen tree my_module.yml
//! ```

// Engine
pub mod assembler;
pub mod collection;
pub mod collector;
pub mod component;
pub mod generator;
pub mod prepare;
pub mod schema;
pub mod types;

// Component library
pub mod components;

// Supporting modules
pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
