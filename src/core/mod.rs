//! Core business logic - pure, framework-agnostic functions.
//!
//! Nothing in this module performs I/O. Stats, validation, identifier
//! generation, and formatting are all deterministic transformations the
//! stores and the UI layer call on demand.

/// Display formatting for prices, percentages, and timestamps
pub mod format;
/// UUID v4 identifier generation
pub mod id;
/// Derived shopping statistics for a list of items
pub mod stats;
/// Total validator functions for user-supplied form fields
pub mod validation;
