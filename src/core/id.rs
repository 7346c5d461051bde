//! Identifier generation.

use uuid::Uuid;

/// Generates a fresh entity identifier.
///
/// Returns a version-4 UUID in canonical hyphenated form (36 characters).
#[must_use]
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
