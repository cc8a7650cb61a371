//! ID generation.

use ulid::Ulid;

/// Generates primary keys for every table.
///
/// Keys are lowercase ULIDs: 26 characters, sortable by creation time at
/// millisecond resolution.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdGenerator;

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Generate a new ID.
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}
