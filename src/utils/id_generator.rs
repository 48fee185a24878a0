//! Identifier generators

use uuid::Uuid;

use crate::traits::IdGenerator;

/// Random v4 UUID identifiers, the default for interactive sessions
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl UuidIdGenerator {
    /// Create a new UUID generator
    pub fn new() -> Self {
        Self
    }
}

impl IdGenerator for UuidIdGenerator {
    fn next_id(&mut self) -> String {
        Uuid::new_v4().to_string()
    }
}

/// Monotonic `prefix-N` identifiers starting at 1
///
/// Deterministic, so identical inputs produce identical identifiers.
#[derive(Debug, Clone)]
pub struct SequentialIdGenerator {
    prefix: String,
    next: u64,
}

impl SequentialIdGenerator {
    /// Create a generator producing `id-1`, `id-2`, ...
    pub fn new() -> Self {
        Self::with_prefix("id".to_string())
    }

    /// Create a generator with a custom prefix
    pub fn with_prefix(prefix: String) -> Self {
        Self { prefix, next: 1 }
    }
}

impl Default for SequentialIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIdGenerator {
    fn next_id(&mut self) -> String {
        let id = format!("{}-{}", self.prefix, self.next);
        self.next += 1;
        id
    }
}
