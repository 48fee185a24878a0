//! Traits for dependency injection and extensibility

/// Source of record and match identifiers
///
/// The reconciliation store draws every identifier it hands out from an
/// implementation of this trait, so callers can swap random identifiers for a
/// deterministic sequence (tests, replayable sessions). Implementations must
/// never return the same identifier twice; the store rejects a repeated
/// identifier rather than reusing it.
pub trait IdGenerator: Send {
    /// Produce the next identifier
    fn next_id(&mut self) -> String;
}
