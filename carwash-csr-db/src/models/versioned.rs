use super::identifiable::Identifiable;

/// Trait for mutable aggregates guarded by optimistic concurrency.
///
/// The version read from the store must accompany every write; a write
/// against a stale version is rejected with a conflict so two CSRs editing
/// the same record cannot silently overwrite each other.
pub trait Versioned: Identifiable {
    /// Returns the version of the snapshot held in memory
    fn get_version(&self) -> i64;
}
