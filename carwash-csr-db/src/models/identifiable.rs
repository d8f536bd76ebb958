use heapless::String as HeaplessString;

/// Prefixed string identifier used throughout the dashboard
/// (`req-004`, `cust-1001`, `sub-001`, `veh-101`).
pub type EntityId = HeaplessString<40>;

/// Trait for entities that can be uniquely identified
pub trait Identifiable {
    /// Returns the unique identifier of the entity
    fn get_id(&self) -> &EntityId;
}
