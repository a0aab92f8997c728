//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// Lookups and duplicate checks across the workspace key on `Entity::id`, so
/// two values with the same id are treated as the same record.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
