//! ECS-layer error types.

/// Errors surfaced by component registration and storage.
///
/// Both variants are programmer errors made loud: the original failure modes
/// here would otherwise be silent slot overwrites or writes past the
/// presence bitset.
#[derive(Debug, thiserror::Error)]
pub enum EcsError {
    /// All configured component-type slots are taken; a new type cannot be
    /// registered.
    #[error(
        "component type capacity exhausted: {capacity} types already registered, cannot register `{type_name}`"
    )]
    TypeCapacityExhausted {
        /// The type whose registration was refused.
        type_name: &'static str,
        /// The registry's configured capacity.
        capacity: usize,
    },

    /// The entity already holds a component of this type.
    #[error("entity already has a `{type_name}` component")]
    DuplicateComponent {
        /// The offending component type.
        type_name: &'static str,
    },
}
