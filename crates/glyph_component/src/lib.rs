//! # glyph_component
//!
//! The "C" in ECS — defines what a component is, how it is stored per
//! entity, and how component types are identified at runtime.
//!
//! This crate provides:
//!
//! - [`Component`] trait — the contract all per-entity behaviour satisfies.
//! - [`ComponentTypeId`] — small integer identifying a component type.
//! - [`ComponentRegistry`] — first-use type-id assignment with a checked
//!   capacity.
//! - [`ComponentStore`] — fixed-capacity slot array plus presence bitset,
//!   owned by each entity.
//! - [`Entity`] — named, tagged aggregate that owns its components.
//! - [`TickContext`] / [`GridCommand`] — the per-update view handed to
//!   components, including the deferred-mutation queue.
//! - [`GridPos`] — the integer coordinate the spatial layers key on.

pub mod component;
pub mod context;
pub mod entity;
pub mod error;
pub mod grid;
pub mod registry;
pub mod store;

pub use component::{Component, ComponentTypeId};
pub use context::{GridCommand, TickContext};
pub use entity::{Entity, EntityId, EntityIdAllocator};
pub use error::EcsError;
pub use grid::GridPos;
pub use registry::{ComponentRegistry, DEFAULT_MAX_COMPONENT_TYPES};
pub use store::{ComponentMask, ComponentStore};
