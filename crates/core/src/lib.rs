//! `restock-core`: domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no IO, no HTTP, no runtime).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ItemId, StoreId, WarehouseId};
