//! Inventory domain module.
//!
//! This crate owns the inventory master data and its pure projections
//! (lookup by id, grouped/filtered view, stock gauge). It performs no IO;
//! items arrive from the gateway or the synthetic generator and are replaced
//! wholesale on reload.

pub mod gauge;
pub mod item;
pub mod store;
pub mod synthetic;

pub use gauge::{StockGauge, StockLevel, stock_gauge};
pub use item::{
    Category, DemandObservation, HISTORY_WINDOW, InventoryItem, NewInventoryItem,
    default_reorder_point,
};
pub use store::{
    CategoryGroup, GroupedView, InventoryStore, ItemLookup, group_and_filter, lookup_by_id,
};
pub use synthetic::SyntheticInventory;
