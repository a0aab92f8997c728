//! Warehouse-to-store logistics.
//!
//! A fixed catalog of warehouses and demand signals (stores, relief zones) and
//! great-circle routing between them. Map rendering is left to the UI.

pub mod catalog;
pub mod geo;
pub mod route;

pub use catalog::{Catalog, Priority, Site, SiteKind};
pub use geo::{EARTH_RADIUS_M, GeoPoint, distance_m};
pub use route::{Route, plan_route};
