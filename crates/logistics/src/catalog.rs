//! Built-in network of warehouses and demand signals.

use serde::Serialize;

use restock_core::{DomainError, DomainResult, StoreId, WarehouseId};

use crate::geo::GeoPoint;

/// Urgency of a demand signal; lower is more urgent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Priority {
    Urgent = 1,
    Elevated = 2,
    Standard = 3,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SiteKind {
    Warehouse,
    Store,
    Relief,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub city: String,
    pub position: GeoPoint,
    pub kind: SiteKind,
    /// Set for demand signals only.
    pub priority: Option<Priority>,
}

impl Site {
    fn matches(&self, needle_lowercase: &str) -> bool {
        [&self.id, &self.name, &self.city]
            .iter()
            .any(|field| field.to_lowercase().contains(needle_lowercase))
    }
}

type Row = (&'static str, &'static str, &'static str, f64, f64);

// W001-W006 match the warehouse ids used by the forecasting backend.
const WAREHOUSES: [Row; 10] = [
    ("W001", "Delhi Warehouse", "Delhi, India", 28.7041, 77.1025),
    ("W002", "Mumbai Hub", "Mumbai, India", 19.0760, 72.8777),
    ("W003", "Chennai Port", "Chennai, India", 13.0827, 80.2707),
    ("W004", "Kolkata Depot", "Kolkata, India", 22.5726, 88.3639),
    ("W005", "Bangalore Tech Center", "Bangalore, India", 12.9716, 77.5946),
    ("W006", "Dubai Logistics City", "Dubai, UAE", 25.2048, 55.2708),
    ("wh-na-001", "Los Angeles Hub", "Los Angeles, USA", 34.0522, -118.2437),
    ("wh-eu-003", "London Gateway", "London, UK", 51.5074, -0.1278),
    ("wh-as-001", "Shanghai Port", "Shanghai, China", 31.2304, 121.4737),
    ("wh-au-001", "Sydney Port", "Sydney, Australia", -33.8688, 151.2093),
];

const DEMAND_SIGNALS: [(Row, SiteKind, Priority); 5] = [
    (
        ("S001", "Hyderabad Store", "Hyderabad, India", 17.3850, 78.4867),
        SiteKind::Store,
        Priority::Standard,
    ),
    (
        ("S002", "New York Store", "New York, USA", 40.7128, -74.0060),
        SiteKind::Store,
        Priority::Standard,
    ),
    (
        ("S003", "London Store", "London, UK", 51.5074, -0.1278),
        SiteKind::Store,
        Priority::Elevated,
    ),
    (
        ("S009", "Tokyo Store", "Tokyo, Japan", 35.6895, 139.6917),
        SiteKind::Store,
        Priority::Elevated,
    ),
    (
        ("dz-002", "Flood Relief - Jakarta", "Jakarta, Indonesia", -6.2088, 106.8456),
        SiteKind::Relief,
        Priority::Urgent,
    ),
];

fn site((id, name, city, lat, lon): Row, kind: SiteKind, priority: Option<Priority>) -> Site {
    Site {
        id: id.to_string(),
        name: name.to_string(),
        city: city.to_string(),
        position: GeoPoint::new(lat, lon),
        kind,
        priority,
    }
}

#[derive(Debug, Clone)]
pub struct Catalog {
    warehouses: Vec<Site>,
    demand_signals: Vec<Site>,
}

impl Catalog {
    pub fn builtin() -> Self {
        Self {
            warehouses: WAREHOUSES
                .into_iter()
                .map(|row| site(row, SiteKind::Warehouse, None))
                .collect(),
            demand_signals: DEMAND_SIGNALS
                .into_iter()
                .map(|(row, kind, priority)| site(row, kind, Some(priority)))
                .collect(),
        }
    }

    pub fn warehouses(&self) -> &[Site] {
        &self.warehouses
    }

    pub fn demand_signals(&self) -> &[Site] {
        &self.demand_signals
    }

    pub fn warehouse(&self, id: &WarehouseId) -> DomainResult<&Site> {
        self.warehouses
            .iter()
            .find(|w| w.id == id.as_str())
            .ok_or_else(|| DomainError::not_found(format!("warehouse {id}")))
    }

    pub fn store(&self, id: &StoreId) -> DomainResult<&Site> {
        self.demand_signals
            .iter()
            .find(|s| s.kind == SiteKind::Store && s.id == id.as_str())
            .ok_or_else(|| DomainError::not_found(format!("store {id}")))
    }

    /// Resolve any site (warehouse or demand signal) by exact id.
    pub fn site(&self, id: &str) -> DomainResult<&Site> {
        self.warehouses
            .iter()
            .chain(&self.demand_signals)
            .find(|s| s.id == id.trim())
            .ok_or_else(|| DomainError::not_found(format!("site {}", id.trim())))
    }

    /// Case-insensitive substring search over id, name and city.
    pub fn search<'a>(&'a self, sites: &'a [Site], term: &str) -> Vec<&'a Site> {
        let needle = term.trim().to_lowercase();
        sites.iter().filter(|s| s.matches(&needle)).collect()
    }
}
