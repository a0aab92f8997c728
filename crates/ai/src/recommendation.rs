//! Results of the external recommendation/forecasting service, in typed form.

use serde::{Deserialize, Serialize};

use restock_core::{ItemId, StoreId, WarehouseId};

/// Demand predictions cover this many days.
pub const FORECAST_HORIZON_DAYS: u32 = 7;

/// The service's verdict for one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Restock,
    Hold,
    /// A verdict this client does not know; never turned into a cart line.
    Other(String),
}

impl Verdict {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            s if s.eq_ignore_ascii_case("restock") => Verdict::Restock,
            s if s.eq_ignore_ascii_case("hold") => Verdict::Hold,
            s => Verdict::Other(s.to_string()),
        }
    }

    pub fn is_restock(&self) -> bool {
        matches!(self, Verdict::Restock)
    }
}

/// One batch recommendation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    pub item_id: ItemId,
    /// Predicted demand over [`FORECAST_HORIZON_DAYS`].
    pub predicted_demand: f64,
    pub verdict: Verdict,
    pub suggested_quantity: i64,
    /// Reorder point the service used; informational only.
    pub reorder_point: f64,
}

/// Single-item decision: forecast plus the cheapest sourcing option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub sku: ItemId,
    pub store_id: Option<StoreId>,
    pub forecast: f64,
    pub recommended_warehouse: WarehouseId,
    pub transport: String,
    pub total_cost: f64,
    pub order_quantity: f64,
    pub unit_cost: Option<f64>,
}
