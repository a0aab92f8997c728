use serde::Serialize;

/// Coarse health of an item's stock relative to its reorder point.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StockLevel {
    Critical,
    Warning,
    Healthy,
}

/// Fill gauge for one item. "Full" is 2.5× the reorder point.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct StockGauge {
    pub percent: f64,
    pub level: StockLevel,
}

pub fn stock_gauge(current_stock: i64, reorder_point: i64) -> StockGauge {
    let level = if current_stock < reorder_point {
        StockLevel::Critical
    } else if i128::from(current_stock) * 2 < i128::from(reorder_point) * 3 {
        StockLevel::Warning
    } else {
        StockLevel::Healthy
    };

    let full = reorder_point as f64 * 2.5;
    let percent = if full <= 0.0 {
        100.0
    } else {
        (current_stock as f64 / full * 100.0).clamp(0.0, 100.0)
    };

    StockGauge { percent, level }
}
