use restock_inventory::{DemandObservation, InventoryItem};

use crate::recommendation::{FORECAST_HORIZON_DAYS, RecommendationResult, Verdict};

const RECENT_DAYS: usize = 7;
const MIN_ADJUSTMENT: f64 = 0.5;
const MAX_ADJUSTMENT: f64 = 1.5;

/// Ratio of recent to overall mean daily sales, clamped to `[0.5, 1.5]`.
///
/// Reads `lag_sales_d1` as the realised sales of each day; history is
/// oldest-first, so the recent window is the tail. No data or a zero overall
/// mean yields `1.0`.
pub fn demand_adjustment_factor(history: &[DemandObservation], recent_days: usize) -> f64 {
    if history.is_empty() || recent_days == 0 {
        return 1.0;
    }

    let overall = mean_sales(history);
    if overall == 0.0 {
        return 1.0;
    }

    let recent = &history[history.len().saturating_sub(recent_days)..];
    (mean_sales(recent) / overall).clamp(MIN_ADJUSTMENT, MAX_ADJUSTMENT)
}

fn mean_sales(days: &[DemandObservation]) -> f64 {
    days.iter().map(|d| d.lag_sales_d1 as f64).sum::<f64>() / days.len() as f64
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Local stand-in for the forecasting service.
///
/// Forecast = recent mean daily sales over the horizon, scaled by the
/// adjustment factor. The reorder point covers demand over the lead time plus
/// `safety_days` of demand; below it the verdict is `Restock`.
#[derive(Debug, Copy, Clone)]
pub struct HeuristicRecommender {
    lead_time_days: f64,
    safety_days: f64,
}

impl Default for HeuristicRecommender {
    fn default() -> Self {
        Self {
            lead_time_days: 7.0,
            safety_days: 3.0,
        }
    }
}

impl HeuristicRecommender {
    pub fn recommend(&self, item: &InventoryItem) -> RecommendationResult {
        let horizon = FORECAST_HORIZON_DAYS as f64;
        let history = item.history().unwrap_or_default();

        let base = if history.is_empty() {
            0.0
        } else {
            let recent = &history[history.len().saturating_sub(RECENT_DAYS)..];
            mean_sales(recent) * horizon
        };
        let predicted = base * demand_adjustment_factor(history, RECENT_DAYS);

        let daily = predicted / horizon;
        let safety = daily * self.safety_days;
        let reorder_point = daily * self.lead_time_days + safety;
        let stock = item.current_stock() as f64;

        let (verdict, suggested_quantity) = if stock < reorder_point {
            (Verdict::Restock, (predicted + safety - stock).ceil().max(0.0) as i64)
        } else {
            (Verdict::Hold, 0)
        };

        tracing::debug!(
            item_id = %item.id(),
            predicted,
            reorder_point,
            ?verdict,
            "heuristic recommendation"
        );

        RecommendationResult {
            item_id: item.id().clone(),
            predicted_demand: round2(predicted),
            verdict,
            suggested_quantity,
            reorder_point: round2(reorder_point),
        }
    }

    pub fn recommend_batch(&self, items: &[InventoryItem]) -> Vec<RecommendationResult> {
        items.iter().map(|item| self.recommend(item)).collect()
    }
}
