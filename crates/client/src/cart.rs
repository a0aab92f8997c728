//! The restock cart: at most one line per item, critical lines first.

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use restock_ai::{
    Badge, Decision, PolicyError, RecommendationResult, RestockConfig, RestockStatus,
    compute_restock_decision,
};
use restock_core::{DomainError, DomainResult, ItemId, WarehouseId};
use restock_inventory::{InventoryItem, ItemLookup};

/// Where a line ships from, when a single-item decision supplied it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sourcing {
    pub warehouse: WarehouseId,
    pub transport: String,
    pub total_cost: f64,
}

/// An item merged with a recommendation and the policy's verdict on it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub item: InventoryItem,
    pub predicted_demand: f64,
    pub order_quantity: i64,
    pub status: RestockStatus,
    pub is_critical: bool,
    pub badge: Badge,
    /// What the service proposed; the policy's `order_quantity` wins.
    pub service_suggested_quantity: i64,
    /// Informational; status uses the item's stored reorder point.
    pub service_reorder_point: Option<f64>,
    pub sourcing: Option<Sourcing>,
}

impl CartLine {
    fn build(
        item: &InventoryItem,
        predicted_demand: f64,
        config: &RestockConfig,
    ) -> Result<Self, PolicyError> {
        let decision = compute_restock_decision(item, predicted_demand, config)?;
        Ok(Self {
            item: item.clone(),
            predicted_demand,
            order_quantity: decision.order_quantity,
            status: decision.status,
            is_critical: decision.is_critical,
            badge: decision.status.badge(),
            service_suggested_quantity: 0,
            service_reorder_point: None,
            sourcing: None,
        })
    }

    pub fn from_recommendation(
        item: &InventoryItem,
        rec: &RecommendationResult,
        config: &RestockConfig,
    ) -> Result<Self, PolicyError> {
        let mut line = Self::build(item, rec.predicted_demand, config)?;
        line.service_suggested_quantity = rec.suggested_quantity;
        line.service_reorder_point = Some(rec.reorder_point);
        Ok(line)
    }

    pub fn from_decision(
        item: &InventoryItem,
        decision: &Decision,
        config: &RestockConfig,
    ) -> Result<Self, PolicyError> {
        let mut line = Self::build(item, decision.forecast, config)?;
        line.service_suggested_quantity = decision.order_quantity.max(0.0).ceil() as i64;
        line.sourcing = Some(Sourcing {
            warehouse: decision.recommended_warehouse.clone(),
            transport: decision.transport.clone(),
            total_cost: decision.total_cost,
        });
        Ok(line)
    }

    pub fn item_id(&self) -> &ItemId {
        self.item.id()
    }

    /// Order quantity at the item's unit price.
    pub fn estimated_cost(&self) -> f64 {
        self.order_quantity as f64 * self.item.price()
    }
}

/// Dashboard headline figures.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartSummary {
    pub total_products: usize,
    pub lines: usize,
    pub critical: usize,
    pub total_order_value: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestockCart {
    lines: Vec<CartLine>,
    generation_id: Option<Uuid>,
    generated_at: Option<DateTime<Utc>>,
}

impl Default for RestockCart {
    fn default() -> Self {
        Self::new()
    }
}

impl RestockCart {
    pub fn new() -> Self {
        Self {
            lines: Vec::new(),
            generation_id: None,
            generated_at: None,
        }
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Id of the batch generation that produced the current lines.
    pub fn generation_id(&self) -> Option<Uuid> {
        self.generation_id
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.generated_at
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.lines.iter().any(|line| line.item_id() == id)
    }

    /// Replace every line at once. Critical lines move to the front; the
    /// sort is stable so relative order is kept otherwise.
    pub fn replace_with(&mut self, mut lines: Vec<CartLine>, generation_id: Uuid) {
        lines.sort_by_key(|line| !line.is_critical);
        self.lines = lines;
        self.generation_id = Some(generation_id);
        self.generated_at = Some(Utc::now());
    }

    /// Append a single line; rejects a second line for the same item.
    pub fn add(&mut self, line: CartLine) -> DomainResult<()> {
        if self.contains(line.item_id()) {
            return Err(DomainError::duplicate(format!(
                "{} is already in the restock list",
                line.item.name()
            )));
        }
        self.lines.push(line);
        Ok(())
    }

    pub fn summary(&self, total_products: usize) -> CartSummary {
        CartSummary {
            total_products,
            lines: self.lines.len(),
            critical: self.lines.iter().filter(|l| l.is_critical).count(),
            total_order_value: self.lines.iter().map(CartLine::estimated_cost).sum(),
        }
    }
}

/// Lines built from a batch, plus what was skipped on the way.
#[derive(Debug, Default)]
pub struct BatchLines {
    pub lines: Vec<CartLine>,
    pub skipped: Vec<DomainError>,
}

/// Turn batch recommendations into cart lines.
///
/// Only `Restock` verdicts become lines. A result naming an unknown item, a
/// repeated result for the same item, or one the policy rejects is skipped
/// and recorded; the rest of the batch goes on.
pub fn build_batch_lines(
    lookup: &ItemLookup<'_>,
    recommendations: &[RecommendationResult],
    config: &RestockConfig,
) -> BatchLines {
    let mut out = BatchLines::default();

    for rec in recommendations.iter().filter(|r| r.verdict.is_restock()) {
        let Some(item) = lookup.get(&rec.item_id) else {
            tracing::warn!(item_id = %rec.item_id, "recommendation for unknown item");
            out.skipped.push(DomainError::data_integrity(format!(
                "recommendation references unknown item {}",
                rec.item_id
            )));
            continue;
        };

        if out.lines.iter().any(|l| l.item_id() == &rec.item_id) {
            tracing::warn!(item_id = %rec.item_id, "repeated recommendation ignored");
            out.skipped.push(DomainError::duplicate(format!(
                "repeated recommendation for {}",
                rec.item_id
            )));
            continue;
        }

        match CartLine::from_recommendation(item, rec, config) {
            Ok(line) => out.lines.push(line),
            Err(err) => {
                tracing::warn!(
                    item_id = %rec.item_id,
                    error = %err,
                    "recommendation rejected by policy"
                );
                out.skipped.push(err.into());
            }
        }
    }

    out
}
