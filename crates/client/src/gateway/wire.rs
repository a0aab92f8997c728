//! Wire schema of the recommendation service and its validated decode.
//!
//! Responses are decoded record by record: a malformed record is rejected as
//! a data-integrity warning and never aborts the rest of the payload.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use restock_ai::{Decision, RecommendationResult, Verdict};
use restock_core::{DomainError, DomainResult, ItemId, StoreId};
use restock_inventory::{
    Category, DemandObservation, InventoryItem, NewInventoryItem, default_reorder_point,
};

use crate::gateway::GatewayError;
use crate::gateway::adapter::normalize_warehouse_id;

/// Records that decoded cleanly plus the ones rejected on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded<T> {
    pub records: Vec<T>,
    pub rejected: Vec<DomainError>,
}

impl<T> Decoded<T> {
    pub fn new(records: Vec<T>) -> Self {
        Self {
            records,
            rejected: Vec::new(),
        }
    }
}

/// Body of `POST /api/recommend_batch`.
#[derive(Debug, Serialize)]
pub struct BatchRequest<'a> {
    pub inventory_items: Vec<BatchItem<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchItem<'a> {
    pub item_id: &'a str,
    pub name: &'a str,
    pub category: &'static str,
    pub category_id: Option<u8>,
    pub current_stock: i64,
    pub price: f64,
    pub reorder_point: i64,
    pub store_id: &'a str,
    #[serde(rename = "historicalData")]
    pub historical_data: &'a [DemandObservation],
}

impl<'a> BatchRequest<'a> {
    pub fn new(items: &'a [InventoryItem]) -> Self {
        Self {
            inventory_items: items
                .iter()
                .map(|item| BatchItem {
                    item_id: item.id().as_str(),
                    name: item.name(),
                    category: item.category().as_str(),
                    category_id: item.category().model_id(),
                    current_stock: item.current_stock(),
                    price: item.price(),
                    reorder_point: item.reorder_point(),
                    store_id: item.store_id().as_str(),
                    historical_data: item.history().unwrap_or_default(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawInventoryRecord {
    sku: Option<String>,
    quantity_units: Option<f64>,
    store_id: Option<String>,
    name: Option<String>,
    category: Option<String>,
    price: Option<f64>,
    reorder_point: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    #[serde(rename = "itemId")]
    item_id: Option<String>,
    recommendation: Option<String>,
    predicted_demand_next_7_days: Option<f64>,
    suggested_quantity: Option<f64>,
    reorder_point: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawDecision {
    sku: Option<String>,
    forecast: Option<f64>,
    recommended_warehouse: Option<Value>,
    transport: Option<String>,
    total_cost: Option<f64>,
    order_quantity: Option<f64>,
    store_id: Option<String>,
    unit_cost: Option<f64>,
}

fn required<T>(value: Option<T>, record: &str, field: &str) -> DomainResult<T> {
    value.ok_or_else(|| {
        DomainError::data_integrity(format!("{record} record is missing `{field}`"))
    })
}

fn non_negative(value: f64, record: &str, field: &str) -> DomainResult<f64> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::data_integrity(format!(
            "{record} record has invalid `{field}` ({value})"
        )));
    }
    Ok(value)
}

fn whole_units(value: f64, record: &str, field: &str) -> DomainResult<i64> {
    Ok(non_negative(value, record, field)?.round() as i64)
}

fn expect_array(body: Value) -> Result<Vec<Value>, GatewayError> {
    match body {
        Value::Array(values) => Ok(values),
        other => Err(GatewayError::Decode(format!(
            "expected a JSON array, got {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn decode_each<T>(
    body: Value,
    mut decode: impl FnMut(Value) -> DomainResult<T>,
) -> Result<Decoded<T>, GatewayError> {
    let mut decoded = Decoded::new(Vec::new());
    for value in expect_array(body)? {
        match decode(value) {
            Ok(record) => decoded.records.push(record),
            Err(err) => {
                tracing::warn!(error = %err, "rejected service record");
                decoded.rejected.push(err);
            }
        }
    }
    Ok(decoded)
}

fn parse<T: for<'de> Deserialize<'de>>(value: Value, record: &str) -> DomainResult<T> {
    serde_json::from_value(value)
        .map_err(|e| DomainError::data_integrity(format!("malformed {record} record: {e}")))
}

/// Decode `GET /inventory`.
pub fn decode_inventory(
    body: Value,
    default_store: &StoreId,
) -> Result<Decoded<InventoryItem>, GatewayError> {
    decode_each(body, |value| {
        let raw: RawInventoryRecord = parse(value, "inventory")?;
        let sku = ItemId::new(required(raw.sku, "inventory", "sku")?)
            .map_err(|e| DomainError::data_integrity(e.to_string()))?;
        let quantity = required(raw.quantity_units, "inventory", "quantity_units")?;
        let current_stock = whole_units(quantity, "inventory", "quantity_units")?;
        let reorder_point = match raw.reorder_point {
            Some(rop) => whole_units(rop, "inventory", "reorder_point")?,
            None => default_reorder_point(current_stock),
        };
        let store_id = match raw.store_id {
            Some(store) => {
                StoreId::new(store).map_err(|e| DomainError::data_integrity(e.to_string()))?
            }
            None => default_store.clone(),
        };

        InventoryItem::try_from(NewInventoryItem {
            name: raw.name.unwrap_or_else(|| sku.to_string()),
            id: sku,
            category: raw
                .category
                .as_deref()
                .map(Category::parse_lenient)
                .unwrap_or(Category::Uncategorized),
            price: raw.price.unwrap_or(0.0),
            current_stock,
            reorder_point,
            store_id,
            history: None,
        })
        .map_err(|e| DomainError::data_integrity(e.to_string()))
    })
}

/// Decode `POST /api/recommend_batch`.
pub fn decode_recommendations(body: Value) -> Result<Decoded<RecommendationResult>, GatewayError> {
    decode_each(body, |value| {
        let raw: RawRecommendation = parse(value, "recommendation")?;
        let item_id = ItemId::new(required(raw.item_id, "recommendation", "itemId")?)
            .map_err(|e| DomainError::data_integrity(e.to_string()))?;
        let predicted_demand = required(
            raw.predicted_demand_next_7_days,
            "recommendation",
            "predicted_demand_next_7_days",
        )?;
        if !(predicted_demand.is_finite() && predicted_demand >= 0.0) {
            return Err(DomainError::data_integrity(format!(
                "recommendation for {item_id} has invalid predicted demand ({predicted_demand})"
            )));
        }

        let verdict = required(raw.recommendation, "recommendation", "recommendation")?;

        Ok(RecommendationResult {
            verdict: Verdict::parse(&verdict),
            suggested_quantity: whole_units(
                required(raw.suggested_quantity, "recommendation", "suggested_quantity")?,
                "recommendation",
                "suggested_quantity",
            )?,
            reorder_point: required(raw.reorder_point, "recommendation", "reorder_point")?,
            predicted_demand,
            item_id,
        })
    })
}

fn decision_amount(value: Option<f64>, field: &str) -> DomainResult<f64> {
    non_negative(required(value, "decision", field)?, "decision", field)
}

/// Decode `GET /predict`. A single malformed decision is a decode failure.
pub fn decode_decision(body: Value) -> Result<Decision, GatewayError> {
    let decode = || -> DomainResult<Decision> {
        let raw: RawDecision = parse(body, "decision")?;
        let warehouse = required(raw.recommended_warehouse, "decision", "recommended_warehouse")?;
        let warehouse = match warehouse {
            Value::String(s) => normalize_warehouse_id(&s)?,
            Value::Number(n) => normalize_warehouse_id(&n.to_string())?,
            other => {
                return Err(DomainError::data_integrity(format!(
                    "decision has {} as recommended_warehouse",
                    json_kind(&other)
                )));
            }
        };

        Ok(Decision {
            sku: ItemId::new(required(raw.sku, "decision", "sku")?)?,
            store_id: raw.store_id.map(StoreId::new).transpose()?,
            forecast: decision_amount(raw.forecast, "forecast")?,
            recommended_warehouse: warehouse,
            transport: required(raw.transport, "decision", "transport")?,
            total_cost: decision_amount(raw.total_cost, "total_cost")?,
            order_quantity: decision_amount(raw.order_quantity, "order_quantity")?,
            unit_cost: raw
                .unit_cost
                .map(|cost| non_negative(cost, "decision", "unit_cost"))
                .transpose()?,
        })
    };

    decode().map_err(|e| {
        tracing::warn!(error = %e, "rejected decision");
        GatewayError::Decode(e.to_string())
    })
}

/// Pull a human-readable message out of an error body.
///
/// FastAPI answers with `detail`, Flask with `error`; `message` is accepted too.
pub fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    ["detail", "message", "error"]
        .iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}
