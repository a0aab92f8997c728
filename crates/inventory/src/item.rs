use serde::{Deserialize, Serialize};

use restock_core::{DomainError, Entity, ItemId, StoreId};

/// Number of daily observations in an item's demand history.
pub const HISTORY_WINDOW: usize = 45;

/// Product category.
///
/// The forecasting model is trained on the first five; `Uncategorized` covers
/// records fetched from a backend that carries no category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Category {
    Clothing,
    Electronics,
    Furniture,
    Groceries,
    Toys,
    Uncategorized,
}

impl Category {
    pub const MODELLED: [Category; 5] = [
        Category::Clothing,
        Category::Electronics,
        Category::Furniture,
        Category::Groceries,
        Category::Toys,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Clothing => "Clothing",
            Category::Electronics => "Electronics",
            Category::Furniture => "Furniture",
            Category::Groceries => "Groceries",
            Category::Toys => "Toys",
            Category::Uncategorized => "Uncategorized",
        }
    }

    /// Category id expected by the forecasting model.
    pub fn model_id(&self) -> Option<u8> {
        match self {
            Category::Clothing => Some(0),
            Category::Electronics => Some(1),
            Category::Furniture => Some(2),
            Category::Groceries => Some(3),
            Category::Toys => Some(4),
            Category::Uncategorized => None,
        }
    }

    /// Case-insensitive parse; unknown labels map to `Uncategorized`.
    pub fn parse_lenient(raw: &str) -> Self {
        let raw = raw.trim();
        Self::MODELLED
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw))
            .unwrap_or(Category::Uncategorized)
    }
}

impl core::fmt::Display for Category {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One day of demand history, keyed the way the forecasting model expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DemandObservation {
    #[serde(rename = "Lag_Sales_D-1")]
    pub lag_sales_d1: i64,
    #[serde(rename = "Lag_Sales_D-2")]
    pub lag_sales_d2: i64,
    #[serde(rename = "Lag_Sales_D-7")]
    pub lag_sales_d7: i64,
    #[serde(rename = "Lag_Inventory_D-1")]
    pub lag_inventory_d1: i64,
    #[serde(rename = "Rolling_Mean_7D")]
    pub rolling_mean_7d: i64,
    #[serde(rename = "Price")]
    pub price: i64,
    #[serde(rename = "Discount")]
    pub discount: f64,
    #[serde(rename = "Holiday/Promotion")]
    pub holiday_promotion: u8,
    #[serde(rename = "Competitor Pricing")]
    pub competitor_pricing: i64,
    #[serde(rename = "Region")]
    pub region: String,
    #[serde(rename = "Weather Condition")]
    pub weather_condition: String,
    #[serde(rename = "Seasonality")]
    pub seasonality: String,
}

/// Reorder point assumed when the source does not provide one.
pub fn default_reorder_point(current_stock: i64) -> i64 {
    (current_stock.max(0) as f64 * 0.3).floor() as i64 + 20
}

/// Unvalidated item fields, as they arrive from a backend or a generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewInventoryItem {
    #[serde(rename = "itemId")]
    pub id: ItemId,
    pub name: String,
    pub category: Category,
    pub price: f64,
    pub current_stock: i64,
    pub reorder_point: i64,
    pub store_id: StoreId,
    /// Oldest observation first.
    #[serde(rename = "historicalData", default, skip_serializing_if = "Option::is_none")]
    pub history: Option<Vec<DemandObservation>>,
}

/// Inventory master record.
///
/// Immutable once built; a reload replaces the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NewInventoryItem", into = "NewInventoryItem")]
pub struct InventoryItem {
    id: ItemId,
    name: String,
    category: Category,
    price: f64,
    current_stock: i64,
    reorder_point: i64,
    store_id: StoreId,
    history: Option<Vec<DemandObservation>>,
}

impl TryFrom<NewInventoryItem> for InventoryItem {
    type Error = DomainError;

    fn try_from(new: NewInventoryItem) -> Result<Self, Self::Error> {
        if new.name.trim().is_empty() {
            return Err(DomainError::validation(format!("item {}: name cannot be empty", new.id)));
        }
        if new.current_stock < 0 {
            return Err(DomainError::validation(format!(
                "item {}: current stock cannot be negative ({})",
                new.id, new.current_stock
            )));
        }
        if new.reorder_point < 0 {
            return Err(DomainError::validation(format!(
                "item {}: reorder point cannot be negative ({})",
                new.id, new.reorder_point
            )));
        }
        if !(new.price.is_finite() && new.price >= 0.0) {
            return Err(DomainError::validation(format!(
                "item {}: price must be a finite non-negative number",
                new.id
            )));
        }
        if let Some(history) = &new.history {
            if history.len() != HISTORY_WINDOW {
                return Err(DomainError::validation(format!(
                    "item {}: history must hold {HISTORY_WINDOW} observations, got {}",
                    new.id,
                    history.len()
                )));
            }
        }

        Ok(Self {
            id: new.id,
            name: new.name,
            category: new.category,
            price: new.price,
            current_stock: new.current_stock,
            reorder_point: new.reorder_point,
            store_id: new.store_id,
            history: new.history,
        })
    }
}

impl From<InventoryItem> for NewInventoryItem {
    fn from(item: InventoryItem) -> Self {
        Self {
            id: item.id,
            name: item.name,
            category: item.category,
            price: item.price,
            current_stock: item.current_stock,
            reorder_point: item.reorder_point,
            store_id: item.store_id,
            history: item.history,
        }
    }
}

impl InventoryItem {
    pub fn id(&self) -> &ItemId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn current_stock(&self) -> i64 {
        self.current_stock
    }

    pub fn reorder_point(&self) -> i64 {
        self.reorder_point
    }

    pub fn store_id(&self) -> &StoreId {
        &self.store_id
    }

    pub fn history(&self) -> Option<&[DemandObservation]> {
        self.history.as_deref()
    }

    /// Below the reorder point.
    pub fn is_below_reorder_point(&self) -> bool {
        self.current_stock < self.reorder_point
    }

    /// Case-insensitive substring match on name or category.
    pub fn matches(&self, needle_lowercase: &str) -> bool {
        needle_lowercase.is_empty()
            || self.name.to_lowercase().contains(needle_lowercase)
            || self.category.as_str().to_lowercase().contains(needle_lowercase)
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_item() -> NewInventoryItem {
        NewInventoryItem {
            id: ItemId::new("P1000").unwrap(),
            name: "Wool Sweater (000)".to_string(),
            category: Category::Clothing,
            price: 4150.0,
            current_stock: 40,
            reorder_point: 50,
            store_id: StoreId::new("S001").unwrap(),
            history: None,
        }
    }

    #[test]
    fn valid_item_is_built() {
        let item = InventoryItem::try_from(new_item()).unwrap();
        assert_eq!(item.id().as_str(), "P1000");
        assert!(item.is_below_reorder_point());
        assert!(item.history().is_none());
    }

    #[test]
    fn negative_stock_is_rejected() {
        let mut new = new_item();
        new.current_stock = -1;
        let err = InventoryItem::try_from(new).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn short_history_is_rejected() {
        let mut new = new_item();
        new.history = Some(Vec::new());
        let err = InventoryItem::try_from(new).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn deserialization_goes_through_validation() {
        let json = r#"{
            "itemId": "P1",
            "name": "Almond Milk",
            "category": "Groceries",
            "price": 120.0,
            "currentStock": -5,
            "reorderPoint": 20,
            "storeId": "S001"
        }"#;
        assert!(serde_json::from_str::<InventoryItem>(json).is_err());
    }

    #[test]
    fn category_parse_is_lenient() {
        assert_eq!(Category::parse_lenient(" toys "), Category::Toys);
        assert_eq!(Category::parse_lenient("Books"), Category::Uncategorized);
    }

    #[test]
    fn default_reorder_point_scales_with_stock() {
        assert_eq!(default_reorder_point(100), 50);
        assert_eq!(default_reorder_point(0), 20);
        assert_eq!(default_reorder_point(55), 36);
    }

    #[test]
    fn match_covers_name_and_category_case_insensitively() {
        let item = InventoryItem::try_from(new_item()).unwrap();
        assert!(item.matches("sweat"));
        assert!(item.matches("cloth"));
        assert!(item.matches(""));
        assert!(!item.matches("toys"));
    }
}
