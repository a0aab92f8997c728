//! Synthetic inventory for demos and offline sessions.
//!
//! Ten named items per modelled category, each with a full demand history
//! shaped by a base level, a small trend, a weekly pattern and noise.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use restock_core::{DomainResult, ItemId, StoreId};

use crate::item::{
    Category, DemandObservation, HISTORY_WINDOW, InventoryItem, NewInventoryItem,
    default_reorder_point,
};

/// INR per USD used when pricing generated items.
pub const INR_CONVERSION_FACTOR: f64 = 83.0;

const FIRST_ITEM_NUMBER: u32 = 1000;
const ITEMS_PER_CATEGORY: usize = 10;
const WEEKLY_PATTERN: [f64; 7] = [0.8, 0.9, 0.85, 1.0, 1.2, 1.3, 0.9];
const MIN_DAILY_SALES: f64 = 10.0;

const REGIONS: [&str; 4] = ["North", "South", "East", "West"];
const WEATHERS: [&str; 3] = ["Sunny", "Rainy", "Cloudy"];
const SEASONS: [&str; 4] = ["Spring", "Summer", "Autumn", "Winter"];

fn names_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::Electronics => &[
            "Monitor 27\"",
            "Wireless Keyboard",
            "Noise-Cancelling Headphones",
            "External SSD 1TB",
            "Smart Home Hub",
            "Portable Speaker",
            "Ergonomic Mouse",
            "Gaming Laptop",
            "Power Bank",
            "4K Streaming Stick",
        ],
        Category::Groceries => &[
            "Organic Coffee Beans",
            "Almond Milk",
            "Whole Wheat Bread",
            "Avocados (Case)",
            "Artisan Cheese",
            "Free-Range Eggs",
            "Oatmeal",
            "Basmati Rice",
            "Frozen Pizza",
            "Sparkling Water",
        ],
        Category::Clothing => &[
            "Slim Fit Denim Jeans",
            "Classic White T-Shirt",
            "Wool Sweater",
            "Running Shoes",
            "Rain Jacket",
            "Black Dress Socks",
            "Casual Sneakers",
            "Graphic Hoodie",
            "Yoga Leggings",
            "Baseball Cap",
        ],
        Category::Furniture => &[
            "Modular Corner Desk",
            "Executive Office Chair",
            "Mid-Century Sideboard",
            "Queen Bed Frame",
            "4-Shelf Bookshelf",
            "Sectional Sofa",
            "Accent Lamp",
            "Dining Table (Oak)",
            "Bar Stools",
            "Memory Foam Mattress",
        ],
        Category::Toys => &[
            "Lego City Fire Truck",
            "Action Figure",
            "Remote Control Drone",
            "Board Game: Catan",
            "Puzzle Set",
            "Barbie Dreamhouse",
            "Wooden Blocks",
            "Model Car Kit",
            "Art Supplies Box",
            "Fidget Spinner",
        ],
        Category::Uncategorized => &[],
    }
}

/// Generator configuration.
#[derive(Debug, Clone)]
pub struct SyntheticInventory {
    seed: Option<u64>,
    store_id: StoreId,
}

impl SyntheticInventory {
    pub fn new(store_id: StoreId) -> Self {
        Self { seed: None, store_id }
    }

    /// Fix the seed; the same seed always yields the same inventory.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn generate(&self) -> DomainResult<Vec<InventoryItem>> {
        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut items = Vec::with_capacity(Category::MODELLED.len() * ITEMS_PER_CATEGORY);
        let mut number = FIRST_ITEM_NUMBER;

        for category in Category::MODELLED {
            let names = names_for(category);
            for slot in 0..ITEMS_PER_CATEGORY {
                let id = ItemId::new(format!("P{number}"))?;
                number += 1;

                let base_name = names
                    .get(slot)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| format!("Default {slot}"));
                let suffix = &id.as_str()[id.as_str().len().saturating_sub(3)..];

                let base_price: f64 = rng.gen_range(10.0..110.0);
                let current_stock: i64 = rng.gen_range(50..500);

                items.push(InventoryItem::try_from(NewInventoryItem {
                    name: format!("{base_name} ({suffix})"),
                    id,
                    category,
                    price: (base_price * INR_CONVERSION_FACTOR).round(),
                    current_stock,
                    reorder_point: default_reorder_point(current_stock),
                    store_id: self.store_id.clone(),
                    history: Some(demand_history(&mut rng)),
                })?);
            }
        }

        tracing::debug!(
            items = items.len(),
            seeded = self.seed.is_some(),
            "generated synthetic inventory"
        );
        Ok(items)
    }
}

/// Oldest-first daily history of `HISTORY_WINDOW` observations.
fn demand_history(rng: &mut StdRng) -> Vec<DemandObservation> {
    let base: f64 = rng.gen_range(20.0..50.0);
    let trend: f64 = rng.gen_range(-0.25..0.25);

    let mut sales: Vec<f64> = Vec::with_capacity(HISTORY_WINDOW);
    let mut history = Vec::with_capacity(HISTORY_WINDOW);

    for day in 0..HISTORY_WINDOW {
        let noise: f64 = rng.gen_range(-2.5..2.5);
        let today =
            ((base + day as f64 * trend) * WEEKLY_PATTERN[day % 7] + noise).max(MIN_DAILY_SALES);

        let lag = |back: usize| day.checked_sub(back).map(|d| sales[d]).unwrap_or(today);
        let (lag1, lag2, lag7) = (lag(1), lag(2), lag(7));

        history.push(DemandObservation {
            lag_sales_d1: lag1.floor() as i64,
            lag_sales_d2: lag2.floor() as i64,
            lag_sales_d7: lag7.floor() as i64,
            lag_inventory_d1: rng.gen_range(50..250),
            rolling_mean_7d: ((lag1 + lag2 + lag7) / 3.0).floor() as i64,
            price: rng.gen_range(20..120),
            discount: if rng.gen_bool(0.3) { 0.1 } else { 0.0 },
            holiday_promotion: u8::from(rng.gen_bool(0.1)),
            competitor_pricing: rng.gen_range(20..120),
            region: REGIONS[day % REGIONS.len()].to_string(),
            weather_condition: WEATHERS[day % WEATHERS.len()].to_string(),
            seasonality: SEASONS[day % SEASONS.len()].to_string(),
        });
        sales.push(today);
    }

    history
}
