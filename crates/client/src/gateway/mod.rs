//! Access to the external recommendation service.
//!
//! `RecommendationSource` is the seam: the dashboard talks to it and never to
//! HTTP directly, so the offline source and test stubs slot in unchanged.

pub mod adapter;
pub mod error;
pub mod http;
pub mod offline;
pub mod wire;

use async_trait::async_trait;

use restock_ai::{Decision, RecommendationResult};
use restock_core::{ItemId, StoreId};
use restock_inventory::InventoryItem;

pub use adapter::normalize_warehouse_id;
pub use error::{GENERIC_FAILURE, GatewayError};
pub use http::HttpGateway;
pub use offline::OfflineSource;
pub use wire::Decoded;

#[async_trait]
pub trait RecommendationSource: Send + Sync {
    /// Current stock levels for the session's inventory.
    async fn fetch_inventory(&self) -> Result<Decoded<InventoryItem>, GatewayError>;

    /// One recommendation per item the service has an opinion on.
    async fn recommend_batch(
        &self,
        items: &[InventoryItem],
    ) -> Result<Decoded<RecommendationResult>, GatewayError>;

    /// Forecast and cheapest sourcing for one item at one store.
    async fn decide(&self, sku: &ItemId, store: &StoreId) -> Result<Decision, GatewayError>;
}
