use async_trait::async_trait;

use restock_ai::{Decision, HeuristicRecommender, RecommendationResult};
use restock_core::{ItemId, StoreId};
use restock_inventory::{InventoryItem, SyntheticInventory};

use super::wire::Decoded;
use super::{GatewayError, RecommendationSource};

/// Source used when the service is unreachable: synthetic stock and the
/// local demand heuristic. It has no sourcing data, so `decide` fails.
#[derive(Debug, Clone)]
pub struct OfflineSource {
    generator: SyntheticInventory,
    recommender: HeuristicRecommender,
}

impl OfflineSource {
    pub fn new(store_id: StoreId, seed: Option<u64>) -> Self {
        let generator = SyntheticInventory::new(store_id);
        let generator = match seed {
            Some(seed) => generator.with_seed(seed),
            None => generator,
        };
        Self {
            generator,
            recommender: HeuristicRecommender::default(),
        }
    }
}

#[async_trait]
impl RecommendationSource for OfflineSource {
    async fn fetch_inventory(&self) -> Result<Decoded<InventoryItem>, GatewayError> {
        Ok(Decoded::new(self.generator.generate()?))
    }

    async fn recommend_batch(
        &self,
        items: &[InventoryItem],
    ) -> Result<Decoded<RecommendationResult>, GatewayError> {
        tracing::info!(items = items.len(), "using offline heuristic");
        Ok(Decoded::new(self.recommender.recommend_batch(items)))
    }

    async fn decide(&self, sku: &ItemId, _store: &StoreId) -> Result<Decision, GatewayError> {
        Err(GatewayError::Unavailable(format!(
            "sourcing decision for {sku} requires the forecasting service"
        )))
    }
}
