use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;

use restock_ai::{Decision, RecommendationResult};
use restock_core::{ItemId, StoreId};
use restock_inventory::InventoryItem;

use super::wire::{self, BatchRequest, Decoded};
use super::{GatewayError, RecommendationSource};

/// HTTP client for the forecasting service.
#[derive(Debug, Clone)]
pub struct HttpGateway {
    client: Client,
    base_url: String,
    default_store: StoreId,
}

impl HttpGateway {
    pub fn new(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
        default_store: StoreId,
    ) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        let base_url = base_url.into().trim().trim_end_matches('/').to_string();
        Ok(Self {
            client,
            base_url,
            default_store,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-2xx answer into `Service`, otherwise read the JSON body.
    async fn read_json(resp: Response) -> Result<Value, GatewayError> {
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let message = wire::error_message(&body);
            tracing::warn!(
                status = status.as_u16(),
                message = ?message,
                "service returned an error"
            );
            return Err(GatewayError::Service {
                status: status.as_u16(),
                message,
            });
        }
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| GatewayError::Decode(e.to_string()))
    }
}

#[async_trait]
impl RecommendationSource for HttpGateway {
    async fn fetch_inventory(&self) -> Result<Decoded<InventoryItem>, GatewayError> {
        let resp = self.client.get(self.url("/inventory")).send().await?;
        let decoded = wire::decode_inventory(Self::read_json(resp).await?, &self.default_store)?;
        tracing::info!(
            records = decoded.records.len(),
            rejected = decoded.rejected.len(),
            "fetched inventory"
        );
        Ok(decoded)
    }

    async fn recommend_batch(
        &self,
        items: &[InventoryItem],
    ) -> Result<Decoded<RecommendationResult>, GatewayError> {
        let resp = self
            .client
            .post(self.url("/api/recommend_batch"))
            .json(&BatchRequest::new(items))
            .send()
            .await?;
        let decoded = wire::decode_recommendations(Self::read_json(resp).await?)?;
        tracing::info!(
            sent = items.len(),
            received = decoded.records.len(),
            rejected = decoded.rejected.len(),
            "batch recommendations received"
        );
        Ok(decoded)
    }

    async fn decide(&self, sku: &ItemId, store: &StoreId) -> Result<Decision, GatewayError> {
        let resp = self
            .client
            .get(self.url("/predict"))
            .query(&[("sku", sku.as_str()), ("store_id", store.as_str())])
            .send()
            .await?;
        let decision = wire::decode_decision(Self::read_json(resp).await?)?;
        tracing::info!(
            sku = %decision.sku,
            warehouse = %decision.recommended_warehouse,
            transport = %decision.transport,
            "decision received"
        );
        Ok(decision)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let gateway = HttpGateway::new(
            " http://127.0.0.1:8000/ ",
            None,
            StoreId::new("S001").unwrap(),
        )
        .unwrap();
        assert_eq!(gateway.base_url(), "http://127.0.0.1:8000");
        assert_eq!(gateway.url("/predict"), "http://127.0.0.1:8000/predict");
    }
}
