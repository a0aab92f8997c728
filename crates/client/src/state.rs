//! Application state: one owner for inventory, cart and notices.
//!
//! Every mutation goes through a named operation on [`Dashboard`]. The state
//! lock is never held across a request to the recommendation service.

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex as StdMutex};

use serde::Serialize;
use tokio::sync::Mutex;
use uuid::Uuid;

use restock_ai::{Decision, RestockConfig};
use restock_core::{DomainError, ItemId, StoreId};
use restock_inventory::{Category, InventoryItem, InventoryStore};

use crate::cart::{CartLine, CartSummary, RestockCart, build_batch_lines};
use crate::gateway::{GatewayError, RecommendationSource};
use crate::notice::{Notice, Notices};

#[derive(Debug, Default)]
struct DashboardState {
    inventory: InventoryStore,
    cart: RestockCart,
    search_term: String,
    last_error: Option<String>,
    notices: Notices,
}

/// Result of a successful batch generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchOutcome {
    pub generation_id: Uuid,
    pub lines: usize,
    pub critical: usize,
    /// Recommendations dropped as malformed, unknown or repeated.
    pub skipped: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub enum AddOutcome {
    Added,
    AlreadyInCart,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct LoadOutcome {
    pub loaded: usize,
    pub rejected: usize,
}

/// One category of the filtered view, detached from the state lock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategorySection {
    pub category: Category,
    pub items: Vec<InventoryItem>,
}

/// Clears the flag when the request finishes or its future is dropped.
struct FlagGuard<'a>(&'a AtomicBool);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Releases a per-item reservation on drop.
struct PendingGuard<'a> {
    pending: &'a StdMutex<HashSet<ItemId>>,
    item_id: ItemId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.remove(&self.item_id);
    }
}

/// Shared handle to the dashboard; cheap to clone.
#[derive(Clone)]
pub struct Dashboard {
    source: Arc<dyn RecommendationSource>,
    policy: RestockConfig,
    default_store: StoreId,
    state: Arc<Mutex<DashboardState>>,
    generating: Arc<AtomicBool>,
    pending_decisions: Arc<StdMutex<HashSet<ItemId>>>,
}

impl Dashboard {
    pub fn new(
        source: Arc<dyn RecommendationSource>,
        policy: RestockConfig,
        default_store: StoreId,
    ) -> Self {
        Self {
            source,
            policy,
            default_store,
            state: Arc::new(Mutex::new(DashboardState::default())),
            generating: Arc::new(AtomicBool::new(false)),
            pending_decisions: Arc::new(StdMutex::new(HashSet::new())),
        }
    }

    pub fn policy(&self) -> &RestockConfig {
        &self.policy
    }

    pub fn default_store(&self) -> &StoreId {
        &self.default_store
    }

    /// Fetch inventory from the source and replace the current list.
    pub async fn load_inventory(&self) -> Result<LoadOutcome, GatewayError> {
        let decoded = match self.source.fetch_inventory().await {
            Ok(decoded) => decoded,
            Err(err) => {
                self.record_failure(&err).await;
                return Err(err);
            }
        };

        let mut state = self.state.lock().await;
        let rejected = decoded.rejected.len();
        for warning in decoded.rejected {
            state.notices.warning(warning.to_string());
        }
        let loaded = decoded.records.len();
        let collisions = state.inventory.replace(decoded.records);
        for warning in collisions {
            state.notices.warning(warning.to_string());
        }
        state.last_error = None;

        Ok(LoadOutcome { loaded, rejected })
    }

    /// Replace the inventory with an already-built list.
    pub async fn replace_inventory(&self, items: Vec<InventoryItem>) -> Vec<DomainError> {
        let mut state = self.state.lock().await;
        let warnings = state.inventory.replace(items);
        for warning in &warnings {
            state.notices.warning(warning.to_string());
        }
        warnings
    }

    pub async fn set_search_term(&self, term: impl Into<String>) {
        self.state.lock().await.search_term = term.into();
    }

    /// Current filtered view, grouped by category.
    pub async fn grouped(&self) -> Vec<CategorySection> {
        let state = self.state.lock().await;
        state
            .inventory
            .grouped(&state.search_term)
            .into_iter()
            .map(|group| CategorySection {
                category: group.category,
                items: group.items.into_iter().cloned().collect(),
            })
            .collect()
    }

    pub async fn inventory(&self) -> Vec<InventoryItem> {
        self.state.lock().await.inventory.items().to_vec()
    }

    /// Ask for batch recommendations over the whole inventory and replace the
    /// cart with the result.
    ///
    /// Only one generation runs at a time. On failure the previous cart is
    /// left exactly as it was and `last_error` is set.
    pub async fn generate_restock_order(&self) -> Result<BatchOutcome, GatewayError> {
        if self.generating.swap(true, Ordering::AcqRel) {
            return Err(GatewayError::Busy("batch"));
        }
        let _guard = FlagGuard(&self.generating);

        let generation_id = Uuid::now_v7();
        let (items, epoch) = {
            let state = self.state.lock().await;
            (state.inventory.items().to_vec(), state.inventory.epoch())
        };
        tracing::info!(%generation_id, items = items.len(), "generating restock order");

        let decoded = match self.source.recommend_batch(&items).await {
            Ok(decoded) => decoded,
            Err(err) => {
                tracing::error!(%generation_id, error = %err, "batch recommendation failed");
                self.record_failure(&err).await;
                return Err(err);
            }
        };

        let mut state = self.state.lock().await;
        if state.inventory.epoch() != epoch {
            tracing::warn!(
                %generation_id,
                "inventory replaced during generation; result discarded"
            );
            state.notices.warning(GatewayError::Superseded.user_message());
            return Err(GatewayError::Superseded);
        }

        let built = build_batch_lines(&state.inventory.lookup(), &decoded.records, &self.policy);
        let skipped = decoded.rejected.len() + built.skipped.len();
        for warning in decoded.rejected.iter().chain(built.skipped.iter()) {
            state.notices.warning(warning.to_string());
        }

        let outcome = BatchOutcome {
            generation_id,
            lines: built.lines.len(),
            critical: built.lines.iter().filter(|l| l.is_critical).count(),
            skipped,
        };
        state.cart.replace_with(built.lines, generation_id);
        state.last_error = None;
        tracing::info!(
            %generation_id,
            lines = outcome.lines,
            critical = outcome.critical,
            skipped = outcome.skipped,
            "restock order generated"
        );
        Ok(outcome)
    }

    /// Single-item decision. Does not touch the cart.
    ///
    /// A second request for an item whose request is still outstanding is
    /// refused with `Busy`.
    pub async fn request_decision(
        &self,
        item_id: &ItemId,
        store: Option<StoreId>,
    ) -> Result<Decision, GatewayError> {
        {
            let mut pending = self.pending_decisions.lock().unwrap_or_else(|e| e.into_inner());
            if !pending.insert(item_id.clone()) {
                return Err(GatewayError::Busy("decision"));
            }
        }
        let _guard = PendingGuard {
            pending: &self.pending_decisions,
            item_id: item_id.clone(),
        };

        let store = store.unwrap_or_else(|| self.default_store.clone());
        match self.source.decide(item_id, &store).await {
            Ok(decision) => Ok(decision),
            Err(err) => {
                tracing::error!(
                    item_id = %item_id,
                    store_id = %store,
                    error = %err,
                    "decision request failed"
                );
                self.record_failure(&err).await;
                Err(err)
            }
        }
    }

    pub fn is_decision_pending(&self, item_id: &ItemId) -> bool {
        self.pending_decisions
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .contains(item_id)
    }

    /// Explicit "add to cart" for a single-item decision.
    ///
    /// A second add for the same item is a no-op with a warning notice.
    pub async fn add_decision_to_cart(
        &self,
        decision: &Decision,
    ) -> Result<AddOutcome, GatewayError> {
        let mut state = self.state.lock().await;

        if state.cart.contains(&decision.sku) {
            let warning =
                DomainError::duplicate(format!("{} is already in the restock list", decision.sku));
            tracing::warn!(item_id = %decision.sku, "duplicate add to cart");
            state.notices.warning(warning.to_string());
            return Ok(AddOutcome::AlreadyInCart);
        }

        let Some(item) = state.inventory.get(&decision.sku) else {
            let warning =
                DomainError::data_integrity(format!("{} is not in the inventory", decision.sku));
            tracing::warn!(item_id = %decision.sku, "decision for unknown item");
            state.notices.warning(warning.to_string());
            return Err(warning.into());
        };

        let line = match CartLine::from_decision(item, decision, &self.policy) {
            Ok(line) => line,
            Err(err) => {
                let rejected = DomainError::from(err);
                tracing::warn!(
                    item_id = %decision.sku,
                    error = %rejected,
                    "decision rejected by policy"
                );
                state.notices.warning(rejected.to_string());
                return Err(rejected.into());
            }
        };
        let name = line.item.name().to_string();
        state.cart.add(line)?;
        state.notices.info(format!("{name} added to the restock list"));
        Ok(AddOutcome::Added)
    }

    pub async fn cart_lines(&self) -> Vec<CartLine> {
        self.state.lock().await.cart.lines().to_vec()
    }

    pub async fn summary(&self) -> CartSummary {
        let state = self.state.lock().await;
        state.cart.summary(state.inventory.len())
    }

    pub async fn last_error(&self) -> Option<String> {
        self.state.lock().await.last_error.clone()
    }

    pub async fn take_notices(&self) -> Vec<Notice> {
        self.state.lock().await.notices.drain()
    }

    pub fn is_generating(&self) -> bool {
        self.generating.load(Ordering::Acquire)
    }

    async fn record_failure(&self, err: &GatewayError) {
        let message = err.user_message();
        let mut state = self.state.lock().await;
        state.notices.error(message.clone());
        state.last_error = Some(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::{Decoded, OfflineSource};
    use crate::notice::NoticeLevel;
    use async_trait::async_trait;
    use restock_ai::{RecommendationResult, RestockStatus, Verdict};
    use restock_core::WarehouseId;
    use restock_inventory::NewInventoryItem;

    fn item(id: &str, stock: i64, rop: i64) -> InventoryItem {
        InventoryItem::try_from(NewInventoryItem {
            id: ItemId::new(id).unwrap(),
            name: format!("Item {id}"),
            category: Category::Groceries,
            price: 50.0,
            current_stock: stock,
            reorder_point: rop,
            store_id: StoreId::new("S001").unwrap(),
            history: None,
        })
        .unwrap()
    }

    /// Answers every batch with a fixed script; `fail` switches to errors.
    struct Scripted {
        fail: AtomicBool,
    }

    #[async_trait]
    impl RecommendationSource for Scripted {
        async fn fetch_inventory(&self) -> Result<Decoded<InventoryItem>, GatewayError> {
            Ok(Decoded::new(vec![item("P1", 200, 50), item("P2", 40, 50)]))
        }

        async fn recommend_batch(
            &self,
            items: &[InventoryItem],
        ) -> Result<Decoded<RecommendationResult>, GatewayError> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(GatewayError::Service {
                    status: 500,
                    message: Some("Model is not loaded".to_string()),
                });
            }
            Ok(Decoded::new(
                items
                    .iter()
                    .map(|i| RecommendationResult {
                        item_id: i.id().clone(),
                        predicted_demand: 400.0,
                        verdict: Verdict::Restock,
                        suggested_quantity: 0,
                        reorder_point: 0.0,
                    })
                    .collect(),
            ))
        }

        async fn decide(&self, sku: &ItemId, store: &StoreId) -> Result<Decision, GatewayError> {
            Ok(Decision {
                sku: sku.clone(),
                store_id: Some(store.clone()),
                forecast: 30.0,
                recommended_warehouse: WarehouseId::new("W005").unwrap(),
                transport: "Truck".to_string(),
                total_cost: 100.0,
                order_quantity: 50.0,
                unit_cost: None,
            })
        }
    }

    fn dashboard() -> (Dashboard, Arc<Scripted>) {
        let source = Arc::new(Scripted {
            fail: AtomicBool::new(false),
        });
        let dashboard = Dashboard::new(
            source.clone(),
            RestockConfig::default(),
            StoreId::new("S001").unwrap(),
        );
        (dashboard, source)
    }

    #[tokio::test]
    async fn generation_sorts_critical_first() {
        let (dashboard, _) = dashboard();
        dashboard.load_inventory().await.unwrap();
        let outcome = dashboard.generate_restock_order().await.unwrap();
        assert_eq!(outcome.lines, 2);
        assert_eq!(outcome.critical, 1);

        let lines = dashboard.cart_lines().await;
        assert_eq!(lines[0].item_id().as_str(), "P2");
        assert_eq!(lines[0].status, RestockStatus::CriticalLow);
        assert!(!dashboard.is_generating());
    }

    #[tokio::test]
    async fn failed_generation_keeps_previous_cart() {
        let (dashboard, source) = dashboard();
        dashboard.load_inventory().await.unwrap();
        dashboard.generate_restock_order().await.unwrap();
        let before = dashboard.cart_lines().await;

        source.fail.store(true, Ordering::SeqCst);
        let err = dashboard.generate_restock_order().await.unwrap_err();
        assert!(matches!(err, GatewayError::Service { status: 500, .. }));
        assert_eq!(dashboard.cart_lines().await, before);
        assert_eq!(dashboard.last_error().await.as_deref(), Some("Model is not loaded"));
        assert!(!dashboard.is_generating());
    }

    #[tokio::test]
    async fn first_failed_generation_leaves_cart_empty() {
        let (dashboard, source) = dashboard();
        dashboard.load_inventory().await.unwrap();
        source.fail.store(true, Ordering::SeqCst);
        assert!(dashboard.generate_restock_order().await.is_err());
        assert!(dashboard.cart_lines().await.is_empty());
        assert!(dashboard.last_error().await.is_some());
    }

    #[tokio::test]
    async fn second_add_is_a_noop_with_notice() {
        let (dashboard, _) = dashboard();
        dashboard.load_inventory().await.unwrap();
        dashboard.take_notices().await;

        let sku = ItemId::new("P2").unwrap();
        let decision = dashboard.request_decision(&sku, None).await.unwrap();
        assert_eq!(decision.store_id.as_ref().map(StoreId::as_str), Some("S001"));
        assert!(!dashboard.is_decision_pending(&sku));

        assert_eq!(dashboard.add_decision_to_cart(&decision).await.unwrap(), AddOutcome::Added);
        assert_eq!(
            dashboard.add_decision_to_cart(&decision).await.unwrap(),
            AddOutcome::AlreadyInCart
        );
        assert_eq!(dashboard.cart_lines().await.len(), 1);

        let notices = dashboard.take_notices().await;
        assert_eq!(notices.len(), 2);
        assert!(notices[1].message.contains("already in the restock list"));
    }

    #[tokio::test]
    async fn adding_unknown_item_is_a_warning() {
        let (dashboard, _) = dashboard();
        dashboard.load_inventory().await.unwrap();
        let decision = dashboard
            .request_decision(&ItemId::new("P404").unwrap(), Some(StoreId::new("S003").unwrap()))
            .await
            .unwrap();
        let err = dashboard.add_decision_to_cart(&decision).await.unwrap_err();
        assert!(matches!(err, GatewayError::Domain(DomainError::DataIntegrity(_))));
        assert!(dashboard.cart_lines().await.is_empty());
    }

    #[tokio::test]
    async fn decision_the_policy_rejects_leaves_a_notice() {
        let (dashboard, _) = dashboard();
        dashboard.load_inventory().await.unwrap();
        dashboard.take_notices().await;

        let sku = ItemId::new("P2").unwrap();
        let mut decision = dashboard.request_decision(&sku, None).await.unwrap();
        decision.forecast = -5.0;

        let err = dashboard.add_decision_to_cart(&decision).await.unwrap_err();
        assert!(matches!(err, GatewayError::Domain(DomainError::Validation(_))));
        assert!(dashboard.cart_lines().await.is_empty());

        let notices = dashboard.take_notices().await;
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Warning);
        assert!(notices[0].message.contains("predicted demand"));

        decision.forecast = 1e20;
        assert!(dashboard.add_decision_to_cart(&decision).await.is_err());
        assert!(dashboard.take_notices().await[0].message.contains("too large"));
    }

    #[tokio::test]
    async fn search_term_filters_grouped_view() {
        let dashboard = Dashboard::new(
            Arc::new(OfflineSource::new(StoreId::new("S001").unwrap(), Some(3))),
            RestockConfig::default(),
            StoreId::new("S001").unwrap(),
        );
        dashboard.load_inventory().await.unwrap();
        assert_eq!(dashboard.grouped().await.len(), 5);

        dashboard.set_search_term("ELECTRONICS").await;
        let grouped = dashboard.grouped().await;
        assert_eq!(grouped.len(), 1);
        assert_eq!(grouped[0].category, Category::Electronics);
        assert_eq!(grouped[0].items.len(), 10);

        dashboard.set_search_term("no such thing").await;
        assert!(dashboard.grouped().await.is_empty());
    }
}
