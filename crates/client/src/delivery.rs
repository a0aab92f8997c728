use restock_ai::Decision;
use restock_core::{DomainResult, StoreId};
use restock_logistics::{Catalog, Route, plan_route};

/// Route from a decision's recommended warehouse to the store it is for.
///
/// A decision without a store falls back to `fallback_store`.
pub fn route_for_decision(
    catalog: &Catalog,
    decision: &Decision,
    fallback_store: &StoreId,
) -> DomainResult<Route> {
    let store = decision.store_id.as_ref().unwrap_or(fallback_store);
    let from = catalog.warehouse(&decision.recommended_warehouse)?;
    let to = catalog.store(store)?;
    Ok(plan_route(from, to))
}
