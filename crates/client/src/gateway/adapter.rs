//! Identifier adapters for the forecasting backend's formats.

use restock_core::{DomainResult, WarehouseId};

const WAREHOUSE_DIGITS: usize = 3;

/// Normalize a backend warehouse id to the catalog form.
///
/// `W5`, `w05` and a bare `5` all become `W005`. Anything else passes through
/// unchanged (trimmed), so non-numbered hubs like `wh-eu-003` keep their id.
pub fn normalize_warehouse_id(raw: &str) -> DomainResult<WarehouseId> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix(['W', 'w'])
        .unwrap_or(trimmed);

    if !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()) {
        let number = digits.trim_start_matches('0');
        let number = if number.is_empty() { "0" } else { number };
        return WarehouseId::new(format!("W{number:0>WAREHOUSE_DIGITS$}"));
    }

    WarehouseId::new(trimmed)
}
