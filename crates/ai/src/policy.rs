//! Restock policy: target stock, case-rounded order quantity, status.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use restock_core::DomainError;
use restock_inventory::InventoryItem;

/// Safety stock applied when none is configured (units).
pub const DEFAULT_SAFETY_STOCK: i64 = 75;
/// Case size applied when none is configured (units).
pub const DEFAULT_CASE_SIZE: i64 = 50;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum PolicyError {
    #[error("current stock cannot be negative ({0})")]
    NegativeStock(i64),

    #[error("reorder point cannot be negative ({0})")]
    NegativeReorderPoint(i64),

    #[error("predicted demand must be a finite non-negative number ({0})")]
    InvalidDemand(f64),

    #[error("predicted demand is too large to order ({0})")]
    DemandOutOfRange(f64),

    #[error("safety stock cannot be negative ({0})")]
    NegativeSafetyStock(i64),

    #[error("case size must be positive ({0})")]
    NonPositiveCaseSize(i64),
}

impl From<PolicyError> for DomainError {
    fn from(err: PolicyError) -> Self {
        DomainError::validation(err.to_string())
    }
}

/// Policy parameters.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestockConfig {
    safety_stock: i64,
    case_size: i64,
}

impl RestockConfig {
    pub fn new(safety_stock: i64, case_size: i64) -> Result<Self, PolicyError> {
        let config = Self {
            safety_stock,
            case_size,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn safety_stock(&self) -> i64 {
        self.safety_stock
    }

    pub fn case_size(&self) -> i64 {
        self.case_size
    }

    fn validate(&self) -> Result<(), PolicyError> {
        if self.safety_stock < 0 {
            return Err(PolicyError::NegativeSafetyStock(self.safety_stock));
        }
        if self.case_size <= 0 {
            return Err(PolicyError::NonPositiveCaseSize(self.case_size));
        }
        Ok(())
    }
}

impl Default for RestockConfig {
    fn default() -> Self {
        Self {
            safety_stock: DEFAULT_SAFETY_STOCK,
            case_size: DEFAULT_CASE_SIZE,
        }
    }
}

/// The two stock figures the policy reads from an item.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StockPosition {
    pub current_stock: i64,
    pub reorder_point: i64,
}

impl From<&InventoryItem> for StockPosition {
    fn from(item: &InventoryItem) -> Self {
        Self {
            current_stock: item.current_stock(),
            reorder_point: item.reorder_point(),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RestockStatus {
    CriticalLow,
    Restock,
    InStock,
}

impl RestockStatus {
    pub fn label(&self) -> &'static str {
        match self {
            RestockStatus::CriticalLow => "Critical Low",
            RestockStatus::Restock => "Restock",
            RestockStatus::InStock => "In Stock",
        }
    }

    pub fn badge(&self) -> Badge {
        match self {
            RestockStatus::CriticalLow => Badge::Red,
            RestockStatus::Restock => Badge::Yellow,
            RestockStatus::InStock => Badge::Green,
        }
    }
}

impl core::fmt::Display for RestockStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Display classification for a status.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Badge {
    Red,
    Yellow,
    Green,
}

/// Outcome of the policy for one item.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct RestockDecision {
    pub target_stock: f64,
    pub raw_need: f64,
    /// Zero, or a whole number of cases.
    pub order_quantity: i64,
    pub status: RestockStatus,
    /// `current_stock < reorder_point`, independent of demand.
    pub is_critical: bool,
}

/// Decide whether and how much to reorder.
///
/// An order is placed only when the raw need exceeds one case; it is then
/// rounded up to a whole number of cases.
pub fn compute_restock_decision(
    item: &InventoryItem,
    predicted_demand: f64,
    config: &RestockConfig,
) -> Result<RestockDecision, PolicyError> {
    decide(StockPosition::from(item), predicted_demand, config)
}

/// Same as [`compute_restock_decision`], from raw stock figures.
pub fn decide(
    position: StockPosition,
    predicted_demand: f64,
    config: &RestockConfig,
) -> Result<RestockDecision, PolicyError> {
    config.validate()?;
    if position.current_stock < 0 {
        return Err(PolicyError::NegativeStock(position.current_stock));
    }
    if position.reorder_point < 0 {
        return Err(PolicyError::NegativeReorderPoint(position.reorder_point));
    }
    if !(predicted_demand.is_finite() && predicted_demand >= 0.0) {
        return Err(PolicyError::InvalidDemand(predicted_demand));
    }

    let target_stock = predicted_demand + config.safety_stock as f64;
    let raw_need = target_stock - position.current_stock as f64;
    let case = config.case_size as f64;

    let order_quantity = if raw_need > case {
        let cases = (raw_need / case).ceil();
        if cases >= i64::MAX as f64 {
            return Err(PolicyError::DemandOutOfRange(predicted_demand));
        }
        (cases as i64)
            .checked_mul(config.case_size)
            .ok_or(PolicyError::DemandOutOfRange(predicted_demand))?
    } else {
        0
    };

    let is_critical = position.current_stock < position.reorder_point;
    let status = if is_critical {
        RestockStatus::CriticalLow
    } else if raw_need > 0.0 {
        RestockStatus::Restock
    } else {
        RestockStatus::InStock
    };

    Ok(RestockDecision {
        target_stock,
        raw_need,
        order_quantity,
        status,
        is_critical,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn pos(current_stock: i64, reorder_point: i64) -> StockPosition {
        StockPosition {
            current_stock,
            reorder_point,
        }
    }

    #[test]
    fn critical_item_rounds_up_to_whole_cases() {
        let d = decide(pos(40, 50), 30.0, &RestockConfig::new(75, 50).unwrap()).unwrap();
        assert_eq!(d.target_stock, 105.0);
        assert_eq!(d.raw_need, 65.0);
        assert_eq!(d.order_quantity, 100);
        assert_eq!(d.status, RestockStatus::CriticalLow);
        assert!(d.is_critical);
        assert_eq!(d.status.badge(), Badge::Red);
    }

    #[test]
    fn well_stocked_item_orders_nothing() {
        let d = decide(pos(200, 50), 10.0, &RestockConfig::new(75, 50).unwrap()).unwrap();
        assert_eq!(d.target_stock, 85.0);
        assert_eq!(d.raw_need, -115.0);
        assert_eq!(d.order_quantity, 0);
        assert_eq!(d.status, RestockStatus::InStock);
        assert!(!d.is_critical);
    }

    #[test]
    fn need_within_one_case_is_restock_without_order() {
        // raw need = 30 + 75 - 80 = 25, below one case of 50
        let d = decide(pos(80, 50), 30.0, &RestockConfig::default()).unwrap();
        assert_eq!(d.order_quantity, 0);
        assert_eq!(d.status, RestockStatus::Restock);
        assert_eq!(d.status.label(), "Restock");
    }

    #[test]
    fn need_of_exactly_one_case_orders_nothing() {
        // raw need = 50 + 75 - 75 = 50, not strictly above the case size
        let d = decide(pos(75, 10), 50.0, &RestockConfig::default()).unwrap();
        assert_eq!(d.order_quantity, 0);
    }

    #[test]
    fn malformed_inputs_are_rejected() {
        let cfg = RestockConfig::default();
        assert_eq!(decide(pos(-1, 5), 1.0, &cfg), Err(PolicyError::NegativeStock(-1)));
        assert_eq!(decide(pos(1, -5), 1.0, &cfg), Err(PolicyError::NegativeReorderPoint(-5)));
        assert!(matches!(decide(pos(1, 5), f64::NAN, &cfg), Err(PolicyError::InvalidDemand(_))));
        assert!(matches!(decide(pos(1, 5), -3.0, &cfg), Err(PolicyError::InvalidDemand(_))));
        assert_eq!(RestockConfig::new(75, 0), Err(PolicyError::NonPositiveCaseSize(0)));
        assert_eq!(RestockConfig::new(-1, 50), Err(PolicyError::NegativeSafetyStock(-1)));
    }

    #[test]
    fn demand_beyond_whole_cases_is_out_of_range() {
        let cfg = RestockConfig::default();
        assert_eq!(decide(pos(0, 0), 1e20, &cfg), Err(PolicyError::DemandOutOfRange(1e20)));
        assert_eq!(
            decide(pos(0, 0), f64::MAX, &cfg),
            Err(PolicyError::DemandOutOfRange(f64::MAX))
        );

        // 1e15 units still fits in i64 once rounded to cases of 50
        let d = decide(pos(0, 0), 1e15, &cfg).unwrap();
        assert_eq!(d.order_quantity % 50, 0);
        assert!(d.order_quantity as f64 >= d.raw_need);
    }

    #[test]
    fn policy_error_maps_to_validation() {
        let err: DomainError = PolicyError::NonPositiveCaseSize(0).into();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    proptest! {
        #[test]
        fn order_quantity_is_whole_cases(
            stock in 0i64..10_000,
            rop in 0i64..10_000,
            demand in 0.0f64..10_000.0,
            safety in 0i64..500,
            case in 1i64..200,
        ) {
            let cfg = RestockConfig::new(safety, case).unwrap();
            let d = decide(pos(stock, rop), demand, &cfg).unwrap();
            prop_assert!(d.order_quantity >= 0);
            prop_assert_eq!(d.order_quantity % case, 0);
            if d.order_quantity > 0 {
                prop_assert!(d.order_quantity as f64 >= d.raw_need);
            }
        }

        #[test]
        fn huge_demand_never_yields_a_negative_order(
            stock in 0i64..10_000,
            demand in 0.0f64..1e20,
            case in 1i64..200,
        ) {
            let cfg = RestockConfig::new(75, case).unwrap();
            match decide(pos(stock, 0), demand, &cfg) {
                Ok(d) => {
                    prop_assert!(d.order_quantity >= 0);
                    prop_assert_eq!(d.order_quantity % case, 0);
                }
                Err(err) => prop_assert_eq!(err, PolicyError::DemandOutOfRange(demand)),
            }
        }

        #[test]
        fn covered_demand_orders_nothing(
            stock in 0i64..10_000,
            rop in 0i64..10_000,
            demand in 0.0f64..5_000.0,
            safety in 0i64..500,
        ) {
            prop_assume!(demand + safety as f64 <= stock as f64);
            let cfg = RestockConfig::new(safety, 50).unwrap();
            let d = decide(pos(stock, rop), demand, &cfg).unwrap();
            prop_assert_eq!(d.order_quantity, 0);
            prop_assert_eq!(d.status == RestockStatus::CriticalLow, stock < rop);
        }

        #[test]
        fn below_reorder_point_is_always_critical(
            stock in 0i64..1_000,
            gap in 1i64..1_000,
            demand in 0.0f64..10_000.0,
        ) {
            let d = decide(pos(stock, stock + gap), demand, &RestockConfig::default()).unwrap();
            prop_assert!(d.is_critical);
            prop_assert_eq!(d.status, RestockStatus::CriticalLow);
        }

        #[test]
        fn decision_is_deterministic(
            stock in 0i64..10_000,
            rop in 0i64..10_000,
            demand in 0.0f64..10_000.0,
        ) {
            let cfg = RestockConfig::default();
            prop_assert_eq!(
                decide(pos(stock, rop), demand, &cfg),
                decide(pos(stock, rop), demand, &cfg)
            );
        }
    }
}
