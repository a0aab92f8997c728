//! `restock-ai`
//!
//! **Responsibility:** restock decisions.
//!
//! - The policy engine is pure and deterministic: the same stock position,
//!   demand figure and config always produce the same decision.
//! - Demand itself comes from an external forecasting service; this crate only
//!   models its results and offers a local heuristic for offline sessions.
//! - Nothing here mutates inventory state or performs IO.

pub mod heuristic;
pub mod policy;
pub mod recommendation;

pub use heuristic::{HeuristicRecommender, demand_adjustment_factor};
pub use policy::{
    Badge, PolicyError, RestockConfig, RestockDecision, RestockStatus, StockPosition,
    compute_restock_decision,
};
pub use recommendation::{Decision, FORECAST_HORIZON_DAYS, RecommendationResult, Verdict};
