//! `restock-client`
//!
//! The dashboard side of the restock workflow: talks to the external
//! recommendation service through [`gateway::RecommendationSource`], turns its
//! answers into cart lines with the restock policy, and keeps inventory, cart
//! and notices behind one [`state::Dashboard`] handle.

pub mod cart;
pub mod config;
pub mod delivery;
pub mod format;
pub mod gateway;
pub mod notice;
pub mod state;

pub use cart::{BatchLines, CartLine, CartSummary, RestockCart, Sourcing, build_batch_lines};
pub use config::{ClientConfig, ConfigError, InventorySource};
pub use delivery::route_for_decision;
pub use format::format_inr;
pub use gateway::{
    Decoded, GENERIC_FAILURE, GatewayError, HttpGateway, OfflineSource, RecommendationSource,
};
pub use notice::{Notice, NoticeLevel, Notices};
pub use state::{AddOutcome, BatchOutcome, CategorySection, Dashboard, LoadOutcome};
