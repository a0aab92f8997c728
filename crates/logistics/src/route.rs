use serde::Serialize;

use crate::catalog::Site;
use crate::geo::distance_m;

/// A straight (great-circle) leg between two sites.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub from: Site,
    pub to: Site,
    pub distance_km: u64,
}

pub fn plan_route(from: &Site, to: &Site) -> Route {
    let distance_km = (distance_m(from.position, to.position) / 1000.0).round() as u64;
    tracing::debug!(from = %from.id, to = %to.id, distance_km, "planned route");
    Route {
        from: from.clone(),
        to: to.clone(),
        distance_km,
    }
}
