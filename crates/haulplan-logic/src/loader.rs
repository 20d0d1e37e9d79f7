//! Cargo-load orchestration: routes → container sizes → placements.
//!
//! Contracts are loaded in input order. Within a contract, delivery points
//! are loaded in the order their locations first appear on the planned
//! route. Each cargo line is cut into containers until it is exhausted or
//! the hold has no room for the next container; in the latter case the
//! remainder is recorded as a [`Shortfall`] and loading carries on with the
//! next line.

use serde::{Deserialize, Serialize};

use crate::catalog::Catalog;
use crate::contract::{Contract, DeliveryPoint};
use crate::optimizer::RouteOptimizer;
use crate::placement::{find_next_position, Container};
use crate::routing::RouteAlgorithm;
use crate::ships::Ship;
use crate::sizing::{calculate_optimal_container_size, HaulingMode};

/// Everything needed to load a ship.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadRequest {
    pub contracts: Vec<Contract>,
    pub ship: Ship,
    #[serde(default)]
    pub route_algorithm: RouteAlgorithm,
    #[serde(default)]
    pub hauling_mode: HaulingMode,
}

impl LoadRequest {
    pub fn new(contracts: Vec<Contract>, ship: Ship) -> Self {
        Self {
            contracts,
            ship,
            route_algorithm: RouteAlgorithm::default(),
            hauling_mode: HaulingMode::default(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: RouteAlgorithm) -> Self {
        self.route_algorithm = algorithm;
        self
    }

    pub fn with_mode(mut self, mode: HaulingMode) -> Self {
        self.hauling_mode = mode;
        self
    }
}

/// Units of one cargo line that did not fit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortfall {
    pub contract_index: usize,
    pub delivery_index: usize,
    pub cargo_type_index: usize,
    pub location: String,
    pub cargo_type: String,
    pub remaining_units: u32,
}

/// Outcome of a load pass.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoadPlan {
    /// One route per contract, in input order.
    pub routes: Vec<Vec<String>>,
    /// Placed containers in placement order.
    pub containers: Vec<Container>,
    pub shortfalls: Vec<Shortfall>,
}

impl LoadPlan {
    /// SCU actually placed.
    pub fn loaded_units(&self) -> u32 {
        self.containers.iter().map(|c| c.size).sum()
    }

    /// SCU dropped for lack of space.
    pub fn unloaded_units(&self) -> u32 {
        self.shortfalls.iter().map(|s| s.remaining_units).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.shortfalls.is_empty()
    }
}

/// Plan routes on a fresh complete graph and load the ship.
pub fn plan_load(catalog: &Catalog, request: &LoadRequest) -> LoadPlan {
    plan_load_with(&RouteOptimizer::new(catalog), request)
}

/// [`plan_load`] reusing an existing optimizer.
pub fn plan_load_with(optimizer: &RouteOptimizer, request: &LoadRequest) -> LoadPlan {
    let routes = optimizer.optimize(&request.contracts, request.route_algorithm);
    let mut plan = LoadPlan::default();

    for (contract_index, (contract, route)) in request.contracts.iter().zip(&routes).enumerate() {
        let mut loaded = vec![false; contract.delivery_points.len()];
        for stop in route {
            for (delivery_index, point) in contract.delivery_points.iter().enumerate() {
                if loaded[delivery_index] || point.location != *stop {
                    continue;
                }
                loaded[delivery_index] = true;
                load_delivery_point(
                    &mut plan,
                    request,
                    contract,
                    point,
                    contract_index,
                    delivery_index,
                );
            }
        }
    }

    log::debug!(
        "Loaded {} container(s), {} SCU, {} shortfall(s)",
        plan.containers.len(),
        plan.loaded_units(),
        plan.shortfalls.len()
    );
    plan.routes = routes;
    plan
}

/// Containers only, for callers that ignore routes and shortfalls.
pub fn handle_load_cargo(catalog: &Catalog, request: &LoadRequest) -> Vec<Container> {
    plan_load(catalog, request).containers
}

fn load_delivery_point(
    plan: &mut LoadPlan,
    request: &LoadRequest,
    contract: &Contract,
    point: &DeliveryPoint,
    contract_index: usize,
    delivery_index: usize,
) {
    for (cargo_type_index, line) in point.cargo.iter().enumerate() {
        let mut remaining = line.quantity;
        while remaining > 0 {
            let size = calculate_optimal_container_size(
                contract.max_container_size,
                remaining,
                request.hauling_mode,
            );
            let Some(placement) = find_next_position(size, &request.ship, &plan.containers) else {
                log::warn!(
                    "Unable to fit remaining {} units for Contract {}, Delivery to {}, Cargo: {}",
                    remaining,
                    contract_index + 1,
                    point.location,
                    line.cargo_type
                );
                plan.shortfalls.push(Shortfall {
                    contract_index,
                    delivery_index,
                    cargo_type_index,
                    location: point.location.clone(),
                    cargo_type: line.cargo_type.clone(),
                    remaining_units: remaining,
                });
                break;
            };
            plan.containers.push(Container {
                size,
                contract_index,
                delivery_index,
                cargo_type_index,
                grid_index: placement.grid_index,
                position: placement.position,
                rotated: placement.rotated,
            });
            remaining = remaining.saturating_sub(size);
        }
    }
}
