//! Route optimizer: one visiting order per contract.
//!
//! Routes are planned over the complete graph. Planning never fails as a
//! whole: a contract whose route cannot be found gets the naive
//! `[origin, ...destinations]` order instead.

use crate::catalog::Catalog;
use crate::contract::Contract;
use crate::graph::{GraphBuildMode, RouteGraph};
use crate::routing::{RouteAlgorithm, RoutingStrategy};

/// Holds a pre-built complete graph so repeated plans skip the O(n²) wiring.
#[derive(Debug, Clone)]
pub struct RouteOptimizer {
    graph: RouteGraph,
}

impl RouteOptimizer {
    pub fn new(catalog: &Catalog) -> Self {
        Self {
            graph: RouteGraph::build(catalog, GraphBuildMode::Complete),
        }
    }

    pub fn graph(&self) -> &RouteGraph {
        &self.graph
    }

    /// Route for every contract, in input order.
    pub fn optimize(&self, contracts: &[Contract], algorithm: RouteAlgorithm) -> Vec<Vec<String>> {
        log::debug!(
            "Planning {} contract(s) with {}",
            contracts.len(),
            algorithm.name()
        );
        self.optimize_with(contracts, algorithm.strategy().as_ref())
    }

    /// [`optimize`](Self::optimize) with a caller-supplied strategy.
    ///
    /// Infeasible routes are logged as warnings, structural failures
    /// (unknown locations and the like) as errors. Both fall back.
    pub fn optimize_with(
        &self,
        contracts: &[Contract],
        strategy: &dyn RoutingStrategy,
    ) -> Vec<Vec<String>> {
        contracts
            .iter()
            .map(|contract| {
                let destinations = contract.destinations();
                match strategy.find_route(&contract.origin, &destinations, &self.graph) {
                    Ok(route) => {
                        log::debug!("Route from {}: {} stop(s)", contract.origin, route.len());
                        route
                    }
                    Err(e) if e.is_infeasible() => {
                        log::warn!("No feasible route from {}: {}", contract.origin, e);
                        fallback_route(contract)
                    }
                    Err(e) => {
                        log::error!("Failed to find optimal route from {}: {}", contract.origin, e);
                        fallback_route(contract)
                    }
                }
            })
            .collect()
    }
}

/// Origin followed by the delivery locations as listed.
pub fn fallback_route(contract: &Contract) -> Vec<String> {
    std::iter::once(contract.origin.clone())
        .chain(contract.destinations())
        .collect()
}

/// Build a complete graph from `catalog` and plan every contract on it.
pub fn optimize_route(
    catalog: &Catalog,
    contracts: &[Contract],
    algorithm: RouteAlgorithm,
) -> Vec<Vec<String>> {
    RouteOptimizer::new(catalog).optimize(contracts, algorithm)
}
