//! Interchangeable route-finding strategies over a [`RouteGraph`].
//!
//! Every strategy returns an ordered path that starts at `start`, visits each
//! destination at least once, and inserts a destination's parent body ahead
//! of it when the catalog demands a planetary visit.

mod astar;
mod nearest;

pub use astar::AStar;
pub use nearest::NearestNeighbor;

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::graph::RouteGraph;

/// A pluggable path-finding algorithm.
pub trait RoutingStrategy {
    fn find_route(
        &self,
        start: &str,
        destinations: &[String],
        graph: &RouteGraph,
    ) -> Result<Vec<String>>;
}

/// Strategy selector used by configuration and the optimizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RouteAlgorithm {
    #[default]
    NearestNeighbor,
    AStar,
}

impl RouteAlgorithm {
    pub fn strategy(self) -> Box<dyn RoutingStrategy> {
        match self {
            Self::NearestNeighbor => Box::new(NearestNeighbor),
            Self::AStar => Box::new(AStar),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NearestNeighbor => "nearest-neighbor",
            Self::AStar => "A*",
        }
    }
}

/// Whether `name` is already on the route.
pub(crate) fn on_route(route: &[String], name: &str) -> bool {
    route.iter().any(|r| r == name)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_algorithm() {
        assert_eq!(RouteAlgorithm::default(), RouteAlgorithm::NearestNeighbor);
    }

    #[test]
    fn test_algorithm_serde_tags() {
        let json = serde_json::to_string(&RouteAlgorithm::AStar).unwrap();
        assert_eq!(json, "\"A_STAR\"");
        let parsed: RouteAlgorithm = serde_json::from_str("\"NEAREST_NEIGHBOR\"").unwrap();
        assert_eq!(parsed, RouteAlgorithm::NearestNeighbor);
    }

    #[test]
    fn test_strategies_agree_on_constraint_order() {
        for algo in [RouteAlgorithm::NearestNeighbor, RouteAlgorithm::AStar] {
            let g = fixtures::microtech_graph();
            let route = algo
                .strategy()
                .find_route(
                    "Port Tressler",
                    &fixtures::names(&["Microtech Logistics Depot S4LD01"]),
                    &g,
                )
                .unwrap();
            assert_eq!(route[0], "Port Tressler", "{}", algo.name());
            assert!(
                fixtures::index(&route, "Microtech")
                    < fixtures::index(&route, "Microtech Logistics Depot S4LD01"),
                "{}: {:?}",
                algo.name(),
                route
            );
        }
    }
}
