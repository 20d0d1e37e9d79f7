//! Greedy nearest-neighbor routing.

use indexmap::IndexSet;

use super::{on_route, RoutingStrategy};
use crate::error::{PlanError, Result};
use crate::graph::RouteGraph;

/// Always hop to the closest visitable destination.
///
/// Unvisited destinations live in an `IndexSet`, so iteration follows the
/// caller's order: ties go to the destination listed first, and when nothing
/// is visitable the first remaining destination decides which parent body
/// is entered next.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighbor;

impl RoutingStrategy for NearestNeighbor {
    fn find_route(
        &self,
        start: &str,
        destinations: &[String],
        graph: &RouteGraph,
    ) -> Result<Vec<String>> {
        if !graph.contains(start) {
            return Err(PlanError::UnknownNode(start.to_string()));
        }

        let mut route = vec![start.to_string()];
        let mut current = start.to_string();
        let mut unvisited: IndexSet<&str> = destinations.iter().map(String::as_str).collect();

        while !unvisited.is_empty() {
            let mut next: Option<&str> = None;
            let mut best = f64::INFINITY;
            for &dest in &unvisited {
                let Some(weight) = graph.edge_weight(&current, dest) else {
                    continue;
                };
                if graph.can_visit(&current, dest, &route) && weight < best {
                    best = weight;
                    next = Some(dest);
                }
            }

            match next {
                Some(dest) => {
                    route.push(dest.to_string());
                    unvisited.shift_remove(dest);
                    current = dest.to_string();
                }
                None => {
                    // Nothing reachable: enter the first destination's parent body.
                    let first = unvisited[0];
                    let parent = graph
                        .planetary_constraint(first)
                        .ok_or_else(|| PlanError::MissingConstraint(first.to_string()))?;
                    if !graph.contains(parent) {
                        return Err(PlanError::UnknownNode(parent.to_string()));
                    }
                    if on_route(&route, parent) {
                        return Err(PlanError::RouteStuck {
                            parent: parent.to_string(),
                        });
                    }
                    route.push(parent.to_string());
                    current = parent.to_string();
                }
            }
        }

        Ok(route)
    }
}
