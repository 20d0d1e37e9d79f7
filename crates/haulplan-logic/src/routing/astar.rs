//! Leg-by-leg A* routing.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, VecDeque};

use super::{on_route, RoutingStrategy};
use crate::error::{PlanError, Result};
use crate::graph::RouteGraph;

/// Visits destinations in the caller's order, A*-searching each leg.
///
/// Before a destination whose parent body is not yet on the route, the
/// parent itself is searched for and appended first. If that parent needs
/// its own parent visited, the climb continues upward. During a search,
/// neighbors that cannot be entered yet (their required parent is not on
/// the route built so far) are pruned.
#[derive(Debug, Clone, Copy, Default)]
pub struct AStar;

impl RoutingStrategy for AStar {
    fn find_route(
        &self,
        start: &str,
        destinations: &[String],
        graph: &RouteGraph,
    ) -> Result<Vec<String>> {
        let mut current = graph
            .index_of(start)
            .ok_or_else(|| PlanError::UnknownNode(start.to_string()))?;
        let mut route = vec![start.to_string()];
        let mut remaining: VecDeque<&str> = destinations.iter().map(String::as_str).collect();

        while let Some(&next) = remaining.front() {
            if let Some(parent) = pending_ancestor(graph, next, &route) {
                let goal = graph
                    .index_of(parent)
                    .ok_or_else(|| PlanError::UnknownNode(parent.to_string()))?;
                let leg = search(graph, current, goal, &route)?;
                append_leg(&mut route, graph, &leg);
                current = goal;
                // Retry the same destination from the parent.
                continue;
            }

            let goal = graph
                .index_of(next)
                .ok_or_else(|| PlanError::UnknownNode(next.to_string()))?;
            let leg = search(graph, current, goal, &route)?;
            append_leg(&mut route, graph, &leg);
            current = goal;
            remaining.pop_front();
        }

        Ok(route)
    }
}

/// The body to enter before heading for `dest`, if any.
///
/// Starts from `dest`'s parent when it is not yet on the route, then climbs
/// while the candidate itself needs an unvisited parent (a moon outpost
/// whose moon requires its planet first).
fn pending_ancestor<'g>(graph: &'g RouteGraph, dest: &str, route: &[String]) -> Option<&'g str> {
    let mut target = graph.planetary_constraint(dest)?;
    if on_route(route, target) {
        return None;
    }
    for _ in 0..graph.node_count() {
        match graph.index_of(target) {
            Some(i) if !graph.can_visit_idx(i, route) => {}
            _ => break,
        }
        match graph.planetary_constraint(target) {
            Some(parent) if parent != target && !on_route(route, parent) => target = parent,
            _ => break,
        }
    }
    Some(target)
}

/// Append a leg, skipping its first node (already the route's tail).
fn append_leg(route: &mut Vec<String>, graph: &RouteGraph, leg: &[usize]) {
    route.extend(leg.iter().skip(1).map(|&i| graph.name_of(i).to_string()));
}

/// Open-set entry. Lowest f first; among equal f, the node that entered the
/// open set earliest.
#[derive(Debug, Clone, Copy)]
struct OpenEntry {
    f: f64,
    order: u64,
    node: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Flipped so the max-heap pops the smallest.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.order.cmp(&self.order))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// A* from `start` to `goal` over node indices.
///
/// The heuristic is straight-line distance, which never exceeds an edge
/// weight and satisfies the triangle inequality, so closed nodes are final.
fn search(graph: &RouteGraph, start: usize, goal: usize, route: &[String]) -> Result<Vec<usize>> {
    let n = graph.node_count();
    let mut g_score = vec![f64::INFINITY; n];
    let mut f_score = vec![f64::INFINITY; n];
    let mut came_from: Vec<Option<usize>> = vec![None; n];
    let mut closed = vec![false; n];
    let mut entered: Vec<Option<u64>> = vec![None; n];
    let mut next_order = 0u64;
    let mut open = BinaryHeap::new();

    g_score[start] = 0.0;
    f_score[start] = graph.distance_idx(start, goal);
    entered[start] = Some(next_order);
    next_order += 1;
    open.push(OpenEntry {
        f: f_score[start],
        order: 0,
        node: start,
    });

    while let Some(OpenEntry { f, node, .. }) = open.pop() {
        if closed[node] || f > f_score[node] {
            continue;
        }
        if node == goal {
            return Ok(reconstruct(&came_from, goal));
        }
        closed[node] = true;

        for (neighbor, weight) in graph.neighbors_idx(node) {
            if closed[neighbor] || !graph.can_visit_idx(neighbor, route) {
                continue;
            }
            let tentative = g_score[node] + weight;
            if tentative < g_score[neighbor] {
                came_from[neighbor] = Some(node);
                g_score[neighbor] = tentative;
                f_score[neighbor] = tentative + graph.distance_idx(neighbor, goal);
                let order = *entered[neighbor].get_or_insert_with(|| {
                    let o = next_order;
                    next_order += 1;
                    o
                });
                open.push(OpenEntry {
                    f: f_score[neighbor],
                    order,
                    node: neighbor,
                });
            }
        }
    }

    Err(PlanError::NoPath {
        from: graph.name_of(start).to_string(),
        to: graph.name_of(goal).to_string(),
    })
}

fn reconstruct(came_from: &[Option<usize>], goal: usize) -> Vec<usize> {
    let mut path = vec![goal];
    let mut cur = goal;
    while let Some(prev) = came_from[cur] {
        path.push(prev);
        cur = prev;
    }
    path.reverse();
    path
}
