//! Weighted route graph over catalog locations.
//!
//! Nodes are stored in an index arena (`Vec<Location>` plus a name → index
//! map) so searches can run on plain integer arrays. Adjacency is kept per
//! node in an `IndexMap`, which makes neighbor iteration follow edge
//! insertion order and keeps every search deterministic.
//!
//! Edge weight is the straight-line distance between the endpoints, plus
//! [`ATMOSPHERE_PENALTY`] when exactly one endpoint is a surface location.
//!
//! Two construction policies exist over the same type (see [`GraphBuildMode`]):
//! a complete graph for planning and a topology graph for display.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Location, LocationKind};
use crate::error::{PlanError, Result};

/// Added to any edge that enters or leaves an atmosphere.
pub const ATMOSPHERE_PENALTY: f64 = 500_000.0;

/// How [`RouteGraph::build`] connects the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GraphBuildMode {
    /// Every location, every pair connected.
    Complete,
    /// Selectable locations only, joined by physically plausible links.
    Topology,
}

/// An undirected edge, listed once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: String,
    pub target: String,
    pub weight: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RouteGraph {
    nodes: Vec<Location>,
    index: HashMap<String, usize>,
    /// node index → (neighbor index → weight)
    adjacency: Vec<IndexMap<usize, f64>>,
    /// location name → parent name
    constraints: IndexMap<String, String>,
}

impl RouteGraph {
    /// Empty graph whose planetary constraints come from `catalog`.
    pub fn new(catalog: &Catalog) -> Self {
        let constraints = catalog
            .parent_links()
            .map(|(child, parent)| (child.to_string(), parent.to_string()))
            .collect();
        Self {
            constraints,
            ..Self::default()
        }
    }

    /// Build a populated graph from `catalog` under the given policy.
    pub fn build(catalog: &Catalog, mode: GraphBuildMode) -> Self {
        match mode {
            GraphBuildMode::Complete => Self::complete(catalog),
            GraphBuildMode::Topology => Self::topology(catalog),
        }
    }

    fn complete(catalog: &Catalog) -> Self {
        let mut graph = Self::new(catalog);
        for loc in catalog.iter() {
            graph.add_node(loc.clone());
        }
        for from in catalog.iter() {
            for to in catalog.iter() {
                if from.name == to.name {
                    continue;
                }
                if let Err(e) = graph.add_edge(&from.name, &to.name) {
                    log::error!(
                        "Failed to add edge between {} and {}: {}",
                        from.name,
                        to.name,
                        e
                    );
                }
            }
        }
        graph
    }

    fn topology(catalog: &Catalog) -> Self {
        let mut graph = Self::new(catalog);
        let selectable: Vec<&Location> = catalog.selectable().collect();
        for loc in &selectable {
            graph.add_node((*loc).clone());
        }
        for a in &selectable {
            for b in &selectable {
                if a.name == b.name || !should_connect(a, b, catalog) {
                    continue;
                }
                if graph.has_valid_edge(&a.name, &b.name) {
                    continue;
                }
                if let Err(e) = graph.add_edge(&a.name, &b.name) {
                    log::error!("Failed to add edge between {} and {}: {}", a.name, b.name, e);
                }
            }
        }
        graph
    }

    /// Insert or overwrite a node.
    ///
    /// Wires the node to its parent if the parent is already present, and a
    /// planet or moon to any of its children already present.
    pub fn add_node(&mut self, loc: Location) {
        let name = loc.name.clone();
        if let Some(parent) = &loc.parent_object {
            self.constraints
                .entry(name.clone())
                .or_insert_with(|| parent.clone());
        }
        let is_body = loc.kind.is_body();

        let idx = match self.index.get(&name) {
            Some(&idx) => {
                self.nodes[idx] = loc;
                idx
            }
            None => {
                let idx = self.nodes.len();
                self.index.insert(name.clone(), idx);
                self.nodes.push(loc);
                self.adjacency.push(IndexMap::new());
                idx
            }
        };

        let parent = self
            .constraints
            .get(&name)
            .filter(|parent| **parent != name)
            .and_then(|parent| self.index_of(parent));
        if let Some(parent) = parent {
            self.link(idx, parent);
        }

        if is_body {
            let children: Vec<usize> = self
                .constraints
                .iter()
                .filter(|(child, parent)| **parent == name && **child != name)
                .filter_map(|(child, _)| self.index_of(child))
                .collect();
            for child in children {
                self.link(child, idx);
            }
        }
    }

    /// Connect two existing nodes in both directions.
    pub fn add_edge(&mut self, from: &str, to: &str) -> Result<()> {
        let a = self.require(from)?;
        let b = self.require(to)?;
        self.link(a, b);
        Ok(())
    }

    fn link(&mut self, a: usize, b: usize) {
        let weight = self.weight_between(a, b);
        self.adjacency[a].insert(b, weight);
        self.adjacency[b].insert(a, weight);
    }

    fn require(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| PlanError::UnknownNode(name.to_string()))
    }

    fn weight_between(&self, a: usize, b: usize) -> f64 {
        let (from, to) = (&self.nodes[a], &self.nodes[b]);
        let mut weight = from.coordinates.distance(&to.coordinates);
        let from_surface = from.kind == LocationKind::SurfaceLocation;
        let to_surface = to.kind == LocationKind::SurfaceLocation;
        if from_surface != to_surface {
            weight += ATMOSPHERE_PENALTY;
        }
        weight
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn location(&self, name: &str) -> Option<&Location> {
        self.index_of(name).map(|i| &self.nodes[i])
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Undirected edge count.
    pub fn edge_count(&self) -> usize {
        let directed: usize = self.adjacency.iter().map(IndexMap::len).sum();
        let self_loops = self
            .adjacency
            .iter()
            .enumerate()
            .filter(|(i, adj)| adj.contains_key(i))
            .count();
        (directed + self_loops) / 2
    }

    /// Adjacent node names in edge insertion order.
    pub fn neighbors(&self, name: &str) -> Vec<&str> {
        match self.index_of(name) {
            Some(i) => self.adjacency[i]
                .keys()
                .map(|&n| self.nodes[n].name.as_str())
                .collect(),
            None => Vec::new(),
        }
    }

    pub fn edge_weight(&self, from: &str, to: &str) -> Option<f64> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        self.adjacency[a].get(&b).copied()
    }

    /// Straight-line distance with no penalties. Never exceeds the edge weight.
    pub fn direct_distance(&self, from: &str, to: &str) -> Option<f64> {
        let a = self.index_of(from)?;
        let b = self.index_of(to)?;
        Some(self.distance_idx(a, b))
    }

    /// Parent that must be visited before `name`, if any.
    pub fn planetary_constraint(&self, name: &str) -> Option<&str> {
        self.constraints.get(name).map(String::as_str)
    }

    /// False only when `to` needs its parent visited and the parent is not in `route`.
    pub fn can_visit(&self, _from: &str, to: &str, route: &[String]) -> bool {
        match self.index_of(to) {
            Some(i) => self.can_visit_idx(i, route),
            None => false,
        }
    }

    pub fn has_valid_edge(&self, from: &str, to: &str) -> bool {
        self.edge_weight(from, to).is_some()
    }

    /// Every undirected edge once, `source < target`.
    pub fn edges(&self) -> Vec<GraphEdge> {
        let mut out = Vec::new();
        for (a, adj) in self.adjacency.iter().enumerate() {
            let source = &self.nodes[a].name;
            for (&b, &weight) in adj {
                let target = &self.nodes[b].name;
                if source < target {
                    out.push(GraphEdge {
                        source: source.clone(),
                        target: target.clone(),
                        weight,
                    });
                }
            }
        }
        out
    }

    // ── Index-level access for the search strategies ────────────────────

    pub(crate) fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub(crate) fn name_of(&self, idx: usize) -> &str {
        &self.nodes[idx].name
    }

    pub(crate) fn neighbors_idx(&self, idx: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        self.adjacency[idx].iter().map(|(&n, &w)| (n, w))
    }

    pub(crate) fn distance_idx(&self, a: usize, b: usize) -> f64 {
        self.nodes[a]
            .coordinates
            .distance(&self.nodes[b].coordinates)
    }

    pub(crate) fn can_visit_idx(&self, to: usize, route: &[String]) -> bool {
        let node = &self.nodes[to];
        if !node.requires_planetary_visit {
            return true;
        }
        match self.constraints.get(&node.name) {
            Some(parent) => route.iter().any(|r| r == parent),
            None => true,
        }
    }
}

/// Topology rule: whether two selectable locations get a direct link.
fn should_connect(a: &Location, b: &Location, catalog: &Catalog) -> bool {
    use LocationKind::*;

    let same_parent = a.parent_object.is_some() && a.parent_object == b.parent_object;
    match (a.kind, b.kind) {
        (ka, kb) if ka.is_station() && kb.is_station() => true,
        (SurfaceLocation, SurfaceLocation) => same_parent,
        (OrbitalStation, SurfaceLocation) => same_parent,
        // Moon ↔ stations orbiting the moon's planet
        (Moon, OrbitalStation) => a
            .parent_object
            .as_deref()
            .and_then(|p| catalog.get(p))
            .is_some_and(|planet| b.parent_object.as_deref() == Some(planet.name.as_str())),
        (SurfaceLocation, Moon) => a.parent_object.as_deref() == Some(b.name.as_str()),
        _ => false,
    }
}
