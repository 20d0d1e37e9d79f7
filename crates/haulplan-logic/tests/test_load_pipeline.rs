//! Integration tests for the full hauling pipeline.
//!
//! Exercises: Catalog → RouteGraph → RoutingStrategy → RouteOptimizer
//! → container sizing → placement → LoadPlan
//!
//! Everything runs against the bundled Stanton catalog and ship list.

use std::collections::HashSet;

use haulplan_logic::catalog::{Catalog, LocationKind};
use haulplan_logic::config::PlannerConfig;
use haulplan_logic::contract::{Contract, ContractRepository, DeliveryPoint, InMemoryContracts};
use haulplan_logic::graph::{GraphBuildMode, RouteGraph, ATMOSPHERE_PENALTY};
use haulplan_logic::loader::{plan_load, plan_load_with, LoadPlan, LoadRequest};
use haulplan_logic::optimizer::RouteOptimizer;
use haulplan_logic::payout::{default_crew, distribute_payout, effective_payout};
use haulplan_logic::placement::Container;
use haulplan_logic::routing::RouteAlgorithm;
use haulplan_logic::ships::{Ship, ShipCatalog};
use haulplan_logic::sizing::{HaulingMode, STANDARD_SIZES};

// ── Helpers ────────────────────────────────────────────────────────────

fn catalog() -> Catalog {
    Catalog::bundled().expect("bundled catalog parses")
}

fn ship(name: &str) -> Ship {
    ShipCatalog::bundled()
        .expect("bundled ships parse")
        .find(name)
        .expect("ship exists")
        .clone()
}

fn microtech_run() -> Contract {
    Contract::new("Port Tressler", 16)
        .with_delivery(
            DeliveryPoint::new("Microtech Logistics Depot S4LD01")
                .with_cargo("Agricium", 20)
                .with_cargo("Waste", 3),
        )
        .with_delivery(DeliveryPoint::new("Everus Harbor").with_cargo("Scrap", 12))
        .with_payout(48_000)
}

fn position(route: &[String], name: &str) -> Option<usize> {
    route.iter().position(|r| r == name)
}

/// Every voxel of every container, keyed by grid.
fn voxels(containers: &[Container]) -> Vec<(usize, u32, u32, u32)> {
    let mut out = Vec::new();
    for c in containers {
        let d = c.footprint().expect("placed containers have known sizes");
        for y in c.position.y..c.position.y + d.height {
            for z in c.position.z..c.position.z + d.depth {
                for x in c.position.x..c.position.x + d.width {
                    out.push((c.grid_index, x, y, z));
                }
            }
        }
    }
    out
}

fn assert_legal(plan: &LoadPlan, ship: &Ship) {
    let all = voxels(&plan.containers);
    let unique: HashSet<_> = all.iter().copied().collect();
    assert_eq!(unique.len(), all.len(), "{}: containers overlap", ship.name);
    for c in &plan.containers {
        let grid = &ship.cargo_grids[c.grid_index];
        let d = c.footprint().unwrap();
        assert!(c.position.x + d.width <= grid.width, "{}: x overflow", ship.name);
        assert!(c.position.z + d.depth <= grid.length, "{}: z overflow", ship.name);
        assert!(c.position.y + d.height <= grid.height, "{}: y overflow", ship.name);
    }
}

// ── Catalog and graph tests ────────────────────────────────────────────

#[test]
fn bundled_catalog_is_consistent() {
    let catalog = catalog();
    assert_eq!(catalog.len(), 86);
    assert_eq!(catalog.selectable().count(), 71);
    for loc in catalog.iter() {
        if let Some(parent) = &loc.parent_object {
            assert!(catalog.contains(parent), "{} → {}", loc.name, parent);
        }
    }
    assert!(catalog
        .iter()
        .filter(|l| l.kind == LocationKind::Planet)
        .all(|l| !l.is_selectable));
}

#[test]
fn complete_graph_connects_every_pair() {
    let catalog = catalog();
    let graph = RouteGraph::build(&catalog, GraphBuildMode::Complete);
    let n = catalog.len();
    assert_eq!(graph.node_count(), n);
    assert_eq!(graph.edges().len(), n * (n - 1) / 2);
}

#[test]
fn topology_graph_links_plausible_neighbors() {
    let catalog = catalog();
    let graph = RouteGraph::build(&catalog, GraphBuildMode::Topology);
    assert_eq!(graph.node_count(), 71);
    assert!(!graph.contains("Microtech"));

    // station ↔ station
    assert!(graph.has_valid_edge("Port Tressler", "Everus Harbor"));
    // surface ↔ surface on the same planet
    assert!(graph.has_valid_edge(
        "Microtech Logistics Depot S4LD01",
        "Sakura Sun Goldenrod Workcenter"
    ));
    // surface ↔ surface on different planets
    assert!(!graph.has_valid_edge("Microtech Logistics Depot S4LD01", "Teasa Spaceport"));

    let pt = graph.location("Port Tressler").unwrap().coordinates;
    let depot = graph
        .location("Microtech Logistics Depot S4LD01")
        .unwrap()
        .coordinates;
    let w = graph
        .edge_weight("Port Tressler", "Microtech Logistics Depot S4LD01")
        .expect("orbital station and surface share a parent");
    assert!((w - (pt.distance(&depot) + ATMOSPHERE_PENALTY)).abs() < 1e-3);

    for edge in graph.edges() {
        assert!(edge.source < edge.target);
        assert!(catalog.get(&edge.source).unwrap().is_selectable);
        assert!(catalog.get(&edge.target).unwrap().is_selectable);
    }
}

// ── Routing tests ──────────────────────────────────────────────────────

#[test]
fn every_planetary_destination_follows_its_parent() {
    let catalog = catalog();
    let optimizer = RouteOptimizer::new(&catalog);
    let targets: Vec<_> = catalog
        .selectable()
        .filter(|l| l.requires_planetary_visit)
        .collect();
    assert!(!targets.is_empty());

    for algo in [RouteAlgorithm::NearestNeighbor, RouteAlgorithm::AStar] {
        for target in &targets {
            let contract =
                Contract::new("Port Tressler", 8).with_delivery(DeliveryPoint::new(&target.name));
            let route = &optimizer.optimize(&[contract], algo)[0];
            let parent = target.parent_object.as_deref().unwrap();
            let p = position(route, parent)
                .unwrap_or_else(|| panic!("{}: {} missing from {:?}", algo.name(), parent, route));
            let d = position(route, &target.name).unwrap();
            assert!(p < d, "{}: {:?}", algo.name(), route);
            assert_eq!(route[0], "Port Tressler");
        }
    }
}

#[test]
fn moon_outpost_route_enters_planet_then_moon() {
    let catalog = catalog();
    let contract = Contract::new("Port Tressler", 8)
        .with_delivery(DeliveryPoint::new("Rayari Anvik Research Outpost"));
    let route = &RouteOptimizer::new(&catalog).optimize(&[contract], RouteAlgorithm::AStar)[0];
    let planet = position(route, "Microtech").unwrap();
    let moon = position(route, "Calliope").unwrap();
    let outpost = position(route, "Rayari Anvik Research Outpost").unwrap();
    assert!(planet < moon && moon < outpost, "{:?}", route);
}

#[test]
fn routes_are_deterministic() {
    let catalog = catalog();
    let optimizer = RouteOptimizer::new(&catalog);
    let contracts = vec![microtech_run(), microtech_run()];
    for algo in [RouteAlgorithm::NearestNeighbor, RouteAlgorithm::AStar] {
        let a = optimizer.optimize(&contracts, algo);
        let b = optimizer.optimize(&contracts, algo);
        assert_eq!(a, b);
        assert_eq!(a[0], a[1]);
    }
}

// ── Load pipeline tests ────────────────────────────────────────────────

#[test]
fn full_load_on_roomy_ship() {
    let catalog = catalog();
    let hauler = ship("C2 Hercules");
    for algo in [RouteAlgorithm::NearestNeighbor, RouteAlgorithm::AStar] {
        let request = LoadRequest::new(vec![microtech_run()], hauler.clone()).with_algorithm(algo);
        let plan = plan_load(&catalog, &request);
        assert!(plan.is_complete(), "{}: {:?}", algo.name(), plan.shortfalls);
        assert_eq!(plan.loaded_units(), 35);
        assert_eq!(plan.routes.len(), 1);
        assert_legal(&plan, &hauler);
        for c in &plan.containers {
            assert!(c.size <= 16);
        }
    }
}

#[test]
fn commodity_mode_uses_standard_sizes() {
    let catalog = catalog();
    let hauler = ship("C2 Hercules");
    let request = LoadRequest::new(vec![microtech_run()], hauler.clone())
        .with_mode(HaulingMode::Commodity);
    let plan = plan_load(&catalog, &request);
    assert_eq!(plan.loaded_units(), 35);
    for c in &plan.containers {
        assert!(STANDARD_SIZES.contains(&c.size));
    }
    assert_legal(&plan, &hauler);
}

#[test]
fn small_ship_reports_shortfall() {
    let catalog = catalog();
    let titan = ship("Avenger Titan");
    let request = LoadRequest::new(vec![microtech_run()], titan.clone());
    let plan = plan_load(&catalog, &request);
    assert!(!plan.is_complete());
    assert!(plan.loaded_units() <= titan.grid_volume());
    assert_eq!(plan.loaded_units() + plan.unloaded_units(), 35);
    assert_legal(&plan, &titan);
}

#[test]
fn unit_containers_fill_every_hold() {
    let catalog = catalog();
    let optimizer = RouteOptimizer::new(&catalog);
    for hauler in ShipCatalog::bundled().unwrap().iter() {
        let volume = hauler.grid_volume();
        if volume > 300 {
            continue;
        }
        let contract = Contract::new("Everus Harbor", 1)
            .with_delivery(DeliveryPoint::new("Port Tressler").with_cargo("Gold", volume + 5));
        let plan = plan_load_with(&optimizer, &LoadRequest::new(vec![contract], hauler.clone()));
        assert_eq!(plan.loaded_units(), volume, "{}", hauler.name);
        assert_eq!(plan.unloaded_units(), 5, "{}", hauler.name);
        assert_legal(&plan, hauler);
    }
}

#[test]
fn load_is_deterministic() {
    let catalog = catalog();
    let request = LoadRequest::new(vec![microtech_run(), microtech_run()], ship("Freelancer MAX"));
    let a = plan_load(&catalog, &request);
    let b = plan_load(&catalog, &request);
    assert_eq!(a.containers, b.containers);
    assert_eq!(a.shortfalls, b.shortfalls);
}

// ── Repository, config and payout ──────────────────────────────────────

#[test]
fn repository_feeds_planner() {
    let repo = InMemoryContracts::new();
    let stored = repo.append(vec![microtech_run(), microtech_run()]);
    assert!(stored.iter().all(|c| c.id.is_some()));
    assert_ne!(stored[0].id, stored[1].id);

    let config = PlannerConfig::from_json_str(
        r#"{ "route_algorithm": "A_STAR", "hauling_mode": "COMMODITY", "ship": "Caterpillar" }"#,
    )
    .unwrap();
    let ships = ShipCatalog::bundled().unwrap();
    let hauler = config.resolve_ship(&ships).unwrap().unwrap().clone();
    let request = LoadRequest::new(repo.list(), hauler)
        .with_algorithm(config.route_algorithm)
        .with_mode(config.hauling_mode);
    let plan = plan_load(&catalog(), &request);
    assert_eq!(plan.routes.len(), 2);
    assert_eq!(plan.loaded_units(), 70);

    repo.clear();
    assert!(repo.list().is_empty());
}

#[test]
fn payout_split_over_loaded_contracts() {
    let contracts = vec![microtech_run(), microtech_run()];
    let pot = effective_payout(HaulingMode::Contract, &contracts, 0);
    assert_eq!(pot, 96_000);
    let paid = distribute_payout(pot, &default_crew());
    let total: f64 = paid.iter().map(|p| p.amount).sum();
    assert!((total - 96_000.0).abs() < 1e-6);
    assert!((paid[0].amount - 38_400.0).abs() < 1e-6);
}
