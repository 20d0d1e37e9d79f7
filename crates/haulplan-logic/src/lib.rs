//! Route planning and cargo packing for Stanton-system haulers.
//!
//! This crate holds every planning algorithm independent of any UI, server,
//! or storage. Functions take plain data (catalogs, contracts, ships) and
//! return plain data (routes, containers), so the whole pipeline can be unit
//! tested and embedded anywhere.
//!
//! # Module Overview
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`catalog`] | Static location catalog with parent bodies and selectability |
//! | [`config`] | Planner settings (algorithm, hauling mode, ship) |
//! | [`contract`] | Contracts, delivery points and the contract repository |
//! | [`error`] | Shared `PlanError` / `Result` |
//! | [`graph`] | Weighted route graph, complete and topology build modes |
//! | [`loader`] | Cargo-load orchestration: routes → sizes → placements |
//! | [`optimizer`] | Per-contract route planning with naive fallback |
//! | [`payout`] | Crew payout split by share |
//! | [`placement`] | Gravity-respecting container placement in cargo grids |
//! | [`routing`] | Nearest-neighbor and A* routing strategies |
//! | [`ships`] | Ship catalog and cargo-grid geometry |
//! | [`sizing`] | Container sizes, dimensions and hauling modes |

pub mod catalog;
pub mod config;
pub mod contract;
pub mod error;
pub mod graph;
pub mod loader;
pub mod optimizer;
pub mod payout;
pub mod placement;
pub mod routing;
pub mod ships;
pub mod sizing;

pub use error::{PlanError, Result};
