//! Planner settings.
//!
//! ```json
//! { "route_algorithm": "A_STAR", "hauling_mode": "COMMODITY", "ship": "Hull A" }
//! ```
//!
//! Every field is optional; missing ones take their defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::routing::RouteAlgorithm;
use crate::ships::{Ship, ShipCatalog};
use crate::sizing::HaulingMode;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    pub route_algorithm: RouteAlgorithm,
    pub hauling_mode: HaulingMode,
    /// Ship name from the ship catalog.
    pub ship: Option<String>,
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| PlanError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// The configured ship, if one is named.
    pub fn resolve_ship<'a>(&self, ships: &'a ShipCatalog) -> Result<Option<&'a Ship>> {
        self.ship.as_deref().map(|name| ships.find(name)).transpose()
    }
}
