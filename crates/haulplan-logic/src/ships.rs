//! Ship definitions and cargo-grid geometry.
//!
//! A ship carries one or more cargo grids. Each grid is an axis-aligned voxel
//! box with its own integer frame; `position` and `rotation` only place the
//! box inside the ship for rendering and play no part in placement.

use serde::{Deserialize, Serialize};

use crate::catalog::Vec3;
use crate::error::{PlanError, Result};

const SHIPS_JSON: &str = include_str!("../../../data/ships.json");

/// One rectangular cargo bay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoGrid {
    /// Extent along x.
    pub width: u32,
    /// Extent along z.
    pub length: u32,
    /// Extent along y (stacking axis).
    pub height: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Vec3>,
    /// Euler angles in radians.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Vec3>,
}

impl CargoGrid {
    pub fn new(width: u32, length: u32, height: u32) -> Self {
        Self {
            width,
            length,
            height,
            position: None,
            rotation: None,
        }
    }

    /// Voxel count (1 voxel = 1 SCU), saturating at `u32::MAX`.
    pub fn volume(&self) -> u32 {
        self.width
            .saturating_mul(self.length)
            .saturating_mul(self.height)
    }

    pub fn offset(&self) -> Vec3 {
        self.position.unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ship {
    pub name: String,
    /// Advertised capacity in SCU.
    pub total_capacity: u32,
    pub cargo_grids: Vec<CargoGrid>,
}

impl Ship {
    /// Sum of all grid volumes. Can differ from `total_capacity`.
    pub fn grid_volume(&self) -> u32 {
        self.cargo_grids
            .iter()
            .map(CargoGrid::volume)
            .fold(0, u32::saturating_add)
    }
}

/// The bundled ship list, in file order.
#[derive(Debug, Clone)]
pub struct ShipCatalog {
    ships: Vec<Ship>,
}

impl ShipCatalog {
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(SHIPS_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self {
            ships: serde_json::from_str(json)?,
        })
    }

    pub fn find(&self, name: &str) -> Result<&Ship> {
        self.ships
            .iter()
            .find(|s| s.name == name)
            .ok_or_else(|| PlanError::UnknownShip(name.to_string()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Ship> {
        self.ships.iter()
    }

    pub fn len(&self) -> usize {
        self.ships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ships.is_empty()
    }
}
