//! Static location catalog: the named points routes are planned over.
//!
//! The bundled catalog covers the Stanton system: one star, four planets,
//! their moons, orbital and Lagrange stations, and surface outposts. It is
//! loaded from `data/locations.json` and validated once; after that it is
//! read-only and safe to share between concurrent planning calls.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};

const LOCATIONS_JSON: &str = include_str!("../../../data/locations.json");

/// Position in system space (km-scale floats).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Straight-line distance to `other`.
    pub fn distance(&self, other: &Vec3) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        let dz = other.z - self.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }
}

/// Structural type of a location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LocationKind {
    Star,
    Planet,
    Moon,
    SurfaceLocation,
    OrbitalStation,
    LagrangePointStation,
}

impl LocationKind {
    /// Planets and moons are the bodies surface locations hang off.
    pub fn is_body(self) -> bool {
        matches!(self, Self::Planet | Self::Moon)
    }

    pub fn is_station(self) -> bool {
        matches!(self, Self::OrbitalStation | Self::LagrangePointStation)
    }
}

/// A named point in the catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub coordinates: Vec3,
    pub kind: LocationKind,
    /// Body this location orbits or sits on.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_object: Option<String>,
    /// The parent must already be on the route before this location is entered.
    #[serde(default)]
    pub requires_planetary_visit: bool,
    /// Shown in pickers; planets and the star are not.
    #[serde(default)]
    pub is_selectable: bool,
}

impl Location {
    /// Bare location with no parent linkage.
    pub fn new(name: impl Into<String>, coordinates: Vec3, kind: LocationKind) -> Self {
        Self {
            name: name.into(),
            coordinates,
            kind,
            parent_object: None,
            requires_planetary_visit: false,
            is_selectable: false,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent_object = Some(parent.into());
        self
    }

    pub fn requiring_visit(mut self) -> Self {
        self.requires_planetary_visit = true;
        self
    }

    pub fn selectable(mut self) -> Self {
        self.is_selectable = true;
        self
    }
}

/// Validated, name-keyed location set. Iteration follows file order.
#[derive(Debug, Clone)]
pub struct Catalog {
    locations: IndexMap<String, Location>,
}

impl Catalog {
    /// The bundled Stanton catalog.
    pub fn bundled() -> Result<Self> {
        Self::from_json_str(LOCATIONS_JSON)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let locations: Vec<Location> = serde_json::from_str(json)?;
        Self::from_locations(locations)
    }

    /// Build a catalog, rejecting duplicate names and parents that do not resolve.
    pub fn from_locations(locations: Vec<Location>) -> Result<Self> {
        let mut map = IndexMap::with_capacity(locations.len());
        for loc in locations {
            if map.contains_key(&loc.name) {
                return Err(PlanError::DuplicateLocation(loc.name));
            }
            map.insert(loc.name.clone(), loc);
        }
        for loc in map.values() {
            if let Some(parent) = &loc.parent_object {
                if !map.contains_key(parent) {
                    return Err(PlanError::DanglingParent {
                        name: loc.name.clone(),
                        parent: parent.clone(),
                    });
                }
            }
        }
        Ok(Self { locations: map })
    }

    pub fn get(&self, name: &str) -> Option<&Location> {
        self.locations.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.locations.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.values()
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    /// Locations offered as contract origins and drop-offs.
    pub fn selectable(&self) -> impl Iterator<Item = &Location> {
        self.iter().filter(|l| l.is_selectable)
    }

    /// Locations whose `parent_object` is `name`.
    pub fn children_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Location> + 'a {
        self.iter()
            .filter(move |l| l.parent_object.as_deref() == Some(name))
    }

    /// (child, parent) pairs in catalog order.
    pub fn parent_links(&self) -> impl Iterator<Item = (&str, &str)> {
        self.iter().filter_map(|l| {
            l.parent_object
                .as_deref()
                .map(|parent| (l.name.as_str(), parent))
        })
    }
}
