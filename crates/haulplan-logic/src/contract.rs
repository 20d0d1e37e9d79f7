//! Hauling contracts and the contract store.
//!
//! Contracts arrive from the outside (forms, scanned screenshots) and are
//! read-only input to routing and packing. The store is a small repository
//! trait so handlers can be handed an in-memory list in tests and something
//! else later.

use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

/// One cargo line at a delivery point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CargoLine {
    pub cargo_type: String,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryPoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Catalog location name.
    pub location: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub cargo: Vec<CargoLine>,
}

impl DeliveryPoint {
    pub fn new(location: impl Into<String>) -> Self {
        Self {
            id: None,
            location: location.into(),
            quantity: 0,
            cargo: Vec::new(),
        }
    }

    /// Add a cargo line and bump the point's total quantity.
    pub fn with_cargo(mut self, cargo_type: impl Into<String>, quantity: u32) -> Self {
        self.quantity += quantity;
        self.cargo.push(CargoLine {
            cargo_type: cargo_type.into(),
            quantity,
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Largest container (in SCU) the contract allows.
    pub max_container_size: u32,
    /// Catalog location name where cargo is picked up.
    pub origin: String,
    #[serde(default)]
    pub delivery_points: Vec<DeliveryPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payout: Option<u64>,
}

impl Contract {
    pub fn new(origin: impl Into<String>, max_container_size: u32) -> Self {
        Self {
            id: None,
            max_container_size,
            origin: origin.into(),
            delivery_points: Vec::new(),
            payout: None,
        }
    }

    pub fn with_delivery(mut self, point: DeliveryPoint) -> Self {
        self.delivery_points.push(point);
        self
    }

    pub fn with_payout(mut self, payout: u64) -> Self {
        self.payout = Some(payout);
        self
    }

    /// Delivery locations in contract order.
    pub fn destinations(&self) -> Vec<String> {
        self.delivery_points
            .iter()
            .map(|p| p.location.clone())
            .collect()
    }

    /// Units over every cargo line.
    pub fn total_units(&self) -> u32 {
        self.delivery_points
            .iter()
            .flat_map(|p| p.cargo.iter())
            .map(|c| c.quantity)
            .sum()
    }
}

/// Storage capability for contracts: list, append, clear.
pub trait ContractRepository: Send + Sync {
    fn list(&self) -> Vec<Contract>;

    /// Store contracts, assigning ids to those without one.
    /// Returns the stored copies.
    fn append(&self, contracts: Vec<Contract>) -> Vec<Contract>;

    fn clear(&self);
}

/// Volatile store backed by a mutex-guarded list.
#[derive(Debug, Default)]
pub struct InMemoryContracts {
    contracts: Mutex<Vec<Contract>>,
}

impl InMemoryContracts {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContractRepository for InMemoryContracts {
    fn list(&self) -> Vec<Contract> {
        self.contracts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn append(&self, contracts: Vec<Contract>) -> Vec<Contract> {
        let stored: Vec<Contract> = contracts
            .into_iter()
            .map(|mut c| {
                if c.id.is_none() {
                    c.id = Some(generate_contract_id());
                }
                c
            })
            .collect();
        self.contracts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(stored.iter().cloned());
        stored
    }

    fn clear(&self) {
        self.contracts
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

const ID_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// `id-<unix millis>-<9 base36 chars>`.
pub fn generate_contract_id() -> String {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    let mut rng = rand::thread_rng();
    let suffix: String = (0..9)
        .map(|_| ID_ALPHABET[rng.gen_range(0..ID_ALPHABET.len())] as char)
        .collect();
    format!("id-{}-{}", millis, suffix)
}
