//! Container sizing: how much cargo goes into the next container.
//!
//! Container sizes are SCU volumes. Each valid size has fixed voxel
//! dimensions (width × height × depth); any other size is unusable.

use serde::{Deserialize, Serialize};

/// Standard sizes, largest first.
pub const STANDARD_SIZES: [u32; 7] = [32, 24, 16, 8, 4, 2, 1];

/// Voxel extent of a container: width (x), height (y), depth (z).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Dimensions {
    const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }

    /// Same box yawed 90°: width and depth swap.
    pub fn rotated(self) -> Self {
        Self::new(self.depth, self.height, self.width)
    }

    pub fn volume(self) -> u32 {
        self.width * self.height * self.depth
    }
}

const DIMENSIONS: [(u32, Dimensions); 7] = [
    (1, Dimensions::new(1, 1, 1)),
    (2, Dimensions::new(2, 1, 1)),
    (4, Dimensions::new(2, 1, 2)),
    (8, Dimensions::new(2, 2, 2)),
    (16, Dimensions::new(4, 2, 2)),
    (24, Dimensions::new(6, 2, 2)),
    (32, Dimensions::new(8, 2, 2)),
];

/// Dimensions for a container size, or `None` if the size is not in the table.
pub fn container_dimensions(size: u32) -> Option<Dimensions> {
    DIMENSIONS
        .iter()
        .find(|(s, _)| *s == size)
        .map(|(_, d)| *d)
}

/// How containers are cut from a cargo quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HaulingMode {
    /// Shrink the contract's maximum container until it fits what is left.
    #[default]
    Contract,
    /// Largest standard container allowed by both limits.
    Commodity,
}

/// Size of the next container to cut from `remaining` units.
///
/// Contract mode halves `max_size` (integer halving) while it exceeds
/// `remaining`, so `remaining == 0` yields 0. Commodity mode picks the first
/// standard size within both limits and falls back to 1.
pub fn calculate_optimal_container_size(max_size: u32, remaining: u32, mode: HaulingMode) -> u32 {
    match mode {
        HaulingMode::Commodity => STANDARD_SIZES
            .iter()
            .copied()
            .find(|&s| s <= max_size && s <= remaining)
            .unwrap_or(1),
        HaulingMode::Contract => {
            let mut size = max_size;
            while size > remaining {
                size /= 2;
            }
            size
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use super::HaulingMode::{Commodity, Contract};

    #[test]
    fn test_contract_exact_fit() {
        for qty in [32, 16, 8, 4, 2, 1] {
            assert_eq!(calculate_optimal_container_size(32, qty, Contract), qty);
        }
    }

    #[test]
    fn test_contract_non_power_of_two() {
        assert_eq!(calculate_optimal_container_size(32, 20, Contract), 16);
        assert_eq!(calculate_optimal_container_size(32, 10, Contract), 8);
        assert_eq!(calculate_optimal_container_size(32, 7, Contract), 4);
        assert_eq!(calculate_optimal_container_size(32, 5, Contract), 4);
        assert_eq!(calculate_optimal_container_size(32, 3, Contract), 2);
        assert_eq!(calculate_optimal_container_size(24, 3, Contract), 3);
    }

    #[test]
    fn test_contract_respects_max() {
        assert_eq!(calculate_optimal_container_size(16, 32, Contract), 16);
        assert_eq!(calculate_optimal_container_size(8, 16, Contract), 8);
        assert_eq!(calculate_optimal_container_size(32, 100, Contract), 32);
        assert_eq!(calculate_optimal_container_size(1, 10, Contract), 1);
        assert_eq!(calculate_optimal_container_size(2, 1, Contract), 1);
        assert_eq!(calculate_optimal_container_size(10, 20, Contract), 10);
    }

    #[test]
    fn test_contract_zero_remaining_gives_zero() {
        assert_eq!(calculate_optimal_container_size(32, 0, Contract), 0);
    }

    #[test]
    fn test_commodity_largest_standard() {
        assert_eq!(calculate_optimal_container_size(32, 50, Commodity), 32);
        assert_eq!(calculate_optimal_container_size(32, 32, Commodity), 32);
        assert_eq!(calculate_optimal_container_size(32, 30, Commodity), 24);
        assert_eq!(calculate_optimal_container_size(32, 23, Commodity), 16);
        assert_eq!(calculate_optimal_container_size(32, 15, Commodity), 8);
        assert_eq!(calculate_optimal_container_size(32, 7, Commodity), 4);
        assert_eq!(calculate_optimal_container_size(32, 3, Commodity), 2);
    }

    #[test]
    fn test_commodity_respects_both_limits() {
        assert_eq!(calculate_optimal_container_size(16, 50, Commodity), 16);
        assert_eq!(calculate_optimal_container_size(24, 20, Commodity), 16);
        assert_eq!(calculate_optimal_container_size(10, 5, Commodity), 4);
        assert_eq!(calculate_optimal_container_size(30, 30, Commodity), 24);
    }

    #[test]
    fn test_commodity_defaults_to_one() {
        assert_eq!(calculate_optimal_container_size(32, 0, Commodity), 1);
        assert_eq!(calculate_optimal_container_size(0, 10, Commodity), 1);
    }

    #[test]
    fn test_modes_agree_on_exact_standard_sizes() {
        for s in [32, 16, 8, 4, 2, 1] {
            assert_eq!(
                calculate_optimal_container_size(s, s, Contract),
                calculate_optimal_container_size(s, s, Commodity)
            );
        }
    }

    #[test]
    fn test_dimensions_table() {
        for size in STANDARD_SIZES {
            let dims = container_dimensions(size).unwrap();
            assert_eq!(dims.volume(), size);
        }
        assert_eq!(container_dimensions(32), Some(Dimensions::new(8, 2, 2)));
        assert_eq!(container_dimensions(0), None);
        assert_eq!(container_dimensions(3), None);
        assert_eq!(container_dimensions(999), None);
    }

    #[test]
    fn test_rotation_swaps_footprint() {
        let d = container_dimensions(16).unwrap().rotated();
        assert_eq!((d.width, d.height, d.depth), (2, 2, 4));
    }
}
