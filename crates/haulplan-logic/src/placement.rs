//! Container placement inside a ship's cargo grids.
//!
//! Each grid is tracked as a 2D field of columns (x, z), where every column
//! knows the top of its stack. Occupancy is re-derived from the full list of
//! already-placed containers on every call, so placement is a pure function
//! of (size, ship, containers).
//!
//! Search order, first hit wins:
//! 1. grids in ship order
//! 2. normal orientation, then yawed 90°
//! 3. `y` from the highest level that fits down to the floor
//! 4. `z` rows, then `x` within the row
//!
//! A position is legal when no covered column is taller than `y`, and either
//! `y == 0` or every covered column tops out exactly at `y` (full support).

use serde::{Deserialize, Serialize};

use crate::error::{PlanError, Result};
use crate::ships::{CargoGrid, Ship};
use crate::sizing::{container_dimensions, Dimensions};

/// Largest column count a single grid may have (1024 × 1024).
pub const MAX_GRID_COLUMNS: usize = 1 << 20;

/// Integer position in a grid's local frame. `y` is up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridPos {
    pub x: u32,
    pub y: u32,
    pub z: u32,
}

impl GridPos {
    pub const fn new(x: u32, y: u32, z: u32) -> Self {
        Self { x, y, z }
    }
}

/// A container committed to the hold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// SCU volume; key into the dimensions table.
    pub size: u32,
    pub contract_index: usize,
    pub delivery_index: usize,
    pub cargo_type_index: usize,
    pub grid_index: usize,
    pub position: GridPos,
    pub rotated: bool,
}

impl Container {
    /// Dimensions after rotation, or `None` for an unknown size.
    pub fn footprint(&self) -> Option<Dimensions> {
        container_dimensions(self.size).map(|d| if self.rotated { d.rotated() } else { d })
    }
}

/// Where the next container goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub position: GridPos,
    pub rotated: bool,
    pub grid_index: usize,
}

/// One (x, z) column of a grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCell {
    pub occupied: bool,
    /// Top of the stack in this column.
    pub height: u32,
    /// Index of the topmost container in the replayed list.
    pub container: Option<usize>,
}

/// Column state for one cargo grid.
#[derive(Debug, Clone)]
pub struct GridState {
    width: u32,
    length: u32,
    height: u32,
    /// Row-major: `z * width + x`.
    cells: Vec<GridCell>,
}

impl GridState {
    fn new(grid: &CargoGrid) -> Result<Self> {
        let columns = (grid.width as usize)
            .checked_mul(grid.length as usize)
            .filter(|&n| n <= MAX_GRID_COLUMNS)
            .ok_or(PlanError::GridTooLarge {
                width: grid.width,
                length: grid.length,
            })?;
        Ok(Self {
            width: grid.width,
            length: grid.length,
            height: grid.height,
            cells: vec![GridCell::default(); columns],
        })
    }

    fn index(&self, x: u32, z: u32) -> Option<usize> {
        (x < self.width && z < self.length)
            .then(|| z as usize * self.width as usize + x as usize)
    }

    pub fn cell(&self, x: u32, z: u32) -> Option<&GridCell> {
        let i = self.index(x, z)?;
        self.cells.get(i)
    }

    fn cell_mut(&mut self, x: u32, z: u32) -> Option<&mut GridCell> {
        let i = self.index(x, z)?;
        self.cells.get_mut(i)
    }

    /// Columns with at least one container in them.
    pub fn occupied_columns(&self) -> usize {
        self.cells.iter().filter(|c| c.occupied).count()
    }

    /// Whether a box at `position` lies entirely inside the grid.
    fn contains(&self, position: GridPos, dims: Dimensions) -> bool {
        let within = |start: u32, extent: u32, limit: u32| {
            start.checked_add(extent).map_or(false, |end| end <= limit)
        };
        within(position.x, dims.width, self.width)
            && within(position.z, dims.depth, self.length)
            && within(position.y, dims.height, self.height)
    }

    /// Stamp a container's footprint. Returns false, leaving the grid
    /// untouched, when the box does not lie inside the grid.
    fn mark(&mut self, index: usize, position: GridPos, dims: Dimensions) -> bool {
        if !self.contains(position, dims) {
            return false;
        }
        let top = position.y + dims.height;
        for z in position.z..position.z + dims.depth {
            for x in position.x..position.x + dims.width {
                if let Some(cell) = self.cell_mut(x, z) {
                    cell.occupied = true;
                    cell.height = top;
                    cell.container = Some(index);
                }
            }
        }
        true
    }

    fn fits(&self, dims: Dimensions) -> bool {
        dims.width <= self.width && dims.depth <= self.length && dims.height <= self.height
    }

    fn footprint(&self, x: u32, z: u32, dims: Dimensions) -> impl Iterator<Item = &GridCell> + '_ {
        (z..z + dims.depth).flat_map(move |cz| {
            (x..x + dims.width).filter_map(move |cx| self.cell(cx, cz))
        })
    }

    fn can_place_at(&self, x: u32, y: u32, z: u32, dims: Dimensions) -> bool {
        if self.footprint(x, z, dims).any(|c| c.height > y) {
            return false;
        }
        if y == 0 {
            return true;
        }
        self.footprint(x, z, dims).all(|c| c.height == y)
    }

    fn find_position(&self, dims: Dimensions) -> Option<GridPos> {
        if !self.fits(dims) {
            return None;
        }
        for y in (0..=self.height - dims.height).rev() {
            for z in 0..=self.length - dims.depth {
                for x in 0..=self.width - dims.width {
                    if self.can_place_at(x, y, z, dims) {
                        return Some(GridPos::new(x, y, z));
                    }
                }
            }
        }
        None
    }
}

/// Occupancy of every grid in a ship, rebuilt from a container list.
#[derive(Debug, Clone)]
pub struct HoldState {
    grids: Vec<GridState>,
}

impl HoldState {
    /// Replay `containers` into fresh grids. Containers with an unknown
    /// size, a missing grid, or a box outside their grid are skipped.
    ///
    /// Fails when a grid has more than [`MAX_GRID_COLUMNS`] columns.
    pub fn build(ship: &Ship, containers: &[Container]) -> Result<Self> {
        let mut hold = Self {
            grids: ship
                .cargo_grids
                .iter()
                .map(GridState::new)
                .collect::<Result<_>>()?,
        };
        for (i, container) in containers.iter().enumerate() {
            let Some(dims) = container.footprint() else {
                log::warn!(
                    "Skipping container {} with unknown size {}",
                    i,
                    container.size
                );
                continue;
            };
            let marked = hold
                .grids
                .get_mut(container.grid_index)
                .map_or(false, |grid| grid.mark(i, container.position, dims));
            if !marked {
                log::warn!(
                    "Skipping container {} outside the hold (grid {}, {:?})",
                    i,
                    container.grid_index,
                    container.position
                );
            }
        }
        Ok(hold)
    }

    pub fn grid(&self, index: usize) -> Option<&GridState> {
        self.grids.get(index)
    }

    /// First legal placement for a box of `dims`, or `None` if the hold is full.
    pub fn find_placement(&self, dims: Dimensions) -> Option<Placement> {
        let rotated_dims = dims.rotated();
        for (grid_index, grid) in self.grids.iter().enumerate() {
            if let Some(position) = grid.find_position(dims) {
                return Some(Placement {
                    position,
                    rotated: false,
                    grid_index,
                });
            }
            if let Some(position) = grid.find_position(rotated_dims) {
                return Some(Placement {
                    position,
                    rotated: true,
                    grid_index,
                });
            }
        }
        None
    }
}

/// Find where a container of `size` would go.
///
/// `Err` for a size with no dimensions or an oversized grid, `Ok(None)`
/// when nothing fits.
pub fn try_find_next_position(
    size: u32,
    ship: &Ship,
    existing: &[Container],
) -> Result<Option<Placement>> {
    let dims = container_dimensions(size).ok_or(PlanError::InvalidContainerSize(size))?;
    Ok(HoldState::build(ship, existing)?.find_placement(dims))
}

/// [`try_find_next_position`] with errors logged and reported as `None`.
pub fn find_next_position(size: u32, ship: &Ship, existing: &[Container]) -> Option<Placement> {
    match try_find_next_position(size, ship, existing) {
        Ok(placement) => placement,
        Err(e) => {
            log::error!("{}", e);
            None
        }
    }
}
