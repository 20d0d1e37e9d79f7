//! Error type shared by every planning module.
//!
//! Structural problems (unknown nodes, bad container sizes, broken catalogs)
//! and route infeasibility are errors. Running out of cargo space is not:
//! placement reports that as `Ok(None)`.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, PlanError>;

#[derive(Debug, Error)]
pub enum PlanError {
    /// A location name that is not a node of the graph being queried.
    #[error("location `{0}` is not in the route graph")]
    UnknownNode(String),

    /// A* exhausted its open set before reaching the goal.
    #[error("no path found from `{from}` to `{to}`")]
    NoPath { from: String, to: String },

    /// Nearest-neighbor would have to push the same parent twice.
    #[error("unable to find valid route to remaining destinations (stuck at `{parent}`)")]
    RouteStuck { parent: String },

    /// No destination is reachable and the first one has no parent to route through.
    #[error("no planetary constraint for `{0}`")]
    MissingConstraint(String),

    /// Container size that has no entry in the dimensions table.
    #[error("invalid container size {0} (available sizes: 1, 2, 4, 8, 16, 24, 32)")]
    InvalidContainerSize(u32),

    /// Cargo grid with more columns than placement will track.
    #[error("cargo grid {width}x{length} is too large to plan")]
    GridTooLarge { width: u32, length: u32 },

    #[error("duplicate location `{0}` in catalog")]
    DuplicateLocation(String),

    #[error("location `{name}` references unknown parent `{parent}`")]
    DanglingParent { name: String, parent: String },

    #[error("unknown ship `{0}`")]
    UnknownShip(String),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PlanError {
    /// Whether this error means "the route cannot be planned" rather than bad input.
    pub fn is_infeasible(&self) -> bool {
        matches!(
            self,
            Self::NoPath { .. } | Self::RouteStuck { .. } | Self::MissingConstraint(_)
        )
    }
}
