use thiserror::Error;

/// Fatal, construction-time errors for the routing core.
///
/// Nothing in this enum is ever raised mid-solve: by the time a `Grid`,
/// `Craft`, or `EnvironmentField` exists, the solver's tight loop cannot fail.
#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("axis is not strictly ascending: {axis} at index {index}")]
    NonAscendingAxis { axis: &'static str, index: usize },

    #[error("polar speed table shape {rows}x{cols} does not match twa/tws axes ({twa_len}/{tws_len})")]
    MismatchedTable {
        rows: usize,
        cols: usize,
        twa_len: usize,
        tws_len: usize,
    },

    #[error("grid must have at least one rank and one node per rank, got {r}x{w}")]
    EmptyGrid { r: usize, w: usize },

    #[error("start and finish are coincident: {0:?}")]
    CoincidentEndpoints(crate::engine::location::Location),

    #[error("inter-node spacing must be positive, got {0} m")]
    NonPositiveSpacing(f64),

    #[error("a value must lie in [0, 1], got {0}")]
    OutOfUnitRange(f64),

    #[error("all environment fields in a solve must share one interpolation mode")]
    InconsistentInterpolationMode,

    #[error("solve cancelled at rank {rank}")]
    Cancelled { rank: usize },

    #[error("failed to load asset from {path}: {source}")]
    AssetLoad {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed polar table: {0}")]
    MalformedTable(String),
}

pub type Result<T> = std::result::Result<T, RoutingError>;
