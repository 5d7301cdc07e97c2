//! Isochronal minimum-time routing solver for wind-propelled sailing craft.
//!
//! The core solver and its data model live in [`engine`] and touch no
//! I/O; asset loaders (polar CSVs, compressed land-mask bitmaps) live in
//! [`adapters`].

pub mod adapters;
pub mod engine;
pub mod error;

pub use engine::config::SolveConfig;
pub use engine::craft::Craft;
pub use engine::environment::Environment;
pub use engine::failure::{FailureModel, FailureThresholds};
pub use engine::field::{EnvironmentField, InterpolationMode};
pub use engine::grid::Grid;
pub use engine::location::Location;
pub use engine::mask::{CoastlineOracle, RoaringLandMask};
pub use engine::polar::Polar;
pub use engine::route::Route;
pub use engine::solver::{solve, CancellationToken, JourneyTime, SolveResult};
pub use error::{Result, RoutingError};
