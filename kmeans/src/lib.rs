//! Lloyd's k-means with a parallel, deterministic fitting loop
//!
//! Points are assigned, aggregated and recentered on a fixed rayon pool owned by the
//! engine. Every pass reduces per-partition statistics in a fixed order, so a fixed
//! seed yields bit-identical centroids whatever the number of workers.

pub mod bounds;
pub mod context;
pub mod engine;
pub mod error;
pub mod types;
mod partition;

pub use context::{KMeansContext, SeedMode};
pub use engine::{FitReport, KMeans};
pub use error::{Error, InvalidInput, Result};
pub use types::{Coordinate, Sample};
