use std::time::{Duration, Instant};

use anyhow::Result;
use kmeans::KMeans;

/// Average wall time of `repeats` fits for every worker count in `1..=max_workers`.
///
/// Engines are deterministic, so every worker count fits the same sequence of starts.
pub fn time_by_workers(
    points: &[Vec<f64>],
    clusters: usize,
    max_workers: usize,
    repeats: usize,
) -> Result<Vec<(usize, Duration)>> {
    let repeats = repeats.max(1);
    (1..=max_workers)
        .map(|workers| -> Result<(usize, Duration)> {
            let mut model: KMeans<Vec<f64>> = KMeans::new(clusters, workers, true)?;
            let start = Instant::now();
            for _ in 0..repeats {
                model.fit(points)?;
            }
            Ok((workers, start.elapsed() / repeats as u32))
        })
        .collect()
}
