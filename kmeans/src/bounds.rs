//! Centroid seeding from the data's bounding box
//! Centroids are drawn uniformly inside the per-dimension min/max range
//! so the first assignment pass starts close to the data.

use num_traits::Float;
use rand::distr::{Distribution, Uniform};
use rand_chacha::ChaCha20Rng;

use crate::{error::InvalidInput, types::Sample};

/// Per-dimension minimum and maximum over the dataset
///
/// # Returns
/// * `(lower, upper)` points, or `EmptyDataset` when `data` is empty
pub fn compute_bounds<P: Sample>(data: &[P]) -> Result<(P, P), InvalidInput> {
    let first = data.first().ok_or(InvalidInput::EmptyDataset)?;
    let mut lower = first.clone();
    let mut upper = first.clone();
    for point in data.iter().skip(1) {
        for ((lo, hi), &value) in lower.coords_mut().iter_mut()
            .zip(upper.coords_mut().iter_mut())
            .zip(point.coords())
        {
            *lo = Float::min(*lo, value);
            *hi = Float::max(*hi, value);
        }
    }
    Ok((lower, upper))
}

/// Draw `k` centroids uniformly from `[lower[dim], upper[dim]]`
///
/// Draws run dimension by dimension, one value per centroid in index order,
/// so a fixed seed always produces the same centroids.
pub fn init_centers<P: Sample>(
    rng: &mut ChaCha20Rng,
    lower: &P,
    upper: &P,
    k: usize,
) -> Result<Vec<P>, InvalidInput> {
    let dim = lower.dim();
    let ranges = lower.coords().iter()
        .zip(upper.coords())
        .enumerate()
        .map(|(d, (&lo, &hi))| Uniform::new_inclusive(lo, hi).map_err(|_| InvalidInput::UnsampleableBounds { dim: d }))
        .collect::<Result<Vec<_>, _>>()?;

    let mut centers = vec![P::zeroed(dim); k];
    for (d, range) in ranges.iter().enumerate() {
        for center in centers.iter_mut() {
            center.coords_mut()[d] = range.sample(rng);
        }
    }
    Ok(centers)
}
