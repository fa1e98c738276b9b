use anyhow::{Context, Result, ensure};
use rand::{RngExt, SeedableRng};
use rand_chacha::ChaChaRng;
use rand_distr::{Distribution, Normal};

/// Gaussian blobs in `dim` dimensions.
///
/// Blob centers are drawn uniformly from `[0, 100)` per dimension and points are
/// spread around them with standard deviation `spread`, handed out round-robin.
pub fn gaussian_blobs(points: usize, clusters: usize, dim: usize, spread: f64, seed: u64) -> Result<Vec<Vec<f64>>> {
    ensure!(clusters > 0, "cluster count must be positive");
    ensure!(dim > 0, "dimension must be positive");
    let mut rng = ChaChaRng::seed_from_u64(seed);
    let noise = Normal::new(0.0, spread).context("spread must be finite and non-negative")?;

    let centers: Vec<Vec<f64>> = (0..clusters)
        .map(|_| (0..dim).map(|_| rng.random_range(0.0..100.0)).collect())
        .collect();

    Ok((0..points)
        .map(|i| {
            centers[i % clusters].iter()
                .map(|c| c + noise.sample(&mut rng))
                .collect()
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blobs_have_requested_shape() {
        let points = gaussian_blobs(30, 3, 4, 0.5, 1).unwrap();
        assert_eq!(points.len(), 30);
        assert!(points.iter().all(|p| p.len() == 4));
        assert_eq!(points, gaussian_blobs(30, 3, 4, 0.5, 1).unwrap());
    }

    #[test]
    fn zero_spread_repeats_centers() {
        let points = gaussian_blobs(6, 2, 2, 0.0, 9).unwrap();
        assert_eq!(points[0], points[2]);
        assert_eq!(points[1], points[3]);
    }

    #[test]
    fn rejects_bad_parameters() {
        assert!(gaussian_blobs(10, 0, 2, 1.0, 0).is_err());
        assert!(gaussian_blobs(10, 2, 0, 1.0, 0).is_err());
        assert!(gaussian_blobs(10, 2, 2, -1.0, 0).is_err());
    }
}
