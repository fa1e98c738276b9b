//! Lloyd's k-means engine
//! Owns the centroids, the per-cluster distances, the seeded generator and the worker pool.

use std::{fmt, time::{Duration, Instant}};

use num_traits::{Float, NumCast, Zero};
use rand_chacha::ChaCha20Rng;
use rayon::{ThreadPool, ThreadPoolBuilder, prelude::*};
use tracing::{debug, info, instrument, warn};

use crate::{
    bounds::{compute_bounds, init_centers},
    context::KMeansContext,
    error::{InvalidInput, Result},
    partition::{Bucket, accumulate},
    types::{Sample, nearest},
};

/// Diagnostics of one `fit` call.
#[derive(Clone, Debug, PartialEq)]
pub struct FitReport<T> {
    /// Recentering passes performed
    pub iterations: usize,
    /// False only when the iteration cap stopped the loop
    pub converged: bool,
    /// Times a cluster got no members and kept its centroid, summed over passes
    pub empty_clusters: usize,
    /// Total distance after the baseline pass and after every recentering pass
    pub history: Vec<T>,
    pub elapsed: Duration,
}

/// Lloyd's k-means over points of type `P`, fitted on a dedicated worker pool.
///
/// Centroids start uniformly inside the data's bounding box and move to the mean of
/// their members until the per-cluster distance sums repeat exactly between passes.
pub struct KMeans<P: Sample> {
    k: usize,
    workers: usize,
    max_iterations: Option<usize>,
    centroids: Vec<P>,
    cluster_dists: Vec<P::Value>,
    dim: Option<usize>,
    rng: ChaCha20Rng,
    pool: ThreadPool,
}

impl<P: Sample> KMeans<P> {
    /// Engine for `k` clusters on `workers` threads, seeded with the fixed default seed
    /// when `deterministic` is set and from entropy otherwise.
    pub fn new(k: usize, workers: usize, deterministic: bool) -> Result<Self> {
        Self::with_context(
            KMeansContext::new(k)
                .with_workers(workers)
                .with_deterministic_seed(deterministic),
        )
    }

    pub fn with_context(context: KMeansContext) -> Result<Self> {
        context.validate()?;
        let pool = ThreadPoolBuilder::new()
            .num_threads(context.workers)
            .thread_name(|idx| format!("kmeans-worker-{idx}"))
            .build()?;

        Ok(Self {
            k: context.k,
            workers: context.workers,
            max_iterations: context.max_iterations,
            centroids: vec![P::zeroed(0); context.k],
            cluster_dists: vec![<P::Value as Zero>::zero(); context.k],
            dim: None,
            rng: context.seed.rng(),
            pool,
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Current centroids, indexed by cluster.
    ///
    /// Zeroed until the first successful `fit`.
    pub fn centroids(&self) -> &[P] {
        &self.centroids
    }

    /// Sum of squared member distances per cluster after the last pass
    pub fn cluster_distances(&self) -> &[P::Value] {
        &self.cluster_dists
    }

    /// Sum of all cluster distances
    pub fn total_distance(&self) -> P::Value {
        total(&self.cluster_dists)
    }

    /// Negated total distance, so larger is better.
    ///
    /// Only meaningful after `fit`; before it this is zero.
    pub fn score(&self) -> P::Value {
        -self.total_distance()
    }

    /// Fit centroids to `data` from a fresh random start.
    ///
    /// Runs until a pass leaves every per-cluster distance bit-identical to the previous
    /// pass, or until the configured iteration cap. Inputs are validated first, so an
    /// error leaves the engine exactly as it was.
    #[instrument(name = "kmeans_fit", skip_all, fields(k = self.k, workers = self.workers, points = data.len()))]
    pub fn fit(&mut self, data: &[P]) -> Result<FitReport<P::Value>> {
        let dim = validate_dataset(data, self.k)?;
        let (lower, upper) = compute_bounds(data)?;
        let mut rng = self.rng.clone();
        let centroids = init_centers(&mut rng, &lower, &upper, self.k)?;
        check_sum_range(data, dim)?;

        let timer = Instant::now();
        self.rng = rng;
        self.centroids = centroids;
        self.dim = Some(dim);

        // Baseline pass
        let pass = accumulate(&self.pool, data, &self.centroids, dim);
        let mut buckets = pass.buckets;
        self.recompute_distances(pass.distances);

        let mut history = vec![self.total_distance()];
        let mut iterations = 0;
        let mut empty_clusters = 0;
        let mut converged = true;

        loop {
            if self.max_iterations.is_some_and(|cap| iterations >= cap) {
                converged = false;
                warn!(iterations, "iteration cap reached before convergence");
                break;
            }

            let empty = self.recenter(&buckets);
            empty_clusters += empty;
            iterations += 1;

            let pass = accumulate(&self.pool, data, &self.centroids, dim);
            buckets = pass.buckets;
            let changed = self.recompute_distances(pass.distances);
            history.push(self.total_distance());
            debug!(iteration = iterations, total = ?self.total_distance(), empty, "lloyd pass");

            if !changed {
                break;
            }
        }

        let elapsed = timer.elapsed();
        if converged {
            info!(iterations, score = ?self.score(), ?elapsed, "k-means converged");
        }

        Ok(FitReport {
            iterations,
            converged,
            empty_clusters,
            history,
            elapsed,
        })
    }

    /// Cluster index of every point, in input order.
    pub fn predict(&self, data: &[P]) -> Result<Vec<usize>> {
        let dim = self.dim.ok_or(InvalidInput::NotFitted)?;
        if let Some((index, point)) = data.iter().enumerate().find(|(_, point)| point.dim() != dim) {
            return Err(InvalidInput::DimensionMismatch { index, expected: dim, found: point.dim() }.into());
        }

        let centroids = &self.centroids;
        Ok(self.pool.install(|| {
            data.par_iter()
                .map(|point| nearest(point.coords(), centroids).0)
                .collect()
        }))
    }

    /// Cluster index of a single point
    pub fn predict_one(&self, point: &P) -> Result<usize> {
        let dim = self.dim.ok_or(InvalidInput::NotFitted)?;
        if point.dim() != dim {
            return Err(InvalidInput::DimensionMismatch { index: 0, expected: dim, found: point.dim() }.into());
        }
        Ok(nearest(point.coords(), &self.centroids).0)
    }

    /// Move every non-empty cluster's centroid to the mean of its members.
    ///
    /// Returns the number of empty clusters, whose centroids stay where they were.
    fn recenter(&mut self, buckets: &[Bucket<P::Value>]) -> usize {
        let Self { pool, centroids, .. } = self;
        pool.install(|| {
            centroids.par_iter_mut()
                .zip(buckets.par_iter())
                .map(|(centroid, bucket)| {
                    let Some(count) = <P::Value as NumCast>::from(bucket.count).filter(|_| bucket.count > 0) else {
                        return 1;
                    };
                    for (coord, &sum) in centroid.coords_mut().iter_mut().zip(&bucket.sum) {
                        *coord = sum / count;
                    }
                    0
                })
                .sum()
        })
    }

    /// Replace the per-cluster distances, reporting whether any of them changed.
    ///
    /// Values are compared by bit pattern, so a NaN matches an identical NaN.
    fn recompute_distances(&mut self, distances: Vec<P::Value>) -> bool {
        let changed = distances.len() != self.cluster_dists.len()
            || distances.iter()
                .zip(&self.cluster_dists)
                .any(|(&new, &old)| Float::integer_decode(new) != Float::integer_decode(old));
        self.cluster_dists = distances;
        changed
    }
}

impl<P: Sample> fmt::Debug for KMeans<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KMeans")
            .field("k", &self.k)
            .field("workers", &self.workers)
            .field("max_iterations", &self.max_iterations)
            .field("dim", &self.dim)
            .field("cluster_dists", &self.cluster_dists)
            .finish_non_exhaustive()
    }
}

fn total<T: Float>(values: &[T]) -> T {
    values.iter().fold(T::zero(), |acc, &v| acc + v)
}

/// Check a dataset for fitting and return its dimension.
fn validate_dataset<P: Sample>(data: &[P], k: usize) -> std::result::Result<usize, InvalidInput> {
    let first = data.first().ok_or(InvalidInput::EmptyDataset)?;
    if k > data.len() {
        return Err(InvalidInput::TooManyClusters { requested: k, points: data.len() });
    }
    let dim = first.dim();
    if dim == 0 {
        return Err(InvalidInput::ZeroDimension);
    }
    for (index, point) in data.iter().enumerate() {
        if point.dim() != dim {
            return Err(InvalidInput::DimensionMismatch { index, expected: dim, found: point.dim() });
        }
        if !point.coords().iter().all(|v| v.is_finite()) {
            return Err(InvalidInput::NonFinite { index });
        }
    }
    Ok(dim)
}

/// Reject datasets where a per-cluster coordinate sum could overflow.
///
/// No partial sum in any dimension exceeds `n * max|x|` there, so that product must stay finite.
fn check_sum_range<P: Sample>(data: &[P], dim: usize) -> std::result::Result<(), InvalidInput> {
    let points = <P::Value as NumCast>::from(data.len()).ok_or(InvalidInput::SumOverflow { dim: 0 })?;
    let mut largest = vec![<P::Value as Zero>::zero(); dim];
    for point in data {
        for (max, &value) in largest.iter_mut().zip(point.coords()) {
            *max = Float::max(*max, Float::abs(value));
        }
    }
    match largest.iter().position(|&max| !Float::is_finite(max * points)) {
        Some(dim) => Err(InvalidInput::SumOverflow { dim }),
        None => Ok(()),
    }
}
