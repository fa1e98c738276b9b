//! Partitioned accumulation for one Lloyd pass
//!
//! The dataset is cut into partitions whose boundaries depend only on its length.
//! Each partition is scanned by a single worker into private per-cluster buckets,
//! and the partials are then reduced in partition order on the calling thread.
//! Floating-point sums therefore come out bit-identical whatever the pool size.

use num_traits::Zero;
use rayon::{ThreadPool, prelude::*};

use crate::types::{Coordinate, Sample, nearest};

/// Smallest partition handed to a worker
const MIN_PARTITION_LEN: usize = 1024;
/// Upper bound on partitions per pass, which bounds the private bucket memory
const MAX_PARTITIONS: usize = 64;

/// Running coordinate sum and member count of one cluster
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Bucket<T> {
    pub sum: Vec<T>,
    pub count: usize,
}

/// Per-cluster statistics gathered by one partition, or by the whole pass after reduction.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct PassStats<T> {
    /// Sum of squared distances to the assigned centroid, per cluster
    pub distances: Vec<T>,
    pub buckets: Vec<Bucket<T>>,
}

impl<T: Coordinate> PassStats<T> {
    pub fn new(k: usize, dim: usize) -> Self {
        Self {
            distances: vec![T::zero(); k],
            buckets: vec![Bucket { sum: vec![T::zero(); dim], count: 0 }; k],
        }
    }

    fn absorb(&mut self, point: &[T], cluster: usize, dist: T) {
        self.distances[cluster] = self.distances[cluster] + dist;
        let bucket = &mut self.buckets[cluster];
        for (acc, &value) in bucket.sum.iter_mut().zip(point) {
            *acc = *acc + value;
        }
        bucket.count += 1;
    }

    fn merge(&mut self, other: &Self) {
        for (acc, &dist) in self.distances.iter_mut().zip(&other.distances) {
            *acc = *acc + dist;
        }
        for (bucket, right) in self.buckets.iter_mut().zip(&other.buckets) {
            for (acc, &value) in bucket.sum.iter_mut().zip(&right.sum) {
                *acc = *acc + value;
            }
            bucket.count += right.count;
        }
    }
}

/// Partition length for a dataset of `len` points
pub(crate) fn partition_len(len: usize) -> usize {
    MIN_PARTITION_LEN.max(len.div_ceil(MAX_PARTITIONS))
}

/// Assign every point to its nearest centroid and gather per-cluster statistics.
///
/// Centroids are only read. `centroids` must hold at least one point of dimension `dim`.
pub(crate) fn accumulate<P: Sample>(
    pool: &ThreadPool,
    data: &[P],
    centroids: &[P],
    dim: usize,
) -> PassStats<P::Value> {
    let k = centroids.len();
    let partials: Vec<PassStats<P::Value>> = pool.install(|| {
        data.par_chunks(partition_len(data.len()))
            .map(|partition| {
                let mut stats = PassStats::new(k, dim);
                for point in partition {
                    let (cluster, dist) = nearest(point.coords(), centroids);
                    stats.absorb(point.coords(), cluster, dist);
                }
                stats
            })
            .collect()
    });

    partials.into_iter()
        .reduce(|mut acc, right| {
            acc.merge(&right);
            acc
        })
        .unwrap_or_else(|| PassStats::new(k, dim))
}
