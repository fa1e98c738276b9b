//! Point and coordinate abstractions for k-means clustering
//! Includes the squared Euclidean metric and the nearest-centroid scan
//! shared by fitting and prediction.

use std::fmt::Debug;

use num_traits::{Float, Zero};
use rand::distr::uniform::SampleUniform;

/// Numeric type usable as a point coordinate.
///
/// Any float that rand can sample uniformly qualifies, in practice `f32` and `f64`.
pub trait Coordinate: Float + SampleUniform + Send + Sync + Debug + 'static {}

impl<T> Coordinate for T
where
    T: Float + SampleUniform + Send + Sync + Debug + 'static,
{}

/// A point in D-dimensional space.
///
/// Implemented for fixed arrays, where the type pins the dimension, and for `Vec`,
/// where the dimension is checked when a dataset is handed to the engine.
pub trait Sample: Clone + Send + Sync {
    /// Coordinate type
    type Value: Coordinate;

    /// Coordinates in dimension order
    fn coords(&self) -> &[Self::Value];

    /// Mutable coordinates in dimension order
    fn coords_mut(&mut self) -> &mut [Self::Value];

    /// Point with every coordinate set to zero.
    ///
    /// `dim` is ignored by types whose dimension is fixed.
    fn zeroed(dim: usize) -> Self;

    /// Number of coordinates
    fn dim(&self) -> usize {
        self.coords().len()
    }
}

impl<T, const D: usize> Sample for [T; D]
where
    T: Coordinate,
{
    type Value = T;

    fn coords(&self) -> &[T] {
        self
    }

    fn coords_mut(&mut self) -> &mut [T] {
        self
    }

    fn zeroed(_dim: usize) -> Self {
        [T::zero(); D]
    }
}

impl<T> Sample for Vec<T>
where
    T: Coordinate,
{
    type Value = T;

    fn coords(&self) -> &[T] {
        self
    }

    fn coords_mut(&mut self) -> &mut [T] {
        self
    }

    fn zeroed(dim: usize) -> Self {
        vec![T::zero(); dim]
    }
}

/// Squared Euclidean distance, `sum((a[i] - b[i])^2)`.
///
/// No square root is taken: ordering is all the assignment step needs.
pub fn squared_distance<T: Coordinate>(a: &[T], b: &[T]) -> T {
    a.iter()
        .zip(b.iter())
        .fold(T::zero(), |acc, (&x, &y)| {
            let diff = x - y;
            acc + diff * diff
        })
}

/// Index of the closest centroid together with its squared distance.
///
/// Scans left to right and only moves on a strictly smaller distance, so the
/// first centroid reaching the minimum wins a tie. `centroids` must not be empty.
pub fn nearest<P: Sample>(point: &[P::Value], centroids: &[P]) -> (usize, P::Value) {
    let mut best = (0, squared_distance(point, centroids[0].coords()));
    for (idx, centroid) in centroids.iter().enumerate().skip(1) {
        let dist = squared_distance(point, centroid.coords());
        if dist < best.1 {
            best = (idx, dist);
        }
    }
    best
}
