use kmeans::{KMeans, KMeansContext, SeedMode, types::squared_distance};
use proptest::prelude::*;

fn fitted(data: &[Vec<f64>], k: usize, workers: usize, seed: u64) -> KMeans<Vec<f64>> {
    let context = KMeansContext::new(k).with_workers(workers).with_seed(SeedMode::Fixed(seed));
    let mut model = KMeans::with_context(context).unwrap();
    let report = model.fit(data).unwrap();
    assert!(report.converged);
    model
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_labels_in_range_and_optimal(
        data in prop::collection::vec(prop::collection::vec(-10.0f64..10.0, 3), 1..60),
        k in 1usize..6,
        seed in any::<u64>(),
    ) {
        if k <= data.len() {
            let model = fitted(&data, k, 2, seed);
            let labels = model.predict(&data).unwrap();

            prop_assert_eq!(labels.len(), data.len());
            for (point, &label) in data.iter().zip(&labels) {
                prop_assert!(label < k);
                let assigned = squared_distance(point.as_slice(), model.centroids()[label].as_slice());
                for centroid in model.centroids() {
                    prop_assert!(assigned <= squared_distance(point.as_slice(), centroid.as_slice()));
                }
            }
        }
    }

    #[test]
    fn prop_score_is_non_positive(
        data in prop::collection::vec(prop::collection::vec(-100.0f64..100.0, 2), 2..40),
        seed in any::<u64>(),
    ) {
        let model = fitted(&data, 2, 1, seed);
        let sum: f64 = model.cluster_distances().iter().sum();
        prop_assert!(model.score() <= 0.0);
        prop_assert_eq!(model.score(), -sum);
        prop_assert!(model.cluster_distances().iter().all(|d| *d >= 0.0));
    }

    #[test]
    fn prop_duplicated_points_keep_centroids_finite(
        location in prop::collection::vec(-5.0f64..5.0, 2),
        copies in 3usize..12,
        k in 2usize..4,
    ) {
        let data = vec![location.clone(); copies];
        let model = fitted(&data, k, 3, 0);
        prop_assert!(model.centroids().iter().flatten().all(|v| v.is_finite()));
        prop_assert_eq!(model.total_distance(), 0.0);
    }
}
