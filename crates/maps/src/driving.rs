//! Batched driving-distance lookups.
//!
//! Destinations are split into consecutive batches under the provider's
//! per-call cap. Batches run one after another, each under its own timeout,
//! and their answers are concatenated in batch order so `result[i]` always
//! belongs to `destinations[i]`. Any failed batch fails the whole call.

use crate::config::{MapsConfig, DEFAULT_TIMEOUT};
use crate::error::MapsError;
use crate::provider::DistanceMatrix;
use agrimap_core::Result;
use agrimap_geo::{create_batches, Coordinate, DEFAULT_MAX_PER_BATCH};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Driving-distance client over any [`DistanceMatrix`] provider.
#[derive(Clone)]
pub struct DrivingDistances {
    matrix: Arc<dyn DistanceMatrix>,
    max_per_batch: NonZeroUsize,
    batch_timeout: Duration,
}

impl DrivingDistances {
    /// Create with the default cap (25) and batch timeout (1 s).
    pub fn new(matrix: Arc<dyn DistanceMatrix>) -> Self {
        Self {
            matrix,
            max_per_batch: DEFAULT_MAX_PER_BATCH,
            batch_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Create with the cap and timeout from a client configuration.
    pub fn from_config(matrix: Arc<dyn DistanceMatrix>, config: &MapsConfig) -> Self {
        Self::new(matrix)
            .with_max_per_batch(config.max_destinations_per_batch)
            .with_batch_timeout(config.timeout)
    }

    /// Builder-style method to set the destination cap per call
    #[must_use]
    pub fn with_max_per_batch(mut self, max_per_batch: NonZeroUsize) -> Self {
        self.max_per_batch = max_per_batch;
        self
    }

    /// Builder-style method to set the per-batch timeout
    #[must_use]
    pub fn with_batch_timeout(mut self, batch_timeout: Duration) -> Self {
        self.batch_timeout = batch_timeout;
        self
    }

    /// Number of provider calls needed for `destinations` destinations.
    #[must_use]
    pub fn batch_count(&self, destinations: usize) -> usize {
        destinations.div_ceil(self.max_per_batch.get())
    }

    /// Driving distance in kilometres from `origin` to every destination.
    ///
    /// Missing distances come back as `0.0`. Provider failures surface as
    /// a provider integration error naming the provider.
    #[instrument(skip_all, fields(destinations = destinations.len()))]
    pub async fn get_driving_distances(
        &self,
        origin: &Coordinate,
        destinations: &[Coordinate],
    ) -> Result<Vec<f64>> {
        let mut distances = Vec::with_capacity(destinations.len());

        for (index, batch) in create_batches(destinations, self.max_per_batch)
            .into_iter()
            .enumerate()
        {
            let meters = self.fetch_batch(origin, batch).await.map_err(|e| {
                warn!(batch = index, size = batch.len(), error = %e, "Distance batch failed");
                e.into_integration_error(self.matrix.provider_name())
            })?;

            debug!(batch = index, size = batch.len(), "Distance batch completed");
            distances.extend(meters.into_iter().map(meters_to_km));
        }

        Ok(distances)
    }

    async fn fetch_batch(
        &self,
        origin: &Coordinate,
        batch: &[Coordinate],
    ) -> std::result::Result<Vec<Option<u64>>, MapsError> {
        let meters = tokio::time::timeout(self.batch_timeout, self.matrix.distance_row(origin, batch))
            .await
            .map_err(|_| MapsError::Timeout(self.batch_timeout))??;

        if meters.len() != batch.len() {
            return Err(MapsError::malformed(format!(
                "expected {} distances, got {}",
                batch.len(),
                meters.len()
            )));
        }

        Ok(meters)
    }
}

#[allow(clippy::cast_precision_loss)]
fn meters_to_km(meters: Option<u64>) -> f64 {
    meters.map_or(0.0, |m| m as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapsResult;
    use agrimap_core::ErrorCode;
    use async_trait::async_trait;
    use proptest::prelude::*;
    use std::sync::Mutex;

    /// Answers `latitude * 1000` meters per destination and records batch sizes.
    #[derive(Default)]
    struct StubMatrix {
        batches: Mutex<Vec<usize>>,
        fail_on_call: Option<usize>,
        delay: Option<Duration>,
        missing_every: Option<usize>,
    }

    impl StubMatrix {
        fn calls(&self) -> Vec<usize> {
            self.batches.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl DistanceMatrix for StubMatrix {
        fn provider_name(&self) -> &str {
            "Google Maps"
        }

        async fn distance_row(
            &self,
            _origin: &Coordinate,
            destinations: &[Coordinate],
        ) -> MapsResult<Vec<Option<u64>>> {
            let call = {
                let mut batches = self.batches.lock().unwrap();
                batches.push(destinations.len());
                batches.len()
            };

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_on_call == Some(call) {
                return Err(MapsError::status("OVER_QUERY_LIMIT", None));
            }

            Ok(destinations
                .iter()
                .map(|d| {
                    let meters = (d.latitude * 1000.0) as u64;
                    match self.missing_every {
                        Some(n) if meters % n as u64 == 0 => None,
                        _ => Some(meters),
                    }
                })
                .collect())
        }
    }

    fn destinations(n: usize) -> Vec<Coordinate> {
        (1..=n).map(|i| Coordinate::new(i as f64, 10.0)).collect()
    }

    fn cap(n: usize) -> NonZeroUsize {
        NonZeroUsize::new(n).unwrap()
    }

    const ORIGIN: Coordinate = Coordinate {
        latitude: 55.6761,
        longitude: 12.5683,
    };

    #[tokio::test]
    async fn test_empty_destinations_make_no_calls() {
        let stub = Arc::new(StubMatrix::default());
        let client = DrivingDistances::new(stub.clone());

        let distances = client.get_driving_distances(&ORIGIN, &[]).await.unwrap();

        assert!(distances.is_empty());
        assert!(stub.calls().is_empty());
    }

    #[tokio::test]
    async fn test_thirty_destinations_use_two_batches() {
        let stub = Arc::new(StubMatrix::default());
        let client = DrivingDistances::new(stub.clone());
        let dests = destinations(30);

        let distances = client.get_driving_distances(&ORIGIN, &dests).await.unwrap();

        assert_eq!(stub.calls(), vec![25, 5]);
        assert_eq!(client.batch_count(30), 2);
        assert_eq!(distances.len(), 30);
        for (i, km) in distances.iter().enumerate() {
            assert!((km - (i + 1) as f64).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_missing_distance_is_zero() {
        let stub = Arc::new(StubMatrix {
            missing_every: Some(2000),
            ..StubMatrix::default()
        });
        let client = DrivingDistances::new(stub);

        let distances = client
            .get_driving_distances(&ORIGIN, &destinations(3))
            .await
            .unwrap();

        assert_eq!(distances, vec![1.0, 0.0, 3.0]);
    }

    #[tokio::test]
    async fn test_failed_batch_fails_whole_call() {
        let stub = Arc::new(StubMatrix {
            fail_on_call: Some(2),
            ..StubMatrix::default()
        });
        let client = DrivingDistances::new(stub.clone()).with_max_per_batch(cap(10));

        let err = client
            .get_driving_distances(&ORIGIN, &destinations(25))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ProviderIntegration);
        assert_eq!(err.message, "Google Maps Integration Error");
        assert_eq!(stub.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_batch_timeout() {
        let stub = Arc::new(StubMatrix {
            delay: Some(Duration::from_millis(200)),
            ..StubMatrix::default()
        });
        let client = DrivingDistances::new(stub).with_batch_timeout(Duration::from_millis(10));

        let err = client
            .get_driving_distances(&ORIGIN, &destinations(2))
            .await
            .unwrap_err();

        assert_eq!(err.code, ErrorCode::ProviderIntegration);
    }

    proptest! {
        #[test]
        fn batching_matches_single_call(n in 0usize..80, k in 1usize..30) {
            let dests = destinations(n);

            let batched_stub = Arc::new(StubMatrix::default());
            let batched = tokio_test::block_on(
                DrivingDistances::new(batched_stub.clone())
                    .with_max_per_batch(cap(k))
                    .get_driving_distances(&ORIGIN, &dests),
            )
            .unwrap();

            let single = tokio_test::block_on(
                DrivingDistances::new(Arc::new(StubMatrix::default()))
                    .with_max_per_batch(cap(n.max(1)))
                    .get_driving_distances(&ORIGIN, &dests),
            )
            .unwrap();

            prop_assert_eq!(batched_stub.calls().len(), n.div_ceil(k));
            prop_assert_eq!(batched, single);
        }
    }
}
