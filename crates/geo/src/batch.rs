//! Order-preserving batch partitioning.
//!
//! Providers cap how many destinations one request may carry. Splitting the
//! input into consecutive chunks and concatenating the per-chunk answers in
//! chunk order reconstructs the original order exactly.

use std::num::NonZeroUsize;

/// Destination cap used by the Google Distance Matrix API.
pub const DEFAULT_MAX_PER_BATCH: NonZeroUsize = match NonZeroUsize::new(25) {
    Some(n) => n,
    None => unreachable!(),
};

/// Split `items` into consecutive chunks of at most `max_per_batch` elements.
///
/// Every chunk except possibly the last holds exactly `max_per_batch`
/// elements; an empty input yields no chunks.
///
/// # Example
/// ```
/// use agrimap_geo::create_batches;
/// use std::num::NonZeroUsize;
///
/// let items: Vec<u32> = (0..30).collect();
/// let batches = create_batches(&items, NonZeroUsize::new(25).unwrap());
/// assert_eq!(batches.len(), 2);
/// assert_eq!(batches[1], &[25, 26, 27, 28, 29]);
/// ```
pub fn create_batches<T>(items: &[T], max_per_batch: NonZeroUsize) -> Vec<&[T]> {
    items.chunks(max_per_batch.get()).collect()
}
