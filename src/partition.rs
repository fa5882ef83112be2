//! Partition driver.
//!
//! Datasets are split into contiguous, near-equal partitions; each partition
//! is one task on a bounded worker pool. Results are collected by partition
//! index, so the concatenated output always follows input order.

use rayon::prelude::*;
use tracing::debug;

use crate::CallerError;

/// Split `items` into `parts` contiguous slices of near-equal length.
///
/// Every slice has `items.len() / parts` elements and the first
/// `items.len() % parts` slices get one extra. When there are fewer items
/// than parts the trailing slices are empty. `parts == 0` is treated as 1.
pub fn partition<T>(items: &[T], parts: usize) -> Vec<&[T]> {
    let parts = parts.max(1);
    let base = items.len() / parts;
    let extra = items.len() % parts;

    let mut slices = Vec::with_capacity(parts);
    let mut offset = 0;
    for idx in 0..parts {
        let len = base + usize::from(idx < extra);
        slices.push(&items[offset..offset + len]);
        offset += len;
    }
    slices
}

/// Apply `process` to every item, one partition per worker.
///
/// `workers == 1` runs on the calling thread without a pool. The first error
/// from any worker aborts the run.
pub fn process_partitions<T, R, F>(
    items: &[T],
    workers: usize,
    process: F,
) -> Result<Vec<R>, CallerError>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> Result<R, CallerError> + Sync,
{
    let partitions = partition(items, workers);
    let run_partition =
        |slice: &&[T]| -> Result<Vec<R>, CallerError> { slice.iter().map(&process).collect() };

    let per_partition: Vec<Vec<R>> = if workers <= 1 {
        partitions.iter().map(run_partition).collect::<Result<_, _>>()?
    } else {
        debug!(workers, items = items.len(), "starting worker pool");
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|err| CallerError::ThreadPool(err.to_string()))?;
        pool.install(|| {
            partitions
                .par_iter()
                .map(run_partition)
                .collect::<Result<Vec<_>, _>>()
        })?
    };

    Ok(per_partition.into_iter().flatten().collect())
}
