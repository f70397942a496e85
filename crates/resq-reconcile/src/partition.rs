//! Greedy split of studies into worker buckets of similar subject counts.
//!
//! This only sizes work units; it is not an optimal balanced partition.
//! One very large study can close several thresholds at once, which leaves
//! the following buckets smaller than their share.

use crate::error::{ReconcileError, Result};

/// Split studies into `k` buckets.
///
/// Studies are taken in descending subject count (ties keep input order)
/// while a running total is compared against the cumulative thresholds
/// `floor(total / k) * i`, the last one being `total`. A bucket closes as
/// soon as the running total exceeds its threshold; whatever remains goes
/// into the bucket open at the end. Trailing buckets may be empty.
pub fn partition(counts: &[(String, usize)], k: usize) -> Result<Vec<Vec<String>>> {
    if k == 0 {
        return Err(ReconcileError::ZeroBuckets);
    }

    let mut sorted: Vec<&(String, usize)> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));

    let total: usize = counts.iter().map(|(_, count)| count).sum();
    let step = total / k;
    let thresholds: Vec<usize> = (1..=k)
        .map(|i| if i == k { total } else { step * i })
        .collect();

    let mut buckets: Vec<Vec<String>> = vec![Vec::new(); k];
    let mut current = 0;
    let mut running = 0;
    let mut pending = Vec::new();

    for (study_id, count) in sorted {
        running += count;
        pending.push(study_id.clone());
        if current + 1 < k && running > thresholds[current] {
            buckets[current] = std::mem::take(&mut pending);
            current += 1;
        }
    }
    buckets[current].extend(pending);

    Ok(buckets)
}
