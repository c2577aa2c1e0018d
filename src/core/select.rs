//! Weighted top-N selection across category buckets.

use tracing::trace;

use crate::core::model::Candidate;
use crate::core::partition::CategoryBuckets;
use crate::core::quota::Quotas;

/// Hard cap on the size of a recommendation result.
pub const MAX_RESOURCES_TO_RECOMMEND: usize = 10;

/// Final ordered recommendations for one request.
pub type RecommendationResult = Vec<Candidate>;

/// Walk the buckets in order and take up to `min(quota, available, remaining)`
/// candidates from the front of each, stopping as soon as `budget` is spent.
///
/// A category without a quota gets no slots.
pub fn select_top_n(buckets: CategoryBuckets, quotas: &Quotas, budget: usize) -> RecommendationResult {
    let mut selected = Vec::with_capacity(budget.min(buckets.total_candidates()));
    let mut remaining = budget;

    for (category_id, bucket) in buckets {
        if remaining == 0 {
            break;
        }

        let quota = quotas.get(category_id).unwrap_or(0);
        let take = quota.min(bucket.len()).min(remaining);
        trace!(category_id, quota, available = bucket.len(), take, "selecting from bucket");

        selected.extend(bucket.into_iter().take(take));
        remaining -= take;
    }

    selected
}
