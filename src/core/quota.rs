//! Proportional share of the result budget per category.
//!
//! quota = ceil(interest / total_weight * budget), where total_weight only
//! counts categories that actually have candidates. Ceiling rounding gives
//! every represented category at least one slot, so quotas may add up to
//! more than the budget; the selector's global cap resolves the excess.

use indexmap::IndexMap;
use tracing::{debug, error};

use crate::core::error::ConsistencyError;
use crate::core::interest::InterestLevelIndex;
use crate::core::partition::CategoryBuckets;

/// Per-category slot counts, in bucket order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Quotas {
    slots: IndexMap<i64, usize>,
}

impl Quotas {
    pub fn get(&self, category_id: i64) -> Option<usize> {
        self.slots.get(&category_id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> + '_ {
        self.slots.iter().map(|(id, n)| (*id, *n))
    }

    /// Sum of every quota; may exceed the budget.
    pub fn total(&self) -> usize {
        self.slots.values().sum()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

fn interest_of(index: &InterestLevelIndex, category_id: i64) -> Result<u8, ConsistencyError> {
    match index.get(category_id) {
        Some(level) => Ok(level.get()),
        None => {
            error!(category_id, "candidate category missing from interest levels");
            Err(ConsistencyError::MissingInterestLevel { category_id })
        }
    }
}

/// Sum of interest levels over the categories present in `buckets`.
pub fn total_weight(
    buckets: &CategoryBuckets,
    index: &InterestLevelIndex,
) -> Result<u32, ConsistencyError> {
    buckets
        .category_ids()
        .map(|id| interest_of(index, id).map(u32::from))
        .sum()
}

/// Slots for one category: `ceil(interest * budget / total_weight)`.
///
/// Integer arithmetic keeps results exact (e.g. 3/10 of 10 is 3, never 4).
/// `total_weight` must be positive.
pub fn quota_for(interest: u8, total_weight: u32, budget: usize) -> usize {
    debug_assert!(total_weight > 0);
    let numerator = u64::from(interest) * budget as u64;
    numerator.div_ceil(u64::from(total_weight)) as usize
}

/// Compute the quota of every non-empty category.
pub fn allocate(
    buckets: &CategoryBuckets,
    index: &InterestLevelIndex,
    budget: usize,
) -> Result<Quotas, ConsistencyError> {
    let total = total_weight(buckets, index)?;

    if total == 0 && !buckets.is_empty() {
        error!(categories = buckets.len(), "zero total interest weight");
        return Err(ConsistencyError::ZeroTotalWeight {
            categories: buckets.len(),
        });
    }

    let mut slots = IndexMap::with_capacity(buckets.len());
    for id in buckets.category_ids() {
        let interest = interest_of(index, id)?;
        slots.insert(id, quota_for(interest, total, budget));
    }

    let quotas = Quotas { slots };
    debug!(total_weight = total, allocated = quotas.total(), budget, "quotas allocated");

    Ok(quotas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Candidate, Category, Level, Resource, ResourceStatus};

    fn candidates(category_id: i64, n: i64) -> Vec<Candidate> {
        (0..n)
            .map(|i| Candidate {
                resource: Resource {
                    id: category_id * 100 + i,
                    name: format!("r{i}"),
                    description: String::new(),
                    link: "https://learn.example".into(),
                    status: ResourceStatus::Available,
                },
                category: Category::new(category_id, format!("c{category_id}"), ""),
                difficulty_level: Level::new(3).unwrap(),
                interest_level: Level::new(3).unwrap(),
                rating: None,
            })
            .collect()
    }

    fn index(pairs: &[(i64, u8)]) -> InterestLevelIndex {
        pairs
            .iter()
            .map(|&(id, level)| (id, Level::new(level).unwrap()))
            .collect()
    }

    #[test]
    fn ceiling_quota() {
        assert_eq!(quota_for(5, 10, 10), 5);
        assert_eq!(quota_for(3, 10, 10), 3);
        assert_eq!(quota_for(1, 2, 10), 5);
        assert_eq!(quota_for(1, 3, 10), 4);
        assert_eq!(quota_for(5, 5, 10), 10);
        assert_eq!(quota_for(1, 50, 10), 1);
    }

    #[test]
    fn weight_ignores_interests_without_candidates() {
        let buckets = CategoryBuckets::partition(candidates(1, 2));
        let idx = index(&[(1, 4), (2, 5), (3, 5)]);

        assert_eq!(total_weight(&buckets, &idx), Ok(4));
    }

    #[test]
    fn allocates_proportionally() {
        let mut input = candidates(1, 10);
        input.extend(candidates(2, 10));
        input.extend(candidates(3, 10));
        let buckets = CategoryBuckets::partition(input);
        let quotas = allocate(&buckets, &index(&[(1, 5), (2, 3), (3, 2)]), 10).unwrap();

        assert_eq!(quotas.iter().collect::<Vec<_>>(), vec![(1, 5), (2, 3), (3, 2)]);
    }

    #[test]
    fn quotas_may_exceed_budget() {
        let mut input = candidates(1, 1);
        input.extend(candidates(2, 1));
        input.extend(candidates(3, 1));
        let buckets = CategoryBuckets::partition(input);
        let quotas = allocate(&buckets, &index(&[(1, 1), (2, 1), (3, 1)]), 10).unwrap();

        assert_eq!(quotas.get(1), Some(4));
        assert_eq!(quotas.total(), 12);
    }

    #[test]
    fn missing_interest_is_a_consistency_fault() {
        let mut input = candidates(1, 1);
        input.extend(candidates(9, 1));
        let buckets = CategoryBuckets::partition(input);

        assert_eq!(
            allocate(&buckets, &index(&[(1, 3)]), 10),
            Err(ConsistencyError::MissingInterestLevel { category_id: 9 })
        );
    }

    #[test]
    fn empty_buckets_allocate_nothing() {
        let quotas = allocate(&CategoryBuckets::default(), &index(&[(1, 3)]), 10).unwrap();
        assert!(quotas.is_empty());
    }
}
