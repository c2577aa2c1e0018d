//! Recommendation entry points.
//!
//! A [`Recommender`] validates the request, pulls candidates and interest
//! levels from its collaborators, then runs partition → quota → selection.
//! It holds no mutable state, so one instance can serve concurrent requests.

use anyhow::Result;
use tracing::{debug, info, instrument};

use crate::core::error::{ArgumentError, RecommendError};
use crate::core::interest::InterestLevelIndex;
use crate::core::model::{Candidate, Category, InterestRecord};
use crate::core::partition::CategoryBuckets;
use crate::core::quota::allocate;
use crate::core::select::{MAX_RESOURCES_TO_RECOMMEND, RecommendationResult, select_top_n};

/// Parameters handed to a [`CandidateSource`].
#[derive(Debug, Clone, Copy)]
pub struct CandidateQuery<'a> {
    pub user_id: &'a str,
    /// Restrict to these categories; `None` means every interested category.
    pub categories: Option<&'a [Category]>,
    /// Average rating a resource needs to rank above new or poorly rated ones.
    pub min_rating: f64,
    /// Ratings a resource needs (strictly more than this) before its average counts.
    pub min_rating_count: u32,
}

/// Retrieves ordered candidates for a user.
///
/// Implementations return candidates sorted by interest level descending,
/// then sufficiently rated before the rest, then average rating descending
/// (unrated last). No match is an empty list, not an error.
pub trait CandidateSource {
    fn candidates(&self, query: &CandidateQuery<'_>) -> Result<Vec<Candidate>>;
}

/// Looks up the categories a user registered interest in.
pub trait InterestSource {
    fn interested_categories(&self, user_id: &str) -> Result<Vec<InterestRecord>>;
}

impl<T: CandidateSource + ?Sized> CandidateSource for &T {
    fn candidates(&self, query: &CandidateQuery<'_>) -> Result<Vec<Candidate>> {
        (**self).candidates(query)
    }
}

impl<T: InterestSource + ?Sized> InterestSource for &T {
    fn interested_categories(&self, user_id: &str) -> Result<Vec<InterestRecord>> {
        (**self).interested_categories(user_id)
    }
}

pub struct Recommender<C, I> {
    candidates: C,
    interests: I,
    budget: usize,
}

impl<C, I> Recommender<C, I>
where
    C: CandidateSource,
    I: InterestSource,
{
    pub fn new(candidates: C, interests: I) -> Self {
        Self {
            candidates,
            interests,
            budget: MAX_RESOURCES_TO_RECOMMEND,
        }
    }

    /// Override the result size cap (defaults to [`MAX_RESOURCES_TO_RECOMMEND`]).
    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget;
        self
    }

    /// Top recommendations across every category the user is interested in.
    #[instrument(skip(self), fields(budget = self.budget))]
    pub fn recommend_for_user(
        &self,
        user_id: &str,
        min_rating: f64,
        min_rating_count: u32,
    ) -> Result<RecommendationResult, RecommendError> {
        validate_user_id(user_id)?;
        validate_min_rating(min_rating)?;

        self.run(CandidateQuery {
            user_id,
            categories: None,
            min_rating,
            min_rating_count,
        })
    }

    /// Top recommendations restricted to `categories`.
    #[instrument(skip(self, categories), fields(budget = self.budget, categories = categories.len()))]
    pub fn recommend_for_user_in_categories(
        &self,
        user_id: &str,
        categories: &[Category],
        min_rating: f64,
        min_rating_count: u32,
    ) -> Result<RecommendationResult, RecommendError> {
        validate_user_id(user_id)?;
        if categories.is_empty() {
            return Err(ArgumentError::EmptyCategoryList.into());
        }
        for category in categories {
            category.validate()?;
        }
        validate_min_rating(min_rating)?;

        self.run(CandidateQuery {
            user_id,
            categories: Some(categories),
            min_rating,
            min_rating_count,
        })
    }

    fn run(&self, query: CandidateQuery<'_>) -> Result<RecommendationResult, RecommendError> {
        let user_id = query.user_id;
        let candidates = self
            .candidates
            .candidates(&query)
            .map_err(|e| RecommendError::retrieval(user_id, e))?;

        debug!(candidates = candidates.len(), "candidates retrieved");
        if candidates.is_empty() {
            info!(recommended = 0, "no candidates");
            return Ok(Vec::new());
        }

        let records = self
            .interests
            .interested_categories(user_id)
            .map_err(|e| RecommendError::retrieval(user_id, e))?;
        let index = InterestLevelIndex::from_records(&records);

        let result = rank(candidates, &index, self.budget)?;
        info!(recommended = result.len(), "recommendations ready");

        Ok(result)
    }
}

/// Pure ranking pipeline over already retrieved inputs.
pub fn rank(
    candidates: Vec<Candidate>,
    index: &InterestLevelIndex,
    budget: usize,
) -> Result<RecommendationResult, RecommendError> {
    let buckets = CategoryBuckets::partition(candidates);
    if buckets.is_empty() {
        return Ok(Vec::new());
    }
    debug!(categories = buckets.len(), "candidates partitioned");

    let quotas = allocate(&buckets, index, budget)?;
    Ok(select_top_n(buckets, &quotas, budget))
}

fn validate_user_id(user_id: &str) -> Result<(), ArgumentError> {
    if user_id.trim().is_empty() {
        return Err(ArgumentError::BlankUserId);
    }
    Ok(())
}

fn validate_min_rating(min_rating: f64) -> Result<(), ArgumentError> {
    if !min_rating.is_finite() || min_rating < 0.0 {
        return Err(ArgumentError::InvalidMinRating(min_rating));
    }
    Ok(())
}
