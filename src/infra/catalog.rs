//! File-backed catalog of categories, resources, interests and completions.
//!
//! Loaded once from a JSON document and queried in memory. Implements both
//! recommendation collaborators with the usual retrieval contract:
//!
//! - a resource/category pair is a candidate when the user's interest in the
//!   category is above 2 and the difficulty is within one of their skill
//! - only `Available` resources the user has not completed are returned
//! - order: interest desc, sufficiently rated first, average rating desc
//!   (unrated last), then resource id and category id for determinism

use std::{
    cmp::Ordering,
    collections::{HashMap, HashSet},
    fs,
    path::Path,
};

use anyhow::{Context, Result};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use crate::core::{
    model::{
        Candidate, Category, InterestRecord, Level, RatingStats, Resource, ResourceStatus,
        UserCompletion,
    },
    recommend::{CandidateQuery, CandidateSource, InterestSource},
};

/// Interest levels at or below this never produce candidates.
const MIN_INTEREST_EXCLUSIVE: u8 = 2;

/// On-disk catalog layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogDocument
{
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub resources: Vec<CatalogResource>,
    #[serde(default)]
    pub interests: Vec<InterestRecord>,
    #[serde(default)]
    pub completions: Vec<UserCompletion>,
}

/// A resource together with the categories it is filed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogResource
{
    #[serde(flatten)]
    pub resource: Resource,
    #[serde(default)]
    pub categories: Vec<Placement>,
}

/// Difficulty of a resource within one category.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Placement
{
    pub category_id: i64,
    pub difficulty_level: Level,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError
{
    #[error("duplicate category id {0}")]
    DuplicateCategory(i64),

    #[error("duplicate resource id {0}")]
    DuplicateResource(i64),

    #[error("resource {resource_id} references unknown category {category_id}")]
    UnknownCategory
    {
        resource_id: i64,
        category_id: i64,
    },

    #[error("interest of user {user_id} references unknown category {category_id}")]
    UnknownInterestCategory
    {
        user_id: String,
        category_id: i64,
    },

    #[error("completion of user {user_id} references unknown resource {resource_id}")]
    UnknownResource
    {
        user_id: String,
        resource_id: i64,
    },

    #[error("resource {resource_id} lists category {category_id} more than once")]
    DuplicatePlacement
    {
        resource_id: i64,
        category_id: i64,
    },

    #[error("resource {resource_id} has an invalid link {link:?}")]
    InvalidLink
    {
        resource_id: i64,
        link: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Catalog
{
    categories: IndexMap<i64, Category>,
    resources: Vec<CatalogResource>,
    interests: Vec<InterestRecord>,
    completions: Vec<UserCompletion>,
    ratings: HashMap<i64, RatingStats>,
}

impl Catalog
{
    /// Read and validate a JSON catalog.
    #[instrument]
    pub fn load(path: &Path) -> Result<Self>
    {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read catalog {}", path.display()))?;
        let doc: CatalogDocument = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse catalog {}", path.display()))?;
        let catalog = Self::from_document(doc)
            .with_context(|| format!("Invalid catalog {}", path.display()))?;

        debug!(
            categories = catalog.categories.len(),
            resources = catalog.resources.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError>
    {
        let mut categories = IndexMap::with_capacity(doc.categories.len());
        for category in doc.categories
        {
            let id = category.id;
            if categories.insert(id, category).is_some()
            {
                return Err(CatalogError::DuplicateCategory(id));
            }
        }

        let mut resource_ids = HashSet::with_capacity(doc.resources.len());
        for entry in &doc.resources
        {
            let resource_id = entry.resource.id;
            if !resource_ids.insert(resource_id)
            {
                return Err(CatalogError::DuplicateResource(resource_id));
            }
            if !is_http_link(&entry.resource.link)
            {
                return Err(CatalogError::InvalidLink {
                    resource_id,
                    link: entry.resource.link.clone(),
                });
            }
            if let Some(p) = entry
                .categories
                .iter()
                .find(|p| !categories.contains_key(&p.category_id))
            {
                return Err(CatalogError::UnknownCategory { resource_id, category_id: p.category_id });
            }

            let mut placed = HashSet::with_capacity(entry.categories.len());
            if let Some(p) = entry
                .categories
                .iter()
                .find(|p| !placed.insert(p.category_id))
            {
                return Err(CatalogError::DuplicatePlacement { resource_id, category_id: p.category_id });
            }
        }

        if let Some(i) = doc
            .interests
            .iter()
            .find(|i| !categories.contains_key(&i.category_id))
        {
            return Err(CatalogError::UnknownInterestCategory {
                user_id: i.user_id.clone(),
                category_id: i.category_id,
            });
        }

        if let Some(c) = doc
            .completions
            .iter()
            .find(|c| !resource_ids.contains(&c.resource_id))
        {
            return Err(CatalogError::UnknownResource {
                user_id: c.user_id.clone(),
                resource_id: c.resource_id,
            });
        }

        let ratings = aggregate_ratings(&doc.completions);

        Ok(Self {
            categories,
            resources: doc.resources,
            interests: doc.interests,
            completions: doc.completions,
            ratings,
        })
    }

    pub fn category(
        &self,
        id: i64,
    ) -> Option<&Category>
    {
        self.categories.get(&id)
    }

    pub fn categories(&self) -> impl Iterator<Item = &Category>
    {
        self.categories.values()
    }

    pub fn rating(
        &self,
        resource_id: i64,
    ) -> Option<RatingStats>
    {
        self.ratings.get(&resource_id).copied()
    }

    fn interests_of(
        &self,
        user_id: &str,
    ) -> impl Iterator<Item = &InterestRecord>
    {
        self.interests
            .iter()
            .filter(move |i| i.user_id == user_id)
    }
}

impl CandidateSource for Catalog
{
    fn candidates(
        &self,
        query: &CandidateQuery<'_>,
    ) -> Result<Vec<Candidate>>
    {
        let filter: Option<HashSet<i64>> = query
            .categories
            .map(|cs| cs.iter().map(|c| c.id).collect());

        // last record wins, same as the interest index
        let interests: HashMap<i64, &InterestRecord> = self
            .interests_of(query.user_id)
            .map(|i| (i.category_id, i))
            .collect();

        let completed: HashSet<i64> = self
            .completions
            .iter()
            .filter(|c| c.user_id == query.user_id)
            .map(|c| c.resource_id)
            .collect();

        let mut out = Vec::new();
        for entry in &self.resources
        {
            let resource = &entry.resource;
            if resource.status != ResourceStatus::Available || completed.contains(&resource.id)
            {
                continue;
            }

            for placement in &entry.categories
            {
                if filter
                    .as_ref()
                    .is_some_and(|f| !f.contains(&placement.category_id))
                {
                    continue;
                }

                let Some(interest) = interests.get(&placement.category_id)
                else
                {
                    continue;
                };

                if interest.interest_level.get() <= MIN_INTEREST_EXCLUSIVE
                    || !within_skill(placement.difficulty_level, interest.skill_level)
                {
                    continue;
                }

                let Some(category) = self.categories.get(&placement.category_id)
                else
                {
                    continue;
                };

                out.push(Candidate {
                    resource: resource.clone(),
                    category: category.clone(),
                    difficulty_level: placement.difficulty_level,
                    interest_level: interest.interest_level,
                    rating: self.rating(resource.id),
                });
            }
        }

        let ordered = out
            .into_iter()
            .sorted_by(|a, b| rank_order(a, b, query.min_rating, query.min_rating_count))
            .collect_vec();

        debug!(user_id = query.user_id, candidates = ordered.len(), "catalog candidates");
        Ok(ordered)
    }
}

impl InterestSource for Catalog
{
    fn interested_categories(
        &self,
        user_id: &str,
    ) -> Result<Vec<InterestRecord>>
    {
        Ok(self
            .interests_of(user_id)
            .cloned()
            .collect())
    }
}

fn within_skill(
    difficulty: Level,
    skill: Level,
) -> bool
{
    let (d, s) = (i16::from(difficulty.get()), i16::from(skill.get()));
    (s - 1..=s + 1).contains(&d)
}

fn is_http_link(link: &str) -> bool
{
    Url::parse(link).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

fn aggregate_ratings(completions: &[UserCompletion]) -> HashMap<i64, RatingStats>
{
    let mut sums: HashMap<i64, (u64, u32)> = HashMap::new();

    for (resource_id, rating) in completions
        .iter()
        .filter_map(|c| c.rating.map(|r| (c.resource_id, r)))
    {
        let entry = sums.entry(resource_id).or_default();
        entry.0 += u64::from(rating.value());
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(id, (sum, count))| {
            (id, RatingStats { average: sum as f64 / f64::from(count), count })
        })
        .collect()
}

/// Candidate order: interest desc, rated bucket, average desc (unrated last), ids.
fn rank_order(
    a: &Candidate,
    b: &Candidate,
    min_rating: f64,
    min_rating_count: u32,
) -> Ordering
{
    let sufficient = |c: &Candidate| {
        c.rating
            .is_some_and(|r| r.is_sufficient(min_rating, min_rating_count))
    };

    b.interest_level
        .cmp(&a.interest_level)
        .then_with(|| sufficient(b).cmp(&sufficient(a)))
        .then_with(|| match (a.rating, b.rating)
        {
            (Some(x), Some(y)) => y.average.total_cmp(&x.average),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then_with(|| a.resource.id.cmp(&b.resource.id))
        .then_with(|| a.category.id.cmp(&b.category.id))
}
