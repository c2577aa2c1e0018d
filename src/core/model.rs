//! Domain records shared by the recommendation core and its collaborators.
//!
//! Everything here is plain data: candidates are produced by a retrieval
//! collaborator, handed to the core by value and never mutated afterwards.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::error::ArgumentError;

/// A 1-5 level (interest, skill or difficulty).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    /// Build a level, rejecting values outside `1..=5`.
    pub fn new(value: u8) -> Result<Self, ArgumentError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(ArgumentError::LevelOutOfRange(value))
        }
    }

    pub const fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Level {
    type Error = ArgumentError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A learning category (e.g. "Rust", "SQL").
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: description.into(),
        }
    }

    /// Check the category is usable as a filter entry: positive id and a non-blank name.
    pub fn validate(&self) -> Result<(), ArgumentError> {
        if self.id <= 0 {
            return Err(ArgumentError::NonPositiveCategoryId(self.id));
        }
        if self.name.trim().is_empty() {
            return Err(ArgumentError::BlankCategoryName(self.id));
        }
        Ok(())
    }
}

/// Lifecycle state of a resource; only `Available` ones are recommendable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ResourceStatus {
    #[default]
    Available,
    Pending,
    Deleted,
}

/// A learning resource (article, course, video...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Opaque locator, usually an http(s) URL.
    pub link: String,
    #[serde(default)]
    pub status: ResourceStatus,
}

/// Satisfaction score attached to a completed resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionRating {
    ExtremelyDissatisfied,
    Dissatisfied,
    Neutral,
    Satisfied,
    ExtremelySatisfied,
}

impl CompletionRating {
    pub const fn value(self) -> u8 {
        match self {
            CompletionRating::ExtremelyDissatisfied => 0,
            CompletionRating::Dissatisfied => 1,
            CompletionRating::Neutral => 2,
            CompletionRating::Satisfied => 3,
            CompletionRating::ExtremelySatisfied => 4,
        }
    }
}

/// Aggregate rating of a resource across all users.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RatingStats {
    pub average: f64,
    pub count: u32,
}

impl RatingStats {
    /// Rated often enough and well enough to rank above everything else.
    pub fn is_sufficient(&self, min_rating: f64, min_rating_count: u32) -> bool {
        self.average >= min_rating && self.count > min_rating_count
    }
}

/// A resource eligible for recommendation, annotated for one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub resource: Resource,
    pub category: Category,
    pub difficulty_level: Level,
    /// The user's interest in `category`, copied onto every candidate.
    pub interest_level: Level,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<RatingStats>,
}

impl Candidate {
    pub fn category_id(&self) -> i64 {
        self.category.id
    }
}

/// One user's declared interest (and skill) in a category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestRecord {
    pub user_id: String,
    pub category_id: i64,
    pub skill_level: Level,
    pub interest_level: Level,
}

/// A resource the user has finished, optionally rated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserCompletion {
    pub user_id: String,
    pub resource_id: i64,
    #[serde(default)]
    pub rating: Option<CompletionRating>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_bounds() {
        assert!(Level::new(0).is_err());
        assert_eq!(Level::new(1).map(Level::get), Ok(1));
        assert_eq!(Level::new(5).map(Level::get), Ok(5));
        assert_eq!(Level::new(6), Err(ArgumentError::LevelOutOfRange(6)));
    }

    #[test]
    fn level_deserialize_rejects_out_of_range() {
        assert!(serde_json::from_str::<Level>("3").is_ok());
        assert!(serde_json::from_str::<Level>("9").is_err());
    }

    #[test]
    fn category_validation() {
        assert!(Category::new(1, "Rust", "").validate().is_ok());
        assert_eq!(
            Category::new(0, "Rust", "").validate(),
            Err(ArgumentError::NonPositiveCategoryId(0))
        );
        assert_eq!(
            Category::new(3, "  ", "").validate(),
            Err(ArgumentError::BlankCategoryName(3))
        );
    }

    #[test]
    fn rating_sufficiency_needs_both_average_and_count() {
        let stats = RatingStats { average: 3.0, count: 2 };
        assert!(stats.is_sufficient(2.0, 1));
        assert!(!stats.is_sufficient(2.0, 2));
        assert!(!stats.is_sufficient(3.5, 0));
    }

    #[test]
    fn completion_rating_scale_follows_snake_case_names() {
        let parse = |s: &str| serde_json::from_str::<CompletionRating>(s).expect("rating");
        assert_eq!(parse("\"extremely_dissatisfied\"").value(), 0);
        assert_eq!(parse("\"neutral\"").value(), 2);
        assert_eq!(parse("\"extremely_satisfied\"").value(), 4);
        assert!(serde_json::from_str::<CompletionRating>("\"great\"").is_err());
    }
}
