//! Error taxonomy for recommendation requests.
//!
//! Callers branch on three distinct kinds: a bad request, an unavailable
//! backend, or collaborators that disagree with each other.

/// Caller errors, detected before any collaborator is contacted.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ArgumentError {
    #[error("user id cannot be empty or whitespace")]
    BlankUserId,

    #[error("minimum rating must be a non-negative number, got {0}")]
    InvalidMinRating(f64),

    #[error("category list to filter by is empty")]
    EmptyCategoryList,

    #[error("category id must be positive, got {0}")]
    NonPositiveCategoryId(i64),

    #[error("category {0} has an empty or blank name")]
    BlankCategoryName(i64),

    #[error("level must be between 1 and 5, got {0}")]
    LevelOutOfRange(u8),

    #[error("unknown category id {0}")]
    UnknownCategory(i64),
}

/// Broken invariants between the candidate and interest collaborators.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsistencyError {
    #[error("category {category_id} has candidates but no interest level for the user")]
    MissingInterestLevel { category_id: i64 },

    #[error("total interest weight is zero across {categories} non-empty categories")]
    ZeroTotalWeight { categories: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum RecommendError {
    #[error("invalid argument: {0}")]
    InvalidArgument(#[from] ArgumentError),

    #[error("error retrieving recommended resources for user {user_id}")]
    Retrieval {
        user_id: String,
        #[source]
        source: anyhow::Error,
    },

    #[error("data consistency violated: {0}")]
    Consistency(#[from] ConsistencyError),
}

impl RecommendError {
    pub(crate) fn retrieval(user_id: &str, source: anyhow::Error) -> Self {
        RecommendError::Retrieval {
            user_id: user_id.to_string(),
            source,
        }
    }

    /// Stable machine-readable kind.
    pub fn kind(&self) -> &'static str {
        match self {
            RecommendError::InvalidArgument(_) => "invalid_argument",
            RecommendError::Retrieval { .. } => "retrieval",
            RecommendError::Consistency(_) => "consistency",
        }
    }

    /// Process exit code used by the CLI.
    pub fn exit_code(&self) -> i32 {
        match self {
            RecommendError::InvalidArgument(_) => 2,
            RecommendError::Retrieval { .. } => 3,
            RecommendError::Consistency(_) => 4,
        }
    }
}
