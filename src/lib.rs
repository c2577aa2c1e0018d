//! **learnrec** - Weighted top-N recommendations for a learning-resource catalog
//!
//! Candidates come from a retrieval collaborator already ranked by interest and
//! rating; the core partitions them by category, allocates each category a share
//! of a fixed budget proportional to the user's interest and selects the top ten.

/// Command-line interface with clap integration
pub mod cli;

/// Shell completion generation
pub mod completion;

/// Recommendation core - pure, synchronous, no I/O of its own
pub mod core {
    /// Candidates, categories, resources and levels
    pub mod model;

    /// Argument, retrieval and consistency errors
    pub mod error;
    pub use error::{ArgumentError, ConsistencyError, RecommendError};

    /// Category id → interest level lookup
    pub mod interest;
    pub use interest::InterestLevelIndex;

    /// First-seen ordered category buckets
    pub mod partition;
    pub use partition::CategoryBuckets;

    /// Ceiling-rounded proportional quotas
    pub mod quota;
    pub use quota::{Quotas, allocate};

    /// Budget-capped top-N selection
    pub mod select;
    pub use select::{MAX_RESOURCES_TO_RECOMMEND, RecommendationResult, select_top_n};

    /// Collaborator traits and the two public recommendation operations
    pub mod recommend;
    pub use recommend::{CandidateQuery, CandidateSource, InterestSource, Recommender, rank};
}

/// Infrastructure - configuration, catalog storage and logging
pub mod infra {
    /// Layered configuration (file + LEARNREC_* environment)
    pub mod config;
    pub use self::config::{Config, init as config_init, load_config};

    /// JSON catalog implementing both collaborators
    pub mod catalog;
    pub use catalog::{Catalog, CatalogDocument, CatalogError};

    /// tracing-subscriber setup
    pub mod logging;
}

/// Command handlers
pub mod cli_ext {
    /// `lrec recommend`
    pub mod recommend_cmd;
}

// Strategic re-exports for clean CLI interface
pub use cli::{AppContext, Cli, Commands};
pub use infra::{Catalog, Config, load_config};

// Core types for external consumers
pub use crate::core::model::{Candidate, Category, InterestRecord, Level, Resource, ResourceStatus};
pub use crate::core::{RecommendError, Recommender};
