//! Category id → interest level lookup for one user.

use std::collections::HashMap;

use tracing::warn;

use crate::core::model::{InterestRecord, Level};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterestLevelIndex {
    levels: HashMap<i64, Level>,
}

impl InterestLevelIndex {
    /// Index the records by category id. A duplicated category keeps the last record seen.
    pub fn from_records(records: &[InterestRecord]) -> Self {
        let mut levels = HashMap::with_capacity(records.len());

        for record in records {
            if let Some(previous) = levels.insert(record.category_id, record.interest_level) {
                warn!(
                    category_id = record.category_id,
                    previous = previous.get(),
                    current = record.interest_level.get(),
                    "duplicate interest record overwritten"
                );
            }
        }

        Self { levels }
    }

    pub fn get(&self, category_id: i64) -> Option<Level> {
        self.levels.get(&category_id).copied()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl FromIterator<(i64, Level)> for InterestLevelIndex {
    fn from_iter<T: IntoIterator<Item = (i64, Level)>>(iter: T) -> Self {
        Self {
            levels: iter.into_iter().collect(),
        }
    }
}
