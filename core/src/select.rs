use std::collections::HashSet;

use regex::Regex;
use thiserror::Error;

use crate::types::FileRecord;

#[derive(Debug, Error)]
pub enum SelectionError {
    #[error("specify exactly one of --pattern, --all, or --ids ({0} given)")]
    ModeCount(usize),
    #[error("invalid --pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// Which of the fetched records an action applies to.
#[derive(Debug, Clone)]
pub enum Selection {
    Ids(HashSet<String>),
    All,
    Pattern(Regex),
}

impl Selection {
    /// Builds the selection from the three mutually exclusive flags.
    ///
    /// An empty id list or an empty pattern counts as not given.
    pub fn from_flags(
        ids: Option<&[String]>,
        all: bool,
        pattern: Option<&str>,
    ) -> Result<Self, SelectionError> {
        let ids = ids.filter(|ids| !ids.is_empty());
        let pattern = pattern.filter(|pattern| !pattern.is_empty());

        let given = [ids.is_some(), all, pattern.is_some()]
            .into_iter()
            .filter(|given| *given)
            .count();
        if given != 1 {
            return Err(SelectionError::ModeCount(given));
        }

        if let Some(pattern) = pattern {
            Ok(Self::Pattern(Regex::new(pattern)?))
        } else if let Some(ids) = ids {
            Ok(Self::Ids(ids.iter().cloned().collect()))
        } else {
            Ok(Self::All)
        }
    }

    pub fn matches(&self, record: &FileRecord) -> bool {
        match self {
            Self::Ids(ids) => ids.contains(&record.id),
            Self::All => true,
            Self::Pattern(pattern) => pattern.is_match(&record.filename),
        }
    }
}

/// Maximum number of records to act on. Non-positive values mean unlimited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limit(Option<usize>);

impl Limit {
    pub const UNLIMITED: Self = Self(None);

    pub fn get(self) -> Option<usize> {
        self.0
    }
}

impl From<i64> for Limit {
    fn from(limit: i64) -> Self {
        if limit > 0 {
            Self(usize::try_from(limit).ok())
        } else {
            Self::UNLIMITED
        }
    }
}

/// Keeps the records matched by `selection`, in their original order,
/// truncated to `limit`.
pub fn select(records: Vec<FileRecord>, selection: &Selection, limit: Limit) -> Vec<FileRecord> {
    let matched = records
        .into_iter()
        .filter(|record| selection.matches(record));
    match limit.get() {
        Some(limit) => matched.take(limit).collect(),
        None => matched.collect(),
    }
}
