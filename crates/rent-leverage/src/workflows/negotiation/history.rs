use super::domain::SearchRecord;
use serde::Serialize;

/// Storage abstraction for completed analyses so the service can be exercised in isolation.
pub trait SearchRepository: Send + Sync {
    fn insert(&self, record: SearchRecord) -> Result<SearchRecord, RepositoryError>;
    /// Records for `email`, newest first, at most `limit`.
    fn for_user(&self, email: &str, limit: usize) -> Result<Vec<SearchRecord>, RepositoryError>;
    fn count_for_user(&self, email: &str) -> Result<usize, RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHistory {
    pub email: String,
    pub total_searches: usize,
    pub searches: Vec<SearchRecord>,
}
