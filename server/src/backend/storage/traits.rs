//! # Storage Traits
//!
//! The repository contract the domain layer depends on. Implementations own
//! their concurrency control; callers make no locking decisions.

use async_trait::async_trait;
use shared::Movie;

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record not found")]
    NotFound,
    #[error("edit conflict")]
    EditConflict,
    #[error("storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("genre list encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}

/// Trait defining the interface for movie storage operations
#[async_trait]
pub trait MovieRepository: Send + Sync {
    /// Store a new movie, assigning `id`, `created_at` and `version`
    async fn insert(&self, movie: &mut Movie) -> Result<(), RepositoryError>;

    /// Fetch a movie by ID.
    /// IDs below 1 return `NotFound` without touching storage.
    async fn get(&self, id: i64) -> Result<Movie, RepositoryError>;

    /// Persist the editable fields of `movie` if its version still matches,
    /// then bump `movie.version`. A stale version yields `EditConflict`.
    async fn update(&self, movie: &mut Movie) -> Result<(), RepositoryError>;

    /// Delete a movie by ID
    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
