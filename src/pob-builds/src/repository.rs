//! Repository trait for saved builds.

use crate::types::SavedBuild;
use pob::BuildMetadata;

/// Error type for repository operations
#[derive(Debug, thiserror::Error)]
pub enum RepoError {
    #[error("Build not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Saved build storage
pub trait BuildsRepository {
    /// Initialize the database schema
    fn init(&self) -> RepoResult<()>;

    /// Store a build and trim the oldest ones past the limit
    fn save_build(&self, name: &str, code: &str, info: &BuildMetadata) -> RepoResult<SavedBuild>;

    /// All saved builds, newest first
    fn list_builds(&self) -> RepoResult<Vec<SavedBuild>>;

    /// Get a build by id
    fn get_build(&self, id: &str) -> RepoResult<Option<SavedBuild>>;

    /// Delete a build; returns false if it did not exist
    fn delete_build(&self, id: &str) -> RepoResult<bool>;

    /// Like [`get_build`](Self::get_build), but a missing build is an error
    fn require_build(&self, id: &str) -> RepoResult<SavedBuild> {
        self.get_build(id)?
            .ok_or_else(|| RepoError::NotFound(id.to_string()))
    }
}
