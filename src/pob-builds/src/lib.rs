//! Saved builds
//!
//! Keeps a short, newest-first list of export codes the user wants to come
//! back to, behind a repository trait with a SQLite implementation.
//!
//! # Example
//!
//! ```no_run
//! use pob_builds::{BuildsRepository, SqliteStore};
//!
//! let store = SqliteStore::open("builds.db").unwrap();
//! store.init().unwrap();
//!
//! for build in store.list_builds().unwrap() {
//!     println!("{} {}", build.id, build.name);
//! }
//! ```

pub mod repository;
pub mod sqlite;
pub mod types;

pub use repository::{BuildsRepository, RepoError, RepoResult};
pub use sqlite::{SqliteStore, DEFAULT_DB_FILE};
pub use types::{SavedBuild, MAX_SAVED_BUILDS};
