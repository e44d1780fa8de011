//! gitget Core Library
//!
//! Fetches a specific revision of a hosted git repository into a clean
//! working directory for build pipelines, and manages remote aliases of
//! local repositories.

pub mod config;
pub mod error;
pub mod git;
pub mod location;

pub use error::{Error, Result};

/// Re-exports of commonly used types
pub mod prelude {
    pub use crate::config::Settings;
    pub use crate::error::{Error, Result};
    pub use crate::git::{
        Credentials, FetchReport, FetchRequest, GitRunner, RemoteManager, RemoteOutcome,
        RepoFetcher, RepoId, SystemGit,
    };
    pub use crate::location::WorkingLocation;
}
