//! Git operations for fetching repositories and managing remotes.
//!
//! Every operation is a sequence of `git` invocations routed through a
//! [`GitRunner`]:
//! - [`RepoFetcher`] clones a repository into a fresh directory and checks out a ref
//! - [`RemoteManager`] finds or registers a remote alias for an account/repository

mod command;
mod fetcher;
mod remote;
mod spec;

pub use command::{
    CommandOutcome, FailurePolicy, GitCommand, GitRunner, OutputMode, SystemGit,
    ensure_git_available,
};
pub use fetcher::{FetchReport, FetchRequest, RefSource, RepoFetcher};
pub use remote::{
    Direction, RemoteDescriptor, RemoteLine, RemoteManager, RemoteMap, RemoteOutcome,
    parse_remote_line,
};
pub use spec::{Credentials, DEFAULT_HOST, RepoId};

#[cfg(test)]
mod tests;
