//! Repository fetcher: clone a repository and check out one revision.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::info;

use super::command::{GitCommand, GitRunner};
use super::spec::{Credentials, DEFAULT_HOST, RepoId};
use crate::error::{Error, Result};
use crate::location::WorkingLocation;

/// Everything needed for one fetch.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    pub location: WorkingLocation,
    pub credentials: Credentials,
    pub repo: RepoId,
    /// Branch, tag, or commit hash to check out
    pub reference: String,
    pub host: String,
}

impl FetchRequest {
    pub fn new(
        location: WorkingLocation,
        credentials: Credentials,
        repo: RepoId,
        reference: impl Into<String>,
    ) -> Self {
        Self {
            location,
            credentials,
            repo,
            reference: reference.into(),
            host: DEFAULT_HOST.to_string(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    fn log_summary(&self) {
        let drive = self
            .location
            .drive()
            .map(|d| d.display().to_string())
            .unwrap_or_default();
        info!("Working drive:            '{drive}'");
        info!(
            "Working directory:        '{}'",
            self.location.directory().display()
        );
        info!("GitHub user:              '{}'", self.credentials.user);
        info!(
            "GitHub password is {}set.",
            if self.credentials.has_password() {
                ""
            } else {
                "not "
            }
        );
        info!("GitHub account:           '{}'", self.repo.account);
        info!("GitHub repository:        '{}'", self.repo.repository);
        info!("Target branch/commit/tag: '{}'", self.reference);
    }
}

/// Which form of the reference resolved during validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefSource {
    /// `origin/<ref>` resolved (remote branch)
    Remote,
    /// `<ref>` resolved (tag, commit hash or local branch)
    Local,
}

impl fmt::Display for RefSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RefSource::Remote => f.write_str("remote"),
            RefSource::Local => f.write_str("local"),
        }
    }
}

/// Result of a successful fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchReport {
    /// Working tree the repository was cloned into
    pub path: PathBuf,
    /// Reference that is now checked out
    pub reference: String,
    pub resolved_as: RefSource,
}

/// Clones a repository into a fresh working directory and checks out a ref.
#[derive(Debug)]
pub struct RepoFetcher<R> {
    runner: R,
}

impl<R: GitRunner> RepoFetcher<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Fetch `request.repo` at `request.reference` into `request.location`.
    ///
    /// Any existing working directory is replaced, even if a later step fails.
    pub fn fetch(&self, request: &FetchRequest) -> Result<FetchReport> {
        request.log_summary();

        let path = request.location.recreate()?;
        let destination = path.to_str().ok_or_else(|| {
            Error::io(
                &path,
                std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    "working directory is not valid UTF-8",
                ),
            )
        })?;

        let url = request
            .repo
            .authenticated_url(&request.host, &request.credentials)?;

        // lfs clone handles plain repositories as well as LFS ones.
        self.runner.run(
            &GitCommand::new(["lfs", "clone", url.as_str(), destination]).in_dir(&path),
        )?;
        self.runner.run(&GitCommand::new(["fetch"]).in_dir(&path))?;

        let resolved_as = self
            .validate_ref(&path, &request.reference)?
            .ok_or_else(|| Error::InvalidRef {
                reference: request.reference.clone(),
            })?;
        info!(reference = %request.reference, source = %resolved_as, "Reference resolved");

        self.runner.run(
            &GitCommand::new(["checkout", request.reference.as_str()]).in_dir(&path),
        )?;
        // Replace LFS pointer files with their content.
        self.runner.run(&GitCommand::new(["lfs", "fetch"]).in_dir(&path))?;

        Ok(FetchReport {
            path,
            reference: request.reference.clone(),
            resolved_as,
        })
    }

    /// Check whether `reference` names a revision in the repository at `repo_dir`.
    ///
    /// `origin/<reference>` is tried before `<reference>`; the first that
    /// resolves wins. Returns `None` when neither does.
    pub fn validate_ref(&self, repo_dir: &Path, reference: &str) -> Result<Option<RefSource>> {
        let candidates = [
            (format!("origin/{reference}"), RefSource::Remote),
            (reference.to_string(), RefSource::Local),
        ];
        for (revision, source) in candidates {
            let show = GitCommand::new([
                "show",
                "--format=oneline",
                "--no-patch",
                revision.as_str(),
                "--",
            ])
            .in_dir(repo_dir)
            .tolerate_failure()
            .capture_output();
            if self.runner.run(&show)?.success {
                return Ok(Some(source));
            }
        }
        Ok(None)
    }
}
