//! Remote alias management: find or register a remote for an account/repository.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tracing::{debug, info};

use super::command::{GitCommand, GitRunner};
use super::spec::{DEFAULT_HOST, RepoId};
use crate::error::Result;

/// Direction column of `git remote -v`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Direction {
    Fetch,
    Push,
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "(fetch)" => Ok(Direction::Fetch),
            "(push)" => Ok(Direction::Push),
            other => Err(format!("unknown direction {other}")),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Fetch => f.write_str("fetch"),
            Direction::Push => f.write_str("push"),
        }
    }
}

/// One configured remote URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteDescriptor {
    pub alias: String,
    pub repo: RepoId,
    pub direction: Direction,
}

/// A line of `git remote -v` output after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteLine {
    Parsed(RemoteDescriptor),
    Skipped { line: String, reason: String },
}

/// Parse one line of `git remote -v` output.
///
/// Expected shape: `<alias> https://<host>/<account>/<repository>.git (fetch|push)`.
pub fn parse_remote_line(line: &str, host: &str) -> RemoteLine {
    let skip = |reason: &str| RemoteLine::Skipped {
        line: line.to_string(),
        reason: reason.to_string(),
    };

    let fields: Vec<&str> = line.split_whitespace().collect();
    let [alias, url, direction] = fields.as_slice() else {
        return skip("expected three fields");
    };
    let Ok(direction) = direction.parse::<Direction>() else {
        return skip("direction is neither (fetch) nor (push)");
    };
    let Some(path) = url
        .strip_prefix("https://")
        .and_then(|rest| rest.strip_prefix(host))
        .and_then(|rest| rest.strip_prefix('/'))
    else {
        return skip("url is not on the https host");
    };
    let Some(path) = path.strip_suffix(".git") else {
        return skip("url does not end in .git");
    };
    let Some((account, repository)) = path.rsplit_once('/') else {
        return skip("url has no account/repository path");
    };
    if account.is_empty() || repository.is_empty() {
        return skip("empty account or repository");
    }

    RemoteLine::Parsed(RemoteDescriptor {
        alias: (*alias).to_string(),
        repo: RepoId::new(account, repository),
        direction,
    })
}

/// Parsed `git remote -v` output, keyed by direction then alias.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteMap {
    by_direction: BTreeMap<Direction, BTreeMap<String, RepoId>>,
    skipped: Vec<RemoteLine>,
}

impl RemoteMap {
    /// Build the map from raw `git remote -v` output.
    pub fn parse(output: &str, host: &str) -> Self {
        let mut map = Self::default();
        for line in output.lines() {
            match parse_remote_line(line, host) {
                RemoteLine::Parsed(remote) => {
                    map.by_direction
                        .entry(remote.direction)
                        .or_default()
                        .insert(remote.alias, remote.repo);
                }
                skipped @ RemoteLine::Skipped { .. } => map.skipped.push(skipped),
            }
        }
        map
    }

    pub fn aliases(&self, direction: Direction) -> Option<&BTreeMap<String, RepoId>> {
        self.by_direction.get(&direction)
    }

    /// Lines that did not describe a remote on the host.
    pub fn skipped(&self) -> &[RemoteLine] {
        &self.skipped
    }

    /// First fetch alias (in alias order) pointing at `repo`.
    pub fn find_fetch_alias(&self, repo: &RepoId) -> Option<&str> {
        self.aliases(Direction::Fetch)?
            .iter()
            .find(|(_, candidate)| *candidate == repo)
            .map(|(alias, _)| alias.as_str())
    }
}

/// What [`RemoteManager::ensure_remote`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOutcome {
    /// A remote for the repository was already configured.
    Existing { alias: String },
    /// A new remote was registered.
    Added { alias: String },
}

impl RemoteOutcome {
    pub fn alias(&self) -> &str {
        match self {
            RemoteOutcome::Existing { alias } | RemoteOutcome::Added { alias } => alias,
        }
    }
}

/// Finds or registers remote aliases in a local repository.
#[derive(Debug)]
pub struct RemoteManager<R> {
    runner: R,
    repo_dir: PathBuf,
    host: String,
}

impl<R: GitRunner> RemoteManager<R> {
    pub fn new(runner: R, repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            repo_dir: repo_dir.into(),
            host: DEFAULT_HOST.to_string(),
        }
    }

    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = host.into();
        self
    }

    pub fn repo_dir(&self) -> &Path {
        &self.repo_dir
    }

    /// Read and parse the configured remotes.
    pub fn remotes(&self) -> Result<RemoteMap> {
        let list = GitCommand::new(["remote", "-v"])
            .in_dir(&self.repo_dir)
            .capture_output();
        let outcome = self.runner.run(&list)?;
        let map = RemoteMap::parse(&outcome.stdout, &self.host);
        for skipped in map.skipped() {
            if let RemoteLine::Skipped { line, reason } = skipped {
                debug!(line = %line, reason = %reason, "Skipping remote line");
            }
        }
        Ok(map)
    }

    /// Return the fetch alias for `repo`, registering one named after the
    /// account if none exists.
    pub fn ensure_remote(&self, repo: &RepoId) -> Result<RemoteOutcome> {
        let remotes = self.remotes()?;
        if let Some(alias) = remotes.find_fetch_alias(repo) {
            info!(
                "Found remote for account {} and repository {}: {alias}",
                repo.account, repo.repository
            );
            return Ok(RemoteOutcome::Existing {
                alias: alias.to_string(),
            });
        }

        info!(
            "Didn't find remote for account {} and repository {}, adding...",
            repo.account, repo.repository
        );
        let url = repo.https_url(&self.host);
        self.runner.run(
            &GitCommand::new(["remote", "add", repo.account.as_str(), url.as_str()])
                .in_dir(&self.repo_dir),
        )?;
        Ok(RemoteOutcome::Added {
            alias: repo.account.clone(),
        })
    }
}
