//! Error type shared by the fetcher and the remote alias manager.

use std::path::PathBuf;

/// Errors returned by gitget operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Creating, reading or removing the working directory failed.
    #[error("filesystem operation failed on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The git executable could not be launched.
    #[error("failed to launch `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
    /// A git command exited with a non-zero status.
    #[error("`{command}` failed ({})", describe_code(*code))]
    CommandFailed { command: String, code: Option<i32> },
    /// Neither `origin/<ref>` nor `<ref>` resolved.
    #[error("Specified commit, '{reference}', doesn't appear to be a branch, tag, or commit hash.")]
    InvalidRef { reference: String },
    /// A required tool is missing from PATH.
    #[error("{tool} is not available on PATH")]
    ToolUnavailable { tool: String },
    /// A repository URL could not be built.
    #[error("invalid repository URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    /// Credentials could not be embedded in the repository URL.
    #[error("cannot embed credentials for user '{user}' in {url}")]
    InvalidCredentials { user: String, url: String },
    /// The settings file could not be read or parsed.
    #[error("invalid config file {}: {message}", path.display())]
    Config { path: PathBuf, message: String },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

fn describe_code(code: Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {code}"),
        None => "terminated by signal".to_string(),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
