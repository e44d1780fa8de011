//! Git command invocation and the runner seam used by every operation.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::{debug, info, warn};

use super::spec::redact_url;
use crate::error::{Error, Result};

/// Variables that would point git at a repository other than the working directory.
const GIT_ENV_OVERRIDES: [&str; 4] = [
    "GIT_DIR",
    "GIT_WORK_TREE",
    "GIT_INDEX_FILE",
    "GIT_COMMON_DIR",
];

/// What to do when a command exits non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Turn a non-zero exit into [`Error::CommandFailed`].
    #[default]
    Raise,
    /// Report the failure through [`CommandOutcome::success`].
    Tolerate,
}

/// Where the child's output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Stream stdout/stderr straight to the console.
    #[default]
    Inherit,
    /// Collect stdout into [`CommandOutcome::stdout`].
    Capture,
}

/// A single `git` invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitCommand {
    args: Vec<String>,
    cwd: Option<PathBuf>,
    policy: FailurePolicy,
    output: OutputMode,
}

impl GitCommand {
    /// Create a command from its arguments; the `git` program is implied.
    pub fn new<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            args: args.into_iter().map(Into::into).collect(),
            cwd: None,
            policy: FailurePolicy::Raise,
            output: OutputMode::Inherit,
        }
    }

    /// Run the command inside `dir`.
    pub fn in_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn tolerate_failure(mut self) -> Self {
        self.policy = FailurePolicy::Tolerate;
        self
    }

    pub fn capture_output(mut self) -> Self {
        self.output = OutputMode::Capture;
        self
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    pub fn policy(&self) -> FailurePolicy {
        self.policy
    }

    pub fn output(&self) -> OutputMode {
        self.output
    }

    /// Command line as printed in progress output, with URL passwords masked.
    pub fn display(&self) -> String {
        let mut line = String::from("git");
        for arg in &self.args {
            line.push(' ');
            line.push_str(&redact_url(arg));
        }
        line
    }
}

/// Result of running a [`GitCommand`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandOutcome {
    /// Whether the process exited with status zero
    pub success: bool,
    /// Exit code, `None` when terminated by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty for [`OutputMode::Inherit`])
    pub stdout: String,
}

impl CommandOutcome {
    pub fn succeeded() -> Self {
        Self {
            success: true,
            code: Some(0),
            stdout: String::new(),
        }
    }

    pub fn failed(code: i32) -> Self {
        Self {
            success: false,
            code: Some(code),
            stdout: String::new(),
        }
    }

    pub fn with_stdout(mut self, stdout: impl Into<String>) -> Self {
        self.stdout = stdout.into();
        self
    }
}

/// Executes git commands.
///
/// Implementors provide [`GitRunner::execute`], which only fails when the
/// process cannot be started. [`GitRunner::run`] applies the command's
/// [`FailurePolicy`] on top of it.
pub trait GitRunner {
    fn execute(&self, command: &GitCommand) -> Result<CommandOutcome>;

    fn run(&self, command: &GitCommand) -> Result<CommandOutcome> {
        let outcome = self.execute(command)?;
        if !outcome.success && command.policy() == FailurePolicy::Raise {
            let line = command.display();
            warn!(command = %line, code = ?outcome.code, "git command failed");
            return Err(Error::CommandFailed {
                command: line,
                code: outcome.code,
            });
        }
        Ok(outcome)
    }
}

impl<R: GitRunner + ?Sized> GitRunner for &R {
    fn execute(&self, command: &GitCommand) -> Result<CommandOutcome> {
        (**self).execute(command)
    }
}

/// Runs commands with the `git` executable found on PATH.
#[derive(Debug, Clone)]
pub struct SystemGit {
    program: PathBuf,
}

impl Default for SystemGit {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemGit {
    pub fn new() -> Self {
        Self {
            program: PathBuf::from("git"),
        }
    }

    /// Use a specific git executable instead of the one on PATH.
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Check that this git (and optionally its LFS extension) can be run.
    pub fn ensure_available(&self, require_lfs: bool) -> Result<()> {
        ensure_git_available(self, require_lfs)
    }

    fn command(&self, command: &GitCommand) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(command.args());
        for key in GIT_ENV_OVERRIDES {
            cmd.env_remove(key);
        }
        if let Some(dir) = command.cwd() {
            cmd.current_dir(dir);
        }
        cmd
    }
}

impl GitRunner for SystemGit {
    fn execute(&self, command: &GitCommand) -> Result<CommandOutcome> {
        let line = command.display();
        info!("{line}");
        let spawn_error = |source| Error::Spawn {
            command: line.clone(),
            source,
        };

        let mut cmd = self.command(command);
        match command.output() {
            OutputMode::Inherit => {
                let status = cmd.status().map_err(spawn_error)?;
                Ok(CommandOutcome {
                    success: status.success(),
                    code: status.code(),
                    stdout: String::new(),
                })
            }
            OutputMode::Capture => {
                let output = cmd.output().map_err(spawn_error)?;
                let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
                let stderr = String::from_utf8_lossy(&output.stderr);
                info!("Returned:\n{}", stdout.trim_end());
                if !stderr.trim().is_empty() {
                    debug!(stderr = %stderr.trim(), "{line}");
                }
                Ok(CommandOutcome {
                    success: output.status.success(),
                    code: output.status.code(),
                    stdout,
                })
            }
        }
    }
}

/// Check that git (and optionally git-lfs) can be run.
pub fn ensure_git_available(runner: &impl GitRunner, require_lfs: bool) -> Result<()> {
    check_tool(runner, GitCommand::new(["--version"]), "git")?;
    if require_lfs {
        check_tool(runner, GitCommand::new(["lfs", "version"]), "git-lfs")?;
    }
    Ok(())
}

fn check_tool(runner: &impl GitRunner, command: GitCommand, tool: &str) -> Result<()> {
    let command = command.tolerate_failure().capture_output();
    match runner.run(&command) {
        Ok(outcome) if outcome.success => Ok(()),
        Ok(_) | Err(Error::Spawn { .. }) => Err(Error::ToolUnavailable {
            tool: tool.to_string(),
        }),
        Err(err) => Err(err),
    }
}
