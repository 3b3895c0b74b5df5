//! git plumbing for snapshotting shop directories.
//!
//! Every invocation runs with system and user configuration disabled so the
//! result does not depend on the host's git setup, and the commit identity is
//! passed per command with `-c` flags rather than written to `.git/config`.

use std::path::Path;
use std::process::{Command, Output};

use tracing::{debug, info};

use super::{CommitError, CommitMessage, CommitResult, Snapshotter};

/// Name of the git metadata directory inside a working tree.
pub const GIT_DIR: &str = ".git";

/// Identity used for creating commits.
#[derive(Debug, Clone)]
pub struct CommitIdentity {
    /// The committer/author name (git `user.name`).
    pub name: String,

    /// The committer/author email (git `user.email`).
    pub email: String,
}

impl Default for CommitIdentity {
    fn default() -> Self {
        CommitIdentity {
            name: "theme-mirror".to_string(),
            email: "theme-mirror@localhost".to_string(),
        }
    }
}

/// Create a git Command with clean environment (no system/user config).
pub(crate) fn git_command(workdir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(workdir);

    cmd.env("GIT_CONFIG_NOSYSTEM", "1");
    cmd.env("GIT_CONFIG_GLOBAL", "/dev/null");
    cmd.env("GIT_TERMINAL_PROMPT", "0");

    cmd
}

/// Create a git Command configured for commit operations.
///
/// Extends [`git_command`] with `-c user.name=<name> -c user.email=<email>`.
pub(crate) fn git_commit_command(workdir: &Path, identity: &CommitIdentity) -> Command {
    let mut cmd = git_command(workdir);
    cmd.arg("-c");
    cmd.arg(format!("user.name={}", identity.name));
    cmd.arg("-c");
    cmd.arg(format!("user.email={}", identity.email));
    cmd
}

fn run(mut cmd: Command, args: &[&str]) -> CommitResult<Output> {
    let output = cmd.args(args).output()?;

    if output.status.success() {
        Ok(output)
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        let command = format!("git {}", args.join(" "));
        Err(CommitError::CommandFailed { command, stderr })
    }
}

/// Run a git command in the given working directory.
pub fn run_git_sync(workdir: &Path, args: &[&str]) -> CommitResult<Output> {
    run(git_command(workdir), args)
}

/// Run a git command and return stdout as a string.
pub fn run_git_stdout(workdir: &Path, args: &[&str]) -> CommitResult<String> {
    let output = run_git_sync(workdir, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Returns true if `dir` is the root of a git working tree.
pub fn is_repository(dir: &Path) -> bool {
    dir.join(GIT_DIR).exists()
}

/// Initializes a repository in `dir` unless one already exists.
///
/// Returns true if a new repository was created.
pub fn ensure_repository(dir: &Path) -> CommitResult<bool> {
    if is_repository(dir) {
        return Ok(false);
    }
    run_git_sync(dir, &["-c", "init.defaultBranch=main", "init", "--quiet"])?;
    info!(dir = %dir.display(), "Initialized shop repository");
    Ok(true)
}

/// Lists commit subjects, newest first.
pub fn git_log_subjects(dir: &Path) -> CommitResult<Vec<String>> {
    let log = run_git_stdout(dir, &["log", "--pretty=format:%s"])?;
    Ok(log.lines().map(str::to_string).collect())
}

/// Records snapshots with the `git` executable.
#[derive(Debug, Clone, Default)]
pub struct GitSnapshotter {
    identity: CommitIdentity,
}

impl GitSnapshotter {
    pub fn new(identity: CommitIdentity) -> Self {
        GitSnapshotter { identity }
    }
}

impl Snapshotter for GitSnapshotter {
    /// `git init` (first time only), `git add --all .`, then `git commit`.
    ///
    /// `--allow-empty` keeps the one-commit-per-event history even when an
    /// event rewrites identical content.
    fn snapshot(&self, dir: &Path, message: &CommitMessage) -> CommitResult<()> {
        ensure_repository(dir)?;
        run_git_sync(dir, &["add", "--all", "."])?;
        run(
            git_commit_command(dir, &self.identity),
            &["commit", "--quiet", "--allow-empty", "-m", message.as_str()],
        )?;

        debug!(dir = %dir.display(), message = %message, "Recorded snapshot");
        Ok(())
    }
}
