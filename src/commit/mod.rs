//! Version-control snapshots of shop directories.
//!
//! Every mutating event ends with one commit in the shop's repository whose
//! message names the actor, the change, and the source event:
//!
//! ```text
//! Joe Bloggs: created foo.html - evt:1
//! ```

mod git;

use std::fmt;
use std::path::Path;

use thiserror::Error;

use crate::types::EventId;
use crate::webhooks::{ThemeEvent, topic_verb};

pub use git::{
    CommitIdentity, GIT_DIR, GitSnapshotter, ensure_repository, git_log_subjects, is_repository,
    run_git_stdout, run_git_sync,
};

/// Errors from recording a snapshot.
#[derive(Debug, Error)]
pub enum CommitError {
    /// A git command exited non-zero.
    #[error("git command failed: {command}\n{stderr}")]
    CommandFailed { command: String, stderr: String },

    /// Spawning git failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for snapshot operations.
pub type CommitResult<T> = std::result::Result<T, CommitError>;

/// A commit message of the form `"<actor>: <verb> <file> - evt:<id>"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    /// The verb is the last dot-separated segment of `topic`.
    pub fn new(actor: &str, topic: &str, file_name: &str, event_id: EventId) -> Self {
        CommitMessage(format!(
            "{}: {} {} - evt:{}",
            actor,
            topic_verb(topic),
            file_name,
            event_id
        ))
    }

    /// Builds the message for `event` having touched `file_name`.
    pub fn for_event(event: &ThemeEvent, file_name: &str) -> Self {
        Self::new(&event.actor_name, &event.topic, file_name, event.event_id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Records the full current state of a directory as one commit.
///
/// Implementations initialize the repository on first use, stage every
/// change including deletions, and commit even when nothing changed.
pub trait Snapshotter: Send + Sync {
    fn snapshot(&self, dir: &Path, message: &CommitMessage) -> CommitResult<()>;
}
