//! The theme worker: the single consumer of accepted events.
//!
//! For each event, in arrival order:
//! 1. Look up the topic's action; non-mutating actions stop here
//! 2. Resolve (and create) the shop directory
//! 3. Apply the mutation
//! 4. Commit the directory with a message naming actor, change and event
//!
//! A failure at any step is logged and the event dropped. Nothing is
//! retried, and the worker moves straight on to the next event.

use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument};

use crate::commit::{CommitError, CommitMessage, Snapshotter};
use crate::fetch::FileFetcher;
use crate::handlers::{HandlerError, apply_action};
use crate::layout::{LayoutError, ShopLayout};
use crate::webhooks::{ThemeEvent, TopicAction};

use super::queue::EventReceiver;

/// Errors that abort processing of one event.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// The shop directory could not be resolved.
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// The filesystem mutation failed.
    #[error("handler error: {0}")]
    Handler(#[from] HandlerError),

    /// Recording the commit failed.
    #[error("commit error: {0}")]
    Commit(#[from] CommitError),

    /// The blocking snapshot task panicked or was cancelled.
    #[error("snapshot task failed: {0}")]
    SnapshotTask(#[from] tokio::task::JoinError),
}

/// What processing one event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The mutation was applied and committed.
    Committed { dir: PathBuf, message: CommitMessage },

    /// The topic maps to an action that changes nothing.
    Skipped(TopicAction),
}

/// Applies queued events to shop repositories, one at a time.
pub struct ThemeWorker<F, S> {
    layout: ShopLayout,
    fetcher: F,
    snapshotter: Arc<S>,
}

impl<F, S> ThemeWorker<F, S>
where
    F: FileFetcher,
    S: Snapshotter + 'static,
{
    pub fn new(layout: ShopLayout, fetcher: F, snapshotter: S) -> Self {
        ThemeWorker {
            layout,
            fetcher,
            snapshotter: Arc::new(snapshotter),
        }
    }

    /// Processes one event end to end.
    #[instrument(
        skip(self, event),
        fields(topic = %event.topic, shop = %event.shop_key, event_id = %event.event_id)
    )]
    pub async fn process(&self, event: &ThemeEvent) -> Result<Outcome, ProcessError> {
        let action = event.action();
        if !action.commits() {
            debug!(?action, "Skipping non-mutating event");
            return Ok(Outcome::Skipped(action));
        }

        let dir = self.layout.resolve(event).await?;

        let Some(file_name) = apply_action(action, &dir, event, &self.fetcher).await? else {
            return Ok(Outcome::Skipped(action));
        };

        let message = CommitMessage::for_event(event, &file_name);

        // git is a blocking child process.
        let snapshotter = Arc::clone(&self.snapshotter);
        let (commit_dir, commit_message) = (dir.clone(), message.clone());
        tokio::task::spawn_blocking(move || snapshotter.snapshot(&commit_dir, &commit_message))
            .await??;

        info!(dir = %dir.display(), message = %message, "Committed theme change");
        Ok(Outcome::Committed { dir, message })
    }

    /// Runs the event loop until shutdown or until every sender is dropped.
    #[instrument(skip_all)]
    pub async fn run(self, mut receiver: EventReceiver, shutdown: CancellationToken) {
        info!(base_dir = %self.layout.base_dir().display(), "Theme worker started");

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    info!("Shutdown signal received, stopping worker");
                    break;
                }

                event = receiver.recv() => {
                    match event {
                        Some(event) => self.handle(&event).await,
                        None => {
                            info!("Event queue closed, stopping worker");
                            break;
                        }
                    }
                }
            }
        }
    }

    async fn handle(&self, event: &ThemeEvent) {
        if let Err(e) = self.process(event).await {
            error!(
                error = %e,
                topic = %event.topic,
                shop = %event.shop_key,
                event_id = %event.event_id,
                "Failed to process event"
            );
        }
    }
}
