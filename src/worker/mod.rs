//! Background processing of accepted theme events.
//!
//! The HTTP boundary pushes parsed events into a bounded queue; a single
//! [`ThemeWorker`] drains it serially, so at most one mutation is ever in
//! flight against any shop directory.
//!
//! - [`queue`]: bounded FIFO between request handlers and the worker
//! - [`worker`]: resolve, mutate and commit, one event at a time

mod queue;
mod worker;


pub use queue::{EventReceiver, EventSender, QUEUE_CAPACITY, QueueClosed, channel};
pub use worker::{Outcome, ProcessError, ThemeWorker};
