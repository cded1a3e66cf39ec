//! Commands for side effects.
//!
//! Commands represent IO operations that produce messages. They are the only
//! way a component performs side effects: a component's `update` returns a
//! command, the host runs it, and the resulting message is fed back into
//! `update`.
//!
//! A command is a boxed future, so it can await a data source or a timer
//! without blocking the host's thread.

use std::any::Any;
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::message::{BatchMsg, Message};

type BoxedCommand = Pin<Box<dyn Future<Output = Option<Message>> + Send + 'static>>;

/// A command that produces a message when executed.
///
/// Commands are lazy - nothing happens until the host awaits
/// [`Cmd::execute`].
///
/// # Example
///
/// ```rust
/// use mesa::{Cmd, Message};
///
/// let cmd = Cmd::new(async { Message::new("done") });
/// # let _ = cmd;
/// ```
pub struct Cmd(BoxedCommand);

impl Cmd {
    /// Create a new command from a future.
    pub fn new<F>(fut: F) -> Self
    where
        F: Future<Output = Message> + Send + 'static,
    {
        Self(Box::pin(async move { Some(fut.await) }))
    }

    /// Create a command that may not produce a message.
    pub fn new_optional<F>(fut: F) -> Self
    where
        F: Future<Output = Option<Message>> + Send + 'static,
    {
        Self(Box::pin(fut))
    }

    /// Create a command that immediately yields `msg`.
    pub fn message<M: Any + Send + 'static>(msg: M) -> Self {
        Self::new(async move { Message::new(msg) })
    }

    /// Create an empty command that does nothing.
    pub fn none() -> Option<Self> {
        None
    }

    /// Execute the command and return the resulting message.
    pub async fn execute(self) -> Option<Message> {
        self.0.await
    }
}

impl fmt::Debug for Cmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cmd").finish_non_exhaustive()
    }
}

/// Batch multiple commands to run concurrently.
///
/// Commands in a batch have no ordering guarantees. Hosts receive a
/// [`BatchMsg`] and run each command it holds.
///
/// # Example
///
/// ```rust
/// use mesa::{Cmd, Message, batch};
///
/// let cmd = batch(vec![
///     Some(Cmd::new(async { Message::new("first") })),
///     None,
///     Some(Cmd::new(async { Message::new("second") })),
/// ]);
/// assert!(cmd.is_some());
/// ```
pub fn batch(cmds: Vec<Option<Cmd>>) -> Option<Cmd> {
    let mut valid: Vec<Cmd> = cmds.into_iter().flatten().collect();

    match valid.len() {
        0 => None,
        1 => valid.pop(),
        _ => Some(Cmd::message(BatchMsg(valid))),
    }
}

/// Command that yields a message after a duration.
///
/// The delay runs on tokio's timer, so it must be executed inside a tokio
/// runtime.
pub fn tick<F>(duration: Duration, f: F) -> Cmd
where
    F: FnOnce() -> Message + Send + 'static,
{
    Cmd::new(async move {
        tokio::time::sleep(duration).await;
        f()
    })
}
