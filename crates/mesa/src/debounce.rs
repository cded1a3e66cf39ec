//! Value debouncing.
//!
//! A [`Debouncer`] holds a settled value and, at most, one pending value.
//! Every [`Debouncer::set`] bumps a tag and schedules a tick carrying it; a
//! tick settles the pending value only if its tag is still current, so a new
//! value cancels whatever was scheduled before it.
//!
//! # Example
//!
//! ```rust
//! use mesa::debounce::Debouncer;
//! use std::time::Duration;
//!
//! let mut search = Debouncer::new(String::new(), Duration::from_millis(500));
//! let _cmd = search.set("ana".to_string());
//! assert!(search.is_pending());
//! assert_eq!(search.value(), "");
//! ```

use std::time::Duration;

use crate::command::{Cmd, tick};
use crate::message::Message;

/// Default delay before a value settles.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(500);

/// Message sent when a debounce delay elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceMsg {
    /// The debouncer ID.
    pub id: u64,
    /// Tag of the `set` call that scheduled this tick.
    tag: u64,
}

/// Emits the latest value once it has been stable for a fixed delay.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    id: u64,
    tag: u64,
    delay: Duration,
    pending: Option<T>,
    settled: T,
}

impl<T: Clone + PartialEq> Debouncer<T> {
    /// Creates a debouncer whose settled value starts as `initial`.
    #[must_use]
    pub fn new(initial: T, delay: Duration) -> Self {
        Self {
            id: crate::next_id(),
            tag: 0,
            delay,
            pending: None,
            settled: initial,
        }
    }

    /// Returns the debouncer's unique ID.
    #[must_use]
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the delay.
    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Sets the delay used by later calls to [`Debouncer::set`].
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// The last settled value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.settled
    }

    /// The value waiting to settle, if any.
    #[must_use]
    pub fn pending(&self) -> Option<&T> {
        self.pending.as_ref()
    }

    /// Whether a value is waiting to settle.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Records a new value and returns the tick that may settle it.
    ///
    /// Ticks scheduled by earlier calls become stale.
    pub fn set(&mut self, value: T) -> Cmd {
        self.tag += 1;
        self.pending = Some(value);

        let id = self.id;
        let tag = self.tag;
        tick(self.delay, move || Message::new(DebounceMsg { id, tag }))
    }

    /// Replaces the settled value immediately, dropping any pending value.
    pub fn reset(&mut self, value: T) {
        self.tag += 1;
        self.pending = None;
        self.settled = value;
    }

    /// Settles the pending value now.
    ///
    /// Returns the new settled value if it differs from the previous one.
    pub fn flush(&mut self) -> Option<T> {
        self.tag += 1;
        let value = self.pending.take()?;
        if value == self.settled {
            return None;
        }
        self.settled = value;
        Some(self.settled.clone())
    }

    /// Handles a [`DebounceMsg`].
    ///
    /// Returns the new settled value when the message is this debouncer's
    /// current tick and the value changed. Stale ticks are ignored.
    pub fn update(&mut self, msg: &Message) -> Option<T> {
        let tick = msg.downcast_ref::<DebounceMsg>()?;
        if tick.id != self.id {
            return None;
        }
        if tick.tag != self.tag {
            tracing::trace!(id = self.id, tag = tick.tag, current = self.tag, "stale debounce tick");
            return None;
        }
        self.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn fire(cmd: Cmd) -> Message {
        cmd.execute().await.expect("tick message")
    }

    #[tokio::test(start_paused = true)]
    async fn test_settles_after_delay() {
        let mut d = Debouncer::new(String::new(), DEFAULT_DELAY);
        let start = tokio::time::Instant::now();
        let msg = fire(d.set("ana".into())).await;
        assert!(start.elapsed() >= DEFAULT_DELAY);

        assert_eq!(d.update(&msg), Some("ana".to_string()));
        assert_eq!(d.value(), "ana");
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_value_cancels_previous_tick() {
        let mut d = Debouncer::new(String::new(), DEFAULT_DELAY);
        let first = d.set("a".into());
        let second = d.set("an".into());

        let stale = fire(first).await;
        assert_eq!(d.update(&stale), None);
        assert_eq!(d.value(), "");
        assert_eq!(d.pending().map(String::as_str), Some("an"));

        let current = fire(second).await;
        assert_eq!(d.update(&current), Some("an".to_string()));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_value_does_not_emit() {
        let mut d = Debouncer::new("x".to_string(), DEFAULT_DELAY);
        let msg = fire(d.set("x".into())).await;
        assert_eq!(d.update(&msg), None);
        assert!(!d.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_other_debouncer_ignored() {
        let mut a = Debouncer::new(0u32, DEFAULT_DELAY);
        let mut b = Debouncer::new(0u32, DEFAULT_DELAY);
        let msg = fire(a.set(1)).await;
        let _ = b.set(2);
        assert_eq!(b.update(&msg), None);
        assert_eq!(a.update(&msg), Some(1));
    }

    #[tokio::test(start_paused = true)]
    async fn test_flush_invalidates_tick() {
        let mut d = Debouncer::new(String::new(), DEFAULT_DELAY);
        let cmd = d.set("now".into());
        assert_eq!(d.flush(), Some("now".to_string()));
        let msg = fire(cmd).await;
        assert_eq!(d.update(&msg), None);
    }

    #[test]
    fn test_reset_drops_pending() {
        let mut d = Debouncer::new(String::new(), DEFAULT_DELAY);
        let _cmd = d.set("typed".into());
        d.reset("fixed".into());
        assert_eq!(d.value(), "fixed");
        assert!(!d.is_pending());
    }

    #[test]
    fn test_non_debounce_message_ignored() {
        let mut d = Debouncer::new(0u8, DEFAULT_DELAY);
        assert_eq!(d.update(&Message::new("other")), None);
    }
}
