//! Cancellable one-shot deferred actions.
//!
//! The session layer schedules two kinds of delayed work: the debounced
//! match-start countdown and the post-game-over cleanup grace. Both must be
//! cancellable (a player un-readies, the room empties) and must never stack
//! — rescheduling replaces the previous deferral.
//!
//! [`Deferred`] makes that structural: it aborts its task when cancelled
//! *or dropped*, so storing the new deferral in the same `Option` slot is
//! itself the cancel-then-reschedule step.
//!
//! A deferral can still race its own cancellation: the sleep may have
//! completed and the action's message may already sit in a mailbox when the
//! abort lands. Callers that route the action through a queue should pair
//! each deferral with a generation number and ignore stale fires.

use std::time::Duration;

use tokio::task::JoinHandle;

/// A one-shot action scheduled to run after a delay.
///
/// The action runs on the Tokio runtime. Dropping the handle aborts the
/// pending sleep; once the delay has elapsed the action runs to completion
/// regardless.
#[derive(Debug)]
pub struct Deferred {
    handle: JoinHandle<()>,
}

impl Deferred {
    /// Schedules `action` to run after `delay`.
    pub fn spawn<F>(delay: Duration, action: F) -> Self
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            action.await;
        });
        tracing::trace!(delay_ms = delay.as_millis() as u64, "deferral scheduled");
        Self { handle }
    }

    /// Aborts the deferral. A no-op if the action already ran.
    pub fn cancel(&self) {
        self.handle.abort();
    }

    /// Whether the underlying task has finished (ran or was aborted).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Deferred {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    //! Timing is controlled with `tokio::time::pause()` — the clock only
    //! moves when a test advances it, so these are deterministic.

    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counter() -> (Arc<AtomicUsize>, impl Fn() -> usize) {
        let count = Arc::new(AtomicUsize::new(0));
        let read = {
            let count = Arc::clone(&count);
            move || count.load(Ordering::SeqCst)
        };
        (count, read)
    }

    #[tokio::test(start_paused = true)]
    async fn test_action_runs_after_the_delay() {
        let (count, fired) = counter();
        let _deferred = Deferred::spawn(Duration::from_secs(5), async move {
            count.fetch_add(1, Ordering::SeqCst);
        });
        // Let the spawned task reach its `sleep` await so the timer registers
        // at t=0 before we advance the paused clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(4)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired(), 0, "fired early");

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_prevents_the_action() {
        let (count, fired) = counter();
        let deferred = Deferred::spawn(Duration::from_secs(5), async move {
            count.fetch_add(1, Ordering::SeqCst);
        });

        tokio::time::advance(Duration::from_secs(2)).await;
        deferred.cancel();
        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;

        assert_eq!(fired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_aborts_the_pending_action() {
        let (count, fired) = counter();
        {
            let _deferred =
                Deferred::spawn(Duration::from_secs(5), async move {
                    count.fetch_add(1, Ordering::SeqCst);
                });
        }
        tokio::time::advance(Duration::from_secs(10)).await;
        tokio::task::yield_now().await;

        assert_eq!(fired(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_replacing_a_deferral_supersedes_it() {
        let (first_count, first_fired) = counter();
        let (second_count, second_fired) = counter();

        let mut slot = Some(Deferred::spawn(
            Duration::from_secs(5),
            async move {
                first_count.fetch_add(1, Ordering::SeqCst);
            },
        ));
        // Reschedule: storing into the slot drops (and aborts) the first.
        slot.replace(Deferred::spawn(Duration::from_secs(5), async move {
            second_count.fetch_add(1, Ordering::SeqCst);
        }));
        // Let the replacement task reach its `sleep` await so the timer
        // registers at t=0 before we advance the paused clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(6)).await;
        tokio::task::yield_now().await;

        assert_eq!(first_fired(), 0);
        assert_eq!(second_fired(), 1);
        drop(slot);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_fire_is_a_noop() {
        let (count, fired) = counter();
        let deferred = Deferred::spawn(Duration::from_secs(1), async move {
            count.fetch_add(1, Ordering::SeqCst);
        });
        // Let the spawned task reach its `sleep` await so the timer registers
        // at t=0 before we advance the paused clock.
        tokio::task::yield_now().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        tokio::task::yield_now().await;
        assert_eq!(fired(), 1);
        assert!(deferred.is_finished());

        deferred.cancel();
        assert_eq!(fired(), 1);
    }
}
