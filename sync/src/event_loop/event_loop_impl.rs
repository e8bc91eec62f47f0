// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use crate::{LivenessState, lock_ignoring_poison, log::log_caught_panic, panic_payload_message,
            wait_ignoring_poison};
use miette::{Context, IntoDiagnostic};
use std::{collections::VecDeque,
          fmt::{Debug, Formatter},
          panic::{AssertUnwindSafe, catch_unwind},
          sync::{Arc, Condvar, Mutex},
          thread::JoinHandle};

pub const EVENT_LOOP_THREAD_NAME: &str = "r3bl-sync-event-loop";

/// A deferred, zero-argument unit of work run on the dispatcher thread.
pub type Action = Box<dyn FnOnce() + Send + 'static>;

/// State guarded by [`EventLoopShared::queue`].
pub(crate) struct EventLoopQueue {
    actions: VecDeque<Action>,
    exit: bool,
}

/// Shared between the [`EventLoop`] handle and its dispatcher thread.
pub(crate) struct EventLoopShared {
    queue: Mutex<EventLoopQueue>,
    condition: Condvar,
}

/// Runs submitted [`Action`]s one at a time, in submission order, on a dedicated thread.
///
/// Most code should use the process wide instance from [`global_event_loop()`]. A private
/// instance can be created with [`EventLoop::try_new()`], e.g. to isolate tests.
///
/// Dropping an [`EventLoop`] calls [`exit()`].
///
/// [`exit()`]: Self::exit
/// [`global_event_loop()`]: super::global_event_loop
pub struct EventLoop {
    shared: Arc<EventLoopShared>,
    thread: Mutex<Option<JoinHandle<()>>>,
}

impl EventLoop {
    /// Spawns the dispatcher thread.
    ///
    /// Construction only emits [`tracing`] events, so it does not depend on any logging
    /// having been set up.
    ///
    /// # Errors
    ///
    /// Returns an error if the OS refuses to spawn the thread (system thread limits).
    pub fn try_new() -> miette::Result<Self> {
        let shared = Arc::new(EventLoopShared {
            queue: Mutex::new(EventLoopQueue {
                actions: VecDeque::new(),
                exit: false,
            }),
            condition: Condvar::new(),
        });

        let shared_clone = Arc::clone(&shared);
        let handle = std::thread::Builder::new()
            .name(EVENT_LOOP_THREAD_NAME.to_string())
            .spawn(move || run_dispatcher_loop(&shared_clone))
            .into_diagnostic()
            .context("Failed to spawn event loop thread")?;

        tracing::debug!(message = "EventLoop started", thread = EVENT_LOOP_THREAD_NAME);

        Ok(Self {
            shared,
            thread: Mutex::new(Some(handle)),
        })
    }

    /// Same as [`try_new()`], for callers that treat thread exhaustion as fatal.
    ///
    /// # Panics
    ///
    /// If the dispatcher thread can't be spawned.
    ///
    /// [`try_new()`]: Self::try_new
    #[must_use]
    pub fn new() -> Self {
        match Self::try_new() {
            Ok(it) => it,
            Err(report) => panic!("{report:?}"),
        }
    }

    /// Appends `action` to the queue and wakes the dispatcher. Never blocks on a running
    /// action.
    ///
    /// Actions submitted after [`exit()`] are dropped without running.
    ///
    /// [`exit()`]: Self::exit
    pub fn submit(&self, action: impl FnOnce() + Send + 'static) {
        let mut queue = lock_ignoring_poison(&self.shared.queue);
        if queue.exit {
            drop(queue);
            tracing::debug!(message = "EventLoop::submit() after exit, action dropped");
            return;
        }
        queue.actions.push_back(Box::new(action));
        self.shared.condition.notify_one();
    }

    /// Stops the dispatcher and joins its thread.
    ///
    /// - Safe to call from any thread, any number of times. The first call sets the exit
    ///   flag; the first call made off the dispatcher thread joins it. Later calls return
    ///   right away.
    /// - If an action is running, this waits for it to finish. Queued actions are
    ///   discarded.
    /// - When called from inside an action (i.e. on the dispatcher thread itself) the
    ///   exit flag is set but the thread is not joined, since a thread can't join
    ///   itself. The loop ends as soon as the current action returns, and the thread is
    ///   joined by the next [`exit()`] from another thread (or by drop).
    ///
    /// [`exit()`]: Self::exit
    pub fn exit(&self) {
        {
            let mut queue = lock_ignoring_poison(&self.shared.queue);
            if !queue.exit {
                tracing::debug!(message = "EventLoop::exit()");
                queue.exit = true;
                self.shared.condition.notify_one();
            }
        }

        let mut thread = lock_ignoring_poison(&self.thread);
        let Some(handle) = thread.take() else {
            return;
        };

        if handle.thread().id() == std::thread::current().id() {
            tracing::debug!(message = "EventLoop::exit() called from dispatcher, not joining");
            *thread = Some(handle);
            return;
        }
        drop(thread);

        tracing::debug!(message = "EventLoop::exit() join");
        if handle.join().is_err() {
            tracing::error!(message = "EventLoop dispatcher thread panicked");
        }
        tracing::debug!(message = "EventLoop::exit() done");
    }

    #[must_use]
    pub fn is_exit_requested(&self) -> bool { lock_ignoring_poison(&self.shared.queue).exit }

    #[must_use]
    pub fn is_running(&self) -> LivenessState {
        let thread = lock_ignoring_poison(&self.thread);
        match thread.as_ref() {
            Some(handle) if !handle.is_finished() => LivenessState::Running,
            _ => LivenessState::Terminated,
        }
    }

    /// Number of actions waiting to be popped by the dispatcher.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        lock_ignoring_poison(&self.shared.queue).actions.len()
    }
}

impl Default for EventLoop {
    fn default() -> Self { Self::new() }
}

impl Debug for EventLoop {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLoop")
            .field("exit_requested", &self.is_exit_requested())
            .field("pending_count", &self.pending_count())
            .finish_non_exhaustive()
    }
}

impl Drop for EventLoop {
    fn drop(&mut self) { self.exit(); }
}

/// Body of the dispatcher thread.
///
/// Pops one action at a time and runs it with the queue unlocked. A panicking action is
/// caught and logged; it never ends the loop. Only the exit flag ends the loop.
fn run_dispatcher_loop(shared: &EventLoopShared) {
    let mut queue = lock_ignoring_poison(&shared.queue);
    while !queue.exit {
        let Some(action) = queue.actions.pop_front() else {
            // Nothing to do. Sleep until submit() or exit() notifies, then re-check.
            queue = wait_ignoring_poison(&shared.condition, queue);
            continue;
        };
        drop(queue);

        if let Err(payload) = catch_unwind(AssertUnwindSafe(action)) {
            log_caught_panic(
                "Unhandled panic in event loop action",
                panic_payload_message(payload.as_ref()),
            );
        }

        queue = lock_ignoring_poison(&shared.queue);
    }

    // Drop discarded actions outside the lock, their captures may run arbitrary Drop code.
    let discarded = std::mem::take(&mut queue.actions);
    drop(queue);
    if !discarded.is_empty() {
        tracing::debug!(
            message = "EventLoop exiting, discarding queued actions",
            count = discarded.len()
        );
    }
    drop(discarded);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{sync::mpsc, time::Duration};

    const TIMEOUT: Duration = Duration::from_secs(5);

    /// Blocks until every action submitted before this call has run.
    fn drain(event_loop: &EventLoop) {
        let (tx, rx) = mpsc::channel();
        event_loop.submit(move || tx.send(()).unwrap());
        rx.recv_timeout(TIMEOUT).unwrap();
    }

    #[test]
    fn test_actions_run_in_submission_order() {
        let event_loop = EventLoop::new();
        let (tx, rx) = mpsc::channel();

        for it in 0..100 {
            let tx = tx.clone();
            event_loop.submit(move || tx.send(it).unwrap());
        }
        drain(&event_loop);

        let received: Vec<i32> = rx.try_iter().collect();
        assert_eq!(received, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn test_actions_run_on_dispatcher_thread() {
        let event_loop = EventLoop::new();
        let (tx, rx) = mpsc::channel();
        event_loop.submit(move || {
            let name = std::thread::current().name().map(ToString::to_string);
            tx.send(name).unwrap();
        });
        let name = rx.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(name.as_deref(), Some(EVENT_LOOP_THREAD_NAME));
    }

    #[test]
    fn test_panicking_action_does_not_stop_loop() {
        let event_loop = EventLoop::new();
        let (tx, rx) = mpsc::channel();

        event_loop.submit(|| panic!("deliberate panic in action"));
        event_loop.submit(move || tx.send("still alive").unwrap());

        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), "still alive");
        assert_eq!(event_loop.is_running(), LivenessState::Running);
    }

    #[test]
    fn test_exit_is_idempotent() {
        let event_loop = EventLoop::new();
        assert_eq!(event_loop.is_running(), LivenessState::Running);

        event_loop.exit();
        assert!(event_loop.is_exit_requested());
        assert_eq!(event_loop.is_running(), LivenessState::Terminated);

        // Second call is a no-op.
        event_loop.exit();
        assert_eq!(event_loop.is_running(), LivenessState::Terminated);
    }

    #[test]
    fn test_submit_after_exit_is_dropped() {
        let event_loop = EventLoop::new();
        event_loop.exit();

        let (tx, rx) = mpsc::channel::<()>();
        event_loop.submit(move || tx.send(()).unwrap());
        assert_eq!(event_loop.pending_count(), 0);

        // The action (and its sender) was dropped without running.
        assert!(rx.recv_timeout(Duration::from_millis(50)).is_err());
    }

    #[test]
    fn test_exit_lets_running_action_finish_and_discards_queue() {
        let event_loop = Arc::new(EventLoop::new());
        let (started_tx, started_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let (done_tx, done_rx) = mpsc::channel();

        let done_tx_clone = done_tx.clone();
        event_loop.submit(move || {
            started_tx.send(()).unwrap();
            release_rx.recv().unwrap();
            done_tx_clone.send("first").unwrap();
        });
        event_loop.submit(move || done_tx.send("second").unwrap());

        // The first action is now running, with the second one queued behind it.
        started_rx.recv_timeout(TIMEOUT).unwrap();
        assert_eq!(event_loop.pending_count(), 1);

        let event_loop_clone = Arc::clone(&event_loop);
        let exit_thread = std::thread::spawn(move || event_loop_clone.exit());
        while !event_loop.is_exit_requested() {
            std::thread::yield_now();
        }

        release_tx.send(()).unwrap();
        exit_thread.join().unwrap();

        let ran: Vec<&str> = done_rx.try_iter().collect();
        assert_eq!(ran, vec!["first"]);
        assert_eq!(event_loop.is_running(), LivenessState::Terminated);
    }

    #[test]
    fn test_exit_from_inside_an_action() {
        let event_loop = Arc::new(EventLoop::new());
        let (tx, rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel::<()>();

        let event_loop_clone = Arc::clone(&event_loop);
        event_loop.submit(move || {
            event_loop_clone.exit();
            tx.send(event_loop_clone.is_running()).unwrap();
            release_rx.recv().unwrap();
        });

        // The handle is kept, so the dispatcher still reports running mid action.
        assert_eq!(rx.recv_timeout(TIMEOUT).unwrap(), LivenessState::Running);
        assert!(event_loop.is_exit_requested());
        assert_eq!(event_loop.is_running(), LivenessState::Running);

        // A later exit() from this thread joins the dispatcher.
        release_tx.send(()).unwrap();
        event_loop.exit();
        assert_eq!(event_loop.is_running(), LivenessState::Terminated);
        assert!(lock_ignoring_poison(&event_loop.thread).is_none());
    }

    #[test]
    fn test_exit_right_after_submit_runs_an_in_order_prefix() {
        const COUNT: usize = 1_000;

        let event_loop = EventLoop::new();
        let (tx, rx) = mpsc::channel();
        for it in 0..COUNT {
            let tx = tx.clone();
            event_loop.submit(move || tx.send(it).unwrap());
        }
        drop(tx);
        event_loop.exit();

        let ran: Vec<usize> = rx.try_iter().collect();
        assert!(ran.len() <= COUNT);
        assert_eq!(ran, (0..ran.len()).collect::<Vec<_>>());
        assert_eq!(event_loop.pending_count(), 0);
    }
}
