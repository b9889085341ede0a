// Sequential queue - delayed actions executed one at a time, in enqueue order

use log::debug;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Source of the pause taken before each queued action
pub trait Clock {
    /// Block the calling thread for `delay`
    fn wait(&mut self, delay: Duration);
}

/// Clock that sleeps the current thread
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadClock;

impl Clock for ThreadClock {
    fn wait(&mut self, delay: Duration) {
        if !delay.is_zero() {
            std::thread::sleep(delay);
        }
    }
}

/// Clock that only advances a counter; lets tests run paced schedules instantly
#[derive(Debug, Default, Clone)]
pub struct VirtualClock {
    now: Duration,
    waits: Vec<Duration>,
}

impl VirtualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total virtual time waited so far
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Every wait in the order it happened
    pub fn waits(&self) -> &[Duration] {
        &self.waits
    }
}

impl Clock for VirtualClock {
    fn wait(&mut self, delay: Duration) {
        self.now += delay;
        self.waits.push(delay);
    }
}

/// A queued action. It gets the shared context and the queue itself so it
/// can enqueue follow-up actions.
pub type Action<C, K> = Box<dyn FnOnce(&mut C, &mut SequentialQueue<C, K>)>;

struct PendingAction<C, K> {
    delay: Duration,
    action: Action<C, K>,
}

/// Ordered runner for delayed actions.
///
/// `enqueue` only records the action; `drain` is the loop that waits out
/// each head's delay, runs it and moves on until nothing is pending. Actions
/// never overlap, and are never reordered or cancelled.
pub struct SequentialQueue<C, K = ThreadClock> {
    pending: VecDeque<PendingAction<C, K>>,
    clock: K,
    running: Option<Arc<AtomicBool>>,
    draining: bool,
}

impl<C> SequentialQueue<C, ThreadClock> {
    pub fn new() -> Self {
        Self::with_clock(ThreadClock)
    }
}

impl<C> Default for SequentialQueue<C, ThreadClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C, K: Clock> SequentialQueue<C, K> {
    pub fn with_clock(clock: K) -> Self {
        Self {
            pending: VecDeque::new(),
            clock,
            running: None,
            draining: false,
        }
    }

    /// Stop draining as soon as `running` is cleared. The flag is checked
    /// before and after every wait, so at most one action finishes after it
    /// flips.
    pub fn with_run_flag(mut self, running: Arc<AtomicBool>) -> Self {
        self.set_run_flag(running);
        self
    }

    pub fn set_run_flag(&mut self, running: Arc<AtomicBool>) {
        self.running = Some(running);
    }

    /// Append an action to run after `delay` once everything before it ran
    pub fn enqueue<F>(&mut self, delay: Duration, action: F)
    where
        F: FnOnce(&mut C, &mut SequentialQueue<C, K>) + 'static,
    {
        self.pending.push_back(PendingAction {
            delay,
            action: Box::new(action),
        });
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// True while no drain loop is active
    pub fn is_idle(&self) -> bool {
        !self.draining
    }

    pub fn clock(&self) -> &K {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut K {
        &mut self.clock
    }

    fn stop_requested(&self) -> bool {
        self.running
            .as_ref()
            .map(|flag| !flag.load(Ordering::SeqCst))
            .unwrap_or(false)
    }

    /// Run actions until the queue is empty or the run flag is cleared.
    /// Returns how many actions ran.
    pub fn drain(&mut self, context: &mut C) -> usize {
        self.drain_limited(context, None)
    }

    /// Like `drain`, but stops after `limit` actions
    pub fn drain_at_most(&mut self, context: &mut C, limit: usize) -> usize {
        self.drain_limited(context, Some(limit))
    }

    fn drain_limited(&mut self, context: &mut C, limit: Option<usize>) -> usize {
        // Actions may call drain on the queue they are handed; the outer loop
        // already owns the draining.
        if self.draining {
            return 0;
        }
        self.draining = true;

        let mut executed = 0;
        while limit.map_or(true, |limit| executed < limit) {
            if self.stop_requested() {
                debug!("🛑 Queue stopped with {} pending actions", self.pending.len());
                break;
            }
            let Some(delay) = self.pending.front().map(|head| head.delay) else {
                break;
            };

            self.clock.wait(delay);
            if self.stop_requested() {
                debug!("🛑 Queue stopped with {} pending actions", self.pending.len());
                break;
            }

            if let Some(head) = self.pending.pop_front() {
                (head.action)(context, self);
                executed += 1;
            }
        }

        self.draining = false;
        executed
    }
}
