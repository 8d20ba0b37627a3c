//! Periodic callbacks for animation.
//!
//! The turtle never owns a clock. [`animate`] hands an action to any [`Timer`]
//! and returns its handle; what happens when an action runs longer than its
//! interval is up to the timer.

use crate::error::TurtleError;
use std::time::Duration;

/// Opaque cancellation token for a scheduled action.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Wraps a timer-specific identifier.
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// A scheduler that runs actions repeatedly at a fixed interval.
pub trait Timer {
    fn schedule(&mut self, interval: Duration, action: Box<dyn FnMut()>) -> TimerHandle;

    /// Stops a scheduled action. Returns `false` if the handle is unknown.
    fn cancel(&mut self, handle: TimerHandle) -> bool;
}

/// Calls `action(&mut arg)` every `interval` until the returned handle is cancelled.
pub fn animate<T, A, F>(
    timer: &mut T,
    interval: Duration,
    mut arg: A,
    mut action: F,
) -> Result<TimerHandle, TurtleError>
where
    T: Timer + ?Sized,
    A: 'static,
    F: FnMut(&mut A) + 'static,
{
    if interval.is_zero() {
        return Err(TurtleError::InvalidInterval);
    }
    Ok(timer.schedule(interval, Box::new(move || action(&mut arg))))
}

struct Scheduled {
    handle: TimerHandle,
    interval: Duration,
    next_due: Duration,
    action: Box<dyn FnMut()>,
}

/// A virtual-clock [`Timer`]: nothing runs until [`advance`](Self::advance) is called.
///
/// Due actions fire in due-time order, ties in scheduling order. Each action
/// is rescheduled one interval after its previous due time, so a large advance
/// fires every missed tick. An action scheduled with a zero interval runs once
/// per [`advance`](Self::advance) call.
#[derive(Default)]
pub struct ManualTimer {
    now: Duration,
    next_id: u64,
    entries: Vec<Scheduled>,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the virtual clock.
    pub fn now(&self) -> Duration {
        self.now
    }

    /// Number of live scheduled actions.
    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Moves the clock forward by `by`, running every action that falls due.
    ///
    /// Returns how many actions ran.
    pub fn advance(&mut self, by: Duration) -> usize {
        let target = self.now + by;
        let mut fired = 0;

        loop {
            // earliest due, lowest handle on ties
            let Some(entry) = self
                .entries
                .iter_mut()
                .filter(|e| e.next_due <= target)
                .min_by_key(|e| (e.next_due, e.handle.raw()))
            else {
                break;
            };

            self.now = entry.next_due;
            entry.next_due = if entry.interval.is_zero() {
                // past this advance, otherwise it is due forever
                target + Duration::from_nanos(1)
            } else {
                entry.next_due + entry.interval
            };
            (entry.action)();
            fired += 1;
        }

        self.now = target;
        fired
    }
}

impl Timer for ManualTimer {
    fn schedule(&mut self, interval: Duration, action: Box<dyn FnMut()>) -> TimerHandle {
        let handle = TimerHandle(self.next_id);
        self.next_id += 1;
        self.entries.push(Scheduled {
            handle,
            interval,
            next_due: self.now + interval,
            action,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.handle != handle);
        self.entries.len() != before
    }
}
