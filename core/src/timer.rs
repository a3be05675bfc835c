//! Single-threaded one-shot timers driven by simulated time.

use std::time::Duration;

/// Converts a duration into fractional milliseconds.
///
/// Whole-millisecond durations convert exactly.
#[must_use]
pub fn millis(dt: Duration) -> f64 {
    dt.as_nanos() as f64 / 1_000_000.0
}

/// Handle identifying a scheduled timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Retrieves the numeric representation of the handle.
    #[must_use]
    pub const fn get(&self) -> u64 {
        self.0
    }
}

#[derive(Debug)]
struct Scheduled<T> {
    handle: TimerHandle,
    due: Duration,
    payload: T,
}

/// Queue of one-shot timers that fire once simulated time reaches their due time.
///
/// Time only moves when [`TimerQueue::advance`] is called, so timers never
/// fire outside of the caller's update.
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: Duration,
    next_handle: u64,
    scheduled: Vec<Scheduled<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            next_handle: 1,
            scheduled: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    /// Creates an empty timer queue positioned at time zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Simulated time accumulated by the queue.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Schedules `payload` to fire once `delay` of simulated time has elapsed.
    pub fn schedule(&mut self, delay: Duration, payload: T) -> TimerHandle {
        let handle = TimerHandle(self.next_handle);
        self.next_handle += 1;
        self.scheduled.push(Scheduled {
            handle,
            due: self.now.saturating_add(delay),
            payload,
        });
        handle
    }

    /// Cancels a pending timer, returning its payload if it had not fired yet.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let index = self
            .scheduled
            .iter()
            .position(|entry| entry.handle == handle)?;
        Some(self.scheduled.swap_remove(index).payload)
    }

    /// Reports whether the timer is still waiting to fire.
    #[must_use]
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.scheduled.iter().any(|entry| entry.handle == handle)
    }

    /// Time left before the timer fires, if it is still pending.
    #[must_use]
    pub fn remaining(&self, handle: TimerHandle) -> Option<Duration> {
        self.scheduled
            .iter()
            .find(|entry| entry.handle == handle)
            .map(|entry| entry.due.saturating_sub(self.now))
    }

    /// Number of pending timers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scheduled.len()
    }

    /// Reports whether no timers are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scheduled.is_empty()
    }

    /// Advances simulated time and appends every timer that came due to `fired`,
    /// ordered by due time and then by scheduling order.
    pub fn advance(&mut self, dt: Duration, fired: &mut Vec<(TimerHandle, T)>) {
        self.now = self.now.saturating_add(dt);

        let now = self.now;
        let mut due = Vec::new();
        let mut index = 0;
        while index < self.scheduled.len() {
            if self.scheduled[index].due <= now {
                due.push(self.scheduled.swap_remove(index));
            } else {
                index += 1;
            }
        }

        due.sort_by_key(|entry| (entry.due, entry.handle));
        fired.extend(due.into_iter().map(|entry| (entry.handle, entry.payload)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fires_only_after_full_delay() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Duration::from_millis(3_000), "advance");
        let mut fired = Vec::new();

        queue.advance(Duration::from_millis(2_999), &mut fired);
        assert!(fired.is_empty());
        assert_eq!(queue.remaining(handle), Some(Duration::from_millis(1)));

        queue.advance(Duration::from_millis(1), &mut fired);
        assert_eq!(fired, vec![(handle, "advance")]);
        assert!(!queue.is_pending(handle));
    }

    #[test]
    fn cancelled_timer_never_fires() {
        let mut queue = TimerQueue::new();
        let handle = queue.schedule(Duration::from_millis(10), 1_u8);
        assert_eq!(queue.cancel(handle), Some(1));
        assert_eq!(queue.cancel(handle), None);

        let mut fired = Vec::new();
        queue.advance(Duration::from_secs(1), &mut fired);
        assert!(fired.is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn fires_in_due_order() {
        let mut queue = TimerQueue::new();
        let late = queue.schedule(Duration::from_millis(20), 'b');
        let early = queue.schedule(Duration::from_millis(10), 'a');
        let mut fired = Vec::new();

        queue.advance(Duration::from_millis(50), &mut fired);

        assert_eq!(fired, vec![(early, 'a'), (late, 'b')]);
    }

    #[test]
    fn whole_milliseconds_convert_exactly() {
        assert_eq!(millis(Duration::from_millis(100)), 100.0);
        assert_eq!(millis(Duration::from_micros(1_500)), 1.5);
    }
}
