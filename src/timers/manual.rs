use std::time::Duration;

use super::{Task, TimerId, Timers};

#[derive(Debug)]
struct Scheduled {
    id: TimerId,
    due: Duration,
    task: Task,
}

/// A virtual clock. Nothing fires until the owner advances time, which makes
/// transition timing reproducible outside a browser.
#[derive(Debug, Default)]
pub struct ManualTimers {
    now: Duration,
    next_id: u64,
    queue: Vec<Scheduled>,
}

impl ManualTimers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> Duration {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Removes the earliest task due at or before `until` and moves the clock
    /// to its deadline. Ties fire in scheduling order.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, Task)> {
        let index = self
            .queue
            .iter()
            .enumerate()
            .filter(|(_, s)| s.due <= until)
            .min_by_key(|(_, s)| (s.due, s.id))
            .map(|(i, _)| i)?;
        let scheduled = self.queue.swap_remove(index);
        self.now = self.now.max(scheduled.due);
        Some((scheduled.id, scheduled.task))
    }

    pub fn set_now(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }
}

impl Timers for ManualTimers {
    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.queue.push(Scheduled {
            id,
            due: self.now + delay,
            task,
        });
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.queue.retain(|s| s.id != id);
    }
}

#[cfg(test)]
mod tests {
    #[cfg(not(target_arch = "wasm32"))]
    use proptest::prelude::*;

    use super::*;
    use crate::timers::Step;

    fn task(panel: &str) -> Task {
        Task {
            panel: panel.into(),
            step: Step::Reveal,
        }
    }

    #[test]
    fn nothing_fires_early() {
        let mut timers = ManualTimers::new();
        timers.schedule(Duration::from_millis(50), task("p1"));
        assert!(timers.pop_due(Duration::from_millis(49)).is_none());
        let (_, fired) = timers.pop_due(Duration::from_millis(50)).unwrap();
        assert_eq!(fired.panel, "p1");
        assert_eq!(timers.now(), Duration::from_millis(50));
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut timers = ManualTimers::new();
        let id = timers.schedule(Duration::from_millis(10), task("p1"));
        timers.cancel(id);
        timers.cancel(id);
        assert_eq!(timers.pending(), 0);
        assert!(timers.pop_due(Duration::from_secs(1)).is_none());
    }

    #[test]
    fn delays_are_relative_to_now() {
        let mut timers = ManualTimers::new();
        timers.set_now(Duration::from_millis(100));
        timers.schedule(Duration::from_millis(50), task("p1"));
        assert!(timers.pop_due(Duration::from_millis(149)).is_none());
        assert!(timers.pop_due(Duration::from_millis(150)).is_some());
    }

    #[cfg(not(target_arch = "wasm32"))]
    proptest! {
        #[test]
        fn fires_in_deadline_then_schedule_order(delays in prop::collection::vec(0u64..500, 1..20)) {
            let mut timers = ManualTimers::new();
            for (i, d) in delays.iter().enumerate() {
                timers.schedule(Duration::from_millis(*d), task(&i.to_string()));
            }
            let mut fired = vec![];
            while let Some((id, _)) = timers.pop_due(Duration::from_millis(500)) {
                fired.push((timers.now(), id));
            }
            prop_assert_eq!(fired.len(), delays.len());
            prop_assert!(fired.windows(2).all(|w| w[0] <= w[1]));
        }
    }
}
