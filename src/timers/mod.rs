//! Deferred transition steps.
//!
//! Each panel has at most one pending step. Scheduling returns a [`TimerId`]
//! that the controller keeps so it can cancel the step when the panel is
//! asked to go the other way, and recognise a late callback for a step that
//! was already replaced.

use std::time::Duration;

#[cfg(target_arch = "wasm32")]
mod browser;
mod manual;

#[cfg(target_arch = "wasm32")]
pub use browser::BrowserTimers;
pub use manual::ManualTimers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Opening delay elapsed: add the visible class and trap focus.
    Reveal,
    /// Closing delay elapsed: remove the active class.
    Retire,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub panel: String,
    pub step: Step,
}

pub trait Timers {
    fn schedule(&mut self, delay: Duration, task: Task) -> TimerId;

    /// Cancelling an id that already fired or was never issued is a no-op.
    fn cancel(&mut self, id: TimerId);
}
