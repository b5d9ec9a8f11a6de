use crate::sys::timer::TimerId;
use crate::sys::window_system::Subscription;

/// What the reactor keeps about a window while it is tracked.
///
/// Each listener slot holds at most one live subscription; `None` means not
/// subscribed. Dropping the record releases every listener it still holds, but
/// pending timers live in the reactor's queue and have to be cancelled
/// explicitly before the record goes away.
#[derive(Debug, Default)]
pub struct TrackedWindow {
    /// Set the first time the title classifies as PiP and kept until the
    /// window stops being tracked.
    pub pip_able: bool,
    /// Result of the most recent title evaluation.
    pub classified: bool,
    pub title_listener: Option<Subscription>,
    pub size_listener: Option<Subscription>,
    pub position_listener: Option<Subscription>,
    pub debounce_timer: Option<TimerId>,
    pub restore_timers: Vec<TimerId>,
}

impl TrackedWindow {
    pub fn has_geometry_listeners(&self) -> bool {
        self.size_listener.is_some() || self.position_listener.is_some()
    }

    /// Every timer handle the record holds, leaving it with none.
    pub fn take_timers(&mut self) -> Vec<TimerId> {
        let mut timers = std::mem::take(&mut self.restore_timers);
        timers.extend(self.debounce_timer.take());
        timers
    }
}
