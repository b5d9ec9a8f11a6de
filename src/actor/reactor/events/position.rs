//! Remembering where the PiP window was and putting new ones back there.

use std::rc::Rc;

use tracing::{debug, info, instrument, trace, warn};

use crate::actor::reactor::{
    PERSIST_DEBOUNCE, RESTORE_RETRIES, RESTORE_RETRY_INTERVAL, Reactor,
};
use crate::model::{Rect, TrackedWindow};
use crate::sys::timer::{TimerId, TimerQueue, Timeout};
use crate::sys::window_system::{
    SharedWindowSystem, Signal, Source, Subscription, WindowId, WindowSystem,
};

pub struct PositionEventHandler;

impl PositionEventHandler {
    /// Follows size and position changes. Does nothing if either listener is
    /// already attached; a listener the host refuses is left unset without
    /// affecting the other one.
    pub fn connect_geometry_listeners(reactor: &mut Reactor, window: WindowId) {
        let host = Rc::clone(&reactor.host);
        let Some(record) = reactor.window_manager.windows.get_mut(&window) else {
            return;
        };
        if record.has_geometry_listeners() {
            return;
        }
        record.size_listener = Self::connect(&host, window, Signal::Size);
        record.position_listener = Self::connect(&host, window, Signal::Position);
    }

    pub fn disconnect_geometry_listeners(reactor: &mut Reactor, window: WindowId) {
        if let Some(record) = reactor.window_manager.windows.get_mut(&window) {
            Self::release_geometry(&mut reactor.timers, record);
        }
    }

    /// Cancels the record's pending timers and drops its geometry listeners.
    pub fn release_geometry(timers: &mut TimerQueue, record: &mut TrackedWindow) {
        for id in record.take_timers() {
            timers.cancel(id);
        }
        record.size_listener = None;
        record.position_listener = None;
    }

    /// Restarts the window's quiet period; the frame is only remembered once
    /// it has stopped changing for [`PERSIST_DEBOUNCE`].
    pub fn queue_store_position(reactor: &mut Reactor, window: WindowId) {
        if !reactor.settings.remember_position {
            return;
        }
        let Some(record) = reactor.window_manager.windows.get_mut(&window) else {
            return;
        };
        if let Some(pending) = record.debounce_timer.take() {
            reactor.timers.cancel(pending);
        }
        record.debounce_timer =
            Some(reactor.timers.schedule(PERSIST_DEBOUNCE, Timeout::Persist(window)));
    }

    pub fn handle_persist_timeout(reactor: &mut Reactor, id: TimerId, window: WindowId) {
        let Some(record) = reactor.window_manager.windows.get_mut(&window) else {
            return;
        };
        if record.debounce_timer != Some(id) {
            trace!(%window, "Stale persist timer");
            return;
        }
        record.debounce_timer = None;
        Self::store_position(reactor, window);
    }

    /// Remembers the window's current frame if it is valid.
    pub fn store_position(reactor: &mut Reactor, window: WindowId) -> bool {
        let Some(rect) = reactor.host.frame_rect(window) else {
            trace!(%window, "No frame to remember");
            return false;
        };
        if !reactor.position_store.save(rect) {
            trace!(%window, %rect, "Ignoring transient geometry");
            return false;
        }
        info!(
            %window,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Stored PiP position"
        );
        true
    }

    /// Moves the window to the remembered position now and twice more as the
    /// window manager settles. Any sequence already running for the window is
    /// cancelled first.
    #[instrument(skip(reactor))]
    pub fn maybe_restore(reactor: &mut Reactor, window: WindowId) {
        let Some(position) = reactor.position_store.get() else {
            debug!(%window, "No remembered position");
            return;
        };
        let Some(record) = reactor.window_manager.windows.get_mut(&window) else {
            return;
        };
        for pending in record.restore_timers.drain(..) {
            reactor.timers.cancel(pending);
        }

        Self::apply_restore(&*reactor.host, window, position, 0);

        record.restore_timers = (1..=RESTORE_RETRIES)
            .map(|attempt| {
                reactor.timers.schedule(
                    RESTORE_RETRY_INTERVAL * u32::from(attempt),
                    Timeout::Restore { window, attempt, position },
                )
            })
            .collect();
    }

    pub fn handle_restore_timeout(
        reactor: &mut Reactor,
        id: TimerId,
        window: WindowId,
        attempt: u8,
        position: Rect,
    ) {
        let Some(record) = reactor.window_manager.windows.get_mut(&window) else {
            return;
        };
        let Some(index) = record.restore_timers.iter().position(|&pending| pending == id) else {
            trace!(%window, attempt, "Stale restore timer");
            return;
        };
        record.restore_timers.remove(index);
        Self::apply_restore(&*reactor.host, window, position, attempt);
    }

    fn apply_restore(host: &dyn WindowSystem, window: WindowId, position: Rect, attempt: u8) {
        if let Some(workspace) = host.window_workspace(window)
            && let Err(err) = host.activate_workspace(workspace, host.current_time())
        {
            warn!(%window, %workspace, %err, "Could not activate workspace");
        }
        match host.move_frame(window, true, position.x, position.y) {
            Ok(()) => info!(%window, attempt, x = position.x, y = position.y, "Restore attempt"),
            Err(err) => warn!(%window, attempt, %err, "Restore attempt failed"),
        }
    }

    fn connect(
        host: &SharedWindowSystem,
        window: WindowId,
        signal: Signal,
    ) -> Option<Subscription> {
        Subscription::connect(host, Source::Window(window), signal)
            .inspect_err(|err| debug!(%window, ?signal, %err, "Geometry listener not attached"))
            .ok()
    }
}
