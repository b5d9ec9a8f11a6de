use std::rc::Rc;

use tracing::{debug, instrument, trace, warn};

use crate::actor::reactor::Reactor;
use crate::actor::reactor::events::position::PositionEventHandler;
use crate::sys::window_system::{Signal, Source, Subscription, WindowId};

pub struct WindowEventHandler;

impl WindowEventHandler {
    /// Starts following the window's title (once) and classifies it right away.
    #[instrument(skip(reactor))]
    pub fn handle_window_added(reactor: &mut Reactor, window: WindowId) {
        let host = Rc::clone(&reactor.host);
        let record = reactor.window_manager.windows.entry(window).or_default();
        if record.title_listener.is_none() {
            match Subscription::connect(&host, Source::Window(window), Signal::Title) {
                Ok(subscription) => record.title_listener = Some(subscription),
                Err(err) => warn!(%window, %err, "Could not follow window title"),
            }
        }

        Self::handle_title_changed(reactor, window);
    }

    /// Re-classifies the window and applies stacking, pinning and position
    /// tracking to match.
    ///
    /// Once a window has classified as PiP it stays PiP-able until it is
    /// untracked: players briefly drop the marker from their title while
    /// switching media, so a non-matching title only lowers and unpins it.
    #[instrument(skip(reactor))]
    pub fn handle_title_changed(reactor: &mut Reactor, window: WindowId) {
        let Some(title) = reactor.host.title(window).filter(|title| !title.is_empty()) else {
            trace!(%window, "Window has no title yet");
            return;
        };
        let is_pip = reactor.classifier.is_pip(&title);
        let settings = reactor.settings;

        let Some(record) = reactor.window_manager.windows.get_mut(&window) else {
            trace!(%window, "Title changed on untracked window");
            return;
        };
        if !is_pip && !record.pip_able {
            record.classified = false;
            return;
        }
        let fresh = is_pip && !record.classified;
        record.pip_able = true;
        record.classified = is_pip;
        debug!(%window, %title, is_pip, fresh, "PiP-able window");

        if let Err(err) = reactor.host.set_above(window, is_pip) {
            warn!(%window, %err, above = is_pip, "Could not change stacking");
        }
        let stick = is_pip && settings.stick;
        if let Err(err) = reactor.host.set_sticky(window, stick) {
            warn!(%window, %err, stick, "Could not change pinning");
        }

        if settings.remember_position {
            PositionEventHandler::connect_geometry_listeners(reactor, window);
            if fresh {
                PositionEventHandler::maybe_restore(reactor, window);
            }
        }
    }

    #[instrument(skip(reactor))]
    pub fn handle_window_removed(reactor: &mut Reactor, window: WindowId) {
        let flush = reactor.settings.remember_position;
        Self::untrack(reactor, window, flush);
    }

    #[instrument(skip(reactor))]
    pub fn handle_window_unmanaged(reactor: &mut Reactor, window: WindowId) {
        if !reactor.window_manager.windows.contains_key(&window) {
            return;
        }
        debug!(%window, "Window went away while not on the tracked workspace");
        let flush = reactor.settings.remember_position;
        Self::untrack(reactor, window, flush);
    }

    /// Lowers and unpins a PiP-able window if it is still above or pinned.
    pub fn revert_window_state(reactor: &mut Reactor, window: WindowId) {
        let pip_able =
            reactor.window_manager.windows.get(&window).is_some_and(|record| record.pip_able);
        if !pip_able {
            return;
        }
        let host = &reactor.host;
        if host.is_above(window)
            && let Err(err) = host.set_above(window, false)
        {
            warn!(%window, %err, "Could not lower window");
        }
        if host.is_sticky(window)
            && let Err(err) = host.set_sticky(window, false)
        {
            warn!(%window, %err, "Could not unpin window");
        }
    }

    /// Drops the window's tracking record. With `flush`, a PiP-able window's
    /// current frame is remembered immediately instead of waiting for the
    /// debounce.
    pub fn untrack(reactor: &mut Reactor, window: WindowId, flush: bool) {
        let Some(mut record) = reactor.window_manager.windows.remove(&window) else {
            return;
        };
        record.title_listener = None;

        if flush && record.pip_able {
            PositionEventHandler::store_position(reactor, window);
        }

        PositionEventHandler::release_geometry(&mut reactor.timers, &mut record);
        trace!(%window, "Untracked window");
    }
}
