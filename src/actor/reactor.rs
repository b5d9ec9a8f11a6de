//! The Reactor keeps picture-in-picture windows above everything else and puts
//! new ones back where the last one was.
//!
//! It takes host notifications about workspaces, windows and settings, keeps a
//! tracking record per window on the active workspace, and asks the host to
//! change stacking, pinning and placement in response. Everything runs on one
//! thread; timers are just deadlines the event loop waits for alongside the
//! event channel.

mod events;
mod managers;

#[cfg(test)]
mod testing;


use std::time::Duration;

use events::position::PositionEventHandler;
use events::settings::SettingsEventHandler;
use events::window::WindowEventHandler;
use events::workspace::WorkspaceEventHandler;
use tokio::time::{Instant, sleep_until};
use tracing::{debug, info, trace};

use crate::actor;
use crate::common::config::{Config, Settings};
use crate::model::{PositionStore, Rect, TitleClassifier, TrackedWindow};
use crate::sys::timer::{TimerQueue, Timeout};
use crate::sys::window_system::{SharedWindowSystem, Signal, WindowId, WorkspaceId};

pub type Sender = actor::Sender<Event>;
pub type Receiver = actor::Receiver<Event>;

/// Quiet period a window has to stay still before its frame is remembered.
pub const PERSIST_DEBOUNCE: Duration = Duration::from_millis(100);
/// Spacing between restore retries after the initial move.
pub const RESTORE_RETRY_INTERVAL: Duration = Duration::from_millis(500);
/// Retries after the initial move; the window manager may still be placing
/// the window when it first appears.
pub const RESTORE_RETRIES: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The active workspace changed. Also used to pick up the initial
    /// workspace on enable.
    WorkspaceSwitched,
    WindowAdded(WorkspaceId, WindowId),
    WindowRemoved(WorkspaceId, WindowId),
    /// The window no longer exists anywhere, regardless of which workspace
    /// it was on.
    WindowUnmanaged(WindowId),
    TitleChanged(WindowId),
    SizeChanged(WindowId),
    PositionChanged(WindowId),
    /// The settings were reloaded. Only keys whose value differs from the
    /// current snapshot have any effect.
    SettingsChanged(Settings),
    Shutdown,
}

pub struct Reactor {
    host: SharedWindowSystem,
    settings: Settings,
    classifier: TitleClassifier,
    enabled: bool,
    window_manager: managers::WindowManager,
    workspace_manager: managers::WorkspaceManager,
    position_store: PositionStore,
    timers: TimerQueue,
}

impl Reactor {
    pub fn new(config: &Config, host: SharedWindowSystem) -> Reactor {
        Reactor {
            host,
            settings: config.settings,
            classifier: TitleClassifier::new(config.titles.translated.clone()),
            enabled: false,
            window_manager: managers::WindowManager::default(),
            workspace_manager: managers::WorkspaceManager::default(),
            position_store: PositionStore::new(),
            timers: TimerQueue::new(),
        }
    }

    pub fn is_enabled(&self) -> bool { self.enabled }

    pub fn settings(&self) -> Settings { self.settings }

    pub fn remembered_position(&self) -> Option<Rect> { self.position_store.get() }

    pub fn tracked_window(&self, window: WindowId) -> Option<&TrackedWindow> {
        self.window_manager.windows.get(&window)
    }

    pub fn tracked_workspace(&self) -> Option<WorkspaceId> { self.workspace_manager.workspace }

    pub fn pending_timers(&self) -> usize { self.timers.len() }

    /// Starts tracking the active workspace with an empty remembered position.
    pub fn enable(&mut self) {
        if self.enabled {
            debug!("Reactor already enabled");
            return;
        }
        self.enabled = true;
        self.position_store.clear();
        info!(
            stick = self.settings.stick,
            remember_position = self.settings.remember_position,
            "Enabled"
        );
        WorkspaceEventHandler::handle_workspace_switched(self);
    }

    /// Releases every listener and timer, reverts the stacking and pinning of
    /// windows this reactor marked, and forgets the remembered position.
    ///
    /// Safe to call repeatedly or without a prior `enable`.
    pub fn disable(&mut self) {
        self.workspace_manager.release();
        for window in self.window_manager.window_ids() {
            WindowEventHandler::revert_window_state(self, window);
            WindowEventHandler::untrack(self, window, false);
        }
        self.timers.clear();
        self.position_store.clear();
        if std::mem::replace(&mut self.enabled, false) {
            info!("Disabled");
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        trace!(?event, "Event");

        match event {
            Event::SettingsChanged(settings) => {
                SettingsEventHandler::handle_settings_changed(self, settings);
                return;
            }
            Event::Shutdown => {
                self.disable();
                return;
            }
            _ if !self.enabled => {
                trace!(?event, "Ignoring event while disabled");
                return;
            }
            _ => {}
        }

        match event {
            Event::WorkspaceSwitched => WorkspaceEventHandler::handle_workspace_switched(self),
            Event::WindowAdded(workspace, window)
                if self.workspace_manager.is_listening(workspace, Signal::WindowAdded) =>
            {
                WindowEventHandler::handle_window_added(self, window)
            }
            Event::WindowRemoved(workspace, window)
                if self.workspace_manager.is_listening(workspace, Signal::WindowRemoved) =>
            {
                WindowEventHandler::handle_window_removed(self, window)
            }
            Event::WindowUnmanaged(window) => {
                WindowEventHandler::handle_window_unmanaged(self, window)
            }
            Event::TitleChanged(window)
                if self.window_manager.is_listening(window, Signal::Title) =>
            {
                WindowEventHandler::handle_title_changed(self, window)
            }
            Event::SizeChanged(window)
                if self.window_manager.is_listening(window, Signal::Size) =>
            {
                PositionEventHandler::queue_store_position(self, window)
            }
            Event::PositionChanged(window)
                if self.window_manager.is_listening(window, Signal::Position) =>
            {
                PositionEventHandler::queue_store_position(self, window)
            }
            event => trace!(?event, "Ignoring event without a live listener"),
        }
    }

    /// Runs every timer whose deadline has passed.
    pub fn fire_expired(&mut self) {
        for (id, timeout) in self.timers.take_expired(Instant::now()) {
            trace!(?timeout, "Timer fired");
            match timeout {
                Timeout::Persist(window) => {
                    PositionEventHandler::handle_persist_timeout(self, id, window)
                }
                Timeout::Restore { window, attempt, position } => {
                    PositionEventHandler::handle_restore_timeout(
                        self, id, window, attempt, position,
                    )
                }
            }
        }
    }

    /// Enables, then processes events and timers until the channel closes or
    /// [`Event::Shutdown`] arrives, and disables again.
    pub async fn run(mut self, mut events: Receiver) {
        self.enable();

        loop {
            let deadline = self.timers.next_deadline();
            tokio::select! {
                biased;
                () = sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                    self.fire_expired();
                }
                message = events.recv() => {
                    let Some((span, event)) = message else {
                        debug!("Event channel closed");
                        break;
                    };
                    let _guard = span.enter();
                    let shutdown = event == Event::Shutdown;
                    self.handle_event(event);
                    if shutdown {
                        break;
                    }
                }
            }
        }

        self.disable();
    }
}
