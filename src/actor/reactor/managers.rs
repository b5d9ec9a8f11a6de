use tracing::{debug, warn};

use crate::common::collections::HashMap;
use crate::model::TrackedWindow;
use crate::sys::window_system::{
    SharedWindowSystem, Signal, Source, Subscription, WindowId, WorkspaceId,
};

/// Tracking records for every window the reactor has seen added.
#[derive(Default)]
pub struct WindowManager {
    pub windows: HashMap<WindowId, TrackedWindow>,
}

impl WindowManager {
    pub fn is_listening(&self, window: WindowId, signal: Signal) -> bool {
        let Some(record) = self.windows.get(&window) else {
            return false;
        };
        match signal {
            Signal::Title => record.title_listener.is_some(),
            Signal::Size => record.size_listener.is_some(),
            Signal::Position => record.position_listener.is_some(),
            Signal::WindowAdded | Signal::WindowRemoved => false,
        }
    }

    pub fn window_ids(&self) -> Vec<WindowId> { self.windows.keys().copied().collect() }

    pub fn pip_able_windows(&self) -> Vec<WindowId> {
        self.windows
            .iter()
            .filter(|(_, record)| record.pip_able)
            .map(|(&window, _)| window)
            .collect()
    }
}

/// The one workspace whose window-added/removed stream is followed.
#[derive(Default)]
pub struct WorkspaceManager {
    pub workspace: Option<WorkspaceId>,
    window_added: Option<Subscription>,
    window_removed: Option<Subscription>,
}

impl WorkspaceManager {
    /// Switches the followed workspace, releasing the previous listeners first.
    pub fn track(&mut self, host: &SharedWindowSystem, workspace: WorkspaceId) {
        self.release();
        self.workspace = Some(workspace);
        self.window_added = Self::connect(host, workspace, Signal::WindowAdded);
        self.window_removed = Self::connect(host, workspace, Signal::WindowRemoved);
        debug!(%workspace, "Tracking workspace");
    }

    pub fn release(&mut self) {
        self.window_added = None;
        self.window_removed = None;
        self.workspace = None;
    }

    pub fn is_listening(&self, workspace: WorkspaceId, signal: Signal) -> bool {
        if self.workspace != Some(workspace) {
            return false;
        }
        match signal {
            Signal::WindowAdded => self.window_added.is_some(),
            Signal::WindowRemoved => self.window_removed.is_some(),
            Signal::Title | Signal::Size | Signal::Position => false,
        }
    }

    fn connect(
        host: &SharedWindowSystem,
        workspace: WorkspaceId,
        signal: Signal,
    ) -> Option<Subscription> {
        Subscription::connect(host, Source::Workspace(workspace), signal)
            .inspect_err(|err| warn!(%workspace, %err, "Could not follow workspace"))
            .ok()
    }
}
