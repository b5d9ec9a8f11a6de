//! The boundary between the reactor and whatever window manager hosts it.
//!
//! The reactor never owns windows or workspaces. It only refers to them by the
//! identities the host hands out and asks the host to act on them.

use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::model::Rect;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindowId(u32);

impl WindowId {
    pub const fn new(id: u32) -> Self { Self(id) }

    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for WindowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{:#x}", self.0) }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WorkspaceId(u32);

impl WorkspaceId {
    pub const fn new(index: u32) -> Self { Self(index) }

    pub fn get(self) -> u32 { self.0 }
}

impl fmt::Display for WorkspaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

/// Handle for a live host connection, as returned by [`WindowSystem::connect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConnectionId(u64);

impl ConnectionId {
    pub const fn new(id: u64) -> Self { Self(id) }

    pub fn get(self) -> u64 { self.0 }
}

/// Notifications the reactor can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    WindowAdded,
    WindowRemoved,
    Title,
    Size,
    Position,
}

/// What a [`Signal`] is connected to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Window(WindowId),
    Workspace(WorkspaceId),
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Window(id) => write!(f, "window {id}"),
            Source::Workspace(id) => write!(f, "workspace {id}"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum HostError {
    #[error("{origin} rejected a {signal:?} subscription")]
    Rejected { origin: Source, signal: Signal },
    #[error("window {0} is not known to the window manager")]
    UnknownWindow(WindowId),
    #[error("window manager request failed: {0}")]
    Backend(String),
}

/// Operations the host window manager provides.
///
/// Methods take `&self` so a single host can be shared between the reactor
/// and the subscription handles it gives out.
pub trait WindowSystem {
    fn active_workspace(&self) -> Option<WorkspaceId>;

    /// Normal windows currently on `workspace`, in stacking order.
    fn windows_on(&self, workspace: WorkspaceId) -> Vec<WindowId>;

    fn title(&self, window: WindowId) -> Option<String>;

    fn frame_rect(&self, window: WindowId) -> Option<Rect>;

    fn is_above(&self, window: WindowId) -> bool;

    fn is_sticky(&self, window: WindowId) -> bool;

    fn set_above(&self, window: WindowId, above: bool) -> Result<(), HostError>;

    fn set_sticky(&self, window: WindowId, sticky: bool) -> Result<(), HostError>;

    /// Moves the outer frame so its top-left corner lands on `(x, y)`.
    fn move_frame(&self, window: WindowId, user_op: bool, x: i32, y: i32)
    -> Result<(), HostError>;

    /// `None` for windows shown on every workspace.
    fn window_workspace(&self, window: WindowId) -> Option<WorkspaceId>;

    fn activate_workspace(&self, workspace: WorkspaceId, timestamp: u32)
    -> Result<(), HostError>;

    /// Timestamp of the most recent input event, as required by activation.
    fn current_time(&self) -> u32;

    fn connect(&self, source: Source, signal: Signal) -> Result<ConnectionId, HostError>;

    fn disconnect(&self, id: ConnectionId);
}

pub type SharedWindowSystem = Rc<dyn WindowSystem>;

/// A live connection that is released when dropped.
pub struct Subscription {
    host: SharedWindowSystem,
    id: ConnectionId,
    source: Source,
    signal: Signal,
}

impl Subscription {
    pub fn connect(
        host: &SharedWindowSystem,
        source: Source,
        signal: Signal,
    ) -> Result<Self, HostError> {
        let id = host.connect(source, signal)?;
        trace!(%source, ?signal, id = id.get(), "connected");
        Ok(Subscription { host: Rc::clone(host), id, source, signal })
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("signal", &self.signal)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        trace!(source = %self.source, signal = ?self.signal, id = self.id.get(), "disconnected");
        self.host.disconnect(self.id);
    }
}
