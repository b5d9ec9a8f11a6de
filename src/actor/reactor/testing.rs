use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::time::Instant;

use crate::common::collections::{BTreeMap, HashMap, HashSet};
use crate::model::Rect;
use crate::sys::window_system::{
    ConnectionId, HostError, Signal, Source, WindowId, WindowSystem, WorkspaceId,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockWindow {
    pub title: Option<String>,
    pub frame: Rect,
    pub above: bool,
    pub sticky: bool,
    pub workspace: WorkspaceId,
}

/// A frame move requested by the reactor, timed from when the host was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub window: WindowId,
    pub x: i32,
    pub y: i32,
    pub at: Duration,
}

#[derive(Default)]
struct State {
    active: Option<WorkspaceId>,
    windows: BTreeMap<WindowId, MockWindow>,
    connections: HashMap<ConnectionId, (Source, Signal)>,
    next_connection: u64,
    rejected: HashSet<(Source, Signal)>,
    moves: Vec<Move>,
    activations: Vec<WorkspaceId>,
}

/// An in-memory window manager. Nothing happens on its own: tests change the
/// state and then feed the matching events to the reactor.
pub struct MockWindowSystem {
    state: RefCell<State>,
    created: Instant,
}

impl MockWindowSystem {
    pub fn new(active: WorkspaceId) -> Rc<Self> {
        Rc::new(MockWindowSystem {
            state: RefCell::new(State { active: Some(active), ..State::default() }),
            created: Instant::now(),
        })
    }

    pub fn add_window(
        &self,
        id: u32,
        workspace: WorkspaceId,
        title: &str,
        frame: Rect,
    ) -> WindowId {
        let window = WindowId::new(id);
        let title = (!title.is_empty()).then(|| title.to_owned());
        self.state.borrow_mut().windows.insert(
            window,
            MockWindow { title, frame, above: false, sticky: false, workspace },
        );
        window
    }

    pub fn remove_window(&self, window: WindowId) {
        self.state.borrow_mut().windows.remove(&window);
    }

    pub fn set_title(&self, window: WindowId, title: &str) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.title = Some(title.to_owned());
        }
    }

    pub fn set_frame(&self, window: WindowId, frame: Rect) {
        if let Some(w) = self.state.borrow_mut().windows.get_mut(&window) {
            w.frame = frame;
        }
    }

    pub fn set_active(&self, workspace: Option<WorkspaceId>) {
        self.state.borrow_mut().active = workspace;
    }

    pub fn reject(&self, source: Source, signal: Signal) {
        self.state.borrow_mut().rejected.insert((source, signal));
    }

    pub fn window(&self, window: WindowId) -> MockWindow {
        self.state.borrow().windows[&window].clone()
    }

    pub fn connections(&self, source: Source, signal: Signal) -> usize {
        self.state.borrow().connections.values().filter(|&&c| c == (source, signal)).count()
    }

    pub fn total_connections(&self) -> usize { self.state.borrow().connections.len() }

    pub fn moves(&self) -> Vec<Move> { self.state.borrow().moves.clone() }

    pub fn activations(&self) -> Vec<WorkspaceId> { self.state.borrow().activations.clone() }

    fn with_window<T>(
        &self,
        window: WindowId,
        f: impl FnOnce(&mut MockWindow) -> T,
    ) -> Result<T, HostError> {
        self.state
            .borrow_mut()
            .windows
            .get_mut(&window)
            .map(f)
            .ok_or(HostError::UnknownWindow(window))
    }
}

impl WindowSystem for MockWindowSystem {
    fn active_workspace(&self) -> Option<WorkspaceId> { self.state.borrow().active }

    fn windows_on(&self, workspace: WorkspaceId) -> Vec<WindowId> {
        self.state
            .borrow()
            .windows
            .iter()
            .filter(|(_, w)| w.workspace == workspace || w.sticky)
            .map(|(&id, _)| id)
            .collect()
    }

    fn title(&self, window: WindowId) -> Option<String> {
        self.state.borrow().windows.get(&window).and_then(|w| w.title.clone())
    }

    fn frame_rect(&self, window: WindowId) -> Option<Rect> {
        self.state.borrow().windows.get(&window).map(|w| w.frame)
    }

    fn is_above(&self, window: WindowId) -> bool {
        self.state.borrow().windows.get(&window).is_some_and(|w| w.above)
    }

    fn is_sticky(&self, window: WindowId) -> bool {
        self.state.borrow().windows.get(&window).is_some_and(|w| w.sticky)
    }

    fn set_above(&self, window: WindowId, above: bool) -> Result<(), HostError> {
        self.with_window(window, |w| w.above = above)
    }

    fn set_sticky(&self, window: WindowId, sticky: bool) -> Result<(), HostError> {
        self.with_window(window, |w| w.sticky = sticky)
    }

    fn move_frame(
        &self,
        window: WindowId,
        _user_op: bool,
        x: i32,
        y: i32,
    ) -> Result<(), HostError> {
        self.with_window(window, |w| {
            w.frame.x = x;
            w.frame.y = y;
        })?;
        let at = Instant::now() - self.created;
        self.state.borrow_mut().moves.push(Move { window, x, y, at });
        Ok(())
    }

    fn window_workspace(&self, window: WindowId) -> Option<WorkspaceId> {
        let state = self.state.borrow();
        let w = state.windows.get(&window)?;
        (!w.sticky).then_some(w.workspace)
    }

    fn activate_workspace(&self, workspace: WorkspaceId, _timestamp: u32) -> Result<(), HostError> {
        let mut state = self.state.borrow_mut();
        state.active = Some(workspace);
        state.activations.push(workspace);
        Ok(())
    }

    fn current_time(&self) -> u32 { 0 }

    fn connect(&self, source: Source, signal: Signal) -> Result<ConnectionId, HostError> {
        let mut state = self.state.borrow_mut();
        if state.rejected.contains(&(source, signal)) {
            return Err(HostError::Rejected { origin: source, signal });
        }
        state.next_connection += 1;
        let id = ConnectionId::new(state.next_connection);
        state.connections.insert(id, (source, signal));
        Ok(id)
    }

    fn disconnect(&self, id: ConnectionId) {
        let removed = self.state.borrow_mut().connections.remove(&id);
        assert!(removed.is_some(), "connection {id:?} released twice");
    }
}
