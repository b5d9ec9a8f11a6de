//! An EWMH window manager as seen through X11.
//!
//! Requests go out from the reactor thread through [`X11WindowSystem`]. A
//! separate [`EventPump`] thread shares the same connection, waits for X
//! events and turns the ones the reactor cares about into [`Event`]s.

use std::cell::{Cell, RefCell};
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, trace, warn};
use x11rb::connection::Connection;
use x11rb::cookie::VoidCookie;
use x11rb::protocol::Event as XEvent;
use x11rb::protocol::xproto::{
    Atom, AtomEnum, ChangeWindowAttributesAux, ClientMessageEvent, ConfigureNotifyEvent,
    ConnectionExt as _, EventMask, PropertyNotifyEvent, Window,
};
use x11rb::rust_connection::RustConnection;

use crate::actor::reactor::{self, Event};
use crate::common::collections::HashMap;
use crate::model::Rect;
use crate::sys::window_system::{
    ConnectionId, HostError, Signal, Source, WindowId, WindowSystem, WorkspaceId,
};

x11rb::atom_manager! {
    pub Atoms: AtomsCookie {
        _NET_CLIENT_LIST,
        _NET_CURRENT_DESKTOP,
        _NET_WM_DESKTOP,
        _NET_WM_NAME,
        _NET_WM_STATE,
        _NET_WM_STATE_ABOVE,
        _NET_WM_STATE_STICKY,
        _NET_MOVERESIZE_WINDOW,
        _NET_FRAME_EXTENTS,
    }
}

/// `_NET_WM_DESKTOP` value for windows shown on every desktop.
const ALL_DESKTOPS: u32 = 0xFFFF_FFFF;

const NET_WM_STATE_REMOVE: u32 = 0;
const NET_WM_STATE_ADD: u32 = 1;

/// Source indication for requests made on behalf of the user ("pager").
const SOURCE_USER: u32 = 2;
const SOURCE_APPLICATION: u32 = 1;

const GRAVITY_NORTH_WEST: u32 = 1;
const MOVERESIZE_X: u32 = 1 << 8;
const MOVERESIZE_Y: u32 = 1 << 9;

/// Selected on every client so desktop and title changes are seen even before
/// the reactor follows the window.
const CLIENT_EVENTS: EventMask = EventMask::PROPERTY_CHANGE;

fn backend(err: impl Display) -> HostError { HostError::Backend(err.to_string()) }

/// Where a window lives according to `_NET_WM_DESKTOP`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Desktop {
    Index(u32),
    All,
    Unknown,
}

impl Desktop {
    fn from_cardinal(value: Option<u32>) -> Desktop {
        match value {
            Some(ALL_DESKTOPS) => Desktop::All,
            Some(index) => Desktop::Index(index),
            None => Desktop::Unknown,
        }
    }

    fn is_on(self, current: Option<u32>) -> bool {
        match self {
            Desktop::Index(index) => current == Some(index),
            Desktop::All => current.is_some(),
            Desktop::Unknown => false,
        }
    }

    fn workspace(self) -> Option<WorkspaceId> {
        match self {
            Desktop::Index(index) => Some(WorkspaceId::new(index)),
            Desktop::All | Desktop::Unknown => None,
        }
    }
}

/// Grows the client area by the frame extents (left, right, top, bottom).
fn outer_frame(x: i32, y: i32, width: i32, height: i32, extents: [u32; 4]) -> Rect {
    let [left, right, top, bottom] = extents.map(|e| i32::try_from(e).unwrap_or(0));
    Rect::new(x - left, y - top, width + left + right, height + top + bottom)
}

fn moveresize_flags(user_op: bool) -> u32 {
    let source = if user_op { SOURCE_USER } else { SOURCE_APPLICATION };
    GRAVITY_NORTH_WEST | MOVERESIZE_X | MOVERESIZE_Y | source << 12
}

/// Property readers shared by the host and the pump thread.
struct Properties<'a> {
    conn: &'a RustConnection,
    atoms: &'a Atoms,
}

impl Properties<'_> {
    fn cardinals(&self, window: Window, property: Atom) -> Result<Vec<u32>, HostError> {
        let reply = self
            .conn
            .get_property(false, window, property, AtomEnum::ANY, 0, 1024)
            .map_err(backend)?
            .reply()
            .map_err(backend)?;
        Ok(reply.value32().map(Iterator::collect).unwrap_or_default())
    }

    fn cardinal(&self, window: Window, property: Atom) -> Option<u32> {
        self.cardinals(window, property).ok()?.first().copied()
    }

    fn client_list(&self, root: Window) -> Vec<Window> {
        self.cardinals(root, self.atoms._NET_CLIENT_LIST)
            .inspect_err(|err| warn!(%err, "Could not read the client list"))
            .unwrap_or_default()
    }

    fn desktop(&self, window: Window) -> Desktop {
        Desktop::from_cardinal(self.cardinal(window, self.atoms._NET_WM_DESKTOP))
    }

    fn text(&self, window: Window, property: Atom) -> Option<String> {
        let reply = self
            .conn
            .get_property(false, window, property, AtomEnum::ANY, 0, 1024)
            .ok()?
            .reply()
            .ok()?;
        (!reply.value.is_empty()).then(|| String::from_utf8_lossy(&reply.value).into_owned())
    }

    fn has_state(&self, window: Window, state: Atom) -> bool {
        self.cardinals(window, self.atoms._NET_WM_STATE)
            .is_ok_and(|states| states.contains(&state))
    }
}

pub struct X11WindowSystem {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    connections: RefCell<HashMap<ConnectionId, (Source, Signal)>>,
    next_connection: Cell<u64>,
    timestamp: Arc<AtomicU32>,
}

impl X11WindowSystem {
    /// Connects to `$DISPLAY` and starts listening to root window properties.
    pub fn connect() -> Result<X11WindowSystem, HostError> {
        let (conn, screen) = x11rb::connect(None).map_err(backend)?;
        let root = conn.setup().roots[screen].root;
        let atoms = Atoms::new(&conn).map_err(backend)?.reply().map_err(backend)?;
        let root_events = ChangeWindowAttributesAux::new().event_mask(EventMask::PROPERTY_CHANGE);
        conn.change_window_attributes(root, &root_events)
            .map_err(backend)?
            .check()
            .map_err(backend)?;
        info!(screen, root, "Connected to X server");
        Ok(X11WindowSystem {
            conn: Arc::new(conn),
            root,
            atoms,
            connections: RefCell::default(),
            next_connection: Cell::new(0),
            timestamp: Arc::new(AtomicU32::new(x11rb::CURRENT_TIME)),
        })
    }

    /// Builds the pump that feeds X events for this host into `events_tx`.
    pub fn event_pump(&self, events_tx: reactor::Sender) -> EventPump {
        EventPump::new(
            Arc::clone(&self.conn),
            self.root,
            self.atoms,
            Arc::clone(&self.timestamp),
            events_tx,
        )
    }

    fn properties(&self) -> Properties<'_> { Properties { conn: &self.conn, atoms: &self.atoms } }

    fn send_root_message(
        &self,
        window: Window,
        kind: Atom,
        data: [u32; 5],
    ) -> Result<(), HostError> {
        let message = ClientMessageEvent::new(32, window, kind, data);
        self.conn
            .send_event(
                false,
                self.root,
                EventMask::SUBSTRUCTURE_REDIRECT | EventMask::SUBSTRUCTURE_NOTIFY,
                message,
            )
            .map_err(backend)?;
        self.conn.flush().map_err(backend)
    }

    fn change_state(&self, window: WindowId, state: Atom, add: bool) -> Result<(), HostError> {
        let action = if add { NET_WM_STATE_ADD } else { NET_WM_STATE_REMOVE };
        self.send_root_message(
            window.get(),
            self.atoms._NET_WM_STATE,
            [action, state, 0, SOURCE_USER, 0],
        )
    }

    fn select_window_events(
        &self,
        window: Window,
        mask: EventMask,
    ) -> Result<VoidCookie<'_, RustConnection>, HostError> {
        (*self.conn)
            .change_window_attributes(window, &ChangeWindowAttributesAux::new().event_mask(mask))
            .map_err(backend)
    }
}

impl WindowSystem for X11WindowSystem {
    fn active_workspace(&self) -> Option<WorkspaceId> {
        self.properties().cardinal(self.root, self.atoms._NET_CURRENT_DESKTOP).map(WorkspaceId::new)
    }

    fn windows_on(&self, workspace: WorkspaceId) -> Vec<WindowId> {
        let props = self.properties();
        props
            .client_list(self.root)
            .into_iter()
            .filter(|&window| props.desktop(window).is_on(Some(workspace.get())))
            .map(WindowId::new)
            .collect()
    }

    fn title(&self, window: WindowId) -> Option<String> {
        let props = self.properties();
        props
            .text(window.get(), self.atoms._NET_WM_NAME)
            .or_else(|| props.text(window.get(), AtomEnum::WM_NAME.into()))
    }

    fn frame_rect(&self, window: WindowId) -> Option<Rect> {
        let geometry = self.conn.get_geometry(window.get()).ok()?.reply().ok()?;
        let origin =
            self.conn.translate_coordinates(window.get(), self.root, 0, 0).ok()?.reply().ok()?;
        let mut extents = [0; 4];
        if let Ok(values) = self.properties().cardinals(window.get(), self.atoms._NET_FRAME_EXTENTS)
            && values.len() == 4
        {
            extents.copy_from_slice(&values);
        }
        Some(outer_frame(
            origin.dst_x.into(),
            origin.dst_y.into(),
            geometry.width.into(),
            geometry.height.into(),
            extents,
        ))
    }

    fn is_above(&self, window: WindowId) -> bool {
        self.properties().has_state(window.get(), self.atoms._NET_WM_STATE_ABOVE)
    }

    fn is_sticky(&self, window: WindowId) -> bool {
        self.properties().has_state(window.get(), self.atoms._NET_WM_STATE_STICKY)
    }

    fn set_above(&self, window: WindowId, above: bool) -> Result<(), HostError> {
        self.change_state(window, self.atoms._NET_WM_STATE_ABOVE, above)
    }

    fn set_sticky(&self, window: WindowId, sticky: bool) -> Result<(), HostError> {
        self.change_state(window, self.atoms._NET_WM_STATE_STICKY, sticky)
    }

    fn move_frame(&self, window: WindowId, user_op: bool, x: i32, y: i32) -> Result<(), HostError> {
        // Coordinates travel as CARD32; negative positions wrap as the WM expects.
        self.send_root_message(
            window.get(),
            self.atoms._NET_MOVERESIZE_WINDOW,
            [moveresize_flags(user_op), x as u32, y as u32, 0, 0],
        )
    }

    fn window_workspace(&self, window: WindowId) -> Option<WorkspaceId> {
        self.properties().desktop(window.get()).workspace()
    }

    fn activate_workspace(&self, workspace: WorkspaceId, timestamp: u32) -> Result<(), HostError> {
        self.send_root_message(
            self.root,
            self.atoms._NET_CURRENT_DESKTOP,
            [workspace.get(), timestamp, 0, 0, 0],
        )
    }

    fn current_time(&self) -> u32 { self.timestamp.load(Ordering::Relaxed) }

    fn connect(&self, source: Source, signal: Signal) -> Result<ConnectionId, HostError> {
        if let Source::Window(window) = source {
            let cookie = self
                .select_window_events(window.get(), CLIENT_EVENTS | EventMask::STRUCTURE_NOTIFY)?;
            cookie.check().map_err(|err| {
                debug!(%window, %err, "Could not select window events");
                HostError::Rejected { origin: source, signal }
            })?;
        }
        let id = ConnectionId::new(self.next_connection.get() + 1);
        self.next_connection.set(id.get());
        self.connections.borrow_mut().insert(id, (source, signal));
        Ok(id)
    }

    fn disconnect(&self, id: ConnectionId) {
        let mut connections = self.connections.borrow_mut();
        let Some((source, _)) = connections.remove(&id) else {
            return;
        };
        let Source::Window(window) = source else {
            return;
        };
        if connections.values().any(|&(other, _)| other == source) {
            return;
        }
        // Back to what the pump needs; the window may already be gone.
        match self.select_window_events(window.get(), CLIENT_EVENTS) {
            Ok(cookie) => cookie.ignore_error(),
            Err(err) => trace!(%window, %err, "Could not deselect window events"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Geometry {
    x: i16,
    y: i16,
    width: u16,
    height: u16,
}

/// The pump's view of the client list, the current desktop and the last
/// configured geometry of each window. Turns changes to them into reactor
/// events without touching the connection.
#[derive(Debug, Default)]
struct ClientTracker {
    current: Option<u32>,
    clients: HashMap<Window, Desktop>,
    geometry: HashMap<Window, Geometry>,
}

impl ClientTracker {
    fn is_known(&self, window: Window) -> bool { self.clients.contains_key(&window) }

    fn switch_desktop(&mut self, current: Option<u32>) -> Event {
        self.current = current;
        Event::WorkspaceSwitched
    }

    /// Applies a new `_NET_CLIENT_LIST`. `fresh` holds the desktops of the
    /// listed windows that were not known before.
    fn update_clients(&mut self, listed: &[Window], fresh: &[(Window, Desktop)]) -> Vec<Event> {
        let mut events = Vec::new();

        let mut gone: Vec<Window> =
            self.clients.keys().copied().filter(|window| !listed.contains(window)).collect();
        gone.sort_unstable();
        for window in gone {
            let desktop = self.clients.remove(&window).unwrap_or(Desktop::Unknown);
            self.geometry.remove(&window);
            let id = WindowId::new(window);
            match self.current {
                Some(current) if desktop.is_on(self.current) => {
                    events.push(Event::WindowRemoved(WorkspaceId::new(current), id))
                }
                _ => events.push(Event::WindowUnmanaged(id)),
            }
        }

        for &(window, desktop) in fresh {
            if self.clients.insert(window, desktop).is_some() {
                continue;
            }
            if let Some(current) = self.current
                && desktop.is_on(self.current)
            {
                events.push(Event::WindowAdded(WorkspaceId::new(current), WindowId::new(window)));
            }
        }
        events
    }

    /// A client's `_NET_WM_DESKTOP` changed; it is reported as added to or
    /// removed from the current desktop when it crosses that boundary.
    fn desktop_changed(&mut self, window: Window, desktop: Desktop) -> Option<Event> {
        let slot = self.clients.get_mut(&window)?;
        let old = std::mem::replace(slot, desktop);
        let workspace = WorkspaceId::new(self.current?);
        let id = WindowId::new(window);
        match (old.is_on(self.current), desktop.is_on(self.current)) {
            (false, true) => Some(Event::WindowAdded(workspace, id)),
            (true, false) => Some(Event::WindowRemoved(workspace, id)),
            _ => None,
        }
    }

    /// Without an earlier geometry both events are reported, so the first
    /// move after the window is followed is not lost.
    fn configured(&mut self, window: Window, geometry: Geometry) -> Vec<Event> {
        let before = self.geometry.insert(window, geometry);
        let id = WindowId::new(window);
        let mut events = Vec::new();
        if before.is_none_or(|b| (b.width, b.height) != (geometry.width, geometry.height)) {
            events.push(Event::SizeChanged(id));
        }
        if before.is_none_or(|b| (b.x, b.y) != (geometry.x, geometry.y)) {
            events.push(Event::PositionChanged(id));
        }
        events
    }

    fn destroyed(&mut self, window: Window) { self.geometry.remove(&window); }
}

/// Translates X events into reactor events on a dedicated thread.
pub struct EventPump {
    conn: Arc<RustConnection>,
    root: Window,
    atoms: Atoms,
    timestamp: Arc<AtomicU32>,
    events_tx: reactor::Sender,
    tracker: ClientTracker,
}

impl EventPump {
    fn new(
        conn: Arc<RustConnection>,
        root: Window,
        atoms: Atoms,
        timestamp: Arc<AtomicU32>,
        events_tx: reactor::Sender,
    ) -> EventPump {
        let mut pump = EventPump {
            conn,
            root,
            atoms,
            timestamp,
            events_tx,
            tracker: ClientTracker::default(),
        };
        let current = pump.properties().cardinal(root, atoms._NET_CURRENT_DESKTOP);
        let listed = pump.properties().client_list(root);
        let fresh = pump.follow(listed.iter().copied());
        pump.tracker.current = current;
        // The reactor enumerates existing windows itself when it is enabled.
        pump.tracker.update_clients(&listed, &fresh);
        pump
    }

    pub fn spawn(self) -> std::io::Result<JoinHandle<()>> {
        thread::Builder::new().name("x11-events".into()).spawn(move || self.run())
    }

    fn run(mut self) {
        loop {
            let event = match self.conn.wait_for_event() {
                Ok(event) => event,
                Err(err) => {
                    error!(%err, "Lost the X connection");
                    self.events_tx.send(Event::Shutdown);
                    return;
                }
            };
            if self.events_tx.is_closed() {
                debug!("Reactor went away, stopping the event pump");
                return;
            }
            match event {
                XEvent::PropertyNotify(event) => self.on_property(event),
                XEvent::ConfigureNotify(event) => self.on_configure(event),
                XEvent::DestroyNotify(event) => self.tracker.destroyed(event.window),
                XEvent::Error(err) => trace!(?err, "X error"),
                _ => {}
            }
        }
    }

    fn properties(&self) -> Properties<'_> { Properties { conn: &self.conn, atoms: &self.atoms } }

    fn send_all(&self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.events_tx.send(event);
        }
    }

    /// Selects [`CLIENT_EVENTS`] on each window before reading its desktop,
    /// so no later change to it can slip by.
    fn follow(&self, windows: impl Iterator<Item = Window>) -> Vec<(Window, Desktop)> {
        let props = self.properties();
        windows
            .map(|window| {
                let select = ChangeWindowAttributesAux::new().event_mask(CLIENT_EVENTS);
                match (*self.conn).change_window_attributes(window, &select) {
                    Ok(cookie) => cookie.ignore_error(),
                    Err(err) => trace!(window, %err, "Could not select client events"),
                }
                (window, props.desktop(window))
            })
            .collect()
    }

    fn on_property(&mut self, event: PropertyNotifyEvent) {
        self.timestamp.store(event.time, Ordering::Relaxed);
        let atoms = self.atoms;
        if event.window == self.root {
            if event.atom == atoms._NET_CLIENT_LIST {
                self.on_client_list();
            } else if event.atom == atoms._NET_CURRENT_DESKTOP {
                let current = self.properties().cardinal(self.root, atoms._NET_CURRENT_DESKTOP);
                let switched = self.tracker.switch_desktop(current);
                self.events_tx.send(switched);
            }
            return;
        }
        if event.atom == atoms._NET_WM_NAME || event.atom == Atom::from(AtomEnum::WM_NAME) {
            self.events_tx.send(Event::TitleChanged(WindowId::new(event.window)));
        } else if event.atom == atoms._NET_WM_DESKTOP {
            let desktop = self.properties().desktop(event.window);
            let moved = self.tracker.desktop_changed(event.window, desktop);
            self.send_all(moved);
        }
    }

    fn on_client_list(&mut self) {
        let listed = self.properties().client_list(self.root);
        let fresh =
            self.follow(listed.iter().copied().filter(|&window| !self.tracker.is_known(window)));
        let events = self.tracker.update_clients(&listed, &fresh);
        self.send_all(events);
    }

    fn on_configure(&mut self, event: ConfigureNotifyEvent) {
        let geometry =
            Geometry { x: event.x, y: event.y, width: event.width, height: event.height };
        let events = self.tracker.configured(event.window, geometry);
        self.send_all(events);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn desktop_cardinals() {
        assert_eq!(Desktop::from_cardinal(Some(2)), Desktop::Index(2));
        assert_eq!(Desktop::from_cardinal(Some(ALL_DESKTOPS)), Desktop::All);
        assert_eq!(Desktop::from_cardinal(None), Desktop::Unknown);

        assert!(Desktop::Index(2).is_on(Some(2)));
        assert!(!Desktop::Index(2).is_on(Some(0)));
        assert!(Desktop::All.is_on(Some(0)));
        assert!(!Desktop::All.is_on(None));
        assert!(!Desktop::Unknown.is_on(Some(0)));

        assert_eq!(Desktop::All.workspace(), None);
        assert_eq!(Desktop::Index(3).workspace(), Some(WorkspaceId::new(3)));
    }

    #[test]
    fn frame_includes_decorations() {
        assert_eq!(outer_frame(104, 130, 320, 180, [4, 4, 30, 4]), Rect::new(100, 100, 328, 214));
        assert_eq!(outer_frame(10, 10, 320, 180, [0; 4]), Rect::new(10, 10, 320, 180));
    }

    #[test]
    fn moveresize_flags_carry_the_source() {
        assert_eq!(moveresize_flags(true), 0x2301);
        assert_eq!(moveresize_flags(false), 0x1301);
    }

    const HOME: WorkspaceId = WorkspaceId::new(0);

    fn on_home(clients: &[(Window, Desktop)]) -> ClientTracker {
        let mut tracker = ClientTracker::default();
        tracker.switch_desktop(Some(0));
        let listed: Vec<Window> = clients.iter().map(|&(window, _)| window).collect();
        tracker.update_clients(&listed, clients);
        tracker
    }

    fn geometry(x: i16, y: i16, width: u16, height: u16) -> Geometry {
        Geometry { x, y, width, height }
    }

    #[test]
    fn new_clients_on_the_current_desktop_are_added() {
        let mut tracker = on_home(&[(0x10, Desktop::Index(0))]);

        let fresh =
            [(0x20, Desktop::Index(0)), (0x30, Desktop::Index(2)), (0x40, Desktop::All)];
        let events = tracker.update_clients(&[0x10, 0x20, 0x30, 0x40], &fresh);

        assert_eq!(
            events,
            vec![
                Event::WindowAdded(HOME, WindowId::new(0x20)),
                Event::WindowAdded(HOME, WindowId::new(0x40)),
            ]
        );
        assert!(tracker.is_known(0x30));
    }

    #[test]
    fn vanished_clients_are_removed_or_unmanaged() {
        let mut tracker = on_home(&[
            (0x10, Desktop::Index(0)),
            (0x20, Desktop::Index(2)),
            (0x30, Desktop::All),
            (0x40, Desktop::Index(0)),
        ]);

        let events = tracker.update_clients(&[0x40], &[]);

        assert_eq!(
            events,
            vec![
                Event::WindowRemoved(HOME, WindowId::new(0x10)),
                Event::WindowUnmanaged(WindowId::new(0x20)),
                Event::WindowRemoved(HOME, WindowId::new(0x30)),
            ]
        );
        assert!(!tracker.is_known(0x10));
        assert!(tracker.is_known(0x40));
    }

    #[test]
    fn clients_without_a_current_desktop_are_recorded_silently() {
        let mut tracker = ClientTracker::default();
        assert_eq!(tracker.update_clients(&[0x10], &[(0x10, Desktop::Index(0))]), vec![]);

        assert_eq!(tracker.switch_desktop(Some(0)), Event::WorkspaceSwitched);
        let events = tracker.update_clients(&[], &[]);
        assert_eq!(events, vec![Event::WindowRemoved(HOME, WindowId::new(0x10))]);
    }

    #[test]
    fn desktop_moves_cross_the_current_desktop() {
        let mut tracker = on_home(&[(0x10, Desktop::Index(2)), (0x20, Desktop::Unknown)]);

        assert_eq!(
            tracker.desktop_changed(0x10, Desktop::Index(0)),
            Some(Event::WindowAdded(HOME, WindowId::new(0x10)))
        );
        assert_eq!(tracker.desktop_changed(0x10, Desktop::All), None);
        assert_eq!(
            tracker.desktop_changed(0x10, Desktop::Index(3)),
            Some(Event::WindowRemoved(HOME, WindowId::new(0x10)))
        );
        assert_eq!(tracker.desktop_changed(0x10, Desktop::Index(1)), None);

        // The desktop was not set yet when the window was listed.
        assert_eq!(
            tracker.desktop_changed(0x20, Desktop::Index(0)),
            Some(Event::WindowAdded(HOME, WindowId::new(0x20)))
        );
    }

    #[test]
    fn desktop_changes_of_unlisted_windows_are_ignored() {
        let mut tracker = on_home(&[]);
        assert_eq!(tracker.desktop_changed(0x99, Desktop::Index(0)), None);
        assert!(!tracker.is_known(0x99));

        let mut detached = ClientTracker::default();
        detached.update_clients(&[0x10], &[(0x10, Desktop::Index(2))]);
        assert_eq!(detached.desktop_changed(0x10, Desktop::Index(0)), None);
    }

    #[test]
    fn configure_reports_size_and_position_separately() {
        let mut tracker = on_home(&[(0x10, Desktop::Index(0))]);
        let window = WindowId::new(0x10);

        assert_eq!(
            tracker.configured(0x10, geometry(10, 10, 320, 180)),
            vec![Event::SizeChanged(window), Event::PositionChanged(window)]
        );
        assert_eq!(
            tracker.configured(0x10, geometry(40, 10, 320, 180)),
            vec![Event::PositionChanged(window)]
        );
        assert_eq!(
            tracker.configured(0x10, geometry(40, 10, 400, 225)),
            vec![Event::SizeChanged(window)]
        );
        assert_eq!(tracker.configured(0x10, geometry(40, 10, 400, 225)), vec![]);

        tracker.destroyed(0x10);
        assert_eq!(tracker.configured(0x10, geometry(40, 10, 400, 225)).len(), 2);
    }

    #[test]
    #[ignore] // Requires an X server with an EWMH window manager
    fn reads_the_active_desktop() {
        let host = X11WindowSystem::connect().unwrap();
        let workspace = host.active_workspace().unwrap();
        for window in host.windows_on(workspace) {
            println!("{window}: {:?} {:?}", host.title(window), host.frame_rect(window));
        }
    }
}
