use std::rc::Rc;

use tracing::{debug, instrument};

use crate::actor::reactor::Reactor;
use crate::actor::reactor::events::window::WindowEventHandler;

pub struct WorkspaceEventHandler;

impl WorkspaceEventHandler {
    /// Moves the window-added/removed listeners to the active workspace and
    /// re-evaluates every window already on it.
    #[instrument(skip(reactor))]
    pub fn handle_workspace_switched(reactor: &mut Reactor) {
        let host = Rc::clone(&reactor.host);
        let Some(workspace) = host.active_workspace() else {
            debug!("No active workspace; dropping workspace listeners");
            reactor.workspace_manager.release();
            return;
        };

        reactor.workspace_manager.track(&host, workspace);

        let windows = host.windows_on(workspace);
        debug!(%workspace, count = windows.len(), "Re-evaluating windows");
        for window in windows {
            WindowEventHandler::handle_window_added(reactor, window);
        }
    }
}
