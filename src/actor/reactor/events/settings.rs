use tracing::{debug, instrument};

use crate::actor::reactor::Reactor;
use crate::actor::reactor::events::position::PositionEventHandler;
use crate::actor::reactor::events::workspace::WorkspaceEventHandler;
use crate::common::config::{SettingKey, Settings};

pub struct SettingsEventHandler;

impl SettingsEventHandler {
    /// Records the new settings and reacts to each key that changed. While
    /// disabled the settings are only recorded.
    pub fn handle_settings_changed(reactor: &mut Reactor, settings: Settings) {
        let previous = std::mem::replace(&mut reactor.settings, settings);
        if !reactor.enabled {
            return;
        }
        for key in settings.changed_keys(&previous) {
            Self::handle_setting_changed(reactor, key);
        }
    }

    #[instrument(skip(reactor))]
    pub fn handle_setting_changed(reactor: &mut Reactor, key: SettingKey) {
        debug!(%key, value = reactor.settings.get(key), "Setting changed");
        match key {
            // Re-evaluating the workspace pins or unpins the windows on it.
            SettingKey::Stick => WorkspaceEventHandler::handle_workspace_switched(reactor),
            SettingKey::RememberPosition if reactor.settings.remember_position => {
                for window in reactor.window_manager.pip_able_windows() {
                    PositionEventHandler::connect_geometry_listeners(reactor, window);
                }
            }
            SettingKey::RememberPosition => {
                for window in reactor.window_manager.window_ids() {
                    PositionEventHandler::disconnect_geometry_listeners(reactor, window);
                }
            }
        }
    }
}
