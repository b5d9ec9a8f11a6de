//! Watches the config file and forwards settings changes to the reactor.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{RecommendedWatcher, RecursiveMode};
use notify_debouncer_mini::{DebounceEventResult, Debouncer, new_debouncer};
use tracing::{debug, info, warn};

use crate::actor::reactor::{self, Event};
use crate::common::config::{Config, Settings};

/// Editors tend to write a file in several steps.
const RELOAD_DEBOUNCE: Duration = Duration::from_millis(250);

/// Keeps the watch alive; dropping it stops watching.
pub struct ConfigWatcher {
    _debouncer: Debouncer<RecommendedWatcher>,
}

impl ConfigWatcher {
    /// Watches the directory holding `path`, since editors often replace the
    /// file rather than write it in place.
    pub fn spawn(
        path: PathBuf,
        initial: Settings,
        events_tx: reactor::Sender,
    ) -> Result<ConfigWatcher, notify::Error> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let mut reloader = Reloader { path: path.clone(), current: initial, events_tx };
        let mut debouncer = new_debouncer(RELOAD_DEBOUNCE, move |result: DebounceEventResult| {
            reloader.handle(result)
        })?;
        debouncer.watcher().watch(&dir, RecursiveMode::NonRecursive)?;
        info!(path = %path.display(), "Watching config file");
        Ok(ConfigWatcher { _debouncer: debouncer })
    }
}

struct Reloader {
    path: PathBuf,
    current: Settings,
    events_tx: reactor::Sender,
}

impl Reloader {
    fn handle(&mut self, result: DebounceEventResult) {
        let events = match result {
            Ok(events) => events,
            Err(err) => {
                warn!(?err, "Config watch failed");
                return;
            }
        };
        if events.iter().any(|event| is_same_file(&event.path, &self.path)) {
            self.reload();
        }
    }

    fn reload(&mut self) {
        let config = match Config::read(&self.path) {
            Ok(config) => config,
            Err(err) => {
                let cause = std::error::Error::source(&err).map(ToString::to_string);
                warn!(%err, cause = cause.as_deref(), "Keeping previous settings");
                return;
            }
        };
        if config.settings == self.current {
            debug!("Config reloaded without settings changes");
            return;
        }
        info!(
            stick = config.settings.stick,
            remember_position = config.settings.remember_position,
            "Settings changed"
        );
        self.current = config.settings;
        self.events_tx.send(Event::SettingsChanged(config.settings));
    }
}

fn is_same_file(changed: &Path, watched: &Path) -> bool {
    changed == watched
        || (changed.file_name().is_some() && changed.file_name() == watched.file_name())
}
