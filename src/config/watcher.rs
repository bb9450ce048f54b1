//! Configuration file watcher for hot reload.
//!
//! Reloading lets operators rotate provider keys or retune limits without a
//! restart. The listener address and TLS settings are only read at startup.
//!
//! One save usually raises several modify events. Each event re-reads the
//! file, and only content that differs from the last accepted version is
//! parsed and forwarded, so a save costs one services rebuild.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::HubConfig;

fn digest(content: &str) -> u64 {
    let mut hasher = DefaultHasher::new();
    content.hash(&mut hasher);
    hasher.finish()
}

/// Remembers the last file content seen so repeated events collapse.
#[derive(Debug, Default)]
pub struct ReloadGate {
    last: Option<u64>,
}

impl ReloadGate {
    /// A gate that already knows `content`, typically the startup file.
    pub fn seeded(content: &str) -> Self {
        Self {
            last: Some(digest(content)),
        }
    }

    /// True when `content` differs from the last admitted content.
    pub fn admit(&mut self, content: &str) -> bool {
        let current = digest(content);
        if self.last == Some(current) {
            return false;
        }
        self.last = Some(current);
        true
    }
}

/// Per-event reload logic, owned by the notify callback.
struct ReloadHandler {
    path: PathBuf,
    gate: ReloadGate,
    tx: mpsc::UnboundedSender<HubConfig>,
    stopped: bool,
}

impl ReloadHandler {
    fn new(path: PathBuf, tx: mpsc::UnboundedSender<HubConfig>) -> Self {
        let gate = fs::read_to_string(&path)
            .map(|content| ReloadGate::seeded(&content))
            .unwrap_or_default();
        Self {
            path,
            gate,
            tx,
            stopped: false,
        }
    }

    fn on_event(&mut self, res: notify::Result<Event>) {
        if self.stopped {
            return;
        }

        let event = match res {
            Ok(event) => event,
            Err(e) => {
                tracing::error!(error = ?e, "Watch error");
                return;
            }
        };
        if !(event.kind.is_modify() || event.kind.is_create()) {
            return;
        }

        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!(path = ?self.path, error = %e, "Config file unreadable, keeping current configuration");
                return;
            }
        };
        if !self.gate.admit(&content) {
            tracing::debug!(path = ?self.path, "Config content unchanged, skipping reload");
            return;
        }

        tracing::info!("Config file change detected, reloading...");
        match load_config(&self.path) {
            Ok(new_config) => {
                if self.tx.send(new_config).is_err() {
                    tracing::warn!("Config receiver closed, stopping hot reload");
                    self.stopped = true;
                }
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to reload config. Keeping current configuration.");
            }
        }
    }
}

/// A watcher that monitors the configuration file for changes.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<HubConfig>,
}

impl ConfigWatcher {
    /// Create a new ConfigWatcher.
    ///
    /// Returns the watcher and a receiver for configuration updates.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<HubConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching the file. The returned watcher must be kept alive.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let mut handler = ReloadHandler::new(self.path.clone(), self.update_tx);

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| handler.on_event(res),
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = ?self.path, "Config watcher started");
        Ok(watcher)
    }
}
