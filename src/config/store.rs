//! Shared, reloadable configuration.

use super::Config;
use std::sync::Arc;
use tokio::sync::watch;

/// Holds the current configuration for every formatting run in the process.
///
/// Each run calls [`snapshot`](Self::snapshot) once when it starts and uses that
/// value to the end, so an [`update`](Self::update) only affects runs started after it.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    sender: Arc<watch::Sender<Arc<Config>>>,
}

impl ConfigStore {
    pub fn new(config: Config) -> Self {
        let (sender, _) = watch::channel(Arc::new(config));
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn snapshot(&self) -> Arc<Config> {
        Arc::clone(&self.sender.borrow())
    }

    /// Replace the configuration and wake subscribers.
    pub fn update(&self, config: Config) {
        log::debug!("[tidybridge-config] Configuration updated: {config:?}");
        self.sender.send_replace(Arc::new(config));
    }

    /// A receiver that is notified after each [`update`](Self::update).
    pub fn subscribe(&self) -> watch::Receiver<Arc<Config>> {
        self.sender.subscribe()
    }
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
