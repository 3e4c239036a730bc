//! Configuration file watcher for hot reload.
//!
//! Every write to the watched file triggers a full load and validation. Only
//! configs that pass are forwarded; a broken edit is logged and the running
//! configuration stays in place.

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::CatalogConfig;

/// Watches one config file and forwards validated reloads.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<CatalogConfig>,
}

impl ConfigWatcher {
    /// Returns the watcher and the receiving end for reloaded configs.
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<CatalogConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let watched = path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if changes_content(&event.kind) => reload(&watched, &update_tx),
                Ok(_) => {}
                Err(e) => tracing::error!(error = ?e, "Config watch error"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;
        watcher.watch(&path, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}

/// Writes and re-creations change the file; access and metadata events do not.
fn changes_content(kind: &EventKind) -> bool {
    kind.is_modify() || kind.is_create()
}

fn reload(path: &Path, update_tx: &mpsc::UnboundedSender<CatalogConfig>) {
    tracing::info!(path = %path.display(), "Config file changed, reloading");
    match load_config(path) {
        Ok(config) => {
            if update_tx.send(config).is_err() {
                tracing::debug!("Config update receiver gone, dropping reload");
            }
        }
        Err(e) => tracing::error!(error = %e, "Config reload rejected, keeping current configuration"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, ModifyKind};
    use std::io::Write;

    #[test]
    fn test_only_content_changes_trigger_reload() {
        assert!(changes_content(&EventKind::Modify(ModifyKind::Any)));
        assert!(changes_content(&EventKind::Create(CreateKind::File)));
        assert!(!changes_content(&EventKind::Access(AccessKind::Any)));
        assert!(!changes_content(&EventKind::Remove(notify::event::RemoveKind::Any)));
    }

    #[test]
    fn test_invalid_reload_is_not_forwarded() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fault_injection]\nerror_probability = 2.0").unwrap();

        let (tx, mut rx) = mpsc::unbounded_channel();
        reload(file.path(), &tx);
        assert!(rx.try_recv().is_err());

        let mut handle = file.reopen().unwrap();
        handle.set_len(0).unwrap();
        writeln!(handle, "[fault_injection]\nenabled = true").unwrap();
        reload(file.path(), &tx);
        assert!(rx.try_recv().unwrap().fault_injection.enabled);
    }

    #[tokio::test]
    async fn test_reload_sends_valid_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[fault_injection]\nenabled = false").unwrap();

        let (watcher, mut updates) = ConfigWatcher::new(file.path());
        let _guard = watcher.run().unwrap();

        let mut handle = file.reopen().unwrap();
        handle.set_len(0).unwrap();
        writeln!(handle, "[fault_injection]\nenabled = true\nerror_probability = 1.0").unwrap();
        handle.sync_all().unwrap();

        let config = tokio::time::timeout(Duration::from_secs(10), async {
            loop {
                match updates.recv().await {
                    Some(c) if c.fault_injection.enabled => return Some(c),
                    Some(_) => continue,
                    None => return None,
                }
            }
        })
        .await
        .expect("no reload within timeout")
        .expect("watcher channel closed");

        assert_eq!(config.fault_injection.error_probability, 1.0);
    }
}
