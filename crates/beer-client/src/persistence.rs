//! # Order Persistence
//!
//! Keeps the order list in `orders.json` so it survives restarts.
//!
//! ## Write Path
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Persistence Flow                                  │
//! │                                                                         │
//! │  OrderStore observer                                                    │
//! │        │  handle.save(items)      (never blocks, never fails)           │
//! │        ▼                                                                │
//! │  ┌───────────────┐   mpsc    ┌─────────────────────────────────────┐   │
//! │  │PersistenceHandle├────────►│ PersistenceWorker (tokio task)      │   │
//! │  └───────────────┘           │                                     │   │
//! │                              │  Save(items) ─► orders.json.tmp     │   │
//! │                              │                  └─rename─► .json   │   │
//! │                              │  Clear       ─► remove orders.json  │   │
//! │                              │  Flush(tx)   ─► tx.send(())         │   │
//! │                              └─────────────────────────────────────┘   │
//! │                                                                         │
//! │  Commands are applied strictly in issue order, so the file always      │
//! │  ends up holding the last list that was saved.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! Every I/O or encoding failure is logged with `warn!` and dropped. The
//! in-memory order stays correct; only the file may lag behind.

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, info, warn};

use beer_core::BeerItem;

use crate::error::{ClientError, ClientResult};

// =============================================================================
// Persistence Trait
// =============================================================================

/// Storage for the order list.
///
/// None of these operations report errors: a failed save is logged and a
/// failed load reads as an empty list.
#[async_trait]
pub trait OrderPersistence: Send + Sync {
    /// Replaces the stored list with `items`.
    async fn save(&self, items: &[BeerItem]);

    /// Reads the stored list. Missing or unreadable storage is empty.
    async fn load(&self) -> Vec<BeerItem>;

    /// Deletes the stored list.
    async fn clear(&self);

    /// Whether a non-empty file is present.
    async fn has_orders(&self) -> bool;
}

// =============================================================================
// JSON File Store
// =============================================================================

/// Order list stored as a pretty-printed JSON array.
#[derive(Debug, Clone)]
pub struct JsonFileOrderStore {
    path: PathBuf,
}

impl JsonFileOrderStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileOrderStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    async fn try_save(&self, items: &[BeerItem]) -> ClientResult<()> {
        let json = serde_json::to_vec_pretty(items)?;

        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let temp = self.temp_path();
        tokio::fs::write(&temp, json).await?;
        tokio::fs::rename(&temp, &self.path).await?;
        Ok(())
    }

    async fn try_load(&self) -> ClientResult<Vec<BeerItem>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ClientError::Io(e)),
        };
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }
        Ok(serde_json::from_slice(&bytes)?)
    }
}

#[async_trait]
impl OrderPersistence for JsonFileOrderStore {
    async fn save(&self, items: &[BeerItem]) {
        match self.try_save(items).await {
            Ok(()) => debug!(path = ?self.path, count = items.len(), "Saved orders"),
            Err(e) => warn!(path = ?self.path, error = %e, "Failed to save orders"),
        }
    }

    async fn load(&self) -> Vec<BeerItem> {
        match self.try_load().await {
            Ok(items) => {
                info!(path = ?self.path, count = items.len(), "Loaded saved orders");
                items
            }
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Failed to load orders, starting empty");
                Vec::new()
            }
        }
    }

    async fn clear(&self) {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => debug!(path = ?self.path, "Removed orders file"),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!(path = ?self.path, error = %e, "Failed to remove orders file"),
        }
    }

    async fn has_orders(&self) -> bool {
        tokio::fs::metadata(&self.path)
            .await
            .map(|m| m.is_file() && m.len() > 0)
            .unwrap_or(false)
    }
}

// =============================================================================
// Background Worker
// =============================================================================

#[derive(Debug)]
enum Command {
    Save(Vec<BeerItem>),
    Clear,
    Flush(oneshot::Sender<()>),
}

/// Applies queued persistence commands one at a time.
pub struct PersistenceWorker {
    persistence: Box<dyn OrderPersistence>,
    rx: mpsc::UnboundedReceiver<Command>,
}

/// Cheap, cloneable sender side of a [`PersistenceWorker`].
#[derive(Debug, Clone)]
pub struct PersistenceHandle {
    tx: mpsc::UnboundedSender<Command>,
}

impl PersistenceWorker {
    /// Creates a worker and its handle. Call [`run`](Self::run) on a task.
    pub fn new(persistence: impl OrderPersistence + 'static) -> (Self, PersistenceHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let worker = PersistenceWorker {
            persistence: Box::new(persistence),
            rx,
        };
        (worker, PersistenceHandle { tx })
    }

    /// Spawns the worker on the current runtime and returns its handle.
    pub fn spawn(persistence: impl OrderPersistence + 'static) -> PersistenceHandle {
        let (worker, handle) = Self::new(persistence);
        tokio::spawn(worker.run());
        handle
    }

    /// Runs until every handle has been dropped.
    pub async fn run(mut self) {
        debug!("Persistence worker started");
        while let Some(command) = self.rx.recv().await {
            match command {
                Command::Save(items) => self.persistence.save(&items).await,
                Command::Clear => self.persistence.clear().await,
                Command::Flush(done) => {
                    let _ = done.send(());
                }
            }
        }
        debug!("Persistence worker stopped");
    }
}

impl PersistenceHandle {
    /// Queues a full rewrite of the stored list.
    pub fn save(&self, items: Vec<BeerItem>) {
        if self.tx.send(Command::Save(items)).is_err() {
            warn!("Persistence worker is gone, order not saved");
        }
    }

    /// Queues deletion of the stored list.
    pub fn clear(&self) {
        if self.tx.send(Command::Clear).is_err() {
            warn!("Persistence worker is gone, orders file not removed");
        }
    }

    /// Waits until everything queued before this call has been applied.
    pub async fn flush(&self) -> ClientResult<()> {
        let (done_tx, done_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(done_tx))
            .map_err(|_| ClientError::WorkerStopped)?;
        done_rx.await.map_err(|_| ClientError::WorkerStopped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beer_core::Money;

    fn beers() -> Vec<BeerItem> {
        vec![
            BeerItem::new(1, "IPA Gold", Money::from_cents(500))
                .with_rating(4.5, 10)
                .with_image("https://img/1.png"),
            BeerItem::new(2, "Dark Stout", Money::from_cents(725)),
        ]
    }

    #[tokio::test]
    async fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("nested").join("orders.json"));

        store.save(&beers()).await;
        assert!(store.has_orders().await);
        assert_eq!(store.load().await, beers());
        assert!(!store.temp_path().exists());
    }

    #[tokio::test]
    async fn test_file_is_a_json_array_with_wire_prices() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));
        store.save(&beers()).await;

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value[0]["price"], "$5.00");
        assert_eq!(value[1]["name"], "Dark Stout");
    }

    #[tokio::test]
    async fn test_missing_and_garbage_files_load_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));
        assert!(store.load().await.is_empty());
        assert!(!store.has_orders().await);

        std::fs::write(store.path(), "][ not json").unwrap();
        assert!(store.load().await.is_empty());

        std::fs::write(store.path(), "").unwrap();
        assert!(!store.has_orders().await);
        assert!(store.load().await.is_empty());
    }

    #[tokio::test]
    async fn test_clear_removes_file_and_tolerates_absence() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileOrderStore::new(dir.path().join("orders.json"));

        store.clear().await;
        store.save(&beers()).await;
        store.clear().await;

        assert!(!store.path().exists());
        assert!(!store.has_orders().await);
    }

    #[tokio::test]
    async fn test_worker_applies_commands_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("orders.json");
        let handle = PersistenceWorker::spawn(JsonFileOrderStore::new(&path));

        let all = beers();
        handle.save(all[..1].to_vec());
        handle.save(all.clone());
        handle.flush().await.unwrap();
        assert_eq!(JsonFileOrderStore::new(&path).load().await, all);

        handle.save(Vec::new());
        handle.clear();
        handle.flush().await.unwrap();
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_flush_after_worker_exit_fails() {
        let dir = tempfile::tempdir().unwrap();
        let (worker, handle) = PersistenceWorker::new(JsonFileOrderStore::new(
            dir.path().join("orders.json"),
        ));
        drop(worker);

        assert!(matches!(
            handle.flush().await,
            Err(ClientError::WorkerStopped)
        ));
    }
}
