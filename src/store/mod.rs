//! Persistence of the single application document.
//!
//! Every request loads the whole [`Document`], works on an owned copy and,
//! for mutations, writes the whole thing back. [`Db`] serializes those
//! read-modify-write cycles so concurrent writers cannot lose each other's
//! updates.

mod file;
mod memory;

use std::{path::PathBuf, sync::Arc};

use tokio::sync::Mutex;

use crate::{model::Document, AppResult};

pub use file::JsonFileStore;
pub use memory::MemoryStore;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed document {path:?}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage task failed: {0}")]
    Task(String),
}

/// Backing storage for the document. Both calls block.
pub trait DocumentStore: Send + Sync + 'static {
    fn load(&self) -> Result<Document, StoreError>;
    fn save(&self, document: &Document) -> Result<(), StoreError>;
}

#[derive(Clone)]
pub struct Db {
    store: Arc<dyn DocumentStore>,
    writer: Arc<Mutex<()>>,
}

impl Db {
    pub fn new(store: impl DocumentStore) -> Self {
        Self {
            store: Arc::new(store),
            writer: Arc::new(Mutex::new(())),
        }
    }

    /// Snapshot of the current document, for requests that only read.
    pub async fn load(&self) -> Result<Document, StoreError> {
        let store = self.store.clone();
        tokio::task::spawn_blocking(move || store.load())
            .await
            .map_err(|err| StoreError::Task(err.to_string()))?
    }

    /// Load, apply `f` and save, holding the write lock throughout.
    /// Nothing is written when `f` fails.
    ///
    /// The lock guard moves into the blocking save, so a caller dropped
    /// mid-save still keeps the next writer out until the file is written.
    pub async fn write<T, F>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut Document) -> AppResult<T> + Send,
        T: Send,
    {
        let guard = self.writer.clone().lock_owned().await;

        let mut document = self.load().await?;
        let out = f(&mut document)?;

        let store = self.store.clone();
        tokio::task::spawn_blocking(move || {
            let _guard = guard;
            store.save(&document)
        })
        .await
        .map_err(|err| StoreError::Task(err.to_string()))??;

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{model::Channel, AppError};
    use std::{
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::Duration,
    };

    /// Saves take a while and record how many ran at once.
    #[derive(Default)]
    struct SlowStore {
        inner: MemoryStore,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl DocumentStore for SlowStore {
        fn load(&self) -> Result<Document, StoreError> {
            self.inner.load()
        }

        fn save(&self, document: &Document) -> Result<(), StoreError> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            thread::sleep(Duration::from_millis(300));
            let result = self.inner.save(document);
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            result
        }
    }

    fn channel(id: &str) -> Channel {
        Channel {
            id: id.into(),
            name: id.into(),
            owner: None,
            messages: vec![],
        }
    }

    #[tokio::test]
    async fn write_persists_on_success() {
        let db = Db::new(MemoryStore::default());

        let count = db
            .write(|doc| {
                doc.channels.push(channel("general"));
                Ok(doc.channels.len())
            })
            .await
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(db.load().await.unwrap().channels, vec![channel("general")]);
    }

    #[tokio::test]
    async fn write_discards_changes_on_error() {
        let db = Db::new(MemoryStore::default());

        let result: AppResult<()> = db
            .write(|doc| {
                doc.channels.push(channel("general"));
                Err(AppError::BadRequest("nope".into()))
            })
            .await;

        assert!(matches!(result, Err(AppError::BadRequest(_))));
        assert!(db.load().await.unwrap().channels.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_do_not_lose_updates() {
        let db = Db::new(MemoryStore::default());

        let tasks: Vec<_> = (0..32)
            .map(|i| {
                let db = db.clone();
                tokio::spawn(async move {
                    db.write(move |doc| {
                        doc.channels.push(channel(&format!("c{i}")));
                        Ok(())
                    })
                    .await
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap().unwrap();
        }

        assert_eq!(db.load().await.unwrap().channels.len(), 32);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn cancelled_writer_keeps_lock_until_saved() {
        let store = Arc::new(SlowStore::default());
        let db = Db {
            store: store.clone(),
            writer: Arc::new(Mutex::new(())),
        };

        let first = {
            let db = db.clone();
            tokio::spawn(async move {
                db.write(|doc| {
                    doc.channels.push(channel("a"));
                    Ok(())
                })
                .await
            })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        first.abort();

        db.write(|doc| {
            doc.channels.push(channel("b"));
            Ok(())
        })
        .await
        .unwrap();

        let ids: Vec<_> = db.load().await.unwrap().channels.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, ["a", "b"]);
        assert_eq!(store.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
