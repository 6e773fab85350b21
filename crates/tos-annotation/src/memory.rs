//! In-process document store
//!
//! [`MemoryDocumentStore`] keeps documents in a map and fans writes out to
//! subscribers while holding its lock, so every subscriber sees writes to a
//! path in the order they were applied.

use crate::document::{DocumentPath, TreeDocument};
use crate::error::StoreError;
use crate::store::{DocumentStore, Snapshot, Subscription};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Weak};
use tokio::sync::mpsc;

type Listener = (u64, mpsc::UnboundedSender<Snapshot>);

#[derive(Debug, Default)]
struct State {
    documents: HashMap<DocumentPath, TreeDocument>,
    listeners: HashMap<DocumentPath, Vec<Listener>>,
}

impl State {
    fn notify(&mut self, path: &DocumentPath) {
        let snapshot = Snapshot::new(self.documents.get(path).cloned());
        if let Some(listeners) = self.listeners.get_mut(path) {
            listeners.retain(|(_, tx)| tx.send(snapshot.clone()).is_ok());
        }
    }
}

#[derive(Debug, Default)]
struct Inner {
    state: Mutex<State>,
    next_listener: AtomicU64,
    reads: AtomicUsize,
    writes: AtomicUsize,
}

/// Shared in-memory store; clones share the same documents
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentStore {
    inner: Arc<Inner>,
}

impl MemoryDocumentStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with one document already present
    #[must_use]
    pub fn with_document(path: DocumentPath, document: TreeDocument) -> Self {
        let store = Self::new();
        store.inner.state.lock().documents.insert(path, document);
        store
    }

    /// Current document at `path`, without counting as a read
    #[must_use]
    pub fn peek(&self, path: &DocumentPath) -> Option<TreeDocument> {
        self.inner.state.lock().documents.get(path).cloned()
    }

    /// Delete the document at `path` and notify subscribers
    pub fn delete(&self, path: &DocumentPath) -> Option<TreeDocument> {
        let mut state = self.inner.state.lock();
        let removed = state.documents.remove(path);
        if removed.is_some() {
            state.notify(path);
        }
        removed
    }

    /// Live listeners on `path`
    #[must_use]
    pub fn listener_count(&self, path: &DocumentPath) -> usize {
        self.inner
            .state
            .lock()
            .listeners
            .get(path)
            .map_or(0, Vec::len)
    }

    /// Point reads served so far
    #[must_use]
    pub fn read_count(&self) -> usize {
        self.inner.reads.load(Ordering::SeqCst)
    }

    /// Writes applied so far
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.inner.writes.load(Ordering::SeqCst)
    }

    fn release(inner: &Weak<Inner>, path: &DocumentPath, id: u64) {
        let Some(inner) = inner.upgrade() else {
            return;
        };
        let mut state = inner.state.lock();
        if let Some(listeners) = state.listeners.get_mut(path) {
            listeners.retain(|(listener, _)| *listener != id);
            if listeners.is_empty() {
                state.listeners.remove(path);
            }
        }
        tracing::trace!(%path, listener = id, "listener released");
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn get(&self, path: &DocumentPath) -> Result<Option<TreeDocument>, StoreError> {
        self.inner.reads.fetch_add(1, Ordering::SeqCst);
        Ok(self.peek(path))
    }

    async fn set(&self, path: &DocumentPath, document: TreeDocument) -> Result<(), StoreError> {
        let mut state = self.inner.state.lock();
        state.documents.insert(path.clone(), document);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        state.notify(path);
        Ok(())
    }

    async fn subscribe(&self, path: &DocumentPath) -> Result<Subscription, StoreError> {
        let (tx, rx) = mpsc::unbounded_channel();
        let id = self.inner.next_listener.fetch_add(1, Ordering::Relaxed);

        {
            let mut state = self.inner.state.lock();
            let initial = Snapshot::new(state.documents.get(path).cloned());
            // Receiver is alive in this scope.
            let _ = tx.send(initial);
            state.listeners.entry(path.clone()).or_default().push((id, tx));
        }

        let inner = Arc::downgrade(&self.inner);
        let path = path.clone();
        Ok(Subscription::new(rx, move || Self::release(&inner, &path, id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path() -> DocumentPath {
        DocumentPath::new("trees/t1").unwrap()
    }

    fn doc(value: serde_json::Value) -> TreeDocument {
        TreeDocument::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn get_missing_is_none() {
        let store = MemoryDocumentStore::new();
        assert!(store.get(&path()).await.unwrap().is_none());
        assert_eq!(store.read_count(), 1);
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryDocumentStore::new();
        store.set(&path(), doc(json!({"a": 1}))).await.unwrap();
        assert_eq!(store.get(&path()).await.unwrap(), Some(doc(json!({"a": 1}))));
        assert_eq!(store.write_count(), 1);
    }

    #[tokio::test]
    async fn subscribe_delivers_current_then_changes() {
        let store = MemoryDocumentStore::with_document(path(), doc(json!({"v": 1})));
        let mut sub = store.subscribe(&path()).await.unwrap();

        let first = sub.next().await.unwrap();
        assert_eq!(first.document().unwrap().get("v"), Some(&json!(1)));

        store.set(&path(), doc(json!({"v": 2}))).await.unwrap();
        store.set(&path(), doc(json!({"v": 3}))).await.unwrap();
        assert_eq!(sub.next().await.unwrap().document().unwrap().get("v"), Some(&json!(2)));
        assert_eq!(sub.next().await.unwrap().document().unwrap().get("v"), Some(&json!(3)));
    }

    #[tokio::test]
    async fn subscribe_to_missing_delivers_missing() {
        let store = MemoryDocumentStore::new();
        let mut sub = store.subscribe(&path()).await.unwrap();
        assert!(!sub.next().await.unwrap().exists());
    }

    #[tokio::test]
    async fn drop_releases_listener() {
        let store = MemoryDocumentStore::new();
        let sub = store.subscribe(&path()).await.unwrap();
        assert_eq!(store.listener_count(&path()), 1);
        drop(sub);
        assert_eq!(store.listener_count(&path()), 0);
    }

    #[tokio::test]
    async fn delete_notifies_missing() {
        let store = MemoryDocumentStore::with_document(path(), TreeDocument::new());
        let mut sub = store.subscribe(&path()).await.unwrap();
        assert!(sub.next().await.unwrap().exists());

        assert!(store.delete(&path()).is_some());
        assert!(!sub.next().await.unwrap().exists());
    }

    #[tokio::test]
    async fn other_paths_are_not_notified() {
        let store = MemoryDocumentStore::new();
        let mut sub = store.subscribe(&path()).await.unwrap();
        sub.next().await.unwrap();

        let other = DocumentPath::new("trees/t2").unwrap();
        store.set(&other, TreeDocument::new()).await.unwrap();
        store.set(&path(), TreeDocument::new()).await.unwrap();

        // The next delivery is the write to our own path.
        assert!(sub.next().await.unwrap().exists());
    }
}
