//! Star annotation sync engine
//!
//! One engine per open tree view. Mounting subscribes to the tree document;
//! every snapshot replaces the local star projection wholesale. Toggling a
//! star is a read-modify-write of the whole document:
//!
//! ```text
//! get(path) ──► negate stars[key] ──► project locally ──► set(path, doc')
//!    │
//!    └─ missing ──► SyncError::NotFound, no write
//! ```
//!
//! Two viewers toggling different stars can interleave between read and
//! write; the later write replaces the whole document, dropping the earlier
//! change. The subscription then brings every viewer back to what the store
//! holds.

use crate::document::{DocumentPath, StarMap};
use crate::error::SyncError;
use crate::store::{DocumentStore, Snapshot, SubscriptionGuard};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tos_content::StarKey;

/// Observable state of an engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// No live subscription
    Disconnected,
    /// Subscribed and idle
    Subscribed,
    /// Subscribed with at least one toggle in flight
    Toggling,
    /// Subscribed, but the last snapshot had no document
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Link {
    Disconnected,
    Live,
    Missing,
}

#[derive(Debug)]
struct Shared {
    path: DocumentPath,
    projection: watch::Sender<StarMap>,
    link: RwLock<Link>,
    in_flight: AtomicUsize,
}

impl Shared {
    fn apply(&self, snapshot: Snapshot) {
        if snapshot.exists() {
            *self.link.write() = Link::Live;
        } else {
            tracing::warn!(path = %self.path, "tree document missing from snapshot");
            *self.link.write() = Link::Missing;
        }
        let stars = snapshot.stars();
        tracing::trace!(path = %self.path, stars = stars.len(), "applied snapshot");
        self.projection.send_replace(stars);
    }

    fn project(&self, key: &StarKey, starred: bool) {
        self.projection.send_modify(|stars| stars.set(key, starred));
    }

    fn disconnect(&self) {
        *self.link.write() = Link::Disconnected;
    }
}

/// Counts a toggle as in flight until dropped
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Keeps the stars of one tree document in sync with the store
#[derive(Debug)]
pub struct AnnotationSyncEngine<S: DocumentStore + ?Sized> {
    store: Arc<S>,
    shared: Arc<Shared>,
    /// Released directly on teardown; the pump holds only the update stream
    guard: SubscriptionGuard,
    pump: Option<JoinHandle<()>>,
}

impl<S: DocumentStore + ?Sized> AnnotationSyncEngine<S> {
    /// Subscribe to the tree document at `path`
    ///
    /// Returns once the initial snapshot has been applied. Must be called
    /// inside a tokio runtime.
    ///
    /// # Errors
    /// - [`SyncError::Store`] if the subscription cannot be opened
    /// - [`SyncError::SubscriptionClosed`] if it ends before the first
    ///   snapshot; the listener is released in that case too
    pub async fn mount(store: Arc<S>, path: DocumentPath) -> Result<Self, SyncError> {
        let mut subscription = store.subscribe(&path).await?;
        let Some(initial) = subscription.next().await else {
            return Err(SyncError::SubscriptionClosed { path });
        };

        let (projection, _) = watch::channel(StarMap::new());
        let shared = Arc::new(Shared {
            path,
            projection,
            link: RwLock::new(Link::Disconnected),
            in_flight: AtomicUsize::new(0),
        });
        shared.apply(initial);
        tracing::info!(path = %shared.path, "mounted annotation sync");

        let (updates, guard) = subscription.into_parts();
        let pump = tokio::spawn(pump(updates, Arc::clone(&shared)));
        Ok(Self {
            store,
            shared,
            guard,
            pump: Some(pump),
        })
    }

    /// Flip the star for `key` and write the document back
    ///
    /// Returns the new star state.
    ///
    /// # Errors
    /// - [`SyncError::NotFound`] if the document does not exist; nothing is
    ///   written and the local projection is untouched
    /// - [`SyncError::Store`] if the read or write fails; the local
    ///   projection may be ahead of the store until the next snapshot
    pub async fn toggle_star(&self, key: &StarKey) -> Result<bool, SyncError> {
        let _in_flight = InFlight::enter(&self.shared.in_flight);
        let path = &self.shared.path;

        let Some(document) = self.store.get(path).await? else {
            tracing::warn!(%path, "toggle on missing tree document");
            return Err(SyncError::NotFound { path: path.clone() });
        };

        let starred = !document.stars().is_starred(key);
        self.shared.project(key, starred);

        let updated = document.with_star(key, starred);
        if let Err(err) = self.store.set(path, updated).await {
            tracing::warn!(%path, key = %key, error = %err, "star write failed");
            return Err(err.into());
        }

        tracing::debug!(%path, key = %key, starred, "toggled star");
        Ok(starred)
    }

    /// Local projection of the stars
    #[must_use]
    pub fn stars(&self) -> StarMap {
        self.shared.projection.borrow().clone()
    }

    #[must_use]
    pub fn is_starred(&self, key: &StarKey) -> bool {
        self.shared.projection.borrow().is_starred(key)
    }

    /// Watch the local projection
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<StarMap> {
        self.shared.projection.subscribe()
    }

    #[must_use]
    pub fn status(&self) -> SyncStatus {
        match *self.shared.link.read() {
            Link::Disconnected => SyncStatus::Disconnected,
            Link::Missing => SyncStatus::Missing,
            Link::Live if self.shared.in_flight.load(Ordering::SeqCst) > 0 => SyncStatus::Toggling,
            Link::Live => SyncStatus::Subscribed,
        }
    }

    #[inline]
    #[must_use]
    pub fn path(&self) -> &DocumentPath {
        &self.shared.path
    }

    /// Tear down the view: release the subscription and stop the pump
    ///
    /// The listener is released before the first suspension point.
    pub async fn unmount(mut self) {
        self.guard.release();
        if let Some(pump) = self.pump.take() {
            pump.abort();
            // Cancelled is the expected outcome.
            let _ = pump.await;
        }
        self.shared.disconnect();
        tracing::info!(path = %self.shared.path, "unmounted annotation sync");
    }
}

impl<S: DocumentStore + ?Sized> Drop for AnnotationSyncEngine<S> {
    fn drop(&mut self) {
        self.guard.release();
        if let Some(pump) = self.pump.take() {
            pump.abort();
            self.shared.disconnect();
        }
    }
}

async fn pump(mut updates: mpsc::UnboundedReceiver<Snapshot>, shared: Arc<Shared>) {
    while let Some(snapshot) = updates.recv().await {
        shared.apply(snapshot);
    }
    tracing::debug!(path = %shared.path, "subscription ended");
    shared.disconnect();
}
