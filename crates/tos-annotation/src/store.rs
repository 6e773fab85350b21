//! Abstract document store
//!
//! The remote store is an external collaborator. The engine needs three
//! things from it: point reads, whole-document writes, and a live
//! subscription that delivers the current document once on subscribe and
//! again after every change, in order.

use crate::document::{DocumentPath, StarMap, TreeDocument};
use crate::error::StoreError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::fmt;
use tokio::sync::mpsc;

/// Key-addressed document store
#[async_trait]
pub trait DocumentStore: Send + Sync + 'static {
    /// Point read; `Ok(None)` when no document exists at `path`
    async fn get(&self, path: &DocumentPath) -> Result<Option<TreeDocument>, StoreError>;

    /// Whole-document overwrite
    async fn set(&self, path: &DocumentPath, document: TreeDocument) -> Result<(), StoreError>;

    /// Live subscription to `path`
    ///
    /// The first snapshot carries the current document. Dropping the
    /// returned [`Subscription`] releases the listener.
    async fn subscribe(&self, path: &DocumentPath) -> Result<Subscription, StoreError>;
}

/// State of a document as delivered by a subscription
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    document: Option<TreeDocument>,
}

impl Snapshot {
    #[inline]
    #[must_use]
    pub fn new(document: Option<TreeDocument>) -> Self {
        Self { document }
    }

    /// Snapshot of a path with no document
    #[inline]
    #[must_use]
    pub fn missing() -> Self {
        Self { document: None }
    }

    #[inline]
    #[must_use]
    pub fn exists(&self) -> bool {
        self.document.is_some()
    }

    #[inline]
    #[must_use]
    pub fn document(&self) -> Option<&TreeDocument> {
        self.document.as_ref()
    }

    /// Stars in the document, empty when missing
    #[must_use]
    pub fn stars(&self) -> StarMap {
        self.document
            .as_ref()
            .map(TreeDocument::stars)
            .unwrap_or_default()
    }
}

type Cancel = Box<dyn FnOnce() + Send>;

/// Releases a store listener exactly once: on
/// [`release`](SubscriptionGuard::release) or on drop, whichever comes first
pub struct SubscriptionGuard {
    cancel: Mutex<Option<Cancel>>,
}

impl SubscriptionGuard {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Mutex::new(Some(Box::new(cancel))),
        }
    }

    /// Release the listener now; later calls do nothing
    pub fn release(&self) {
        let cancel = self.cancel.lock().take();
        if let Some(cancel) = cancel {
            cancel();
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.cancel.lock().is_some()
    }
}

impl Drop for SubscriptionGuard {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for SubscriptionGuard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriptionGuard")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Handle to a live subscription
///
/// Dropping it releases the listener. [`into_parts`](Self::into_parts)
/// separates the update stream from the release guard so the two can live
/// in different owners.
#[derive(Debug)]
pub struct Subscription {
    updates: mpsc::UnboundedReceiver<Snapshot>,
    guard: SubscriptionGuard,
}

impl Subscription {
    /// Build a subscription from an update channel and a release hook
    pub fn new(
        updates: mpsc::UnboundedReceiver<Snapshot>,
        cancel: impl FnOnce() + Send + 'static,
    ) -> Self {
        Self {
            updates,
            guard: SubscriptionGuard::new(cancel),
        }
    }

    /// Next snapshot; `None` once the store stops delivering
    pub async fn next(&mut self) -> Option<Snapshot> {
        self.updates.recv().await
    }

    /// Release the listener now
    pub fn unsubscribe(self) {
        self.guard.release();
    }

    /// Update stream and release guard
    #[must_use]
    pub fn into_parts(self) -> (mpsc::UnboundedReceiver<Snapshot>, SubscriptionGuard) {
        (self.updates, self.guard)
    }
}
