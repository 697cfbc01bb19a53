use std::ops::Deref;
use std::sync::Arc;

use crate::common::Document;
use crate::errors::RepoResult;
use crate::filter::Criteria;
use crate::index::IndexSpec;
use crate::store::{FindOptions, UpdateOptions, UpdateResult};

/// Trait for implementing a document-store backend.
///
/// A `StoreProvider` hands out collection handles by name. Handing out a
/// handle is the backend's chance to acquire whatever scoped resource it
/// needs (a pooled session, a namespace binding); the handle releases that
/// resource when dropped, so every repository operation holds it only for
/// the duration of one call.
pub trait StoreProvider: Send + Sync {
    /// Opens a handle to the named collection.
    fn collection(&self, name: &str) -> RepoResult<DocumentCollection>;
}

/// A handle to a document store.
///
/// Wraps a [StoreProvider] implementation behind an [Arc], so the handle is
/// cheap to clone and share.
#[derive(Clone)]
pub struct DocumentStore {
    inner: Arc<dyn StoreProvider>,
}

impl DocumentStore {
    /// Creates a new store handle from a provider implementation.
    pub fn new<T: StoreProvider + 'static>(inner: T) -> Self {
        DocumentStore {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for DocumentStore {
    type Target = Arc<dyn StoreProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Trait for implementing operations on one collection of a store.
///
/// All methods take a [Criteria] where filtering applies; backends execute
/// it natively. Errors from the backend surface verbatim, the toolkit adds
/// no retry or translation.
pub trait CollectionProvider: Send + Sync {
    /// The collection's name.
    fn name(&self) -> String;

    /// Finds documents matching the criteria, honoring skip, limit, and
    /// sort directives from the options.
    fn find(&self, criteria: &Criteria, options: &FindOptions) -> RepoResult<Vec<Document>>;

    /// Finds the first document matching the criteria.
    fn find_one(&self, criteria: &Criteria) -> RepoResult<Option<Document>>;

    /// Counts documents matching the criteria.
    fn count(&self, criteria: &Criteria) -> RepoResult<i64>;

    /// Inserts a document.
    fn insert(&self, document: Document) -> RepoResult<()>;

    /// Updates documents matching the criteria.
    ///
    /// The update document either carries a `$set` entry with the fields to
    /// merge, or replaces the matched document wholesale.
    fn update(
        &self,
        criteria: &Criteria,
        update: &Document,
        options: &UpdateOptions,
    ) -> RepoResult<UpdateResult>;

    /// Removes documents matching the criteria, returning how many were
    /// removed.
    fn remove(&self, criteria: &Criteria) -> RepoResult<i64>;

    /// Creates the described index if it does not already exist.
    fn ensure_index(&self, spec: &IndexSpec) -> RepoResult<()>;
}

/// A handle to one collection of a document store.
///
/// Wraps a [CollectionProvider] implementation behind an [Arc]. Dropping
/// the handle releases whatever scoped resource the backend tied to it.
#[derive(Clone)]
pub struct DocumentCollection {
    inner: Arc<dyn CollectionProvider>,
}

impl DocumentCollection {
    /// Creates a new collection handle from a provider implementation.
    pub fn new<T: CollectionProvider + 'static>(inner: T) -> Self {
        DocumentCollection {
            inner: Arc::new(inner),
        }
    }
}

impl Deref for DocumentCollection {
    type Target = Arc<dyn CollectionProvider>;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}
