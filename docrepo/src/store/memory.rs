use parking_lot::RwLock;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::common::{Document, Value};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::{matches, Criteria};
use crate::index::IndexSpec;
use crate::store::{
    CollectionProvider, DocumentCollection, DocumentStore, FindOptions, StoreProvider,
    UpdateOptions, UpdateResult,
};

/// An in-memory document store.
///
/// Keeps every collection in process memory behind read-write locks and
/// evaluates criteria with the bundled matcher. Intended as the reference
/// backend for tests and examples; clones share the same underlying state.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::store::{DocumentStore, MemoryStore};
///
/// let store = DocumentStore::new(MemoryStore::new());
/// let collection = store.collection("users")?;
/// ```
#[derive(Clone, Default)]
pub struct MemoryStore {
    collections: Arc<RwLock<HashMap<String, MemoryCollection>>>,
}

impl MemoryStore {
    pub fn new() -> MemoryStore {
        MemoryStore::default()
    }

    /// Creates a store handle backed by a fresh memory store.
    pub fn open() -> DocumentStore {
        DocumentStore::new(MemoryStore::new())
    }
}

impl StoreProvider for MemoryStore {
    fn collection(&self, name: &str) -> RepoResult<DocumentCollection> {
        let collection = {
            let mut collections = self.collections.write();
            collections
                .entry(name.to_string())
                .or_insert_with(|| MemoryCollection::new(name))
                .clone()
        };
        Ok(DocumentCollection::new(collection))
    }
}

#[derive(Clone)]
struct MemoryCollection {
    inner: Arc<MemoryCollectionInner>,
}

struct MemoryCollectionInner {
    name: String,
    documents: RwLock<Vec<Document>>,
    indexes: RwLock<Vec<IndexSpec>>,
}

impl MemoryCollection {
    fn new(name: &str) -> MemoryCollection {
        MemoryCollection {
            inner: Arc::new(MemoryCollectionInner {
                name: name.to_string(),
                documents: RwLock::new(Vec::new()),
                indexes: RwLock::new(Vec::new()),
            }),
        }
    }
}

/// Total order over field values for sorting: null sorts before everything,
/// incomparable values keep their relative order.
fn order_values(a: &Value, b: &Value) -> Ordering {
    match a.compare(b) {
        Some(ordering) => ordering,
        None => match (a.is_null(), b.is_null()) {
            (true, true) => Ordering::Equal,
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => Ordering::Equal,
        },
    }
}

/// Sorts documents by a list of directives, first directive first.
fn sort_documents(documents: &mut [Document], directives: &[String]) {
    if directives.is_empty() {
        return;
    }

    documents.sort_by(|a, b| {
        for directive in directives {
            let (field, descending) = match directive.strip_prefix('-') {
                Some(field) => (field, true),
                None => (directive.as_str(), false),
            };

            let left = a.get(field).unwrap_or(&Value::Null);
            let right = b.get(field).unwrap_or(&Value::Null);

            let ordering = order_values(left, right);
            let ordering = if descending { ordering.reverse() } else { ordering };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

/// Applies an update document: a `$set` entry merges fields, anything else
/// replaces the document wholesale.
fn apply_update(target: &mut Document, update: &Document) {
    match update.get("$set").and_then(Value::as_document) {
        Some(fields) => {
            for (key, value) in fields.iter() {
                target.put(key.clone(), value.clone());
            }
        }
        None => {
            *target = update.clone();
        }
    }
}

/// Builds the document inserted by an upsert: the criteria's equality
/// fields as the base, with the update applied on top.
fn upsert_document(criteria: &Criteria, update: &Document) -> Document {
    let mut base = Document::new();
    for (key, value) in criteria.as_document().iter() {
        if key.starts_with('$') {
            continue;
        }
        match value {
            Value::Document(clause) => {
                if let Some(eq) = clause.get("$eq") {
                    base.put(key.clone(), eq.clone());
                }
            }
            direct => {
                base.put(key.clone(), direct.clone());
            }
        }
    }
    apply_update(&mut base, update);
    base
}

impl CollectionProvider for MemoryCollection {
    fn name(&self) -> String {
        self.inner.name.clone()
    }

    fn find(&self, criteria: &Criteria, options: &FindOptions) -> RepoResult<Vec<Document>> {
        let documents = self.inner.documents.read();
        let mut matched = Vec::new();
        for document in documents.iter() {
            if matches(criteria, document)? {
                matched.push(document.clone());
            }
        }
        drop(documents);

        sort_documents(&mut matched, options.sort_directives());

        let skip = options.skip_value().unwrap_or(0) as usize;
        let matched: Vec<Document> = match options.limit_value() {
            Some(limit) => matched.into_iter().skip(skip).take(limit as usize).collect(),
            None => matched.into_iter().skip(skip).collect(),
        };
        Ok(matched)
    }

    fn find_one(&self, criteria: &Criteria) -> RepoResult<Option<Document>> {
        let documents = self.inner.documents.read();
        for document in documents.iter() {
            if matches(criteria, document)? {
                return Ok(Some(document.clone()));
            }
        }
        Ok(None)
    }

    fn count(&self, criteria: &Criteria) -> RepoResult<i64> {
        let documents = self.inner.documents.read();
        let mut count = 0;
        for document in documents.iter() {
            if matches(criteria, document)? {
                count += 1;
            }
        }
        Ok(count)
    }

    fn insert(&self, document: Document) -> RepoResult<()> {
        self.inner.documents.write().push(document);
        Ok(())
    }

    fn update(
        &self,
        criteria: &Criteria,
        update: &Document,
        options: &UpdateOptions,
    ) -> RepoResult<UpdateResult> {
        let mut documents = self.inner.documents.write();

        let mut matched_indices = Vec::new();
        for (index, document) in documents.iter().enumerate() {
            if matches(criteria, document)? {
                matched_indices.push(index);
                if !options.is_multi() {
                    break;
                }
            }
        }

        if matched_indices.is_empty() {
            if options.is_upsert() {
                let inserted = upsert_document(criteria, update);
                documents.push(inserted.clone());
                return Ok(UpdateResult {
                    matched: 0,
                    modified: 0,
                    upserted: true,
                    document: options.is_return_new().then_some(inserted),
                });
            }
            return Ok(UpdateResult::default());
        }

        let mut first_updated = None;
        for &index in &matched_indices {
            apply_update(&mut documents[index], update);
            if first_updated.is_none() {
                first_updated = Some(documents[index].clone());
            }
        }

        let modified = matched_indices.len() as i64;
        Ok(UpdateResult {
            matched: modified,
            modified,
            upserted: false,
            document: if options.is_return_new() {
                first_updated
            } else {
                None
            },
        })
    }

    fn remove(&self, criteria: &Criteria) -> RepoResult<i64> {
        let mut documents = self.inner.documents.write();
        let mut kept = Vec::with_capacity(documents.len());
        let mut removed = 0;
        for document in documents.drain(..) {
            if matches(criteria, &document)? {
                removed += 1;
            } else {
                kept.push(document);
            }
        }
        *documents = kept;
        Ok(removed)
    }

    fn ensure_index(&self, spec: &IndexSpec) -> RepoResult<()> {
        let mut indexes = self.inner.indexes.write();
        if let Some(existing) = indexes.iter().find(|i| i.key() == spec.key()) {
            if existing != spec {
                log::error!(
                    "Index on {:?} already exists with different options in [{}]",
                    spec.key(),
                    self.inner.name
                );
                return Err(RepoError::new(
                    &format!("Index on {:?} already exists with different options", spec.key()),
                    ErrorKind::IndexingError,
                ));
            }
            return Ok(());
        }
        indexes.push(spec.clone());
        Ok(())
    }
}

impl MemoryCollection {
    /// The index specs ensured so far, in creation order.
    #[cfg(test)]
    fn ensured_indexes(&self) -> Vec<IndexSpec> {
        self.inner.indexes.read().clone()
    }
}
