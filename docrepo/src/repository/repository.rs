use crate::common::{Document, Value};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::Criteria;
use crate::meta::{checked_update_document, model_info};
use crate::query::{parse_page_query, PageQuery};
use crate::repository::Model;
use crate::store::{DocumentCollection, DocumentStore, FindOptions, UpdateOptions, UpdateResult};

/// One page of typed results.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResult<M> {
    /// The page's items, in sort order.
    pub items: Vec<M>,
    /// Total number of documents matching the criteria across all pages.
    pub total: i64,
    /// The normalized page number the items belong to.
    pub page_no: i64,
    /// The normalized page size used for the query.
    pub page_size: i32,
}

/// A generic repository over a document store.
///
/// All operations are synchronous calls on the caller's thread. Each one
/// acquires a collection handle from the store, executes, and drops the
/// handle on every exit path; no state is kept between operations. Errors
/// from the store surface unchanged, with no retries.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::repository::Repository;
/// use docrepo::store::MemoryStore;
///
/// let repository = Repository::new(MemoryStore::open());
/// repository.insert(&user)?;
/// let found = repository.find_one(&user)?;
/// ```
#[derive(Clone)]
pub struct Repository {
    store: DocumentStore,
}

impl Repository {
    /// Creates a repository over the given store handle.
    pub fn new(store: DocumentStore) -> Repository {
        Repository { store }
    }

    /// The underlying store handle.
    pub fn store(&self) -> &DocumentStore {
        &self.store
    }

    /// Runs an operation against the model's collection.
    ///
    /// The collection handle lives for the duration of the closure only, so
    /// whatever scoped resource the backend tied to it is released whether
    /// the operation succeeds or fails.
    fn execute<M: Model, R>(
        &self,
        model: &M,
        operation: impl FnOnce(&DocumentCollection) -> RepoResult<R>,
    ) -> RepoResult<R> {
        let collection = self.store.collection(&model.collection_name())?;
        operation(&collection)
    }

    /// Inserts the model's document into its collection.
    pub fn insert<M: Model>(&self, model: &M) -> RepoResult<()> {
        let document = to_document(model)?;
        self.execute(model, |collection| collection.insert(document))
    }

    /// Replaces the document matching the model's unique key and returns
    /// the stored state read back as a new model value.
    ///
    /// # Errors
    ///
    /// [ErrorKind::NotFound] when no document matches the unique key.
    pub fn update<M: Model>(&self, model: &M) -> RepoResult<M> {
        let document = to_document(model)?;
        self.execute(model, |collection| {
            let mut update = Document::new();
            update.put("$set", Value::Document(document));

            let result = collection.update(
                &model.unique_criteria(),
                &update,
                &UpdateOptions::new().return_new(),
            )?;

            match result.document {
                Some(stored) => M::from_value(&Value::Document(stored)),
                None => Err(RepoError::new(
                    "No document matched the unique key",
                    ErrorKind::NotFound,
                )),
            }
        })
    }

    /// Applies a partial update from an explicit field map.
    ///
    /// The map bypasses the criteria builder but not validation: every key
    /// must name a persisted field of the model and every value must match
    /// the field's recorded type.
    ///
    /// # Errors
    ///
    /// [ErrorKind::ValidationError] for an unknown field or a mismatched
    /// value type, [ErrorKind::NotFound] when no document matches the
    /// unique key.
    pub fn update_selective<M: Model>(&self, model: &M, data: &Document) -> RepoResult<()> {
        let info = model_info(model)?;
        let checked = checked_update_document(&info, data)?;

        self.execute(model, |collection| {
            let mut update = Document::new();
            update.put("$set", Value::Document(checked));

            let result =
                collection.update(&model.unique_criteria(), &update, &UpdateOptions::new())?;
            if result.matched == 0 {
                return Err(RepoError::new(
                    "No document matched the unique key",
                    ErrorKind::NotFound,
                ));
            }
            Ok(())
        })
    }

    /// Replaces the document matching the model's unique key, inserting it
    /// when absent.
    pub fn upsert<M: Model>(&self, model: &M) -> RepoResult<UpdateResult> {
        let document = to_document(model)?;
        self.execute(model, |collection| {
            let mut update = Document::new();
            update.put("$set", Value::Document(document));

            collection.update(
                &model.unique_criteria(),
                &update,
                &UpdateOptions::new().upsert(),
            )
        })
    }

    /// Finds the document matching the model's unique key.
    ///
    /// # Errors
    ///
    /// [ErrorKind::NotFound] when no document matches.
    pub fn find_one<M: Model>(&self, model: &M) -> RepoResult<M> {
        self.execute(model, |collection| {
            match collection.find_one(&model.unique_criteria())? {
                Some(document) => M::from_value(&Value::Document(document)),
                None => Err(RepoError::new(
                    "No document matched the unique key",
                    ErrorKind::NotFound,
                )),
            }
        })
    }

    /// Deletes the document matching the model's unique key.
    ///
    /// # Errors
    ///
    /// [ErrorKind::NotFound] when no document matches.
    pub fn delete<M: Model>(&self, model: &M) -> RepoResult<()> {
        self.execute(model, |collection| {
            let removed = collection.remove(&model.unique_criteria())?;
            if removed == 0 {
                return Err(RepoError::new(
                    "No document matched the unique key",
                    ErrorKind::NotFound,
                ));
            }
            Ok(())
        })
    }

    /// Counts all documents in the model's collection.
    pub fn count<M: Model>(&self, model: &M) -> RepoResult<i64> {
        self.execute(model, |collection| collection.count(&Criteria::empty()))
    }

    /// Fetches every document in the model's collection.
    pub fn all<M: Model>(&self, model: &M) -> RepoResult<Vec<M>> {
        self.execute(model, |collection| {
            let documents = collection.find(&Criteria::empty(), &FindOptions::new())?;
            from_documents(documents)
        })
    }

    /// Runs a paged query against the model's collection.
    ///
    /// The query is normalized first: filters translate through the
    /// criteria builder, paging values are clamped, and sort entries become
    /// backend directives. Returns the page's items together with the total
    /// match count and the normalized paging values.
    pub fn page<M: Model>(&self, model: &M, query: &PageQuery) -> RepoResult<PageResult<M>> {
        let paged = parse_page_query(model, query)?;

        self.execute(model, |collection| {
            let total = collection.count(&paged.criteria)?;

            let options = FindOptions::new()
                .skip(paged.offset() as u64)
                .limit(paged.page_size as u64)
                .sort(paged.sort.clone());
            let documents = collection.find(&paged.criteria, &options)?;

            Ok(PageResult {
                items: from_documents(documents)?,
                total,
                page_no: paged.page_no,
                page_size: paged.page_size,
            })
        })
    }

    /// Forwards the model's index definitions to the store.
    ///
    /// Specs are created in declaration order; the first failure aborts the
    /// remainder.
    pub fn ensure_indexes<M: Model>(&self, model: &M) -> RepoResult<()> {
        self.execute(model, |collection| {
            for spec in model.indexes() {
                collection.ensure_index(&spec)?;
            }
            Ok(())
        })
    }
}

/// Converts a model into its persisted document.
fn to_document<M: Model>(model: &M) -> RepoResult<Document> {
    match model.to_value()? {
        Value::Document(document) => Ok(document),
        other => {
            log::error!("Model converted to {} instead of a document", other);
            Err(RepoError::new(
                "Model does not convert to a document",
                ErrorKind::InvalidArgument,
            ))
        }
    }
}

/// Converts stored documents back into model values.
fn from_documents<M: Model>(documents: Vec<Document>) -> RepoResult<Vec<M>> {
    let mut items = Vec::with_capacity(documents.len());
    for document in documents {
        items.push(M::from_value(&Value::Document(document))?);
    }
    Ok(items)
}
