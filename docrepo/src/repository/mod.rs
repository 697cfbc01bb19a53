//! Generic repository over a document store.
//!
//! A [Model] describes how a domain type is persisted: its collection, its
//! unique-key predicate, and any indexes it wants. The [Repository]
//! composes the criteria builder and page-query normalizer with a
//! [crate::store::DocumentStore] handle, exposing typed CRUD, paging, and
//! index management.

mod model;
mod repository;

pub use model::*;
pub use repository::*;
