//! # DocRepo - Document-Store Repository Toolkit
//!
//! DocRepo is a small persistence-access toolkit for document stores. It
//! provides a generic repository (CRUD, upsert, paging, index forwarding)
//! on top of a pluggable store backend, together with a dynamic filter
//! translator and page-query normalizer.
//!
//! ## Key Features
//!
//! - **Generic Repository**: typed CRUD, upsert, find-one, and paged
//!   queries for any [repository::Model]
//! - **Dynamic Filters**: nested boolean filter expressions translated into
//!   backend-native criteria
//! - **Field Metadata**: per-type persisted-field shapes cached
//!   process-wide, driving operand coercion and update validation
//! - **Epoch Normalization**: integer timestamps on temporal fields accept
//!   both second and millisecond resolution
//! - **Page Normalization**: deterministic clamping of page number and
//!   size, ordered sort directives
//! - **Pluggable Stores**: a provider-trait seam for backends, with an
//!   in-memory store included for tests and examples
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use docrepo::doc;
//! use docrepo::query::{PageQuery, SortType};
//! use docrepo::repository::Repository;
//! use docrepo::store::MemoryStore;
//!
//! # fn main() -> docrepo::errors::RepoResult<()> {
//! let repository = Repository::new(MemoryStore::open());
//!
//! // Insert a model
//! repository.insert(&user)?;
//!
//! // Run a paged query with a dynamic filter
//! let query = PageQuery::new()
//!     .filters(doc! { "age": doc! { "GT": 18i64 } })
//!     .page(1, 20)
//!     .sort_by("age", SortType::Dsc);
//! let page = repository.page(&user, &query)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Values, documents, conversions, and utilities
//! - [`errors`] - Error types and result definitions
//! - [`filter`] - Filter expressions and criteria translation
//! - [`index`] - Index specifications
//! - [`meta`] - Per-type field metadata cache
//! - [`query`] - Page-query envelope and normalization
//! - [`repository`] - The generic repository and the model contract
//! - [`store`] - Store collaborator traits and the in-memory backend

pub mod common;
pub mod errors;
pub mod filter;
pub mod index;
pub mod meta;
pub mod query;
pub mod repository;
pub mod store;

#[cfg(test)]
mod tests {
    use crate::common::Value;

    #[ctor::ctor]
    fn init_logger() {
        colog::init();
    }

    #[test]
    fn test_doc_macro_is_exported() {
        let doc = crate::doc! { "name": "alice" };
        assert_eq!(doc.get("name"), Some(&Value::String("alice".to_string())));
    }
}
