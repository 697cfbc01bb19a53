use crate::common::Convertible;
use crate::filter::Criteria;
use crate::index::IndexSpec;

/// Trait that defines how a domain type is persisted.
///
/// # Purpose
/// Ties a convertible domain type to its collection, its unique-key
/// predicate, and optionally its index definitions. The repository consults
/// this trait for every operation; the persisted field names are whatever
/// keys the type's [Convertible::to_value] writes.
///
/// # Usage
/// ```rust,ignore
/// impl Model for User {
///     fn collection_name(&self) -> String {
///         "users".to_string()
///     }
///
///     fn unique_criteria(&self) -> Criteria {
///         let mut doc = Document::new();
///         doc.put("user_id", self.user_id);
///         Criteria::from_document(doc)
///     }
///
///     fn indexes(&self) -> Vec<IndexSpec> {
///         vec![IndexSpec::new(vec!["user_id"]).unique()]
///     }
/// }
/// ```
pub trait Model: Convertible<Output = Self> + Sized + 'static {
    /// The name of the collection this type is persisted in.
    fn collection_name(&self) -> String;

    /// The unique-key predicate identifying this instance's document.
    ///
    /// The returned criteria should match at most one document; update,
    /// upsert, find-one, and delete operate through it.
    fn unique_criteria(&self) -> Criteria;

    /// Index definitions for the collection, forwarded by
    /// [crate::repository::Repository::ensure_indexes].
    fn indexes(&self) -> Vec<IndexSpec> {
        Vec::new()
    }
}
