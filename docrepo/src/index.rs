//! Index specifications forwarded to the document store.

/// Describes one index a model wants on its collection.
///
/// The key lists the indexed field names in order; a `-` prefix requests
/// descending order for that field. The toolkit only forwards the
/// specification, creation is the store's concern.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::index::IndexSpec;
///
/// let by_email = IndexSpec::new(vec!["email"]).unique();
/// let by_age = IndexSpec::new(vec!["-age", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IndexSpec {
    key: Vec<String>,
    unique: bool,
    sparse: bool,
}

impl IndexSpec {
    /// Creates a non-unique index specification over the given fields.
    pub fn new(key: Vec<&str>) -> IndexSpec {
        IndexSpec {
            key: key.iter().map(|field| field.to_string()).collect(),
            unique: false,
            sparse: false,
        }
    }

    /// Marks the index as unique.
    pub fn unique(mut self) -> IndexSpec {
        self.unique = true;
        self
    }

    /// Marks the index as sparse.
    pub fn sparse(mut self) -> IndexSpec {
        self.sparse = true;
        self
    }

    /// The indexed field names, in order, with their direction prefixes.
    pub fn key(&self) -> &Vec<String> {
        &self.key
    }

    pub fn is_unique(&self) -> bool {
        self.unique
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    /// The field names with direction prefixes stripped.
    pub fn field_names(&self) -> Vec<&str> {
        self.key
            .iter()
            .map(|field| field.strip_prefix('-').unwrap_or(field))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_spec_new() {
        let spec = IndexSpec::new(vec!["email"]);
        assert_eq!(spec.key(), &vec!["email".to_string()]);
        assert!(!spec.is_unique());
        assert!(!spec.is_sparse());
    }

    #[test]
    fn test_index_spec_builders() {
        let spec = IndexSpec::new(vec!["email"]).unique().sparse();
        assert!(spec.is_unique());
        assert!(spec.is_sparse());
    }

    #[test]
    fn test_field_names_strip_direction() {
        let spec = IndexSpec::new(vec!["-age", "name"]);
        assert_eq!(spec.field_names(), vec!["age", "name"]);
        assert_eq!(spec.key(), &vec!["-age".to_string(), "name".to_string()]);
    }
}
