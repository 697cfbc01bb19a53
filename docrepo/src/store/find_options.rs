/// Options controlling a find operation against a store.
///
/// Supports pagination through skip and limit, plus sorting through backend
/// sort directives. Methods chain for convenient configuration.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::store::FindOptions;
///
/// let options = FindOptions::new()
///     .sort(vec!["-age".to_string(), "name".to_string()])
///     .skip(20)
///     .limit(10);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindOptions {
    pub(crate) skip: Option<u64>,
    pub(crate) limit: Option<u64>,
    pub(crate) sort: Vec<String>,
}

/// Creates `FindOptions` that skips a number of results.
pub fn skip_by(skip: u64) -> FindOptions {
    FindOptions {
        skip: Some(skip),
        limit: None,
        sort: Vec::new(),
    }
}

/// Creates `FindOptions` that limits the number of results.
pub fn limit_to(limit: u64) -> FindOptions {
    FindOptions {
        skip: None,
        limit: Some(limit),
        sort: Vec::new(),
    }
}

impl FindOptions {
    /// Creates options with no skip, no limit, and no sorting.
    pub fn new() -> FindOptions {
        FindOptions::default()
    }

    /// Sets the number of documents to skip.
    pub fn skip(mut self, skip: u64) -> FindOptions {
        self.skip = Some(skip);
        self
    }

    /// Sets the maximum number of documents to return.
    pub fn limit(mut self, limit: u64) -> FindOptions {
        self.limit = Some(limit);
        self
    }

    /// Sets the sort directives, in priority order.
    ///
    /// A directive is a field name, prefixed with `-` for descending order.
    pub fn sort(mut self, sort: Vec<String>) -> FindOptions {
        self.sort = sort;
        self
    }

    pub fn skip_value(&self) -> Option<u64> {
        self.skip
    }

    pub fn limit_value(&self) -> Option<u64> {
        self.limit
    }

    pub fn sort_directives(&self) -> &[String] {
        &self.sort
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_options_new() {
        let options = FindOptions::new();
        assert!(options.skip.is_none());
        assert!(options.limit.is_none());
        assert!(options.sort.is_empty());
    }

    #[test]
    fn test_skip_by() {
        let options = skip_by(10);
        assert_eq!(options.skip, Some(10));
        assert!(options.limit.is_none());
    }

    #[test]
    fn test_limit_to() {
        let options = limit_to(5);
        assert_eq!(options.limit, Some(5));
        assert!(options.skip.is_none());
    }

    #[test]
    fn test_chaining() {
        let options = FindOptions::new()
            .skip(20)
            .limit(10)
            .sort(vec!["-age".to_string()]);
        assert_eq!(options.skip, Some(20));
        assert_eq!(options.limit, Some(10));
        assert_eq!(options.sort_directives(), &["-age".to_string()]);
    }
}
