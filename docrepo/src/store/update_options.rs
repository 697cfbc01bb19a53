use crate::common::Document;

/// Options controlling an update operation against a store.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateOptions {
    pub(crate) upsert: bool,
    pub(crate) multi: bool,
    pub(crate) return_new: bool,
}

impl UpdateOptions {
    /// Creates options for a single, non-upserting update.
    pub fn new() -> UpdateOptions {
        UpdateOptions::default()
    }

    /// Inserts a new document when nothing matches the criteria.
    pub fn upsert(mut self) -> UpdateOptions {
        self.upsert = true;
        self
    }

    /// Updates every matching document instead of the first one.
    pub fn multi(mut self) -> UpdateOptions {
        self.multi = true;
        self
    }

    /// Returns the updated document in the [UpdateResult].
    pub fn return_new(mut self) -> UpdateOptions {
        self.return_new = true;
        self
    }

    pub fn is_upsert(&self) -> bool {
        self.upsert
    }

    pub fn is_multi(&self) -> bool {
        self.multi
    }

    pub fn is_return_new(&self) -> bool {
        self.return_new
    }
}

/// Outcome of an update operation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpdateResult {
    /// Number of documents the criteria matched.
    pub matched: i64,
    /// Number of documents actually modified.
    pub modified: i64,
    /// Whether a new document was inserted because nothing matched.
    pub upserted: bool,
    /// The updated (or inserted) document, when requested via
    /// [UpdateOptions::return_new].
    pub document: Option<Document>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_options_default() {
        let options = UpdateOptions::new();
        assert!(!options.is_upsert());
        assert!(!options.is_multi());
        assert!(!options.is_return_new());
    }

    #[test]
    fn test_update_options_chaining() {
        let options = UpdateOptions::new().upsert().multi().return_new();
        assert!(options.is_upsert());
        assert!(options.is_multi());
        assert!(options.is_return_new());
    }

    #[test]
    fn test_update_result_default() {
        let result = UpdateResult::default();
        assert_eq!(result.matched, 0);
        assert_eq!(result.modified, 0);
        assert!(!result.upserted);
        assert!(result.document.is_none());
    }
}
