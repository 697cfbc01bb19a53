use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};

use crate::common::Value;

/// Represents a document as an ordered collection of key-value pairs.
///
/// Keys are always [String]s and values are [Value]s. Iteration yields the
/// entries in insertion order, which keeps translated criteria and persisted
/// documents deterministic. Writing to an existing key replaces the value in
/// place without changing the key's position.
///
/// Documents serve three roles in this crate: persisted model state, the
/// wire shape of a filter expression, and the backend-native criteria
/// produced by translation.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::doc;
///
/// let mut doc = doc! {
///     "name": "alice",
///     "age": 30i64,
/// };
/// doc.put("active", true);
/// assert_eq!(doc.len(), 3);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Document {
    data: IndexMap<String, Value>,
}

impl Document {
    /// Creates a new empty document.
    pub fn new() -> Self {
        Document {
            data: IndexMap::new(),
        }
    }

    /// Checks if the document has no entries.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the number of entries in the document.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Associates a value with a key, replacing any previous value.
    ///
    /// Returns the previous value when the key was already present; the
    /// key keeps its original position in that case.
    pub fn put<K: Into<String>, V: Into<Value>>(&mut self, key: K, value: V) -> Option<Value> {
        self.data.insert(key.into(), value.into())
    }

    /// Gets the value associated with a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    /// Checks whether the document contains a key.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Removes a key, preserving the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.shift_remove(key)
    }

    /// Iterates over entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.data.iter()
    }

    /// Iterates over keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }
}

impl Display for Document {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{")?;
        for (i, (key, value)) in self.data.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", key, value)?;
        }
        write!(f, "}}")
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Document {
            data: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Document {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_map(self.iter())
    }
}

struct DocumentVisitor;

impl<'de> Visitor<'de> for DocumentVisitor {
    type Value = Document;

    fn expecting(&self, formatter: &mut Formatter) -> std::fmt::Result {
        formatter.write_str("a map of string keys to values")
    }

    fn visit_map<A>(self, mut map: A) -> Result<Document, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut document = Document::new();
        while let Some((key, value)) = map.next_entry::<String, Value>()? {
            document.put(key, value);
        }
        Ok(document)
    }
}

impl<'de> Deserialize<'de> for Document {
    fn deserialize<D>(deserializer: D) -> Result<Document, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(DocumentVisitor)
    }
}

/// Creates a [Document] from a list of key-value pairs.
///
/// # Examples
///
/// ```rust,ignore
/// use docrepo::doc;
///
/// let doc = doc! {
///     "name": "alice",
///     "age": 30i64,
/// };
/// ```
#[macro_export]
macro_rules! doc {
    () => {
        $crate::common::Document::new()
    };
    ($($key:literal : $value:expr),* $(,)?) => {{
        let mut document = $crate::common::Document::new();
        $(document.put($key, $value);)*
        document
    }};
}
