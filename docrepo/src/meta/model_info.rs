use indexmap::IndexMap;
use parking_lot::RwLock;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::common::{Convertible, Document, Value};
use crate::errors::{ErrorKind, RepoError, RepoResult};

/// Process-wide cache of published type shapes, keyed by the model's
/// [TypeId]. Populated lazily, never evicted; the set of distinct model
/// types in a process is small and bounded.
static SHAPE_CACHE: LazyLock<RwLock<HashMap<TypeId, Arc<TypeShape>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// The semantic type of a persisted field.
///
/// Derived from the [Value] variant a model writes for the field.
/// [FieldType::DateTime] is the distinguished temporal type: filter operands
/// for such fields may be supplied as epoch integers and are normalized to
/// date-times during criteria translation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    /// The field was null when the type was first introspected; its
    /// semantic type is unknown.
    Null,
    Bool,
    Int,
    Float,
    String,
    DateTime,
    Array,
    Document,
}

impl FieldType {
    /// Derives the field type from a value.
    pub fn of(value: &Value) -> FieldType {
        match value {
            Value::Null => FieldType::Null,
            Value::Bool(_) => FieldType::Bool,
            Value::I32(_) | Value::I64(_) => FieldType::Int,
            Value::F64(_) => FieldType::Float,
            Value::String(_) => FieldType::String,
            Value::DateTime(_) => FieldType::DateTime,
            Value::Array(_) => FieldType::Array,
            Value::Document(_) => FieldType::Document,
        }
    }

    /// Checks if this is the temporal field type.
    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(self, FieldType::DateTime)
    }
}

/// Metadata about one persisted field of a model type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldInfo {
    persisted_name: String,
    field_type: FieldType,
}

impl FieldInfo {
    /// The name under which the field is persisted; unique within a model
    /// type, and the name filters and sort specs refer to.
    pub fn persisted_name(&self) -> &str {
        &self.persisted_name
    }

    pub fn field_type(&self) -> FieldType {
        self.field_type
    }
}

/// The immutable shape of a model type: its name plus one [FieldInfo] per
/// persisted field, in the order the model writes them.
///
/// Exactly one `TypeShape` exists per distinct model type in the process.
/// Once published into the cache it is shared behind an [Arc] and never
/// mutated, so readers take no lock.
#[derive(Debug)]
pub struct TypeShape {
    type_name: String,
    fields: IndexMap<String, FieldInfo>,
}

impl TypeShape {
    fn from_document(type_name: &str, doc: &Document) -> TypeShape {
        let mut fields = IndexMap::new();
        for (name, value) in doc.iter() {
            fields.insert(
                name.clone(),
                FieldInfo {
                    persisted_name: name.clone(),
                    field_type: FieldType::of(value),
                },
            );
        }
        TypeShape {
            type_name: type_name.to_string(),
            fields,
        }
    }

    /// The short name of the model type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    /// Looks up a field by its persisted name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }

    /// Iterates over the persisted fields in declaration order.
    pub fn fields(&self) -> impl Iterator<Item = &FieldInfo> {
        self.fields.values()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// A model type's cached shape together with a snapshot of one instance's
/// field values.
///
/// The value snapshot belongs to the call that produced it and is dropped
/// with the `ModelInfo`; it is never written back into the shape cache.
#[derive(Debug)]
pub struct ModelInfo {
    shape: Arc<TypeShape>,
    values: Document,
}

impl ModelInfo {
    pub fn shape(&self) -> &TypeShape {
        &self.shape
    }

    /// The introspected instance's field values, keyed by persisted name.
    pub fn values(&self) -> &Document {
        &self.values
    }

    /// The current instance's value for a persisted field.
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }
}

/// Strips the module path from a fully qualified type name.
fn short_type_name(full: &str) -> &str {
    full.rsplit("::").next().unwrap_or(full)
}

/// Introspects a model instance, returning its cached type shape and a
/// snapshot of the instance's field values.
///
/// # Behavior
///
/// - The model must convert to a [Value::Document]; anything else fails
///   with [ErrorKind::InvalidArgument].
/// - On the first call for a model type, the document's keys and value
///   types are recorded as the type's [TypeShape] and published into the
///   process-wide cache. Cache writes are serialized behind a write lock;
///   when two callers race on the same new type, the first published shape
///   wins.
/// - On later calls for the same type, every recorded field must be present
///   on the new instance's document; a missing field fails with
///   [ErrorKind::InvalidState], since it indicates the type's shape changed
///   at runtime.
///
/// # Errors
///
/// Fails when the model's conversion fails, when the conversion does not
/// produce a document, or when a cached field is absent from the instance.
pub fn model_info<M: Convertible + 'static>(model: &M) -> RepoResult<ModelInfo> {
    let value = model.to_value()?;
    let type_name = short_type_name(std::any::type_name::<M>());

    let doc = match value {
        Value::Document(doc) => doc,
        other => {
            log::error!(
                "Model type [{}] converted to {} instead of a document",
                type_name,
                other
            );
            return Err(RepoError::new(
                &format!("Model type [{}] does not convert to a document", type_name),
                ErrorKind::InvalidArgument,
            ));
        }
    };

    let type_id = TypeId::of::<M>();

    let cached = SHAPE_CACHE.read().get(&type_id).cloned();
    let shape = match cached {
        Some(shape) => {
            for name in shape.fields.keys() {
                if !doc.contains_key(name) {
                    log::error!(
                        "Field [{}] of type [{}] is missing on the supplied instance",
                        name,
                        shape.type_name
                    );
                    return Err(RepoError::new(
                        &format!(
                            "Field [{}] of type [{}] is no longer valid",
                            name, shape.type_name
                        ),
                        ErrorKind::InvalidState,
                    ));
                }
            }
            shape
        }
        None => {
            log::debug!("Introspecting model type [{}]", type_name);
            let shape = Arc::new(TypeShape::from_document(type_name, &doc));
            let mut cache = SHAPE_CACHE.write();
            cache.entry(type_id).or_insert(shape).clone()
        }
    };

    Ok(ModelInfo { shape, values: doc })
}

/// Validates an explicit field map against a model's shape.
///
/// Every key must name a persisted field of the model, and every value's
/// type must match the field's recorded type. Used for selective updates,
/// where the caller supplies raw field values that bypass model conversion.
///
/// # Errors
///
/// [ErrorKind::ValidationError] when a key names no persisted field or a
/// value's type does not match the recorded field type.
pub fn checked_update_document(info: &ModelInfo, data: &Document) -> RepoResult<Document> {
    let mut checked = Document::new();

    for (name, value) in data.iter() {
        let field = match info.shape().field(name) {
            Some(field) => field,
            None => {
                log::error!(
                    "Field [{}] does not exist on type [{}]",
                    name,
                    info.shape().type_name()
                );
                return Err(RepoError::new(
                    &format!("Field [{}] does not exist", name),
                    ErrorKind::ValidationError,
                ));
            }
        };

        let value_type = FieldType::of(value);
        if value_type != field.field_type() {
            log::error!(
                "Field [{}] type not matched, {:?} => {:?}",
                name,
                value_type,
                field.field_type()
            );
            return Err(RepoError::new(
                &format!("Field [{}] type not matched", name),
                ErrorKind::ValidationError,
            ));
        }

        checked.put(name.clone(), value.clone());
    }

    Ok(checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::doc;
    use chrono::{TimeZone, Utc};

    struct Person {
        name: String,
        age: i64,
    }

    impl Convertible for Person {
        type Output = Person;

        fn to_value(&self) -> RepoResult<Value> {
            let mut doc = Document::new();
            doc.put("name", self.name.clone());
            doc.put("age", self.age);
            Ok(Value::Document(doc))
        }

        fn from_value(value: &Value) -> RepoResult<Person> {
            let doc = value.as_document().ok_or_else(|| {
                RepoError::new("Value is not a document", ErrorKind::EncodingError)
            })?;
            Ok(Person {
                name: String::from_value(doc.get("name").unwrap_or(&Value::Null))?,
                age: i64::from_value(doc.get("age").unwrap_or(&Value::Null))?,
            })
        }
    }

    struct Event {
        label: String,
        occurred_at: chrono::DateTime<Utc>,
    }

    impl Convertible for Event {
        type Output = Event;

        fn to_value(&self) -> RepoResult<Value> {
            let mut doc = Document::new();
            doc.put("label", self.label.clone());
            doc.put("occurred_at", self.occurred_at);
            Ok(Value::Document(doc))
        }

        fn from_value(value: &Value) -> RepoResult<Event> {
            let doc = value.as_document().ok_or_else(|| {
                RepoError::new("Value is not a document", ErrorKind::EncodingError)
            })?;
            Ok(Event {
                label: String::from_value(doc.get("label").unwrap_or(&Value::Null))?,
                occurred_at: <chrono::DateTime<Utc>>::from_value(
                    doc.get("occurred_at").unwrap_or(&Value::Null),
                )?,
            })
        }
    }

    struct Scalar;

    impl Convertible for Scalar {
        type Output = Scalar;

        fn to_value(&self) -> RepoResult<Value> {
            Ok(Value::I64(7))
        }

        fn from_value(_value: &Value) -> RepoResult<Scalar> {
            Ok(Scalar)
        }
    }

    #[test]
    fn test_model_info_shape() {
        let person = Person {
            name: "alice".to_string(),
            age: 30,
        };
        let info = model_info(&person).unwrap();
        assert_eq!(info.shape().type_name(), "Person");
        assert_eq!(info.shape().len(), 2);
        assert_eq!(info.shape().field("name").unwrap().field_type(), FieldType::String);
        assert_eq!(info.shape().field("age").unwrap().field_type(), FieldType::Int);
        assert!(info.shape().field("missing").is_none());
    }

    #[test]
    fn test_model_info_non_document_fails() {
        let result = model_info(&Scalar);
        assert!(result.is_err());
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidArgument);
    }

    #[test]
    fn test_model_info_values_are_per_call() {
        let a = Person {
            name: "alice".to_string(),
            age: 30,
        };
        let b = Person {
            name: "bob".to_string(),
            age: 41,
        };

        let info_a = model_info(&a).unwrap();
        let info_b = model_info(&b).unwrap();

        // the second introspection must not leak into the first snapshot
        assert_eq!(info_a.value("name"), Some(&Value::String("alice".to_string())));
        assert_eq!(info_b.value("name"), Some(&Value::String("bob".to_string())));
        assert_eq!(info_b.value("age"), Some(&Value::I64(41)));

        // both calls share the same published shape
        assert!(Arc::ptr_eq(&info_a.shape, &info_b.shape));
    }

    #[test]
    fn test_temporal_field_type() {
        let event = Event {
            label: "launch".to_string(),
            occurred_at: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
        };
        let info = model_info(&event).unwrap();
        let field = info.shape().field("occurred_at").unwrap();
        assert!(field.field_type().is_temporal());
        assert!(!info.shape().field("label").unwrap().field_type().is_temporal());
    }

    #[test]
    fn test_concurrent_same_type_introspection() {
        let handles: Vec<_> = (0..4)
            .map(|i| {
                std::thread::spawn(move || {
                    let person = Person {
                        name: format!("p{}", i),
                        age: i,
                    };
                    let info = model_info(&person).unwrap();
                    assert_eq!(info.value("name"), Some(&Value::String(format!("p{}", i))));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
    }

    struct Shifty {
        with_extra: bool,
    }

    impl Convertible for Shifty {
        type Output = Shifty;

        fn to_value(&self) -> RepoResult<Value> {
            let mut doc = Document::new();
            doc.put("base", 1i64);
            if self.with_extra {
                doc.put("extra", 2i64);
            }
            Ok(Value::Document(doc))
        }

        fn from_value(_value: &Value) -> RepoResult<Shifty> {
            Ok(Shifty { with_extra: false })
        }
    }

    #[test]
    fn test_missing_recorded_field_is_invalid_state() {
        let first = Shifty { with_extra: true };
        model_info(&first).unwrap();

        let second = Shifty { with_extra: false };
        let result = model_info(&second);
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::InvalidState);
    }

    #[test]
    fn test_checked_update_document_accepts_matching_fields() {
        let person = Person {
            name: "alice".to_string(),
            age: 30,
        };
        let info = model_info(&person).unwrap();
        let update = doc! { "age": 31i64 };
        let checked = checked_update_document(&info, &update).unwrap();
        assert_eq!(checked.get("age"), Some(&Value::I64(31)));
    }

    #[test]
    fn test_checked_update_document_rejects_unknown_field() {
        let person = Person {
            name: "alice".to_string(),
            age: 30,
        };
        let info = model_info(&person).unwrap();
        let update = doc! { "nickname": "al" };
        let result = checked_update_document(&info, &update);
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_checked_update_document_rejects_type_mismatch() {
        let person = Person {
            name: "alice".to_string(),
            age: 30,
        };
        let info = model_info(&person).unwrap();
        let update = doc! { "age": "thirty" };
        let result = checked_update_document(&info, &update);
        assert_eq!(result.unwrap_err().kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_field_type_of() {
        assert_eq!(FieldType::of(&Value::Null), FieldType::Null);
        assert_eq!(FieldType::of(&Value::Bool(true)), FieldType::Bool);
        assert_eq!(FieldType::of(&Value::I32(1)), FieldType::Int);
        assert_eq!(FieldType::of(&Value::I64(1)), FieldType::Int);
        assert_eq!(FieldType::of(&Value::F64(1.0)), FieldType::Float);
        assert_eq!(FieldType::of(&Value::Array(vec![])), FieldType::Array);
    }
}
