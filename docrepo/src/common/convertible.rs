use chrono::{DateTime, Utc};

use crate::common::Value;
use crate::errors::{ErrorKind, RepoError, RepoResult};

/// Bidirectional conversion between a Rust type and a [Value].
///
/// Models implement this trait by hand: `to_value` returns a
/// [Value::Document] whose keys are the model's persisted field names, and
/// `from_value` rebuilds the model from such a document. A field a model
/// does not write into its document is not a persisted field and stays
/// invisible to filtering and metadata introspection.
///
/// # Examples
///
/// ```rust,ignore
/// impl Convertible for User {
///     type Output = User;
///
///     fn to_value(&self) -> RepoResult<Value> {
///         let mut doc = Document::new();
///         doc.put("user_id", self.user_id);
///         doc.put("name", self.name.clone());
///         doc.put("created_at", self.created_at);
///         Ok(Value::Document(doc))
///     }
///
///     fn from_value(value: &Value) -> RepoResult<User> { /* ... */ }
/// }
/// ```
pub trait Convertible {
    type Output;

    fn to_value(&self) -> RepoResult<Value>;
    fn from_value(value: &Value) -> RepoResult<Self::Output>;
}

impl Convertible for bool {
    type Output = bool;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::Bool(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::Bool(b) => Ok(*b),
            _ => {
                log::error!("Value {} is not a bool", value);
                Err(RepoError::new(
                    "Value is not a bool",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }
}

impl Convertible for i32 {
    type Output = i32;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::I32(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::I32(i) => Ok(*i),
            Value::I64(i) if i32::try_from(*i).is_ok() => Ok(*i as i32),
            _ => {
                log::error!("Value {} is not an i32", value);
                Err(RepoError::new(
                    "Value is not an i32",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }
}

impl Convertible for i64 {
    type Output = i64;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::I64(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::I32(i) => Ok(*i as i64),
            Value::I64(i) => Ok(*i),
            _ => {
                log::error!("Value {} is not an i64", value);
                Err(RepoError::new(
                    "Value is not an i64",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }
}

impl Convertible for f64 {
    type Output = f64;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::F64(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::F64(f) => Ok(*f),
            Value::I32(i) => Ok(*i as f64),
            Value::I64(i) => Ok(*i as f64),
            _ => {
                log::error!("Value {} is not an f64", value);
                Err(RepoError::new(
                    "Value is not an f64",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }
}

impl Convertible for String {
    type Output = String;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::String(self.clone()))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::String(s) => Ok(s.clone()),
            _ => {
                log::error!("Value {} is not a string", value);
                Err(RepoError::new(
                    "Value is not a string",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }
}

impl Convertible for DateTime<Utc> {
    type Output = DateTime<Utc>;

    fn to_value(&self) -> RepoResult<Value> {
        Ok(Value::DateTime(*self))
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::DateTime(dt) => Ok(*dt),
            _ => {
                log::error!("Value {} is not a date-time", value);
                Err(RepoError::new(
                    "Value is not a date-time",
                    ErrorKind::EncodingError,
                ))
            }
        }
    }
}

impl<T> Convertible for Option<T>
where
    T: Convertible<Output = T>,
{
    type Output = Option<T>;

    fn to_value(&self) -> RepoResult<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: &Value) -> RepoResult<Self> {
        match value {
            Value::Null => Ok(None),
            other => Ok(Some(T::from_value(other)?)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_bool_round_trip() {
        let value = true.to_value().unwrap();
        assert_eq!(bool::from_value(&value).unwrap(), true);
        assert!(bool::from_value(&Value::I32(1)).is_err());
    }

    #[test]
    fn test_i32_round_trip() {
        let value = 42i32.to_value().unwrap();
        assert_eq!(i32::from_value(&value).unwrap(), 42);
        // wire integers arrive as I64
        assert_eq!(i32::from_value(&Value::I64(42)).unwrap(), 42);
        assert!(i32::from_value(&Value::I64(i64::MAX)).is_err());
    }

    #[test]
    fn test_i64_round_trip() {
        let value = 42i64.to_value().unwrap();
        assert_eq!(i64::from_value(&value).unwrap(), 42);
        assert_eq!(i64::from_value(&Value::I32(7)).unwrap(), 7);
    }

    #[test]
    fn test_string_round_trip() {
        let value = "abc".to_string().to_value().unwrap();
        assert_eq!(String::from_value(&value).unwrap(), "abc");
        assert!(String::from_value(&Value::Null).is_err());
    }

    #[test]
    fn test_datetime_round_trip() {
        let dt = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
        let value = dt.to_value().unwrap();
        assert_eq!(<DateTime<Utc>>::from_value(&value).unwrap(), dt);
    }

    #[test]
    fn test_option_round_trip() {
        let value = Some(5i64).to_value().unwrap();
        assert_eq!(<Option<i64>>::from_value(&value).unwrap(), Some(5));
        let value = None::<i64>.to_value().unwrap();
        assert_eq!(value, Value::Null);
        assert_eq!(<Option<i64>>::from_value(&Value::Null).unwrap(), None);
    }
}
