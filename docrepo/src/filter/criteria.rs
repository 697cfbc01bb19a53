use std::fmt::{Display, Formatter};

use crate::common::{epoch_to_datetime, Convertible, Document, Value};
use crate::filter::{FilterExpr, FilterGroup};
use crate::meta::{model_info, ModelInfo};

/// A backend-native query predicate.
///
/// Produced by [build_criteria] from a parsed filter expression, or built
/// directly from a document for unique-key lookups. Opaque to callers
/// beyond being handed to a store; an empty criteria matches every
/// document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Criteria {
    doc: Document,
}

impl Criteria {
    /// Creates a criteria that matches every document.
    pub fn empty() -> Criteria {
        Criteria {
            doc: Document::new(),
        }
    }

    /// Wraps a document as a criteria.
    ///
    /// The document is taken as-is; plain key-value entries mean direct
    /// equality, which is the shape unique-key predicates use.
    pub fn from_document(doc: Document) -> Criteria {
        Criteria { doc }
    }

    /// Checks whether this criteria matches every document.
    pub fn is_empty(&self) -> bool {
        self.doc.is_empty()
    }

    pub fn as_document(&self) -> &Document {
        &self.doc
    }

    pub fn into_document(self) -> Document {
        self.doc
    }
}

impl Display for Criteria {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.doc)
    }
}

/// Translates a wire filter document into a backend criteria for a model.
///
/// The model's field metadata is consulted to coerce operand values for
/// temporal fields: an integer-like operand on a date-time field is
/// interpreted as an epoch timestamp (seconds or milliseconds) and replaced
/// with the corresponding date-time value.
///
/// This function never fails. A failed metadata lookup is logged and
/// translation proceeds without coercion; malformed filter input degrades
/// as described on [FilterGroup::parse].
pub fn build_criteria<M: Convertible + 'static>(model: &M, filters: &Document) -> Criteria {
    let info = match model_info(model) {
        Ok(info) => Some(info),
        Err(err) => {
            log::warn!("Building criteria without field metadata: {}", err);
            None
        }
    };

    let group = FilterGroup::parse(filters);
    translate_group(&group, info.as_ref())
}

/// Translates an already-parsed filter group into a criteria.
pub(crate) fn translate_group(group: &FilterGroup, info: Option<&ModelInfo>) -> Criteria {
    let mut criteria = Document::new();

    for expr in group.exprs() {
        match expr {
            FilterExpr::Logical { op, groups } => {
                let members: Vec<Value> = groups
                    .iter()
                    .map(|g| Value::Document(translate_group(g, info).into_document()))
                    .collect();
                criteria.put(op.criteria_key(), Value::Array(members));
            }
            FilterExpr::Property { name, ops } => {
                let mut clause = Document::new();
                for (op, operand) in ops {
                    let operand = coerce_operand(name, operand, info);
                    clause.put(op.criteria_key(), operand);
                }
                if criteria.put(name.clone(), Value::Document(clause)).is_some() {
                    log::warn!(
                        "Duplicate filter clause for property [{}]; the later clause wins",
                        name
                    );
                }
            }
        }
    }

    Criteria { doc: criteria }
}

/// Applies temporal coercion to a single operand.
///
/// Only integer-like operands (signed 32/64-bit integers and floats) on a
/// field whose recorded type is date-time are converted; everything else
/// passes through unchanged. Sequences are not descended into.
fn coerce_operand(property: &str, operand: &Value, info: Option<&ModelInfo>) -> Value {
    let Some(info) = info else {
        return operand.clone();
    };
    let Some(field) = info.shape().field(property) else {
        return operand.clone();
    };
    if !field.field_type().is_temporal() {
        return operand.clone();
    }

    match operand {
        Value::I32(i) => Value::DateTime(epoch_to_datetime(*i as i64)),
        Value::I64(i) => Value::DateTime(epoch_to_datetime(*i)),
        Value::F64(f) => Value::DateTime(epoch_to_datetime(*f as i64)),
        other => other.clone(),
    }
}
