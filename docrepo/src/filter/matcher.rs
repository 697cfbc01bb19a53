use regex::Regex;

use crate::common::{Document, Value};
use crate::errors::{ErrorKind, RepoError, RepoResult};
use crate::filter::Criteria;

/// Evaluates a criteria against a document.
///
/// This is the reference evaluation used by the in-memory backend. Entries
/// at one criteria level combine conjunctively; `$and`/`$or`/`$nor` recurse
/// with short-circuit evaluation. A property clause made of operator keys
/// applies each operator to the document's field value; a plain value or a
/// document without operator keys means direct equality.
///
/// # Errors
///
/// [ErrorKind::FilterError] when a `$regex` pattern does not compile or a
/// composer's value is not a sequence of documents.
pub fn matches(criteria: &Criteria, doc: &Document) -> RepoResult<bool> {
    matches_document(criteria.as_document(), doc)
}

fn matches_document(criteria: &Document, doc: &Document) -> RepoResult<bool> {
    for (key, condition) in criteria.iter() {
        let matched = match key.as_str() {
            "$and" => {
                let members = composer_members(key, condition)?;
                let mut all = true;
                for member in members {
                    if !matches_document(member, doc)? {
                        all = false;
                        break;
                    }
                }
                all
            }
            "$or" => {
                let members = composer_members(key, condition)?;
                let mut any = false;
                for member in members {
                    if matches_document(member, doc)? {
                        any = true;
                        break;
                    }
                }
                any
            }
            "$nor" => {
                let members = composer_members(key, condition)?;
                let mut none = true;
                for member in members {
                    if matches_document(member, doc)? {
                        none = false;
                        break;
                    }
                }
                none
            }
            property => {
                let field_value = doc.get(property).unwrap_or(&Value::Null);
                match condition {
                    Value::Document(clause) if is_operator_clause(clause) => {
                        matches_clause(field_value, clause)?
                    }
                    direct => values_equal(field_value, direct),
                }
            }
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

/// Extracts the member documents of a composer entry.
fn composer_members<'a>(key: &str, condition: &'a Value) -> RepoResult<Vec<&'a Document>> {
    let members = condition.as_array().ok_or_else(|| {
        RepoError::new(
            &format!("Composer [{}] requires a sequence of criteria", key),
            ErrorKind::FilterError,
        )
    })?;

    let mut docs = Vec::with_capacity(members.len());
    for member in members {
        let doc = member.as_document().ok_or_else(|| {
            RepoError::new(
                &format!("Composer [{}] member is not a criteria document", key),
                ErrorKind::FilterError,
            )
        })?;
        docs.push(doc);
    }
    Ok(docs)
}

/// Checks whether a clause document consists of operator keys.
fn is_operator_clause(clause: &Document) -> bool {
    !clause.is_empty() && clause.keys().all(|k| k.starts_with('$'))
}

fn matches_clause(field_value: &Value, clause: &Document) -> RepoResult<bool> {
    for (op, operand) in clause.iter() {
        let matched = match op.as_str() {
            "$eq" => values_equal(field_value, operand),
            "$ne" => !values_equal(field_value, operand),
            "$gt" => compare_is(field_value, operand, |o| o.is_gt()),
            "$gte" => compare_is(field_value, operand, |o| o.is_ge()),
            "$lt" => compare_is(field_value, operand, |o| o.is_lt()),
            "$lte" => compare_is(field_value, operand, |o| o.is_le()),
            "$regex" => matches_pattern(field_value, operand)?,
            "$in" => membership(field_value, operand),
            "$nin" => !membership(field_value, operand),
            other => {
                log::warn!("Ignoring unsupported criteria operator [{}]", other);
                true
            }
        };

        if !matched {
            return Ok(false);
        }
    }
    Ok(true)
}

fn values_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    matches!(a.compare(b), Some(std::cmp::Ordering::Equal))
}

fn compare_is(a: &Value, b: &Value, check: impl Fn(std::cmp::Ordering) -> bool) -> bool {
    match a.compare(b) {
        Some(ordering) => check(ordering),
        None => false,
    }
}

fn matches_pattern(field_value: &Value, operand: &Value) -> RepoResult<bool> {
    let pattern = operand.as_str().ok_or_else(|| {
        RepoError::new(
            "Pattern operand must be a string",
            ErrorKind::FilterError,
        )
    })?;
    let regex = Regex::new(pattern)?;
    Ok(field_value
        .as_str()
        .map(|s| regex.is_match(s))
        .unwrap_or(false))
}

fn membership(field_value: &Value, operand: &Value) -> bool {
    match operand.as_array() {
        Some(members) => members.iter().any(|m| values_equal(field_value, m)),
        None => values_equal(field_value, operand),
    }
}
