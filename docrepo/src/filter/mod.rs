//! Dynamic filter expressions and criteria translation.
//!
//! A filter arrives as a plain document: each key is either a property name
//! whose value maps operator tokens to operands, or a logical composer
//! (`AND`, `OR`, `NOR`) whose value is a sequence of nested filters.
//!
//! ```text
//! { "AND": [ { "age": { "GT": 18 } }, { "age": { "LT": 65 } } ] }
//! ```
//!
//! Parsing produces a tagged [FilterGroup] tree, and translation turns that
//! tree into a backend-native [Criteria] predicate. Operand values for
//! temporal model fields may be supplied as epoch integers; they are
//! normalized to date-times using the model's field metadata.
//!
//! Translation is deliberately error-tolerant: unrecognized operator tokens
//! are dropped, a second composer at one level overwrites the first, and a
//! duplicate property clause overwrites the earlier one. Every such path
//! logs a warning but never fails, because existing callers rely on the
//! lenient behavior.
//!
//! # Supported Operators
//!
//! - **Equality**: `EQ`, `NE`
//! - **Comparison**: `GT`, `GTE`, `LT`, `LTE`
//! - **Pattern**: `LIKE`
//! - **Membership**: `IN`, `NOT_IN`
//! - **Logical**: `AND`, `OR`, `NOR`

mod criteria;
mod expr;
mod matcher;
mod ops;

pub use criteria::*;
pub use expr::*;
pub use matcher::*;
pub use ops::*;
