//! Common types shared across the toolkit: values, documents, conversions,
//! and small utilities.

mod convertible;
mod document;
mod time_utils;
mod type_utils;
mod value;

pub use convertible::*;
pub use document::*;
pub use time_utils::*;
pub use type_utils::*;
pub use value::*;
