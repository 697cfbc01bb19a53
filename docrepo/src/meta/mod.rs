//! Field metadata for persisted model types.
//!
//! This module maintains a process-wide cache of per-type field shapes. A
//! model type is introspected once, through the document produced by its
//! [crate::common::Convertible] implementation; later introspections of the
//! same type reuse the cached shape and only snapshot the new instance's
//! field values.
//!
//! The cached [TypeShape] is immutable after publication. Field values never
//! enter the cache; they live in the per-call [ModelInfo] only, so
//! concurrent introspections of the same type cannot observe each other's
//! values.

mod model_info;

pub use model_info::*;
