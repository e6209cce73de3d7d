//! Mutation Engine: validates, applies, and reverts a single typed edit
//! against a live element. Originals are captured exactly once per
//! (element, property) pair in a side table owned here, which also serves
//! as the set of "modified" markers behind [`MutationEngine::restore_all`].

pub mod engine;
pub mod error;
mod mutation;
pub mod original;
pub mod validate;

pub use engine::{ApplyOutcome, MutationEngine};
pub use error::MutationError;
pub use mutation::DomMutation;
pub use original::{OriginalRecord, OriginalValues, StyleOriginal, now_ms};
pub use validate::{PROTECTED_TAGS, is_protected, unsafe_markup, validate_target};
