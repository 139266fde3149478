//! Draft domain module.
//!
//! The draft is the record a signup wizard accumulates across its steps.

mod choices;
mod field;
mod model;

pub use choices::{AccountKind, Interest, TeachingLevel};
pub use field::{parse_field, DraftField, FieldError, FieldKind, FieldValue};
pub use model::Draft;
