//! Structured, type-aware containers for decoded data.

mod field;
#[allow(clippy::module_inception)]
mod record;

pub use field::Field;
pub use record::StructuredRecord;
