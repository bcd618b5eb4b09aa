//! Table schema input contract
//!
//! A table schema is an ordered list of [`TableField`]s as produced by the table
//! designer. Each field carries a key, a type tag and a type-specific spec object.
//!
//! # Conventions
//!
//! - Spec members are optional; `null` means "not configured"
//! - Unknown type tags are preserved as [`FieldKind::Unsupported`]
//! - `_id`, `createdAt` and `updatedAt` are reserved and never compiled

mod specs;
mod types;

pub use specs::{
    BooleanSpecs, DateSpecs, DateValue, DomainSpecs, JsonSpecs, NumberSpecs, RelationSpecs,
    SelectSpecs, StringSpecs,
};
pub use types::{FieldItem, FieldKind, TableField, RESERVED_KEYS};
