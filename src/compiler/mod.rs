//! Schema compiler
//!
//! Turns a table schema into the `{ type, rules }` mapping consumed by the
//! validation library.
//!
//! # Design Principles
//!
//! - One pure compiling function per field kind
//! - No side effects beyond `tracing` events
//! - Deterministic: the same fields and options give an equal schema
//! - Data failures are deferred to the attached validators
//!
//! # Usage
//!
//! ```
//! use schemac::compiler::{compile, CompilerOptions, ValueType};
//! use schemac::schema::{FieldKind, StringSpecs, TableField};
//!
//! let fields = vec![TableField::new(
//!     "name",
//!     FieldKind::String(StringSpecs { may_be_empty: Some(false), ..Default::default() }),
//! )];
//!
//! let schema = compile(&fields, Some(&CompilerOptions::frontend())).unwrap();
//! assert_eq!(schema.get("name").unwrap().value_type, ValueType::String);
//! ```

mod dispatch;
mod errors;
mod fields;
mod options;
mod output;

pub use dispatch::{compile, compile_value, SchemaCompiler};
pub use errors::{CompileError, CompileResult};
pub use fields::{
    compile_boolean, compile_date, compile_email, compile_json, compile_number, compile_relation,
    compile_select, compile_string, compile_url,
};
pub use options::CompilerOptions;
pub use output::{CompiledSchema, FieldDescriptor, Pattern, Rule, RuleSet, ValueType};
