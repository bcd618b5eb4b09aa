//! schemac - compiles declarative table schemas into validation rule sets
//!
//! A table schema lists fields with a key, a type tag and per-type constraint
//! specs. [`compile`] turns it into a mapping from field key to a value type plus
//! rules, with custom validators for checks the rule vocabulary cannot express.

pub mod compiler;
pub mod object_id;
pub mod schema;
pub mod validators;

pub use compiler::{
    compile, compile_value, CompileError, CompileResult, CompiledSchema, CompilerOptions,
    SchemaCompiler,
};
pub use object_id::ObjectId;
