//! Top-level schema compilation
//!
//! Filtering semantics:
//! - Fields without a key, or with an empty key, are skipped
//! - Reserved keys (`_id`, `createdAt`, `updatedAt`) are skipped
//! - Unknown type tags are skipped, or rejected in strict mode
//! - A later field with the same key replaces an earlier one
//! - Specs are decoded only for fields that pass the key filters

use serde_json::Value;

use super::errors::{CompileError, CompileResult};
use super::fields::{
    compile_boolean, compile_date, compile_email, compile_json, compile_number, compile_relation,
    compile_select, compile_string, compile_url,
};
use super::options::CompilerOptions;
use super::output::{CompiledSchema, FieldDescriptor};
use crate::schema::{FieldKind, TableField};
use crate::validators::CustomValidator;

/// Compiles table schemas into validation schemas.
///
/// Holds only its options; every call builds a fresh [`CompiledSchema`].
#[derive(Debug, Clone, Default)]
pub struct SchemaCompiler {
    options: CompilerOptions,
}

impl SchemaCompiler {
    /// Creates a compiler with the given options.
    pub fn new(options: CompilerOptions) -> Self {
        Self { options }
    }

    /// Returns the active options.
    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Compiles every eligible field.
    ///
    /// # Errors
    ///
    /// - `SCHEMAC_INVALID_PATTERN` if a string pattern does not compile
    /// - `SCHEMAC_MALFORMED_SPECS` if a compiled field's specs do not match its type
    /// - `SCHEMAC_UNSUPPORTED_FIELD_TYPE` for unknown tags in strict mode
    pub fn compile(&self, fields: &[TableField]) -> CompileResult<CompiledSchema> {
        let mut schema = CompiledSchema::new();

        for field in fields {
            let Some(key) = field.item.compilable_key() else {
                tracing::debug!(id = %field.id, "skipping field without key");
                continue;
            };

            if field.item.is_reserved() {
                tracing::debug!(key, "skipping reserved field");
                continue;
            }

            let kind = field.kind().map_err(|e| CompileError::MalformedSpecs {
                key: key.to_string(),
                reason: e.to_string(),
            })?;

            match self.compile_field(key, &kind)? {
                Some(descriptor) => {
                    tracing::trace!(
                        key,
                        type_tag = kind.type_tag(),
                        value_type = %descriptor.value_type,
                        validator = descriptor.custom().map_or("none", CustomValidator::kind),
                        "compiled field"
                    );
                    schema.insert(key, descriptor);
                }
                None => {
                    tracing::debug!(
                        key,
                        type_tag = kind.type_tag(),
                        "skipping unsupported field type"
                    );
                }
            }
        }

        Ok(schema)
    }

    /// Compiles a single field kind. `Ok(None)` means the kind is skipped.
    pub fn compile_field(
        &self,
        key: &str,
        kind: &FieldKind,
    ) -> CompileResult<Option<FieldDescriptor>> {
        let descriptor = match kind {
            FieldKind::String(specs) => compile_string(key, specs)?,
            FieldKind::Number(specs) => compile_number(specs),
            FieldKind::Boolean(specs) => compile_boolean(specs),
            FieldKind::Date(specs) => compile_date(specs),
            FieldKind::Json(specs) => compile_json(specs),
            FieldKind::Email(specs) => compile_email(specs),
            FieldKind::Url(specs) => compile_url(specs),
            FieldKind::Select(specs) => compile_select(specs),
            FieldKind::Relation(specs) => compile_relation(specs, &self.options),
            FieldKind::Unsupported { type_tag, .. } => {
                if self.options.strict_types {
                    return Err(CompileError::UnsupportedFieldType {
                        key: key.to_string(),
                        type_tag: type_tag.clone(),
                    });
                }
                return Ok(None);
            }
        };

        Ok(Some(descriptor))
    }

    /// Compiles fields given in their JSON wire form.
    ///
    /// # Errors
    ///
    /// Returns `SCHEMAC_MALFORMED_DESCRIPTOR` if `fields` is not an array of
    /// field descriptors, plus everything [`SchemaCompiler::compile`] returns.
    pub fn compile_value(&self, fields: &Value) -> CompileResult<CompiledSchema> {
        let fields: Vec<TableField> = serde_json::from_value(fields.clone())?;
        self.compile(&fields)
    }

    /// Compiles fields given as JSON text.
    pub fn compile_str(&self, text: &str) -> CompileResult<CompiledSchema> {
        let fields: Vec<TableField> = serde_json::from_str(text)?;
        self.compile(&fields)
    }
}

/// Compiles `fields`, merging `options` over the defaults.
pub fn compile(
    fields: &[TableField],
    options: Option<&CompilerOptions>,
) -> CompileResult<CompiledSchema> {
    SchemaCompiler::new(options.cloned().unwrap_or_default()).compile(fields)
}

/// Compiles fields in their JSON wire form.
pub fn compile_value(
    fields: &Value,
    options: Option<&CompilerOptions>,
) -> CompileResult<CompiledSchema> {
    SchemaCompiler::new(options.cloned().unwrap_or_default()).compile_value(fields)
}
