//! JSON output types for the classref CLI.
//!
//! Every response starts with `status` and `schema_version`, so agents can
//! branch on the outcome before reading anything else. Field order follows
//! struct declaration order and output is deterministic.

use std::io::{self, Write};

use serde::Serialize;

use classref_core::error::{Origin, OutputErrorCode};
use classref_core::types::{ClassKind, FunctionKind};
use classref_core::visibility::Visibility;
use classref_resolve::{AnnotationArgument, Availability, ClassReference};

use crate::cli::CliError;

/// Version of the JSON output schema.
pub const SCHEMA_VERSION: &str = "1";

// ============================================================================
// Shared Pieces
// ============================================================================

/// A class named in a report.
#[derive(Debug, Clone, Serialize)]
pub struct ClassSummary {
    pub fq_name: String,
    /// `syntax` or `symbol`.
    pub variant: &'static str,
}

impl From<&ClassReference> for ClassSummary {
    fn from(reference: &ClassReference) -> Self {
        ClassSummary {
            fq_name: reference.fq_name().to_string(),
            variant: reference.variant_name(),
        }
    }
}

pub fn summaries(references: &[ClassReference]) -> Vec<ClassSummary> {
    references.iter().map(ClassSummary::from).collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassFlags {
    pub interface: bool,
    #[serde(rename = "abstract")]
    pub abstract_: bool,
    pub object: bool,
    pub companion: bool,
    pub annotation_class: bool,
    pub enum_class: bool,
    pub generic: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnnotationInfo {
    pub fq_name: String,
    pub arguments: Vec<AnnotationArgument>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ParameterInfo {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FunctionInfo {
    pub name: String,
    pub kind: FunctionKind,
    pub visibility: Visibility,
    #[serde(rename = "abstract")]
    pub abstract_: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,
    pub parameters: Vec<ParameterInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PropertyInfo {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub type_: Option<String>,
    pub visibility: Visibility,
    pub mutable: bool,
    pub lateinit: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationInfo>,
}

/// Everything `inspect` reports about one class.
#[derive(Debug, Clone, Serialize)]
pub struct ClassInfo {
    pub fq_name: String,
    pub class_id: String,
    pub variant: &'static str,
    pub kind: ClassKind,
    pub visibility: Visibility,
    pub flags: ClassFlags,
    pub type_parameters: Vec<String>,
    /// Declared supertypes as written or resolved, root type excluded.
    pub super_types: Vec<String>,
    pub direct_super_classes: Vec<ClassSummary>,
    pub all_super_classes: Vec<ClassSummary>,
    pub enclosing_classes: Vec<ClassSummary>,
    pub inner_classes: Vec<ClassSummary>,
    pub companion_objects: Vec<ClassSummary>,
    pub annotations: Vec<AnnotationInfo>,
    pub constructors: Vec<FunctionInfo>,
    pub functions: Vec<FunctionInfo>,
    pub properties: Vec<PropertyInfo>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct InspectResponse {
    pub status: String,
    pub schema_version: String,
    pub class: ClassInfo,
}

impl InspectResponse {
    pub fn new(class: ClassInfo) -> Self {
        InspectResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            class,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SupertypesResponse {
    pub status: String,
    pub schema_version: String,
    pub class: String,
    pub include_self: bool,
    pub supertypes: Vec<ClassSummary>,
}

impl SupertypesResponse {
    pub fn new(class: impl Into<String>, include_self: bool, supertypes: Vec<ClassSummary>) -> Self {
        SupertypesResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            class: class.into(),
            include_self,
            supertypes,
        }
    }
}

/// A resolved type argument.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedTypeInfo {
    /// The type as written (syntax) or rendered (symbol).
    pub display: String,
    /// `None` when the result is itself a type variable or star projection.
    pub fq_name: Option<String>,
    pub nullable: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ResolveGenericResponse {
    pub status: String,
    pub schema_version: String,
    pub class: String,
    pub declaring: String,
    pub parameter: String,
    /// `None` when the parameter could not be resolved.
    pub resolved: Option<ResolvedTypeInfo>,
}

impl ResolveGenericResponse {
    pub fn new(
        class: impl Into<String>,
        declaring: impl Into<String>,
        parameter: impl Into<String>,
        resolved: Option<ResolvedTypeInfo>,
    ) -> Self {
        ResolveGenericResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            class: class.into(),
            declaring: declaring.into(),
            parameter: parameter.into(),
            resolved,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListedClass {
    pub fq_name: String,
    pub availability: Availability,
    /// Variant a lookup by name produces.
    pub variant: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListResponse {
    pub status: String,
    pub schema_version: String,
    pub classes: Vec<ListedClass>,
}

impl ListResponse {
    pub fn new(classes: Vec<ListedClass>) -> Self {
        ListResponse {
            status: "ok".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            classes,
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Error information for error responses.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    /// Numeric error code, also the process exit code.
    pub code: u8,
    /// Stable machine-readable kind, e.g. `unresolved_reference`.
    pub kind: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin: Option<Origin>,
}

impl ErrorInfo {
    pub fn from_error(err: &CliError) -> Self {
        ErrorInfo {
            code: OutputErrorCode::from(err).code(),
            kind: err.kind().to_string(),
            message: err.to_string(),
            origin: err.origin().cloned(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    pub status: String,
    pub schema_version: String,
    pub error: ErrorInfo,
}

impl ErrorResponse {
    pub fn new(error: ErrorInfo) -> Self {
        ErrorResponse {
            status: "error".to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            error,
        }
    }
}

/// Emit a response as pretty-printed JSON to a writer.
///
/// This is the single output path for the CLI.
pub fn emit_response<T: Serialize>(response: &T, writer: &mut impl Write) -> io::Result<()> {
    let json = serde_json::to_string_pretty(response)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    writeln!(writer, "{}", json)
}
