//! Command implementations for the classref CLI.
//!
//! Each `run_*` function loads a unit document, builds its module context and
//! returns a response struct ready for [`crate::output::emit_response`]. The
//! binary only parses arguments and prints.
//!
//! ## Error Handling
//!
//! All functions return `Result<T, CliError>`. Library failures arrive as
//! [`ClassRefError`] and keep their origin; everything else is an input
//! problem on the caller's side.

use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use classref_core::error::{ClassRefError, ClassRefResult, Origin, OutputErrorCode};
use classref_core::names::FqName;
use classref_resolve::{
    AnnotationReference, ClassReference, FunctionReference, ModuleDescriptor, PropertyReference,
    TypeReference,
};

use crate::output::{
    summaries, AnnotationInfo, ClassFlags, ClassInfo, ClassSummary, FunctionInfo, InspectResponse,
    ListResponse, ListedClass, ParameterInfo, PropertyInfo, ResolveGenericResponse,
    ResolvedTypeInfo, SupertypesResponse,
};
use crate::unit::CompilationUnitDocument;

// ============================================================================
// Errors
// ============================================================================

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read unit document {path}: {source}")]
    UnitRead {
        path: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse unit document {path}: {source}")]
    UnitParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error(transparent)]
    Resolution(#[from] ClassRefError),

    #[error("failed to write output: {0}")]
    Output(#[source] io::Error),
}

impl CliError {
    pub fn invalid_args(message: impl Into<String>) -> Self {
        CliError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Stable machine-readable kind for JSON error responses.
    pub fn kind(&self) -> &'static str {
        match self {
            CliError::UnitRead { .. } => "unit_read",
            CliError::UnitParse { .. } => "unit_parse",
            CliError::InvalidArguments { .. } => "invalid_arguments",
            CliError::Resolution(err) => err.error_code(),
            CliError::Output(_) => "output",
        }
    }

    pub fn origin(&self) -> Option<&Origin> {
        match self {
            CliError::Resolution(err) => err.origin(),
            _ => None,
        }
    }
}

impl From<&CliError> for OutputErrorCode {
    fn from(err: &CliError) -> Self {
        match err {
            CliError::UnitRead { .. }
            | CliError::UnitParse { .. }
            | CliError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            CliError::Resolution(err) => OutputErrorCode::from(err),
            CliError::Output(_) => OutputErrorCode::InternalError,
        }
    }
}

// ============================================================================
// Commands
// ============================================================================

fn load_module(unit: &Path) -> Result<ModuleDescriptor, CliError> {
    Ok(CompilationUnitDocument::load(unit)?.into_module())
}

fn parse_class_name(name: &str) -> Result<FqName, CliError> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed.split('.').any(str::is_empty) {
        return Err(CliError::invalid_args(format!(
            "invalid class name '{}', expected a dotted qualified name",
            name
        )));
    }
    Ok(FqName::new(trimmed))
}

fn lookup(module: &ModuleDescriptor, name: &str) -> Result<ClassReference, CliError> {
    let fq_name = parse_class_name(name)?;
    Ok(module.get_class_reference(&fq_name)?)
}

/// Report everything known about one class.
pub fn run_inspect(unit: &Path, class: &str) -> Result<InspectResponse, CliError> {
    let module = load_module(unit)?;
    let reference = lookup(&module, class)?;
    debug!(class = %reference, variant = reference.variant_name(), "inspect");
    Ok(InspectResponse::new(class_info(&module, &reference)?))
}

/// Walk every supertype of a class, breadth-first.
pub fn run_supertypes(
    unit: &Path,
    class: &str,
    include_self: bool,
) -> Result<SupertypesResponse, CliError> {
    let module = load_module(unit)?;
    let reference = lookup(&module, class)?;
    let supertypes = reference
        .all_super_type_class_references(&module, include_self)
        .map(|r| r.map(|r| ClassSummary::from(&r)))
        .collect::<ClassRefResult<Vec<_>>>()?;
    Ok(SupertypesResponse::new(
        reference.fq_name().to_string(),
        include_self,
        supertypes,
    ))
}

/// Resolve the type a class supplies for a type parameter of a supertype.
pub fn run_resolve_generic(
    unit: &Path,
    class: &str,
    declaring: &str,
    parameter: &str,
) -> Result<ResolveGenericResponse, CliError> {
    let module = load_module(unit)?;
    let implementing = lookup(&module, class)?;
    let declaring = lookup(&module, declaring)?;
    if declaring.index_of_type_parameter(parameter).is_none() {
        return Err(CliError::invalid_args(format!(
            "{} declares no type parameter '{}'",
            declaring, parameter
        )));
    }
    let resolved = implementing
        .resolve_generic_type(&module, &declaring, parameter)?
        .map(|t| resolved_type_info(&module, &t))
        .transpose()?;
    Ok(ResolveGenericResponse::new(
        implementing.fq_name().to_string(),
        declaring.fq_name().to_string(),
        parameter,
        resolved,
    ))
}

/// List every class the unit knows, with the variant a lookup returns.
pub fn run_list(unit: &Path) -> Result<ListResponse, CliError> {
    let module = load_module(unit)?;
    let mut classes = Vec::new();
    for fq_name in module.class_names() {
        let Some(availability) = module.availability(&fq_name) else {
            continue;
        };
        let reference = module.get_class_reference(&fq_name)?;
        classes.push(ListedClass {
            fq_name: fq_name.to_string(),
            availability,
            variant: reference.variant_name(),
        });
    }
    Ok(ListResponse::new(classes))
}

// ============================================================================
// Report Building
// ============================================================================

fn class_info(module: &ModuleDescriptor, reference: &ClassReference) -> ClassRefResult<ClassInfo> {
    let all_super_classes = reference
        .all_super_type_class_references(module, false)
        .collect::<ClassRefResult<Vec<_>>>()?;
    let enclosing_classes = reference.enclosing_classes_with_self(module)?;

    Ok(ClassInfo {
        fq_name: reference.fq_name().to_string(),
        class_id: reference.class_id().to_string(),
        variant: reference.variant_name(),
        kind: reference.kind(),
        visibility: reference.visibility()?,
        flags: ClassFlags {
            interface: reference.is_interface(),
            abstract_: reference.is_abstract(),
            object: reference.is_object(),
            companion: reference.is_companion(),
            annotation_class: reference.is_annotation_class(),
            enum_class: reference.is_enum_class(),
            generic: reference.is_generic_class(),
        },
        type_parameters: reference.type_parameters().to_vec(),
        super_types: reference
            .direct_super_type_references(module)
            .iter()
            .map(TypeReference::to_string)
            .collect(),
        direct_super_classes: summaries(&reference.direct_super_class_references(module)?),
        all_super_classes: summaries(&all_super_classes),
        enclosing_classes: summaries(&enclosing_classes),
        inner_classes: summaries(&reference.inner_classes(module)),
        companion_objects: summaries(&reference.companion_objects(module)?),
        annotations: annotation_infos(module, &reference.annotations())?,
        constructors: function_infos(module, &reference.constructors())?,
        functions: function_infos(module, &reference.functions())?,
        properties: property_infos(module, &reference.properties())?,
    })
}

fn annotation_infos(
    module: &ModuleDescriptor,
    annotations: &[AnnotationReference],
) -> ClassRefResult<Vec<AnnotationInfo>> {
    annotations
        .iter()
        .map(|a| {
            Ok(AnnotationInfo {
                fq_name: a.fq_name(module)?.to_string(),
                arguments: a.arguments().to_vec(),
            })
        })
        .collect()
}

fn function_infos(
    module: &ModuleDescriptor,
    functions: &[FunctionReference],
) -> ClassRefResult<Vec<FunctionInfo>> {
    functions
        .iter()
        .map(|f| {
            let parameters = f
                .parameters()
                .iter()
                .map(|p| {
                    Ok(ParameterInfo {
                        name: p.name().to_string(),
                        type_: p.type_ref().map(TypeReference::to_string),
                        annotations: annotation_infos(module, &p.annotations())?,
                    })
                })
                .collect::<ClassRefResult<Vec<_>>>()?;
            Ok(FunctionInfo {
                name: f.name().to_string(),
                kind: f.kind(),
                visibility: f.visibility()?,
                abstract_: f.is_abstract(),
                type_parameters: f.type_parameters().to_vec(),
                parameters,
                return_type: f.return_type().map(|t| t.to_string()),
                annotations: annotation_infos(module, &f.annotations())?,
            })
        })
        .collect()
}

fn property_infos(
    module: &ModuleDescriptor,
    properties: &[PropertyReference],
) -> ClassRefResult<Vec<PropertyInfo>> {
    properties
        .iter()
        .map(|p| {
            Ok(PropertyInfo {
                name: p.name().to_string(),
                type_: p.type_ref().map(|t| t.to_string()),
                visibility: p.visibility()?,
                mutable: p.is_mutable(),
                lateinit: p.is_lateinit(),
                annotations: annotation_infos(module, &p.annotations())?,
            })
        })
        .collect()
}

fn resolved_type_info(
    module: &ModuleDescriptor,
    type_ref: &TypeReference,
) -> ClassRefResult<ResolvedTypeInfo> {
    Ok(ResolvedTypeInfo {
        display: type_ref.to_string(),
        fq_name: type_ref.fq_name(module)?.map(|n| n.to_string()),
        nullable: type_ref.is_nullable(),
    })
}
