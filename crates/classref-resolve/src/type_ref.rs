//! Type references over both representations.
//!
//! A [`TypeReference`] is either a type as written in syntax, together with the
//! [`SyntaxTypeContext`] needed to make sense of its names, or a resolved type
//! from a symbol. Syntax names are resolved lazily and the result is cached on
//! the reference.
//!
//! Resolved types are inspected through their normalized form: flexible types
//! use their lower bound and definitely-non-null types their underlying type.

use std::fmt;
use std::sync::Arc;

use classref_core::error::{ClassRefError, ClassRefResult, Origin};
use classref_core::names::{ClassId, FqName};
use classref_core::symbols::ResolvedType;
use classref_core::syntax::{Modifier, SyntaxClassHandle, SyntaxFile, SyntaxTypeRef};

use crate::class_ref::ClassReference;
use crate::generics;
use crate::memo::Memo;
use crate::module::ModuleDescriptor;
use crate::name_resolution::resolve_written_name;

// ============================================================================
// Syntax Context
// ============================================================================

/// Where a syntax type was written: the class, its file, and the type
/// parameter names in scope.
#[derive(Debug, Clone)]
pub struct SyntaxTypeContext {
    class_id: ClassId,
    file: Arc<SyntaxFile>,
    type_parameters: Arc<[String]>,
}

impl SyntaxTypeContext {
    /// Context for types written in a class header or body.
    ///
    /// Inner classes also see the type parameters of their outer classes.
    pub fn for_class(handle: &SyntaxClassHandle) -> Self {
        let mut names = handle.node.type_parameters.clone();
        let mut current = handle.clone();
        while current.node.has_modifier(Modifier::Inner) {
            let outer = current
                .class_id
                .outer_class_id()
                .and_then(|id| handle.file.find_class(&id));
            let Some(outer) = outer else {
                break;
            };
            names.extend(outer.node.type_parameters.iter().cloned());
            current = outer;
        }
        SyntaxTypeContext {
            class_id: handle.class_id.clone(),
            file: Arc::clone(&handle.file),
            type_parameters: names.into(),
        }
    }

    /// Context for a member declaring its own type parameters.
    pub fn with_type_parameters(&self, names: &[String]) -> Self {
        if names.is_empty() {
            return self.clone();
        }
        let combined: Vec<String> = names
            .iter()
            .chain(self.type_parameters.iter())
            .cloned()
            .collect();
        SyntaxTypeContext {
            class_id: self.class_id.clone(),
            file: Arc::clone(&self.file),
            type_parameters: combined.into(),
        }
    }

    pub fn class_id(&self) -> &ClassId {
        &self.class_id
    }

    pub fn file(&self) -> &Arc<SyntaxFile> {
        &self.file
    }

    pub fn is_type_parameter(&self, name: &str) -> bool {
        self.type_parameters.iter().any(|p| p == name)
    }
}

// ============================================================================
// TypeReference
// ============================================================================

#[derive(Debug, Clone)]
pub enum TypeReference {
    Syntax(SyntaxTypeReference),
    Resolved(Arc<ResolvedType>),
}

/// A written type plus its context. Cheap to clone.
#[derive(Debug, Clone)]
pub struct SyntaxTypeReference {
    inner: Arc<SyntaxTypeInner>,
}

#[derive(Debug)]
struct SyntaxTypeInner {
    type_ref: SyntaxTypeRef,
    context: SyntaxTypeContext,
    fq_name: Memo<ClassRefResult<Option<FqName>>>,
}

impl SyntaxTypeReference {
    pub fn type_ref(&self) -> &SyntaxTypeRef {
        &self.inner.type_ref
    }

    pub fn context(&self) -> &SyntaxTypeContext {
        &self.inner.context
    }
}

impl TypeReference {
    pub fn from_syntax(type_ref: SyntaxTypeRef, context: SyntaxTypeContext) -> Self {
        TypeReference::Syntax(SyntaxTypeReference {
            inner: Arc::new(SyntaxTypeInner {
                type_ref,
                context,
                fq_name: Memo::new(),
            }),
        })
    }

    pub fn from_resolved(resolved: ResolvedType) -> Self {
        TypeReference::Resolved(Arc::new(resolved))
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self, TypeReference::Syntax(_))
    }

    pub fn is_nullable(&self) -> bool {
        match self {
            TypeReference::Syntax(t) => t.type_ref().nullable,
            TypeReference::Resolved(t) => t.is_nullable(),
        }
    }

    pub fn is_star_projection(&self) -> bool {
        match self {
            TypeReference::Syntax(t) => t.type_ref().is_star_projection(),
            TypeReference::Resolved(t) => matches!(t.normalized(), ResolvedType::StarProjection),
        }
    }

    /// The type variable this type names, if it is one.
    pub fn type_parameter_name(&self) -> Option<&str> {
        match self {
            TypeReference::Syntax(t) => {
                let type_ref = t.type_ref();
                (type_ref.is_simple_name() && t.context().is_type_parameter(&type_ref.name))
                    .then_some(type_ref.name.as_str())
            }
            TypeReference::Resolved(t) => t.type_parameter_name(),
        }
    }

    /// The type variable this type names, if `class` declares it.
    ///
    /// Unlike [`TypeReference::type_parameter_name`] this ignores the written
    /// context and asks `class` directly, which is what generic resolution
    /// needs when it reads type arguments out of a supertype list.
    pub fn type_parameter_of(&self, class: &ClassReference) -> Option<String> {
        let name = match self {
            TypeReference::Syntax(t) => {
                let type_ref = t.type_ref();
                if !type_ref.is_simple_name() {
                    return None;
                }
                type_ref.name.as_str()
            }
            TypeReference::Resolved(t) => t.type_parameter_name()?,
        };
        class
            .index_of_type_parameter(name)
            .map(|_| name.to_string())
    }

    /// Type arguments, in order.
    pub fn arguments(&self) -> Vec<TypeReference> {
        match self {
            TypeReference::Syntax(t) => t
                .type_ref()
                .arguments
                .iter()
                .map(|a| TypeReference::from_syntax(a.clone(), t.context().clone()))
                .collect(),
            TypeReference::Resolved(t) => t
                .arguments()
                .iter()
                .map(|a| TypeReference::from_resolved(a.clone()))
                .collect(),
        }
    }

    /// Qualified name of the class this type refers to.
    ///
    /// `None` for type variables and star projections. A syntax name that
    /// cannot be resolved fails with `UnresolvedReference`; the outcome is
    /// cached on this reference.
    pub fn fq_name(&self, module: &ModuleDescriptor) -> ClassRefResult<Option<FqName>> {
        match self {
            TypeReference::Syntax(t) => t
                .inner
                .fq_name
                .get_or_try_compute(|| resolve_syntax_fq_name(module, t))
                .cloned(),
            TypeReference::Resolved(t) => Ok(t.class_fq_name().cloned()),
        }
    }

    /// The class reference this type refers to, `None` for type variables and
    /// star projections.
    pub fn as_class_reference(&self, module: &ModuleDescriptor) -> ClassRefResult<Option<ClassReference>> {
        match self.fq_name(module)? {
            Some(fq_name) => module.get_class_reference(&fq_name).map(Some),
            None => Ok(None),
        }
    }

    /// Substitute this type, if it is a type variable introduced by
    /// `declaring`, with the concrete argument `implementing` supplies for it.
    ///
    /// Types that are not type variables are already concrete and come back
    /// unchanged. `None` means the variable could not be resolved.
    pub fn resolve_generic_type(
        &self,
        module: &ModuleDescriptor,
        implementing: &ClassReference,
        declaring: &ClassReference,
    ) -> ClassRefResult<Option<TypeReference>> {
        match self.type_parameter_name() {
            Some(name) => generics::resolve_generic_type(module, implementing, declaring, name),
            None => Ok(Some(self.clone())),
        }
    }
}

fn resolve_syntax_fq_name(
    module: &ModuleDescriptor,
    t: &SyntaxTypeReference,
) -> ClassRefResult<Option<FqName>> {
    let type_ref = t.type_ref();
    let context = t.context();
    if type_ref.is_star_projection()
        || (type_ref.is_simple_name() && context.is_type_parameter(&type_ref.name))
    {
        return Ok(None);
    }
    if let Some(fq_name) = resolve_written_name(module, context, &type_ref.name) {
        return Ok(Some(fq_name));
    }
    if module.config().is_root_type_spelling(&type_ref.name) {
        return Ok(Some(module.config().root_type.clone()));
    }
    Err(ClassRefError::unresolved_reference(
        format!(
            "Couldn't resolve FqName {} for class {}.",
            type_ref.name,
            context.class_id().fq_name()
        ),
        Some(Origin::syntax(format!("type reference {}", type_ref), None)),
    ))
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeReference::Syntax(t) => write!(f, "{}", t.type_ref()),
            TypeReference::Resolved(t) => write_resolved(f, t),
        }
    }
}

fn write_resolved(f: &mut fmt::Formatter<'_>, t: &ResolvedType) -> fmt::Result {
    match t {
        ResolvedType::Class {
            fq_name,
            arguments,
            nullable,
        } => {
            write!(f, "{}", fq_name)?;
            if !arguments.is_empty() {
                f.write_str("<")?;
                for (i, argument) in arguments.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_resolved(f, argument)?;
                }
                f.write_str(">")?;
            }
            if *nullable {
                f.write_str("?")?;
            }
            Ok(())
        }
        ResolvedType::TypeParameter { name, nullable } => {
            f.write_str(name)?;
            if *nullable {
                f.write_str("?")?;
            }
            Ok(())
        }
        ResolvedType::Flexible { lower, upper } => {
            write_resolved(f, lower)?;
            f.write_str("..")?;
            write_resolved(f, upper)
        }
        ResolvedType::DefinitelyNonNull { inner } => {
            write_resolved(f, inner)?;
            f.write_str(" & Any")
        }
        ResolvedType::StarProjection => f.write_str("*"),
    }
}
