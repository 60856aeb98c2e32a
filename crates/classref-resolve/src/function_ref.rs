//! Function and constructor references.
//!
//! A [`FunctionReference`] pairs the owning [`ClassReference`] with shared
//! per-function data. The data is cached in the owner's member views and
//! holds no pointer back to the owner, so the two never form a cycle.

use std::fmt;
use std::sync::Arc;

use classref_core::error::{ClassRefError, ClassRefResult, Origin};
use classref_core::names::FqName;
use classref_core::symbols::{FunctionSymbol, Modality};
use classref_core::syntax::{Modifier, SyntaxFunction};
use classref_core::types::FunctionKind;
use classref_core::visibility::Visibility;

use crate::annotation_ref::{AnnotationData, AnnotationReference};
use crate::class_ref::ClassReference;
use crate::memo::Memo;
use crate::module::ModuleDescriptor;
use crate::type_ref::{SyntaxTypeContext, TypeReference};

// ============================================================================
// Shared Data
// ============================================================================

pub(crate) enum FunctionBacking {
    Syntax {
        function: Arc<SyntaxFunction>,
        context: SyntaxTypeContext,
    },
    Symbol(Arc<FunctionSymbol>),
}

pub(crate) struct FunctionData {
    backing: FunctionBacking,
    parameters: Memo<Vec<Arc<ParameterData>>>,
    return_type: Memo<Option<TypeReference>>,
    annotations: Memo<Vec<Arc<AnnotationData>>>,
}

impl FunctionData {
    /// `class_context` is the owner's context; the function's own type
    /// parameters are added to it.
    pub(crate) fn from_syntax(function: Arc<SyntaxFunction>, class_context: &SyntaxTypeContext) -> Self {
        let context = class_context.with_type_parameters(&function.type_parameters);
        FunctionData::new(FunctionBacking::Syntax { function, context })
    }

    pub(crate) fn from_symbol(symbol: Arc<FunctionSymbol>) -> Self {
        FunctionData::new(FunctionBacking::Symbol(symbol))
    }

    fn new(backing: FunctionBacking) -> Self {
        FunctionData {
            backing,
            parameters: Memo::new(),
            return_type: Memo::new(),
            annotations: Memo::new(),
        }
    }
}

/// A value parameter's data. Annotations are built eagerly with the
/// parameter list.
pub(crate) struct ParameterData {
    name: String,
    type_ref: Option<TypeReference>,
    annotations: Vec<Arc<AnnotationData>>,
}

// ============================================================================
// FunctionReference
// ============================================================================

#[derive(Clone)]
pub struct FunctionReference {
    owner: ClassReference,
    data: Arc<FunctionData>,
}

impl FunctionReference {
    pub(crate) fn new(owner: ClassReference, data: Arc<FunctionData>) -> Self {
        FunctionReference { owner, data }
    }

    pub fn owner(&self) -> &ClassReference {
        &self.owner
    }

    /// Simple name; constructors are named `<init>`.
    pub fn name(&self) -> &str {
        match &self.data.backing {
            FunctionBacking::Syntax { function, .. } => &function.name,
            FunctionBacking::Symbol(symbol) => &symbol.name,
        }
    }

    pub fn fq_name(&self) -> FqName {
        self.owner.fq_name().child(self.name())
    }

    pub fn kind(&self) -> FunctionKind {
        match &self.data.backing {
            FunctionBacking::Syntax { function, .. } => function.kind,
            FunctionBacking::Symbol(symbol) => symbol.kind,
        }
    }

    pub fn is_constructor(&self) -> bool {
        self.kind().is_constructor()
    }

    pub fn is_abstract(&self) -> bool {
        match &self.data.backing {
            FunctionBacking::Syntax { function, .. } => function.has_modifier(Modifier::Abstract),
            FunctionBacking::Symbol(symbol) => symbol.modality == Modality::Abstract,
        }
    }

    pub fn type_parameters(&self) -> &[String] {
        match &self.data.backing {
            FunctionBacking::Syntax { function, .. } => &function.type_parameters,
            FunctionBacking::Symbol(symbol) => &symbol.type_parameters,
        }
    }

    pub fn origin(&self) -> Origin {
        let element = format!("function {}", self.fq_name());
        match &self.data.backing {
            FunctionBacking::Syntax { function, .. } => Origin::syntax(element, function.location.clone()),
            FunctionBacking::Symbol(_) => Origin::symbol(element),
        }
    }

    pub fn visibility(&self) -> ClassRefResult<Visibility> {
        let unresolved = |level: String| {
            ClassRefError::unresolved_visibility(
                format!("Couldn't get visibility {} for function {}.", level, self.fq_name()),
                Some(self.origin()),
            )
        };
        match &self.data.backing {
            FunctionBacking::Syntax { function, .. } => Visibility::from_modifiers(&function.modifiers)
                .map_err(|modifiers| unresolved(format!("{:?}", modifiers))),
            FunctionBacking::Symbol(symbol) => {
                Visibility::try_from(symbol.visibility).map_err(|v| unresolved(format!("{:?}", v)))
            }
        }
    }

    /// Value parameters in declaration order.
    pub fn parameters(&self) -> Vec<ParameterReference> {
        let data = self.data.parameters.get_or_compute(|| match &self.data.backing {
            FunctionBacking::Syntax { function, context } => function
                .parameters
                .iter()
                .map(|p| {
                    Arc::new(ParameterData {
                        name: p.name.clone(),
                        type_ref: p
                            .type_ref
                            .clone()
                            .map(|t| TypeReference::from_syntax(t, context.clone())),
                        annotations: p
                            .annotations
                            .iter()
                            .map(|a| Arc::new(AnnotationData::from_syntax(a.clone(), context.clone())))
                            .collect(),
                    })
                })
                .collect(),
            FunctionBacking::Symbol(symbol) => symbol
                .value_parameters
                .iter()
                .map(|p| {
                    Arc::new(ParameterData {
                        name: p.name.clone(),
                        type_ref: Some(TypeReference::from_resolved(p.type_.clone())),
                        annotations: p
                            .annotations
                            .iter()
                            .map(|a| Arc::new(AnnotationData::from_symbol(a.clone())))
                            .collect(),
                    })
                })
                .collect(),
        });
        data.iter()
            .map(|d| ParameterReference {
                owner: self.owner.clone(),
                data: Arc::clone(d),
            })
            .collect()
    }

    /// The declared return type. `None` when syntax leaves it to inference
    /// and for constructors.
    pub fn return_type(&self) -> Option<TypeReference> {
        self.data
            .return_type
            .get_or_compute(|| match &self.data.backing {
                FunctionBacking::Syntax { function, context } => function
                    .return_type
                    .clone()
                    .map(|t| TypeReference::from_syntax(t, context.clone())),
                FunctionBacking::Symbol(symbol) => symbol.return_type.clone().map(TypeReference::from_resolved),
            })
            .clone()
    }

    /// The return type with a type variable of the owner replaced by what
    /// `implementing` supplies for it.
    pub fn resolve_generic_return_type(
        &self,
        module: &ModuleDescriptor,
        implementing: &ClassReference,
    ) -> ClassRefResult<Option<TypeReference>> {
        match self.return_type() {
            Some(return_type) => return_type.resolve_generic_type(module, implementing, &self.owner),
            None => Ok(None),
        }
    }

    pub fn annotations(&self) -> Vec<AnnotationReference> {
        let data = self.data.annotations.get_or_compute(|| match &self.data.backing {
            FunctionBacking::Syntax { function, context } => function
                .annotations
                .iter()
                .map(|a| Arc::new(AnnotationData::from_syntax(a.clone(), context.clone())))
                .collect(),
            FunctionBacking::Symbol(symbol) => symbol
                .annotations
                .iter()
                .map(|a| Arc::new(AnnotationData::from_symbol(a.clone())))
                .collect(),
        });
        data.iter()
            .map(|d| AnnotationReference::new(self.owner.clone(), Arc::clone(d)))
            .collect()
    }
}

impl fmt::Debug for FunctionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionReference")
            .field("fq_name", &self.fq_name())
            .field("kind", &self.kind())
            .finish()
    }
}

// ============================================================================
// ParameterReference
// ============================================================================

#[derive(Clone)]
pub struct ParameterReference {
    owner: ClassReference,
    data: Arc<ParameterData>,
}

impl ParameterReference {
    pub fn name(&self) -> &str {
        &self.data.name
    }

    /// `None` only for syntax parameters written without a type.
    pub fn type_ref(&self) -> Option<&TypeReference> {
        self.data.type_ref.as_ref()
    }

    pub fn annotations(&self) -> Vec<AnnotationReference> {
        self.data
            .annotations
            .iter()
            .map(|d| AnnotationReference::new(self.owner.clone(), Arc::clone(d)))
            .collect()
    }
}

impl fmt::Debug for ParameterReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterReference")
            .field("name", &self.data.name)
            .field("type", &self.data.type_ref.as_ref().map(ToString::to_string))
            .finish()
    }
}
