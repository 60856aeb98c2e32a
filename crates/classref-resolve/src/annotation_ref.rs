//! Annotation references.
//!
//! Syntax annotations carry the name as written, resolved on demand through
//! the same rules as any other written type. Symbol annotations are already
//! qualified. Arguments are reported as expression text for syntax and as
//! constants for symbols; no evaluation happens here.

use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use classref_core::error::{ClassRefError, ClassRefResult, Origin};
use classref_core::names::FqName;
use classref_core::symbols::{AnnotationSymbol, ConstantValue};
use classref_core::syntax::SyntaxAnnotation;

use crate::class_ref::ClassReference;
use crate::memo::Memo;
use crate::module::ModuleDescriptor;
use crate::type_ref::{SyntaxTypeContext, TypeReference};

/// An annotation argument value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AnnotationValue {
    /// Source text of the argument expression.
    Expression(String),
    Constant(ConstantValue),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotationArgument {
    /// `None` for positional syntax arguments.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: AnnotationValue,
}

pub(crate) enum AnnotationBacking {
    Syntax {
        annotation: SyntaxAnnotation,
        type_ref: TypeReference,
    },
    Symbol(AnnotationSymbol),
}

pub(crate) struct AnnotationData {
    backing: AnnotationBacking,
    arguments: Memo<Vec<AnnotationArgument>>,
}

impl AnnotationData {
    pub(crate) fn from_syntax(annotation: SyntaxAnnotation, context: SyntaxTypeContext) -> Self {
        let type_ref = TypeReference::from_syntax(annotation.type_ref.clone(), context);
        AnnotationData {
            backing: AnnotationBacking::Syntax {
                annotation,
                type_ref,
            },
            arguments: Memo::new(),
        }
    }

    pub(crate) fn from_symbol(symbol: AnnotationSymbol) -> Self {
        AnnotationData {
            backing: AnnotationBacking::Symbol(symbol),
            arguments: Memo::new(),
        }
    }
}

/// An annotation on a class or on one of its members. The owner is always
/// the class.
#[derive(Clone)]
pub struct AnnotationReference {
    owner: ClassReference,
    data: Arc<AnnotationData>,
}

impl AnnotationReference {
    pub(crate) fn new(owner: ClassReference, data: Arc<AnnotationData>) -> Self {
        AnnotationReference { owner, data }
    }

    pub fn owner(&self) -> &ClassReference {
        &self.owner
    }

    /// The last segment of the annotation name as written or resolved.
    pub fn short_name(&self) -> &str {
        match &self.data.backing {
            AnnotationBacking::Syntax { annotation, .. } => annotation
                .type_ref
                .name
                .rsplit('.')
                .next()
                .unwrap_or(&annotation.type_ref.name),
            AnnotationBacking::Symbol(symbol) => symbol.fq_name.short_name(),
        }
    }

    /// Qualified name of the annotation class.
    ///
    /// Syntax annotations are resolved through the owner's file imports and
    /// fail with `UnresolvedReference` when no candidate matches.
    pub fn fq_name(&self, module: &ModuleDescriptor) -> ClassRefResult<FqName> {
        match &self.data.backing {
            AnnotationBacking::Syntax { type_ref, .. } => {
                let resolved = type_ref
                    .fq_name(module)
                    .map_err(|e| e.or_origin(|| self.origin()))?;
                resolved.ok_or_else(|| {
                    ClassRefError::unresolved_reference(
                        format!("Couldn't resolve annotation {} on {}.", type_ref, self.owner),
                        Some(self.origin()),
                    )
                })
            }
            AnnotationBacking::Symbol(symbol) => Ok(symbol.fq_name.clone()),
        }
    }

    /// The annotation class itself, which must be known to the module.
    pub fn class_reference(&self, module: &ModuleDescriptor) -> ClassRefResult<ClassReference> {
        let fq_name = self.fq_name(module)?;
        module
            .get_class_reference(&fq_name)
            .map_err(|e| e.or_origin(|| self.origin()))
    }

    pub fn arguments(&self) -> &[AnnotationArgument] {
        self.data.arguments.get_or_compute(|| match &self.data.backing {
            AnnotationBacking::Syntax { annotation, .. } => annotation
                .arguments
                .iter()
                .map(|a| AnnotationArgument {
                    name: a.name.clone(),
                    value: AnnotationValue::Expression(a.value.clone()),
                })
                .collect(),
            AnnotationBacking::Symbol(symbol) => symbol
                .arguments
                .iter()
                .map(|a| AnnotationArgument {
                    name: Some(a.name.clone()),
                    value: AnnotationValue::Constant(a.value.clone()),
                })
                .collect(),
        })
    }

    fn origin(&self) -> Origin {
        match &self.data.backing {
            AnnotationBacking::Syntax { annotation, .. } => Origin::syntax(
                format!("annotation @{} on {}", annotation.type_ref, self.owner),
                None,
            ),
            AnnotationBacking::Symbol(symbol) => {
                Origin::symbol(format!("annotation @{} on {}", symbol.fq_name, self.owner))
            }
        }
    }
}

impl fmt::Debug for AnnotationReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnnotationReference")
            .field("owner", &self.owner.fq_name())
            .field("short_name", &self.short_name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classref_core::names::ClassId;
    use classref_core::symbols::ClassSymbol;
    use classref_core::syntax::{SyntaxClass, SyntaxFile, SyntaxImport};
    use classref_core::types::ClassKind;

    fn annotated_module() -> ModuleDescriptor {
        let module = ModuleDescriptor::default();
        module.add_files([
            SyntaxFile::new("di").with_class(SyntaxClass::new("ContributesTo", ClassKind::AnnotationClass)),
            SyntaxFile::new("app")
                .with_import(SyntaxImport::new("di.ContributesTo"))
                .with_class(
                    SyntaxClass::class("Service")
                        .with_annotation(SyntaxAnnotation::new("ContributesTo").with_argument("AppScope::class"))
                        .with_annotation(SyntaxAnnotation::new("Missing")),
                ),
        ]);
        module
    }

    #[test]
    fn syntax_annotation_resolves_through_imports() {
        let module = annotated_module();
        let service = module.get_class_reference(&FqName::new("app.Service")).unwrap();
        let annotations = service.annotations();
        assert_eq!(annotations[0].fq_name(&module), Ok(FqName::new("di.ContributesTo")));
        assert!(annotations[0].class_reference(&module).unwrap().is_annotation_class());
        assert_eq!(
            annotations[0].arguments(),
            [AnnotationArgument {
                name: None,
                value: AnnotationValue::Expression("AppScope::class".to_string()),
            }]
        );
    }

    #[test]
    fn unresolvable_annotation_fails_with_origin() {
        let module = annotated_module();
        let service = module.get_class_reference(&FqName::new("app.Service")).unwrap();
        let err = service.annotations()[1].fq_name(&module).unwrap_err();
        assert!(matches!(err, ClassRefError::UnresolvedReference { .. }));
        assert!(err.origin().is_some());
    }

    #[test]
    fn symbol_annotation_arguments_are_constants() {
        let module = ModuleDescriptor::default();
        module.add_symbols([ClassSymbol::new(ClassId::top_level("lib", "Api"), ClassKind::Interface)
            .with_annotation(
                AnnotationSymbol::new("di.Qualifier").with_argument("value", ConstantValue::String("io".into())),
            )]);
        let api = module.get_class_reference(&FqName::new("lib.Api")).unwrap();
        let annotation = &api.annotations()[0];
        assert_eq!(annotation.short_name(), "Qualifier");
        assert_eq!(annotation.fq_name(&module), Ok(FqName::new("di.Qualifier")));
        assert!(annotation.class_reference(&module).is_err());

        let json = serde_json::to_value(annotation.arguments()).unwrap();
        assert_eq!(json[0]["name"], "value");
        assert_eq!(json[0]["value"]["kind"], "constant");
        assert_eq!(json[0]["value"]["value"]["value"], "io");
    }
}
