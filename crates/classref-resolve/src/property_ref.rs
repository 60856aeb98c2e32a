//! Property references.

use std::fmt;
use std::sync::Arc;

use classref_core::error::{ClassRefError, ClassRefResult, Origin};
use classref_core::names::FqName;
use classref_core::symbols::PropertySymbol;
use classref_core::syntax::{Modifier, SyntaxProperty};
use classref_core::visibility::Visibility;

use crate::annotation_ref::{AnnotationData, AnnotationReference};
use crate::class_ref::ClassReference;
use crate::memo::Memo;
use crate::type_ref::{SyntaxTypeContext, TypeReference};

pub(crate) enum PropertyBacking {
    Syntax {
        property: Arc<SyntaxProperty>,
        context: SyntaxTypeContext,
    },
    Symbol(Arc<PropertySymbol>),
}

pub(crate) struct PropertyData {
    backing: PropertyBacking,
    type_ref: Memo<Option<TypeReference>>,
    annotations: Memo<Vec<Arc<AnnotationData>>>,
}

impl PropertyData {
    pub(crate) fn from_syntax(property: Arc<SyntaxProperty>, context: SyntaxTypeContext) -> Self {
        PropertyData::new(PropertyBacking::Syntax { property, context })
    }

    pub(crate) fn from_symbol(symbol: Arc<PropertySymbol>) -> Self {
        PropertyData::new(PropertyBacking::Symbol(symbol))
    }

    fn new(backing: PropertyBacking) -> Self {
        PropertyData {
            backing,
            type_ref: Memo::new(),
            annotations: Memo::new(),
        }
    }
}

/// A property of a class, declared in its body or by a `val`/`var`
/// primary constructor parameter.
#[derive(Clone)]
pub struct PropertyReference {
    owner: ClassReference,
    data: Arc<PropertyData>,
}

impl PropertyReference {
    pub(crate) fn new(owner: ClassReference, data: Arc<PropertyData>) -> Self {
        PropertyReference { owner, data }
    }

    pub fn owner(&self) -> &ClassReference {
        &self.owner
    }

    pub fn name(&self) -> &str {
        match &self.data.backing {
            PropertyBacking::Syntax { property, .. } => &property.name,
            PropertyBacking::Symbol(symbol) => &symbol.name,
        }
    }

    pub fn fq_name(&self) -> FqName {
        self.owner.fq_name().child(self.name())
    }

    /// The declared type. `None` when syntax leaves it to inference.
    pub fn type_ref(&self) -> Option<TypeReference> {
        self.data
            .type_ref
            .get_or_compute(|| match &self.data.backing {
                PropertyBacking::Syntax { property, context } => property
                    .type_ref
                    .clone()
                    .map(|t| TypeReference::from_syntax(t, context.clone())),
                PropertyBacking::Symbol(symbol) => Some(TypeReference::from_resolved(symbol.type_.clone())),
            })
            .clone()
    }

    pub fn is_mutable(&self) -> bool {
        match &self.data.backing {
            PropertyBacking::Syntax { property, .. } => property.mutable,
            PropertyBacking::Symbol(symbol) => symbol.mutable,
        }
    }

    pub fn is_lateinit(&self) -> bool {
        match &self.data.backing {
            PropertyBacking::Syntax { property, .. } => property.modifiers.contains(&Modifier::Lateinit),
            PropertyBacking::Symbol(symbol) => symbol.lateinit,
        }
    }

    pub fn origin(&self) -> Origin {
        let element = format!("property {}", self.fq_name());
        match &self.data.backing {
            PropertyBacking::Syntax { property, .. } => Origin::syntax(element, property.location.clone()),
            PropertyBacking::Symbol(_) => Origin::symbol(element),
        }
    }

    pub fn visibility(&self) -> ClassRefResult<Visibility> {
        let unresolved = |level: String| {
            ClassRefError::unresolved_visibility(
                format!("Couldn't get visibility {} for property {}.", level, self.fq_name()),
                Some(self.origin()),
            )
        };
        match &self.data.backing {
            PropertyBacking::Syntax { property, .. } => Visibility::from_modifiers(&property.modifiers)
                .map_err(|modifiers| unresolved(format!("{:?}", modifiers))),
            PropertyBacking::Symbol(symbol) => {
                Visibility::try_from(symbol.visibility).map_err(|v| unresolved(format!("{:?}", v)))
            }
        }
    }

    pub fn annotations(&self) -> Vec<AnnotationReference> {
        let data = self.data.annotations.get_or_compute(|| match &self.data.backing {
            PropertyBacking::Syntax { property, context } => property
                .annotations
                .iter()
                .map(|a| Arc::new(AnnotationData::from_syntax(a.clone(), context.clone())))
                .collect(),
            PropertyBacking::Symbol(symbol) => symbol
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

impl fmt::Debug for PropertyReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyReference")
            .field("fq_name", &self.fq_name())
            .field("mutable", &self.is_mutable())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classref_core::names::ClassId;
    use classref_core::symbols::{ClassSymbol, ResolvedType, SymbolVisibility};
    use classref_core::syntax::{
        PropertyKeyword, SyntaxAnnotation, SyntaxClass, SyntaxFile, SyntaxFunction, SyntaxParameter,
        SyntaxTypeRef,
    };
    use classref_core::types::{ClassKind, FunctionKind};

    use crate::module::ModuleDescriptor;

    #[test]
    fn constructor_properties_come_first() {
        let module = ModuleDescriptor::default();
        module.add_files([SyntaxFile::new("app").with_class(
            SyntaxClass::class("User")
                .with_constructor(
                    SyntaxFunction::constructor(FunctionKind::PrimaryConstructor)
                        .with_parameter(
                            SyntaxParameter::new("id", SyntaxTypeRef::new("Long"))
                                .with_property(PropertyKeyword::Val),
                        )
                        .with_parameter(SyntaxParameter::new("seed", SyntaxTypeRef::new("Int")))
                        .with_parameter(
                            SyntaxParameter::new("name", SyntaxTypeRef::new("String"))
                                .with_property(PropertyKeyword::Var)
                                .with_modifier(Modifier::Private),
                        ),
                )
                .with_property(
                    SyntaxProperty::new("cache", Some(SyntaxTypeRef::new("Cache")))
                        .mutable()
                        .with_modifier(Modifier::Lateinit)
                        .with_annotation(SyntaxAnnotation::new("Inject")),
                )
                .with_property(SyntaxProperty::new("label", None)),
        )]);
        let user = module.get_class_reference(&FqName::new("app.User")).unwrap();
        let properties = user.properties();
        let names: Vec<&str> = properties.iter().map(PropertyReference::name).collect();
        assert_eq!(names, vec!["id", "name", "cache", "label"]);

        assert!(!properties[0].is_mutable());
        assert!(properties[1].is_mutable());
        assert_eq!(properties[1].visibility(), Ok(Visibility::Private));
        assert!(properties[2].is_lateinit());
        assert_eq!(properties[2].annotations()[0].short_name(), "Inject");
        assert!(properties[3].type_ref().is_none());
        assert_eq!(properties[0].fq_name().as_str(), "app.User.id");
    }

    #[test]
    fn symbol_properties() {
        let module = ModuleDescriptor::default();
        let mut counter = PropertySymbol::new("counter", ResolvedType::class("kotlin.Int"));
        counter.mutable = true;
        counter.lateinit = true;
        module.add_symbols([ClassSymbol::new(ClassId::top_level("lib", "Stats"), ClassKind::Class)
            .with_property(counter)
            .with_property(
                PropertySymbol::new("secret", ResolvedType::class("kotlin.String"))
                    .with_visibility(SymbolVisibility::PrivateToThis),
            )]);
        let stats = module.get_class_reference(&FqName::new("lib.Stats")).unwrap();
        let properties = stats.properties();
        assert!(properties[0].is_mutable());
        assert!(properties[0].is_lateinit());
        assert_eq!(
            properties[0].type_ref().map(|t| t.to_string()).as_deref(),
            Some("kotlin.Int")
        );
        assert!(properties[1].visibility().is_err());
    }
}
