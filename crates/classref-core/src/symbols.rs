//! Resolved symbol model.
//!
//! Symbols come out of an upstream type-checking phase: every name in them is
//! already fully qualified and every type is a [`ResolvedType`]. Member lists
//! are in scope-enumeration order, which callers must not assume matches the
//! declaration order of the corresponding source.
//!
//! # Type Normalization
//!
//! Types that originate from platform (Java) declarations have ambiguous
//! nullability and are modelled as [`ResolvedType::Flexible`] with a
//! non-nullable lower bound and a nullable upper bound. `T & Any` is modelled
//! as [`ResolvedType::DefinitelyNonNull`]. [`ResolvedType::normalized`] strips
//! both wrappers so callers can inspect the underlying shape.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::names::{ClassId, FqName};
use crate::types::{ClassKind, FunctionKind};

// ============================================================================
// Visibility and Modality
// ============================================================================

/// Visibility as recorded by the type-checker.
///
/// Only the first four levels have a canonical counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SymbolVisibility {
    #[default]
    Public,
    Internal,
    Protected,
    Private,
    PrivateToThis,
    Local,
    Inherited,
    InvisibleFake,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Modality {
    #[default]
    Final,
    Open,
    Abstract,
    Sealed,
}

/// Whether a member is declared in the class or inherited into its scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberOrigin {
    #[default]
    Declaration,
    FakeOverride,
}

// ============================================================================
// Types
// ============================================================================

/// A fully resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolvedType {
    Class {
        fq_name: FqName,
        #[serde(default)]
        arguments: Vec<ResolvedType>,
        #[serde(default)]
        nullable: bool,
    },
    TypeParameter {
        name: String,
        #[serde(default)]
        nullable: bool,
    },
    Flexible {
        lower: Box<ResolvedType>,
        upper: Box<ResolvedType>,
    },
    DefinitelyNonNull {
        inner: Box<ResolvedType>,
    },
    StarProjection,
}

impl ResolvedType {
    pub fn class(fq_name: impl Into<FqName>) -> Self {
        ResolvedType::Class {
            fq_name: fq_name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    pub fn type_parameter(name: impl Into<String>) -> Self {
        ResolvedType::TypeParameter {
            name: name.into(),
            nullable: false,
        }
    }

    /// A platform type `lower..upper`.
    pub fn flexible(lower: ResolvedType, upper: ResolvedType) -> Self {
        ResolvedType::Flexible {
            lower: Box::new(lower),
            upper: Box::new(upper),
        }
    }

    pub fn definitely_non_null(inner: ResolvedType) -> Self {
        ResolvedType::DefinitelyNonNull {
            inner: Box::new(inner),
        }
    }

    /// Add a type argument. Only meaningful for class types.
    pub fn with_argument(mut self, argument: ResolvedType) -> Self {
        if let ResolvedType::Class { arguments, .. } = &mut self {
            arguments.push(argument);
        }
        self
    }

    pub fn nullable(mut self) -> Self {
        match &mut self {
            ResolvedType::Class { nullable, .. } | ResolvedType::TypeParameter { nullable, .. } => {
                *nullable = true;
            }
            _ => {}
        }
        self
    }

    /// Unwrap definitely-non-null wrappers and prefer the lower bound of
    /// flexible types, repeatedly.
    pub fn normalized(&self) -> &ResolvedType {
        let mut current = self;
        loop {
            match current {
                ResolvedType::DefinitelyNonNull { inner } => current = inner,
                ResolvedType::Flexible { lower, .. } => current = lower,
                _ => return current,
            }
        }
    }

    /// The class name of a (normalized) class type.
    pub fn class_fq_name(&self) -> Option<&FqName> {
        match self.normalized() {
            ResolvedType::Class { fq_name, .. } => Some(fq_name),
            _ => None,
        }
    }

    /// The name of a (normalized) type parameter type.
    pub fn type_parameter_name(&self) -> Option<&str> {
        match self.normalized() {
            ResolvedType::TypeParameter { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Type arguments of a (normalized) class type.
    pub fn arguments(&self) -> &[ResolvedType] {
        match self.normalized() {
            ResolvedType::Class { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Nullability as declared. Definitely-non-null types are never nullable;
    /// flexible types report their upper bound.
    pub fn is_nullable(&self) -> bool {
        match self {
            ResolvedType::Class { nullable, .. } | ResolvedType::TypeParameter { nullable, .. } => {
                *nullable
            }
            ResolvedType::Flexible { upper, .. } => upper.is_nullable(),
            ResolvedType::DefinitelyNonNull { .. } => false,
            ResolvedType::StarProjection => true,
        }
    }
}

// ============================================================================
// Annotations
// ============================================================================

/// Compile-time constant used as an annotation argument.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ConstantValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Char(char),
    String(String),
    /// A class literal, `Foo::class`.
    Class(FqName),
    /// An enum entry, `Kind.ENTRY`.
    Enum { class: FqName, entry: String },
    Array(Vec<ConstantValue>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationArgumentSymbol {
    pub name: String,
    pub value: ConstantValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationSymbol {
    pub fq_name: FqName,
    #[serde(default)]
    pub arguments: Vec<AnnotationArgumentSymbol>,
}

impl AnnotationSymbol {
    pub fn new(fq_name: impl Into<FqName>) -> Self {
        AnnotationSymbol {
            fq_name: fq_name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, value: ConstantValue) -> Self {
        self.arguments.push(AnnotationArgumentSymbol {
            name: name.into(),
            value,
        });
        self
    }
}

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueParameterSymbol {
    pub name: String,
    #[serde(rename = "type")]
    pub type_: ResolvedType,
    #[serde(default)]
    pub annotations: Vec<AnnotationSymbol>,
}

impl ValueParameterSymbol {
    pub fn new(name: impl Into<String>, type_: ResolvedType) -> Self {
        ValueParameterSymbol {
            name: name.into(),
            type_,
            annotations: Vec::new(),
        }
    }
}

/// A function or constructor symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub name: String,
    #[serde(default)]
    pub kind: FunctionKind,
    #[serde(default)]
    pub modality: Modality,
    #[serde(default)]
    pub visibility: SymbolVisibility,
    #[serde(default)]
    pub origin: MemberOrigin,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub value_parameters: Vec<ValueParameterSymbol>,
    /// Absent only for constructors.
    #[serde(default)]
    pub return_type: Option<ResolvedType>,
    #[serde(default)]
    pub annotations: Vec<AnnotationSymbol>,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>, return_type: ResolvedType) -> Self {
        FunctionSymbol {
            name: name.into(),
            kind: FunctionKind::Function,
            modality: Modality::Final,
            visibility: SymbolVisibility::Public,
            origin: MemberOrigin::Declaration,
            type_parameters: Vec::new(),
            value_parameters: Vec::new(),
            return_type: Some(return_type),
            annotations: Vec::new(),
        }
    }

    pub fn constructor(kind: FunctionKind) -> Self {
        debug_assert!(kind.is_constructor());
        FunctionSymbol {
            kind,
            return_type: None,
            ..FunctionSymbol::new(crate::syntax::CONSTRUCTOR_NAME, ResolvedType::StarProjection)
        }
    }

    pub fn with_parameter(mut self, parameter: ValueParameterSymbol) -> Self {
        self.value_parameters.push(parameter);
        self
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_visibility(mut self, visibility: SymbolVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationSymbol) -> Self {
        self.annotations.push(annotation);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySymbol {
    pub name: String,
    #[serde(default)]
    pub visibility: SymbolVisibility,
    #[serde(default)]
    pub modality: Modality,
    #[serde(default)]
    pub origin: MemberOrigin,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub lateinit: bool,
    #[serde(rename = "type")]
    pub type_: ResolvedType,
    #[serde(default)]
    pub annotations: Vec<AnnotationSymbol>,
}

impl PropertySymbol {
    pub fn new(name: impl Into<String>, type_: ResolvedType) -> Self {
        PropertySymbol {
            name: name.into(),
            visibility: SymbolVisibility::Public,
            modality: Modality::Final,
            origin: MemberOrigin::Declaration,
            mutable: false,
            lateinit: false,
            type_,
            annotations: Vec::new(),
        }
    }

    pub fn with_visibility(mut self, visibility: SymbolVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationSymbol) -> Self {
        self.annotations.push(annotation);
        self
    }
}

// ============================================================================
// Classes
// ============================================================================

/// A resolved class symbol, including its nested classes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassSymbol {
    pub class_id: ClassId,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modality: Modality,
    #[serde(default)]
    pub visibility: SymbolVisibility,
    #[serde(default)]
    pub is_companion: bool,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    /// Declared supertypes, possibly including the root type.
    #[serde(default)]
    pub super_types: Vec<ResolvedType>,
    #[serde(default)]
    pub annotations: Vec<AnnotationSymbol>,
    #[serde(default)]
    pub constructors: Vec<Arc<FunctionSymbol>>,
    #[serde(default)]
    pub functions: Vec<Arc<FunctionSymbol>>,
    #[serde(default)]
    pub properties: Vec<Arc<PropertySymbol>>,
    #[serde(default)]
    pub nested_classes: Vec<Arc<ClassSymbol>>,
}

impl ClassSymbol {
    pub fn new(class_id: ClassId, kind: ClassKind) -> Self {
        ClassSymbol {
            class_id,
            kind,
            modality: if kind == ClassKind::Interface {
                Modality::Abstract
            } else {
                Modality::Final
            },
            visibility: SymbolVisibility::Public,
            is_companion: false,
            type_parameters: Vec::new(),
            super_types: Vec::new(),
            annotations: Vec::new(),
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            nested_classes: Vec::new(),
        }
    }

    pub fn fq_name(&self) -> FqName {
        self.class_id.fq_name()
    }

    pub fn with_modality(mut self, modality: Modality) -> Self {
        self.modality = modality;
        self
    }

    pub fn with_visibility(mut self, visibility: SymbolVisibility) -> Self {
        self.visibility = visibility;
        self
    }

    pub fn companion(mut self) -> Self {
        self.is_companion = true;
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn with_super_type(mut self, super_type: ResolvedType) -> Self {
        self.super_types.push(super_type);
        self
    }

    pub fn with_annotation(mut self, annotation: AnnotationSymbol) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_constructor(mut self, constructor: FunctionSymbol) -> Self {
        self.constructors.push(Arc::new(constructor));
        self
    }

    pub fn with_function(mut self, function: FunctionSymbol) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    pub fn with_property(mut self, property: PropertySymbol) -> Self {
        self.properties.push(Arc::new(property));
        self
    }

    /// Nest a class. Its id must be a direct child of this class's id.
    pub fn with_nested(mut self, nested: ClassSymbol) -> Self {
        debug_assert_eq!(
            nested.class_id.outer_class_id().as_ref(),
            Some(&self.class_id),
            "nested symbol id must be a child of its outer class"
        );
        self.nested_classes.push(Arc::new(nested));
        self
    }

    /// This symbol and every nested symbol, outer before inner.
    pub fn flatten(self: &Arc<Self>) -> Vec<Arc<ClassSymbol>> {
        let mut out = vec![Arc::clone(self)];
        for nested in &self.nested_classes {
            out.extend(nested.flatten());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalized_prefers_lower_bound_and_unwraps_non_null() {
        let platform = ResolvedType::flexible(
            ResolvedType::class("java.lang.String"),
            ResolvedType::class("java.lang.String").nullable(),
        );
        assert_eq!(
            platform.class_fq_name().map(FqName::as_str),
            Some("java.lang.String")
        );
        assert!(platform.is_nullable());

        let dnn = ResolvedType::definitely_non_null(ResolvedType::type_parameter("T").nullable());
        assert_eq!(dnn.type_parameter_name(), Some("T"));
        assert!(!dnn.is_nullable());
    }

    #[test]
    fn arguments_of_non_class_types_are_empty() {
        assert!(ResolvedType::type_parameter("T").arguments().is_empty());
        let list = ResolvedType::class("kotlin.collections.List")
            .with_argument(ResolvedType::class("kotlin.String"));
        assert_eq!(list.arguments().len(), 1);
    }

    #[test]
    fn resolved_type_json_shape() {
        let json = r#"{"kind":"class","fq_name":"a.Foo","arguments":[{"kind":"type_parameter","name":"T"}]}"#;
        let parsed: ResolvedType = serde_json::from_str(json).unwrap();
        assert_eq!(
            parsed,
            ResolvedType::class("a.Foo").with_argument(ResolvedType::type_parameter("T"))
        );
    }

    #[test]
    fn flatten_lists_nested_symbols() {
        let outer_id = ClassId::top_level("a", "Outer");
        let symbol = Arc::new(
            ClassSymbol::new(outer_id.clone(), ClassKind::Class).with_nested(
                ClassSymbol::new(outer_id.nested("Companion"), ClassKind::Object).companion(),
            ),
        );
        let names: Vec<String> = symbol.flatten().iter().map(|s| s.fq_name().to_string()).collect();
        assert_eq!(names, vec!["a.Outer", "a.Outer.Companion"]);
    }

    #[test]
    fn interfaces_default_to_abstract() {
        let symbol = ClassSymbol::new(ClassId::top_level("a", "Api"), ClassKind::Interface);
        assert_eq!(symbol.modality, Modality::Abstract);
    }
}
