//! Unresolved syntax model.
//!
//! These are the parsed-but-not-type-checked declarations the front-end hands
//! over, typically for classes generated earlier in the current round. Names
//! inside a [`SyntaxTypeRef`] are kept exactly as written; turning them into
//! qualified names is the resolver's job and needs the containing
//! [`SyntaxFile`]'s package and imports.
//!
//! Children are shared through `Arc` so that references can hold on to a node
//! without copying the tree. A [`SyntaxClassHandle`] is what callers pass
//! around as "the raw syntax node": the class node plus its file and its
//! computed [`ClassId`].

use std::fmt;
use std::sync::Arc;

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize};

use crate::names::{ClassId, FqName};
use crate::types::{ClassKind, FunctionKind, Location};

// ============================================================================
// Modifiers
// ============================================================================

/// Modifier keyword on a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Modifier {
    Public,
    Internal,
    Protected,
    Private,
    Abstract,
    Open,
    Final,
    Sealed,
    Data,
    Inner,
    Companion,
    Override,
    Lateinit,
    Const,
    Suspend,
    Inline,
    Value,
}

impl Modifier {
    pub fn is_visibility(self) -> bool {
        matches!(
            self,
            Modifier::Public | Modifier::Internal | Modifier::Protected | Modifier::Private
        )
    }
}

/// `val` or `var` on a primary constructor parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PropertyKeyword {
    Val,
    Var,
}

// ============================================================================
// Type References
// ============================================================================

/// A type as written in source: `Factory<Service>?`, `T`, `Map.Entry<K, V>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SyntaxTypeRef {
    /// The name as written, possibly dotted. `*` for a star projection.
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<SyntaxTypeRef>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub nullable: bool,
}

impl SyntaxTypeRef {
    pub fn new(name: impl Into<String>) -> Self {
        SyntaxTypeRef {
            name: name.into(),
            arguments: Vec::new(),
            nullable: false,
        }
    }

    pub fn star() -> Self {
        SyntaxTypeRef::new("*")
    }

    pub fn with_argument(mut self, argument: SyntaxTypeRef) -> Self {
        self.arguments.push(argument);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn is_star_projection(&self) -> bool {
        self.name == "*"
    }

    /// A bare single-segment name without arguments, i.e. something that
    /// could be a type variable.
    pub fn is_simple_name(&self) -> bool {
        self.arguments.is_empty() && !self.name.contains('.') && !self.is_star_projection()
    }
}

impl fmt::Display for SyntaxTypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.arguments.is_empty() {
            f.write_str("<")?;
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", argument)?;
            }
            f.write_str(">")?;
        }
        if self.nullable {
            f.write_str("?")?;
        }
        Ok(())
    }
}

// ============================================================================
// Annotations
// ============================================================================

/// A single annotation argument; the value is the expression text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxAnnotationArgument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub value: String,
}

/// An annotation entry such as `@ContributesTo(AppScope::class)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxAnnotation {
    pub type_ref: SyntaxTypeRef,
    #[serde(default)]
    pub arguments: Vec<SyntaxAnnotationArgument>,
}

impl SyntaxAnnotation {
    pub fn new(name: impl Into<String>) -> Self {
        SyntaxAnnotation {
            type_ref: SyntaxTypeRef::new(name),
            arguments: Vec::new(),
        }
    }

    pub fn with_argument(mut self, value: impl Into<String>) -> Self {
        self.arguments.push(SyntaxAnnotationArgument {
            name: None,
            value: value.into(),
        });
        self
    }

    pub fn with_named_argument(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push(SyntaxAnnotationArgument {
            name: Some(name.into()),
            value: value.into(),
        });
        self
    }
}

// ============================================================================
// Members
// ============================================================================

/// A value parameter of a function or constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxParameter {
    pub name: String,
    #[serde(default)]
    pub type_ref: Option<SyntaxTypeRef>,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub annotations: Vec<SyntaxAnnotation>,
    /// Set for primary constructor parameters that also declare a property.
    #[serde(default)]
    pub property: Option<PropertyKeyword>,
}

impl SyntaxParameter {
    pub fn new(name: impl Into<String>, type_ref: SyntaxTypeRef) -> Self {
        SyntaxParameter {
            name: name.into(),
            type_ref: Some(type_ref),
            modifiers: Vec::new(),
            annotations: Vec::new(),
            property: None,
        }
    }

    pub fn with_property(mut self, keyword: PropertyKeyword) -> Self {
        self.property = Some(keyword);
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_annotation(mut self, annotation: SyntaxAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }
}

/// A function or constructor declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxFunction {
    pub name: String,
    #[serde(default)]
    pub kind: FunctionKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<SyntaxParameter>,
    /// Absent when the return type is inferred from an expression body.
    #[serde(default)]
    pub return_type: Option<SyntaxTypeRef>,
    #[serde(default)]
    pub annotations: Vec<SyntaxAnnotation>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// Name given to constructors.
pub const CONSTRUCTOR_NAME: &str = "<init>";

impl SyntaxFunction {
    pub fn new(name: impl Into<String>) -> Self {
        SyntaxFunction {
            name: name.into(),
            kind: FunctionKind::Function,
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            parameters: Vec::new(),
            return_type: None,
            annotations: Vec::new(),
            location: None,
        }
    }

    pub fn constructor(kind: FunctionKind) -> Self {
        debug_assert!(kind.is_constructor());
        SyntaxFunction {
            kind,
            ..SyntaxFunction::new(CONSTRUCTOR_NAME)
        }
    }

    pub fn with_parameter(mut self, parameter: SyntaxParameter) -> Self {
        self.parameters.push(parameter);
        self
    }

    pub fn with_return_type(mut self, return_type: SyntaxTypeRef) -> Self {
        self.return_type = Some(return_type);
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_annotation(mut self, annotation: SyntaxAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }
}

/// A property declared in a class body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxProperty {
    pub name: String,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Absent when the type is inferred from an initializer.
    #[serde(default)]
    pub type_ref: Option<SyntaxTypeRef>,
    #[serde(default)]
    pub annotations: Vec<SyntaxAnnotation>,
    #[serde(default)]
    pub mutable: bool,
    #[serde(default)]
    pub location: Option<Location>,
}

impl SyntaxProperty {
    pub fn new(name: impl Into<String>, type_ref: Option<SyntaxTypeRef>) -> Self {
        SyntaxProperty {
            name: name.into(),
            modifiers: Vec::new(),
            type_ref,
            annotations: Vec::new(),
            mutable: false,
            location: None,
        }
    }

    pub fn mutable(mut self) -> Self {
        self.mutable = true;
        self
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_annotation(mut self, annotation: SyntaxAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// The property declared by a `val`/`var` primary constructor parameter.
    pub fn from_constructor_parameter(parameter: &SyntaxParameter) -> Option<Self> {
        let keyword = parameter.property?;
        Some(SyntaxProperty {
            name: parameter.name.clone(),
            modifiers: parameter.modifiers.clone(),
            type_ref: parameter.type_ref.clone(),
            annotations: parameter.annotations.clone(),
            mutable: keyword == PropertyKeyword::Var,
            location: None,
        })
    }
}

// ============================================================================
// Classes
// ============================================================================

/// A class, interface or object declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxClass {
    #[serde(deserialize_with = "deserialize_class_name")]
    pub name: String,
    #[serde(default)]
    pub kind: ClassKind,
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    #[serde(default)]
    pub type_parameters: Vec<String>,
    #[serde(default)]
    pub super_types: Vec<SyntaxTypeRef>,
    #[serde(default)]
    pub annotations: Vec<SyntaxAnnotation>,
    #[serde(default)]
    pub constructors: Vec<Arc<SyntaxFunction>>,
    #[serde(default)]
    pub functions: Vec<Arc<SyntaxFunction>>,
    #[serde(default)]
    pub properties: Vec<Arc<SyntaxProperty>>,
    /// Directly nested class-like declarations.
    #[serde(default)]
    pub classes: Vec<Arc<SyntaxClass>>,
    #[serde(default)]
    pub location: Option<Location>,
}

/// A declared class name is a single non-empty segment.
fn deserialize_class_name<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let name = String::deserialize(deserializer)?;
    if name.is_empty() || name.contains(['.', '/']) {
        return Err(de::Error::invalid_value(
            Unexpected::Str(&name),
            &"a non-empty class name without '.' or '/'",
        ));
    }
    Ok(name)
}

impl SyntaxClass {
    pub fn new(name: impl Into<String>, kind: ClassKind) -> Self {
        SyntaxClass {
            name: name.into(),
            kind,
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            super_types: Vec::new(),
            annotations: Vec::new(),
            constructors: Vec::new(),
            functions: Vec::new(),
            properties: Vec::new(),
            classes: Vec::new(),
            location: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        SyntaxClass::new(name, ClassKind::Class)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        SyntaxClass::new(name, ClassKind::Interface)
    }

    pub fn object(name: impl Into<String>) -> Self {
        SyntaxClass::new(name, ClassKind::Object)
    }

    /// A companion object; Kotlin names an unnamed one `Companion`.
    pub fn companion(name: impl Into<String>) -> Self {
        SyntaxClass::object(name).with_modifier(Modifier::Companion)
    }

    pub fn with_modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn with_type_parameter(mut self, name: impl Into<String>) -> Self {
        self.type_parameters.push(name.into());
        self
    }

    pub fn with_super_type(mut self, super_type: SyntaxTypeRef) -> Self {
        self.super_types.push(super_type);
        self
    }

    pub fn with_annotation(mut self, annotation: SyntaxAnnotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    pub fn with_constructor(mut self, constructor: SyntaxFunction) -> Self {
        self.constructors.push(Arc::new(constructor));
        self
    }

    pub fn with_function(mut self, function: SyntaxFunction) -> Self {
        self.functions.push(Arc::new(function));
        self
    }

    pub fn with_property(mut self, property: SyntaxProperty) -> Self {
        self.properties.push(Arc::new(property));
        self
    }

    pub fn with_nested(mut self, nested: SyntaxClass) -> Self {
        self.classes.push(Arc::new(nested));
        self
    }

    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    pub fn has_modifier(&self, modifier: Modifier) -> bool {
        self.modifiers.contains(&modifier)
    }

    pub fn is_companion(&self) -> bool {
        self.kind == ClassKind::Object && self.has_modifier(Modifier::Companion)
    }

    /// The primary constructor, if declared.
    pub fn primary_constructor(&self) -> Option<&Arc<SyntaxFunction>> {
        self.constructors
            .iter()
            .find(|c| c.kind == FunctionKind::PrimaryConstructor)
    }
}

// ============================================================================
// Files
// ============================================================================

/// An import directive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxImport {
    /// The imported path, e.g. `com.example.Foo` or `com.example` for a star import.
    pub path: FqName,
    #[serde(default)]
    pub alias: Option<String>,
    /// `import com.example.*`
    #[serde(default)]
    pub all_under: bool,
}

impl SyntaxImport {
    pub fn new(path: impl Into<FqName>) -> Self {
        SyntaxImport {
            path: path.into(),
            alias: None,
            all_under: false,
        }
    }

    pub fn aliased(path: impl Into<FqName>, alias: impl Into<String>) -> Self {
        SyntaxImport {
            alias: Some(alias.into()),
            ..SyntaxImport::new(path)
        }
    }

    pub fn all_under(package: impl Into<FqName>) -> Self {
        SyntaxImport {
            all_under: true,
            ..SyntaxImport::new(package)
        }
    }

    /// The name this import binds in the file, `None` for star imports.
    pub fn imported_name(&self) -> Option<&str> {
        if self.all_under {
            return None;
        }
        Some(self.alias.as_deref().unwrap_or_else(|| self.path.short_name()))
    }
}

/// A parsed source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SyntaxFile {
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub package: FqName,
    #[serde(default)]
    pub imports: Vec<SyntaxImport>,
    #[serde(default)]
    pub classes: Vec<Arc<SyntaxClass>>,
}

impl SyntaxFile {
    pub fn new(package: impl Into<FqName>) -> Self {
        SyntaxFile {
            package: package.into(),
            ..SyntaxFile::default()
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_import(mut self, import: SyntaxImport) -> Self {
        self.imports.push(import);
        self
    }

    pub fn with_class(mut self, class: SyntaxClass) -> Self {
        self.classes.push(Arc::new(class));
        self
    }

    /// Handles for every class in the file, outer classes before their
    /// nested classes, in declaration order.
    pub fn class_handles(self: &Arc<Self>) -> Vec<SyntaxClassHandle> {
        let mut handles = Vec::new();
        for class in &self.classes {
            let class_id = ClassId::top_level(self.package.clone(), &class.name);
            collect_handles(self, class, class_id, &mut handles);
        }
        handles
    }

    /// Locate the class with the given id by walking down from the top level.
    pub fn find_class(self: &Arc<Self>, class_id: &ClassId) -> Option<SyntaxClassHandle> {
        if class_id.package_fq_name() != &self.package {
            return None;
        }
        let mut segments = class_id.relative_class_name().segments();
        let first = segments.next()?;
        let mut node = self.classes.iter().find(|c| c.name == first)?;
        for segment in segments {
            node = node.classes.iter().find(|c| c.name == segment)?;
        }
        Some(SyntaxClassHandle {
            class_id: class_id.clone(),
            node: Arc::clone(node),
            file: Arc::clone(self),
        })
    }
}

fn collect_handles(
    file: &Arc<SyntaxFile>,
    class: &Arc<SyntaxClass>,
    class_id: ClassId,
    out: &mut Vec<SyntaxClassHandle>,
) {
    out.push(SyntaxClassHandle {
        class_id: class_id.clone(),
        node: Arc::clone(class),
        file: Arc::clone(file),
    });
    for nested in &class.classes {
        collect_handles(file, nested, class_id.nested(&nested.name), out);
    }
}

/// A syntax class node together with the file it lives in and its identity.
#[derive(Debug, Clone)]
pub struct SyntaxClassHandle {
    pub class_id: ClassId,
    pub node: Arc<SyntaxClass>,
    pub file: Arc<SyntaxFile>,
}

impl SyntaxClassHandle {
    pub fn fq_name(&self) -> FqName {
        self.class_id.fq_name()
    }

    /// Handles for the directly nested classes, in declaration order.
    pub fn nested_handles(&self) -> Vec<SyntaxClassHandle> {
        self.node
            .classes
            .iter()
            .map(|nested| SyntaxClassHandle {
                class_id: self.class_id.nested(&nested.name),
                node: Arc::clone(nested),
                file: Arc::clone(&self.file),
            })
            .collect()
    }
}
