//! Class references: one handle over syntax-backed and symbol-backed classes.
//!
//! A [`ClassReference`] wraps either a [`SyntaxClassHandle`] (a parsed class
//! that has not been type-checked) or a resolved [`ClassSymbol`]. Every query
//! matches on the backing and derives its answer from that representation:
//!
//! - `syntax`: walks the class node and resolves written names through the
//!   file's imports
//! - `symbol`: reads the already resolved member scope
//!
//! # Identity
//!
//! Equality and hashing use the fully-qualified name only. A syntax-backed
//! and a symbol-backed reference for the same class are equal even though they
//! are different instances; use [`ClassReference::ptr_eq`] to compare
//! instances.
//!
//! # Views
//!
//! Structural views (members, supertypes, enclosing and inner classes) are
//! computed on first access and cached on the instance for its lifetime. A
//! view that fails caches the failure as well. Views that point at other
//! classes store names or raw backings, never other references, and
//! materialize canonical references through the module on each call.

mod supertypes;
mod symbol;
mod syntax;

use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use tracing::trace;

use classref_core::error::{ClassRefError, ClassRefResult, Origin};
use classref_core::names::{ClassId, FqName};
use classref_core::symbols::{ClassSymbol, Modality};
use classref_core::syntax::{Modifier, SyntaxClassHandle};
use classref_core::types::ClassKind;
use classref_core::visibility::Visibility;

use crate::annotation_ref::{AnnotationData, AnnotationReference};
use crate::function_ref::{FunctionData, FunctionReference};
use crate::generics;
use crate::memo::Memo;
use crate::module::{ModuleDescriptor, ModuleId};
use crate::property_ref::{PropertyData, PropertyReference};
use crate::type_ref::TypeReference;

pub use supertypes::SuperTypes;

// ============================================================================
// Backing
// ============================================================================

/// The raw representation a class reference is derived from.
#[derive(Debug, Clone)]
pub enum ClassBacking {
    Syntax(SyntaxClassHandle),
    Symbol(Arc<ClassSymbol>),
}

impl ClassBacking {
    pub fn class_id(&self) -> &ClassId {
        match self {
            ClassBacking::Syntax(handle) => &handle.class_id,
            ClassBacking::Symbol(symbol) => &symbol.class_id,
        }
    }

    fn kind(&self) -> ClassKind {
        match self {
            ClassBacking::Syntax(handle) => handle.node.kind,
            ClassBacking::Symbol(symbol) => symbol.kind,
        }
    }

    fn is_companion(&self) -> bool {
        match self {
            ClassBacking::Syntax(handle) => handle.node.is_companion(),
            ClassBacking::Symbol(symbol) => symbol.is_companion,
        }
    }
}

// ============================================================================
// ClassReference
// ============================================================================

/// A class known either as syntax or as a resolved symbol.
///
/// Cheap to clone; clones share cached views.
#[derive(Clone)]
pub struct ClassReference {
    inner: Arc<ClassInner>,
}

struct ClassInner {
    class_id: ClassId,
    fq_name: FqName,
    module_id: ModuleId,
    backing: ClassBacking,
    views: ClassViews,
}

#[derive(Default)]
struct ClassViews {
    constructors: Memo<Vec<Arc<FunctionData>>>,
    functions: Memo<Vec<Arc<FunctionData>>>,
    properties: Memo<Vec<Arc<PropertyData>>>,
    annotations: Memo<Vec<Arc<AnnotationData>>>,
    direct_super_types: Memo<Vec<TypeReference>>,
    direct_super_classes: Memo<ClassRefResult<Vec<FqName>>>,
    enclosing_classes: Memo<ClassRefResult<Vec<ClassBacking>>>,
    inner_classes: Memo<Vec<ClassBacking>>,
}

impl ClassReference {
    pub(crate) fn new(module_id: ModuleId, backing: ClassBacking) -> Self {
        let class_id = backing.class_id().clone();
        ClassReference {
            inner: Arc::new(ClassInner {
                fq_name: class_id.fq_name(),
                class_id,
                module_id,
                backing,
                views: ClassViews::default(),
            }),
        }
    }

    pub fn class_id(&self) -> &ClassId {
        &self.inner.class_id
    }

    pub fn fq_name(&self) -> &FqName {
        &self.inner.fq_name
    }

    pub fn short_name(&self) -> &str {
        self.inner.class_id.short_class_name()
    }

    pub fn package_fq_name(&self) -> &FqName {
        self.inner.class_id.package_fq_name()
    }

    /// The module context that created this reference.
    pub fn module_id(&self) -> ModuleId {
        self.inner.module_id
    }

    pub fn backing(&self) -> &ClassBacking {
        &self.inner.backing
    }

    pub fn is_syntax(&self) -> bool {
        matches!(self.inner.backing, ClassBacking::Syntax(_))
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self.inner.backing, ClassBacking::Symbol(_))
    }

    /// `"syntax"` or `"symbol"`, for logs and reports.
    pub fn variant_name(&self) -> &'static str {
        match self.inner.backing {
            ClassBacking::Syntax(_) => "syntax",
            ClassBacking::Symbol(_) => "symbol",
        }
    }

    /// Whether both handles point at the same instance.
    pub fn ptr_eq(&self, other: &ClassReference) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// The element diagnostics about this class are attributed to.
    pub fn origin(&self) -> Origin {
        match &self.inner.backing {
            ClassBacking::Syntax(handle) => Origin::syntax(
                format!("class {}", self.inner.fq_name),
                handle.node.location.clone(),
            ),
            ClassBacking::Symbol(_) => Origin::symbol(format!("class {}", self.inner.fq_name)),
        }
    }

    // ========================================================================
    // Classification
    // ========================================================================

    pub fn kind(&self) -> ClassKind {
        self.inner.backing.kind()
    }

    pub fn is_interface(&self) -> bool {
        self.kind() == ClassKind::Interface
    }

    /// Syntax: an `abstract` modifier is present. Symbol: the modality is
    /// abstract, which includes interfaces.
    pub fn is_abstract(&self) -> bool {
        match &self.inner.backing {
            ClassBacking::Syntax(handle) => handle.node.has_modifier(Modifier::Abstract),
            ClassBacking::Symbol(symbol) => symbol.modality == Modality::Abstract,
        }
    }

    /// Objects, companion objects included.
    pub fn is_object(&self) -> bool {
        self.kind() == ClassKind::Object
    }

    pub fn is_companion(&self) -> bool {
        self.inner.backing.is_companion()
    }

    pub fn is_annotation_class(&self) -> bool {
        self.kind() == ClassKind::AnnotationClass
    }

    pub fn is_enum_class(&self) -> bool {
        self.kind() == ClassKind::EnumClass
    }

    pub fn is_generic_class(&self) -> bool {
        !self.type_parameters().is_empty()
    }

    /// Declared type parameter names, in order.
    pub fn type_parameters(&self) -> &[String] {
        match &self.inner.backing {
            ClassBacking::Syntax(handle) => &handle.node.type_parameters,
            ClassBacking::Symbol(symbol) => &symbol.type_parameters,
        }
    }

    /// Position of `name` among the declared type parameters.
    pub fn index_of_type_parameter(&self, name: &str) -> Option<usize> {
        self.type_parameters().iter().position(|p| p == name)
    }

    pub fn visibility(&self) -> ClassRefResult<Visibility> {
        match &self.inner.backing {
            ClassBacking::Syntax(handle) => Visibility::from_modifiers(&handle.node.modifiers)
                .map_err(|modifiers| {
                    ClassRefError::unresolved_visibility(
                        format!(
                            "Couldn't get visibility {:?} for class {}.",
                            modifiers, self.inner.fq_name
                        ),
                        Some(self.origin()),
                    )
                }),
            ClassBacking::Symbol(symbol) => Visibility::try_from(symbol.visibility).map_err(|v| {
                ClassRefError::unresolved_visibility(
                    format!(
                        "Couldn't get visibility {:?} for class {}.",
                        v, self.inner.fq_name
                    ),
                    Some(self.origin()),
                )
            }),
        }
    }

    // ========================================================================
    // Members
    // ========================================================================

    pub fn constructors(&self) -> Vec<FunctionReference> {
        let data = self.inner.views.constructors.get_or_compute(|| {
            trace!(class = %self.inner.fq_name, "computing constructors");
            match &self.inner.backing {
                ClassBacking::Syntax(handle) => syntax::constructors(handle),
                ClassBacking::Symbol(symbol) => symbol::constructors(symbol),
            }
        });
        self.function_references(data)
    }

    /// Functions declared in the class body. Constructors and members of
    /// companion objects are not included.
    pub fn functions(&self) -> Vec<FunctionReference> {
        let data = self.inner.views.functions.get_or_compute(|| {
            trace!(class = %self.inner.fq_name, "computing functions");
            match &self.inner.backing {
                ClassBacking::Syntax(handle) => syntax::functions(handle),
                ClassBacking::Symbol(symbol) => symbol::functions(symbol),
            }
        });
        self.function_references(data)
    }

    /// Properties, including those declared by `val`/`var` primary
    /// constructor parameters.
    pub fn properties(&self) -> Vec<PropertyReference> {
        let data = self.inner.views.properties.get_or_compute(|| {
            trace!(class = %self.inner.fq_name, "computing properties");
            match &self.inner.backing {
                ClassBacking::Syntax(handle) => syntax::properties(handle),
                ClassBacking::Symbol(symbol) => symbol::properties(symbol),
            }
        });
        data.iter()
            .map(|d| PropertyReference::new(self.clone(), Arc::clone(d)))
            .collect()
    }

    pub fn annotations(&self) -> Vec<AnnotationReference> {
        let data = self.inner.views.annotations.get_or_compute(|| {
            trace!(class = %self.inner.fq_name, "computing annotations");
            match &self.inner.backing {
                ClassBacking::Syntax(handle) => syntax::annotations(handle),
                ClassBacking::Symbol(symbol) => symbol::annotations(symbol),
            }
        });
        data.iter()
            .map(|d| AnnotationReference::new(self.clone(), Arc::clone(d)))
            .collect()
    }

    fn function_references(&self, data: &[Arc<FunctionData>]) -> Vec<FunctionReference> {
        data.iter()
            .map(|d| FunctionReference::new(self.clone(), Arc::clone(d)))
            .collect()
    }

    // ========================================================================
    // Hierarchy
    // ========================================================================

    /// Declared supertypes with their type arguments, in declaration order.
    /// The universal root type is left out.
    pub fn direct_super_type_references(&self, module: &ModuleDescriptor) -> &[TypeReference] {
        self.inner.views.direct_super_types.get_or_compute(|| {
            trace!(class = %self.inner.fq_name, "computing direct supertypes");
            let declared = match &self.inner.backing {
                ClassBacking::Syntax(handle) => syntax::super_types(handle),
                ClassBacking::Symbol(symbol) => symbol::super_types(symbol),
            };
            let root = &module.config().root_type;
            declared
                .into_iter()
                .filter(|t| !matches!(t.fq_name(module), Ok(Some(ref fq_name)) if fq_name == root))
                .collect()
        })
    }

    /// Classes named by the declared supertypes, in declaration order.
    ///
    /// Fails with `UnresolvedReference` if a supertype is unknown to the
    /// module. The failure is cached.
    pub fn direct_super_class_references(
        &self,
        module: &ModuleDescriptor,
    ) -> ClassRefResult<Vec<ClassReference>> {
        let names = self.inner.views.direct_super_classes.get_or_try_compute(|| {
            let mut names = Vec::new();
            for super_type in self.direct_super_type_references(module) {
                let Some(fq_name) = super_type
                    .fq_name(module)
                    .map_err(|e| e.or_origin(|| self.origin()))?
                else {
                    continue;
                };
                if !module.contains_class(&fq_name) {
                    return Err(ClassRefError::unresolved_reference(
                        format!("Couldn't resolve class reference for {}.", fq_name),
                        Some(self.origin()),
                    ));
                }
                if !names.contains(&fq_name) {
                    names.push(fq_name);
                }
            }
            Ok(names)
        })?;
        names
            .iter()
            .map(|fq_name| module.get_class_reference(fq_name))
            .collect()
    }

    /// Every ancestor, breadth-first by distance, each name once.
    ///
    /// With `include_self` this class comes first; otherwise it is never
    /// yielded, even when the hierarchy is cyclic. The sequence is lazy: a
    /// class's supertypes are looked up only when the walk moves past it.
    pub fn all_super_type_class_references<'m>(
        &self,
        module: &'m ModuleDescriptor,
        include_self: bool,
    ) -> SuperTypes<'m> {
        SuperTypes::new(module, self.clone(), include_self)
    }

    /// The lexically enclosing classes, outermost first, ending with this
    /// class. Never empty.
    pub fn enclosing_classes_with_self(
        &self,
        module: &ModuleDescriptor,
    ) -> ClassRefResult<Vec<ClassReference>> {
        let outers = self.inner.views.enclosing_classes.get_or_try_compute(|| {
            trace!(class = %self.inner.fq_name, "computing enclosing classes");
            match &self.inner.backing {
                ClassBacking::Syntax(handle) => syntax::enclosing_classes(handle),
                ClassBacking::Symbol(symbol) => symbol::enclosing_classes(module, symbol),
            }
            .map_err(|e| e.or_origin(|| self.origin()))
        })?;
        let mut chain: Vec<ClassReference> = outers
            .iter()
            .map(|backing| module.class_reference_from_backing(backing))
            .collect();
        chain.push(self.clone());
        Ok(chain)
    }

    /// The immediately enclosing class, `None` for top-level classes.
    pub fn enclosing_class(&self, module: &ModuleDescriptor) -> ClassRefResult<Option<ClassReference>> {
        let mut chain = self.enclosing_classes_with_self(module)?;
        let position = chain.iter().rposition(|c| c == self).unwrap_or(0);
        if position == 0 {
            return Ok(None);
        }
        Ok(Some(chain.swap_remove(position - 1)))
    }

    /// Nested classes at every depth, level by level, declaration order
    /// within a level.
    pub fn inner_classes(&self, module: &ModuleDescriptor) -> Vec<ClassReference> {
        let backings = self.inner.views.inner_classes.get_or_compute(|| {
            trace!(class = %self.inner.fq_name, "computing inner classes");
            let mut out = Vec::new();
            let mut queue: VecDeque<ClassBacking> = nested_backings(&self.inner.backing).into();
            while let Some(backing) = queue.pop_front() {
                queue.extend(nested_backings(&backing));
                out.push(backing);
            }
            out
        });
        backings
            .iter()
            .map(|backing| module.class_reference_from_backing(backing))
            .collect()
    }

    /// Companion objects declared directly in this class.
    pub fn companion_objects(&self, module: &ModuleDescriptor) -> ClassRefResult<Vec<ClassReference>> {
        let mut companions = Vec::new();
        for inner in self.inner_classes(module) {
            if !inner.is_companion() {
                continue;
            }
            if inner.enclosing_class(module)?.as_ref() == Some(self) {
                companions.push(inner);
            }
        }
        Ok(companions)
    }

    // ========================================================================
    // Generics
    // ========================================================================

    /// Resolve the type variable `name` of `declaring` to the concrete type
    /// this class supplies for it through its supertypes.
    ///
    /// `None` for symbol-backed receivers, when this class is `declaring`, or
    /// when no supertype path supplies an argument.
    pub fn resolve_generic_type(
        &self,
        module: &ModuleDescriptor,
        declaring: &ClassReference,
        name: &str,
    ) -> ClassRefResult<Option<TypeReference>> {
        generics::resolve_generic_type(module, self, declaring, name)
    }
}

fn nested_backings(backing: &ClassBacking) -> Vec<ClassBacking> {
    match backing {
        ClassBacking::Syntax(handle) => handle
            .nested_handles()
            .into_iter()
            .map(ClassBacking::Syntax)
            .collect(),
        ClassBacking::Symbol(symbol) => symbol
            .nested_classes
            .iter()
            .map(|nested| ClassBacking::Symbol(Arc::clone(nested)))
            .collect(),
    }
}

impl PartialEq for ClassReference {
    fn eq(&self, other: &Self) -> bool {
        self.inner.fq_name == other.inner.fq_name
    }
}

impl Eq for ClassReference {}

impl Hash for ClassReference {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.fq_name.hash(state);
    }
}

impl fmt::Display for ClassReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.inner.fq_name)
    }
}

impl fmt::Debug for ClassReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassReference")
            .field("fq_name", &self.inner.fq_name)
            .field("variant", &self.variant_name())
            .field("module", &self.inner.module_id)
            .finish()
    }
}
