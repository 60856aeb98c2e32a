//! Module context: the per-compilation-unit canonicalization cache.
//!
//! A [`ModuleDescriptor`] owns three concurrent maps keyed by [`FqName`]:
//!
//! - the syntax index (every class of every added file, nested ones included)
//! - the symbol index (every added class symbol, nested ones included)
//! - the reference registry, holding the one canonical [`ClassReference`] per name
//!
//! Lookups by name probe the symbol index first, since resolved symbols are
//! authoritative, and fall back to the syntax index for classes that were
//! generated earlier in the same round and have not been type-checked yet.
//!
//! The registry's per-key entry lock serializes concurrent first inserts, so
//! there is never more than one canonical reference for a name at a time.
//!
//! # Phase Changes
//!
//! When symbols become available for a name that so far only had syntax,
//! [`ModuleDescriptor::add_symbols`] evicts the cached syntax-backed reference.
//! The next lookup creates a symbol-backed one. Both compare equal because
//! class reference equality is by name.
//!
//! Each module gets a process-unique [`ModuleId`], recorded in every reference
//! it creates. Several modules can live side by side (e.g. in tests) without
//! sharing state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, trace};

use classref_core::config::ModuleConfig;
use classref_core::error::{ClassRefError, ClassRefResult};
use classref_core::names::FqName;
use classref_core::symbols::ClassSymbol;
use classref_core::syntax::{SyntaxClassHandle, SyntaxFile};

use crate::class_ref::{ClassBacking, ClassReference};

/// Global counter for assigning unique ids to module contexts.
static NEXT_MODULE_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier of a module context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModuleId(u64);

impl fmt::Display for ModuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "module_{}", self.0)
    }
}

/// Which representation a known class name is available in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Availability {
    SyntaxOnly,
    SymbolOnly,
    Both,
}

pub struct ModuleDescriptor {
    id: ModuleId,
    config: ModuleConfig,
    syntax_classes: DashMap<FqName, SyntaxClassHandle>,
    class_symbols: DashMap<FqName, Arc<ClassSymbol>>,
    references: DashMap<FqName, ClassReference>,
}

impl Default for ModuleDescriptor {
    fn default() -> Self {
        Self::new(ModuleConfig::default())
    }
}

impl fmt::Debug for ModuleDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDescriptor")
            .field("id", &self.id)
            .field("syntax_classes", &self.syntax_classes.len())
            .field("class_symbols", &self.class_symbols.len())
            .field("references", &self.references.len())
            .finish()
    }
}

impl ModuleDescriptor {
    pub fn new(config: ModuleConfig) -> Self {
        let id = ModuleId(NEXT_MODULE_ID.fetch_add(1, Ordering::SeqCst));
        trace!(module = %id, "ModuleDescriptor::new");
        ModuleDescriptor {
            id,
            config,
            syntax_classes: DashMap::new(),
            class_symbols: DashMap::new(),
            references: DashMap::new(),
        }
    }

    pub fn id(&self) -> ModuleId {
        self.id
    }

    pub fn config(&self) -> &ModuleConfig {
        &self.config
    }

    // ========================================================================
    // Population
    // ========================================================================

    /// Index every class of the given files and return their handles, outer
    /// classes before nested ones.
    ///
    /// Re-adding a name replaces its syntax and drops a cached syntax-backed
    /// reference for it.
    pub fn add_files(&self, files: impl IntoIterator<Item = SyntaxFile>) -> Vec<SyntaxClassHandle> {
        let mut handles = Vec::new();
        for file in files {
            let file = Arc::new(file);
            for handle in file.class_handles() {
                let fq_name = handle.fq_name();
                self.syntax_classes.insert(fq_name.clone(), handle.clone());
                if self
                    .references
                    .remove_if(&fq_name, |_, reference| reference.is_syntax())
                    .is_some()
                {
                    debug!(module = %self.id, class = %fq_name, "evicted stale syntax reference");
                }
                handles.push(handle);
            }
        }
        trace!(module = %self.id, count = handles.len(), "indexed syntax classes");
        handles
    }

    /// Index every class symbol (nested ones included) and return them.
    ///
    /// Cached syntax-backed references for these names are evicted so the
    /// authoritative symbol-backed variant is used from now on.
    pub fn add_symbols(&self, classes: impl IntoIterator<Item = ClassSymbol>) -> Vec<Arc<ClassSymbol>> {
        let mut added = Vec::new();
        for class in classes {
            for symbol in Arc::new(class).flatten() {
                let fq_name = symbol.fq_name();
                self.class_symbols.insert(fq_name.clone(), Arc::clone(&symbol));
                if self
                    .references
                    .remove_if(&fq_name, |_, reference| reference.is_syntax())
                    .is_some()
                {
                    debug!(module = %self.id, class = %fq_name, "syntax reference superseded by symbol");
                }
                added.push(symbol);
            }
        }
        trace!(module = %self.id, count = added.len(), "indexed class symbols");
        added
    }

    // ========================================================================
    // Canonical References
    // ========================================================================

    /// The canonical reference for a raw syntax class, created on first request.
    ///
    /// Once a symbol is indexed for the same name the symbol-backed reference
    /// is returned instead, so stale syntax handles held by older references
    /// never bring the syntax variant back.
    pub fn class_reference_from_syntax(&self, handle: &SyntaxClassHandle) -> ClassReference {
        let fq_name = handle.fq_name();
        let symbol = self.class_symbols.get(&fq_name).map(|e| Arc::clone(e.value()));
        if let Some(symbol) = symbol {
            return self.class_reference_from_symbol(&symbol);
        }
        self.syntax_classes
            .entry(fq_name.clone())
            .or_insert_with(|| handle.clone());
        self.canonical(fq_name, || ClassBacking::Syntax(handle.clone()))
    }

    /// The canonical reference for a raw class symbol, created on first request.
    pub fn class_reference_from_symbol(&self, symbol: &Arc<ClassSymbol>) -> ClassReference {
        let fq_name = symbol.fq_name();
        self.class_symbols
            .entry(fq_name.clone())
            .or_insert_with(|| Arc::clone(symbol));
        self.canonical(fq_name, || ClassBacking::Symbol(Arc::clone(symbol)))
    }

    pub(crate) fn class_reference_from_backing(&self, backing: &ClassBacking) -> ClassReference {
        match backing {
            ClassBacking::Syntax(handle) => self.class_reference_from_syntax(handle),
            ClassBacking::Symbol(symbol) => self.class_reference_from_symbol(symbol),
        }
    }

    fn canonical(&self, fq_name: FqName, backing: impl FnOnce() -> ClassBacking) -> ClassReference {
        let reference = self
            .references
            .entry(fq_name)
            .or_insert_with(|| {
                let reference = ClassReference::new(self.id, backing());
                trace!(
                    module = %self.id,
                    class = %reference.fq_name(),
                    variant = reference.variant_name(),
                    "registered class reference"
                );
                reference
            })
            .value()
            .clone();
        reference
    }

    /// Resolve a name, preferring resolved symbols over syntax.
    pub fn get_class_reference_or_null(&self, fq_name: &FqName) -> Option<ClassReference> {
        let symbol = self.class_symbols.get(fq_name).map(|e| Arc::clone(e.value()));
        if let Some(symbol) = symbol {
            return Some(self.class_reference_from_symbol(&symbol));
        }
        let handle = self.syntax_classes.get(fq_name).map(|e| e.value().clone());
        if let Some(handle) = handle {
            return Some(self.class_reference_from_syntax(&handle));
        }
        None
    }

    /// Resolve a name, failing with `UnresolvedReference` when it is unknown.
    pub fn get_class_reference(&self, fq_name: &FqName) -> ClassRefResult<ClassReference> {
        self.get_class_reference_or_null(fq_name).ok_or_else(|| {
            ClassRefError::unresolved_reference(
                format!("Couldn't resolve class reference for {}.", fq_name),
                None,
            )
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn contains_class(&self, fq_name: &FqName) -> bool {
        self.class_symbols.contains_key(fq_name) || self.syntax_classes.contains_key(fq_name)
    }

    pub fn availability(&self, fq_name: &FqName) -> Option<Availability> {
        match (
            self.syntax_classes.contains_key(fq_name),
            self.class_symbols.contains_key(fq_name),
        ) {
            (true, true) => Some(Availability::Both),
            (true, false) => Some(Availability::SyntaxOnly),
            (false, true) => Some(Availability::SymbolOnly),
            (false, false) => None,
        }
    }

    pub fn syntax_class(&self, fq_name: &FqName) -> Option<SyntaxClassHandle> {
        self.syntax_classes.get(fq_name).map(|e| e.value().clone())
    }

    pub fn class_symbol(&self, fq_name: &FqName) -> Option<Arc<ClassSymbol>> {
        self.class_symbols.get(fq_name).map(|e| Arc::clone(e.value()))
    }

    /// Every syntax class handle, sorted by name.
    pub fn syntax_classes(&self) -> Vec<SyntaxClassHandle> {
        let mut handles: Vec<SyntaxClassHandle> =
            self.syntax_classes.iter().map(|e| e.value().clone()).collect();
        handles.sort_by(|a, b| a.class_id.cmp(&b.class_id));
        handles
    }

    /// Every known class name, sorted.
    pub fn class_names(&self) -> Vec<FqName> {
        let mut names: Vec<FqName> = self
            .syntax_classes
            .iter()
            .map(|e| e.key().clone())
            .chain(self.class_symbols.iter().map(|e| e.key().clone()))
            .collect();
        names.sort();
        names.dedup();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classref_core::names::ClassId;
    use classref_core::syntax::SyntaxClass;
    use classref_core::types::ClassKind;

    fn foo_file() -> SyntaxFile {
        SyntaxFile::new("com.example").with_class(SyntaxClass::class("Foo"))
    }

    fn foo_symbol() -> ClassSymbol {
        ClassSymbol::new(ClassId::top_level("com.example", "Foo"), ClassKind::Class)
    }

    #[test]
    fn repeated_lookup_returns_same_instance() {
        let module = ModuleDescriptor::default();
        module.add_files([foo_file()]);
        let name = FqName::new("com.example.Foo");
        let first = module.get_class_reference(&name).unwrap();
        let second = module.get_class_reference(&name).unwrap();
        assert_eq!(first, second);
        assert!(first.ptr_eq(&second));
    }

    #[test]
    fn symbols_win_over_syntax() {
        let module = ModuleDescriptor::default();
        module.add_files([foo_file()]);
        module.add_symbols([foo_symbol()]);
        let reference = module
            .get_class_reference(&FqName::new("com.example.Foo"))
            .unwrap();
        assert!(reference.is_symbol());
        assert_eq!(
            module.availability(&FqName::new("com.example.Foo")),
            Some(Availability::Both)
        );
    }

    #[test]
    fn adding_symbols_evicts_syntax_reference() {
        let module = ModuleDescriptor::default();
        module.add_files([foo_file()]);
        let name = FqName::new("com.example.Foo");
        let before = module.get_class_reference(&name).unwrap();
        assert!(before.is_syntax());

        module.add_symbols([foo_symbol()]);
        let after = module.get_class_reference(&name).unwrap();
        assert!(after.is_symbol());
        assert_eq!(before, after);
        assert!(!before.ptr_eq(&after));
    }

    #[test]
    fn unknown_name_is_unresolved_reference() {
        let module = ModuleDescriptor::default();
        let name = FqName::new("com.example.Missing");
        assert!(module.get_class_reference_or_null(&name).is_none());
        let err = module.get_class_reference(&name).unwrap_err();
        assert!(matches!(err, ClassRefError::UnresolvedReference { .. }));
        assert!(err.message().contains("com.example.Missing"));
    }

    #[test]
    fn from_syntax_registers_unindexed_handle() {
        let module = ModuleDescriptor::default();
        let file = Arc::new(foo_file());
        let handle = file.class_handles().remove(0);
        let reference = module.class_reference_from_syntax(&handle);
        assert!(module.contains_class(reference.fq_name()));
    }

    #[test]
    fn modules_do_not_share_state() {
        let first = ModuleDescriptor::default();
        let second = ModuleDescriptor::default();
        first.add_files([foo_file()]);
        assert_ne!(first.id(), second.id());
        assert!(second
            .get_class_reference_or_null(&FqName::new("com.example.Foo"))
            .is_none());
    }

    #[test]
    fn class_names_are_sorted_and_unique() {
        let module = ModuleDescriptor::default();
        module.add_files([SyntaxFile::new("b").with_class(SyntaxClass::class("Z"))]);
        module.add_files([foo_file()]);
        module.add_symbols([foo_symbol()]);
        let names: Vec<String> = module.class_names().iter().map(ToString::to_string).collect();
        assert_eq!(names, vec!["b.Z", "com.example.Foo"]);
    }
}
