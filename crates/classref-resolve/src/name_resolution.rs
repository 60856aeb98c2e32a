//! Resolving written type names in syntax to qualified names.
//!
//! Syntax keeps names as the author wrote them (`Foo`, `Outer.Inner`,
//! `com.example.Foo`). A name is looked up in this order, first hit wins:
//!
//! 1. Classes nested in the context class or any lexically enclosing class,
//!    innermost scope first
//! 2. Explicit imports, by imported name or alias
//! 3. The file's own package
//! 4. Star imports, in declaration order
//! 5. The name as written, taken as fully qualified
//! 6. Default-import packages from [`ModuleConfig`](classref_core::config::ModuleConfig)
//!
//! Steps other than explicit imports only accept candidates the module
//! knows about. An explicit import binds its name even when the target is not
//! part of the unit. As a last resort a dotted name starting with a lowercase
//! segment is assumed to be package-qualified.

use classref_core::names::FqName;
use tracing::trace;

use crate::module::ModuleDescriptor;
use crate::type_ref::SyntaxTypeContext;

/// Resolve `written` in `context`, or `None` if no candidate matches.
pub(crate) fn resolve_written_name(
    module: &ModuleDescriptor,
    context: &SyntaxTypeContext,
    written: &str,
) -> Option<FqName> {
    let (first, rest) = match written.split_once('.') {
        Some((first, rest)) => (first, rest),
        None => (written, ""),
    };
    let with_rest = |base: FqName| base.child(rest);

    for scope in context.class_id().outer_chain_with_self().iter().rev() {
        let candidate = with_rest(scope.fq_name().child(first));
        if module.contains_class(&candidate) {
            return Some(candidate);
        }
    }

    let file = context.file();
    for import in &file.imports {
        if import.imported_name() == Some(first) {
            return Some(with_rest(import.path.clone()));
        }
    }

    let same_package = with_rest(file.package.child(first));
    if module.contains_class(&same_package) {
        return Some(same_package);
    }

    for import in file.imports.iter().filter(|i| i.all_under) {
        let candidate = with_rest(import.path.child(first));
        if module.contains_class(&candidate) {
            return Some(candidate);
        }
    }

    let as_written = FqName::new(written);
    if module.contains_class(&as_written) {
        return Some(as_written);
    }

    for package in &module.config().default_imports {
        let candidate = with_rest(package.child(first));
        if module.contains_class(&candidate) {
            return Some(candidate);
        }
    }

    if !rest.is_empty() && first.starts_with(|c: char| c.is_ascii_lowercase()) {
        return Some(as_written);
    }

    trace!(name = written, context = %context.class_id(), "no candidate for written name");
    None
}
