//! Generic type parameter resolution over the class hierarchy.
//!
//! Given an implementing class `C`, a class `D` that declares a type variable
//! `T`, find the type `C` supplies for `T`:
//!
//! ```text
//! interface Factory<T>                        // D, T at index 0
//! abstract class Base<S> : Factory<S>         // intermediate
//! class ServiceFactory : Base<Service>()      // C
//! ```
//!
//! 1. Find the index of `T` in `D`'s type parameters.
//! 2. Walk `C` and its ancestors breadth-first. The first class whose direct
//!    supertype list names `D` supplies the argument at that index.
//! 3. If the argument is itself a type variable of that class (`S` above),
//!    repeat with that class as the new `D`.
//!
//! Only syntax-backed receivers take part; symbols already carry substituted
//! member types. A dead end is reported as `None`, never as an error.

use std::collections::HashSet;

use tracing::debug;

use classref_core::error::ClassRefResult;
use classref_core::names::FqName;

use crate::class_ref::ClassReference;
use crate::module::ModuleDescriptor;
use crate::type_ref::TypeReference;

pub(crate) fn resolve_generic_type(
    module: &ModuleDescriptor,
    implementing: &ClassReference,
    declaring: &ClassReference,
    name: &str,
) -> ClassRefResult<Option<TypeReference>> {
    if !implementing.is_syntax() {
        debug!(class = %implementing, "generic resolution skipped for symbol-backed class");
        return Ok(None);
    }

    let mut declaring = declaring.clone();
    let mut name = name.to_string();
    let mut visited: HashSet<(FqName, String)> = HashSet::new();

    loop {
        if implementing == &declaring {
            return Ok(None);
        }
        if !visited.insert((declaring.fq_name().clone(), name.clone())) {
            debug!(class = %implementing, declaring = %declaring, parameter = %name, "type argument cycle");
            return Ok(None);
        }
        let Some(index) = declaring.index_of_type_parameter(&name) else {
            debug!(declaring = %declaring, parameter = %name, "not a type parameter of the declaring class");
            return Ok(None);
        };
        let Some((intermediate, super_type)) = find_supplying_super_type(module, implementing, &declaring)?
        else {
            debug!(class = %implementing, declaring = %declaring, "no supertype supplies arguments");
            return Ok(None);
        };
        let Some(argument) = super_type.arguments().into_iter().nth(index) else {
            debug!(
                class = %intermediate,
                super_type = %super_type,
                index,
                "supertype is missing the type argument"
            );
            return Ok(None);
        };
        match argument.type_parameter_of(&intermediate) {
            Some(next) => {
                declaring = intermediate;
                name = next;
            }
            None => return Ok(Some(argument)),
        }
    }
}

/// The first class, breadth-first from `implementing` (itself included),
/// whose direct supertypes name `declaring`, together with that supertype.
fn find_supplying_super_type(
    module: &ModuleDescriptor,
    implementing: &ClassReference,
    declaring: &ClassReference,
) -> ClassRefResult<Option<(ClassReference, TypeReference)>> {
    for candidate in implementing.all_super_type_class_references(module, true) {
        let candidate = candidate?;
        for super_type in candidate.direct_super_type_references(module) {
            if super_type.fq_name(module)?.as_ref() == Some(declaring.fq_name()) {
                return Ok(Some((candidate.clone(), super_type.clone())));
            }
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use classref_core::names::ClassId;
    use classref_core::symbols::{ClassSymbol, ResolvedType};
    use classref_core::syntax::{SyntaxClass, SyntaxFile, SyntaxTypeRef};
    use classref_core::types::ClassKind;

    fn get(module: &ModuleDescriptor, name: &str) -> ClassReference {
        module.get_class_reference(&FqName::new(name)).unwrap()
    }

    fn resolved(module: &ModuleDescriptor, class: &str, declaring: &str, name: &str) -> Option<String> {
        get(module, class)
            .resolve_generic_type(module, &get(module, declaring), name)
            .unwrap()
            .map(|t| t.to_string())
    }

    #[test]
    fn direct_supertype_argument() {
        let module = ModuleDescriptor::default();
        module.add_files([SyntaxFile::new("app")
            .with_class(SyntaxClass::interface("Factory").with_type_parameter("T"))
            .with_class(SyntaxClass::class("Service"))
            .with_class(
                SyntaxClass::class("ServiceFactory")
                    .with_super_type(SyntaxTypeRef::new("Factory").with_argument(SyntaxTypeRef::new("Service"))),
            )]);
        assert_eq!(
            resolved(&module, "app.ServiceFactory", "app.Factory", "T").as_deref(),
            Some("Service")
        );
    }

    #[test]
    fn receiver_is_declaring_class() {
        let module = ModuleDescriptor::default();
        module.add_files([SyntaxFile::new("app").with_class(SyntaxClass::interface("Factory").with_type_parameter("T"))]);
        assert_eq!(resolved(&module, "app.Factory", "app.Factory", "T"), None);
    }

    #[test]
    fn unknown_parameter_name() {
        let module = ModuleDescriptor::default();
        module.add_files([SyntaxFile::new("app")
            .with_class(SyntaxClass::interface("Factory").with_type_parameter("T"))
            .with_class(
                SyntaxClass::class("Impl")
                    .with_super_type(SyntaxTypeRef::new("Factory").with_argument(SyntaxTypeRef::new("Int"))),
            )]);
        assert_eq!(resolved(&module, "app.Impl", "app.Factory", "U"), None);
    }

    #[test]
    fn symbol_receiver_yields_none() {
        let module = ModuleDescriptor::default();
        module.add_symbols([
            ClassSymbol::new(ClassId::top_level("lib", "Factory"), ClassKind::Interface).with_type_parameter("T"),
            ClassSymbol::new(ClassId::top_level("lib", "Impl"), ClassKind::Class).with_super_type(
                ResolvedType::class("lib.Factory").with_argument(ResolvedType::class("kotlin.String")),
            ),
        ]);
        assert_eq!(resolved(&module, "lib.Impl", "lib.Factory", "T"), None);
    }

    #[test]
    fn cyclic_hierarchy_terminates() {
        let module = ModuleDescriptor::default();
        module.add_files([SyntaxFile::new("app")
            .with_class(
                SyntaxClass::class("A")
                    .with_type_parameter("X")
                    .with_super_type(SyntaxTypeRef::new("B").with_argument(SyntaxTypeRef::new("X"))),
            )
            .with_class(
                SyntaxClass::class("B")
                    .with_type_parameter("Y")
                    .with_super_type(SyntaxTypeRef::new("A").with_argument(SyntaxTypeRef::new("Y"))),
            )
            .with_class(
                SyntaxClass::class("C").with_super_type(SyntaxTypeRef::new("A").with_argument(SyntaxTypeRef::new("C"))),
            )]);
        assert_eq!(resolved(&module, "app.C", "app.B", "Y").as_deref(), Some("C"));
    }
}
