//! Shared fixtures for resolver integration tests.

#![allow(dead_code)]

use classref_core::names::{ClassId, FqName};
use classref_core::symbols::{ClassSymbol, ResolvedType};
use classref_core::syntax::{SyntaxClass, SyntaxFile, SyntaxImport, SyntaxTypeRef};
use classref_core::types::ClassKind;
use classref_resolve::{ClassReference, ModuleDescriptor};

/// Look up a class that the fixture is known to contain.
pub fn class(module: &ModuleDescriptor, name: &str) -> ClassReference {
    module
        .get_class_reference(&FqName::new(name))
        .unwrap_or_else(|e| panic!("fixture class {name} missing: {e}"))
}

pub fn names(refs: &[ClassReference]) -> Vec<String> {
    refs.iter().map(ToString::to_string).collect()
}

pub fn type_ref(name: &str, arguments: &[&str]) -> SyntaxTypeRef {
    arguments
        .iter()
        .fold(SyntaxTypeRef::new(name), |t, a| t.with_argument(SyntaxTypeRef::new(*a)))
}

/// `interface A`, `interface B : A`, `interface C : A`, `class D : B, C`.
pub fn diamond() -> ModuleDescriptor {
    let module = ModuleDescriptor::default();
    module.add_files([SyntaxFile::new("diamond")
        .with_class(SyntaxClass::interface("A"))
        .with_class(SyntaxClass::interface("B").with_super_type(SyntaxTypeRef::new("A")))
        .with_class(SyntaxClass::interface("C").with_super_type(SyntaxTypeRef::new("A")))
        .with_class(
            SyntaxClass::class("D")
                .with_super_type(SyntaxTypeRef::new("B"))
                .with_super_type(SyntaxTypeRef::new("C")),
        )]);
    module
}

/// `class X : Y`, `class Y : X`. Malformed on purpose.
pub fn cycle() -> ModuleDescriptor {
    let module = ModuleDescriptor::default();
    module.add_files([SyntaxFile::new("cycle")
        .with_class(SyntaxClass::class("X").with_super_type(SyntaxTypeRef::new("Y")))
        .with_class(SyntaxClass::class("Y").with_super_type(SyntaxTypeRef::new("X")))]);
    module
}

/// A DI-style unit: a generic factory interface in a library package, an
/// intermediate generic base and concrete factories in the app package.
///
/// ```text
/// lib:  interface Factory<T>, interface Provider<K, V>
/// app:  class Service
///       abstract class BaseFactory<S> : Factory<S>
///       class ServiceFactory : Factory<Service>
///       class DerivedFactory : BaseFactory<Service>
///       class MapProvider : Provider<String, Service>
/// ```
pub fn factories() -> ModuleDescriptor {
    let module = ModuleDescriptor::default();
    module.add_files([
        SyntaxFile::new("lib")
            .with_class(SyntaxClass::interface("Factory").with_type_parameter("T"))
            .with_class(
                SyntaxClass::interface("Provider")
                    .with_type_parameter("K")
                    .with_type_parameter("V"),
            ),
        SyntaxFile::new("kotlin").with_class(SyntaxClass::class("String")),
        SyntaxFile::new("app")
            .with_import(SyntaxImport::all_under("lib"))
            .with_class(SyntaxClass::class("Service"))
            .with_class(
                SyntaxClass::class("BaseFactory")
                    .with_type_parameter("S")
                    .with_super_type(type_ref("Factory", &["S"])),
            )
            .with_class(SyntaxClass::class("ServiceFactory").with_super_type(type_ref("Factory", &["Service"])))
            .with_class(SyntaxClass::class("DerivedFactory").with_super_type(type_ref("BaseFactory", &["Service"])))
            .with_class(
                SyntaxClass::class("MapProvider").with_super_type(type_ref("Provider", &["String", "Service"])),
            ),
    ]);
    module
}

pub fn symbol_class(package: &str, name: &str, kind: ClassKind) -> ClassSymbol {
    ClassSymbol::new(ClassId::top_level(package, name), kind)
}

pub fn class_type(fq_name: &str) -> ResolvedType {
    ResolvedType::class(fq_name)
}
