//! Resolving type variables through supertype arguments.

mod support;

use classref_core::names::FqName;
use classref_core::symbols::ResolvedType;
use classref_core::syntax::{SyntaxClass, SyntaxFile, SyntaxFunction, SyntaxImport, SyntaxTypeRef};
use classref_core::types::ClassKind;
use classref_resolve::ModuleDescriptor;

use support::{class, factories, symbol_class};

fn resolve(module: &ModuleDescriptor, implementing: &str, declaring: &str, name: &str) -> Option<FqName> {
    class(module, implementing)
        .resolve_generic_type(module, &class(module, declaring), name)
        .unwrap()
        .and_then(|t| t.fq_name(module).unwrap())
}

#[test]
fn service_factory_supplies_service() {
    let module = factories();
    assert_eq!(
        resolve(&module, "app.ServiceFactory", "lib.Factory", "T"),
        Some(FqName::new("app.Service"))
    );
}

#[test]
fn argument_flows_through_intermediate_class() {
    let module = factories();
    assert_eq!(
        resolve(&module, "app.DerivedFactory", "lib.Factory", "T"),
        Some(FqName::new("app.Service"))
    );
}

#[test]
fn each_index_maps_to_its_argument() {
    let module = factories();
    let provider = class(&module, "lib.Provider");
    for (index, expected) in [(0, "kotlin.String"), (1, "app.Service")] {
        let name = &provider.type_parameters()[index];
        assert_eq!(provider.index_of_type_parameter(name), Some(index));
        assert_eq!(
            resolve(&module, "app.MapProvider", "lib.Provider", name),
            Some(FqName::new(expected))
        );
    }
}

#[test]
fn intermediate_receiver_keeps_its_own_variable() {
    let module = factories();
    assert_eq!(resolve(&module, "app.BaseFactory", "lib.Factory", "T"), None);
}

#[test]
fn unrelated_class_yields_none() {
    let module = factories();
    assert_eq!(resolve(&module, "app.Service", "lib.Factory", "T"), None);
}

#[test]
fn generic_return_type_of_declaring_member() {
    let module = ModuleDescriptor::default();
    module.add_files([
        SyntaxFile::new("lib").with_class(
            SyntaxClass::interface("Factory")
                .with_type_parameter("T")
                .with_function(SyntaxFunction::new("create").with_return_type(SyntaxTypeRef::new("T"))),
        ),
        SyntaxFile::new("app")
            .with_import(SyntaxImport::new("lib.Factory"))
            .with_class(SyntaxClass::class("Service"))
            .with_class(
                SyntaxClass::class("ServiceFactory")
                    .with_super_type(SyntaxTypeRef::new("Factory").with_argument(SyntaxTypeRef::new("Service"))),
            ),
    ]);
    let factory = class(&module, "lib.Factory");
    let create = &factory.functions()[0];
    let resolved = create
        .resolve_generic_return_type(&module, &class(&module, "app.ServiceFactory"))
        .unwrap()
        .unwrap();
    assert_eq!(resolved.fq_name(&module).unwrap(), Some(FqName::new("app.Service")));
}

#[test]
fn concrete_type_is_returned_unchanged() {
    let module = factories();
    let implementing = class(&module, "app.ServiceFactory");
    let service_type = implementing.direct_super_type_references(&module)[0].arguments()[0].clone();
    let resolved = service_type
        .resolve_generic_type(&module, &implementing, &class(&module, "lib.Factory"))
        .unwrap()
        .unwrap();
    assert_eq!(resolved.to_string(), "Service");
}

#[test]
fn symbol_intermediate_with_platform_argument() {
    let module = ModuleDescriptor::default();
    module.add_symbols([
        symbol_class("lib", "Factory", ClassKind::Interface).with_type_parameter("T"),
        symbol_class("lib", "JavaBase", ClassKind::Class)
            .with_type_parameter("E")
            .with_super_type(ResolvedType::class("lib.Factory").with_argument(ResolvedType::flexible(
                ResolvedType::type_parameter("E"),
                ResolvedType::type_parameter("E").nullable(),
            ))),
        symbol_class("lib", "Widget", ClassKind::Class),
    ]);
    module.add_files([SyntaxFile::new("app")
        .with_import(SyntaxImport::new("lib.JavaBase"))
        .with_import(SyntaxImport::new("lib.Widget"))
        .with_class(
            SyntaxClass::class("WidgetFactory")
                .with_super_type(SyntaxTypeRef::new("JavaBase").with_argument(SyntaxTypeRef::new("Widget"))),
        )]);
    assert_eq!(
        resolve(&module, "app.WidgetFactory", "lib.Factory", "T"),
        Some(FqName::new("lib.Widget"))
    );
}

#[test]
fn definitely_non_null_argument_is_unwrapped() {
    let module = ModuleDescriptor::default();
    module.add_symbols([
        symbol_class("lib", "Factory", ClassKind::Interface).with_type_parameter("T"),
        symbol_class("lib", "StrictBase", ClassKind::Class)
            .with_type_parameter("E")
            .with_super_type(
                ResolvedType::class("lib.Factory")
                    .with_argument(ResolvedType::definitely_non_null(ResolvedType::type_parameter("E"))),
            ),
        symbol_class("lib", "Widget", ClassKind::Class),
    ]);
    module.add_files([SyntaxFile::new("app")
        .with_import(SyntaxImport::all_under("lib"))
        .with_class(
            SyntaxClass::class("WidgetFactory")
                .with_super_type(SyntaxTypeRef::new("StrictBase").with_argument(SyntaxTypeRef::new("Widget"))),
        )]);
    assert_eq!(
        resolve(&module, "app.WidgetFactory", "lib.Factory", "T"),
        Some(FqName::new("lib.Widget"))
    );
}
