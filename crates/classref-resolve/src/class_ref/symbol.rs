//! View derivation for symbol-backed classes. Member lists keep the symbol's
//! scope order.

use std::sync::Arc;

use classref_core::error::{ClassRefError, ClassRefResult};
use classref_core::symbols::ClassSymbol;

use super::ClassBacking;
use crate::annotation_ref::AnnotationData;
use crate::function_ref::FunctionData;
use crate::module::ModuleDescriptor;
use crate::property_ref::PropertyData;
use crate::type_ref::TypeReference;

pub(super) fn constructors(symbol: &ClassSymbol) -> Vec<Arc<FunctionData>> {
    symbol
        .constructors
        .iter()
        .map(|f| Arc::new(FunctionData::from_symbol(Arc::clone(f))))
        .collect()
}

pub(super) fn functions(symbol: &ClassSymbol) -> Vec<Arc<FunctionData>> {
    symbol
        .functions
        .iter()
        .filter(|f| !f.kind.is_constructor())
        .map(|f| Arc::new(FunctionData::from_symbol(Arc::clone(f))))
        .collect()
}

pub(super) fn properties(symbol: &ClassSymbol) -> Vec<Arc<PropertyData>> {
    symbol
        .properties
        .iter()
        .map(|p| Arc::new(PropertyData::from_symbol(Arc::clone(p))))
        .collect()
}

pub(super) fn annotations(symbol: &ClassSymbol) -> Vec<Arc<AnnotationData>> {
    symbol
        .annotations
        .iter()
        .map(|a| Arc::new(AnnotationData::from_symbol(a.clone())))
        .collect()
}

pub(super) fn super_types(symbol: &ClassSymbol) -> Vec<TypeReference> {
    symbol
        .super_types
        .iter()
        .map(|t| TypeReference::from_resolved(t.clone()))
        .collect()
}

/// Outer classes, outermost first. Symbols are preferred, syntax is accepted
/// for outers that have not been type-checked.
pub(super) fn enclosing_classes(
    module: &ModuleDescriptor,
    symbol: &ClassSymbol,
) -> ClassRefResult<Vec<ClassBacking>> {
    let mut chain = symbol.class_id.outer_chain_with_self();
    chain.pop();
    chain
        .into_iter()
        .map(|id| {
            let fq_name = id.fq_name();
            if let Some(outer) = module.class_symbol(&fq_name) {
                return Ok(ClassBacking::Symbol(outer));
            }
            module
                .syntax_class(&fq_name)
                .map(ClassBacking::Syntax)
                .ok_or_else(|| {
                    ClassRefError::unresolved_reference(
                        format!("Couldn't resolve enclosing class {}.", fq_name),
                        None,
                    )
                })
        })
        .collect()
}
