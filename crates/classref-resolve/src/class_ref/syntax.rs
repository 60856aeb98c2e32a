//! View derivation for syntax-backed classes.
//!
//! Everything here walks the class node in declaration order. Written types
//! are wrapped with the class's [`SyntaxTypeContext`] so that their names can
//! be resolved later against the file's imports.

use std::sync::Arc;

use classref_core::error::{ClassRefError, ClassRefResult};
use classref_core::syntax::{SyntaxClassHandle, SyntaxFunction, SyntaxProperty};

use super::ClassBacking;
use crate::annotation_ref::AnnotationData;
use crate::function_ref::FunctionData;
use crate::property_ref::PropertyData;
use crate::type_ref::{SyntaxTypeContext, TypeReference};

pub(super) fn constructors(handle: &SyntaxClassHandle) -> Vec<Arc<FunctionData>> {
    function_data(handle, &handle.node.constructors)
}

pub(super) fn functions(handle: &SyntaxClassHandle) -> Vec<Arc<FunctionData>> {
    function_data(handle, &handle.node.functions)
}

fn function_data(handle: &SyntaxClassHandle, functions: &[Arc<SyntaxFunction>]) -> Vec<Arc<FunctionData>> {
    let context = SyntaxTypeContext::for_class(handle);
    functions
        .iter()
        .map(|function| Arc::new(FunctionData::from_syntax(Arc::clone(function), &context)))
        .collect()
}

/// `val`/`var` primary constructor parameters first, then body properties.
pub(super) fn properties(handle: &SyntaxClassHandle) -> Vec<Arc<PropertyData>> {
    let context = SyntaxTypeContext::for_class(handle);
    let from_constructor = handle
        .node
        .primary_constructor()
        .into_iter()
        .flat_map(|constructor| constructor.parameters.iter())
        .filter_map(SyntaxProperty::from_constructor_parameter)
        .map(Arc::new);
    from_constructor
        .chain(handle.node.properties.iter().cloned())
        .map(|property| Arc::new(PropertyData::from_syntax(property, context.clone())))
        .collect()
}

pub(super) fn annotations(handle: &SyntaxClassHandle) -> Vec<Arc<AnnotationData>> {
    let context = SyntaxTypeContext::for_class(handle);
    handle
        .node
        .annotations
        .iter()
        .map(|annotation| Arc::new(AnnotationData::from_syntax(annotation.clone(), context.clone())))
        .collect()
}

pub(super) fn super_types(handle: &SyntaxClassHandle) -> Vec<TypeReference> {
    let context = SyntaxTypeContext::for_class(handle);
    handle
        .node
        .super_types
        .iter()
        .map(|t| TypeReference::from_syntax(t.clone(), context.clone()))
        .collect()
}

/// Outer classes, outermost first, found by walking down the file.
pub(super) fn enclosing_classes(handle: &SyntaxClassHandle) -> ClassRefResult<Vec<ClassBacking>> {
    let mut chain = handle.class_id.outer_chain_with_self();
    chain.pop();
    chain
        .into_iter()
        .map(|id| {
            handle
                .file
                .find_class(&id)
                .map(ClassBacking::Syntax)
                .ok_or_else(|| {
                    ClassRefError::unresolved_reference(
                        format!("Couldn't find enclosing class {} in its file.", id.fq_name()),
                        None,
                    )
                })
        })
        .collect()
}
