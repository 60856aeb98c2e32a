//! Compile-only test to verify the public API surface.
//!
//! If this file fails to compile, the public API has regressed.

#![allow(unused_imports)]

// ============================================================================
// Core model
// ============================================================================

use classref_core::config::{ModuleConfig, DEFAULT_IMPORTS, DEFAULT_ROOT_TYPE};
use classref_core::error::{ClassRefError, ClassRefResult, Origin, OutputErrorCode};
use classref_core::names::{ClassId, FqName};
use classref_core::symbols::{
    AnnotationArgumentSymbol, AnnotationSymbol, ClassSymbol, ConstantValue, FunctionSymbol, MemberOrigin,
    Modality, PropertySymbol, ResolvedType, SymbolVisibility, ValueParameterSymbol,
};
use classref_core::syntax::{
    Modifier, PropertyKeyword, SyntaxAnnotation, SyntaxAnnotationArgument, SyntaxClass, SyntaxClassHandle,
    SyntaxFile, SyntaxFunction, SyntaxImport, SyntaxParameter, SyntaxProperty, SyntaxTypeRef,
    CONSTRUCTOR_NAME,
};
use classref_core::types::{ClassKind, FunctionKind, Location, OriginKind};
use classref_core::visibility::Visibility;

// ============================================================================
// Resolver
// ============================================================================

use classref_resolve::memo::Memo;
use classref_resolve::{
    AnnotationArgument, AnnotationReference, AnnotationValue, Availability, ClassBacking, ClassReference,
    FunctionReference, ModuleDescriptor, ModuleId, ParameterReference, PropertyReference, SuperTypes,
    SyntaxTypeContext, SyntaxTypeReference, TypeReference,
};

#[test]
fn api_surface_compiles() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<ModuleDescriptor>();
    assert_send_sync::<ClassReference>();
    assert_send_sync::<TypeReference>();
}
