//! Class references over syntax and resolved symbols.
//!
//! This crate provides the uniform view a code generator needs when some
//! classes of a compilation unit are only parsed and others are already
//! type-checked:
//!
//! - `module`: the per-unit canonicalization cache
//! - `class_ref`: class references, their views and hierarchy walks
//! - `function_ref`, `property_ref`, `annotation_ref`: member references
//! - `type_ref`: type references and syntax name resolution
//! - `generics`: type-variable resolution across supertypes
//!
//! # Example
//!
//! ```
//! use classref_core::names::FqName;
//! use classref_core::syntax::{SyntaxClass, SyntaxFile, SyntaxTypeRef};
//! use classref_resolve::ModuleDescriptor;
//!
//! let module = ModuleDescriptor::default();
//! module.add_files([SyntaxFile::new("app")
//!     .with_class(SyntaxClass::interface("Factory").with_type_parameter("T"))
//!     .with_class(SyntaxClass::class("Service"))
//!     .with_class(SyntaxClass::class("ServiceFactory").with_super_type(
//!         SyntaxTypeRef::new("Factory").with_argument(SyntaxTypeRef::new("Service")),
//!     ))]);
//!
//! let factory = module.get_class_reference(&FqName::new("app.Factory")).unwrap();
//! let implementation = module
//!     .get_class_reference(&FqName::new("app.ServiceFactory"))
//!     .unwrap();
//! let service = implementation
//!     .resolve_generic_type(&module, &factory, "T")
//!     .unwrap()
//!     .unwrap();
//! assert_eq!(
//!     service.fq_name(&module).unwrap(),
//!     Some(FqName::new("app.Service"))
//! );
//! ```

pub mod annotation_ref;
pub mod class_ref;
pub mod function_ref;
mod generics;
pub mod memo;
pub mod module;
mod name_resolution;
pub mod property_ref;
pub mod type_ref;

pub use annotation_ref::{AnnotationArgument, AnnotationReference, AnnotationValue};
pub use class_ref::{ClassBacking, ClassReference, SuperTypes};
pub use function_ref::{FunctionReference, ParameterReference};
pub use module::{Availability, ModuleDescriptor, ModuleId};
pub use property_ref::PropertyReference;
pub use type_ref::{SyntaxTypeContext, SyntaxTypeReference, TypeReference};
