//! Core data model for classref.
//!
//! This crate provides the language-agnostic pieces shared by the resolver
//! and the CLI:
//! - Qualified names ([`names::FqName`], [`names::ClassId`])
//! - The unresolved syntax model handed over by the parser ([`syntax`])
//! - The resolved symbol model handed over by the type-checker ([`symbols`])
//! - Canonical visibility levels ([`visibility::Visibility`])
//! - Error types and error codes ([`error`])
//! - Module configuration ([`config::ModuleConfig`])

pub mod config;
pub mod error;
pub mod names;
pub mod symbols;
pub mod syntax;
pub mod types;
pub mod visibility;
