//! Per-module configuration.

use serde::{Deserialize, Serialize};

use crate::names::FqName;

/// Name of the implicit supertype of every class.
pub const DEFAULT_ROOT_TYPE: &str = "kotlin.Any";

/// Packages whose classes are visible without an import.
pub const DEFAULT_IMPORTS: &[&str] = &[
    "kotlin",
    "kotlin.annotation",
    "kotlin.collections",
    "kotlin.jvm",
];

/// Configuration for a module context.
///
/// Every field has a default, so a unit document may omit the section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModuleConfig {
    /// The universal root supertype, excluded from direct supertypes.
    pub root_type: FqName,
    /// Packages consulted last when resolving a written type name.
    pub default_imports: Vec<FqName>,
}

impl Default for ModuleConfig {
    fn default() -> Self {
        ModuleConfig {
            root_type: FqName::new(DEFAULT_ROOT_TYPE),
            default_imports: DEFAULT_IMPORTS.iter().map(|p| FqName::new(*p)).collect(),
        }
    }
}

impl ModuleConfig {
    /// Whether `written` spells the root type, either fully-qualified or by
    /// its short name.
    pub fn is_root_type_spelling(&self, written: &str) -> bool {
        written == self.root_type.as_str() || written == self.root_type.short_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: ModuleConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ModuleConfig::default());
        assert_eq!(config.root_type.as_str(), "kotlin.Any");
    }

    #[test]
    fn root_type_spellings() {
        let config = ModuleConfig::default();
        assert!(config.is_root_type_spelling("Any"));
        assert!(config.is_root_type_spelling("kotlin.Any"));
        assert!(!config.is_root_type_spelling("AnyThing"));
    }

    #[test]
    fn root_type_can_be_overridden() {
        let config: ModuleConfig =
            serde_json::from_str(r#"{"root_type": "java.lang.Object"}"#).unwrap();
        assert!(config.is_root_type_spelling("Object"));
        assert_eq!(config.default_imports.len(), DEFAULT_IMPORTS.len());
    }
}
