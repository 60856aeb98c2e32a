//! Compilation unit documents.
//!
//! A unit document is the JSON hand-off from a front-end: the parsed files
//! of the current round, the class symbols an earlier phase resolved, and
//! optional module configuration. Every section may be omitted.
//!
//! ```json
//! {
//!   "config": { "root_type": "kotlin.Any" },
//!   "files": [{ "package": "app", "classes": [{ "name": "Service" }] }],
//!   "symbols": [{ "class_id": "lib/Api", "kind": "interface" }]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use classref_core::config::ModuleConfig;
use classref_core::symbols::ClassSymbol;
use classref_core::syntax::SyntaxFile;
use classref_resolve::ModuleDescriptor;

use crate::cli::CliError;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilationUnitDocument {
    pub config: ModuleConfig,
    pub files: Vec<SyntaxFile>,
    pub symbols: Vec<ClassSymbol>,
}

impl CompilationUnitDocument {
    /// Read and parse a unit document.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::UnitRead {
            path: path.display().to_string(),
            source,
        })?;
        let document: CompilationUnitDocument =
            serde_json::from_str(&text).map_err(|source| CliError::UnitParse {
                path: path.display().to_string(),
                source,
            })?;
        debug!(
            path = %path.display(),
            files = document.files.len(),
            symbols = document.symbols.len(),
            "loaded unit document"
        );
        Ok(document)
    }

    /// Build a module context holding every file and symbol of the unit.
    pub fn into_module(self) -> ModuleDescriptor {
        let module = ModuleDescriptor::new(self.config);
        let syntax = module.add_files(self.files).len();
        let symbols = module.add_symbols(self.symbols).len();
        info!(module = %module.id(), syntax, symbols, "module populated");
        module
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use classref_core::names::FqName;
    use std::io::Write;

    #[test]
    fn empty_document_uses_defaults() {
        let document: CompilationUnitDocument = serde_json::from_str("{}").unwrap();
        assert_eq!(document.config, ModuleConfig::default());
        assert!(document.files.is_empty());
    }

    #[test]
    fn load_and_populate() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "files": [{{ "package": "app", "classes": [{{ "name": "Service", "classes": [{{ "name": "Nested" }}] }}] }}],
                "symbols": [{{ "class_id": "lib/Api", "kind": "interface" }}]
            }}"#
        )
        .unwrap();
        let module = CompilationUnitDocument::load(file.path()).unwrap().into_module();
        let names: Vec<String> = module.class_names().iter().map(FqName::to_string).collect();
        assert_eq!(names, vec!["app.Service", "app.Service.Nested", "lib.Api"]);
    }

    #[test]
    fn malformed_document_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ \"files\": 3 }}").unwrap();
        let err = CompilationUnitDocument::load(file.path()).unwrap_err();
        assert!(matches!(err, CliError::UnitParse { .. }));
    }

    #[test]
    fn empty_class_name_is_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "files": [{{ "package": "app", "classes": [{{ "name": "" }}] }}] }}"#).unwrap();
        let err = CompilationUnitDocument::load(file.path()).unwrap_err();
        assert!(matches!(err, CliError::UnitParse { .. }));
    }
}
