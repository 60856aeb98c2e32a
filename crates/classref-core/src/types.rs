//! Common types shared between the syntax model, the symbol model and errors.
//!
//! Kept in a separate module to avoid circular dependencies between them.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Location Type
// ============================================================================

/// Location in a source file, used for diagnostic attribution.
///
/// - `file`: Path as reported by the front-end
/// - `line`: 1-indexed line number
/// - `col`: 1-indexed column
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Location {
    /// File path.
    pub file: String,
    /// Line number (1-indexed).
    pub line: u32,
    /// Column number (1-indexed).
    pub col: u32,
}

impl Location {
    pub fn new(file: impl Into<String>, line: u32, col: u32) -> Self {
        Location {
            file: file.into(),
            line,
            col,
        }
    }

    /// Parse a location from "path:line:col" format.
    ///
    /// Robust against paths containing colons (e.g., Windows paths).
    pub fn parse(s: &str) -> Option<Self> {
        let mut parts = s.rsplitn(3, ':');
        let col = parts.next()?.parse().ok()?;
        let line = parts.next()?.parse().ok()?;
        let file = parts.next()?;
        if file.is_empty() {
            return None;
        }
        Some(Location::new(file, line, col))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.col)
    }
}

// ============================================================================
// Declaration Kinds
// ============================================================================

/// Kind of class-like declaration.
///
/// Companion objects are `Object`s; companionship is a separate flag
/// (a `companion` modifier in syntax, `is_companion` on symbols).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClassKind {
    #[default]
    Class,
    Interface,
    Object,
    EnumClass,
    AnnotationClass,
}

/// Kind of function-like declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum FunctionKind {
    #[default]
    Function,
    PrimaryConstructor,
    SecondaryConstructor,
}

impl FunctionKind {
    pub fn is_constructor(self) -> bool {
        !matches!(self, FunctionKind::Function)
    }
}

// ============================================================================
// Error Origin
// ============================================================================

/// Which representation an error-producing element came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OriginKind {
    Syntax,
    Symbol,
}

/// The element a diagnostic is attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Origin {
    pub kind: OriginKind,
    /// Human-readable description, e.g. `class com.example.Foo`.
    pub element: String,
    /// Source location, when the front-end recorded one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

impl Origin {
    pub fn syntax(element: impl Into<String>, location: Option<Location>) -> Self {
        Origin {
            kind: OriginKind::Syntax,
            element: element.into(),
            location,
        }
    }

    pub fn symbol(element: impl Into<String>) -> Self {
        Origin {
            kind: OriginKind::Symbol,
            element: element.into(),
            location: None,
        }
    }
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{} ({})", self.element, location),
            None => f.write_str(&self.element),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_parse_handles_colons_in_path() {
        let loc = Location::parse("C:\\src\\Foo.kt:12:4").unwrap();
        assert_eq!(loc.file, "C:\\src\\Foo.kt");
        assert_eq!(loc.line, 12);
        assert_eq!(loc.col, 4);
        assert!(Location::parse("Foo.kt:12").is_none());
    }

    #[test]
    fn origin_display_includes_location() {
        let origin = Origin::syntax("class a.Foo", Some(Location::new("Foo.kt", 3, 1)));
        assert_eq!(origin.to_string(), "class a.Foo (Foo.kt:3:1)");
        assert_eq!(Origin::symbol("class a.Bar").to_string(), "class a.Bar");
    }

    #[test]
    fn constructors_are_function_kinds() {
        assert!(FunctionKind::PrimaryConstructor.is_constructor());
        assert!(FunctionKind::SecondaryConstructor.is_constructor());
        assert!(!FunctionKind::Function.is_constructor());
    }
}
